//! Registration of factory definitions with the host container.

use crate::container::{ContainerBuilder, FACTORY_TAG};
use crate::errors::Result;
use crate::registry::PersistedArtifact;

/// Prefix of every definition this extension adds.
pub const DEFINITION_PREFIX: &str = "autofactory";

pub fn definition_name(slot: usize) -> String {
    format!("{DEFINITION_PREFIX}.factory.{slot}")
}

/// Add one tagged definition per persisted factory artifact, numbering slots
/// from zero in artifact order. Returns the number of definitions added.
pub fn emit_definitions(builder: &mut ContainerBuilder, artifacts: &[PersistedArtifact]) -> Result<usize> {
    let factories = artifacts
        .iter()
        .filter_map(|a| a.class_name.as_ref().map(|class| (a, class)));

    let mut slot = 0;
    for (artifact, class) in factories {
        builder
            .add_definition(definition_name(slot))?
            .set_implement(artifact.qualified_name.clone())
            .add_tag(FACTORY_TAG, vec![class.clone()]);
        slot += 1;
    }

    Ok(slot)
}
