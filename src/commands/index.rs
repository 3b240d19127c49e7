use super::ConfigSource;
use crate::index::{ClassIndex, ClassKind};
use crate::selector::TargetTypes;
use anyhow::Result;

/// Print every indexed class; classes that would get a factory are marked `*`.
pub fn handle_index(source: &ConfigSource) -> Result<()> {
    let (_, _, resolved) = source.resolve()?;
    let index = ClassIndex::build(&resolved.source_dirs, &resolved.exclude)?;
    let targets = TargetTypes::resolve(&index, &resolved.scan_for)?;

    for class in index.classes() {
        let kind = match class.kind {
            ClassKind::Class if class.is_abstract => "abstract class",
            ClassKind::Class => "class",
            ClassKind::Interface => "interface",
            ClassKind::Trait => "trait",
            ClassKind::Enum => "enum",
        };
        let selected = index.is_instantiable(class) && targets.matched_by(&index, class).is_some();
        println!(
            "{} {} {} ({}:{})",
            if selected { "*" } else { " " },
            kind,
            class.name,
            class.file.display(),
            class.line
        );
    }

    Ok(())
}
