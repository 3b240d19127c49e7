use super::ConfigSource;
use crate::container::{ContainerBuilder, MANIFEST_FILE_NAME};
use crate::loader::{Autoloader, ProxyLoader};
use anyhow::Result;

/// Resolve `type_name` the way the compiled container would at run time.
/// Returns whether the type was found.
pub fn handle_resolve(source: &ConfigSource, type_name: &str) -> Result<bool> {
    let (_, _, resolved) = source.resolve()?;
    let mut host = Autoloader::new();

    match ContainerBuilder::load(&resolved.proxy_dir.join(MANIFEST_FILE_NAME))? {
        Some(container) => container.initialize(&mut host)?,
        None => ProxyLoader::register(&mut host, &resolved.proxy_dir, &resolved.proxy_namespace)?,
    }

    match host.load(type_name)? {
        Some(loaded) => {
            println!("{}", loaded.path.display());
            Ok(true)
        }
        None => {
            println!("unresolved");
            Ok(false)
        }
    }
}
