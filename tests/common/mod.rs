// Shared fixtures for autofactory integration tests
#![allow(dead_code)]

use autofactory::config::ResolvedConfig;
use indoc::indoc;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const PROXY_NAMESPACE: &str = "Gen";
pub const CONTROL: &str = "App\\Controls\\Control";

pub const CONFIG: &str = indoc! {r#"
    scan_for = "App\\Controls\\Control"
    source_dirs = ["%appDir%/app"]
    proxy_namespace = "Gen"
    proxy_dir = "%appDir%/temp/proxies"
"#};

/// A small PHP application with a mix of selectable and non-selectable
/// control classes.
pub struct Project {
    pub dir: TempDir,
}

impl Project {
    pub fn new() -> Self {
        let project = Self {
            dir: TempDir::new().unwrap(),
        };
        project.write("autofactory.toml", CONFIG);
        project.write(
            "app/Controls/Control.php",
            indoc! {r#"
                <?php
                namespace App\Controls;

                interface Control {}
            "#},
        );
        project.write(
            "app/Controls/Grid.php",
            indoc! {r#"
                <?php
                namespace App\Controls;

                use Psr\Log\LoggerInterface;

                class Grid implements Control
                {
                    public function __construct(int $a, LoggerInterface $logger, string $b = "x")
                    {
                    }
                }
            "#},
        );
        project.write(
            "app/Controls/BaseControl.php",
            indoc! {r#"
                <?php
                namespace App\Controls;

                abstract class BaseControl implements Control {}
            "#},
        );
        project.write(
            "app/Controls/Menu.php",
            indoc! {r#"
                <?php
                namespace App\Controls;

                class Menu extends BaseControl {}
            "#},
        );
        project.write(
            "app/Service/Registry.php",
            indoc! {r#"
                <?php
                namespace App\Service;

                use App\Controls\Control;

                final class Registry implements Control
                {
                    private function __construct() {}
                }
            "#},
        );
        project
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write(&self, relative: &str, contents: &str) {
        let path = self.dir.path().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    pub fn config_path(&self) -> PathBuf {
        self.path().join("autofactory.toml")
    }

    pub fn proxy_dir(&self) -> PathBuf {
        self.path().join("temp/proxies")
    }

    pub fn resolved(&self, scan_for: &[&str]) -> ResolvedConfig {
        ResolvedConfig {
            scan_for: scan_for.iter().map(|s| s.to_string()).collect(),
            source_dirs: vec![self.path().join("app")],
            proxy_namespace: PROXY_NAMESPACE.to_string(),
            proxy_dir: self.proxy_dir(),
            exclude: Vec::new(),
        }
    }
}

/// Sorted file names in `dir`.
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
