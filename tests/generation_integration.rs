//! End-to-end generation runs against a PHP project on disk.

mod common;

use autofactory::container::{ContainerBuilder, Initializer, FACTORY_TAG};
use autofactory::errors::Error;
use autofactory::generator::{generate, is_fresh};
use common::{file_names, Project, CONTROL, PROXY_NAMESPACE};
use indoc::indoc;
use pretty_assertions::assert_eq;
use std::fs;

const GRID_FACTORY: &str = "AppControlsGrid___GeneratedFactoryInterface";
const MENU_FACTORY: &str = "AppControlsMenu___GeneratedFactoryInterface";

#[test]
fn test_generates_factories_for_instantiable_subtypes() {
    let project = Project::new();
    let mut builder = ContainerBuilder::new();

    let report = generate(&project.resolved(&[CONTROL]), &mut builder).unwrap();

    assert_eq!(report.definitions, 2);
    assert_eq!(report.indexed_classes, 5);
    assert_eq!(report.scanned_files, 5);
    assert_eq!(
        file_names(&project.proxy_dir()),
        vec![
            "AppControlsGrid___GeneratedFactoryInterface.php",
            "AppControlsMenu___GeneratedFactoryInterface.php",
            "IGeneratedFactory.php",
        ]
    );

    let grid = builder.definition("autofactory.factory.0").unwrap();
    assert_eq!(grid.implement, format!("Gen\\{GRID_FACTORY}"));
    assert_eq!(grid.tags.get(FACTORY_TAG), Some(&vec!["App\\Controls\\Grid".to_string()]));
    let menu = builder.definition("autofactory.factory.1").unwrap();
    assert_eq!(menu.implement, format!("Gen\\{MENU_FACTORY}"));

    assert_eq!(
        builder.initializers(),
        &[Initializer::RegisterProxyLoader {
            dir: project.proxy_dir(),
            namespace: PROXY_NAMESPACE.to_string(),
        }]
    );
}

#[test]
fn test_factory_keeps_only_builtin_parameters() {
    let project = Project::new();
    generate(&project.resolved(&[CONTROL]), &mut ContainerBuilder::new()).unwrap();

    let source = fs::read_to_string(project.proxy_dir().join(format!("{GRID_FACTORY}.php"))).unwrap();
    let expected = "<?php\n\
        declare(strict_types=1);\n\
        \n\
        namespace Gen;\n\
        \n\
        interface AppControlsGrid___GeneratedFactoryInterface extends IGeneratedFactory\n\
        {\n\
        \t/**\n\
        \t * @param int $a\n\
        \t * @param string $b\n\
        \t */\n\
        \tpublic function create(int $a, string $b = \"x\"): \\App\\Controls\\Grid;\n\
        }\n";
    assert_eq!(source, expected);

    let menu = fs::read_to_string(project.proxy_dir().join(format!("{MENU_FACTORY}.php"))).unwrap();
    assert!(menu.contains("\tpublic function create(): \\App\\Controls\\Menu;\n"));
}

#[test]
fn test_rerun_produces_identical_output() {
    let project = Project::new();
    let config = project.resolved(&[CONTROL]);

    let mut first = ContainerBuilder::new();
    generate(&config, &mut first).unwrap();
    let grid_path = project.proxy_dir().join(format!("{GRID_FACTORY}.php"));
    let before = fs::read(&grid_path).unwrap();

    let mut second = ContainerBuilder::new();
    generate(&config, &mut second).unwrap();

    assert_eq!(fs::read(&grid_path).unwrap(), before);
    assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
}

#[test]
fn test_no_subtypes_registers_no_definitions() {
    let project = Project::new();
    project.write(
        "app/Contracts/Lonely.php",
        "<?php\nnamespace App\\Contracts;\ninterface Lonely {}\n",
    );
    let mut builder = ContainerBuilder::new();

    let report = generate(&project.resolved(&["App\\Contracts\\Lonely"]), &mut builder).unwrap();

    assert_eq!(report.definitions, 0);
    assert!(builder.definitions().is_empty());
    assert_eq!(file_names(&project.proxy_dir()), vec!["IGeneratedFactory.php"]);
}

#[test]
fn test_unknown_scan_target_fails_before_registering() {
    let project = Project::new();
    let mut builder = ContainerBuilder::new();

    let err = generate(&project.resolved(&["App\\Missing"]), &mut builder).unwrap_err();

    assert!(matches!(err, Error::UnknownScanTarget(ref name) if name == "App\\Missing"));
    assert_eq!(err.to_string(), "Class or interface App\\Missing does not exist");
    assert!(builder.definitions().is_empty());
}

#[test]
fn test_unusable_proxy_dir_fails() {
    let project = Project::new();
    project.write("blocked", "not a directory");
    let mut config = project.resolved(&[CONTROL]);
    config.proxy_dir = project.path().join("blocked/proxies");
    let mut builder = ContainerBuilder::new();

    let err = generate(&config, &mut builder).unwrap_err();

    assert!(matches!(err, Error::ProxyDirectory { .. }));
    assert!(builder.definitions().is_empty());
}

#[test]
fn test_freshness_tracks_source_changes() {
    let project = Project::new();
    let config = project.resolved(&[CONTROL]);
    let mut builder = ContainerBuilder::new();
    generate(&config, &mut builder).unwrap();

    assert!(is_fresh(&config, &builder).unwrap());

    let mut other_namespace = config.clone();
    other_namespace.proxy_namespace = "Other".to_string();
    assert!(!is_fresh(&other_namespace, &builder).unwrap());

    project.write(
        "app/Controls/Grid.php",
        "<?php\nnamespace App\\Controls;\nclass Grid implements Control {}\n",
    );
    assert!(!is_fresh(&config, &builder).unwrap());
}

#[test]
fn test_new_source_file_expires_generation() {
    let project = Project::new();
    let config = project.resolved(&[CONTROL]);
    let mut builder = ContainerBuilder::new();
    generate(&config, &mut builder).unwrap();

    project.write(
        "app/Controls/Tabs.php",
        "<?php\nnamespace App\\Controls;\nclass Tabs implements Control {}\n",
    );

    assert!(!is_fresh(&config, &builder).unwrap());
}

#[test]
fn test_constant_defaults_are_fully_qualified() {
    let project = Project::new();
    project.write(
        "app/Controls/Pager.php",
        indoc! {r#"
            <?php
            namespace App\Controls;

            use App\Config\Limits;

            class Pager implements Control
            {
                public function __construct(int $n = Limits::MAX, int $m = self::MIN)
                {
                }
            }
        "#},
    );

    generate(&project.resolved(&[CONTROL]), &mut ContainerBuilder::new()).unwrap();

    let source = fs::read_to_string(
        project
            .proxy_dir()
            .join("AppControlsPager___GeneratedFactoryInterface.php"),
    )
    .unwrap();
    assert!(source.contains(
        "\tpublic function create(int $n = \\App\\Config\\Limits::MAX, int $m = \\App\\Controls\\Pager::MIN): \\App\\Controls\\Pager;\n"
    ));
}

#[test]
fn test_class_becoming_a_subtype_expires_generation() {
    let project = Project::new();
    project.write("app/Plain.php", "<?php\nnamespace App;\nclass Plain {}\n");
    let config = project.resolved(&[CONTROL]);
    let mut builder = ContainerBuilder::new();
    generate(&config, &mut builder).unwrap();
    assert!(is_fresh(&config, &builder).unwrap());

    project.write(
        "app/Plain.php",
        "<?php\nnamespace App;\nclass Plain implements Controls\\Control {}\n",
    );

    assert!(!is_fresh(&config, &builder).unwrap());
}

#[test]
fn test_deleted_artifact_expires_generation() {
    let project = Project::new();
    let config = project.resolved(&[CONTROL]);
    let mut builder = ContainerBuilder::new();
    generate(&config, &mut builder).unwrap();

    fs::remove_file(project.proxy_dir().join(format!("{GRID_FACTORY}.php"))).unwrap();

    assert!(!is_fresh(&config, &builder).unwrap());
}

#[test]
fn test_scan_target_outside_source_dirs() {
    let project = Project::new();
    project.write(
        "app/Widget.php",
        indoc! {r#"
            <?php
            namespace App;

            use Nette\Application\UI\Control as UiControl;

            class Widget extends UiControl {}
        "#},
    );
    let mut builder = ContainerBuilder::new();

    let report = generate(
        &project.resolved(&["Nette\\Application\\UI\\Control"]),
        &mut builder,
    )
    .unwrap();

    assert_eq!(report.definitions, 1);
    let widget = builder.definition("autofactory.factory.0").unwrap();
    assert_eq!(widget.implement, "Gen\\AppWidget___GeneratedFactoryInterface");
    assert!(project
        .proxy_dir()
        .join("AppWidget___GeneratedFactoryInterface.php")
        .is_file());
}

#[test]
fn test_failed_write_registers_nothing() {
    let project = Project::new();
    fs::create_dir_all(project.proxy_dir().join(format!("{GRID_FACTORY}.php"))).unwrap();
    let mut builder = ContainerBuilder::new();

    let err = generate(&project.resolved(&[CONTROL]), &mut builder).unwrap_err();

    assert!(matches!(err, Error::ArtifactWrite { .. }));
    assert!(builder.definitions().is_empty());
    assert!(builder.initializers().is_empty());
    assert!(builder.dependencies().is_empty());
}
