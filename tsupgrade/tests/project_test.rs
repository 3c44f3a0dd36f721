//! Tests for project mode.
#![allow(clippy::unwrap_used)]

use std::fs;
use tempfile::TempDir;
use tsupgrade::features::{FeatureRule, Options};
use tsupgrade::utils::DiscoveryOptions;
use tsupgrade::version::TypeScriptVersion;
use tsupgrade::Upgrader;

fn project() -> TempDir {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("src");
    fs::create_dir_all(src.join("node_modules/dep")).unwrap();
    fs::write(src.join("enums.ts"), "export enum Level { Low = \"low\" }\n").unwrap();
    fs::write(
        src.join("main.ts"),
        "import { Level } from './enums';\nexport const level = Level.Low as Level.Low;\nexport const v = a && a.b;\n",
    )
    .unwrap();
    fs::write(src.join("view.tsx"), "const el = <div>{a && a.b}</div>;\n").unwrap();
    fs::write(src.join("types.d.ts"), "declare const v: 1;\nconst w = a && a.b;\n").unwrap();
    fs::write(src.join("node_modules/dep/index.ts"), "const v = a && a.b;\n").unwrap();
    dir
}

#[test]
fn test_project_upgrade() {
    let dir = project();
    let upgrader = Upgrader::new(TypeScriptVersion::V3_8, Options::default());
    let report = upgrader.upgrade_project(&[dir.path().to_path_buf()]).unwrap();

    let names: Vec<String> = report
        .files
        .iter()
        .map(|f| f.path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, ["enums.ts", "main.ts"]);

    let main = &report.files[1];
    assert_eq!(
        main.upgraded,
        "import { Level } from './enums';\nexport const level = Level.Low as const;\nexport const v = a?.b;\n"
    );
    assert_eq!(report.rule_totals().get(&FeatureRule::ConstAssertion), Some(&1));
    assert_eq!(report.rule_totals().get(&FeatureRule::OptionalChains), Some(&1));

    // Nothing written until asked.
    let on_disk = fs::read_to_string(&main.path).unwrap();
    assert_eq!(on_disk, main.original);
    assert!(main.write().unwrap());
    assert_eq!(fs::read_to_string(&main.path).unwrap(), main.upgraded);
}

#[test]
fn test_declarations_and_tsx_skipped_by_default() {
    let dir = project();
    let upgrader = Upgrader::new(TypeScriptVersion::V3_8, Options::default());
    let report = upgrader.upgrade_project(&[dir.path().to_path_buf()]).unwrap();

    assert!(report.files.iter().all(|f| {
        let name = f.path.to_string_lossy();
        !name.ends_with(".d.ts") && !name.ends_with(".tsx")
    }));
    let untouched = fs::read_to_string(dir.path().join("src/types.d.ts")).unwrap();
    assert!(untouched.contains("a && a.b"));
}

#[test]
fn test_tsx_and_declarations_opt_in() {
    let dir = project();
    let upgrader = Upgrader::new(TypeScriptVersion::V3_8, Options::default()).with_discovery(
        DiscoveryOptions {
            include_tsx: true,
            include_declarations: true,
            ..DiscoveryOptions::default()
        },
    );
    let report = upgrader.upgrade_project(&[dir.path().to_path_buf()]).unwrap();
    assert_eq!(report.files.len(), 4);
    assert!(report
        .files
        .iter()
        .any(|f| f.path.ends_with("types.d.ts") && f.upgraded.contains("a?.b")));

    let view = report
        .files
        .iter()
        .find(|f| f.path.ends_with("view.tsx"))
        .unwrap();
    assert!(view.error.is_none());
    assert_eq!(view.upgraded, "const el = <div>{a?.b}</div>;\n");
}

#[test]
fn test_broken_file_does_not_stop_others() {
    let dir = project();
    fs::write(dir.path().join("src/broken.ts"), "const = ;\n").unwrap();
    let upgrader = Upgrader::new(TypeScriptVersion::V3_8, Options::default());
    let report = upgrader.upgrade_project(&[dir.path().to_path_buf()]).unwrap();

    let broken: Vec<_> = report.failed().collect();
    assert_eq!(broken.len(), 1);
    assert!(broken[0].path.ends_with("broken.ts"));
    assert!(broken[0].error.as_deref().unwrap().contains("syntax error"));
    assert!(!broken[0].write().unwrap());
    assert_eq!(report.changed().count(), 1);
}

#[test]
fn test_missing_path() {
    let dir = TempDir::new().unwrap();
    let upgrader = Upgrader::new(TypeScriptVersion::V3_8, Options::default());
    assert!(upgrader.upgrade_project(&[dir.path().join("nope")]).is_err());
}
