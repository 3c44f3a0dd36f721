//! Tests for version assumption.
#![allow(clippy::unwrap_used)]

use tsupgrade::assume_version;
use tsupgrade::version::TypeScriptVersion;

#[test]
fn test_plain_source() {
    assert_eq!(
        assume_version("let x: number = 1;\nfunction f() { return x; }\n").unwrap(),
        TypeScriptVersion::Before2_0
    );
}

#[test]
fn test_const_assertion() {
    assert_eq!(assume_version("const a = [1] as const;").unwrap(), TypeScriptVersion::V3_4);
}

#[test]
fn test_optional_chain_and_nullish() {
    assert_eq!(assume_version("const a = b?.c;").unwrap(), TypeScriptVersion::V3_7);
    assert_eq!(assume_version("const a = b ?? c;").unwrap(), TypeScriptVersion::V3_7);
}

#[test]
fn test_newest_idiom_wins() {
    assert_eq!(
        assume_version("export * as ns from './ns';\nconst a = [1] as const;\n").unwrap(),
        TypeScriptVersion::V3_8
    );
}

#[test]
fn test_upgraded_output_needs_target() {
    let out = tsupgrade::upgrade(
        "const v = a != null ? a : 1;",
        TypeScriptVersion::V3_8,
        &tsupgrade::features::Options::default(),
    )
    .unwrap();
    assert_eq!(assume_version(&out).unwrap(), TypeScriptVersion::V3_7);
}

#[test]
fn test_broken_source() {
    assert!(assume_version("const = ;").is_err());
}
