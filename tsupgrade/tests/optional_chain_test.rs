//! Tests for the optional chaining rewrite.
#![allow(clippy::unwrap_used)]

use tsupgrade::features::Options;
use tsupgrade::upgrade;
use tsupgrade::version::TypeScriptVersion;

fn run(source: &str) -> String {
    upgrade(source, TypeScriptVersion::V3_7, &Options::default()).unwrap()
}

#[test]
fn test_property_chain() {
    assert_eq!(run("if (a && a.b && a.b.c) {}"), "if (a?.b?.c) {}");
}

#[test]
fn test_calls_and_subscripts() {
    assert_eq!(
        run("x = a && a.b && a.b[\"c\"] && a.b[\"c\"]() && a.b[\"c\"]().d;"),
        "x = a?.b?.[\"c\"]?.()?.d;"
    );
}

#[test]
fn test_unguarded_segments_are_copied() {
    assert_eq!(run("x = a && a.b.c && a.b.c.d;"), "x = a?.b.c?.d;");
}

#[test]
fn test_unrelated_conjunctions_untouched() {
    let source = "x = y && a.b;\nz = a.b.c && a.b;\n";
    assert_eq!(run(source), source);
}

#[test]
fn test_private_name_untouched() {
    let source = "class K { #p = 1; m(o) { return o && o.#p; } }";
    assert_eq!(run(source), source);
}

#[test]
fn test_mixed_with_nullish() {
    assert_eq!(
        run("const v = a.b != null ? a.b : c;\nconst w = a && a.b;\n"),
        "const v = a.b ?? c;\nconst w = a?.b;\n"
    );
}
