use rustc_hash::FxHashSet;
use std::sync::OnceLock;

/// Name of the dedicated configuration file.
pub const CONFIG_FILENAME: &str = ".tsupgrade.toml";

/// `package.json`, whose `"tsupgrade"` key is the fallback configuration source.
pub const PACKAGE_JSON: &str = "package.json";

/// Key under which configuration lives in `package.json`.
pub const PACKAGE_JSON_KEY: &str = "tsupgrade";

/// Fixed-point passes allowed per file before giving up.
pub const DEFAULT_MAX_PASSES: usize = 64;

/// Extensions always collected from a project.
pub const SOURCE_EXTENSIONS: [&str; 3] = ["ts", "mts", "cts"];

/// Extension collected only when TSX files are enabled.
pub const TSX_EXTENSION: &str = "tsx";

/// Declaration file suffixes, skipped unless explicitly enabled.
pub const DECLARATION_SUFFIXES: [&str; 3] = [".d.ts", ".d.mts", ".d.cts"];

/// Set of folders to exclude by default.
pub fn get_default_exclude_folders() -> &'static FxHashSet<&'static str> {
    static SET: OnceLock<FxHashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| {
        let mut s = FxHashSet::default();
        s.insert("node_modules");
        s.insert(".git");
        s.insert("dist");
        s.insert("build");
        s.insert("out");
        s.insert("coverage");
        s.insert(".next");
        s.insert(".turbo");
        s.insert(".cache");
        s.insert("*.tsbuildinfo");
        s
    })
}

pub use get_default_exclude_folders as DEFAULT_EXCLUDE_FOLDERS;
