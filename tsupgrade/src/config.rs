use rustc_hash::FxHashMap;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::constants::{CONFIG_FILENAME, PACKAGE_JSON, PACKAGE_JSON_KEY};
use crate::features::{FeatureAction, FeatureRule, Options};
use crate::utils::DiscoveryOptions;
use crate::version::TypeScriptVersion;

#[derive(Debug, Deserialize, Default, Clone)]
/// Top-level configuration struct.
pub struct Config {
    #[serde(default)]
    /// The main configuration section for tsupgrade.
    pub tsupgrade: TsUpgradeConfig,
    /// The path to the configuration file this was loaded from.
    /// Set during `load_from_path`, `None` if using defaults or programmatic config.
    #[serde(skip)]
    pub config_file_path: Option<std::path::PathBuf>,
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
/// Configuration options for tsupgrade.
pub struct TsUpgradeConfig {
    /// Target TypeScript version, e.g. `"3.7"`.
    pub target: Option<TypeScriptVersion>,
    /// Upper bound on fixed-point passes per file.
    pub max_passes: Option<usize>,
    /// List of folders to exclude.
    pub exclude_folders: Option<Vec<String>>,
    /// List of folders to include.
    pub include_folders: Option<Vec<String>>,
    /// Whether to upgrade `.tsx` files.
    pub include_tsx: Option<bool>,
    /// Whether to upgrade `.d.ts` declaration files.
    pub include_declarations: Option<bool>,
    /// Per-rule overrides, keyed by rule id.
    pub rules: Option<FxHashMap<FeatureRule, FeatureAction>>,
}

impl TsUpgradeConfig {
    /// Upgrade options described by this section.
    #[must_use]
    pub fn options(&self) -> Options {
        let mut options = Options::default();
        if let Some(max_passes) = self.max_passes {
            options.max_passes = max_passes;
        }
        if let Some(rules) = &self.rules {
            options.rules.extend(rules.iter().map(|(r, a)| (*r, *a)));
        }
        options
    }

    /// File discovery options described by this section.
    #[must_use]
    pub fn discovery(&self) -> DiscoveryOptions {
        DiscoveryOptions {
            exclude: self.exclude_folders.clone().unwrap_or_default(),
            include: self.include_folders.clone().unwrap_or_default(),
            include_tsx: self.include_tsx.unwrap_or(false),
            include_declarations: self.include_declarations.unwrap_or(false),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
struct PackageJson {
    #[serde(rename = "tsupgrade")]
    section: Option<TsUpgradeConfig>,
}

impl Config {
    /// Loads configuration from default locations (.tsupgrade.toml or package.json in current dir).
    #[must_use]
    pub fn load() -> Self {
        Self::load_from_path(Path::new("."))
    }

    /// Loads configuration starting from a specific path and traversing up.
    ///
    /// In each directory `.tsupgrade.toml` is tried first, then the
    /// `"tsupgrade"` key of `package.json`. A file that exists but does not
    /// parse is reported and skipped.
    #[must_use]
    pub fn load_from_path(path: &Path) -> Self {
        let mut current = path.to_path_buf();
        if current.is_file() {
            current.pop();
        }

        loop {
            // 1. Try CONFIG_FILENAME
            let tsupgrade_toml = current.join(CONFIG_FILENAME);
            if tsupgrade_toml.exists() {
                if let Ok(content) = fs::read_to_string(&tsupgrade_toml) {
                    match toml::from_str::<Config>(&content) {
                        Ok(mut config) => {
                            config.config_file_path = Some(tsupgrade_toml);
                            return config;
                        }
                        Err(e) => {
                            tracing::warn!(file = %tsupgrade_toml.display(), error = %e, "ignoring invalid config");
                        }
                    }
                }
            }

            // 2. Try PACKAGE_JSON
            let package_json = current.join(PACKAGE_JSON);
            if package_json.exists() {
                if let Ok(content) = fs::read_to_string(&package_json) {
                    match serde_json::from_str::<PackageJson>(&content) {
                        Ok(PackageJson {
                            section: Some(section),
                        }) => {
                            return Config {
                                tsupgrade: section,
                                config_file_path: Some(package_json),
                            };
                        }
                        Ok(_) => {}
                        Err(e) => {
                            tracing::warn!(
                                file = %package_json.display(),
                                key = PACKAGE_JSON_KEY,
                                error = %e,
                                "ignoring invalid config"
                            );
                        }
                    }
                }
            }

            if !current.pop() {
                break;
            }
        }

        Config::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_parse_full_section() {
        let content = r#"
[tsupgrade]
target = "3.7"
max_passes = 8
exclude_folders = ["generated"]
include_tsx = true

[tsupgrade.rules]
nullish-coalesce = "disabled"
export-as-namespace = "enabled"
"#;
        let config = toml::from_str::<Config>(content).unwrap();
        let section = &config.tsupgrade;
        assert_eq!(section.target, Some(TypeScriptVersion::V3_7));

        let options = section.options();
        assert_eq!(options.max_passes, 8);
        assert_eq!(
            options.rules.get(&FeatureRule::NullishCoalesce),
            Some(&FeatureAction::Disabled)
        );
        assert_eq!(
            options.rules.get(&FeatureRule::ExportAsNamespace),
            Some(&FeatureAction::Enabled)
        );

        let discovery = section.discovery();
        assert_eq!(discovery.exclude, vec!["generated".to_owned()]);
        assert!(discovery.include_tsx);
        assert!(!discovery.include_declarations);
    }

    #[test]
    fn test_unknown_rule_rejected() {
        let content = "[tsupgrade.rules]\nno-such-rule = \"enabled\"\n";
        assert!(toml::from_str::<Config>(content).is_err());
    }

    #[test]
    fn test_load_from_path_no_config() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from_path(dir.path());
        assert!(config.tsupgrade.target.is_none());
        assert!(config.config_file_path.is_none());
    }

    #[test]
    fn test_load_from_path_tsupgrade_toml() {
        let dir = TempDir::new().unwrap();
        let mut file = std::fs::File::create(dir.path().join(".tsupgrade.toml")).unwrap();
        writeln!(
            file,
            r#"[tsupgrade]
target = "3.4"
"#
        )
        .unwrap();

        let config = Config::load_from_path(dir.path());
        assert_eq!(config.tsupgrade.target, Some(TypeScriptVersion::V3_4));
        assert!(config.config_file_path.is_some());
    }

    #[test]
    fn test_load_from_path_package_json() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("package.json"),
            r#"{ "name": "app", "tsupgrade": { "target": "3.8", "include_declarations": true } }"#,
        )
        .unwrap();

        let config = Config::load_from_path(dir.path());
        assert_eq!(config.tsupgrade.target, Some(TypeScriptVersion::V3_8));
        assert_eq!(config.tsupgrade.include_declarations, Some(true));
    }

    #[test]
    fn test_package_json_without_section_skipped() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("packages").join("app");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join("package.json"), r#"{ "name": "app" }"#).unwrap();
        std::fs::write(
            dir.path().join(".tsupgrade.toml"),
            "[tsupgrade]\nmax_passes = 3\n",
        )
        .unwrap();

        let config = Config::load_from_path(&nested);
        assert_eq!(config.tsupgrade.max_passes, Some(3));
    }

    #[test]
    fn test_load_from_file_path() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(".tsupgrade.toml"), "[tsupgrade]\ninclude_tsx = true\n").unwrap();
        let ts_file = dir.path().join("index.ts");
        std::fs::write(&ts_file, "export {};").unwrap();

        let config = Config::load_from_path(&ts_file);
        assert_eq!(config.tsupgrade.include_tsx, Some(true));
    }
}
