//! Feature gate: which idioms are rewritten for a given target version.

use crate::version::TypeScriptVersion;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An upgradeable idiom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeatureRule {
    /// `x as "lit"` → `x as const`
    ConstAssertion,
    /// `a && a.b` → `a?.b`
    OptionalChains,
    /// `a != null ? a : b` → `a ?? b`
    NullishCoalesce,
    /// `import * as A from "m"; export { A }` → `export * as A from "m"`
    ExportAsNamespace,
}

impl FeatureRule {
    /// Every rule, in catalog order.
    pub const ALL: [Self; 4] = [
        Self::ConstAssertion,
        Self::OptionalChains,
        Self::NullishCoalesce,
        Self::ExportAsNamespace,
    ];

    /// Stable identifier used in configuration files and on the command line.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::ConstAssertion => "const-assertion",
            Self::OptionalChains => "optional-chains",
            Self::NullishCoalesce => "nullish-coalesce",
            Self::ExportAsNamespace => "export-as-namespace",
        }
    }

    /// First TypeScript release supporting the rewritten form.
    #[must_use]
    pub const fn since(self) -> TypeScriptVersion {
        match self {
            Self::ConstAssertion => TypeScriptVersion::V3_4,
            Self::OptionalChains | Self::NullishCoalesce => TypeScriptVersion::V3_7,
            Self::ExportAsNamespace => TypeScriptVersion::V3_8,
        }
    }

    /// One-line description for `tsupgrade rules`.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::ConstAssertion => "literal type assertions become `as const`",
            Self::OptionalChains => "guarded access chains become `?.` chains",
            Self::NullishCoalesce => "null/undefined guard ternaries become `??`",
            Self::ExportAsNamespace => "namespace import + named export become `export * as ns`",
        }
    }
}

impl fmt::Display for FeatureRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Error returned for an unrecognised rule id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown rule `{0}`")]
pub struct UnknownRule(pub String);

impl FromStr for FeatureRule {
    type Err = UnknownRule;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|rule| rule.id().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownRule(s.to_owned()))
    }
}

/// Explicit per-rule override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureAction {
    /// Force the rule on, even if the target version predates it.
    Enabled,
    /// Force the rule off.
    Disabled,
}

/// Caller options for an upgrade run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Per-rule overrides; rules not listed follow the target version.
    pub rules: FxHashMap<FeatureRule, FeatureAction>,
    /// Upper bound on fixed-point passes per file.
    pub max_passes: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            rules: FxHashMap::default(),
            max_passes: crate::constants::DEFAULT_MAX_PASSES,
        }
    }
}

impl Options {
    /// Options with every rule explicitly disabled.
    #[must_use]
    pub fn all_disabled() -> Self {
        let mut options = Self::default();
        for rule in FeatureRule::ALL {
            options.rules.insert(rule, FeatureAction::Disabled);
        }
        options
    }

    /// Add or replace an override.
    #[must_use]
    pub fn with_rule(mut self, rule: FeatureRule, action: FeatureAction) -> Self {
        self.rules.insert(rule, action);
        self
    }
}

/// The resolved, read-only set of enabled rules for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeatureSet {
    enabled: [bool; FeatureRule::ALL.len()],
}

impl FeatureSet {
    /// Resolve the target version and overrides into an enabled set.
    ///
    /// Every rule introduced at or before `target` is on unless overridden;
    /// an override always wins over the version-derived default.
    #[must_use]
    pub fn resolve(target: TypeScriptVersion, options: &Options) -> Self {
        let mut set = Self::default();
        for (slot, rule) in FeatureRule::ALL.iter().enumerate() {
            set.enabled[slot] = match options.rules.get(rule) {
                Some(FeatureAction::Enabled) => true,
                Some(FeatureAction::Disabled) => false,
                None => rule.since() <= target,
            };
        }
        set
    }

    /// Whether `rule` is enabled.
    #[must_use]
    pub fn is_enabled(&self, rule: FeatureRule) -> bool {
        FeatureRule::ALL
            .iter()
            .position(|r| *r == rule)
            .is_some_and(|slot| self.enabled[slot])
    }

    /// Enabled rules in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = FeatureRule> + '_ {
        FeatureRule::ALL
            .into_iter()
            .filter(|rule| self.is_enabled(*rule))
    }

    /// Whether no rule is enabled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.enabled.iter().any(|on| *on)
    }
}
