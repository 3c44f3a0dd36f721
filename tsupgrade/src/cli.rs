use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::features::FeatureRule;
use crate::version::TypeScriptVersion;

/// Help text for configuration file options, shown at the bottom of --help.
const CONFIG_HELP: &str = "\
CONFIGURATION FILE (.tsupgrade.toml):
  Create this file in your project root to set defaults.
  The same keys are read from the \"tsupgrade\" key of package.json.

  [tsupgrade]
  target = \"3.8\"              # Newest TypeScript version the output may use
  max_passes = 64             # Give up on a file after N passes
  include_tsx = false         # Also upgrade .tsx files
  include_declarations = false # Also upgrade .d.ts files

  # Path filters
  exclude_folders = [\"generated\"]
  include_folders = [\"dist\"]  # Force-include these

  [tsupgrade.rules]
  nullish-coalesce = \"disabled\"  # or \"enabled\"
";

/// Options for output formatting and verbosity.
#[derive(Args, Debug, Default, Clone)]
#[allow(clippy::struct_excessive_bools)] // CLI flags are legitimately booleans
pub struct OutputOptions {
    /// Output raw JSON.
    #[arg(long)]
    pub json: bool,

    /// Enable verbose output for debugging (per-pass tracing on stderr).
    #[arg(short, long)]
    pub verbose: bool,

    /// Report what would change without writing any file.
    #[arg(long)]
    pub dry_run: bool,

    /// Exit with code 1 if any file would change. Implies --dry-run.
    #[arg(long)]
    pub check: bool,
}

/// Rule selection on top of the target version.
#[derive(Args, Debug, Default, Clone)]
pub struct RuleOptions {
    /// Newest TypeScript version the output may rely on (e.g. 3.7).
    #[arg(short, long)]
    pub target: Option<TypeScriptVersion>,

    /// Force a rule on even if the target predates it (repeatable).
    #[arg(long, value_name = "RULE")]
    pub enable: Vec<FeatureRule>,

    /// Force a rule off (repeatable).
    #[arg(long, value_name = "RULE")]
    pub disable: Vec<FeatureRule>,

    /// Give up on a file after N passes.
    #[arg(long, value_name = "N")]
    pub max_passes: Option<usize>,
}

/// Command line interface configuration using clap.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(after_help = CONFIG_HELP)]
pub struct Cli {
    #[command(subcommand)]
    /// The subcommand to execute.
    pub command: Option<Commands>,

    /// Files or directories to upgrade. Defaults to the current directory.
    pub paths: Vec<PathBuf>,

    /// Read a single source from stdin and write the result to stdout.
    #[arg(long, conflicts_with = "paths")]
    pub stdin: bool,

    /// Rule selection options.
    #[command(flatten)]
    pub rules: RuleOptions,

    /// Output formatting options.
    #[command(flatten)]
    pub output: OutputOptions,

    /// Folders to exclude from discovery.
    #[arg(long, alias = "exclude-folder")]
    pub exclude_folders: Vec<String>,

    /// Folders to force-include (overrides default exclusions).
    #[arg(long, alias = "include-folder")]
    pub include_folders: Vec<String>,

    /// Also upgrade `.tsx` files.
    #[arg(long)]
    pub include_tsx: bool,

    /// Also upgrade `.d.ts` declaration files.
    #[arg(long)]
    pub include_declarations: bool,
}

#[derive(Subcommand, Debug)]
/// Auxiliary subcommands.
pub enum Commands {
    /// Print the oldest TypeScript version a file can be compiled with, judging
    /// by the idioms it already uses.
    Assume {
        /// File to inspect.
        file: PathBuf,

        /// Output JSON.
        #[arg(long, short = 'j')]
        json: bool,
    },
    /// List the known rules and the version each needs.
    Rules {
        /// Output JSON.
        #[arg(long, short = 'j')]
        json: bool,
    },
}
