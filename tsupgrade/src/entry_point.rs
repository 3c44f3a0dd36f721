use crate::cli::{Cli, Commands};
use crate::commands::RunMode;
use crate::config::Config;
use crate::features::{FeatureAction, Options};
use crate::upgrade::Upgrader;
use crate::utils::DiscoveryOptions;
use anyhow::Result;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing on stderr.
///
/// `verbose` turns on `debug` for this crate; otherwise `RUST_LOG` is honoured
/// when set, and warnings are always shown. Safe to call multiple times.
pub fn init_tracing(verbose: bool) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        let filter = if verbose {
            EnvFilter::new("tsupgrade=debug")
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            EnvFilter::new("tsupgrade=warn")
        };
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_level(true),
            )
            .with(filter)
            .init();
    });
}

/// Runs tsupgrade with the given arguments.
///
/// # Errors
///
/// Returns an error if argument parsing fails, or if the command execution fails.
pub fn run_with_args(args: Vec<String>) -> Result<i32> {
    run_with_args_to(args, &mut std::io::stdout())
}

/// Run tsupgrade with the given arguments, writing output to the specified writer.
///
/// This is the testable version of `run_with_args` that allows output capture.
///
/// # Errors
///
/// Returns an error if argument parsing fails, or if the command execution fails.
pub fn run_with_args_to<W: std::io::Write>(args: Vec<String>, writer: &mut W) -> Result<i32> {
    let mut program_args = vec!["tsupgrade".to_owned()];
    program_args.extend(args);
    let cli_var = match Cli::try_parse_from(program_args) {
        Ok(c) => c,
        Err(e) => match e.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                write!(writer, "{e}")?;
                writer.flush()?;
                return Ok(0);
            }
            _ => {
                eprint!("{e}");
                return Ok(2);
            }
        },
    };

    init_tracing(cli_var.output.verbose);

    match cli_var.command {
        Some(Commands::Assume { file, json }) => {
            if !file.exists() {
                eprintln!("Error: The file '{}' does not exist.", file.display());
                return Ok(1);
            }
            return crate::commands::run_assume(&file, json, writer);
        }
        Some(Commands::Rules { json }) => return crate::commands::run_rules(json, writer),
        None => {}
    }

    // Load config from the first path or current directory
    let config_path = cli_var
        .paths
        .first()
        .map_or(Path::new("."), PathBuf::as_path);
    let config = Config::load_from_path(config_path);
    if let Some(file) = &config.config_file_path {
        tracing::debug!(file = %file.display(), "loaded config");
    }

    let upgrader = build_upgrader(&cli_var, &config);
    tracing::debug!(
        target = %upgrader.target,
        rules = ?upgrader.features().iter().collect::<Vec<_>>(),
        threads = rayon::current_num_threads(),
        "resolved run"
    );

    if cli_var.stdin {
        return crate::commands::run_stdin(
            &upgrader,
            cli_var.output.check,
            std::io::stdin().lock(),
            writer,
        );
    }

    for path in &cli_var.paths {
        if !path.exists() {
            eprintln!(
                "Error: The file or directory '{}' does not exist.",
                path.display()
            );
            return Ok(1);
        }
    }
    let paths = if cli_var.paths.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        cli_var.paths.clone()
    };

    let mode = RunMode {
        json: cli_var.output.json,
        dry_run: cli_var.output.dry_run,
        check: cli_var.output.check,
        progress: !cli_var.output.verbose,
    };
    crate::commands::run_upgrade(&paths, upgrader, mode, writer)
}

/// CLI flags override config; config overrides built-in defaults.
fn build_upgrader(cli: &Cli, config: &Config) -> Upgrader {
    let section = &config.tsupgrade;
    let target = cli.rules.target.or(section.target).unwrap_or_default();

    let mut options: Options = section.options();
    if let Some(max_passes) = cli.rules.max_passes {
        options.max_passes = max_passes;
    }
    for rule in &cli.rules.enable {
        options.rules.insert(*rule, FeatureAction::Enabled);
    }
    for rule in &cli.rules.disable {
        options.rules.insert(*rule, FeatureAction::Disabled);
    }

    let base = section.discovery();
    let mut exclude = base.exclude;
    exclude.extend(cli.exclude_folders.iter().cloned());
    let mut include = base.include;
    include.extend(cli.include_folders.iter().cloned());
    let discovery = DiscoveryOptions {
        exclude,
        include,
        include_tsx: cli.include_tsx || base.include_tsx,
        include_declarations: cli.include_declarations || base.include_declarations,
    };

    Upgrader::new(target, options).with_discovery(discovery)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{FeatureRule, FeatureSet};
    use crate::version::TypeScriptVersion;

    fn parse(args: &[&str]) -> Cli {
        let mut all = vec!["tsupgrade"];
        all.extend_from_slice(args);
        Cli::try_parse_from(all).unwrap()
    }

    #[test]
    fn test_cli_overrides_config() {
        let config: Config = toml::from_str(
            "[tsupgrade]\ntarget = \"3.4\"\nmax_passes = 5\n[tsupgrade.rules]\nconst-assertion = \"disabled\"\n",
        )
        .unwrap();
        let cli = parse(&["--target", "3.7", "--enable", "const-assertion", "src"]);

        let upgrader = build_upgrader(&cli, &config);
        assert_eq!(upgrader.target, TypeScriptVersion::V3_7);
        assert_eq!(upgrader.options.max_passes, 5);
        let features: &FeatureSet = upgrader.features();
        assert!(features.is_enabled(FeatureRule::ConstAssertion));
        assert!(features.is_enabled(FeatureRule::NullishCoalesce));
        assert!(!features.is_enabled(FeatureRule::ExportAsNamespace));
    }

    #[test]
    fn test_defaults_without_config() {
        let upgrader = build_upgrader(&parse(&[]), &Config::default());
        assert_eq!(upgrader.target, TypeScriptVersion::LATEST);
        assert_eq!(upgrader.features().iter().count(), 4);
    }

    #[test]
    fn test_help_goes_to_writer() {
        let mut out = Vec::new();
        let code = run_with_args_to(vec!["--help".to_owned()], &mut out).unwrap();
        assert_eq!(code, 0);
        assert!(String::from_utf8(out).unwrap().contains("CONFIGURATION FILE"));
    }

    #[test]
    fn test_unknown_rule_is_usage_error() {
        let mut out = Vec::new();
        let code = run_with_args_to(vec!["--disable".to_owned(), "bogus".to_owned()], &mut out).unwrap();
        assert_eq!(code, 2);
    }
}
