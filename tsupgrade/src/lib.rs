//! Core library for the tsupgrade source upgrader.
//!
//! This library rewrites TypeScript sources to newer language idioms
//! (`??`, `?.`, `as const` and `export * as ns`) up to a chosen target
//! version, pass by pass, until no rule has anything left to do.

// Allow common complexity warnings - these are intentional design choices
#![allow(
    clippy::type_complexity,
    clippy::too_many_arguments,
    clippy::similar_names,
    clippy::format_push_string,
    clippy::map_unwrap_or,
    clippy::items_after_statements
)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

/// Module guessing the oldest TypeScript version a source already relies on.
pub mod assume;

/// Module answering type questions about a parsed program.
/// This includes literal, enum and nullability queries plus reference lookup.
pub mod checker;

/// Module defining the command-line interface arguments and structs.
pub mod cli;

/// Module implementing the CLI subcommands.
pub mod commands;

/// Module for loading configuration.
pub mod config;

/// Module containing shared constants.
pub mod constants;

/// Module wrapping the tree-sitter TypeScript grammar.
pub mod cst;

/// Module defining the entry point logic shared by the binary and tests.
pub mod entry_point;

/// Module deciding whether two expressions denote the same value.
pub mod equivalence;

/// Module mapping rules to the versions that introduced them.
pub mod features;

/// Module for applying byte-range edits safely.
pub mod fix;

/// Module for rich CLI output formatting with colored text and spinners.
pub mod output;

/// Module containing the four rewrite rules.
pub mod rules;

/// Module driving passes over single sources and whole projects.
pub mod upgrade;

/// Module containing utility functions.
pub mod utils;

/// Module defining TypeScript versions.
pub mod version;

pub use assume::assume_version;
pub use upgrade::{upgrade, UpgradeError, Upgrader};
