//! Command-line argument definitions for the tsexplode CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments select the source units, the output directory,
//! configuration files and logging verbosity.

use std::str::FromStr;

use clap::Parser;

use tsexplode::config::EnumMode;

/// Command-line arguments for the tsexplode tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Source files or directories to load
    #[arg(
        help = "TypeScript files or directories",
        required_unless_present = "project"
    )]
    pub inputs: Vec<String>,

    /// Directory the output units are written to
    #[arg(short, long)]
    pub out: String,

    /// Path to a tsconfig-style project file (JSON)
    #[arg(short, long)]
    pub project: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Enum member rendering (name, value), overriding the configuration file
    #[arg(long, value_parser = EnumMode::from_str)]
    pub enum_mode: Option<EnumMode>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inputs_and_defaults() {
        let args = Args::try_parse_from(["tsexplode", "--out", "docs", "src", "types.ts"])
            .expect("arguments should parse");

        assert_eq!(args.inputs, vec!["src", "types.ts"]);
        assert_eq!(args.out, "docs");
        assert_eq!(args.project, None);
        assert_eq!(args.enum_mode, None);
        assert_eq!(args.log_level, "info");
    }

    #[test]
    fn test_enum_mode_is_case_insensitive() {
        let args = Args::try_parse_from(["tsexplode", "-o", "docs", "--enum-mode", "NAME", "a.ts"])
            .expect("arguments should parse");
        assert_eq!(args.enum_mode, Some(EnumMode::Name));

        let err = Args::try_parse_from(["tsexplode", "-o", "docs", "--enum-mode", "label", "a.ts"])
            .expect_err("unknown modes are rejected");
        assert!(err.to_string().contains("expected `name` or `value`"));
    }

    #[test]
    fn test_project_replaces_inputs() {
        let args = Args::try_parse_from(["tsexplode", "-o", "docs", "-p", "tsconfig.json"])
            .expect("arguments should parse");

        assert!(args.inputs.is_empty());
        assert_eq!(args.project.as_deref(), Some("tsconfig.json"));
    }

    #[test]
    fn test_sources_and_out_are_required() {
        assert!(Args::try_parse_from(["tsexplode", "--out", "docs"]).is_err());
        assert!(Args::try_parse_from(["tsexplode", "types.ts"]).is_err());
    }
}
