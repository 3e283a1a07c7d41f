//! CLI surface (§6): settings-location overrides and startup-behavior flags.
//!
//! Grounded on the teacher's `clap`-derive `Cli` in `src/cli.rs`, but this
//! crate has no subcommands of its own — only the flat override flags §4.5
//! and §6 enumerate.

use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser, Default)]
#[command(name = "viloxterm", about = "ViloxTerm settings overrides", long_about = None)]
pub struct CliOverrides {
    /// Use a custom settings directory.
    #[arg(long, value_name = "PATH")]
    pub settings_dir: Option<PathBuf>,

    /// Use a specific settings file (wins over --settings-dir).
    #[arg(long, value_name = "PATH")]
    pub settings_file: Option<PathBuf>,

    /// Store settings in an app-root settings/ directory.
    #[arg(long)]
    pub portable: bool,

    /// Use a throwaway temp directory, deleted on exit.
    #[arg(long)]
    pub temp_settings: bool,

    /// Clear all settings before start.
    #[arg(long)]
    pub reset_settings: bool,

    /// Disable confirmation prompts.
    #[arg(long)]
    pub no_confirm: bool,

    /// Enable test mode; implies --no-confirm.
    #[arg(long)]
    pub test_mode: bool,

    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,

    /// Enable development-only behaviors.
    #[arg(long)]
    pub dev: bool,
}

/// Parse CLI args, tolerating unknown flags with a warning rather than
/// failing, per §6 ("Unknown flags are ignored with a warning").
pub fn parse_tolerant(args: &[String]) -> CliOverrides {
    let mut recognized = Vec::with_capacity(args.len());
    let mut iter = args.iter().peekable();
    while let Some(arg) = iter.next() {
        if arg.starts_with("--") && !is_known_flag(arg) {
            log::warn!("unknown flag {arg:?} ignored");
            continue;
        }
        recognized.push(arg.clone());
    }
    // clap's generated parser already emits --help text and exits 0 when
    // --help is present among recognized args; everything else maps onto
    // CliOverrides fields directly.
    match CliOverrides::try_parse_from(std::iter::once("viloxterm".to_string()).chain(recognized))
    {
        Ok(overrides) => overrides,
        Err(e) => {
            e.print().ok();
            CliOverrides::default()
        }
    }
}

fn is_known_flag(arg: &str) -> bool {
    const KNOWN: &[&str] = &[
        "--settings-dir",
        "--settings-file",
        "--portable",
        "--temp-settings",
        "--reset-settings",
        "--no-confirm",
        "--test-mode",
        "--debug",
        "--dev",
        "--help",
        "--version",
    ];
    KNOWN.iter().any(|known| arg == *known || arg.starts_with(&format!("{known}=")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_file_flag_parses() {
        let args = vec!["--settings-file".to_string(), "/tmp/b.ini".to_string()];
        let overrides = parse_tolerant(&args);
        assert_eq!(overrides.settings_file, Some(PathBuf::from("/tmp/b.ini")));
    }

    #[test]
    fn unknown_flag_is_dropped_not_fatal() {
        let args = vec!["--bogus-flag".to_string(), "--debug".to_string()];
        let overrides = parse_tolerant(&args);
        assert!(overrides.debug);
    }

    #[test]
    fn test_mode_implies_no_confirm_is_applied_by_caller() {
        let args = vec!["--test-mode".to_string()];
        let overrides = parse_tolerant(&args);
        assert!(overrides.test_mode);
    }
}
