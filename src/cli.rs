//! Command-line interface for termweave.
//!
//! Parses arguments using clap and provides the [`Cli`] struct containing
//! all user-specified options.

use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for termweave.
///
/// # Examples
///
/// ```bash
/// # Apply the layout from ./termweave.yml
/// termweave
///
/// # Use a specific config in a fresh window, without touching anything yet
/// termweave -c work.yml --new-window --dry-run
///
/// # Save the current config as a global profile, then run it anywhere
/// termweave --save-global work
/// termweave -p work
/// ```
#[derive(Parser, Debug)]
#[command(name = "termweave")]
#[command(version)]
#[command(about = "iTerm2 layout orchestrator - build tabs and split panes from YAML config")]
#[command(long_about = "Termweave reconstructs iTerm2 tab and split-pane layouts from YAML.\n\n\
    Describe tabs, pane positions, working directories, and startup commands\n\
    once, then bring the whole workspace up with a single command.")]
pub struct Cli {
    /// Path to the config file.
    ///
    /// Defaults to `termweave.yml` in the current directory.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Open a new window instead of reusing the current one.
    #[arg(short = 'n', long = "new-window")]
    pub new_window: bool,

    /// Global profile to load (see `--list-global`).
    ///
    /// Merged underneath the config file; used alone when the config file
    /// does not exist.
    #[arg(short, long, value_name = "NAME")]
    pub profile: Option<String>,

    /// Create a config interactively instead of applying one.
    #[arg(short, long)]
    pub wizard: bool,

    /// Log what would happen without touching iTerm2.
    #[arg(short, long = "dry-run")]
    pub dry_run: bool,

    /// Log level when RUST_LOG is not set (error, warn, info, debug, trace).
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    pub log_level: String,

    /// Save the config file as a global profile under this name.
    #[arg(long = "save-global", value_name = "NAME")]
    pub save_global: Option<String>,

    /// List saved global profiles.
    #[arg(long = "list-global")]
    pub list_global: bool,

    /// Report which tool integrations are available on this system.
    #[arg(long = "tools-check")]
    pub tools_check: bool,
}

impl Cli {
    /// Config path to load, falling back to the default location.
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(crate::loader::default_config_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_quiet() {
        let cli = Cli::parse_from(["termweave"]);
        assert!(cli.config.is_none());
        assert!(!cli.new_window);
        assert!(!cli.dry_run);
        assert_eq!(cli.log_level, "info");
        assert_eq!(cli.config_path(), PathBuf::from("termweave.yml"));
    }

    #[test]
    fn config_flag_overrides_default_path() {
        let cli = Cli::parse_from(["termweave", "-c", "work.yml"]);
        assert_eq!(cli.config_path(), PathBuf::from("work.yml"));
    }

    #[test]
    fn mode_flags_parse() {
        let cli = Cli::parse_from([
            "termweave",
            "--new-window",
            "--dry-run",
            "-p",
            "work",
            "--save-global",
            "backup",
        ]);
        assert!(cli.new_window);
        assert!(cli.dry_run);
        assert_eq!(cli.profile.as_deref(), Some("work"));
        assert_eq!(cli.save_global.as_deref(), Some("backup"));
    }
}
