//! List ISO images and loop-mount one for chroot preparation.
//!
//! Run `iso2chroot list|select <n>|create <n>` for one-shot commands.
//! Run with `--experimental-tui` for the interactive line-driven menu.

mod app;
mod config;
mod core;
mod ui;

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use crate::app::cli::{run_command, Command};
use crate::config::AppConfig;
use crate::core::iso::IsoManager;

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(
    name = env!("CARGO_PKG_NAME"),
    about = "List ISO images and mount one for chroot preparation",
    after_help = "Examples:\n    iso2chroot list\n    iso2chroot select 2\n    iso2chroot create 1\n    iso2chroot --dir /path/to/isos --src /tmp/build-root create 2"
)]
struct Cli {
    /// Directory containing ISO images.
    #[arg(long)]
    dir: Option<PathBuf>,

    /// Directory to mount the selected ISO into.
    #[arg(long)]
    src: Option<PathBuf>,

    /// Launch the experimental interactive menu.
    #[arg(long = "experimental-tui")]
    experimental_tui: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

// ───────────────────────────────────────── main ─────────────

fn main() -> Result<ExitCode> {
    // Only emits anything when RUST_LOG is set.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr) // never pollute stdout
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load().with_overrides(cli.dir, cli.src);
    tracing::debug!(?config, "configuration resolved");

    // ── interactive menu ──────────────────────────────────────
    if cli.experimental_tui {
        if cli.command.is_some() {
            eprintln!("iso2chroot: experimental TUI cannot be combined with CLI commands.");
            return Ok(ExitCode::from(2));
        }
        eprintln!("iso2chroot: launching experimental TUI (interface and behavior may change).");
        let code = menu_exit_code(app::menu::launch(&config), io::stderr().lock());
        return Ok(ExitCode::from(code));
    }

    // ── one-shot command ──────────────────────────────────────
    let command = cli.command.unwrap_or(Command::List);
    let mut manager = IsoManager::new(&config.iso_dir);
    let code = run_command(
        &mut manager,
        &command,
        &config.mount_dir,
        io::stdin().lock(),
        io::stdout().lock(),
        io::stderr().lock(),
    );
    Ok(ExitCode::from(code))
}

/// A failed menu session exits 1 with the error chain on stderr.
fn menu_exit_code(result: Result<()>, mut stderr: impl Write) -> u8 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            writeln!(stderr, "iso2chroot: {err:#}").ok();
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn no_subcommand_means_list() {
        let cli = Cli::try_parse_from(["iso2chroot"]).unwrap();
        assert_eq!(cli.command, None);
        assert!(!cli.experimental_tui);
    }

    #[test]
    fn flags_and_subcommand() {
        let cli = Cli::try_parse_from([
            "iso2chroot", "--dir", "/isos", "--src", "/tmp/root", "create", "2",
        ])
        .unwrap();
        assert_eq!(cli.dir, Some(PathBuf::from("/isos")));
        assert_eq!(cli.src, Some(PathBuf::from("/tmp/root")));
        assert_eq!(cli.command, Some(Command::Create { index: 2 }));
    }

    #[test]
    fn select_requires_index() {
        let err = Cli::try_parse_from(["iso2chroot", "select"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn non_numeric_index_is_rejected() {
        let err = Cli::try_parse_from(["iso2chroot", "select", "two"]).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn menu_failure_exits_one_with_message() {
        let mut err = Vec::new();
        let result = Err(anyhow::anyhow!("broken pipe").context("render menu"));
        assert_eq!(menu_exit_code(result, &mut err), 1);
        assert_eq!(String::from_utf8(err).unwrap(), "iso2chroot: render menu: broken pipe\n");

        let mut err = Vec::new();
        assert_eq!(menu_exit_code(Ok(()), &mut err), 0);
        assert!(err.is_empty());
    }

    #[test]
    fn unknown_command_is_rejected() {
        let err = Cli::try_parse_from(["iso2chroot", "bogus"]).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
