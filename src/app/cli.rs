//! One-shot commands: `list`, `select <index>`, `create <index>`.
//!
//! Each command returns a process exit code; diagnostics go to `stderr`
//! prefixed with the binary name, results go to `stdout`.

use std::io::{self, BufRead, Write};
use std::path::Path;

use clap::Subcommand;

use crate::core::iso::{IsoInfo, IsoManager};

const PREFIX: &str = env!("CARGO_PKG_NAME");

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List available ISO images (default).
    List,
    /// Print the ISO identified by its numeric index.
    Select { index: usize },
    /// Mount the ISO for chroot preparation.
    Create { index: usize },
}

/// Run `command` and return the exit code.
pub fn run_command<R, W, E>(
    manager: &mut IsoManager,
    command: &Command,
    mount_dir: &Path,
    stdin: R,
    mut stdout: W,
    mut stderr: E,
) -> u8
where
    R: BufRead,
    W: Write,
    E: Write,
{
    let result = match command {
        Command::List => list(manager, &mut stdout),
        Command::Select { index } => {
            resolve(manager, *index).and_then(|iso| {
                writeln!(stdout, "{}", iso.name)?;
                Ok(())
            })
        }
        Command::Create { index } => create(manager, *index, mount_dir, stdin, &mut stdout),
    };

    match result {
        Ok(()) => 0,
        Err(err) => {
            tracing::debug!("{command:?} failed: {err:#}");
            // Nothing left to report to if stderr itself is gone.
            writeln!(stderr, "{PREFIX}: {err:#}").ok();
            1
        }
    }
}

fn list<W: Write>(manager: &mut IsoManager, stdout: &mut W) -> anyhow::Result<()> {
    let listing = manager.load()?;
    let display = listing.display;
    if display.ends_with('\n') {
        write!(stdout, "{display}")?;
    } else {
        writeln!(stdout, "{display}")?;
    }
    Ok(())
}

/// Load the directory and look up `index`.
fn resolve(manager: &mut IsoManager, index: usize) -> anyhow::Result<IsoInfo> {
    manager.load()?;
    Ok(manager.select(index)?)
}

fn create<R, W>(
    manager: &mut IsoManager,
    index: usize,
    mount_dir: &Path,
    mut stdin: R,
    stdout: &mut W,
) -> anyhow::Result<()>
where
    R: BufRead,
    W: Write,
{
    let iso = resolve(manager, index)?;

    writeln!(
        stdout,
        "{PREFIX} will mount {} into {} using sudo.",
        iso.name,
        mount_dir.display()
    )?;
    writeln!(stdout, "You may be prompted for your sudo password.")?;
    write!(stdout, "Press Enter to continue or type 'n' to cancel: ")?;
    stdout.flush()?;

    let mut response = String::new();
    match stdin.read_line(&mut response) {
        Ok(_) => {}
        Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => {}
        Err(err) => return Err(anyhow::Error::new(err).context("read confirmation")),
    }
    match response.trim().to_lowercase().as_str() {
        "" | "y" | "yes" => {}
        _ => anyhow::bail!("create cancelled."),
    }

    manager.mount(index, mount_dir)?;
    writeln!(stdout, "Mounted {} to {}", iso.name, mount_dir.display())?;
    Ok(())
}
