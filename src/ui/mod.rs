//! Line-oriented terminal menu.
//!
//! The engine knows nothing about ISOs; callers register items and
//! continuations and feed it any `BufRead`/`Write` pair.

pub mod frame;
pub mod menu;
pub mod status;

use thiserror::Error;

/// Failures that end [`menu::Menu::run`].
#[derive(Debug, Error)]
pub enum MenuError {
    /// The input stream failed for a reason other than running dry.
    #[error("failed to read input")]
    Input(#[source] std::io::Error),
    /// A frame could not be written to the output stream.
    #[error("failed to write frame")]
    Render(#[source] std::io::Error),
}
