//! Frame rendering — one full redraw per loop iteration.
//!
//! A frame is plain text: clear-screen escape, title with an underline,
//! status values, the item list, then the content area and a prompt.

use std::io::{self, Write};

use crossterm::{
    cursor::MoveTo,
    queue,
    terminal::{Clear, ClearType},
};

use super::menu::Menu;

/// Platform line terminator used for every rendered line.
pub const LINE_END: &str = if cfg!(windows) { "\r\n" } else { "\n" };

const PROMPT: &str = "> ";
const QUIT_LINE: &str = "[q] Quit";

/// Write a complete frame for `menu` and flush, leaving the cursor after
/// the prompt marker.
pub fn render<W: Write>(out: &mut W, menu: &Menu) -> io::Result<()> {
    clear_screen(out)?;

    let title = menu.title();
    line(out, title)?;
    line(out, &"-".repeat(title.chars().count()))?;

    for value in menu.status().values() {
        line(out, value)?;
    }
    if !menu.status().is_empty() {
        line(out, "")?;
    }

    for item in menu.items() {
        line(out, &format!("[{}] {}", item.key, item.label))?;
    }
    line(out, QUIT_LINE)?;

    line(out, "")?;
    line(out, "Content:")?;
    line(out, menu.content())?;
    line(out, "")?;
    write!(out, "{PROMPT}")?;
    out.flush()
}

/// Clear the screen and print the farewell line.
pub fn goodbye<W: Write>(out: &mut W) -> io::Result<()> {
    clear_screen(out)?;
    line(out, "Goodbye.")?;
    out.flush()
}

fn clear_screen<W: Write>(out: &mut W) -> io::Result<()> {
    queue!(out, Clear(ClearType::All), MoveTo(0, 0))
}

fn line<W: Write>(out: &mut W, text: &str) -> io::Result<()> {
    write!(out, "{text}{LINE_END}")
}
