//! The menu engine: keyed items, status lines, a content area, and the
//! read → render → dispatch loop.
//!
//! Multi-step interactions are built from continuations.  An action may
//! return an [`InputHandler`]; while one is installed every input line goes
//! to it instead of to keyed dispatch, and whatever it returns replaces it.
//! Returning `None` hands control back to the item list.
//!
//! Quit tokens (`q`, `quit`, `exit`) are checked before anything else, so a
//! continuation never receives them as data.

use std::collections::HashMap;
use std::fmt;
use std::io::{self, BufRead, Write};
use std::rc::Rc;

use tracing::{debug, warn};

use super::frame;
use super::status::StatusLines;
use super::MenuError;

const DEFAULT_TITLE: &str = "Menu";
const QUIT_TOKENS: &[&str] = &["q", "quit", "exit"];

/// Outcome of an action or continuation: the next continuation, if any.
pub type Step = anyhow::Result<Option<InputHandler>>;

/// Behaviour bound to a menu key.  Shared so the same action can run on
/// every selection.
pub type Action = Rc<dyn Fn(&mut Menu) -> Step>;

/// A one-shot continuation that consumes the next input line.
pub struct InputHandler(Box<dyn FnOnce(&mut Menu, &str) -> Step>);

impl InputHandler {
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce(&mut Menu, &str) -> Step + 'static,
    {
        Self(Box::new(f))
    }

    fn call(self, menu: &mut Menu, input: &str) -> Step {
        (self.0)(menu, input)
    }
}

impl fmt::Debug for InputHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("InputHandler")
    }
}

// ───────────────────────────────────────── items ─────────────

/// A selectable entry rendered as `[key] label`.
#[derive(Clone)]
pub struct MenuItem {
    pub key: String,
    pub label: String,
    pub action: Option<Action>,
}

impl MenuItem {
    /// An item with no action; selecting it does nothing until one is set.
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            action: None,
        }
    }

    pub fn action<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut Menu) -> Step + 'static,
    {
        self.action = Some(Rc::new(f));
        self
    }
}

impl fmt::Debug for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuItem")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("action", &self.action.is_some())
            .finish()
    }
}

/// Dispatch mode of the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Lines are matched against item keys.
    Idle,
    /// Lines go to the installed continuation.
    Interacting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

// ───────────────────────────────────────── menu ──────────────

pub struct Menu {
    title: String,
    items: Vec<MenuItem>,
    /// Normalised key → index into `items`.
    index: HashMap<String, usize>,
    status: StatusLines,
    content: String,
    handler: Option<InputHandler>,
}

impl Menu {
    /// Create an empty menu.  A blank title falls back to `"Menu"`.
    pub fn new(title: impl Into<String>) -> Self {
        let mut title = title.into();
        if title.trim().is_empty() {
            title = DEFAULT_TITLE.to_owned();
        }
        Self {
            title,
            items: Vec::new(),
            index: HashMap::new(),
            status: StatusLines::default(),
            content: String::new(),
            handler: None,
        }
    }

    // ── registration ───────────────────────────────────────────

    /// Register `item` under its trimmed, lower-cased key.
    ///
    /// Re-registering a key replaces the item but keeps its original
    /// position.  Items with a blank key are ignored.
    pub fn add_item(&mut self, mut item: MenuItem) {
        let key = normalize_key(&item.key);
        if key.is_empty() {
            return;
        }
        item.key = key.clone();

        match self.index.get(&key) {
            Some(&slot) => self.items[slot] = item,
            None => {
                self.index.insert(key, self.items.len());
                self.items.push(item);
            }
        }
    }

    /// Set or update a status line; an empty `value` removes it.
    pub fn set_status(&mut self, key: &str, value: impl Into<String>) {
        self.status.set(key, value);
    }

    pub fn set_content(&mut self, text: impl Into<String>) {
        self.content = text.into();
    }

    /// Append `text` as a new segment, starting it on its own line.
    pub fn append_content(&mut self, text: &str) {
        if !self.content.is_empty() && !self.content.ends_with('\n') {
            self.content.push('\n');
        }
        self.content.push_str(text);
    }

    // ── accessors ──────────────────────────────────────────────

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn status(&self) -> &StatusLines {
        &self.status
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn mode(&self) -> Mode {
        if self.handler.is_some() {
            Mode::Interacting
        } else {
            Mode::Idle
        }
    }

    // ── loop ───────────────────────────────────────────────────

    /// Render, read a line, dispatch it; repeat until a quit token or the
    /// end of `input`.
    ///
    /// Only I/O failures on the streams are returned.  Errors from actions
    /// and continuations are shown in the content area instead.
    pub fn run<R: BufRead, W: Write>(
        &mut self,
        mut input: R,
        mut output: W,
    ) -> Result<(), MenuError> {
        let mut buf = Vec::new();
        loop {
            frame::render(&mut output, self).map_err(MenuError::Render)?;

            buf.clear();
            match input.read_until(b'\n', &mut buf) {
                Ok(0) => {
                    debug!("input exhausted, leaving menu");
                    return Ok(());
                }
                // An unterminated last line is dropped, not dispatched.
                Ok(_) if buf.last() != Some(&b'\n') => {
                    debug!("input ended mid-line, leaving menu");
                    return Ok(());
                }
                Ok(_) => {}
                Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => {
                    debug!("input closed mid-line, leaving menu");
                    return Ok(());
                }
                Err(err) => return Err(MenuError::Input(err)),
            }

            // Undecodable bytes are user input, not a stream failure.
            let line = String::from_utf8_lossy(&buf);
            if self.handle_line(&line) == Flow::Quit {
                frame::goodbye(&mut output).map_err(MenuError::Render)?;
                return Ok(());
            }
        }
    }

    /// Route one raw line to exactly one of: quit, the continuation, or
    /// keyed dispatch.
    fn handle_line(&mut self, raw: &str) -> Flow {
        let input = raw.trim();
        let lowered = input.to_lowercase();

        if QUIT_TOKENS.contains(&lowered.as_str()) {
            debug!(token = %lowered, "quit requested");
            return Flow::Quit;
        }

        if let Some(handler) = self.handler.take() {
            let step = handler.call(self, input);
            self.settle(step);
            return Flow::Continue;
        }

        if input.is_empty() {
            return Flow::Continue;
        }

        let Some(&slot) = self.index.get(&lowered) else {
            self.content = format!("Unknown choice: {input:?}");
            return Flow::Continue;
        };

        let Some(action) = self.items[slot].action.clone() else {
            debug!(key = %lowered, "item has no action");
            return Flow::Continue;
        };

        debug!(key = %lowered, "dispatching action");
        let step = action(self);
        self.settle(step);
        Flow::Continue
    }

    /// Install the continuation a callback returned, or render its error.
    fn settle(&mut self, step: Step) {
        match step {
            Ok(next) => {
                if next.is_some() {
                    debug!("continuation installed");
                }
                self.handler = next;
            }
            Err(err) => {
                warn!("menu callback failed: {err:#}");
                self.content = format!("Error: {err:#}");
                self.handler = None;
            }
        }
    }
}

impl fmt::Debug for Menu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Menu")
            .field("title", &self.title)
            .field("items", &self.items)
            .field("status", &self.status)
            .field("content", &self.content)
            .field("mode", &self.mode())
            .finish()
    }
}

fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase()
}
