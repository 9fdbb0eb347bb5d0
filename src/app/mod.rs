//! Application front-ends over the ISO manager — one-shot commands and the
//! interactive menu.

pub mod cli;
pub mod menu;
