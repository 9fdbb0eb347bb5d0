//! Core ISO handling — directory scanning and loop mounting.
//!
//! Nothing in this module depends on the menu engine.

pub mod iso;
pub mod mount;
