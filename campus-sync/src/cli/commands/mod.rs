//! Subcommand handlers

pub mod check;
pub mod sync;
pub mod validate;
pub mod verify;
