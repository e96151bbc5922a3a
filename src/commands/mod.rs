//! Commands
//!
//! Entry points used by the CLI. Every command returns a
//! `CommandResponse` so callers can print it as JSON or render it.

pub mod mission;
pub mod settings;

pub use mission::*;
pub use settings::*;
