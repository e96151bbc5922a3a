//! Storage Layer
//!
//! Persistent settings in a JSON file under the user's home directory.

pub mod config;

pub use config::*;
