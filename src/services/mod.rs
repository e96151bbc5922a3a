//! Services
//!
//! Business logic behind the commands.

pub mod mission;
pub mod session;
