//! Data Models
//!
//! Serializable types shared by commands, services and views.

pub mod response;
pub mod session;
pub mod settings;

pub use response::*;
pub use session::*;
pub use settings::*;
