pub mod config;
pub mod error;
pub mod types;
pub mod validation;

pub use error::{LabError, Result};
pub use types::{ActionKind, Axis, CognitiveFocus, Difficulty, ResourceVector, SessionId, Turn};
