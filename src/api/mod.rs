//! HTTP shell: response envelope, error mapping and routes

pub mod envelope;
pub mod error;
pub mod routes;

pub use envelope::{Envelope, ErrorBody};
pub use error::{status_for, ApiError};
pub use routes::{create_router, AppState};
