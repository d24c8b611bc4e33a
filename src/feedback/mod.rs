//! Turn feedback: observations, pattern notes, reveals and lessons

pub mod generator;

pub use generator::{generate, key_lesson, Feedback, FeedbackInput};
