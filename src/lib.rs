//! Bias Lab - interactive scenarios and quizzes about growth and decision biases

pub mod api;
pub mod bias;
pub mod core;
pub mod engine;
pub mod feedback;
pub mod numerics;
pub mod quiz;
pub mod scenarios;
