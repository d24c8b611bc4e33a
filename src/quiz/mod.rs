//! Multiple-choice questions about exponential and compound growth

pub mod bank;

pub use bank::{CheckResult, QuestionView, QuizBank, QuizQuestion, QuizTopic};
