//! Bias analysis: grading estimates and explaining the gap

pub mod analyzer;
pub mod pyramid;

pub use analyzer::{
    analyze, analyze_exponential, analyze_with_context, BiasAnalysis, BiasDirection,
    EstimateContext, Severity,
};
pub use pyramid::{advice_for, Pyramid};
