//! Four-part "pyramid" explanations
//!
//! Conclusion first, then the arguments that support it, concrete examples,
//! and what to do differently next time.

use crate::bias::analyzer::{BiasDirection, EstimateContext, Severity};
use crate::core::types::CognitiveFocus;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pyramid {
    pub core_conclusion: String,
    pub supporting_arguments: Vec<String>,
    pub examples: Vec<String>,
    pub actionable_advice: Vec<String>,
    /// Reprints the conclusion
    pub summary: String,
}

impl Pyramid {
    pub fn new(
        core_conclusion: impl Into<String>,
        supporting_arguments: Vec<String>,
        examples: Vec<String>,
        actionable_advice: Vec<String>,
    ) -> Self {
        let core_conclusion = core_conclusion.into();
        let summary = format!("In short: {}", core_conclusion);
        Self {
            core_conclusion,
            supporting_arguments,
            examples,
            actionable_advice,
            summary,
        }
    }

    /// All four sections are populated
    pub fn is_complete(&self) -> bool {
        !self.core_conclusion.is_empty()
            && !self.supporting_arguments.is_empty()
            && !self.examples.is_empty()
            && !self.actionable_advice.is_empty()
    }

    pub fn for_estimate(
        context: &EstimateContext,
        user: f64,
        actual: f64,
        deviation_percentage: f64,
        severity: Severity,
        direction: BiasDirection,
    ) -> Self {
        let relation = match direction {
            BiasDirection::Underestimate => "below",
            BiasDirection::Overestimate => "above",
        };
        let gap = format!(
            "The estimate of {} was {:.1}% {} the actual value of {} ({} error).",
            fmt_number(user),
            deviation_percentage,
            relation,
            fmt_number(actual),
            severity.as_str()
        );

        match context {
            EstimateContext::General => Self::new(
                gap.clone(),
                vec![
                    gap,
                    "Intuition extrapolates the first few steps in a straight line.".into(),
                    "Growth that feeds on itself leaves that line behind quickly.".into(),
                ],
                exponential_examples(),
                general_advice(),
            ),
            EstimateContext::Exponential { base, power } => {
                let additive = base * power;
                Self::new(
                    format!(
                        "{}^{} is {}, because repeated multiplication outruns repeated addition.",
                        fmt_number(*base),
                        fmt_number(*power),
                        fmt_number(actual)
                    ),
                    vec![
                        gap,
                        format!(
                            "Adding {} a total of {} times gives only {}.",
                            fmt_number(*base),
                            fmt_number(*power),
                            fmt_number(additive)
                        ),
                        "Each step multiplies everything accumulated so far, so the last steps dominate the total.".into(),
                    ],
                    exponential_examples(),
                    general_advice(),
                )
            }
            EstimateContext::Scenario {
                focus,
                action,
                axis,
                amount,
            } => {
                let conclusion = match focus {
                    _ if severity == Severity::Minor => format!(
                        "Scaling {} to {} moved {} about as far as a straight line predicts this time.",
                        action,
                        amount,
                        axis.as_str()
                    ),
                    CognitiveFocus::LinearMisestimation => format!(
                        "Scaling {} to {} did not scale {} in proportion: returns flatten past the saturation point.",
                        action,
                        amount,
                        axis.as_str()
                    ),
                    CognitiveFocus::TimeDelay => format!(
                        "Most of the effect of {} arrives turns later, so judging it by the immediate change of {} misleads.",
                        action,
                        axis.as_str()
                    ),
                    CognitiveFocus::ConfirmationBias => format!(
                        "Repeating {} kept confirming the same view while the outcome on {} told a different story.",
                        action,
                        axis.as_str()
                    ),
                };
                Self::new(
                    conclusion,
                    vec![
                        format!(
                            "A straight-line projection expected {} to change by {}; it changed by {}.",
                            axis.as_str(),
                            fmt_number(user),
                            fmt_number(actual)
                        ),
                        gap,
                        focus_argument(*focus).into(),
                    ],
                    focus_examples(*focus),
                    advice_for(*focus),
                )
            }
        }
    }
}

/// Actionable advice for one cognitive focus
pub fn advice_for(focus: CognitiveFocus) -> Vec<String> {
    let items: &[&str] = match focus {
        CognitiveFocus::LinearMisestimation => &[
            "Add one unit at a time and measure what the last unit bought.",
            "Look for the knee where the curve flattens before committing more budget.",
            "Plan with the marginal return, not the average of the first steps.",
        ],
        CognitiveFocus::TimeDelay => &[
            "Decide how many turns you will wait before judging an action.",
            "Keep a log of actions whose effects are still pending.",
            "Do not abandon a slow investment only because the first turn looked small.",
        ],
        CognitiveFocus::ConfirmationBias => &[
            "Before acting, write down what result would prove you wrong.",
            "Spend part of every budget on options that test a different view.",
            "Weigh evidence by quality, not by how well it fits what you already believe.",
        ],
    };
    items.iter().map(|s| s.to_string()).collect()
}

fn general_advice() -> Vec<String> {
    vec![
        "When something grows by a percentage, compute it step by step instead of guessing.".into(),
        "Use the rule of 72 to estimate doubling times quickly.".into(),
        "Distrust estimates that scale the first step by the number of steps.".into(),
    ]
}

fn exponential_examples() -> Vec<String> {
    vec![
        "Rabbits that multiply by 5 each year grow from 10 to over 488 million in 11 years.".into(),
        "One grain of rice doubled on each of 64 chessboard squares exceeds world harvests.".into(),
        "100,000 at 8% a year becomes about 1,006,266 after 30 years, not 340,000.".into(),
    ]
}

fn focus_argument(focus: CognitiveFocus) -> &'static str {
    match focus {
        CognitiveFocus::LinearMisestimation => {
            "Each extra unit adds less than the one before once capacity saturates."
        }
        CognitiveFocus::TimeDelay => {
            "Delayed effects are invisible at decision time, so early feedback understates them."
        }
        CognitiveFocus::ConfirmationBias => {
            "Information that agrees with a prior belief feels more convincing than it is."
        }
    }
}

fn focus_examples(focus: CognitiveFocus) -> Vec<String> {
    let items: &[&str] = match focus {
        CognitiveFocus::LinearMisestimation => &[
            "A café with eight baristas behind one counter serves barely more than with six.",
            "The first 200 spent on ads reaches new customers; the next 500 mostly reaches the same ones.",
        ],
        CognitiveFocus::TimeDelay => &[
            "Regular conversations build trust that shows up weeks later.",
            "Exercise changes little in a week and a great deal in a year.",
        ],
        CognitiveFocus::ConfirmationBias => &[
            "An investor reading only bullish reports becomes more certain, not more correct.",
            "Diversified portfolios look boring each year and win over decades.",
        ],
    };
    items.iter().map(|s| s.to_string()).collect()
}

/// Integers print without a fractional part, everything else with two decimals
pub fn fmt_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{:.2}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{ActionKind, Axis};

    #[test]
    fn test_summary_reprints_conclusion() {
        let p = Pyramid::new("Growth compounds.", vec!["a".into()], vec!["b".into()], vec!["c".into()]);
        assert!(p.summary.contains("Growth compounds."));
        assert!(p.is_complete());
    }

    #[test]
    fn test_scenario_pyramid_is_complete() {
        let context = EstimateContext::Scenario {
            focus: CognitiveFocus::LinearMisestimation,
            action: ActionKind::HireStaff,
            axis: Axis::Satisfaction,
            amount: 7,
        };
        let p = Pyramid::for_estimate(&context, 106.0, 64.0, 65.6, Severity::Major, BiasDirection::Overestimate);
        assert!(p.is_complete());
        assert!(p.core_conclusion.contains("hire_staff"));
        assert!(p.supporting_arguments[0].contains("106"));
    }

    #[test]
    fn test_minor_gap_does_not_claim_saturation() {
        let context = EstimateContext::Scenario {
            focus: CognitiveFocus::LinearMisestimation,
            action: ActionKind::HireStaff,
            axis: Axis::Satisfaction,
            amount: 3,
        };
        let p = Pyramid::for_estimate(&context, 24.0, 24.0, 0.0, Severity::Minor, BiasDirection::Overestimate);
        assert!(p.is_complete());
        assert!(!p.core_conclusion.contains("did not scale"));
        assert!(p.core_conclusion.contains("straight line predicts"));
    }

    #[test]
    fn test_advice_per_focus() {
        for focus in [
            CognitiveFocus::LinearMisestimation,
            CognitiveFocus::TimeDelay,
            CognitiveFocus::ConfirmationBias,
        ] {
            assert_eq!(advice_for(focus).len(), 3);
        }
    }

    #[test]
    fn test_fmt_number() {
        assert_eq!(fmt_number(1024.0), "1024");
        assert_eq!(fmt_number(2.5), "2.50");
    }
}
