use thiserror::Error;

#[derive(Error, Debug)]
pub enum LabError {
    #[error("{name} = {value} is outside the allowed range [{min}, {max}]")]
    InputOutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Unknown scenario: {0}")]
    UnknownScenario(String),

    #[error("Unknown session: {0}")]
    UnknownSession(String),

    #[error("Unknown action '{action}' for scenario '{scenario}'")]
    UnknownAction { scenario: String, action: String },

    #[error("Unknown question: {0}")]
    UnknownQuestion(String),

    #[error("Unknown quiz topic: {0}")]
    UnknownTopic(String),

    #[error("Scenario '{scenario}' does not offer difficulty '{difficulty}'")]
    UnsupportedDifficulty { scenario: String, difficulty: String },

    #[error("Session {0} has already ended")]
    SessionTerminal(String),

    #[error("Calculation error: {0}")]
    Calculation(String),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl LabError {
    /// Stable category code reported in the response envelope
    pub fn code(&self) -> &'static str {
        match self {
            LabError::InputOutOfRange { .. } => "INPUT_OUT_OF_RANGE",
            LabError::InvalidAmount(_) => "INVALID_AMOUNT",
            LabError::UnknownScenario(_) => "UNKNOWN_SCENARIO",
            LabError::UnknownSession(_) => "UNKNOWN_SESSION",
            LabError::UnknownAction { .. } => "UNKNOWN_ACTION",
            LabError::UnknownQuestion(_) | LabError::UnknownTopic(_) => "UNKNOWN_QUESTION",
            LabError::UnsupportedDifficulty { .. } => "UNSUPPORTED_DIFFICULTY",
            LabError::SessionTerminal(_) => "SESSION_TERMINAL",
            LabError::Calculation(_) => "CALCULATION_ERROR",
            LabError::Catalog(_)
            | LabError::Config(_)
            | LabError::IoError(_)
            | LabError::SerdeError(_)
            | LabError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// True for failures caused by the caller rather than the server
    pub fn is_client_error(&self) -> bool {
        !matches!(
            self,
            LabError::Catalog(_)
                | LabError::Config(_)
                | LabError::IoError(_)
                | LabError::SerdeError(_)
                | LabError::Internal(_)
        )
    }

    pub fn overflow(what: impl std::fmt::Display) -> Self {
        LabError::Calculation(format!("{} overflowed or produced a non-finite value", what))
    }
}

pub type Result<T> = std::result::Result<T, LabError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(
            LabError::InvalidAmount("-1".into()).code(),
            "INVALID_AMOUNT"
        );
        assert_eq!(LabError::overflow("exp").code(), "CALCULATION_ERROR");
        assert_eq!(LabError::UnknownTopic("x".into()).code(), "UNKNOWN_QUESTION");
        assert_eq!(LabError::Internal("boom".into()).code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_client_vs_internal() {
        assert!(LabError::SessionTerminal("s".into()).is_client_error());
        assert!(!LabError::Catalog("bad toml".into()).is_client_error());
    }
}
