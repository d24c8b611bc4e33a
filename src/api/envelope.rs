//! Uniform response envelope: `{success, data?, error?}`

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorBody {
    /// Stable category code
    pub code: &'static str,
    pub message: String,
    /// Correlates the response with the server log line
    pub error_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

impl Envelope<()> {
    pub fn failure(code: &'static str, message: impl Into<String>, error_id: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ErrorBody {
                code,
                message: message.into(),
                error_id: error_id.into(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_omits_error() {
        let json = serde_json::to_value(Envelope::ok(42)).unwrap();
        assert_eq!(json, serde_json::json!({ "success": true, "data": 42 }));
    }

    #[test]
    fn test_failure_omits_data() {
        let json = serde_json::to_value(Envelope::failure("UNKNOWN_SESSION", "gone", "abc")).unwrap();
        assert_eq!(json["success"], false);
        assert!(json.get("data").is_none());
        assert_eq!(json["error"]["code"], "UNKNOWN_SESSION");
        assert_eq!(json["error"]["error_id"], "abc");
    }
}
