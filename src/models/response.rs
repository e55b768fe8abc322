use serde::Serialize;

use super::AgeResult;
use crate::error::{ErrorKind, VerifyError};

/// Boundary record handed to the hosting layer.
///
/// Serializes to `{"success":true,"age":..,"is_under_18":..}` or
/// `{"success":false,"error":".."}` and nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VerificationResponse {
    /// True when an age was derived
    pub success: bool,
    /// Set on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    /// Set on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_under_18: Option<bool>,
    /// Set on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorKind>,
}

impl VerificationResponse {
    /// Successful verification
    pub fn verified(result: AgeResult) -> Self {
        Self {
            success: true,
            age: Some(result.age),
            is_under_18: Some(result.is_under_18),
            error: None,
        }
    }

    /// Failed verification carrying only the error identifier
    pub fn failed(kind: ErrorKind) -> Self {
        Self {
            success: false,
            age: None,
            is_under_18: None,
            error: Some(kind),
        }
    }

    /// JSON body for the hosting layer
    pub fn to_json(&self) -> String {
        match serde_json::to_string(self) {
            Ok(body) => body,
            // Plain struct of primitives; serialization cannot fail in practice.
            Err(_) => String::from(r#"{"success":false}"#),
        }
    }
}

impl From<std::result::Result<AgeResult, VerifyError>> for VerificationResponse {
    fn from(result: std::result::Result<AgeResult, VerifyError>) -> Self {
        match result {
            Ok(age) => Self::verified(age),
            Err(err) => Self::failed(err.kind()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_shape() {
        let response = VerificationResponse::verified(AgeResult {
            age: 28,
            is_under_18: false,
        });
        assert_eq!(
            response.to_json(),
            r#"{"success":true,"age":28,"is_under_18":false}"#
        );
    }

    #[test]
    fn test_failure_shape() {
        let response = VerificationResponse::failed(ErrorKind::NoSymbolFound);
        assert_eq!(
            response.to_json(),
            r#"{"success":false,"error":"NoSymbolFound"}"#
        );
    }

    #[test]
    fn test_from_result() {
        let response: VerificationResponse = Err(VerifyError::UnknownFormat).into();
        assert_eq!(response, VerificationResponse::failed(ErrorKind::UnknownFormat));
    }
}
