//! The `{success, data, message}` wrapper every API response carries

use crate::error::{ClientError, ClientResult};
use serde::{Deserialize, Serialize};

/// Response envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Whether the server handled the request
    pub success: bool,
    /// Payload
    pub data: Option<T>,
    /// Human-readable message, usually present on failure
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    /// Successful envelope with a payload
    pub const fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    /// Envelope for an empty 2xx body
    pub const fn empty() -> Self {
        Self {
            success: true,
            data: None,
            message: None,
        }
    }

    /// Payload, failing on `success: false` or a missing `data`
    pub fn into_data(self) -> ClientResult<T> {
        let data = self.into_option()?;
        data.ok_or_else(|| ClientError::Decode("response has no data".to_string()))
    }

    /// Payload if present, failing only on `success: false`
    pub fn into_option(self) -> ClientResult<Option<T>> {
        if self.success {
            Ok(self.data)
        } else {
            Err(ClientError::Envelope {
                message: self
                    .message
                    .unwrap_or_else(|| "request failed".to_string()),
            })
        }
    }
}

/// The `message` field of an error body, if it has one
pub fn server_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .or_else(|| value.get("error"))
        .and_then(serde_json::Value::as_str)
        .map(ToString::to_string)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_decode_success() {
        let envelope: Envelope<Vec<u32>> =
            serde_json::from_str(r#"{"success": true, "data": [1, 2, 3]}"#).unwrap();
        assert_eq!(envelope.into_data().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_failure_carries_server_message() {
        let envelope: Envelope<Vec<u32>> =
            serde_json::from_str(r#"{"success": false, "message": "권한이 없습니다"}"#).unwrap();
        let err = envelope.into_data().unwrap_err();
        assert!(matches!(err, ClientError::Envelope { ref message } if message == "권한이 없습니다"));
    }

    #[test]
    fn test_missing_data_is_decode_error() {
        let envelope: Envelope<u32> = serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert!(matches!(
            envelope.clone().into_data(),
            Err(ClientError::Decode(_))
        ));
        assert_eq!(envelope.into_option().unwrap(), None);
    }

    #[rstest]
    #[case(r#"{"success": false, "message": "invalid token"}"#, Some("invalid token"))]
    #[case(r#"{"error": "Not Found"}"#, Some("Not Found"))]
    #[case(r#"{"success": false}"#, None)]
    #[case("<html>502 Bad Gateway</html>", None)]
    fn test_server_message(#[case] body: &str, #[case] expected: Option<&str>) {
        assert_eq!(server_message(body).as_deref(), expected);
    }
}
