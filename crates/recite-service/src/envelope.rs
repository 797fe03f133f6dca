use serde::Serialize;
use serde_json::Value;

use crate::ReciteError;

/// Uniform response shape: `errno` 0 with `data`, or a code and message
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope {
    pub errno: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Envelope {
    pub fn success(data: impl Serialize) -> Self {
        match serde_json::to_value(data) {
            Ok(data) => Self {
                errno: 0,
                error: None,
                data: Some(data),
            },
            Err(e) => {
                tracing::error!("Failed to encode response data: {}", e);
                Self::failure(1, "internal error")
            }
        }
    }

    pub fn failure(errno: i32, message: impl Into<String>) -> Self {
        Self {
            errno,
            error: Some(message.into()),
            data: None,
        }
    }

    pub fn from_error(err: &ReciteError) -> Self {
        Self::failure(err.code(), err.public_message())
    }

    pub fn from_result<T: Serialize>(result: crate::Result<T>) -> Self {
        match result {
            Ok(data) => Self::success(data),
            Err(err) => {
                if matches!(err, ReciteError::Store(_)) {
                    tracing::error!("{}", err);
                }
                Self::from_error(&err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_success_shape() {
        let envelope = Envelope::success(json!({ "total": 2 }));
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({ "errno": 0, "data": { "total": 2 } })
        );
    }

    #[test]
    fn test_error_shape() {
        let err = ReciteError::NotFound("unit 9 does not exist".into());
        let envelope = Envelope::from_result::<()>(Err(err));
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({ "errno": 1002, "error": "unit 9 does not exist" })
        );
    }
}
