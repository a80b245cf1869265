use serde::Serialize;
use serde_json::Value;

use crate::API_VERSION;
use crate::error::{ClientError, ClientResult};

/// Successful command output. `data` holds the command-specific payload.
#[derive(Debug, Clone, Serialize)]
pub struct SuccessEnvelope {
    pub ok: bool,
    pub command: String,
    pub version: String,
    pub data: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct FailureEnvelope {
    pub ok: bool,
    pub version: String,
    pub error: ErrorContract,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorContract {
    pub code: String,
    pub message: String,
    pub recovery_steps: Vec<String>,
}

impl SuccessEnvelope {
    /// String value of a top-level `data` field, if present.
    pub fn data_str(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(Value::as_str)
    }
}

pub fn success<T>(command: &str, data: T) -> ClientResult<SuccessEnvelope>
where
    T: Serialize,
{
    let json_data = serde_json::to_value(data)
        .map_err(|err| ClientError::internal_serialization(&err.to_string()))?;
    Ok(SuccessEnvelope {
        ok: true,
        command: command.to_string(),
        version: API_VERSION.to_string(),
        data: json_data,
    })
}

impl From<&ClientError> for FailureEnvelope {
    fn from(error: &ClientError) -> Self {
        Self {
            ok: false,
            version: API_VERSION.to_string(),
            error: ErrorContract {
                code: error.code.clone(),
                message: error.message.clone(),
                recovery_steps: error.recovery_steps.clone(),
            },
            data: error.data.clone(),
        }
    }
}

pub fn failure_from_error(error: &ClientError) -> FailureEnvelope {
    FailureEnvelope::from(error)
}

#[cfg(test)]
mod tests {
    use serde::Serialize;

    use super::{failure_from_error, success};
    use crate::ClientError;

    #[derive(Serialize)]
    struct Payload {
        output_path: String,
    }

    #[test]
    fn success_wraps_payload_with_command_and_version() {
        let envelope = success(
            "canonicalize",
            Payload {
                output_path: "out.csv".to_string(),
            },
        );
        assert!(envelope.is_ok());
        if let Ok(envelope) = envelope {
            assert!(envelope.ok);
            assert_eq!(envelope.command, "canonicalize");
            assert_eq!(envelope.data_str("output_path"), Some("out.csv"));
            assert_eq!(envelope.data_str("missing"), None);
        }
    }

    #[test]
    fn failure_carries_error_data() {
        let error = ClientError::record_field_missing("input", 3, "description");
        let envelope = failure_from_error(&error);
        assert!(!envelope.ok);
        assert_eq!(envelope.error.code, "record_field_missing");
        let row = envelope
            .data
            .as_ref()
            .and_then(|data| data.get("row"))
            .and_then(|value| value.as_u64());
        assert_eq!(row, Some(3));
    }
}
