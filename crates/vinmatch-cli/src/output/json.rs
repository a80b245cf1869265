use std::io;

use serde::Serialize;
use serde_json::{Value, json};
use vinmatch_client::{ClientError, SuccessEnvelope};

const JSON_VERSION: &str = "v1";

pub fn render_success_json(success: &SuccessEnvelope) -> io::Result<String> {
    let value = match success.command.as_str() {
        "canonicalize" | "describe" | "registry" => {
            render_enveloped_json(&success.command, &success.data)
        }
        "table" => render_table_json(&success.data),
        _ => {
            return Err(io::Error::other(format!(
                "JSON output is not supported for command `{}`",
                success.command
            )));
        }
    };

    serialize_json_pretty(&value)
}

pub fn render_error_json(error: &ClientError) -> io::Result<String> {
    let payload = json!({
        "error": {
            "code": error.code,
            "message": error.message,
            "recovery_steps": error.recovery_steps,
        }
    });
    serialize_json_pretty(&payload)
}

fn render_enveloped_json(command: &str, data: &Value) -> Value {
    json!({
        "ok": true,
        "version": JSON_VERSION,
        "command": command,
        "data": data.clone()
    })
}

/// Buckets only, ordered by winery then category, as a bare array.
fn render_table_json(data: &Value) -> Value {
    let buckets = data
        .get("buckets")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    Value::Array(buckets)
}

fn serialize_json_pretty<T>(value: &T) -> io::Result<String>
where
    T: Serialize,
{
    serde_json::to_string_pretty(value).map_err(io::Error::other)
}
