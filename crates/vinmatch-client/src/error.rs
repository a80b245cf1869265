use std::path::Path;

use serde_json::{Value, json};
use thiserror::Error;

pub(crate) const CANONICALIZE_HELP_COMMAND: &str = "vinmatch canonicalize --help";
pub(crate) const REGISTRY_HELP_COMMAND: &str = "vinmatch registry --help";

#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ClientError {
    pub code: String,
    pub message: String,
    pub recovery_steps: Vec<String>,
    pub data: Option<Value>,
}

impl ClientError {
    pub fn new(code: &str, message: &str, recovery_steps: Vec<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            recovery_steps,
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_help(self, help_command: &str) -> Self {
        self.with_help_data(help_command, json!({}))
    }

    pub fn with_help_data(self, help_command: &str, data: Value) -> Self {
        self.with_data(merge_help_data(help_command, data))
    }

    pub fn invalid_argument(message: &str) -> Self {
        Self::invalid_argument_for_command(message, None)
    }

    pub fn invalid_argument_for_command(message: &str, command: Option<&str>) -> Self {
        let help_hint = match command {
            Some(cmd) => format!("Run `vinmatch {cmd} --help` for usage."),
            None => "Run `vinmatch --help` for usage.".to_string(),
        };
        let error = Self::new("invalid_argument", message, vec![help_hint]);
        if let Some(cmd) = command {
            return error.with_data(json!({
                "command_hint": cmd,
            }));
        }
        error
    }

    pub fn invalid_argument_with_recovery(message: &str, recovery_steps: Vec<String>) -> Self {
        Self::new("invalid_argument", message, recovery_steps)
    }

    pub fn invalid_record_format(message: &str, received_format: &str) -> Self {
        Self::invalid_argument_with_recovery(
            message,
            vec![
                "Provide records as a JSON array of objects or a CSV file with a header row."
                    .to_string(),
                "Run `vinmatch canonicalize --help` to confirm field requirements.".to_string(),
            ],
        )
        .with_help_data(
            CANONICALIZE_HELP_COMMAND,
            json!({
                "received_format": received_format,
                "supported_formats": ["json_array", "csv"],
            }),
        )
    }

    pub fn source_unreadable(path: &str, detail: &str) -> Self {
        Self::invalid_argument_with_recovery(
            &format!("Could not read `{path}`: {detail}"),
            vec![
                "Verify the path exists and is readable.".to_string(),
                "Rerun the command with a corrected path.".to_string(),
            ],
        )
    }

    pub fn record_field_missing(source_label: &str, row: usize, field: &str) -> Self {
        Self::new(
            "record_field_missing",
            &format!("Row {row} of the {source_label} records has no `{field}` field."),
            vec![
                format!("Add a `{field}` column or key to every {source_label} record."),
                "Or point the matching `--*-field` option at the column that holds that text."
                    .to_string(),
            ],
        )
        .with_help_data(
            CANONICALIZE_HELP_COMMAND,
            json!({
                "source": source_label,
                "row": row,
                "field": field,
            }),
        )
    }

    pub fn registry_invalid(origin: &str, detail: &str) -> Self {
        Self::new(
            "registry_invalid",
            &format!("Pattern registry `{origin}` is invalid: {detail}"),
            vec![
                "Fix the registry entry named in the details.".to_string(),
                "Or omit `--registry` to fall back to the bundled registry.".to_string(),
            ],
        )
        .with_help_data(
            REGISTRY_HELP_COMMAND,
            json!({
                "origin": origin,
            }),
        )
    }

    pub fn output_write_failed(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "output_write_failed",
            &format!("Could not write canonicalized records to `{location}`: {detail}"),
            vec![format!(
                "Grant write access to `{location}` or pass a different `--output` path."
            )],
        )
    }

    pub fn home_unresolved(detail: &str) -> Self {
        Self::new(
            "home_unresolved",
            &format!("Could not resolve the vinmatch home directory: {detail}"),
            vec!["Set `VINMATCH_HOME` to a readable directory, or pass `--registry`.".to_string()],
        )
    }

    pub fn internal_serialization(message: &str) -> Self {
        Self::new("internal_serialization_error", message, Vec::new())
    }
}

fn merge_help_data(help_command: &str, mut data: Value) -> Value {
    if !data.is_object() {
        data = json!({});
    }

    if let Some(object) = data.as_object_mut() {
        object.insert(
            "help_command".to_string(),
            Value::String(help_command.to_string()),
        );
    }

    data
}

pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::ClientError;

    #[test]
    fn record_field_missing_names_row_and_field() {
        let error = ClientError::record_field_missing("master", 4, "canonical");
        assert_eq!(error.code, "record_field_missing");
        assert!(error.message.contains("Row 4"));
        assert!(error.message.contains("`canonical`"));
        let data = error.data.unwrap_or_default();
        assert_eq!(data["field"], "canonical");
        assert_eq!(data["help_command"], "vinmatch canonicalize --help");
    }

    #[test]
    fn command_hint_is_attached_for_scoped_invalid_arguments() {
        let error = ClientError::invalid_argument_for_command("bad flag", Some("describe"));
        assert_eq!(error.recovery_steps[0], "Run `vinmatch describe --help` for usage.");
        let data = error.data.unwrap_or_default();
        assert_eq!(data["command_hint"], "describe");
    }
}
