use vinmatch_client::ClientError;

pub fn render_error(error: &ClientError) -> String {
    let mut lines = vec![
        "vinmatch could not finish this command.".to_string(),
        String::new(),
        format!("  Error:    {}", error.code),
        format!("  Details:  {}", error.message),
    ];

    if let Some(help_command) = error
        .data
        .as_ref()
        .and_then(|data| data.get("help_command"))
        .and_then(|value| value.as_str())
    {
        lines.push(format!("  Help:     {help_command}"));
    }

    lines.push(String::new());
    lines.push("What to do next:".to_string());
    if error.recovery_steps.is_empty() {
        lines.push("  1. Retry the command.".to_string());
    } else {
        for (index, step) in error.recovery_steps.iter().enumerate() {
            lines.push(format!("  {}. {step}", index + 1));
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use vinmatch_client::ClientError;

    use super::render_error;

    #[test]
    fn renders_standard_error_layout() {
        let error = ClientError::invalid_argument_with_recovery(
            "bad input",
            vec!["run vinmatch --help".to_string()],
        );

        let rendered = render_error(&error);
        assert!(rendered.starts_with("vinmatch could not finish this command."));
        assert!(rendered.contains("  Error:    invalid_argument"));
        assert!(rendered.contains("  Details:  bad input"));
        assert!(!rendered.contains("  Help:"));
        assert!(rendered.contains("What to do next:"));
        assert!(rendered.contains("  1. run vinmatch --help"));
    }

    #[test]
    fn shows_help_command_when_error_carries_one() {
        let error = ClientError::record_field_missing("input", 2, "description");
        let rendered = render_error(&error);
        assert!(rendered.contains("  Help:     vinmatch canonicalize --help"));
        assert!(rendered.contains("  1. Add a `description` column"));
    }
}
