use std::fs;
use std::io::{IsTerminal, Read};

use serde::Serialize;

use crate::{ClientError, ClientResult};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    File,
    Stdin,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Stdin => "stdin",
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ResolvedSource {
    pub(crate) source_kind: SourceKind,
    pub(crate) source_ref: Option<String>,
    pub(crate) content: String,
}

/// `-` reads stdin; anything else is a file path.
pub(crate) fn resolve_source(
    path: &str,
    stdin_override: Option<String>,
) -> ClientResult<ResolvedSource> {
    if path == "-" {
        if let Some(stdin_value) = read_stdin(stdin_override)?
            && !stdin_value.trim().is_empty()
        {
            return Ok(ResolvedSource {
                source_kind: SourceKind::Stdin,
                source_ref: None,
                content: stdin_value,
            });
        }

        return Err(ClientError::invalid_argument_for_command(
            "Path `-` means stdin input, but stdin was empty. Pipe JSON/CSV records or pass a file path.",
            Some("canonicalize"),
        ));
    }

    Ok(ResolvedSource {
        source_kind: SourceKind::File,
        source_ref: Some(path.to_string()),
        content: read_file(path)?,
    })
}

pub(crate) fn read_file(path: &str) -> ClientResult<String> {
    fs::read_to_string(path)
        .map_err(|error| ClientError::source_unreadable(path, &error.to_string()))
}

fn read_stdin(stdin_override: Option<String>) -> ClientResult<Option<String>> {
    if let Some(value) = stdin_override {
        return Ok(Some(value));
    }

    if std::io::stdin().is_terminal() {
        return Ok(None);
    }

    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|error| ClientError::source_unreadable("stdin", &error.to_string()))?;

    if buffer.trim().is_empty() {
        return Ok(None);
    }

    Ok(Some(buffer))
}

#[cfg(test)]
mod tests {
    use super::{SourceKind, resolve_source};

    #[test]
    fn dash_reads_the_stdin_override() {
        let resolved = resolve_source("-", Some("description\nCaymus Cab 2016\n".to_string()));
        assert!(resolved.is_ok());
        if let Ok(source) = resolved {
            assert_eq!(source.source_kind, SourceKind::Stdin);
            assert_eq!(source.source_ref, None);
        }
    }

    #[test]
    fn blank_stdin_is_rejected() {
        let resolved = resolve_source("-", Some("   \n".to_string()));
        assert!(resolved.is_err());
        if let Err(error) = resolved {
            assert_eq!(error.code, "invalid_argument");
        }
    }

    #[test]
    fn missing_file_reports_the_path() {
        let resolved = resolve_source("/definitely/not/here.csv", None);
        assert!(resolved.is_err());
        if let Err(error) = resolved {
            assert!(error.message.contains("/definitely/not/here.csv"));
        }
    }
}
