use serde_json::{Map, Value};

use crate::records::{Record, RecordFormat, RecordSet};
use crate::{ClientError, ClientResult};

pub(crate) fn parse_records(content: &str, source_label: &str) -> ClientResult<RecordSet> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(ClientError::invalid_record_format(
            &format!("The {source_label} source is empty."),
            "empty",
        ));
    }

    if looks_like_ndjson(trimmed) {
        return Err(ClientError::invalid_record_format(
            "NDJSON is not supported. Provide a JSON array or CSV.",
            "ndjson",
        ));
    }

    if trimmed.starts_with('[') {
        return parse_json_array(trimmed, source_label);
    }

    if serde_json::from_str::<Value>(trimmed).is_ok() {
        return Err(ClientError::invalid_record_format(
            "JSON input must be a top-level array of record objects.",
            "json_non_array",
        ));
    }

    parse_csv(content, source_label)
}

fn parse_json_array(content: &str, source_label: &str) -> ClientResult<RecordSet> {
    let parsed = serde_json::from_str::<Value>(content).map_err(|error| {
        ClientError::invalid_record_format(
            &format!("Invalid JSON in the {source_label} source: {error}"),
            "json_invalid",
        )
    })?;

    let Some(items) = parsed.as_array() else {
        return Err(ClientError::invalid_record_format(
            "JSON input must be a top-level array of record objects.",
            "json_non_array",
        ));
    };

    let mut records = RecordSet {
        format: RecordFormat::JsonArray,
        headers: Vec::new(),
        records: Vec::with_capacity(items.len()),
    };
    for (index, item) in items.iter().enumerate() {
        let Some(object) = item.as_object() else {
            return Err(ClientError::invalid_record_format(
                &format!("Entry {} of the {source_label} array is not an object.", index + 1),
                "json_array_mixed",
            ));
        };
        for key in object.keys() {
            records.add_header(key);
        }
        records.records.push(record_from_object(object));
    }

    Ok(records)
}

fn record_from_object(object: &Map<String, Value>) -> Record {
    Record::from_fields(
        object
            .iter()
            .map(|(key, value)| (key.clone(), stringify(value)))
            .collect(),
    )
}

fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        other => other.to_string(),
    }
}

fn parse_csv(content: &str, source_label: &str) -> ClientResult<RecordSet> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .map_err(|_| {
            ClientError::invalid_record_format(
                &format!("The {source_label} CSV header row is missing or unreadable."),
                "csv",
            )
        })?
        .iter()
        .map(|value| value.trim().to_string())
        .collect::<Vec<String>>();

    let mut records = Vec::new();
    for (row_index, result_row) in reader.records().enumerate() {
        let row = result_row.map_err(|error| {
            ClientError::invalid_record_format(
                &format!(
                    "Row {} of the {source_label} CSV is malformed: {error}",
                    row_index + 1
                ),
                "csv",
            )
        })?;
        records.push(Record::from_fields(
            headers
                .iter()
                .cloned()
                .zip(row.iter().map(str::to_string))
                .collect(),
        ));
    }

    Ok(RecordSet {
        format: RecordFormat::Csv,
        headers,
        records,
    })
}

fn looks_like_ndjson(content: &str) -> bool {
    let lines = content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<&str>>();
    if lines.len() < 2 {
        return false;
    }

    lines.iter().all(|line| {
        serde_json::from_str::<Value>(line.trim())
            .map(|value| value.is_object())
            .unwrap_or(false)
    })
}
