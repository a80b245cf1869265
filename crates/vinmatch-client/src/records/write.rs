use std::fs;
use std::path::Path;

use serde_json::{Map, Value};

use crate::records::{RecordFormat, RecordSet};
use crate::{ClientError, ClientResult};

pub(crate) fn write_records(records: &RecordSet, path: &Path) -> ClientResult<()> {
    let body = render_records(records)
        .map_err(|error| ClientError::output_write_failed(path, &error.message))?;
    fs::write(path, body).map_err(|error| ClientError::output_write_failed(path, &error.to_string()))
}

pub(crate) fn render_records(records: &RecordSet) -> ClientResult<String> {
    match records.format {
        RecordFormat::Csv => render_csv(records),
        RecordFormat::JsonArray => render_json(records),
    }
}

fn render_csv(records: &RecordSet) -> ClientResult<String> {
    let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());
    writer
        .write_record(&records.headers)
        .map_err(|error| ClientError::internal_serialization(&error.to_string()))?;

    for record in &records.records {
        let row = records
            .headers
            .iter()
            .map(|header| record.get(header).unwrap_or_default())
            .collect::<Vec<&str>>();
        writer
            .write_record(&row)
            .map_err(|error| ClientError::internal_serialization(&error.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|error| ClientError::internal_serialization(&error.to_string()))?;
    String::from_utf8(bytes).map_err(|error| ClientError::internal_serialization(&error.to_string()))
}

fn render_json(records: &RecordSet) -> ClientResult<String> {
    let items = records
        .records
        .iter()
        .map(|record| {
            let object = record
                .fields()
                .iter()
                .map(|(key, value)| (key.clone(), Value::String(value.clone())))
                .collect::<Map<String, Value>>();
            Value::Object(object)
        })
        .collect::<Vec<Value>>();

    let mut rendered = serde_json::to_string_pretty(&items)
        .map_err(|error| ClientError::internal_serialization(&error.to_string()))?;
    rendered.push('\n');
    Ok(rendered)
}
