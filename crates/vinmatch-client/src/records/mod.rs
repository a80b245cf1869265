//! Record files: loading, field access and writing back.
//!
//! A record is an ordered list of string fields. Loaders never interpret
//! values beyond turning JSON scalars into strings.

pub(crate) mod input;
pub(crate) mod parse;
pub(crate) mod write;

use serde::Serialize;

use crate::{ClientError, ClientResult};

pub use input::SourceKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordFormat {
    Csv,
    JsonArray,
}

impl RecordFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::JsonArray => "json_array",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::JsonArray => "json",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    pub fn from_fields(fields: Vec<(String, String)>) -> Self {
        Self { fields }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Replaces the value in place, or appends the field when it is new.
    pub fn set(&mut self, name: &str, value: String) {
        match self.fields.iter_mut().find(|(key, _)| key == name) {
            Some((_, current)) => *current = value,
            None => self.fields.push((name.to_string(), value)),
        }
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    /// `row` is 1-based and only used for the error message.
    pub fn require(&self, name: &str, source_label: &str, row: usize) -> ClientResult<&str> {
        self.get(name)
            .ok_or_else(|| ClientError::record_field_missing(source_label, row, name))
    }
}

#[derive(Debug, Clone)]
pub struct RecordSet {
    pub format: RecordFormat,
    /// Union of field names in first-seen order.
    pub headers: Vec<String>,
    pub records: Vec<Record>,
}

impl RecordSet {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Pulls one required field out of every record, failing on the first
    /// record that lacks it.
    pub fn column(&self, name: &str, source_label: &str) -> ClientResult<Vec<&str>> {
        self.records
            .iter()
            .enumerate()
            .map(|(index, record)| record.require(name, source_label, index + 1))
            .collect()
    }

    pub fn add_header(&mut self, name: &str) {
        if !self.headers.iter().any(|header| header == name) {
            self.headers.push(name.to_string());
        }
    }
}
