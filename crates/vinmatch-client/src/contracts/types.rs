use serde::Serialize;

use crate::engine::{BucketView, BuildSummary, CanonicalParts, CategoryStatus};
use crate::records::{RecordFormat, SourceKind};
use crate::registry::RegistryCounts;
use crate::state::RegistrySource;

#[derive(Debug, Clone, Serialize)]
pub struct RecordSourceSummary {
    pub kind: SourceKind,
    pub path: Option<String>,
    pub format: RecordFormat,
    pub records: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldNames {
    pub raw: String,
    pub canonical: String,
    pub new: String,
    pub matches: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CanonicalizeSummary {
    pub records_read: usize,
    pub canonicalized: usize,
    pub skipped: usize,
    /// Canonical text differs from the raw text.
    pub changed: usize,
    pub matches_prior: usize,
    pub differs_from_prior: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkippedRow {
    pub row: usize,
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkippedPreview {
    pub rows: Vec<SkippedRow>,
    pub truncated: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CanonicalizeData {
    pub run_id: String,
    pub started_at: String,
    pub input: RecordSourceSummary,
    pub master: RecordSourceSummary,
    pub output_path: String,
    pub registry: RegistrySource,
    pub fields: FieldNames,
    pub summary: CanonicalizeSummary,
    pub build: BuildSummary,
    pub skipped_preview: SkippedPreview,
}

#[derive(Debug, Clone, Serialize)]
pub struct DescribeData {
    pub text: String,
    pub matched: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_status: Option<CategoryStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parts: Option<CanonicalParts>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub registry: RegistrySource,
    pub build: BuildSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct TableData {
    pub master: RecordSourceSummary,
    pub registry: RegistrySource,
    pub winery_filter: Option<String>,
    pub build: BuildSummary,
    pub buckets: Vec<BucketView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegistryWineryView {
    pub name: String,
    pub category_kind: String,
    pub non_wine: bool,
    pub abbreviations: Vec<String>,
    pub priority: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forced_tag: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegistryData {
    pub source: RegistrySource,
    pub non_wine_marker: String,
    pub counts: RegistryCounts,
    pub wineries: Vec<RegistryWineryView>,
}
