use std::path::Path;

use crate::ClientResult;
use crate::contracts::types::RecordSourceSummary;
use crate::engine::{BuildSummary, Canonicalizer};
use crate::records::SourceKind;
use crate::records::input::read_file;
use crate::records::parse::parse_records;
use crate::state::{RegistrySource, load_registry};

pub const DEFAULT_RAW_FIELD: &str = "description";
pub const DEFAULT_CANONICAL_FIELD: &str = "canonical";
pub const DEFAULT_NEW_FIELD: &str = "new_canonical";
pub const DEFAULT_MATCH_FIELD: &str = "canonical_matches";

pub(crate) const MASTER_LABEL: &str = "master";
pub(crate) const INPUT_LABEL: &str = "input";

pub(crate) struct MasterTable {
    pub(crate) canonicalizer: Canonicalizer,
    pub(crate) build: BuildSummary,
    pub(crate) master: RecordSourceSummary,
    pub(crate) registry: RegistrySource,
}

/// Loads the registry and freezes a lookup table from the master file.
pub(crate) fn load_master_table(
    master_path: &str,
    canonical_field: &str,
    registry_path: Option<&str>,
    home_override: Option<&Path>,
) -> ClientResult<MasterTable> {
    let (registry, registry_source) = load_registry(registry_path, home_override)?;

    let content = read_file(master_path)?;
    let masters = parse_records(&content, MASTER_LABEL)?;
    let canonical = masters.column(canonical_field, MASTER_LABEL)?;
    let (canonicalizer, build) = Canonicalizer::from_masters(registry, canonical)?;

    Ok(MasterTable {
        canonicalizer,
        build,
        master: RecordSourceSummary {
            kind: SourceKind::File,
            path: Some(master_path.to_string()),
            format: masters.format,
            records: masters.len(),
        },
        registry: registry_source,
    })
}

pub(crate) fn field_or_default(value: Option<&str>, default: &str) -> String {
    value
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(default)
        .to_string()
}
