use std::path::Path;

use crate::commands::common::{DEFAULT_CANONICAL_FIELD, field_or_default, load_master_table};
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::TableData;
use crate::engine::Canonicalizer;
use crate::{ClientError, ClientResult};

#[derive(Debug, Default)]
pub struct TableOptions<'a> {
    pub master: String,
    pub canonical_field: Option<String>,
    pub winery: Option<String>,
    pub registry: Option<String>,
    pub home_override: Option<&'a Path>,
}

pub fn run(master: String, winery: Option<String>) -> ClientResult<SuccessEnvelope> {
    run_with_options(TableOptions {
        master,
        winery,
        ..TableOptions::default()
    })
}

#[doc(hidden)]
pub fn run_with_options(options: TableOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let canonical_field =
        field_or_default(options.canonical_field.as_deref(), DEFAULT_CANONICAL_FIELD);
    let table = load_master_table(
        &options.master,
        &canonical_field,
        options.registry.as_deref(),
        options.home_override,
    )?;

    let winery_filter = match options.winery {
        Some(wanted) => Some(known_winery(&table.canonicalizer, &wanted)?),
        None => None,
    };

    let buckets = table.canonicalizer.table().buckets(winery_filter.as_deref());
    let data = TableData {
        master: table.master,
        registry: table.registry,
        winery_filter,
        build: table.build,
        buckets,
    };
    success("table", data)
}

/// Accepts the canonical name in any letter case.
fn known_winery(canonicalizer: &Canonicalizer, wanted: &str) -> ClientResult<String> {
    canonicalizer
        .registry()
        .wineries
        .iter()
        .find(|winery| winery.name.eq_ignore_ascii_case(wanted.trim()))
        .map(|winery| winery.name.clone())
        .ok_or_else(|| {
            ClientError::invalid_argument_with_recovery(
                &format!("Unknown winery `{wanted}`."),
                vec![
                    "Run `vinmatch registry` to list the configured winery names.".to_string(),
                    "Omit `--winery` to show every bucket.".to_string(),
                ],
            )
        })
}
