use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use tracing::{debug, info};
use ulid::Ulid;

use crate::commands::common::{
    DEFAULT_CANONICAL_FIELD, DEFAULT_MATCH_FIELD, DEFAULT_NEW_FIELD, DEFAULT_RAW_FIELD,
    INPUT_LABEL, field_or_default, load_master_table,
};
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{
    CanonicalizeData, CanonicalizeSummary, FieldNames, RecordSourceSummary, SkippedPreview,
    SkippedRow,
};
use crate::records::input::resolve_source;
use crate::records::parse::parse_records;
use crate::records::write::write_records;
use crate::records::{RecordFormat, RecordSet};
use crate::{ClientError, ClientResult};

pub const SKIPPED_PREVIEW_LIMIT: usize = 50;
const COMMAND: &str = "canonicalize";

#[derive(Debug, Default)]
pub struct CanonicalizeOptions<'a> {
    pub input: String,
    pub master: String,
    pub output: Option<String>,
    pub raw_field: Option<String>,
    pub canonical_field: Option<String>,
    pub new_field: Option<String>,
    pub match_field: Option<String>,
    pub registry: Option<String>,
    pub home_override: Option<&'a Path>,
    pub stdin_override: Option<String>,
}

pub fn run(input: String, master: String, output: Option<String>) -> ClientResult<SuccessEnvelope> {
    run_with_options(CanonicalizeOptions {
        input,
        master,
        output,
        ..CanonicalizeOptions::default()
    })
}

#[doc(hidden)]
pub fn run_with_options(options: CanonicalizeOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let fields = resolve_fields(&options)?;
    if options.input == "-" && options.output.is_none() {
        return Err(ClientError::invalid_argument_for_command(
            "Reading records from stdin requires `--output <path>`.",
            Some(COMMAND),
        ));
    }

    let run_id = format!("run_{}", Ulid::new());
    let started_at = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);

    let table = load_master_table(
        &options.master,
        &fields.canonical,
        options.registry.as_deref(),
        options.home_override,
    )?;

    let source = resolve_source(&options.input, options.stdin_override)?;
    let mut records = parse_records(&source.content, INPUT_LABEL)?;
    let output_path = resolve_output_path(
        options.output.as_deref(),
        source.source_ref.as_deref(),
        records.format,
    )?;

    let raw_texts = records
        .column(&fields.raw, INPUT_LABEL)?
        .into_iter()
        .map(str::to_string)
        .collect::<Vec<String>>();
    let results = table
        .canonicalizer
        .canonicalize_all(raw_texts.iter().map(String::as_str));

    let mut summary = CanonicalizeSummary {
        records_read: records.len(),
        ..CanonicalizeSummary::default()
    };
    let mut skipped_rows = Vec::new();
    let mut saw_prior = false;

    for (index, (record, result)) in records.records.iter_mut().zip(results).enumerate() {
        let raw = raw_texts[index].as_str();
        let description = match result {
            Some(found) => {
                summary.canonicalized += 1;
                if found.description != raw {
                    summary.changed += 1;
                }
                found.description
            }
            None => {
                summary.skipped += 1;
                debug!(row = index + 1, text = raw, "no winery matched; record skipped");
                if skipped_rows.len() < SKIPPED_PREVIEW_LIMIT {
                    skipped_rows.push(SkippedRow {
                        row: index + 1,
                        text: raw.to_string(),
                    });
                }
                String::new()
            }
        };

        let prior = record
            .get(&fields.canonical)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string);
        if let Some(prior) = prior {
            saw_prior = true;
            let matches = !description.is_empty() && prior == description;
            if matches {
                summary.matches_prior += 1;
            } else {
                summary.differs_from_prior += 1;
            }
            record.set(&fields.matches, matches.to_string());
        }
        record.set(&fields.new, description);
    }

    add_output_headers(&mut records, &fields, saw_prior);
    write_records(&records, &output_path)?;

    info!(
        run_id = %run_id,
        records_read = summary.records_read,
        canonicalized = summary.canonicalized,
        skipped = summary.skipped,
        output = %output_path.display(),
        "canonicalize run finished"
    );

    let data = CanonicalizeData {
        run_id,
        started_at,
        input: RecordSourceSummary {
            kind: source.source_kind,
            path: source.source_ref,
            format: records.format,
            records: records.len(),
        },
        master: table.master,
        output_path: output_path.display().to_string(),
        registry: table.registry,
        fields,
        skipped_preview: SkippedPreview {
            truncated: summary.skipped > skipped_rows.len(),
            rows: skipped_rows,
        },
        summary,
        build: table.build,
    };
    success(COMMAND, data)
}

fn resolve_fields(options: &CanonicalizeOptions<'_>) -> ClientResult<FieldNames> {
    let fields = FieldNames {
        raw: field_or_default(options.raw_field.as_deref(), DEFAULT_RAW_FIELD),
        canonical: field_or_default(options.canonical_field.as_deref(), DEFAULT_CANONICAL_FIELD),
        new: field_or_default(options.new_field.as_deref(), DEFAULT_NEW_FIELD),
        matches: field_or_default(options.match_field.as_deref(), DEFAULT_MATCH_FIELD),
    };

    let outputs = [&fields.new, &fields.matches];
    let inputs = [&fields.raw, &fields.canonical];
    if fields.new == fields.matches || outputs.iter().any(|name| inputs.contains(name)) {
        return Err(ClientError::invalid_argument_for_command(
            &format!(
                "Output fields `{}` and `{}` must differ from each other and from the `{}`/`{}` input fields.",
                fields.new, fields.matches, fields.raw, fields.canonical
            ),
            Some(COMMAND),
        ));
    }

    Ok(fields)
}

fn resolve_output_path(
    explicit: Option<&str>,
    input_path: Option<&str>,
    format: RecordFormat,
) -> ClientResult<PathBuf> {
    let output = match (explicit, input_path) {
        (Some(path), _) => PathBuf::from(path),
        (None, Some(input)) => default_output_path(Path::new(input), format),
        (None, None) => {
            return Err(ClientError::invalid_argument_for_command(
                "Reading records from stdin requires `--output <path>`.",
                Some(COMMAND),
            ));
        }
    };

    if let Some(input) = input_path
        && Path::new(input) == output
    {
        return Err(ClientError::invalid_argument_for_command(
            "The output path must differ from the input path.",
            Some(COMMAND),
        ));
    }

    Ok(output)
}

/// `wines.csv` becomes `wines.canonical.csv` next to the input.
pub fn default_output_path(input: &Path, format: RecordFormat) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|value| value.to_string_lossy().to_string())
        .unwrap_or_else(|| INPUT_LABEL.to_string());
    input.with_file_name(format!("{stem}.canonical.{}", format.extension()))
}

fn add_output_headers(records: &mut RecordSet, fields: &FieldNames, saw_prior: bool) {
    records.add_header(&fields.new);
    if saw_prior {
        records.add_header(&fields.matches);
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use super::{CanonicalizeOptions, default_output_path, resolve_fields};
    use crate::records::RecordFormat;

    #[test]
    fn default_output_sits_next_to_the_input() {
        assert_eq!(
            default_output_path(Path::new("/tmp/feeds/wines.csv"), RecordFormat::Csv),
            PathBuf::from("/tmp/feeds/wines.canonical.csv")
        );
        assert_eq!(
            default_output_path(Path::new("wines"), RecordFormat::JsonArray),
            PathBuf::from("wines.canonical.json")
        );
    }

    #[test]
    fn blank_field_options_fall_back_to_defaults() {
        let fields = resolve_fields(&CanonicalizeOptions {
            raw_field: Some("  ".to_string()),
            ..CanonicalizeOptions::default()
        });
        assert!(fields.is_ok());
        if let Ok(fields) = fields {
            assert_eq!(fields.raw, "description");
            assert_eq!(fields.canonical, "canonical");
            assert_eq!(fields.new, "new_canonical");
            assert_eq!(fields.matches, "canonical_matches");
        }
    }

    #[test]
    fn output_field_may_not_overwrite_an_input_field() {
        let fields = resolve_fields(&CanonicalizeOptions {
            new_field: Some("description".to_string()),
            ..CanonicalizeOptions::default()
        });
        assert!(fields.is_err());
    }
}
