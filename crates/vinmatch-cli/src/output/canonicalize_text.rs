use std::io;

use chrono::{DateTime, Local};
use serde_json::Value;

use super::format::{self, Align, Column};

pub fn render_canonicalize_run(data: &Value) -> io::Result<String> {
    let summary = data
        .get("summary")
        .and_then(Value::as_object)
        .ok_or_else(|| io::Error::other("canonicalize output requires summary"))?;

    let mut lines = vec!["Canonicalization completed successfully.".to_string()];
    lines.push(String::new());
    lines.push("Summary:".to_string());

    let run_id = data
        .get("run_id")
        .and_then(Value::as_str)
        .unwrap_or("unknown");
    let entries = vec![
        ("Run ID:", run_id.to_string()),
        ("Started (local):", format_started_local(data)),
        ("Records read:", get_u64(summary, "records_read").to_string()),
        ("Canonicalized:", get_u64(summary, "canonicalized").to_string()),
        ("Skipped:", get_u64(summary, "skipped").to_string()),
        ("Changed:", get_u64(summary, "changed").to_string()),
    ];
    lines.extend(format::key_value_rows(&entries, 2));

    let matches = get_u64(summary, "matches_prior");
    let differs = get_u64(summary, "differs_from_prior");
    if matches + differs > 0 {
        lines.push(String::new());
        lines.push("Prior canonical values:".to_string());
        lines.extend(format::key_value_rows(
            &[
                ("Match:", matches.to_string()),
                ("Differ:", differs.to_string()),
            ],
            2,
        ));
    }

    lines.push(String::new());
    lines.push("Files:".to_string());
    lines.extend(format::key_value_rows(
        &[
            ("Input:", source_label(data.get("input"))),
            ("Master:", source_label(data.get("master"))),
            (
                "Output:",
                data.get("output_path")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown")
                    .to_string(),
            ),
            ("Registry:", registry_label(data.get("registry"))),
        ],
        2,
    ));

    lines.push(String::new());
    lines.extend(render_build_summary(data.get("build")));

    let skipped = render_skipped_preview(data);
    if !skipped.is_empty() {
        lines.push(String::new());
        lines.extend(skipped);
    }

    Ok(lines.join("\n"))
}

pub fn render_describe(data: &Value) -> io::Result<String> {
    let text = data
        .get("text")
        .and_then(Value::as_str)
        .ok_or_else(|| io::Error::other("describe output requires text"))?;
    let matched = data
        .get("matched")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    let mut lines = vec![format!("Input: {text}"), String::new()];
    if !matched {
        lines.push("No known winery was found in this description.".to_string());
        lines.push(String::new());
        lines.push("What to do next:".to_string());
        lines.push("  1. Run `vinmatch registry` to list the wineries vinmatch knows.".to_string());
        lines.push(
            "  2. Pass `--registry <path>` with a registry that covers this winery.".to_string(),
        );
        return Ok(lines.join("\n"));
    }

    let description = data
        .get("description")
        .and_then(Value::as_str)
        .unwrap_or("");
    lines.push(format!("Canonical: {description}"));
    lines.push(String::new());
    lines.push("Parts:".to_string());

    let parts = data.get("parts").unwrap_or(&Value::Null);
    let phrases = parts
        .get("phrases")
        .and_then(Value::as_array)
        .map(|values| {
            values
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<&str>>()
                .join(" ")
        })
        .unwrap_or_default();
    let category_status = data
        .get("category_status")
        .and_then(Value::as_str)
        .unwrap_or("unknown");
    let case_lot = parts
        .get("case_lot")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    let entries = vec![
        ("Winery:", optional_text(parts.get("winery"))),
        (
            "Category:",
            format!("{} ({category_status})", optional_text(parts.get("category"))),
        ),
        ("Phrases:", or_dash(phrases)),
        ("Vintage:", optional_text(parts.get("vintage"))),
        ("Size:", optional_text(parts.get("size"))),
        ("Qualifier:", optional_text(parts.get("qualifier"))),
        ("Case lot:", if case_lot { "yes" } else { "no" }.to_string()),
    ];
    lines.extend(format::key_value_rows(&entries, 2));

    lines.push(String::new());
    lines.extend(render_build_summary(data.get("build")));
    Ok(lines.join("\n"))
}

fn render_build_summary(build: Option<&Value>) -> Vec<String> {
    let Some(build) = build.and_then(Value::as_object) else {
        return Vec::new();
    };

    let mut lines = vec!["Lookup table:".to_string()];
    lines.extend(format::key_value_rows(
        &[
            ("Masters read:", get_u64(build, "masters_read").to_string()),
            ("Masters used:", get_u64(build, "masters_used").to_string()),
            ("Masters skipped:", get_u64(build, "masters_skipped").to_string()),
            ("Buckets:", get_u64(build, "buckets").to_string()),
            ("Phrase sets:", get_u64(build, "phrase_sets").to_string()),
        ],
        2,
    ));
    lines
}

fn render_skipped_preview(data: &Value) -> Vec<String> {
    let Some(preview) = data.get("skipped_preview") else {
        return Vec::new();
    };
    let rows = preview
        .get("rows")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    if rows.is_empty() {
        return Vec::new();
    }

    let columns = [
        Column {
            name: "Row",
            align: Align::Right,
        },
        Column {
            name: "Raw description",
            align: Align::Left,
        },
    ];
    let table_rows = rows
        .iter()
        .map(|row| {
            vec![
                row.get("row")
                    .and_then(Value::as_u64)
                    .unwrap_or(0)
                    .to_string(),
                row.get("text")
                    .and_then(Value::as_str)
                    .unwrap_or("")
                    .to_string(),
            ]
        })
        .collect::<Vec<Vec<String>>>();

    let mut lines = vec!["Skipped records (no known winery):".to_string()];
    lines.extend(format::render_table_or_blocks(
        &columns,
        &table_rows,
        format::terminal_width(),
        "Record",
    ));

    let truncated = preview
        .get("truncated")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    if truncated {
        let total = data
            .get("summary")
            .and_then(|summary| summary.get("skipped"))
            .and_then(Value::as_u64)
            .unwrap_or(0);
        lines.push(format!(
            "  Showing the first {} of {total} skipped records.",
            rows.len()
        ));
    }
    lines
}

fn source_label(source: Option<&Value>) -> String {
    let Some(source) = source else {
        return "unknown".to_string();
    };
    let format = source
        .get("format")
        .and_then(Value::as_str)
        .unwrap_or("unknown");
    let records = source
        .get("records")
        .and_then(Value::as_u64)
        .unwrap_or(0);
    let location = source
        .get("path")
        .and_then(Value::as_str)
        .unwrap_or("stdin");
    format!("{location} ({format}, {records} records)")
}

pub(super) fn registry_label(registry: Option<&Value>) -> String {
    let Some(registry) = registry else {
        return "unknown".to_string();
    };
    let kind = registry
        .get("kind")
        .and_then(Value::as_str)
        .unwrap_or("unknown");
    match registry.get("path").and_then(Value::as_str) {
        Some(path) => format!("{kind} ({path})"),
        None => kind.to_string(),
    }
}

fn format_started_local(data: &Value) -> String {
    let Some(started_at) = data.get("started_at").and_then(Value::as_str) else {
        return "unknown".to_string();
    };
    match DateTime::parse_from_rfc3339(started_at) {
        Ok(parsed) => parsed
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
        Err(_) => started_at.to_string(),
    }
}

fn optional_text(value: Option<&Value>) -> String {
    or_dash(value.and_then(Value::as_str).unwrap_or("").to_string())
}

fn or_dash(value: String) -> String {
    if value.is_empty() {
        "-".to_string()
    } else {
        value
    }
}

fn get_u64(map: &serde_json::Map<String, Value>, key: &str) -> u64 {
    map.get(key).and_then(Value::as_u64).unwrap_or(0)
}
