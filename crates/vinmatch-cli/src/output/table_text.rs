use std::io;

use serde_json::Value;

use super::canonicalize_text::registry_label;
use super::format::{self, Align, Column};

pub fn render_lookup_table(data: &Value) -> io::Result<String> {
    let buckets = data
        .get("buckets")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("table output requires buckets"))?;

    let filter = data.get("winery_filter").and_then(Value::as_str);
    if buckets.is_empty() {
        let mut lines = match filter {
            Some(name) => vec![format!("No master descriptions were filed under {name}.")],
            None => vec!["The lookup table is empty.".to_string()],
        };
        lines.push(String::new());
        lines.push("What to do next:".to_string());
        lines.push(
            "  1. Check that the master file's `canonical` column holds known descriptions."
                .to_string(),
        );
        lines.push("  2. Run `vinmatch registry` to confirm the winery is listed.".to_string());
        return Ok(lines.join("\n"));
    }

    let count_label = if buckets.len() == 1 {
        "1 bucket".to_string()
    } else {
        format!("{} buckets", buckets.len())
    };
    let mut lines = match filter {
        Some(name) => vec![format!("Lookup table for {name}: {count_label}.")],
        None => vec![format!("Lookup table: {count_label}.")],
    };
    lines.push(String::new());

    let columns = [
        Column {
            name: "Winery",
            align: Align::Left,
        },
        Column {
            name: "Category",
            align: Align::Left,
        },
        Column {
            name: "Phrase sets",
            align: Align::Left,
        },
    ];
    let rows = buckets
        .iter()
        .map(|bucket| {
            vec![
                text_field(bucket, "winery"),
                bucket
                    .get("category")
                    .and_then(Value::as_str)
                    .unwrap_or("(none)")
                    .to_string(),
                render_phrase_sets(bucket.get("phrase_sets")),
            ]
        })
        .collect::<Vec<Vec<String>>>();
    lines.extend(format::render_table_or_blocks(
        &columns,
        &rows,
        format::terminal_width(),
        "Bucket",
    ));

    lines.push(String::new());
    lines.push(format!("Registry: {}", registry_label(data.get("registry"))));
    Ok(lines.join("\n"))
}

pub fn render_registry(data: &Value) -> io::Result<String> {
    let wineries = data
        .get("wineries")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("registry output requires wineries"))?;

    let mut lines = vec![format!(
        "Active registry: {}",
        registry_label(data.get("source"))
    )];
    if let Some(home) = data
        .get("source")
        .and_then(|source| source.get("home"))
        .and_then(Value::as_str)
    {
        lines.push(format!("Home: {home}"));
    }

    lines.push(String::new());
    lines.push("Counts:".to_string());
    let counts = data
        .get("counts")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();
    let count = |key: &str| {
        counts
            .get(key)
            .and_then(Value::as_u64)
            .unwrap_or(0)
            .to_string()
    };
    lines.extend(format::key_value_rows(
        &[
            ("Wineries:", count("wineries")),
            ("Ignore category:", count("ignore_category_wineries")),
            ("Named products:", count("named_product_wineries")),
            ("Spirits:", count("spirit_wineries")),
            ("Grapes:", count("grapes")),
            ("Sizes:", count("sizes")),
            ("Qualifiers:", count("qualifiers")),
            ("Forced tags:", count("forced_tags")),
        ],
        2,
    ));

    lines.push(String::new());
    let columns = [
        Column {
            name: "Winery",
            align: Align::Left,
        },
        Column {
            name: "Category rule",
            align: Align::Left,
        },
        Column {
            name: "Abbrev.",
            align: Align::Right,
        },
        Column {
            name: "Priority",
            align: Align::Left,
        },
        Column {
            name: "Forced tag",
            align: Align::Left,
        },
    ];
    let rows = wineries
        .iter()
        .map(|winery| {
            let abbreviations = winery
                .get("abbreviations")
                .and_then(Value::as_array)
                .map(Vec::len)
                .unwrap_or(0);
            vec![
                text_field(winery, "name"),
                text_field(winery, "category_kind"),
                abbreviations.to_string(),
                join_strings(winery.get("priority"), ", "),
                winery
                    .get("forced_tag")
                    .and_then(Value::as_str)
                    .unwrap_or("")
                    .to_string(),
            ]
        })
        .collect::<Vec<Vec<String>>>();
    lines.extend(format::render_table_or_blocks(
        &columns,
        &rows,
        format::terminal_width(),
        "Winery",
    ));

    let marker = data
        .get("non_wine_marker")
        .and_then(Value::as_str)
        .unwrap_or("~");
    lines.push(String::new());
    lines.push(format!(
        "Names starting with `{marker}` are not wine. Their descriptions never carry a vintage."
    ));
    Ok(lines.join("\n"))
}

fn render_phrase_sets(value: Option<&Value>) -> String {
    let Some(sets) = value.and_then(Value::as_array) else {
        return String::new();
    };
    sets.iter()
        .map(|set| join_strings(Some(set), " "))
        .collect::<Vec<String>>()
        .join("; ")
}

fn join_strings(value: Option<&Value>, separator: &str) -> String {
    value
        .and_then(Value::as_array)
        .map(|values| {
            values
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<&str>>()
                .join(separator)
        })
        .unwrap_or_default()
}

fn text_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string()
}
