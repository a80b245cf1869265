use std::cmp;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Align {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy)]
pub struct Column<'a> {
    pub name: &'a str,
    pub align: Align,
}

const INDENT: usize = 2;
const COLUMN_GAP: usize = 2;
const MIN_WRAP_WIDTH: usize = 12;

pub fn terminal_width() -> usize {
    let from_env = std::env::var("COLUMNS")
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
        .unwrap_or(120);
    cmp::max(from_env, 40)
}

pub fn key_value_rows(entries: &[(&str, String)], indent: usize) -> Vec<String> {
    let label_width = entries
        .iter()
        .map(|(label, _)| label.len())
        .max()
        .unwrap_or(0);
    let padding = " ".repeat(indent);

    entries
        .iter()
        .map(|(label, value)| format!("{padding}{label:<label_width$}  {value}"))
        .collect()
}

/// Lays rows out as a table whose last column wraps to fit `max_width`.
///
/// When the leading columns alone leave too little room for the last one,
/// every row is rendered as a labelled block instead.
pub fn render_table_or_blocks(
    columns: &[Column<'_>],
    rows: &[Vec<String>],
    max_width: usize,
    block_label: &str,
) -> Vec<String> {
    let Some((last, leading)) = columns.split_last() else {
        return Vec::new();
    };

    let mut widths = columns
        .iter()
        .map(|column| column.name.chars().count())
        .collect::<Vec<usize>>();
    for row in rows {
        for (slot, value) in widths.iter_mut().zip(row) {
            *slot = cmp::max(*slot, value.chars().count());
        }
    }

    let leading_total = widths[..leading.len()].iter().sum::<usize>() + COLUMN_GAP * leading.len();
    let remaining = max_width.saturating_sub(INDENT + leading_total);
    let floor = cmp::max(MIN_WRAP_WIDTH, last.name.chars().count());
    if remaining < floor {
        return render_blocks(columns, rows, block_label);
    }
    if let Some(last_width) = widths.last_mut() {
        *last_width = cmp::min(*last_width, remaining);
    }

    let header = columns
        .iter()
        .map(|column| column.name.to_string())
        .collect::<Vec<String>>();
    let mut output = vec![format_row(columns, &header, &widths)];

    let last_index = leading.len();
    for row in rows {
        let wrapped = wrap_text(
            row.get(last_index).map(String::as_str).unwrap_or(""),
            widths[last_index],
        );
        for (line_index, chunk) in wrapped.into_iter().enumerate() {
            let mut cells = if line_index == 0 {
                row.iter().take(last_index).cloned().collect::<Vec<String>>()
            } else {
                vec![String::new(); last_index]
            };
            cells.resize(last_index, String::new());
            cells.push(chunk);
            output.push(format_row(columns, &cells, &widths));
        }
    }

    output
}

fn format_row(columns: &[Column<'_>], cells: &[String], widths: &[usize]) -> String {
    let pieces = columns
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(index, (column, width))| {
            let value = cells.get(index).map(String::as_str).unwrap_or("");
            match column.align {
                Align::Left => format!("{value:<width$}"),
                Align::Right => format!("{value:>width$}"),
            }
        })
        .collect::<Vec<String>>();

    let line = format!("{}{}", " ".repeat(INDENT), pieces.join("  "));
    line.trim_end().to_string()
}

/// Breaks on whitespace; a single word longer than `width` is split by
/// characters.
fn wrap_text(value: &str, width: usize) -> Vec<String> {
    if width == 0 || value.chars().count() <= width {
        return vec![value.to_string()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    for word in value.split_whitespace() {
        let current_len = current.chars().count();
        let word_len = word.chars().count();
        if current_len > 0 && current_len + 1 + word_len <= width {
            current.push(' ');
            current.push_str(word);
            continue;
        }
        if current_len > 0 {
            lines.push(std::mem::take(&mut current));
        }
        if word_len <= width {
            current.push_str(word);
        } else {
            let chars = word.chars().collect::<Vec<char>>();
            for chunk in chars.chunks(width) {
                lines.push(chunk.iter().collect());
            }
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

fn render_blocks(columns: &[Column<'_>], rows: &[Vec<String>], block_label: &str) -> Vec<String> {
    let labels = columns
        .iter()
        .map(|column| format!("{}:", column.name))
        .collect::<Vec<String>>();
    let label_width = labels.iter().map(String::len).max().unwrap_or(0);

    let mut output = Vec::new();
    for (row_index, row) in rows.iter().enumerate() {
        if row_index > 0 {
            output.push(String::new());
        }
        output.push(format!("  {block_label} {}:", row_index + 1));
        for (label, value) in labels.iter().zip(row) {
            output.push(format!("    {label:<label_width$}  {value}"));
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::{Align, Column, key_value_rows, render_table_or_blocks, wrap_text};

    const COLUMNS: [Column<'static>; 2] = [
        Column {
            name: "Row",
            align: Align::Right,
        },
        Column {
            name: "Raw description",
            align: Align::Left,
        },
    ];

    #[test]
    fn key_value_rows_align_labels() {
        let rows = key_value_rows(
            &[
                ("Records read:", "4".to_string()),
                ("Skipped:", "1".to_string()),
            ],
            2,
        );

        assert_eq!(rows[0], "  Records read:  4");
        assert_eq!(rows[1], "  Skipped:       1");
    }

    #[test]
    fn table_aligns_columns_when_width_is_sufficient() {
        let rows = vec![
            vec!["3".to_string(), "Mystery Cellars Merlot 2015".to_string()],
            vec!["12".to_string(), "Nobody Lot 4".to_string()],
        ];

        let rendered = render_table_or_blocks(&COLUMNS, &rows, 80, "Record");
        assert_eq!(rendered[0], "  Row  Raw description");
        assert_eq!(rendered[1], "    3  Mystery Cellars Merlot 2015");
        assert_eq!(rendered[2], "   12  Nobody Lot 4");
    }

    #[test]
    fn last_column_wraps_without_truncating() {
        let rows = vec![vec![
            "3".to_string(),
            "Silver Oak Alexander Valley Cabernet Sauvignon 2015".to_string(),
        ]];

        let rendered = render_table_or_blocks(&COLUMNS, &rows, 30, "Record");
        assert!(rendered.len() > 2);
        assert!(rendered[1].starts_with("    3  Silver Oak"));
        assert!(rendered.iter().any(|line| line.contains("2015")));
        assert!(rendered.iter().all(|line| line.chars().count() <= 30));
    }

    #[test]
    fn narrow_width_falls_back_to_blocks() {
        let rows = vec![vec!["3".to_string(), "Mystery Merlot".to_string()]];

        let rendered = render_table_or_blocks(&COLUMNS, &rows, 16, "Record");
        assert_eq!(rendered[0], "  Record 1:");
        assert_eq!(rendered[1], "    Row:              3");
        assert_eq!(rendered[2], "    Raw description:  Mystery Merlot");
    }

    #[test]
    fn wrap_text_splits_long_words_by_character() {
        let lines = wrap_text("Château-Ducru-Beaucaillou", 10);
        assert_eq!(
            lines,
            vec![
                "Château-Du".to_string(),
                "cru-Beauca".to_string(),
                "illou".to_string()
            ]
        );
    }
}
