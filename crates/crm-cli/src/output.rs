//! Output formatting helpers.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use crm_core::{Notice, NoticeLevel, Notifier, Record, ViewMode, ViewPreferences};

/// Widest a table cell may grow before it is truncated.
const MAX_CELL_WIDTH: usize = 40;

/// Print a success message.
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print an error message.
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a labeled field.
pub fn field(label: &str, value: &str) {
    println!("{}: {}", label.dimmed(), value);
}

/// Print a value as compact JSON.
pub fn json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string(value)?;
    println!("{}", json);
    Ok(())
}

/// Print a value as pretty-printed JSON.
pub fn json_pretty<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

/// Prints success notices as they arrive.
///
/// Error notices only go to the debug log: a failed command already
/// reports the underlying error when it exits.
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Success => success(&notice.message),
            NoticeLevel::Error => tracing::debug!(message = %notice.message, "error notice"),
        }
    }
}

/// Render records the way `prefs` asks for.
pub fn records(records: &[Record], prefs: &ViewPreferences) {
    let rendered = match prefs.view_mode() {
        ViewMode::Table => render_table(records, prefs),
        ViewMode::Grid => render_grid(records, prefs),
    };
    for line in rendered {
        println!("{}", line);
    }
}

fn render_table(records: &[Record], prefs: &ViewPreferences) -> Vec<String> {
    let columns = prefs.visible_columns();
    let gap = " ".repeat(prefs.density().cell_gap());

    let cells: Vec<Vec<String>> = records
        .iter()
        .map(|record| {
            columns
                .iter()
                .map(|c| truncate(&record.display_value(c.key), MAX_CELL_WIDTH))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, c)| {
            cells
                .iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(c.label.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let header = columns
        .iter()
        .zip(&widths)
        .map(|(c, w)| pad(c.label, *w))
        .collect::<Vec<_>>()
        .join(&gap);

    let mut lines = vec![header.trim_end().bold().to_string()];
    for row in &cells {
        for _ in 0..prefs.density().row_gap() {
            lines.push(String::new());
        }
        let line = row
            .iter()
            .zip(&widths)
            .map(|(cell, w)| pad(cell, *w))
            .collect::<Vec<_>>()
            .join(&gap);
        lines.push(line.trim_end().to_string());
    }
    lines
}

fn render_grid(records: &[Record], prefs: &ViewPreferences) -> Vec<String> {
    let columns = prefs.visible_columns();
    let label_width = columns
        .iter()
        .map(|c| c.label.chars().count())
        .max()
        .unwrap_or(0);
    let indent = " ".repeat(prefs.density().cell_gap());

    let mut lines = Vec::new();
    for (i, record) in records.iter().enumerate() {
        if i > 0 {
            for _ in 0..=prefs.density().row_gap() {
                lines.push(String::new());
            }
        }

        let title = columns
            .first()
            .map(|c| record.display_value(c.key))
            .unwrap_or_default();
        lines.push(title.bold().to_string());

        for column in columns.iter().skip(1) {
            lines.push(format!(
                "{}{} {}",
                indent,
                pad(&format!("{}:", column.label), label_width + 1).dimmed(),
                record.display_value(column.key)
            ));
        }
    }
    lines
}

fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    format!("{}{}", text, " ".repeat(width.saturating_sub(len)))
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crm_core::{Density, RecordType};
    use serde_json::json;

    fn lead(id: i64, name: &str, company: &str) -> Record {
        Record::from_value(json!({"id": id, "full_name": name, "company": company})).unwrap()
    }

    fn prefs(density: Density) -> ViewPreferences {
        colored::control::set_override(false);
        let mut prefs = ViewPreferences::for_record_type(RecordType::Lead);
        assert!(prefs.set_visible_columns(["full_name", "company"]));
        prefs.set_density(density);
        prefs
    }

    #[test]
    fn table_aligns_columns() {
        let rows = [lead(1, "Ada Lovelace", "Analytical"), lead(2, "Bo", "X")];
        let lines = render_table(&rows, &prefs(Density::Compact));

        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("Ada Lovelace Analytical"));
        assert!(lines[2].starts_with("Bo           X"));
    }

    #[test]
    fn spacious_density_separates_rows() {
        let rows = [lead(1, "A", "B"), lead(2, "C", "D")];
        let lines = render_table(&rows, &prefs(Density::Spacious));

        assert_eq!(lines.len(), 5);
        assert!(lines[1].is_empty());
        assert!(lines[2].starts_with("A    "));
    }

    #[test]
    fn grid_renders_cards() {
        let rows = [lead(1, "Ada", "Analytical"), lead(2, "Bo", "X")];
        let mut prefs = prefs(Density::Compact);
        prefs.set_view_mode(ViewMode::Grid);
        let lines = render_grid(&rows, &prefs);

        assert_eq!(lines[0], "Ada");
        assert!(lines[1].contains("Company:"));
        assert!(lines[1].ends_with("Analytical"));
        assert!(lines[2].is_empty());
        assert_eq!(lines[3], "Bo");
    }

    #[test]
    fn long_cells_are_truncated() {
        let text = "x".repeat(60);
        let out = truncate(&text, 10);
        assert_eq!(out.chars().count(), 10);
        assert!(out.ends_with('…'));
    }
}
