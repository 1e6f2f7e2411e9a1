//! HTML mirror of a CSV table

use std::fs;
use std::path::Path;

use tracing::debug;

use super::Table;
use crate::Result;

/// Regenerate `html_path` from the CSV file at `csv_path`.
///
/// # Errors
///
/// Returns [`crate::Error::MissingRegistry`] if the CSV file does not exist,
/// [`crate::Error::MalformedRegistry`] if it is empty or ragged, and IO errors
/// from writing the HTML file.
pub fn refresh_mirror(csv_path: &Path, html_path: &Path) -> Result<()> {
    let table = Table::read(csv_path)?;
    fs::write(html_path, render_html(&table))?;
    debug!(
        csv = %csv_path.display(),
        html = %html_path.display(),
        rows = table.rows.len(),
        "refreshed registry mirror"
    );
    Ok(())
}

/// Standalone entry point for reporting code that keeps its own CSV files.
///
/// # Errors
///
/// See [`refresh_mirror`].
pub fn csv_to_html(csv_path: &Path, html_path: &Path) -> Result<()> {
    refresh_mirror(csv_path, html_path)
}

/// Render a table as an HTML `<table>`: one header row, one row per record,
/// columns in file order, no index column.
#[must_use]
pub fn render_html(table: &Table) -> String {
    let mut html = String::from("<table border=\"1\" class=\"dataframe\">\n");
    html.push_str("  <thead>\n    <tr style=\"text-align: right;\">\n");
    for column in &table.columns {
        push_cell(&mut html, "th", column);
    }
    html.push_str("    </tr>\n  </thead>\n  <tbody>\n");
    for row in &table.rows {
        html.push_str("    <tr>\n");
        for cell in row {
            push_cell(&mut html, "td", cell);
        }
        html.push_str("    </tr>\n");
    }
    html.push_str("  </tbody>\n</table>\n");
    html
}

fn push_cell(html: &mut String, tag: &str, text: &str) {
    html.push_str(&format!("      <{tag}>{}</{tag}>\n", escape(text)));
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}
