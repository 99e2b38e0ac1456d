//! Report output rendering.

use comfy_table::{Cell, ContentArrangement, Table};
use hotel_core::RowSet;
use serde_json::{Map, Value as JsonValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

pub fn format_rows(rows: &RowSet, format: OutputFormat) -> String {
    match format {
        OutputFormat::Table => format_table(rows),
        OutputFormat::Json => format_json(rows),
    }
}

fn format_table(rows: &RowSet) -> String {
    let mut table = Table::new();
    table
        .set_content_arrangement(ContentArrangement::Dynamic)
        .load_preset(comfy_table::presets::UTF8_FULL)
        .apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS)
        .set_header(rows.columns.iter().map(Cell::new));

    for row in &rows.rows {
        table.add_row(row.iter().map(Cell::new));
    }

    let noun = if rows.len() == 1 { "row" } else { "rows" };
    format!("{table}\n({} {noun})", rows.len())
}

/// One JSON object per row, keyed by column name. Cells stay strings.
fn format_json(rows: &RowSet) -> String {
    let objects: Vec<JsonValue> = rows
        .rows
        .iter()
        .map(|row| {
            let object: Map<String, JsonValue> = rows
                .columns
                .iter()
                .zip(row)
                .map(|(column, cell)| (column.clone(), JsonValue::String(cell.clone())))
                .collect();
            JsonValue::Object(object)
        })
        .collect();

    serde_json::to_string_pretty(&objects).unwrap_or_else(|_| "[]".to_string())
}
