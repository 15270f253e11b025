//! Run summary rendering.

use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Table};

use crate::commands::CleanResult;

pub fn print_summary(result: &CleanResult) {
    println!("Input: {}", result.input.display());
    println!("Output: {}", result.output.display());
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![header_cell("Metric"), header_cell("Value")]);
    add_row(&mut table, "Rows written", result.rows.to_string());
    add_row(&mut table, "Columns", result.columns.to_string());
    add_row(&mut table, "Execution", result.execution.clone());
    add_row(&mut table, "Duration (ms)", result.duration_ms.to_string());
    println!("{table}");
}

fn header_cell(text: &str) -> Cell {
    Cell::new(text).add_attribute(Attribute::Bold)
}

fn add_row(table: &mut Table, metric: &str, value: String) {
    table.add_row(vec![
        Cell::new(metric),
        Cell::new(value).set_alignment(CellAlignment::Right),
    ]);
}
