//! Terminal tables for reports and settings.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use qpcr_report::{ChannelReportRow, ThresholdReportRow, WellReportRow};

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

pub fn wells_table(rows: &[WellReportRow]) -> Table {
    let mut table = styled_table(&["Well", "Channel", "CqTh", "Cq2d", "Min", "Max"]);
    for row in rows {
        table.add_row(vec![
            Cell::new(&row.well).add_attribute(Attribute::Bold),
            Cell::new(row.channel),
            Cell::new(format!("{:.2}", row.cq_threshold)),
            row.cq_second_derivative
                .map_or_else(|| Cell::new("-").fg(Color::DarkGrey), Cell::new),
            optional_cell(row.min, 2),
            optional_cell(row.max, 2),
        ]);
    }
    for index in 1..=5 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    table
}

pub fn channels_table(rows: &[ChannelReportRow]) -> Table {
    let mut table = styled_table(&["Channel", "Wells", "Name"]);
    for row in rows {
        table.add_row(vec![
            Cell::new(row.channel),
            Cell::new(row.wells),
            Cell::new(&row.name),
        ]);
    }
    align_column(&mut table, 1, CellAlignment::Right);
    table
}

pub fn thresholds_table(rows: &[ThresholdReportRow]) -> Table {
    let mut table = styled_table(&["Channel", "Thresh", "Min", "Max"]);
    for row in rows {
        table.add_row(vec![
            Cell::new(row.channel),
            Cell::new(format!("{:.1}", row.threshold)),
            Cell::new(format!("{:.1}", row.min)),
            Cell::new(format!("{:.1}", row.max)),
        ]);
    }
    for index in 1..=3 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    table
}

pub fn settings_table(entries: &[(String, String)]) -> Table {
    let mut table = styled_table(&["Setting", "Value"]);
    for (key, value) in entries {
        table.add_row(vec![Cell::new(key), Cell::new(value)]);
    }
    table
}

fn styled_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.set_header(headers.iter().copied().map(header_cell));
    apply_table_style(&mut table);
    table
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn optional_cell(value: Option<f64>, precision: usize) -> Cell {
    match value {
        Some(value) => Cell::new(format!("{value:.precision$}")),
        None => Cell::new("-").fg(Color::DarkGrey),
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}
