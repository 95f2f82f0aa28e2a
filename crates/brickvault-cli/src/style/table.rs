//! Table formatting using comfy-table.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

fn base_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    if super::no_color() {
        table.force_no_tty();
    }
    table
}

fn header_cell(text: &str) -> Cell {
    if super::no_color() {
        Cell::new(text)
    } else {
        Cell::new(text).add_attribute(Attribute::Bold).fg(Color::Cyan)
    }
}

/// Cell showing an allow/deny outcome.
pub fn verdict_cell(allowed: bool) -> Cell {
    let (text, color) = if allowed {
        ("allow", Color::Green)
    } else {
        ("deny", Color::Red)
    };
    let cell = Cell::new(text).set_alignment(CellAlignment::Center);
    if super::no_color() {
        cell
    } else {
        cell.fg(color)
    }
}

/// A table with a bold header row and arbitrary cells.
pub fn grid_table(columns: &[String], rows: Vec<Vec<Cell>>) -> Table {
    let mut table = base_table();
    table.set_header(columns.iter().map(|c| header_cell(c)).collect::<Vec<_>>());
    for row in rows {
        table.add_row(row);
    }
    table
}

/// Two-column key/value table.
pub fn info_table(entries: &[(&str, String)]) -> Table {
    let mut table = base_table();
    for (key, value) in entries {
        let key_cell = if super::no_color() {
            Cell::new(key)
        } else {
            Cell::new(key).fg(Color::DarkGrey)
        };
        table.add_row(vec![key_cell, Cell::new(value)]);
    }
    table
}

pub fn print_info_table(entries: &[(&str, String)]) {
    println!("{}", info_table(entries));
}
