use std::fmt::Display;
use std::path::Path;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use resi_map::{ColumnMatch, MappingResult, MappingStrategy};
use resi_model::{ImportRunStats, TargetField};
use resi_validate::ValidationReport;

/// Validation messages listed under the summary.
pub const MESSAGE_LIMIT: usize = 10;

pub fn print_fields() {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Field"),
        header_cell("Column"),
        header_cell("Required"),
        header_cell("Kind"),
        header_cell("Description"),
        header_cell("Examples"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Center);
    for (index, field) in TargetField::ALL.into_iter().enumerate() {
        let spec = field.spec();
        table.add_row(vec![
            Cell::new(index + 1),
            Cell::new(spec.id).fg(Color::Blue).add_attribute(Attribute::Bold),
            Cell::new(spec.column),
            if spec.required {
                Cell::new("✓").fg(Color::Green).add_attribute(Attribute::Bold)
            } else {
                dim_cell("-")
            },
            Cell::new(spec.kind.as_str()),
            Cell::new(spec.description),
            Cell::new(spec.examples.join(", ")),
        ]);
    }
    println!("{table}");
}

pub fn print_mapping(result: &MappingResult) {
    let strategy = match result.strategy {
        MappingStrategy::Rules => "rules",
        MappingStrategy::Assisted => "assist service",
        MappingStrategy::RulesFallback => "rules (assist service failed)",
    };
    println!("Column mapping ({strategy}):");
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Field"),
        header_cell("Score"),
        header_cell("Matched by"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for column in &result.columns {
        table.add_row(vec![
            Cell::new(&column.header),
            field_cell(column),
            score_cell(column),
            signal_cell(column),
        ]);
    }
    println!("{table}");

    for (field, headers) in result.mapping.duplicate_targets() {
        eprintln!(
            "warning: {} is fed by {}; the rightmost column wins",
            field,
            headers.join(", ")
        );
    }
}

pub fn print_validation(report: &ValidationReport, limit: usize) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Rows"),
        header_cell("Valid"),
        header_cell("Invalid"),
        header_cell("Errors"),
        header_cell("Warnings"),
    ]);
    apply_table_style(&mut table);
    for index in 0..5 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    table.add_row(vec![
        Cell::new(report.total()),
        count_cell(report.valid_count(), Color::Green),
        count_cell(report.invalid_count(), Color::Red),
        count_cell(report.error_count(), Color::Red),
        count_cell(report.warning_count(), Color::Yellow),
    ]);
    println!("{table}");
    print_messages(report, limit);
}

fn print_messages(report: &ValidationReport, limit: usize) {
    let messages = report.first_messages(limit);
    if messages.is_empty() {
        return;
    }
    println!("Validation errors (first {}):", messages.len());
    for message in &messages {
        println!("- {message}");
    }
    let remaining = report.error_count().saturating_sub(messages.len());
    if remaining > 0 {
        println!("  ... and {remaining} more");
    }
}

pub fn print_import_summary(stats: &ImportRunStats, report: &ValidationReport, error_log: Option<&Path>) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Import"), header_cell("Value")]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![Cell::new("Total rows"), Cell::new(stats.total + stats.skipped)]);
    table.add_row(vec![
        Cell::new("Imported"),
        count_cell(stats.success, Color::Green),
    ]);
    table.add_row(vec![Cell::new("Failed"), count_cell(stats.failed, Color::Red)]);
    table.add_row(vec![
        Cell::new("Skipped (invalid)"),
        count_cell(stats.skipped, Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("Duration"),
        Cell::new(format!("{:.1}s", stats.duration().as_secs_f64())),
    ]);
    table.add_row(vec![
        Cell::new("Throughput"),
        Cell::new(format!("{:.1} records/s", stats.throughput())),
    ]);
    println!("{table}");

    print_messages(report, MESSAGE_LIMIT);
    if let Some(path) = error_log {
        println!("Error log: {}", path.display());
    }
}

fn field_cell(column: &ColumnMatch) -> Cell {
    match column.field {
        Some(field) if field.is_required() => Cell::new(field)
            .fg(Color::Blue)
            .add_attribute(Attribute::Bold),
        Some(field) => Cell::new(field),
        None => dim_cell("(unmapped)"),
    }
}

fn score_cell(column: &ColumnMatch) -> Cell {
    if column.field.is_none() {
        return dim_cell("-");
    }
    let cell = Cell::new(format!("{:.2}", column.score));
    if column.score >= 0.9 {
        cell.fg(Color::Green)
    } else {
        cell.fg(Color::Yellow)
    }
}

fn signal_cell(column: &ColumnMatch) -> Cell {
    match (column.field, column.signal) {
        (Some(_), Some(signal)) => Cell::new(signal),
        (Some(_), None) => Cell::new("manual").fg(Color::Cyan),
        (None, _) => dim_cell("-"),
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: Display>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
