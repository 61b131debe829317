//! End-of-run tables printed to stdout.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Table};

use scheda_cli::pipeline::SheetInfo;
use scheda_cli::types::RunResult;
use scheda_model::SheetKind;

pub fn print_summary(result: &RunResult) {
    if result.is_empty() {
        println!("No character sheets found; nothing generated.");
        return;
    }
    if result.dry_run {
        println!("Dry run: nothing written, versions untouched.");
    } else {
        println!("Output: {}", result.output_dir.display());
        if let Some(path) = &result.manifest {
            println!("Manifest: {}", path.display());
        }
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Sheet"),
        header_cell("Version"),
        header_cell("Kind"),
        header_cell("Applied"),
        header_cell("Skipped"),
        header_cell("Notes"),
    ]);
    apply_table_style(&mut table);
    for column in [3, 4, 5] {
        align_column(&mut table, column, CellAlignment::Right);
    }

    let mut total_applied = 0usize;
    let mut total_skipped = 0usize;
    for sheet in &result.sheets {
        total_applied += sheet.rows_applied;
        total_skipped += sheet.rows_skipped;
        let mut skipped_cell = Cell::new(sheet.rows_skipped.to_string());
        if sheet.rows_skipped > 0 {
            skipped_cell = skipped_cell.fg(comfy_table::Color::Red);
        }
        table.add_row(vec![
            Cell::new(&sheet.name),
            Cell::new(&sheet.version),
            Cell::new(if sheet.handout { "handout" } else { "character" }),
            Cell::new(sheet.rows_applied.to_string()),
            skipped_cell,
            Cell::new(sheet.notes.to_string()),
        ]);
    }
    table.add_row(vec![
        Cell::new("Total").add_attribute(Attribute::Bold),
        Cell::new(""),
        Cell::new(""),
        Cell::new(total_applied.to_string()).add_attribute(Attribute::Bold),
        Cell::new(total_skipped.to_string()).add_attribute(Attribute::Bold),
        Cell::new(""),
    ]);
    println!("{table}");
}

pub fn print_sheets(sheets: &[SheetInfo]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Sheet"),
        header_cell("Kind"),
        header_cell("Rows"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for sheet in sheets {
        let kind = match sheet.kind {
            SheetKind::Config => "config",
            SheetKind::Handout => "handout",
            SheetKind::Character => "character",
        };
        table.add_row(vec![
            Cell::new(&sheet.name),
            Cell::new(kind),
            Cell::new(sheet.rows.to_string()),
        ]);
    }
    println!("{table}");
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label).add_attribute(Attribute::Bold)
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}
