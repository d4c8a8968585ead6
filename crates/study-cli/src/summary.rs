use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use study_cli::types::{RunReport, StateSummary};

pub fn print_summary(report: &RunReport) {
    println!("Study: {}", report.study);
    println!("Session: {}", report.identifier);
    if let Some(path) = &report.result_path {
        println!("Result: {}", path.display());
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("State"),
        header_cell("Objective"),
        header_cell("Input"),
        header_cell("Snapshots"),
        header_cell("Visits"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Center);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);

    for state in &report.states {
        table.add_row(vec![
            state_cell(state, report.final_state),
            Cell::new(&state.objective),
            flag_cell(state.input_required),
            match state.snapshots {
                Some(count) => Cell::new(count),
                None => dim_cell("-"),
            },
            count_cell(state.visits),
        ]);
    }
    println!("{table}");

    println!(
        "Commands: {}  Button: {} accepted, {} ignored",
        report.commands, report.pushes_accepted, report.pushes_ignored
    );
    if !report.published.is_empty() {
        let published: Vec<String> = report.published.iter().map(ToString::to_string).collect();
        println!("Published: {}", published.join(" -> "));
    }
    if !report.panel_text.is_empty() {
        println!("Panel: {}", report.panel_text);
    }
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
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

/// The final state is highlighted.
fn state_cell(state: &StateSummary, final_state: u32) -> Cell {
    if state.index == final_state {
        Cell::new(format!("> {}", state.index))
            .fg(Color::Green)
            .add_attribute(Attribute::Bold)
    } else {
        Cell::new(state.index).fg(Color::Blue)
    }
}

fn flag_cell(value: bool) -> Cell {
    if value {
        Cell::new("yes").fg(Color::Yellow)
    } else {
        dim_cell("no")
    }
}

fn count_cell(count: usize) -> Cell {
    if count > 0 {
        Cell::new(count).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
