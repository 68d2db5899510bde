use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use dental_model::MetricValue;
use dental_render::{ChartFailure, Indicator, InteractiveView, Tab, WidgetContent};

use crate::types::ReportOutcome;

pub fn print_summary(outcome: &ReportOutcome) {
    println!("Data: {} ({} records)", outcome.data.display(), outcome.records);
    println!("Output: {}", outcome.output_dir.display());
    if let Some(path) = &outcome.csv {
        println!("Raw data: {}", path.display());
    }
    if let Some(document) = &outcome.pdf {
        println!(
            "Document: {} ({} pages)",
            document.path.display(),
            document.pages
        );
    }
    println!();
    print_kpi_table(&outcome.view.kpis);
    print_section_table(&outcome.view);
    print_warning_table(&outcome.view);
    print_failure_table(outcome.chart_failures());
}

/// Print every tab of the interactive view.
pub fn print_view(view: &InteractiveView) {
    println!("{}", view.title);
    println!("{}", view.kpi_strip());
    println!();
    print_kpi_table(&view.kpis);
    for tab in &view.tabs {
        print_tab(tab);
    }
    print_warning_table(view);
}

fn print_kpi_table(kpis: &[Indicator]) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Indicator"), header_cell("Value")]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for indicator in kpis {
        table.add_row(vec![
            Cell::new(&indicator.label),
            value_cell(&indicator.value, indicator.raw),
        ]);
    }
    println!("{table}");
}

fn print_section_table(view: &InteractiveView) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Section"),
        header_cell("Metrics"),
        header_cell("Charts"),
        header_cell("Ready"),
        header_cell("Failed"),
        header_cell("Warnings"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 1..6 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    let mut total_charts = 0usize;
    let mut total_failed = 0usize;
    for tab in &view.tabs {
        let ready = tab.widgets.iter().filter(|widget| widget.is_ready()).count();
        let failed = tab.widgets.len() - ready;
        total_charts += tab.widgets.len();
        total_failed += failed;
        table.add_row(vec![
            Cell::new(&tab.title).add_attribute(Attribute::Bold),
            Cell::new(tab.indicators.len()),
            Cell::new(tab.widgets.len()),
            Cell::new(ready),
            count_cell(failed, Color::Red),
            count_cell(tab.warnings.len(), Color::Yellow),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        Cell::new(total_charts).add_attribute(Attribute::Bold),
        Cell::new(total_charts - total_failed).add_attribute(Attribute::Bold),
        count_cell(total_failed, Color::Red),
        count_cell(view.warnings.len(), Color::Yellow),
    ]);
    println!("{table}");
}

fn print_tab(tab: &Tab) {
    println!();
    println!("{}", tab.title);
    for control in &tab.controls {
        println!("  {}: {} ({})", control.label, control.selected, control.choices.join(" / "));
    }
    if !tab.indicators.is_empty() {
        let mut table = Table::new();
        table.set_header(vec![header_cell("Metric"), header_cell("Value")]);
        apply_table_style(&mut table);
        align_column(&mut table, 1, CellAlignment::Right);
        for indicator in &tab.indicators {
            table.add_row(vec![
                Cell::new(&indicator.label),
                value_cell(&indicator.value, indicator.raw),
            ]);
        }
        println!("{table}");
    }
    if !tab.widgets.is_empty() {
        let mut table = Table::new();
        table.set_header(vec![header_cell("Chart"), header_cell("Kind"), header_cell("Status")]);
        apply_table_style(&mut table);
        align_column(&mut table, 1, CellAlignment::Center);
        for widget in &tab.widgets {
            let status = match &widget.content {
                WidgetContent::Ready { .. } => Cell::new("ready").fg(Color::Green),
                WidgetContent::Failed { message } => Cell::new(message).fg(Color::Red),
            };
            table.add_row(vec![
                Cell::new(&widget.spec.title),
                dim_cell(widget.spec.kind.as_str()),
                status,
            ]);
        }
        println!("{table}");
    }
    if let Some(preview) = &tab.table {
        println!("{} rows, {} columns", preview.total_rows, preview.columns.len());
    }
}

fn print_warning_table(view: &InteractiveView) {
    let mut warnings: Vec<(&str, &str)> = view
        .warnings
        .iter()
        .map(|warning| ("Key indicators", warning.as_str()))
        .collect();
    for tab in &view.tabs {
        warnings.extend(
            tab.warnings
                .iter()
                .map(|warning| (tab.title.as_str(), warning.as_str())),
        );
    }
    if warnings.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![header_cell("Section"), header_cell("Warning")]);
    apply_table_style(&mut table);
    for (section, message) in warnings {
        table.add_row(vec![dim_cell(section), Cell::new(message).fg(Color::Yellow)]);
    }
    println!("{table}");
}

fn print_failure_table(failures: &[ChartFailure]) {
    if failures.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Section"),
        header_cell("Chart"),
        header_cell("Placeholder reason"),
    ]);
    apply_table_style(&mut table);
    for failure in failures {
        table.add_row(vec![
            dim_cell(failure.section.title()),
            Cell::new(&failure.chart_id),
            Cell::new(&failure.failure).fg(Color::Red),
        ]);
    }
    println!("{table}");
}

fn value_cell(value: &str, raw: MetricValue) -> Cell {
    if raw.is_defined() {
        Cell::new(value).add_attribute(Attribute::Bold)
    } else {
        Cell::new(value).fg(Color::Yellow)
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

pub fn apply_table_style(table: &mut Table) {
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
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(120);
    if table.column_count() >= 6 {
        table.set_constraints(vec![
            ColumnConstraint::UpperBoundary(Width::Percentage(40)),
            ColumnConstraint::LowerBoundary(Width::Fixed(7)),
            ColumnConstraint::LowerBoundary(Width::Fixed(6)),
            ColumnConstraint::LowerBoundary(Width::Fixed(5)),
            ColumnConstraint::LowerBoundary(Width::Fixed(6)),
            ColumnConstraint::LowerBoundary(Width::Fixed(8)),
        ]);
    }
}

pub fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

pub fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
