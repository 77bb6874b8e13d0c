//! Terminal rendering for schema previews, reports and upload results.

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use bulk_client::{Notification, NotificationKind};
use bulk_model::{FolderEntry, FolderTrail, TaskSummary};
use bulk_schema::{
    ColumnSchema, CriterionHelp, Severity, ValidationReport, example_row, expanded_example_rows,
    render_header, render_row,
};

/// Header line followed by the single example row, or the expanded rows.
pub fn preview_lines(schema: &ColumnSchema, expanded: bool) -> Vec<String> {
    let mut lines = vec![render_header(schema)];
    if expanded {
        lines.extend(expanded_example_rows(schema).iter().map(|row| render_row(row)));
    } else {
        lines.push(render_row(&example_row(schema)));
    }
    lines
}

pub fn schema_table(schema: &ColumnSchema) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Column"),
        header_cell("Kind"),
        header_cell("Quoted"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Center);
    for (index, column) in schema.columns().iter().enumerate() {
        table.add_row(vec![
            Cell::new(index + 1),
            Cell::new(column.name()),
            Cell::new(column.kind_label()),
            if column.expects_quotes() {
                Cell::new("yes")
            } else {
                dim_cell("no")
            },
        ]);
    }
    table
}

pub fn help_table(entries: &[CriterionHelp]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Question"),
        header_cell("Example"),
        header_cell("Accepts"),
    ]);
    apply_table_style(&mut table);
    for entry in entries {
        let question = if entry.question.is_empty() {
            dim_cell("-")
        } else {
            Cell::new(&entry.question)
        };
        table.add_row(vec![
            Cell::new(&entry.column).fg(Color::Blue),
            question,
            Cell::new(&entry.example),
            Cell::new(&entry.explanation),
        ]);
    }
    table
}

/// One-line counts for a validation run.
pub fn validation_summary(report: &ValidationReport) -> String {
    format!(
        "{} rows read, {} accepted, {} errors, {} warnings",
        report.rows_read,
        report.records.len(),
        report.error_count(),
        report.warning_count()
    )
}

/// Issues sorted by severity then line, or `None` for a clean report.
pub fn issue_table(report: &ValidationReport) -> Option<Table> {
    if report.issues.is_empty() {
        return None;
    }
    let mut issues: Vec<_> = report.issues.iter().collect();
    issues.sort_by_key(|issue| (severity_rank(issue.severity()), issue.line()));

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Severity"),
        header_cell("Line"),
        header_cell("Column"),
        header_cell("Message"),
    ]);
    apply_issue_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Center);
    align_column(&mut table, 1, CellAlignment::Right);
    for issue in issues {
        table.add_row(vec![
            severity_cell(issue.severity()),
            issue.line().map_or_else(|| dim_cell("-"), Cell::new),
            issue.column().map_or_else(|| dim_cell("-"), Cell::new),
            Cell::new(issue.message()),
        ]);
    }
    Some(table)
}

/// Artifact filenames the archive does not contain.
pub fn missing_artifacts_table(missing: &[String]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Missing from archive")]);
    apply_table_style(&mut table);
    for name in missing {
        table.add_row(vec![Cell::new(name).fg(Color::Red)]);
    }
    table
}

pub fn notification_line(notification: &Notification) -> String {
    match notification.kind {
        NotificationKind::Success => format!("✓ {}", notification.message),
        NotificationKind::Error => format!("✗ {}", notification.message),
    }
}

pub fn task_table(tasks: &[TaskSummary]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Task"),
        header_cell("Question"),
        header_cell("Artifacts"),
        header_cell("Folder"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for task in tasks {
        table.add_row(vec![
            Cell::new(&task.id),
            Cell::new(&task.question),
            Cell::new(task.artifact_count),
            task.folder_name
                .as_deref()
                .map_or_else(|| dim_cell("-"), Cell::new),
        ]);
    }
    table
}

/// Folder listing under a breadcrumb caption.
pub fn folder_table(trail: &FolderTrail, entries: &[FolderEntry]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell(&trail.path()), header_cell("Kind")]);
    apply_table_style(&mut table);
    let mut ordered: Vec<&FolderEntry> = entries.iter().collect();
    ordered.sort_by(|a, b| b.is_folder.cmp(&a.is_folder).then_with(|| a.name.cmp(&b.name)));
    for entry in ordered {
        if entry.is_folder {
            table.add_row(vec![
                Cell::new(format!("{}/", entry.name))
                    .fg(Color::Blue)
                    .add_attribute(Attribute::Bold),
                Cell::new("folder"),
            ]);
        } else {
            table.add_row(vec![Cell::new(&entry.name), dim_cell("file")]);
        }
    }
    table
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_issue_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
    if table.column_count() >= 4 {
        table.set_constraints(vec![
            ColumnConstraint::UpperBoundary(Width::Fixed(9)),
            ColumnConstraint::LowerBoundary(Width::Fixed(6)),
            ColumnConstraint::UpperBoundary(Width::Percentage(35)),
            ColumnConstraint::UpperBoundary(Width::Percentage(55)),
        ]);
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn severity_cell(severity: Severity) -> Cell {
    match severity {
        Severity::Error => Cell::new("ERROR")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        Severity::Warning => Cell::new("WARN").fg(Color::Yellow),
    }
}

fn severity_rank(severity: Severity) -> u8 {
    match severity {
        Severity::Error => 0,
        Severity::Warning => 1,
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
