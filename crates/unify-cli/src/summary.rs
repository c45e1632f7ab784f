use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use unify_cli::types::{MappingCoverage, RunResult};
use unify_model::{StampedField, TargetTable};
use unify_validate::{AuditIssue, AuditSeverity};

pub fn print_summary(result: &RunResult) {
    println!("Manifest: {}", result.manifest.display());
    match &result.database {
        Some(path) => println!("Database: {}", path.display()),
        None => println!("Database: (dry run, nothing written)"),
    }
    if let Some(path) = &result.rejections_file {
        println!("Rejections: {}", path.display());
    }
    println!("{}", source_table(result));
    if let Some(table) = issue_table(&result.audit.issues) {
        println!();
        println!("Audit:");
        println!("{table}");
    }
}

fn source_table(result: &RunResult) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Table"),
        header_cell("Source"),
        header_cell("Total"),
        header_cell("Accepted"),
        header_cell("Rejected"),
        header_cell("Excluded"),
        header_cell("Written"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 2..=6 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for summary in &result.tables {
        for stats in &summary.result.sources {
            table.add_row(vec![
                table_cell(summary.table),
                Cell::new(&stats.source),
                Cell::new(stats.total),
                Cell::new(stats.accepted),
                count_cell(stats.rejected, Color::Red),
                count_cell(stats.excluded, Color::Yellow),
                dim_cell("-"),
            ]);
        }
        table.add_row(vec![
            table_cell(summary.table),
            Cell::new("TOTAL")
                .fg(Color::Cyan)
                .add_attribute(Attribute::Bold),
            Cell::new(summary.result.total()).add_attribute(Attribute::Bold),
            Cell::new(summary.result.accepted()).add_attribute(Attribute::Bold),
            count_cell(summary.result.rejected(), Color::Red).add_attribute(Attribute::Bold),
            count_cell(summary.result.excluded(), Color::Yellow).add_attribute(Attribute::Bold),
            Cell::new(summary.written).add_attribute(Attribute::Bold),
        ]);
    }
    table
}

fn issue_table(issues: &[AuditIssue]) -> Option<Table> {
    if issues.is_empty() {
        return None;
    }
    let mut ordered: Vec<&AuditIssue> = issues.iter().collect();
    ordered.sort_by(|a, b| {
        a.severity
            .cmp(&b.severity)
            .then_with(|| a.source.cmp(&b.source))
            .then_with(|| a.code.cmp(&b.code))
    });
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Severity"),
        header_cell("Table"),
        header_cell("Source"),
        header_cell("Check"),
        header_cell("Count"),
        header_cell("Message"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Center);
    align_column(&mut table, 4, CellAlignment::Right);
    for issue in ordered {
        table.add_row(vec![
            severity_cell(issue.severity),
            table_cell(issue.table),
            Cell::new(&issue.source),
            Cell::new(&issue.code),
            issue.count.map_or_else(|| dim_cell("-"), Cell::new),
            Cell::new(&issue.message),
        ]);
    }
    Some(table)
}

pub fn print_coverage(coverage: &[MappingCoverage]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Source"),
        header_cell("Table"),
        header_cell("Mapped"),
        header_cell("Exclusions"),
        header_cell("Unmapped fields"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    for entry in coverage {
        let total = entry.mapped.len() + entry.unmapped.len();
        let unmapped = if entry.unmapped.is_empty() {
            dim_cell("-")
        } else {
            Cell::new(entry.unmapped.join(", ")).fg(Color::Yellow)
        };
        table.add_row(vec![
            Cell::new(&entry.source)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            table_cell(entry.table),
            Cell::new(format!("{}/{total}", entry.mapped.len())),
            Cell::new(entry.exclusion_rules),
            unmapped,
        ]);
    }
    println!("{table}");
    println!("All mappings resolved.");
}

pub fn print_schema() {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Table"),
        header_cell("Field"),
        header_cell("Kind"),
        header_cell("Required"),
        header_cell("Origin"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Center);
    for target in TargetTable::ALL {
        for spec in target.fields() {
            let required = if spec.required {
                Cell::new("yes").fg(Color::Green)
            } else {
                dim_cell("no")
            };
            let origin = match spec.stamped {
                Some(StampedField::CountryCode) => dim_cell("source label"),
                Some(StampedField::SalaryCurrency) => dim_cell("source currency"),
                Some(StampedField::DialCode) => dim_cell("source dial code"),
                None => Cell::new("mapping"),
            };
            table.add_row(vec![
                table_cell(target),
                Cell::new(spec.name),
                Cell::new(spec.kind.as_str()),
                required,
                origin,
            ]);
        }
    }
    println!("{table}");
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
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn severity_cell(severity: AuditSeverity) -> Cell {
    match severity {
        AuditSeverity::Error => Cell::new("ERROR")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        AuditSeverity::Warning => Cell::new("WARN").fg(Color::Yellow),
        AuditSeverity::Info => Cell::new("INFO").fg(Color::Green),
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn table_cell(table: TargetTable) -> Cell {
    Cell::new(table.as_str()).fg(Color::Blue)
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
