use crate::error::GradeError;
use crate::types::{ScoredCampaign, ScoredTable, DERIVED_COLUMNS};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tabled::{settings::Style, Table, Tabled};

/// `-0.0` is written as `0`.
fn number(v: f64) -> String {
    let v = if v == 0.0 { 0.0 } else { v };
    v.to_string()
}

fn cell(v: Option<f64>) -> String {
    v.map(number).unwrap_or_default()
}

/// Original cells padded (or cut) to the header width, then the derived figures.
fn export_record(c: &ScoredCampaign, width: usize) -> Vec<String> {
    let m = &c.metrics;
    let mut out: Vec<String> = c.record.source.iter().map(str::to_string).collect();
    out.resize(width, String::new());
    out.extend([
        cell(m.profit_loss),
        cell(m.cpl),
        cell(m.cpa),
        cell(m.roas),
        cell(m.roi),
        cell(m.conversion_rate),
        cell(m.revenue_per_lead),
        number(c.score),
    ]);
    out
}

/// Write the full scored table: original columns verbatim, then the derived
/// columns. Null metrics are written as empty cells.
pub fn write_scored_csv_to<W: Write>(writer: W, table: &ScoredTable) -> Result<(), GradeError> {
    let mut wtr = csv::Writer::from_writer(writer);
    let mut header: Vec<&str> = table.headers.iter().collect();
    header.extend(DERIVED_COLUMNS);
    wtr.write_record(&header)?;
    for c in &table.campaigns {
        wtr.write_record(export_record(c, table.headers.len()))?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_scored_csv(path: &Path, table: &ScoredTable) -> Result<(), GradeError> {
    let file = std::fs::File::create(path)?;
    write_scored_csv_to(file, table)
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), GradeError> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

/// Markdown rendering of a set of rows.
pub fn markdown_table<T>(rows: &[T]) -> String
where
    T: Tabled + Clone,
{
    Table::new(rows.to_vec()).with(Style::markdown()).to_string()
}

pub fn preview_table_rows<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().take(max_rows).cloned().collect();
    if slice.is_empty() {
        println!("(no rows)\n");
        return;
    }
    println!("{}\n", markdown_table(&slice));
    if rows.len() > max_rows {
        println!("({} more rows not shown)\n", rows.len() - max_rows);
    }
}
