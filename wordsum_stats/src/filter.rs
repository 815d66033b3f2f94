use log::{debug, info};

use crate::config::*;
use crate::table::SurveyTable;

/// The non-answers of the survey export. The empty string stands for a blank cell.
pub const SURVEY_SENTINELS: [&str; 4] = [
    ".n: No answer",
    ".i: Inapplicable",
    ".d: Do not Know/Cannot Choose",
    "",
];

/// The non-answers accepted for the education column.
pub const EDUCATION_SENTINELS: [&str; 2] = [".n: No answer", ""];

/// Trims the string and collapses every run of whitespace into a single space.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<&str>>().join(" ")
}

/// True if the cell is missing or holds one of the sentinel strings.
/// Numbers are valid unless NaN.
pub fn is_invalid_cell(cell: &Cell, sentinels: &[&str]) -> bool {
    match cell {
        Cell::Missing => true,
        Cell::Number(x) => x.is_nan(),
        Cell::Text(s) => {
            let normalized = collapse_whitespace(s);
            sentinels.iter().any(|x| *x == normalized)
        }
    }
}

/// A column to check, with the sentinels that invalidate it.
#[derive(Debug, Clone, Copy)]
pub struct ColumnCheck<'a> {
    pub column: usize,
    pub sentinels: &'a [&'a str],
}

/// Checks every column of the table against the same sentinels.
pub fn all_columns<'a>(table: &SurveyTable, sentinels: &'a [&'a str]) -> Vec<ColumnCheck<'a>> {
    (0..table.columns().len())
        .map(|column| ColumnCheck { column, sentinels })
        .collect()
}

/// Checks the named columns against the same sentinels.
pub fn named_columns<'a>(
    table: &SurveyTable,
    names: &[&str],
    sentinels: &'a [&'a str],
) -> Result<Vec<ColumnCheck<'a>>, TableError> {
    names
        .iter()
        .map(|n| {
            table
                .column_index(n)
                .map(|column| ColumnCheck { column, sentinels })
        })
        .collect()
}

pub fn is_invalid_row(row: &[Cell], checks: &[ColumnCheck]) -> bool {
    checks
        .iter()
        .any(|c| is_invalid_cell(&row[c.column], c.sentinels))
}

/// Drops every row that has an invalid cell in one of the checked columns.
/// Returns the number of dropped rows.
pub fn retain_valid_rows(table: &mut SurveyTable, checks: &[ColumnCheck]) -> usize {
    let removed = table.retain_rows(|row| !is_invalid_row(row, checks));
    info!(
        "retain_valid_rows: dropped {} rows with invalid cells, {} left",
        removed,
        table.len()
    );
    removed
}

/// Reads a cell as a number. Anything that does not parse becomes `None`.
pub fn coerce_numeric(cell: &Cell) -> Option<f64> {
    match cell {
        Cell::Number(x) if x.is_finite() => Some(*x),
        Cell::Text(s) => s.trim().parse::<f64>().ok().filter(|x| x.is_finite()),
        _ => None,
    }
}

/// Converts a column to numbers in place (unparseable cells become missing), then
/// keeps the rows whose value satisfies the predicate. Returns the number of dropped rows.
pub fn coerce_and_retain<F>(
    table: &mut SurveyTable,
    column: &str,
    keep: F,
) -> Result<usize, TableError>
where
    F: Fn(f64) -> bool,
{
    table.map_column(column, |c| match coerce_numeric(c) {
        Some(x) => Cell::Number(x),
        None => Cell::Missing,
    })?;
    let idx = table.column_index(column)?;
    let removed = table.retain_rows(|row| match row[idx] {
        Cell::Number(x) => keep(x),
        _ => false,
    });
    debug!("coerce_and_retain: column {}: dropped {} rows", column, removed);
    Ok(removed)
}

/// Keeps the rows whose year is one of the given survey years.
pub fn retain_years(
    table: &mut SurveyTable,
    column: &str,
    years: &[i64],
) -> Result<usize, TableError> {
    coerce_and_retain(table, column, |x| {
        x.fract() == 0.0 && years.contains(&(x as i64))
    })
}

/// Keeps the rows whose wordsum lies in the observable range, bounds included.
pub fn retain_wordsum_range(table: &mut SurveyTable, column: &str) -> Result<usize, TableError> {
    coerce_and_retain(table, column, |x| (WORDSUM_MIN..=WORDSUM_MAX).contains(&x))
}
