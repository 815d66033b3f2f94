use std::path::Path;

use log::info;

use crate::survey::*;

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

pub fn is_csv_path(path: &str) -> bool {
    Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("csv"))
        .unwrap_or(false)
}

/// Reads a table from a csv or an Excel file, depending on the extension.
/// The worksheet only applies to Excel files.
pub fn read_table(path: &str, worksheet: Option<&str>) -> SurveyResult<SurveyTable> {
    let table = if is_csv_path(path) {
        io_csv::read_csv_table(path)?
    } else {
        io_excel::read_excel_table(path, worksheet)?
    };
    info!(
        "read_table: {}: {} rows, columns {:?}",
        simplify_file_name(path),
        table.len(),
        table.columns()
    );
    Ok(table)
}

/// Fails when the table lacks one of the columns an analysis needs.
pub fn require_columns(table: &SurveyTable, path: &str, names: &[&str]) -> SurveyResult<()> {
    for n in names {
        table.column_index(n).context(TableSnafu { path })?;
    }
    Ok(())
}

/// Pairs of (year, wordsum) read as numbers, with the rest of the row.
/// Rows where either does not parse are skipped.
pub fn scored_rows<'a>(
    table: &'a SurveyTable,
    path: &str,
) -> SurveyResult<Vec<(Option<i64>, f64, &'a [Cell])>> {
    let year_idx = table.column_index("year").context(TableSnafu { path })?;
    let score_idx = table.column_index("wordsum").context(TableSnafu { path })?;
    let res = table
        .rows()
        .iter()
        .filter_map(|row| {
            let score = filter::coerce_numeric(&row[score_idx])?;
            let year = filter::coerce_numeric(&row[year_idx])
                .filter(|y| y.fract() == 0.0)
                .map(|y| y as i64);
            Some((year, score, row.as_slice()))
        })
        .collect();
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names() {
        assert_eq!(simplify_file_name("/tmp/data/clean-data.xlsx"), "clean-data.xlsx");
        assert_eq!(simplify_file_name("data.csv"), "data.csv");
        assert!(is_csv_path("votes.CSV"));
        assert!(!is_csv_path("votes.xlsx"));
        assert!(!is_csv_path("votes"));
    }

    #[test]
    fn unparseable_scores_are_skipped() {
        let mut t = SurveyTable::new(vec!["year".to_string(), "wordsum".to_string()]);
        t.push_row(vec![Cell::Number(2010.0), Cell::text("8")]).unwrap();
        t.push_row(vec![Cell::text("n/a"), Cell::Number(6.0)]).unwrap();
        t.push_row(vec![Cell::Number(2012.0), Cell::Missing]).unwrap();
        let rows = scored_rows(&t, "t.xlsx").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!((rows[0].0, rows[0].1), (Some(2010), 8.0));
        assert_eq!((rows[1].0, rows[1].1), (None, 6.0));
        assert!(require_columns(&t, "t.xlsx", &["year", "partyid"]).is_err());
    }
}
