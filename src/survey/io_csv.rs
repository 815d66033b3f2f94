// Primitives for reading CSV files.

use log::debug;

use crate::survey::*;

/// Blank fields are missing. Fields that read as numbers become numbers, the
/// way a spreadsheet would type them.
pub fn read_field(field: &str) -> Cell {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        return Cell::Missing;
    }
    match trimmed.parse::<f64>() {
        Ok(x) if x.is_nan() => Cell::Missing,
        Ok(x) if x.is_finite() => Cell::Number(x),
        _ => Cell::Text(field.to_string()),
    }
}

/// Reads a csv file into a table. The first line holds the column names.
pub fn read_csv_table(path: &str) -> SurveyResult<SurveyTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .context(CsvReadSnafu { path })?;
    let columns: Vec<String> = rdr
        .headers()
        .context(CsvReadSnafu { path })?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    ensure!(!columns.is_empty(), MissingHeaderSnafu { path });
    debug!("read_csv_table: header: {:?}", columns);

    let mut table = SurveyTable::new(columns);
    for record in rdr.records() {
        let line = record.context(CsvReadSnafu { path })?;
        let cells: Vec<Cell> = line.iter().map(read_field).collect();
        table.push_row(cells).context(TableSnafu { path })?;
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn fields() {
        assert_eq!(read_field(""), Cell::Missing);
        assert_eq!(read_field("  "), Cell::Missing);
        assert_eq!(read_field("nan"), Cell::Missing);
        assert_eq!(read_field("2010"), Cell::Number(2010.0));
        assert_eq!(read_field(" 8 "), Cell::Number(8.0));
        assert_eq!(read_field("Strong democrat"), Cell::text("Strong democrat"));
        assert_eq!(read_field(".n: No answer"), Cell::text(".n: No answer"));
    }

    #[test]
    fn read_file() {
        let mut f = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        write!(
            f,
            "year,wordsum,partyid\n2010,8,Strong democrat\n2012,,\".n: No answer\"\n2014,6\n"
        )
        .unwrap();
        let p = f.path().to_str().unwrap().to_string();
        let t = io_common::read_table(&p, None).unwrap();
        assert_eq!(t.columns(), &["year", "wordsum", "partyid"]);
        assert_eq!(t.len(), 3);
        assert_eq!(t.rows()[0][2], Cell::text("Strong democrat"));
        assert_eq!(t.rows()[1][1], Cell::Missing);
        assert_eq!(t.rows()[1][2], Cell::text(".n: No answer"));
        assert_eq!(t.rows()[2][2], Cell::Missing);
    }
}
