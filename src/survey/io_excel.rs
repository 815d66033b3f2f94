// Primitives for reading Excel files.

use calamine::{open_workbook, DataType, Range, Reader, Xlsx};
use log::debug;

use crate::survey::*;

fn get_range(path: &str, worksheet: Option<&str>) -> SurveyResult<Range<DataType>> {
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;
    let wrange = match worksheet {
        Some(name) => workbook
            .worksheet_range(name)
            .context(MissingWorksheetSnafu { path, name })?
            .context(OpeningExcelSnafu { path })?,
        None => workbook
            .worksheet_range_at(0)
            .context(EmptyExcelSnafu { path })?
            .context(OpeningExcelSnafu { path })?,
    };
    Ok(wrange)
}

/// Empty cells, spreadsheet errors and NaN are missing.
pub fn read_cell(cell: &DataType) -> Cell {
    match cell {
        DataType::String(s) => Cell::Text(s.clone()),
        DataType::Float(f) if f.is_nan() => Cell::Missing,
        DataType::Float(f) => Cell::Number(*f),
        DataType::Int(i) => Cell::Number(*i as f64),
        DataType::Bool(b) => Cell::Number(if *b { 1.0 } else { 0.0 }),
        DataType::DateTime(d) => Cell::Number(*d),
        _ => Cell::Missing,
    }
}

fn header_name(idx: usize, cell: &DataType) -> String {
    match read_cell(cell) {
        Cell::Missing => format!("Unnamed: {}", idx),
        c => c.display_string().trim().to_string(),
    }
}

/// Reads a worksheet into a table. The first row holds the column names.
pub fn read_excel_table(path: &str, worksheet: Option<&str>) -> SurveyResult<SurveyTable> {
    let wrange = get_range(path, worksheet)?;
    let mut iter = wrange.rows();
    let header = iter.next().context(MissingHeaderSnafu { path })?;
    debug!("read_excel_table: header: {:?}", header);
    let columns: Vec<String> = header
        .iter()
        .enumerate()
        .map(|(idx, c)| header_name(idx, c))
        .collect();

    let mut table = SurveyTable::new(columns);
    for row in iter {
        let cells: Vec<Cell> = row.iter().map(read_cell).collect();
        table.push_row(cells).context(TableSnafu { path })?;
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells() {
        assert_eq!(read_cell(&DataType::Empty), Cell::Missing);
        assert_eq!(read_cell(&DataType::Float(f64::NAN)), Cell::Missing);
        assert_eq!(read_cell(&DataType::Int(2010)), Cell::Number(2010.0));
        assert_eq!(read_cell(&DataType::Float(8.0)), Cell::Number(8.0));
        assert_eq!(
            read_cell(&DataType::String(".n: No answer".to_string())),
            Cell::text(".n: No answer")
        );
        assert_eq!(header_name(3, &DataType::Empty), "Unnamed: 3");
        assert_eq!(header_name(0, &DataType::String(" year ".to_string())), "year");
    }

    #[test]
    fn missing_workbook() {
        assert!(read_excel_table("/nonexistent/data.xlsx", None).is_err());
    }
}
