// Writing tables back to Excel files.

use log::info;
use rust_xlsxwriter::{Format, Workbook};

use crate::survey::*;

/// Writes the table to a single worksheet, header first and without any index
/// column. Missing cells are left blank.
pub fn write_excel_table(table: &SurveyTable, path: &str) -> SurveyResult<()> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let worksheet = workbook.add_worksheet();

    for (col, name) in table.columns().iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, name, &header_format)
            .context(WritingExcelSnafu { path })?;
    }
    for (idx, row) in table.rows().iter().enumerate() {
        let r = (idx + 1) as u32;
        for (col, cell) in row.iter().enumerate() {
            let c = col as u16;
            match cell {
                Cell::Missing => {}
                Cell::Text(s) => {
                    worksheet
                        .write_string(r, c, s)
                        .context(WritingExcelSnafu { path })?;
                }
                Cell::Number(x) => {
                    worksheet
                        .write_number(r, c, *x)
                        .context(WritingExcelSnafu { path })?;
                }
            }
        }
    }
    workbook.save(path).context(WritingExcelSnafu { path })?;
    info!(
        "write_excel_table: {} rows written to {}",
        table.len(),
        io_common::simplify_file_name(path)
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn written_tables_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("simple-data.xlsx");
        let p = p.to_str().unwrap();

        let mut t = SurveyTable::new(vec![
            "year".to_string(),
            "wordsum".to_string(),
            "partyid".to_string(),
        ]);
        t.push_row(vec![Cell::Number(2010.0), Cell::Number(8.0), Cell::text("D")])
            .unwrap();
        t.push_row(vec![Cell::Number(2022.0), Cell::Number(10.0), Cell::Missing])
            .unwrap();
        write_excel_table(&t, p).unwrap();

        let back = io_common::read_table(p, None).unwrap();
        assert_eq!(back.columns(), t.columns());
        assert_eq!(back.len(), 2);
        assert_eq!(back.rows()[0], t.rows()[0]);
        assert_eq!(back.rows()[1][1], Cell::Number(10.0));
        assert_eq!(back.rows()[1][2], Cell::Missing);
    }
}
