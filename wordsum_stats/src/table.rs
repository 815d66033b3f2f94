use log::debug;

use crate::config::*;

/// A spreadsheet held in memory: named columns and rows of cells.
///
/// All the rows have exactly one cell per column.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct SurveyTable {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl SurveyTable {
    pub fn new(columns: Vec<String>) -> SurveyTable {
        SurveyTable {
            columns,
            rows: Vec::new(),
        }
    }

    /// Adds a row. Short rows are padded with missing cells, the way spreadsheet
    /// readers treat trailing empty cells.
    pub fn push_row(&mut self, mut row: Vec<Cell>) -> Result<(), TableError> {
        let expected = self.columns.len();
        if row.len() > expected {
            return Err(TableError::RaggedRow {
                row: self.rows.len() + 1,
                expected,
                found: row.len(),
            });
        }
        row.resize(expected, Cell::Missing);
        self.rows.push(row);
        Ok(())
    }

    /// The column names. They are fixed at creation.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Result<usize, TableError> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| TableError::MissingColumn(name.to_string()))
    }

    /// The cells of one column, in row order.
    pub fn column(&self, name: &str) -> Result<Vec<&Cell>, TableError> {
        let idx = self.column_index(name)?;
        Ok(self.rows.iter().map(|r| &r[idx]).collect())
    }

    /// Keeps the rows for which the predicate holds. Returns the number of removed rows.
    pub fn retain_rows<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&[Cell]) -> bool,
    {
        let before = self.rows.len();
        self.rows.retain(|r| keep(r));
        let removed = before - self.rows.len();
        debug!("retain_rows: removed {} of {} rows", removed, before);
        removed
    }

    /// Rewrites every cell of a column.
    pub fn map_column<F>(&mut self, name: &str, f: F) -> Result<(), TableError>
    where
        F: Fn(&Cell) -> Cell,
    {
        let idx = self.column_index(name)?;
        for row in self.rows.iter_mut() {
            row[idx] = f(&row[idx]);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> SurveyTable {
        let mut t = SurveyTable::new(vec!["year".to_string(), "partyid".to_string()]);
        t.push_row(vec![Cell::Number(2010.0), Cell::text("Strong democrat")])
            .unwrap();
        t.push_row(vec![Cell::Number(2012.0)]).unwrap();
        t
    }

    #[test]
    fn short_rows_are_padded() {
        let t = table();
        assert_eq!(t.rows()[1], vec![Cell::Number(2012.0), Cell::Missing]);
    }

    #[test]
    fn long_rows_are_rejected() {
        let mut t = table();
        let res = t.push_row(vec![Cell::Missing, Cell::Missing, Cell::Missing]);
        assert_eq!(
            res,
            Err(TableError::RaggedRow {
                row: 3,
                expected: 2,
                found: 3
            })
        );
    }

    #[test]
    fn missing_column() {
        let t = table();
        assert_eq!(
            t.column_index("wordsum"),
            Err(TableError::MissingColumn("wordsum".to_string()))
        );
        assert_eq!(t.column_index("partyid"), Ok(1));
        assert_eq!(t.columns(), &["year".to_string(), "partyid".to_string()]);
    }

    #[test]
    fn map_and_retain() {
        let mut t = table();
        t.map_column("partyid", |c| match c {
            Cell::Missing => Cell::text("?"),
            x => x.clone(),
        })
        .unwrap();
        assert_eq!(t.column("partyid").unwrap()[1], &Cell::text("?"));
        let removed = t.retain_rows(|r| r[0] == Cell::Number(2010.0));
        assert_eq!(removed, 1);
        assert_eq!(t.len(), 1);
    }
}
