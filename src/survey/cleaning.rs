use log::info;
use serde_json::json;
use serde_json::Value as JSValue;

use wordsum_stats::filter::{
    all_columns, named_columns, retain_valid_rows, retain_wordsum_range, retain_years,
    EDUCATION_SENTINELS, SURVEY_SENTINELS,
};
use wordsum_stats::normalize::party_letter;

use crate::survey::*;

/// What each cleaning step removed.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct CleaningStats {
    pub read: usize,
    pub invalid: usize,
    pub outside_years: usize,
    pub outside_range: usize,
    pub kept: usize,
}

impl CleaningStats {
    pub fn to_json(&self) -> JSValue {
        json!({
            "read": self.read,
            "invalid": self.invalid,
            "outsideYears": self.outside_years,
            "outsideRange": self.outside_range,
            "kept": self.kept,
        })
    }
}

/// Drops the rows with a non-answer anywhere, then the years outside the
/// survey and the scores outside 1 to 10. The year and score columns are left
/// as numbers.
pub fn clean_survey_table(
    table: &mut SurveyTable,
    years: &[i64],
) -> Result<CleaningStats, TableError> {
    let read = table.len();
    // Fail on a missing column before dropping anything.
    table.column_index("year")?;
    table.column_index("wordsum")?;
    let checks = all_columns(table, &SURVEY_SENTINELS);
    let invalid = retain_valid_rows(table, &checks);
    let outside_years = retain_years(table, "year", years)?;
    let outside_range = retain_wordsum_range(table, "wordsum")?;
    Ok(CleaningStats {
        read,
        invalid,
        outside_years,
        outside_range,
        kept: table.len(),
    })
}

/// Only the party and the education columns are checked, each against its own non-answers.
pub fn clean_education_table(table: &mut SurveyTable) -> Result<CleaningStats, TableError> {
    let read = table.len();
    let mut checks = named_columns(table, &["partyid"], &SURVEY_SENTINELS)?;
    checks.extend(named_columns(table, &["educ"], &EDUCATION_SENTINELS)?);
    let invalid = retain_valid_rows(table, &checks);
    Ok(CleaningStats {
        read,
        invalid,
        kept: table.len(),
        ..CleaningStats::default()
    })
}

/// Replaces the party identification with D, R or I.
pub fn simplify_parties(table: &mut SurveyTable) -> Result<(), TableError> {
    table.map_column("partyid", |c| Cell::text(party_letter(c).code()))
}

fn report_cleaning(
    report: &mut Report,
    input: &str,
    stats: &CleaningStats,
    clean_out: &str,
    simple_out: &str,
) {
    report.line(format!(
        "Read {} rows from {}",
        stats.read,
        io_common::simplify_file_name(input)
    ));
    report.line(format!("Dropped {} rows with invalid cells", stats.invalid));
    if stats.outside_years > 0 || stats.outside_range > 0 {
        report.line(format!(
            "Dropped {} rows outside the survey years and {} rows with wordsum outside 1-10",
            stats.outside_years, stats.outside_range
        ));
    }
    report.line(format!(
        "Wrote {} rows to {} and {}",
        stats.kept,
        io_common::simplify_file_name(clean_out),
        io_common::simplify_file_name(simple_out)
    ));
}

pub fn run_clean(
    input: &str,
    worksheet: Option<&str>,
    clean_out: &str,
    simple_out: &str,
    config: &AnalysisConfig,
    report: &mut Report,
) -> SurveyResult<CleaningStats> {
    let mut table = io_common::read_table(input, worksheet)?;
    let stats = clean_survey_table(&mut table, &config.survey_years)
        .context(TableSnafu { path: input })?;
    info!("run_clean: {:?}", stats);
    io_writer::write_excel_table(&table, clean_out)?;

    simplify_parties(&mut table).context(TableSnafu { path: input })?;
    io_writer::write_excel_table(&table, simple_out)?;
    report_cleaning(report, input, &stats, clean_out, simple_out);
    Ok(stats)
}

pub fn run_clean_educ(
    input: &str,
    worksheet: Option<&str>,
    clean_out: &str,
    simple_out: &str,
    report: &mut Report,
) -> SurveyResult<CleaningStats> {
    let mut table = io_common::read_table(input, worksheet)?;
    let stats = clean_education_table(&mut table).context(TableSnafu { path: input })?;
    info!("run_clean_educ: {:?}", stats);
    io_writer::write_excel_table(&table, clean_out)?;

    simplify_parties(&mut table).context(TableSnafu { path: input })?;
    io_writer::write_excel_table(&table, simple_out)?;
    report_cleaning(report, input, &stats, clean_out, simple_out);
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn survey() -> SurveyTable {
        let mut t = SurveyTable::new(vec![
            "year".to_string(),
            "wordsum".to_string(),
            "partyid".to_string(),
        ]);
        let rows = [
            (Cell::Number(2010.0), Cell::Number(8.0), "Strong democrat"),
            (Cell::Number(2012.0), Cell::Number(6.0), ".n: No answer"),
            (Cell::Number(1999.0), Cell::Number(7.0), "Strong republican"),
            (Cell::Number(2022.0), Cell::text("11"), "Independent"),
            (Cell::text("2024"), Cell::text("10"), "Not very strong republican"),
            (Cell::Number(2018.0), Cell::Missing, "Strong republican"),
        ];
        for (y, w, p) in rows.iter() {
            t.push_row(vec![y.clone(), w.clone(), Cell::text(p)]).unwrap();
        }
        t
    }

    #[test]
    fn survey_cleaning() {
        let mut t = survey();
        let stats = clean_survey_table(&mut t, &DEFAULT_SURVEY_YEARS).unwrap();
        assert_eq!(
            stats,
            CleaningStats {
                read: 6,
                invalid: 2,
                outside_years: 1,
                outside_range: 1,
                kept: 2
            }
        );
        assert_eq!(
            t.column("year").unwrap(),
            vec![&Cell::Number(2010.0), &Cell::Number(2024.0)]
        );
        assert_eq!(
            t.column("wordsum").unwrap(),
            vec![&Cell::Number(8.0), &Cell::Number(10.0)]
        );

        // Cleaning the output again removes nothing.
        let again = clean_survey_table(&mut t, &DEFAULT_SURVEY_YEARS).unwrap();
        assert_eq!(again.kept, again.read);

        simplify_parties(&mut t).unwrap();
        assert_eq!(
            t.column("partyid").unwrap(),
            vec![&Cell::text("D"), &Cell::text("R")]
        );
    }

    #[test]
    fn missing_columns_fail() {
        let mut t = SurveyTable::new(vec!["year".to_string(), "partyid".to_string()]);
        t.push_row(vec![Cell::Number(2010.0), Cell::text("Strong democrat")])
            .unwrap();
        assert_eq!(
            clean_survey_table(&mut t, &DEFAULT_SURVEY_YEARS),
            Err(TableError::MissingColumn("wordsum".to_string()))
        );
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn education_cleaning() {
        let mut t = SurveyTable::new(vec![
            "partyid".to_string(),
            "educ".to_string(),
            "wordsum".to_string(),
        ]);
        let rows = [
            ("Strong democrat", "Bachelor's", Cell::Missing),
            (".i: Inapplicable", "High school", Cell::Number(6.0)),
            ("Independent", ".n: No answer", Cell::Number(5.0)),
            ("Strong republican", ".d: Do not Know/Cannot Choose", Cell::Number(9.0)),
            ("Strong republican", "  ", Cell::Number(9.0)),
        ];
        for (p, e, w) in rows.iter() {
            t.push_row(vec![Cell::text(p), Cell::text(e), w.clone()])
                .unwrap();
        }
        let stats = clean_education_table(&mut t).unwrap();
        assert_eq!(stats.read, 5);
        assert_eq!(stats.invalid, 3);
        assert_eq!(stats.kept, 2);
        // Other columns and the broader non-answers of educ are not checked.
        assert_eq!(t.rows()[0][2], Cell::Missing);
        assert_eq!(t.rows()[1][1], Cell::text(".d: Do not Know/Cannot Choose"));
        simplify_parties(&mut t).unwrap();
        assert_eq!(
            t.column("partyid").unwrap(),
            vec![&Cell::text("D"), &Cell::text("R")]
        );
    }

    #[test]
    fn run_clean_writes_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("data.csv");
        std::fs::write(
            &input,
            "year,wordsum,partyid\n2010,8,Strong democrat\n2012,6,.n: No answer\n2014,9,Independent\n",
        )
        .unwrap();
        let clean_out = dir.path().join("clean-data.xlsx");
        let simple_out = dir.path().join("simple-data.xlsx");
        let mut report = Report::new();
        let stats = run_clean(
            input.to_str().unwrap(),
            None,
            clean_out.to_str().unwrap(),
            simple_out.to_str().unwrap(),
            &AnalysisConfig::default(),
            &mut report,
        )
        .unwrap();
        assert_eq!(stats.kept, 2);
        assert!(report.contains("Dropped 1 rows with invalid cells"));

        let clean = io_common::read_table(clean_out.to_str().unwrap(), None).unwrap();
        assert_eq!(clean.rows()[1][2], Cell::text("Independent"));
        let simple = io_common::read_table(simple_out.to_str().unwrap(), None).unwrap();
        assert_eq!(
            simple.column("partyid").unwrap(),
            vec![&Cell::text("D"), &Cell::text("I")]
        );
        assert_eq!(simple.rows()[0][0], Cell::Number(2010.0));
    }
}
