// Education levels by party.

use log::info;
use serde_json::json;
use serde_json::Value as JSValue;

use wordsum_stats::normalize::parse_party_code;
use wordsum_stats::stats::category_counts;

use crate::survey::charts::*;
use crate::survey::report::*;
use crate::survey::*;

#[derive(PartialEq, Debug, Clone)]
pub struct PartyDistribution {
    pub party: PartyLabel,
    pub total: usize,
    pub categories: Vec<CategoryCount>,
}

#[derive(PartialEq, Debug, Clone)]
pub struct EducationSummary {
    pub parties: Vec<PartyDistribution>,
    /// The most common categories over all the parties.
    pub top_categories: Vec<String>,
}

fn category_to_json(c: &CategoryCount) -> JSValue {
    json!({ "category": c.category, "count": c.count, "percent": c.percent })
}

pub fn distributions_to_json(s: &EducationSummary) -> JSValue {
    let parties: Vec<JSValue> = s
        .parties
        .iter()
        .map(|d| {
            let categories: Vec<JSValue> = d.categories.iter().map(category_to_json).collect();
            json!({ "party": d.party.code(), "total": d.total, "categories": categories })
        })
        .collect();
    json!({
        "command": "education",
        "parties": parties,
        "topCategories": s.top_categories,
    })
}

/// The education level of every row, with its party when it is one of D, R or I.
fn education_rows(
    table: &SurveyTable,
    path: &str,
) -> SurveyResult<Vec<(Option<PartyLabel>, String)>> {
    let party_idx = table.column_index("partyid").context(TableSnafu { path })?;
    let educ_idx = table.column_index("educ").context(TableSnafu { path })?;
    Ok(table
        .rows()
        .iter()
        .map(|row| {
            (
                parse_party_code(&row[party_idx]),
                row[educ_idx].display_string(),
            )
        })
        .collect())
}

pub fn run_education(
    table: &SurveyTable,
    path: &str,
    config: &AnalysisConfig,
    report: &mut Report,
    charts: &ChartSink,
) -> SurveyResult<EducationSummary> {
    io_common::require_columns(table, path, &["partyid", "educ"])?;
    let rows = education_rows(table, path)?;
    let of_party = |p: PartyLabel| -> Vec<&str> {
        rows.iter()
            .filter(|(party, _)| *party == Some(p))
            .map(|(_, e)| e.as_str())
            .collect()
    };

    let mut parties: Vec<PartyDistribution> = Vec::new();
    for p in PartyLabel::ALL.iter() {
        let values = of_party(*p);
        report.line(format!(
            "Party {} education distribution (count={}):",
            p,
            values.len()
        ));
        let categories = category_counts(&values);
        for c in categories.iter() {
            report.line(format_category(c));
        }
        parties.push(PartyDistribution {
            party: *p,
            total: values.len(),
            categories,
        });
    }

    let all: Vec<&str> = rows.iter().map(|(_, e)| e.as_str()).collect();
    let top_categories: Vec<String> = category_counts(&all)
        .into_iter()
        .take(config.top_education_categories)
        .map(|c| c.category)
        .collect();
    let summary = EducationSummary {
        parties,
        top_categories,
    };
    if summary.top_categories.is_empty() {
        report.line("No education categories available to plot.");
        return Ok(summary);
    }

    let series: Vec<BarSeries> = summary
        .parties
        .iter()
        .enumerate()
        .map(|(idx, d)| {
            let values: Vec<usize> = summary
                .top_categories
                .iter()
                .map(|cat| {
                    d.categories
                        .iter()
                        .find(|c| &c.category == cat)
                        .map(|c| c.count)
                        .unwrap_or(0)
                })
                .collect();
            BarSeries::plain(d.party.code(), values, series_color(idx))
        })
        .collect();
    charts.grouped_bars(
        "Top education categories by party (simple labels)",
        "Count",
        &summary.top_categories,
        &series,
    )?;
    info!(
        "run_education: {} rows, top categories {:?}",
        rows.len(),
        summary.top_categories
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn educ_table() -> SurveyTable {
        let mut t = SurveyTable::new(vec!["partyid".to_string(), "educ".to_string()]);
        let rows = [
            ("D", "Bachelor's"),
            ("D", "Bachelor's"),
            ("D", "High school"),
            ("R", "High school"),
            ("R", "Graduate"),
            ("I", "High school"),
            ("X", "Associate"),
        ];
        for (p, e) in rows.iter() {
            t.push_row(vec![Cell::text(p), Cell::text(e)]).unwrap();
        }
        t
    }

    #[test]
    fn distributions_by_party() {
        let mut report = Report::new();
        let s = run_education(
            &educ_table(),
            "simple-educ-data.xlsx",
            &AnalysisConfig::default(),
            &mut report,
            &ChartSink::disabled(),
        )
        .unwrap();
        assert_eq!(s.parties.len(), 3);
        let d = &s.parties[0];
        assert_eq!(d.total, 3);
        assert_eq!(d.categories[0].category, "Bachelor's");
        assert_eq!(d.categories[0].percent, 66.67);
        assert_eq!(
            s.top_categories,
            vec!["High school", "Bachelor's", "Graduate", "Associate"]
        );
        assert_eq!(
            report.lines()[0],
            "Party D education distribution (count=3):"
        );
        assert!(report.contains("  Bachelor's: count=2 percent=66.67"));

        let js = distributions_to_json(&s);
        assert_eq!(js["parties"][1]["party"], "R");
        assert_eq!(js["topCategories"][0], "High school");
    }

    #[test]
    fn top_categories_are_capped() {
        let mut config = AnalysisConfig::default();
        config.top_education_categories = 1;
        let s = run_education(
            &educ_table(),
            "t",
            &config,
            &mut Report::new(),
            &ChartSink::disabled(),
        )
        .unwrap();
        assert_eq!(s.top_categories, vec!["High school"]);
    }

    #[test]
    fn no_categories() {
        let t = SurveyTable::new(vec!["partyid".to_string(), "educ".to_string()]);
        let mut report = Report::new();
        let s = run_education(&t, "t", &AnalysisConfig::default(), &mut report, &ChartSink::disabled())
            .unwrap();
        assert!(s.top_categories.is_empty());
        assert_eq!(
            report.lines().last().map(|s| s.as_str()),
            Some("No education categories available to plot.")
        );
        assert!(report.contains("Party I education distribution (count=0):"));
    }
}
