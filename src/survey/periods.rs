// Comparisons of the party groups before and after 2016.

use log::{debug, info};
use plotters::style::RGBColor;

use wordsum_stats::normalize::{party_color, DetailedPartyNormalizer};

use crate::survey::charts::*;
use crate::survey::report::*;
use crate::survey::*;

/// Groups the scores of each period under the given labels. Rows without a
/// label, or with a label outside `keys`, still count for their period.
/// Rows whose year belongs to no period are left out.
pub fn period_groups<F>(
    table: &SurveyTable,
    path: &str,
    config: &AnalysisConfig,
    keys: &[String],
    label_of: F,
) -> SurveyResult<Vec<(String, Groups<String>)>>
where
    F: Fn(&Cell) -> Option<String>,
{
    let party_idx = table.column_index("partyid").context(TableSnafu { path })?;
    let mut builders: Vec<(String, GroupBuilder<String>)> = config
        .periods
        .iter()
        .map(|p| (p.name.clone(), GroupBuilder::new(keys)))
        .collect();

    let mut skipped = 0;
    for (year, score, row) in io_common::scored_rows(table, path)? {
        let period = match year.and_then(|y| config.period_of(y)) {
            Some(p) => p,
            None => {
                skipped += 1;
                continue;
            }
        };
        if let Some((_, b)) = builders.iter_mut().find(|(n, _)| n.as_str() == period) {
            match label_of(&row[party_idx]) {
                Some(label) => {
                    b.add(&label, score);
                }
                None => b.add_unkeyed(score),
            }
        }
    }
    debug!("period_groups: {} rows outside of any period", skipped);
    Ok(builders.into_iter().map(|(n, b)| (n, b.build())).collect())
}

fn analyze_periods(
    groups: &[(String, Groups<String>)],
    pairs: PairSelection,
) -> Vec<(String, GroupAnalysis)> {
    groups
        .iter()
        .map(|(n, g)| (n.clone(), analyze_groups(g, pairs)))
        .collect()
}

/// The grouped bar chart of the exceedance counts, then one pie per period.
fn exceedance_charts(
    charts: &ChartSink,
    analyses: &[(String, GroupAnalysis)],
    keys: &[String],
    label_colors: bool,
) -> SurveyResult<()> {
    if !charts.is_enabled() {
        return Ok(());
    }
    let colors: Vec<RGBColor> = keys
        .iter()
        .enumerate()
        .map(|(idx, k)| {
            if label_colors {
                parse_hex_color(party_color(k))
            } else {
                series_color(idx)
            }
        })
        .collect();
    let counts_of = |a: &GroupAnalysis| -> Vec<usize> {
        keys.iter()
            .map(|k| a.group(k).map(|g| g.exceedances).unwrap_or(0))
            .collect()
    };

    let series: Vec<BarSeries> = analyses
        .iter()
        .enumerate()
        .map(|(idx, (period, a))| {
            if label_colors {
                BarSeries {
                    name: period.clone(),
                    values: counts_of(a),
                    colors: colors.clone(),
                }
            } else {
                BarSeries::plain(period, counts_of(a), series_color(idx))
            }
        })
        .collect();
    charts.grouped_bars(
        "Wordsum 2-sigma exceeders by party and era",
        "Count above 2-sigma threshold",
        keys,
        &series,
    )?;

    for (period, a) in analyses.iter() {
        let slices: Vec<PieSlice> = keys
            .iter()
            .zip(counts_of(a))
            .zip(colors.iter())
            .map(|((k, count), color)| PieSlice {
                label: k.clone(),
                count,
                color: *color,
            })
            .collect();
        charts.pie(&format!("{}: 2-sigma exceeders by party", period), &slices)?;
    }
    Ok(())
}

/// Democrats, republicans and independents, from the simplified party labels.
pub fn run_periods(
    table: &SurveyTable,
    path: &str,
    config: &AnalysisConfig,
    report: &mut Report,
    charts: &ChartSink,
) -> SurveyResult<Vec<(String, GroupAnalysis)>> {
    io_common::require_columns(table, path, &["year", "wordsum", "partyid"])?;
    let keys: Vec<String> = PartyLabel::ALL
        .iter()
        .map(|p| p.code().to_string())
        .collect();
    let groups = period_groups(table, path, config, &keys, |c| Some(c.display_string()))?;
    let analyses = analyze_periods(&groups, PairSelection::AllGroups);

    let mut panels: Vec<HistogramPanel> = Vec::new();
    for (period, a) in analyses.iter() {
        for g in a.groups.iter() {
            report.line(format!("Period {} Party {} wordsum stats:", period, g.key));
            report.line(format_summary(&g.summary));
            panels.push(HistogramPanel {
                title: format!("{} - {}", period, g.key),
                bins: g.histogram,
                color: series_color(0),
            });
        }
    }
    charts.histogram_grid(
        "Wordsum histograms by period and party",
        &panels,
        keys.len(),
    )?;

    if !stats::TTEST_AVAILABLE {
        report.line(TTEST_UNAVAILABLE_NOTICE);
    } else {
        for (period, a) in analyses.iter() {
            report.line(format!("T-tests for period {}:", period));
            for l in test_lines(&a.tests) {
                report.line(l);
            }
        }
    }

    for (period, a) in analyses.iter() {
        for l in threshold_lines(period, &a.threshold) {
            report.line(l);
        }
        report.line(counts_line(period, &a.exceedance_counts()));
    }

    exceedance_charts(charts, &analyses, &keys, false)?;
    info!("run_periods: {} periods analyzed", analyses.len());
    Ok(analyses)
}

/// The seven-point party scale, with the near-duplicate labels merged and
/// the unknown labels bucketed into Other.
pub fn run_detailed(
    table: &SurveyTable,
    path: &str,
    config: &AnalysisConfig,
    report: &mut Report,
    charts: &ChartSink,
) -> SurveyResult<Vec<(String, GroupAnalysis)>> {
    io_common::require_columns(table, path, &["year", "wordsum", "partyid"])?;
    let raw_labels: Vec<String> = table
        .column("partyid")
        .context(TableSnafu { path })?
        .into_iter()
        .filter(|c| **c != Cell::Missing)
        .map(|c| c.display_string())
        .collect();
    let normalizer = DetailedPartyNormalizer::from_labels(raw_labels.iter().map(|s| s.as_str()));
    let keys: Vec<String> = normalizer.labels().to_vec();
    info!("run_detailed: party labels {:?}", keys);

    let groups = period_groups(table, path, config, &keys, |c| normalizer.normalize_cell(c))?;
    let analyses = analyze_periods(&groups, PairSelection::NonEmptyGroups);

    for (period, a) in analyses.iter() {
        for l in threshold_lines(period, &a.threshold) {
            report.line(l);
        }

        report.line(format!("Period {} wordsum stats by party:", period));
        for g in a.groups.iter().filter(|g| g.summary.count > 0) {
            report.line(format!("Party {}: {}", g.key, format_summary(&g.summary)));
        }

        if !stats::TTEST_AVAILABLE {
            report.line(TTEST_UNAVAILABLE_NOTICE);
        } else {
            report.line(format!("T-tests for period {}:", period));
            for l in test_lines(&a.tests) {
                report.line(l);
            }
        }

        report.line(counts_line(period, &a.exceedance_counts()));

        let panels: Vec<HistogramPanel> = a
            .groups
            .iter()
            .map(|g| HistogramPanel {
                title: g.key.clone(),
                bins: g.histogram,
                color: parse_hex_color(party_color(&g.key)),
            })
            .collect();
        charts.histogram_grid(
            &format!("{} wordsum histograms by party", period),
            &panels,
            3,
        )?;
    }

    exceedance_charts(charts, &analyses, &keys, true)?;
    Ok(analyses)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simple_table() -> SurveyTable {
        let mut t = SurveyTable::new(vec![
            "year".to_string(),
            "wordsum".to_string(),
            "partyid".to_string(),
        ]);
        let rows: [(f64, f64, &str); 11] = [
            (2010.0, 7.0, "D"),
            (2012.0, 8.0, "D"),
            (2014.0, 9.0, "D"),
            (2010.0, 10.0, "R"),
            (2012.0, 10.0, "R"),
            (2018.0, 3.0, "D"),
            (2018.0, 4.0, "D"),
            (2022.0, 5.0, "R"),
            (2024.0, 6.0, "R"),
            (2024.0, 9.0, "I"),
            (2016.0, 1.0, "D"),
        ];
        for (y, w, p) in rows.iter() {
            t.push_row(vec![Cell::Number(*y), Cell::Number(*w), Cell::text(p)])
                .unwrap();
        }
        t
    }

    #[test]
    fn scores_go_to_their_period() {
        let config = AnalysisConfig::default();
        let keys = vec!["D".to_string(), "R".to_string(), "I".to_string()];
        let groups = period_groups(&simple_table(), "t", &config, &keys, |c| {
            Some(c.display_string())
        })
        .unwrap();
        assert_eq!(groups.len(), 2);
        let (name, pre) = &groups[0];
        assert_eq!(name, "Pre-Trump");
        assert_eq!(pre.values(&"D".to_string()), &[7.0, 8.0, 9.0]);
        assert_eq!(pre.parent().len(), 5);
        let (_, post) = &groups[1];
        assert_eq!(post.values(&"I".to_string()), &[9.0]);
        // 2016 belongs to no period.
        assert_eq!(post.parent().len(), 5);
    }

    #[test]
    fn periods_report() {
        let mut report = Report::new();
        let res = run_periods(
            &simple_table(),
            "simple-data.xlsx",
            &AnalysisConfig::default(),
            &mut report,
            &ChartSink::disabled(),
        )
        .unwrap();
        assert_eq!(res.len(), 2);
        assert_eq!(report.lines()[0], "Period Pre-Trump Party D wordsum stats:");
        assert!(report.contains(
            "Pre-Trump threshold exceeds 10; treating wordsum == 10 as meeting it."
        ));
        assert!(report.contains("Pre-Trump counts above 2-sigma: {'D': 0, 'R': 2, 'I': 0}"));
        // Post-Trump: 3, 4, 5, 6, 9 puts the cutoff just above 10 and nothing reaches 10.
        assert!(report.contains("Post-Trump counts above 2-sigma: {'D': 0, 'R': 0, 'I': 0}"));
        if stats::TTEST_AVAILABLE {
            assert!(report.contains("T-tests for period Pre-Trump:"));
            assert!(report.contains("D vs I: insufficient data for a t-test (n1=3, n2=0)"));
            assert_eq!(res[0].1.tests.len(), 3);
        } else {
            assert!(report.contains(TTEST_UNAVAILABLE_NOTICE));
        }
    }

    #[test]
    fn detailed_report() {
        let mut t = SurveyTable::new(vec![
            "year".to_string(),
            "wordsum".to_string(),
            "partyid".to_string(),
        ]);
        let rows: [(f64, f64, Cell); 6] = [
            (2010.0, 6.0, Cell::text("Strong democrat")),
            (2012.0, 8.0, Cell::text("Strong democrat")),
            (2014.0, 7.0, Cell::text("Independent, close to democrat")),
            (2014.0, 5.0, Cell::text("Independent, near democrat")),
            (2010.0, 9.0, Cell::text("Other party")),
            (2012.0, 4.0, Cell::Missing),
        ];
        for (y, w, p) in rows.iter() {
            t.push_row(vec![Cell::Number(*y), Cell::Number(*w), p.clone()])
                .unwrap();
        }
        let mut report = Report::new();
        let res = run_detailed(
            &t,
            "clean-data.xlsx",
            &AnalysisConfig::default(),
            &mut report,
            &ChartSink::disabled(),
        )
        .unwrap();
        let (_, pre) = &res[0];
        let keys: Vec<&str> = pre.groups.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(
            keys,
            vec!["Strong democrat", "Independent, near democrat", "Other"]
        );
        assert_eq!(
            pre.group("Independent, near democrat").unwrap().summary.count,
            2
        );
        assert!(report.contains("Period Pre-Trump wordsum stats by party:"));
        assert!(report.contains("Period Post-Trump wordsum stats by party:"));
        // The Post-Trump period is empty: no summaries and no tests.
        assert!(res[1].1.tests.is_empty());
        if stats::TTEST_AVAILABLE {
            // Other has a single score: it is tested but lacks data.
            assert_eq!(pre.tests.len(), 3);
        }
        assert!(report.contains(
            "Pre-Trump counts above 2-sigma: {'Strong democrat': 0, 'Independent, near democrat': 0, 'Other': 0}"
        ));
    }
}
