// Comparisons of the voters of the candidates of each presidential election.

use log::{debug, info};

use crate::survey::charts::*;
use crate::survey::report::*;
use crate::survey::*;

/// The scores of the voters of each candidate, among the respondents of the
/// survey years of the election. Votes for anybody else are left out, and so
/// are scores outside 1 to 10.
pub fn election_groups(
    table: &SurveyTable,
    path: &str,
    election: &ElectionConfig,
) -> SurveyResult<Groups<String>> {
    let vote_idx = table
        .column_index(&election.vote_column)
        .context(TableSnafu { path })?;
    let mut builder = GroupBuilder::new(&election.candidates);
    for (year, score, row) in io_common::scored_rows(table, path)? {
        if !(WORDSUM_MIN..=WORDSUM_MAX).contains(&score) {
            continue;
        }
        match year {
            Some(y) if election.survey_years.contains(&y) => {}
            _ => continue,
        }
        let vote = row[vote_idx].display_string();
        if election.candidates.contains(&vote) {
            builder.add(&vote, score);
        }
    }
    let groups = builder.build();
    debug!(
        "election_groups: {}: {} voters",
        election.label,
        groups.parent().len()
    );
    Ok(groups)
}

fn test_report(label: &str, a: &GroupAnalysis) -> Vec<String> {
    if !stats::TTEST_AVAILABLE {
        return vec![TTEST_UNAVAILABLE_NOTICE.to_string()];
    }
    let insufficient = format!("Insufficient data for t-test in {}.", label);
    if a.groups.iter().any(|g| g.summary.count == 0) {
        return vec![insufficient];
    }
    let mut res: Vec<String> = Vec::new();
    let mut lacking = false;
    for t in a.tests.iter() {
        match t.outcome {
            SignificanceTest::Computed(tt) => res.push(format!(
                "T-test for {}: {} vs {} t={:.4}, p={}, n1={}, n2={}",
                label,
                t.left,
                t.right,
                tt.t,
                format_general(tt.p, 4),
                tt.n1,
                tt.n2
            )),
            SignificanceTest::InsufficientData { .. } => lacking = true,
            SignificanceTest::Unavailable => {}
        }
    }
    if lacking {
        res.push(insufficient);
    }
    res
}

pub fn run_elections(
    table: &SurveyTable,
    path: &str,
    config: &AnalysisConfig,
    report: &mut Report,
    charts: &ChartSink,
) -> SurveyResult<Vec<(String, GroupAnalysis)>> {
    io_common::require_columns(table, path, &["year", "wordsum"])?;
    let mut elections: Vec<(&ElectionConfig, Groups<String>)> = Vec::new();
    for e in config.elections.iter() {
        let groups = election_groups(table, path, e)?;
        if groups.is_empty() {
            report.line(format!("No data available for {}.", e.label));
            continue;
        }
        elections.push((e, groups));
    }
    if elections.is_empty() {
        report.line("No election data available to analyze.");
        return Ok(Vec::new());
    }

    let mut res: Vec<(String, GroupAnalysis)> = Vec::new();
    let mut panels: Vec<HistogramPanel> = Vec::new();
    for (e, groups) in elections.iter() {
        let a = analyze_groups(groups, PairSelection::AllGroups);
        for l in threshold_lines(&e.label, &a.threshold) {
            report.line(l);
        }

        report.line(format!("{} wordsum stats by voter:", e.label));
        for g in a.groups.iter() {
            report.line(format!("Voter {}: {}", g.key, format_summary(&g.summary)));
            panels.push(HistogramPanel {
                title: format!("{} - {}", e.label, g.key),
                bins: g.histogram,
                color: series_color(0),
            });
        }

        for l in test_report(&e.label, &a) {
            report.line(l);
        }

        let counts = a.exceedance_counts();
        report.line(counts_line(&e.label, &counts));

        let title = format!("{}: 2-sigma exceeders by voter", e.label);
        let values: Vec<usize> = counts.iter().map(|(_, c)| *c).collect();
        charts.grouped_bars(
            &title,
            "Count above 2-sigma threshold",
            &e.candidates,
            &[BarSeries::plain(&e.label, values, series_color(0))],
        )?;
        let slices: Vec<PieSlice> = counts
            .iter()
            .enumerate()
            .map(|(idx, (k, c))| PieSlice {
                label: k.clone(),
                count: *c,
                color: series_color(idx),
            })
            .collect();
        charts.pie(&title, &slices)?;

        res.push((e.label.clone(), a));
        report.blank();
    }

    let columns = elections
        .iter()
        .map(|(e, _)| e.candidates.len())
        .max()
        .unwrap_or(1);
    charts.histogram_grid("Wordsum histograms by election and voter", &panels, columns)?;
    info!("run_elections: {} elections analyzed", res.len());
    Ok(res)
}
