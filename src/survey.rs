use log::{debug, info, warn};

use snafu::{prelude::*, Snafu};
use wordsum_stats::*;

use std::fs;

use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::{Args, Command};

pub mod charts;
pub mod cleaning;
pub mod config_reader;
pub mod education;
pub mod elections;
pub mod io_common;
pub mod io_csv;
pub mod io_excel;
pub mod io_writer;
pub mod periods;
pub mod report;

use crate::survey::charts::ChartSink;
use crate::survey::config_reader::*;
use crate::survey::report::Report;

#[derive(Debug, Snafu)]
pub enum SurveyError {
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("The workbook {path} has no worksheet"))]
    EmptyExcel { path: String },
    #[snafu(display("The workbook {path} has no worksheet named {name}"))]
    MissingWorksheet { path: String, name: String },
    #[snafu(display("The file {path} has no header row"))]
    MissingHeader { path: String },
    #[snafu(display("Error reading the csv file {path}"))]
    CsvRead { source: csv::Error, path: String },
    #[snafu(display("Error writing the workbook {path}"))]
    WritingExcel {
        source: rust_xlsxwriter::XlsxError,
        path: String,
    },
    #[snafu(display("Error reading {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing the configuration {path}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error serializing the summary"))]
    WritingJson { source: serde_json::Error },
    #[snafu(display("Error writing {path}"))]
    WritingFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Unexpected data in {path}"))]
    Table {
        source: wordsum_stats::TableError,
        path: String,
    },
    #[snafu(display("Error drawing the chart {path}: {message}"))]
    Drawing { path: String, message: String },
    #[snafu(display("Error reading the reference report {path}"))]
    ReadingReference {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("The report differs from the reference report {path}"))]
    ReferenceMismatch { path: String },
    #[snafu(display("Invalid configuration: {message}"))]
    InvalidConfig { message: String },
}

pub type SurveyResult<T> = Result<T, SurveyError>;

// ******** Summaries *********

fn test_to_json(t: &PairTest) -> JSValue {
    match t.outcome {
        SignificanceTest::Computed(tt) => json!({
            "left": t.left,
            "right": t.right,
            "t": tt.t,
            "p": tt.p,
            "df": tt.df,
            "n1": tt.n1,
            "n2": tt.n2,
        }),
        SignificanceTest::InsufficientData { n1, n2 } => json!({
            "left": t.left,
            "right": t.right,
            "insufficientData": true,
            "n1": n1,
            "n2": n2,
        }),
        SignificanceTest::Unavailable => json!({
            "left": t.left,
            "right": t.right,
            "unavailable": true,
        }),
    }
}

fn summary_to_json(s: &Summary) -> JSValue {
    json!({
        "count": s.count,
        "mean": s.mean,
        "median": s.median,
        "std": s.std,
        "min": s.min,
        "25%": s.q25,
        "75%": s.q75,
        "max": s.max,
    })
}

/// The JSON form of the analysis of one parent population.
pub fn analysis_to_json(name: &str, a: &GroupAnalysis) -> JSValue {
    let groups: Vec<JSValue> = a
        .groups
        .iter()
        .map(|g| {
            json!({
                "group": g.key,
                "summary": summary_to_json(&g.summary),
                "exceedances": g.exceedances,
                "histogram": g.histogram.to_vec(),
            })
        })
        .collect();
    let tests: Vec<JSValue> = a.tests.iter().map(test_to_json).collect();
    json!({
        "name": name,
        "threshold": {
            "mean": a.threshold.mean,
            "std": a.threshold.std,
            "value": a.threshold.value,
        },
        "groups": groups,
        "tests": tests,
    })
}

fn analyses_to_json(command: &str, analyses: &[(String, GroupAnalysis)]) -> JSValue {
    let l: Vec<JSValue> = analyses
        .iter()
        .map(|(name, a)| analysis_to_json(name, a))
        .collect();
    json!({ "command": command, "analyses": l })
}

fn write_summary(summary: &JSValue, out: &str) -> SurveyResult<()> {
    let pretty = serde_json::to_string_pretty(summary).context(WritingJsonSnafu {})?;
    if out.is_empty() || out == "stdout" {
        println!("{}", pretty);
    } else {
        fs::write(out, pretty).context(WritingFileSnafu { path: out })?;
        info!("write_summary: summary written to {}", out);
    }
    Ok(())
}

/// Compares the report with a reference report. Differences are printed and fail the run.
pub fn check_reference(report: &str, reference_path: &str) -> SurveyResult<()> {
    let reference = fs::read_to_string(reference_path).context(ReadingReferenceSnafu {
        path: reference_path,
    })?;
    if reference.trim_end() != report.trim_end() {
        warn!("Found differences with the reference report");
        print_diff(reference.trim_end(), report.trim_end(), "\n");
        return ReferenceMismatchSnafu {
            path: reference_path,
        }
        .fail();
    }
    Ok(())
}

// ******** Commands *********

pub fn run(args: &Args) -> SurveyResult<()> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(dir) = &args.chart_dir {
        config.chart_directory = Some(dir.clone());
    }
    debug!("run: config: {:?}", config);
    let charts = if args.no_charts {
        ChartSink::disabled()
    } else {
        ChartSink::in_directory(config.chart_directory(), args.command.name())
    };
    let worksheet = args.worksheet.as_deref();
    let mut report = Report::new();

    let summary: JSValue = match &args.command {
        Command::Clean {
            input,
            clean_out,
            simple_out,
        } => {
            let stats = cleaning::run_clean(
                input,
                worksheet,
                clean_out,
                simple_out,
                &config,
                &mut report,
            )?;
            json!({ "command": "clean", "cleaning": stats.to_json() })
        }
        Command::CleanEduc {
            input,
            clean_out,
            simple_out,
        } => {
            let stats =
                cleaning::run_clean_educ(input, worksheet, clean_out, simple_out, &mut report)?;
            json!({ "command": "clean-educ", "cleaning": stats.to_json() })
        }
        Command::Periods { input } => {
            let table = io_common::read_table(input, worksheet)?;
            let res = periods::run_periods(&table, input, &config, &mut report, &charts)?;
            analyses_to_json("periods", &res)
        }
        Command::Detailed { input } => {
            let table = io_common::read_table(input, worksheet)?;
            let res = periods::run_detailed(&table, input, &config, &mut report, &charts)?;
            analyses_to_json("detailed", &res)
        }
        Command::Elections { input } => {
            let table = io_common::read_table(input, worksheet)?;
            let res = elections::run_elections(&table, input, &config, &mut report, &charts)?;
            analyses_to_json("elections", &res)
        }
        Command::Education { input } => {
            let table = io_common::read_table(input, worksheet)?;
            let res = education::run_education(&table, input, &config, &mut report, &charts)?;
            education::distributions_to_json(&res)
        }
    };

    print!("{}", report.text());

    if let Some(out) = &args.summary_out {
        write_summary(&summary, out)?;
    }

    // The reference report, if provided for comparison
    if let Some(reference_path) = &args.reference {
        check_reference(&report.text(), reference_path)?;
    }
    Ok(())
}
