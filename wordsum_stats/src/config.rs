// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// Lowest observable wordsum score.
pub const WORDSUM_MIN: f64 = 1.0;
/// Highest observable wordsum score. No value can exceed it.
pub const WORDSUM_MAX: f64 = 10.0;

/// The survey years kept by the cleaning step, unless configured otherwise.
pub const DEFAULT_SURVEY_YEARS: [i64; 6] = [2010, 2012, 2014, 2018, 2022, 2024];

/// The content of one spreadsheet cell, as seen by the cleaning pipeline.
///
/// Readers are expected to map empty cells, NaN and spreadsheet errors to `Missing`.
#[derive(PartialEq, Debug, Clone)]
pub enum Cell {
    Missing,
    Text(String),
    Number(f64),
}

impl Cell {
    pub fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// The string form of the cell, the way a spreadsheet would show it.
    /// Integral numbers are printed without a fractional part.
    pub fn display_string(&self) -> String {
        match self {
            Cell::Missing => "nan".to_string(),
            Cell::Text(s) => s.clone(),
            Cell::Number(x) if x.fract() == 0.0 && x.abs() < 1e15 => format!("{}", *x as i64),
            Cell::Number(x) => x.to_string(),
        }
    }
}

/// The simplified party identification.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub enum PartyLabel {
    Democrat,
    Republican,
    Independent,
}

impl PartyLabel {
    /// All the labels, in reporting order.
    pub const ALL: [PartyLabel; 3] = [
        PartyLabel::Democrat,
        PartyLabel::Republican,
        PartyLabel::Independent,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            PartyLabel::Democrat => "D",
            PartyLabel::Republican => "R",
            PartyLabel::Independent => "I",
        }
    }
}

impl Display for PartyLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ******** Output data structures *********

/// Descriptive statistics of the wordsum values of one group.
///
/// Everything except the count is undefined for an empty group, and the
/// standard deviation is undefined for a group of one.
#[derive(PartialEq, Debug, Clone)]
pub struct Summary {
    pub count: usize,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

impl Summary {
    pub const EMPTY: Summary = Summary {
        count: 0,
        mean: None,
        median: None,
        std: None,
        min: None,
        q25: None,
        q75: None,
        max: None,
    };
}

/// The 2-sigma cutoff of a parent population.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct Threshold {
    pub mean: Option<f64>,
    pub std: Option<f64>,
    /// mean + 2 std, undefined when the standard deviation is.
    pub value: Option<f64>,
}

impl Threshold {
    /// True when the cutoff lies above the highest observable score, in which
    /// case the cap itself counts as meeting it.
    pub fn exceeds_cap(&self) -> bool {
        matches!(self.value, Some(v) if v > WORDSUM_MAX)
    }
}

/// The outcome of a Welch two-sample t-test.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct TTest {
    pub t: f64,
    pub p: f64,
    pub df: f64,
    pub n1: usize,
    pub n2: usize,
}

/// A significance test may not always be computed. None of the cases is an error.
#[derive(PartialEq, Debug, Clone, Copy)]
pub enum SignificanceTest {
    Computed(TTest),
    /// One of the groups has fewer than two values, or both have no spread.
    InsufficientData { n1: usize, n2: usize },
    /// The crate was built without the `ttest` feature.
    Unavailable,
}

/// A test between two named sub-groups of the same parent group.
#[derive(PartialEq, Debug, Clone)]
pub struct PairTest {
    pub left: String,
    pub right: String,
    pub outcome: SignificanceTest,
}

/// One entry of a categorical distribution.
#[derive(PartialEq, Debug, Clone)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
    /// Share of the total, in percent, rounded to 2 decimals.
    pub percent: f64,
}

/// Errors that prevent a table operation from completing.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum TableError {
    MissingColumn(String),
    RaggedRow { row: usize, expected: usize, found: usize },
}

impl Error for TableError {}

impl Display for TableError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableError::MissingColumn(name) => write!(f, "column {:?} not found", name),
            TableError::RaggedRow {
                row,
                expected,
                found,
            } => write!(
                f,
                "row {} has {} cells, expected {}",
                row, found, expected
            ),
        }
    }
}
