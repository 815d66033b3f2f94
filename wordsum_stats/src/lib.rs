/*!
Cleaning and group statistics for the wordsum survey responses.

The pipeline runs in one direction: a [`SurveyTable`] is filtered with
[`filter::retain_valid_rows`], its party labels are collapsed with
[`normalize::party_letter`] or a [`normalize::DetailedPartyNormalizer`], the
scores are grouped with a [`builder::GroupBuilder`], and [`analyze_groups`]
produces the summaries, the 2-sigma exceedance counts and the significance
tests of the groups.

See the [`manual`] for the meaning of each step.
*/

mod config;
use log::{debug, info};

use std::fmt::Display;

pub use crate::config::*;

pub mod builder;
pub mod filter;
pub mod manual;
pub mod normalize;
pub mod stats;
mod table;

pub use crate::builder::{GroupBuilder, Groups};
pub use crate::table::SurveyTable;

/// Which pairs of sub-groups get a significance test.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum PairSelection {
    /// Every pair, in key order. Pairs involving an empty group report insufficient data.
    AllGroups,
    /// Only pairs of groups that received at least one score.
    NonEmptyGroups,
}

/// The statistics of one sub-group.
#[derive(PartialEq, Debug, Clone)]
pub struct GroupStats {
    pub key: String,
    pub summary: Summary,
    /// Number of scores meeting the 2-sigma threshold of the parent population.
    pub exceedances: usize,
    pub histogram: [u64; stats::HISTOGRAM_BINS],
}

/// Everything computed for one parent population (a period, an election).
#[derive(PartialEq, Debug, Clone)]
pub struct GroupAnalysis {
    pub threshold: Threshold,
    pub groups: Vec<GroupStats>,
    pub tests: Vec<PairTest>,
}

impl GroupAnalysis {
    pub fn group(&self, key: &str) -> Option<&GroupStats> {
        self.groups.iter().find(|g| g.key == key)
    }

    pub fn exceedance_counts(&self) -> Vec<(String, usize)> {
        self.groups
            .iter()
            .map(|g| (g.key.clone(), g.exceedances))
            .collect()
    }
}

/// All the unordered pairs of a list, in order: (0,1), (0,2), ..., (1,2), ...
pub fn unordered_pairs<T: Clone>(items: &[T]) -> Vec<(T, T)> {
    let mut res: Vec<(T, T)> = Vec::new();
    for (i, left) in items.iter().enumerate() {
        for right in items[i + 1..].iter() {
            res.push((left.clone(), right.clone()));
        }
    }
    res
}

/// Runs the statistics of a parent population and its sub-groups.
///
/// The threshold is computed over the parent population, then applied to
/// every sub-group.
pub fn analyze_groups<K>(groups: &Groups<K>, pairs: PairSelection) -> GroupAnalysis
where
    K: Eq + Clone + Display,
{
    let threshold = stats::threshold(groups.parent());
    info!(
        "analyze_groups: {} scores in {} groups, threshold {:?}",
        groups.parent().len(),
        groups.keys().len(),
        threshold.value
    );

    let group_stats: Vec<GroupStats> = groups
        .iter()
        .map(|(k, v)| GroupStats {
            key: k.to_string(),
            summary: stats::summarize(v),
            exceedances: stats::exceedance_count(v, &threshold),
            histogram: stats::histogram_bins(v),
        })
        .collect();

    let candidates: Vec<(String, &[f64])> = groups
        .iter()
        .filter(|(_, v)| pairs == PairSelection::AllGroups || !v.is_empty())
        .map(|(k, v)| (k.to_string(), v))
        .collect();
    let tests: Vec<PairTest> = unordered_pairs(&candidates)
        .into_iter()
        .map(|((left, lv), (right, rv))| PairTest {
            outcome: stats::welch_t_test(lv, rv),
            left,
            right,
        })
        .collect();
    debug!("analyze_groups: {} pair tests", tests.len());

    GroupAnalysis {
        threshold,
        groups: group_stats,
        tests,
    }
}
