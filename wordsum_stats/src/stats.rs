use log::debug;

use crate::config::*;

/// True when the crate was built with support for significance tests.
pub const TTEST_AVAILABLE: bool = cfg!(feature = "ttest");

/// Number of histogram bins between the lowest and the highest score.
pub const HISTOGRAM_BINS: usize = 9;

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Sample variance (n - 1 denominator). Undefined below two values.
pub fn sample_variance(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|x| (x - m) * (x - m)).sum();
    Some(ss / (values.len() - 1) as f64)
}

pub fn sample_std(values: &[f64]) -> Option<f64> {
    sample_variance(values).map(f64::sqrt)
}

/// Quantile of already sorted values, interpolating linearly between the two
/// closest ranks.
fn sorted_quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted_quantile(&sorted, q)
}

/// Descriptive statistics of a group. Never fails: an empty group gives
/// `Summary::EMPTY`.
pub fn summarize(values: &[f64]) -> Summary {
    if values.is_empty() {
        return Summary::EMPTY;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    Summary {
        count: sorted.len(),
        mean: mean(&sorted),
        median: sorted_quantile(&sorted, 0.5),
        std: sample_std(&sorted),
        min: sorted.first().cloned(),
        q25: sorted_quantile(&sorted, 0.25),
        q75: sorted_quantile(&sorted, 0.75),
        max: sorted.last().cloned(),
    }
}

/// The 2-sigma cutoff of a parent population.
pub fn threshold(parent: &[f64]) -> Threshold {
    let m = mean(parent);
    let s = sample_std(parent);
    let value = match (m, s) {
        (Some(m), Some(s)) => Some(m + 2.0 * s),
        _ => None,
    };
    Threshold {
        mean: m,
        std: s,
        value,
    }
}

/// Whether a single score meets the cutoff. Above the cap, only the cap itself does.
pub fn meets_threshold(value: f64, threshold: &Threshold) -> bool {
    match threshold.value {
        Some(t) if t > WORDSUM_MAX => value >= WORDSUM_MAX,
        Some(t) => value > t,
        None => false,
    }
}

pub fn exceedance_count(values: &[f64], threshold: &Threshold) -> usize {
    values
        .iter()
        .filter(|v| meets_threshold(**v, threshold))
        .count()
}

/// Welch's two-sample t-test, two-sided, without assuming equal variances.
pub fn welch_t_test(a: &[f64], b: &[f64]) -> SignificanceTest {
    let (n1, n2) = (a.len(), b.len());
    if !TTEST_AVAILABLE {
        return SignificanceTest::Unavailable;
    }
    let (m1, m2, v1, v2) = match (mean(a), mean(b), sample_variance(a), sample_variance(b)) {
        (Some(m1), Some(m2), Some(v1), Some(v2)) => (m1, m2, v1, v2),
        _ => return SignificanceTest::InsufficientData { n1, n2 },
    };
    let se1 = v1 / n1 as f64;
    let se2 = v2 / n2 as f64;
    let se = se1 + se2;
    if se <= 0.0 {
        return SignificanceTest::InsufficientData { n1, n2 };
    }
    let t = (m1 - m2) / se.sqrt();
    let df = se * se / (se1 * se1 / (n1 - 1) as f64 + se2 * se2 / (n2 - 1) as f64);
    debug!("welch_t_test: t={} df={} n1={} n2={}", t, df, n1, n2);
    match two_sided_p_value(t, df) {
        Some(p) => SignificanceTest::Computed(TTest { t, p, df, n1, n2 }),
        None => SignificanceTest::InsufficientData { n1, n2 },
    }
}

#[cfg(feature = "ttest")]
fn two_sided_p_value(t: f64, df: f64) -> Option<f64> {
    use statrs::distribution::{ContinuousCDF, StudentsT};
    let dist = StudentsT::new(0.0, 1.0, df).ok()?;
    Some((2.0 * dist.sf(t.abs())).clamp(0.0, 1.0))
}

#[cfg(not(feature = "ttest"))]
fn two_sided_p_value(_t: f64, _df: f64) -> Option<f64> {
    None
}

/// Counts the scores in the bins [1,2), [2,3), ..., [9,10]. The last bin is closed.
/// Scores outside the observable range are ignored.
pub fn histogram_bins(values: &[f64]) -> [u64; HISTOGRAM_BINS] {
    let mut bins = [0u64; HISTOGRAM_BINS];
    for v in values.iter().cloned() {
        if !(WORDSUM_MIN..=WORDSUM_MAX).contains(&v) {
            continue;
        }
        let idx = ((v - WORDSUM_MIN).floor() as usize).min(HISTOGRAM_BINS - 1);
        bins[idx] += 1;
    }
    bins
}

/// Value counts, most frequent first. Ties keep the order of first appearance.
pub fn category_counts<S: AsRef<str>>(values: &[S]) -> Vec<CategoryCount> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for v in values.iter() {
        let v = v.as_ref();
        match counts.iter_mut().find(|(c, _)| c == v) {
            Some(entry) => entry.1 += 1,
            None => counts.push((v.to_string(), 1)),
        }
    }
    // Stable sort.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    let total = values.len() as f64;
    counts
        .into_iter()
        .map(|(category, count)| CategoryCount {
            category,
            count,
            percent: (count as f64 / total * 100.0 * 100.0).round() / 100.0,
        })
        .collect()
}
