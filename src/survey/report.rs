// Console formatting of the statistics.

use wordsum_stats::*;

pub const TTEST_UNAVAILABLE_NOTICE: &str =
    "statistics support is not available; skipping t-tests.";

/// The lines printed by a command, kept so that they can be compared with a reference report.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct Report {
    lines: Vec<String>,
}

impl Report {
    pub fn new() -> Report {
        Report::default()
    }

    pub fn line<S: Into<String>>(&mut self, s: S) {
        self.lines.push(s.into());
    }

    pub fn blank(&mut self) {
        self.lines.push(String::new());
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn contains(&self, s: &str) -> bool {
        self.lines.iter().any(|l| l == s)
    }

    pub fn text(&self) -> String {
        let mut res = String::new();
        for l in self.lines.iter() {
            res.push_str(l);
            res.push('\n');
        }
        res
    }
}

fn trim_fraction(s: &str) -> String {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s.to_string()
    }
}

/// A number with the given significant digits, switching to the exponent form
/// for very small or very large magnitudes. Trailing zeros are dropped.
pub fn format_general(x: f64, digits: usize) -> String {
    if x == 0.0 || !x.is_finite() {
        return format!("{}", x);
    }
    let digits = digits.max(1);
    let exp = x.abs().log10().floor() as i32;
    if exp < -4 || exp >= digits as i32 {
        let s = format!("{:.*e}", digits - 1, x);
        match s.split_once('e') {
            Some((mantissa, e)) => {
                let e: i32 = e.parse().unwrap_or(0);
                let sign = if e < 0 { '-' } else { '+' };
                format!("{}e{}{:02}", trim_fraction(mantissa), sign, e.abs())
            }
            None => s,
        }
    } else {
        let decimals = (digits as i32 - 1 - exp).max(0) as usize;
        trim_fraction(&format!("{:.*}", decimals, x))
    }
}

/// 4 decimals, or `nan` when undefined.
pub fn format_stat(x: Option<f64>) -> String {
    match x {
        Some(v) => format!("{:.4}", v),
        None => "nan".to_string(),
    }
}

pub fn format_summary(s: &Summary) -> String {
    format!(
        "count={} mean={} std={} min={} 25%={} 50%={} 75%={} max={}",
        s.count,
        format_stat(s.mean),
        format_stat(s.std),
        format_stat(s.min),
        format_stat(s.q25),
        format_stat(s.median),
        format_stat(s.q75),
        format_stat(s.max)
    )
}

/// The threshold line of a parent population, and the note on the cap when it applies.
pub fn threshold_lines(label: &str, th: &Threshold) -> Vec<String> {
    let mut res = vec![format!(
        "{} population wordsum mean={}, std={}, threshold={}",
        label,
        format_stat(th.mean),
        format_stat(th.std),
        format_stat(th.value)
    )];
    if th.exceeds_cap() {
        res.push(format!(
            "{} threshold exceeds 10; treating wordsum == 10 as meeting it.",
            label
        ));
    }
    res
}

pub fn format_counts(counts: &[(String, usize)]) -> String {
    let l: Vec<String> = counts
        .iter()
        .map(|(k, c)| format!("'{}': {}", k, c))
        .collect();
    format!("{{{}}}", l.join(", "))
}

pub fn counts_line(label: &str, counts: &[(String, usize)]) -> String {
    format!("{} counts above 2-sigma: {}", label, format_counts(counts))
}

/// None for the tests that are not available at all.
pub fn format_test(t: &PairTest) -> Option<String> {
    match t.outcome {
        SignificanceTest::Computed(tt) => Some(format!(
            "{} vs {}: t={:.4}, p={}, n1={}, n2={}",
            t.left,
            t.right,
            tt.t,
            format_general(tt.p, 4),
            tt.n1,
            tt.n2
        )),
        SignificanceTest::InsufficientData { n1, n2 } => Some(format!(
            "{} vs {}: insufficient data for a t-test (n1={}, n2={})",
            t.left, t.right, n1, n2
        )),
        SignificanceTest::Unavailable => None,
    }
}

/// The lines of all the tests of a parent population. A single notice
/// replaces them when the statistics support is compiled out.
pub fn test_lines(tests: &[PairTest]) -> Vec<String> {
    if !stats::TTEST_AVAILABLE {
        return vec![TTEST_UNAVAILABLE_NOTICE.to_string()];
    }
    tests.iter().filter_map(format_test).collect()
}

pub fn format_category(c: &CategoryCount) -> String {
    format!("  {}: count={} percent={:.2}", c.category, c.count, c.percent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn general_format() {
        assert_eq!(format_general(0.10753119, 4), "0.1075");
        assert_eq!(format_general(0.00197901, 4), "0.001979");
        assert_eq!(format_general(1.23456e-7, 4), "1.235e-07");
        assert_eq!(format_general(1.0, 4), "1");
        assert_eq!(format_general(0.5, 4), "0.5");
        assert_eq!(format_general(0.0, 4), "0");
        assert_eq!(format_general(12346.0, 4), "1.235e+04");
    }

    #[test]
    fn summary_line() {
        let s = stats::summarize(&[7.0, 8.0, 9.0, 10.0, 10.0]);
        assert_eq!(
            format_summary(&s),
            "count=5 mean=8.8000 std=1.3038 min=7.0000 25%=8.0000 50%=9.0000 75%=10.0000 max=10.0000"
        );
        assert_eq!(
            format_summary(&Summary::EMPTY),
            "count=0 mean=nan std=nan min=nan 25%=nan 50%=nan 75%=nan max=nan"
        );
    }

    #[test]
    fn threshold_above_the_cap() {
        let th = stats::threshold(&[7.0, 8.0, 9.0, 10.0, 10.0]);
        let lines = threshold_lines("Post-Trump", &th);
        assert_eq!(
            lines,
            vec![
                "Post-Trump population wordsum mean=8.8000, std=1.3038, threshold=11.4077",
                "Post-Trump threshold exceeds 10; treating wordsum == 10 as meeting it."
            ]
        );
        let th = stats::threshold(&[3.0, 4.0, 5.0, 6.0]);
        assert_eq!(threshold_lines("Pre-Trump", &th).len(), 1);
    }

    #[test]
    fn counts() {
        let c = vec![("D".to_string(), 1), ("R".to_string(), 2), ("I".to_string(), 0)];
        assert_eq!(
            counts_line("Pre-Trump", &c),
            "Pre-Trump counts above 2-sigma: {'D': 1, 'R': 2, 'I': 0}"
        );
        assert_eq!(format_counts(&[]), "{}");
    }

    #[test]
    fn tests_lines() {
        let insufficient = PairTest {
            left: "D".to_string(),
            right: "I".to_string(),
            outcome: SignificanceTest::InsufficientData { n1: 3, n2: 0 },
        };
        let computed = PairTest {
            left: "D".to_string(),
            right: "R".to_string(),
            outcome: SignificanceTest::Computed(TTest {
                t: -1.8973665961010275,
                p: 0.10753119,
                df: 5.882352941176471,
                n1: 5,
                n2: 5,
            }),
        };
        assert_eq!(
            format_test(&computed).unwrap(),
            "D vs R: t=-1.8974, p=0.1075, n1=5, n2=5"
        );
        assert_eq!(
            format_test(&insufficient).unwrap(),
            "D vs I: insufficient data for a t-test (n1=3, n2=0)"
        );
        let lines = test_lines(&[computed, insufficient]);
        if stats::TTEST_AVAILABLE {
            assert_eq!(lines.len(), 2);
        } else {
            assert_eq!(lines, vec![TTEST_UNAVAILABLE_NOTICE.to_string()]);
        }
    }

    #[test]
    fn report_text() {
        let mut r = Report::new();
        r.line("a");
        r.blank();
        r.line(format!("{}", 2));
        assert_eq!(r.text(), "a\n\n2\n");
        assert!(r.contains("2"));
        assert_eq!(r.lines().len(), 3);
    }
}
