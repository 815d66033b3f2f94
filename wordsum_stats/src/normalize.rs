use log::debug;

use crate::config::*;

/// Maps a party identification onto D, R or I.
///
/// Everything that is not a (strong or not very strong) democrat or republican
/// collapses into I, including numbers and missing cells.
pub fn party_letter(cell: &Cell) -> PartyLabel {
    match cell.as_text().map(|s| s.trim().to_lowercase()).as_deref() {
        Some("strong republican") | Some("not very strong republican") => PartyLabel::Republican,
        Some("strong democrat") | Some("not very strong democrat") => PartyLabel::Democrat,
        _ => PartyLabel::Independent,
    }
}

/// Parses a label written by `party_letter` back.
pub fn parse_party_code(cell: &Cell) -> Option<PartyLabel> {
    PartyLabel::ALL
        .iter()
        .find(|p| cell.as_text() == Some(p.code()))
        .cloned()
}

/// Near-duplicate labels of the survey export and their canonical form.
pub const PARTY_ALIASES: [(&str, &str); 3] = [
    ("Independent, close to democrat", "Independent, near democrat"),
    ("Independent, close to republican", "Independent, near republican"),
    ("Independent (neither, no response)", "Independent"),
];

pub const OTHER_LABEL: &str = "Other";

/// The fine-grained party labels, from the democrat end to the republican end.
pub const DETAILED_PARTY_ORDER: [&str; 8] = [
    "Strong democrat",
    "Not very strong democrat",
    "Independent, near democrat",
    "Independent",
    "Independent, near republican",
    "Not very strong republican",
    "Strong republican",
    OTHER_LABEL,
];

const PARTY_COLORS: [(&str, &str); 8] = [
    ("Strong republican", "#8B0000"),
    ("Not very strong republican", "#D33B3B"),
    ("Strong democrat", "#0B3D91"),
    ("Not very strong democrat", "#2E6FD8"),
    ("Independent, near republican", "#F7DADA"),
    ("Independent, near democrat", "#DCEBFF"),
    ("Independent", "#BDBDBD"),
    (OTHER_LABEL, "#D2B48C"),
];

pub const FALLBACK_COLOR: &str = "#CCCCCC";

/// The chart color of a detailed label.
pub fn party_color(label: &str) -> &'static str {
    PARTY_COLORS
        .iter()
        .find(|(l, _)| *l == label)
        .map(|(_, c)| *c)
        .unwrap_or(FALLBACK_COLOR)
}

pub fn merge_alias(label: &str) -> &str {
    PARTY_ALIASES
        .iter()
        .find(|(from, _)| *from == label)
        .map(|(_, to)| *to)
        .unwrap_or(label)
}

/// The fine-grained normalizer: merges near-duplicate labels and buckets every
/// label outside the known order into "Other".
///
/// It is built from the labels present in the data, so that only those are reported.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct DetailedPartyNormalizer {
    labels: Vec<String>,
}

impl DetailedPartyNormalizer {
    pub fn from_labels<'a, I>(raw_labels: I) -> DetailedPartyNormalizer
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut present: Vec<&str> = Vec::new();
        for raw in raw_labels {
            let l = merge_alias(raw);
            if !present.contains(&l) {
                present.push(l);
            }
        }
        let mut labels: Vec<String> = DETAILED_PARTY_ORDER
            .iter()
            .filter(|l| present.contains(l))
            .map(|l| l.to_string())
            .collect();
        let unknown: Vec<&&str> = present
            .iter()
            .filter(|l| !DETAILED_PARTY_ORDER.contains(l))
            .collect();
        if !unknown.is_empty() {
            debug!("DetailedPartyNormalizer: merging {:?} into Other", unknown);
            if !labels.iter().any(|l| l == OTHER_LABEL) {
                labels.push(OTHER_LABEL.to_string());
            }
        }
        DetailedPartyNormalizer { labels }
    }

    /// The labels present in the data, in reporting order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn normalize(&self, raw: &str) -> String {
        let l = merge_alias(raw);
        if DETAILED_PARTY_ORDER.contains(&l) {
            l.to_string()
        } else {
            OTHER_LABEL.to_string()
        }
    }

    /// Missing cells have no party.
    pub fn normalize_cell(&self, cell: &Cell) -> Option<String> {
        match cell {
            Cell::Missing => None,
            c => Some(self.normalize(&c.display_string())),
        }
    }
}
