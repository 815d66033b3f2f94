use log::{debug, info};

use serde::{Deserialize, Serialize};
use snafu::prelude::*;
use std::fs;

use wordsum_stats::DEFAULT_SURVEY_YEARS;

use crate::survey::*;

pub const DEFAULT_CHART_DIRECTORY: &str = "charts";
pub const DEFAULT_TOP_EDUCATION_CATEGORIES: usize = 10;

/// A named group of survey years.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct PeriodConfig {
    pub name: String,
    pub years: Vec<i64>,
}

/// A presidential election: the vote column, the candidates to compare and the
/// survey years in which the vote was asked.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ElectionConfig {
    pub label: String,
    #[serde(rename = "voteColumn")]
    pub vote_column: String,
    pub candidates: Vec<String>,
    #[serde(rename = "surveyYears")]
    pub survey_years: Vec<i64>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(rename = "surveyYears", default = "default_survey_years")]
    pub survey_years: Vec<i64>,
    #[serde(default = "default_periods")]
    pub periods: Vec<PeriodConfig>,
    #[serde(default = "default_elections")]
    pub elections: Vec<ElectionConfig>,
    #[serde(rename = "chartDirectory")]
    pub chart_directory: Option<String>,
    #[serde(
        rename = "topEducationCategories",
        default = "default_top_education_categories"
    )]
    pub top_education_categories: usize,
}

fn default_survey_years() -> Vec<i64> {
    DEFAULT_SURVEY_YEARS.to_vec()
}

fn default_periods() -> Vec<PeriodConfig> {
    vec![
        PeriodConfig {
            name: "Pre-Trump".to_string(),
            years: vec![2010, 2012, 2014],
        },
        PeriodConfig {
            name: "Post-Trump".to_string(),
            years: vec![2018, 2022, 2024],
        },
    ]
}

fn election(label: &str, column: &str, candidates: [&str; 2], years: &[i64]) -> ElectionConfig {
    ElectionConfig {
        label: label.to_string(),
        vote_column: column.to_string(),
        candidates: candidates.iter().map(|c| c.to_string()).collect(),
        survey_years: years.to_vec(),
    }
}

fn default_elections() -> Vec<ElectionConfig> {
    vec![
        election("2012 Election", "pres12", ["Obama", "Romney"], &[2014, 2018]),
        election("2016 Election", "pres16", ["Clinton", "Trump"], &[2018, 2022]),
        election("2020 Election", "pres20", ["Biden", "Trump"], &[2022]),
    ]
}

fn default_top_education_categories() -> usize {
    DEFAULT_TOP_EDUCATION_CATEGORIES
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            survey_years: default_survey_years(),
            periods: default_periods(),
            elections: default_elections(),
            chart_directory: None,
            top_education_categories: default_top_education_categories(),
        }
    }
}

impl AnalysisConfig {
    /// The period a survey year belongs to, if any.
    pub fn period_of(&self, year: i64) -> Option<&str> {
        self.periods
            .iter()
            .find(|p| p.years.contains(&year))
            .map(|p| p.name.as_str())
    }

    pub fn chart_directory(&self) -> &str {
        self.chart_directory
            .as_deref()
            .unwrap_or(DEFAULT_CHART_DIRECTORY)
    }

    /// A year may only belong to one period, and an election needs at least one candidate.
    pub fn validate(&self) -> SurveyResult<()> {
        for (idx, p) in self.periods.iter().enumerate() {
            for other in self.periods[idx + 1..].iter() {
                if let Some(y) = p.years.iter().find(|y| other.years.contains(y)) {
                    return InvalidConfigSnafu {
                        message: format!(
                            "year {} is in both periods {} and {}",
                            y, p.name, other.name
                        ),
                    }
                    .fail();
                }
            }
        }
        for e in self.elections.iter() {
            ensure!(
                !e.candidates.is_empty(),
                InvalidConfigSnafu {
                    message: format!("the election {} has no candidate", e.label)
                }
            );
        }
        ensure!(
            self.top_education_categories > 0,
            InvalidConfigSnafu {
                message: "topEducationCategories must be positive"
            }
        );
        Ok(())
    }
}

pub fn read_config(path: &str) -> SurveyResult<AnalysisConfig> {
    let config_str = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: AnalysisConfig =
        serde_json::from_str(&config_str).context(ParsingJsonSnafu { path })?;
    info!("read_config: configuration read from {}", path);
    Ok(config)
}

/// The configuration from a file, or the defaults.
pub fn load_config(path: Option<&str>) -> SurveyResult<AnalysisConfig> {
    let config = match path {
        Some(p) => read_config(p)?,
        None => AnalysisConfig::default(),
    };
    config.validate()?;
    debug!("load_config: {:?}", config);
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_lookup() {
        let c = AnalysisConfig::default();
        assert_eq!(c.period_of(2010), Some("Pre-Trump"));
        assert_eq!(c.period_of(2024), Some("Post-Trump"));
        assert_eq!(c.period_of(2016), None);
        assert_eq!(c.chart_directory(), "charts");
        assert!(c.validate().is_ok());
    }

    #[test]
    fn partial_configuration() {
        let js = r#"{
            "surveyYears": [2012],
            "chartDirectory": "out",
            "elections": [
                {"label": "2020", "voteColumn": "pres20", "candidates": ["Biden", "Trump"], "surveyYears": [2022]}
            ]
        }"#;
        let c: AnalysisConfig = serde_json::from_str(js).unwrap();
        assert_eq!(c.survey_years, vec![2012]);
        assert_eq!(c.periods, AnalysisConfig::default().periods);
        assert_eq!(c.elections.len(), 1);
        assert_eq!(c.elections[0].vote_column, "pres20");
        assert_eq!(c.chart_directory(), "out");
        assert_eq!(c.top_education_categories, 10);
    }

    #[test]
    fn overlapping_periods_are_rejected() {
        let mut c = AnalysisConfig::default();
        c.periods[1].years.push(2014);
        assert!(c.validate().is_err());
    }

    #[test]
    fn elections_need_candidates() {
        let mut c = AnalysisConfig::default();
        c.elections[0].candidates.clear();
        assert!(c.validate().is_err());
    }

    #[test]
    fn missing_file() {
        assert!(load_config(Some("/nonexistent/config.json")).is_err());
        assert!(load_config(None).is_ok());
    }
}
