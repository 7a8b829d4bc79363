use crate::error::DecideError;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DecideConfig {
    pub weighting: Option<WeightingConfig>,
    pub limits: Option<LimitsConfig>,
    pub scoring: Option<ScoringConfig>,
    pub report: Option<ReportConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightingConfig {
    pub avg_points_per_feature: Option<u32>,
    pub shuffle: Option<bool>,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    pub max_features: Option<usize>,
    pub max_options: Option<usize>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreStyle {
    /// `round(score * 10)` reported as a whole percentage.
    #[default]
    Percent,
    /// Legacy `score / 10` fraction.
    Fraction,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RatingPolicy {
    #[default]
    Permissive,
    Strict,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringConfig {
    pub style: Option<ScoreStyle>,
    pub rating_policy: Option<RatingPolicy>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormatSetting {
    Md,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    pub format: Option<ReportFormatSetting>,
}

/// Resolved settings with every default filled in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settings {
    pub avg_points_per_feature: u32,
    pub shuffle: bool,
    pub seed: Option<u64>,
    pub max_features: usize,
    pub max_options: usize,
    pub score_style: ScoreStyle,
    pub rating_policy: RatingPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            avg_points_per_feature: 3,
            shuffle: true,
            seed: None,
            max_features: 10,
            max_options: 5,
            score_style: ScoreStyle::Percent,
            rating_policy: RatingPolicy::Permissive,
        }
    }
}

impl DecideConfig {
    pub fn settings(&self) -> Settings {
        let defaults = Settings::default();
        let weighting = self.weighting.as_ref();
        let limits = self.limits.as_ref();
        let scoring = self.scoring.as_ref();
        Settings {
            avg_points_per_feature: weighting
                .and_then(|w| w.avg_points_per_feature)
                .unwrap_or(defaults.avg_points_per_feature),
            shuffle: weighting
                .and_then(|w| w.shuffle)
                .unwrap_or(defaults.shuffle),
            seed: weighting.and_then(|w| w.seed),
            max_features: limits
                .and_then(|l| l.max_features)
                .unwrap_or(defaults.max_features),
            max_options: limits
                .and_then(|l| l.max_options)
                .unwrap_or(defaults.max_options),
            score_style: scoring
                .and_then(|s| s.style)
                .unwrap_or(defaults.score_style),
            rating_policy: scoring
                .and_then(|s| s.rating_policy)
                .unwrap_or(defaults.rating_policy),
        }
    }

    pub fn report_format(&self) -> Option<ReportFormatSetting> {
        self.report.as_ref().and_then(|report| report.format)
    }

    pub fn validate(&self) -> Result<(), DecideError> {
        if let Some(weighting) = &self.weighting {
            if weighting.avg_points_per_feature == Some(0) {
                return Err(DecideError::ConfigParse(
                    "weighting.avg_points_per_feature must be greater than 0".to_string(),
                ));
            }
        }

        if let Some(limits) = &self.limits {
            if limits.max_features == Some(0) {
                return Err(DecideError::ConfigParse(
                    "limits.max_features must be greater than 0".to_string(),
                ));
            }
            if limits.max_options == Some(0) {
                return Err(DecideError::ConfigParse(
                    "limits.max_options must be greater than 0".to_string(),
                ));
            }
        }

        Ok(())
    }
}
