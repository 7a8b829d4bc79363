pub mod json;
pub mod md;

use crate::compare::expand::{radar_all, venn2_all, venn3_all};
use crate::compare::scoring::{rank_options_as, OptionScore};
use crate::compare::venn::{Venn2, Venn3};
use crate::error::{DecideError, Result};
use crate::model::decision::Decision;
use crate::model::table::RadarInput;
use crate::model::weighting::WeightedFeature;
use crate::types::config::ScoreStyle;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Md,
}

/// What to put in a report.
#[derive(Debug, Clone, Default)]
pub struct ReportRequest {
    /// Options to compare; empty means every option of the decision.
    pub options: Vec<String>,
    /// Explicit radar selection; `None` expands over `options`.
    pub radar: Option<Vec<String>>,
    pub venn3: bool,
    pub style: ScoreStyle,
}

#[derive(Debug, Clone, Serialize)]
pub struct DecisionReport {
    pub generated_at: DateTime<Utc>,
    #[serde(skip)]
    pub style: ScoreStyle,
    pub budget: i64,
    pub allocated: i64,
    pub features: Vec<WeightedFeature>,
    pub scores: Vec<OptionScore>,
    pub radar: Vec<RadarInput>,
    pub venn2: Vec<Venn2>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub venn3: Vec<Venn3>,
}

pub fn build_report(decision: &Decision, request: &ReportRequest) -> Result<DecisionReport> {
    let table = decision.table();
    let options = if request.options.is_empty() {
        decision.options().to_vec()
    } else {
        request.options.clone()
    };
    if options.is_empty() {
        return Err(DecideError::InvariantViolation(
            "nothing to compare: the decision has no options".to_string(),
        ));
    }

    let radar = match &request.radar {
        Some(selection) => vec![table.radar(selection)?],
        None => radar_all(table, &options)?,
    };
    let venn3 = if request.venn3 {
        venn3_all(table, &options)?
    } else {
        Vec::new()
    };

    Ok(DecisionReport {
        generated_at: Utc::now(),
        style: request.style,
        budget: decision.weights().budget(),
        allocated: decision.weights().allocated(),
        features: decision.weights().iter().cloned().collect(),
        scores: rank_options_as(table, &options, request.style)?,
        radar,
        venn2: venn2_all(table, &options)?,
        venn3,
    })
}

pub fn render(report: &DecisionReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => json::to_json(report).map_err(DecideError::Json),
        OutputFormat::Md => Ok(md::to_markdown(report)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_defaults_to_every_option() {
        let decision = Decision::example();
        let report = build_report(&decision, &ReportRequest::default()).expect("report builds");
        assert_eq!(report.scores.len(), 4);
        assert_eq!(report.radar.len(), 6);
        assert_eq!(report.venn2.len(), 6);
        assert!(report.venn3.is_empty());
        assert_eq!(report.features.len(), 4);
    }

    #[test]
    fn report_honours_selection() {
        let decision = Decision::example();
        let request = ReportRequest {
            options: vec!["option2".into(), "option3".into(), "option4".into()],
            radar: Some(vec!["option4".into()]),
            venn3: true,
            style: ScoreStyle::Percent,
        };
        let report = build_report(&decision, &request).expect("report builds");
        assert_eq!(report.scores.len(), 3);
        assert_eq!(report.radar.len(), 1);
        assert_eq!(report.radar[0].series[0].option, "option4");
        assert_eq!(report.venn2.len(), 3);
        assert_eq!(report.venn3.len(), 1);
    }

    #[test]
    fn report_rejects_unknown_options() {
        let decision = Decision::example();
        let request = ReportRequest {
            options: vec!["option9".into()],
            ..ReportRequest::default()
        };
        assert!(matches!(
            build_report(&decision, &request),
            Err(DecideError::UnknownOption(_))
        ));
    }
}
