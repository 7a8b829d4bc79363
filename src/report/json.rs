use crate::report::DecisionReport;

pub fn to_json(report: &DecisionReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::decision::Decision;
    use crate::report::{build_report, ReportRequest};

    #[test]
    fn json_report_contains_scores_and_regions() {
        let decision = Decision::example();
        let request = ReportRequest {
            venn3: true,
            ..ReportRequest::default()
        };
        let report = build_report(&decision, &request).expect("report builds");

        let rendered = to_json(&report).expect("json should serialize");
        let value: serde_json::Value = serde_json::from_str(&rendered).expect("valid json");
        assert_eq!(value["scores"][0]["option"], "option1");
        assert_eq!(value["scores"][0]["percent"], 60);
        assert_eq!(value["budget"], 10);
        assert_eq!(value["venn3"][0]["regions"][0]["region"], "100");
        assert!(value["generated_at"].is_string());
    }
}
