use crate::compare::venn::Region;
use crate::report::DecisionReport;

fn list(items: &[String]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.join(", ")
    }
}

fn cell(value: Option<i32>) -> String {
    value.map_or_else(|| "-".to_string(), |value| value.to_string())
}

pub fn to_markdown(report: &DecisionReport) -> String {
    let mut output = String::new();
    output.push_str("# Decision Report\n\n");
    output.push_str(&format!("Generated: {}\n\n", report.generated_at.to_rfc3339()));

    output.push_str("## Weights\n\n");
    output.push_str(&format!(
        "Budget: {} points, {} allocated\n\n",
        report.budget, report.allocated
    ));
    for entry in &report.features {
        output.push_str(&format!(
            "- {}: {} ({:.1}%)\n",
            entry.name,
            entry.weight.value,
            entry.weight.percent * 100.0
        ));
    }
    output.push('\n');

    output.push_str("## Scores\n\n");
    for score in &report.scores {
        output.push_str(&format!("- {}\n", score.message(report.style)));
    }
    output.push('\n');

    output.push_str("## Radar\n\n");
    for radar in &report.radar {
        let labels: Vec<&str> = radar.series.iter().map(|s| s.option.as_str()).collect();
        output.push_str(&format!("### {}\n\n", labels.join(" vs ")));
        for (row, feature) in radar.features.iter().enumerate() {
            let values: Vec<String> = radar
                .series
                .iter()
                .map(|series| cell(series.values.get(row).copied().flatten()))
                .collect();
            output.push_str(&format!("- {}: {}\n", feature, values.join(" | ")));
        }
        output.push('\n');
    }

    output.push_str("## Venn (2-way)\n\n");
    if report.venn2.is_empty() {
        output.push_str("- none\n\n");
    }
    for venn in &report.venn2 {
        let (first, second) = match venn.labels.as_slice() {
            [first, second, ..] => (first.as_str(), second.as_str()),
            [first] => (first.as_str(), first.as_str()),
            [] => ("A", "B"),
        };
        let [only_a, only_b, shared] = venn.sizes();
        output.push_str(&format!("### {first} / {second}\n\n"));
        output.push_str(&format!("- only {first} [{only_a}]: {}\n", list(&venn.only_a)));
        output.push_str(&format!("- only {second} [{only_b}]: {}\n", list(&venn.only_b)));
        output.push_str(&format!("- shared [{shared}]: {}\n\n", list(&venn.shared)));
    }

    if !report.venn3.is_empty() {
        output.push_str("## Venn (3-way)\n\n");
        for venn in &report.venn3 {
            output.push_str(&format!("### {}\n\n", venn.labels.join(" / ")));
            for region in Region::ALL {
                let members = venn.region(region);
                output.push_str(&format!(
                    "- {} [{}]: {}\n",
                    region.code(),
                    members.len(),
                    list(members)
                ));
            }
            output.push('\n');
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::decision::Decision;
    use crate::model::ratings::RatingMatrix;
    use crate::model::weighting::{FeatureWeight, Weighting};
    use crate::report::{build_report, ReportRequest};
    use crate::types::config::ScoreStyle;

    #[test]
    fn markdown_report_contains_sections() {
        let decision = Decision::example();
        let request = ReportRequest {
            venn3: true,
            ..ReportRequest::default()
        };
        let report = build_report(&decision, &request).expect("report builds");

        let rendered = to_markdown(&report);
        assert!(rendered.contains("# Decision Report"));
        assert!(rendered.contains("## Weights"));
        assert!(rendered.contains("- feature4: 4 (40.0%)"));
        assert!(rendered.contains("- option1 meets 60% of your desired features."));
        assert!(rendered.contains("### option1 vs option2"));
        assert!(rendered.contains("### option1 / option2"));
        assert!(rendered.contains("- shared [0]: -"));
        assert!(rendered.contains("Budget: 10 points, 10 allocated"));
        assert!(rendered.contains("## Venn (3-way)"));
        assert!(rendered.contains("- 111 [0]: -"));
    }

    #[test]
    fn markdown_uses_fraction_style_when_requested() {
        let decision = Decision::from_parts(
            vec!["speed".to_string()],
            Weighting::new(1).with("speed", FeatureWeight::FULL),
            vec!["solo".to_string()],
            RatingMatrix::new().with("solo", "speed", 5),
        );
        let request = ReportRequest {
            style: ScoreStyle::Fraction,
            ..ReportRequest::default()
        };
        let report = build_report(&decision, &request).expect("report builds");
        let rendered = to_markdown(&report);
        assert!(rendered.contains("- solo: 0.5"));
        assert!(rendered.contains("### solo\n"));
        assert!(rendered.contains("## Venn (2-way)\n\n- none"));
    }
}
