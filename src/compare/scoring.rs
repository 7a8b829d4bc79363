use crate::error::Result;
use crate::model::table::UnifiedTable;
use crate::types::config::ScoreStyle;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionScore {
    pub option: String,
    /// Σ rating × percent over every rated feature.
    pub weighted: f64,
    /// `weighted * 10`, rounded half to even.
    pub percent: i64,
}

impl OptionScore {
    fn new(option: String, weighted: f64) -> Self {
        Self {
            option,
            weighted,
            percent: (weighted * 10.0).round_ties_even() as i64,
        }
    }

    /// Legacy fractional match, `weighted / 10`.
    pub fn fraction(&self) -> f64 {
        self.weighted / 10.0
    }

    pub fn message(&self, style: ScoreStyle) -> String {
        match style {
            ScoreStyle::Percent => format!(
                "{} meets {}% of your desired features.",
                self.option, self.percent
            ),
            ScoreStyle::Fraction => format!("{}: {}", self.option, self.fraction()),
        }
    }
}

/// Weighted sum of one option's ratings. Unrated cells contribute nothing.
pub fn weighted_score(table: &UnifiedTable, option: &str) -> Result<f64> {
    let index = table.column_index(option)?;
    Ok(table
        .rows()
        .iter()
        .filter_map(|row| {
            row.ratings
                .get(index)
                .copied()
                .flatten()
                .map(|rating| f64::from(rating) * row.percent)
        })
        .sum())
}

/// Scores `options` and ranks them best first by the rounded percent; equal
/// scores keep input order.
///
/// Percent sums other than 1 are not corrected, so a score may exceed 100.
pub fn rank_options(table: &UnifiedTable, options: &[String]) -> Result<Vec<OptionScore>> {
    rank_options_as(table, options, ScoreStyle::Percent)
}

/// Like [`rank_options`], ordered by the value `style` prints: the rounded
/// percent, or the unrounded fraction.
pub fn rank_options_as(
    table: &UnifiedTable,
    options: &[String],
    style: ScoreStyle,
) -> Result<Vec<OptionScore>> {
    let mut scores = options
        .iter()
        .map(|option| Ok(OptionScore::new(option.clone(), weighted_score(table, option)?)))
        .collect::<Result<Vec<_>>>()?;
    match style {
        ScoreStyle::Percent => scores.sort_by(|a, b| b.percent.cmp(&a.percent)),
        ScoreStyle::Fraction => scores.sort_by(|a, b| b.weighted.total_cmp(&a.weighted)),
    }
    Ok(scores)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecideError;
    use crate::model::decision::Decision;
    use crate::model::weighting::FeatureWeight;
    use proptest::prelude::*;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|item| item.to_string()).collect()
    }

    fn half() -> FeatureWeight {
        FeatureWeight::from_points(5, 10)
    }

    #[test]
    fn opposite_options_tie_and_keep_input_order() {
        let table = UnifiedTable::builder()
            .options(vec!["X", "Y"])
            .row("f1", half(), vec![10, 0])
            .row("f2", half(), vec![0, 10])
            .build();

        let ranked = rank_options(&table, &names(&["X", "Y"])).expect("known options");
        assert_eq!(ranked[0].option, "X");
        assert_eq!(ranked[0].percent, 50);
        assert_eq!(ranked[1].option, "Y");
        assert_eq!(ranked[1].percent, 50);
        assert_eq!(
            ranked[0].message(ScoreStyle::Percent),
            "X meets 50% of your desired features."
        );

        let reversed = rank_options(&table, &names(&["Y", "X"])).expect("known options");
        assert_eq!(reversed[0].option, "Y");
    }

    #[test]
    fn ranking_is_descending() {
        let table = UnifiedTable::builder()
            .options(vec!["low", "high"])
            .row("f1", FeatureWeight::from_points(7, 10), vec![2, 9])
            .row("f2", FeatureWeight::from_points(3, 10), vec![4, 8])
            .build();

        let ranked = rank_options(&table, &names(&["low", "high"])).expect("known options");
        assert_eq!(ranked[0].option, "high");
        assert_eq!(ranked[0].percent, 87);
        assert_eq!(ranked[1].percent, 26);
    }

    #[test]
    fn halves_round_to_even() {
        let table = UnifiedTable::builder()
            .options(vec!["a", "b"])
            .row("f1", FeatureWeight::from_points(1, 4), vec![1, 3])
            .build();

        // 0.25 * 10 = 2.5 -> 2; 0.75 * 10 = 7.5 -> 8
        let ranked = rank_options(&table, &names(&["a", "b"])).expect("known options");
        assert_eq!(ranked[0].percent, 8);
        assert_eq!(ranked[1].percent, 2);
    }

    #[test]
    fn over_allocated_weights_can_exceed_one_hundred() {
        let table = UnifiedTable::builder()
            .options(vec!["a"])
            .row("f1", FeatureWeight::from_points(10, 10), vec![10])
            .row("f2", FeatureWeight::from_points(10, 10), vec![10])
            .build();

        let ranked = rank_options(&table, &names(&["a"])).expect("known option");
        assert_eq!(ranked[0].percent, 200);
    }

    #[test]
    fn fraction_style_reports_legacy_value() {
        let table = UnifiedTable::builder()
            .options(vec!["a"])
            .row("f1", FeatureWeight::FULL, vec![5])
            .build();
        let ranked = rank_options(&table, &names(&["a"])).expect("known option");
        assert_eq!(ranked[0].fraction(), 0.5);
        assert_eq!(ranked[0].message(ScoreStyle::Fraction), "a: 0.5");
    }

    #[test]
    fn fraction_style_orders_by_unrounded_score() {
        let table = UnifiedTable::builder()
            .options(vec!["a", "b"])
            .row(
                "f1",
                FeatureWeight {
                    value: 1,
                    percent: 0.5,
                },
                vec![10, 10],
            )
            .row(
                "f2",
                FeatureWeight {
                    value: 1,
                    percent: 0.03125,
                },
                vec![0, 1],
            )
            .build();

        // a = 5.0, b = 5.03125: both round to 50
        let by_percent = rank_options(&table, &names(&["a", "b"])).expect("known options");
        assert_eq!(by_percent[0].option, "a");
        assert_eq!(by_percent[0].percent, by_percent[1].percent);

        let by_fraction = rank_options_as(&table, &names(&["a", "b"]), ScoreStyle::Fraction)
            .expect("known options");
        assert_eq!(by_fraction[0].option, "b");
        assert_eq!(by_fraction[0].message(ScoreStyle::Fraction), "b: 0.503125");
        assert_eq!(by_fraction[1].message(ScoreStyle::Fraction), "a: 0.5");
    }

    #[test]
    fn example_decision_scores() {
        let decision = Decision::example();
        let ranked =
            rank_options(decision.table(), decision.options()).expect("example options exist");
        let percents: Vec<(&str, i64)> = ranked
            .iter()
            .map(|score| (score.option.as_str(), score.percent))
            .collect();
        // option1: 0*.1 + 6*.3 + 9*.4 + 3*.2 = 6.0
        assert_eq!(percents[0], ("option1", 60));
        assert_eq!(percents.len(), 4);
    }

    #[test]
    fn unknown_option_is_an_error() {
        let decision = Decision::example();
        let result = rank_options(decision.table(), &names(&["option9"]));
        assert!(matches!(result, Err(DecideError::UnknownOption(_))));
    }

    proptest! {
        #[test]
        fn score_ignores_row_order(
            rows in prop::collection::vec((0i32..=10, 0i64..=8), 1..10),
            rotate in 0usize..10,
        ) {
            let build = |rows: &[(i32, i64)]| {
                rows.iter()
                    .enumerate()
                    .fold(UnifiedTable::builder().options(vec!["o"]), |builder, (i, (rating, points))| {
                        builder.row(format!("f{i}"), FeatureWeight::from_points(*points, 8), vec![*rating])
                    })
                    .build()
            };
            let mut permuted = rows.clone();
            let shift = rotate % permuted.len();
            permuted.rotate_left(shift);
            permuted.reverse();

            let original = weighted_score(&build(&rows), "o").expect("known option");
            let shuffled = weighted_score(&build(&permuted), "o").expect("known option");
            prop_assert_eq!(original, shuffled);
        }
    }
}
