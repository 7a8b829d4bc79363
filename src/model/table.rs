//! Unified table: one row per feature, one rating column per option, plus the
//! feature's weight.

use crate::error::{DecideError, Result};
use crate::model::ratings::RatingMatrix;
use crate::model::weighting::{FeatureWeight, Weighting};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub feature: String,
    /// Ratings in the table's option order; `None` when the cell was never rated.
    pub ratings: Vec<Option<i32>>,
    pub value: i64,
    pub percent: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UnifiedTable {
    options: Vec<String>,
    rows: Vec<TableRow>,
}

/// Ratings of one option in row order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarSeries {
    pub option: String,
    pub values: Vec<Option<i32>>,
}

/// A 1 or 2 option slice of the table, indexed by feature.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarInput {
    pub features: Vec<String>,
    pub series: Vec<RadarSeries>,
}

impl UnifiedTable {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn builder() -> UnifiedTableBuilder {
        UnifiedTableBuilder::new()
    }

    /// Joins ratings and weights on feature name.
    ///
    /// A feature becomes a row only when it is weighted and at least one option
    /// rated it; rows keep the order of `features`.
    pub fn merge(
        features: &[String],
        options: &[String],
        weighting: &Weighting,
        ratings: &RatingMatrix,
    ) -> Self {
        let rows: Vec<TableRow> = features
            .iter()
            .filter_map(|feature| {
                let weight = weighting.get(feature)?;
                let cells: Vec<Option<i32>> = options
                    .iter()
                    .map(|option| ratings.get(option, feature))
                    .collect();
                if cells.iter().all(Option::is_none) {
                    return None;
                }
                Some(TableRow {
                    feature: feature.clone(),
                    ratings: cells,
                    value: weight.value,
                    percent: weight.percent,
                })
            })
            .collect();

        tracing::debug!(
            rows = rows.len(),
            dropped = features.len() - rows.len(),
            options = options.len(),
            "unified table merged"
        );
        Self {
            options: options.to_vec(),
            rows,
        }
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn features(&self) -> Vec<String> {
        self.rows.iter().map(|row| row.feature.clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, option: &str) -> Result<usize> {
        self.options
            .iter()
            .position(|known| known == option)
            .ok_or_else(|| DecideError::UnknownOption(option.to_string()))
    }

    /// `(feature, rating)` pairs for one option in row order.
    pub fn column(&self, option: &str) -> Result<Vec<(&str, Option<i32>)>> {
        let index = self.column_index(option)?;
        Ok(self
            .rows
            .iter()
            .map(|row| (row.feature.as_str(), row.ratings.get(index).copied().flatten()))
            .collect())
    }

    /// Copy of the table keeping only the given option columns, in the order given.
    pub fn restrict(&self, options: &[String]) -> Result<Self> {
        let indices = options
            .iter()
            .map(|option| self.column_index(option))
            .collect::<Result<Vec<_>>>()?;
        let rows = self
            .rows
            .iter()
            .map(|row| TableRow {
                feature: row.feature.clone(),
                ratings: indices
                    .iter()
                    .map(|&index| row.ratings.get(index).copied().flatten())
                    .collect(),
                value: row.value,
                percent: row.percent,
            })
            .collect();
        Ok(Self {
            options: options.to_vec(),
            rows,
        })
    }

    pub fn radar(&self, options: &[String]) -> Result<RadarInput> {
        if options.is_empty() || options.len() > 2 {
            return Err(DecideError::InvariantViolation(format!(
                "radar input takes 1 or 2 options, got {}",
                options.len()
            )));
        }
        let restricted = self.restrict(options)?;
        let series = restricted
            .options
            .iter()
            .enumerate()
            .map(|(index, option)| RadarSeries {
                option: option.clone(),
                values: restricted
                    .rows
                    .iter()
                    .map(|row| row.ratings.get(index).copied().flatten())
                    .collect(),
            })
            .collect();
        Ok(RadarInput {
            features: restricted.features(),
            series,
        })
    }
}

/// Builder for constructing `UnifiedTable` instances directly from rows.
#[derive(Debug, Default)]
pub struct UnifiedTableBuilder {
    options: Vec<String>,
    rows: Vec<TableRow>,
}

impl UnifiedTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn options(mut self, names: Vec<impl Into<String>>) -> Self {
        self.options = names.into_iter().map(Into::into).collect();
        self
    }

    /// Adds a fully rated row; `ratings` follow the option order.
    pub fn row(mut self, feature: impl Into<String>, weight: FeatureWeight, ratings: Vec<i32>) -> Self {
        self.rows.push(TableRow {
            feature: feature.into(),
            ratings: ratings.into_iter().map(Some).collect(),
            value: weight.value,
            percent: weight.percent,
        });
        self
    }

    pub fn build(self) -> UnifiedTable {
        UnifiedTable {
            options: self.options,
            rows: self.rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|item| item.to_string()).collect()
    }

    fn half() -> FeatureWeight {
        FeatureWeight::from_points(5, 10)
    }

    #[test]
    fn merge_is_an_inner_join_on_feature() {
        let weighting = Weighting::new(10)
            .with("f1", half())
            .with("f2", half())
            .with("unrated", FeatureWeight::from_points(0, 10));
        let ratings = RatingMatrix::new()
            .with("x", "f1", 10)
            .with("x", "f2", 0)
            .with("x", "unweighted", 4)
            .with("y", "f1", 0)
            .with("y", "f2", 10);

        let table = UnifiedTable::merge(
            &names(&["f1", "f2", "unrated", "unweighted"]),
            &names(&["x", "y"]),
            &weighting,
            &ratings,
        );

        assert_eq!(table.features(), names(&["f1", "f2"]));
        assert_eq!(table.rows()[0].ratings, vec![Some(10), Some(0)]);
        assert_eq!(table.rows()[1].percent, 0.5);
    }

    #[test]
    fn column_reads_one_option() {
        let table = UnifiedTable::builder()
            .options(vec!["x", "y"])
            .row("f1", half(), vec![1, 2])
            .row("f2", half(), vec![3, 4])
            .build();

        let column = table.column("y").expect("y is a column");
        assert_eq!(column, vec![("f1", Some(2)), ("f2", Some(4))]);
        assert!(matches!(
            table.column("z"),
            Err(DecideError::UnknownOption(_))
        ));
    }

    #[test]
    fn restrict_reorders_and_drops_columns() {
        let table = UnifiedTable::builder()
            .options(vec!["x", "y", "z"])
            .row("f1", half(), vec![1, 2, 3])
            .build();

        let restricted = table.restrict(&names(&["z", "x"])).expect("known options");
        assert_eq!(restricted.options(), names(&["z", "x"]).as_slice());
        assert_eq!(restricted.rows()[0].ratings, vec![Some(3), Some(1)]);
        assert_eq!(restricted.rows()[0].percent, 0.5);
    }

    #[test]
    fn radar_takes_one_or_two_options() {
        let table = UnifiedTable::builder()
            .options(vec!["x", "y", "z"])
            .row("f1", half(), vec![1, 2, 3])
            .row("f2", half(), vec![4, 5, 6])
            .build();

        let single = table.radar(&names(&["y"])).expect("single radar");
        assert_eq!(single.features, names(&["f1", "f2"]));
        assert_eq!(single.series.len(), 1);
        assert_eq!(single.series[0].values, vec![Some(2), Some(5)]);

        let pair = table.radar(&names(&["x", "z"])).expect("pair radar");
        assert_eq!(pair.series[1].option, "z");

        assert!(table.radar(&names(&["x", "y", "z"])).is_err());
        assert!(table.radar(&[]).is_err());
    }
}
