use crate::elicit::Elicit;
use crate::error::{DecideError, Result};
use crate::types::config::RatingPolicy;
use serde::Serialize;
use std::collections::HashMap;
use std::ops::RangeInclusive;

pub const RATING_SCALE: RangeInclusive<i32> = 0..=10;

/// Option x feature ratings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RatingMatrix {
    ratings: HashMap<String, HashMap<String, i32>>,
}

impl RatingMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, option: &str, feature: &str, rating: i32) -> Self {
        self.set(option, feature, rating);
        self
    }

    pub fn get(&self, option: &str, feature: &str) -> Option<i32> {
        self.ratings
            .get(option)
            .and_then(|row| row.get(feature))
            .copied()
    }

    pub fn set(&mut self, option: &str, feature: &str, rating: i32) {
        self.ratings
            .entry(option.to_string())
            .or_default()
            .insert(feature.to_string(), rating);
    }

    pub fn has_option(&self, option: &str) -> bool {
        self.ratings.contains_key(option)
    }

    pub fn remove_option(&mut self, option: &str) {
        self.ratings.remove(option);
    }

    pub fn remove_feature(&mut self, feature: &str) {
        for row in self.ratings.values_mut() {
            row.remove(feature);
        }
    }

    /// Drops every rating whose feature is not in `features`.
    pub fn retain_features(&mut self, features: &[String]) {
        for row in self.ratings.values_mut() {
            row.retain(|feature, _| features.contains(feature));
        }
    }

    /// True when every (option, feature) pair has a rating.
    pub fn covers(&self, options: &[String], features: &[String]) -> bool {
        options.iter().all(|option| {
            features
                .iter()
                .all(|feature| self.get(option, feature).is_some())
        })
    }

    /// Rates every option on every feature, option-major, into this matrix.
    ///
    /// Unlike point allocation there is no second chance: the first malformed
    /// answer is returned.
    pub fn rate<E>(
        &mut self,
        options: &[String],
        features: &[String],
        elicit: &mut E,
        policy: RatingPolicy,
    ) -> Result<()>
    where
        E: Elicit + ?Sized,
    {
        for option in options {
            for feature in features {
                let rating = elicit.request_rating(option, feature)?;
                check_rating(option, feature, rating, policy)?;
                self.set(option, feature, rating);
            }
        }
        tracing::debug!(
            options = options.len(),
            features = features.len(),
            "ratings collected"
        );
        Ok(())
    }
}

/// Elicits a fresh matrix for `options` x `features`.
pub fn rate_each_option<E>(
    options: &[String],
    features: &[String],
    elicit: &mut E,
    policy: RatingPolicy,
) -> Result<RatingMatrix>
where
    E: Elicit + ?Sized,
{
    let mut matrix = RatingMatrix::new();
    matrix.rate(options, features, elicit, policy)?;
    Ok(matrix)
}

fn check_rating(option: &str, feature: &str, rating: i32, policy: RatingPolicy) -> Result<()> {
    if RATING_SCALE.contains(&rating) {
        return Ok(());
    }
    match policy {
        RatingPolicy::Strict => Err(DecideError::RatingOutOfRange {
            option: option.to_string(),
            feature: feature.to_string(),
            rating,
        }),
        RatingPolicy::Permissive => {
            tracing::warn!(%option, %feature, rating, "rating outside 0..=10 accepted");
            Ok(())
        }
    }
}
