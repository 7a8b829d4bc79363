use crate::elicit::Elicit;
use crate::error::{DecideError, Result};
use crate::types::config::{RatingPolicy, Settings};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

/// Importance of one feature: raw points and their share of the budget.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureWeight {
    pub value: i64,
    pub percent: f64,
}

impl FeatureWeight {
    pub const FULL: Self = Self {
        value: 1,
        percent: 1.0,
    };

    pub fn from_points(value: i64, budget: i64) -> Self {
        Self {
            value,
            percent: value as f64 / budget as f64,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightedFeature {
    pub name: String,
    #[serde(flatten)]
    pub weight: FeatureWeight,
}

/// Weights keyed by feature name, kept in feature-list order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Weighting {
    budget: i64,
    features: Vec<WeightedFeature>,
}

impl Weighting {
    pub fn new(budget: i64) -> Self {
        Self {
            budget,
            features: Vec::new(),
        }
    }

    pub fn with(mut self, name: impl Into<String>, weight: FeatureWeight) -> Self {
        self.insert(name.into(), weight);
        self
    }

    fn insert(&mut self, name: String, weight: FeatureWeight) {
        match self.features.iter_mut().find(|entry| entry.name == name) {
            Some(entry) => entry.weight = weight,
            None => self.features.push(WeightedFeature { name, weight }),
        }
    }

    pub fn get(&self, feature: &str) -> Option<&FeatureWeight> {
        self.features
            .iter()
            .find(|entry| entry.name == feature)
            .map(|entry| &entry.weight)
    }

    pub fn iter(&self) -> impl Iterator<Item = &WeightedFeature> {
        self.features.iter()
    }

    pub fn budget(&self) -> i64 {
        self.budget
    }

    /// Points handed out, saturating at `i64::MAX`.
    pub fn allocated(&self) -> i64 {
        self.features
            .iter()
            .fold(0i64, |total, entry| total.saturating_add(entry.weight.value))
    }
}

pub fn round_up_to_ten(points: i64) -> i64 {
    (points + 9).div_euclid(10) * 10
}

/// Total points handed out across `feature_count` features.
pub fn point_budget(feature_count: usize, avg_points_per_feature: u32) -> i64 {
    round_up_to_ten(i64::from(avg_points_per_feature) * feature_count as i64)
}

/// Elicits point allocations for `features` and normalizes them against the
/// budget.
///
/// A single feature gets full weight without asking. Otherwise features are
/// asked in shuffled order (when enabled); a malformed allocation is asked
/// again once and a second failure is returned to the caller.
pub fn assign_weights<E, R>(
    features: &[String],
    elicit: &mut E,
    rng: &mut R,
    settings: &Settings,
) -> Result<Weighting>
where
    E: Elicit + ?Sized,
    R: Rng + ?Sized,
{
    match features {
        [] => Err(DecideError::InvariantViolation(
            "cannot weight an empty feature list".to_string(),
        )),
        [only] => {
            tracing::debug!(feature = %only, "single feature receives full weight");
            Ok(Weighting::new(1).with(only.clone(), FeatureWeight::FULL))
        }
        _ => allocate(features, elicit, rng, settings),
    }
}

fn allocate<E, R>(
    features: &[String],
    elicit: &mut E,
    rng: &mut R,
    settings: &Settings,
) -> Result<Weighting>
where
    E: Elicit + ?Sized,
    R: Rng + ?Sized,
{
    let count = features.len();
    let budget = point_budget(count, settings.avg_points_per_feature);
    elicit.announce_budget(budget, count)?;

    let mut order: Vec<&String> = features.iter().collect();
    if settings.shuffle {
        order.shuffle(rng);
    }

    let mut allocations = Vec::with_capacity(count);
    let mut used: i64 = 0;
    for (index, feature) in order.into_iter().enumerate() {
        let remaining_points = budget.saturating_sub(used);
        let remaining_features = count - index;
        let (points, total) =
            match request_allocation(elicit, feature, remaining_points, remaining_features, used) {
                Err(DecideError::InvalidInput { input, .. }) => {
                    tracing::warn!(%feature, %input, "allocation was not a usable whole number, asking again");
                    request_allocation(elicit, feature, remaining_points, remaining_features, used)?
                }
                other => other?,
            };
        used = total;
        allocations.push((feature, points));
    }

    if used != budget {
        if settings.rating_policy == RatingPolicy::Strict {
            return Err(DecideError::BudgetMismatch {
                allocated: used,
                budget,
            });
        }
        tracing::warn!(allocated = used, budget, "allocations do not sum to the budget");
    }

    let mut weighting = Weighting::new(budget);
    for feature in features {
        if let Some((_, points)) = allocations.iter().find(|(name, _)| *name == feature) {
            weighting.insert(feature.clone(), FeatureWeight::from_points(*points, budget));
        }
    }
    tracing::info!(features = count, budget, "feature weights assigned");
    Ok(weighting)
}

/// Asks for one allocation and adds it to `used`. A total past `i64::MAX`
/// counts as invalid input.
fn request_allocation<E>(
    elicit: &mut E,
    feature: &str,
    remaining_points: i64,
    remaining_features: usize,
    used: i64,
) -> Result<(i64, i64)>
where
    E: Elicit + ?Sized,
{
    let points = elicit.request_point_allocation(feature, remaining_points, remaining_features)?;
    let total = used
        .checked_add(points)
        .ok_or_else(|| DecideError::invalid_input(feature, points.to_string()))?;
    Ok((points, total))
}
