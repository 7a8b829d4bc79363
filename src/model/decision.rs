use crate::elicit::{Elicit, Subject};
use crate::error::{DecideError, Result};
use crate::model::ratings::{rate_each_option, RatingMatrix};
use crate::model::table::UnifiedTable;
use crate::model::weighting::{assign_weights, FeatureWeight, Weighting};
use crate::types::config::Settings;
use rand::RngCore;

/// What a decision needs to ask questions while it is built or edited.
pub struct EditContext<'a> {
    pub elicit: &'a mut dyn Elicit,
    pub rng: &'a mut dyn RngCore,
    pub settings: Settings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Feature,
    Option,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Membership {
    Present,
    Absent,
    /// Blank names can never be members.
    Invalid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Added,
    Removed,
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    AddFeature(String),
    RemoveFeature(String),
    AddOption(String),
    RemoveOption(String),
    Reweight,
    Rerate,
}

/// Features, options, weights and ratings of one decision, plus the unified
/// table derived from them. The table is regenerated after every change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Decision {
    features: Vec<String>,
    weights: Weighting,
    options: Vec<String>,
    ratings: RatingMatrix,
    table: UnifiedTable,
}

impl Decision {
    pub fn from_parts(
        features: Vec<String>,
        weights: Weighting,
        options: Vec<String>,
        ratings: RatingMatrix,
    ) -> Self {
        let mut decision = Self {
            features,
            weights,
            options,
            ratings,
            table: UnifiedTable::empty(),
        };
        decision.refresh_table();
        decision
    }

    /// Fixed demo decision with four features and four options.
    pub fn example() -> Self {
        let features = ["feature1", "feature3", "feature4", "feature2"];
        let options = ["option1", "option2", "option3", "option4"];
        let points = [1, 3, 4, 2];
        let table = [[0, 6, 9, 3], [3, 9, 0, 6], [6, 0, 3, 9], [9, 3, 6, 0]];

        let weights = features
            .iter()
            .zip(points)
            .fold(Weighting::new(10), |weights, (feature, value)| {
                weights.with(*feature, FeatureWeight::from_points(value, 10))
            });
        let mut ratings = RatingMatrix::new();
        for (option, row) in options.iter().zip(table) {
            for (feature, rating) in features.iter().zip(row) {
                ratings.set(option, feature, rating);
            }
        }

        Self::from_parts(
            features.iter().map(|f| f.to_string()).collect(),
            weights,
            options.iter().map(|o| o.to_string()).collect(),
            ratings,
        )
    }

    /// Elicits a whole decision: features, their weights, options, ratings.
    pub fn build(ctx: &mut EditContext<'_>) -> Result<Self> {
        let features = collect_names(&mut *ctx.elicit, Subject::Feature, ctx.settings.max_features)?;
        let weights = assign_weights(&features, &mut *ctx.elicit, &mut *ctx.rng, &ctx.settings)?;
        let options = collect_names(&mut *ctx.elicit, Subject::Option, ctx.settings.max_options)?;
        let ratings =
            rate_each_option(&options, &features, &mut *ctx.elicit, ctx.settings.rating_policy)?;
        tracing::info!(
            features = features.len(),
            options = options.len(),
            "decision built"
        );
        Ok(Self::from_parts(features, weights, options, ratings))
    }

    pub fn features(&self) -> &[String] {
        &self.features
    }

    pub fn weights(&self) -> &Weighting {
        &self.weights
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn ratings(&self) -> &RatingMatrix {
        &self.ratings
    }

    pub fn table(&self) -> &UnifiedTable {
        &self.table
    }

    pub fn membership(&self, axis: Axis, name: &str) -> Membership {
        if name.trim().is_empty() {
            return Membership::Invalid;
        }
        let members = match axis {
            Axis::Feature => &self.features,
            Axis::Option => &self.options,
        };
        if members.iter().any(|member| member == name) {
            Membership::Present
        } else {
            Membership::Absent
        }
    }

    /// Applies one mutation. On error nothing changes.
    pub fn apply(&mut self, mutation: Mutation, ctx: &mut EditContext<'_>) -> Result<()> {
        tracing::debug!(?mutation, "applying mutation");
        match mutation {
            Mutation::AddFeature(name) => {
                self.expect_membership(Axis::Feature, &name, Membership::Absent)?;
                if self.features.len() >= ctx.settings.max_features {
                    return Err(DecideError::InvariantViolation(format!(
                        "cannot add more than {} features",
                        ctx.settings.max_features
                    )));
                }
                let mut features = self.features.clone();
                features.push(name.clone());
                let weights = assign_weights(&features, &mut *ctx.elicit, &mut *ctx.rng, &ctx.settings)?;
                let mut ratings = self.ratings.clone();
                ratings.rate(
                    &self.options,
                    std::slice::from_ref(&name),
                    &mut *ctx.elicit,
                    ctx.settings.rating_policy,
                )?;
                self.features = features;
                self.weights = weights;
                self.ratings = ratings;
            }
            Mutation::RemoveFeature(name) => {
                self.expect_membership(Axis::Feature, &name, Membership::Present)?;
                if self.features.len() == 1 {
                    return Err(DecideError::InvariantViolation(
                        "a decision needs at least one feature".to_string(),
                    ));
                }
                let features: Vec<String> = self
                    .features
                    .iter()
                    .filter(|feature| **feature != name)
                    .cloned()
                    .collect();
                let weights = assign_weights(&features, &mut *ctx.elicit, &mut *ctx.rng, &ctx.settings)?;
                self.features = features;
                self.weights = weights;
                self.ratings.remove_feature(&name);
            }
            Mutation::AddOption(name) => {
                self.expect_membership(Axis::Option, &name, Membership::Absent)?;
                if self.options.len() >= ctx.settings.max_options {
                    return Err(DecideError::InvariantViolation(format!(
                        "cannot add more than {} options",
                        ctx.settings.max_options
                    )));
                }
                let mut ratings = self.ratings.clone();
                ratings.rate(
                    std::slice::from_ref(&name),
                    &self.features,
                    &mut *ctx.elicit,
                    ctx.settings.rating_policy,
                )?;
                self.options.push(name);
                self.ratings = ratings;
            }
            Mutation::RemoveOption(name) => {
                self.expect_membership(Axis::Option, &name, Membership::Present)?;
                if self.options.len() == 1 {
                    return Err(DecideError::InvariantViolation(
                        "a decision needs at least one option".to_string(),
                    ));
                }
                self.options.retain(|option| *option != name);
                self.ratings.remove_option(&name);
            }
            Mutation::Reweight => {
                self.weights = assign_weights(&self.features, &mut *ctx.elicit, &mut *ctx.rng, &ctx.settings)?;
            }
            Mutation::Rerate => {
                self.ratings = rate_each_option(
                    &self.options,
                    &self.features,
                    &mut *ctx.elicit,
                    ctx.settings.rating_policy,
                )?;
            }
        }
        self.refresh_table();
        Ok(())
    }

    /// Adds the feature when absent, removes it when present.
    pub fn toggle_feature(&mut self, name: &str, ctx: &mut EditContext<'_>) -> Result<Toggle> {
        self.toggle(Axis::Feature, name, ctx)
    }

    /// Adds the option when absent, removes it when present.
    pub fn toggle_option(&mut self, name: &str, ctx: &mut EditContext<'_>) -> Result<Toggle> {
        self.toggle(Axis::Option, name, ctx)
    }

    fn toggle(&mut self, axis: Axis, name: &str, ctx: &mut EditContext<'_>) -> Result<Toggle> {
        let name = name.trim().to_string();
        let (mutation, outcome) = match (self.membership(axis, &name), axis) {
            (Membership::Invalid, _) => {
                tracing::warn!(?axis, "ignoring blank name");
                return Ok(Toggle::Ignored);
            }
            (Membership::Present, Axis::Feature) => (Mutation::RemoveFeature(name), Toggle::Removed),
            (Membership::Absent, Axis::Feature) => (Mutation::AddFeature(name), Toggle::Added),
            (Membership::Present, Axis::Option) => (Mutation::RemoveOption(name), Toggle::Removed),
            (Membership::Absent, Axis::Option) => (Mutation::AddOption(name), Toggle::Added),
        };
        self.apply(mutation, ctx)?;
        Ok(outcome)
    }

    /// Narrows the feature list to `keep`, re-weighting what remains.
    ///
    /// Fails with [`DecideError::InvariantViolation`] and leaves the decision
    /// untouched when `keep` names a feature this decision does not have.
    pub fn feature_list_keep(&mut self, keep: &[String], ctx: &mut EditContext<'_>) -> Result<()> {
        if let Some(unknown) = keep.iter().find(|feature| !self.features.contains(feature)) {
            return Err(DecideError::InvariantViolation(format!(
                "{unknown} is not in the feature list"
            )));
        }
        let mut features: Vec<String> = Vec::with_capacity(keep.len());
        for feature in keep {
            if !features.contains(feature) {
                features.push(feature.clone());
            }
        }
        if features.is_empty() {
            return Err(DecideError::InvariantViolation(
                "must keep at least one feature".to_string(),
            ));
        }

        let weights = assign_weights(&features, &mut *ctx.elicit, &mut *ctx.rng, &ctx.settings)?;
        self.ratings.retain_features(&features);
        self.features = features;
        self.weights = weights;
        self.refresh_table();
        Ok(())
    }

    fn expect_membership(&self, axis: Axis, name: &str, expected: Membership) -> Result<()> {
        let actual = self.membership(axis, name);
        if actual == expected {
            return Ok(());
        }
        let axis_name = match axis {
            Axis::Feature => "feature",
            Axis::Option => "option",
        };
        Err(DecideError::InvariantViolation(match actual {
            Membership::Invalid => format!("{axis_name} names cannot be blank"),
            Membership::Present => format!("{axis_name} {name} already exists"),
            Membership::Absent => format!("{axis_name} {name} does not exist"),
        }))
    }

    fn refresh_table(&mut self) {
        self.table = UnifiedTable::merge(&self.features, &self.options, &self.weights, &self.ratings);
        if !self.ratings.covers(&self.options, &self.features) {
            tracing::warn!("some option/feature pairs are unrated");
        }
    }
}

/// Collects unique, non-blank names until the user declines or `max` is reached.
pub fn collect_names<E>(elicit: &mut E, subject: Subject, max: usize) -> Result<Vec<String>>
where
    E: Elicit + ?Sized,
{
    let mut names: Vec<String> = Vec::new();
    loop {
        let name = match subject {
            Subject::Feature => elicit.request_feature_name()?,
            Subject::Option => elicit.request_option_name(names.is_empty())?,
        };
        let name = name.trim().to_string();
        if name.is_empty() {
            tracing::warn!(%subject, "skipping blank name");
        } else if names.contains(&name) {
            tracing::warn!(%subject, %name, "skipping duplicate name");
        } else {
            names.push(name);
        }

        if names.len() >= max {
            tracing::info!(%subject, max, "name limit reached");
            break;
        }
        if !names.is_empty() && !elicit.request_more(subject)?.wants_more() {
            break;
        }
    }
    Ok(names)
}
