//! Overlap of "feature:rating" signatures between two or three options.
//!
//! Region codes follow the diagram convention: the first option owns the
//! leading bit ("100" / "10"), the second the next, the third the last.

use crate::error::{DecideError, Result};
use crate::model::table::UnifiedTable;
use serde::Serialize;
use std::collections::BTreeSet;

pub type SignatureSet = BTreeSet<String>;

pub fn signature(feature: &str, rating: i32) -> String {
    format!("{feature}:{rating}")
}

/// One signature per rated row of `option`.
pub fn signatures(table: &UnifiedTable, option: &str) -> Result<SignatureSet> {
    Ok(table
        .column(option)?
        .into_iter()
        .filter_map(|(feature, rating)| rating.map(|rating| signature(feature, rating)))
        .collect())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Venn2 {
    pub labels: Vec<String>,
    pub set_a: SignatureSet,
    pub set_b: SignatureSet,
    /// Region "10".
    pub only_a: Vec<String>,
    /// Region "01".
    pub only_b: Vec<String>,
    /// Region "11".
    pub shared: Vec<String>,
}

impl Venn2 {
    pub fn sizes(&self) -> [usize; 3] {
        [self.only_a.len(), self.only_b.len(), self.shared.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Region {
    #[serde(rename = "100")]
    A,
    #[serde(rename = "010")]
    B,
    #[serde(rename = "110")]
    AB,
    #[serde(rename = "001")]
    C,
    #[serde(rename = "101")]
    AC,
    #[serde(rename = "011")]
    BC,
    #[serde(rename = "111")]
    ABC,
}

impl Region {
    /// Diagram subset order: 100, 010, 110, 001, 101, 011, 111.
    pub const ALL: [Region; 7] = [
        Region::A,
        Region::B,
        Region::AB,
        Region::C,
        Region::AC,
        Region::BC,
        Region::ABC,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Region::A => "100",
            Region::B => "010",
            Region::AB => "110",
            Region::C => "001",
            Region::AC => "101",
            Region::BC => "011",
            Region::ABC => "111",
        }
    }

    fn from_membership(in_a: bool, in_b: bool, in_c: bool) -> Option<Self> {
        match (in_a, in_b, in_c) {
            (true, false, false) => Some(Region::A),
            (false, true, false) => Some(Region::B),
            (true, true, false) => Some(Region::AB),
            (false, false, true) => Some(Region::C),
            (true, false, true) => Some(Region::AC),
            (false, true, true) => Some(Region::BC),
            (true, true, true) => Some(Region::ABC),
            (false, false, false) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VennRegion {
    pub region: Region,
    pub size: usize,
    pub members: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Venn3 {
    pub labels: Vec<String>,
    /// Always seven entries, in [`Region::ALL`] order.
    pub regions: Vec<VennRegion>,
}

impl Venn3 {
    pub fn region(&self, region: Region) -> &[String] {
        self.regions
            .iter()
            .find(|entry| entry.region == region)
            .map(|entry| entry.members.as_slice())
            .unwrap_or_default()
    }

    /// Region sizes in [`Region::ALL`] order.
    pub fn subsets(&self) -> [usize; 7] {
        Region::ALL.map(|region| self.region(region).len())
    }
}

/// Collects the signature sets for up to `arity` options, padding missing
/// positions with the first option's set.
fn padded_sets(table: &UnifiedTable, options: &[String], arity: usize) -> Result<Vec<SignatureSet>> {
    if options.is_empty() || options.len() > arity {
        return Err(DecideError::InvariantViolation(format!(
            "a {arity}-way comparison takes 1 to {arity} options, got {}",
            options.len()
        )));
    }
    let mut sets = options
        .iter()
        .map(|option| signatures(table, option))
        .collect::<Result<Vec<_>>>()?;
    if sets.len() < arity {
        tracing::warn!(
            given = sets.len(),
            arity,
            "too few options, reusing the first option's signatures"
        );
    }
    while sets.len() < arity {
        sets.push(sets[0].clone());
    }
    Ok(sets)
}

/// Two-way partition. A single option is compared against itself.
pub fn venn2(table: &UnifiedTable, options: &[String]) -> Result<Venn2> {
    let mut sets = padded_sets(table, options, 2)?.into_iter();
    let (Some(set_a), Some(set_b)) = (sets.next(), sets.next()) else {
        return Err(DecideError::InvariantViolation(
            "two-way comparison lost a set".to_string(),
        ));
    };

    Ok(Venn2 {
        labels: options.to_vec(),
        only_a: set_a.difference(&set_b).cloned().collect(),
        only_b: set_b.difference(&set_a).cloned().collect(),
        shared: set_a.intersection(&set_b).cloned().collect(),
        set_a,
        set_b,
    })
}

/// Three-way partition into the seven regions. Missing second or third
/// options fall back to the first option.
pub fn venn3(table: &UnifiedTable, options: &[String]) -> Result<Venn3> {
    let sets = padded_sets(table, options, 3)?;
    let [a, b, c] = sets.as_slice() else {
        return Err(DecideError::InvariantViolation(
            "three-way comparison lost a set".to_string(),
        ));
    };

    let mut regions: Vec<VennRegion> = Region::ALL
        .iter()
        .map(|&region| VennRegion {
            region,
            size: 0,
            members: Vec::new(),
        })
        .collect();

    let union: SignatureSet = a.iter().chain(b).chain(c).cloned().collect();
    for member in &union {
        let Some(region) =
            Region::from_membership(a.contains(member), b.contains(member), c.contains(member))
        else {
            continue;
        };
        if let Some(entry) = regions.iter_mut().find(|entry| entry.region == region) {
            entry.members.push(member.clone());
            entry.size += 1;
        }
    }

    Ok(Venn3 {
        labels: options.to_vec(),
        regions,
    })
}
