use crate::compare::venn::{venn2, venn3, Venn2, Venn3};
use crate::error::Result;
use crate::model::table::{RadarInput, UnifiedTable};

/// Every unordered `k`-subset of `items`, in lexicographic index order.
pub fn combinations<T: Clone>(items: &[T], k: usize) -> Vec<Vec<T>> {
    if k == 0 || k > items.len() {
        return Vec::new();
    }
    let mut result = Vec::new();
    let mut indices: Vec<usize> = (0..k).collect();
    loop {
        result.push(indices.iter().map(|&i| items[i].clone()).collect());

        // Rightmost index that can still move forward.
        let Some(pos) = (0..k).rev().find(|&pos| indices[pos] < items.len() - k + pos) else {
            break;
        };
        indices[pos] += 1;
        for next in pos + 1..k {
            indices[next] = indices[next - 1] + 1;
        }
    }
    result
}

/// Option sets for radar charts: the lone option by itself, otherwise every pair.
pub fn radar_sets(options: &[String]) -> Vec<Vec<String>> {
    if options.len() == 1 {
        return vec![options.to_vec()];
    }
    combinations(options, 2)
}

pub fn radar_all(table: &UnifiedTable, options: &[String]) -> Result<Vec<RadarInput>> {
    radar_sets(options)
        .iter()
        .map(|set| table.radar(set))
        .collect()
}

/// Two-way partitions for every pair. Fewer than two options yields nothing.
pub fn venn2_all(table: &UnifiedTable, options: &[String]) -> Result<Vec<Venn2>> {
    combinations(options, 2)
        .iter()
        .map(|pair| venn2(table, pair))
        .collect()
}

/// Three-way partitions for every triple. Fewer than three options yields nothing.
pub fn venn3_all(table: &UnifiedTable, options: &[String]) -> Result<Vec<Venn3>> {
    combinations(options, 3)
        .iter()
        .map(|triple| venn3(table, triple))
        .collect()
}
