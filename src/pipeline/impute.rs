//! Group-median imputation machinery
//!
//! The fill pattern is the same for every imputed column: partition the
//! rows by a key tuple, materialize each partition's non-null values,
//! take the median, then broadcast that median to every null member of
//! the partition. Partitions with no donor values leave their members
//! null; that is an expected terminal state, counted but never an error.

use std::hash::Hash;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::models::SsiRecord;

/// Median of a sample, averaging the two central order statistics for
/// even-sized samples so output stays reproducible across implementations
#[must_use]
pub fn median(values: &mut Vec<f64>) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

/// Outcome of one group-median fill pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FillOutcome {
    /// Nulls replaced by a partition median
    pub filled: usize,
    /// Eligible nulls left untouched because their partition had no donors
    pub unfilled: usize,
    /// Distinct partitions that had eligible nulls but no donor values
    pub empty_partitions: usize,
}

/// Fill nulls of one column with their partition's median
///
/// Donor values are every non-null value in the partition; `eligible`
/// restricts which null rows receive a fill (the SIR_2015 first tier gates
/// targets on the predicted-count threshold, all other fills take every
/// null row).
pub fn fill_group_median<K>(
    records: &mut [SsiRecord],
    key: impl Fn(&SsiRecord) -> K,
    get: impl Fn(&SsiRecord) -> Option<f64>,
    mut set: impl FnMut(&mut SsiRecord, f64),
    eligible: impl Fn(&SsiRecord) -> bool,
) -> FillOutcome
where
    K: Eq + Hash,
{
    let mut partitions: FxHashMap<K, Vec<f64>> = FxHashMap::default();
    for record in records.iter() {
        if let Some(value) = get(record) {
            partitions.entry(key(record)).or_default().push(value);
        }
    }

    let medians: FxHashMap<K, f64> = partitions
        .into_iter()
        .filter_map(|(k, mut values)| median(&mut values).map(|m| (k, m)))
        .collect();

    let mut outcome = FillOutcome::default();
    let mut empty_keys: FxHashSet<K> = FxHashSet::default();
    for record in records.iter_mut() {
        if get(record).is_some() || !eligible(record) {
            continue;
        }
        let k = key(record);
        if let Some(&m) = medians.get(&k) {
            set(record, m);
            outcome.filled += 1;
        } else {
            outcome.unfilled += 1;
            empty_keys.insert(k);
        }
    }
    outcome.empty_partitions = empty_keys.len();
    outcome
}

/// Fill nulls of one column with the median over the whole table
///
/// Terminal fallback tier; after it only an entirely empty column can
/// remain null.
pub fn fill_global_median(
    records: &mut [SsiRecord],
    get: impl Fn(&SsiRecord) -> Option<f64>,
    mut set: impl FnMut(&mut SsiRecord, f64),
) -> FillOutcome {
    let mut values: Vec<f64> = records.iter().filter_map(&get).collect();
    let Some(global) = median(&mut values) else {
        let unfilled = records.iter().filter(|r| get(r).is_none()).count();
        return FillOutcome {
            filled: 0,
            unfilled,
            empty_partitions: usize::from(unfilled > 0),
        };
    };

    let mut outcome = FillOutcome::default();
    for record in records.iter_mut() {
        if get(record).is_none() {
            set(record, global);
            outcome.filled += 1;
        }
    }
    outcome
}
