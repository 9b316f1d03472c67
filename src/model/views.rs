//! Grouped views over a `Dataset`. Nothing here is cached; every chart build recomputes the view it
//! needs. Rows whose grouping key is missing are left out, and missing amounts add nothing.

use crate::model::{Amount, Dataset};
use crate::Result;
use anyhow::anyhow;
use std::collections::{BTreeMap, HashMap};

/// Accumulates values per label, remembering the order in which labels were first seen.
struct Groups<T> {
    order: Vec<(String, T)>,
    index: HashMap<String, usize>,
}

impl<T: Default> Groups<T> {
    fn new() -> Self {
        Self {
            order: Vec::new(),
            index: HashMap::new(),
        }
    }

    fn entry(&mut self, label: String) -> &mut T {
        let ix = match self.index.get(&label) {
            Some(ix) => *ix,
            None => {
                let ix = self.order.len();
                self.index.insert(label.clone(), ix);
                self.order.push((label, T::default()));
                ix
            }
        };
        &mut self.order[ix].1
    }

    fn into_vec(self) -> Vec<(String, T)> {
        self.order
    }
}

impl Dataset {
    /// Counts rows per distinct value of `key`, in order of first appearance.
    pub fn count_by(&self, key: &str) -> Result<Vec<(String, usize)>> {
        let mut groups = Groups::<usize>::new();
        for label in self.labels(key)?.into_iter().flatten() {
            *groups.entry(label) += 1;
        }
        Ok(groups.into_vec())
    }

    /// Counts rows per distinct value of `key`, most frequent first. Labels with equal counts keep
    /// their order of first appearance.
    pub fn value_counts(&self, key: &str) -> Result<Vec<(String, usize)>> {
        let mut counts = self.count_by(key)?;
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        Ok(counts)
    }

    /// Sums `amount` per distinct value of `key`, in order of first appearance.
    pub fn sum_by(&self, key: &str, amount: &str) -> Result<Vec<(String, Amount)>> {
        let labels = self.labels(key)?;
        let amounts = self.amounts(amount)?;
        let mut groups = Groups::<Amount>::new();
        for (label, value) in labels.into_iter().zip(amounts) {
            let Some(label) = label else { continue };
            let sum = groups.entry(label);
            *sum = sum
                .checked_add(value.unwrap_or_default())
                .ok_or_else(|| anyhow!("Sum of '{amount}' per '{key}' overflowed"))?;
        }
        Ok(groups.into_vec())
    }

    /// Sums `amount` per distinct value of `key`, ordered by key.
    pub fn sum_by_sorted(&self, key: &str, amount: &str) -> Result<BTreeMap<String, Amount>> {
        Ok(self.sum_by(key, amount)?.into_iter().collect())
    }

    /// The grand total of `amount`.
    pub fn total(&self, amount: &str) -> Result<Amount> {
        Amount::checked_sum(self.amounts(amount)?.into_iter().flatten())
            .ok_or_else(|| anyhow!("Sum of '{amount}' overflowed"))
    }

    /// Counts rows per approval year, in ascending year order. Rows without a year are left out.
    pub fn count_by_year(&self) -> Result<Vec<(i32, usize)>> {
        let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
        for year in self.years()?.into_iter().flatten() {
            *counts.entry(year).or_default() += 1;
        }
        Ok(counts.into_iter().collect())
    }
}
