use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;

use log::debug;

pub use crate::config::*;

/// A builder for grouping scores under categorical keys.
///
/// The keys are fixed upfront and groups come out in that order, including the
/// groups that received no value. Every value also goes to the parent
/// population, even when its key is not tracked.
///
/// ```
/// use wordsum_stats::builder::GroupBuilder;
///
/// let mut builder = GroupBuilder::new(&["D", "R", "I"]);
/// builder.add(&"D", 7.0);
/// builder.add(&"R", 9.0);
/// builder.add(&"Green", 4.0);
///
/// let groups = builder.build();
/// assert_eq!(groups.values(&"D"), &[7.0]);
/// assert!(groups.values(&"I").is_empty());
/// assert_eq!(groups.parent(), &[7.0, 9.0, 4.0]);
/// ```
pub struct GroupBuilder<K> {
    order: Vec<K>,
    values: HashMap<K, Vec<f64>>,
    parent: Vec<f64>,
}

impl<K> GroupBuilder<K>
where
    K: Eq + Hash + Clone + Display,
{
    pub fn new(keys: &[K]) -> GroupBuilder<K> {
        let mut order: Vec<K> = Vec::new();
        for k in keys {
            if !order.contains(k) {
                order.push(k.clone());
            }
        }
        GroupBuilder {
            values: order.iter().map(|k| (k.clone(), Vec::new())).collect(),
            order,
            parent: Vec::new(),
        }
    }

    /// Adds a score. Returns false if the key is not one of the tracked groups,
    /// in which case the score only counts for the parent population.
    pub fn add(&mut self, key: &K, value: f64) -> bool {
        self.parent.push(value);
        match self.values.get_mut(key) {
            Some(v) => {
                v.push(value);
                true
            }
            None => {
                debug!("GroupBuilder::add: untracked key {}", key);
                false
            }
        }
    }

    /// Adds a score that belongs to no group.
    pub fn add_unkeyed(&mut self, value: f64) {
        self.parent.push(value);
    }

    pub fn build(mut self) -> Groups<K> {
        let groups = self
            .order
            .into_iter()
            .map(|k| {
                let v = self.values.remove(&k).unwrap_or_default();
                (k, v)
            })
            .collect();
        Groups {
            groups,
            parent: self.parent,
        }
    }
}

/// Scores grouped by key, in key order.
#[derive(PartialEq, Debug, Clone)]
pub struct Groups<K> {
    groups: Vec<(K, Vec<f64>)>,
    parent: Vec<f64>,
}

impl<K> Groups<K>
where
    K: Eq + Clone + Display,
{
    pub fn keys(&self) -> Vec<&K> {
        self.groups.iter().map(|(k, _)| k).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &[f64])> {
        self.groups.iter().map(|(k, v)| (k, v.as_slice()))
    }

    /// The scores of one group. Unknown keys have no scores.
    pub fn values(&self, key: &K) -> &[f64] {
        self.groups
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_slice())
            .unwrap_or(&[])
    }

    /// All the scores that were added, whatever their key.
    pub fn parent(&self) -> &[f64] {
        &self.parent
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }
}
