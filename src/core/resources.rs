//! Resources (essences) and bags of them.
//!
//! ## ResourceType
//!
//! Five types: four elemental (red, blue, green, black) and gold.
//! Gold is the only universal resource; elementals never substitute
//! for each other except through explicit convert effects.
//!
//! ## ResourceBag
//!
//! A fixed-size count per type, backed by `[u32; 5]`. Counts are unsigned,
//! and removing more than a bag holds is a programming error (assertion),
//! not a user error: callers check `contains` first and report
//! `RulesError::InsufficientResources` themselves.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// One of the five resource types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Red,
    Blue,
    Green,
    Black,
    Gold,
}

impl ResourceType {
    /// All types in canonical order.
    pub const ALL: [ResourceType; 5] = [
        ResourceType::Red,
        ResourceType::Blue,
        ResourceType::Green,
        ResourceType::Black,
        ResourceType::Gold,
    ];

    /// The four elemental (non-gold) types.
    pub const ELEMENTAL: [ResourceType; 4] = [
        ResourceType::Red,
        ResourceType::Blue,
        ResourceType::Green,
        ResourceType::Black,
    ];

    /// Index into per-type tables.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn is_gold(self) -> bool {
        matches!(self, ResourceType::Gold)
    }

    /// Lowercase name, as used on the wire.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            ResourceType::Red => "red",
            ResourceType::Blue => "blue",
            ResourceType::Green => "green",
            ResourceType::Black => "black",
            ResourceType::Gold => "gold",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Non-negative resource counts, one per type.
///
/// Serializes as a map of the non-zero entries, e.g. `{"red":1,"gold":3}`.
///
/// ```
/// use arcana_rules::core::{ResourceBag, ResourceType};
///
/// let mut pool = ResourceBag::new().with(ResourceType::Red, 2).with(ResourceType::Gold, 1);
/// let cost = ResourceBag::of(ResourceType::Red, 1);
///
/// assert!(pool.contains(&cost));
/// pool.remove_bag(&cost);
/// assert_eq!(pool.get(ResourceType::Red), 1);
/// assert_eq!(pool.total(), 2);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "BTreeMap<ResourceType, u32>", into = "BTreeMap<ResourceType, u32>")]
pub struct ResourceBag {
    counts: [u32; 5],
}

impl ResourceBag {
    /// An empty bag.
    #[must_use]
    pub const fn new() -> Self {
        Self { counts: [0; 5] }
    }

    /// A bag holding `count` of a single type.
    #[must_use]
    pub fn of(resource: ResourceType, count: u32) -> Self {
        Self::new().with(resource, count)
    }

    /// Add `count` of a type (builder pattern).
    #[must_use]
    pub fn with(mut self, resource: ResourceType, count: u32) -> Self {
        self.add_count(resource, count);
        self
    }

    #[must_use]
    pub fn get(&self, resource: ResourceType) -> u32 {
        self.counts[resource.index()]
    }

    pub fn add_count(&mut self, resource: ResourceType, count: u32) {
        self.counts[resource.index()] += count;
    }

    pub fn add_bag(&mut self, other: &ResourceBag) {
        for (slot, extra) in self.counts.iter_mut().zip(other.counts) {
            *slot += extra;
        }
    }

    /// Remove `count` of a type.
    ///
    /// Panics if the bag holds fewer: callers must validate first.
    pub fn remove(&mut self, resource: ResourceType, count: u32) {
        let slot = &mut self.counts[resource.index()];
        assert!(
            *slot >= count,
            "resource underflow: removing {} {} from {}",
            count,
            resource,
            *slot
        );
        *slot -= count;
    }

    /// Remove every count in `other`.
    ///
    /// Panics if `!self.contains(other)`.
    pub fn remove_bag(&mut self, other: &ResourceBag) {
        assert!(self.contains(other), "resource underflow: removing {} from {}", other, self);
        for (slot, taken) in self.counts.iter_mut().zip(other.counts) {
            *slot -= taken;
        }
    }

    /// Remove as much of `other` as is present, returning what was removed.
    pub fn remove_clamped(&mut self, other: &ResourceBag) -> ResourceBag {
        let mut removed = ResourceBag::new();
        for resource in ResourceType::ALL {
            let take = self.get(resource).min(other.get(resource));
            self.counts[resource.index()] -= take;
            removed.counts[resource.index()] = take;
        }
        removed
    }

    /// Empty the bag, returning its former contents.
    pub fn take_all(&mut self) -> ResourceBag {
        std::mem::take(self)
    }

    /// Does this bag hold at least every count in `other`?
    #[must_use]
    pub fn contains(&self, other: &ResourceBag) -> bool {
        self.counts.iter().zip(other.counts).all(|(have, need)| *have >= need)
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    /// Total of the elemental types.
    #[must_use]
    pub fn non_gold_total(&self) -> u32 {
        self.total() - self.get(ResourceType::Gold)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Number of types with a non-zero count.
    #[must_use]
    pub fn distinct_types(&self) -> usize {
        self.counts.iter().filter(|c| **c > 0).count()
    }

    /// Every count multiplied by `factor`.
    #[must_use]
    pub fn scaled(&self, factor: u32) -> ResourceBag {
        let mut out = *self;
        for slot in &mut out.counts {
            *slot *= factor;
        }
        out
    }

    /// Non-zero entries in canonical type order.
    pub fn iter(&self) -> impl Iterator<Item = (ResourceType, u32)> + '_ {
        ResourceType::ALL
            .into_iter()
            .map(|r| (r, self.get(r)))
            .filter(|(_, n)| *n > 0)
    }

    /// Are all non-zero entries of a type the filter allows?
    #[must_use]
    pub fn only_uses(&self, filter: &ResourceFilter) -> bool {
        self.iter().all(|(r, _)| filter.allows(r))
    }

    /// Weighted sum against a per-type value table.
    #[must_use]
    pub fn value(&self, table: &[u32; 5]) -> u32 {
        self.counts.iter().zip(table).map(|(n, v)| n * v).sum()
    }
}

impl Add for ResourceBag {
    type Output = ResourceBag;

    fn add(mut self, rhs: ResourceBag) -> ResourceBag {
        self.add_bag(&rhs);
        self
    }
}

impl AddAssign for ResourceBag {
    fn add_assign(&mut self, rhs: ResourceBag) {
        self.add_bag(&rhs);
    }
}

impl From<BTreeMap<ResourceType, u32>> for ResourceBag {
    fn from(map: BTreeMap<ResourceType, u32>) -> Self {
        let mut bag = ResourceBag::new();
        for (resource, count) in map {
            bag.add_count(resource, count);
        }
        bag
    }
}

impl From<ResourceBag> for BTreeMap<ResourceType, u32> {
    fn from(bag: ResourceBag) -> Self {
        bag.iter().collect()
    }
}

impl fmt::Display for ResourceBag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("nothing");
        }
        let parts: Vec<String> = self.iter().map(|(r, n)| format!("{} {}", n, r)).collect();
        f.write_str(&parts.join(", "))
    }
}

/// Which resource types a choice may use.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceFilter {
    Any,
    NonGold,
    Only(SmallVec<[ResourceType; 4]>),
}

impl ResourceFilter {
    /// Restrict to the listed types.
    pub fn only(types: impl IntoIterator<Item = ResourceType>) -> Self {
        Self::Only(types.into_iter().collect())
    }

    #[must_use]
    pub fn allows(&self, resource: ResourceType) -> bool {
        match self {
            ResourceFilter::Any => true,
            ResourceFilter::NonGold => !resource.is_gold(),
            ResourceFilter::Only(types) => types.contains(&resource),
        }
    }

    /// Allowed types in canonical order.
    #[must_use]
    pub fn types(&self) -> Vec<ResourceType> {
        ResourceType::ALL.into_iter().filter(|r| self.allows(*r)).collect()
    }
}

/// Every bag of exactly `total` resources drawn from `types`.
///
/// When `cap` is given, no entry may exceed the cap's count for that type
/// (used to limit payment options to what a seat holds). Results are in a
/// stable order: lexicographic by the counts of `types` in the given order,
/// largest first.
///
/// ```
/// use arcana_rules::core::{distributions, ResourceType};
///
/// let options = distributions(2, &[ResourceType::Red, ResourceType::Blue], None);
/// assert_eq!(options.len(), 3); // 2R, 1R+1B, 2B
/// ```
#[must_use]
pub fn distributions(
    total: u32,
    types: &[ResourceType],
    cap: Option<&ResourceBag>,
) -> Vec<ResourceBag> {
    fn walk(
        remaining: u32,
        types: &[ResourceType],
        cap: Option<&ResourceBag>,
        current: ResourceBag,
        out: &mut Vec<ResourceBag>,
    ) {
        let Some((&first, rest)) = types.split_first() else {
            if remaining == 0 {
                out.push(current);
            }
            return;
        };
        let limit = cap.map_or(remaining, |c| c.get(first).min(remaining));
        for n in (0..=limit).rev() {
            // The tail must be able to absorb what is left.
            if rest.is_empty() && n != remaining {
                continue;
            }
            walk(remaining - n, rest, cap, current.with(first, n), out);
        }
    }

    let mut out = Vec::new();
    walk(total, types, cap, ResourceBag::new(), &mut out);
    out
}
