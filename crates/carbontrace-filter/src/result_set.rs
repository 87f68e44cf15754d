//! Deduplicated sets of product ids

use carbontrace_domain::ProductId;
use std::collections::BTreeSet;

/// The products matched so far
///
/// Duplicates collapse on insertion. Iteration is in ascending id order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet(BTreeSet<ProductId>);

impl ResultSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of products in the set
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether the set contains `id`
    pub fn contains(&self, id: ProductId) -> bool {
        self.0.contains(&id)
    }

    /// Add a product, returning whether it was new
    pub fn insert(&mut self, id: ProductId) -> bool {
        self.0.insert(id)
    }

    /// Iterate over the ids in ascending order
    pub fn iter(&self) -> impl Iterator<Item = ProductId> + '_ {
        self.0.iter().copied()
    }

    /// Products in either set
    pub fn union(&self, other: &ResultSet) -> ResultSet {
        Self(self.0.union(&other.0).copied().collect())
    }

    /// Products in both sets
    pub fn intersection(&self, other: &ResultSet) -> ResultSet {
        Self(self.0.intersection(&other.0).copied().collect())
    }

    /// The ids as a sorted vector
    pub fn to_vec(&self) -> Vec<ProductId> {
        self.iter().collect()
    }
}

impl FromIterator<ProductId> for ResultSet {
    fn from_iter<I: IntoIterator<Item = ProductId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for ResultSet {
    type Item = ProductId;
    type IntoIter = std::collections::btree_set::IntoIter<ProductId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
