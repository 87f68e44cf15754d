//! Product module - the items whose supply chain is tracked

use crate::{Address, RawMaterialUsed, Transformation};
use std::fmt;

/// Ledger-assigned product identifier
///
/// Unique and immutable once the product exists on the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProductId(u64);

impl ProductId {
    /// Create a ProductId from its raw ledger value
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the raw value
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl From<u64> for ProductId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A product as currently recorded on the ledger
///
/// This is the entity-snapshot record: one product, one id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    /// Unique identifier
    pub product_id: ProductId,

    /// Product name
    pub name: String,

    /// Current owner (a transformer)
    pub owner: Address,

    /// Accumulated carbon footprint
    pub carbon_footprint: u64,

    /// Whether the final transformation has been recorded
    ///
    /// Only ever moves from `false` to `true`.
    pub is_ended: bool,
}

impl Product {
    /// Create a new, not yet ended product
    pub fn new(product_id: ProductId, name: String, owner: Address, carbon_footprint: u64) -> Self {
        Self {
            product_id,
            name,
            owner,
            carbon_footprint,
            is_ended: false,
        }
    }
}

/// A product together with its full event history
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDetails {
    /// The product snapshot
    pub product: Product,

    /// Raw materials consumed to build the product
    pub raw_materials: Vec<RawMaterialUsed>,

    /// Transformations performed on the product, in ledger order
    pub transformations: Vec<Transformation>,
}

impl ProductDetails {
    /// Carbon footprint contributed by raw materials alone
    pub fn raw_material_footprint(&self) -> u64 {
        self.raw_materials.iter().map(|r| r.carbon_footprint).sum()
    }

    /// Carbon footprint contributed by transformations alone
    pub fn transformation_footprint(&self) -> u64 {
        self.transformations.iter().map(|t| t.carbon_footprint).sum()
    }
}
