//! Event module - append-only history emitted by the ledger
//!
//! Events are never unique per product: a product usually has several
//! raw-material-used events and a chain of transformations. Each event
//! carries the id of the product it pertains to.

use crate::{Address, ProductId};

/// Kind of ledger event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A raw material was consumed to build a product
    RawMaterialUsed,

    /// A transformer performed an operation on a product
    Transformation,
}

impl EventKind {
    /// All event kinds, in ledger declaration order
    pub const ALL: [EventKind; 2] = [EventKind::RawMaterialUsed, EventKind::Transformation];

    /// Get the kind name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::RawMaterialUsed => "raw_material_used",
            EventKind::Transformation => "transformation",
        }
    }
}

/// Raw material consumed by a product
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMaterialUsed {
    /// Product the material went into
    pub product_id: ProductId,

    /// Supplier of the material
    pub supplier: Address,

    /// Transformer that used the material
    pub transformer: Address,

    /// Material name
    pub name: String,

    /// Supplier lot number
    pub lot: u64,

    /// Carbon footprint contributed by the material
    pub carbon_footprint: u64,
}

/// Operation performed on a product
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transformation {
    /// Product that was transformed
    pub product_id: ProductId,

    /// Transformer that performed the operation
    pub transformer: Address,

    /// Carbon footprint contributed by the operation
    pub carbon_footprint: u64,
}

/// Any event read from the event history
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventRecord {
    /// See [`RawMaterialUsed`]
    RawMaterialUsed(RawMaterialUsed),

    /// See [`Transformation`]
    Transformation(Transformation),
}

impl EventRecord {
    /// The kind of this event
    pub fn kind(&self) -> EventKind {
        match self {
            EventRecord::RawMaterialUsed(_) => EventKind::RawMaterialUsed,
            EventRecord::Transformation(_) => EventKind::Transformation,
        }
    }

    /// The product this event pertains to (not the event's own identity)
    pub fn product_id(&self) -> ProductId {
        match self {
            EventRecord::RawMaterialUsed(e) => e.product_id,
            EventRecord::Transformation(e) => e.product_id,
        }
    }
}

impl From<RawMaterialUsed> for EventRecord {
    fn from(event: RawMaterialUsed) -> Self {
        EventRecord::RawMaterialUsed(event)
    }
}

impl From<Transformation> for EventRecord {
    fn from(event: Transformation) -> Self {
        EventRecord::Transformation(event)
    }
}
