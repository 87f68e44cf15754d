//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the filter engine and the
//! ledger. Implementations live in other crates (carbontrace-store).

use crate::{EventKind, EventRecord, Product, ProductId, RawMaterial};

/// Read access to the current ledger state
///
/// Implemented by the infrastructure layer (carbontrace-store)
pub trait EntitySnapshotSource {
    /// Error type for read operations
    type Error;

    /// Fetch every product currently on the ledger
    fn fetch_all_products(&self) -> Result<Vec<Product>, Self::Error>;

    /// Fetch every raw material currently on the ledger
    fn fetch_all_raw_materials(&self) -> Result<Vec<RawMaterial>, Self::Error>;

    /// Fetch a single product by ID
    fn fetch_product(&self, id: ProductId) -> Result<Option<Product>, Self::Error>;
}

/// Read access to the append-only event history
///
/// Implemented by the infrastructure layer (carbontrace-store)
pub trait EventHistorySource {
    /// Error type for read operations
    type Error;

    /// Fetch every event of the given kind, in ledger order
    fn fetch_event_history(&self, kind: EventKind) -> Result<Vec<EventRecord>, Self::Error>;

    /// Fetch the events of the given kind that reference one product
    fn fetch_product_events(
        &self,
        id: ProductId,
        kind: EventKind,
    ) -> Result<Vec<EventRecord>, Self::Error>;
}
