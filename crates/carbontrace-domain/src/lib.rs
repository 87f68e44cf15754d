//! carbontrace Domain Layer
//!
//! This crate contains the record types shared by every other layer of
//! carbontrace. It has no external dependencies and defines the value objects
//! read from the ledger together with the trait interfaces the filter engine
//! consumes.
//!
//! ## Key Concepts
//!
//! - **Product**: a tracked item with an owner and a running carbon footprint
//! - **Raw Material**: supplier input shipped to a transformer
//! - **Events**: append-only history (raw material used, transformation)
//!   that always points back at the product it pertains to
//! - **Address**: a 20-byte account address in canonical lower-case form
//!
//! ## Architecture
//!
//! - No external crate dependencies
//! - Pure data and small invariants only
//! - Ledger access lives in other crates behind the traits in [`traits`]

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod address;
pub mod event;
pub mod product;
pub mod raw_material;
pub mod traits;

// Re-exports for convenience
pub use address::Address;
pub use event::{EventKind, EventRecord, RawMaterialUsed, Transformation};
pub use product::{Product, ProductDetails, ProductId};
pub use raw_material::{MaterialId, RawMaterial};
