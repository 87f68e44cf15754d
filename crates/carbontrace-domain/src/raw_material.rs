//! Raw materials registered by suppliers

use crate::Address;

/// Ledger-assigned raw material identifier
pub type MaterialId = u64;

/// A raw material as currently recorded on the ledger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMaterial {
    /// Unique identifier
    pub material_id: MaterialId,

    /// Material name
    pub name: String,

    /// Supplier lot number
    pub lot: u64,

    /// Supplier that registered the material
    pub supplier: Address,

    /// Carbon footprint of the material
    pub carbon_footprint: u64,

    /// Whether a product has consumed this material
    pub is_used: bool,

    /// Transformer the material was shipped to
    pub transformer: Address,
}

impl RawMaterial {
    /// Whether `transformer` may still use this material in a new product
    pub fn is_usable_by(&self, transformer: &Address) -> bool {
        !self.is_used && &self.transformer == transformer
    }
}
