//! Ledger export format
//!
//! A [`LedgerSnapshot`] is the JSON document the `import` command reads: the
//! full product and raw material tables plus both event logs, as exported
//! from a ledger node. Addresses are kept as strings here and validated when
//! the snapshot is converted to domain records.

use crate::StoreError;
use carbontrace_domain::{
    Address, MaterialId, Product, ProductId, RawMaterial, RawMaterialUsed, Transformation,
};
use serde::{Deserialize, Serialize};

/// Product row of an export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Product id
    pub product_id: u64,
    /// Product name
    pub name: String,
    /// Current owner address
    pub owner: String,
    /// Accumulated carbon footprint
    pub carbon_footprint: u64,
    /// Whether the product is ended
    #[serde(default)]
    pub is_ended: bool,
}

/// Raw material row of an export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMaterialRecord {
    /// Material id
    pub material_id: MaterialId,
    /// Material name
    pub name: String,
    /// Lot number
    pub lot: u64,
    /// Supplier address
    pub supplier: String,
    /// Carbon footprint of the lot
    pub carbon_footprint: u64,
    /// Whether a transformer already used it
    #[serde(default)]
    pub is_used: bool,
    /// Recipient transformer address
    pub transformer: String,
}

/// Raw-material-used event of an export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMaterialUsedRecord {
    /// Product the material went into
    pub product_id: u64,
    /// Supplier address
    pub supplier: String,
    /// Transformer address
    pub transformer: String,
    /// Material name
    pub name: String,
    /// Lot number
    pub lot: u64,
    /// Carbon footprint of the material
    pub carbon_footprint: u64,
}

/// Transformation event of an export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformationRecord {
    /// Transformed product
    pub product_id: u64,
    /// Transformer address
    pub transformer: String,
    /// Carbon footprint added
    pub carbon_footprint: u64,
}

/// Full ledger export
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// Product table
    #[serde(default)]
    pub products: Vec<ProductRecord>,
    /// Raw material table
    #[serde(default)]
    pub raw_materials: Vec<RawMaterialRecord>,
    /// Raw-material-used event log, in ledger order
    #[serde(default)]
    pub raw_material_used: Vec<RawMaterialUsedRecord>,
    /// Transformation event log, in ledger order
    #[serde(default)]
    pub transformations: Vec<TransformationRecord>,
}

/// Counts of records written by an import
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Products written
    pub products: usize,
    /// Raw materials written
    pub raw_materials: usize,
    /// Events written, both kinds
    pub events: usize,
}

impl LedgerSnapshot {
    /// Parse a snapshot from JSON text
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        serde_json::from_str(json).map_err(|e| StoreError::InvalidData(format!("Invalid snapshot: {}", e)))
    }

    /// Serialize the snapshot as pretty-printed JSON
    pub fn to_json(&self) -> Result<String, StoreError> {
        serde_json::to_string_pretty(self).map_err(|e| StoreError::InvalidData(e.to_string()))
    }
}

fn address(field: &str, raw: &str) -> Result<Address, StoreError> {
    Address::parse(raw).map_err(|e| StoreError::InvalidData(format!("{}: {}", field, e)))
}

impl TryFrom<&ProductRecord> for Product {
    type Error = StoreError;

    fn try_from(r: &ProductRecord) -> Result<Self, Self::Error> {
        Ok(Product {
            is_ended: r.is_ended,
            ..Product::new(
                ProductId::new(r.product_id),
                r.name.clone(),
                address("owner", &r.owner)?,
                r.carbon_footprint,
            )
        })
    }
}

impl TryFrom<&RawMaterialRecord> for RawMaterial {
    type Error = StoreError;

    fn try_from(r: &RawMaterialRecord) -> Result<Self, Self::Error> {
        Ok(RawMaterial {
            material_id: r.material_id,
            name: r.name.clone(),
            lot: r.lot,
            supplier: address("supplier", &r.supplier)?,
            carbon_footprint: r.carbon_footprint,
            is_used: r.is_used,
            transformer: address("transformer", &r.transformer)?,
        })
    }
}

impl TryFrom<&RawMaterialUsedRecord> for RawMaterialUsed {
    type Error = StoreError;

    fn try_from(r: &RawMaterialUsedRecord) -> Result<Self, Self::Error> {
        Ok(RawMaterialUsed {
            product_id: ProductId::new(r.product_id),
            supplier: address("supplier", &r.supplier)?,
            transformer: address("transformer", &r.transformer)?,
            name: r.name.clone(),
            lot: r.lot,
            carbon_footprint: r.carbon_footprint,
        })
    }
}

impl TryFrom<&TransformationRecord> for Transformation {
    type Error = StoreError;

    fn try_from(r: &TransformationRecord) -> Result<Self, Self::Error> {
        Ok(Transformation {
            product_id: ProductId::new(r.product_id),
            transformer: address("transformer", &r.transformer)?,
            carbon_footprint: r.carbon_footprint,
        })
    }
}
