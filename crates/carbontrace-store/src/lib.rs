//! carbontrace Storage Layer
//!
//! Local SQLite mirror of the supply-chain ledger. Implements both read
//! seams the filter engine depends on: the entity snapshot (products and raw
//! materials) and the event history (raw-material-used and transformation
//! events).
//!
//! # Examples
//!
//! ```no_run
//! use carbontrace_store::SqliteLedger;
//!
//! let ledger = SqliteLedger::new(":memory:").unwrap();
//! // Ledger is now ready for imports and queries
//! ```

#![warn(missing_docs)]

mod snapshot;

pub use snapshot::{
    ImportSummary, LedgerSnapshot, ProductRecord, RawMaterialRecord, RawMaterialUsedRecord,
    TransformationRecord,
};

use carbontrace_domain::traits::{EntitySnapshotSource, EventHistorySource};
use carbontrace_domain::{
    Address, EventKind, EventRecord, MaterialId, Product, ProductDetails, ProductId, RawMaterial,
    RawMaterialUsed, Transformation,
};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Record not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Record already present
    #[error("Duplicate record: {0}")]
    Duplicate(String),

    /// Product no longer accepts changes
    #[error("Product {0} is ended")]
    ProductEnded(ProductId),
}

const PRODUCT_COLUMNS: &str = "product_id, name, owner, carbon_footprint, is_ended";
const MATERIAL_COLUMNS: &str =
    "material_id, name, lot, supplier, carbon_footprint, is_used, transformer";
const USED_COLUMNS: &str = "product_id, supplier, transformer, name, lot, carbon_footprint";
const TRANSFORMATION_COLUMNS: &str = "product_id, transformer, carbon_footprint";

/// SQLite-backed ledger mirror
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Each thread should open its own
/// `SqliteLedger`.
pub struct SqliteLedger {
    conn: Connection,
}

impl SqliteLedger {
    /// Open (or create) a ledger database at `path`
    ///
    /// Use `:memory:` for an in-memory database.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path.as_ref())?;
        let mut ledger = Self { conn };
        ledger.initialize_schema()?;
        info!(path = %path.as_ref().display(), "Opened ledger database");
        Ok(ledger)
    }

    fn initialize_schema(&mut self) -> Result<(), StoreError> {
        let schema = include_str!("schema.sql");
        self.conn.execute_batch(schema)?;
        Ok(())
    }

    /// Add a product
    pub fn insert_product(&mut self, product: &Product) -> Result<ProductId, StoreError> {
        insert_product(&self.conn, product)
    }

    /// Add a raw material
    pub fn insert_raw_material(&mut self, material: &RawMaterial) -> Result<MaterialId, StoreError> {
        insert_raw_material(&self.conn, material)
    }

    /// Append a raw-material-used event
    ///
    /// Fails if the product is unknown or ended.
    pub fn record_raw_material_used(&mut self, event: &RawMaterialUsed) -> Result<(), StoreError> {
        ensure_open(&self.conn, event.product_id)?;
        insert_raw_material_used(&self.conn, event)
    }

    /// Append a transformation event
    ///
    /// Fails if the product is unknown or ended.
    pub fn record_transformation(&mut self, event: &Transformation) -> Result<(), StoreError> {
        ensure_open(&self.conn, event.product_id)?;
        insert_transformation(&self.conn, event)
    }

    /// Mark a product as ended
    ///
    /// Ending is one-way; ending an ended product does nothing.
    pub fn mark_ended(&mut self, id: ProductId) -> Result<(), StoreError> {
        mark_ended(&self.conn, id)
    }

    /// Load a full ledger export in one transaction
    ///
    /// Either every record is written or none is.
    pub fn import_snapshot(&mut self, snapshot: &LedgerSnapshot) -> Result<ImportSummary, StoreError> {
        let tx = self.conn.transaction()?;
        let mut summary = ImportSummary::default();

        // Products are written open; ended flags are applied after their events.
        let mut ended = Vec::new();
        for record in &snapshot.products {
            let product = Product::try_from(record)?;
            if product.is_ended {
                ended.push(product.product_id);
            }
            insert_product(
                &tx,
                &Product {
                    is_ended: false,
                    ..product
                },
            )?;
            summary.products += 1;
        }

        for record in &snapshot.raw_materials {
            insert_raw_material(&tx, &RawMaterial::try_from(record)?)?;
            summary.raw_materials += 1;
        }

        for record in &snapshot.raw_material_used {
            let event = RawMaterialUsed::try_from(record)?;
            ensure_open(&tx, event.product_id)?;
            insert_raw_material_used(&tx, &event)?;
            summary.events += 1;
        }

        for record in &snapshot.transformations {
            let event = Transformation::try_from(record)?;
            ensure_open(&tx, event.product_id)?;
            insert_transformation(&tx, &event)?;
            summary.events += 1;
        }

        for id in ended {
            mark_ended(&tx, id)?;
        }

        tx.commit()?;

        info!(
            products = summary.products,
            raw_materials = summary.raw_materials,
            events = summary.events,
            "Imported ledger snapshot"
        );

        Ok(summary)
    }

    /// A product with every event recorded against it
    pub fn product_details(&self, id: ProductId) -> Result<Option<ProductDetails>, StoreError> {
        let Some(product) = self.fetch_product(id)? else {
            return Ok(None);
        };

        let raw_materials = self
            .fetch_product_events(id, EventKind::RawMaterialUsed)?
            .into_iter()
            .filter_map(|event| match event {
                EventRecord::RawMaterialUsed(e) => Some(e),
                EventRecord::Transformation(_) => None,
            })
            .collect();

        let transformations = self
            .fetch_product_events(id, EventKind::Transformation)?
            .into_iter()
            .filter_map(|event| match event {
                EventRecord::Transformation(e) => Some(e),
                EventRecord::RawMaterialUsed(_) => None,
            })
            .collect();

        Ok(Some(ProductDetails {
            product,
            raw_materials,
            transformations,
        }))
    }

    /// Products `owner` may still transform: owned by them and not ended
    pub fn updatable_products(&self, owner: &Address) -> Result<Vec<Product>, StoreError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM products WHERE owner = ?1 AND is_ended = 0 ORDER BY product_id",
            PRODUCT_COLUMNS
        ))?;
        let products = stmt
            .query_map(params![owner.as_str()], product_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(products)
    }

    /// Raw materials delivered to `transformer` and not yet used
    pub fn usable_raw_materials(&self, transformer: &Address) -> Result<Vec<RawMaterial>, StoreError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM raw_materials WHERE transformer = ?1 AND is_used = 0 ORDER BY material_id",
            MATERIAL_COLUMNS
        ))?;
        let materials = stmt
            .query_map(params![transformer.as_str()], material_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(materials)
    }
}

impl EntitySnapshotSource for SqliteLedger {
    type Error = StoreError;

    fn fetch_all_products(&self) -> Result<Vec<Product>, Self::Error> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM products ORDER BY product_id",
            PRODUCT_COLUMNS
        ))?;
        let products = stmt
            .query_map([], product_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        debug!(count = products.len(), "Fetched products");
        Ok(products)
    }

    fn fetch_all_raw_materials(&self) -> Result<Vec<RawMaterial>, Self::Error> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM raw_materials ORDER BY material_id",
            MATERIAL_COLUMNS
        ))?;
        let materials = stmt
            .query_map([], material_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(materials)
    }

    fn fetch_product(&self, id: ProductId) -> Result<Option<Product>, Self::Error> {
        // Ids that do not fit a column can never have been written
        let Ok(key) = i64::try_from(id.value()) else {
            return Ok(None);
        };
        let product = self
            .conn
            .query_row(
                &format!("SELECT {} FROM products WHERE product_id = ?1", PRODUCT_COLUMNS),
                params![key],
                product_from_row,
            )
            .optional()?;
        Ok(product)
    }
}

impl EventHistorySource for SqliteLedger {
    type Error = StoreError;

    fn fetch_event_history(&self, kind: EventKind) -> Result<Vec<EventRecord>, Self::Error> {
        let events = match kind {
            EventKind::RawMaterialUsed => self.query_events(
                &format!("SELECT {} FROM raw_material_used_events ORDER BY seq", USED_COLUMNS),
                [],
                used_from_row,
            )?,
            EventKind::Transformation => self.query_events(
                &format!("SELECT {} FROM transformation_events ORDER BY seq", TRANSFORMATION_COLUMNS),
                [],
                transformation_from_row,
            )?,
        };
        debug!(kind = kind.as_str(), count = events.len(), "Fetched event history");
        Ok(events)
    }

    fn fetch_product_events(
        &self,
        id: ProductId,
        kind: EventKind,
    ) -> Result<Vec<EventRecord>, Self::Error> {
        let Ok(key) = i64::try_from(id.value()) else {
            return Ok(Vec::new());
        };
        match kind {
            EventKind::RawMaterialUsed => self.query_events(
                &format!(
                    "SELECT {} FROM raw_material_used_events WHERE product_id = ?1 ORDER BY seq",
                    USED_COLUMNS
                ),
                params![key],
                used_from_row,
            ),
            EventKind::Transformation => self.query_events(
                &format!(
                    "SELECT {} FROM transformation_events WHERE product_id = ?1 ORDER BY seq",
                    TRANSFORMATION_COLUMNS
                ),
                params![key],
                transformation_from_row,
            ),
        }
    }
}

impl SqliteLedger {
    fn query_events<P, T, F>(&self, sql: &str, params: P, map: F) -> Result<Vec<EventRecord>, StoreError>
    where
        P: rusqlite::Params,
        T: Into<EventRecord>,
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        let mut stmt = self.conn.prepare(sql)?;
        let events = stmt
            .query_map(params, map)?
            .map(|r| r.map(Into::into))
            .collect::<Result<Vec<EventRecord>, _>>()?;
        Ok(events)
    }
}

fn insert_product(conn: &Connection, product: &Product) -> Result<ProductId, StoreError> {
    let id = column_int("product_id", product.product_id.value())?;
    let carbon_footprint = column_int("carbon_footprint", product.carbon_footprint)?;

    let exists: bool = conn
        .query_row("SELECT 1 FROM products WHERE product_id = ?1", params![id], |_| Ok(true))
        .optional()?
        .unwrap_or(false);

    if exists {
        return Err(StoreError::Duplicate(format!("product {}", product.product_id)));
    }

    conn.execute(
        "INSERT INTO products (product_id, name, owner, carbon_footprint, is_ended)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            id,
            &product.name,
            product.owner.as_str(),
            carbon_footprint,
            product.is_ended,
        ],
    )?;

    Ok(product.product_id)
}

fn insert_raw_material(conn: &Connection, material: &RawMaterial) -> Result<MaterialId, StoreError> {
    let id = column_int("material_id", material.material_id)?;
    let lot = column_int("lot", material.lot)?;
    let carbon_footprint = column_int("carbon_footprint", material.carbon_footprint)?;

    let exists: bool = conn
        .query_row(
            "SELECT 1 FROM raw_materials WHERE material_id = ?1",
            params![id],
            |_| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if exists {
        return Err(StoreError::Duplicate(format!("raw material {}", material.material_id)));
    }

    conn.execute(
        "INSERT INTO raw_materials (material_id, name, lot, supplier, carbon_footprint, is_used, transformer)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            id,
            &material.name,
            lot,
            material.supplier.as_str(),
            carbon_footprint,
            material.is_used,
            material.transformer.as_str(),
        ],
    )?;

    Ok(material.material_id)
}

fn insert_raw_material_used(conn: &Connection, event: &RawMaterialUsed) -> Result<(), StoreError> {
    let lot = column_int("lot", event.lot)?;
    let carbon_footprint = column_int("carbon_footprint", event.carbon_footprint)?;
    conn.execute(
        "INSERT INTO raw_material_used_events (product_id, supplier, transformer, name, lot, carbon_footprint)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            column_int("product_id", event.product_id.value())?,
            event.supplier.as_str(),
            event.transformer.as_str(),
            &event.name,
            lot,
            carbon_footprint,
        ],
    )?;
    Ok(())
}

fn insert_transformation(conn: &Connection, event: &Transformation) -> Result<(), StoreError> {
    conn.execute(
        "INSERT INTO transformation_events (product_id, transformer, carbon_footprint)
         VALUES (?1, ?2, ?3)",
        params![
            column_int("product_id", event.product_id.value())?,
            event.transformer.as_str(),
            column_int("carbon_footprint", event.carbon_footprint)?,
        ],
    )?;
    Ok(())
}

fn ensure_open(conn: &Connection, id: ProductId) -> Result<(), StoreError> {
    let ended: Option<bool> = conn
        .query_row(
            "SELECT is_ended FROM products WHERE product_id = ?1",
            params![column_int("product_id", id.value())?],
            |row| row.get(0),
        )
        .optional()?;

    match ended {
        None => Err(StoreError::NotFound(format!("product {}", id))),
        Some(true) => Err(StoreError::ProductEnded(id)),
        Some(false) => Ok(()),
    }
}

fn mark_ended(conn: &Connection, id: ProductId) -> Result<(), StoreError> {
    let changed = conn.execute(
        "UPDATE products SET is_ended = 1 WHERE product_id = ?1",
        params![column_int("product_id", id.value())?],
    )?;

    if changed == 0 {
        return Err(StoreError::NotFound(format!("product {}", id)));
    }
    Ok(())
}

fn address_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Address> {
    let raw: String = row.get(idx)?;
    Address::parse(&raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(StoreError::InvalidData(e)))
    })
}

/// SQLite integers are i64; larger ledger values are refused before writing.
fn column_int(field: &str, value: u64) -> Result<i64, StoreError> {
    i64::try_from(value)
        .map_err(|_| StoreError::InvalidData(format!("{} {} exceeds i64::MAX", field, value)))
}

fn u64_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<u64> {
    let raw: i64 = row.get(idx)?;
    u64::try_from(raw).map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Integer, Box::new(e)))
}

fn product_from_row(row: &Row<'_>) -> rusqlite::Result<Product> {
    Ok(Product {
        product_id: ProductId::new(u64_column(row, 0)?),
        name: row.get(1)?,
        owner: address_column(row, 2)?,
        carbon_footprint: u64_column(row, 3)?,
        is_ended: row.get(4)?,
    })
}

fn material_from_row(row: &Row<'_>) -> rusqlite::Result<RawMaterial> {
    Ok(RawMaterial {
        material_id: u64_column(row, 0)?,
        name: row.get(1)?,
        lot: u64_column(row, 2)?,
        supplier: address_column(row, 3)?,
        carbon_footprint: u64_column(row, 4)?,
        is_used: row.get(5)?,
        transformer: address_column(row, 6)?,
    })
}

fn used_from_row(row: &Row<'_>) -> rusqlite::Result<RawMaterialUsed> {
    Ok(RawMaterialUsed {
        product_id: ProductId::new(u64_column(row, 0)?),
        supplier: address_column(row, 1)?,
        transformer: address_column(row, 2)?,
        name: row.get(3)?,
        lot: u64_column(row, 4)?,
        carbon_footprint: u64_column(row, 5)?,
    })
}

fn transformation_from_row(row: &Row<'_>) -> rusqlite::Result<Transformation> {
    Ok(Transformation {
        product_id: ProductId::new(u64_column(row, 0)?),
        transformer: address_column(row, 1)?,
        carbon_footprint: u64_column(row, 2)?,
    })
}
