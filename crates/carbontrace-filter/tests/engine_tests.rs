//! Integration tests for the source-backed filter engine
//!
//! These tests drive whole filtering sessions through `FilterEngine` over an
//! in-memory ledger, the way the interactive loop does.

use carbontrace_domain::traits::{EntitySnapshotSource, EventHistorySource};
use carbontrace_domain::{
    Address, EventKind, EventRecord, Product, ProductId, RawMaterial, RawMaterialUsed,
    Transformation,
};
use carbontrace_filter::{Chain, ConfigurationError, Criterion, EngineError, FilterEngine, Mode, ResultSet};
use std::cell::Cell;

const SUPPLIER: &str = "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
const MILL: &str = "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";
const TAILOR: &str = "0xcccccccccccccccccccccccccccccccccccccccc";

fn addr(s: &str) -> Address {
    Address::parse(s).unwrap()
}

/// In-memory ledger counting how often each source is read
#[derive(Default)]
struct MemoryLedger {
    products: Vec<Product>,
    events: Vec<EventRecord>,
    product_fetches: Cell<usize>,
    event_fetches: Cell<usize>,
}

impl EntitySnapshotSource for MemoryLedger {
    type Error = String;

    fn fetch_all_products(&self) -> Result<Vec<Product>, Self::Error> {
        self.product_fetches.set(self.product_fetches.get() + 1);
        Ok(self.products.clone())
    }

    fn fetch_all_raw_materials(&self) -> Result<Vec<RawMaterial>, Self::Error> {
        Ok(Vec::new())
    }

    fn fetch_product(&self, id: ProductId) -> Result<Option<Product>, Self::Error> {
        Ok(self.products.iter().find(|p| p.product_id == id).cloned())
    }
}

impl EventHistorySource for MemoryLedger {
    type Error = String;

    fn fetch_event_history(&self, kind: EventKind) -> Result<Vec<EventRecord>, Self::Error> {
        self.event_fetches.set(self.event_fetches.get() + 1);
        Ok(self.events.iter().filter(|e| e.kind() == kind).cloned().collect())
    }

    fn fetch_product_events(
        &self,
        id: ProductId,
        kind: EventKind,
    ) -> Result<Vec<EventRecord>, Self::Error> {
        Ok(self
            .events
            .iter()
            .filter(|e| e.kind() == kind && e.product_id() == id)
            .cloned()
            .collect())
    }
}

/// Event source whose node is unreachable
struct Unreachable;

impl EventHistorySource for Unreachable {
    type Error = String;

    fn fetch_event_history(&self, _kind: EventKind) -> Result<Vec<EventRecord>, Self::Error> {
        Err("Could not connect to the ledger".to_string())
    }

    fn fetch_product_events(
        &self,
        _id: ProductId,
        _kind: EventKind,
    ) -> Result<Vec<EventRecord>, Self::Error> {
        Err("Could not connect to the ledger".to_string())
    }
}

fn ledger() -> MemoryLedger {
    let products = vec![
        Product::new(ProductId::new(1), "Shirt".to_string(), addr(TAILOR), 50),
        Product::new(ProductId::new(2), "Jacket".to_string(), addr(TAILOR), 120),
        Product {
            is_ended: true,
            ..Product::new(ProductId::new(3), "Scarf".to_string(), addr(MILL), 80)
        },
        Product::new(ProductId::new(4), "Fabric".to_string(), addr(MILL), 30),
    ];

    let used = |product: u64, name: &str, lot: u64| -> EventRecord {
        RawMaterialUsed {
            product_id: ProductId::new(product),
            supplier: addr(SUPPLIER),
            transformer: addr(TAILOR),
            name: name.to_string(),
            lot,
            carbon_footprint: 10,
        }
        .into()
    };

    let events = vec![
        used(1, "Cotton", 1),
        used(1, "Cotton", 2),
        used(2, "Wool", 3),
        used(2, "Cotton", 4),
        Transformation {
            product_id: ProductId::new(3),
            transformer: addr(MILL),
            carbon_footprint: 40,
        }
        .into(),
        Transformation {
            product_id: ProductId::new(4),
            transformer: addr(MILL),
            carbon_footprint: 30,
        }
        .into(),
    ];

    MemoryLedger {
        products,
        events,
        ..Default::default()
    }
}

fn ids(v: &[u64]) -> ResultSet {
    v.iter().copied().map(ProductId::new).collect()
}

#[test]
fn test_entity_criterion_reads_snapshot_only() {
    let ledger = ledger();
    let engine = FilterEngine::new(&ledger, &ledger);

    let result = engine.evaluate(&Criterion::parse("cf", ">=", "80").unwrap()).unwrap();
    assert_eq!(result, ids(&[2, 3]));
    assert_eq!(ledger.product_fetches.get(), 1);
    assert_eq!(ledger.event_fetches.get(), 0);
}

#[test]
fn test_event_criterion_fetches_only_needed_kinds() {
    let ledger = ledger();
    let engine = FilterEngine::new(&ledger, &ledger);

    let result = engine
        .evaluate(&Criterion::parse("rawMaterialName", "=", "Cotton").unwrap())
        .unwrap();
    assert_eq!(result, ids(&[1, 2]));
    assert_eq!(ledger.event_fetches.get(), 1);

    let result = engine
        .evaluate(&Criterion::parse("transformer", "=", MILL).unwrap())
        .unwrap();
    assert_eq!(result, ids(&[3, 4]));
    assert_eq!(ledger.event_fetches.get(), 3);
    assert_eq!(ledger.product_fetches.get(), 0);
}

#[test]
fn test_interactive_session() {
    let ledger = ledger();
    let engine = FilterEngine::new(&ledger, &ledger);
    let mut chain = Chain::new();

    // Products built with cotton...
    let step = engine
        .apply(&mut chain, Mode::Or, Criterion::parse("material", "=", "Cotton").unwrap())
        .unwrap();
    assert_eq!(step, &ids(&[1, 2]));

    // ...that are heavy...
    let step = engine
        .apply(&mut chain, Mode::And, Criterion::parse("cf", ">", "100").unwrap())
        .unwrap();
    assert_eq!(step, &ids(&[2]));

    // ...or already finished.
    let step = engine
        .apply(&mut chain, Mode::Or, Criterion::parse("ended", "=", "yes").unwrap())
        .unwrap();
    assert_eq!(step, &ids(&[2, 3]));

    assert_eq!(chain.steps().len(), 3);
}

#[test]
fn test_source_failure_is_reported_and_chain_kept() {
    let ledger = ledger();
    let engine = FilterEngine::new(&ledger, &Unreachable);
    let mut chain = Chain::new();

    engine
        .apply(&mut chain, Mode::Or, Criterion::parse("owner", "=", TAILOR).unwrap())
        .unwrap();

    let err = engine
        .apply(&mut chain, Mode::And, Criterion::parse("supplier", "=", SUPPLIER).unwrap())
        .unwrap_err();
    assert!(matches!(err, EngineError::Source(ref msg) if msg.contains("connect")));

    assert_eq!(chain.results(), &ids(&[1, 2]));
    assert_eq!(chain.steps().len(), 1);
}

#[test]
fn test_configuration_error_raised_before_any_fetch() {
    let ledger = ledger();

    let err = Criterion::parse("ownerAddress", "greater", TAILOR).unwrap_err();
    assert!(matches!(err, ConfigurationError::IncompatibleOperator { .. }));

    // No criterion exists, so nothing could reach the sources.
    assert_eq!(ledger.product_fetches.get(), 0);
    assert_eq!(ledger.event_fetches.get(), 0);
}

#[test]
fn test_evaluate_is_pure() {
    let ledger = ledger();
    let engine = FilterEngine::new(&ledger, &ledger);
    let c = Criterion::parse("lot", "<=", "2").unwrap();

    let first = engine.evaluate(&c).unwrap();
    let second = engine.evaluate(&c).unwrap();
    assert_eq!(first, second);
    assert_eq!(first, ids(&[1]));
}

#[test]
fn test_compose_does_not_touch_accumulated() {
    let ledger = ledger();
    let engine = FilterEngine::new(&ledger, &ledger);
    let accumulated = ids(&[1, 2, 3, 4]);

    let narrowed = engine
        .compose(&accumulated, &Criterion::parse("owner", "=", MILL).unwrap(), Mode::And)
        .unwrap();

    assert_eq!(narrowed, ids(&[3, 4]));
    assert_eq!(accumulated, ids(&[1, 2, 3, 4]));
}
