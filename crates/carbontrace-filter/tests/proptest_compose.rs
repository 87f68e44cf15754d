//! Property tests for AND/OR composition over generated ledgers

use carbontrace_domain::{Address, EventRecord, Product, ProductId, RawMaterialUsed};
use carbontrace_filter::{compose, evaluate, Candidates, Criterion, Field, Mode, Operator, ResultSet, Value};
use proptest::prelude::*;

fn address(n: u8) -> Address {
    Address::parse(&format!("0x{:040x}", n)).unwrap()
}

fn arb_products() -> impl Strategy<Value = Vec<Product>> {
    prop::collection::vec((1u64..40, 0u64..200, 0u8..3, any::<bool>()), 0..25).prop_map(|rows| {
        rows.into_iter()
            .map(|(id, cf, owner, ended)| Product {
                is_ended: ended,
                ..Product::new(ProductId::new(id), format!("P{}", id), address(owner), cf)
            })
            .collect::<Vec<_>>()
    })
}

fn arb_events() -> impl Strategy<Value = Vec<EventRecord>> {
    prop::collection::vec((1u64..40, 0u8..3, 0u64..10, 0u64..100), 0..40).prop_map(|rows| {
        rows.into_iter()
            .map(|(product, supplier, lot, cf)| -> EventRecord {
                RawMaterialUsed {
                    product_id: ProductId::new(product),
                    supplier: address(supplier),
                    transformer: address(9),
                    name: format!("M{}", lot % 3),
                    lot,
                    carbon_footprint: cf,
                }
                .into()
            })
            .collect::<Vec<_>>()
    })
}

fn arb_operator() -> impl Strategy<Value = Operator> {
    prop::sample::select(Operator::ALL.to_vec())
}

fn arb_entity_criterion() -> impl Strategy<Value = Criterion> {
    prop_oneof![
        (arb_operator(), 0u64..200)
            .prop_map(|(op, v)| Criterion::new(Field::CarbonFootprint, op, Value::Integer(v)).unwrap()),
        (arb_operator(), 1u64..40)
            .prop_map(|(op, v)| Criterion::new(Field::ProductId, op, Value::Integer(v)).unwrap()),
        (0u8..3).prop_map(|n| {
            Criterion::new(Field::OwnerAddress, Operator::Equal, Value::Address(address(n))).unwrap()
        }),
        any::<bool>()
            .prop_map(|b| Criterion::new(Field::IsEnded, Operator::Equal, Value::Boolean(b)).unwrap()),
    ]
}

fn arb_event_criterion() -> impl Strategy<Value = Criterion> {
    prop_oneof![
        (0u8..3).prop_map(|n| {
            Criterion::new(Field::SupplierAddress, Operator::Equal, Value::Address(address(n))).unwrap()
        }),
        (arb_operator(), 0u64..10)
            .prop_map(|(op, v)| Criterion::new(Field::Lot, op, Value::Integer(v)).unwrap()),
        (0u64..3).prop_map(|n| {
            Criterion::new(Field::RawMaterialName, Operator::Equal, Value::Text(format!("M{}", n)))
                .unwrap()
        }),
    ]
}

fn arb_accumulated() -> impl Strategy<Value = ResultSet> {
    prop::collection::vec(1u64..40, 0..20)
        .prop_map(|ids| ids.into_iter().map(ProductId::new).collect::<ResultSet>())
}

fn arb_mode() -> impl Strategy<Value = Mode> {
    prop_oneof![Just(Mode::And), Just(Mode::Or)]
}

proptest! {
    /// Property: evaluation depends only on its inputs
    #[test]
    fn test_evaluate_is_pure(products in arb_products(), c in arb_entity_criterion()) {
        let first = evaluate(&c, Candidates::Entities(&products)).unwrap();
        let second = evaluate(&c, Candidates::Entities(&products)).unwrap();
        prop_assert_eq!(first, second);
    }

    /// Property: every matched entity id comes from a matching record
    #[test]
    fn test_entity_matches_are_exact(products in arb_products(), c in arb_entity_criterion()) {
        let result = evaluate(&c, Candidates::Entities(&products)).unwrap();
        let expected: ResultSet = products
            .iter()
            .filter(|p| c.matches_product(p))
            .map(|p| p.product_id)
            .collect();
        prop_assert_eq!(result, expected);
    }

    /// Property: an event match includes its product exactly when some event qualifies
    #[test]
    fn test_event_matches_collapse_per_product(events in arb_events(), c in arb_event_criterion()) {
        let result = evaluate(&c, Candidates::Events(&events)).unwrap();
        for id in result.iter() {
            prop_assert!(events.iter().any(|e| e.product_id() == id && c.matches_event(e)));
        }
        for e in events.iter().filter(|e| c.matches_event(e)) {
            prop_assert!(result.contains(e.product_id()));
        }
    }

    /// Property: OR is idempotent
    #[test]
    fn test_or_idempotent(
        products in arb_products(),
        c in arb_entity_criterion(),
        s in arb_accumulated(),
    ) {
        let once = compose(&s, &c, Candidates::Entities(&products), Mode::Or).unwrap();
        let twice = compose(&once, &c, Candidates::Entities(&products), Mode::Or).unwrap();
        prop_assert_eq!(once, twice);
    }

    /// Property: AND is idempotent
    #[test]
    fn test_and_idempotent(
        events in arb_events(),
        c in arb_event_criterion(),
        s in arb_accumulated(),
    ) {
        let once = compose(&s, &c, Candidates::Events(&events), Mode::And).unwrap();
        let twice = compose(&once, &c, Candidates::Events(&events), Mode::And).unwrap();
        prop_assert_eq!(once, twice);
    }

    /// Property: AND never grows and OR never shrinks the accumulated set
    #[test]
    fn test_monotonicity(
        products in arb_products(),
        c in arb_entity_criterion(),
        s in arb_accumulated(),
        mode in arb_mode(),
    ) {
        let next = compose(&s, &c, Candidates::Entities(&products), mode).unwrap();
        match mode {
            Mode::And => {
                prop_assert!(next.len() <= s.len());
                prop_assert!(next.iter().all(|id| s.contains(id)));
            }
            Mode::Or => {
                prop_assert!(next.len() >= s.len());
                prop_assert!(s.iter().all(|id| next.contains(id)));
            }
        }
    }

    /// Property: AND is exactly the intersection with a standalone evaluation
    #[test]
    fn test_and_is_intersection(
        products in arb_products(),
        c in arb_entity_criterion(),
        s in arb_accumulated(),
    ) {
        let fresh = evaluate(&c, Candidates::Entities(&products)).unwrap();
        let next = compose(&s, &c, Candidates::Entities(&products), Mode::And).unwrap();
        prop_assert_eq!(next, s.intersection(&fresh));
    }
}
