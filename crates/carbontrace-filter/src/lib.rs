//! carbontrace Filter Engine
//!
//! Narrows a set of products by chaining criteria over two differently
//! shaped sources: the current entity snapshot (products) and the event
//! history (raw-material-used and transformation events).
//!
//! The engine provides:
//! - [`Criterion`]: one validated filter request (source, field, operator, value)
//! - [`evaluate`]: the products matching one criterion
//! - [`compose`]: AND/OR of a fresh evaluation with an accumulated [`ResultSet`]
//! - [`Chain`]: caller-owned loop state for an interactive session
//! - [`FilterEngine`]: the same operations, fetching candidates from injected sources
//!
//! # Examples
//!
//! ```
//! use carbontrace_domain::{Address, Product, ProductId};
//! use carbontrace_filter::{evaluate, Candidates, Criterion};
//!
//! let owner = Address::parse("0x1111111111111111111111111111111111111111").unwrap();
//! let products = vec![
//!     Product::new(ProductId::new(1), "Chair".into(), owner.clone(), 50),
//!     Product::new(ProductId::new(2), "Table".into(), owner.clone(), 120),
//!     Product::new(ProductId::new(3), "Shelf".into(), owner, 80),
//! ];
//!
//! let criterion = Criterion::parse("carbonFootprint", ">=", "80").unwrap();
//! let matches = evaluate(&criterion, Candidates::Entities(&products)).unwrap();
//! assert_eq!(matches.to_vec(), vec![ProductId::new(2), ProductId::new(3)]);
//! ```

#![warn(missing_docs)]

mod chain;
mod criterion;
mod engine;
mod error;
mod evaluate;
mod field;
mod operator;
mod result_set;
mod value;

pub use chain::{Chain, Step};
pub use criterion::Criterion;
pub use engine::{CandidateRecords, FilterEngine};
pub use error::{ConfigurationError, EngineError, Result};
pub use evaluate::{compose, evaluate, Candidates, Mode};
pub use field::{Field, FieldKind, FieldValue, Source};
pub use operator::Operator;
pub use result_set::ResultSet;
pub use value::Value;
