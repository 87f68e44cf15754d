//! Filter command implementation.

use crate::cli::FilterArgs;
use crate::error::Result;
use crate::expr;
use crate::output::Formatter;
use carbontrace_domain::traits::EntitySnapshotSource;
use carbontrace_domain::Product;
use carbontrace_filter::{Chain, Criterion, FilterEngine, Mode, ResultSet};
use carbontrace_store::SqliteLedger;
use tracing::debug;

/// Execute the filter command.
pub fn execute_filter(args: FilterArgs, ledger: &SqliteLedger, formatter: &Formatter) -> Result<()> {
    let tokens = expr::tokenize_args(&args.expression)?;
    let steps = expr::parse_chain(&tokens)?;
    let chain = run_chain(ledger, steps)?;

    let products = matching_products(ledger, chain.results())?;
    println!("{}", formatter.format_products(&products)?);

    Ok(())
}

/// Apply every step to a fresh chain.
///
/// Stops at the first failing step.
pub fn run_chain(ledger: &SqliteLedger, steps: Vec<(Mode, Criterion)>) -> Result<Chain> {
    let engine = FilterEngine::new(ledger, ledger);
    let mut chain = Chain::new();

    for (mode, criterion) in steps {
        let matched = engine.apply(&mut chain, mode, criterion)?;
        debug!(matched = matched.len(), "Applied filter step");
    }

    Ok(chain)
}

/// Products whose ids are in `results`, in id order.
pub fn matching_products(ledger: &SqliteLedger, results: &ResultSet) -> Result<Vec<Product>> {
    if results.is_empty() {
        return Ok(Vec::new());
    }

    let products = ledger
        .fetch_all_products()?
        .into_iter()
        .filter(|p| results.contains(p.product_id))
        .collect();
    Ok(products)
}
