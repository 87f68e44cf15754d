//! Show command implementation.

use crate::cli::ShowArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::validation;
use carbontrace_domain::{ProductDetails, ProductId};
use carbontrace_store::SqliteLedger;

/// Execute the show command.
pub fn execute_show(args: ShowArgs, ledger: &SqliteLedger, formatter: &Formatter) -> Result<()> {
    let id = validation::product_id(&args.id)?;
    let details = load_details(ledger, ProductId::new(id))?;
    println!("{}", formatter.format_details(&details)?);
    Ok(())
}

/// Load one product with its history, failing if it does not exist.
pub fn load_details(ledger: &SqliteLedger, id: ProductId) -> Result<ProductDetails> {
    ledger
        .product_details(id)?
        .ok_or_else(|| CliError::NotFound(format!("product {}", id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing;

    #[test]
    fn test_load_details() {
        let ledger = testing::ledger();
        let details = load_details(&ledger, ProductId::new(3)).unwrap();
        assert!(details.product.is_ended);
        assert_eq!(details.transformation_footprint(), 80);
    }

    #[test]
    fn test_unknown_product() {
        let ledger = testing::ledger();
        let err = load_details(&ledger, ProductId::new(99)).unwrap_err();
        assert!(matches!(err, CliError::NotFound(_)));
    }
}
