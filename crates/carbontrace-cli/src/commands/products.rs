//! Products command implementation.

use crate::cli::ProductsArgs;
use crate::config::Profile;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::validation;
use carbontrace_domain::traits::EntitySnapshotSource;
use carbontrace_domain::Product;
use carbontrace_store::SqliteLedger;

/// Execute the products command.
pub fn execute_products(
    args: ProductsArgs,
    ledger: &SqliteLedger,
    profile: &Profile,
    formatter: &Formatter,
) -> Result<()> {
    let products = list_products(&args, ledger, profile)?;
    println!("{}", formatter.format_products(&products)?);
    Ok(())
}

/// Products selected by `args`.
pub fn list_products(args: &ProductsArgs, ledger: &SqliteLedger, profile: &Profile) -> Result<Vec<Product>> {
    let owner = match &args.owner {
        Some(raw) => Some(validation::address(raw)?),
        None => None,
    };

    if args.updatable {
        let owner = match owner {
            Some(owner) => owner,
            None => profile.owner_address()?.ok_or_else(|| {
                CliError::InvalidInput(
                    "--updatable needs --owner or an owner in the active profile".to_string(),
                )
            })?,
        };
        return Ok(ledger.updatable_products(&owner)?);
    }

    let products = ledger.fetch_all_products()?;
    Ok(match owner {
        Some(owner) => products.into_iter().filter(|p| p.owner == owner).collect(),
        None => products,
    })
}
