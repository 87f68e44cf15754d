//! Materials command implementation.

use crate::cli::MaterialsArgs;
use crate::error::Result;
use crate::output::Formatter;
use crate::validation;
use carbontrace_domain::traits::EntitySnapshotSource;
use carbontrace_domain::RawMaterial;
use carbontrace_store::SqliteLedger;

/// Execute the materials command.
pub fn execute_materials(args: MaterialsArgs, ledger: &SqliteLedger, formatter: &Formatter) -> Result<()> {
    let materials = list_materials(&args, ledger)?;
    println!("{}", formatter.format_raw_materials(&materials)?);
    Ok(())
}

/// Raw materials selected by `args`.
pub fn list_materials(args: &MaterialsArgs, ledger: &SqliteLedger) -> Result<Vec<RawMaterial>> {
    match &args.usable_by {
        Some(raw) => {
            let transformer = validation::address(raw)?;
            Ok(ledger.usable_raw_materials(&transformer)?)
        }
        None => Ok(ledger.fetch_all_raw_materials()?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{self, MILL, TAILOR};

    #[test]
    fn test_all_materials() {
        let args = MaterialsArgs { usable_by: None };
        assert_eq!(list_materials(&args, &testing::ledger()).unwrap().len(), 2);
    }

    #[test]
    fn test_usable_by_transformer() {
        let args = MaterialsArgs { usable_by: Some(TAILOR.to_string()) };
        let usable = list_materials(&args, &testing::ledger()).unwrap();
        assert_eq!(usable.len(), 1);
        assert_eq!(usable[0].name, "Wool");

        let args = MaterialsArgs { usable_by: Some(MILL.to_string()) };
        assert!(list_materials(&args, &testing::ledger()).unwrap().is_empty());
    }

    #[test]
    fn test_bad_address() {
        let args = MaterialsArgs { usable_by: Some("0x12".to_string()) };
        assert!(list_materials(&args, &testing::ledger()).is_err());
    }
}
