//! Import command implementation.

use crate::cli::ImportArgs;
use crate::error::Result;
use crate::output::Formatter;
use carbontrace_store::{ImportSummary, LedgerSnapshot, SqliteLedger};
use std::fs;
use std::path::Path;

/// Execute the import command.
pub fn execute_import(args: ImportArgs, ledger: &mut SqliteLedger, formatter: &Formatter) -> Result<()> {
    let summary = import_file(&args.file, ledger)?;
    println!(
        "{}",
        formatter.success(&format!(
            "Imported {} product(s), {} raw material(s), {} event(s)",
            summary.products, summary.raw_materials, summary.events
        ))
    );
    Ok(())
}

/// Read a JSON ledger export and load it.
pub fn import_file(path: &Path, ledger: &mut SqliteLedger) -> Result<ImportSummary> {
    let contents = fs::read_to_string(path)?;
    let snapshot = LedgerSnapshot::from_json(&contents)?;
    Ok(ledger.import_snapshot(&snapshot)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing;
    use crate::error::CliError;
    use carbontrace_domain::traits::EntitySnapshotSource;
    use tempfile::TempDir;

    #[test]
    fn test_import_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("export.json");
        fs::write(&path, testing::snapshot_json()).unwrap();

        let mut ledger = SqliteLedger::new(":memory:").unwrap();
        let summary = import_file(&path, &mut ledger).unwrap();
        assert_eq!(summary.products, 3);
        assert_eq!(summary.events, 3);
        assert_eq!(ledger.fetch_all_products().unwrap().len(), 3);
    }

    #[test]
    fn test_missing_file() {
        let mut ledger = SqliteLedger::new(":memory:").unwrap();
        let err = import_file(Path::new("/nonexistent/export.json"), &mut ledger).unwrap_err();
        assert!(matches!(err, CliError::Io(_)));
    }

    #[test]
    fn test_importing_twice_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("export.json");
        fs::write(&path, testing::snapshot_json()).unwrap();

        let mut ledger = SqliteLedger::new(":memory:").unwrap();
        import_file(&path, &mut ledger).unwrap();
        let err = import_file(&path, &mut ledger).unwrap_err();
        assert!(matches!(err, CliError::Store(_)));
    }
}
