//! Input checks applied to user-typed values before they reach the ledger or
//! the filter engine.

use crate::error::{CliError, Result};
use carbontrace_domain::Address;
use carbontrace_filter::Field;
use regex::Regex;
use std::sync::OnceLock;

const NAME_PATTERN: &str = r"^[a-zA-Z0-9 ]{2,50}$";

static NAME_REGEX: OnceLock<Regex> = OnceLock::new();

fn name_regex() -> Result<&'static Regex> {
    if let Some(regex) = NAME_REGEX.get() {
        return Ok(regex);
    }
    let regex = Regex::new(NAME_PATTERN).map_err(|e| CliError::Config(format!("Regex error: {}", e)))?;
    Ok(NAME_REGEX.get_or_init(|| regex))
}

/// Product id: an integer greater than 0.
pub fn product_id(raw: &str) -> Result<u64> {
    match raw.trim().parse::<u64>() {
        Ok(id) if id >= 1 => Ok(id),
        _ => Err(CliError::InvalidInput(
            "ID must be an integer greater than 0".to_string(),
        )),
    }
}

/// Carbon footprint: a positive integer.
pub fn carbon_footprint(raw: &str) -> Result<u64> {
    match raw.trim().parse::<u64>() {
        Ok(cf) if cf > 0 => Ok(cf),
        _ => Err(CliError::InvalidInput(
            "Carbon footprint must be a positive integer".to_string(),
        )),
    }
}

/// Lot: a positive integer or 0.
pub fn lot(raw: &str) -> Result<u64> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| CliError::InvalidInput("Lot must be positive integer or 0".to_string()))
}

/// Product or raw material name: 2 to 50 letters, digits or spaces.
pub fn name(raw: &str) -> Result<String> {
    let pattern = name_regex()?;

    let trimmed = raw.trim_matches(' ');
    if pattern.is_match(trimmed) {
        Ok(trimmed.to_string())
    } else {
        Err(CliError::InvalidInput(
            "Names may only contain letters, numbers and spaces (2 to 50 characters)".to_string(),
        ))
    }
}

/// Ledger address: `0x` followed by 40 hex digits.
pub fn address(raw: &str) -> Result<Address> {
    Address::parse(raw).map_err(|e| CliError::InvalidInput(format!("Invalid address format: {}", e)))
}

/// Check a raw criterion value against the rule for `field`.
///
/// Returns the value normalized the way the check reads it.
pub fn criterion_value(field: Field, raw: &str) -> Result<String> {
    match field {
        Field::ProductId => product_id(raw).map(|v| v.to_string()),
        Field::CarbonFootprint | Field::EventCarbonFootprint => {
            carbon_footprint(raw).map(|v| v.to_string())
        }
        Field::Lot => lot(raw).map(|v| v.to_string()),
        Field::Name | Field::RawMaterialName => name(raw),
        Field::OwnerAddress | Field::SupplierAddress | Field::TransformerAddress => {
            address(raw).map(|a| a.to_string())
        }
        Field::IsEnded => Ok(raw.trim().to_string()),
    }
}
