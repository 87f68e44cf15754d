//! Account addresses

use std::fmt;

/// Number of hex digits in an address (20 bytes)
const HEX_DIGITS: usize = 40;

/// Account address of a supplier, transformer or product owner
///
/// Stored in canonical form: `0x` followed by 40 lower-case hex digits.
/// Parsing is case-insensitive, so mixed-case (checksummed) spellings of the
/// same account compare equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address(String);

impl Address {
    /// Parse an address from user or ledger input
    ///
    /// Surrounding whitespace is ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use carbontrace_domain::Address;
    ///
    /// let a = Address::parse("0x52908400098527886E0F7030069857D2E4169EE7").unwrap();
    /// let b = Address::parse("0x52908400098527886e0f7030069857d2e4169ee7").unwrap();
    /// assert_eq!(a, b);
    /// ```
    pub fn parse(input: &str) -> Result<Self, String> {
        let trimmed = input.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .ok_or_else(|| format!("Invalid address '{}': missing 0x prefix", trimmed))?;

        if digits.len() != HEX_DIGITS {
            return Err(format!(
                "Invalid address '{}': expected {} hex digits, got {}",
                trimmed,
                HEX_DIGITS,
                digits.len()
            ));
        }

        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!("Invalid address '{}': non-hex character", trimmed));
        }

        Ok(Self(format!("0x{}", digits.to_ascii_lowercase())))
    }

    /// Get the canonical string form
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Address {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
