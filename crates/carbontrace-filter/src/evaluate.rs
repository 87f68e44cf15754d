//! Criterion evaluation and AND/OR composition

use crate::{ConfigurationError, Criterion, ResultSet, Result, Source};
use carbontrace_domain::{EventRecord, Product};
use std::fmt;
use tracing::debug;

/// Already materialized candidate records from one source
#[derive(Debug, Clone, Copy)]
pub enum Candidates<'a> {
    /// Products from the entity snapshot
    Entities(&'a [Product]),
    /// Events from the event history
    Events(&'a [EventRecord]),
}

impl Candidates<'_> {
    /// Source these candidates were taken from
    pub fn source(&self) -> Source {
        match self {
            Candidates::Entities(_) => Source::EntitySnapshot,
            Candidates::Events(_) => Source::EventHistory,
        }
    }

    /// Number of candidate records
    pub fn len(&self) -> usize {
        match self {
            Candidates::Entities(records) => records.len(),
            Candidates::Events(records) => records.len(),
        }
    }

    /// Whether there are no candidates
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// How a fresh evaluation combines with the accumulated set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Keep only products matched by both
    And,
    /// Keep products matched by either
    Or,
}

impl Mode {
    /// Get the mode name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::And => "AND",
            Mode::Or => "OR",
        }
    }

    /// Parse a mode (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "and" | "&&" => Some(Mode::And),
            "or" | "||" => Some(Mode::Or),
            _ => None,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid filter logic: {} (expected AND or OR)", s))
    }
}

/// Products whose records satisfy `criterion`
///
/// Entity candidates contribute their own id; event candidates contribute the
/// id of the product they reference, so any number of qualifying events for
/// one product yield that product once. An empty candidate sequence yields an
/// empty set.
///
/// # Errors
///
/// [`ConfigurationError::SourceMismatch`] when the candidates do not come
/// from the source the criterion reads. Nothing is scanned in that case.
pub fn evaluate(criterion: &Criterion, candidates: Candidates<'_>) -> Result<ResultSet> {
    if candidates.source() != criterion.source() {
        return Err(ConfigurationError::SourceMismatch {
            expected: criterion.source(),
            actual: candidates.source(),
        });
    }

    let matches: ResultSet = match candidates {
        Candidates::Entities(products) => products
            .iter()
            .filter(|p| criterion.matches_product(p))
            .map(|p| p.product_id)
            .collect(),
        Candidates::Events(events) => events
            .iter()
            .filter(|e| criterion.matches_event(e))
            .map(EventRecord::product_id)
            .collect(),
    };

    debug!(
        criterion = %criterion,
        candidates = candidates.len(),
        matched = matches.len(),
        "Evaluated criterion"
    );

    Ok(matches)
}

/// Combine a fresh evaluation of `criterion` with `accumulated`
///
/// `Mode::Or` on an empty `accumulated` starts a session. `accumulated` is
/// never modified; on error the caller still holds the previous set.
pub fn compose(
    accumulated: &ResultSet,
    criterion: &Criterion,
    candidates: Candidates<'_>,
    mode: Mode,
) -> Result<ResultSet> {
    let fresh = evaluate(criterion, candidates)?;

    let combined = match mode {
        Mode::Or => accumulated.union(&fresh),
        Mode::And => accumulated.intersection(&fresh),
    };

    debug!(
        mode = %mode,
        before = accumulated.len(),
        after = combined.len(),
        "Composed step"
    );

    Ok(combined)
}
