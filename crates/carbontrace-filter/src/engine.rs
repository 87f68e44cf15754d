//! Source-backed filter engine
//!
//! Fetches candidate records from injected sources and hands them to the
//! pure [`evaluate`] / [`compose`] functions.

use crate::{compose, evaluate, Candidates, Chain, Criterion, EngineError, Mode, ResultSet, Source};
use carbontrace_domain::traits::{EntitySnapshotSource, EventHistorySource};
use carbontrace_domain::{EventRecord, Product};
use std::fmt::Display;
use tracing::debug;

/// Candidate records owned after a fetch
#[derive(Debug, Clone)]
pub enum CandidateRecords {
    /// Products from the entity snapshot
    Entities(Vec<Product>),
    /// Events from the event history
    Events(Vec<EventRecord>),
}

impl CandidateRecords {
    /// Borrow as [`Candidates`]
    pub fn as_candidates(&self) -> Candidates<'_> {
        match self {
            CandidateRecords::Entities(products) => Candidates::Entities(products),
            CandidateRecords::Events(events) => Candidates::Events(events),
        }
    }
}

/// Filter engine over an entity snapshot and an event history
///
/// Holds no state of its own besides the two sources; every call is one
/// independent step.
pub struct FilterEngine<'s, E, H> {
    entities: &'s E,
    events: &'s H,
}

impl<'s, E, H> FilterEngine<'s, E, H>
where
    E: EntitySnapshotSource,
    E::Error: Display,
    H: EventHistorySource,
    H::Error: Display,
{
    /// Create an engine reading from the given sources
    pub fn new(entities: &'s E, events: &'s H) -> Self {
        Self { entities, events }
    }

    /// Fetch the candidates `criterion` needs
    ///
    /// Event criteria only fetch the event kinds their field exists on.
    pub fn fetch_candidates(&self, criterion: &Criterion) -> Result<CandidateRecords, EngineError> {
        match criterion.source() {
            Source::EntitySnapshot => {
                let products = self
                    .entities
                    .fetch_all_products()
                    .map_err(|e| EngineError::Source(e.to_string()))?;
                Ok(CandidateRecords::Entities(products))
            }
            Source::EventHistory => {
                let mut events = Vec::new();
                for &kind in criterion.field().event_kinds() {
                    let batch = self
                        .events
                        .fetch_event_history(kind)
                        .map_err(|e| EngineError::Source(e.to_string()))?;
                    debug!(kind = kind.as_str(), count = batch.len(), "Fetched events");
                    events.extend(batch);
                }
                Ok(CandidateRecords::Events(events))
            }
        }
    }

    /// Products matching `criterion`
    pub fn evaluate(&self, criterion: &Criterion) -> Result<ResultSet, EngineError> {
        let records = self.fetch_candidates(criterion)?;
        Ok(evaluate(criterion, records.as_candidates())?)
    }

    /// Combine `criterion` with `accumulated`
    pub fn compose(
        &self,
        accumulated: &ResultSet,
        criterion: &Criterion,
        mode: Mode,
    ) -> Result<ResultSet, EngineError> {
        let records = self.fetch_candidates(criterion)?;
        Ok(compose(accumulated, criterion, records.as_candidates(), mode)?)
    }

    /// Apply one step to a caller-owned chain
    ///
    /// On error the chain is left as it was.
    pub fn apply<'c>(
        &self,
        chain: &'c mut Chain,
        mode: Mode,
        criterion: Criterion,
    ) -> Result<&'c ResultSet, EngineError> {
        let records = self.fetch_candidates(&criterion)?;
        Ok(chain.apply(mode, criterion, records.as_candidates())?)
    }
}
