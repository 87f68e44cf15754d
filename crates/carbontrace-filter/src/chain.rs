//! Caller-owned state of a filtering session

use crate::{compose, Candidates, Criterion, Mode, Result, ResultSet};

/// One applied step of a chain
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    /// How the step was combined; `None` for the step that started the chain
    pub mode: Option<Mode>,

    /// Criterion evaluated by the step
    pub criterion: Criterion,

    /// Size of the accumulated set after the step
    pub result_len: usize,
}

/// Accumulated results of a filtering session
///
/// The engine itself is stateless; an interactive loop keeps a `Chain` as its
/// loop state and feeds one criterion per iteration. A step that fails leaves
/// both the accumulated set and the step history untouched.
#[derive(Debug, Clone, Default)]
pub struct Chain {
    accumulated: ResultSet,
    steps: Vec<Step>,
}

impl Chain {
    /// Create an empty chain
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one criterion
    ///
    /// The first step of a chain is evaluated on its own whatever `mode`
    /// says; later steps combine with the accumulated set using `mode`.
    pub fn apply(
        &mut self,
        mode: Mode,
        criterion: Criterion,
        candidates: Candidates<'_>,
    ) -> Result<&ResultSet> {
        let mode = if self.steps.is_empty() { None } else { Some(mode) };
        let next = compose(
            &self.accumulated,
            &criterion,
            candidates,
            mode.unwrap_or(Mode::Or),
        )?;

        self.steps.push(Step {
            mode,
            criterion,
            result_len: next.len(),
        });
        self.accumulated = next;

        Ok(&self.accumulated)
    }

    /// Products matched so far
    pub fn results(&self) -> &ResultSet {
        &self.accumulated
    }

    /// Steps applied so far, oldest first
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Whether at least one step has been applied
    pub fn is_started(&self) -> bool {
        !self.steps.is_empty()
    }

    /// Discard all steps and results
    pub fn reset(&mut self) {
        self.accumulated = ResultSet::new();
        self.steps.clear();
    }
}
