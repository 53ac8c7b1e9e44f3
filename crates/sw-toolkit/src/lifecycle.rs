//! Lifecycle gate consulted by every accessor.
//!
//! The toolkit moves through Closed -> Open -> Started and back. Accessors
//! state the [`Gate`] they need; a failed gate returns before any other
//! check runs, and never mutates anything.

use sw_core::{ApiError, ApiResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Closed,
    /// Object model built and queryable.
    Open,
    /// A run is advancing in time.
    Started,
}

/// Lifecycle requirement of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// Object model built; a run may or may not be in progress.
    Open,
    /// A run is in progress.
    Started,
    /// Object model built and no run in progress.
    NotStarted,
}

#[derive(Debug, Clone, Default)]
pub struct Lifecycle {
    phase: Phase,
}

impl Lifecycle {
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_open(&self) -> bool {
        self.phase != Phase::Closed
    }

    pub fn is_started(&self) -> bool {
        self.phase == Phase::Started
    }

    /// Check a gate. Not-open always wins over the run-state errors.
    pub fn require(&self, gate: Gate) -> ApiResult<()> {
        if !self.is_open() {
            return Err(ApiError::NotOpen);
        }
        match gate {
            Gate::Open => Ok(()),
            Gate::Started if !self.is_started() => Err(ApiError::NotRunning),
            Gate::NotStarted if self.is_started() => Err(ApiError::AlreadyRunning),
            Gate::Started | Gate::NotStarted => Ok(()),
        }
    }

    pub(crate) fn set(&mut self, next: Phase) {
        if self.phase != next {
            tracing::info!(from = ?self.phase, to = ?next, "lifecycle transition");
            self.phase = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_reports_not_open_for_every_gate() {
        let lc = Lifecycle::default();
        for gate in [Gate::Open, Gate::Started, Gate::NotStarted] {
            assert_eq!(lc.require(gate), Err(ApiError::NotOpen));
        }
    }

    #[test]
    fn open_phase_gates() {
        let mut lc = Lifecycle::default();
        lc.set(Phase::Open);
        assert!(lc.require(Gate::Open).is_ok());
        assert!(lc.require(Gate::NotStarted).is_ok());
        assert_eq!(lc.require(Gate::Started), Err(ApiError::NotRunning));
    }

    #[test]
    fn started_phase_gates() {
        let mut lc = Lifecycle::default();
        lc.set(Phase::Started);
        assert!(lc.is_open());
        assert!(lc.require(Gate::Started).is_ok());
        assert_eq!(lc.require(Gate::NotStarted), Err(ApiError::AlreadyRunning));
    }
}
