//! The simulation context every toolkit operation is called on.

use sw_core::{ApiError, ApiResult, ObjectType};
use sw_model::{Model, ObjectTables};

use crate::lifecycle::{Gate, Lifecycle, Phase};
use crate::stats::{StatsLedger, StatsSource};

/// Progress of the current run.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RunClock {
    /// Completed routing steps.
    pub step_count: u64,
    /// Routing time elapsed since the start date-time (ms).
    pub elapsed_ms: f64,
}

/// Object model, opening registry and run state of one project.
///
/// The tables exist only while the lifecycle is Open or Started. Accessors
/// validate against this context's own table sizes.
#[derive(Debug)]
pub struct Simulation<S: StatsSource = StatsLedger> {
    lifecycle: Lifecycle,
    model: Option<Model>,
    stats: S,
    clock: RunClock,
}

impl Default for Simulation<StatsLedger> {
    fn default() -> Self {
        Self::new()
    }
}

impl Simulation<StatsLedger> {
    pub fn new() -> Self {
        Self::with_stats(StatsLedger::default())
    }
}

impl<S: StatsSource> Simulation<S> {
    /// A closed context reading statistics from `stats`.
    pub fn with_stats(stats: S) -> Self {
        Self {
            lifecycle: Lifecycle::default(),
            model: None,
            stats,
            clock: RunClock::default(),
        }
    }

    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    pub fn phase(&self) -> Phase {
        self.lifecycle.phase()
    }

    pub fn is_open(&self) -> bool {
        self.lifecycle.is_open()
    }

    pub fn is_started(&self) -> bool {
        self.lifecycle.is_started()
    }

    pub fn clock(&self) -> RunClock {
        self.clock
    }

    pub fn stats(&self) -> &S {
        &self.stats
    }

    /// Engine-side access to the accumulators.
    pub fn stats_mut(&mut self) -> &mut S {
        &mut self.stats
    }

    pub fn model(&self) -> Option<&Model> {
        self.model.as_ref()
    }

    /// Closed -> Open with a freshly built model.
    ///
    /// Opening an already open project replaces its model; a running project
    /// must be ended first.
    pub fn open(&mut self, model: Model) -> ApiResult<()> {
        if self.lifecycle.is_started() {
            return Err(ApiError::AlreadyRunning);
        }
        if self.lifecycle.is_open() {
            tracing::info!("replacing the open model");
        }
        tracing::info!(
            nodes = model.tables.nodes.len(),
            links = model.tables.links.len(),
            subcatchments = model.tables.subcatchments.len(),
            "project opened"
        );
        self.model = Some(model);
        self.clock = RunClock::default();
        self.lifecycle.set(Phase::Open);
        Ok(())
    }

    /// Open -> Started. Restarts the run clock and the accumulators.
    pub fn start(&mut self) -> ApiResult<()> {
        self.lifecycle.require(Gate::NotStarted)?;
        let model = self.model.as_ref().ok_or(ApiError::NotOpen)?;
        self.stats.on_start(&model.tables);
        self.clock = RunClock::default();
        self.lifecycle.set(Phase::Started);
        Ok(())
    }

    /// Record one completed routing step of `dt_s` seconds.
    pub fn advance(&mut self, dt_s: f64) -> ApiResult<()> {
        self.lifecycle.require(Gate::Started)?;
        if !dt_s.is_finite() || dt_s < 0.0 {
            return Err(ApiError::ParamOutOfRange {
                what: "routing step",
                code: -1,
            });
        }
        self.clock.step_count += 1;
        self.clock.elapsed_ms += dt_s * 1000.0;
        Ok(())
    }

    /// Started -> Open. The object model stays queryable.
    pub fn end(&mut self) -> ApiResult<()> {
        self.lifecycle.require(Gate::Started)?;
        tracing::info!(
            steps = self.clock.step_count,
            elapsed_ms = self.clock.elapsed_ms,
            "run ended"
        );
        self.lifecycle.set(Phase::Open);
        Ok(())
    }

    /// Any phase -> Closed. Drops every table and the opening registry.
    pub fn close(&mut self) {
        self.model = None;
        self.clock = RunClock::default();
        self.lifecycle.set(Phase::Closed);
    }

    /// Engine-side access to the tables, e.g. to write live results.
    pub fn tables_mut(&mut self) -> ApiResult<&mut ObjectTables> {
        Ok(&mut self.model_mut(Gate::Open)?.tables)
    }

    /// Check the lifecycle gate, then that `index` addresses an object of
    /// `kind`. Returns the index as a table position.
    pub fn locate(&self, gate: Gate, kind: ObjectType, index: i64) -> ApiResult<usize> {
        let len = self.model_ref(gate)?.tables.count(kind);
        usize::try_from(index)
            .ok()
            .filter(|&i| i < len)
            .ok_or(ApiError::index(kind.name(), index, len))
    }

    pub(crate) fn slot(&self, gate: Gate, kind: ObjectType, index: usize) -> ApiResult<usize> {
        self.locate(gate, kind, i64::try_from(index).unwrap_or(i64::MAX))
    }

    pub(crate) fn model_ref(&self, gate: Gate) -> ApiResult<&Model> {
        self.lifecycle.require(gate)?;
        self.model.as_ref().ok_or(ApiError::NotOpen)
    }

    pub(crate) fn model_mut(&mut self, gate: Gate) -> ApiResult<&mut Model> {
        self.lifecycle.require(gate)?;
        self.model.as_mut().ok_or(ApiError::NotOpen)
    }
}
