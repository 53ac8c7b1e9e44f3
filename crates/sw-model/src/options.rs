//! Project-wide analysis options and simulation settings.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sw_core::UnitConverter;

/// Which processes the run includes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisOptions {
    pub allow_ponding: bool,
    pub skip_steady_state: bool,
    pub ignore_rainfall: bool,
    pub ignore_rdii: bool,
    pub ignore_snowmelt: bool,
    pub ignore_groundwater: bool,
    pub ignore_routing: bool,
    pub ignore_quality: bool,
}

/// Numerical settings and continuity results of the run.
///
/// `min_surf_area` (ft²) and `head_tol` (ft) are held in internal units;
/// everything else is a time in seconds, a day count, or dimensionless.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimSettings {
    pub route_step: f64,
    pub min_route_step: f64,
    pub lengthening_step: f64,
    pub start_dry_days: f64,
    pub courant_factor: f64,
    pub min_surf_area: f64,
    pub min_slope: f64,
    pub runoff_error: f64,
    pub gw_error: f64,
    pub flow_error: f64,
    pub qual_error: f64,
    pub head_tol: f64,
    pub sys_flow_tol: f64,
    pub lat_flow_tol: f64,
}

impl Default for SimSettings {
    fn default() -> Self {
        Self {
            route_step: 20.0,
            min_route_step: 0.5,
            lengthening_step: 0.0,
            start_dry_days: 0.0,
            courant_factor: 0.75,
            min_surf_area: 12.566,
            min_slope: 0.0,
            runoff_error: 0.0,
            gw_error: 0.0,
            flow_error: 0.0,
            qual_error: 0.0,
            head_tol: 0.005,
            sys_flow_tol: 0.05,
            lat_flow_tol: 0.05,
        }
    }
}

/// Default simulation start (midnight, 1 January 2004).
pub fn default_start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2004, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimOptions {
    pub units: UnitConverter,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub report_start: NaiveDateTime,
    /// Whole seconds between start and end, in milliseconds.
    pub total_duration_ms: f64,
    pub analysis: AnalysisOptions,
    pub settings: SimSettings,
    /// Log control actions taken through the toolkit.
    pub report_controls: bool,
}

impl Default for SimOptions {
    fn default() -> Self {
        let start = default_start();
        Self {
            units: UnitConverter::default(),
            start,
            end: start,
            report_start: start,
            total_duration_ms: 0.0,
            analysis: AnalysisOptions::default(),
            settings: SimSettings::default(),
            report_controls: false,
        }
    }
}

impl SimOptions {
    /// Recompute the total duration after a start or end change.
    pub fn recompute_duration(&mut self) {
        let secs = (self.end - self.start).num_milliseconds() as f64 / 1000.0;
        self.total_duration_ms = secs.floor() * 1000.0;
    }
}
