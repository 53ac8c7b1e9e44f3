//! Simulation options: date-times, unit codes, analysis switches and
//! numerical settings.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::Serialize;
use sw_core::{ApiError, ApiResult};

use crate::lifecycle::Gate;
use crate::params::{AnalysisOption, DateKind, SimParam, UnitKind};
use crate::simulation::Simulation;
use crate::stats::StatsSource;

/// Civil date-time format used across the boundary.
pub const DATETIME_FORMAT: &str = "%m/%d/%Y %H:%M:%S";

/// A date-time decomposed into its civil fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateParts {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

impl From<NaiveDateTime> for DateParts {
    fn from(dt: NaiveDateTime) -> Self {
        Self {
            year: dt.year(),
            month: dt.month(),
            day: dt.day(),
            hour: dt.hour(),
            minute: dt.minute(),
            second: dt.second(),
        }
    }
}

/// Parse `"MM/DD/YYYY HH:MM:SS"`; seconds, or the whole time, may be omitted.
pub fn parse_datetime(input: &str) -> ApiResult<NaiveDateTime> {
    let s = input.trim();
    NaiveDateTime::parse_from_str(s, DATETIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%m/%d/%Y %H:%M"))
        .or_else(|_| {
            NaiveDate::parse_from_str(s, "%m/%d/%Y").map(|d| d.and_time(NaiveTime::default()))
        })
        .map_err(|_| ApiError::InvalidDateTime {
            input: input.to_string(),
        })
}

pub fn format_datetime(dt: NaiveDateTime) -> String {
    dt.format(DATETIME_FORMAT).to_string()
}

/// `start` moved forward by a routing clock reading, rounded to whole
/// milliseconds. `None` once the result leaves chrono's calendar range.
pub(crate) fn offset_datetime(start: NaiveDateTime, elapsed_ms: f64) -> Option<NaiveDateTime> {
    Duration::try_milliseconds(elapsed_ms.round() as i64)
        .and_then(|elapsed| start.checked_add_signed(elapsed))
}

impl<S: StatsSource> Simulation<S> {
    pub fn simulation_datetime(&self, kind: DateKind) -> ApiResult<DateParts> {
        let opts = &self.model_ref(Gate::Open)?.options;
        let dt = match kind {
            DateKind::Start => opts.start,
            DateKind::End => opts.end,
            DateKind::ReportStart => opts.report_start,
        };
        Ok(dt.into())
    }

    /// Changing the start or end recomputes the total duration.
    pub fn set_simulation_datetime(&mut self, kind: DateKind, value: &str) -> ApiResult<()> {
        let opts = &mut self.model_mut(Gate::NotStarted)?.options;
        let dt = parse_datetime(value)?;
        match kind {
            DateKind::Start => {
                opts.start = dt;
                opts.recompute_duration();
            }
            DateKind::End => {
                opts.end = dt;
                opts.recompute_duration();
            }
            DateKind::ReportStart => opts.report_start = dt,
        }
        Ok(())
    }

    /// Start date-time plus the routing time elapsed so far.
    pub fn current_datetime(&self) -> ApiResult<String> {
        let start = self.model_ref(Gate::Started)?.options.start;
        offset_datetime(start, self.clock().elapsed_ms)
            .map(format_datetime)
            .ok_or(ApiError::ParamOutOfRange {
                what: "elapsed routing time",
                code: -1,
            })
    }

    /// Unit system or flow units as their integer codes.
    pub fn simulation_unit(&self, kind: UnitKind) -> ApiResult<i32> {
        let units = self.model_ref(Gate::Open)?.options.units;
        Ok(match kind {
            UnitKind::System => units.system().code(),
            UnitKind::Flow => units.flow_units().code(),
        })
    }

    pub fn analysis_setting(&self, option: AnalysisOption) -> ApiResult<bool> {
        let a = &self.model_ref(Gate::Open)?.options.analysis;
        Ok(match option {
            AnalysisOption::AllowPonding => a.allow_ponding,
            AnalysisOption::SkipSteadyState => a.skip_steady_state,
            AnalysisOption::IgnoreRainfall => a.ignore_rainfall,
            AnalysisOption::IgnoreRdii => a.ignore_rdii,
            AnalysisOption::IgnoreSnowmelt => a.ignore_snowmelt,
            AnalysisOption::IgnoreGroundwater => a.ignore_groundwater,
            AnalysisOption::IgnoreRouting => a.ignore_routing,
            AnalysisOption::IgnoreQuality => a.ignore_quality,
        })
    }

    pub fn simulation_param(&self, param: SimParam) -> ApiResult<f64> {
        let opts = &self.model_ref(Gate::Open)?.options;
        let s = &opts.settings;
        let raw = match param {
            SimParam::RouteStep => s.route_step,
            SimParam::MinRouteStep => s.min_route_step,
            SimParam::LengtheningStep => s.lengthening_step,
            SimParam::StartDryDays => s.start_dry_days,
            SimParam::CourantFactor => s.courant_factor,
            SimParam::MinSurfArea => s.min_surf_area,
            SimParam::MinSlope => s.min_slope,
            SimParam::RunoffError => s.runoff_error,
            SimParam::GroundwaterError => s.gw_error,
            SimParam::FlowError => s.flow_error,
            SimParam::QualityError => s.qual_error,
            SimParam::HeadTolerance => s.head_tol,
            SimParam::SysFlowTolerance => s.sys_flow_tol,
            SimParam::LatFlowTolerance => s.lat_flow_tol,
        };
        Ok(opts.units.to_display(param.quantity(), raw))
    }
}
