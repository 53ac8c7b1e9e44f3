//! Integer-coded boundary.
//!
//! Scripted callers address everything by integer: object type codes,
//! parameter codes and signed object indices. These functions decode the
//! integers, run the checks in boundary order (lifecycle, run state, object
//! index, parameter code) and forward to the typed methods on
//! [`Simulation`]. Use [`status`] to turn any result into the stable integer
//! status code.

use sw_core::{ApiResult, ObjectType, error_message};
use sw_model::{OpeningSpec, Precip, Upsert};

use crate::lifecycle::Gate;
use crate::options::DateParts;
use crate::params::{
    AnalysisOption, DateKind, LinkParam, LinkResult, NodeParam, NodeResult, OpeningParam,
    SimParam, SubcatchParam, SubcatchResult, UnitKind,
};
use crate::simulation::Simulation;
use crate::stats::{
    LinkStats, NodeStats, OutfallStats, PumpStats, RoutingTotals, RunoffTotals, StatsSource,
    StorageStats, SubcatchStats,
};

/// Status code of a result: 0 on success, the error's code otherwise.
pub fn status<T>(result: &ApiResult<T>) -> i32 {
    match result {
        Ok(_) => sw_core::error::STATUS_OK,
        Err(e) => e.code(),
    }
}

/// Message for a status code returned by any boundary call.
pub fn get_api_error(code: i32) -> &'static str {
    error_message(code)
}

fn at<S: StatsSource>(
    sim: &Simulation<S>,
    gate: Gate,
    kind: ObjectType,
    index: i32,
) -> ApiResult<usize> {
    sim.locate(gate, kind, i64::from(index))
}

// ---------------------------------------------------------------------------
// Objects
// ---------------------------------------------------------------------------

pub fn count_objects<S: StatsSource>(sim: &Simulation<S>, type_code: i32) -> ApiResult<usize> {
    sim.lifecycle().require(Gate::Open)?;
    sim.count_objects(ObjectType::try_from(type_code)?)
}

pub fn get_object_id<S: StatsSource>(
    sim: &Simulation<S>,
    type_code: i32,
    index: i32,
) -> ApiResult<String> {
    sim.lifecycle().require(Gate::Open)?;
    let kind = ObjectType::try_from(type_code)?;
    let i = at(sim, Gate::Open, kind, index)?;
    sim.object_id(kind, i)
}

/// Index of the object with string ID `id`, or -1 when there is none.
pub fn find_object<S: StatsSource>(
    sim: &Simulation<S>,
    type_code: i32,
    id: &str,
) -> ApiResult<i32> {
    sim.lifecycle().require(Gate::Open)?;
    let kind = ObjectType::try_from(type_code)?;
    Ok(sim
        .find_object(kind, id)?
        .and_then(|i| i32::try_from(i).ok())
        .unwrap_or(-1))
}

pub fn get_node_type<S: StatsSource>(sim: &Simulation<S>, index: i32) -> ApiResult<i32> {
    let i = at(sim, Gate::Open, ObjectType::Node, index)?;
    Ok(sim.node_type(i)?.code())
}

pub fn get_link_type<S: StatsSource>(sim: &Simulation<S>, index: i32) -> ApiResult<i32> {
    let i = at(sim, Gate::Open, ObjectType::Link, index)?;
    Ok(sim.link_type(i)?.code())
}

pub fn get_link_connections<S: StatsSource>(
    sim: &Simulation<S>,
    index: i32,
) -> ApiResult<(usize, usize)> {
    let i = at(sim, Gate::Open, ObjectType::Link, index)?;
    sim.link_connections(i)
}

pub fn get_link_direction<S: StatsSource>(sim: &Simulation<S>, index: i32) -> ApiResult<i32> {
    let i = at(sim, Gate::Open, ObjectType::Link, index)?;
    Ok(i32::from(sim.link_direction(i)?))
}

/// Outlet of a subcatchment as `(object type code, index)`.
pub fn get_subcatch_outlet<S: StatsSource>(
    sim: &Simulation<S>,
    index: i32,
) -> ApiResult<(i32, usize)> {
    let i = at(sim, Gate::Open, ObjectType::Subcatchment, index)?;
    let outlet = sim.subcatch_outlet(i)?;
    Ok((outlet.kind.code(), outlet.index))
}

// ---------------------------------------------------------------------------
// Input parameters
// ---------------------------------------------------------------------------

pub fn get_node_param<S: StatsSource>(
    sim: &Simulation<S>,
    index: i32,
    code: i32,
) -> ApiResult<f64> {
    let i = at(sim, Gate::Open, ObjectType::Node, index)?;
    sim.node_param(i, NodeParam::try_from(code)?)
}

pub fn set_node_param<S: StatsSource>(
    sim: &mut Simulation<S>,
    index: i32,
    code: i32,
    value: f64,
) -> ApiResult<()> {
    let i = at(sim, Gate::Open, ObjectType::Node, index)?;
    sim.set_node_param(i, NodeParam::try_from(code)?, value)
}

pub fn get_link_param<S: StatsSource>(
    sim: &Simulation<S>,
    index: i32,
    code: i32,
) -> ApiResult<f64> {
    let i = at(sim, Gate::Open, ObjectType::Link, index)?;
    sim.link_param(i, LinkParam::try_from(code)?)
}

pub fn set_link_param<S: StatsSource>(
    sim: &mut Simulation<S>,
    index: i32,
    code: i32,
    value: f64,
) -> ApiResult<()> {
    let i = at(sim, Gate::Open, ObjectType::Link, index)?;
    sim.set_link_param(i, LinkParam::try_from(code)?, value)
}

pub fn get_subcatch_param<S: StatsSource>(
    sim: &Simulation<S>,
    index: i32,
    code: i32,
) -> ApiResult<f64> {
    let i = at(sim, Gate::Open, ObjectType::Subcatchment, index)?;
    sim.subcatch_param(i, SubcatchParam::try_from(code)?)
}

pub fn set_subcatch_param<S: StatsSource>(
    sim: &mut Simulation<S>,
    index: i32,
    code: i32,
    value: f64,
) -> ApiResult<()> {
    let i = at(sim, Gate::NotStarted, ObjectType::Subcatchment, index)?;
    sim.set_subcatch_param(i, SubcatchParam::try_from(code)?, value)
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

pub fn get_sim_datetime<S: StatsSource>(sim: &Simulation<S>, code: i32) -> ApiResult<DateParts> {
    sim.lifecycle().require(Gate::Open)?;
    sim.simulation_datetime(DateKind::try_from(code)?)
}

pub fn set_sim_datetime<S: StatsSource>(
    sim: &mut Simulation<S>,
    code: i32,
    value: &str,
) -> ApiResult<()> {
    sim.lifecycle().require(Gate::NotStarted)?;
    sim.set_simulation_datetime(DateKind::try_from(code)?, value)
}

pub fn get_current_datetime<S: StatsSource>(sim: &Simulation<S>) -> ApiResult<String> {
    sim.current_datetime()
}

pub fn get_sim_unit<S: StatsSource>(sim: &Simulation<S>, code: i32) -> ApiResult<i32> {
    sim.lifecycle().require(Gate::Open)?;
    sim.simulation_unit(UnitKind::try_from(code)?)
}

/// Analysis switch as 0 or 1.
pub fn get_analysis_setting<S: StatsSource>(sim: &Simulation<S>, code: i32) -> ApiResult<i32> {
    sim.lifecycle().require(Gate::Open)?;
    Ok(i32::from(sim.analysis_setting(AnalysisOption::try_from(code)?)?))
}

pub fn get_sim_param<S: StatsSource>(sim: &Simulation<S>, code: i32) -> ApiResult<f64> {
    sim.lifecycle().require(Gate::Open)?;
    sim.simulation_param(SimParam::try_from(code)?)
}

// ---------------------------------------------------------------------------
// Live results and statistics
// ---------------------------------------------------------------------------

pub fn get_node_result<S: StatsSource>(
    sim: &Simulation<S>,
    index: i32,
    code: i32,
) -> ApiResult<f64> {
    let i = at(sim, Gate::Started, ObjectType::Node, index)?;
    sim.node_result(i, NodeResult::try_from(code)?)
}

pub fn get_link_result<S: StatsSource>(
    sim: &Simulation<S>,
    index: i32,
    code: i32,
) -> ApiResult<f64> {
    let i = at(sim, Gate::Started, ObjectType::Link, index)?;
    sim.link_result(i, LinkResult::try_from(code)?)
}

pub fn get_subcatch_result<S: StatsSource>(
    sim: &Simulation<S>,
    index: i32,
    code: i32,
) -> ApiResult<f64> {
    let i = at(sim, Gate::Started, ObjectType::Subcatchment, index)?;
    sim.subcatch_result(i, SubcatchResult::try_from(code)?)
}

pub fn get_node_stats<S: StatsSource>(sim: &Simulation<S>, index: i32) -> ApiResult<NodeStats> {
    let i = at(sim, Gate::Started, ObjectType::Node, index)?;
    sim.node_stats(i)
}

pub fn get_node_total_inflow<S: StatsSource>(sim: &Simulation<S>, index: i32) -> ApiResult<f64> {
    let i = at(sim, Gate::Started, ObjectType::Node, index)?;
    sim.node_total_inflow(i)
}

pub fn get_storage_stats<S: StatsSource>(
    sim: &Simulation<S>,
    index: i32,
) -> ApiResult<StorageStats> {
    let i = at(sim, Gate::Started, ObjectType::Node, index)?;
    sim.storage_stats(i)
}

pub fn get_outfall_stats<S: StatsSource>(
    sim: &Simulation<S>,
    index: i32,
) -> ApiResult<OutfallStats> {
    let i = at(sim, Gate::Started, ObjectType::Node, index)?;
    sim.outfall_stats(i)
}

pub fn get_link_stats<S: StatsSource>(sim: &Simulation<S>, index: i32) -> ApiResult<LinkStats> {
    let i = at(sim, Gate::Started, ObjectType::Link, index)?;
    sim.link_stats(i)
}

pub fn get_pump_stats<S: StatsSource>(sim: &Simulation<S>, index: i32) -> ApiResult<PumpStats> {
    let i = at(sim, Gate::Started, ObjectType::Link, index)?;
    sim.pump_stats(i)
}

pub fn get_subcatch_stats<S: StatsSource>(
    sim: &Simulation<S>,
    index: i32,
) -> ApiResult<SubcatchStats> {
    let i = at(sim, Gate::Started, ObjectType::Subcatchment, index)?;
    sim.subcatch_stats(i)
}

pub fn get_routing_totals<S: StatsSource>(sim: &Simulation<S>) -> ApiResult<RoutingTotals> {
    sim.routing_totals()
}

pub fn get_runoff_totals<S: StatsSource>(sim: &Simulation<S>) -> ApiResult<RunoffTotals> {
    sim.runoff_totals()
}

// ---------------------------------------------------------------------------
// Coupling openings
// ---------------------------------------------------------------------------

/// Create or update an opening; area and length are in display units.
///
/// Returns 0 when the opening was created and 1 when it replaced one.
#[allow(clippy::too_many_arguments)]
pub fn set_node_opening<S: StatsSource>(
    sim: &mut Simulation<S>,
    node: i32,
    id: i32,
    kind: i32,
    area: f64,
    length: f64,
    coeff_orifice: f64,
    coeff_free_weir: f64,
    coeff_sub_weir: f64,
) -> ApiResult<i32> {
    let j = at(sim, Gate::NotStarted, ObjectType::Node, node)?;
    let spec = OpeningSpec {
        kind,
        area,
        length,
        coeff_orifice,
        coeff_free_weir,
        coeff_sub_weir,
    };
    Ok(match sim.set_opening(j, id, spec)? {
        Upsert::Created => 0,
        Upsert::Replaced => 1,
    })
}

pub fn delete_node_opening<S: StatsSource>(
    sim: &mut Simulation<S>,
    node: i32,
    id: i32,
) -> ApiResult<()> {
    let j = at(sim, Gate::NotStarted, ObjectType::Node, node)?;
    sim.delete_opening(j, id)
}

pub fn get_opening_param<S: StatsSource>(
    sim: &Simulation<S>,
    node: i32,
    id: i32,
    code: i32,
) -> ApiResult<f64> {
    let j = at(sim, Gate::Open, ObjectType::Node, node)?;
    sim.opening_param(j, id, OpeningParam::try_from(code)?)
}

pub fn get_opening_flow<S: StatsSource>(sim: &Simulation<S>, node: i32, id: i32) -> ApiResult<f64> {
    let j = at(sim, Gate::Started, ObjectType::Node, node)?;
    sim.opening_flow(j, id)
}

pub fn get_opening_type<S: StatsSource>(sim: &Simulation<S>, node: i32, id: i32) -> ApiResult<i32> {
    let j = at(sim, Gate::Open, ObjectType::Node, node)?;
    sim.opening_type(j, id)
}

pub fn get_opening_coupling<S: StatsSource>(
    sim: &Simulation<S>,
    node: i32,
    id: i32,
) -> ApiResult<i32> {
    let j = at(sim, Gate::Open, ObjectType::Node, node)?;
    Ok(sim.opening_coupling(j, id)?.code())
}

pub fn get_opening_count<S: StatsSource>(sim: &Simulation<S>, node: i32) -> ApiResult<usize> {
    let j = at(sim, Gate::Open, ObjectType::Node, node)?;
    sim.opening_count(j)
}

/// Fill `ids` with the node's opening IDs; `ids.len()` must equal the count.
pub fn get_opening_ids<S: StatsSource>(
    sim: &Simulation<S>,
    node: i32,
    ids: &mut [i32],
) -> ApiResult<()> {
    let j = at(sim, Gate::Open, ObjectType::Node, node)?;
    sim.opening_ids(j, ids)
}

/// 1 if any opening of the node exchanges flow, else 0.
pub fn get_node_is_coupled<S: StatsSource>(sim: &Simulation<S>, node: i32) -> ApiResult<i32> {
    let j = at(sim, Gate::Open, ObjectType::Node, node)?;
    Ok(i32::from(sim.node_is_coupled(j)?))
}

pub fn close_opening<S: StatsSource>(sim: &mut Simulation<S>, node: i32, id: i32) -> ApiResult<()> {
    let j = at(sim, Gate::Open, ObjectType::Node, node)?;
    sim.close_opening(j, id)
}

pub fn open_opening<S: StatsSource>(sim: &mut Simulation<S>, node: i32, id: i32) -> ApiResult<()> {
    let j = at(sim, Gate::Open, ObjectType::Node, node)?;
    sim.open_opening(j, id)
}

// ---------------------------------------------------------------------------
// Runtime inputs
// ---------------------------------------------------------------------------

pub fn set_link_setting<S: StatsSource>(
    sim: &mut Simulation<S>,
    index: i32,
    setting: f64,
) -> ApiResult<()> {
    let i = at(sim, Gate::Open, ObjectType::Link, index)?;
    sim.set_link_setting(i, setting)
}

pub fn set_node_inflow<S: StatsSource>(
    sim: &mut Simulation<S>,
    index: i32,
    flow: f64,
) -> ApiResult<()> {
    let i = at(sim, Gate::Open, ObjectType::Node, index)?;
    sim.set_node_inflow(i, flow)
}

pub fn set_outfall_stage<S: StatsSource>(
    sim: &mut Simulation<S>,
    index: i32,
    stage: f64,
) -> ApiResult<()> {
    let i = at(sim, Gate::Open, ObjectType::Node, index)?;
    sim.set_outfall_stage(i, stage)
}

pub fn get_gage_precip<S: StatsSource>(sim: &Simulation<S>, index: i32) -> ApiResult<Precip> {
    let i = at(sim, Gate::Open, ObjectType::Gage, index)?;
    sim.gage_precip(i)
}

pub fn set_gage_precip<S: StatsSource>(
    sim: &mut Simulation<S>,
    index: i32,
    intensity: f64,
) -> ApiResult<()> {
    let i = at(sim, Gate::Open, ObjectType::Gage, index)?;
    sim.set_gage_precip(i, intensity)
}
