//! Live results and the statistics façade.
//!
//! Everything here needs a run in progress. Statistics are copied out of the
//! [`StatsSource`] and converted before they are handed back; the caller
//! owns the returned records, pollutant vectors included.

use sw_core::{
    ApiError, ApiResult, L_PER_FT3, ObjectType, Quantity, UnitConverter, average_over,
    divide_or_zero, log10_or_keep, seconds_to_hours,
};
use sw_model::{ConcUnits, LinkType, NodeType, Pollutant};

use crate::lifecycle::Gate;
use crate::params::{LinkResult, NodeResult, SubcatchResult};
use crate::simulation::Simulation;
use crate::stats::{
    LinkStats, NodeStats, OutfallStats, PumpStats, RoutingTotals, RunoffTotals, StatsSource,
    StorageStats, SubcatchStats,
};

fn log_counts(values: &mut [f64], pollutants: &[Pollutant]) {
    for (v, p) in values.iter_mut().zip(pollutants) {
        if p.units == ConcUnits::Count {
            *v = log10_or_keep(*v);
        }
    }
}

impl<S: StatsSource> Simulation<S> {
    pub fn node_result(&self, index: usize, result: NodeResult) -> ApiResult<f64> {
        let i = self.slot(Gate::Started, ObjectType::Node, index)?;
        let model = self.model_ref(Gate::Started)?;
        let node = &model.tables.nodes[i];
        let raw = match result {
            NodeResult::TotalInflow => node.state.inflow,
            NodeResult::TotalOutflow => node.state.outflow,
            NodeResult::Losses => node.state.losses,
            NodeResult::Volume => node.state.new_volume,
            NodeResult::Flooding => node.state.overflow,
            NodeResult::Depth => node.state.new_depth,
            NodeResult::Head => node.head(),
            NodeResult::LateralInflow => node.state.new_lat_flow,
            NodeResult::CouplingInflow => node.state.coupling_inflow,
        };
        Ok(model.options.units.to_display(result.quantity(), raw))
    }

    pub fn link_result(&self, index: usize, result: LinkResult) -> ApiResult<f64> {
        let i = self.slot(Gate::Started, ObjectType::Link, index)?;
        let model = self.model_ref(Gate::Started)?;
        let state = &model.tables.links[i].state;
        let raw = match result {
            LinkResult::Flow => state.new_flow,
            LinkResult::Depth => state.new_depth,
            LinkResult::Volume => state.new_volume,
            LinkResult::UpstreamSurfaceArea => state.surf_area1,
            LinkResult::DownstreamSurfaceArea => state.surf_area2,
            LinkResult::Setting => state.setting,
            LinkResult::TargetSetting => state.target_setting,
            LinkResult::Froude => state.froude,
        };
        Ok(model.options.units.to_display(result.quantity(), raw))
    }

    pub fn subcatch_result(&self, index: usize, result: SubcatchResult) -> ApiResult<f64> {
        let i = self.slot(Gate::Started, ObjectType::Subcatchment, index)?;
        let model = self.model_ref(Gate::Started)?;
        let state = &model.tables.subcatchments[i].state;
        let raw = match result {
            SubcatchResult::Rainfall => state.rainfall,
            SubcatchResult::Evaporation => state.evap_loss,
            SubcatchResult::Infiltration => state.infil_loss,
            SubcatchResult::Runon => state.runon,
            SubcatchResult::Runoff => state.new_runoff,
            SubcatchResult::SnowDepth => state.new_snow_depth,
        };
        Ok(model.options.units.to_display(result.quantity(), raw))
    }

    pub fn node_stats(&self, index: usize) -> ApiResult<NodeStats> {
        let i = self.slot(Gate::Started, ObjectType::Node, index)?;
        let u = self.model_ref(Gate::Started)?.options.units;
        let raw = self.stats().node_stats(i);
        let steps = self.clock().step_count;
        Ok(NodeStats {
            avg_depth: average_over(u.to_display(Quantity::Length, raw.avg_depth), steps),
            max_depth: u.to_display(Quantity::Length, raw.max_depth),
            max_lat_flow: u.to_display(Quantity::Flow, raw.max_lat_flow),
            max_inflow: u.to_display(Quantity::Flow, raw.max_inflow),
            tot_lat_flow: u.to_display(Quantity::Volume, raw.tot_lat_flow),
            time_courant_critical: seconds_to_hours(raw.time_courant_critical),
            vol_flooded: u.to_display(Quantity::Volume, raw.vol_flooded),
            time_flooded: seconds_to_hours(raw.time_flooded),
            max_overflow: u.to_display(Quantity::Flow, raw.max_overflow),
            max_ponded_vol: u.to_display(Quantity::Volume, raw.max_ponded_vol),
            time_surcharged: seconds_to_hours(raw.time_surcharged),
        })
    }

    /// Total inflow volume a node has received.
    pub fn node_total_inflow(&self, index: usize) -> ApiResult<f64> {
        let i = self.slot(Gate::Started, ObjectType::Node, index)?;
        let u = self.model_ref(Gate::Started)?.options.units;
        Ok(u.to_display(Quantity::Volume, self.stats().node_total_inflow(i)))
    }

    pub fn storage_stats(&self, index: usize) -> ApiResult<StorageStats> {
        let i = self.slot(Gate::Started, ObjectType::Node, index)?;
        let model = self.model_ref(Gate::Started)?;
        if model.tables.nodes[i].node_type != NodeType::Storage {
            return Err(ApiError::WrongType {
                expected: "storage node",
            });
        }
        let u = model.options.units;
        let raw = self.stats().storage_stats(i);
        let steps = self.clock().step_count;
        Ok(StorageStats {
            init_vol: u.to_display(Quantity::Volume, raw.init_vol),
            avg_vol: average_over(u.to_display(Quantity::Volume, raw.avg_vol), steps),
            max_vol: u.to_display(Quantity::Volume, raw.max_vol),
            max_flow: u.to_display(Quantity::Flow, raw.max_flow),
            evap_losses: u.to_display(Quantity::Volume, raw.evap_losses),
            exfil_losses: u.to_display(Quantity::Volume, raw.exfil_losses),
        })
    }

    /// Outfall statistics with one load per pollutant (lb or kg, or log10 of
    /// a count).
    pub fn outfall_stats(&self, index: usize) -> ApiResult<OutfallStats> {
        let i = self.slot(Gate::Started, ObjectType::Node, index)?;
        let model = self.model_ref(Gate::Started)?;
        if model.tables.nodes[i].node_type != NodeType::Outfall {
            return Err(ApiError::WrongType {
                expected: "outfall node",
            });
        }
        let u = model.options.units;
        let pollutants = &model.tables.pollutants;
        let mut raw = self.stats().outfall_stats(i);
        raw.total_load.resize(pollutants.len(), 0.0);

        let mut total_load: Vec<f64> = raw
            .total_load
            .iter()
            .zip(pollutants)
            .map(|(load, p)| load * L_PER_FT3 * p.mcf)
            .collect();
        log_counts(&mut total_load, pollutants);

        Ok(OutfallStats {
            avg_flow: average_over(u.to_display(Quantity::Flow, raw.avg_flow), raw.total_periods),
            max_flow: u.to_display(Quantity::Flow, raw.max_flow),
            total_load,
            total_periods: raw.total_periods,
        })
    }

    pub fn link_stats(&self, index: usize) -> ApiResult<LinkStats> {
        let i = self.slot(Gate::Started, ObjectType::Link, index)?;
        let u = self.model_ref(Gate::Started)?.options.units;
        let raw = self.stats().link_stats(i);
        Ok(LinkStats {
            max_flow: u.to_display(Quantity::Flow, raw.max_flow),
            max_veloc: u.to_display(Quantity::Length, raw.max_veloc),
            max_depth: u.to_display(Quantity::Length, raw.max_depth),
            time_normal_flow: seconds_to_hours(raw.time_normal_flow),
            time_inlet_control: seconds_to_hours(raw.time_inlet_control),
            time_surcharged: seconds_to_hours(raw.time_surcharged),
            time_full_upstream: seconds_to_hours(raw.time_full_upstream),
            time_full_dnstream: seconds_to_hours(raw.time_full_dnstream),
            time_full_flow: seconds_to_hours(raw.time_full_flow),
            time_capacity_limited: seconds_to_hours(raw.time_capacity_limited),
            time_courant_critical: seconds_to_hours(raw.time_courant_critical),
        })
    }

    pub fn pump_stats(&self, index: usize) -> ApiResult<PumpStats> {
        let i = self.slot(Gate::Started, ObjectType::Link, index)?;
        let model = self.model_ref(Gate::Started)?;
        if model.tables.links[i].link_type != LinkType::Pump {
            return Err(ApiError::WrongType { expected: "pump" });
        }
        let u = model.options.units;
        let raw = self.stats().pump_stats(i);
        Ok(PumpStats {
            min_flow: u.to_display(Quantity::Flow, raw.min_flow),
            avg_flow: average_over(u.to_display(Quantity::Flow, raw.avg_flow), raw.total_periods),
            max_flow: u.to_display(Quantity::Flow, raw.max_flow),
            volume: u.to_display(Quantity::Volume, raw.volume),
            ..raw
        })
    }

    /// Subcatchment statistics as depths over its area, with one buildup per
    /// pollutant (mass per land area, or log10 of a count).
    pub fn subcatch_stats(&self, index: usize) -> ApiResult<SubcatchStats> {
        let i = self.slot(Gate::Started, ObjectType::Subcatchment, index)?;
        let model = self.model_ref(Gate::Started)?;
        let u = model.options.units;
        let area = model.tables.subcatchments[i].area;
        let pollutants = &model.tables.pollutants;
        let mut raw = self.stats().subcatch_stats(i);
        raw.surface_buildup.resize(pollutants.len(), 0.0);

        let depth = |v: f64| divide_or_zero(u.to_display(Quantity::RainDepth, v), area);
        let land = u.to_display(Quantity::LandArea, area);
        let mut surface_buildup: Vec<f64> = raw
            .surface_buildup
            .iter()
            .map(|&b| divide_or_zero(b, land))
            .collect();
        log_counts(&mut surface_buildup, pollutants);

        Ok(SubcatchStats {
            precip: depth(raw.precip),
            runon: depth(raw.runon),
            evap: depth(raw.evap),
            infil: depth(raw.infil),
            runoff: depth(raw.runoff),
            max_flow: u.to_display(Quantity::Flow, raw.max_flow),
            surface_buildup,
        })
    }

    /// System flow routing totals; continuity error in percent.
    pub fn routing_totals(&self) -> ApiResult<RoutingTotals> {
        let u = self.model_ref(Gate::Started)?.options.units;
        let raw = self.stats().routing_totals();
        let vol = |v: f64| u.to_display(Quantity::Volume, v);
        Ok(RoutingTotals {
            dw_inflow: vol(raw.dw_inflow),
            ww_inflow: vol(raw.ww_inflow),
            gw_inflow: vol(raw.gw_inflow),
            ii_inflow: vol(raw.ii_inflow),
            ex_inflow: vol(raw.ex_inflow),
            flooding: vol(raw.flooding),
            outflow: vol(raw.outflow),
            evap_loss: vol(raw.evap_loss),
            seep_loss: vol(raw.seep_loss),
            pct_error: raw.pct_error * 100.0,
        })
    }

    /// System runoff totals as depths over the total land area; continuity
    /// error in percent.
    pub fn runoff_totals(&self) -> ApiResult<RunoffTotals> {
        let u = self.model_ref(Gate::Started)?.options.units;
        let raw = self.stats().runoff_totals();
        let total_area = self.stats().total_area();
        Ok(runoff_depths(&u, raw, total_area))
    }
}

fn runoff_depths(u: &UnitConverter, raw: RunoffTotals, total_area: f64) -> RunoffTotals {
    let depth = |v: f64| divide_or_zero(u.to_display(Quantity::RainDepth, v), total_area);
    RunoffTotals {
        rainfall: depth(raw.rainfall),
        evap: depth(raw.evap),
        infil: depth(raw.infil),
        runoff: depth(raw.runoff),
        runon: depth(raw.runon),
        drains: depth(raw.drains),
        snow_removed: depth(raw.snow_removed),
        init_storage: depth(raw.init_storage),
        init_snow_cover: depth(raw.init_snow_cover),
        pct_error: raw.pct_error * 100.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::open_sample;

    #[test]
    fn results_need_a_run() {
        let sim = open_sample();
        assert_eq!(
            sim.node_result(0, NodeResult::Depth),
            Err(ApiError::NotRunning)
        );
        assert_eq!(sim.routing_totals(), Err(ApiError::NotRunning));
    }

    #[test]
    fn head_is_depth_plus_invert() {
        let mut sim = open_sample();
        sim.start().unwrap();
        sim.tables_mut().unwrap().nodes[0].state.new_depth = 1.25;
        assert_eq!(sim.node_result(0, NodeResult::Head), Ok(11.25));
        assert_eq!(sim.node_result(0, NodeResult::Depth), Ok(1.25));
    }

    #[test]
    fn outfall_average_is_zero_without_periods() {
        let mut sim = open_sample();
        sim.start().unwrap();
        sim.stats_mut().outfalls[2].avg_flow = 50.0;
        let stats = sim.outfall_stats(2).unwrap();
        assert_eq!(stats.avg_flow, 0.0);
        assert_eq!(stats.total_load.len(), 2);
    }

    #[test]
    fn outfall_stats_reject_other_node_types() {
        let mut sim = open_sample();
        sim.start().unwrap();
        assert_eq!(
            sim.outfall_stats(0),
            Err(ApiError::WrongType {
                expected: "outfall node"
            })
        );
        assert!(matches!(
            sim.storage_stats(2),
            Err(ApiError::WrongType { .. })
        ));
        assert!(matches!(sim.pump_stats(0), Err(ApiError::WrongType { .. })));
    }

    #[test]
    fn count_loads_are_logged() {
        let mut sim = open_sample();
        sim.start().unwrap();
        {
            let ledger = sim.stats_mut();
            ledger.outfalls[2].total_load = vec![1.0, 1000.0 / L_PER_FT3];
            ledger.outfalls[2].avg_flow = 30.0;
            ledger.outfalls[2].total_periods = 3;
        }
        let stats = sim.outfall_stats(2).unwrap();
        assert_eq!(stats.avg_flow, 10.0);
        assert!((stats.total_load[1] - 3.0).abs() < 1e-9);
        // mg/L loads are scaled by L/ft3 and the mass factor
        let tss_mcf = sim.model().unwrap().tables.pollutants[0].mcf;
        assert!((stats.total_load[0] - L_PER_FT3 * tss_mcf).abs() < 1e-12);
    }

    #[test]
    fn node_average_depth_uses_step_count() {
        let mut sim = open_sample();
        sim.start().unwrap();
        assert_eq!(sim.node_stats(0).unwrap().avg_depth, 0.0);
        sim.stats_mut().nodes[0].avg_depth = 6.0;
        sim.stats_mut().nodes[0].time_flooded = 7200.0;
        sim.advance(10.0).unwrap();
        sim.advance(10.0).unwrap();
        let stats = sim.node_stats(0).unwrap();
        assert_eq!(stats.avg_depth, 3.0);
        assert!((stats.time_flooded - 2.0).abs() < 1e-12);
    }

    #[test]
    fn runoff_totals_are_depths() {
        let u = UnitConverter::default();
        let raw = RunoffTotals {
            rainfall: 100.0,
            pct_error: 0.01,
            ..RunoffTotals::default()
        };
        let out = runoff_depths(&u, raw.clone(), 1200.0);
        assert_eq!(out.rainfall, 1.0);
        assert!((out.pct_error - 1.0).abs() < 1e-12);
        assert_eq!(runoff_depths(&u, raw, 0.0).rainfall, 0.0);
    }

    #[test]
    fn subcatch_depths_use_own_area() {
        let mut sim = open_sample();
        sim.start().unwrap();
        let area = sim.model().unwrap().tables.subcatchments[0].area;
        sim.stats_mut().subcatchments[0].runoff = area / 12.0;
        let stats = sim.subcatch_stats(0).unwrap();
        assert!((stats.runoff - 1.0).abs() < 1e-12);
        assert_eq!(stats.surface_buildup.len(), 2);
    }
}
