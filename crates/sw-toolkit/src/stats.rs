//! Running statistics and mass-balance totals.
//!
//! The routing engine accumulates these; the toolkit only reads them through
//! [`StatsSource`]. All records here hold internal units (ft, ft³, cfs,
//! seconds) until the façade in `results` converts a copy for the caller.

use serde::Serialize;
use sw_model::{NodeType, ObjectTables};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NodeStats {
    /// Depth summed over routing steps; averaged on read.
    pub avg_depth: f64,
    pub max_depth: f64,
    pub max_lat_flow: f64,
    pub max_inflow: f64,
    pub tot_lat_flow: f64,
    pub time_courant_critical: f64,
    pub vol_flooded: f64,
    pub time_flooded: f64,
    pub max_overflow: f64,
    pub max_ponded_vol: f64,
    pub time_surcharged: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StorageStats {
    pub init_vol: f64,
    /// Volume summed over routing steps; averaged on read.
    pub avg_vol: f64,
    pub max_vol: f64,
    pub max_flow: f64,
    pub evap_losses: f64,
    pub exfil_losses: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OutfallStats {
    /// Flow summed over reporting periods; averaged on read.
    pub avg_flow: f64,
    pub max_flow: f64,
    /// One load per pollutant.
    pub total_load: Vec<f64>,
    pub total_periods: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LinkStats {
    pub max_flow: f64,
    pub max_veloc: f64,
    pub max_depth: f64,
    pub time_normal_flow: f64,
    pub time_inlet_control: f64,
    pub time_surcharged: f64,
    pub time_full_upstream: f64,
    pub time_full_dnstream: f64,
    pub time_full_flow: f64,
    pub time_capacity_limited: f64,
    pub time_courant_critical: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PumpStats {
    pub min_flow: f64,
    /// Flow summed over pumping periods; averaged on read.
    pub avg_flow: f64,
    pub max_flow: f64,
    pub volume: f64,
    pub energy: f64,
    pub start_ups: u32,
    pub total_periods: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SubcatchStats {
    pub precip: f64,
    pub runon: f64,
    pub evap: f64,
    pub infil: f64,
    pub runoff: f64,
    pub max_flow: f64,
    /// One buildup mass per pollutant.
    pub surface_buildup: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RoutingTotals {
    pub dw_inflow: f64,
    pub ww_inflow: f64,
    pub gw_inflow: f64,
    pub ii_inflow: f64,
    pub ex_inflow: f64,
    pub flooding: f64,
    pub outflow: f64,
    pub evap_loss: f64,
    pub seep_loss: f64,
    /// Continuity error as a fraction; percent on read.
    pub pct_error: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunoffTotals {
    pub rainfall: f64,
    pub evap: f64,
    pub infil: f64,
    pub runoff: f64,
    pub runon: f64,
    pub drains: f64,
    pub snow_removed: f64,
    pub init_storage: f64,
    pub init_snow_cover: f64,
    /// Continuity error as a fraction; percent on read.
    pub pct_error: f64,
}

/// Read access to the engine's accumulators.
///
/// Callers have already validated indices and object subtypes, so lookups
/// may assume the index is in range for its table.
pub trait StatsSource {
    /// Called when a run starts; accumulators restart from zero.
    fn on_start(&mut self, _tables: &ObjectTables) {}

    fn node_stats(&self, node: usize) -> NodeStats;
    fn storage_stats(&self, node: usize) -> StorageStats;
    fn outfall_stats(&self, node: usize) -> OutfallStats;
    fn link_stats(&self, link: usize) -> LinkStats;
    fn pump_stats(&self, link: usize) -> PumpStats;
    fn subcatch_stats(&self, subcatch: usize) -> SubcatchStats;

    /// Total inflow volume received by a node (ft³).
    fn node_total_inflow(&self, node: usize) -> f64;

    fn routing_totals(&self) -> RoutingTotals;
    fn runoff_totals(&self) -> RunoffTotals;

    /// Land area of all subcatchments (ft²).
    fn total_area(&self) -> f64;
}

/// In-memory accumulators written by the stepping loop.
///
/// Per-node records (`storage`, `outfalls`) are indexed by node index and
/// per-link records (`pumps`) by link index; entries for other subtypes stay
/// at their defaults.
#[derive(Debug, Clone, Default)]
pub struct StatsLedger {
    pub nodes: Vec<NodeStats>,
    pub storage: Vec<StorageStats>,
    pub outfalls: Vec<OutfallStats>,
    pub links: Vec<LinkStats>,
    pub pumps: Vec<PumpStats>,
    pub subcatchments: Vec<SubcatchStats>,
    pub node_inflow: Vec<f64>,
    pub routing: RoutingTotals,
    pub runoff: RunoffTotals,
    pub total_area: f64,
}

impl StatsSource for StatsLedger {
    fn on_start(&mut self, tables: &ObjectTables) {
        let n_nodes = tables.nodes.len();
        let n_pollut = tables.pollutants.len();

        self.nodes = vec![NodeStats::default(); n_nodes];
        self.storage = tables
            .nodes
            .iter()
            .map(|node| StorageStats {
                init_vol: if node.node_type == NodeType::Storage {
                    node.volume_at(node.init_depth)
                } else {
                    0.0
                },
                ..StorageStats::default()
            })
            .collect();
        self.outfalls = vec![
            OutfallStats {
                total_load: vec![0.0; n_pollut],
                ..OutfallStats::default()
            };
            n_nodes
        ];
        self.links = vec![LinkStats::default(); tables.links.len()];
        self.pumps = vec![PumpStats::default(); tables.links.len()];
        self.subcatchments = vec![
            SubcatchStats {
                surface_buildup: vec![0.0; n_pollut],
                ..SubcatchStats::default()
            };
            tables.subcatchments.len()
        ];
        self.node_inflow = vec![0.0; n_nodes];
        self.routing = RoutingTotals::default();
        self.runoff = RunoffTotals::default();
        self.total_area = tables.subcatchments.iter().map(|s| s.area).sum();
    }

    fn node_stats(&self, node: usize) -> NodeStats {
        self.nodes.get(node).cloned().unwrap_or_default()
    }

    fn storage_stats(&self, node: usize) -> StorageStats {
        self.storage.get(node).cloned().unwrap_or_default()
    }

    fn outfall_stats(&self, node: usize) -> OutfallStats {
        self.outfalls.get(node).cloned().unwrap_or_default()
    }

    fn link_stats(&self, link: usize) -> LinkStats {
        self.links.get(link).cloned().unwrap_or_default()
    }

    fn pump_stats(&self, link: usize) -> PumpStats {
        self.pumps.get(link).cloned().unwrap_or_default()
    }

    fn subcatch_stats(&self, subcatch: usize) -> SubcatchStats {
        self.subcatchments.get(subcatch).cloned().unwrap_or_default()
    }

    fn node_total_inflow(&self, node: usize) -> f64 {
        self.node_inflow.get(node).copied().unwrap_or(0.0)
    }

    fn routing_totals(&self) -> RoutingTotals {
        self.routing.clone()
    }

    fn runoff_totals(&self) -> RunoffTotals {
        self.runoff.clone()
    }

    fn total_area(&self) -> f64 {
        self.total_area
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sw_model::{Node, Pollutant, ConcUnits, Subcatchment};

    #[test]
    fn ledger_sizes_follow_tables() {
        let mut su = Node::new("SU1", NodeType::Storage);
        su.surface_area = 100.0;
        su.init_depth = 2.0;
        let mut s1 = Subcatchment::new("S1");
        s1.area = 5000.0;
        let tables = ObjectTables {
            nodes: vec![Node::new("J1", NodeType::Junction), su],
            subcatchments: vec![s1],
            pollutants: vec![Pollutant {
                id: "TSS".into(),
                units: ConcUnits::MgPerL,
                mcf: 1.0,
            }],
            ..ObjectTables::default()
        };

        let mut ledger = StatsLedger::default();
        ledger.on_start(&tables);
        assert_eq!(ledger.nodes.len(), 2);
        assert_eq!(ledger.outfall_stats(0).total_load.len(), 1);
        assert_eq!(ledger.subcatch_stats(0).surface_buildup.len(), 1);
        assert_eq!(ledger.storage_stats(1).init_vol, 200.0);
        assert_eq!(ledger.storage_stats(0).init_vol, 0.0);
        assert_eq!(ledger.total_area(), 5000.0);
    }

    #[test]
    fn restart_clears_accumulators() {
        let tables = ObjectTables {
            nodes: vec![Node::new("J1", NodeType::Junction)],
            ..ObjectTables::default()
        };
        let mut ledger = StatsLedger::default();
        ledger.on_start(&tables);
        ledger.nodes[0].max_depth = 3.0;
        ledger.routing.flooding = 10.0;
        ledger.on_start(&tables);
        assert_eq!(ledger.node_stats(0).max_depth, 0.0);
        assert_eq!(ledger.routing_totals().flooding, 0.0);
    }
}
