//! Runtime inputs pushed by an external caller: control settings, lateral
//! inflows, outfall stages and gage precipitation.

use sw_core::{ApiError, ApiResult, ObjectType, Quantity};
use sw_model::{NodeType, OutfallBoundary, Precip};

use crate::lifecycle::Gate;
use crate::options::{format_datetime, offset_datetime};
use crate::simulation::Simulation;
use crate::stats::StatsSource;

impl<S: StatsSource> Simulation<S> {
    /// Set a link's target setting and apply it at once.
    ///
    /// The request is clamped to what the link can take: `[0, 1]` for
    /// regulators and conduits, non-negative for pumps.
    pub fn set_link_setting(&mut self, index: usize, setting: f64) -> ApiResult<()> {
        let i = self.slot(Gate::Open, ObjectType::Link, index)?;
        let elapsed_ms = self.clock().elapsed_ms;
        let model = self.model_mut(Gate::Open)?;
        let link = &mut model.tables.links[i];
        link.state.target_setting = link.feasible_setting(setting);
        link.apply_target_setting();
        if model.options.report_controls {
            let at = offset_datetime(model.options.start, elapsed_ms)
                .map(format_datetime)
                .unwrap_or_default();
            tracing::info!(
                link = %link.id,
                setting = link.state.setting,
                at = %at,
                "link setting changed by external control"
            );
        }
        Ok(())
    }

    /// Replace the externally supplied lateral inflow of a node.
    pub fn set_node_inflow(&mut self, index: usize, flow: f64) -> ApiResult<()> {
        let i = self.slot(Gate::Open, ObjectType::Node, index)?;
        let model = self.model_mut(Gate::Open)?;
        let q = model.options.units.to_internal(Quantity::Flow, flow);
        let node = &mut model.tables.nodes[i];
        let (inflow, created) = node.flow_inflow_mut();
        inflow.iface_inflow = q;
        if created {
            tracing::debug!(node = %node.id, "flow inflow created for external input");
        }
        Ok(())
    }

    /// Fix an outfall's boundary stage until the next call.
    pub fn set_outfall_stage(&mut self, index: usize, stage: f64) -> ApiResult<()> {
        let i = self.slot(Gate::Open, ObjectType::Node, index)?;
        let model = self.model_mut(Gate::Open)?;
        let h = model.options.units.to_internal(Quantity::Length, stage);
        let node = &mut model.tables.nodes[i];
        if node.node_type != NodeType::Outfall {
            return Err(ApiError::WrongType {
                expected: "outfall node",
            });
        }
        let outfall = node.outfall.get_or_insert_with(Default::default);
        outfall.boundary = OutfallBoundary::Staged;
        outfall.stage = h;
        Ok(())
    }

    /// Current rainfall and snowfall of a gage in display intensity units.
    pub fn gage_precip(&self, index: usize) -> ApiResult<Precip> {
        let i = self.slot(Gate::Open, ObjectType::Gage, index)?;
        let model = self.model_ref(Gate::Open)?;
        let p = model.tables.gages[i].precip();
        let u = model.options.units;
        Ok(Precip {
            rainfall: u.to_display(Quantity::Rainfall, p.rainfall),
            snowfall: u.to_display(Quantity::Rainfall, p.snowfall),
        })
    }

    /// Override a gage's intensity. The gage reads only external values from
    /// then on.
    pub fn set_gage_precip(&mut self, index: usize, intensity: f64) -> ApiResult<()> {
        let i = self.slot(Gate::Open, ObjectType::Gage, index)?;
        let model = self.model_mut(Gate::Open)?;
        let v = model.options.units.to_internal(Quantity::Rainfall, intensity);
        let gage = &mut model.tables.gages[i];
        if gage.set_external_rain(v) {
            tracing::debug!(gage = %gage.id, "gage switched to external rainfall");
        }
        Ok(())
    }
}
