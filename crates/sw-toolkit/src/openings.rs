//! Coupling opening API.
//!
//! Openings are addressed by `(node index, opening ID)`. The node index is
//! checked like any object index; an opening ID that is not registered on the
//! node reports the same object-index error.

use sw_core::{ApiError, ApiResult, ObjectType, Quantity};
use sw_model::{CouplingType, Model, Opening, OpeningSpec, Upsert};

use crate::lifecycle::Gate;
use crate::params::OpeningParam;
use crate::simulation::Simulation;
use crate::stats::StatsSource;

fn missing(model: &Model, node: usize, id: i32) -> ApiError {
    ApiError::index("opening", i64::from(id), model.openings.count(node))
}

fn find(model: &Model, node: usize, id: i32) -> ApiResult<&Opening> {
    model
        .openings
        .get(node, id)
        .ok_or_else(|| missing(model, node, id))
}

impl<S: StatsSource> Simulation<S> {
    /// Create an opening, or update the existing one with the same ID.
    ///
    /// `spec.area` and `spec.length` are in display units.
    pub fn set_opening(&mut self, node: usize, id: i32, spec: OpeningSpec) -> ApiResult<Upsert> {
        let j = self.slot(Gate::NotStarted, ObjectType::Node, node)?;
        let model = self.model_mut(Gate::NotStarted)?;
        let units = model.options.units;
        let internal = OpeningSpec {
            area: units.to_internal(Quantity::Area, spec.area),
            length: units.to_internal(Quantity::Length, spec.length),
            ..spec
        };
        model
            .openings
            .upsert(j, id, internal)
            .ok_or(ApiError::index("node", j as i64, model.tables.nodes.len()))
    }

    /// Remove an opening. Removing an ID that is not registered is a no-op.
    pub fn delete_opening(&mut self, node: usize, id: i32) -> ApiResult<()> {
        let j = self.slot(Gate::NotStarted, ObjectType::Node, node)?;
        let model = self.model_mut(Gate::NotStarted)?;
        if model.openings.remove(j, id).is_none() {
            tracing::debug!(node = j, id, "delete of unregistered opening ignored");
        }
        Ok(())
    }

    pub fn opening_param(&self, node: usize, id: i32, param: OpeningParam) -> ApiResult<f64> {
        let j = self.slot(Gate::Open, ObjectType::Node, node)?;
        let model = self.model_ref(Gate::Open)?;
        let spec = &find(model, j, id)?.spec;
        let raw = match param {
            OpeningParam::Area => spec.area,
            OpeningParam::Length => spec.length,
            OpeningParam::OrificeCoeff => spec.coeff_orifice,
            OpeningParam::FreeWeirCoeff => spec.coeff_free_weir,
            OpeningParam::SubmergedWeirCoeff => spec.coeff_sub_weir,
        };
        Ok(model.options.units.to_display(param.quantity(), raw))
    }

    /// Inflow computed for the opening at the latest exchange.
    pub fn opening_flow(&self, node: usize, id: i32) -> ApiResult<f64> {
        let j = self.slot(Gate::Started, ObjectType::Node, node)?;
        let model = self.model_ref(Gate::Started)?;
        let opening = find(model, j, id)?;
        Ok(model.options.units.to_display(Quantity::Flow, opening.new_inflow))
    }

    /// Geometric type tag given when the opening was set.
    pub fn opening_type(&self, node: usize, id: i32) -> ApiResult<i32> {
        let j = self.slot(Gate::Open, ObjectType::Node, node)?;
        Ok(find(self.model_ref(Gate::Open)?, j, id)?.spec.kind)
    }

    pub fn opening_coupling(&self, node: usize, id: i32) -> ApiResult<CouplingType> {
        let j = self.slot(Gate::Open, ObjectType::Node, node)?;
        Ok(find(self.model_ref(Gate::Open)?, j, id)?.coupling)
    }

    pub fn opening_count(&self, node: usize) -> ApiResult<usize> {
        let j = self.slot(Gate::Open, ObjectType::Node, node)?;
        Ok(self.model_ref(Gate::Open)?.openings.count(j))
    }

    /// Fill `ids` with the node's opening IDs in insertion order.
    ///
    /// `ids` must be exactly as long as the current opening count; otherwise
    /// nothing is written and an object-index error is returned.
    pub fn opening_ids(&self, node: usize, ids: &mut [i32]) -> ApiResult<()> {
        let j = self.slot(Gate::Open, ObjectType::Node, node)?;
        let registry = &self.model_ref(Gate::Open)?.openings;
        let count = registry.count(j);
        if ids.len() != count {
            return Err(ApiError::index("opening list", ids.len() as i64, count));
        }
        for (slot, opening) in ids.iter_mut().zip(registry.iter(j)) {
            *slot = opening.id;
        }
        Ok(())
    }

    /// Whether any opening of the node is exchanging flow.
    pub fn node_is_coupled(&self, node: usize) -> ApiResult<bool> {
        let j = self.slot(Gate::Open, ObjectType::Node, node)?;
        Ok(self.model_ref(Gate::Open)?.openings.is_node_coupled(j))
    }

    /// Stop an opening exchanging flow without removing it.
    pub fn close_opening(&mut self, node: usize, id: i32) -> ApiResult<()> {
        let j = self.slot(Gate::Open, ObjectType::Node, node)?;
        let model = self.model_mut(Gate::Open)?;
        if !model.openings.close(j, id) {
            return Err(missing(model, j, id));
        }
        sync_coupling_inflow(model, j);
        Ok(())
    }

    pub fn open_opening(&mut self, node: usize, id: i32) -> ApiResult<()> {
        let j = self.slot(Gate::Open, ObjectType::Node, node)?;
        let model = self.model_mut(Gate::Open)?;
        if !model.openings.open(j, id) {
            return Err(missing(model, j, id));
        }
        Ok(())
    }

    /// Engine-side write of one exchange result (`inflow` in cfs).
    ///
    /// Keeps the node's coupling inflow equal to the sum over its openings.
    pub fn record_opening_exchange(
        &mut self,
        node: usize,
        id: i32,
        coupling: CouplingType,
        inflow: f64,
    ) -> ApiResult<()> {
        let j = self.slot(Gate::Open, ObjectType::Node, node)?;
        let model = self.model_mut(Gate::Open)?;
        if !model.openings.record_exchange(j, id, coupling, inflow) {
            return Err(missing(model, j, id));
        }
        sync_coupling_inflow(model, j);
        Ok(())
    }
}

fn sync_coupling_inflow(model: &mut Model, node: usize) {
    model.tables.nodes[node].state.coupling_inflow = model.openings.node_inflow(node);
}
