//! Object table accessors: counts, IDs, metadata and input parameters.
//!
//! Checks run in a fixed order: lifecycle, then run state where the call
//! needs it, then object index, then parameter. A failed check leaves the
//! tables untouched.

use sw_core::{ApiError, ApiResult, ObjectRef, ObjectType};
use sw_model::{LinkType, NodeType, SubcatchOutlet};

use crate::lifecycle::Gate;
use crate::params::{LinkParam, NodeParam, SubcatchParam};
use crate::simulation::Simulation;
use crate::stats::StatsSource;

impl<S: StatsSource> Simulation<S> {
    /// Number of objects of a type.
    pub fn count_objects(&self, kind: ObjectType) -> ApiResult<usize> {
        Ok(self.model_ref(Gate::Open)?.tables.count(kind))
    }

    /// String ID of an object.
    pub fn object_id(&self, kind: ObjectType, index: usize) -> ApiResult<String> {
        let i = self.slot(Gate::Open, kind, index)?;
        if !kind.has_ids() {
            return Err(ApiError::ParamOutOfRange {
                what: "object type",
                code: kind.code(),
            });
        }
        let tables = &self.model_ref(Gate::Open)?.tables;
        Ok(tables.id(kind, i).unwrap_or_default().to_string())
    }

    /// Index of an object by string ID.
    pub fn find_object(&self, kind: ObjectType, id: &str) -> ApiResult<Option<usize>> {
        Ok(self.model_ref(Gate::Open)?.tables.find(kind, id))
    }

    pub fn node_type(&self, index: usize) -> ApiResult<NodeType> {
        let i = self.slot(Gate::Open, ObjectType::Node, index)?;
        Ok(self.model_ref(Gate::Open)?.tables.nodes[i].node_type)
    }

    pub fn link_type(&self, index: usize) -> ApiResult<LinkType> {
        let i = self.slot(Gate::Open, ObjectType::Link, index)?;
        Ok(self.model_ref(Gate::Open)?.tables.links[i].link_type)
    }

    /// Upstream and downstream node indices of a link.
    pub fn link_connections(&self, index: usize) -> ApiResult<(usize, usize)> {
        let i = self.slot(Gate::Open, ObjectType::Link, index)?;
        let link = &self.model_ref(Gate::Open)?.tables.links[i];
        Ok((link.node1, link.node2))
    }

    /// +1, or -1 for a link whose ends were swapped at build time.
    pub fn link_direction(&self, index: usize) -> ApiResult<i8> {
        let i = self.slot(Gate::Open, ObjectType::Link, index)?;
        Ok(self.model_ref(Gate::Open)?.tables.links[i].direction)
    }

    /// Where a subcatchment's runoff goes. A self-loading subcatchment
    /// reports itself.
    pub fn subcatch_outlet(&self, index: usize) -> ApiResult<ObjectRef> {
        let i = self.slot(Gate::Open, ObjectType::Subcatchment, index)?;
        let sub = &self.model_ref(Gate::Open)?.tables.subcatchments[i];
        Ok(match sub.outlet {
            SubcatchOutlet::Node(j) => ObjectRef::new(ObjectType::Node, j),
            SubcatchOutlet::Subcatchment(k) => ObjectRef::new(ObjectType::Subcatchment, k),
            SubcatchOutlet::Itself => ObjectRef::new(ObjectType::Subcatchment, i),
        })
    }

    pub fn node_param(&self, index: usize, param: NodeParam) -> ApiResult<f64> {
        let i = self.slot(Gate::Open, ObjectType::Node, index)?;
        let model = self.model_ref(Gate::Open)?;
        let node = &model.tables.nodes[i];
        let raw = match param {
            NodeParam::InvertElev => node.invert_elev,
            NodeParam::FullDepth => node.full_depth,
            NodeParam::SurchargeDepth => node.sur_depth,
            NodeParam::PondedArea => node.ponded_area,
            NodeParam::InitDepth => node.init_depth,
            NodeParam::SurfaceArea => node.surface_area,
            NodeParam::CouplingArea => node.coupling_area,
            NodeParam::OverlandDepth => node.overland_depth,
        };
        Ok(model.options.units.to_display(param.quantity(), raw))
    }

    /// Node geometry may change mid-run; the full volume follows both the
    /// surface area and the full depth.
    pub fn set_node_param(&mut self, index: usize, param: NodeParam, value: f64) -> ApiResult<()> {
        let i = self.slot(Gate::Open, ObjectType::Node, index)?;
        let model = self.model_mut(Gate::Open)?;
        let v = model.options.units.to_internal(param.quantity(), value);
        let node = &mut model.tables.nodes[i];
        match param {
            NodeParam::InvertElev => node.invert_elev = v,
            NodeParam::FullDepth => {
                node.full_depth = v;
                node.refresh_full_volume();
            }
            NodeParam::SurchargeDepth => node.sur_depth = v,
            NodeParam::PondedArea => node.ponded_area = v,
            NodeParam::InitDepth => node.init_depth = v,
            NodeParam::SurfaceArea => {
                node.surface_area = v;
                node.refresh_full_volume();
            }
            NodeParam::CouplingArea => node.coupling_area = v,
            NodeParam::OverlandDepth => node.overland_depth = v,
        }
        Ok(())
    }

    pub fn link_param(&self, index: usize, param: LinkParam) -> ApiResult<f64> {
        let i = self.slot(Gate::Open, ObjectType::Link, index)?;
        let model = self.model_ref(Gate::Open)?;
        let link = &model.tables.links[i];
        let raw = match param {
            LinkParam::Offset1 => link.offset1,
            LinkParam::Offset2 => link.offset2,
            LinkParam::InitFlow => link.q0,
            LinkParam::FlowLimit => link.q_limit,
            LinkParam::InletLoss => link.c_loss_inlet,
            LinkParam::OutletLoss => link.c_loss_outlet,
            LinkParam::AvgLoss => link.c_loss_avg,
        };
        Ok(model.options.units.to_display(param.quantity(), raw))
    }

    /// Offsets are locked while a run is in progress. Loss coefficients are
    /// read-only: writing one succeeds and changes nothing.
    pub fn set_link_param(&mut self, index: usize, param: LinkParam, value: f64) -> ApiResult<()> {
        let i = self.slot(Gate::Open, ObjectType::Link, index)?;
        if param.locked_while_running() && self.is_started() {
            return Err(ApiError::AlreadyRunning);
        }
        let model = self.model_mut(Gate::Open)?;
        let v = model.options.units.to_internal(param.quantity(), value);
        let link = &mut model.tables.links[i];
        match param {
            LinkParam::Offset1 => link.offset1 = v,
            LinkParam::Offset2 => link.offset2 = v,
            LinkParam::InitFlow => link.q0 = v,
            LinkParam::FlowLimit => link.q_limit = v,
            LinkParam::InletLoss | LinkParam::OutletLoss | LinkParam::AvgLoss => {
                tracing::debug!(
                    link = %link.id,
                    ?param,
                    value,
                    "write to read-only link parameter ignored"
                );
            }
        }
        Ok(())
    }

    pub fn subcatch_param(&self, index: usize, param: SubcatchParam) -> ApiResult<f64> {
        let i = self.slot(Gate::Open, ObjectType::Subcatchment, index)?;
        let model = self.model_ref(Gate::Open)?;
        let sub = &model.tables.subcatchments[i];
        let raw = match param {
            SubcatchParam::Width => sub.width,
            SubcatchParam::Area => sub.area,
            SubcatchParam::FracImperv => sub.frac_imperv,
            SubcatchParam::Slope => sub.slope,
            SubcatchParam::CurbLength => sub.curb_length,
        };
        Ok(model.options.units.to_display(param.quantity(), raw))
    }

    /// Subcatchments are fixed once a run starts. Imperviousness and slope are
    /// read-only: writing one succeeds and changes nothing.
    pub fn set_subcatch_param(
        &mut self,
        index: usize,
        param: SubcatchParam,
        value: f64,
    ) -> ApiResult<()> {
        let i = self.slot(Gate::NotStarted, ObjectType::Subcatchment, index)?;
        let model = self.model_mut(Gate::NotStarted)?;
        let v = model.options.units.to_internal(param.quantity(), value);
        let sub = &mut model.tables.subcatchments[i];
        match param {
            SubcatchParam::Width => sub.width = v,
            SubcatchParam::Area => sub.area = v,
            SubcatchParam::CurbLength => sub.curb_length = v,
            SubcatchParam::FracImperv | SubcatchParam::Slope => {
                tracing::debug!(
                    subcatchment = %sub.id,
                    ?param,
                    value,
                    "write to read-only subcatchment parameter ignored"
                );
            }
        }
        Ok(())
    }
}
