//! Registry of coupling openings.
//!
//! An opening is an aperture on a node through which the node's water
//! surface exchanges flow with an external 2-D surface model. Openings are
//! the only records that come and go while a project is open.
//!
//! Storage is an arena of opening slots plus, for every node, the arena
//! slots it owns in insertion order and a map from the caller-chosen opening
//! ID to its slot. Lookups are O(1); enumeration follows insertion order.
//! A node exclusively owns its openings: no slot is shared between nodes.

use std::collections::HashMap;

/// How an opening currently exchanges flow with the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CouplingType {
    #[default]
    NoCoupling,
    Orifice,
    FreeWeir,
    SubmergedWeir,
    /// Closed by a caller; no exchange until reopened.
    Closed,
}

impl CouplingType {
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Whether flow is being exchanged.
    pub fn is_active(self) -> bool {
        matches!(
            self,
            CouplingType::Orifice | CouplingType::FreeWeir | CouplingType::SubmergedWeir
        )
    }
}

/// Geometry and coefficients of an opening, in internal units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpeningSpec {
    /// Geometric type tag; not yet interpreted.
    pub kind: i32,
    /// Opening area (ft²).
    pub area: f64,
    /// Perimeter-like weir length (ft).
    pub length: f64,
    pub coeff_orifice: f64,
    pub coeff_free_weir: f64,
    pub coeff_sub_weir: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Opening {
    pub id: i32,
    pub spec: OpeningSpec,
    pub coupling: CouplingType,
    /// Inflow computed at the previous exchange (cfs).
    pub old_inflow: f64,
    /// Inflow computed at the latest exchange (cfs).
    pub new_inflow: f64,
}

/// Outcome of an insert-or-update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Created,
    Replaced,
}

#[derive(Debug, Clone, Default)]
struct NodeOpenings {
    order: Vec<usize>,
    by_id: HashMap<i32, usize>,
}

/// Per-node opening lists for a fixed number of nodes.
#[derive(Debug, Clone, Default)]
pub struct OpeningRegistry {
    slots: Vec<Option<Opening>>,
    free: Vec<usize>,
    nodes: Vec<NodeOpenings>,
}

impl OpeningRegistry {
    /// Empty registry for `node_count` nodes.
    pub fn with_nodes(node_count: usize) -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            nodes: vec![NodeOpenings::default(); node_count],
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Create an opening, or update it in place if the ID already exists.
    ///
    /// Updating keeps the opening's position and coupling state; both cases
    /// reset the computed inflows. Returns `None` if `node` is out of range.
    pub fn upsert(&mut self, node: usize, id: i32, spec: OpeningSpec) -> Option<Upsert> {
        let list = self.nodes.get_mut(node)?;
        if let Some(&slot) = list.by_id.get(&id) {
            if let Some(opening) = self.slots[slot].as_mut() {
                opening.spec = spec;
                opening.old_inflow = 0.0;
                opening.new_inflow = 0.0;
            }
            tracing::debug!(node, id, "opening replaced");
            return Some(Upsert::Replaced);
        }

        let opening = Opening {
            id,
            spec,
            coupling: CouplingType::NoCoupling,
            old_inflow: 0.0,
            new_inflow: 0.0,
        };
        let slot = match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(opening);
                slot
            }
            None => {
                self.slots.push(Some(opening));
                self.slots.len() - 1
            }
        };
        list.order.push(slot);
        list.by_id.insert(id, slot);
        tracing::debug!(node, id, slot, "opening created");
        Some(Upsert::Created)
    }

    /// Remove an opening; `None` if the node or the ID is unknown.
    pub fn remove(&mut self, node: usize, id: i32) -> Option<Opening> {
        let list = self.nodes.get_mut(node)?;
        let slot = list.by_id.remove(&id)?;
        list.order.retain(|&s| s != slot);
        let opening = self.slots[slot].take();
        self.free.push(slot);
        tracing::debug!(node, id, slot, "opening removed");
        opening
    }

    pub fn get(&self, node: usize, id: i32) -> Option<&Opening> {
        let slot = *self.nodes.get(node)?.by_id.get(&id)?;
        self.slots[slot].as_ref()
    }

    pub fn get_mut(&mut self, node: usize, id: i32) -> Option<&mut Opening> {
        let slot = *self.nodes.get(node)?.by_id.get(&id)?;
        self.slots[slot].as_mut()
    }

    /// Number of openings on a node (zero for an unknown node).
    pub fn count(&self, node: usize) -> usize {
        self.nodes.get(node).map_or(0, |list| list.order.len())
    }

    /// Openings of a node in insertion order.
    pub fn iter(&self, node: usize) -> impl Iterator<Item = &Opening> + '_ {
        self.nodes
            .get(node)
            .into_iter()
            .flat_map(|list| list.order.iter())
            .filter_map(|&slot| self.slots[slot].as_ref())
    }

    /// Opening IDs of a node in insertion order.
    pub fn ids(&self, node: usize) -> Vec<i32> {
        self.iter(node).map(|o| o.id).collect()
    }

    /// Whether any opening of the node is exchanging flow.
    pub fn is_node_coupled(&self, node: usize) -> bool {
        self.iter(node).any(|o| o.coupling.is_active())
    }

    /// Close an opening; returns false if it does not exist.
    pub fn close(&mut self, node: usize, id: i32) -> bool {
        match self.get_mut(node, id) {
            Some(opening) => {
                opening.coupling = CouplingType::Closed;
                opening.new_inflow = 0.0;
                true
            }
            None => false,
        }
    }

    /// Reopen an opening; the next exchange decides its coupling type.
    pub fn open(&mut self, node: usize, id: i32) -> bool {
        match self.get_mut(node, id) {
            Some(opening) => {
                if opening.coupling == CouplingType::Closed {
                    opening.coupling = CouplingType::NoCoupling;
                }
                true
            }
            None => false,
        }
    }

    /// Store the result of one exchange computed by the coupling solver.
    pub fn record_exchange(
        &mut self,
        node: usize,
        id: i32,
        coupling: CouplingType,
        inflow: f64,
    ) -> bool {
        match self.get_mut(node, id) {
            Some(opening) => {
                opening.coupling = coupling;
                opening.old_inflow = opening.new_inflow;
                opening.new_inflow = inflow;
                true
            }
            None => false,
        }
    }

    /// Sum of the latest inflows of a node's openings (cfs).
    pub fn node_inflow(&self, node: usize) -> f64 {
        self.iter(node).map(|o| o.new_inflow).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(area: f64) -> OpeningSpec {
        OpeningSpec {
            kind: 0,
            area,
            length: 4.0,
            coeff_orifice: 0.167,
            coeff_free_weir: 0.54,
            coeff_sub_weir: 0.056,
        }
    }

    #[test]
    fn create_then_replace_keeps_count() {
        let mut reg = OpeningRegistry::with_nodes(3);
        assert_eq!(reg.upsert(1, 7, spec(1.0)), Some(Upsert::Created));
        assert_eq!(reg.count(1), 1);
        assert_eq!(reg.upsert(1, 7, spec(2.0)), Some(Upsert::Replaced));
        assert_eq!(reg.count(1), 1);
        assert_eq!(reg.get(1, 7).unwrap().spec.area, 2.0);
    }

    #[test]
    fn insertion_order_is_preserved() {
        let mut reg = OpeningRegistry::with_nodes(1);
        for id in [30, -4, 12, 0] {
            reg.upsert(0, id, spec(1.0));
        }
        assert_eq!(reg.ids(0), vec![30, -4, 12, 0]);
        reg.remove(0, -4);
        assert_eq!(reg.ids(0), vec![30, 12, 0]);
        reg.upsert(0, 5, spec(1.0));
        assert_eq!(reg.ids(0), vec![30, 12, 0, 5]);
    }

    #[test]
    fn replace_keeps_position() {
        let mut reg = OpeningRegistry::with_nodes(1);
        reg.upsert(0, 1, spec(1.0));
        reg.upsert(0, 2, spec(1.0));
        reg.upsert(0, 1, spec(9.0));
        assert_eq!(reg.ids(0), vec![1, 2]);
    }

    #[test]
    fn ids_are_scoped_per_node() {
        let mut reg = OpeningRegistry::with_nodes(2);
        reg.upsert(0, 1, spec(1.0));
        reg.upsert(1, 1, spec(5.0));
        assert_eq!(reg.get(0, 1).unwrap().spec.area, 1.0);
        assert_eq!(reg.get(1, 1).unwrap().spec.area, 5.0);
        reg.remove(0, 1);
        assert!(reg.get(0, 1).is_none());
        assert!(reg.get(1, 1).is_some());
    }

    #[test]
    fn removing_absent_is_none() {
        let mut reg = OpeningRegistry::with_nodes(1);
        assert!(reg.remove(0, 99).is_none());
        assert!(reg.remove(5, 0).is_none());
        assert_eq!(reg.count(0), 0);
    }

    #[test]
    fn freed_slots_are_reused() {
        let mut reg = OpeningRegistry::with_nodes(2);
        reg.upsert(0, 1, spec(1.0));
        reg.upsert(0, 2, spec(1.0));
        reg.remove(0, 1);
        reg.upsert(1, 3, spec(1.0));
        assert_eq!(reg.slots.len(), 2);
        assert_eq!(reg.ids(1), vec![3]);
    }

    #[test]
    fn out_of_range_node_is_rejected() {
        let mut reg = OpeningRegistry::with_nodes(1);
        assert_eq!(reg.upsert(1, 0, spec(1.0)), None);
        assert_eq!(reg.count(1), 0);
        assert!(reg.ids(4).is_empty());
    }

    #[test]
    fn exchange_updates_flows_and_coupling_status() {
        let mut reg = OpeningRegistry::with_nodes(1);
        reg.upsert(0, 1, spec(1.0));
        reg.upsert(0, 2, spec(1.0));
        assert!(!reg.is_node_coupled(0));

        assert!(reg.record_exchange(0, 1, CouplingType::Orifice, 0.5));
        assert!(reg.record_exchange(0, 2, CouplingType::FreeWeir, -0.2));
        assert!(reg.is_node_coupled(0));
        assert!((reg.node_inflow(0) - 0.3).abs() < 1e-12);

        assert!(reg.record_exchange(0, 1, CouplingType::Orifice, 0.7));
        assert_eq!(reg.get(0, 1).unwrap().old_inflow, 0.5);
        assert!(!reg.record_exchange(0, 42, CouplingType::Orifice, 1.0));
    }

    #[test]
    fn close_and_reopen() {
        let mut reg = OpeningRegistry::with_nodes(1);
        reg.upsert(0, 1, spec(1.0));
        reg.record_exchange(0, 1, CouplingType::SubmergedWeir, 1.0);
        assert!(reg.close(0, 1));
        assert_eq!(reg.get(0, 1).unwrap().coupling, CouplingType::Closed);
        assert!(!reg.is_node_coupled(0));
        assert_eq!(reg.count(0), 1);
        assert!(reg.open(0, 1));
        assert_eq!(reg.get(0, 1).unwrap().coupling, CouplingType::NoCoupling);
        assert!(!reg.close(0, 2));
        assert!(!reg.open(0, 2));
    }
}
