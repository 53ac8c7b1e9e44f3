//! Fixed-size object tables, one homogeneous container per object type.

use sw_core::ObjectType;

use crate::objects::{Gage, Link, NamedObject, Node, Pollutant, Subcatchment};

/// The object model of one open project.
///
/// Table sizes are fixed when the tables are built and never change while
/// the project is open.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectTables {
    pub gages: Vec<Gage>,
    pub subcatchments: Vec<Subcatchment>,
    pub nodes: Vec<Node>,
    pub links: Vec<Link>,
    pub pollutants: Vec<Pollutant>,
    pub landuses: Vec<NamedObject>,
    pub patterns: Vec<NamedObject>,
    pub curves: Vec<NamedObject>,
    pub timeseries: Vec<NamedObject>,
    pub controls: Vec<NamedObject>,
    pub transects: Vec<NamedObject>,
    pub aquifers: Vec<NamedObject>,
    pub unit_hydrographs: Vec<NamedObject>,
    pub snowmelts: Vec<NamedObject>,
    pub shapes: Vec<NamedObject>,
    pub lids: Vec<NamedObject>,
}

impl ObjectTables {
    /// Number of objects of a type.
    pub fn count(&self, kind: ObjectType) -> usize {
        match kind {
            ObjectType::Gage => self.gages.len(),
            ObjectType::Subcatchment => self.subcatchments.len(),
            ObjectType::Node => self.nodes.len(),
            ObjectType::Link => self.links.len(),
            ObjectType::Pollutant => self.pollutants.len(),
            other => self.named(other).len(),
        }
    }

    /// String ID of an object, or `None` if the index is out of range.
    pub fn id(&self, kind: ObjectType, index: usize) -> Option<&str> {
        match kind {
            ObjectType::Gage => self.gages.get(index).map(|o| o.id.as_str()),
            ObjectType::Subcatchment => self.subcatchments.get(index).map(|o| o.id.as_str()),
            ObjectType::Node => self.nodes.get(index).map(|o| o.id.as_str()),
            ObjectType::Link => self.links.get(index).map(|o| o.id.as_str()),
            ObjectType::Pollutant => self.pollutants.get(index).map(|o| o.id.as_str()),
            other => self.named(other).get(index).map(|o| o.id.as_str()),
        }
    }

    /// Index of an object by string ID.
    pub fn find(&self, kind: ObjectType, id: &str) -> Option<usize> {
        (0..self.count(kind)).find(|&i| self.id(kind, i) == Some(id))
    }

    fn named(&self, kind: ObjectType) -> &[NamedObject] {
        match kind {
            ObjectType::Landuse => &self.landuses,
            ObjectType::TimePattern => &self.patterns,
            ObjectType::Curve => &self.curves,
            ObjectType::TimeSeries => &self.timeseries,
            ObjectType::Control => &self.controls,
            ObjectType::Transect => &self.transects,
            ObjectType::Aquifer => &self.aquifers,
            ObjectType::UnitHydrograph => &self.unit_hydrographs,
            ObjectType::Snowmelt => &self.snowmelts,
            ObjectType::Shape => &self.shapes,
            ObjectType::Lid => &self.lids,
            ObjectType::Gage
            | ObjectType::Subcatchment
            | ObjectType::Node
            | ObjectType::Link
            | ObjectType::Pollutant => &[],
        }
    }
}
