//! Build the fixed-size object tables from a model definition.

use std::collections::HashMap;

use sw_core::{ObjectType, Quantity, UnitConverter};

use crate::error::{ModelError, ModelResult};
use crate::objects::{
    ConcUnits, Gage, Link, LinkType, NamedObject, Node, NodeType, Outfall, Pollutant,
    StorageCurve, SubcatchOutlet, Subcatchment,
};
use crate::openings::OpeningRegistry;
use crate::options::{SimOptions, default_start};
use crate::schema::{GageDef, LinkDef, ModelDef, NodeDef, OptionsDef, SubcatchmentDef};
use crate::tables::ObjectTables;

/// Everything the toolkit holds while a project is open.
#[derive(Debug, Clone)]
pub struct Model {
    pub options: SimOptions,
    pub tables: ObjectTables,
    pub openings: OpeningRegistry,
}

impl Model {
    /// Wrap prebuilt tables, creating one empty opening list per node.
    pub fn new(options: SimOptions, tables: ObjectTables) -> Self {
        let openings = OpeningRegistry::with_nodes(tables.nodes.len());
        Self {
            options,
            tables,
            openings,
        }
    }
}

impl ModelDef {
    /// Validate the definition and convert it to internal units.
    pub fn build(&self) -> ModelResult<Model> {
        let options = build_options(&self.options)?;
        let units = options.units;

        let node_ids = index_ids("node", self.nodes.iter().map(|n| n.id.as_str()))?;
        let gage_ids = index_ids("gage", self.gages.iter().map(|g| g.id.as_str()))?;
        let subcatch_ids = index_ids(
            "subcatchment",
            self.subcatchments.iter().map(|s| s.id.as_str()),
        )?;
        index_ids("link", self.links.iter().map(|l| l.id.as_str()))?;
        index_ids("pollutant", self.pollutants.iter().map(|p| p.id.as_str()))?;

        let gages = self
            .gages
            .iter()
            .map(|def| build_gage(def, &units))
            .collect::<ModelResult<Vec<_>>>()?;
        let nodes = self
            .nodes
            .iter()
            .map(|def| build_node(def, &units))
            .collect::<ModelResult<Vec<_>>>()?;
        let subcatchments = self
            .subcatchments
            .iter()
            .map(|def| build_subcatchment(def, &units, &node_ids, &subcatch_ids, &gage_ids))
            .collect::<ModelResult<Vec<_>>>()?;
        let links = self
            .links
            .iter()
            .map(|def| build_link(def, &units, &node_ids, &nodes))
            .collect::<ModelResult<Vec<_>>>()?;
        let pollutants = self
            .pollutants
            .iter()
            .map(|def| Pollutant {
                id: def.id.clone(),
                units: def.units,
                mcf: mass_factor(def.units, &units),
            })
            .collect();

        let tables = ObjectTables {
            gages,
            subcatchments,
            nodes,
            links,
            pollutants,
            landuses: named("landuse", &self.landuses)?,
            patterns: named("time pattern", &self.patterns)?,
            curves: named("curve", &self.curves)?,
            timeseries: named("time series", &self.timeseries)?,
            controls: named("control rule", &self.controls)?,
            transects: named("transect", &self.transects)?,
            aquifers: named("aquifer", &self.aquifers)?,
            unit_hydrographs: named("unit hydrograph", &self.unit_hydrographs)?,
            snowmelts: named("snowmelt", &self.snowmelts)?,
            shapes: Vec::new(),
            lids: Vec::new(),
        };

        tracing::debug!(
            nodes = tables.count(ObjectType::Node),
            links = tables.count(ObjectType::Link),
            subcatchments = tables.count(ObjectType::Subcatchment),
            "model built"
        );
        Ok(Model::new(options, tables))
    }
}

fn build_options(def: &OptionsDef) -> ModelResult<SimOptions> {
    let units = UnitConverter::from_flow_units(def.flow_units);
    let start = def.start.unwrap_or_else(default_start);
    let end = def.end.unwrap_or(start);
    if end < start {
        return Err(ModelError::Invalid {
            what: format!("end {end} precedes start {start}"),
        });
    }

    let mut settings = def.settings;
    settings.min_surf_area = units.to_internal(Quantity::Area, settings.min_surf_area);
    settings.head_tol = units.to_internal(Quantity::Length, settings.head_tol);

    let mut options = SimOptions {
        units,
        start,
        end,
        report_start: def.report_start.unwrap_or(start),
        total_duration_ms: 0.0,
        analysis: def.analysis,
        settings,
        report_controls: def.report_controls,
    };
    options.recompute_duration();
    Ok(options)
}

fn build_gage(def: &GageDef, units: &UnitConverter) -> ModelResult<Gage> {
    let mut gage = Gage::new(def.id.clone());
    gage.source = def.source;
    gage.snow_factor = physical("snow factor", &def.id, def.snow_factor)?;
    gage.rainfall = units.to_internal(
        Quantity::Rainfall,
        physical("rainfall", &def.id, def.rainfall)?,
    );
    Ok(gage)
}

fn build_node(def: &NodeDef, units: &UnitConverter) -> ModelResult<Node> {
    let id = def.id.as_str();
    let len = |what, v| {
        Ok::<_, ModelError>(units.to_internal(Quantity::Length, finite(what, id, v)?))
    };
    let depth = |what, v| {
        Ok::<_, ModelError>(units.to_internal(Quantity::Length, physical(what, id, v)?))
    };
    let area = |what, v| {
        Ok::<_, ModelError>(units.to_internal(Quantity::Area, physical(what, id, v)?))
    };

    let mut node = Node::new(id, def.node_type);
    node.invert_elev = len("invert elevation", def.invert_elev)?;
    node.full_depth = depth("max depth", def.max_depth)?;
    node.sur_depth = len("surcharge depth", def.sur_depth)?;
    node.ponded_area = area("ponded area", def.ponded_area)?;
    node.init_depth = depth("initial depth", def.init_depth)?;
    node.surface_area = area("surface area", def.surface_area)?;
    node.coupling_area = area("coupling area", def.coupling_area)?;

    if let Some(outfall) = &def.outfall {
        if def.node_type != NodeType::Outfall {
            return Err(ModelError::Invalid {
                what: format!("node '{id}' has outfall data but is not an outfall"),
            });
        }
        node.outfall = Some(Outfall {
            boundary: outfall.boundary,
            stage: len("outfall stage", outfall.stage)?,
        });
    }

    if let Some(curve) = def.storage {
        if def.node_type != NodeType::Storage {
            return Err(ModelError::Invalid {
                what: format!("node '{id}' has a storage curve but is not a storage unit"),
            });
        }
        // area_disp = a * d_disp^b + c with d_disp = L * d and area = area_disp / L²
        let l = units.factor(Quantity::Length);
        let b = finite("storage exponent", id, curve.b)?;
        // the volume integral a/(b+1) d^(b+1) needs b > -1
        if b <= -1.0 {
            return Err(ModelError::NonPhysical {
                what: "storage exponent",
                owner: id.to_string(),
                value: b,
            });
        }
        node.storage = Some(StorageCurve {
            a: physical("storage coefficient", id, curve.a)? * l.powf(b) / (l * l),
            b,
            c: physical("storage constant", id, curve.c)? / (l * l),
        });
    }

    node.refresh_full_volume();
    Ok(node)
}

fn build_subcatchment(
    def: &SubcatchmentDef,
    units: &UnitConverter,
    node_ids: &HashMap<&str, usize>,
    subcatch_ids: &HashMap<&str, usize>,
    gage_ids: &HashMap<&str, usize>,
) -> ModelResult<Subcatchment> {
    let id = def.id.as_str();
    let mut sub = Subcatchment::new(id);

    sub.gage = match &def.gage {
        Some(g) => Some(*gage_ids.get(g.as_str()).ok_or_else(|| ModelError::UnknownRef {
            what: "subcatchment",
            owner: def.id.clone(),
            target: "gage",
            id: g.clone(),
        })?),
        None => None,
    };

    sub.outlet = match def.outlet.as_deref() {
        None => SubcatchOutlet::Itself,
        Some(out) if out == id => SubcatchOutlet::Itself,
        Some(out) => {
            if let Some(&j) = node_ids.get(out) {
                SubcatchOutlet::Node(j)
            } else if let Some(&k) = subcatch_ids.get(out) {
                SubcatchOutlet::Subcatchment(k)
            } else {
                return Err(ModelError::UnknownRef {
                    what: "subcatchment",
                    owner: def.id.clone(),
                    target: "outlet",
                    id: out.to_string(),
                });
            }
        }
    };

    sub.area = units.to_internal(Quantity::LandArea, physical("area", id, def.area)?);
    sub.width = units.to_internal(Quantity::Length, physical("width", id, def.width)?);
    let curb_length = physical("curb length", id, def.curb_length)?;
    sub.curb_length = units.to_internal(Quantity::Length, curb_length);
    sub.slope = physical("slope", id, def.slope)?;
    let imperv = physical("impervious fraction", id, def.imperv)?;
    if imperv > 1.0 {
        return Err(ModelError::NonPhysical {
            what: "impervious fraction",
            owner: def.id.clone(),
            value: imperv,
        });
    }
    sub.frac_imperv = imperv;
    Ok(sub)
}

fn build_link(
    def: &LinkDef,
    units: &UnitConverter,
    node_ids: &HashMap<&str, usize>,
    nodes: &[Node],
) -> ModelResult<Link> {
    let id = def.id.as_str();
    let lookup = |node: &str| {
        node_ids
            .get(node)
            .copied()
            .ok_or_else(|| ModelError::UnknownRef {
                what: "link",
                owner: def.id.clone(),
                target: "node",
                id: node.to_string(),
            })
    };
    let n1 = lookup(&def.from)?;
    let n2 = lookup(&def.to)?;

    let mut link = Link::new(id, def.link_type, n1, n2);
    link.offset1 = units.to_internal(Quantity::Length, finite("inlet offset", id, def.offset1)?);
    link.offset2 = units.to_internal(Quantity::Length, finite("outlet offset", id, def.offset2)?);
    link.q0 = units.to_internal(Quantity::Flow, finite("initial flow", id, def.init_flow)?);
    link.q_limit = units.to_internal(Quantity::Flow, physical("max flow", id, def.max_flow)?);
    link.c_loss_inlet = physical("inlet loss", id, def.inlet_loss)?;
    link.c_loss_outlet = physical("outlet loss", id, def.outlet_loss)?;
    link.c_loss_avg = physical("average loss", id, def.avg_loss)?;

    // An adverse conduit runs from its lower end: swap ends and flag it.
    if link.link_type == LinkType::Conduit {
        let z1 = nodes[n1].invert_elev + link.offset1;
        let z2 = nodes[n2].invert_elev + link.offset2;
        if z1 < z2 {
            std::mem::swap(&mut link.node1, &mut link.node2);
            std::mem::swap(&mut link.offset1, &mut link.offset2);
            std::mem::swap(&mut link.c_loss_inlet, &mut link.c_loss_outlet);
            link.q0 = -link.q0;
            link.direction = -1;
        }
    }
    Ok(link)
}

fn mass_factor(conc: ConcUnits, units: &UnitConverter) -> f64 {
    match conc {
        ConcUnits::MgPerL => units.factor(Quantity::Mass),
        ConcUnits::UgPerL => units.factor(Quantity::Mass) / 1000.0,
        ConcUnits::Count => 1.0,
    }
}

fn index_ids<'a>(
    what: &'static str,
    ids: impl Iterator<Item = &'a str>,
) -> ModelResult<HashMap<&'a str, usize>> {
    let mut map = HashMap::new();
    for (i, id) in ids.enumerate() {
        if map.insert(id, i).is_some() {
            return Err(ModelError::DuplicateId {
                what,
                id: id.to_string(),
            });
        }
    }
    Ok(map)
}

fn named(what: &'static str, ids: &[String]) -> ModelResult<Vec<NamedObject>> {
    index_ids(what, ids.iter().map(String::as_str))?;
    Ok(ids.iter().map(|id| NamedObject { id: id.clone() }).collect())
}

fn finite(what: &'static str, owner: &str, value: f64) -> ModelResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ModelError::NonFinite {
            what,
            owner: owner.to_string(),
            value,
        })
    }
}

fn physical(what: &'static str, owner: &str, value: f64) -> ModelResult<f64> {
    let value = finite(what, owner, value)?;
    if value < 0.0 {
        return Err(ModelError::NonPhysical {
            what,
            owner: owner.to_string(),
            value,
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{LinkDef, NodeDef, StorageCurveDef, SubcatchmentDef};
    use sw_core::FlowUnits;

    fn node(id: &str, invert: f64) -> NodeDef {
        NodeDef {
            id: id.into(),
            node_type: NodeType::Junction,
            invert_elev: invert,
            max_depth: 4.0,
            sur_depth: 0.0,
            ponded_area: 0.0,
            init_depth: 0.0,
            surface_area: 10.0,
            coupling_area: 0.0,
            outfall: None,
            storage: None,
        }
    }

    fn conduit(id: &str, from: &str, to: &str) -> LinkDef {
        LinkDef {
            id: id.into(),
            link_type: LinkType::Conduit,
            from: from.into(),
            to: to.into(),
            offset1: 0.0,
            offset2: 0.0,
            init_flow: 0.0,
            max_flow: 0.0,
            inlet_loss: 0.1,
            outlet_loss: 0.2,
            avg_loss: 0.0,
        }
    }

    #[test]
    fn duplicate_node_ids_rejected() {
        let def = ModelDef {
            nodes: vec![node("J1", 0.0), node("J1", 1.0)],
            ..ModelDef::default()
        };
        assert!(matches!(def.build(), Err(ModelError::DuplicateId { .. })));
    }

    #[test]
    fn unknown_link_endpoint_rejected() {
        let def = ModelDef {
            nodes: vec![node("J1", 0.0)],
            links: vec![conduit("C1", "J1", "J9")],
            ..ModelDef::default()
        };
        assert!(matches!(def.build(), Err(ModelError::UnknownRef { .. })));
    }

    #[test]
    fn adverse_conduit_is_reversed() {
        let def = ModelDef {
            nodes: vec![node("low", 0.0), node("high", 5.0)],
            links: vec![conduit("C1", "low", "high")],
            ..ModelDef::default()
        };
        let model = def.build().unwrap();
        let link = &model.tables.links[0];
        assert_eq!(link.direction, -1);
        assert_eq!((link.node1, link.node2), (1, 0));
        assert_eq!(link.c_loss_inlet, 0.2);
    }

    #[test]
    fn si_values_are_stored_internally() {
        let mut def = ModelDef {
            nodes: vec![node("J1", 3.048)],
            ..ModelDef::default()
        };
        def.options.flow_units = FlowUnits::Cms;
        let model = def.build().unwrap();
        let j = &model.tables.nodes[0];
        assert!((j.invert_elev - 10.0).abs() < 1e-9);
        assert!(j.full_volume > 0.0);
        assert_eq!(model.openings.node_count(), 1);
    }

    #[test]
    fn subcatchment_outlets_resolve() {
        let sub = |id: &str, outlet: Option<&str>| SubcatchmentDef {
            id: id.into(),
            gage: None,
            outlet: outlet.map(String::from),
            area: 1.0,
            width: 100.0,
            imperv: 0.5,
            slope: 0.01,
            curb_length: 0.0,
        };
        let def = ModelDef {
            nodes: vec![node("J1", 0.0)],
            subcatchments: vec![sub("S1", Some("J1")), sub("S2", Some("S1")), sub("S3", None)],
            ..ModelDef::default()
        };
        let model = def.build().unwrap();
        let subs = &model.tables.subcatchments;
        assert_eq!(subs[0].outlet, SubcatchOutlet::Node(0));
        assert_eq!(subs[1].outlet, SubcatchOutlet::Subcatchment(0));
        assert_eq!(subs[2].outlet, SubcatchOutlet::Itself);
    }

    #[test]
    fn storage_curve_converted_to_internal() {
        let mut def = ModelDef {
            nodes: vec![NodeDef {
                node_type: NodeType::Storage,
                storage: Some(StorageCurveDef {
                    a: 0.0,
                    b: 0.0,
                    c: 100.0,
                }),
                ..node("SU1", 0.0)
            }],
            ..ModelDef::default()
        };
        def.options.flow_units = FlowUnits::Cms;
        let model = def.build().unwrap();
        let su = &model.tables.nodes[0];
        // 100 m² over 4 m -> 400 m³
        let vol_m3 = su.full_volume * 0.02832;
        assert!((vol_m3 - 400.0).abs() / 400.0 < 2e-3);
    }

    #[test]
    fn negative_area_rejected() {
        let mut bad = node("J1", 0.0);
        bad.surface_area = -1.0;
        let def = ModelDef {
            nodes: vec![bad],
            ..ModelDef::default()
        };
        assert!(matches!(def.build(), Err(ModelError::NonPhysical { .. })));
    }

    #[test]
    fn storage_exponent_must_exceed_minus_one() {
        let storage = |b| ModelDef {
            nodes: vec![NodeDef {
                node_type: NodeType::Storage,
                storage: Some(StorageCurveDef {
                    a: 10.0,
                    b,
                    c: 0.0,
                }),
                ..node("SU1", 0.0)
            }],
            ..ModelDef::default()
        };
        for b in [-1.0, -2.5] {
            assert!(matches!(
                storage(b).build(),
                Err(ModelError::NonPhysical {
                    what: "storage exponent",
                    ..
                })
            ));
        }
        let model = storage(-0.5).build().unwrap();
        assert!(model.tables.nodes[0].full_volume.is_finite());
    }
}
