//! Shared fixtures for unit tests.

use crate::simulation::Simulation;

const SAMPLE: &str = r##"
options:
  flow_units: CFS
  start: 2024-01-01T00:00:00
  end: 2024-01-01T12:00:00
gages:
  - id: RG1
subcatchments:
  - id: S1
    gage: RG1
    outlet: J1
    area: 2.0
    width: 100.0
    imperv: 0.4
    slope: 0.01
  - id: S2
    area: 1.0
    width: 50.0
nodes:
  - id: J1
    invert_elev: 10.0
    max_depth: 4.0
    surface_area: 12.566
  - id: J2
    invert_elev: 8.0
    max_depth: 4.0
  - id: OF1
    type: outfall
    invert_elev: 6.0
links:
  - id: C1
    from: J1
    to: J2
    inlet_loss: 0.5
  - id: C2
    from: J2
    to: OF1
pollutants:
  - id: TSS
    units: MG/L
  - id: FC
    units: "#/L"
"##;

/// The sample network, opened in US units.
pub(crate) fn open_sample() -> Simulation {
    let model = sw_model::from_yaml_str(SAMPLE)
        .expect("sample parses")
        .build()
        .expect("sample builds");
    let mut sim = Simulation::new();
    sim.open(model).expect("sample opens");
    sim
}

#[cfg(test)]
mod tests {
    use super::*;
    use sw_core::ObjectType;
    use sw_model::ConcUnits;

    #[test]
    fn sample_keeps_count_pollutant_units() {
        let def = sw_model::from_yaml_str(SAMPLE).unwrap();
        assert_eq!(def.pollutants.len(), 2);
        assert_eq!(def.pollutants[1].units, ConcUnits::Count);

        let sim = open_sample();
        assert_eq!(sim.count_objects(ObjectType::Node), Ok(3));
        assert_eq!(sim.count_objects(ObjectType::Pollutant), Ok(2));
    }
}
