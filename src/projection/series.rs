//! Selection-driven time-series queries feeding the chart panel.
//!
//! Chart sign convention is injection-into-bus positive for the bus view:
//! generator output counts positive, storage charge inflow (leaving the
//! bus) is negated, discharge outflow (entering it) stays raw, and line
//! flow is oriented by which end of the line the bus sits on. Load series
//! follow the document convention (negated magnitudes, raw signed values).

use thiserror::Error;

use crate::model::{NetworkSnapshot, value_at};

use super::graph::EntityKind;

/// Query failure: the selection references an id the snapshot does not
/// contain. Callers no-op the chart rather than render stale data.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("no {kind} with id `{id}` in the loaded network")]
    NotFound { kind: EntityKind, id: String },
}

/// One named chart series, one sample per timestep. `None` samples render
/// as gaps.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

/// Chart payload: x-axis labels plus one or more named series, all padded
/// to the timestep count.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub series: Vec<ChartSeries>,
}

/// Builds the chart payload for a selected entity.
///
/// # Errors
///
/// [`QueryError::NotFound`] when no entity of the given kind has this id.
pub fn time_series(
    snapshot: &NetworkSnapshot,
    id: &str,
    kind: EntityKind,
) -> Result<ChartData, QueryError> {
    let n = snapshot.timestep_count();
    let labels = snapshot.timesteps.iter().map(|t| t.display.clone()).collect();
    let not_found = || QueryError::NotFound {
        kind,
        id: id.to_string(),
    };

    let series = match kind {
        EntityKind::Generator => {
            let (_, generator) = snapshot.find_generator(id).ok_or_else(not_found)?;
            vec![sampled(&generator.id, &generator.outputs, n, false)]
        }
        EntityKind::Load => {
            let (_, load) = snapshot.find_load(id).ok_or_else(not_found)?;
            vec![sampled(&load.id, &load.consumptions, n, false)]
        }
        EntityKind::Storage => {
            let (_, unit) = snapshot.find_storage(id).ok_or_else(not_found)?;
            let consumptions = unit.consumptions.as_deref().unwrap_or(&[]);
            vec![
                sampled("charge inflow", &unit.charge_inflows, n, false),
                sampled("discharge outflow", &unit.discharge_outflows, n, true),
                sampled("consumption", consumptions, n, true),
            ]
        }
        EntityKind::Bus => bus_series(snapshot, id, n).ok_or_else(not_found)?,
    };

    Ok(ChartData { labels, series })
}

/// Stacked bus view: everything attached to the bus, one series each.
fn bus_series(snapshot: &NetworkSnapshot, id: &str, n: usize) -> Option<Vec<ChartSeries>> {
    use crate::model::LoadConvention;

    let bus = snapshot.buses.get(id)?;
    let mut series = Vec::new();

    for generator in bus.generators.values() {
        series.push(sampled(&generator.id, &generator.outputs, n, false));
    }

    let negate_loads = snapshot.load_convention == LoadConvention::Magnitude;
    for load in bus.loads.values() {
        series.push(sampled(&load.id, &load.consumptions, n, negate_loads));
    }

    for line in snapshot.transmission_lines.values() {
        if line.end_bus == bus.id {
            series.push(sampled(&line.id, &line.flows, n, false));
        } else if line.start_bus == bus.id {
            series.push(sampled(&line.id, &line.flows, n, true));
        }
    }

    for unit in bus.storage_units.values() {
        series.push(sampled(
            &format!("{} charge", unit.id),
            &unit.charge_inflows,
            n,
            true,
        ));
        series.push(sampled(
            &format!("{} discharge", unit.id),
            &unit.discharge_outflows,
            n,
            false,
        ));
    }

    Some(series)
}

/// Samples a sequence through the fail-soft accessor, one point per
/// timestep, optionally sign-flipped.
fn sampled(name: &str, seq: &[Option<f64>], n: usize, negate: bool) -> ChartSeries {
    let values = (0..n)
        .map(|t| value_at(seq, t).map(|v| if negate { -v } else { v }))
        .collect();
    ChartSeries {
        name: name.to_string(),
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> NetworkSnapshot {
        NetworkSnapshot::from_json_str(
            r#"{
                "network": {
                    "timesteps": [[0, "00:00"], [1, "01:00"]],
                    "buses": {
                        "B1": {
                            "generators": {"G1": {"outputs": [5.0, 7.0], "capacities": [10.0, 10.0]}},
                            "loads": {"L1": {"consumptions": [3.0, 4.0]}},
                            "storage_units": {
                                "S1": {
                                    "charge_inflows": [1.0, 0.0],
                                    "discharge_outflows": [0.0, 2.0],
                                    "consumptions": [0.5, 0.5]
                                }
                            }
                        },
                        "B2": {}
                    },
                    "transmission_lines": {
                        "T1": {"start_bus": "B1", "end_bus": "B2", "flows": [-2.5, 2.5], "capacities": [10.0, 10.0]}
                    }
                }
            }"#,
        )
        .expect("fixture should load")
    }

    #[test]
    fn generator_query_is_its_output() {
        let snap = fixture();
        let chart = time_series(&snap, "G1", EntityKind::Generator).expect("G1 exists");
        assert_eq!(chart.labels, vec!["00:00", "01:00"]);
        assert_eq!(chart.series.len(), 1);
        assert_eq!(chart.series[0].values, vec![Some(5.0), Some(7.0)]);
    }

    #[test]
    fn storage_query_has_three_signed_series() {
        let snap = fixture();
        let chart = time_series(&snap, "S1", EntityKind::Storage).expect("S1 exists");
        assert_eq!(chart.series.len(), 3);
        assert_eq!(chart.series[0].name, "charge inflow");
        assert_eq!(chart.series[0].values, vec![Some(1.0), Some(0.0)]);
        assert_eq!(chart.series[1].values, vec![Some(-0.0), Some(-2.0)]);
        assert_eq!(chart.series[2].values, vec![Some(-0.5), Some(-0.5)]);
    }

    #[test]
    fn bus_query_stacks_attachments() {
        let snap = fixture();
        let chart = time_series(&snap, "B1", EntityKind::Bus).expect("B1 exists");
        let names: Vec<&str> = chart.series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["G1", "L1", "T1", "S1 charge", "S1 discharge"]
        );
        // B1 is T1's start bus, so outbound flow is negated into the chart.
        assert_eq!(chart.series[2].values, vec![Some(2.5), Some(-2.5)]);
        // Signed-schema loads chart raw.
        assert_eq!(chart.series[1].values, vec![Some(3.0), Some(4.0)]);
        // Charge inflow leaves the bus; negated.
        assert_eq!(chart.series[3].values, vec![Some(-1.0), Some(-0.0)]);
    }

    #[test]
    fn line_orientation_at_the_end_bus_is_raw() {
        let snap = fixture();
        let chart = time_series(&snap, "B2", EntityKind::Bus).expect("B2 exists");
        assert_eq!(chart.series.len(), 1);
        assert_eq!(chart.series[0].name, "T1");
        assert_eq!(chart.series[0].values, vec![Some(-2.5), Some(2.5)]);
    }

    #[test]
    fn magnitude_loads_chart_negated() {
        let snap = NetworkSnapshot::from_json_str(
            r#"{
                "network": {
                    "timesteps": [[0, "00:00"]],
                    "buses": {"B1": {"loads": {"L1": {"consumption": [3.0]}}}}
                }
            }"#,
        )
        .expect("fixture should load");
        let chart = time_series(&snap, "B1", EntityKind::Bus).expect("B1 exists");
        assert_eq!(chart.series[0].values, vec![Some(-3.0)]);
    }

    #[test]
    fn unknown_id_is_not_found() {
        let snap = fixture();
        for kind in [
            EntityKind::Bus,
            EntityKind::Generator,
            EntityKind::Load,
            EntityKind::Storage,
        ] {
            let err = time_series(&snap, "nope", kind).unwrap_err();
            assert_eq!(
                err,
                QueryError::NotFound {
                    kind,
                    id: "nope".to_string()
                }
            );
        }
    }

    #[test]
    fn absent_storage_consumption_pads_with_unknowns() {
        let snap = NetworkSnapshot::from_json_str(
            r#"{
                "network": {
                    "timesteps": [[0, "00:00"], [1, "01:00"]],
                    "buses": {
                        "B1": {"storage_units": {"S1": {"charge_inflows": [1.0, 1.0]}}}
                    }
                }
            }"#,
        )
        .expect("fixture should load");
        let chart = time_series(&snap, "S1", EntityKind::Storage).expect("S1 exists");
        assert_eq!(chart.series[2].values, vec![None, None]);
    }
}
