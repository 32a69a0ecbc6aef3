//! Shared test fixtures for integration tests.

use gridviz::model::NetworkSnapshot;

/// A two-bus current-schema document exercising every entity kind:
/// generator, load, storage unit with a consumption sink, and a
/// transmission line whose flow reverses between timesteps.
pub const TWO_BUS_DOC: &str = r#"{
    "network": {
        "name": "two-bus",
        "timesteps": [[0, "2030-01-01 00:00"], [1, "2030-01-01 01:00"]],
        "buses": {
            "B1": {
                "nodal_prices": [25.0, 30.0],
                "generators": {
                    "G1": {"outputs": [5.0, 7.0], "capacities": [10.0, 10.0], "costs": [12.0, 12.0]}
                },
                "loads": {
                    "L1": {"consumptions": [3.0, 4.0]}
                },
                "storage_units": {
                    "S1": {
                        "soc_start_of_ts": [2.0, 3.0],
                        "soc_end_of_ts": [3.0, 2.0],
                        "charge_inflows": [1.0, 0.0],
                        "discharge_outflows": [0.0, 2.0],
                        "consumptions": [0.5, 0.5],
                        "max_soc_capacity": 8.0
                    }
                }
            },
            "B2": {
                "loads": {"L2": {"consumptions": [2.0, 1.0]}}
            }
        },
        "transmission_lines": {
            "T1": {"start_bus": "B1", "end_bus": "B2", "flows": [2.0, -2.5], "capacities": [10.0, 10.0]}
        }
    }
}"#;

/// Loads the two-bus fixture.
pub fn two_bus_snapshot() -> NetworkSnapshot {
    NetworkSnapshot::from_json_str(TWO_BUS_DOC).expect("fixture should load")
}
