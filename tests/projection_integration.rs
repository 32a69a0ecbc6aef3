//! End-to-end projection tests: document in, graph views and patches out.

mod common;

use gridviz::model::{LoadError, NetworkSnapshot};
use gridviz::projection::{GraphPatch, RenderSession};
use gridviz::render::render_text;

#[test]
fn full_document_projects_every_entity() {
    let snap = common::two_bus_snapshot();
    let mut session = RenderSession::new();
    let view = session.build_initial(&snap, 0);

    // 2 buses + 1 generator + 2 loads + 1 storage + 1 sink
    assert_eq!(view.node_count(), 7);
    // 1 generator + 2 loads + 1 storage + 1 sink + 1 line
    assert_eq!(view.edge_count(), 6);

    assert_eq!(view.edges["G1"].label, "5.00");
    assert_eq!(view.edges["T1"].label, "2.00 / 10.00");
    assert_eq!(view.edges["T1"].from, "B1");
    // Net inflow 1.0 − 0.0 charges the unit.
    assert_eq!(view.edges["S1"].from, "B1");
    assert_eq!(view.edges["S1"].label, "1.00");
}

#[test]
fn scrubbing_forward_flips_direction_and_relabels() {
    let snap = common::two_bus_snapshot();
    let mut session = RenderSession::new();
    session.build_initial(&snap, 0);

    let patch = session.update(&snap, 1).expect("session is built");
    assert!(!patch.is_empty());

    let view = session.view().expect("session is built");
    // Flow went negative: edge reverses, magnitude stays positive.
    assert_eq!(view.edges["T1"].from, "B2");
    assert_eq!(view.edges["T1"].to, "B1");
    assert_eq!(view.edges["T1"].label, "2.50 / 10.00");
    // Net inflow 0.0 − 2.0 discharges the unit.
    assert_eq!(view.edges["S1"].from, "S1");
    assert_eq!(view.edges["S1"].label, "2.00");
    assert_eq!(view.edges["G1"].label, "7.00");
}

#[test]
fn patch_only_carries_changed_elements() {
    let snap = common::two_bus_snapshot();
    let mut session = RenderSession::new();
    session.build_initial(&snap, 0);
    let patch = session.update(&snap, 1).expect("session is built");

    // The sink consumption is 0.5 at both timesteps, so neither its node
    // nor its edge appears in the patch.
    assert!(patch.nodes.iter().all(|n| n.id != "S1_consumption"));
    assert!(patch.edges.iter().all(|e| e.id != "S1_consumption"));

    let t1 = patch
        .edges
        .iter()
        .find(|e| e.id == "T1")
        .expect("T1 changed");
    assert_eq!(t1.from, "B2");
}

#[test]
fn update_round_trip_matches_fresh_build() {
    let snap = common::two_bus_snapshot();

    let mut incremental = RenderSession::new();
    incremental.build_initial(&snap, 0);
    incremental.update(&snap, 1).expect("session is built");
    incremental.update(&snap, 0).expect("session is built");

    let mut fresh = RenderSession::new();
    fresh.build_initial(&snap, 0);

    assert_eq!(incremental.view(), fresh.view());
}

#[test]
fn missing_buses_falls_back_to_empty_render() {
    let err = NetworkSnapshot::from_json_str(r#"{"network": {"timesteps": []}}"#).unwrap_err();
    assert!(matches!(err, LoadError::MissingBuses));

    // The caller's fallback path: empty network, zero nodes, zero edges,
    // and a render that does not panic.
    let snap = NetworkSnapshot::empty();
    let mut session = RenderSession::new();
    let view = session.build_initial(&snap, 0);
    assert_eq!(view.node_count(), 0);
    assert_eq!(view.edge_count(), 0);
    assert!(render_text(view).contains("0 nodes, 0 edges"));

    let patch = session.update(&snap, 3).expect("session is built");
    assert_eq!(patch, GraphPatch { timestep: 3, ..GraphPatch::default() });
}

#[test]
fn legacy_document_projects_with_magnitude_loads() {
    let snap = NetworkSnapshot::from_json_str(
        r#"{
            "network": {
                "timesteps": [[0, "00:00"]],
                "buses": {
                    "B1": {
                        "generators": {"G1": {"output": [4.0], "capacity": [6.0]}},
                        "loads": {"L1": {"consumption": [4.0]}}
                    }
                },
                "transmission_lines": {}
            }
        }"#,
    )
    .expect("legacy document should load");

    let mut session = RenderSession::new();
    let view = session.build_initial(&snap, 0);
    assert_eq!(view.edges["G1"].label, "4.00");
    assert_eq!(view.edges["L1"].from, "B1");
    assert_eq!(view.edges["L1"].to, "L1");
}
