//! Plain-text rendering of a projected view for CLI output.

use std::fmt::Write as _;

use crate::projection::GraphView;

/// Renders a view as an indented node/edge listing.
///
/// Multi-line node labels are joined with ` | ` so each element stays on
/// one terminal line. Output order is deterministic (id order).
pub fn render_text(view: &GraphView) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "timestep {}: {} nodes, {} edges",
        view.timestep,
        view.node_count(),
        view.edge_count()
    );

    let _ = writeln!(out, "nodes:");
    for node in view.nodes.values() {
        let label = node.label.replace('\n', " | ");
        let _ = writeln!(out, "  [{}] {label}", node.shape.as_str());
    }

    let _ = writeln!(out, "edges:");
    for edge in view.edges.values() {
        let _ = writeln!(out, "  {} -> {}  [{}]", edge.from, edge.to, edge.label);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NetworkSnapshot;
    use crate::projection::RenderSession;

    #[test]
    fn renders_nodes_and_edges() {
        let snap = NetworkSnapshot::from_json_str(
            r#"{
                "network": {
                    "timesteps": [[0, "00:00"]],
                    "buses": {
                        "B1": {"generators": {"G1": {"outputs": [5.0]}}}
                    }
                }
            }"#,
        )
        .expect("fixture should load");
        let mut session = RenderSession::new();
        let view = session.build_initial(&snap, 0);

        let text = render_text(view);
        assert!(text.contains("timestep 0"));
        assert!(text.contains("G1 -> B1  [5.00]"));
    }

    #[test]
    fn empty_view_renders_without_panicking() {
        let snap = NetworkSnapshot::empty();
        let mut session = RenderSession::new();
        let text = render_text(session.build_initial(&snap, 0));
        assert!(text.contains("0 nodes, 0 edges"));
    }
}
