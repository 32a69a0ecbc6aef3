//! Viewer application state.

use tracing::warn;

use crate::model::NetworkSnapshot;
use crate::projection::{ChartData, EntityKind, RenderSession, time_series};

/// One selectable element of the rendered graph. Nodes carry their chart
/// kind; transmission-line edges have none (their flow charts on the bus).
#[derive(Debug, Clone)]
pub struct Selectable {
    pub id: String,
    pub kind: Option<EntityKind>,
    pub is_edge: bool,
}

/// Open popup chart panel.
pub struct Popup {
    pub title: String,
    pub chart: ChartData,
}

/// TUI application state.
pub struct App {
    /// The loaded dataset.
    pub snapshot: NetworkSnapshot,
    /// Graph session backing the main panel.
    session: RenderSession,
    /// Current slider position.
    pub timestep: usize,
    /// Slider range: the shared time axis length (min 1 so an empty
    /// network still renders a slider).
    pub total_steps: usize,
    /// Selection order: nodes first, then line edges.
    pub elements: Vec<Selectable>,
    /// Index into `elements`.
    pub selected: usize,
    /// Open chart popup, if any.
    pub popup: Option<Popup>,
    /// One-line status message shown in the footer.
    pub status: Option<String>,
    /// Whether the user has requested quit.
    pub quit: bool,
}

impl App {
    /// Builds the viewer state and performs the initial graph build.
    pub fn new(snapshot: NetworkSnapshot, start_timestep: usize) -> Self {
        let total_steps = snapshot.timestep_count().max(1);
        let timestep = start_timestep.min(total_steps - 1);

        let mut session = RenderSession::new();
        let view = session.build_initial(&snapshot, timestep);

        let mut elements: Vec<Selectable> = view
            .nodes
            .values()
            .map(|n| Selectable {
                id: n.id.clone(),
                kind: Some(n.kind),
                is_edge: false,
            })
            .collect();
        elements.extend(
            view.edges
                .values()
                .filter(|e| !view.nodes.contains_key(&e.id))
                .map(|e| Selectable {
                    id: e.id.clone(),
                    kind: None,
                    is_edge: true,
                }),
        );

        Self {
            snapshot,
            session,
            timestep,
            total_steps,
            elements,
            selected: 0,
            popup: None,
            status: None,
            quit: false,
        }
    }

    /// The live graph view. Built in `new` and never disposed while the
    /// viewer runs, so this always yields a view.
    pub fn view(&self) -> &crate::projection::GraphView {
        self.session.view().expect("view built at startup")
    }

    /// Moves the slider and re-projects incrementally.
    pub fn set_timestep(&mut self, t: usize) {
        let t = t.min(self.total_steps - 1);
        if t == self.timestep {
            return;
        }
        self.timestep = t;
        if self.session.update(&self.snapshot, t).is_err() {
            // Unreachable after the build in `new`; rebuild defensively.
            self.session.build_initial(&self.snapshot, t);
        }
        self.status = None;
    }

    pub fn step_forward(&mut self) {
        self.set_timestep(self.timestep.saturating_add(1));
    }

    pub fn step_back(&mut self) {
        self.set_timestep(self.timestep.saturating_sub(1));
    }

    pub fn jump_start(&mut self) {
        self.set_timestep(0);
    }

    pub fn jump_end(&mut self) {
        self.set_timestep(self.total_steps - 1);
    }

    pub fn select_next(&mut self) {
        if !self.elements.is_empty() {
            self.selected = (self.selected + 1) % self.elements.len();
        }
    }

    pub fn select_prev(&mut self) {
        if !self.elements.is_empty() {
            self.selected = self.selected.checked_sub(1).unwrap_or(self.elements.len() - 1);
        }
    }

    /// Opens the chart popup for the current selection. Elements without a
    /// chart kind, and ids the snapshot no longer resolves, no-op with a
    /// footer message instead of rendering a stale chart.
    pub fn open_chart(&mut self) {
        let Some(element) = self.elements.get(self.selected) else {
            return;
        };
        let Some(kind) = element.kind else {
            self.status = Some(format!("no chart for edge `{}`", element.id));
            return;
        };
        match time_series(&self.snapshot, &element.id, kind) {
            Ok(chart) => {
                self.popup = Some(Popup {
                    title: format!("{kind} {}", element.id),
                    chart,
                });
                self.status = None;
            }
            Err(err) => {
                warn!(%err, "chart query failed");
                self.status = Some(err.to_string());
            }
        }
    }

    pub fn close_popup(&mut self) {
        self.popup = None;
    }

    /// Display timestamp for the current slider position.
    pub fn timestep_display(&self) -> &str {
        self.snapshot
            .timesteps
            .get(self.timestep)
            .map_or("-", |ts| ts.display.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> NetworkSnapshot {
        NetworkSnapshot::from_json_str(
            r#"{
                "network": {
                    "timesteps": [[0, "00:00"], [1, "01:00"], [2, "02:00"]],
                    "buses": {
                        "B1": {
                            "generators": {"G1": {"outputs": [5.0, 7.0, 6.0]}},
                            "loads": {"L1": {"consumptions": [3.0, 4.0, 2.0]}}
                        },
                        "B2": {}
                    },
                    "transmission_lines": {
                        "T1": {"start_bus": "B1", "end_bus": "B2", "flows": [1.0, -1.0, 0.0]}
                    }
                }
            }"#,
        )
        .expect("fixture should load")
    }

    #[test]
    fn slider_clamps_to_time_axis() {
        let mut app = App::new(fixture(), 0);
        app.jump_end();
        assert_eq!(app.timestep, 2);
        app.step_forward();
        assert_eq!(app.timestep, 2);
        app.jump_start();
        app.step_back();
        assert_eq!(app.timestep, 0);
    }

    #[test]
    fn scrubbing_relabels_the_view() {
        let mut app = App::new(fixture(), 0);
        assert_eq!(app.view().edges["G1"].label, "5.00");
        app.step_forward();
        assert_eq!(app.view().edges["G1"].label, "7.00");
    }

    #[test]
    fn selection_wraps_both_ways() {
        let mut app = App::new(fixture(), 0);
        let count = app.elements.len();
        assert_eq!(count, 5); // B1, B2, G1, L1 nodes + T1 edge
        app.select_prev();
        assert_eq!(app.selected, count - 1);
        app.select_next();
        assert_eq!(app.selected, 0);
    }

    #[test]
    fn chart_opens_for_chartable_selection() {
        let mut app = App::new(fixture(), 0);
        let g1 = app
            .elements
            .iter()
            .position(|e| e.id == "G1")
            .expect("G1 selectable");
        app.selected = g1;
        app.open_chart();
        let popup = app.popup.as_ref().expect("popup open");
        assert_eq!(popup.title, "generator G1");
        assert_eq!(popup.chart.series.len(), 1);
    }

    #[test]
    fn line_edge_selection_no_ops_with_status() {
        let mut app = App::new(fixture(), 0);
        let t1 = app
            .elements
            .iter()
            .position(|e| e.id == "T1")
            .expect("T1 selectable");
        app.selected = t1;
        app.open_chart();
        assert!(app.popup.is_none());
        assert!(app.status.as_deref().unwrap_or("").contains("T1"));
    }

    #[test]
    fn empty_snapshot_still_constructs() {
        let app = App::new(NetworkSnapshot::empty(), 5);
        assert_eq!(app.timestep, 0);
        assert_eq!(app.total_steps, 1);
        assert!(app.elements.is_empty());
    }
}
