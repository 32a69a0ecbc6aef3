//! Render session lifecycle: initial build, incremental update, dispose.
//!
//! A [`RenderSession`] owns the live graph view on behalf of one rendering
//! widget instance. The lifecycle is a small state machine:
//!
//! ```text
//! Uninitialized --build_initial--> Built --update--> Built
//!       ^                            |
//!       +----------dispose-----------+
//! ```
//!
//! `build_initial` establishes the node/edge id set once; `update` is
//! strictly a diff: it recomputes labels, edge endpoints, and direction
//! for the existing elements and reports only what changed, so the widget
//! patches in place instead of redrawing. At most one live view exists per
//! session; a rebuild disposes the previous view first.

use thiserror::Error;
use tracing::debug;

use crate::model::{
    Bus, Generator, Load, LoadConvention, NetworkSnapshot, StorageUnit, TransmissionLine,
    fmt_value, value_at,
};

use super::graph::{
    ATTACHMENT_COLOR, EntityKind, GraphEdge, GraphNode, GraphView, LINE_COLOR, NodeShape,
};

/// Id suffix for the synthetic consumption sink attached to a storage unit.
pub const CONSUMPTION_SUFFIX: &str = "_consumption";

/// Projection errors surfaced to the caller.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("update requested before an initial build")]
    NotBuilt,
}

/// Label change for one node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodePatch {
    pub id: String,
    pub label: String,
}

/// Endpoint/label change for one edge.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgePatch {
    pub id: String,
    pub from: String,
    pub to: String,
    pub label: String,
}

/// Everything that changed in one `update` call. Empty when re-projecting
/// the timestep already shown.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphPatch {
    pub timestep: usize,
    pub nodes: Vec<NodePatch>,
    pub edges: Vec<EdgePatch>,
}

impl GraphPatch {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}

/// Either a full first render or an incremental patch.
#[derive(Debug)]
pub enum Projection<'a> {
    Full(&'a GraphView),
    Patch(GraphPatch),
}

/// Owns the live graph view for one rendering widget instance.
#[derive(Debug, Default)]
pub struct RenderSession {
    view: Option<GraphView>,
}

impl RenderSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an initial build has happened and not been disposed.
    pub fn is_built(&self) -> bool {
        self.view.is_some()
    }

    /// The live view, if built.
    pub fn view(&self) -> Option<&GraphView> {
        self.view.as_ref()
    }

    /// Full build of the graph view at `timestep_index`.
    ///
    /// Disposes any previous view first, so at most one live view exists.
    pub fn build_initial(&mut self, snapshot: &NetworkSnapshot, timestep_index: usize) -> &GraphView {
        self.dispose();

        let mut view = GraphView {
            timestep: timestep_index,
            nodes: Default::default(),
            edges: Default::default(),
        };

        for bus in snapshot.buses.values() {
            push_node(
                &mut view,
                &bus.id,
                bus_label(bus, timestep_index),
                NodeShape::Box,
                EntityKind::Bus,
            );

            for generator in bus.generators.values() {
                push_node(
                    &mut view,
                    &generator.id,
                    generator_label(generator, timestep_index),
                    NodeShape::Ellipse,
                    EntityKind::Generator,
                );
                push_edge(
                    &mut view,
                    &generator.id,
                    generator_edge(generator, bus, timestep_index),
                    ATTACHMENT_COLOR,
                );
            }

            for load in bus.loads.values() {
                push_node(
                    &mut view,
                    &load.id,
                    load_label(load, timestep_index),
                    NodeShape::Triangle,
                    EntityKind::Load,
                );
                push_edge(
                    &mut view,
                    &load.id,
                    load_edge(load, bus, snapshot.load_convention, timestep_index),
                    ATTACHMENT_COLOR,
                );
            }

            for unit in bus.storage_units.values() {
                push_node(
                    &mut view,
                    &unit.id,
                    storage_label(unit, timestep_index),
                    NodeShape::Database,
                    EntityKind::Storage,
                );
                push_edge(
                    &mut view,
                    &unit.id,
                    storage_edge(unit, bus, timestep_index),
                    ATTACHMENT_COLOR,
                );

                if unit.consumptions.is_some() {
                    let sink_id = sink_id(&unit.id);
                    push_node(
                        &mut view,
                        &sink_id,
                        sink_label(unit, timestep_index),
                        NodeShape::Triangle,
                        EntityKind::Load,
                    );
                    push_edge(&mut view, &sink_id, sink_edge(unit, timestep_index), ATTACHMENT_COLOR);
                }
            }
        }

        for line in snapshot.transmission_lines.values() {
            push_edge(&mut view, &line.id, line_edge(line, timestep_index), LINE_COLOR);
        }

        debug!(
            timestep = timestep_index,
            nodes = view.node_count(),
            edges = view.edge_count(),
            "built initial graph view"
        );
        self.view.insert(view)
    }

    /// Incremental re-projection at `timestep_index`.
    ///
    /// Recomputes the mutable fields of every existing element against the
    /// same snapshot the view was built from and returns only the changed
    /// ones. The id set, shapes, and colors are untouched.
    ///
    /// # Errors
    ///
    /// [`SessionError::NotBuilt`] if no initial build has happened.
    pub fn update(
        &mut self,
        snapshot: &NetworkSnapshot,
        timestep_index: usize,
    ) -> Result<GraphPatch, SessionError> {
        let view = self.view.as_mut().ok_or(SessionError::NotBuilt)?;
        let mut patch = GraphPatch {
            timestep: timestep_index,
            ..GraphPatch::default()
        };

        for bus in snapshot.buses.values() {
            patch_node(view, &mut patch, &bus.id, bus_label(bus, timestep_index));

            for generator in bus.generators.values() {
                patch_node(
                    view,
                    &mut patch,
                    &generator.id,
                    generator_label(generator, timestep_index),
                );
                patch_edge(
                    view,
                    &mut patch,
                    &generator.id,
                    generator_edge(generator, bus, timestep_index),
                );
            }

            for load in bus.loads.values() {
                patch_node(view, &mut patch, &load.id, load_label(load, timestep_index));
                patch_edge(
                    view,
                    &mut patch,
                    &load.id,
                    load_edge(load, bus, snapshot.load_convention, timestep_index),
                );
            }

            for unit in bus.storage_units.values() {
                patch_node(view, &mut patch, &unit.id, storage_label(unit, timestep_index));
                patch_edge(view, &mut patch, &unit.id, storage_edge(unit, bus, timestep_index));

                if unit.consumptions.is_some() {
                    let sink_id = sink_id(&unit.id);
                    patch_node(view, &mut patch, &sink_id, sink_label(unit, timestep_index));
                    patch_edge(view, &mut patch, &sink_id, sink_edge(unit, timestep_index));
                }
            }
        }

        for line in snapshot.transmission_lines.values() {
            patch_edge(view, &mut patch, &line.id, line_edge(line, timestep_index));
        }

        view.timestep = timestep_index;
        debug!(
            timestep = timestep_index,
            changed_nodes = patch.nodes.len(),
            changed_edges = patch.edges.len(),
            "updated graph view"
        );
        Ok(patch)
    }

    /// Dispatches to a full build on the first call and a patch afterwards.
    pub fn project(&mut self, snapshot: &NetworkSnapshot, timestep_index: usize) -> Projection<'_> {
        if self.is_built() {
            match self.update(snapshot, timestep_index) {
                Ok(patch) => Projection::Patch(patch),
                Err(SessionError::NotBuilt) => {
                    Projection::Full(self.build_initial(snapshot, timestep_index))
                }
            }
        } else {
            Projection::Full(self.build_initial(snapshot, timestep_index))
        }
    }

    /// Releases the live view. Idempotent.
    pub fn dispose(&mut self) {
        if self.view.take().is_some() {
            debug!("disposed graph view");
        }
    }
}

/// Desired mutable state of one edge at one timestep.
#[derive(Debug, Clone, PartialEq)]
struct EdgeState {
    from: String,
    to: String,
    label: String,
}

fn sink_id(storage_id: &str) -> String {
    format!("{storage_id}{CONSUMPTION_SUFFIX}")
}

fn push_node(view: &mut GraphView, id: &str, label: String, shape: NodeShape, kind: EntityKind) {
    view.nodes.insert(
        id.to_string(),
        GraphNode {
            id: id.to_string(),
            label,
            shape,
            kind,
        },
    );
}

fn push_edge(view: &mut GraphView, id: &str, state: EdgeState, color: &'static str) {
    view.edges.insert(
        id.to_string(),
        GraphEdge {
            id: id.to_string(),
            from: state.from,
            to: state.to,
            label: state.label,
            color,
        },
    );
}

fn patch_node(view: &mut GraphView, patch: &mut GraphPatch, id: &str, label: String) {
    if let Some(node) = view.nodes.get_mut(id) {
        if node.label != label {
            node.label = label.clone();
            patch.nodes.push(NodePatch {
                id: id.to_string(),
                label,
            });
        }
    }
}

fn patch_edge(view: &mut GraphView, patch: &mut GraphPatch, id: &str, state: EdgeState) {
    if let Some(edge) = view.edges.get_mut(id) {
        if edge.from != state.from || edge.to != state.to || edge.label != state.label {
            edge.from = state.from.clone();
            edge.to = state.to.clone();
            edge.label = state.label.clone();
            patch.edges.push(EdgePatch {
                id: id.to_string(),
                from: state.from,
                to: state.to,
                label: state.label,
            });
        }
    }
}

/// Bus label: id, total attached load, nodal price.
fn bus_label(bus: &Bus, t: usize) -> String {
    let samples: Vec<Option<f64>> = bus
        .loads
        .values()
        .map(|l| value_at(&l.consumptions, t))
        .collect();
    let total = if samples.is_empty() {
        Some(0.0)
    } else if samples.iter().all(Option::is_none) {
        None
    } else {
        Some(samples.iter().flatten().sum())
    };
    let price = value_at(&bus.nodal_prices, t);
    format!("{}\n{} MW\n{} £/MWh", bus.id, fmt_value(total), fmt_value(price))
}

/// Generator label: id plus marginal cost when the document carries costs.
fn generator_label(generator: &Generator, t: usize) -> String {
    if generator.costs.is_empty() {
        generator.id.clone()
    } else {
        format!(
            "{}: £{}/MWh",
            generator.id,
            fmt_value(value_at(&generator.costs, t))
        )
    }
}

fn load_label(load: &Load, t: usize) -> String {
    format!("{}: {} MW", load.id, fmt_value(value_at(&load.consumptions, t)))
}

/// Storage label: id and start→end SOC, with the SOC ceiling when known.
fn storage_label(unit: &StorageUnit, t: usize) -> String {
    let start = fmt_value(value_at(&unit.soc_start_of_ts, t));
    let end = fmt_value(value_at(&unit.soc_end_of_ts, t));
    match unit.max_soc_capacity {
        Some(cap) => format!("{}\nSOC {start} / {cap:.2} → {end} / {cap:.2}", unit.id),
        None => format!("{}\nSOC {start} → {end}", unit.id),
    }
}

fn sink_label(unit: &StorageUnit, t: usize) -> String {
    let consumed = unit
        .consumptions
        .as_deref()
        .and_then(|seq| value_at(seq, t));
    format!("{} consumption: {}", unit.id, fmt_value(consumed))
}

/// Generators always feed their bus.
fn generator_edge(generator: &Generator, bus: &Bus, t: usize) -> EdgeState {
    EdgeState {
        from: generator.id.clone(),
        to: bus.id.clone(),
        label: fmt_value(value_at(&generator.outputs, t)),
    }
}

/// Load direction depends on the document's sign convention: magnitude
/// documents always flow bus→load; signed documents reverse the edge when
/// the load injects into the bus. Displayed magnitude is always `|value|`.
fn load_edge(load: &Load, bus: &Bus, convention: LoadConvention, t: usize) -> EdgeState {
    let consumption = value_at(&load.consumptions, t);
    let label = fmt_value(consumption.map(f64::abs));
    let reversed = match convention {
        LoadConvention::Magnitude => false,
        LoadConvention::Signed => matches!(consumption, Some(c) if c <= 0.0),
    };
    if reversed {
        EdgeState {
            from: load.id.clone(),
            to: bus.id.clone(),
            label,
        }
    } else {
        EdgeState {
            from: bus.id.clone(),
            to: load.id.clone(),
            label,
        }
    }
}

/// Positive net inflow charges the unit (bus→storage); non-positive
/// discharges it (storage→bus). Unknown keeps the charging orientation.
fn storage_edge(unit: &StorageUnit, bus: &Bus, t: usize) -> EdgeState {
    let net = unit.net_inflow(t);
    let label = fmt_value(net.map(f64::abs));
    match net {
        Some(n) if n <= 0.0 => EdgeState {
            from: unit.id.clone(),
            to: bus.id.clone(),
            label,
        },
        _ => EdgeState {
            from: bus.id.clone(),
            to: unit.id.clone(),
            label,
        },
    }
}

fn sink_edge(unit: &StorageUnit, t: usize) -> EdgeState {
    let consumed = unit
        .consumptions
        .as_deref()
        .and_then(|seq| value_at(seq, t));
    EdgeState {
        from: unit.id.clone(),
        to: sink_id(&unit.id),
        label: fmt_value(consumed.map(f64::abs)),
    }
}

/// Positive flow runs start→end; non-positive reverses the edge. The label
/// always shows `|flow| / capacity`.
fn line_edge(line: &TransmissionLine, t: usize) -> EdgeState {
    let flow = value_at(&line.flows, t);
    let capacity = value_at(&line.capacities, t);
    let label = format!("{} / {}", fmt_value(flow.map(f64::abs)), fmt_value(capacity));
    match flow {
        Some(f) if f <= 0.0 => EdgeState {
            from: line.end_bus.clone(),
            to: line.start_bus.clone(),
            label,
        },
        _ => EdgeState {
            from: line.start_bus.clone(),
            to: line.end_bus.clone(),
            label,
        },
    }
}
