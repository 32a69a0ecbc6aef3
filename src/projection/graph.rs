//! Graph view elements handed to a rendering widget.
//!
//! A [`GraphView`] is the full projected state at one timestep: nodes and
//! directed labeled edges keyed by stable ids. Ids equal the source entity's
//! id (synthetic storage-consumption sinks use a `_consumption` suffix) and
//! are established once at build time; updates only touch labels, edge
//! endpoints, and direction.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Chartable entity kinds. Selection handling and chart dispatch match on
/// this exhaustively; there is no stringly-typed branching downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Bus,
    Generator,
    Load,
    Storage,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Bus => "bus",
            EntityKind::Generator => "generator",
            EntityKind::Load => "load",
            EntityKind::Storage => "storage",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bus" => Ok(EntityKind::Bus),
            "generator" => Ok(EntityKind::Generator),
            "load" => Ok(EntityKind::Load),
            "storage" => Ok(EntityKind::Storage),
            _ => Err(()),
        }
    }
}

/// Widget shape assigned per element kind at build time; never updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeShape {
    /// Buses.
    Box,
    /// Generators.
    Ellipse,
    /// Loads and consumption sinks.
    Triangle,
    /// Storage units.
    Database,
}

impl NodeShape {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeShape::Box => "box",
            NodeShape::Ellipse => "ellipse",
            NodeShape::Triangle => "triangle",
            NodeShape::Database => "database",
        }
    }
}

/// Static edge color for transmission lines.
pub const LINE_COLOR: &str = "blue";
/// Static edge color for all attachment edges inside a bus.
pub const ATTACHMENT_COLOR: &str = "gray";

/// A rendered node. `label` is the only mutable field.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    pub shape: NodeShape,
    /// Chart dispatch kind for selection events. Consumption sinks chart as
    /// loads (and resolve to `NotFound`, which callers no-op).
    pub kind: EntityKind,
}

/// A rendered directed edge. `from`, `to`, and `label` are the mutable
/// fields; `id` and `color` are fixed at build time.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphEdge {
    pub id: String,
    pub from: String,
    pub to: String,
    pub label: String,
    pub color: &'static str,
}

/// Full projected state at one timestep.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphView {
    pub timestep: usize,
    pub nodes: BTreeMap<String, GraphNode>,
    pub edges: BTreeMap<String, GraphEdge>,
}

impl GraphView {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_kind_round_trips_through_str() {
        for kind in [
            EntityKind::Bus,
            EntityKind::Generator,
            EntityKind::Load,
            EntityKind::Storage,
        ] {
            assert_eq!(kind.as_str().parse::<EntityKind>(), Ok(kind));
        }
        assert!("feeder".parse::<EntityKind>().is_err());
    }
}
