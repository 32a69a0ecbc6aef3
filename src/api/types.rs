//! API response and query types.

use serde::{Deserialize, Serialize};

use crate::model::{NetworkSnapshot, Timestep};
use crate::projection::{ChartData, GraphEdge, GraphNode, GraphView};

/// Dataset metadata: everything a client needs to bind its slider and
/// issue graph requests.
#[derive(Debug, Serialize)]
pub struct NetworkInfo {
    /// Network name from the document (may be empty).
    pub name: String,
    /// Number of timesteps on the shared time axis.
    pub timestep_count: usize,
    /// Ordered timestep labels.
    pub timesteps: Vec<TimestepDto>,
    /// Number of buses.
    pub bus_count: usize,
    /// Number of transmission lines.
    pub line_count: usize,
}

impl From<&NetworkSnapshot> for NetworkInfo {
    fn from(snapshot: &NetworkSnapshot) -> Self {
        Self {
            name: snapshot.name.clone(),
            timestep_count: snapshot.timestep_count(),
            timesteps: snapshot.timesteps.iter().map(TimestepDto::from).collect(),
            bus_count: snapshot.buses.len(),
            line_count: snapshot.transmission_lines.len(),
        }
    }
}

/// One entry of the time axis.
#[derive(Debug, Serialize)]
pub struct TimestepDto {
    pub label: String,
    pub display: String,
}

impl From<&Timestep> for TimestepDto {
    fn from(ts: &Timestep) -> Self {
        Self {
            label: ts.label.clone(),
            display: ts.display.clone(),
        }
    }
}

/// Full projected view at one timestep.
#[derive(Debug, Serialize)]
pub struct GraphResponse {
    pub timestep: usize,
    pub nodes: Vec<NodeDto>,
    pub edges: Vec<EdgeDto>,
}

impl From<&GraphView> for GraphResponse {
    fn from(view: &GraphView) -> Self {
        Self {
            timestep: view.timestep,
            nodes: view.nodes.values().map(NodeDto::from).collect(),
            edges: view.edges.values().map(EdgeDto::from).collect(),
        }
    }
}

/// A rendered node in widget vocabulary.
#[derive(Debug, Serialize)]
pub struct NodeDto {
    pub id: String,
    pub label: String,
    pub shape: &'static str,
    pub kind: &'static str,
}

impl From<&GraphNode> for NodeDto {
    fn from(node: &GraphNode) -> Self {
        Self {
            id: node.id.clone(),
            label: node.label.clone(),
            shape: node.shape.as_str(),
            kind: node.kind.as_str(),
        }
    }
}

/// A rendered directed edge in widget vocabulary.
#[derive(Debug, Serialize)]
pub struct EdgeDto {
    pub id: String,
    pub from: String,
    pub to: String,
    pub label: String,
    pub color: &'static str,
}

impl From<&GraphEdge> for EdgeDto {
    fn from(edge: &GraphEdge) -> Self {
        Self {
            id: edge.id.clone(),
            from: edge.from.clone(),
            to: edge.to.clone(),
            label: edge.label.clone(),
            color: edge.color,
        }
    }
}

/// Chart payload for a selected element.
#[derive(Debug, Serialize)]
pub struct SeriesResponse {
    pub labels: Vec<String>,
    pub series: Vec<SeriesDto>,
}

/// One named chart series. `null` samples are gaps.
#[derive(Debug, Serialize)]
pub struct SeriesDto {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

impl From<&ChartData> for SeriesResponse {
    fn from(chart: &ChartData) -> Self {
        Self {
            labels: chart.labels.clone(),
            series: chart
                .series
                .iter()
                .map(|s| SeriesDto {
                    name: s.name.clone(),
                    values: s.values.clone(),
                })
                .collect(),
        }
    }
}

/// Timestep query parameter for the graph endpoint.
#[derive(Debug, Deserialize)]
pub struct GraphQuery {
    /// Timestep index; defaults to 0.
    pub t: Option<usize>,
}

/// Error response body for 400/404-class errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}
