//! Graph projection: timestep-indexed view derivation, incremental
//! update/diff, and selection-driven chart queries.

mod graph;
mod series;
mod session;

pub use graph::{
    ATTACHMENT_COLOR, EntityKind, GraphEdge, GraphNode, GraphView, LINE_COLOR, NodeShape,
};
pub use series::{ChartData, ChartSeries, QueryError, time_series};
pub use session::{
    CONSUMPTION_SUFFIX, EdgePatch, GraphPatch, NodePatch, Projection, RenderSession, SessionError,
};
