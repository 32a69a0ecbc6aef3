//! Interactive viewer for precomputed electrical-network dispatch results.

#[cfg(feature = "api")]
pub mod api;
pub mod config;
pub mod io;
/// Snapshot loading and the fail-soft timestep accessor.
pub mod model;
/// Graph view derivation, incremental updates, and chart queries.
pub mod projection;
pub mod render;
#[cfg(feature = "tui")]
pub mod tui;
