//! File output for chart data.

pub mod export;
