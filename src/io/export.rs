//! CSV export for chart query results.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::projection::ChartData;

/// Exports a chart query to a CSV file at the given path.
///
/// One row per timestep: the timestep label followed by one column per
/// series. Missing samples export as empty cells. Output is deterministic
/// for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(chart: &ChartData, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(chart, buf)
}

/// Writes a chart query as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(chart: &ChartData, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    // Header
    let mut header = vec!["timestep".to_string()];
    header.extend(chart.series.iter().map(|s| s.name.clone()));
    wtr.write_record(&header)?;

    // Data rows
    for (t, label) in chart.labels.iter().enumerate() {
        let mut row = vec![label.clone()];
        for series in &chart.series {
            let cell = series
                .values
                .get(t)
                .copied()
                .flatten()
                .map_or_else(String::new, |v| format!("{v:.4}"));
            row.push(cell);
        }
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}
