//! The fail-soft per-timestep value accessor and its display formatting.
//!
//! Every number the viewer shows (node labels, edge labels, chart axes,
//! CSV cells) is read through [`value_at`] and rendered through
//! [`fmt_value`]. Centralizing the "N/A" policy here is the one
//! correctness-critical contract of the model layer: the accessor is total
//! over its domain and never panics, for any sequence and any index.

/// A per-timestep sequence as stored in the normalized snapshot.
///
/// `None` entries are samples the source document left as `null` or
/// non-numeric (unsolved LP variables serialize as `null`).
pub type Series = Vec<Option<f64>>;

/// Sentinel token displayed for a missing or out-of-range sample.
pub const NA: &str = "N/A";

/// Returns the sample at `timestep_index`, or `None` if the sequence is
/// absent for that index or the stored entry is unknown.
///
/// # Examples
///
/// ```
/// use gridviz::model::value_at;
///
/// let seq = vec![Some(5.0), None];
/// assert_eq!(value_at(&seq, 0), Some(5.0));
/// assert_eq!(value_at(&seq, 1), None);
/// assert_eq!(value_at(&seq, 7), None);
/// ```
pub fn value_at(seq: &[Option<f64>], timestep_index: usize) -> Option<f64> {
    seq.get(timestep_index).copied().flatten()
}

/// Formats a sample with exactly two decimal digits, or as `"N/A"`.
pub fn fmt_value(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}"),
        None => NA.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_range_sample_is_returned() {
        let seq = vec![Some(1.5), Some(-2.0), Some(0.0)];
        assert_eq!(value_at(&seq, 0), Some(1.5));
        assert_eq!(value_at(&seq, 2), Some(0.0));
    }

    #[test]
    fn out_of_range_index_is_unknown() {
        let seq = vec![Some(1.0)];
        assert_eq!(value_at(&seq, 1), None);
        assert_eq!(value_at(&seq, usize::MAX), None);
    }

    #[test]
    fn empty_sequence_is_unknown_everywhere() {
        let seq: Series = Vec::new();
        for t in [0, 1, 100] {
            assert_eq!(value_at(&seq, t), None);
        }
    }

    #[test]
    fn null_entry_is_unknown() {
        let seq = vec![None, Some(3.0)];
        assert_eq!(value_at(&seq, 0), None);
        assert_eq!(value_at(&seq, 1), Some(3.0));
    }

    #[test]
    fn formats_two_decimals() {
        assert_eq!(fmt_value(Some(5.0)), "5.00");
        assert_eq!(fmt_value(Some(-2.5)), "-2.50");
        assert_eq!(fmt_value(Some(0.005)), "0.01");
    }

    #[test]
    fn formats_unknown_as_na() {
        assert_eq!(fmt_value(None), "N/A");
    }
}
