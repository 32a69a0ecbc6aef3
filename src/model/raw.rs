//! Raw document types mirroring the on-disk JSON layout.
//!
//! Two field-naming variants exist in the wild: the legacy schema uses
//! singular sequence names (`output`, `consumption`, `flow`, `capacity`),
//! the current schema plural ones (`outputs`, `consumptions`, `flows`,
//! `capacities`). Both deserialize into the same raw structs here; the
//! normalize step in [`crate::model::snapshot`] detects which variant a
//! document uses and rejects documents that mix them.
//!
//! Sequence entries are parsed leniently: `null` and non-numeric elements
//! become `None` samples rather than deserialization failures, since solver
//! output routinely contains `null` for unsolved variables.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::value::Series;

/// Top-level document wrapper. `network` is checked for presence at load
/// time so its absence maps to a precise error rather than a serde one.
#[derive(Debug, Deserialize)]
pub struct RawDocument {
    pub network: Option<RawNetwork>,
}

#[derive(Debug, Deserialize)]
pub struct RawNetwork {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub timesteps: Vec<RawTimestep>,
    pub buses: Option<BTreeMap<String, RawBus>>,
    #[serde(default)]
    pub transmission_lines: BTreeMap<String, RawLine>,
}

/// A `[label, display_timestamp]` pair. Either element may be a number or a
/// string in source documents.
#[derive(Debug, Deserialize)]
pub struct RawTimestep(pub Value, pub Value);

#[derive(Debug, Default, Deserialize)]
pub struct RawBus {
    #[serde(default, deserialize_with = "lenient_seq_opt")]
    pub nodal_prices: Option<Series>,
    #[serde(default)]
    pub generators: BTreeMap<String, RawGenerator>,
    #[serde(default)]
    pub loads: BTreeMap<String, RawLoad>,
    #[serde(default)]
    pub storage_units: BTreeMap<String, RawStorageUnit>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawGenerator {
    #[serde(default, deserialize_with = "lenient_seq_opt")]
    pub output: Option<Series>,
    #[serde(default, deserialize_with = "lenient_seq_opt")]
    pub outputs: Option<Series>,
    #[serde(default, deserialize_with = "lenient_seq_opt")]
    pub capacity: Option<Series>,
    #[serde(default, deserialize_with = "lenient_seq_opt")]
    pub capacities: Option<Series>,
    #[serde(default, deserialize_with = "lenient_seq_opt")]
    pub costs: Option<Series>,
    #[serde(default)]
    pub generator_type: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawLoad {
    #[serde(default, deserialize_with = "lenient_seq_opt")]
    pub consumption: Option<Series>,
    #[serde(default, deserialize_with = "lenient_seq_opt")]
    pub consumptions: Option<Series>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawStorageUnit {
    #[serde(default, deserialize_with = "lenient_seq_opt")]
    pub soc_start_of_ts: Option<Series>,
    #[serde(default, deserialize_with = "lenient_seq_opt")]
    pub soc_end_of_ts: Option<Series>,
    #[serde(default, deserialize_with = "lenient_seq_opt")]
    pub charge_inflows: Option<Series>,
    #[serde(default, deserialize_with = "lenient_seq_opt")]
    pub discharge_outflows: Option<Series>,
    #[serde(default, deserialize_with = "lenient_seq_opt")]
    pub consumptions: Option<Series>,
    #[serde(default)]
    pub max_soc_capacity: Option<f64>,
    #[serde(default)]
    pub storage_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawLine {
    pub start_bus: String,
    pub end_bus: String,
    #[serde(default, deserialize_with = "lenient_seq_opt")]
    pub flow: Option<Series>,
    #[serde(default, deserialize_with = "lenient_seq_opt")]
    pub flows: Option<Series>,
    #[serde(default, deserialize_with = "lenient_seq_opt")]
    pub capacity: Option<Series>,
    #[serde(default, deserialize_with = "lenient_seq_opt")]
    pub capacities: Option<Series>,
}

/// Deserializes a JSON array into samples, mapping `null` and non-numeric
/// elements to `None`.
fn lenient_seq_opt<'de, D>(deserializer: D) -> Result<Option<Series>, D::Error>
where
    D: Deserializer<'de>,
{
    let values: Option<Vec<Value>> = Option::deserialize(deserializer)?;
    Ok(values.map(|vs| vs.iter().map(Value::as_f64).collect()))
}

/// Renders a raw timestep element for display: strings as-is, everything
/// else via its JSON representation.
pub fn display_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lenient_sequences_map_null_and_strings_to_none() {
        let raw: RawGenerator =
            serde_json::from_str(r#"{"outputs": [1.0, null, "x", 4]}"#).expect("should parse");
        assert_eq!(raw.outputs, Some(vec![Some(1.0), None, None, Some(4.0)]));
        assert!(raw.output.is_none());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        // Source documents carry solver metadata this viewer does not use.
        let raw: RawStorageUnit = serde_json::from_str(
            r#"{"charge_inflows": [1], "min_soc_requirements": [0], "storage_type": "battery"}"#,
        )
        .expect("should parse");
        assert_eq!(raw.charge_inflows, Some(vec![Some(1.0)]));
        assert_eq!(raw.storage_type.as_deref(), Some("battery"));
    }

    #[test]
    fn timestep_pairs_accept_numbers_and_strings() {
        let raw: Vec<RawTimestep> =
            serde_json::from_str(r#"[[0, "2030-01-01 00:00"], [1, 42]]"#).expect("should parse");
        assert_eq!(display_string(&raw[0].1), "2030-01-01 00:00");
        assert_eq!(display_string(&raw[1].0), "1");
        assert_eq!(display_string(&raw[1].1), "42");
    }
}
