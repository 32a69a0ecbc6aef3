//! Normalized network snapshot and the versioned load step.
//!
//! [`NetworkSnapshot::from_json_str`] is the single place schema-variant
//! detection happens: the document is probed once for singular vs. plural
//! sequence field names, normalized into one internal representation, and
//! everything downstream (projection, charts, export) operates on the
//! normalized form only. The snapshot is read-only after load; the view
//! layer never adds, removes, or mutates an entity.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::raw::{self, RawBus, RawDocument, RawGenerator, RawLine, RawLoad, RawStorageUnit};
use super::value::{Series, value_at};

/// Which field-naming variant a document uses.
///
/// A document must use one variant throughout; mixing is rejected at load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaVersion {
    /// Singular sequence names (`output`, `consumption`, `flow`, `capacity`).
    Legacy,
    /// Plural sequence names (`outputs`, `consumptions`, `flows`, `capacities`).
    Current,
}

/// Sign convention for load consumption sequences.
///
/// Tied to the schema version at load time: legacy documents store
/// magnitudes (flow is always bus→load), current documents store signed
/// values (negative consumption injects into the bus).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadConvention {
    /// Non-negative magnitudes; bus→load direction always.
    Magnitude,
    /// Signed; positive draws from the bus, non-positive injects into it.
    Signed,
}

impl SchemaVersion {
    /// The load sign convention implied by this schema version.
    pub fn load_convention(self) -> LoadConvention {
        match self {
            SchemaVersion::Legacy => LoadConvention::Magnitude,
            SchemaVersion::Current => LoadConvention::Signed,
        }
    }
}

/// Load failure. The caller recovers with an empty-network render; loading
/// is never fatal to the viewer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("document has no top-level `network` object")]
    MissingNetwork,
    #[error("`network` has no `buses` mapping")]
    MissingBuses,
    #[error("document mixes singular and plural sequence field names")]
    MixedSchema,
}

/// One entry of the shared time axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timestep {
    /// Opaque source label (usually the index).
    pub label: String,
    /// Display timestamp shown on sliders and chart axes.
    pub display: String,
}

#[derive(Debug, Clone, Default)]
pub struct Generator {
    pub id: String,
    pub outputs: Series,
    pub capacities: Series,
    /// Marginal cost sequence, shown on the node label when present.
    pub costs: Series,
    pub generator_type: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Load {
    pub id: String,
    pub consumptions: Series,
}

#[derive(Debug, Clone, Default)]
pub struct StorageUnit {
    pub id: String,
    pub soc_start_of_ts: Series,
    pub soc_end_of_ts: Series,
    pub charge_inflows: Series,
    pub discharge_outflows: Series,
    /// Net consumption drawn out of the unit (current schema only). The
    /// projector renders a synthetic consumption sink node when present.
    pub consumptions: Option<Series>,
    pub max_soc_capacity: Option<f64>,
    pub storage_type: Option<String>,
}

impl StorageUnit {
    /// `charge_inflow[t] − discharge_outflow[t]`; positive means the bus
    /// feeds the unit. Unknown only when both inputs are unknown.
    pub fn net_inflow(&self, timestep_index: usize) -> Option<f64> {
        let inflow = value_at(&self.charge_inflows, timestep_index);
        let outflow = value_at(&self.discharge_outflows, timestep_index);
        match (inflow, outflow) {
            (None, None) => None,
            (i, o) => Some(i.unwrap_or(0.0) - o.unwrap_or(0.0)),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Bus {
    pub id: String,
    pub nodal_prices: Series,
    pub generators: BTreeMap<String, Generator>,
    pub loads: BTreeMap<String, Load>,
    pub storage_units: BTreeMap<String, StorageUnit>,
}

#[derive(Debug, Clone)]
pub struct TransmissionLine {
    pub id: String,
    pub start_bus: String,
    pub end_bus: String,
    pub flows: Series,
    pub capacities: Series,
}

/// The loaded dataset: immutable once constructed.
#[derive(Debug, Clone)]
pub struct NetworkSnapshot {
    pub name: String,
    pub timesteps: Vec<Timestep>,
    pub buses: BTreeMap<String, Bus>,
    pub transmission_lines: BTreeMap<String, TransmissionLine>,
    pub load_convention: LoadConvention,
}

impl NetworkSnapshot {
    /// An empty network: zero buses, zero lines, zero timesteps. The
    /// fallback render target when loading fails.
    pub fn empty() -> Self {
        Self {
            name: String::new(),
            timesteps: Vec::new(),
            buses: BTreeMap::new(),
            transmission_lines: BTreeMap::new(),
            load_convention: LoadConvention::Signed,
        }
    }

    /// Parses and normalizes a JSON document.
    ///
    /// # Errors
    ///
    /// Fails on malformed JSON, a missing top-level `network` object, a
    /// missing `buses` mapping, or a document mixing both schema variants.
    pub fn from_json_str(raw: &str) -> Result<Self, LoadError> {
        let doc: RawDocument = serde_json::from_str(raw)?;
        let network = doc.network.ok_or(LoadError::MissingNetwork)?;
        let buses = network.buses.as_ref().ok_or(LoadError::MissingBuses)?;

        let version = detect_schema(buses, &network.transmission_lines)?;
        let convention = version.load_convention();

        let timesteps = network
            .timesteps
            .iter()
            .map(|ts| Timestep {
                label: raw::display_string(&ts.0),
                display: raw::display_string(&ts.1),
            })
            .collect();

        let buses = buses
            .iter()
            .map(|(id, bus)| (id.clone(), normalize_bus(id, bus, version)))
            .collect();

        let transmission_lines = network
            .transmission_lines
            .iter()
            .map(|(id, line)| (id.clone(), normalize_line(id, line, version)))
            .collect();

        Ok(Self {
            name: network.name.unwrap_or_default(),
            timesteps,
            buses,
            transmission_lines,
            load_convention: convention,
        })
    }

    /// Reads and parses a document from disk.
    pub fn from_json_file(path: &Path) -> Result<Self, LoadError> {
        let raw = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// Length of the shared time axis.
    pub fn timestep_count(&self) -> usize {
        self.timesteps.len()
    }

    /// The bus a generator with this id is attached to, and the generator.
    pub fn find_generator(&self, id: &str) -> Option<(&Bus, &Generator)> {
        self.buses
            .values()
            .find_map(|b| b.generators.get(id).map(|g| (b, g)))
    }

    /// The bus a load with this id is attached to, and the load.
    pub fn find_load(&self, id: &str) -> Option<(&Bus, &Load)> {
        self.buses
            .values()
            .find_map(|b| b.loads.get(id).map(|l| (b, l)))
    }

    /// The bus a storage unit with this id is attached to, and the unit.
    pub fn find_storage(&self, id: &str) -> Option<(&Bus, &StorageUnit)> {
        self.buses
            .values()
            .find_map(|b| b.storage_units.get(id).map(|s| (b, s)))
    }
}

/// Tally of singular vs. plural sequence field occurrences across a document.
#[derive(Default)]
struct VariantTally {
    singular: usize,
    plural: usize,
}

impl VariantTally {
    fn count(&mut self, singular: &Option<Series>, plural: &Option<Series>) {
        if singular.is_some() {
            self.singular += 1;
        }
        if plural.is_some() {
            self.plural += 1;
        }
    }

    fn resolve(&self) -> Result<SchemaVersion, LoadError> {
        match (self.singular, self.plural) {
            (0, _) => Ok(SchemaVersion::Current),
            (_, 0) => Ok(SchemaVersion::Legacy),
            _ => Err(LoadError::MixedSchema),
        }
    }
}

fn detect_schema(
    buses: &BTreeMap<String, RawBus>,
    lines: &BTreeMap<String, RawLine>,
) -> Result<SchemaVersion, LoadError> {
    let mut tally = VariantTally::default();
    for bus in buses.values() {
        for generator in bus.generators.values() {
            tally.count(&generator.output, &generator.outputs);
            tally.count(&generator.capacity, &generator.capacities);
        }
        for load in bus.loads.values() {
            tally.count(&load.consumption, &load.consumptions);
        }
    }
    for line in lines.values() {
        tally.count(&line.flow, &line.flows);
        tally.count(&line.capacity, &line.capacities);
    }
    tally.resolve()
}

/// Picks the sequence matching the detected schema version, defaulting to
/// an empty series (every sample unknown) when the field is absent.
fn pick(version: SchemaVersion, singular: Option<Series>, plural: Option<Series>) -> Series {
    match version {
        SchemaVersion::Legacy => singular,
        SchemaVersion::Current => plural,
    }
    .unwrap_or_default()
}

fn normalize_bus(id: &str, bus: &RawBus, version: SchemaVersion) -> Bus {
    Bus {
        id: id.to_string(),
        nodal_prices: bus.nodal_prices.clone().unwrap_or_default(),
        generators: bus
            .generators
            .iter()
            .map(|(gid, g)| (gid.clone(), normalize_generator(gid, g, version)))
            .collect(),
        loads: bus
            .loads
            .iter()
            .map(|(lid, l)| (lid.clone(), normalize_load(lid, l, version)))
            .collect(),
        storage_units: bus
            .storage_units
            .iter()
            .map(|(sid, s)| (sid.clone(), normalize_storage(sid, s)))
            .collect(),
    }
}

fn normalize_generator(id: &str, g: &RawGenerator, version: SchemaVersion) -> Generator {
    Generator {
        id: id.to_string(),
        outputs: pick(version, g.output.clone(), g.outputs.clone()),
        capacities: pick(version, g.capacity.clone(), g.capacities.clone()),
        costs: g.costs.clone().unwrap_or_default(),
        generator_type: g.generator_type.clone(),
    }
}

fn normalize_load(id: &str, l: &RawLoad, version: SchemaVersion) -> Load {
    Load {
        id: id.to_string(),
        consumptions: pick(version, l.consumption.clone(), l.consumptions.clone()),
    }
}

fn normalize_storage(id: &str, s: &RawStorageUnit) -> StorageUnit {
    StorageUnit {
        id: id.to_string(),
        soc_start_of_ts: s.soc_start_of_ts.clone().unwrap_or_default(),
        soc_end_of_ts: s.soc_end_of_ts.clone().unwrap_or_default(),
        charge_inflows: s.charge_inflows.clone().unwrap_or_default(),
        discharge_outflows: s.discharge_outflows.clone().unwrap_or_default(),
        consumptions: s.consumptions.clone(),
        max_soc_capacity: s.max_soc_capacity,
        storage_type: s.storage_type.clone(),
    }
}

fn normalize_line(id: &str, line: &RawLine, version: SchemaVersion) -> TransmissionLine {
    TransmissionLine {
        id: id.to_string(),
        start_bus: line.start_bus.clone(),
        end_bus: line.end_bus.clone(),
        flows: pick(version, line.flow.clone(), line.flows.clone()),
        capacities: pick(version, line.capacity.clone(), line.capacities.clone()),
    }
}
