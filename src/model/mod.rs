//! Network model: raw JSON schema, normalized snapshot, and the fail-soft
//! per-timestep value accessor.

mod raw;
mod snapshot;
mod value;

pub use snapshot::{
    Bus, Generator, Load, LoadConvention, LoadError, NetworkSnapshot, SchemaVersion, StorageUnit,
    Timestep, TransmissionLine,
};
pub use value::{NA, Series, fmt_value, value_at};
