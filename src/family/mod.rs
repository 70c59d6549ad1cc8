mod dt;
mod es;
mod et;

use std::sync::OnceLock;

use crate::error::{Error, Result};
use crate::sensor::{self, SensorDefinition, SensorMap};

/// Wire protocol a family speaks for runtime data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FamilyProtocol {
    Aa55,
    Modbus,
}

/// Immutable per-family register/byte map plus the Modbus read window.
/// Built once and shared read-only across all handler instances.
pub struct FamilyConfig {
    pub protocol: FamilyProtocol,
    pub register_start: Option<u16>,
    pub register_count: Option<u16>,
    pub sensors: Vec<SensorDefinition>,
}

impl FamilyConfig {
    /// Expected runtime payload length in bytes, for sized Modbus reads.
    pub fn payload_len(&self) -> Option<usize> {
        self.register_count.map(|count| usize::from(count) * 2)
    }

    pub fn parse(&self, payload: &[u8]) -> SensorMap {
        sensor::parse_sensor_data(&self.sensors, self.register_start, payload)
    }
}

// Family codes sharing one layout. The three canonical tables are aliased
// across the product lines that reuse them.
const HYBRID_FAMILIES: [&str; 5] = ["ET", "EH", "BT", "BH", "GEH"];
const GRID_TIE_FAMILIES: [&str; 5] = ["DT", "MS", "NS", "XS", "D-NS"];
const STORAGE_FAMILIES: [&str; 3] = ["ES", "EM", "BP"];

static ET_CONFIG: OnceLock<FamilyConfig> = OnceLock::new();
static DT_CONFIG: OnceLock<FamilyConfig> = OnceLock::new();
static ES_CONFIG: OnceLock<FamilyConfig> = OnceLock::new();

pub fn et() -> &'static FamilyConfig {
    ET_CONFIG.get_or_init(et::config)
}

pub fn dt() -> &'static FamilyConfig {
    DT_CONFIG.get_or_init(dt::config)
}

pub fn es() -> &'static FamilyConfig {
    ES_CONFIG.get_or_init(es::config)
}

/// Looks up the table for a family code.
pub fn resolve(family: &str) -> Result<&'static FamilyConfig> {
    let code = family.to_uppercase();

    if HYBRID_FAMILIES.contains(&code.as_str()) {
        Ok(et())
    } else if GRID_TIE_FAMILIES.contains(&code.as_str()) {
        Ok(dt())
    } else if STORAGE_FAMILIES.contains(&code.as_str()) {
        Ok(es())
    } else {
        Err(Error::UnsupportedFamily(family.to_string()))
    }
}

/// Modbus unit address a family answers on when none is configured.
/// Unrecognised codes fall back to the hybrid/storage address; this is a
/// best-effort default, not an error.
pub fn default_comm_addr(family: &str) -> u8 {
    let code = family.to_uppercase();

    if GRID_TIE_FAMILIES.contains(&code.as_str()) {
        0x7F
    } else {
        0xF7
    }
}
