//! Serde data file structs for heater content definitions.
//!
//! These structs define the on-disk format for fluids, heat recipes and
//! heater tunables. They are deserialized from RON, JSON, or TOML data files
//! and then resolved into engine types by the loader.

use ember_core::config::HeaterConfig;
use ember_core::energy::EnergySpec;
use serde::Deserialize;

// ===========================================================================
// Fluids
// ===========================================================================

/// A fluid type definition in a data file.
#[derive(Debug, Clone, Deserialize)]
pub struct FluidData {
    pub name: String,
}

// ===========================================================================
// Heat recipes
// ===========================================================================

/// A heat recipe definition. Fluids are referenced by name as
/// `("fluid_name", amount)`.
#[derive(Debug, Clone, Deserialize)]
pub struct HeatRecipeData {
    pub input: (String, u32),
    pub output: (String, u32),
    pub heat_from: i32,
    pub heat_to: i32,
    pub ticks: u32,
}

// ===========================================================================
// Heater tunables
// ===========================================================================

/// Heater tunables. Every field is optional; missing fields keep the
/// [`HeaterConfig`] default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeaterTuning {
    pub input_capacity: Option<u32>,
    pub output_capacity: Option<u32>,
    pub energy_capacity: Option<u64>,
    pub max_receive: Option<u64>,
    pub max_extract: Option<u64>,
    pub energy_per_heat_per_unit: Option<i64>,
    pub export_rate: Option<u32>,
    pub idle_ceiling: Option<u32>,
}

impl HeaterTuning {
    /// Overlay the given fields on the default config.
    pub fn into_config(self) -> HeaterConfig {
        let base = HeaterConfig::default();
        HeaterConfig {
            input_capacity: self.input_capacity.unwrap_or(base.input_capacity),
            output_capacity: self.output_capacity.unwrap_or(base.output_capacity),
            energy: EnergySpec {
                capacity: self.energy_capacity.unwrap_or(base.energy.capacity),
                max_receive: self.max_receive.unwrap_or(base.energy.max_receive),
                max_extract: self.max_extract.unwrap_or(base.energy.max_extract),
            },
            energy_per_heat_per_unit: self
                .energy_per_heat_per_unit
                .unwrap_or(base.energy_per_heat_per_unit),
            export_rate: self.export_rate.unwrap_or(base.export_rate),
            idle_ceiling: self.idle_ceiling.unwrap_or(base.idle_ceiling),
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
