//! Tunables for a heater.

use crate::energy::EnergySpec;
use serde::{Deserialize, Serialize};

/// Construction-time parameters of a [`Heater`](crate::heater::Heater).
///
/// Every field has a default, so partial config files deserialize cleanly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaterConfig {
    pub input_capacity: u32,
    pub output_capacity: u32,
    pub energy: EnergySpec,
    /// Energy per degree of heat delta, per tick of duration, per fluid unit.
    pub energy_per_heat_per_unit: i64,
    /// Most fluid offered to the export sink per tick.
    pub export_rate: u32,
    /// Ticks a short input waits before being forced through.
    pub idle_ceiling: u32,
}

impl Default for HeaterConfig {
    fn default() -> Self {
        Self {
            input_capacity: 1000,
            output_capacity: 1000,
            energy: EnergySpec::default(),
            energy_per_heat_per_unit: 1,
            export_rate: 20,
            idle_ceiling: 20,
        }
    }
}

impl HeaterConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.input_capacity == 0 {
            return Err(ConfigError::ZeroCapacity("input"));
        }
        if self.output_capacity == 0 {
            return Err(ConfigError::ZeroCapacity("output"));
        }
        if self.energy.capacity == 0 {
            return Err(ConfigError::ZeroCapacity("energy"));
        }
        if self.export_rate == 0 {
            return Err(ConfigError::ZeroExportRate);
        }
        if self.energy_per_heat_per_unit < 0 {
            return Err(ConfigError::NegativeEnergyCost(self.energy_per_heat_per_unit));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} capacity must be positive")]
    ZeroCapacity(&'static str),
    #[error("export rate must be positive")]
    ZeroExportRate,
    #[error("energy per heat per unit must not be negative, got {0}")]
    NegativeEnergyCost(i64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert_eq!(HeaterConfig::default().validate(), Ok(()));
    }

    #[test]
    fn zero_capacity_rejected() {
        let config = HeaterConfig {
            output_capacity: 0,
            ..HeaterConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroCapacity("output")));
    }

    #[test]
    fn zero_export_rate_rejected() {
        let config = HeaterConfig {
            export_rate: 0,
            ..HeaterConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroExportRate));
    }

    #[test]
    fn negative_energy_cost_rejected() {
        let config = HeaterConfig {
            energy_per_heat_per_unit: -3,
            ..HeaterConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::NegativeEnergyCost(-3)));
    }
}
