//! Bounded energy storage.
//!
//! External producers push energy in through [`EnergyBuffer::receive`], which
//! is rate-limited per call. The owning unit spends it with
//! [`EnergyBuffer::use_energy`], which bypasses the rate limits and can be
//! made all-or-nothing by passing the same value for `min` and `max`.

use serde::{Deserialize, Serialize};

/// Rate limits and capacity of an energy buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnergySpec {
    /// Maximum stored energy.
    pub capacity: u64,
    /// Maximum energy accepted from outside per call.
    pub max_receive: u64,
    /// Maximum energy handed out to outside callers per call.
    pub max_extract: u64,
}

impl Default for EnergySpec {
    fn default() -> Self {
        Self {
            capacity: 1000,
            max_receive: 20,
            max_extract: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnergyBuffer {
    spec: EnergySpec,
    stored: u64,
}

impl EnergyBuffer {
    pub fn new(spec: EnergySpec) -> Self {
        Self { spec, stored: 0 }
    }

    /// Accept energy from an external source. Returns the amount accepted.
    pub fn receive(&mut self, amount: u64, commit: bool) -> u64 {
        let accepted = amount.min(self.spec.max_receive).min(self.free_space());
        if commit {
            self.stored += accepted;
        }
        accepted
    }

    /// Hand energy to an external caller. Returns the amount extracted.
    pub fn extract(&mut self, amount: u64, commit: bool) -> u64 {
        let extracted = amount.min(self.spec.max_extract).min(self.stored);
        if commit {
            self.stored -= extracted;
        }
        extracted
    }

    /// Spend stored energy on internal work.
    ///
    /// Takes as much as possible up to `max`. If that is less than `min`,
    /// nothing is taken and 0 is returned.
    pub fn use_energy(&mut self, min: u64, max: u64, commit: bool) -> u64 {
        let to_use = self.stored.min(max);
        if to_use < min {
            return 0;
        }
        if commit {
            self.stored -= to_use;
        }
        to_use
    }

    pub fn stored(&self) -> u64 {
        self.stored
    }

    pub fn capacity(&self) -> u64 {
        self.spec.capacity
    }

    pub fn spec(&self) -> EnergySpec {
        self.spec
    }

    pub fn free_space(&self) -> u64 {
        self.spec.capacity.saturating_sub(self.stored)
    }

    /// Overwrite the stored level, clamped to capacity.
    pub(crate) fn set_stored(&mut self, stored: u64) {
        self.stored = stored.min(self.spec.capacity);
    }
}
