//! Save state and observer sync for heaters.
//!
//! Two encodings, both bitcode:
//!
//! - **Save state** ([`HeaterState`]): everything needed to resume a heater
//!   exactly, behind a [`StateHeader`] with a magic number and format version.
//! - **Sync payload** ([`SyncPayload`]): the input tank, output tank and settle
//!   timer, in that order, for replicating to a passive [`HeaterView`]. The
//!   idle timer is not sent.
//!
//! [`HeaterView`]: crate::view::HeaterView

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::capability::{ControlMode, Controllable};
use crate::heater::Heater;
use crate::id::FluidId;
use crate::recipe::RecipeCatalog;
use crate::tank::{FluidStack, FluidTank};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Magic number identifying a heater save state.
pub const STATE_MAGIC: u32 = 0xE4BE_0001;

/// Current save format version. Increment when breaking the layout.
pub const FORMAT_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum SerializeError {
    #[error("bitcode encoding failed: {0}")]
    Encode(String),
}

#[derive(Debug, thiserror::Error)]
pub enum DeserializeError {
    #[error("invalid magic number: expected 0x{:08X}, got 0x{:08X}", STATE_MAGIC, .0)]
    InvalidMagic(u32),
    #[error("unsupported format version: expected {}, got {}", FORMAT_VERSION, .0)]
    UnsupportedVersion(u32),
    #[error("state from future version {0} (this build supports up to {FORMAT_VERSION})")]
    FutureVersion(u32),
    #[error("bitcode decoding failed: {0}")]
    Decode(String),
    #[error("{tank} tank holds {amount} but capacity is {capacity}")]
    Overfull {
        tank: &'static str,
        amount: u32,
        capacity: u32,
    },
    #[error("saved control mode {0:?} is not supported")]
    UnsupportedMode(ControlMode),
}

// ---------------------------------------------------------------------------
// Header
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateHeader {
    pub magic: u32,
    pub version: u32,
}

impl StateHeader {
    pub fn new() -> Self {
        Self {
            magic: STATE_MAGIC,
            version: FORMAT_VERSION,
        }
    }

    pub fn validate(&self) -> Result<(), DeserializeError> {
        if self.magic != STATE_MAGIC {
            return Err(DeserializeError::InvalidMagic(self.magic));
        }
        if self.version > FORMAT_VERSION {
            return Err(DeserializeError::FutureVersion(self.version));
        }
        if self.version < FORMAT_VERSION {
            return Err(DeserializeError::UnsupportedVersion(self.version));
        }
        Ok(())
    }
}

impl Default for StateHeader {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Save state
// ---------------------------------------------------------------------------

/// Everything a heater persists.
///
/// Only the input fluid of the bound recipe is saved. The recipe itself is
/// looked up again from the catalog on restore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaterState {
    pub header: StateHeader,
    pub bound: Option<FluidId>,
    pub input: Option<FluidStack>,
    pub output: Option<FluidStack>,
    pub sleep: u32,
    pub late_sleep: u32,
    pub energy: u64,
    pub mode: ControlMode,
}

// ---------------------------------------------------------------------------
// Sync payload
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncPayload {
    pub input: Option<FluidStack>,
    pub output: Option<FluidStack>,
    pub sleep: u32,
}

impl SyncPayload {
    pub fn encode(&self) -> Result<Vec<u8>, SerializeError> {
        bitcode::serialize(self).map_err(|e| SerializeError::Encode(e.to_string()))
    }

    pub fn decode(data: &[u8]) -> Result<Self, DeserializeError> {
        bitcode::deserialize(data).map_err(|e| DeserializeError::Decode(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Heater integration
// ---------------------------------------------------------------------------

impl<C: RecipeCatalog> Heater<C> {
    pub fn save_state(&self) -> HeaterState {
        HeaterState {
            header: StateHeader::new(),
            bound: self.recipe.map(|r| r.input.fluid),
            input: self.input.contents(),
            output: self.output.contents(),
            sleep: self.settle,
            late_sleep: self.idle,
            energy: self.energy.stored(),
            mode: self.mode,
        }
    }

    /// Restore a saved state.
    ///
    /// The state is checked in full before anything changes, so a rejected
    /// state leaves the heater as it was. The saved recipe binding is looked
    /// up immediately, so the settle timer survives the next tick.
    pub fn restore_state(&mut self, state: &HeaterState) -> Result<(), DeserializeError> {
        state.header.validate()?;
        check_fits("input", state.input, &self.input)?;
        check_fits("output", state.output, &self.output)?;
        if !self.accepts_control_mode(state.mode) {
            return Err(DeserializeError::UnsupportedMode(state.mode));
        }
        if state.energy > self.energy.capacity() {
            warn!(
                saved = state.energy,
                capacity = self.energy.capacity(),
                "saved heater energy exceeds capacity, clamping"
            );
        }

        self.input.set_contents(state.input);
        self.output.set_contents(state.output);
        self.energy.set_stored(state.energy);
        self.settle = state.sleep;
        self.idle = state.late_sleep.min(self.config.idle_ceiling);
        self.mode = state.mode;
        self.recipe = state.bound.and_then(|f| self.catalog.lookup(f));
        Ok(())
    }

    /// Serialize the save state to a binary blob.
    pub fn serialize(&self) -> Result<Vec<u8>, SerializeError> {
        bitcode::serialize(&self.save_state()).map_err(|e| SerializeError::Encode(e.to_string()))
    }

    /// Decode a blob from [`Heater::serialize`] and restore it.
    pub fn deserialize_into(&mut self, data: &[u8]) -> Result<(), DeserializeError> {
        let state: HeaterState =
            bitcode::deserialize(data).map_err(|e| DeserializeError::Decode(e.to_string()))?;
        self.restore_state(&state).inspect_err(|e| {
            warn!(error = %e, "rejected saved heater state");
        })
    }

    pub fn sync_payload(&self) -> SyncPayload {
        SyncPayload {
            input: self.input.contents(),
            output: self.output.contents(),
            sleep: self.settle,
        }
    }
}

pub(crate) fn check_fits(
    tank: &'static str,
    contents: Option<FluidStack>,
    into: &FluidTank,
) -> Result<(), DeserializeError> {
    match contents {
        Some(stack) if stack.amount > into.capacity() => Err(DeserializeError::Overfull {
            tank,
            amount: stack.amount,
            capacity: into.capacity(),
        }),
        _ => Ok(()),
    }
}
