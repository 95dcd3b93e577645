//! Capability traits a unit exposes to its surroundings.
//!
//! Each trait covers one concern so callers depend only on what they use:
//! pipes see [`FluidHandler`], power cables see [`EnergyReceiver`], a
//! scheduler sees [`Controllable`] and [`HasWork`], tooling sees
//! [`Debuggable`].

use crate::id::{Direction, FluidId};
use crate::tank::{FluidStack, TankInfo};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Fluid handling
// ---------------------------------------------------------------------------

pub trait FluidHandler {
    /// Offer fluid entering from `side`. Returns the amount accepted.
    fn fill(&mut self, side: Direction, stack: FluidStack, commit: bool) -> u32;

    /// Drain up to `max` units of whatever the unit offers.
    fn drain(&mut self, side: Direction, max: u32, commit: bool) -> Option<FluidStack>;

    /// Drain up to `stack.amount`, but only of `stack.fluid`.
    fn drain_matching(
        &mut self,
        side: Direction,
        stack: FluidStack,
        commit: bool,
    ) -> Option<FluidStack>;

    fn can_fill(&self, side: Direction, fluid: FluidId) -> bool;

    fn can_drain(&self, side: Direction, fluid: FluidId) -> bool;

    fn tank_info(&self, side: Direction) -> Vec<TankInfo>;
}

// ---------------------------------------------------------------------------
// Energy
// ---------------------------------------------------------------------------

pub trait EnergyReceiver {
    /// Push energy in. Returns the amount accepted.
    fn receive_energy(&mut self, amount: u64, commit: bool) -> u64;

    /// Pull energy out. Returns the amount extracted.
    fn extract_energy(&mut self, amount: u64, commit: bool) -> u64;

    fn energy_stored(&self) -> u64;

    fn energy_capacity(&self) -> u64;
}

// ---------------------------------------------------------------------------
// Control
// ---------------------------------------------------------------------------

/// Operating modes an external controller may request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControlMode {
    #[default]
    Unknown,
    On,
    Off,
    Loop,
}

pub trait Controllable {
    fn control_mode(&self) -> ControlMode;

    fn accepts_control_mode(&self, mode: ControlMode) -> bool;

    /// Switch modes. Fails, leaving the mode unchanged, for unsupported modes.
    fn set_control_mode(&mut self, mode: ControlMode) -> Result<(), ControlError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ControlError {
    #[error("control mode {0:?} is not supported")]
    Unsupported(ControlMode),
}

// ---------------------------------------------------------------------------
// Work reporting
// ---------------------------------------------------------------------------

pub trait HasWork {
    fn has_work(&self) -> bool;
}

// ---------------------------------------------------------------------------
// Diagnostics
// ---------------------------------------------------------------------------

/// Where the heater sits in its per-tick state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeaterPhase {
    /// Switched off, or no recipe bound to what the input tank holds.
    Idle,
    /// A full batch is ready but the settle timer is still running.
    Settling,
    /// A full batch will run on the next tick.
    ReadyFull,
    /// Only a short batch is possible and the idle timer is still running.
    Stalling,
    /// A short batch will be forced through on the next tick.
    ReadyPartial,
    /// A recipe is bound but the output side has no room for it.
    Blocked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebugSnapshot {
    pub phase: HeaterPhase,
    pub settle: u32,
    pub idle: u32,
    pub input: TankInfo,
    pub output: TankInfo,
    pub energy: u64,
}

impl fmt::Display for DebugSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Phase = {:?}", self.phase)?;
        writeln!(f, "Sleep = {}", self.settle)?;
        writeln!(f, "Energy = {}", self.energy)?;
        for (label, tank) in [("Input", &self.input), ("Output", &self.output)] {
            writeln!(f, "{label}")?;
            writeln!(f, " {}/{}mB", tank.amount(), tank.capacity)?;
            match tank.contents {
                Some(stack) => writeln!(f, " fluid #{}", stack.fluid.0)?,
                None => writeln!(f, " empty")?,
            }
        }
        Ok(())
    }
}

pub trait Debuggable {
    fn debug_snapshot(&self) -> DebugSnapshot;
}
