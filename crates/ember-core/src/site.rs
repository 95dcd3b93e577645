//! The heater's view of its placement.
//!
//! Geometry lives outside this crate. A [`Site`] answers two questions each
//! tick: which way the unit faces, and whether something that can take fluid
//! sits on a given side.

use crate::id::{Direction, FluidId};
use crate::tank::{FluidStack, FluidTank};

/// Something adjacent to the heater that can receive exported fluid.
pub trait ExportSink {
    /// Whether fluid of this type may currently enter from `side`.
    fn can_accept(&self, side: Direction, fluid: FluidId) -> bool;

    /// Offer fluid entering from `side`. Returns the amount accepted.
    fn offer(&mut self, side: Direction, stack: FluidStack, commit: bool) -> u32;
}

/// Placement queries answered by whoever owns the world.
pub trait Site {
    fn facing(&self) -> Direction;

    /// The sink adjacent on `direction`, if there is one.
    fn sink_at(&mut self, direction: Direction) -> Option<&mut dyn ExportSink>;
}

/// A bare tank is a valid sink on every side.
impl ExportSink for FluidTank {
    fn can_accept(&self, _side: Direction, fluid: FluidId) -> bool {
        self.holds_or_empty(fluid) && self.free_space() > 0
    }

    fn offer(&mut self, _side: Direction, stack: FluidStack, commit: bool) -> u32 {
        self.fill(stack, commit)
    }
}
