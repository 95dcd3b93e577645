//! Ember Core -- a tick-driven energy heater for fluid processing.
//!
//! A heater pulls an input fluid from its input tank, spends stored energy to
//! turn it into an output fluid according to a [`recipe::HeatRecipe`], and
//! pushes the result into whatever sink sits beside it.
//!
//! # Tick Pipeline
//!
//! Each call to [`heater::Heater::tick`] runs four steps in order:
//!
//! 1. **Rebind** -- Look up (or drop) the recipe for the input tank's fluid.
//! 2. **Gate** -- Skip crafting when the heater is switched off.
//! 3. **Craft** -- Count down the settle timer, or spend energy to move a
//!    batch from the input tank to the output tank. A persistently short input
//!    is eventually forced through as a scaled batch.
//! 4. **Export** -- Offer up to one export batch to the sink on the export
//!    side, keeping whatever it refuses.
//!
//! # Key Types
//!
//! - [`heater::Heater`] -- The processing unit and its state machine.
//! - [`tank::FluidTank`] -- Fixed-capacity single-fluid buffer.
//! - [`energy::EnergyBuffer`] -- Bounded energy store with rate limits.
//! - [`recipe::RecipeCatalog`] -- Injected recipe lookup service, with
//!   [`recipe::HeatRecipeRegistry`] as the stock implementation.
//! - [`site::Site`] / [`site::ExportSink`] -- What the heater can see around it.
//! - [`capability`] -- Narrow traits for fluid handling, control, work
//!   reporting and diagnostics.
//! - [`persist`] -- Versioned save state and observer sync payloads via bitcode.

pub mod capability;
pub mod config;
pub mod energy;
pub mod event;
pub mod heater;
pub mod id;
pub mod persist;
pub mod recipe;
pub mod site;
pub mod tank;
pub mod view;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
