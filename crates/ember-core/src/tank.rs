//! Fixed-capacity fluid tanks.
//!
//! A [`FluidTank`] holds at most one fluid type at a time. Every operation
//! saturates instead of failing: fills accept what fits, drains return what
//! is there, and a `commit == false` call reports the outcome without
//! touching the tank.

use crate::id::FluidId;
use serde::{Deserialize, Serialize};

/// An amount of a single fluid type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FluidStack {
    pub fluid: FluidId,
    pub amount: u32,
}

impl FluidStack {
    pub fn new(fluid: FluidId, amount: u32) -> Self {
        Self { fluid, amount }
    }

    /// The same fluid with a different amount.
    pub fn with_amount(self, amount: u32) -> Self {
        Self {
            fluid: self.fluid,
            amount,
        }
    }
}

/// Read-only copy of a tank's contents and capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TankInfo {
    pub contents: Option<FluidStack>,
    pub capacity: u32,
}

impl TankInfo {
    pub fn amount(&self) -> u32 {
        self.contents.map_or(0, |s| s.amount)
    }
}

/// A bounded store for one fluid type.
///
/// Invariant: `contents` is `None` or holds a positive amount no greater
/// than `capacity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FluidTank {
    contents: Option<FluidStack>,
    capacity: u32,
}

impl FluidTank {
    pub fn new(capacity: u32) -> Self {
        Self {
            contents: None,
            capacity,
        }
    }

    /// Fill the tank. Returns the amount accepted.
    ///
    /// Accepts `min(stack.amount, free_space)` when the tank is empty or
    /// already holds `stack.fluid`, and nothing otherwise.
    #[must_use = "the accepted amount may be less than offered"]
    pub fn fill(&mut self, stack: FluidStack, commit: bool) -> u32 {
        let accepted = self.accept_amount(stack);

        if commit && accepted > 0 {
            let current = self.amount();
            self.contents = Some(stack.with_amount(current + accepted));
        }

        accepted
    }

    /// How much of `stack` a fill would accept, without filling.
    pub fn accept_amount(&self, stack: FluidStack) -> u32 {
        match self.contents {
            Some(held) if held.fluid != stack.fluid => 0,
            _ => stack.amount.min(self.free_space()),
        }
    }

    /// Drain up to `max` units. Returns what was removed, or `None` when
    /// nothing would be (empty tank or `max == 0`).
    pub fn drain(&mut self, max: u32, commit: bool) -> Option<FluidStack> {
        let held = self.contents?;
        let removed = max.min(held.amount);
        if removed == 0 {
            return None;
        }

        if commit {
            let left = held.amount - removed;
            self.contents = (left > 0).then(|| held.with_amount(left));
        }

        Some(held.with_amount(removed))
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_none()
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn amount(&self) -> u32 {
        self.contents.map_or(0, |s| s.amount)
    }

    pub fn fluid(&self) -> Option<FluidId> {
        self.contents.map(|s| s.fluid)
    }

    pub fn contents(&self) -> Option<FluidStack> {
        self.contents
    }

    pub fn free_space(&self) -> u32 {
        self.capacity.saturating_sub(self.amount())
    }

    /// Whether the tank is empty or holds `fluid`.
    pub fn holds_or_empty(&self, fluid: FluidId) -> bool {
        self.fluid().is_none_or(|held| held == fluid)
    }

    pub fn info(&self) -> TankInfo {
        TankInfo {
            contents: self.contents,
            capacity: self.capacity,
        }
    }

    /// Replace the contents wholesale. Used when restoring saved or
    /// replicated state; the caller is responsible for the capacity check.
    pub(crate) fn set_contents(&mut self, contents: Option<FluidStack>) {
        self.contents = contents.filter(|s| s.amount > 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn water(amount: u32) -> FluidStack {
        FluidStack::new(FluidId(0), amount)
    }

    fn oil(amount: u32) -> FluidStack {
        FluidStack::new(FluidId(1), amount)
    }

    #[test]
    fn fill_empty_tank() {
        let mut tank = FluidTank::new(1000);
        assert_eq!(tank.fill(water(250), true), 250);
        assert_eq!(tank.amount(), 250);
        assert_eq!(tank.fluid(), Some(FluidId(0)));
    }

    #[test]
    fn fill_clamps_to_capacity() {
        let mut tank = FluidTank::new(100);
        assert_eq!(tank.fill(water(60), true), 60);
        assert_eq!(tank.fill(water(60), true), 40);
        assert_eq!(tank.amount(), 100);
        assert_eq!(tank.free_space(), 0);
        assert_eq!(tank.fill(water(1), true), 0);
    }

    #[test]
    fn fill_rejects_other_fluid() {
        let mut tank = FluidTank::new(100);
        let _ = tank.fill(water(10), true);
        assert_eq!(tank.fill(oil(10), true), 0);
        assert_eq!(tank.contents(), Some(water(10)));
    }

    #[test]
    fn dry_run_fill_does_not_mutate() {
        let mut tank = FluidTank::new(100);
        assert_eq!(tank.fill(water(30), false), 30);
        assert!(tank.is_empty());
    }

    #[test]
    fn zero_fill_leaves_tank_empty() {
        let mut tank = FluidTank::new(100);
        assert_eq!(tank.fill(water(0), true), 0);
        assert!(tank.is_empty());
        assert_eq!(tank.fluid(), None);
    }

    #[test]
    fn drain_partial_and_full() {
        let mut tank = FluidTank::new(100);
        let _ = tank.fill(water(30), true);

        assert_eq!(tank.drain(20, true), Some(water(20)));
        assert_eq!(tank.amount(), 10);

        assert_eq!(tank.drain(50, true), Some(water(10)));
        assert!(tank.is_empty());
        assert_eq!(tank.fluid(), None);
    }

    #[test]
    fn drain_empty_tank_returns_none() {
        let mut tank = FluidTank::new(100);
        assert_eq!(tank.drain(10, true), None);
    }

    #[test]
    fn drain_zero_returns_none() {
        let mut tank = FluidTank::new(100);
        let _ = tank.fill(water(5), true);
        assert_eq!(tank.drain(0, true), None);
        assert_eq!(tank.amount(), 5);
    }

    #[test]
    fn dry_run_drain_does_not_mutate() {
        let mut tank = FluidTank::new(100);
        let _ = tank.fill(oil(40), true);
        assert_eq!(tank.drain(25, false), Some(oil(25)));
        assert_eq!(tank.amount(), 40);
    }

    #[test]
    fn emptied_tank_accepts_new_fluid() {
        let mut tank = FluidTank::new(100);
        let _ = tank.fill(water(10), true);
        let _ = tank.drain(10, true);
        assert_eq!(tank.fill(oil(10), true), 10);
        assert_eq!(tank.fluid(), Some(FluidId(1)));
    }

    #[test]
    fn holds_or_empty() {
        let mut tank = FluidTank::new(100);
        assert!(tank.holds_or_empty(FluidId(7)));
        let _ = tank.fill(water(1), true);
        assert!(tank.holds_or_empty(FluidId(0)));
        assert!(!tank.holds_or_empty(FluidId(1)));
    }

    #[test]
    fn info_reflects_contents() {
        let mut tank = FluidTank::new(500);
        let _ = tank.fill(oil(120), true);
        let info = tank.info();
        assert_eq!(info.capacity, 500);
        assert_eq!(info.amount(), 120);
        assert_eq!(info.contents, Some(oil(120)));
    }
}
