//! The energy heater: a single processing unit and its per-tick state machine.
//!
//! A heater owns an input tank, an output tank and an energy buffer. Each tick
//! it binds the recipe matching its input fluid, then either waits out its
//! settle timer, runs a full batch, or (after idling long enough on a short
//! input) forces a partial batch through. Finished fluid is pushed to the sink
//! on its export side whether or not the heater is switched on.

use tracing::{debug, trace};

use crate::capability::{
    ControlError, ControlMode, Controllable, DebugSnapshot, Debuggable, EnergyReceiver,
    FluidHandler, HasWork, HeaterPhase,
};
use crate::config::{ConfigError, HeaterConfig};
use crate::energy::EnergyBuffer;
use crate::event::HeaterEvent;
use crate::id::{Direction, FluidId, Ticks};
use crate::recipe::{HeatRecipe, RecipeCatalog};
use crate::site::Site;
use crate::tank::{FluidStack, FluidTank, TankInfo};

/// What a batch does when the input tank turns out to be short.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortfallPolicy {
    /// Put the drained fluid back and produce nothing.
    Rollback,
    /// For one-to-one recipes, produce as much as was drained. Other recipes
    /// still roll back.
    ScaledYield,
}

/// A single heater: two tanks, an energy buffer and the timers that pace its
/// batches, driven by one [`tick`](Heater::tick) per simulation step.
#[derive(Debug)]
pub struct Heater<C> {
    pub(crate) catalog: C,
    pub(crate) config: HeaterConfig,
    pub(crate) input: FluidTank,
    pub(crate) output: FluidTank,
    pub(crate) energy: EnergyBuffer,
    pub(crate) recipe: Option<HeatRecipe>,
    /// Ticks left before the next full batch may run.
    pub(crate) settle: u32,
    /// Ticks spent waiting on a short input. Never exceeds the idle ceiling.
    pub(crate) idle: u32,
    pub(crate) mode: ControlMode,
}

impl<C: RecipeCatalog> Heater<C> {
    /// Create a switched-on heater with empty tanks and no stored energy.
    pub fn new(catalog: C, config: HeaterConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            catalog,
            input: FluidTank::new(config.input_capacity),
            output: FluidTank::new(config.output_capacity),
            energy: EnergyBuffer::new(config.energy),
            config,
            recipe: None,
            settle: 0,
            idle: 0,
            mode: ControlMode::On,
        })
    }

    /// Advance the heater by one tick.
    ///
    /// 1. Rebind the recipe to the input fluid (even when switched off).
    /// 2. When switched on, settle, run a batch, or idle on a short input.
    /// 3. Export output fluid to the sink on the export side.
    ///
    /// Returns the events emitted this tick.
    pub fn tick<S: Site + ?Sized>(
        &mut self,
        current_tick: Ticks,
        site: &mut S,
    ) -> Vec<HeaterEvent> {
        let mut events = Vec::new();

        self.rebind(current_tick, &mut events);
        if self.is_enabled() {
            self.craft(current_tick, &mut events);
        }
        self.export(current_tick, site, &mut events);

        events
    }

    // -----------------------------------------------------------------------
    // Tick steps
    // -----------------------------------------------------------------------

    fn rebind(&mut self, tick: Ticks, events: &mut Vec<HeaterEvent>) {
        match self.recipe {
            None => {
                let Some(fluid) = self.input.fluid() else {
                    return;
                };
                if let Some(recipe) = self.catalog.lookup(fluid) {
                    debug!(?fluid, ticks = recipe.ticks, "heater recipe bound");
                    self.recipe = Some(recipe);
                    self.settle = recipe.ticks;
                    events.push(HeaterEvent::RecipeBound { input: fluid, tick });
                }
            }
            Some(recipe) => {
                if self.input.fluid() != Some(recipe.input.fluid) {
                    debug!(fluid = ?recipe.input.fluid, "heater recipe cleared");
                    self.recipe = None;
                    events.push(HeaterEvent::RecipeCleared {
                        input: recipe.input.fluid,
                        tick,
                    });
                }
            }
        }
    }

    fn craft(&mut self, tick: Ticks, events: &mut Vec<HeaterEvent>) {
        if self.ready(true) {
            if self.settle > 0 {
                self.settle -= 1;
                trace!(settle = self.settle, "heater settling");
                return;
            }
            self.heat(ShortfallPolicy::Rollback, tick, events);
        } else if self.ready(false) {
            if self.idle < self.config.idle_ceiling {
                self.idle += 1;
                trace!(idle = self.idle, "heater stalling on short input");
                return;
            }
            self.heat(ShortfallPolicy::ScaledYield, tick, events);
            self.idle = 0;
        }
    }

    /// Spend energy on one batch of the bound recipe.
    ///
    /// Energy is all-or-nothing: if the buffer cannot cover the whole cost,
    /// neither tank is touched. Once paid, the cost is not refunded even if
    /// the batch rolls back.
    fn heat(&mut self, policy: ShortfallPolicy, tick: Ticks, events: &mut Vec<HeaterEvent>) {
        let Some(recipe) = self.recipe else {
            return;
        };

        let required = self.required_energy(&recipe);
        if self.energy.use_energy(required, required, true) != required {
            trace!(required, stored = self.energy.stored(), "heater starved of energy");
            events.push(HeaterEvent::EnergyStarved {
                required,
                stored: self.energy.stored(),
                tick,
            });
            return;
        }

        match self.input.drain(recipe.input.amount, true) {
            Some(consumed) if consumed.amount >= recipe.input.amount => {
                let _ = self.output.fill(recipe.output, true);
                self.settle = recipe.ticks;
                debug!(
                    ?consumed,
                    produced = ?recipe.output,
                    energy = required,
                    "heater batch completed"
                );
                events.push(HeaterEvent::BatchCompleted {
                    consumed,
                    produced: recipe.output,
                    energy: required,
                    tick,
                });
            }
            Some(consumed)
                if policy == ShortfallPolicy::ScaledYield && recipe.is_one_to_one() =>
            {
                let produced = recipe.output.with_amount(consumed.amount);
                let _ = self.output.fill(produced, true);
                debug!(?consumed, ?produced, "heater forced a scaled batch");
                events.push(HeaterEvent::ScaledYield {
                    consumed,
                    produced,
                    energy: required,
                    tick,
                });
            }
            Some(short) => {
                let _ = self.input.fill(short, true);
                debug!(restored = ?short, "heater rolled back a short batch");
                events.push(HeaterEvent::RolledBack {
                    restored: short,
                    energy: required,
                    tick,
                });
            }
            None => {}
        }
    }

    fn export<S: Site + ?Sized>(
        &mut self,
        tick: Ticks,
        site: &mut S,
        events: &mut Vec<HeaterEvent>,
    ) {
        let Some(fluid) = self.output.fluid() else {
            return;
        };

        let direction = site.facing().rotate_ccw();
        let side = direction.opposite();
        let Some(sink) = site.sink_at(direction) else {
            return;
        };
        if !sink.can_accept(side, fluid) {
            return;
        }

        let Some(offered) = self.output.drain(self.config.export_rate, true) else {
            return;
        };
        let accepted = sink.offer(side, offered, true).min(offered.amount);
        if accepted < offered.amount {
            let _ = self
                .output
                .fill(offered.with_amount(offered.amount - accepted), true);
        }

        if accepted > 0 {
            trace!(accepted, ?direction, "heater exported");
            events.push(HeaterEvent::Exported {
                stack: offered.with_amount(accepted),
                tick,
            });
        }
    }

    // -----------------------------------------------------------------------
    // Gating
    // -----------------------------------------------------------------------

    /// Whether the bound recipe could run now.
    ///
    /// With `require_full_input` the input tank must hold a whole batch;
    /// without it any nonzero amount of the recipe's input will do. Either
    /// way the output tank must be empty or hold the recipe's output, with
    /// room for a whole batch.
    fn ready(&self, require_full_input: bool) -> bool {
        let Some(recipe) = self.recipe else {
            return false;
        };
        let needed = if require_full_input {
            recipe.input.amount
        } else {
            1
        };
        self.input.fluid() == Some(recipe.input.fluid)
            && self.input.amount() >= needed
            && self.output.holds_or_empty(recipe.output.fluid)
            && self.output.free_space() >= recipe.output.amount
    }

    /// Energy needed for one batch at the current input level.
    ///
    /// A recipe that cools (negative heat delta) costs nothing.
    fn required_energy(&self, recipe: &HeatRecipe) -> u64 {
        let units = i64::from(self.input.amount().min(recipe.input.amount));
        let cost = recipe
            .heat_delta()
            .saturating_mul(self.config.energy_per_heat_per_unit)
            .saturating_mul(i64::from(recipe.ticks))
            .saturating_mul(units);
        cost.max(0) as u64
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn set_enabled(&mut self, on: bool) {
        self.mode = if on { ControlMode::On } else { ControlMode::Off };
    }

    pub fn is_enabled(&self) -> bool {
        self.mode == ControlMode::On
    }

    /// A binding whose input has drained away reports `Idle`; the next
    /// tick's rebind clears it.
    pub fn phase(&self) -> HeaterPhase {
        let bound_input = self.recipe.map(|r| r.input.fluid);
        if !self.is_enabled() || bound_input.is_none() || self.input.fluid() != bound_input {
            HeaterPhase::Idle
        } else if self.ready(true) {
            if self.settle > 0 {
                HeaterPhase::Settling
            } else {
                HeaterPhase::ReadyFull
            }
        } else if self.ready(false) {
            if self.idle < self.config.idle_ceiling {
                HeaterPhase::Stalling
            } else {
                HeaterPhase::ReadyPartial
            }
        } else {
            HeaterPhase::Blocked
        }
    }

    pub fn input_tank(&self) -> &FluidTank {
        &self.input
    }

    pub fn output_tank(&self) -> &FluidTank {
        &self.output
    }

    pub fn energy(&self) -> &EnergyBuffer {
        &self.energy
    }

    pub fn recipe(&self) -> Option<&HeatRecipe> {
        self.recipe.as_ref()
    }

    pub fn settle(&self) -> u32 {
        self.settle
    }

    pub fn idle(&self) -> u32 {
        self.idle
    }

    pub fn config(&self) -> &HeaterConfig {
        &self.config
    }
}

// ---------------------------------------------------------------------------
// Capabilities
// ---------------------------------------------------------------------------

impl<C: RecipeCatalog> FluidHandler for Heater<C> {
    /// Only fluids some recipe accepts may enter, and only into the input tank.
    fn fill(&mut self, _side: Direction, stack: FluidStack, commit: bool) -> u32 {
        if self.catalog.lookup(stack.fluid).is_none() {
            return 0;
        }
        self.input.fill(stack, commit)
    }

    fn drain(&mut self, _side: Direction, max: u32, commit: bool) -> Option<FluidStack> {
        self.output.drain(max, commit)
    }

    fn drain_matching(
        &mut self,
        _side: Direction,
        stack: FluidStack,
        commit: bool,
    ) -> Option<FluidStack> {
        if self.output.fluid() != Some(stack.fluid) {
            return None;
        }
        self.output.drain(stack.amount, commit)
    }

    fn can_fill(&self, _side: Direction, fluid: FluidId) -> bool {
        self.catalog.lookup(fluid).is_some()
            && self.input.accept_amount(FluidStack::new(fluid, 1)) == 1
    }

    fn can_drain(&self, _side: Direction, _fluid: FluidId) -> bool {
        !self.output.is_empty()
    }

    fn tank_info(&self, _side: Direction) -> Vec<TankInfo> {
        vec![self.input.info(), self.output.info()]
    }
}

impl<C: RecipeCatalog> EnergyReceiver for Heater<C> {
    fn receive_energy(&mut self, amount: u64, commit: bool) -> u64 {
        self.energy.receive(amount, commit)
    }

    fn extract_energy(&mut self, amount: u64, commit: bool) -> u64 {
        self.energy.extract(amount, commit)
    }

    fn energy_stored(&self) -> u64 {
        self.energy.stored()
    }

    fn energy_capacity(&self) -> u64 {
        self.energy.capacity()
    }
}

impl<C: RecipeCatalog> Controllable for Heater<C> {
    fn control_mode(&self) -> ControlMode {
        self.mode
    }

    fn accepts_control_mode(&self, mode: ControlMode) -> bool {
        matches!(mode, ControlMode::On | ControlMode::Off)
    }

    fn set_control_mode(&mut self, mode: ControlMode) -> Result<(), ControlError> {
        if !self.accepts_control_mode(mode) {
            return Err(ControlError::Unsupported(mode));
        }
        self.mode = mode;
        Ok(())
    }
}

impl<C: RecipeCatalog> HasWork for Heater<C> {
    fn has_work(&self) -> bool {
        self.ready(true)
    }
}

impl<C: RecipeCatalog> Debuggable for Heater<C> {
    fn debug_snapshot(&self) -> DebugSnapshot {
        DebugSnapshot {
            phase: self.phase(),
            settle: self.settle,
            idle: self.idle,
            input: self.input.info(),
            output: self.output.info(),
            energy: self.energy.stored(),
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
