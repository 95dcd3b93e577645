//! Shared test helpers for unit tests, integration tests and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]`.

use crate::capability::{EnergyReceiver, FluidHandler};
use crate::config::HeaterConfig;
use crate::event::HeaterEvent;
use crate::heater::Heater;
use crate::id::{Direction, FluidId, Ticks};
use crate::recipe::{HeatRecipe, RecipeCatalog};
use crate::site::{ExportSink, Site};
use crate::tank::{FluidStack, FluidTank};

// ===========================================================================
// Fluid constructors
// ===========================================================================

pub fn water() -> FluidId {
    FluidId(0)
}
pub fn steam() -> FluidId {
    FluidId(1)
}
pub fn oil() -> FluidId {
    FluidId(2)
}
pub fn hot_oil() -> FluidId {
    FluidId(3)
}

// ===========================================================================
// Recipes
// ===========================================================================

pub fn make_recipe(
    input: (FluidId, u32),
    output: (FluidId, u32),
    heat: (i32, i32),
    ticks: u32,
) -> HeatRecipe {
    HeatRecipe {
        input: FluidStack::new(input.0, input.1),
        output: FluidStack::new(output.0, output.1),
        heat_from: heat.0,
        heat_to: heat.1,
        ticks,
    }
}

/// Oil to hot oil, 10:10 over 2 ticks, one degree. Costs 20 energy per batch
/// at the default energy rate.
pub fn oil_recipe() -> HeatRecipe {
    make_recipe((oil(), 10), (hot_oil(), 10), (0, 1), 2)
}

/// Water to steam, 10:20 over 2 ticks, one degree. Never scales a short batch.
pub fn boil_recipe() -> HeatRecipe {
    make_recipe((water(), 10), (steam(), 20), (99, 100), 2)
}

/// A catalog backed by a plain list; the first matching input wins.
#[derive(Debug, Clone, Default)]
pub struct ListCatalog {
    pub recipes: Vec<HeatRecipe>,
}

impl ListCatalog {
    pub fn new(recipes: Vec<HeatRecipe>) -> Self {
        Self { recipes }
    }
}

impl RecipeCatalog for ListCatalog {
    fn lookup(&self, input: FluidId) -> Option<HeatRecipe> {
        self.recipes.iter().find(|r| r.input.fluid == input).copied()
    }
}

// ===========================================================================
// Sinks and sites
// ===========================================================================

/// A sink that takes at most `per_offer` units per offer.
#[derive(Debug, Clone)]
pub struct LimitedSink {
    pub tank: FluidTank,
    pub per_offer: u32,
    /// When set, `can_accept` says no to everything.
    pub refuse: bool,
    /// Side of the most recent offer.
    pub last_side: Option<Direction>,
}

impl LimitedSink {
    pub fn new(capacity: u32, per_offer: u32) -> Self {
        Self {
            tank: FluidTank::new(capacity),
            per_offer,
            refuse: false,
            last_side: None,
        }
    }
}

impl ExportSink for LimitedSink {
    fn can_accept(&self, _side: Direction, fluid: FluidId) -> bool {
        !self.refuse && self.tank.holds_or_empty(fluid)
    }

    fn offer(&mut self, side: Direction, stack: FluidStack, commit: bool) -> u32 {
        self.last_side = Some(side);
        let capped = stack.with_amount(stack.amount.min(self.per_offer));
        self.tank.fill(capped, commit)
    }
}

/// A fixed facing with sinks on chosen sides.
#[derive(Debug, Clone)]
pub struct TestSite {
    pub facing: Direction,
    pub sinks: Vec<(Direction, LimitedSink)>,
}

impl TestSite {
    pub fn empty(facing: Direction) -> Self {
        Self {
            facing,
            sinks: Vec::new(),
        }
    }

    pub fn with_sink(facing: Direction, side: Direction, sink: LimitedSink) -> Self {
        Self {
            facing,
            sinks: vec![(side, sink)],
        }
    }

    pub fn sink(&self, side: Direction) -> Option<&LimitedSink> {
        self.sinks.iter().find(|(d, _)| *d == side).map(|(_, s)| s)
    }
}

impl Site for TestSite {
    fn facing(&self) -> Direction {
        self.facing
    }

    fn sink_at(&mut self, direction: Direction) -> Option<&mut dyn ExportSink> {
        self.sinks
            .iter_mut()
            .find(|(d, _)| *d == direction)
            .map(|(_, s)| s as &mut dyn ExportSink)
    }
}

// ===========================================================================
// Heater helpers
// ===========================================================================

/// A default-config heater over a list catalog.
pub fn make_heater(recipes: Vec<HeatRecipe>) -> Heater<ListCatalog> {
    Heater::new(ListCatalog::new(recipes), HeaterConfig::default())
        .expect("default config is valid")
}

/// Pour fluid in through the fluid handler. Returns the amount accepted.
pub fn pour<C: RecipeCatalog>(heater: &mut Heater<C>, stack: FluidStack) -> u32 {
    heater.fill(Direction::Up, stack, true)
}

/// Feed energy until `target` is stored or the buffer stops accepting.
pub fn charge<C: RecipeCatalog>(heater: &mut Heater<C>, target: u64) {
    while heater.energy_stored() < target {
        let wanted = target - heater.energy_stored();
        if heater.receive_energy(wanted, true) == 0 {
            break;
        }
    }
}

/// Run ticks `from..to`, collecting every event.
pub fn run<C: RecipeCatalog, S: Site>(
    heater: &mut Heater<C>,
    site: &mut S,
    from: Ticks,
    to: Ticks,
) -> Vec<HeaterEvent> {
    let mut events = Vec::new();
    for tick in from..to {
        events.extend(heater.tick(tick, site));
    }
    events
}
