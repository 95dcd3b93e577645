//! Headless heater: load the bundled data pack and run a heater for a while.
//!
//! Feeds oil and energy into a heater facing north, exports hot oil into a
//! barrel on its west side, and saves and restores the heater halfway.
//!
//! Run with: `RUST_LOG=ember_core=debug cargo run -p ember-data --example headless_heater`

use std::error::Error;
use std::path::Path;

use ember_core::capability::{Debuggable, EnergyReceiver, FluidHandler};
use ember_core::event::HeaterEvent;
use ember_core::heater::Heater;
use ember_core::id::{Direction, FluidId};
use ember_core::site::{ExportSink, Site};
use ember_core::tank::{FluidStack, FluidTank};
use ember_data::load_heater_data;
use tracing_subscriber::EnvFilter;

/// A plain tank standing next to the heater.
struct Yard {
    facing: Direction,
    barrel_side: Direction,
    barrel: FluidTank,
}

impl Site for Yard {
    fn facing(&self) -> Direction {
        self.facing
    }

    fn sink_at(&mut self, direction: Direction) -> Option<&mut dyn ExportSink> {
        (direction == self.barrel_side).then_some(&mut self.barrel as &mut dyn ExportSink)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("data");
    let data = load_heater_data(&dir)?;
    let oil = fluid(&data.registry, "oil")?;
    let mut heater = Heater::new(&data.registry, data.config.clone())?;
    let mut yard = Yard {
        facing: Direction::North,
        barrel_side: Direction::North.rotate_ccw(),
        barrel: FluidTank::new(10_000),
    };

    let mut batches = 0;
    for tick in 0..200 {
        if tick % 5 == 0 {
            let _ = heater.fill(Direction::Up, FluidStack::new(oil, 25), true);
        }
        let _ = heater.receive_energy(20, true);

        for event in heater.tick(tick, &mut yard) {
            if matches!(
                event,
                HeaterEvent::BatchCompleted { .. } | HeaterEvent::ScaledYield { .. }
            ) {
                batches += 1;
            }
        }

        if tick == 100 {
            let saved = heater.serialize()?;
            println!("Saved {} bytes at tick {tick}", saved.len());
            heater = Heater::new(&data.registry, data.config.clone())?;
            heater.deserialize_into(&saved)?;
        }
    }

    println!("=== After 200 ticks ===");
    println!("{}", heater.debug_snapshot());
    println!("Batches: {batches}");
    println!("Barrel: {} mB", yard.barrel.amount());
    Ok(())
}

fn fluid(registry: &ember_core::recipe::HeatRecipeRegistry, name: &str) -> Result<FluidId, String> {
    registry
        .fluid_id(name)
        .ok_or_else(|| format!("data pack has no fluid named '{name}'"))
}
