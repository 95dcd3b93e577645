use crate::id::{FluidId, Ticks};
use crate::tank::FluidStack;

/// Events returned from [`Heater::tick`](crate::heater::Heater::tick).
///
/// Events report what changed, not state polled every tick: a settling or
/// stalling heater emits nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaterEvent {
    /// A recipe was bound for the input fluid.
    RecipeBound { input: FluidId, tick: Ticks },
    /// The bound recipe no longer matches the input tank.
    RecipeCleared { input: FluidId, tick: Ticks },
    /// A full batch moved from the input tank to the output tank.
    BatchCompleted {
        consumed: FluidStack,
        produced: FluidStack,
        energy: u64,
        tick: Ticks,
    },
    /// A short input was forced through with output scaled to match.
    ScaledYield {
        consumed: FluidStack,
        produced: FluidStack,
        energy: u64,
        tick: Ticks,
    },
    /// Energy was spent but the input was short, so the drain was undone.
    RolledBack {
        restored: FluidStack,
        energy: u64,
        tick: Ticks,
    },
    /// The energy buffer could not cover a batch.
    EnergyStarved {
        required: u64,
        stored: u64,
        tick: Ticks,
    },
    /// Output fluid was handed to the export sink.
    Exported { stack: FluidStack, tick: Ticks },
}
