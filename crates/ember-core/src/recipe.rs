use crate::id::FluidId;
use crate::tank::FluidStack;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Recipe value
// ---------------------------------------------------------------------------

/// Turns one fluid into another by raising (or lowering) its temperature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeatRecipe {
    /// Fluid and amount consumed per batch.
    pub input: FluidStack,
    /// Fluid and amount produced per batch.
    pub output: FluidStack,
    pub heat_from: i32,
    pub heat_to: i32,
    /// Batch duration. Also the settle delay between batches.
    pub ticks: u32,
}

impl HeatRecipe {
    pub fn heat_delta(&self) -> i64 {
        i64::from(self.heat_to) - i64::from(self.heat_from)
    }

    /// Whether a batch yields exactly as much as it consumes.
    pub fn is_one_to_one(&self) -> bool {
        self.input.amount == self.output.amount
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Looks up the heat recipe that accepts a given input fluid.
///
/// Lookups must be pure: the heater may call this every tick.
pub trait RecipeCatalog {
    fn lookup(&self, input: FluidId) -> Option<HeatRecipe>;
}

impl<C: RecipeCatalog + ?Sized> RecipeCatalog for &C {
    fn lookup(&self, input: FluidId) -> Option<HeatRecipe> {
        (**self).lookup(input)
    }
}

impl<C: RecipeCatalog + ?Sized> RecipeCatalog for Box<C> {
    fn lookup(&self, input: FluidId) -> Option<HeatRecipe> {
        (**self).lookup(input)
    }
}

impl<C: RecipeCatalog + ?Sized> RecipeCatalog for Rc<C> {
    fn lookup(&self, input: FluidId) -> Option<HeatRecipe> {
        (**self).lookup(input)
    }
}

impl<C: RecipeCatalog + ?Sized> RecipeCatalog for Arc<C> {
    fn lookup(&self, input: FluidId) -> Option<HeatRecipe> {
        (**self).lookup(input)
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Builder for an immutable [`HeatRecipeRegistry`].
/// Fluids are registered first, then recipes referencing them, then `build()`.
#[derive(Debug, Default)]
pub struct HeatRecipeRegistryBuilder {
    fluids: Vec<String>,
    fluid_name_to_id: HashMap<String, FluidId>,
    recipes: Vec<HeatRecipe>,
}

impl HeatRecipeRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fluid type. Registering a known name returns its existing ID.
    pub fn register_fluid(&mut self, name: &str) -> FluidId {
        if let Some(&id) = self.fluid_name_to_id.get(name) {
            return id;
        }
        let id = FluidId(self.fluids.len() as u32);
        self.fluids.push(name.to_string());
        self.fluid_name_to_id.insert(name.to_string(), id);
        id
    }

    pub fn register_recipe(&mut self, recipe: HeatRecipe) {
        self.recipes.push(recipe);
    }

    pub fn fluid_id(&self, name: &str) -> Option<FluidId> {
        self.fluid_name_to_id.get(name).copied()
    }

    /// Validate and freeze the registry.
    pub fn build(self) -> Result<HeatRecipeRegistry, RegistryError> {
        let mut by_input = HashMap::with_capacity(self.recipes.len());

        for (index, recipe) in self.recipes.iter().enumerate() {
            for stack in [recipe.input, recipe.output] {
                if stack.fluid.0 as usize >= self.fluids.len() {
                    return Err(RegistryError::InvalidFluidRef(stack.fluid));
                }
                if stack.amount == 0 {
                    return Err(RegistryError::ZeroAmount(stack.fluid));
                }
            }
            if recipe.ticks == 0 {
                return Err(RegistryError::ZeroDuration(recipe.input.fluid));
            }
            if by_input.insert(recipe.input.fluid, index).is_some() {
                return Err(RegistryError::DuplicateInput(recipe.input.fluid));
            }
        }

        Ok(HeatRecipeRegistry {
            fluids: self.fluids,
            fluid_name_to_id: self.fluid_name_to_id,
            recipes: self.recipes,
            by_input,
        })
    }
}

/// Immutable recipe registry. Frozen after `build()`; safe to share.
#[derive(Debug)]
pub struct HeatRecipeRegistry {
    fluids: Vec<String>,
    fluid_name_to_id: HashMap<String, FluidId>,
    recipes: Vec<HeatRecipe>,
    by_input: HashMap<FluidId, usize>,
}

impl HeatRecipeRegistry {
    pub fn fluid_id(&self, name: &str) -> Option<FluidId> {
        self.fluid_name_to_id.get(name).copied()
    }

    pub fn fluid_name(&self, id: FluidId) -> Option<&str> {
        self.fluids.get(id.0 as usize).map(String::as_str)
    }

    pub fn fluid_count(&self) -> usize {
        self.fluids.len()
    }

    pub fn recipe_count(&self) -> usize {
        self.recipes.len()
    }
}

impl RecipeCatalog for HeatRecipeRegistry {
    fn lookup(&self, input: FluidId) -> Option<HeatRecipe> {
        self.by_input.get(&input).map(|&i| self.recipes[i])
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("invalid fluid reference: {0:?}")]
    InvalidFluidRef(FluidId),
    #[error("recipe stack of {0:?} has zero amount")]
    ZeroAmount(FluidId),
    #[error("recipe for {0:?} has zero duration")]
    ZeroDuration(FluidId),
    #[error("more than one recipe accepts {0:?}")]
    DuplicateInput(FluidId),
}
