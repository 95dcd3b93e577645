//! Loads a heater data pack from a directory.
//!
//! A pack is up to three files, each written in RON, TOML or JSON:
//! `fluids` and `heat_recipes` (required) and `heater` (optional). Recipes
//! name their fluids; the loader resolves those names against the fluid list
//! and freezes everything into a [`HeatRecipeRegistry`].

use ember_core::config::{ConfigError, HeaterConfig};
use ember_core::id::FluidId;
use ember_core::recipe::{HeatRecipe, HeatRecipeRegistry, HeatRecipeRegistryBuilder, RegistryError};
use ember_core::tank::FluidStack;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::schema::{FluidData, HeatRecipeData, HeaterTuning};

// ===========================================================================
// Errors
// ===========================================================================

#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    #[error("{dir} has no {base}.ron, {base}.toml or {base}.json")]
    Missing { base: String, dir: PathBuf },

    #[error("{file} is not a .ron, .toml or .json file")]
    UnknownFormat { file: PathBuf },

    /// The same data file exists in two formats.
    #[error("{base} is defined twice, as {first} and {second}")]
    Ambiguous {
        base: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("cannot parse {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    #[error("{file} refers to unknown fluid '{name}'")]
    UnknownFluid { file: PathBuf, name: String },

    #[error("{file} defines fluid '{name}' more than once")]
    DuplicateFluid { file: PathBuf, name: String },

    #[error("invalid recipe set: {0}")]
    Registry(#[from] RegistryError),

    #[error("invalid heater config: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Formats
// ===========================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Format {
    Ron,
    Toml,
    Json,
}

impl Format {
    /// Lookup order when searching a directory.
    const ALL: [Format; 3] = [Format::Ron, Format::Toml, Format::Json];

    fn extension(self) -> &'static str {
        match self {
            Format::Ron => "ron",
            Format::Toml => "toml",
            Format::Json => "json",
        }
    }

    pub(crate) fn from_path(path: &Path) -> Result<Self, DataLoadError> {
        let ext = path.extension().and_then(|e| e.to_str());
        Self::ALL
            .into_iter()
            .find(|f| Some(f.extension()) == ext)
            .ok_or_else(|| DataLoadError::UnknownFormat {
                file: path.to_path_buf(),
            })
    }

    fn parse<T: DeserializeOwned>(self, text: &str, path: &Path) -> Result<T, DataLoadError> {
        let parsed = match self {
            Format::Ron => ron::from_str(text).map_err(|e| e.to_string()),
            Format::Toml => toml::from_str(text).map_err(|e| e.to_string()),
            Format::Json => serde_json::from_str(text).map_err(|e| e.to_string()),
        };
        parsed.map_err(|detail| DataLoadError::Parse {
            file: path.to_path_buf(),
            detail,
        })
    }
}

// ===========================================================================
// Reading
// ===========================================================================

/// Find `{base}.ron`, `{base}.toml` or `{base}.json` in `dir`. More than one
/// of them is an error.
pub(crate) fn locate(dir: &Path, base: &str) -> Result<Option<PathBuf>, DataLoadError> {
    let mut hits = Format::ALL
        .into_iter()
        .map(|f| dir.join(format!("{base}.{}", f.extension())))
        .filter(|p| p.is_file());

    match (hits.next(), hits.next()) {
        (Some(first), Some(second)) => Err(DataLoadError::Ambiguous {
            base: base.to_string(),
            first,
            second,
        }),
        (found, _) => Ok(found),
    }
}

fn locate_required(dir: &Path, base: &str) -> Result<PathBuf, DataLoadError> {
    locate(dir, base)?.ok_or_else(|| DataLoadError::Missing {
        base: base.to_string(),
        dir: dir.to_path_buf(),
    })
}

/// Parse a whole file as `T`.
pub(crate) fn read<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    let format = Format::from_path(path)?;
    let text = std::fs::read_to_string(path)?;
    format.parse(&text, path)
}

/// Parse a list. RON and JSON files hold the list directly; TOML has no
/// top-level arrays, so the list sits under `toml_key`.
pub(crate) fn read_list<T: DeserializeOwned>(
    path: &Path,
    toml_key: &str,
) -> Result<Vec<T>, DataLoadError> {
    if Format::from_path(path)? != Format::Toml {
        return read(path);
    }

    let mut table: toml::Table = read(path)?;
    let parse_error = |detail: String| DataLoadError::Parse {
        file: path.to_path_buf(),
        detail,
    };
    table
        .remove(toml_key)
        .ok_or_else(|| parse_error(format!("no '{toml_key}' array")))?
        .try_into()
        .map_err(|e: toml::de::Error| parse_error(e.to_string()))
}

// ===========================================================================
// Pipeline
// ===========================================================================

/// Everything needed to build heaters from a data directory.
#[derive(Debug)]
pub struct HeaterData {
    pub registry: HeatRecipeRegistry,
    pub config: HeaterConfig,
}

pub fn load_heater_data(dir: &Path) -> Result<HeaterData, DataLoadError> {
    let mut builder = HeatRecipeRegistryBuilder::new();

    let fluids_path = locate_required(dir, "fluids")?;
    let fluids: Vec<FluidData> = read_list(&fluids_path, "fluids")?;
    let mut names: HashMap<String, FluidId> = HashMap::with_capacity(fluids.len());
    for fluid in fluids {
        match names.entry(fluid.name) {
            Entry::Occupied(slot) => {
                return Err(DataLoadError::DuplicateFluid {
                    file: fluids_path,
                    name: slot.key().clone(),
                });
            }
            Entry::Vacant(slot) => {
                let id = builder.register_fluid(slot.key());
                slot.insert(id);
            }
        }
    }

    let recipes_path = locate_required(dir, "heat_recipes")?;
    let recipes: Vec<HeatRecipeData> = read_list(&recipes_path, "recipes")?;
    for data in recipes {
        builder.register_recipe(HeatRecipe {
            input: fluid_stack(&names, &data.input, &recipes_path)?,
            output: fluid_stack(&names, &data.output, &recipes_path)?,
            heat_from: data.heat_from,
            heat_to: data.heat_to,
            ticks: data.ticks,
        });
    }
    let registry = builder.build()?;

    let config = match locate(dir, "heater")? {
        Some(path) => {
            let tuning: HeaterTuning = read(&path)?;
            debug!(file = %path.display(), "loaded heater tuning");
            tuning.into_config()
        }
        None => HeaterConfig::default(),
    };
    config.validate()?;

    info!(
        dir = %dir.display(),
        fluids = registry.fluid_count(),
        recipes = registry.recipe_count(),
        "heater data loaded"
    );
    Ok(HeaterData { registry, config })
}

fn fluid_stack(
    names: &HashMap<String, FluidId>,
    (name, amount): &(String, u32),
    path: &Path,
) -> Result<FluidStack, DataLoadError> {
    let id = names.get(name).ok_or_else(|| DataLoadError::UnknownFluid {
        file: path.to_path_buf(),
        name: name.clone(),
    })?;
    Ok(FluidStack::new(*id, *amount))
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use ember_core::recipe::RecipeCatalog;
    use std::fs;

    fn make_test_dir(suffix: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "ember_data_test_{suffix}_{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn cleanup(dir: &Path) {
        let _ = fs::remove_dir_all(dir);
    }

    const FLUIDS_RON: &str =
        r#"[(name: "water"), (name: "steam"), (name: "oil"), (name: "hot_oil")]"#;

    const RECIPES_RON: &str = r#"[
        (input: ("water", 10), output: ("steam", 20), heat_from: 20, heat_to: 100, ticks: 4),
        (input: ("oil", 10), output: ("hot_oil", 10), heat_from: 20, heat_to: 60, ticks: 2),
    ]"#;

    // -----------------------------------------------------------------------
    // Formats and discovery
    // -----------------------------------------------------------------------

    #[test]
    fn format_from_extension() {
        assert_eq!(Format::from_path(Path::new("a/fluids.ron")).unwrap(), Format::Ron);
        assert_eq!(Format::from_path(Path::new("fluids.toml")).unwrap(), Format::Toml);
        assert_eq!(Format::from_path(Path::new("fluids.json")).unwrap(), Format::Json);
        for name in ["fluids.yaml", "fluids"] {
            assert!(matches!(
                Format::from_path(Path::new(name)),
                Err(DataLoadError::UnknownFormat { .. })
            ));
        }
    }

    #[test]
    fn locate_finds_one_format() {
        let dir = make_test_dir("locate");
        fs::write(dir.join("fluids.toml"), "").unwrap();

        assert_eq!(locate(&dir, "fluids").unwrap(), Some(dir.join("fluids.toml")));
        assert_eq!(locate(&dir, "heater").unwrap(), None);

        cleanup(&dir);
    }

    #[test]
    fn locate_rejects_two_formats() {
        let dir = make_test_dir("locate_ambiguous");
        fs::write(dir.join("fluids.ron"), "[]").unwrap();
        fs::write(dir.join("fluids.json"), "[]").unwrap();

        assert!(matches!(
            locate(&dir, "fluids"),
            Err(DataLoadError::Ambiguous { ref base, .. }) if base == "fluids"
        ));

        cleanup(&dir);
    }

    // -----------------------------------------------------------------------
    // Reading
    // -----------------------------------------------------------------------

    #[test]
    fn read_list_toml_needs_key() {
        let dir = make_test_dir("list_toml_key");
        let path = dir.join("fluids.toml");
        fs::write(&path, r#"foo = "bar""#).unwrap();

        let result: Result<Vec<FluidData>, _> = read_list(&path, "fluids");
        assert!(matches!(result, Err(DataLoadError::Parse { .. })));

        cleanup(&dir);
    }

    #[test]
    fn read_reports_parse_errors() {
        let dir = make_test_dir("parse_err");
        let path = dir.join("fluids.ron");
        fs::write(&path, "this is not valid RON {{{").unwrap();

        let result: Result<Vec<FluidData>, _> = read(&path);
        assert!(matches!(result, Err(DataLoadError::Parse { ref file, .. }) if *file == path));

        cleanup(&dir);
    }

    // -----------------------------------------------------------------------
    // load_heater_data
    // -----------------------------------------------------------------------

    #[test]
    fn load_ron_pack_with_default_config() {
        let dir = make_test_dir("load_ron");
        fs::write(dir.join("fluids.ron"), FLUIDS_RON).unwrap();
        fs::write(dir.join("heat_recipes.ron"), RECIPES_RON).unwrap();

        let data = load_heater_data(&dir).unwrap();

        assert_eq!(data.registry.fluid_count(), 4);
        assert_eq!(data.registry.recipe_count(), 2);
        assert_eq!(data.config, HeaterConfig::default());
        let water = data.registry.fluid_id("water").unwrap();
        let steam = data.registry.fluid_id("steam").unwrap();
        let recipe = data.registry.lookup(water).unwrap();
        assert_eq!(recipe.output, FluidStack::new(steam, 20));
        assert_eq!(recipe.ticks, 4);

        cleanup(&dir);
    }

    #[test]
    fn load_mixed_formats_with_tuning() {
        let dir = make_test_dir("load_mixed");
        fs::write(
            dir.join("fluids.json"),
            r#"[{"name": "oil"}, {"name": "hot_oil"}]"#,
        )
        .unwrap();
        fs::write(
            dir.join("heat_recipes.toml"),
            r#"
[[recipes]]
input = ["oil", 5]
output = ["hot_oil", 5]
heat_from = 0
heat_to = 10
ticks = 3
"#,
        )
        .unwrap();
        fs::write(
            dir.join("heater.ron"),
            "(export_rate: Some(40), idle_ceiling: Some(8))",
        )
        .unwrap();

        let data = load_heater_data(&dir).unwrap();

        assert_eq!(data.registry.recipe_count(), 1);
        assert_eq!(data.config.export_rate, 40);
        assert_eq!(data.config.idle_ceiling, 8);
        assert_eq!(data.config.input_capacity, 1000);

        cleanup(&dir);
    }

    #[test]
    fn load_rejects_duplicate_fluid() {
        let dir = make_test_dir("load_dup_fluid");
        fs::write(dir.join("fluids.ron"), r#"[(name: "water"), (name: "water")]"#).unwrap();
        fs::write(dir.join("heat_recipes.ron"), "[]").unwrap();

        assert!(matches!(
            load_heater_data(&dir),
            Err(DataLoadError::DuplicateFluid { ref name, .. }) if name == "water"
        ));

        cleanup(&dir);
    }

    #[test]
    fn load_rejects_unknown_fluid_in_recipe() {
        let dir = make_test_dir("load_unknown_fluid");
        fs::write(dir.join("fluids.ron"), r#"[(name: "water")]"#).unwrap();
        fs::write(
            dir.join("heat_recipes.ron"),
            r#"[
                (input: ("water", 10), output: ("plasma", 10), heat_from: 0, heat_to: 1, ticks: 1),
            ]"#,
        )
        .unwrap();

        assert!(matches!(
            load_heater_data(&dir),
            Err(DataLoadError::UnknownFluid { ref name, .. }) if name == "plasma"
        ));

        cleanup(&dir);
    }

    #[test]
    fn load_rejects_duplicate_recipe_input() {
        let dir = make_test_dir("load_dup_recipe");
        fs::write(dir.join("fluids.ron"), FLUIDS_RON).unwrap();
        fs::write(
            dir.join("heat_recipes.ron"),
            r#"[
                (input: ("oil", 10), output: ("hot_oil", 10), heat_from: 0, heat_to: 1, ticks: 1),
                (input: ("oil", 5), output: ("steam", 5), heat_from: 0, heat_to: 1, ticks: 1),
            ]"#,
        )
        .unwrap();

        assert!(matches!(
            load_heater_data(&dir),
            Err(DataLoadError::Registry(RegistryError::DuplicateInput(_)))
        ));

        cleanup(&dir);
    }

    #[test]
    fn load_rejects_invalid_tuning() {
        let dir = make_test_dir("load_bad_tuning");
        fs::write(dir.join("fluids.ron"), FLUIDS_RON).unwrap();
        fs::write(dir.join("heat_recipes.ron"), RECIPES_RON).unwrap();
        fs::write(dir.join("heater.toml"), "export_rate = 0").unwrap();

        assert!(matches!(
            load_heater_data(&dir),
            Err(DataLoadError::Config(ConfigError::ZeroExportRate))
        ));

        cleanup(&dir);
    }

    #[test]
    fn load_requires_recipes_file() {
        let dir = make_test_dir("load_no_recipes");
        fs::write(dir.join("fluids.ron"), FLUIDS_RON).unwrap();

        assert!(matches!(
            load_heater_data(&dir),
            Err(DataLoadError::Missing { ref base, .. }) if base == "heat_recipes"
        ));

        cleanup(&dir);
    }
}
