pub mod loader;
pub mod schema;

pub use loader::{DataLoadError, HeaterData, load_heater_data};
