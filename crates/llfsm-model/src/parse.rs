//! JSON loading and serialization for editor models.
//!
//! Machines are stored as `<name>.machine/model.json`; arrangements are plain
//! JSON files anywhere on disk.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::arrangement::ArrangementModel;
use crate::error::{ModelError, Result};
use crate::machine::MachineModel;

/// Parse a machine model from a JSON string.
pub fn parse_machine_json(json: &str) -> Result<MachineModel> {
    Ok(serde_json::from_str(json)?)
}

/// Parse an arrangement model from a JSON string.
pub fn parse_arrangement_json(json: &str) -> Result<ArrangementModel> {
    Ok(serde_json::from_str(json)?)
}

/// Load a machine model from a `model.json` file.
pub fn load_machine(path: &Path) -> Result<MachineModel> {
    load_json(path)
}

/// Load an arrangement model from a JSON file.
pub fn load_arrangement(path: &Path) -> Result<ArrangementModel> {
    load_json(path)
}

/// Serialize any model to JSON, pretty-printed when `pretty` is set.
pub fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}

/// Write any model to `path` as pretty JSON.
pub fn save_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    std::fs::write(path, to_json(value, true)?)?;
    Ok(())
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Err(ModelError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
