//! Loading machines from their `.machine` directories.
//!
//! A machine directory holds a `model.json` file in one of two forms: the
//! editor's flat [`MachineModel`], or an already converted [`Machine`]. The flat
//! form is tried first.

use std::io;
use std::path::{Path, PathBuf};

use tracing::info;

use llfsm_model::MachineModel;

use crate::domain::Machine;
use crate::error::{ConversionError, Result};
use crate::machine::{convert_machine, machine_name};

/// Suffix of every machine directory.
pub const MACHINE_SUFFIX: &str = ".machine";

/// Name of the file inside a machine directory.
pub const MODEL_FILE: &str = "model.json";

/// Where machine files come from.
pub trait MachineSource {
    /// Read the whole file at `path`.
    fn load_bytes(&self, path: &Path) -> io::Result<Vec<u8>>;
}

/// Reads machine files from the local file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsSource;

impl MachineSource for FsSource {
    fn load_bytes(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }
}

/// The `model.json` path inside a machine directory.
pub fn model_path(machine_dir: &Path) -> PathBuf {
    machine_dir.join(MODEL_FILE)
}

/// Load and validate the machine stored in `machine_dir`.
///
/// A flat model is converted with `machine_dir` as its path, so conversion
/// failures surface as they would for an in-memory model. A stored domain
/// machine is verified while decoding, then takes `machine_dir` as its path and
/// the name derived from it, whatever identity it was saved with.
pub fn load_machine<S: MachineSource + ?Sized>(source: &S, machine_dir: &Path) -> Result<Machine> {
    let file = model_path(machine_dir);
    let bytes = source
        .load_bytes(&file)
        .map_err(|e| ConversionError::MachineLoadFailed {
            path: file.clone(),
            reason: e.to_string(),
        })?;
    info!(path = %file.display(), bytes = bytes.len(), "loaded machine file");

    let model_error = match serde_json::from_slice::<MachineModel>(&bytes) {
        Ok(model) => return convert_machine(&model, Some(machine_dir)),
        Err(e) => e,
    };
    match serde_json::from_slice::<Machine>(&bytes) {
        Ok(machine) => Ok(machine.relocated(machine_name(machine_dir)?, machine_dir)),
        Err(domain_error) => Err(ConversionError::MachineLoadFailed {
            path: file,
            reason: format!(
                "neither a machine model ({model_error}) nor a converted machine ({domain_error})"
            ),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use crate::error::ErrorCategory;

    /// Files held in memory.
    #[derive(Default)]
    struct MemorySource {
        files: HashMap<PathBuf, Vec<u8>>,
    }

    impl MachineSource for MemorySource {
        fn load_bytes(&self, path: &Path) -> io::Result<Vec<u8>> {
            self.files
                .get(path)
                .cloned()
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file"))
        }
    }

    const MODEL: &str = r#"{
        "states": [{
            "name": "Initial",
            "variables": "",
            "externalVariables": "",
            "actions": [{"name": "OnEntry", "code": "x <= '1';"}],
            "layout": {"position": {"x": 0, "y": 0}, "dimensions": {"x": 10, "y": 10}}
        }],
        "externalVariables": "x: out std_logic;",
        "machineVariables": "",
        "includes": "library IEEE;",
        "transitions": [],
        "initialState": "Initial",
        "suspendedState": null,
        "clocks": [{"name": "clk", "frequency": "50 MHz"}]
    }"#;

    fn source_with(dir: &str, contents: &[u8]) -> MemorySource {
        let mut source = MemorySource::default();
        source
            .files
            .insert(model_path(Path::new(dir)), contents.to_vec());
        source
    }

    #[test]
    fn loads_flat_model() {
        let source = source_with("/m/Blink.machine", MODEL.as_bytes());
        let machine = load_machine(&source, Path::new("/m/Blink.machine")).unwrap();
        assert_eq!(machine.name().as_str(), "Blink");
        assert_eq!(machine.path(), Path::new("/m/Blink.machine"));
    }

    #[test]
    fn loads_converted_machine() {
        let flat = source_with("/m/Blink.machine", MODEL.as_bytes());
        let machine = load_machine(&flat, Path::new("/m/Blink.machine")).unwrap();
        let json = serde_json::to_vec(&machine).unwrap();

        let stored = source_with("/other/Blink.machine", &json);
        let loaded = load_machine(&stored, Path::new("/other/Blink.machine")).unwrap();
        assert_eq!(loaded.path(), Path::new("/other/Blink.machine"));
        assert_eq!(loaded.states(), machine.states());
        assert_eq!(loaded.name(), machine.name());
    }

    #[test]
    fn stored_identity_follows_the_directory() {
        let flat = source_with("/m/Blink.machine", MODEL.as_bytes());
        let machine = load_machine(&flat, Path::new("/m/Blink.machine")).unwrap();
        let mut value = serde_json::to_value(&machine).unwrap();
        value["name"] = serde_json::json!("Other");
        value["path"] = serde_json::json!("/elsewhere/Other.machine");

        let stored = source_with("/m/Blink.machine", &serde_json::to_vec(&value).unwrap());
        let loaded = load_machine(&stored, Path::new("/m/Blink.machine")).unwrap();
        assert_eq!(loaded.name().as_str(), "Blink");
        assert_eq!(loaded, machine);

        let model = serde_json::from_str::<MachineModel>(MODEL).unwrap();
        let projected = crate::project::project_machine(
            &loaded,
            &model.state_layouts(),
            &model.transition_layouts(),
        )
        .unwrap();
        let again = convert_machine(&projected, Some(Path::new("/m/Blink.machine"))).unwrap();
        assert_eq!(again, loaded);
    }

    #[test]
    fn stored_machine_must_drive_from_the_first_clock() {
        let flat = source_with("/m/Blink.machine", MODEL.as_bytes());
        let machine = load_machine(&flat, Path::new("/m/Blink.machine")).unwrap();
        let mut value = serde_json::to_value(&machine).unwrap();
        value["clocks"] = serde_json::json!([
            {"name": "clk", "frequency": "50 MHz"},
            {"name": "slow", "frequency": "1 kHz"}
        ]);
        value["drivingClock"] = serde_json::json!(1);

        let stored = source_with("/m/Blink.machine", &serde_json::to_vec(&value).unwrap());
        let err = load_machine(&stored, Path::new("/m/Blink.machine")).unwrap_err();
        let ConversionError::MachineLoadFailed { reason, .. } = err else {
            panic!("expected a load failure");
        };
        assert!(reason.contains("driving clock"));
    }

    #[test]
    fn missing_file() {
        let source = MemorySource::default();
        let err = load_machine(&source, Path::new("/m/Gone.machine")).unwrap_err();
        assert!(matches!(err, ConversionError::MachineLoadFailed { .. }));
        assert_eq!(err.category(), ErrorCategory::Io);
    }

    #[test]
    fn undecodable_file() {
        let source = source_with("/m/Bad.machine", b"{\"states\": 3}");
        let err = load_machine(&source, Path::new("/m/Bad.machine")).unwrap_err();
        let ConversionError::MachineLoadFailed { reason, .. } = err else {
            panic!("expected a load failure");
        };
        assert!(reason.contains("neither a machine model"));
    }

    #[test]
    fn conversion_errors_pass_through() {
        let broken = MODEL.replace("\"initialState\": \"Initial\"", "\"initialState\": \"Nope\"");
        let source = source_with("/m/Blink.machine", broken.as_bytes());
        assert!(matches!(
            load_machine(&source, Path::new("/m/Blink.machine")),
            Err(ConversionError::InvalidInitialState { .. })
        ));
    }

    #[test]
    fn fs_source_reads_disk() {
        let dir = tempfile::tempdir().unwrap();
        let machine_dir = dir.path().join("Blink.machine");
        std::fs::create_dir(&machine_dir).unwrap();
        std::fs::write(model_path(&machine_dir), MODEL).unwrap();
        let machine = load_machine(&FsSource, &machine_dir).unwrap();
        assert_eq!(machine.external_signals().len(), 1);
    }
}
