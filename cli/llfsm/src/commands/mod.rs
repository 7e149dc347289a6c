//! CLI command implementations.

pub mod arrangement;
pub mod check;
pub mod machine;

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

/// Write `value` as JSON to `path`.
pub(crate) fn write_json<T: Serialize>(value: &T, path: &Path, pretty: bool) -> Result<()> {
    let json = llfsm_model::parse::to_json(value, pretty).context("serializing output")?;
    std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    println!("wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::path::{Path, PathBuf};

    use llfsm_model::parse::save_json;
    use llfsm_model::{
        ActionModel, ClockModel, MachineModel, StateLayout, StateModel, TransitionLayout,
        TransitionModel,
    };
    use llfsm_transform::MODEL_FILE;

    fn state(name: &str, on_entry: &str) -> StateModel {
        StateModel {
            name: name.into(),
            variables: String::new(),
            external_variables: "led".into(),
            actions: vec![
                ActionModel::new("Internal", ""),
                ActionModel::new("OnEntry", on_entry),
                ActionModel::new("OnExit", ""),
            ],
            layout: StateLayout::default(),
        }
    }

    pub fn blink() -> MachineModel {
        MachineModel {
            states: vec![state("On", "led <= '1';"), state("Off", "led <= '0';")],
            external_variables: "led: out std_logic;".into(),
            machine_variables: String::new(),
            includes: "library IEEE;\nuse IEEE.std_logic_1164.all;".into(),
            transitions: vec![
                TransitionModel {
                    source: "On".into(),
                    target: "Off".into(),
                    condition: "true".into(),
                    layout: TransitionLayout::default(),
                },
                TransitionModel {
                    source: "Off".into(),
                    target: "On".into(),
                    condition: "true".into(),
                    layout: TransitionLayout::default(),
                },
            ],
            initial_state: "Off".into(),
            suspended_state: None,
            clocks: vec![ClockModel::new("clk", "1 kHz")],
        }
    }

    /// Write `model` to `<base>/<dir>/model.json`, returning the machine directory.
    pub fn write_machine(base: &Path, dir: &str, model: &MachineModel) -> PathBuf {
        let machine_dir = base.join(dir);
        std::fs::create_dir_all(&machine_dir).unwrap();
        save_json(model, &machine_dir.join(MODEL_FILE)).unwrap();
        machine_dir
    }
}
