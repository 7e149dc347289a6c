//! `llfsm machine`: convert one machine directory.

use std::path::Path;

use anyhow::{Context, Result};
use llfsm_transform::{load_machine, FsSource, Machine};

/// Convert the machine in `machine_dir`, writing the domain JSON to `output`
/// or printing a summary.
pub fn run(machine_dir: &Path, output: Option<&Path>, pretty: bool) -> Result<()> {
    let machine = convert(machine_dir)?;
    match output {
        Some(path) => super::write_json(&machine, path, pretty),
        None => {
            print!("{}", summary(&machine));
            Ok(())
        }
    }
}

pub(crate) fn convert(machine_dir: &Path) -> Result<Machine> {
    load_machine(&FsSource, machine_dir)
        .with_context(|| format!("converting machine {}", machine_dir.display()))
}

/// One line per state, marking the initial and suspended states.
pub(crate) fn summary(machine: &Machine) -> String {
    let mut out = format!(
        "machine {}: {} states, {} transitions, {} clocks\n",
        machine.name(),
        machine.states().len(),
        machine.transitions().len(),
        machine.clocks().len(),
    );
    for (index, state) in machine.states().iter().enumerate() {
        let marker = if index == machine.initial_state() {
            " (initial)"
        } else if Some(index) == machine.suspended_state() {
            " (suspended)"
        } else {
            ""
        };
        let targets: Vec<String> = machine
            .transitions_from(index)
            .map(|t| machine.states()[t.target()].name().to_string())
            .collect();
        out.push_str(&format!("  {}{marker} -> [{}]\n", state.name(), targets.join(", ")));
    }
    out
}
