//! `llfsm check`: round trip a machine through the domain and back.

use std::path::Path;

use anyhow::{bail, Context, Result};
use llfsm_transform::loader::model_path;
use llfsm_transform::{convert_machine, project_machine};

/// Outcome of a round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RoundTrip {
    pub machine: String,
    /// The re-converted machine equals the first conversion.
    pub stable: bool,
    /// The projected model is textually identical to the input.
    pub verbatim: bool,
}

pub fn run(machine_dir: &Path) -> Result<()> {
    let report = round_trip(machine_dir)?;
    if !report.stable {
        bail!("round trip changed machine {}", report.machine);
    }
    if report.verbatim {
        println!("{}: round trip ok", report.machine);
    } else {
        println!("{}: round trip ok (declaration text normalised)", report.machine);
    }
    Ok(())
}

/// Model to domain, back to a model using the input's layouts, and to the
/// domain again.
pub(crate) fn round_trip(machine_dir: &Path) -> Result<RoundTrip> {
    let file = model_path(machine_dir);
    let model = llfsm_model::parse::load_machine(&file)
        .with_context(|| format!("reading {}", file.display()))?;
    let machine = convert_machine(&model, Some(machine_dir))
        .with_context(|| format!("converting machine {}", machine_dir.display()))?;
    let projected = project_machine(&machine, &model.state_layouts(), &model.transition_layouts())
        .context("projecting machine")?;
    let again = convert_machine(&projected, Some(machine_dir))
        .context("converting projected machine")?;

    Ok(RoundTrip {
        machine: machine.name().to_string(),
        stable: again == machine,
        verbatim: projected == model,
    })
}
