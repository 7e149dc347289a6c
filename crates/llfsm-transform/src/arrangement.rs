//! Conversion of a flat [`ArrangementModel`] into a validated [`Arrangement`].
//!
//! Order of checks:
//!
//! 1. reference names are unique
//! 2. each reference: instance name, machine type from the path, load the
//!    machine, parse its mappings
//! 3. instance names are unique
//! 4. external signals, global signals, clocks, global mappings
//! 5. the arrangement namespace
//!
//! Machines are loaded in parallel; results are inspected in reference order
//! so the reported failure does not depend on scheduling.

use std::collections::HashSet;
use std::path::Path;

use rayon::prelude::*;
use tracing::{debug, trace};

use llfsm_model::{self as model, ArrangementModel, MachineReference};
use llfsm_vhdl::{ParseError, VariableName};

use crate::domain::{Arrangement, InstanceMap, MachineInstance, MachineMapping, VariableMapping};
use crate::error::{ConversionError, Result};
use crate::loader::{load_machine, FsSource, MachineSource, MACHINE_SUFFIX};
use crate::machine::{parse_clocks, parse_external_signals, parse_local_signals};
use crate::namespace::{NameRole, Namespace};

/// Convert an arrangement, reading machines from disk relative to `base_dir`.
pub fn convert_arrangement(model: &ArrangementModel, base_dir: &Path) -> Result<Arrangement> {
    convert_arrangement_with(model, base_dir, &FsSource)
}

/// Convert an arrangement, reading machine files through `source`.
pub fn convert_arrangement_with<S>(
    model: &ArrangementModel,
    base_dir: &Path,
    source: &S,
) -> Result<Arrangement>
where
    S: MachineSource + Sync + ?Sized,
{
    debug!(
        base_dir = %base_dir.display(),
        machines = model.machines.len(),
        "converting arrangement"
    );
    match build_arrangement(model, base_dir, source) {
        Ok(arrangement) => {
            debug!(instances = arrangement.machines().len(), "arrangement converted");
            Ok(arrangement)
        }
        Err(e) => {
            debug!(error = %e, "arrangement rejected");
            Err(e)
        }
    }
}

fn build_arrangement<S>(model: &ArrangementModel, base_dir: &Path, source: &S) -> Result<Arrangement>
where
    S: MachineSource + Sync + ?Sized,
{
    trace!("reference names");
    let mut seen = HashSet::new();
    if let Some(duplicate) = model.machines.iter().find(|r| !seen.insert(r.name.as_str())) {
        return Err(ConversionError::DuplicateMachineReference {
            name: duplicate.name.clone(),
        });
    }

    trace!("machine references");
    let results: Vec<Result<(MachineInstance, MachineMapping)>> = model
        .machines
        .par_iter()
        .map(|reference| convert_reference(reference, base_dir, source))
        .collect();
    let entries = results.into_iter().collect::<Result<Vec<_>>>()?;

    trace!("instances");
    let count = entries.len();
    let machines = InstanceMap::from_entries(entries)?;
    debug_assert_eq!(machines.len(), count);

    trace!("arrangement signals and clocks");
    let external_signals = parse_external_signals(&model.external_variables)?;
    let signals = parse_local_signals(&model.global_variables)?;
    let clocks = parse_clocks(&model.clocks)?;
    let global_mappings = parse_mappings(&model.global_mappings).map_err(|(m, cause)| {
        ConversionError::InvalidGlobalMapping {
            from: m.source.clone(),
            to: m.destination.clone(),
            cause,
        }
    })?;

    trace!("namespace");
    Namespace::new()
        .with(NameRole::Clock, clocks.iter().map(|c| &c.name))
        .with(NameRole::ExternalSignal, external_signals.iter().map(|s| &s.name))
        .with(NameRole::LocalSignal, signals.iter().map(|s| &s.name))
        .with(NameRole::MachineInstance, machines.instances().map(|i| i.name()))
        .validate()?;

    Ok(Arrangement::new(
        machines,
        external_signals,
        signals,
        clocks,
        global_mappings,
    ))
}

/// The machine type named by a reference path: its last component without the
/// `.machine` suffix. The suffix is required.
pub fn machine_type(path: &str) -> Option<VariableName> {
    let last = Path::new(path).file_name()?.to_str()?;
    let stem = last.strip_suffix(MACHINE_SUFFIX)?;
    VariableName::new(stem).ok()
}

fn convert_reference<S>(
    reference: &MachineReference,
    base_dir: &Path,
    source: &S,
) -> Result<(MachineInstance, MachineMapping)>
where
    S: MachineSource + ?Sized,
{
    let invalid = |detail: &str| ConversionError::InvalidMachineReference {
        name: reference.name.clone(),
        path: reference.path.clone(),
        detail: detail.to_string(),
    };
    let name = VariableName::new(&reference.name)
        .map_err(|_| invalid("instance name is not an identifier"))?;
    let type_name = machine_type(&reference.path).ok_or_else(|| {
        invalid("path must end in a '<identifier>.machine' directory")
    })?;

    let machine_dir = base_dir.join(&reference.path);
    let machine = load_machine(source, &machine_dir).map_err(|cause| {
        ConversionError::MachineRejected {
            name: reference.name.clone(),
            path: machine_dir.clone(),
            cause: Box::new(cause),
        }
    })?;

    let mappings = parse_mappings(&reference.mappings).map_err(|(m, cause)| {
        ConversionError::InvalidMapping {
            instance: reference.name.clone(),
            from: m.source.clone(),
            to: m.destination.clone(),
            cause,
        }
    })?;

    Ok((
        MachineInstance::new(name, type_name),
        MachineMapping::new(machine, mappings),
    ))
}

/// Parse every mapping, returning the first one that fails.
fn parse_mappings(
    mappings: &[model::VariableMapping],
) -> std::result::Result<Vec<VariableMapping>, (&model::VariableMapping, ParseError)> {
    mappings
        .iter()
        .map(|m| {
            let source = VariableName::new(m.source.trim()).map_err(|e| (m, e))?;
            let destination = VariableName::new(m.destination.trim()).map_err(|e| (m, e))?;
            Ok(VariableMapping::new(source, destination))
        })
        .collect()
}
