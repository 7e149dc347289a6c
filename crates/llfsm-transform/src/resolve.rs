//! Resolution of symbolic state names into indices.

use llfsm_model::TransitionModel;
use llfsm_vhdl::VariableName;

use crate::domain::State;
use crate::error::{ConversionError, Result};

/// Index of the only state called `name`.
///
/// Fails with `UnknownState` when nothing matches (including when `name` is not
/// an identifier at all) and `AmbiguousState` when several states match.
pub fn resolve_state(name: &str, states: &[State]) -> Result<usize> {
    let unknown = || ConversionError::UnknownState {
        name: name.to_string(),
    };
    let wanted = VariableName::new(name.trim()).map_err(|_| unknown())?;
    let mut matches = states
        .iter()
        .enumerate()
        .filter(|(_, state)| *state.name() == wanted)
        .map(|(index, _)| index);
    match (matches.next(), matches.count()) {
        (None, _) => Err(unknown()),
        (Some(index), 0) => Ok(index),
        (Some(_), rest) => Err(ConversionError::AmbiguousState {
            name: name.to_string(),
            count: rest + 1,
        }),
    }
}

/// Indices of a transition's source and target states.
pub fn resolve_transition_endpoints(
    transition: &TransitionModel,
    states: &[State],
) -> Result<(usize, usize)> {
    Ok((
        resolve_state(&transition.source, states)?,
        resolve_state(&transition.target, states)?,
    ))
}
