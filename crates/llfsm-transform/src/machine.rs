//! Conversion of a flat [`MachineModel`] into a validated [`Machine`].
//!
//! Checks run in a fixed order and the first failure is returned:
//!
//! 1. action names
//! 2. includes
//! 3. machine signals
//! 4. machine name (from the path)
//! 5. external signals
//! 6. clocks
//! 7. states
//! 8. transitions
//! 9. initial and suspended state
//! 10. the machine namespace

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use llfsm_model::{ClockModel, MachineModel, StateModel, TransitionModel};
use llfsm_vhdl::{
    Clock, Expression, Include, LocalSignal, PortSignal, SynchronousBlock, VariableName,
};

use crate::domain::machine::{validate_namespace, MachineParts};
use crate::domain::{Machine, State, Transition};
use crate::error::{ConversionError, Result};
use crate::loader::MACHINE_SUFFIX;
use crate::resolve::{resolve_state, resolve_transition_endpoints};
use crate::split::{parse_block, parse_each, parse_names};

/// Path given to machines converted without one.
pub const DEFAULT_MACHINE_PATH: &str = "/tmp/Machine0.machine";

/// Convert a machine model. `path` is the machine's `.machine` directory; when
/// absent, [`DEFAULT_MACHINE_PATH`] is used.
pub fn convert_machine(model: &MachineModel, path: Option<&Path>) -> Result<Machine> {
    let path = path.map_or_else(|| PathBuf::from(DEFAULT_MACHINE_PATH), Path::to_path_buf);
    debug!(
        path = %path.display(),
        states = model.states.len(),
        transitions = model.transitions.len(),
        "converting machine"
    );
    match build_machine(model, path) {
        Ok(machine) => {
            debug!(machine = %machine.name(), "machine converted");
            Ok(machine)
        }
        Err(e) => {
            debug!(error = %e, "machine rejected");
            Err(e)
        }
    }
}

fn build_machine(model: &MachineModel, path: PathBuf) -> Result<Machine> {
    trace!("action names");
    let actions = action_names(&model.states)?;

    trace!("includes");
    let includes: Vec<Include> =
        parse_block(&model.includes).map_err(|e| ConversionError::InvalidInclude {
            text: e.item,
            cause: e.cause,
        })?;

    trace!("machine signals");
    let machine_signals = parse_local_signals(&model.machine_variables)?;

    trace!("machine name");
    let name = machine_name(&path)?;

    trace!("external signals");
    let external_signals = parse_external_signals(&model.external_variables)?;

    trace!("clocks");
    let clocks = parse_clocks(&model.clocks)?;
    if clocks.is_empty() {
        return Err(ConversionError::NoClocks);
    }

    trace!("states");
    let states = model
        .states
        .iter()
        .map(convert_state)
        .collect::<Result<Vec<_>>>()?;

    trace!("transitions");
    let transitions = model
        .transitions
        .iter()
        .map(|t| convert_transition(t, &states))
        .collect::<Result<Vec<_>>>()?;

    trace!("initial and suspended state");
    let initial_state = resolve_state(&model.initial_state, &states).map_err(|e| {
        ConversionError::InvalidInitialState {
            name: model.initial_state.clone(),
            cause: Box::new(e),
        }
    })?;
    let suspended_state = model
        .suspended_state
        .as_deref()
        .map(|name| {
            resolve_state(name, &states).map_err(|e| ConversionError::InvalidSuspendedState {
                name: name.to_string(),
                cause: Box::new(e),
            })
        })
        .transpose()?;

    trace!("namespace");
    validate_namespace(&actions, &clocks, &machine_signals, &external_signals, &states)?;

    Ok(Machine::from_parts(MachineParts {
        actions,
        name,
        path,
        includes,
        external_signals,
        clocks,
        machine_signals,
        states,
        transitions,
        initial_state,
        suspended_state,
    }))
}

/// Distinct action names across every state.
fn action_names(states: &[StateModel]) -> Result<BTreeSet<VariableName>> {
    let raw: BTreeSet<&str> = states
        .iter()
        .flat_map(|s| s.actions.iter().map(|a| a.name.as_str()))
        .collect();
    raw.into_iter()
        .map(|name| {
            VariableName::new(name).map_err(|cause| ConversionError::InvalidActionName {
                name: name.to_string(),
                cause,
            })
        })
        .collect()
}

/// The machine's identity: its directory name without the `.machine` suffix.
pub fn machine_name(path: &Path) -> Result<VariableName> {
    let invalid = || ConversionError::InvalidMachineName {
        path: path.to_path_buf(),
    };
    let file_name = path.file_name().and_then(|n| n.to_str()).ok_or_else(invalid)?;
    let stem = file_name.strip_suffix(MACHINE_SUFFIX).unwrap_or(file_name);
    VariableName::new(stem).map_err(|_| invalid())
}

pub(crate) fn parse_local_signals(block: &str) -> Result<Vec<LocalSignal>> {
    parse_block(block).map_err(|e| ConversionError::InvalidLocalSignal {
        text: e.item,
        cause: e.cause,
    })
}

pub(crate) fn parse_external_signals(block: &str) -> Result<Vec<PortSignal>> {
    parse_block(block).map_err(|e| ConversionError::InvalidExternalSignal {
        text: e.item,
        cause: e.cause,
    })
}

/// Parse every clock; an empty list is not an error here.
pub(crate) fn parse_clocks(models: &[ClockModel]) -> Result<Vec<Clock>> {
    models
        .iter()
        .map(|c| {
            Clock::parse(&c.name, &c.frequency).map_err(|cause| ConversionError::InvalidClock {
                name: c.name.clone(),
                frequency: c.frequency.clone(),
                cause,
            })
        })
        .collect()
}

/// Convert one state. Actions with blank code are left out.
pub fn convert_state(model: &StateModel) -> Result<State> {
    let invalid = |detail: String| ConversionError::InvalidState {
        state: model.name.clone(),
        detail,
    };

    let name = VariableName::new(&model.name).map_err(|e| invalid(format!("name: {e}")))?;
    let signals: Vec<LocalSignal> = parse_block(&model.variables)
        .map_err(|e| invalid(format!("variable '{}': {}", e.item, e.cause)))?;
    let external_variables = parse_names(&model.external_variables)
        .map_err(|e| invalid(format!("external variable '{}': {}", e.item, e.cause)))?;

    let coded: Vec<_> = model
        .actions
        .iter()
        .filter(|a| !a.code.trim().is_empty())
        .collect();
    let blocks: Vec<SynchronousBlock> = parse_each(coded.iter().map(|a| a.code.as_str()), |code| {
        code.parse()
    })
    .map_err(|e| invalid(format!("action code '{}': {}", e.item, e.cause)))?;

    let mut actions = BTreeMap::new();
    for (action, block) in coded.into_iter().zip(blocks) {
        let key = VariableName::new(&action.name)
            .map_err(|e| invalid(format!("action name: {e}")))?;
        if actions.insert(key, block).is_some() {
            return Err(invalid(format!("action '{}' defined twice", action.name)));
        }
    }

    Ok(State::new(name, actions, signals, external_variables))
}

/// Convert one transition against the already converted states.
pub fn convert_transition(model: &TransitionModel, states: &[State]) -> Result<Transition> {
    let condition = model
        .condition
        .parse::<Expression>()
        .map_err(|cause| ConversionError::InvalidTransition {
            from: model.source.clone(),
            to: model.target.clone(),
            condition: model.condition.clone(),
            cause,
        })?;
    let (source, target) = resolve_transition_endpoints(model, states)?;
    Ok(Transition::new(condition, source, target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCategory;
    use crate::namespace::NameRole;
    use llfsm_model::{ActionModel, StateLayout, TransitionLayout};

    fn state(name: &str, actions: &[(&str, &str)]) -> StateModel {
        StateModel {
            name: name.into(),
            variables: String::new(),
            external_variables: String::new(),
            actions: actions.iter().map(|(n, c)| ActionModel::new(*n, *c)).collect(),
            layout: StateLayout::default(),
        }
    }

    fn canonical(name: &str) -> StateModel {
        state(name, &[("OnEntry", ""), ("OnExit", ""), ("Internal", "")])
    }

    fn transition(source: &str, target: &str, condition: &str) -> TransitionModel {
        TransitionModel {
            source: source.into(),
            target: target.into(),
            condition: condition.into(),
            layout: TransitionLayout::default(),
        }
    }

    fn model() -> MachineModel {
        MachineModel {
            states: vec![canonical("state1"), canonical("state2")],
            external_variables: "x: in std_logic;\ny: out std_logic;".into(),
            machine_variables: "signal z: std_logic;".into(),
            includes: "library IEEE;\nuse IEEE.std_logic_1164.all;".into(),
            transitions: vec![transition("state1", "state2", "x = '1'")],
            initial_state: "state1".into(),
            suspended_state: None,
            clocks: vec![ClockModel::new("clk", "100 MHz")],
        }
    }

    #[test]
    fn converts_valid_model() {
        let machine = convert_machine(&model(), None).unwrap();
        assert_eq!(machine.name().as_str(), "Machine0");
        assert_eq!(machine.path(), Path::new(DEFAULT_MACHINE_PATH));
        assert_eq!(machine.includes().len(), 2);
        assert_eq!(machine.external_signals().len(), 2);
        assert_eq!(machine.machine_signals().len(), 1);
        assert_eq!(machine.actions().len(), 3);
        assert_eq!(machine.states().len(), 2);
        assert_eq!(machine.transitions()[0].source(), 0);
        assert_eq!(machine.transitions()[0].target(), 1);
        assert_eq!(machine.initial_state(), 0);
        assert_eq!(machine.suspended_state(), None);
        assert!(machine.states()[0].actions().is_empty());
    }

    #[test]
    fn name_comes_from_path() {
        let machine = convert_machine(&model(), Some(Path::new("/work/PingMachine.machine"))).unwrap();
        assert_eq!(machine.name().as_str(), "PingMachine");
        assert!(matches!(
            convert_machine(&model(), Some(Path::new("/tmp/invalid path"))),
            Err(ConversionError::InvalidMachineName { .. })
        ));
    }

    #[test]
    fn invalid_action_name() {
        let mut m = model();
        m.states[0].actions.push(ActionModel::new("1 2 3", ""));
        assert!(matches!(
            convert_machine(&m, None),
            Err(ConversionError::InvalidActionName { ref name, .. }) if name == "1 2 3"
        ));
    }

    #[test]
    fn invalid_action_code() {
        let mut m = model();
        m.states[1].actions[0].code = "invalid code".into();
        let err = convert_machine(&m, None).unwrap_err();
        assert!(matches!(err, ConversionError::InvalidState { ref state, .. } if state == "state2"));
    }

    #[test]
    fn action_code_is_kept() {
        let mut m = model();
        m.states[0].actions[0].code = "y <= '1';".into();
        let machine = convert_machine(&m, None).unwrap();
        let on_entry = VariableName::new("OnEntry").unwrap();
        let code = machine.states()[0].action(&on_entry).unwrap();
        assert_eq!(code.to_string(), "y <= '1';");
        assert!(machine.states()[0].action(&VariableName::new("OnExit").unwrap()).is_none());
    }

    #[test]
    fn blocks_are_all_or_nothing() {
        let mut m = model();
        m.includes.push_str("\nnonsense here;");
        assert!(matches!(
            convert_machine(&m, None),
            Err(ConversionError::InvalidInclude { ref text, .. }) if text == "nonsense here;"
        ));

        let mut m = model();
        m.machine_variables.push_str("signal : std_logic;");
        assert!(matches!(
            convert_machine(&m, None),
            Err(ConversionError::InvalidLocalSignal { .. })
        ));

        let mut m = model();
        m.external_variables.push_str("\nw: sideways std_logic;");
        assert!(matches!(
            convert_machine(&m, None),
            Err(ConversionError::InvalidExternalSignal { .. })
        ));
    }

    #[test]
    fn clocks_are_required_and_parsed() {
        let mut m = model();
        m.clocks.clear();
        assert!(matches!(convert_machine(&m, None), Err(ConversionError::NoClocks)));

        let mut m = model();
        m.clocks.push(ClockModel::new("invalid name", "100 MHz"));
        assert!(matches!(
            convert_machine(&m, None),
            Err(ConversionError::InvalidClock { .. })
        ));

        let mut m = model();
        m.clocks[0].frequency = "Invalid freq".into();
        assert!(matches!(
            convert_machine(&m, None),
            Err(ConversionError::InvalidClock { .. })
        ));
    }

    #[test]
    fn invalid_condition() {
        let mut m = model();
        m.transitions[0].condition = "invalid condition".into();
        assert!(matches!(
            convert_machine(&m, None),
            Err(ConversionError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn unresolved_transition_endpoint() {
        let mut m = model();
        m.transitions[0].target = "state3".into();
        let err = convert_machine(&m, None).unwrap_err();
        assert!(matches!(err, ConversionError::UnknownState { ref name } if name == "state3"));
        assert_eq!(err.category(), ErrorCategory::Referential);
    }

    #[test]
    fn initial_state_must_resolve() {
        for name in ["", "state3"] {
            let mut m = model();
            m.initial_state = name.into();
            assert!(matches!(
                convert_machine(&m, None),
                Err(ConversionError::InvalidInitialState { .. })
            ));
        }
    }

    #[test]
    fn suspended_state_resolves_when_present() {
        let mut m = model();
        m.suspended_state = Some("state2".into());
        assert_eq!(convert_machine(&m, None).unwrap().suspended_state(), Some(1));

        m.suspended_state = Some("state3".into());
        let err = convert_machine(&m, None).unwrap_err();
        assert!(matches!(err, ConversionError::InvalidSuspendedState { .. }));
        assert_eq!(err.category(), ErrorCategory::Referential);
    }

    #[test]
    fn namespace_collisions() {
        for clock in ["OnEntry", "x", "y", "z", "state1"] {
            let mut m = model();
            m.clocks.push(ClockModel::new(clock, "10 MHz"));
            let err = convert_machine(&m, None).unwrap_err();
            assert_eq!(err.category(), ErrorCategory::NameCollision, "clock {clock}");
        }
    }

    #[test]
    fn state_locals_cannot_shadow_machine_names() {
        let mut m = model();
        m.states[0].variables = "signal s1_x: std_logic;".into();
        assert!(convert_machine(&m, None).is_ok());
        m.clocks.push(ClockModel::new("s1_x", "10 MHz"));
        assert!(matches!(
            convert_machine(&m, None),
            Err(ConversionError::NameCollision {
                first: NameRole::Clock,
                second: NameRole::LocalSignal,
                ..
            })
        ));

        let mut m = model();
        m.states[1].variables = "signal state1: std_logic;".into();
        assert!(matches!(
            convert_machine(&m, None),
            Err(ConversionError::NameCollision {
                first: NameRole::State,
                second: NameRole::LocalSignal,
                ..
            })
        ));
    }

    #[test]
    fn states_may_reuse_a_local_signal_name() {
        let mut m = model();
        m.states[0].variables = "signal tmp: std_logic;".into();
        m.states[1].variables = "signal TMP: std_logic := '1';".into();
        let machine = convert_machine(&m, None).unwrap();
        assert_eq!(machine.states()[0].signals()[0].name.as_str(), "tmp");
        assert_eq!(machine.states()[1].signals()[0].name.as_str(), "TMP");
    }

    #[test]
    fn state_local_repeated_within_one_state() {
        let mut m = model();
        m.states[0].variables = "signal tmp: std_logic;\nsignal tmp: bit;".into();
        assert!(matches!(
            convert_machine(&m, None),
            Err(ConversionError::NameCollision {
                first: NameRole::LocalSignal,
                second: NameRole::LocalSignal,
                ref name,
            }) if name == "tmp"
        ));
    }

    #[test]
    fn duplicate_state_names() {
        let mut m = model();
        m.states.push(canonical("State1"));
        m.transitions.clear();
        m.initial_state = "state2".into();
        let err = convert_machine(&m, None).unwrap_err();
        assert!(matches!(
            err,
            ConversionError::NameCollision {
                first: NameRole::State,
                second: NameRole::State,
                ..
            }
        ));
    }

    #[test]
    fn checks_run_in_order() {
        // Every stage is broken; the action name is checked first.
        let mut m = model();
        m.states[0].actions.push(ActionModel::new("bad action", ""));
        m.includes = "bad include;".into();
        m.clocks.clear();
        m.initial_state = "missing".into();
        assert!(matches!(
            convert_machine(&m, None),
            Err(ConversionError::InvalidActionName { .. })
        ));

        m.states[0].actions.pop();
        assert!(matches!(
            convert_machine(&m, None),
            Err(ConversionError::InvalidInclude { .. })
        ));

        m.includes.clear();
        assert!(matches!(convert_machine(&m, None), Err(ConversionError::NoClocks)));

        m.clocks.push(ClockModel::new("clk", "1 Hz"));
        assert!(matches!(
            convert_machine(&m, None),
            Err(ConversionError::InvalidInitialState { .. })
        ));
    }

    #[test]
    fn state_conversion_details() {
        let mut s = canonical("Busy");
        s.variables = "signal count: integer range 0 to 7 := 0;".into();
        s.external_variables = "ping\npong\n".into();
        s.actions[2].code = "count := count + 1;".into();
        let state = convert_state(&s).unwrap();
        assert_eq!(state.signals().len(), 1);
        assert_eq!(state.external_variables().len(), 2);
        assert_eq!(state.actions().len(), 1);

        s.external_variables = "ping pong".into();
        assert!(matches!(convert_state(&s), Err(ConversionError::InvalidState { .. })));
    }

    #[test]
    fn duplicate_action_in_state() {
        let s = state("Busy", &[("OnEntry", "null;"), ("onentry", "null;")]);
        assert!(matches!(convert_state(&s), Err(ConversionError::InvalidState { .. })));
    }
}
