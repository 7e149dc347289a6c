//! Validated machines, states and transitions.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use llfsm_vhdl::{Clock, Expression, Include, LocalSignal, PortSignal, SynchronousBlock, VariableName};

use crate::error::{ConversionError, Result};
use crate::namespace::{NameRole, Namespace};

/// One LLFSM whose states and transitions are addressed by index.
///
/// Built by [`convert_machine`](crate::machine::convert_machine) or decoded from
/// JSON; decoding re-checks every structural invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "MachineRecord")]
pub struct Machine {
    actions: BTreeSet<VariableName>,
    name: VariableName,
    path: PathBuf,
    includes: Vec<Include>,
    external_signals: Vec<PortSignal>,
    clocks: Vec<Clock>,
    driving_clock: usize,
    machine_signals: Vec<LocalSignal>,
    states: Vec<State>,
    transitions: Vec<Transition>,
    initial_state: usize,
    suspended_state: Option<usize>,
}

/// The fields the converter hands over when assembling a [`Machine`].
pub(crate) struct MachineParts {
    pub actions: BTreeSet<VariableName>,
    pub name: VariableName,
    pub path: PathBuf,
    pub includes: Vec<Include>,
    pub external_signals: Vec<PortSignal>,
    pub clocks: Vec<Clock>,
    pub machine_signals: Vec<LocalSignal>,
    pub states: Vec<State>,
    pub transitions: Vec<Transition>,
    pub initial_state: usize,
    pub suspended_state: Option<usize>,
}

impl Machine {
    pub(crate) fn from_parts(parts: MachineParts) -> Self {
        Self {
            actions: parts.actions,
            name: parts.name,
            path: parts.path,
            includes: parts.includes,
            external_signals: parts.external_signals,
            clocks: parts.clocks,
            driving_clock: 0,
            machine_signals: parts.machine_signals,
            states: parts.states,
            transitions: parts.transitions,
            initial_state: parts.initial_state,
            suspended_state: parts.suspended_state,
        }
    }

    /// Every action name used by any state.
    pub fn actions(&self) -> &BTreeSet<VariableName> {
        &self.actions
    }

    /// The machine's identity, taken from its directory name.
    pub fn name(&self) -> &VariableName {
        &self.name
    }

    /// The `.machine` directory this machine was converted from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `library` and `use` clauses, in source order.
    pub fn includes(&self) -> &[Include] {
        &self.includes
    }

    /// Ports the machine shares with its environment.
    pub fn external_signals(&self) -> &[PortSignal] {
        &self.external_signals
    }

    /// Clocks in declaration order; the first drives the machine.
    pub fn clocks(&self) -> &[Clock] {
        &self.clocks
    }

    /// Index of the clock that advances the machine. Always 0.
    pub fn driving_clock(&self) -> usize {
        self.driving_clock
    }

    /// Signals local to the machine and visible in every state.
    pub fn machine_signals(&self) -> &[LocalSignal] {
        &self.machine_signals
    }

    /// States in model order. Indices elsewhere point into this list.
    pub fn states(&self) -> &[State] {
        &self.states
    }

    /// Transitions in priority order.
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Index of the state the machine starts in.
    pub fn initial_state(&self) -> usize {
        self.initial_state
    }

    /// Index of the state entered on suspension, if any.
    pub fn suspended_state(&self) -> Option<usize> {
        self.suspended_state
    }

    /// Transitions leaving the state at `index`, in priority order.
    pub fn transitions_from(&self, index: usize) -> impl Iterator<Item = &Transition> + '_ {
        self.transitions.iter().filter(move |t| t.source == index)
    }

    /// Give a decoded machine the identity of the directory it was loaded from.
    pub(crate) fn relocated(mut self, name: VariableName, path: &Path) -> Self {
        self.name = name;
        self.path = path.to_path_buf();
        self
    }

    fn verify(&self) -> std::result::Result<(), String> {
        if self.clocks.is_empty() {
            return Err("machine has no clocks".into());
        }
        if self.driving_clock != 0 {
            return Err(format!(
                "driving clock must be the first clock, found index {}",
                self.driving_clock
            ));
        }
        let count = self.states.len();
        if self.initial_state >= count {
            return Err(format!("initial state {} out of range", self.initial_state));
        }
        if let Some(suspended) = self.suspended_state {
            if suspended >= count {
                return Err(format!("suspended state {suspended} out of range"));
            }
        }
        for (i, transition) in self.transitions.iter().enumerate() {
            if transition.source >= count || transition.target >= count {
                return Err(format!("transition {i} refers to a state out of range"));
            }
        }
        for state in &self.states {
            if let Some(action) = state.actions.keys().find(|a| !self.actions.contains(*a)) {
                return Err(format!(
                    "state '{}' defines undeclared action '{action}'",
                    state.name
                ));
            }
        }
        validate_namespace(
            &self.actions,
            &self.clocks,
            &self.machine_signals,
            &self.external_signals,
            &self.states,
        )
        .map_err(|e| e.to_string())
    }
}

/// Check the machine namespace: actions, clocks, machine signals, external
/// signals and state names. Each state's own signals are then checked against
/// that namespace, so two states may declare the same local signal but no state
/// may shadow a machine-wide name or repeat one of its own.
pub(crate) fn validate_namespace(
    actions: &BTreeSet<VariableName>,
    clocks: &[Clock],
    machine_signals: &[LocalSignal],
    external_signals: &[PortSignal],
    states: &[State],
) -> Result<()> {
    let machine = || {
        Namespace::new()
            .with(NameRole::Action, actions)
            .with(NameRole::Clock, clocks.iter().map(|c| &c.name))
            .with(NameRole::LocalSignal, machine_signals.iter().map(|s| &s.name))
            .with(NameRole::ExternalSignal, external_signals.iter().map(|s| &s.name))
            .with(NameRole::State, states.iter().map(|s| &s.name))
    };
    machine().validate()?;
    for state in states {
        machine()
            .with(NameRole::LocalSignal, state.signals.iter().map(|s| &s.name))
            .validate()?;
    }
    Ok(())
}

/// Wire form of [`Machine`]; converted only after verification.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MachineRecord {
    actions: BTreeSet<VariableName>,
    name: VariableName,
    path: PathBuf,
    includes: Vec<Include>,
    external_signals: Vec<PortSignal>,
    clocks: Vec<Clock>,
    driving_clock: usize,
    machine_signals: Vec<LocalSignal>,
    states: Vec<State>,
    transitions: Vec<Transition>,
    initial_state: usize,
    #[serde(default)]
    suspended_state: Option<usize>,
}

impl TryFrom<MachineRecord> for Machine {
    type Error = ConversionError;

    fn try_from(record: MachineRecord) -> std::result::Result<Self, Self::Error> {
        let machine = Machine {
            actions: record.actions,
            name: record.name,
            path: record.path,
            includes: record.includes,
            external_signals: record.external_signals,
            clocks: record.clocks,
            driving_clock: record.driving_clock,
            machine_signals: record.machine_signals,
            states: record.states,
            transitions: record.transitions,
            initial_state: record.initial_state,
            suspended_state: record.suspended_state,
        };
        machine
            .verify()
            .map_err(|reason| ConversionError::InconsistentMachine { reason })?;
        Ok(machine)
    }
}

/// A state of a [`Machine`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct State {
    name: VariableName,
    actions: BTreeMap<VariableName, SynchronousBlock>,
    signals: Vec<LocalSignal>,
    external_variables: Vec<VariableName>,
}

impl State {
    pub(crate) fn new(
        name: VariableName,
        actions: BTreeMap<VariableName, SynchronousBlock>,
        signals: Vec<LocalSignal>,
        external_variables: Vec<VariableName>,
    ) -> Self {
        Self {
            name,
            actions,
            signals,
            external_variables,
        }
    }

    /// The state's name, unique within its machine.
    pub fn name(&self) -> &VariableName {
        &self.name
    }

    /// Code for each action that has any. Absent actions do nothing.
    pub fn actions(&self) -> &BTreeMap<VariableName, SynchronousBlock> {
        &self.actions
    }

    /// Code for one action, `None` when the state does nothing for it.
    pub fn action(&self, name: &VariableName) -> Option<&SynchronousBlock> {
        self.actions.get(name)
    }

    /// Signals local to this state.
    pub fn signals(&self) -> &[LocalSignal] {
        &self.signals
    }

    /// Names of the external signals this state reads or writes.
    pub fn external_variables(&self) -> &[VariableName] {
        &self.external_variables
    }
}

/// A guarded edge between two states, by index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    condition: Expression,
    source: usize,
    target: usize,
}

impl Transition {
    pub(crate) fn new(condition: Expression, source: usize, target: usize) -> Self {
        Self {
            condition,
            source,
            target,
        }
    }

    /// The guard that must hold for the transition to fire.
    pub fn condition(&self) -> &Expression {
        &self.condition
    }

    /// Index of the state the transition leaves.
    pub fn source(&self) -> usize {
        self.source
    }

    /// Index of the state the transition enters.
    pub fn target(&self) -> usize {
        self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(text: &str) -> VariableName {
        VariableName::new(text).unwrap()
    }

    fn sample() -> Machine {
        let on_entry = name("OnEntry");
        let mut actions = BTreeMap::new();
        actions.insert(on_entry.clone(), "ping <= '1';".parse().unwrap());
        Machine::from_parts(MachineParts {
            actions: [on_entry].into_iter().collect(),
            name: name("Ping"),
            path: PathBuf::from("/tmp/Ping.machine"),
            includes: vec!["library IEEE;".parse().unwrap()],
            external_signals: vec!["ping: out std_logic;".parse().unwrap()],
            clocks: vec![Clock::parse("clk", "125 MHz").unwrap()],
            machine_signals: vec![],
            states: vec![
                State::new(name("Initial"), BTreeMap::new(), vec![], vec![]),
                State::new(name("SendPing"), actions, vec![], vec![name("ping")]),
            ],
            transitions: vec![Transition::new("true".parse().unwrap(), 0, 1)],
            initial_state: 0,
            suspended_state: None,
        })
    }

    #[test]
    fn json_round_trip() {
        let machine = sample();
        let json = serde_json::to_string(&machine).unwrap();
        let decoded: Machine = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, machine);
    }

    #[test]
    fn json_uses_camel_case_and_text() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["initialState"], 0);
        assert_eq!(value["drivingClock"], 0);
        assert_eq!(value["externalSignals"][0], "ping: out std_logic;");
        assert_eq!(value["states"][1]["actions"]["OnEntry"], "ping <= '1';");
        assert_eq!(value["transitions"][0]["condition"], "true");
    }

    #[test]
    fn decoding_rejects_out_of_range_indices() {
        let mut value = serde_json::to_value(sample()).unwrap();
        value["transitions"][0]["target"] = serde_json::json!(7);
        let err = serde_json::from_value::<Machine>(value).unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn decoding_rejects_collisions() {
        let mut value = serde_json::to_value(sample()).unwrap();
        value["clocks"][0]["name"] = serde_json::json!("ping");
        let err = serde_json::from_value::<Machine>(value).unwrap_err();
        assert!(err.to_string().contains("inconsistent machine"));
    }

    #[test]
    fn decoding_requires_the_first_clock_to_drive() {
        let mut value = serde_json::to_value(sample()).unwrap();
        value["clocks"] = serde_json::json!([
            {"name": "clk", "frequency": "125 MHz"},
            {"name": "slow", "frequency": "1 kHz"}
        ]);
        assert!(serde_json::from_value::<Machine>(value.clone()).is_ok());
        value["drivingClock"] = serde_json::json!(1);
        let err = serde_json::from_value::<Machine>(value).unwrap_err();
        assert!(err.to_string().contains("driving clock"));
    }

    #[test]
    fn decoding_accepts_a_local_reused_across_states() {
        let mut value = serde_json::to_value(sample()).unwrap();
        let tmp = serde_json::json!(["signal tmp: std_logic;"]);
        value["states"][0]["signals"] = tmp.clone();
        value["states"][1]["signals"] = tmp;
        assert!(serde_json::from_value::<Machine>(value).is_ok());
    }

    #[test]
    fn decoding_rejects_undeclared_actions() {
        let mut value = serde_json::to_value(sample()).unwrap();
        value["actions"] = serde_json::json!([]);
        assert!(serde_json::from_value::<Machine>(value).is_err());
    }

    #[test]
    fn outgoing_transitions() {
        let machine = sample();
        assert_eq!(machine.transitions_from(0).count(), 1);
        assert_eq!(machine.transitions_from(1).count(), 0);
        assert_eq!(machine.driving_clock(), 0);
    }
}
