//! Flat model of a single machine.

use serde::{Deserialize, Serialize};

use crate::layout::{StateLayout, TransitionLayout};

/// A single LLFSM as the editor stores it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineModel {
    /// The states within the machine, in display order.
    pub states: Vec<StateModel>,
    /// Port declarations, e.g. `ping: out std_logic; pong: in std_logic;`.
    pub external_variables: String,
    /// Signals local to the machine, e.g. `signal x: std_logic;`.
    pub machine_variables: String,
    /// `library`/`use` clauses.
    pub includes: String,
    /// The transitions between states.
    pub transitions: Vec<TransitionModel>,
    /// Name of the initial state.
    pub initial_state: String,
    /// Name of the suspended state, if the machine can be suspended.
    #[serde(default)]
    pub suspended_state: Option<String>,
    /// The clocks used in this machine. The first clock drives the machine.
    pub clocks: Vec<ClockModel>,
}

/// A state as the editor stores it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateModel {
    pub name: String,
    /// Signals local to this state.
    pub variables: String,
    /// Newline-separated names of the external signals this state accesses.
    #[serde(default)]
    pub external_variables: String,
    pub actions: Vec<ActionModel>,
    pub layout: StateLayout,
}

/// The code attached to one named action of a state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionModel {
    pub name: String,
    pub code: String,
}

impl ActionModel {
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
        }
    }
}

/// A guarded transition between two states, referenced by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionModel {
    pub source: String,
    pub target: String,
    /// Boolean guard, e.g. `pong = '1'`.
    pub condition: String,
    pub layout: TransitionLayout,
}

/// A named clock with a frequency such as `125 MHz`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClockModel {
    pub name: String,
    pub frequency: String,
}

impl ClockModel {
    pub fn new(name: impl Into<String>, frequency: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            frequency: frequency.into(),
        }
    }
}

impl MachineModel {
    /// The layouts of every state, in state order.
    pub fn state_layouts(&self) -> Vec<StateLayout> {
        self.states.iter().map(|s| s.layout).collect()
    }

    /// The layouts of every transition, in transition order.
    pub fn transition_layouts(&self) -> Vec<TransitionLayout> {
        self.transitions.iter().map(|t| t.layout).collect()
    }
}
