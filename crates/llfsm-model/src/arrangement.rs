//! Flat model of an arrangement: machine instances wired together.

use serde::{Deserialize, Serialize};

use crate::machine::ClockModel;

/// The top-level composition of machines.
///
/// An arrangement decides which signals are sensors/actuators (external), which
/// are shared between machines but invisible outside (global), and which clocks
/// exist.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrangementModel {
    pub clocks: Vec<ClockModel>,
    /// Port declarations of the arrangement.
    pub external_variables: String,
    /// The machine instances executing in the arrangement.
    pub machines: Vec<MachineReference>,
    /// Signals local to the arrangement, shared amongst its machines.
    pub global_variables: String,
    /// Mappings from external signals onto shared global signals.
    #[serde(default)]
    pub global_mappings: Vec<VariableMapping>,
}

/// One machine instance inside an arrangement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MachineReference {
    /// Instance name.
    pub name: String,
    /// Path of the `.machine` directory, relative to the arrangement's base directory.
    pub path: String,
    /// Port mappings for this instance.
    pub mappings: Vec<VariableMapping>,
}

impl MachineReference {
    pub fn new(
        name: impl Into<String>,
        path: impl Into<String>,
        mappings: Vec<VariableMapping>,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            mappings,
        }
    }
}

/// A `source -> destination` signal mapping.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VariableMapping {
    pub source: String,
    pub destination: String,
}

impl VariableMapping {
    pub fn new(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
        }
    }
}
