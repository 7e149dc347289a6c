//! Validated arrangements of machine instances.

use std::collections::{BTreeMap, HashSet};

use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};

use llfsm_vhdl::{Clock, LocalSignal, PortSignal, VariableName};

use super::machine::Machine;
use crate::error::{ConversionError, Result};

/// A `source -> destination` signal mapping between validated names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct VariableMapping {
    source: VariableName,
    destination: VariableName,
}

impl VariableMapping {
    pub fn new(source: VariableName, destination: VariableName) -> Self {
        Self {
            source,
            destination,
        }
    }

    /// The signal being mapped.
    pub fn source(&self) -> &VariableName {
        &self.source
    }

    /// The signal it is wired to.
    pub fn destination(&self) -> &VariableName {
        &self.destination
    }
}

/// A named instance of a machine type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineInstance {
    name: VariableName,
    type_name: VariableName,
}

impl MachineInstance {
    pub fn new(name: VariableName, type_name: VariableName) -> Self {
        Self { name, type_name }
    }

    /// The instance name, unique within the arrangement.
    pub fn name(&self) -> &VariableName {
        &self.name
    }

    /// The machine type, i.e. the name of its `.machine` directory.
    pub fn type_name(&self) -> &VariableName {
        &self.type_name
    }
}

/// The machine behind an instance and how its signals are wired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MachineMapping {
    machine: Machine,
    mappings: Vec<VariableMapping>,
}

impl MachineMapping {
    pub fn new(machine: Machine, mappings: Vec<VariableMapping>) -> Self {
        Self { machine, mappings }
    }

    /// The instantiated machine.
    pub fn machine(&self) -> &Machine {
        &self.machine
    }

    /// Port mappings from the machine's signals to arrangement signals.
    pub fn mappings(&self) -> &[VariableMapping] {
        &self.mappings
    }
}

/// Instances of an arrangement, each name used at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstanceMap {
    entries: BTreeMap<MachineInstance, MachineMapping>,
}

impl InstanceMap {
    /// Build the map, failing on the first instance name seen twice.
    pub fn from_entries(
        entries: impl IntoIterator<Item = (MachineInstance, MachineMapping)>,
    ) -> Result<Self> {
        let mut names = HashSet::new();
        let mut map = BTreeMap::new();
        for (instance, mapping) in entries {
            if !names.insert(instance.name.clone()) {
                return Err(ConversionError::DuplicateMachineInstance {
                    name: instance.name.to_string(),
                });
            }
            map.insert(instance, mapping);
        }
        Ok(Self { entries: map })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an instance by name.
    pub fn get(&self, name: &VariableName) -> Option<(&MachineInstance, &MachineMapping)> {
        self.entries.iter().find(|(instance, _)| &instance.name == name)
    }

    /// Instances ordered by name, then type.
    pub fn iter(&self) -> impl Iterator<Item = (&MachineInstance, &MachineMapping)> {
        self.entries.iter()
    }

    pub fn instances(&self) -> impl Iterator<Item = &MachineInstance> {
        self.entries.keys()
    }
}

#[derive(Serialize)]
struct InstanceEntry<'a> {
    instance: &'a MachineInstance,
    mapping: &'a MachineMapping,
}

impl Serialize for InstanceMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.entries.len()))?;
        for (instance, mapping) in &self.entries {
            seq.serialize_element(&InstanceEntry { instance, mapping })?;
        }
        seq.end()
    }
}

/// A validated composition of machine instances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Arrangement {
    machines: InstanceMap,
    external_signals: Vec<PortSignal>,
    signals: Vec<LocalSignal>,
    clocks: Vec<Clock>,
    global_mappings: Vec<VariableMapping>,
}

impl Arrangement {
    pub(crate) fn new(
        machines: InstanceMap,
        external_signals: Vec<PortSignal>,
        signals: Vec<LocalSignal>,
        clocks: Vec<Clock>,
        global_mappings: Vec<VariableMapping>,
    ) -> Self {
        Self {
            machines,
            external_signals,
            signals,
            clocks,
            global_mappings,
        }
    }

    /// Every machine instance with its mapping.
    pub fn machines(&self) -> &InstanceMap {
        &self.machines
    }

    /// Ports of the arrangement as a whole.
    pub fn external_signals(&self) -> &[PortSignal] {
        &self.external_signals
    }

    /// Signals shared between the arrangement's machines.
    pub fn signals(&self) -> &[LocalSignal] {
        &self.signals
    }

    /// Clocks available to the arrangement; may be empty.
    pub fn clocks(&self) -> &[Clock] {
        &self.clocks
    }

    /// Mappings from external signals to shared signals.
    pub fn global_mappings(&self) -> &[VariableMapping] {
        &self.global_mappings
    }
}
