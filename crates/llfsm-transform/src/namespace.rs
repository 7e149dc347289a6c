//! Uniqueness of names across disjoint roles.
//!
//! A machine shares one namespace between its clocks, signals, actions and
//! states; an arrangement shares one between its clocks, signals and machine
//! instances. Names compare case-insensitively, as VHDL identifiers do.

use std::collections::HashMap;
use std::fmt;

use llfsm_vhdl::VariableName;

use crate::error::{ConversionError, Result};

/// What a name denotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameRole {
    Clock,
    ExternalSignal,
    LocalSignal,
    Action,
    State,
    MachineInstance,
}

impl fmt::Display for NameRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            NameRole::Clock => "clock",
            NameRole::ExternalSignal => "external signal",
            NameRole::LocalSignal => "local signal",
            NameRole::Action => "action",
            NameRole::State => "state",
            NameRole::MachineInstance => "machine instance",
        };
        f.write_str(text)
    }
}

/// A collection of names tagged with their roles, checked as one namespace.
#[derive(Debug, Default)]
pub struct Namespace<'a> {
    entries: Vec<(&'a VariableName, NameRole)>,
}

impl<'a> Namespace<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add every name in `names` under `role`.
    pub fn with(mut self, role: NameRole, names: impl IntoIterator<Item = &'a VariableName>) -> Self {
        self.entries.extend(names.into_iter().map(|name| (name, role)));
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fail on the first name seen twice, in insertion order. Duplicates within
    /// one role are caught as well as duplicates across roles.
    pub fn validate(&self) -> Result<()> {
        let mut seen: HashMap<&VariableName, NameRole> = HashMap::with_capacity(self.entries.len());
        for &(name, role) in &self.entries {
            if let Some(&first) = seen.get(name) {
                return Err(ConversionError::NameCollision {
                    name: name.to_string(),
                    first,
                    second: role,
                });
            }
            seen.insert(name, role);
        }
        Ok(())
    }
}
