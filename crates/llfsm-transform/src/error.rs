//! Conversion error types.

use std::fmt;
use std::path::PathBuf;

use llfsm_vhdl::ParseError;

use crate::namespace::NameRole;

/// Broad classes of conversion failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// A declaration, include, statement, condition or identifier did not parse.
    Parse,
    /// A name is used twice within or across namespaces.
    NameCollision,
    /// A symbolic name does not resolve to exactly one entity.
    Referential,
    /// A supplied list does not match the element count it annotates.
    Arity,
    /// A machine's backing file is missing, unreadable or undecodable.
    Io,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ErrorCategory::Parse => "parse",
            ErrorCategory::NameCollision => "name collision",
            ErrorCategory::Referential => "referential integrity",
            ErrorCategory::Arity => "arity",
            ErrorCategory::Io => "i/o",
        };
        f.write_str(text)
    }
}

/// Reasons a model is rejected, or a domain value cannot be projected.
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    /// The same name appears twice in one namespace.
    #[error("name '{name}' is used as both {first} and {second}")]
    NameCollision {
        /// The repeated name, as spelled at its second use.
        name: String,
        /// Role of the first use.
        first: NameRole,
        /// Role of the second use.
        second: NameRole,
    },

    /// No state carries the referenced name.
    #[error("no state named '{name}'")]
    UnknownState {
        /// The name that did not resolve.
        name: String,
    },

    /// More than one state carries the referenced name.
    #[error("{count} states are named '{name}'")]
    AmbiguousState {
        /// The name that resolved more than once.
        name: String,
        /// How many states carry it.
        count: usize,
    },

    /// An action name used by some state is not an identifier.
    #[error("invalid action name '{name}'")]
    InvalidActionName {
        /// The action name as written.
        name: String,
        #[source]
        cause: ParseError,
    },

    /// An entry of the includes block does not parse.
    #[error("invalid include '{text}'")]
    InvalidInclude {
        /// The offending statement.
        text: String,
        #[source]
        cause: ParseError,
    },

    /// An entry of a local signal block does not parse.
    #[error("invalid local signal '{text}'")]
    InvalidLocalSignal {
        /// The offending declaration.
        text: String,
        #[source]
        cause: ParseError,
    },

    /// The identity derived from the machine's path is not an identifier.
    #[error("invalid machine name derived from {}", path.display())]
    InvalidMachineName {
        /// The machine directory.
        path: PathBuf,
    },

    /// An entry of an external signal block does not parse.
    #[error("invalid external signal '{text}'")]
    InvalidExternalSignal {
        /// The offending declaration.
        text: String,
        #[source]
        cause: ParseError,
    },

    /// A machine needs at least its driving clock.
    #[error("machine has no clocks")]
    NoClocks,

    /// A clock whose name or frequency does not parse.
    #[error("invalid clock '{name}' with frequency '{frequency}'")]
    InvalidClock {
        /// The clock name as written.
        name: String,
        /// The frequency text as written.
        frequency: String,
        #[source]
        cause: ParseError,
    },

    /// A state whose name, signals, external variables or action code is invalid.
    #[error("invalid state '{state}': {detail}")]
    InvalidState {
        /// The state name as written.
        state: String,
        /// Which part of the state failed, and why.
        detail: String,
    },

    /// A transition guard that does not parse.
    #[error("invalid condition '{condition}' on transition {from} -> {to}")]
    InvalidTransition {
        /// Source state name as written.
        from: String,
        /// Target state name as written.
        to: String,
        /// The guard text.
        condition: String,
        #[source]
        cause: ParseError,
    },

    /// The initial state does not name exactly one state.
    #[error("invalid initial state '{name}'")]
    InvalidInitialState {
        /// The initial state name as written.
        name: String,
        #[source]
        cause: Box<ConversionError>,
    },

    /// The suspended state is present but does not name exactly one state.
    #[error("invalid suspended state '{name}'")]
    InvalidSuspendedState {
        /// The suspended state name as written.
        name: String,
        #[source]
        cause: Box<ConversionError>,
    },

    /// Two machine references share a name.
    #[error("machine reference '{name}' appears more than once")]
    DuplicateMachineReference {
        /// The shared reference name.
        name: String,
    },

    /// A reference whose name or path cannot identify a machine instance.
    #[error("invalid machine reference '{name}' to '{path}': {detail}")]
    InvalidMachineReference {
        /// The reference name as written.
        name: String,
        /// The reference path as written.
        path: String,
        /// What is wrong with it.
        detail: String,
    },

    /// The machine file could not be read or decoded.
    #[error("failed to load machine from {}: {reason}", path.display())]
    MachineLoadFailed {
        /// The `model.json` file.
        path: PathBuf,
        /// The I/O or decoding failure.
        reason: String,
    },

    /// A referenced machine could not be loaded or was rejected on conversion.
    #[error("conversion rejected for machine '{name}' at {}", path.display())]
    MachineRejected {
        /// The reference name.
        name: String,
        /// The machine directory the reference resolved to.
        path: PathBuf,
        #[source]
        cause: Box<ConversionError>,
    },

    /// A port mapping of one machine reference is not a pair of identifiers.
    #[error("invalid mapping '{from}' -> '{to}' for machine instance '{instance}'")]
    InvalidMapping {
        /// The reference the mapping belongs to.
        instance: String,
        /// Source signal as written.
        from: String,
        /// Destination signal as written.
        to: String,
        #[source]
        cause: ParseError,
    },

    /// Two references resolve to the same instance name.
    #[error("machine instance '{name}' is defined more than once")]
    DuplicateMachineInstance {
        /// The shared instance name.
        name: String,
    },

    /// An arrangement-level mapping is not a pair of identifiers.
    #[error("invalid global mapping '{from}' -> '{to}'")]
    InvalidGlobalMapping {
        /// Source signal as written.
        from: String,
        /// Destination signal as written.
        to: String,
        #[source]
        cause: ParseError,
    },

    /// Supplied layouts do not line up with the elements they annotate.
    #[error("expected {expected} {kind} layouts, got {found}")]
    LayoutMismatch {
        /// `"state"` or `"transition"`.
        kind: &'static str,
        /// Number of elements to annotate.
        expected: usize,
        /// Number of layouts supplied.
        found: usize,
    },

    /// A decoded domain machine violates a structural invariant.
    #[error("inconsistent machine: {reason}")]
    InconsistentMachine {
        /// The first violated invariant.
        reason: String,
    },
}

impl ConversionError {
    /// The failure class this error belongs to.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ConversionError::NameCollision { .. }
            | ConversionError::DuplicateMachineReference { .. }
            | ConversionError::DuplicateMachineInstance { .. } => ErrorCategory::NameCollision,
            ConversionError::UnknownState { .. }
            | ConversionError::AmbiguousState { .. }
            | ConversionError::InvalidInitialState { .. }
            | ConversionError::InvalidSuspendedState { .. } => ErrorCategory::Referential,
            ConversionError::LayoutMismatch { .. } => ErrorCategory::Arity,
            ConversionError::MachineRejected { cause, .. } => cause.category(),
            ConversionError::MachineLoadFailed { .. } => ErrorCategory::Io,
            ConversionError::InvalidActionName { .. }
            | ConversionError::InvalidInclude { .. }
            | ConversionError::InvalidLocalSignal { .. }
            | ConversionError::InvalidMachineName { .. }
            | ConversionError::InvalidExternalSignal { .. }
            | ConversionError::NoClocks
            | ConversionError::InvalidClock { .. }
            | ConversionError::InvalidState { .. }
            | ConversionError::InvalidTransition { .. }
            | ConversionError::InvalidMachineReference { .. }
            | ConversionError::InvalidMapping { .. }
            | ConversionError::InvalidGlobalMapping { .. }
            | ConversionError::InconsistentMachine { .. } => ErrorCategory::Parse,
        }
    }
}

/// Result type for conversions.
pub type Result<T> = std::result::Result<T, ConversionError>;
