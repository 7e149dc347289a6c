//! Validated conversion between LLFSM editor models and the machine domain.
//!
//! The editor stores machines and arrangements as loosely typed text: free-form
//! declaration blocks, symbolic state names and string-keyed signal mappings
//! ([`llfsm_model`]). This crate turns them into an index-addressed domain where
//! every name is unique, every reference resolves and every declaration has
//! parsed, or rejects them with a [`ConversionError`]. Conversions are pure and
//! never return partial results.
//!
//! The reverse direction ([`project`]) rebuilds the editor model from a domain
//! value plus externally kept layouts; converting that model again yields an
//! equal domain value.
//!
//! ## Modules
//!
//! - [`split`]: splitting text blocks and parsing them all-or-nothing
//! - [`namespace`]: uniqueness of names across roles
//! - [`resolve`]: state names to indices
//! - [`domain`]: `Machine`, `State`, `Transition`, `Arrangement`
//! - [`machine`]: model to domain conversion for one machine
//! - [`arrangement`]: model to domain conversion for an arrangement
//! - [`project`]: domain to model projection
//! - [`loader`]: reading machines out of `.machine` directories

pub mod arrangement;
pub mod domain;
pub mod error;
pub mod loader;
pub mod machine;
pub mod namespace;
pub mod project;
pub mod resolve;
pub mod split;

pub use arrangement::{convert_arrangement, convert_arrangement_with};
pub use domain::{
    Arrangement, InstanceMap, Machine, MachineInstance, MachineMapping, State, Transition,
    VariableMapping,
};
pub use error::{ConversionError, ErrorCategory, Result};
pub use loader::{load_machine, FsSource, MachineSource, MACHINE_SUFFIX, MODEL_FILE};
pub use machine::convert_machine;
pub use namespace::{NameRole, Namespace};
pub use project::{project_arrangement, project_machine};
