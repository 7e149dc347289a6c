//! The validated, index-addressed domain.
//!
//! Values here are only ever produced by a successful conversion (or a verified
//! decode) and are immutable afterwards: fields are private and exposed through
//! read-only accessors.

pub mod arrangement;
pub mod machine;

pub use arrangement::{Arrangement, InstanceMap, MachineInstance, MachineMapping, VariableMapping};
pub use machine::{Machine, State, Transition};
