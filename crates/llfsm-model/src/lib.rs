//! Flat, editor-facing model of Logic-Labelled Finite State Machines.
//!
//! These types mirror the JSON written by the graphical editor one-to-one. Every
//! field is loosely typed text: declaration blocks, symbolic state names and
//! string-keyed signal mappings are validated later by `llfsm-transform`.
//!
//! ## Modules
//!
//! - [`layout`]: Opaque positions, sizes and bezier curves carried for the editor
//! - [`machine`]: `MachineModel`, `StateModel`, `TransitionModel` and friends
//! - [`arrangement`]: `ArrangementModel`, `MachineReference`, `VariableMapping`
//! - [`parse`]: JSON loading and serialization

pub mod arrangement;
pub mod error;
pub mod layout;
pub mod machine;
pub mod parse;

pub use arrangement::{ArrangementModel, MachineReference, VariableMapping};
pub use error::ModelError;
pub use layout::{BezierPath, Point2D, StateLayout, TransitionLayout};
pub use machine::{ActionModel, ClockModel, MachineModel, StateModel, TransitionModel};
