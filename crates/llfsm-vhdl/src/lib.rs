//! The VHDL subset written inside LLFSM editor models.
//!
//! Every declaration block, condition and action in a machine model is a small
//! piece of VHDL. This crate parses those pieces into typed values and prints
//! them back. Each type implements [`std::str::FromStr`] and
//! [`std::fmt::Display`], and printed text always re-parses to an equal value.
//!
//! ## Modules
//!
//! - [`name`]: `VariableName`, case-insensitive identifiers
//! - [`types`]: `SignalType`
//! - [`expression`]: conditions and assigned values
//! - [`statement`]: action code (`SynchronousBlock`)
//! - [`include`]: `library`/`use` clauses
//! - [`signal`]: local and port signal declarations
//! - [`clock`]: clocks and frequencies
//!
//! ## Example
//!
//! ```
//! use llfsm_vhdl::{Expression, PortSignal};
//!
//! let port: PortSignal = "ping:   out std_logic;".parse().unwrap();
//! assert_eq!(port.to_string(), "ping: out std_logic;");
//!
//! let guard: Expression = "pong = '1'".parse().unwrap();
//! assert_eq!(guard.to_string(), "pong = '1'");
//! ```

/// Serialize a type as its printed text and deserialize by parsing.
///
/// The type must also carry `#[serde(try_from = "String", into = "String")]`.
macro_rules! text_serde {
    ($ty:ty) => {
        impl TryFrom<String> for $ty {
            type Error = $crate::error::ParseError;

            fn try_from(value: String) -> ::std::result::Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl From<$ty> for String {
            fn from(value: $ty) -> Self {
                value.to_string()
            }
        }
    };
}

pub(crate) use text_serde;

pub mod clock;
pub mod error;
pub mod expression;
pub mod include;
mod lexer;
pub mod name;
pub mod signal;
pub mod statement;
pub mod types;

pub use clock::{Clock, Frequency, FrequencyUnit};
pub use error::ParseError;
pub use expression::{BinaryOperator, Expression, Literal, LogicValue, UnaryOperator};
pub use include::{Include, UseComponent};
pub use name::VariableName;
pub use signal::{LocalSignal, Mode, PortSignal};
pub use statement::{Branch, IfBlock, Statement, SynchronousBlock};
pub use types::{Direction, SignalType, VectorKind};
