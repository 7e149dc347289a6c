//! Signal declarations: machine and state locals, and ports.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ParseError, Result};
use crate::expression::Expression;
use crate::lexer::{parse_complete, Cursor, Symbol};
use crate::name::VariableName;
use crate::types::SignalType;

fn parse_default(cursor: &mut Cursor) -> Result<Option<Expression>> {
    if cursor.eat_symbol(Symbol::Assign) {
        Ok(Some(Expression::parse(cursor)?))
    } else {
        Ok(None)
    }
}

fn write_default(f: &mut fmt::Formatter<'_>, value: &Option<Expression>) -> fmt::Result {
    match value {
        Some(value) => write!(f, " := {value};"),
        None => f.write_str(";"),
    }
}

/// `signal name: type [:= default];`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LocalSignal {
    pub name: VariableName,
    pub signal_type: SignalType,
    pub default_value: Option<Expression>,
}

impl LocalSignal {
    fn parse(cursor: &mut Cursor) -> Result<Self> {
        cursor.expect_keyword("signal")?;
        let name = cursor.expect_name()?;
        cursor.expect_symbol(Symbol::Colon)?;
        let signal_type = SignalType::parse(cursor)?;
        let default_value = parse_default(cursor)?;
        cursor.expect_symbol(Symbol::Semicolon)?;
        Ok(Self {
            name,
            signal_type,
            default_value,
        })
    }
}

impl FromStr for LocalSignal {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self> {
        parse_complete(s, LocalSignal::parse)
    }
}

impl fmt::Display for LocalSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "signal {}: {}", self.name, self.signal_type)?;
        write_default(f, &self.default_value)
    }
}

crate::text_serde!(LocalSignal);

/// Port direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    In,
    Out,
    InOut,
    Buffer,
}

impl Mode {
    fn parse(cursor: &mut Cursor) -> Result<Self> {
        for (keyword, mode) in [
            ("in", Mode::In),
            ("out", Mode::Out),
            ("inout", Mode::InOut),
            ("buffer", Mode::Buffer),
        ] {
            if cursor.eat_keyword(keyword) {
                return Ok(mode);
            }
        }
        cursor.error("port mode")
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::In => f.write_str("in"),
            Mode::Out => f.write_str("out"),
            Mode::InOut => f.write_str("inout"),
            Mode::Buffer => f.write_str("buffer"),
        }
    }
}

/// `name: mode type [:= default];`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PortSignal {
    pub name: VariableName,
    pub mode: Mode,
    pub signal_type: SignalType,
    pub default_value: Option<Expression>,
}

impl PortSignal {
    fn parse(cursor: &mut Cursor) -> Result<Self> {
        let name = cursor.expect_name()?;
        cursor.expect_symbol(Symbol::Colon)?;
        let mode = Mode::parse(cursor)?;
        let signal_type = SignalType::parse(cursor)?;
        let default_value = parse_default(cursor)?;
        cursor.expect_symbol(Symbol::Semicolon)?;
        Ok(Self {
            name,
            mode,
            signal_type,
            default_value,
        })
    }
}

impl FromStr for PortSignal {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self> {
        parse_complete(s, PortSignal::parse)
    }
}

impl fmt::Display for PortSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} {}", self.name, self.mode, self.signal_type)?;
        write_default(f, &self.default_value)
    }
}

crate::text_serde!(PortSignal);
