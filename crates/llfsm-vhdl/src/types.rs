//! Signal types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ParseError, Result};
use crate::lexer::{parse_complete, Cursor, Symbol, Token};
use crate::name::VariableName;

/// Direction of a discrete range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// `downto`
    Downto,
    /// `to`
    To,
}

impl Direction {
    pub(crate) fn parse(cursor: &mut Cursor) -> Result<Self> {
        if cursor.eat_keyword("downto") {
            Ok(Direction::Downto)
        } else if cursor.eat_keyword("to") {
            Ok(Direction::To)
        } else {
            cursor.error("'downto' or 'to'")
        }
    }

    pub(crate) fn peek(cursor: &Cursor) -> bool {
        cursor.peek_keyword("downto") || cursor.peek_keyword("to")
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Downto => f.write_str("downto"),
            Direction::To => f.write_str("to"),
        }
    }
}

/// The array types that take an index constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VectorKind {
    StdLogicVector,
    StdULogicVector,
    BitVector,
    Signed,
    Unsigned,
}

impl VectorKind {
    fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "std_logic_vector" => Some(VectorKind::StdLogicVector),
            "std_ulogic_vector" => Some(VectorKind::StdULogicVector),
            "bit_vector" => Some(VectorKind::BitVector),
            "signed" => Some(VectorKind::Signed),
            "unsigned" => Some(VectorKind::Unsigned),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            VectorKind::StdLogicVector => "std_logic_vector",
            VectorKind::StdULogicVector => "std_ulogic_vector",
            VectorKind::BitVector => "bit_vector",
            VectorKind::Signed => "signed",
            VectorKind::Unsigned => "unsigned",
        }
    }
}

/// The type of a signal declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SignalType {
    StdLogic,
    StdULogic,
    Bit,
    Boolean,
    Integer,
    Natural,
    Positive,
    Real,
    /// `integer range low to high`
    Ranged { low: i64, high: i64 },
    /// `std_logic_vector(7 downto 0)` and friends.
    Vector {
        kind: VectorKind,
        left: i64,
        direction: Direction,
        right: i64,
    },
    /// A type declared elsewhere, referenced by name.
    Named(VariableName),
}

impl SignalType {
    pub(crate) fn parse(cursor: &mut Cursor) -> Result<Self> {
        let word = match cursor.peek() {
            Some(Token::Ident(word)) => word.to_ascii_lowercase(),
            _ => return cursor.error("type"),
        };

        if let Some(kind) = VectorKind::from_name(&word) {
            cursor.advance();
            cursor.expect_symbol(Symbol::LParen)?;
            let left = cursor.expect_integer()?;
            let direction = Direction::parse(cursor)?;
            let right = cursor.expect_integer()?;
            cursor.expect_symbol(Symbol::RParen)?;
            return Ok(SignalType::Vector {
                kind,
                left,
                direction,
                right,
            });
        }

        let simple = match word.as_str() {
            "std_logic" => SignalType::StdLogic,
            "std_ulogic" => SignalType::StdULogic,
            "bit" => SignalType::Bit,
            "boolean" => SignalType::Boolean,
            "natural" => SignalType::Natural,
            "positive" => SignalType::Positive,
            "real" => SignalType::Real,
            "integer" => {
                cursor.advance();
                if cursor.eat_keyword("range") {
                    let low = cursor.expect_integer()?;
                    cursor.expect_keyword("to")?;
                    let high = cursor.expect_integer()?;
                    return Ok(SignalType::Ranged { low, high });
                }
                return Ok(SignalType::Integer);
            }
            _ => return Ok(SignalType::Named(cursor.expect_name()?)),
        };
        cursor.advance();
        Ok(simple)
    }
}

impl FromStr for SignalType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self> {
        parse_complete(s, SignalType::parse)
    }
}

impl fmt::Display for SignalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalType::StdLogic => f.write_str("std_logic"),
            SignalType::StdULogic => f.write_str("std_ulogic"),
            SignalType::Bit => f.write_str("bit"),
            SignalType::Boolean => f.write_str("boolean"),
            SignalType::Integer => f.write_str("integer"),
            SignalType::Natural => f.write_str("natural"),
            SignalType::Positive => f.write_str("positive"),
            SignalType::Real => f.write_str("real"),
            SignalType::Ranged { low, high } => write!(f, "integer range {low} to {high}"),
            SignalType::Vector {
                kind,
                left,
                direction,
                right,
            } => write!(f, "{}({left} {direction} {right})", kind.name()),
            SignalType::Named(name) => write!(f, "{name}"),
        }
    }
}

crate::text_serde!(SignalType);
