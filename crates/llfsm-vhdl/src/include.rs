//! `library` and `use` clauses.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ParseError, Result};
use crate::lexer::{parse_complete, Cursor, Symbol};
use crate::name::VariableName;

/// One dotted component of a `use` clause.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UseComponent {
    Name(VariableName),
    /// The trailing `all`.
    All,
}

impl fmt::Display for UseComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UseComponent::Name(name) => write!(f, "{name}"),
            UseComponent::All => f.write_str("all"),
        }
    }
}

/// A context item at the top of a generated file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Include {
    /// `library IEEE;`
    Library(VariableName),
    /// `use IEEE.std_logic_1164.all;` - at least two components, `all` only last.
    Use(Vec<UseComponent>),
}

impl Include {
    fn parse(cursor: &mut Cursor) -> Result<Self> {
        if cursor.eat_keyword("library") {
            let name = cursor.expect_name()?;
            cursor.expect_symbol(Symbol::Semicolon)?;
            return Ok(Include::Library(name));
        }

        cursor.expect_keyword("use")?;
        let mut components = vec![UseComponent::Name(cursor.expect_name()?)];
        while cursor.eat_symbol(Symbol::Dot) {
            if cursor.eat_keyword("all") {
                components.push(UseComponent::All);
                break;
            }
            components.push(UseComponent::Name(cursor.expect_name()?));
        }
        if components.len() < 2 {
            return cursor.error("'.'");
        }
        cursor.expect_symbol(Symbol::Semicolon)?;
        Ok(Include::Use(components))
    }
}

impl FromStr for Include {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self> {
        parse_complete(s, Include::parse)
    }
}

impl fmt::Display for Include {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Include::Library(name) => write!(f, "library {name};"),
            Include::Use(components) => {
                f.write_str("use ")?;
                for (i, component) in components.iter().enumerate() {
                    if i > 0 {
                        f.write_str(".")?;
                    }
                    write!(f, "{component}")?;
                }
                f.write_str(";")
            }
        }
    }
}

crate::text_serde!(Include);
