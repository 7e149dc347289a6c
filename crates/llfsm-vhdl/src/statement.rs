//! Sequential statements: the code attached to a state's actions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ParseError, Result};
use crate::expression::Expression;
use crate::lexer::{parse_complete, Cursor, Symbol};

const INDENT: &str = "    ";

/// A single sequential statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Statement {
    /// `null;`
    Null,
    /// `target <= value;`
    SignalAssignment { target: Expression, value: Expression },
    /// `target := value;`
    VariableAssignment { target: Expression, value: Expression },
}

impl Statement {
    fn parse(cursor: &mut Cursor) -> Result<Self> {
        if cursor.eat_keyword("null") {
            cursor.expect_symbol(Symbol::Semicolon)?;
            return Ok(Statement::Null);
        }
        if !cursor.peek_name() {
            return cursor.error("statement");
        }
        let target = Expression::parse_name(cursor)?;
        let signal = if cursor.eat_symbol(Symbol::LessEq) {
            true
        } else if cursor.eat_symbol(Symbol::Assign) {
            false
        } else {
            return cursor.error("'<=' or ':='");
        };
        let value = Expression::parse(cursor)?;
        cursor.expect_symbol(Symbol::Semicolon)?;
        Ok(if signal {
            Statement::SignalAssignment { target, value }
        } else {
            Statement::VariableAssignment { target, value }
        })
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Null => f.write_str("null;"),
            Statement::SignalAssignment { target, value } => write!(f, "{target} <= {value};"),
            Statement::VariableAssignment { target, value } => write!(f, "{target} := {value};"),
        }
    }
}

/// One `if`/`elsif` arm.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Branch {
    pub condition: Expression,
    pub body: Vec<SynchronousBlock>,
}

/// `if ... then ... [elsif ... then ...] [else ...] end if;`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IfBlock {
    /// The `if` arm followed by any `elsif` arms. Never empty.
    pub branches: Vec<Branch>,
    pub otherwise: Option<Vec<SynchronousBlock>>,
}

impl IfBlock {
    fn parse(cursor: &mut Cursor) -> Result<Self> {
        cursor.expect_keyword("if")?;
        let mut branches = vec![Self::parse_branch(cursor)?];
        while cursor.eat_keyword("elsif") {
            branches.push(Self::parse_branch(cursor)?);
        }
        let otherwise = if cursor.eat_keyword("else") {
            Some(SynchronousBlock::parse_items(cursor)?)
        } else {
            None
        };
        cursor.expect_keyword("end")?;
        cursor.expect_keyword("if")?;
        cursor.expect_symbol(Symbol::Semicolon)?;
        Ok(Self {
            branches,
            otherwise,
        })
    }

    fn parse_branch(cursor: &mut Cursor) -> Result<Branch> {
        let condition = Expression::parse(cursor)?;
        cursor.expect_keyword("then")?;
        let body = SynchronousBlock::parse_items(cursor)?;
        Ok(Branch { condition, body })
    }
}

fn write_body(f: &mut fmt::Formatter<'_>, body: &[SynchronousBlock]) -> fmt::Result {
    for item in body {
        for line in item.to_string().lines() {
            writeln!(f, "{INDENT}{line}")?;
        }
    }
    Ok(())
}

impl fmt::Display for IfBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, branch) in self.branches.iter().enumerate() {
            let keyword = if i == 0 { "if" } else { "elsif" };
            writeln!(f, "{keyword} {} then", branch.condition)?;
            write_body(f, &branch.body)?;
        }
        if let Some(body) = &self.otherwise {
            writeln!(f, "else")?;
            write_body(f, body)?;
        }
        f.write_str("end if;")
    }
}

/// The parsed code of one action.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SynchronousBlock {
    Statement(Statement),
    IfBlock(IfBlock),
    /// Two or more items in sequence.
    Blocks(Vec<SynchronousBlock>),
}

impl SynchronousBlock {
    /// Items up to the end of input or a closing `elsif`/`else`/`end`.
    fn parse_items(cursor: &mut Cursor) -> Result<Vec<Self>> {
        let mut items = Vec::new();
        while !cursor.is_done()
            && !cursor.peek_keyword("elsif")
            && !cursor.peek_keyword("else")
            && !cursor.peek_keyword("end")
        {
            let item = if cursor.peek_keyword("if") {
                SynchronousBlock::IfBlock(IfBlock::parse(cursor)?)
            } else {
                SynchronousBlock::Statement(Statement::parse(cursor)?)
            };
            items.push(item);
        }
        Ok(items)
    }

    fn parse(cursor: &mut Cursor) -> Result<Self> {
        let mut items = Self::parse_items(cursor)?;
        match items.len() {
            0 => cursor.error("statement"),
            1 => Ok(items.remove(0)),
            _ => Ok(SynchronousBlock::Blocks(items)),
        }
    }
}

impl FromStr for SynchronousBlock {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self> {
        parse_complete(s, SynchronousBlock::parse)
    }
}

impl fmt::Display for SynchronousBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SynchronousBlock::Statement(statement) => write!(f, "{statement}"),
            SynchronousBlock::IfBlock(block) => write!(f, "{block}"),
            SynchronousBlock::Blocks(blocks) => {
                for (i, block) in blocks.iter().enumerate() {
                    if i > 0 {
                        f.write_str("\n")?;
                    }
                    write!(f, "{block}")?;
                }
                Ok(())
            }
        }
    }
}

crate::text_serde!(SynchronousBlock);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_assignment() {
        let block: SynchronousBlock = "ping <= '1';".parse().unwrap();
        assert!(matches!(
            block,
            SynchronousBlock::Statement(Statement::SignalAssignment { .. })
        ));
        assert_eq!(block.to_string(), "ping <= '1';");
    }

    #[test]
    fn sequence_becomes_blocks() {
        let block: SynchronousBlock = "x := 1;\ny <= x;\nnull;".parse().unwrap();
        let SynchronousBlock::Blocks(items) = &block else {
            panic!("expected a sequence");
        };
        assert_eq!(items.len(), 3);
        assert_eq!(block.to_string(), "x := 1;\ny <= x;\nnull;");
    }

    #[test]
    fn if_block_formatting() {
        let code = "if a = '1' then\n    x <= '0';\nelsif b then\n    null;\nelse\n    if c then\n        y <= '1';\n    end if;\nend if;";
        let block: SynchronousBlock = code.parse().unwrap();
        assert!(matches!(block, SynchronousBlock::IfBlock(ref b) if b.branches.len() == 2));
        assert_eq!(block.to_string(), code);
    }

    #[test]
    fn compact_if_reformats_and_reparses() {
        let block: SynchronousBlock = "if a then x <= '1'; end if; y <= '0';".parse().unwrap();
        let printed = block.to_string();
        assert_eq!(printed, "if a then\n    x <= '1';\nend if;\ny <= '0';");
        assert_eq!(printed.parse::<SynchronousBlock>().unwrap(), block);
    }

    #[test]
    fn indexed_target() {
        let block: SynchronousBlock = "counter(0) <= '1';".parse().unwrap();
        assert_eq!(block.to_string(), "counter(0) <= '1';");
    }

    #[test]
    fn invalid_code() {
        for code in [
            "invalid code",
            "x <= '1'",
            "if a then x <= '1';",
            "end if;",
            "x = 1;",
            "",
        ] {
            assert!(code.parse::<SynchronousBlock>().is_err(), "{code:?} should fail");
        }
    }
}
