//! Expressions: transition conditions, assignment values and default values.
//!
//! Binary operators are parsed by precedence climbing with VHDL's levels:
//! logical < relational < adding < multiplying. Operators on one level associate
//! to the left. Parentheses written in the source are kept as
//! [`Expression::Precedence`] so printing reproduces them exactly.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ParseError, Result};
use crate::lexer::{parse_complete, Cursor, Symbol, Token};
use crate::name::VariableName;
use crate::types::Direction;

/// A `std_logic` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicValue {
    Uninitialized,
    Unknown,
    Low,
    High,
    HighImpedance,
    WeakUnknown,
    WeakLow,
    WeakHigh,
    DontCare,
}

impl LogicValue {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'U' => Some(LogicValue::Uninitialized),
            'X' => Some(LogicValue::Unknown),
            '0' => Some(LogicValue::Low),
            '1' => Some(LogicValue::High),
            'Z' => Some(LogicValue::HighImpedance),
            'W' => Some(LogicValue::WeakUnknown),
            'L' => Some(LogicValue::WeakLow),
            'H' => Some(LogicValue::WeakHigh),
            '-' => Some(LogicValue::DontCare),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            LogicValue::Uninitialized => 'U',
            LogicValue::Unknown => 'X',
            LogicValue::Low => '0',
            LogicValue::High => '1',
            LogicValue::HighImpedance => 'Z',
            LogicValue::WeakUnknown => 'W',
            LogicValue::WeakLow => 'L',
            LogicValue::WeakHigh => 'H',
            LogicValue::DontCare => '-',
        }
    }
}

/// A literal value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Literal {
    Boolean(bool),
    Integer(i64),
    /// `'1'`
    Logic(LogicValue),
    /// `"0101"`
    Bits(Vec<LogicValue>),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Boolean(value) => write!(f, "{value}"),
            Literal::Integer(value) => write!(f, "{value}"),
            Literal::Logic(value) => write!(f, "'{}'", value.as_char()),
            Literal::Bits(bits) => {
                let text: String = bits.iter().map(|b| b.as_char()).collect();
                write!(f, "\"{text}\"")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    Not,
    Negate,
    Abs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    And,
    Or,
    Nand,
    Nor,
    Xor,
    Xnor,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Add,
    Subtract,
    Concatenate,
    Multiply,
    Divide,
    Mod,
    Rem,
}

impl BinaryOperator {
    /// Binding strength; higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOperator::And
            | BinaryOperator::Or
            | BinaryOperator::Nand
            | BinaryOperator::Nor
            | BinaryOperator::Xor
            | BinaryOperator::Xnor => 1,
            BinaryOperator::Equal
            | BinaryOperator::NotEqual
            | BinaryOperator::Less
            | BinaryOperator::LessEqual
            | BinaryOperator::Greater
            | BinaryOperator::GreaterEqual => 2,
            BinaryOperator::Add | BinaryOperator::Subtract | BinaryOperator::Concatenate => 3,
            BinaryOperator::Multiply
            | BinaryOperator::Divide
            | BinaryOperator::Mod
            | BinaryOperator::Rem => 4,
        }
    }

    fn peek(cursor: &Cursor) -> Option<Self> {
        let op = match cursor.peek()? {
            Token::Symbol(Symbol::Eq) => BinaryOperator::Equal,
            Token::Symbol(Symbol::NotEq) => BinaryOperator::NotEqual,
            Token::Symbol(Symbol::Less) => BinaryOperator::Less,
            Token::Symbol(Symbol::LessEq) => BinaryOperator::LessEqual,
            Token::Symbol(Symbol::Greater) => BinaryOperator::Greater,
            Token::Symbol(Symbol::GreaterEq) => BinaryOperator::GreaterEqual,
            Token::Symbol(Symbol::Plus) => BinaryOperator::Add,
            Token::Symbol(Symbol::Minus) => BinaryOperator::Subtract,
            Token::Symbol(Symbol::Ampersand) => BinaryOperator::Concatenate,
            Token::Symbol(Symbol::Star) => BinaryOperator::Multiply,
            Token::Symbol(Symbol::Slash) => BinaryOperator::Divide,
            Token::Ident(word) => match word.to_ascii_lowercase().as_str() {
                "and" => BinaryOperator::And,
                "or" => BinaryOperator::Or,
                "nand" => BinaryOperator::Nand,
                "nor" => BinaryOperator::Nor,
                "xor" => BinaryOperator::Xor,
                "xnor" => BinaryOperator::Xnor,
                "mod" => BinaryOperator::Mod,
                "rem" => BinaryOperator::Rem,
                _ => return None,
            },
            _ => return None,
        };
        Some(op)
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            BinaryOperator::And => "and",
            BinaryOperator::Or => "or",
            BinaryOperator::Nand => "nand",
            BinaryOperator::Nor => "nor",
            BinaryOperator::Xor => "xor",
            BinaryOperator::Xnor => "xnor",
            BinaryOperator::Equal => "=",
            BinaryOperator::NotEqual => "/=",
            BinaryOperator::Less => "<",
            BinaryOperator::LessEqual => "<=",
            BinaryOperator::Greater => ">",
            BinaryOperator::GreaterEqual => ">=",
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Concatenate => "&",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Mod => "mod",
            BinaryOperator::Rem => "rem",
        };
        f.write_str(text)
    }
}

/// A VHDL expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Expression {
    Literal(Literal),
    Reference(VariableName),
    /// `f(a, b)` or `x(3)`
    Indexed {
        name: VariableName,
        arguments: Vec<Expression>,
    },
    /// `x(7 downto 4)`
    Slice {
        name: VariableName,
        left: Box<Expression>,
        direction: Direction,
        right: Box<Expression>,
    },
    /// `clk'event`
    Attribute {
        name: VariableName,
        attribute: VariableName,
    },
    Unary {
        operator: UnaryOperator,
        operand: Box<Expression>,
    },
    Binary {
        operator: BinaryOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    /// An explicitly parenthesised expression.
    Precedence(Box<Expression>),
    /// `(others => e)`
    Others(Box<Expression>),
}

impl Expression {
    pub(crate) fn parse(cursor: &mut Cursor) -> Result<Self> {
        Self::parse_binary(cursor, 1)
    }

    fn parse_binary(cursor: &mut Cursor, min_precedence: u8) -> Result<Self> {
        let mut left = Self::parse_factor(cursor)?;
        while let Some(operator) = BinaryOperator::peek(cursor) {
            let precedence = operator.precedence();
            if precedence < min_precedence {
                break;
            }
            cursor.advance();
            let right = Self::parse_binary(cursor, precedence + 1)?;
            left = Expression::Binary {
                operator,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_factor(cursor: &mut Cursor) -> Result<Self> {
        let operator = if cursor.eat_keyword("not") {
            Some(UnaryOperator::Not)
        } else if cursor.eat_keyword("abs") {
            Some(UnaryOperator::Abs)
        } else if cursor.eat_symbol(Symbol::Minus) {
            Some(UnaryOperator::Negate)
        } else {
            None
        };
        match operator {
            Some(operator) => Ok(Expression::Unary {
                operator,
                operand: Box::new(Self::parse_factor(cursor)?),
            }),
            None => Self::parse_primary(cursor),
        }
    }

    fn parse_primary(cursor: &mut Cursor) -> Result<Self> {
        match cursor.peek().cloned() {
            Some(Token::Symbol(Symbol::LParen)) => {
                cursor.advance();
                if cursor.eat_keyword("others") {
                    cursor.expect_symbol(Symbol::Arrow)?;
                    let value = Self::parse(cursor)?;
                    cursor.expect_symbol(Symbol::RParen)?;
                    return Ok(Expression::Others(Box::new(value)));
                }
                let inner = Self::parse(cursor)?;
                cursor.expect_symbol(Symbol::RParen)?;
                Ok(Expression::Precedence(Box::new(inner)))
            }
            Some(Token::Integer(value)) => {
                cursor.advance();
                Ok(Expression::Literal(Literal::Integer(value)))
            }
            Some(Token::Char(c)) => {
                let value = LogicValue::from_char(c).ok_or(ParseError::InvalidLogicValue(c))?;
                cursor.advance();
                Ok(Expression::Literal(Literal::Logic(value)))
            }
            Some(Token::Str(text)) => {
                let bits = text
                    .chars()
                    .map(|c| LogicValue::from_char(c).ok_or(ParseError::InvalidLogicValue(c)))
                    .collect::<Result<Vec<_>>>()?;
                cursor.advance();
                Ok(Expression::Literal(Literal::Bits(bits)))
            }
            Some(Token::Ident(word)) if word.eq_ignore_ascii_case("true") => {
                cursor.advance();
                Ok(Expression::Literal(Literal::Boolean(true)))
            }
            Some(Token::Ident(word)) if word.eq_ignore_ascii_case("false") => {
                cursor.advance();
                Ok(Expression::Literal(Literal::Boolean(false)))
            }
            Some(Token::Ident(_)) if cursor.peek_name() => Self::parse_name(cursor),
            _ => cursor.error("expression"),
        }
    }

    /// A name with an optional index, slice or attribute suffix.
    pub(crate) fn parse_name(cursor: &mut Cursor) -> Result<Self> {
        let name = cursor.expect_name()?;

        if cursor.eat_symbol(Symbol::Tick) {
            let attribute = cursor.expect_name()?;
            return Ok(Expression::Attribute { name, attribute });
        }

        if !cursor.eat_symbol(Symbol::LParen) {
            return Ok(Expression::Reference(name));
        }

        let first = Self::parse(cursor)?;
        if Direction::peek(cursor) {
            let direction = Direction::parse(cursor)?;
            let right = Self::parse(cursor)?;
            cursor.expect_symbol(Symbol::RParen)?;
            return Ok(Expression::Slice {
                name,
                left: Box::new(first),
                direction,
                right: Box::new(right),
            });
        }

        let mut arguments = vec![first];
        while cursor.eat_symbol(Symbol::Comma) {
            arguments.push(Self::parse(cursor)?);
        }
        cursor.expect_symbol(Symbol::RParen)?;
        Ok(Expression::Indexed { name, arguments })
    }
}

impl FromStr for Expression {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self> {
        parse_complete(s, Expression::parse)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Literal(literal) => write!(f, "{literal}"),
            Expression::Reference(name) => write!(f, "{name}"),
            Expression::Indexed { name, arguments } => {
                write!(f, "{name}(")?;
                for (i, argument) in arguments.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{argument}")?;
                }
                f.write_str(")")
            }
            Expression::Slice {
                name,
                left,
                direction,
                right,
            } => write!(f, "{name}({left} {direction} {right})"),
            Expression::Attribute { name, attribute } => write!(f, "{name}'{attribute}"),
            Expression::Unary { operator, operand } => match operator {
                UnaryOperator::Not => write!(f, "not {operand}"),
                UnaryOperator::Abs => write!(f, "abs {operand}"),
                UnaryOperator::Negate => {
                    let text = operand.to_string();
                    // "--" would start a comment
                    if text.starts_with('-') {
                        write!(f, "- {text}")
                    } else {
                        write!(f, "-{text}")
                    }
                }
            },
            Expression::Binary {
                operator,
                left,
                right,
            } => write!(f, "{left} {operator} {right}"),
            Expression::Precedence(inner) => write!(f, "({inner})"),
            Expression::Others(value) => write!(f, "(others => {value})"),
        }
    }
}

crate::text_serde!(Expression);

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Expression {
        text.parse().unwrap()
    }

    fn reference(name: &str) -> Expression {
        Expression::Reference(VariableName::new(name).unwrap())
    }

    #[test]
    fn boolean_literal() {
        assert_eq!(parse("true"), Expression::Literal(Literal::Boolean(true)));
        assert_eq!(parse("TRUE").to_string(), "true");
    }

    #[test]
    fn relational_condition() {
        let expr = parse("pong = '1'");
        assert_eq!(
            expr,
            Expression::Binary {
                operator: BinaryOperator::Equal,
                left: Box::new(reference("pong")),
                right: Box::new(Expression::Literal(Literal::Logic(LogicValue::High))),
            }
        );
        assert_eq!(expr.to_string(), "pong = '1'");
    }

    #[test]
    fn precedence_climbing() {
        let expr = parse("a = '1' and b + c * d > 2");
        let Expression::Binary { operator, left, right } = expr else {
            panic!("expected binary expression");
        };
        assert_eq!(operator, BinaryOperator::And);
        assert!(matches!(*left, Expression::Binary { operator: BinaryOperator::Equal, .. }));
        let Expression::Binary { operator, left, .. } = *right else {
            panic!("expected relational expression");
        };
        assert_eq!(operator, BinaryOperator::Greater);
        let Expression::Binary { operator, right, .. } = *left else {
            panic!("expected adding expression");
        };
        assert_eq!(operator, BinaryOperator::Add);
        assert!(matches!(*right, Expression::Binary { operator: BinaryOperator::Multiply, .. }));
    }

    #[test]
    fn left_associative() {
        let expr = parse("a - b - c");
        let Expression::Binary { left, right, .. } = expr else {
            panic!("expected binary expression");
        };
        assert!(matches!(*left, Expression::Binary { .. }));
        assert_eq!(*right, reference("c"));
    }

    #[test]
    fn parentheses_are_preserved() {
        let text = "(a or b) and not c";
        let expr = parse(text);
        assert!(matches!(
            expr,
            Expression::Binary { ref left, .. } if matches!(**left, Expression::Precedence(_))
        ));
        assert_eq!(expr.to_string(), text);
    }

    #[test]
    fn names_with_suffixes() {
        assert!(matches!(parse("clk'event"), Expression::Attribute { .. }));
        assert!(matches!(
            parse("rising_edge(clk)"),
            Expression::Indexed { ref arguments, .. } if arguments.len() == 1
        ));
        assert!(matches!(parse("counter(7 downto 4)"), Expression::Slice { .. }));
        assert_eq!(parse("f(a, b)").to_string(), "f(a, b)");
    }

    #[test]
    fn aggregates_and_literals() {
        assert_eq!(parse("(others => '0')").to_string(), "(others => '0')");
        assert_eq!(parse("\"01ZX\"").to_string(), "\"01ZX\"");
        assert_eq!(parse("x & \"01\"").to_string(), "x & \"01\"");
    }

    #[test]
    fn unary_operators() {
        assert_eq!(parse("- -x").to_string(), "- -x");
        assert_eq!(parse("-x + 1").to_string(), "-x + 1");
        assert_eq!(parse("abs y").to_string(), "abs y");
    }

    #[test]
    fn printed_text_reparses_equal() {
        for text in [
            "clk'event and clk = '1'",
            "(a + 1) * 2 >= counter mod 4",
            "x /= (others => 'Z') or not y",
            "f(g(1), h'length) - -3",
        ] {
            let expr = parse(text);
            assert_eq!(parse(&expr.to_string()), expr, "{text}");
        }
    }

    #[test]
    fn invalid_expressions() {
        for text in ["invalid condition", "a +", "(a", "'q'", "\"012\"", "a = = b", ""] {
            assert!(text.parse::<Expression>().is_err(), "{text:?} should fail");
        }
    }
}
