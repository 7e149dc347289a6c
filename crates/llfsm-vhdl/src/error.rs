//! Parse error types.

/// Errors that can occur while parsing VHDL text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Nothing but whitespace or comments.
    #[error("empty input")]
    Empty,

    /// A character that cannot start any token.
    #[error("unexpected character '{ch}' at offset {offset}")]
    UnexpectedChar { ch: char, offset: usize },

    /// A `"` literal without its closing quote.
    #[error("unterminated string literal at offset {offset}")]
    UnterminatedString { offset: usize },

    /// An integer literal that does not fit in 64 bits.
    #[error("integer literal '{text}' out of range")]
    IntegerOverflow { text: String },

    /// The parser expected one construct and found another.
    #[error("expected {expected}, found {found}")]
    Expected { expected: String, found: String },

    /// Text that is not a legal VHDL basic identifier.
    #[error("invalid identifier '{0}'")]
    InvalidIdentifier(String),

    /// A character literal outside the `std_logic` value set.
    #[error("invalid logic value '{0}'")]
    InvalidLogicValue(char),

    /// A clock frequency that is not `<integer> <unit>`.
    #[error("invalid frequency '{0}'")]
    InvalidFrequency(String),
}

/// Result type for parse operations.
pub type Result<T> = std::result::Result<T, ParseError>;
