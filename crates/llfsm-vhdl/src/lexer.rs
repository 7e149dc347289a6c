//! Tokenizer and token cursor shared by every parser in this crate.
//!
//! Handles identifiers, decimal integers, character literals (`'1'`), string
//! literals (`"0101"`), the attribute tick and VHDL's one- and two-character
//! delimiters. `--` comments run to the end of the line and are dropped.

use std::fmt;

use crate::error::{ParseError, Result};
use crate::name::{is_reserved, VariableName};

/// A VHDL delimiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Symbol {
    LParen,
    RParen,
    Comma,
    Semicolon,
    Colon,
    Dot,
    Tick,
    /// `:=`
    Assign,
    /// `<=`
    LessEq,
    /// `>=`
    GreaterEq,
    /// `/=`
    NotEq,
    /// `=>`
    Arrow,
    Eq,
    Less,
    Greater,
    Plus,
    Minus,
    Star,
    Slash,
    Ampersand,
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Symbol::LParen => "(",
            Symbol::RParen => ")",
            Symbol::Comma => ",",
            Symbol::Semicolon => ";",
            Symbol::Colon => ":",
            Symbol::Dot => ".",
            Symbol::Tick => "'",
            Symbol::Assign => ":=",
            Symbol::LessEq => "<=",
            Symbol::GreaterEq => ">=",
            Symbol::NotEq => "/=",
            Symbol::Arrow => "=>",
            Symbol::Eq => "=",
            Symbol::Less => "<",
            Symbol::Greater => ">",
            Symbol::Plus => "+",
            Symbol::Minus => "-",
            Symbol::Star => "*",
            Symbol::Slash => "/",
            Symbol::Ampersand => "&",
        };
        f.write_str(text)
    }
}

/// A lexical token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    Ident(String),
    Integer(i64),
    Char(char),
    Str(String),
    Symbol(Symbol),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Ident(name) => write!(f, "'{name}'"),
            Token::Integer(value) => write!(f, "{value}"),
            Token::Char(c) => write!(f, "'{c}'"),
            Token::Str(s) => write!(f, "\"{s}\""),
            Token::Symbol(s) => write!(f, "'{s}'"),
        }
    }
}

/// Split `input` into tokens.
pub(crate) fn tokenize(input: &str) -> Result<Vec<Token>> {
    let chars: Vec<(usize, char)> = input.char_indices().collect();
    let collect =
        |from: usize, to: usize| -> String { chars[from..to].iter().map(|(_, c)| c).collect() };
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let (offset, ch) = chars[i];
        let next = chars.get(i + 1).map(|(_, c)| *c);

        if ch.is_whitespace() {
            i += 1;
            continue;
        }

        // Comment to end of line
        if ch == '-' && next == Some('-') {
            while i < chars.len() && chars[i].1 != '\n' {
                i += 1;
            }
            continue;
        }

        if ch.is_ascii_alphabetic() {
            let start = i;
            while i < chars.len() && (chars[i].1.is_ascii_alphanumeric() || chars[i].1 == '_') {
                i += 1;
            }
            tokens.push(Token::Ident(collect(start, i)));
            continue;
        }

        if ch.is_ascii_digit() {
            let start = i;
            while i < chars.len() && chars[i].1.is_ascii_digit() {
                i += 1;
            }
            let text = collect(start, i);
            let value = text
                .parse::<i64>()
                .map_err(|_| ParseError::IntegerOverflow { text: text.clone() })?;
            tokens.push(Token::Integer(value));
            continue;
        }

        if ch == '\'' {
            // A character literal is exactly `'c'`; anything else is an attribute tick.
            if let (Some(&(_, c)), Some(&(_, '\''))) = (chars.get(i + 1), chars.get(i + 2)) {
                tokens.push(Token::Char(c));
                i += 3;
            } else {
                tokens.push(Token::Symbol(Symbol::Tick));
                i += 1;
            }
            continue;
        }

        if ch == '"' {
            let start = i + 1;
            let mut end = start;
            while end < chars.len() && chars[end].1 != '"' {
                end += 1;
            }
            if end >= chars.len() {
                return Err(ParseError::UnterminatedString { offset });
            }
            tokens.push(Token::Str(collect(start, end)));
            i = end + 1;
            continue;
        }

        let (symbol, width) = match (ch, next) {
            (':', Some('=')) => (Symbol::Assign, 2),
            ('<', Some('=')) => (Symbol::LessEq, 2),
            ('>', Some('=')) => (Symbol::GreaterEq, 2),
            ('/', Some('=')) => (Symbol::NotEq, 2),
            ('=', Some('>')) => (Symbol::Arrow, 2),
            ('(', _) => (Symbol::LParen, 1),
            (')', _) => (Symbol::RParen, 1),
            (',', _) => (Symbol::Comma, 1),
            (';', _) => (Symbol::Semicolon, 1),
            (':', _) => (Symbol::Colon, 1),
            ('.', _) => (Symbol::Dot, 1),
            ('=', _) => (Symbol::Eq, 1),
            ('<', _) => (Symbol::Less, 1),
            ('>', _) => (Symbol::Greater, 1),
            ('+', _) => (Symbol::Plus, 1),
            ('-', _) => (Symbol::Minus, 1),
            ('*', _) => (Symbol::Star, 1),
            ('/', _) => (Symbol::Slash, 1),
            ('&', _) => (Symbol::Ampersand, 1),
            _ => return Err(ParseError::UnexpectedChar { ch, offset }),
        };
        tokens.push(Token::Symbol(symbol));
        i += width;
    }

    Ok(tokens)
}

/// A forward-only cursor over a token list.
pub(crate) struct Cursor {
    tokens: Vec<Token>,
    pos: usize,
}

impl Cursor {
    /// Tokenize `input`. Fails on lexical errors or if there are no tokens at all.
    pub fn new(input: &str) -> Result<Self> {
        let tokens = tokenize(input)?;
        if tokens.is_empty() {
            return Err(ParseError::Empty);
        }
        Ok(Self { tokens, pos: 0 })
    }

    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    pub fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    pub fn is_done(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Describe the current token for error messages.
    pub fn found(&self) -> String {
        self.peek()
            .map(|t| t.to_string())
            .unwrap_or_else(|| "end of input".to_string())
    }

    pub fn error<T>(&self, expected: &str) -> Result<T> {
        Err(ParseError::Expected {
            expected: expected.to_string(),
            found: self.found(),
        })
    }

    pub fn peek_symbol(&self, symbol: Symbol) -> bool {
        matches!(self.peek(), Some(Token::Symbol(s)) if *s == symbol)
    }

    pub fn eat_symbol(&mut self, symbol: Symbol) -> bool {
        if self.peek_symbol(symbol) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    pub fn expect_symbol(&mut self, symbol: Symbol) -> Result<()> {
        if self.eat_symbol(symbol) {
            Ok(())
        } else {
            self.error(&format!("'{symbol}'"))
        }
    }

    pub fn peek_keyword(&self, keyword: &str) -> bool {
        matches!(self.peek(), Some(Token::Ident(word)) if word.eq_ignore_ascii_case(keyword))
    }

    pub fn eat_keyword(&mut self, keyword: &str) -> bool {
        if self.peek_keyword(keyword) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    pub fn expect_keyword(&mut self, keyword: &str) -> Result<()> {
        if self.eat_keyword(keyword) {
            Ok(())
        } else {
            self.error(&format!("'{keyword}'"))
        }
    }

    /// Whether the current token is an identifier that is not a reserved word.
    pub fn peek_name(&self) -> bool {
        matches!(self.peek(), Some(Token::Ident(word)) if !is_reserved(word))
    }

    pub fn expect_name(&mut self) -> Result<VariableName> {
        match self.peek() {
            Some(Token::Ident(word)) => {
                let name = VariableName::new(word)?;
                self.pos += 1;
                Ok(name)
            }
            _ => self.error("identifier"),
        }
    }

    /// Optional leading `-` followed by an integer.
    pub fn expect_integer(&mut self) -> Result<i64> {
        let negative = self.eat_symbol(Symbol::Minus);
        match self.peek() {
            Some(Token::Integer(value)) => {
                let value = *value;
                self.pos += 1;
                Ok(if negative { -value } else { value })
            }
            _ => self.error("integer"),
        }
    }

    pub fn expect_end(&self) -> Result<()> {
        if self.is_done() {
            Ok(())
        } else {
            self.error("end of input")
        }
    }
}

/// Run `parse` over all of `input`, rejecting trailing tokens.
pub(crate) fn parse_complete<T>(
    input: &str,
    parse: impl FnOnce(&mut Cursor) -> Result<T>,
) -> Result<T> {
    let mut cursor = Cursor::new(input)?;
    let value = parse(&mut cursor)?;
    cursor.expect_end()?;
    Ok(value)
}
