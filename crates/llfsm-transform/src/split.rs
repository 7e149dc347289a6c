//! Splitting text blocks into items and parsing them all-or-nothing.

use std::str::FromStr;

use llfsm_vhdl::{ParseError, VariableName};

/// The first item of a block that failed to parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemError {
    pub item: String,
    pub cause: ParseError,
}

/// Split a `;`-terminated block into trimmed, non-empty statements, each
/// ending in `;` again.
///
/// ```
/// use llfsm_transform::split::split_statements;
///
/// let items = split_statements("ping: out std_logic;\n pong: in std_logic;\n");
/// assert_eq!(items, vec!["ping: out std_logic;", "pong: in std_logic;"]);
/// ```
pub fn split_statements(block: &str) -> Vec<String> {
    block
        .split(';')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| format!("{item};"))
        .collect()
}

/// Split a newline-separated list into trimmed, non-empty lines.
pub fn split_lines(block: &str) -> Vec<&str> {
    block
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Parse every item, failing with the first item that does not parse.
///
/// The result always holds exactly one value per input item.
pub fn parse_each<T, I, S, F>(items: I, parse: F) -> Result<Vec<T>, ItemError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
    F: Fn(&str) -> Result<T, ParseError>,
{
    items
        .into_iter()
        .map(|item| {
            let item = item.as_ref();
            parse(item).map_err(|cause| ItemError {
                item: item.to_string(),
                cause,
            })
        })
        .collect()
}

/// Split a `;`-terminated block and parse each statement as `T`.
pub fn parse_block<T>(block: &str) -> Result<Vec<T>, ItemError>
where
    T: FromStr<Err = ParseError>,
{
    parse_each(split_statements(block), str::parse::<T>)
}

/// Parse a newline-separated list of identifiers.
pub fn parse_names(block: &str) -> Result<Vec<VariableName>, ItemError> {
    parse_each(split_lines(block), VariableName::new)
}
