//! Clocks and their frequencies.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ParseError, Result};
use crate::name::VariableName;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FrequencyUnit {
    Hz,
    KHz,
    MHz,
    GHz,
    THz,
}

impl FrequencyUnit {
    fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "Hz" => Some(FrequencyUnit::Hz),
            "kHz" => Some(FrequencyUnit::KHz),
            "MHz" => Some(FrequencyUnit::MHz),
            "GHz" => Some(FrequencyUnit::GHz),
            "THz" => Some(FrequencyUnit::THz),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            FrequencyUnit::Hz => "Hz",
            FrequencyUnit::KHz => "kHz",
            FrequencyUnit::MHz => "MHz",
            FrequencyUnit::GHz => "GHz",
            FrequencyUnit::THz => "THz",
        }
    }
}

/// A non-zero frequency, written `"125 MHz"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Frequency {
    value: u64,
    unit: FrequencyUnit,
}

impl Frequency {
    pub fn new(value: u64, unit: FrequencyUnit) -> Option<Self> {
        (value > 0).then_some(Self { value, unit })
    }

    pub fn value(&self) -> u64 {
        self.value
    }

    pub fn unit(&self) -> FrequencyUnit {
        self.unit
    }
}

impl FromStr for Frequency {
    type Err = ParseError;

    /// Accepts `"125 MHz"` and `"125MHz"`.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || ParseError::InvalidFrequency(s.to_string());
        let text = s.trim();
        let split = text
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(invalid)?;
        let (digits, unit) = text.split_at(split);
        let value = digits.parse::<u64>().map_err(|_| invalid())?;
        let unit = FrequencyUnit::from_symbol(unit.trim()).ok_or_else(invalid)?;
        Frequency::new(value, unit).ok_or_else(invalid)
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.unit.symbol())
    }
}

crate::text_serde!(Frequency);

/// A named clock.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Clock {
    pub name: VariableName,
    pub frequency: Frequency,
}

impl Clock {
    pub fn new(name: VariableName, frequency: Frequency) -> Self {
        Self { name, frequency }
    }

    /// Parse the two text fields the editor stores for a clock.
    pub fn parse(name: &str, frequency: &str) -> Result<Self> {
        Ok(Self {
            name: name.parse()?,
            frequency: frequency.parse()?,
        })
    }
}

impl fmt::Display for Clock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}", self.name, self.frequency)
    }
}
