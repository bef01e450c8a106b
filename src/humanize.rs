//! Human-readable byte sizes for config limits and page listings

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const KB: u64 = 1024;
const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("empty size")]
    Empty,

    #[error("invalid number in size: {0}")]
    InvalidNumber(String),

    #[error("unknown size unit: {0}")]
    InvalidUnit(String),
}

/// Byte count that reads `"512"`, `"64KB"` or `"1MiB"` from config
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct ByteSize(pub u64);

impl ByteSize {
    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// Largest unit that keeps the value at or above one, one decimal place
    /// when the division is not exact (`1536` -> `"1.5 KB"`).
    pub fn to_human_readable(&self) -> String {
        let mut unit = 0;
        let mut divisor = 1u64;
        while unit + 1 < UNITS.len() && self.0 >= divisor * KB {
            divisor *= KB;
            unit += 1;
        }

        let whole = self.0 / divisor;
        let tenths = (self.0 % divisor) * 10 / divisor;
        if tenths == 0 {
            format!("{} {}", whole, UNITS[unit])
        } else {
            format!("{}.{} {}", whole, tenths, UNITS[unit])
        }
    }
}

fn unit_multiplier(unit: &str) -> Option<u64> {
    let exponent = match unit {
        "" | "B" => 0,
        "K" | "KB" | "KIB" => 1,
        "M" | "MB" | "MIB" => 2,
        "G" | "GB" | "GIB" => 3,
        "T" | "TB" | "TIB" => 4,
        _ => return None,
    };
    Some(KB.pow(exponent))
}

impl FromStr for ByteSize {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseError::Empty);
        }

        let split = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
        let (digits, unit) = s.split_at(split);
        let number: u64 = digits
            .parse()
            .map_err(|_| ParseError::InvalidNumber(s.to_string()))?;
        let unit = unit.trim().to_ascii_uppercase();
        let multiplier =
            unit_multiplier(&unit).ok_or_else(|| ParseError::InvalidUnit(unit.clone()))?;

        number
            .checked_mul(multiplier)
            .map(ByteSize)
            .ok_or_else(|| ParseError::InvalidNumber(s.to_string()))
    }
}

impl<'de> Deserialize<'de> for ByteSize {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(ByteSize(n)),
            Raw::Text(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}

impl fmt::Display for ByteSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_human_readable())
    }
}
