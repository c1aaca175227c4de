//! Station and line code types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an invalid station code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station code: {reason}")]
pub struct InvalidStationCode {
    reason: &'static str,
}

/// The line a station belongs to, identified by the first character of its code.
///
/// `KJ10` and `KJ11` are both on line `K`; `SP15` is on line `S`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineCode(char);

impl LineCode {
    /// Wrap a line character.
    pub fn new(c: char) -> Self {
        Self(c)
    }

    /// Returns the line character.
    pub fn as_char(&self) -> char {
        self.0
    }
}

impl fmt::Debug for LineCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LineCode({})", self.0)
    }
}

impl fmt::Display for LineCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A non-empty station code such as `KJ10`.
///
/// The first character identifies the line. This type guarantees the code
/// is non-empty, so [`StationCode::line`] never fails.
///
/// # Examples
///
/// ```
/// use travel_server::domain::StationCode;
///
/// let code = StationCode::parse("KJ10").unwrap();
/// assert_eq!(code.line().as_char(), 'K');
///
/// assert!(StationCode::parse("").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StationCode(String);

impl StationCode {
    /// Parse a station code. The code is kept exactly as given.
    pub fn parse(s: &str) -> Result<Self, InvalidStationCode> {
        if s.is_empty() {
            return Err(InvalidStationCode {
                reason: "must not be empty",
            });
        }
        Ok(Self(s.to_string()))
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the line this station belongs to.
    pub fn line(&self) -> LineCode {
        // Non-empty by construction
        LineCode(self.0.chars().next().unwrap_or_default())
    }
}

impl TryFrom<String> for StationCode {
    type Error = InvalidStationCode;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<StationCode> for String {
    fn from(code: StationCode) -> Self {
        code.0
    }
}

impl fmt::Debug for StationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationCode({})", self.0)
    }
}

impl fmt::Display for StationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A station on the planned route, in travel order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Station {
    /// Station code; its first character is the line
    pub code: StationCode,
    /// Display name
    pub name: String,
}

impl Station {
    /// Creates a new station.
    pub fn new(code: StationCode, name: impl Into<String>) -> Self {
        Self {
            code,
            name: name.into(),
        }
    }

    /// Returns the line this station is on.
    pub fn line(&self) -> LineCode {
        self.code.line()
    }
}
