//! Shared primitive types used across the whole crate.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Hour of day, 0..=23. Generated records only use the operating window.
pub type Hour = u8;

/// A transit line. The network has exactly four.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Line {
    #[serde(rename = "line_1")]
    Line1,
    #[serde(rename = "line_2")]
    Line2,
    #[serde(rename = "line_3")]
    Line3,
    #[serde(rename = "line_4")]
    Line4,
}

impl Line {
    /// Draw order for uniform sampling. NEVER reorder; it changes every
    /// seeded table.
    pub const ALL: [Line; 4] = [Line::Line1, Line::Line2, Line::Line3, Line::Line4];

    pub fn code(&self) -> &'static str {
        match self {
            Self::Line1 => "line_1",
            Self::Line2 => "line_2",
            Self::Line3 => "line_3",
            Self::Line4 => "line_4",
        }
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = match self {
            Self::Line1 => 1,
            Self::Line2 => 2,
            Self::Line3 => 3,
            Self::Line4 => 4,
        };
        write!(f, "Line {n}")
    }
}

impl FromStr for Line {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Line::ALL
            .into_iter()
            .find(|l| l.code().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown line '{s}' (expected line_1..line_4)"))
    }
}

/// A station. The network has exactly five.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Station {
    Centro,
    Norte,
    Sur,
    Oriente,
    Occidente,
}

impl Station {
    /// Draw order for uniform sampling. Append only.
    pub const ALL: [Station; 5] = [
        Station::Centro,
        Station::Norte,
        Station::Sur,
        Station::Oriente,
        Station::Occidente,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Centro    => "Centro",
            Self::Norte     => "Norte",
            Self::Sur       => "Sur",
            Self::Oriente   => "Oriente",
            Self::Occidente => "Occidente",
        }
    }
}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Station {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Station::ALL
            .into_iter()
            .find(|st| st.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown station '{s}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_parses_from_code_case_insensitively() {
        assert_eq!("line_3".parse::<Line>().unwrap(), Line::Line3);
        assert_eq!("LINE_1".parse::<Line>().unwrap(), Line::Line1);
        assert!("line_9".parse::<Line>().is_err());
    }

    #[test]
    fn station_parses_from_name() {
        assert_eq!("oriente".parse::<Station>().unwrap(), Station::Oriente);
        assert!("Poniente".parse::<Station>().is_err());
    }

    #[test]
    fn wire_form_matches_code() {
        let json = serde_json::to_string(&Line::Line2).unwrap();
        assert_eq!(json, "\"line_2\"");
        let json = serde_json::to_string(&Station::Occidente).unwrap();
        assert_eq!(json, "\"occidente\"");
    }
}
