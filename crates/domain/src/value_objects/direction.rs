//! Cardinal and intercardinal direction tokens
//!
//! Used by movement patterns (ordered direction lists) and by spawners
//! (directed or randomly oriented spawning).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// One of the eight compass direction tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
    #[default]
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    /// All eight tokens, in clockwise order starting at north.
    pub const ALL: [Direction; 8] = [
        Self::North,
        Self::NorthEast,
        Self::East,
        Self::SouthEast,
        Self::South,
        Self::SouthWest,
        Self::West,
        Self::NorthWest,
    ];

    /// The stable token used in persisted resources and property bags.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::North => "north",
            Self::NorthEast => "northEast",
            Self::East => "east",
            Self::SouthEast => "southEast",
            Self::South => "south",
            Self::SouthWest => "southWest",
            Self::West => "west",
            Self::NorthWest => "northWest",
        }
    }

    /// The direction walked when a reversible pattern plays backwards.
    pub fn reversed(&self) -> Self {
        match self {
            Self::North => Self::South,
            Self::NorthEast => Self::SouthWest,
            Self::East => Self::West,
            Self::SouthEast => Self::NorthWest,
            Self::South => Self::North,
            Self::SouthWest => Self::NorthEast,
            Self::West => Self::East,
            Self::NorthWest => Self::SouthEast,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Direction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "north" | "n" => Ok(Self::North),
            "northeast" | "ne" => Ok(Self::NorthEast),
            "east" | "e" => Ok(Self::East),
            "southeast" | "se" => Ok(Self::SouthEast),
            "south" | "s" => Ok(Self::South),
            "southwest" | "sw" => Ok(Self::SouthWest),
            "west" | "w" => Ok(Self::West),
            "northwest" | "nw" => Ok(Self::NorthWest),
            other => Err(DomainError::parse(format!(
                "Unknown direction token: {}",
                other
            ))),
        }
    }
}
