use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::SimError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Instrument {
    Gold,
    Silver,
    Oil,
    Industrial,
    Bonds,
    Grain,
}

impl Instrument {
    /// Canonical order. Tie-breaks and iteration everywhere follow it.
    pub const ALL: [Instrument; 6] = [
        Self::Gold,
        Self::Silver,
        Self::Oil,
        Self::Industrial,
        Self::Bonds,
        Self::Grain,
    ];

    pub const COUNT: usize = Self::ALL.len();

    pub fn index(self) -> usize {
        match self {
            Self::Gold => 0,
            Self::Silver => 1,
            Self::Oil => 2,
            Self::Industrial => 3,
            Self::Bonds => 4,
            Self::Grain => 5,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gold => "gold",
            Self::Silver => "silver",
            Self::Oil => "oil",
            Self::Industrial => "industrial",
            Self::Bonds => "bonds",
            Self::Grain => "grain",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Gold => "Gold",
            Self::Silver => "Silver",
            Self::Oil => "Oil",
            Self::Industrial => "Industrial",
            Self::Bonds => "Bonds",
            Self::Grain => "Grain",
        }
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Instrument {
    type Err = SimError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|instrument| instrument.as_str().eq_ignore_ascii_case(value))
            .ok_or_else(|| SimError::UnknownInstrument(value.to_owned()))
    }
}
