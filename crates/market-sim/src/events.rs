use std::fmt;

use serde::{Deserialize, Serialize};

use crate::instrument::Instrument;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn sign(self) -> f64 {
        match self {
            Self::Up => 1.0,
            Self::Down => -1.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

/// Everything the engine reports. Text is only produced by `Display`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MarketEvent {
    Roll {
        instrument: Instrument,
        magnitude: u8,
        direction: Direction,
        price: f64,
    },
    Crash {
        instrument: Instrument,
        divider: f64,
        price: f64,
    },
    Rocket {
        instrument: Instrument,
        multiplier: f64,
        price: f64,
    },
    Boom {
        instrument: Instrument,
        increase: f64,
        price: f64,
    },
    Info {
        message: String,
    },
}

impl MarketEvent {
    pub fn info(message: impl Into<String>) -> Self {
        Self::Info {
            message: message.into(),
        }
    }

    pub fn instrument(&self) -> Option<Instrument> {
        match self {
            Self::Roll { instrument, .. }
            | Self::Crash { instrument, .. }
            | Self::Rocket { instrument, .. }
            | Self::Boom { instrument, .. } => Some(*instrument),
            Self::Info { .. } => None,
        }
    }

    /// Price after the mutation, if the event mutated one.
    pub fn price(&self) -> Option<f64> {
        match self {
            Self::Roll { price, .. }
            | Self::Crash { price, .. }
            | Self::Rocket { price, .. }
            | Self::Boom { price, .. } => Some(*price),
            Self::Info { .. } => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Roll { .. } => "roll",
            Self::Crash { .. } => "crash",
            Self::Rocket { .. } => "rocket",
            Self::Boom { .. } => "boom",
            Self::Info { .. } => "info",
        }
    }
}

impl fmt::Display for MarketEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Roll {
                instrument,
                magnitude,
                direction,
                ..
            } => write!(
                f,
                "{instrument} updated by ${magnitude} ({})",
                direction.as_str()
            ),
            Self::Crash {
                instrument,
                divider,
                ..
            } => {
                if *divider == 2.0 {
                    write!(f, "Stock Crash! {instrument} lost half its value!")
                } else {
                    write!(f, "Stock Crash! {instrument} was divided by {divider}!")
                }
            }
            Self::Rocket {
                instrument,
                multiplier,
                ..
            } => match *multiplier {
                m if m == 2.0 => write!(f, "Stock Rocket! {instrument} doubled in value!"),
                m if m == 3.0 => write!(f, "Stock Rocket! {instrument} tripled in value!"),
                m => write!(f, "Stock Rocket! {instrument} multiplied by {m}!"),
            },
            Self::Boom {
                instrument,
                increase,
                ..
            } => write!(f, "Market Boom! {instrument} increased by ${increase}."),
            Self::Info { message } => f.write_str(message),
        }
    }
}
