use std::{
    env, fmt,
    net::{AddrParseError, SocketAddr},
    time::Duration,
};

use market_sim::{Settings, SimError};

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_SAVE_PATH: &str = "saves/stock-ticker.json";
const DEFAULT_JOURNAL_OUTPUT_PATH: &str = "artifacts/news.csv";
const DEFAULT_TICK_MILLIS: u64 = 1_000;

const ENV_ADDR: &str = "GAME_SERVER_ADDR";
const ENV_SAVE_PATH: &str = "GAME_SAVE_PATH";
const ENV_JOURNAL_OUTPUT: &str = "GAME_JOURNAL_OUTPUT";
const ENV_TICK_MILLIS: &str = "GAME_TICK_MILLIS";
const ENV_RNG_SEED: &str = "GAME_RNG_SEED";
const ENV_AUTOSTART_SECONDS: &str = "GAME_AUTOSTART_SECONDS";

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub save_path: String,
    pub journal_output_path: String,
    pub tick: Duration,
    pub rng_seed: Option<u64>,
    pub autostart_seconds: Option<i64>,
    pub settings: Settings,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidListenAddr(AddrParseError),
    EmptyPath { key: &'static str },
    InvalidTickMillis,
    InvalidRngSeed,
    InvalidAutostartSeconds,
    InvalidNumber { key: &'static str },
    InvalidSettings(SimError),
    NonUnicode { key: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidListenAddr(err) => {
                write!(f, "{ENV_ADDR} is not a valid socket address: {err}")
            }
            Self::EmptyPath { key } => {
                write!(f, "{key} must not be empty or whitespace")
            }
            Self::InvalidTickMillis => {
                write!(f, "{ENV_TICK_MILLIS} must be a positive whole number of milliseconds")
            }
            Self::InvalidRngSeed => {
                write!(f, "{ENV_RNG_SEED} must be an unsigned 64-bit integer")
            }
            Self::InvalidAutostartSeconds => {
                write!(f, "{ENV_AUTOSTART_SECONDS} must be a positive whole number of seconds")
            }
            Self::InvalidNumber { key } => {
                write!(f, "{key} must be a number")
            }
            Self::InvalidSettings(err) => {
                write!(f, "game settings are invalid: {err}")
            }
            Self::NonUnicode { key } => {
                write!(f, "{key} contains non-unicode data")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidListenAddr(err) => Some(err),
            Self::InvalidSettings(err) => Some(err),
            Self::EmptyPath { .. }
            | Self::InvalidTickMillis
            | Self::InvalidRngSeed
            | Self::InvalidAutostartSeconds
            | Self::InvalidNumber { .. }
            | Self::NonUnicode { .. } => None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let listen_addr = match read_env(ENV_ADDR)? {
            Some(value) => value.parse().map_err(ConfigError::InvalidListenAddr)?,
            None => DEFAULT_LISTEN_ADDR
                .parse()
                .expect("default listen address must be valid"),
        };

        let save_path = parse_path_env(ENV_SAVE_PATH, DEFAULT_SAVE_PATH)?;
        let journal_output_path = parse_path_env(ENV_JOURNAL_OUTPUT, DEFAULT_JOURNAL_OUTPUT_PATH)?;

        let tick_millis = match read_env(ENV_TICK_MILLIS)? {
            Some(value) => match value.parse::<u64>() {
                Ok(millis) if millis > 0 => millis,
                _ => return Err(ConfigError::InvalidTickMillis),
            },
            None => DEFAULT_TICK_MILLIS,
        };

        let rng_seed = match read_env(ENV_RNG_SEED)? {
            Some(value) => Some(value.parse().map_err(|_| ConfigError::InvalidRngSeed)?),
            None => None,
        };

        let autostart_seconds = match read_env(ENV_AUTOSTART_SECONDS)? {
            Some(value) => match value.parse::<i64>() {
                Ok(seconds) if seconds > 0 => Some(seconds),
                _ => return Err(ConfigError::InvalidAutostartSeconds),
            },
            None => None,
        };

        let defaults = Settings::default();
        let settings = Settings {
            stock_crash_chance: parse_f64_env("GAME_CRASH_CHANCE", defaults.stock_crash_chance)?,
            stock_rocket_chance: parse_f64_env("GAME_ROCKET_CHANCE", defaults.stock_rocket_chance)?,
            market_boom_chance: parse_f64_env("GAME_BOOM_CHANCE", defaults.market_boom_chance)?,
            stock_start_value: parse_f64_env("GAME_START_VALUE", defaults.stock_start_value)?,
            stock_crash_divider: parse_f64_env("GAME_CRASH_DIVIDER", defaults.stock_crash_divider)?,
            rocket_multiplier: parse_f64_env("GAME_ROCKET_MULTIPLIER", defaults.rocket_multiplier)?,
            market_boom_increase: parse_f64_env(
                "GAME_BOOM_INCREASE",
                defaults.market_boom_increase,
            )?,
        };
        settings.validate().map_err(ConfigError::InvalidSettings)?;

        Ok(Self {
            listen_addr,
            save_path,
            journal_output_path,
            tick: Duration::from_millis(tick_millis),
            rng_seed,
            autostart_seconds,
            settings,
        })
    }
}

fn read_env(key: &'static str) -> Result<Option<String>, ConfigError> {
    match env::var(key) {
        Ok(value) => Ok(Some(value)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(env::VarError::NotUnicode(_)) => Err(ConfigError::NonUnicode { key }),
    }
}

fn parse_path_env(key: &'static str, default_value: &str) -> Result<String, ConfigError> {
    match read_env(key)? {
        Some(value) if value.trim().is_empty() => Err(ConfigError::EmptyPath { key }),
        Some(value) => Ok(value),
        None => Ok(default_value.to_owned()),
    }
}

fn parse_f64_env(key: &'static str, default_value: f64) -> Result<f64, ConfigError> {
    match read_env(key)? {
        Some(value) => value
            .parse::<f64>()
            .map_err(|_| ConfigError::InvalidNumber { key }),
        None => Ok(default_value),
    }
}
