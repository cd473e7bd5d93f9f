use serde::{Deserialize, Serialize};

use crate::error::SimError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub stock_crash_chance: f64,
    pub stock_rocket_chance: f64,
    pub market_boom_chance: f64,
    pub stock_start_value: f64,
    pub stock_crash_divider: f64,
    pub rocket_multiplier: f64,
    pub market_boom_increase: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            stock_crash_chance: 0.05,
            stock_rocket_chance: 0.15,
            market_boom_chance: 0.5,
            stock_start_value: 10.0,
            stock_crash_divider: 2.0,
            rocket_multiplier: 3.0,
            market_boom_increase: 5.0,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), SimError> {
        validate_probability("stock_crash_chance", self.stock_crash_chance)?;
        validate_probability("stock_rocket_chance", self.stock_rocket_chance)?;
        validate_probability("market_boom_chance", self.market_boom_chance)?;
        validate_positive("stock_start_value", self.stock_start_value)?;
        validate_positive("stock_crash_divider", self.stock_crash_divider)?;
        validate_positive("rocket_multiplier", self.rocket_multiplier)?;
        validate_positive("market_boom_increase", self.market_boom_increase)?;
        Ok(())
    }
}

fn validate_probability(name: &str, value: f64) -> Result<(), SimError> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(SimError::InvalidConfiguration(format!(
            "{name} must be a probability between 0 and 1, got {value}"
        )));
    }
    Ok(())
}

fn validate_positive(name: &str, value: f64) -> Result<(), SimError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(SimError::InvalidConfiguration(format!(
            "{name} must be a finite positive number, got {value}"
        )));
    }
    Ok(())
}
