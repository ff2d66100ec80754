//! Break-even exchange prices for an exact outcome probability.
//!
//! Prices are decimal odds quantised to `1 / ticks_per_unit`. The quoted back
//! price is one tick above the zero-profit price and the lay price one tick
//! below, so both keep a positive expectation after commission.

use core::fmt;

use hilo_core::OutcomeFraction;
use serde::Serialize;

use crate::config::PricingConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pricing {
    commission: f64,
    ticks_per_unit: f64,
}

impl Pricing {
    pub fn new(commission: f64, ticks_per_unit: u32) -> Self {
        Self {
            commission,
            ticks_per_unit: f64::from(ticks_per_unit),
        }
    }

    pub fn from_config(config: &PricingConfig) -> Self {
        Self::new(config.commission, config.ticks_per_unit)
    }

    fn retained(&self) -> f64 {
        1.0 - self.commission
    }

    /// Odds at which backing breaks even: `p·k·(o − 1) = 1 − p`.
    pub fn zero_payoff_back_odds(&self, probability: f64) -> f64 {
        let k = self.retained();
        ((probability * k) + 1.0 - probability) / (probability * k)
    }

    /// Odds at which laying breaks even: `(1 − p)·k = p·(o − 1)`.
    pub fn zero_payoff_lay_odds(&self, probability: f64) -> f64 {
        let k = self.retained();
        (k - (probability * k) + probability) / probability
    }

    pub fn tightest_back_odds(&self, probability: f64) -> f64 {
        let ticks = (self.zero_payoff_back_odds(probability) * self.ticks_per_unit).floor();
        (ticks + 1.0) / self.ticks_per_unit
    }

    pub fn tightest_lay_odds(&self, probability: f64) -> f64 {
        let ticks = (self.zero_payoff_lay_odds(probability) * self.ticks_per_unit).ceil();
        (ticks - 1.0) / self.ticks_per_unit
    }

    pub fn quote(&self, fraction: OutcomeFraction) -> Quote {
        let probability = fraction.probability();
        Quote {
            numerator: fraction.numerator,
            denominator: fraction.denominator,
            probability,
            fair_odds: fraction.fair_odds(),
            back: self.tightest_back_odds(probability),
            lay: self.tightest_lay_odds(probability),
        }
    }
}

impl Default for Pricing {
    fn default() -> Self {
        Self::from_config(&PricingConfig::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Quote {
    pub numerator: u64,
    pub denominator: u64,
    pub probability: f64,
    pub fair_odds: f64,
    pub back: f64,
    pub lay: f64,
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "P: {:.3} -- O: {:.3} -- B: {:.2} -- L: {:.2}",
            self.probability, self.fair_odds, self.back, self.lay
        )
    }
}

/// Exchange name of outcome `index` among `outcome_count` outcomes.
pub fn outcome_label(index: usize, outcome_count: usize) -> String {
    if index + 1 == outcome_count {
        format!("Card {outcome_count}")
    } else {
        format!("Card {} or further", index + 1)
    }
}
