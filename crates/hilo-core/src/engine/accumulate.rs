use num::bigint::{BigInt, Sign};
use num::rational::BigRational;
use num::{ToPrimitive, Zero};
use serde::{Deserialize, Serialize};

use crate::error::{FractionPart, ProbabilityError};

/// A reduced probability handed to the odds layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutcomeFraction {
    pub numerator: u64,
    pub denominator: u64,
}

impl OutcomeFraction {
    /// Floating point enters here and nowhere earlier.
    pub fn probability(self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }

    /// Fair decimal odds, `1 / p`. Infinite for an impossible outcome.
    pub fn fair_odds(self) -> f64 {
        self.denominator as f64 / self.numerator as f64
    }
}

/// Suffix sums in place: entry `n` becomes the sum of entries `n..`.
pub fn accumulate(probabilities: &mut [BigRational]) {
    let mut running = BigRational::zero();
    for probability in probabilities.iter_mut().rev() {
        let original = probability.clone();
        *probability = &original + &running;
        running = running + original;
    }
}

pub fn to_outcome_fractions(
    probabilities: &[BigRational],
) -> Result<Vec<OutcomeFraction>, ProbabilityError> {
    probabilities
        .iter()
        .enumerate()
        .map(|(index, probability)| {
            Ok(OutcomeFraction {
                numerator: to_u64(index, FractionPart::Numerator, probability.numer())?,
                denominator: to_u64(index, FractionPart::Denominator, probability.denom())?,
            })
        })
        .collect()
}

fn to_u64(index: usize, part: FractionPart, value: &BigInt) -> Result<u64, ProbabilityError> {
    if value.sign() == Sign::Minus {
        return Err(ProbabilityError::NegativeProbability { index });
    }
    value.to_u64().ok_or(ProbabilityError::OutputOverflow {
        index,
        part,
        bits: value.bits(),
    })
}
