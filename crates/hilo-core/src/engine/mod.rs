//! Exact outcome probabilities for a Hi Lo streak.
//!
//! The engine combines the path counts with the permutation table into the
//! mutually exclusive events `CorrectUntilAndFailsAfter(n)` for
//! `n in 0..deck_size - 2`, followed by `CorrectAt(deck_size - 2)`.
//! [`accumulate`] then turns them into "Card n or further" values.

pub mod accumulate;
pub mod cache;

use num::BigUint;
use num::bigint::BigInt;
use num::rational::BigRational;
use tracing::debug;

use crate::error::ProbabilityError;
use crate::model::game_state::GameState;
use crate::model::paths::PathCountMatrix;
use crate::model::permutations::PermutationTable;
use crate::model::query::Query;
use accumulate::{OutcomeFraction, accumulate, to_outcome_fractions};

/// Number of bettable outcomes for a deck of this size.
pub const fn length_of_outcomes(deck_size: usize) -> usize {
    deck_size.saturating_sub(1)
}

/// Validates the query, runs the engine, accumulates and converts.
pub fn compute_probabilities(
    deck_size: usize,
    number_lower: usize,
) -> Result<Vec<OutcomeFraction>, ProbabilityError> {
    let query = Query::new(deck_size, number_lower)?;
    ProbabilityEngine::new(query)?.outcomes()
}

#[derive(Debug, Clone)]
pub struct ProbabilityEngine {
    query: Query,
    matrix: PathCountMatrix,
    permutations: PermutationTable,
}

impl ProbabilityEngine {
    pub fn new(query: Query) -> Result<Self, ProbabilityError> {
        let matrix = PathCountMatrix::build(query)?;
        let permutations = PermutationTable::new(query.deck_size());
        debug!(
            target: "hilo_core::engine",
            deck_size = query.deck_size(),
            number_lower = query.number_lower(),
            stages = matrix.stages(),
            prediction = %query.first_prediction(),
            "path count matrix populated"
        );
        Ok(Self {
            query,
            matrix,
            permutations,
        })
    }

    pub fn query(&self) -> Query {
        self.query
    }

    pub fn matrix(&self) -> &PathCountMatrix {
        &self.matrix
    }

    pub fn permutations(&self) -> &PermutationTable {
        &self.permutations
    }

    /// `CorrectUntilAndFailsAfter(n)` for every stage that can still fail,
    /// then `CorrectAt(final)`. Length is [`length_of_outcomes`].
    pub fn independent_probabilities(&self) -> Vec<BigRational> {
        let deck_size = self.query.deck_size();
        let mut probabilities = Vec::with_capacity(length_of_outcomes(deck_size));

        // The matrix has one more row than the table; zip stops before the
        // final stage, which has no card left to fail on.
        for (stage, (row, orderings)) in self
            .matrix
            .rows()
            .zip(self.permutations.iter())
            .enumerate()
        {
            let failing_paths: BigUint = row
                .iter()
                .enumerate()
                .map(|(number_lower, paths)| {
                    let failing = GameState::new(stage, number_lower).failing_cards(deck_size);
                    paths * BigUint::from(failing)
                })
                .sum();
            probabilities.push(exact_ratio(failing_paths, orderings.clone()));
        }

        probabilities.push(self.final_probability());
        probabilities
    }

    /// The last card is either above or below the penultimate one; both cells
    /// of the final row count.
    pub fn final_probability(&self) -> BigRational {
        let paths: BigUint = self.matrix.last_row().iter().sum();
        exact_ratio(paths, self.permutations.number_of_shuffles())
    }

    /// Probability that the first prediction, made against the reference
    /// card, is already wrong. The independent events cover exactly the
    /// complement.
    pub fn first_deal_miss(&self) -> BigRational {
        exact_ratio(
            BigUint::from(self.query.first_deal_failing_cards()),
            BigUint::from(self.query.deck_size()),
        )
    }

    /// Cumulative "Card n or further" probabilities as reduced `u64` pairs.
    pub fn outcomes(&self) -> Result<Vec<OutcomeFraction>, ProbabilityError> {
        let mut probabilities = self.independent_probabilities();
        accumulate(&mut probabilities);
        to_outcome_fractions(&probabilities)
    }
}

fn exact_ratio(numerator: BigUint, denominator: BigUint) -> BigRational {
    BigRational::new(BigInt::from(numerator), BigInt::from(denominator))
}
