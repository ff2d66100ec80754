//! Path counts over `(stage, number_lower)` states.
//!
//! Row `stage` holds `deck_size - stage` cells; cell `i` counts the dealing
//! orders that end at `GameState(stage, i)` with every prediction so far
//! correct. The table collapses the `deck_size!` orderings of a deck into
//! `O(deck_size²)` cells, and is populated once and then only read.

use num::{BigUint, Zero};

use crate::error::ProbabilityError;
use crate::model::game_state::cards_left_after_dealing;
use crate::model::prediction::Prediction;
use crate::model::query::Query;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathCountMatrix {
    deck_size: usize,
    rows: Vec<Vec<BigUint>>,
}

impl PathCountMatrix {
    pub fn build(query: Query) -> Result<Self, ProbabilityError> {
        let deck_size = query.deck_size();
        let stages = deck_size - 1;

        let mut rows = Vec::new();
        rows.try_reserve_exact(stages)
            .map_err(|source| ProbabilityError::Allocation {
                entries: stages,
                source,
            })?;

        rows.push(first_stage(query)?);
        for stage in 1..stages {
            let row = next_stage(deck_size, stage, &rows[stage - 1])?;
            rows.push(row);
        }

        Ok(Self { deck_size, rows })
    }

    pub fn deck_size(&self) -> usize {
        self.deck_size
    }

    pub fn stages(&self) -> usize {
        self.rows.len()
    }

    pub fn row(&self, stage: usize) -> Option<&[BigUint]> {
        self.rows.get(stage).map(Vec::as_slice)
    }

    pub fn get(&self, stage: usize, number_lower: usize) -> Option<&BigUint> {
        self.rows.get(stage).and_then(|row| row.get(number_lower))
    }

    pub fn rows(&self) -> impl Iterator<Item = &[BigUint]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// The stage after which exactly one card is left to deal.
    pub fn last_row(&self) -> &[BigUint] {
        self.rows.last().map(Vec::as_slice).unwrap_or(&[])
    }
}

fn zeroed_row(len: usize) -> Result<Vec<BigUint>, ProbabilityError> {
    let mut row = Vec::new();
    row.try_reserve_exact(len)
        .map_err(|source| ProbabilityError::Allocation {
            entries: len,
            source,
        })?;
    row.resize(len, BigUint::zero());
    Ok(row)
}

/// Exactly one card produces each resulting `number_lower`, so every cell of
/// the first row is 0 or 1.
fn first_stage(query: Query) -> Result<Vec<BigUint>, ProbabilityError> {
    let deck_size = query.deck_size();
    let number_lower = query.number_lower();
    let mut row = zeroed_row(deck_size)?;

    let correct = match query.first_prediction() {
        Prediction::Higher => number_lower..deck_size,
        Prediction::Lower => 0..number_lower,
    };
    for cell in &mut row[correct] {
        *cell = BigUint::from(1u32);
    }
    Ok(row)
}

fn next_stage(
    deck_size: usize,
    stage: usize,
    previous: &[BigUint],
) -> Result<Vec<BigUint>, ProbabilityError> {
    let cards_before = cards_left_after_dealing(deck_size, stage - 1);
    let cards_after = cards_left_after_dealing(deck_size, stage);
    let mut row = zeroed_row(cards_after + 1)?;

    // prefix[j] is the sum of previous[..j].
    let mut prefix = Vec::new();
    prefix
        .try_reserve_exact(previous.len() + 1)
        .map_err(|source| ProbabilityError::Allocation {
            entries: previous.len() + 1,
            source,
        })?;
    prefix.push(BigUint::zero());
    for (i, paths) in previous.iter().enumerate() {
        let next = &prefix[i] + paths;
        prefix.push(next);
    }
    let total = &prefix[cards_before + 1];

    for (number_lower, cell) in row.iter_mut().enumerate() {
        let (k, l) = transition_bounds(cards_before, number_lower);
        *cell = &prefix[k] + (total - &prefix[l]);
    }
    Ok(row)
}

/// Bounds of the previous-stage cells that reach `number_lower` while keeping
/// the streak: cells `[0, k)` predicted higher and a higher card came, cells
/// `[l, cards_before]` predicted lower and a lower card came.
pub fn transition_bounds(cards_before: usize, number_lower: usize) -> (usize, usize) {
    let limit = cards_before.div_ceil(2);

    if cards_before % 2 == 0 {
        if number_lower <= limit {
            (number_lower + 1, limit + 1)
        } else {
            (limit + 1, number_lower + 1)
        }
    } else if number_lower < limit {
        (number_lower + 1, limit)
    } else if number_lower == limit {
        (limit, limit + 1)
    } else {
        (limit, number_lower + 1)
    }
}
