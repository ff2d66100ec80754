use crate::error::ProbabilityError;
use crate::model::prediction::Prediction;

/// A validated `(deck_size, number_lower)` pair.
///
/// `deck_size` counts the cards not yet dealt; `number_lower` counts those
/// ranked below the last dealt card (0 when nothing has been dealt yet).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Query {
    deck_size: usize,
    number_lower: usize,
}

impl Query {
    pub const MIN_DECK_SIZE: usize = 2;

    pub fn new(deck_size: usize, number_lower: usize) -> Result<Self, ProbabilityError> {
        if deck_size < Self::MIN_DECK_SIZE {
            return Err(ProbabilityError::InvalidQuery {
                deck_size,
                number_lower,
                reason: "deck must hold at least two cards",
            });
        }

        if number_lower >= deck_size {
            return Err(ProbabilityError::InvalidQuery {
                deck_size,
                number_lower,
                reason: "number lower must be smaller than the deck size",
            });
        }

        Ok(Self {
            deck_size,
            number_lower,
        })
    }

    pub const fn deck_size(self) -> usize {
        self.deck_size
    }

    pub const fn number_lower(self) -> usize {
        self.number_lower
    }

    /// The reference card itself is not in the deck, so every card is either
    /// lower or higher.
    pub const fn number_higher(self) -> usize {
        self.deck_size - self.number_lower
    }

    pub const fn first_prediction(self) -> Prediction {
        Prediction::from_counts(self.number_lower, self.number_higher())
    }

    /// Cards that would make the very first prediction wrong.
    pub const fn first_deal_failing_cards(self) -> usize {
        self.first_prediction()
            .failing_cards(self.number_lower, self.number_higher())
    }

    pub const fn outcome_count(self) -> usize {
        self.deck_size - 1
    }
}
