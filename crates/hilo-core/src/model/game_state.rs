use crate::model::prediction::Prediction;

/// Cards still in the deck once the card at `stage` has been dealt, for a
/// query that started with `deck_size` cards.
pub const fn cards_left_after_dealing(deck_size: usize, stage: usize) -> usize {
    deck_size - stage - 1
}

/// Everything the future depends on: which stage was just dealt and how many
/// of the remaining cards rank below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameState {
    pub stage: usize,
    pub number_lower: usize,
}

impl GameState {
    pub const fn new(stage: usize, number_lower: usize) -> Self {
        Self {
            stage,
            number_lower,
        }
    }

    pub const fn cards_left(self, deck_size: usize) -> usize {
        cards_left_after_dealing(deck_size, self.stage)
    }

    pub const fn number_higher(self, deck_size: usize) -> usize {
        self.cards_left(deck_size) - self.number_lower
    }

    pub const fn prediction(self, deck_size: usize) -> Prediction {
        Prediction::from_counts(self.number_lower, self.number_higher(deck_size))
    }

    pub const fn failing_cards(self, deck_size: usize) -> usize {
        self.prediction(deck_size)
            .failing_cards(self.number_lower, self.number_higher(deck_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cards_left_counts_down_from_the_deck() {
        assert_eq!(cards_left_after_dealing(13, 0), 12);
        assert_eq!(cards_left_after_dealing(13, 11), 1);
    }

    #[test]
    fn failing_cards_follow_the_heuristic() {
        // 13 cards, first card dealt leaves 12; 4 lower means 8 higher.
        let state = GameState::new(0, 4);
        assert_eq!(state.number_higher(13), 8);
        assert_eq!(state.prediction(13), Prediction::Higher);
        assert_eq!(state.failing_cards(13), 4);

        let state = GameState::new(0, 9);
        assert_eq!(state.prediction(13), Prediction::Lower);
        assert_eq!(state.failing_cards(13), 3);
    }

    #[test]
    fn last_card_never_fails_from_an_even_split() {
        let state = GameState::new(11, 0);
        assert_eq!(state.cards_left(13), 1);
        assert_eq!(state.failing_cards(13), 0);
    }
}
