use num::BigUint;

/// Ordered ways to deal each prefix of a deck: entry `i` counts the
/// orderings of `i + 2` cards drawn from `deck_size`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermutationTable {
    deck_size: usize,
    counts: Vec<BigUint>,
}

impl PermutationTable {
    pub fn new(deck_size: usize) -> Self {
        let len = deck_size.saturating_sub(2);
        let mut counts: Vec<BigUint> = Vec::with_capacity(len);
        for i in 0..len {
            let next = match counts.last() {
                None => BigUint::from(deck_size) * BigUint::from(deck_size - 1),
                Some(previous) => previous * BigUint::from(deck_size - i - 1),
            };
            counts.push(next);
        }
        Self { deck_size, counts }
    }

    pub fn deck_size(&self) -> usize {
        self.deck_size
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&BigUint> {
        self.counts.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BigUint> {
        self.counts.iter()
    }

    /// Orderings of `deck_size - 1` cards, i.e. every card whose value is
    /// still uncertain. A two-card deck has no table entries, so it falls
    /// back to `2 * 1 / 1!`.
    pub fn number_of_shuffles(&self) -> BigUint {
        self.counts
            .last()
            .cloned()
            .unwrap_or_else(|| BigUint::from(self.deck_size))
    }
}
