use core::fmt;

/// The dealer's guess for the next card. Ties go to `Higher`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Prediction {
    Higher,
    Lower,
}

impl Prediction {
    pub const fn from_counts(number_lower: usize, number_higher: usize) -> Self {
        if number_higher >= number_lower {
            Prediction::Higher
        } else {
            Prediction::Lower
        }
    }

    /// Cards whose dealing would break the streak.
    pub const fn failing_cards(self, number_lower: usize, number_higher: usize) -> usize {
        match self {
            Prediction::Higher => number_lower,
            Prediction::Lower => number_higher,
        }
    }
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Prediction::Higher => "higher",
            Prediction::Lower => "lower",
        };
        f.write_str(text)
    }
}
