use core::fmt;
use std::collections::TryReserveError;
use thiserror::Error;

/// Which half of a reduced fraction failed to convert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FractionPart {
    Numerator,
    Denominator,
}

impl fmt::Display for FractionPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            FractionPart::Numerator => "numerator",
            FractionPart::Denominator => "denominator",
        };
        f.write_str(text)
    }
}

/// Failures surfaced by the probability pipeline. None of them are retryable:
/// the computation is a pure function of the query.
#[derive(Debug, Error)]
pub enum ProbabilityError {
    #[error("invalid query (deck size {deck_size}, number lower {number_lower}): {reason}")]
    InvalidQuery {
        deck_size: usize,
        number_lower: usize,
        reason: &'static str,
    },
    #[error("outcome {index}: {part} needs {bits} bits and does not fit in 64")]
    OutputOverflow {
        index: usize,
        part: FractionPart,
        bits: u64,
    },
    #[error("outcome {index}: reduced probability is negative")]
    NegativeProbability { index: usize },
    /// Covers the path-count rows and their prefix sums, the only buffers
    /// that grow with the square of the deck. The permutation table holds
    /// `deck_size - 2` entries and allocates infallibly.
    #[error("failed to allocate {entries} path counts: {source}")]
    Allocation {
        entries: usize,
        #[source]
        source: TryReserveError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_values() {
        let err = ProbabilityError::InvalidQuery {
            deck_size: 1,
            number_lower: 0,
            reason: "deck must hold at least two cards",
        };
        assert_eq!(
            err.to_string(),
            "invalid query (deck size 1, number lower 0): deck must hold at least two cards"
        );

        let err = ProbabilityError::OutputOverflow {
            index: 3,
            part: FractionPart::Denominator,
            bits: 70,
        };
        assert_eq!(
            err.to_string(),
            "outcome 3: denominator needs 70 bits and does not fit in 64"
        );
    }
}
