#![deny(warnings)]
pub mod engine;
pub mod error;
pub mod model;

pub use engine::accumulate::{OutcomeFraction, accumulate, to_outcome_fractions};
pub use engine::cache::OutcomeCache;
pub use engine::{ProbabilityEngine, compute_probabilities, length_of_outcomes};
pub use error::{FractionPart, ProbabilityError};
pub use model::query::Query;

pub struct AppInfo;

impl AppInfo {
    pub const fn name() -> &'static str {
        "hilo-guide"
    }

    pub const fn codename() -> &'static str {
        "Exchange Hi Lo"
    }

    pub const fn version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }
}

#[cfg(test)]
mod tests {
    use super::AppInfo;

    #[test]
    fn exposes_static_metadata() {
        assert_eq!(AppInfo::name(), "hilo-guide");
        assert_eq!(AppInfo::codename(), "Exchange Hi Lo");
        assert!(!AppInfo::version().is_empty());
    }
}
