pub mod game_state;
pub mod paths;
pub mod permutations;
pub mod prediction;
pub mod query;
