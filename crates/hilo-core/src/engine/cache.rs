//! Memoised outcomes keyed by query, with least-recently-used eviction.

use std::collections::{HashMap, VecDeque};

use tracing::trace;

use super::ProbabilityEngine;
use super::accumulate::OutcomeFraction;
use crate::error::ProbabilityError;
use crate::model::query::Query;

#[derive(Debug)]
pub struct OutcomeCache {
    entries: HashMap<Query, Vec<OutcomeFraction>>,
    order: VecDeque<Query>,
    capacity: usize,
    hits: u64,
    misses: u64,
}

impl OutcomeCache {
    /// A capacity of zero disables caching.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            capacity,
            hits: 0,
            misses: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn get(&self, query: &Query) -> Option<&[OutcomeFraction]> {
        self.entries.get(query).map(Vec::as_slice)
    }

    /// Failed computations are not stored.
    pub fn get_or_compute(
        &mut self,
        query: Query,
    ) -> Result<Vec<OutcomeFraction>, ProbabilityError> {
        if let Some(outcomes) = self.entries.get(&query) {
            let outcomes = outcomes.clone();
            self.hits += 1;
            self.touch(query);
            trace!(
                target: "hilo_core::cache",
                deck_size = query.deck_size(),
                number_lower = query.number_lower(),
                "cache hit"
            );
            return Ok(outcomes);
        }

        self.misses += 1;
        trace!(
            target: "hilo_core::cache",
            deck_size = query.deck_size(),
            number_lower = query.number_lower(),
            "cache miss"
        );
        let outcomes = ProbabilityEngine::new(query)?.outcomes()?;
        self.insert(query, outcomes.clone());
        Ok(outcomes)
    }

    pub fn insert(&mut self, query: Query, outcomes: Vec<OutcomeFraction>) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.insert(query, outcomes).is_some() {
            self.touch(query);
        } else {
            self.order.push_back(query);
        }
        self.evict_if_needed();
    }

    fn touch(&mut self, query: Query) {
        if let Some(position) = self.order.iter().position(|key| *key == query) {
            self.order.remove(position);
            self.order.push_back(query);
        }
    }

    fn evict_if_needed(&mut self) {
        while self.capacity > 0 && self.order.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(deck_size: usize, number_lower: usize) -> Query {
        Query::new(deck_size, number_lower).expect("valid")
    }

    #[test]
    fn cache_respects_capacity() {
        let mut cache = OutcomeCache::new(1);
        cache.get_or_compute(query(5, 0)).expect("computed");
        cache.get_or_compute(query(6, 2)).expect("computed");
        assert!(cache.get(&query(5, 0)).is_none());
        assert!(cache.get(&query(6, 2)).is_some());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn repeated_queries_hit() {
        let mut cache = OutcomeCache::new(4);
        let first = cache.get_or_compute(query(13, 0)).expect("computed");
        let second = cache.get_or_compute(query(13, 0)).expect("cached");
        assert_eq!(first, second);
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.misses(), 1);
    }

    #[test]
    fn recently_used_entries_survive_eviction() {
        let mut cache = OutcomeCache::new(2);
        cache.get_or_compute(query(4, 0)).expect("computed");
        cache.get_or_compute(query(5, 0)).expect("computed");
        cache.get_or_compute(query(4, 0)).expect("cached");
        cache.get_or_compute(query(6, 0)).expect("computed");
        assert!(cache.get(&query(4, 0)).is_some());
        assert!(cache.get(&query(5, 0)).is_none());
    }

    #[test]
    fn zero_capacity_never_stores() {
        let mut cache = OutcomeCache::new(0);
        cache.get_or_compute(query(5, 1)).expect("computed");
        assert!(cache.is_empty());
        assert_eq!(cache.capacity(), 0);
    }

    #[test]
    fn errors_are_not_cached() {
        let mut cache = OutcomeCache::new(4);
        let err = cache.get_or_compute(query(40, 0)).expect_err("overflows u64");
        assert!(matches!(err, ProbabilityError::OutputOverflow { .. }));
        assert!(cache.is_empty());
    }
}
