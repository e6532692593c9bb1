//! Selection generations
//!
//! Every semester change takes a new generation number. Work started for an
//! older generation may still complete, but its results are thrown away.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use crate::semester::Semester;

/// Monotonically increasing generation source
#[derive(Debug, Default)]
pub struct GenerationCounter {
    current: AtomicU64,
}

impl GenerationCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new generation and return its number
    pub fn advance(&self) -> u64 {
        self.current.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn current(&self) -> u64 {
        self.current.load(Ordering::SeqCst)
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.current() == generation
    }
}

/// A semester choice tagged with the generation it started.
///
/// Selections are replaced on every change, never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SemesterSelection {
    pub semester: Semester,
    pub generation: u64,
}

impl SemesterSelection {
    pub fn new(semester: Semester, generation: u64) -> Self {
        Self { semester, generation }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generations_increase() {
        let counter = GenerationCounter::new();
        assert_eq!(counter.current(), 0);
        let first = counter.advance();
        let second = counter.advance();
        assert!(second > first);
        assert!(counter.is_current(second));
        assert!(!counter.is_current(first));
    }
}
