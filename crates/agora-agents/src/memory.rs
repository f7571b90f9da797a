//! Bounded decision history.
//!
//! Each agent remembers its last few rounds as [`MemoryEntry`] values. The
//! store holds at most `capacity` entries and evicts the oldest first, so
//! the most recent observation is always at the back.

use std::collections::VecDeque;

use agora_types::{GoodId, MemoryEntry};

/// Default number of rounds an agent remembers.
pub const DEFAULT_MEMORY_LENGTH: usize = 5;

/// A FIFO-evicting memory of past rounds.
#[derive(Debug, Clone, PartialEq)]
pub struct Memory {
    capacity: usize,
    entries: VecDeque<MemoryEntry>,
}

impl Memory {
    /// Create an empty memory holding at most `capacity` entries.
    ///
    /// A capacity of zero yields a memory that never retains anything.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    /// Record a round, evicting the oldest entry when full.
    pub fn push(&mut self, entry: MemoryEntry) {
        if self.capacity == 0 {
            return;
        }
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// The most recently recorded round.
    pub fn last(&self) -> Option<&MemoryEntry> {
        self.entries.back()
    }

    /// Price of `good` as seen in the most recent round, if remembered.
    pub fn last_price(&self, good: &GoodId) -> Option<f64> {
        self.last().and_then(|entry| entry.prices.get(good).copied())
    }

    /// Iterate over remembered rounds, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &MemoryEntry> {
        self.entries.iter()
    }

    /// Number of remembered rounds.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been remembered yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of rounds retained.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new(DEFAULT_MEMORY_LENGTH)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use agora_types::{ActionType, Mood};

    use super::*;

    fn entry(round: u64, price: f64) -> MemoryEntry {
        MemoryEntry {
            round,
            prices: BTreeMap::from([(GoodId::from("GoodA"), price)]),
            action: ActionType::Hold,
            mood: Mood::Neutral,
        }
    }

    #[test]
    fn evicts_oldest_first() {
        let mut memory = Memory::new(3);
        for round in 0..5_u64 {
            memory.push(entry(round, 100.0));
        }
        assert_eq!(memory.len(), 3);
        let rounds: Vec<u64> = memory.iter().map(|e| e.round).collect();
        assert_eq!(rounds, vec![2, 3, 4]);
        assert_eq!(memory.last().unwrap().round, 4);
    }

    #[test]
    fn last_price_reads_the_newest_entry() {
        let mut memory = Memory::default();
        let good = GoodId::from("GoodA");
        assert_eq!(memory.last_price(&good), None);
        memory.push(entry(0, 100.0));
        memory.push(entry(1, 97.5));
        assert_eq!(memory.last_price(&good), Some(97.5));
        assert_eq!(memory.last_price(&GoodId::from("GoodB")), None);
    }

    #[test]
    fn zero_capacity_retains_nothing() {
        let mut memory = Memory::new(0);
        memory.push(entry(0, 100.0));
        assert!(memory.is_empty());
        assert_eq!(memory.capacity(), 0);
    }
}
