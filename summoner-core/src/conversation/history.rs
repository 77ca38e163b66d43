//! Bounded turn history

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// A committed query and its reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub query: String,
    pub reply: String,
}

impl Turn {
    pub fn new(query: impl Into<String>, reply: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            reply: reply.into(),
        }
    }
}

/// The most recent turns, oldest first.
///
/// Pushing past capacity drops the oldest turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnHistory {
    capacity: usize,
    turns: VecDeque<Turn>,
}

impl TurnHistory {
    pub const DEFAULT_CAPACITY: usize = 5;

    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            turns: VecDeque::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, turn: Turn) {
        if self.turns.len() == self.capacity {
            self.turns.pop_front();
        }
        self.turns.push_back(turn);
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &Turn> {
        self.turns.iter()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.back()
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// Render as a prompt section; empty when there is nothing to show.
    pub fn to_prompt(&self) -> String {
        if self.turns.is_empty() {
            return String::new();
        }

        let mut out = String::from("\nHistorique de la conversation:\n");
        for turn in &self.turns {
            out.push_str(&format!("Q: {}\nR: {}\n", turn.query, turn.reply));
        }
        out
    }
}

impl Default for TurnHistory {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}
