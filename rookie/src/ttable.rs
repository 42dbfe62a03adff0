/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::collections::HashMap;

use tracing::trace;

use super::{eval::MATE_SCORE, Move, ZobristKey};

/// Scores beyond this magnitude encode a forced mate, and are stored relative to the node rather than the root.
const MATE_THRESHOLD: i32 = MATE_SCORE - 1000;

/// How a stored score relates to the true value of its position.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Bound {
    /// The score is the exact value of the position at the stored depth.
    Exact,

    /// The search failed high: the true value is at least the score.
    Lower,

    /// The search failed low: the true value is at most the score.
    Upper,
}

/// The result of searching a single position, remembered for when the position is reached again.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct TTableEntry {
    key: ZobristKey,
    depth: usize,
    score: i32,
    bound: Bound,
    best_move: Option<Move>,
}

impl TTableEntry {
    /// Creates an entry for a position searched `ply` plies from the root.
    ///
    /// Mate scores are converted to be relative to this position, so they stay correct when it is reached at
    /// a different ply.
    pub fn new(
        key: ZobristKey,
        depth: usize,
        score: i32,
        bound: Bound,
        best_move: Option<Move>,
        ply: usize,
    ) -> Self {
        let ply = ply as i32;
        let score = if score > MATE_THRESHOLD {
            score + ply
        } else if score < -MATE_THRESHOLD {
            score - ply
        } else {
            score
        };

        Self {
            key,
            depth,
            score,
            bound,
            best_move,
        }
    }

    /// Key of the position this entry describes.
    #[inline(always)]
    pub const fn key(&self) -> ZobristKey {
        self.key
    }

    /// Remaining depth the position was searched to.
    #[inline(always)]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// How the stored score relates to the position's true value.
    #[inline(always)]
    pub const fn bound(&self) -> Bound {
        self.bound
    }

    /// Best move found when the entry was stored, if the search got that far.
    #[inline(always)]
    pub const fn best_move(&self) -> Option<Move> {
        self.best_move
    }

    /// The stored score, seen from a node `ply` plies from the root.
    #[inline(always)]
    pub const fn score(&self, ply: usize) -> i32 {
        let ply = ply as i32;
        if self.score > MATE_THRESHOLD {
            self.score - ply
        } else if self.score < -MATE_THRESHOLD {
            self.score + ply
        } else {
            self.score
        }
    }

    /// Returns the stored score if it can stand in for searching the position to `depth` within `(alpha, beta)`.
    ///
    /// The entry must be at least as deep as requested, and its bound must settle the window: exact scores
    /// always do, lower bounds only at or above `beta`, upper bounds only at or below `alpha`.
    pub fn usable_score(&self, depth: usize, alpha: i32, beta: i32, ply: usize) -> Option<i32> {
        if self.depth < depth {
            return None;
        }

        let score = self.score(ply);
        match self.bound {
            Bound::Exact => Some(score),
            Bound::Lower if score >= beta => Some(score),
            Bound::Upper if score <= alpha => Some(score),
            _ => None,
        }
    }
}

/// A bounded memo from [`ZobristKey`]s to search results.
///
/// When a new key would exceed capacity, every entry is discarded.
#[derive(Clone, Debug)]
pub struct TTable {
    entries: HashMap<ZobristKey, TTableEntry>,
    capacity: usize,
}

impl TTable {
    /// Creates an empty table that holds at most `capacity` entries (and at least one).
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            capacity: capacity.max(1),
        }
    }

    /// Maximum number of entries held before the table is cleared.
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of entries currently stored.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no entries are stored.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Discards every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Fetches the entry for `key`, if one is stored.
    #[inline(always)]
    pub fn get(&self, key: ZobristKey) -> Option<&TTableEntry> {
        self.entries.get(&key)
    }

    /// Stores `entry`, replacing any entry with the same key.
    ///
    /// If the key is new and the table is full, the whole table is cleared first.
    pub fn store(&mut self, entry: TTableEntry) {
        if self.entries.len() >= self.capacity && !self.entries.contains_key(&entry.key) {
            trace!(
                capacity = self.capacity,
                "transposition table full; clearing"
            );
            self.entries.clear();
        }

        self.entries.insert(entry.key, entry);
    }
}

impl Default for TTable {
    fn default() -> Self {
        Self::new(crate::SearchConfig::default().ttable_capacity)
    }
}
