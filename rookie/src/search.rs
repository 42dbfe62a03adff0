/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    cmp::Reverse,
    time::{Duration, Instant},
};

use tracing::{debug, info};

use super::{
    eval::{self, MATE_SCORE},
    Bound, Move, MoveList, PieceKind, Position, TTable, TTableEntry,
};

/// Bound on any score the search can produce.
const INFINITY: i32 = MATE_SCORE + 1;

/// Fraction of the time budget after which no new iteration is started.
const TIME_BUDGET_FRACTION: f64 = 0.8;

const CAPTURE_ORDER_WEIGHT: i32 = 100;
const PROMOTION_ORDER_BONUS: i32 = 900;
const CENTER_PAWN_ORDER_BONUS: i32 = 50;
const CENTER_KNIGHT_ORDER_BONUS: i32 = 30;

/// Limits placed on a search.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct SearchConfig {
    /// Deepest iteration to run, in plies.
    pub max_depth: usize,

    /// Wall-clock time after which no further iterations are started.
    pub time_budget: Duration,

    /// Number of positions the transposition table holds before it is cleared.
    pub ttable_capacity: usize,
}

impl SearchConfig {
    /// Sets the deepest iteration to run.
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets the wall-clock budget for [`Searcher::search`].
    pub const fn with_time_budget(mut self, time_budget: Duration) -> Self {
        self.time_budget = time_budget;
        self
    }

    /// Sets how many positions the transposition table may hold.
    pub const fn with_ttable_capacity(mut self, ttable_capacity: usize) -> Self {
        self.ttable_capacity = ttable_capacity;
        self
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: 4,
            time_budget: Duration::from_secs(5),
            ttable_capacity: 1_000_000,
        }
    }
}

/// Outcome of a search.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct SearchResult {
    /// Best move found, or `None` if the side to move has no legal moves.
    pub best_move: Option<Move>,

    /// Score of the root position from the side to move's perspective.
    pub score: i32,

    /// Depth of the deepest completed iteration.
    pub depth: usize,

    /// Number of positions visited across all iterations.
    pub nodes: u64,

    /// Wall-clock time spent searching.
    pub elapsed: Duration,
}

/// Iterative-deepening alpha-beta searcher.
///
/// A `Searcher` keeps its transposition table between calls to [`Searcher::search`], so consecutive
/// searches of related positions benefit from earlier work. Call [`Searcher::clear`] to start afresh.
///
/// # Example
/// ```
/// # use rookie::*;
/// // White mates with Ra8#
/// let pos = Position::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").unwrap();
/// let mut searcher = Searcher::new(SearchConfig::default().with_max_depth(2));
/// let result = searcher.search(&pos);
/// assert_eq!(result.best_move.unwrap().to_uci(), "a1a8");
/// assert_eq!(result.score, eval::MATE_SCORE - 1);
/// ```
#[derive(Debug)]
pub struct Searcher {
    config: SearchConfig,
    ttable: TTable,
    nodes: u64,
}

impl Searcher {
    /// Creates a searcher with an empty transposition table sized by `config`.
    pub fn new(config: SearchConfig) -> Self {
        Self {
            config,
            ttable: TTable::new(config.ttable_capacity),
            nodes: 0,
        }
    }

    /// The limits this searcher was created with.
    pub const fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// The transposition table shared by this searcher's searches.
    pub const fn ttable(&self) -> &TTable {
        &self.ttable
    }

    /// Discards everything remembered from earlier searches.
    pub fn clear(&mut self) {
        self.ttable.clear();
    }

    /// Searches `position` with iterative deepening, up to the configured depth and time budget.
    ///
    /// The time budget is only checked between iterations, so an iteration that has started always runs
    /// to completion.
    pub fn search(&mut self, position: &Position) -> SearchResult {
        let start = Instant::now();
        let cutoff = self.config.time_budget.mul_f64(TIME_BUDGET_FRACTION);
        let max_depth = self.config.max_depth.max(1);

        self.nodes = 0;
        let mut pos = *position;
        let mut result = SearchResult {
            best_move: None,
            score: 0,
            depth: 0,
            nodes: 0,
            elapsed: Duration::ZERO,
        };

        for depth in 1..=max_depth {
            let (score, best_move) = self.search_root(&mut pos, depth);

            result.best_move = best_move;
            result.score = score;
            result.depth = depth;
            result.nodes = self.nodes;
            result.elapsed = start.elapsed();

            debug!(
                depth,
                score,
                best_move = ?best_move.map(|mv| mv.to_uci()),
                nodes = self.nodes,
                elapsed = ?result.elapsed,
                "completed iteration"
            );

            // No further depth can change a position without moves
            if best_move.is_none() {
                break;
            }

            if depth < max_depth && result.elapsed >= cutoff {
                info!(depth, elapsed = ?result.elapsed, budget = ?self.config.time_budget, "time budget exhausted");
                break;
            }
        }

        result
    }

    /// Searches `position` to exactly `depth` plies in a single pass, ignoring the time budget.
    pub fn search_depth(&mut self, position: &Position, depth: usize) -> SearchResult {
        let start = Instant::now();
        self.nodes = 0;

        let mut pos = *position;
        let (score, best_move) = self.search_root(&mut pos, depth);

        SearchResult {
            best_move,
            score,
            depth,
            nodes: self.nodes,
            elapsed: start.elapsed(),
        }
    }

    /// Searches every root move with a full window, returning the best score and the move achieving it.
    fn search_root(&mut self, pos: &mut Position, depth: usize) -> (i32, Option<Move>) {
        self.nodes += 1;

        let mut moves = pos.legal_moves();
        if moves.is_empty() {
            return (terminal_score(pos, 0), None);
        }
        if depth == 0 {
            return (eval::evaluate_with_move_count(pos, moves.len()), None);
        }

        order_moves(pos, &mut moves);

        let mut alpha = -INFINITY;
        let beta = INFINITY;
        let mut best = -INFINITY;
        let mut best_move = None;

        for mv in moves {
            let undo = pos.make_move(mv);
            let score = -self.negamax(pos, depth - 1, 1, -beta, -alpha);
            pos.unmake_move(mv, undo);

            if score > best {
                best = score;
                best_move = Some(mv);
            }
            alpha = alpha.max(score);
        }

        self.ttable.store(TTableEntry::new(
            pos.key(),
            depth,
            best,
            Bound::Exact,
            best_move,
            0,
        ));

        (best, best_move)
    }

    /// Fail-soft negamax with alpha-beta pruning.
    ///
    /// `ply` is the distance from the root, used to prefer shorter mates.
    fn negamax(
        &mut self,
        pos: &mut Position,
        depth: usize,
        ply: usize,
        mut alpha: i32,
        beta: i32,
    ) -> i32 {
        self.nodes += 1;

        let mut moves = pos.legal_moves();
        if moves.is_empty() {
            return terminal_score(pos, ply);
        }
        if depth == 0 {
            return eval::evaluate_with_move_count(pos, moves.len());
        }

        let key = pos.key();
        if let Some(score) = self
            .ttable
            .get(key)
            .and_then(|entry| entry.usable_score(depth, alpha, beta, ply))
        {
            return score;
        }

        order_moves(pos, &mut moves);

        let original_alpha = alpha;
        let mut best = -INFINITY;
        let mut best_move = None;

        for mv in moves {
            let undo = pos.make_move(mv);
            let score = -self.negamax(pos, depth - 1, ply + 1, -beta, -alpha);
            pos.unmake_move(mv, undo);

            if score > best {
                best = score;
                best_move = Some(mv);
            }
            alpha = alpha.max(score);

            if alpha >= beta {
                break;
            }
        }

        let bound = if best <= original_alpha {
            Bound::Upper
        } else if best >= beta {
            Bound::Lower
        } else {
            Bound::Exact
        };
        self.ttable
            .store(TTableEntry::new(key, depth, best, bound, best_move, ply));

        best
    }
}

impl Default for Searcher {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}

/// Score of a position with no legal moves, `ply` plies from the root.
#[inline(always)]
fn terminal_score(pos: &Position, ply: usize) -> i32 {
    if pos.is_in_check() {
        -(MATE_SCORE - ply as i32)
    } else {
        0
    }
}

/// Heuristic promise of `mv`, used to search likely-good moves first.
fn order_score(pos: &Position, mv: Move) -> i32 {
    let mut score = 0;

    if mv.is_en_passant() {
        score += CAPTURE_ORDER_WEIGHT * eval::piece_value(PieceKind::Pawn);
    } else if let Some(victim) = pos.kind_at(mv.to()) {
        score += CAPTURE_ORDER_WEIGHT * eval::piece_value(victim);
    }

    if mv.is_promotion() {
        score += PROMOTION_ORDER_BONUS;
    }

    let to = mv.to();
    let central = (2..=5).contains(&to.file().index()) && (2..=5).contains(&to.rank().index());
    if central {
        match pos.kind_at(mv.from()) {
            Some(PieceKind::Pawn) => score += CENTER_PAWN_ORDER_BONUS,
            Some(PieceKind::Knight) => score += CENTER_KNIGHT_ORDER_BONUS,
            _ => {}
        }
    }

    score
}

/// Sorts `moves` so the most promising are searched first. Ties keep generation order.
fn order_moves(pos: &Position, moves: &mut MoveList) {
    moves.sort_by_cached_key(|&mv| Reverse(order_score(pos, mv)));
}
