/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

#![doc = include_str!("../README.md")]

pub use rookie_types::*;

/// Answers whether a square is attacked by a given side.
pub mod attacks;
/// Error type shared by everything that parses text.
mod error;
/// Static evaluation of a position, in centipawns.
pub mod eval;
/// All code related to generating moves (legal and pseudo-legal) for pieces on a board.
pub mod movegen;
/// Enums and structs for modeling the movement of a piece on a chessboard.
mod moves;
/// Utility functions for performance testing of move generation.
mod perft;
/// A chessboard, complete with piece placements, turn counters, and game state information.
mod position;
/// Iterative-deepening alpha-beta search.
mod search;
/// Memoization of search results by position.
mod ttable;
/// Zobrist keys for hashing chess positions.
pub mod zobrist;

pub use error::*;
pub use movegen::MoveList;
pub use moves::*;
pub use perft::*;
pub use position::*;
pub use search::*;
pub use ttable::*;
pub use zobrist::ZobristKey;

/// Re-exports all the things you'll need.
pub mod prelude {
    pub use crate::error::*;
    pub use crate::eval;
    pub use crate::movegen::MoveList;
    pub use crate::moves::*;
    pub use crate::perft::*;
    pub use crate::position::*;
    pub use crate::search::*;
    pub use crate::ttable::*;
    pub use crate::zobrist::ZobristKey;
    pub use rookie_types::*;
}
