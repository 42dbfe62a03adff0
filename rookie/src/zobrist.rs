/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, sync::OnceLock};

use rand::{rngs::StdRng, Rng, SeedableRng};

use super::{Board, CastlingRights, Color, Piece, PieceKind, Position, Square};

/// Seed used for the Zobrist keys under unit tests, so hashes are reproducible.
pub const ZOBRIST_TEST_SEED: u64 = 0x5EED_0F_C0FFEE;

/// Process-wide table of random keys. Written exactly once.
static KEYS: OnceLock<ZobristKeys> = OnceLock::new();

/// The random numbers that get XOR'd together to fingerprint a position.
struct ZobristKeys {
    pieces: [[[u64; Square::COUNT]; PieceKind::COUNT]; Color::COUNT],
    castling: [[u64; 4]; Color::COUNT],
    ep_file: [u64; 8],
    side_to_move: u64,
}

impl ZobristKeys {
    fn from_seed(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);

        let mut pieces = [[[0; Square::COUNT]; PieceKind::COUNT]; Color::COUNT];
        for keys in pieces.iter_mut().flatten().flatten() {
            *keys = rng.random();
        }

        let mut castling = [[0; 4]; Color::COUNT];
        for color in Color::all() {
            // Index 0 means "no rights", which must not perturb the hash.
            for key in castling[color].iter_mut().skip(1) {
                *key = rng.random();
            }
        }

        let mut ep_file = [0; 8];
        for key in ep_file.iter_mut() {
            *key = rng.random();
        }

        Self {
            pieces,
            castling,
            ep_file,
            side_to_move: rng.random(),
        }
    }
}

/// Seeds the process-wide Zobrist keys.
///
/// Must be called before the first [`Position`] is created to have any effect.
/// Returns `false` if the keys were already initialized (with this or another seed).
pub fn init_keys(seed: u64) -> bool {
    KEYS.set(ZobristKeys::from_seed(seed)).is_ok()
}

#[inline(always)]
fn keys() -> &'static ZobristKeys {
    KEYS.get_or_init(|| {
        let seed = if cfg!(test) {
            ZOBRIST_TEST_SEED
        } else {
            rand::random()
        };
        ZobristKeys::from_seed(seed)
    })
}

/// A 64-bit fingerprint of a [`Position`], maintained incrementally as moves are made.
///
/// Two positions with the same piece layout, side to move, castling rights and en passant square share a key.
/// Move counters are not part of the key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ZobristKey(u64);

impl ZobristKey {
    /// Computes the key of `position` from scratch.
    pub fn new(position: &Position) -> Self {
        Self::from_parts(
            position.board(),
            position.ep_square(),
            position.castling_rights(),
            position.side_to_move(),
        )
    }

    /// Computes a key from the individual components of a position.
    pub fn from_parts(
        board: &Board,
        ep_square: Option<Square>,
        castling_rights: &[CastlingRights; Color::COUNT],
        side_to_move: Color,
    ) -> Self {
        let mut key = Self::default();

        for (square, piece) in board {
            key.hash_piece(square, piece);
        }

        key.hash_optional_ep_square(ep_square);
        key.hash_castling_rights(castling_rights);
        key.hash_side_to_move(side_to_move);

        key
    }

    /// The raw 64-bit value of this key.
    #[inline(always)]
    pub const fn inner(&self) -> u64 {
        self.0
    }

    /// Adds or removes `piece` on `square`.
    #[inline(always)]
    pub fn hash_piece(&mut self, square: Square, piece: Piece) {
        self.0 ^= keys().pieces[piece.color()][piece.kind()][square];
    }

    /// Adds or removes the en passant square.
    #[inline(always)]
    pub fn hash_ep_square(&mut self, ep_square: Square) {
        self.0 ^= keys().ep_file[ep_square.file().index()];
    }

    /// Adds or removes the en passant square, if there is one.
    #[inline(always)]
    pub fn hash_optional_ep_square(&mut self, ep_square: Option<Square>) {
        if let Some(ep_square) = ep_square {
            self.hash_ep_square(ep_square);
        }
    }

    /// Adds or removes both colors' castling rights.
    #[inline(always)]
    pub fn hash_castling_rights(&mut self, castling_rights: &[CastlingRights; Color::COUNT]) {
        for color in Color::all() {
            self.0 ^= keys().castling[color][castling_rights[color].index()];
        }
    }

    /// Toggles the side-to-move component. Only Black to move contributes to the key.
    #[inline(always)]
    pub fn hash_side_to_move(&mut self, color: Color) {
        if color == Color::Black {
            self.0 ^= keys().side_to_move;
        }
    }

    /// Flips the side-to-move component unconditionally, as happens after every move.
    #[inline(always)]
    pub fn toggle_side_to_move(&mut self) {
        self.0 ^= keys().side_to_move;
    }
}

impl fmt::Display for ZobristKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

impl fmt::Debug for ZobristKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ZobristKey({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_deterministic_for_a_seed() {
        let a = ZobristKeys::from_seed(7);
        let b = ZobristKeys::from_seed(7);
        let c = ZobristKeys::from_seed(8);

        assert_eq!(a.side_to_move, b.side_to_move);
        assert_eq!(a.pieces, b.pieces);
        assert_ne!(a.side_to_move, c.side_to_move);
    }

    #[test]
    fn empty_castling_rights_do_not_affect_the_key() {
        let keys = ZobristKeys::from_seed(ZOBRIST_TEST_SEED);
        assert_eq!(keys.castling[Color::White][0], 0);
        assert_eq!(keys.castling[Color::Black][0], 0);
    }

    #[test]
    fn startpos_key_is_stable_under_tests() {
        let a = Position::default().key();
        let b = Position::default().key();
        assert_eq!(a, b);
        assert_ne!(a.inner(), 0);
    }
}
