/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// FEN string for the standard starting position.
pub const FEN_STARTPOS: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// FEN string for "Kiwipete", a position dense with castling, en passant and pins.
///
/// See <https://www.chessprogramming.org/Perft_Results#Position_2>.
pub const FEN_KIWIPETE: &str =
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

/// FEN string for a sparse rook-and-pawn endgame full of en passant discoveries.
///
/// See <https://www.chessprogramming.org/Perft_Results#Position_3>.
pub const FEN_ENDGAME: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";

/// Maximum number of legal moves reachable in any single position.
///
/// See <https://www.chessprogramming.org/Encoding_Moves#MoveIndex>.
pub const MAX_NUM_MOVES: usize = 218;

