/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use super::{attacks::KING_OFFSETS, Board, Color, File, PieceKind, Position, Square};

/// Score of a position in which the side to move has been checkmated, negated.
pub const MATE_SCORE: i32 = 20_000;

/// Non-pawn, non-king material (both sides combined) below which the King switches to its endgame table.
pub const ENDGAME_MATERIAL_THRESHOLD: i32 = 2500;

/// Bonus per legal move available to the side to move.
const MOBILITY_BONUS: i32 = 5;
const DOUBLED_PAWN_PENALTY: i32 = 20;
const ISOLATED_PAWN_PENALTY: i32 = 10;
const PASSED_PAWN_BONUS_PER_RANK: i32 = 10;
const KING_DEFENDER_BONUS: i32 = 5;
const EXPOSED_KING_PENALTY: i32 = 20;

/// Material value of a piece kind, in centipawns.
#[inline(always)]
pub const fn piece_value(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::Pawn => 100,
        PieceKind::Knight => 320,
        PieceKind::Bishop => 330,
        PieceKind::Rook => 500,
        PieceKind::Queen => 900,
        PieceKind::King => 20_000,
    }
}

// Piece-square tables are written as seen from White's side of the board: the first row is rank 8.

#[rustfmt::skip]
const PAWN_TABLE: [i32; Square::COUNT] = [
     0,  0,  0,  0,  0,  0,  0,  0,
    50, 50, 50, 50, 50, 50, 50, 50,
    10, 10, 20, 30, 30, 20, 10, 10,
     5,  5, 10, 25, 25, 10,  5,  5,
     0,  0,  0, 20, 20,  0,  0,  0,
     5, -5,-10,  0,  0,-10, -5,  5,
     5, 10, 10,-20,-20, 10, 10,  5,
     0,  0,  0,  0,  0,  0,  0,  0,
];

#[rustfmt::skip]
const KNIGHT_TABLE: [i32; Square::COUNT] = [
    -50,-40,-30,-30,-30,-30,-40,-50,
    -40,-20,  0,  0,  0,  0,-20,-40,
    -30,  0, 10, 15, 15, 10,  0,-30,
    -30,  5, 15, 20, 20, 15,  5,-30,
    -30,  0, 15, 20, 20, 15,  0,-30,
    -30,  5, 10, 15, 15, 10,  5,-30,
    -40,-20,  0,  5,  5,  0,-20,-40,
    -50,-40,-30,-30,-30,-30,-40,-50,
];

#[rustfmt::skip]
const BISHOP_TABLE: [i32; Square::COUNT] = [
    -20,-10,-10,-10,-10,-10,-10,-20,
    -10,  0,  0,  0,  0,  0,  0,-10,
    -10,  0, 10, 10, 10, 10,  0,-10,
    -10,  5,  5, 10, 10,  5,  5,-10,
    -10,  0,  5, 10, 10,  5,  0,-10,
    -10,  5,  5,  5,  5,  5,  5,-10,
    -10,  0,  5,  0,  0,  5,  0,-10,
    -20,-10,-10,-10,-10,-10,-10,-20,
];

#[rustfmt::skip]
const ROOK_TABLE: [i32; Square::COUNT] = [
     0,  0,  0,  0,  0,  0,  0,  0,
     5, 10, 10, 10, 10, 10, 10,  5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
     0,  0,  0,  5,  5,  0,  0,  0,
];

#[rustfmt::skip]
const QUEEN_TABLE: [i32; Square::COUNT] = [
    -20,-10,-10, -5, -5,-10,-10,-20,
    -10,  0,  0,  0,  0,  0,  0,-10,
    -10,  0,  5,  5,  5,  5,  0,-10,
     -5,  0,  5,  5,  5,  5,  0, -5,
      0,  0,  5,  5,  5,  5,  0, -5,
    -10,  5,  5,  5,  5,  5,  0,-10,
    -10,  0,  5,  0,  0,  0,  0,-10,
    -20,-10,-10, -5, -5,-10,-10,-20,
];

#[rustfmt::skip]
const KING_MIDDLEGAME_TABLE: [i32; Square::COUNT] = [
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -20,-30,-30,-40,-40,-30,-30,-20,
    -10,-20,-20,-20,-20,-20,-20,-10,
     20, 20,  0,  0,  0,  0, 20, 20,
     20, 30, 10,  0,  0, 10, 30, 20,
];

#[rustfmt::skip]
const KING_ENDGAME_TABLE: [i32; Square::COUNT] = [
    -50,-40,-30,-20,-20,-30,-40,-50,
    -30,-20,-10,  0,  0,-10,-20,-30,
    -30,-10, 20, 30, 30, 20,-10,-30,
    -30,-10, 30, 40, 40, 30,-10,-30,
    -30,-10, 30, 40, 40, 30,-10,-30,
    -30,-10, 20, 30, 30, 20,-10,-30,
    -30,-20,-10,  0,  0,-10,-20,-30,
    -50,-40,-30,-20,-20,-30,-40,-50,
];

/// Statically evaluates `position`, in centipawns, from the perspective of the side to move.
///
/// Positive scores favor the side to move. A checkmated side to move scores `-MATE_SCORE`, and a stalemate
/// scores exactly `0`.
///
/// # Example
/// ```
/// # use rookie::*;
/// // Everything is symmetric except White's 20 available moves
/// assert_eq!(eval::evaluate(&Position::default()), 100);
/// ```
pub fn evaluate(position: &Position) -> i32 {
    evaluate_with_move_count(position, position.legal_moves().len())
}

/// Like [`evaluate`], for callers that already know how many legal moves the side to move has.
pub fn evaluate_with_move_count(position: &Position, legal_moves: usize) -> i32 {
    if legal_moves == 0 {
        return if position.is_in_check() { -MATE_SCORE } else { 0 };
    }

    let board = position.board();
    let color = position.side_to_move();
    let endgame = is_endgame(board);

    let side = |color: Color| {
        material(board, color)
            + piece_squares(board, color, endgame)
            + pawn_structure(board, color)
            + king_safety(board, color)
    };

    side(color) - side(color.opponent()) + MOBILITY_BONUS * legal_moves as i32
}

/// Returns `true` if the combined non-pawn, non-king material of both sides is below [`ENDGAME_MATERIAL_THRESHOLD`].
pub fn is_endgame(board: &Board) -> bool {
    let material = board
        .iter()
        .filter(|(_, piece)| !piece.is_pawn() && !piece.is_king())
        .map(|(_, piece)| piece_value(piece.kind()))
        .sum::<i32>();

    material < ENDGAME_MATERIAL_THRESHOLD
}

/// Sum of the material values of `color`'s pieces, King included.
pub fn material(board: &Board, color: Color) -> i32 {
    board
        .iter()
        .filter(|(_, piece)| piece.color() == color)
        .map(|(_, piece)| piece_value(piece.kind()))
        .sum()
}

/// Sum of the piece-square table entries of `color`'s pieces.
pub fn piece_squares(board: &Board, color: Color, endgame: bool) -> i32 {
    board
        .iter()
        .filter(|(_, piece)| piece.color() == color)
        .map(|(square, piece)| {
            let table = match piece.kind() {
                PieceKind::Pawn => &PAWN_TABLE,
                PieceKind::Knight => &KNIGHT_TABLE,
                PieceKind::Bishop => &BISHOP_TABLE,
                PieceKind::Rook => &ROOK_TABLE,
                PieceKind::Queen => &QUEEN_TABLE,
                PieceKind::King if endgame => &KING_ENDGAME_TABLE,
                PieceKind::King => &KING_MIDDLEGAME_TABLE,
            };

            // Tables list rank 8 first, so White reads them flipped and Black reads them as-is
            let index = match color {
                Color::White => square.flipped(),
                Color::Black => square,
            };
            table[index]
        })
        .sum()
}

/// Penalties for doubled and isolated Pawns, plus bonuses for passed Pawns, for `color`.
///
/// Only the most advanced Pawn on each file can be passed: it must have no enemy Pawn ahead of it on its own
/// file or either adjacent file.
pub fn pawn_structure(board: &Board, color: Color) -> i32 {
    let mut counts = [0; File::COUNT];
    let mut frontmost: [Option<u8>; File::COUNT] = [None; File::COUNT];
    let mut enemy_pawns = Vec::with_capacity(8);

    for (square, piece) in board.iter().filter(|(_, piece)| piece.is_pawn()) {
        let file = square.file().index();
        let rank = square.rank().relative_to(color);

        if piece.color() == color {
            counts[file] += 1;
            frontmost[file] = frontmost[file].max(Some(rank));
        } else {
            enemy_pawns.push((file, rank));
        }
    }

    let mut score = 0;
    for file in 0..File::COUNT {
        let count = counts[file];
        if count == 0 {
            continue;
        }

        if count > 1 {
            score -= DOUBLED_PAWN_PENALTY * (count - 1);
        }

        let has_neighbor =
            (file > 0 && counts[file - 1] > 0) || (file + 1 < File::COUNT && counts[file + 1] > 0);
        if !has_neighbor {
            score -= ISOLATED_PAWN_PENALTY;
        }

        if let Some(rank) = frontmost[file] {
            let blocked = enemy_pawns
                .iter()
                .any(|&(enemy_file, enemy_rank)| enemy_file.abs_diff(file) <= 1 && enemy_rank > rank);

            if !blocked {
                score += PASSED_PAWN_BONUS_PER_RANK * rank as i32;
            }
        }
    }

    score
}

/// Bonus for friendly pieces around `color`'s King, minus a penalty if it has left its two home ranks.
pub fn king_safety(board: &Board, color: Color) -> i32 {
    let Some(king) = board.king_square(color) else {
        return 0;
    };

    let defenders = KING_OFFSETS
        .iter()
        .filter_map(|&(df, dr)| king.offset(df, dr))
        .filter(|&square| board.color_at(square) == Some(color))
        .count() as i32;

    let mut score = KING_DEFENDER_BONUS * defenders;
    if king.rank().relative_to(color) > 1 {
        score -= EXPOSED_KING_PENALTY;
    }

    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FEN_STARTPOS;

    fn pos(fen: &str) -> Position {
        Position::from_fen(fen).unwrap()
    }

    fn pawn_balance(fen: &str) -> i32 {
        let pos = pos(fen);
        pawn_structure(pos.board(), Color::White) - pawn_structure(pos.board(), Color::Black)
    }

    #[test]
    fn startpos_is_balanced_except_for_mobility() {
        let pos = pos(FEN_STARTPOS);
        let board = pos.board();

        assert_eq!(material(board, Color::White), material(board, Color::Black));
        assert_eq!(
            piece_squares(board, Color::White, false),
            piece_squares(board, Color::Black, false)
        );
        assert_eq!(pawn_balance(FEN_STARTPOS), 0);
        assert_eq!(king_safety(board, Color::White), king_safety(board, Color::Black));
        assert!(!is_endgame(board));

        assert_eq!(evaluate(&pos), 100);
    }

    #[test]
    fn extra_knight_is_worth_more_than_three_pawns() {
        // The missing Knight stood on a -40 square, so White gains 320 + 40
        let white_up = pos("rnbqkb1r/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
        assert!(evaluate(&white_up) > 300);
        assert_eq!(evaluate(&white_up), 360 + MOBILITY_BONUS * 20);

        // Same imbalance, Black to move: scores are relative to the side to move
        let black_down = pos("rnbqkb1r/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR b KQkq - 0 1");
        assert_eq!(evaluate(&black_down), -360 + MOBILITY_BONUS * 19);
    }

    #[test]
    fn terminal_positions() {
        let mated = pos("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1");
        assert_eq!(evaluate(&mated), -MATE_SCORE);

        let stalemate = pos("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
        assert_eq!(evaluate(&stalemate), 0);
    }

    #[test]
    fn doubled_pawns_are_penalized() {
        assert!(pawn_balance("rnbqkbnr/pppppppp/8/8/8/P7/PPPPPPPP/RNBQKBNR w KQkq - 0 1") < 0);
    }

    #[test]
    fn isolated_pawns_are_penalized() {
        // Black's b- and d-pawns are separated from their neighbors' files by empty a/c files
        assert!(pawn_balance("rnbqkbnr/p1p1pppp/8/1p1p4/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1") > 0);

        let board = *pos("4k3/8/8/8/8/8/P1P5/4K3 w - - 0 1").board();
        assert_eq!(pawn_structure(&board, Color::White), -2 * ISOLATED_PAWN_PENALTY + 10 + 10);
    }

    #[test]
    fn passed_pawns_grow_as_they_advance() {
        let on_fifth = *pos("4k3/8/8/4P3/8/8/8/4K3 w - - 0 1").board();
        let on_sixth = *pos("4k3/8/4P3/8/8/8/8/4K3 w - - 0 1").board();

        // Isolated, but passed
        assert_eq!(pawn_structure(&on_fifth, Color::White), 40 - ISOLATED_PAWN_PENALTY);
        assert_eq!(pawn_structure(&on_sixth, Color::White), 50 - ISOLATED_PAWN_PENALTY);

        // Black's bonus mirrors White's
        let black = *pos("4k3/8/8/8/4p3/8/8/4K3 w - - 0 1").board();
        assert_eq!(pawn_structure(&black, Color::Black), 40 - ISOLATED_PAWN_PENALTY);

        // A Pawn on an adjacent file ahead stops it from being passed
        let blocked = *pos("4k3/3p4/8/4P3/8/8/8/4K3 w - - 0 1").board();
        assert_eq!(pawn_structure(&blocked, Color::White), -ISOLATED_PAWN_PENALTY);
    }

    #[test]
    fn exposed_king_is_penalized() {
        let board = *pos("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQK2R w KQkq - 0 1").board();
        assert!(king_safety(&board, Color::White) < king_safety(&board, Color::Black));

        let wandering = *pos("4k3/8/8/8/8/4K3/8/8 w - - 0 1").board();
        assert_eq!(king_safety(&wandering, Color::White), -EXPOSED_KING_PENALTY);
    }

    #[test]
    fn king_switches_tables_in_the_endgame() {
        let board = *pos("4k3/8/8/8/8/8/8/4K3 w - - 0 1").board();
        assert!(is_endgame(&board));

        // e1 is -20 on the endgame table (0 on the middlegame table)
        assert_eq!(piece_squares(&board, Color::White, true), -20);
        assert_eq!(piece_squares(&board, Color::White, false), 0);
    }
}
