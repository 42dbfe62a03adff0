/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use rookie::*;

/// Every square attacked by the piece on `from`, found by walking its movement pattern.
fn squares_attacked_from(board: &Board, from: Square, piece: Piece) -> Vec<Square> {
    let steps = |offsets: &[(i8, i8)]| -> Vec<Square> {
        offsets
            .iter()
            .filter_map(|&(df, dr)| from.offset(df, dr))
            .collect()
    };

    let slides = |directions: &[(i8, i8)]| -> Vec<Square> {
        let mut squares = Vec::new();
        for &(df, dr) in directions {
            let mut current = from;
            while let Some(next) = current.offset(df, dr) {
                squares.push(next);
                if board.has(next) {
                    break;
                }
                current = next;
            }
        }
        squares
    };

    let straight = [(0, 1), (1, 0), (0, -1), (-1, 0)];
    let diagonal = [(1, 1), (1, -1), (-1, -1), (-1, 1)];

    match piece.kind() {
        PieceKind::Pawn => {
            let forward = piece.color().sign() as i8;
            steps(&[(-1, forward), (1, forward)])
        }
        PieceKind::Knight => steps(&[
            (1, 2),
            (2, 1),
            (2, -1),
            (1, -2),
            (-1, -2),
            (-2, -1),
            (-2, 1),
            (-1, 2),
        ]),
        PieceKind::Bishop => slides(&diagonal),
        PieceKind::Rook => slides(&straight),
        PieceKind::Queen => [slides(&straight), slides(&diagonal)].concat(),
        PieceKind::King => steps(&[
            (0, 1),
            (1, 1),
            (1, 0),
            (1, -1),
            (0, -1),
            (-1, -1),
            (-1, 0),
            (-1, 1),
        ]),
    }
}

fn naive_is_attacked(board: &Board, target: Square, by: Color) -> bool {
    board
        .iter()
        .filter(|(_, piece)| piece.color() == by)
        .any(|(from, piece)| squares_attacked_from(board, from, piece).contains(&target))
}

fn assert_oracle_matches(pos: &Position) {
    for square in Square::iter() {
        for color in Color::all() {
            assert_eq!(
                attacks::is_square_attacked(pos.board(), square, color),
                naive_is_attacked(pos.board(), square, color),
                "{square} attacked by {color:?} in {pos}"
            );
        }
    }
}

#[test]
fn oracle_matches_naive_enumeration() {
    let fens = [
        FEN_STARTPOS,
        FEN_KIWIPETE,
        FEN_ENDGAME,
        "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
        "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
    ];

    for fen in fens {
        let pos = Position::from_fen(fen).unwrap();
        assert_oracle_matches(&pos);

        // Widen the sample with every position one and two plies away
        for mv in pos.legal_moves() {
            let child = pos.apply_move(mv);
            assert_oracle_matches(&child);

            for reply in child.legal_moves().into_iter().take(8) {
                assert_oracle_matches(&child.apply_move(reply));
            }
        }
    }
}
