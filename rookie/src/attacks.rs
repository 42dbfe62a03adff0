/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use super::{Board, Color, Piece, PieceKind, Square};

/// `(file, rank)` steps of a Knight.
pub(crate) const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

/// `(file, rank)` steps of a King.
pub(crate) const KING_OFFSETS: [(i8, i8); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

/// Ray directions of a Rook.
pub(crate) const ORTHOGONAL_DIRECTIONS: [(i8, i8); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

/// Ray directions of a Bishop.
pub(crate) const DIAGONAL_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];

/// Ray directions for a sliding piece of the given kind. Empty for non-sliders.
#[inline(always)]
pub(crate) fn slider_directions(kind: PieceKind) -> &'static [(i8, i8)] {
    const QUEEN: [(i8, i8); 8] = [
        (0, 1),
        (1, 0),
        (0, -1),
        (-1, 0),
        (1, 1),
        (1, -1),
        (-1, -1),
        (-1, 1),
    ];

    match kind {
        PieceKind::Bishop => &DIAGONAL_DIRECTIONS,
        PieceKind::Rook => &ORTHOGONAL_DIRECTIONS,
        PieceKind::Queen => &QUEEN,
        _ => &[],
    }
}

/// Iterates the squares along a ray from `square` (exclusive) to the board edge.
#[inline(always)]
pub(crate) fn ray(square: Square, (df, dr): (i8, i8)) -> impl Iterator<Item = Square> {
    std::iter::successors(square.offset(df, dr), move |sq| sq.offset(df, dr))
}

/// Occupant of the first non-empty square along a ray from `square`.
#[inline(always)]
fn first_occupant(board: &Board, square: Square, direction: (i8, i8)) -> Option<Piece> {
    ray(square, direction).find_map(|sq| board.piece_at(sq))
}

/// Returns `true` if any piece of color `by` attacks `square`.
///
/// A piece attacks every square it could reach in one step by its movement rule, whether or not
/// the resulting move would be legal, and regardless of what occupies `square`.
/// Pawns only attack diagonally forward.
///
/// Rather than generating every enemy move, this looks outward from `square` with each kind's
/// movement pattern reversed and checks what it finds.
///
/// # Example
/// ```
/// # use rookie::*;
/// let pos = Position::default();
/// assert!(attacks::is_square_attacked(pos.board(), Square::F3, Color::White));
/// assert!(!attacks::is_square_attacked(pos.board(), Square::E4, Color::White));
/// assert!(attacks::is_square_attacked(pos.board(), Square::F6, Color::Black));
/// ```
pub fn is_square_attacked(board: &Board, square: Square, by: Color) -> bool {
    let is = |sq: Option<Square>, kind: PieceKind| {
        sq.and_then(|sq| board.piece_at(sq)) == Some(Piece::new(by, kind))
    };

    // A `by` Pawn attacks from one rank "behind" the target, on either adjacent file
    let behind = -(by.sign() as i8);
    if is(square.offset(-1, behind), PieceKind::Pawn) || is(square.offset(1, behind), PieceKind::Pawn)
    {
        return true;
    }

    if KNIGHT_OFFSETS
        .iter()
        .any(|&(df, dr)| is(square.offset(df, dr), PieceKind::Knight))
    {
        return true;
    }

    if KING_OFFSETS
        .iter()
        .any(|&(df, dr)| is(square.offset(df, dr), PieceKind::King))
    {
        return true;
    }

    let slides = |directions: &[(i8, i8)], kind: PieceKind| {
        directions.iter().any(|&direction| {
            first_occupant(board, square, direction)
                .is_some_and(|p| p.color() == by && (p.kind() == kind || p.kind() == PieceKind::Queen))
        })
    };

    slides(&ORTHOGONAL_DIRECTIONS, PieceKind::Rook) || slides(&DIAGONAL_DIRECTIONS, PieceKind::Bishop)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Position;

    fn board(fen: &str) -> Board {
        *Position::from_fen(fen).unwrap().board()
    }

    #[test]
    fn pawns_attack_forward_diagonals_only() {
        let board = board("4k3/8/8/3p4/3P4/8/8/4K3 w - - 0 1");

        assert!(is_square_attacked(&board, Square::C5, Color::White));
        assert!(is_square_attacked(&board, Square::E5, Color::White));
        assert!(!is_square_attacked(&board, Square::D5, Color::White));
        assert!(!is_square_attacked(&board, Square::C3, Color::White));

        assert!(is_square_attacked(&board, Square::C4, Color::Black));
        assert!(is_square_attacked(&board, Square::E4, Color::Black));
        assert!(!is_square_attacked(&board, Square::E6, Color::Black));
    }

    #[test]
    fn sliders_stop_at_first_occupant() {
        let board = board("4k3/8/8/8/R2n3q/8/8/4K3 w - - 0 1");

        // The blocker itself is attacked, whatever its color
        assert!(is_square_attacked(&board, Square::D4, Color::White));
        assert!(!is_square_attacked(&board, Square::E4, Color::White));
        assert!(is_square_attacked(&board, Square::A8, Color::White));

        // Black's queen sees through empty squares but not through its own knight
        assert!(is_square_attacked(&board, Square::E4, Color::Black));
        assert!(!is_square_attacked(&board, Square::C4, Color::Black));
        assert!(is_square_attacked(&board, Square::E1, Color::Black));
    }

    #[test]
    fn knights_and_kings_use_fixed_offsets() {
        let board = board("4k3/8/8/8/8/8/8/N3K3 w - - 0 1");

        assert!(is_square_attacked(&board, Square::B3, Color::White));
        assert!(is_square_attacked(&board, Square::C2, Color::White));
        assert!(!is_square_attacked(&board, Square::B2, Color::White));
        assert!(!is_square_attacked(&board, Square::C3, Color::White));

        assert!(is_square_attacked(&board, Square::D7, Color::Black));
        assert!(!is_square_attacked(&board, Square::E6, Color::Black));
    }
}
