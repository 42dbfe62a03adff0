/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use super::{
    attacks::{ray, slider_directions, KING_OFFSETS, KNIGHT_OFFSETS},
    position::castling_rook_squares,
    Board, Color, Move, MoveKind, Piece, PieceKind, Position, Rank, Square, MAX_NUM_MOVES,
};

/// An alias for an [`arrayvec::ArrayVec`] containing at most [`MAX_NUM_MOVES`] moves.
pub type MoveList = arrayvec::ArrayVec<Move, MAX_NUM_MOVES>;

/// Generates every legal move for the side to move in `position`.
///
/// Each pseudo-legal move is made on a scratch copy of the position and kept only if the mover's King is not
/// attacked afterwards. This one rule covers pins, checks, en passant discoveries and King moves alike.
///
/// # Example
/// ```
/// # use rookie::*;
/// let moves = movegen::legal_moves(&Position::default());
/// assert_eq!(moves.len(), 20);
/// ```
pub fn legal_moves(position: &Position) -> MoveList {
    let color = position.side_to_move();
    let mut moves = MoveList::new();
    let mut scratch = *position;

    generate_pseudo_legal(position, |mv| {
        let undo = scratch.make_move(mv);
        if !scratch.is_square_attacked(scratch.king_square(color), color.opponent()) {
            moves.push(mv);
        }
        scratch.unmake_move(mv, undo);
    });

    moves
}

/// Every pseudo-legal move for the side to move: moves that follow each piece's movement rules,
/// without checking whether they leave the mover's own King attacked.
pub fn pseudo_legal_moves(position: &Position) -> Vec<Move> {
    let mut moves = Vec::with_capacity(MAX_NUM_MOVES);
    generate_pseudo_legal(position, |mv| moves.push(mv));
    moves
}

/// Calls `emit` once for every pseudo-legal move for the side to move.
///
/// Castling is the exception to "no safety checks": it is only emitted if the King's origin, transit and
/// destination squares are all unattacked.
pub fn generate_pseudo_legal(position: &Position, mut emit: impl FnMut(Move)) {
    let color = position.side_to_move();
    let board = position.board();

    for (from, piece) in board {
        if piece.color() != color {
            continue;
        }

        match piece.kind() {
            PieceKind::Pawn => pawn_moves(position, from, color, &mut emit),
            PieceKind::Knight => step_moves(board, from, color, &KNIGHT_OFFSETS, &mut emit),
            PieceKind::King => {
                step_moves(board, from, color, &KING_OFFSETS, &mut emit);
                castling_moves(position, from, color, &mut emit);
            }
            kind => slider_moves(board, from, color, slider_directions(kind), &mut emit),
        }
    }
}

/// Emits a Pawn move, expanding it into all four promotions if it lands on the last rank.
#[inline(always)]
fn emit_pawn_move(from: Square, to: Square, kind: MoveKind, color: Color, emit: &mut impl FnMut(Move)) {
    if to.rank() == Rank::eighth(color) {
        for promotion in PieceKind::PROMOTIONS {
            emit(Move::new_promotion(from, to, kind, promotion));
        }
    } else {
        emit(Move::new(from, to, kind));
    }
}

fn pawn_moves(position: &Position, from: Square, color: Color, emit: &mut impl FnMut(Move)) {
    let board = position.board();

    // Pushes
    if let Some(single) = from.forward_by(color, 1).filter(|&to| !board.has(to)) {
        emit_pawn_move(from, single, MoveKind::Quiet, color, emit);

        if from.rank() == Rank::second(color) {
            if let Some(double) = from.forward_by(color, 2).filter(|&to| !board.has(to)) {
                emit(Move::new(from, double, MoveKind::PawnDoublePush));
            }
        }
    }

    // Captures, including en passant
    let forward = color.sign() as i8;
    for to in [from.offset(-1, forward), from.offset(1, forward)].into_iter().flatten() {
        match board.piece_at(to) {
            Some(target) if target.color() != color => {
                emit_pawn_move(from, to, MoveKind::Capture, color, emit);
            }
            None if position.ep_square() == Some(to) => {
                // The double-pushed Pawn sits beside us, on the destination file
                let victim = Piece::new(color.opponent(), PieceKind::Pawn);
                if board.piece_at(Square::new(to.file(), from.rank())) == Some(victim) {
                    emit(Move::new(from, to, MoveKind::EnPassantCapture));
                }
            }
            _ => {}
        }
    }
}

/// Moves for pieces that jump by fixed offsets (Knight and King).
fn step_moves(
    board: &Board,
    from: Square,
    color: Color,
    offsets: &[(i8, i8)],
    emit: &mut impl FnMut(Move),
) {
    for to in offsets.iter().filter_map(|&(df, dr)| from.offset(df, dr)) {
        match board.color_at(to) {
            None => emit(Move::new(from, to, MoveKind::Quiet)),
            Some(occupant) if occupant != color => emit(Move::new(from, to, MoveKind::Capture)),
            _ => {}
        }
    }
}

/// Moves for pieces that slide along rays (Bishop, Rook, Queen).
fn slider_moves(
    board: &Board,
    from: Square,
    color: Color,
    directions: &[(i8, i8)],
    emit: &mut impl FnMut(Move),
) {
    for &direction in directions {
        for to in ray(from, direction) {
            match board.color_at(to) {
                None => emit(Move::new(from, to, MoveKind::Quiet)),
                Some(occupant) => {
                    if occupant != color {
                        emit(Move::new(from, to, MoveKind::Capture));
                    }
                    break;
                }
            }
        }
    }
}

fn castling_moves(position: &Position, from: Square, color: Color, emit: &mut impl FnMut(Move)) {
    let board = position.board();
    let rights = position.castling_rights_for(color);
    let enemy = color.opponent();

    if !position.can_castle(color) || from != Square::E1.rank_relative_to(color) {
        return;
    }

    for (short, allowed, kind) in [
        (true, rights.short(), MoveKind::ShortCastle),
        (false, rights.long(), MoveKind::LongCastle),
    ] {
        if !allowed {
            continue;
        }

        let (rook_square, _) = castling_rook_squares(color, short);
        if board.piece_at(rook_square) != Some(Piece::new(color, PieceKind::Rook)) {
            continue;
        }

        let step = if short { 1 } else { -1 };
        let (Some(transit), Some(to)) = (from.offset(step, 0), from.offset(2 * step, 0)) else {
            continue;
        };

        // Everything strictly between the King and Rook must be empty
        let path_is_clear = ray(from, (step, 0))
            .take_while(|&sq| sq != rook_square)
            .all(|sq| !board.has(sq));

        // The King may not castle out of, through, or into check
        let path_is_safe = [from, transit, to]
            .into_iter()
            .all(|sq| !position.is_square_attacked(sq, enemy));

        if path_is_clear && path_is_safe {
            emit(Move::new(from, to, kind));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FEN_KIWIPETE, FEN_STARTPOS};

    fn legal_uci(fen: &str) -> Vec<String> {
        let mut moves = legal_moves(&Position::from_fen(fen).unwrap())
            .into_iter()
            .map(|mv| mv.to_uci())
            .collect::<Vec<_>>();
        moves.sort();
        moves
    }

    #[test]
    fn startpos_has_twenty_moves() {
        let moves = legal_uci(FEN_STARTPOS);
        assert_eq!(moves.len(), 20);
        assert!(moves.contains(&String::from("e2e4")));
        assert!(moves.contains(&String::from("g1f3")));
    }

    #[test]
    fn no_move_lands_on_a_friendly_piece() {
        for fen in [FEN_STARTPOS, FEN_KIWIPETE] {
            let pos = Position::from_fen(fen).unwrap();
            for mv in pseudo_legal_moves(&pos) {
                assert_ne!(
                    pos.color_at(mv.to()),
                    Some(pos.side_to_move()),
                    "{mv} lands on a friendly piece in {fen}"
                );
            }
        }
    }

    #[test]
    fn legal_moves_are_a_subset_of_pseudo_legal_moves() {
        let pos = Position::from_fen(FEN_KIWIPETE).unwrap();
        let pseudo = pseudo_legal_moves(&pos);
        let legal = legal_moves(&pos);

        assert!(legal.len() <= pseudo.len());
        assert!(legal.iter().all(|mv| pseudo.contains(mv)));
    }

    #[test]
    fn promotions_are_never_bare() {
        let moves = legal_uci("1n2k3/P7/8/8/8/8/8/4K3 w - - 0 1");
        let pawn_moves = moves
            .iter()
            .filter(|mv| mv.starts_with("a7"))
            .collect::<Vec<_>>();

        // Four pushes and four captures
        assert_eq!(
            pawn_moves,
            ["a7a8b", "a7a8n", "a7a8q", "a7a8r", "a7b8b", "a7b8n", "a7b8q", "a7b8r"]
        );
    }

    #[test]
    fn en_passant_is_generated_only_on_the_target() {
        let pos = Position::from_fen("4k3/8/8/2pPp3/8/8/8/4K3 w - e6 0 1").unwrap();
        let ep = legal_moves(&pos)
            .into_iter()
            .filter(|mv| mv.is_en_passant())
            .collect::<Vec<_>>();

        assert_eq!(ep, [Move::new(Square::D5, Square::E6, MoveKind::EnPassantCapture)]);
    }

    #[test]
    fn en_passant_cannot_expose_the_king() {
        // Capturing would remove both pawns from the fifth rank and expose the King to the Rook
        let moves = legal_uci("8/8/8/KPp4r/8/8/8/4k3 w - c6 0 1");
        assert!(!moves.contains(&String::from("b5c6")));
    }

    #[test]
    fn pinned_pieces_stay_on_the_pin_ray() {
        let moves = legal_uci("4r1k1/8/8/8/8/8/4B3/4K3 w - - 0 1");
        assert!(!moves.iter().any(|mv| mv.starts_with("e2")));
    }

    #[test]
    fn check_must_be_answered() {
        let pos = Position::from_fen("4k3/8/8/8/8/8/3q4/4K3 w - - 0 1").unwrap();
        assert!(pos.is_in_check());
        // Capture the unprotected Queen, or step off its lines
        assert_eq!(legal_uci(&pos.to_fen()), ["e1d2", "e1f1"]);
    }

    #[test]
    fn castling_both_sides_when_clear() {
        let moves = legal_uci("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        assert!(moves.contains(&String::from("e1g1")));
        assert!(moves.contains(&String::from("e1c1")));

        let moves = legal_uci("r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1");
        assert!(moves.contains(&String::from("e8g8")));
        assert!(moves.contains(&String::from("e8c8")));
    }

    #[test]
    fn castling_requires_the_right() {
        let moves = legal_uci("r3k2r/8/8/8/8/8/8/R3K2R w Qkq - 0 1");
        assert!(!moves.contains(&String::from("e1g1")));
        assert!(moves.contains(&String::from("e1c1")));
    }

    #[test]
    fn castling_blocked_by_occupied_path() {
        // Knight on b1 is strictly between King and Rook, even though the King never crosses it
        let moves = legal_uci("r3k2r/8/8/8/8/8/8/RN2K1NR w KQkq - 0 1");
        assert!(!moves.contains(&String::from("e1g1")));
        assert!(!moves.contains(&String::from("e1c1")));
    }

    #[test]
    fn castling_blocked_by_attacked_path() {
        // Rook on f8 attacks the transit square f1
        let moves = legal_uci("4kr2/8/8/8/8/8/8/R3K2R w KQ - 0 1");
        assert!(!moves.contains(&String::from("e1g1")));
        assert!(moves.contains(&String::from("e1c1")));

        // Rook on c8 attacks the destination square c1
        let moves = legal_uci("2r1k3/8/8/8/8/8/8/R3K2R w KQ - 0 1");
        assert!(moves.contains(&String::from("e1g1")));
        assert!(!moves.contains(&String::from("e1c1")));

        // Cannot castle out of check
        let moves = legal_uci("4r1k1/8/8/8/8/8/8/R3K2R w KQ - 0 1");
        assert!(!moves.iter().any(|mv| mv == "e1g1" || mv == "e1c1"));
    }

    #[test]
    fn castling_through_attacked_b_file_is_allowed() {
        // Only the King's squares must be safe; b1 is not one of them
        let moves = legal_uci("1r2k3/8/8/8/8/8/8/R3K3 w Q - 0 1");
        assert!(moves.contains(&String::from("e1c1")));
    }
}
