/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    fmt,
    ops::{Deref, Index},
    str::FromStr,
};

use super::{
    attacks, movegen, Color, Error, File, Move, MoveKind, MoveList, Piece, PieceKind, Rank,
    Result, Square, ZobristKey, FEN_STARTPOS,
};

/// Represents the castling rights of a single player.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Default)]
pub struct CastlingRights {
    pub(crate) short: bool,
    pub(crate) long: bool,
}

impl CastlingRights {
    /// Creates a new [`CastlingRights`] that permits castling to the provided sides.
    #[inline(always)]
    pub const fn new(short: bool, long: bool) -> Self {
        Self { short, long }
    }

    /// Returns `true` if castling on the King's side is still allowed.
    #[inline(always)]
    pub const fn short(&self) -> bool {
        self.short
    }

    /// Returns `true` if castling on the Queen's side is still allowed.
    #[inline(always)]
    pub const fn long(&self) -> bool {
        self.long
    }

    /// Returns `true` if castling to either side is still allowed.
    #[inline(always)]
    pub const fn any(&self) -> bool {
        self.short || self.long
    }

    /// Creates a `usize` for indexing into lists of 4 elements.
    ///
    /// Only used internally for Zobrist hashing.
    #[inline(always)]
    pub(crate) const fn index(&self) -> usize {
        (self.short as usize) | (self.long as usize) << 1
    }
}

/// Home and destination squares of the Rook that moves when `color` castles.
#[inline(always)]
pub(crate) const fn castling_rook_squares(color: Color, short: bool) -> (Square, Square) {
    if short {
        (
            Square::H1.rank_relative_to(color),
            Square::F1.rank_relative_to(color),
        )
    } else {
        (
            Square::A1.rank_relative_to(color),
            Square::D1.rank_relative_to(color),
        )
    }
}

/// Whether the game is over, and how.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum GameStatus {
    /// The side to move is in check and has no legal moves.
    Checkmate { winner: Color },

    /// The side to move is not in check and has no legal moves.
    Stalemate,

    /// The halfmove clock has reached 100 plies.
    FiftyMoveRule,

    /// Play continues.
    Ongoing,
}

impl GameStatus {
    /// Returns `true` for every status except [`GameStatus::Ongoing`].
    #[inline(always)]
    pub const fn is_over(&self) -> bool {
        !matches!(self, Self::Ongoing)
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Checkmate { winner } => write!(f, "Checkmate, {} wins", winner.name()),
            Self::Stalemate => write!(f, "Stalemate"),
            Self::FiftyMoveRule => write!(f, "Draw by the fifty-move rule"),
            Self::Ongoing => write!(f, "Ongoing"),
        }
    }
}

/// Everything needed to reverse a call to [`Position::make_move`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Undo {
    captured: Option<Piece>,
    castling_rights: [CastlingRights; Color::COUNT],
    ep_square: Option<Square>,
    halfmove: usize,
    fullmove: usize,
    key: ZobristKey,
}

impl Undo {
    /// The piece removed from the board by the move, if any.
    #[inline(always)]
    pub const fn captured(&self) -> Option<Piece> {
        self.captured
    }
}

/// Represents the current state of the game, including move counters.
///
/// Analogous to a FEN string.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Position {
    /// Mailbox representation of the game board.
    board: Board,

    /// The [`Color`] of the current player.
    side_to_move: Color,

    /// Castling rights for each player.
    castling_rights: [CastlingRights; Color::COUNT],

    /// The square a Pawn skipped over on the previous ply, if it double-pushed.
    ep_square: Option<Square>,

    /// Used to enforce the fifty-move rule.
    ///
    /// - Incremented after each move.
    /// - Reset after a capture or a pawn moves.
    halfmove: usize,

    /// Number of moves since the beginning of the game.
    ///
    /// A fullmove is a complete turn by white and then by black.
    fullmove: usize,

    /// Zobrist hash key of this position
    key: ZobristKey,
}

impl Position {
    /// Creates a new [`Position`] from the provided FEN string.
    ///
    /// All six fields are required, and each side must have exactly one King.
    ///
    /// # Example
    /// ```
    /// # use rookie::*;
    /// let pos = Position::from_fen(FEN_KIWIPETE).unwrap();
    /// assert_eq!(pos.to_fen(), FEN_KIWIPETE);
    ///
    /// // Missing the move counters
    /// assert!(Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - -").is_err());
    /// ```
    pub fn from_fen(fen: &str) -> Result<Self> {
        let fields = fen.split_whitespace().collect::<Vec<_>>();
        let &[placements, side_to_move, castling, ep_square, halfmove, fullmove] =
            fields.as_slice()
        else {
            return Err(Error::malformed(format!(
                "FEN string must have exactly 6 fields. Got {}: {fen:?}",
                fields.len()
            )));
        };

        let board = Board::from_fen(placements)?;
        for color in Color::all() {
            let kings = board
                .iter()
                .filter(|(_, piece)| *piece == Piece::new(color, PieceKind::King))
                .count();
            if kings != 1 {
                return Err(Error::malformed(format!(
                    "{} must have exactly one King. Got {kings}",
                    color.name()
                )));
            }
        }

        let side_to_move = Color::from_uci(side_to_move).map_err(Error::malformed)?;

        // The side that just moved cannot have left its King attacked
        let waiting = side_to_move.opponent();
        if let Some(king) = board.king_square(waiting) {
            if attacks::is_square_attacked(&board, king, side_to_move) {
                return Err(Error::malformed(format!(
                    "{} is in check but it is {}'s turn",
                    waiting.name(),
                    side_to_move.name()
                )));
            }
        }
        let castling_rights = parse_castling_rights(castling)?;

        let ep_square = parse_ep_square(ep_square, &board, side_to_move)?;

        let halfmove = halfmove.parse().map_err(|_| {
            Error::malformed(format!(
                "FEN string must have valid halfmove counter. Got {halfmove:?}"
            ))
        })?;

        let fullmove = match fullmove.parse() {
            Ok(n) if n > 0 => n,
            _ => {
                return Err(Error::malformed(format!(
                    "FEN string must have a positive fullmove counter. Got {fullmove:?}"
                )))
            }
        };

        let key = ZobristKey::from_parts(&board, ep_square, &castling_rights, side_to_move);

        Ok(Self {
            board,
            side_to_move,
            castling_rights,
            ep_square,
            halfmove,
            fullmove,
            key,
        })
    }

    /// Generates a FEN string from this [`Position`].
    pub fn to_fen(&self) -> String {
        let placements = self.board().to_fen();
        let active_color = self.side_to_move();
        let castling = self.castling_rights_uci();

        let en_passant_target = if let Some(square) = self.ep_square {
            square.to_string()
        } else {
            String::from("-")
        };

        let halfmove = self.halfmove;
        let fullmove = self.fullmove;

        format!("{placements} {active_color} {castling} {en_passant_target} {halfmove} {fullmove}")
    }

    /// Returns the current player as a [`Color`].
    #[inline(always)]
    pub const fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// If en passant can be performed, returns the en passant [`Square`].
    #[inline(always)]
    pub const fn ep_square(&self) -> Option<Square> {
        self.ep_square
    }

    /// Returns the [`CastlingRights`] of the current position.
    #[inline(always)]
    pub const fn castling_rights(&self) -> &[CastlingRights; Color::COUNT] {
        &self.castling_rights
    }

    /// Returns the [`CastlingRights`] for `color` in the current position.
    #[inline(always)]
    pub const fn castling_rights_for(&self, color: Color) -> &CastlingRights {
        &self.castling_rights[color.index()]
    }

    /// Returns the castling field of this position's FEN string.
    pub fn castling_rights_uci(&self) -> String {
        let mut castling = String::with_capacity(4);

        if self.castling_rights[Color::White].short {
            castling.push('K');
        }
        if self.castling_rights[Color::White].long {
            castling.push('Q');
        }
        if self.castling_rights[Color::Black].short {
            castling.push('k');
        }
        if self.castling_rights[Color::Black].long {
            castling.push('q');
        }

        // If no side can castle, use a hyphen
        if castling.is_empty() {
            castling = String::from("-");
        }
        castling
    }

    /// Returns the half-move counter of the current position.
    #[inline(always)]
    pub const fn halfmove(&self) -> usize {
        self.halfmove
    }

    /// Returns the full-move counter of the current position.
    #[inline(always)]
    pub const fn fullmove(&self) -> usize {
        self.fullmove
    }

    /// Fetch the Zobrist hash key of this position.
    #[inline(always)]
    pub const fn key(&self) -> ZobristKey {
        self.key
    }

    /// Returns `true` if the half-move counter is 100 or greater.
    ///
    /// Since "half-move" increases with ply, the 50-move rule takes effect at 100 ply.
    #[inline(always)]
    pub const fn can_draw_by_fifty(&self) -> bool {
        self.halfmove() >= 100
    }

    /// Fetches this position's [`Board`]
    #[inline(always)]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// Returns `true` if `color` can castle (either short or long).
    #[inline(always)]
    pub const fn can_castle(&self, color: Color) -> bool {
        self.castling_rights[color.index()].any()
    }

    /// Location of `color`'s King.
    ///
    /// # Panics
    /// If `color` has no King on the board. Every parsed position has one, and no legal move removes it.
    #[inline(always)]
    pub fn king_square(&self, color: Color) -> Square {
        let Some(square) = self.board.king_square(color) else {
            panic!("{} has no King in {self}", color.name());
        };
        square
    }

    /// Returns `true` if any piece of color `by` attacks `square`.
    #[inline(always)]
    pub fn is_square_attacked(&self, square: Square, by: Color) -> bool {
        attacks::is_square_attacked(&self.board, square, by)
    }

    /// Returns `true` if the side to move is in check.
    #[inline(always)]
    pub fn is_in_check(&self) -> bool {
        let color = self.side_to_move();
        self.is_square_attacked(self.king_square(color), color.opponent())
    }

    /// All legal moves for the side to move.
    #[inline(always)]
    pub fn legal_moves(&self) -> MoveList {
        movegen::legal_moves(self)
    }

    /// Determines whether the game has ended in this position.
    ///
    /// # Example
    /// ```
    /// # use rookie::*;
    /// let mated = Position::from_fen("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1").unwrap();
    /// assert_eq!(mated.status(), GameStatus::Checkmate { winner: Color::White });
    /// assert_eq!(Position::default().status(), GameStatus::Ongoing);
    /// ```
    pub fn status(&self) -> GameStatus {
        if self.legal_moves().is_empty() {
            if self.is_in_check() {
                GameStatus::Checkmate {
                    winner: self.side_to_move.opponent(),
                }
            } else {
                GameStatus::Stalemate
            }
        } else if self.can_draw_by_fifty() {
            GameStatus::FiftyMoveRule
        } else {
            GameStatus::Ongoing
        }
    }

    /// Copies `self` and returns a [`Position`] after having applied the provided [`Move`].
    ///
    /// The move is assumed to be legal here.
    #[inline(always)]
    pub fn apply_move(&self, mv: Move) -> Self {
        let mut copied = *self;
        copied.make_move(mv);
        copied
    }

    /// Parses `uci` as a move in this position and returns the resulting [`Position`].
    ///
    /// # Example
    /// ```
    /// # use rookie::*;
    /// let pos = Position::default().play_uci("e2e4").unwrap();
    /// assert_eq!(pos.ep_square(), Some(Square::E3));
    /// assert!(pos.play_uci("e2e4").is_err());
    /// ```
    pub fn play_uci(&self, uci: &str) -> Result<Self> {
        Move::from_uci(self, uci).map(|mv| self.apply_move(mv))
    }

    /// Applies the move in place and returns what is needed to take it back with [`Position::unmake_move`].
    ///
    /// No enforcement of legality.
    ///
    /// # Panics
    /// If there is no piece on the move's source square, or no piece to capture when the move is a capture.
    pub fn make_move(&mut self, mv: Move) -> Undo {
        let (from, to, kind) = mv.parts();
        let color = self.side_to_move;

        let mut undo = Undo {
            captured: None,
            castling_rights: self.castling_rights,
            ep_square: self.ep_square,
            halfmove: self.halfmove,
            fullmove: self.fullmove,
            key: self.key,
        };

        let Some(mut piece) = self.board.take(from) else {
            panic!("Failed to apply {mv} to {self}: No piece found at {from}");
        };
        self.key.hash_piece(from, piece);

        // Clear the EP square from the last move (and un-hash it)
        if let Some(ep_square) = self.ep_square.take() {
            self.key.hash_ep_square(ep_square);
        }

        // Reset below on captures and pawn moves
        self.halfmove = self.halfmove.saturating_add(1);
        if color == Color::Black {
            self.fullmove = self.fullmove.saturating_add(1);
        }

        match kind {
            MoveKind::Capture | MoveKind::EnPassantCapture => {
                // En passant captures the pawn beside the mover, not the one on `to`
                let captured_square = if mv.is_en_passant() {
                    Square::new(to.file(), from.rank())
                } else {
                    to
                };

                let Some(captured) = self.board.take(captured_square) else {
                    panic!("Failed to apply {mv} to {self}: No piece found at {captured_square}");
                };
                self.key.hash_piece(captured_square, captured);
                undo.captured = Some(captured);

                self.halfmove = 0;
            }

            MoveKind::PawnDoublePush => {
                self.ep_square = from.forward_by(color, 1);
                self.key.hash_optional_ep_square(self.ep_square);
            }

            MoveKind::ShortCastle | MoveKind::LongCastle => {
                let (rook_from, rook_to) = castling_rook_squares(color, mv.is_short_castle());
                let Some(rook) = self.board.take(rook_from) else {
                    panic!("Failed to apply {mv} to {self}: No Rook found at {rook_from}");
                };
                self.board.place(rook, rook_to);
                self.key.hash_piece(rook_from, rook);
                self.key.hash_piece(rook_to, rook);
            }

            MoveKind::Quiet => {}
        }

        if piece.is_pawn() {
            self.halfmove = 0;
        }

        self.revoke_castling_rights(piece, from, to);

        if let Some(promotion) = mv.promotion() {
            piece = piece.promoted(promotion);
        }

        self.board.place(piece, to);
        self.key.hash_piece(to, piece);

        self.side_to_move = color.opponent();
        self.key.toggle_side_to_move();

        undo
    }

    /// Reverses a move previously applied with [`Position::make_move`], restoring the exact prior position.
    ///
    /// `mv` and `undo` must be the most recent move made on this position and the record it returned.
    ///
    /// # Panics
    /// If there is no piece on the move's destination square.
    pub fn unmake_move(&mut self, mv: Move, undo: Undo) {
        let (from, to, kind) = mv.parts();
        let color = self.side_to_move.opponent();

        let Some(mut piece) = self.board.take(to) else {
            panic!("Failed to undo {mv} on {self}: No piece found at {to}");
        };
        if mv.is_promotion() {
            piece = Piece::new(color, PieceKind::Pawn);
        }
        self.board.place(piece, from);

        match kind {
            MoveKind::ShortCastle | MoveKind::LongCastle => {
                let (rook_from, rook_to) = castling_rook_squares(color, mv.is_short_castle());
                if let Some(rook) = self.board.take(rook_to) {
                    self.board.place(rook, rook_from);
                }
            }

            MoveKind::EnPassantCapture | MoveKind::Capture => {
                if let Some(captured) = undo.captured {
                    let captured_square = if mv.is_en_passant() {
                        Square::new(to.file(), from.rank())
                    } else {
                        to
                    };
                    self.board.place(captured, captured_square);
                }
            }

            _ => {}
        }

        self.side_to_move = color;
        self.castling_rights = undo.castling_rights;
        self.ep_square = undo.ep_square;
        self.halfmove = undo.halfmove;
        self.fullmove = undo.fullmove;
        self.key = undo.key;
    }

    /// Clears any castling right whose King or Rook is touched by a move from `from` to `to`.
    ///
    /// Moving the King loses both rights. Moving from, or capturing on, a Rook's home corner loses that side.
    fn revoke_castling_rights(&mut self, piece: Piece, from: Square, to: Square) {
        let mut rights = self.castling_rights;

        if piece.is_king() {
            rights[piece.color()] = CastlingRights::default();
        }

        for color in Color::all() {
            let (short_rook, _) = castling_rook_squares(color, true);
            let (long_rook, _) = castling_rook_squares(color, false);

            if from == short_rook || to == short_rook {
                rights[color].short = false;
            }
            if from == long_rook || to == long_rook {
                rights[color].long = false;
            }
        }

        if rights != self.castling_rights {
            self.key.hash_castling_rights(&self.castling_rights);
            self.castling_rights = rights;
            self.key.hash_castling_rights(&self.castling_rights);
        }
    }
}

/// Parses the en passant field of a FEN string.
///
/// The square must be one the opponent's Pawn could just have skipped: on the sixth rank relative to the side to
/// move, empty, with an enemy Pawn directly beyond it.
fn parse_ep_square(ep_square: &str, board: &Board, side_to_move: Color) -> Result<Option<Square>> {
    if ep_square == "-" {
        return Ok(None);
    }

    let square = Square::from_uci(ep_square).map_err(Error::malformed)?;
    if square.rank_relative_to(side_to_move).rank() != Rank::SIX {
        return Err(Error::malformed(format!(
            "En passant square must be on {}'s sixth rank. Got {square}",
            side_to_move.name()
        )));
    }

    let pushed_pawn = Piece::new(side_to_move.opponent(), PieceKind::Pawn);
    let beyond = square.backward_by(side_to_move, 1);
    if board.has(square) || beyond.and_then(|sq| board.piece_at(sq)) != Some(pushed_pawn) {
        return Err(Error::malformed(format!(
            "En passant square {square} must be empty and just behind a {} Pawn",
            side_to_move.opponent().name()
        )));
    }

    Ok(Some(square))
}

/// Parses the castling field of a FEN string: `-` or a non-empty subset of `KQkq`.
fn parse_castling_rights(castling: &str) -> Result<[CastlingRights; Color::COUNT]> {
    let mut rights = [CastlingRights::default(); Color::COUNT];
    if castling == "-" {
        return Ok(rights);
    }

    if castling.is_empty() {
        return Err(Error::malformed("Castling rights must not be empty"));
    }

    for c in castling.chars() {
        let flag = match c {
            'K' => &mut rights[Color::White].short,
            'Q' => &mut rights[Color::White].long,
            'k' => &mut rights[Color::Black].short,
            'q' => &mut rights[Color::Black].long,
            _ => {
                return Err(Error::malformed(format!(
                    "Castling rights must be '-' or a subset of \"KQkq\". Got {castling:?}"
                )))
            }
        };

        if *flag {
            return Err(Error::malformed(format!(
                "Duplicate castling right {c:?} in {castling:?}"
            )));
        }
        *flag = true;
    }

    Ok(rights)
}

impl FromStr for Position {
    type Err = Error;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::from_fen(s)
    }
}

impl Deref for Position {
    type Target = Board;
    #[inline(always)]
    fn deref(&self) -> &Self::Target {
        self.board()
    }
}

impl Default for Position {
    #[inline(always)]
    fn default() -> Self {
        let Ok(pos) = Self::from_fen(FEN_STARTPOS) else {
            unreachable!("the starting position is always valid");
        };
        pos
    }
}

impl fmt::Display for Position {
    /// Display this position's FEN string
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_fen())
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::iter().rev() {
            write!(f, "{rank}|")?;
            for file in File::iter() {
                let piece = self.board().piece_at(file * rank);
                let piece_char = piece.map(|p| p.char()).unwrap_or('.');
                write!(f, " {piece_char}")?;
            }

            if rank == Rank::SEVEN {
                write!(f, "           FEN: {}", self.to_fen())?;
            } else if rank == Rank::SIX {
                write!(f, "          Side: {}", self.side_to_move())?;
            } else if rank == Rank::FIVE {
                write!(f, "      Castling: {}", self.castling_rights_uci())?;
            } else if rank == Rank::FOUR {
                let ep = self
                    .ep_square()
                    .map(|t| t.to_uci())
                    .unwrap_or(String::from("-"));
                write!(f, "            EP: {ep}")?;
            } else if rank == Rank::THREE {
                write!(f, "     Half-move: {}", self.halfmove())?;
            } else if rank == Rank::TWO {
                write!(f, "     Full-move: {}", self.fullmove())?;
            } else if rank == Rank::ONE {
                write!(f, "           Key: {}", self.key())?;
            }
            writeln!(f)?;
        }
        write!(f, " +")?;
        for _ in File::iter() {
            write!(f, "--")?;
        }
        write!(f, "\n   ")?;
        for file in File::iter() {
            write!(f, "{file} ")?;
        }

        Ok(())
    }
}

/// Represents all pieces and their locations on a chess board.
///
/// Has no knowledge of castling rights, en passant, or move counters. If you need those, see [`Position`].
///
/// Internally a mailbox of 64 optional pieces, plus the location of each King.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    mailbox: [Option<Piece>; Square::COUNT],
    kings: [Option<Square>; Color::COUNT],
}

impl Board {
    /// Creates a new, empty [`Board`] containing no pieces.
    ///
    /// # Example
    /// ```
    /// # use rookie::Board;
    /// let board = Board::new();
    /// assert_eq!(board.to_fen(), "8/8/8/8/8/8/8/8");
    /// ```
    #[inline(always)]
    pub const fn new() -> Self {
        Self {
            mailbox: [None; Square::COUNT],
            kings: [None; Color::COUNT],
        }
    }

    /// Constructs a [`Board`] from the placement field of a FEN string.
    ///
    /// Every rank must describe exactly 8 files.
    pub fn from_fen(placements: &str) -> Result<Self> {
        let mut board = Self::new();

        let ranks = placements.split('/').collect::<Vec<_>>();
        if ranks.len() != Rank::COUNT {
            return Err(Error::malformed(format!(
                "Piece placements must describe 8 ranks. Got {}: {placements:?}",
                ranks.len()
            )));
        }

        // Ranks are listed from 8 down to 1
        for (rank, placements) in Rank::iter().rev().zip(ranks) {
            let mut file = 0usize;

            for c in placements.chars() {
                if let Some(empty) = c.to_digit(10) {
                    if !(1..=8).contains(&empty) {
                        return Err(Error::malformed(format!(
                            "Empty-square count must be 1 through 8. Got {c:?}"
                        )));
                    }
                    file += empty as usize;
                } else {
                    let piece = Piece::from_uci(c).map_err(|_| {
                        Error::malformed(format!(
                            "Found non-piece, non-numeric char {c:?} when parsing FEN."
                        ))
                    })?;

                    if file < File::COUNT {
                        board.place(piece, File::new_unchecked(file as u8) * rank);
                    }
                    file += 1;
                }

                if file > File::COUNT {
                    return Err(Error::malformed(format!(
                        "Rank {rank} describes more than 8 files: {placements:?}"
                    )));
                }
            }

            if file != File::COUNT {
                return Err(Error::malformed(format!(
                    "Rank {rank} must describe exactly 8 files. Got {placements:?}"
                )));
            }
        }

        Ok(board)
    }

    /// Returns `true` if there is a piece at the given [`Square`], else `false`.
    ///
    /// # Example
    /// ```
    /// # use rookie::{Board, Square};
    /// let board = Board::default();
    /// assert_eq!(board.has(Square::B1), true);
    /// assert_eq!(board.has(Square::B3), false);
    /// ```
    #[inline(always)]
    pub const fn has(&self, square: Square) -> bool {
        self.mailbox[square.index()].is_some()
    }

    /// Places the provided [`Piece`] and the supplied [`Square`], replacing anything already there.
    ///
    /// # Example
    /// ```
    /// # use rookie::{Board, Piece, PieceKind, Color, Square};
    /// let white_knight = Piece::new(Color::White, PieceKind::Knight);
    /// let mut board = Board::new();
    /// board.place(white_knight, Square::C4);
    /// assert_eq!(board.to_fen(), "8/8/8/8/2N5/8/8/8");
    /// ```
    #[inline(always)]
    pub fn place(&mut self, piece: Piece, square: Square) {
        self.take(square);
        if piece.is_king() {
            self.kings[piece.color()] = Some(square);
        }
        self.mailbox[square] = Some(piece);
    }

    /// Takes the [`Piece`] from a given [`Square`], if there is one present.
    ///
    /// # Example
    /// ```
    /// # use rookie::{Board, Piece, PieceKind, Color, Square};
    /// let mut board = Board::from_fen("k7/8/8/8/2N5/8/8/7K").unwrap();
    /// let white_knight = Piece::new(Color::White, PieceKind::Knight);
    /// let taken = board.take(Square::C4);
    /// assert_eq!(board.to_fen(), "k7/8/8/8/8/8/8/7K");
    /// assert_eq!(taken, Some(white_knight));
    /// ```
    #[inline(always)]
    pub fn take(&mut self, square: Square) -> Option<Piece> {
        let piece = self.mailbox[square].take()?;

        if piece.is_king() && self.kings[piece.color()] == Some(square) {
            self.kings[piece.color()] = None;
        }

        Some(piece)
    }

    /// Fetches the [`Color`] of the piece at the provided [`Square`], if there is one.
    #[inline(always)]
    pub fn color_at(&self, square: Square) -> Option<Color> {
        self.mailbox[square].map(|piece| piece.color())
    }

    /// Fetches the [`PieceKind`] of the piece at the provided [`Square`], if there is one.
    #[inline(always)]
    pub fn kind_at(&self, square: Square) -> Option<PieceKind> {
        self.mailbox[square].map(|piece| piece.kind())
    }

    /// Fetches the [`Piece`] of the piece at the provided [`Square`], if there is one.
    ///
    /// # Example
    /// ```
    /// # use rookie::{Board, PieceKind, Color, Square};
    /// let board = Board::default();
    /// assert_eq!(board.piece_at(Square::A2).unwrap().kind(), PieceKind::Pawn);
    /// assert_eq!(board.piece_at(Square::A2).unwrap().color(), Color::White);
    /// assert!(board.piece_at(Square::E4).is_none());
    /// ```
    #[inline(always)]
    pub const fn piece_at(&self, square: Square) -> Option<Piece> {
        self.mailbox[square.index()]
    }

    /// Location of `color`'s King, if it has one.
    #[inline(always)]
    pub const fn king_square(&self, color: Color) -> Option<Square> {
        self.kings[color.index()]
    }

    /// Creates a [`BoardIter`] to iterate over all occupied [`Square`]s in this [`Board`], from `a1` to `h8`.
    #[inline(always)]
    pub const fn iter(&self) -> BoardIter<'_> {
        BoardIter {
            board: self,
            next: 0,
        }
    }

    /// Generates the placement field of a [FEN](https://www.chess.com/terms/fen-chess) string of this [`Board`].
    pub fn to_fen(&self) -> String {
        let mut placements: [String; 8] = Default::default();

        for rank in Rank::iter() {
            let mut empty_spaces = 0;
            for file in File::iter() {
                if let Some(piece) = self.piece_at(file * rank) {
                    if empty_spaces != 0 {
                        placements[rank.index()] += &empty_spaces.to_string();
                        empty_spaces = 0;
                    }
                    placements[rank.index()].push(piece.char());
                } else {
                    empty_spaces += 1;
                }
            }

            if empty_spaces != 0 {
                placements[rank.index()] += &empty_spaces.to_string();
            }
        }
        placements.reverse();

        placements.join("/")
    }
}

impl Default for Board {
    /// The standard starting layout.
    #[inline(always)]
    fn default() -> Self {
        *Position::default().board()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut board = String::with_capacity(198);

        for rank in Rank::iter().rev() {
            board += &format!("{rank}| ");

            for file in File::iter() {
                let occupant = self.piece_at(file * rank).map(|p| p.char()).unwrap_or('.');
                board += &format!("{occupant} ");
            }

            board += "\n"
        }
        board += " +";
        for _ in File::iter() {
            board += "--";
        }
        board += "\n   ";
        for file in File::iter() {
            board += &format!("{file} ");
        }

        write!(f, "{board}")
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl Index<Square> for Board {
    type Output = Option<Piece>;
    #[inline(always)]
    fn index(&self, index: Square) -> &Self::Output {
        &self.mailbox[index]
    }
}

impl<'a> IntoIterator for &'a Board {
    type IntoIter = BoardIter<'a>;
    type Item = <BoardIter<'a> as Iterator>::Item;
    #[inline(always)]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator over the occupied squares of a [`Board`].
///
/// Calls to [`Iterator::next`] will yield a tuple of a [`Square`] and a [`Piece`].
pub struct BoardIter<'a> {
    board: &'a Board,
    next: usize,
}

impl<'a> Iterator for BoardIter<'a> {
    type Item = (Square, Piece);

    fn next(&mut self) -> Option<Self::Item> {
        while self.next < Square::COUNT {
            let index = self.next;
            self.next += 1;

            if let Some(piece) = self.board.mailbox[index] {
                return Square::from_index(index).map(|square| (square, piece));
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FEN_ENDGAME, FEN_KIWIPETE};

    #[test]
    fn test_fen_round_trip() {
        for fen in [
            FEN_STARTPOS,
            FEN_KIWIPETE,
            FEN_ENDGAME,
            "rnbqkbnr/pp1ppppp/8/2p5/4P3/8/PPPP1PPP/RNBQKBNR w KQkq c6 0 2",
            "8/8/8/8/8/8/8/k6K b - - 99 120",
        ] {
            assert_eq!(Position::from_fen(fen).unwrap().to_fen(), fen);
        }
    }

    #[test]
    fn test_malformed_fens_are_rejected() {
        for fen in [
            "",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1 extra",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP w KQkq - 0 1",
            "rnbqkbnr/pppppppp/9/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            "rnbqkbnr/ppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            "rnbqkbnr/ppppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNX w KQkq - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkx - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KKkq - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq e4 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - -1 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 0",
            "rnbq1bnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQ - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKKNR w kq - 0 1",
            "4k3/8/8/8/8/8/8/4R1K1 w - - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR5 w KQkq - 0 1",
        ] {
            assert!(
                matches!(Position::from_fen(fen), Err(Error::MalformedInput(_))),
                "{fen:?} should be rejected"
            );
        }

        // Enough empty-square digits to overflow a narrow counter
        let overlong = format!("{}/8/8/8/8/8/8/K6k w - - 0 1", "8".repeat(33));
        assert!(matches!(
            Position::from_fen(&overlong),
            Err(Error::MalformedInput(_))
        ));
    }

    #[test]
    fn test_ep_square_must_follow_a_double_push() {
        for fen in [
            // Behind the side to move's own lines
            "4k3/8/8/8/8/8/3Pp3/4K3 w - e3 0 1",
            "4k3/8/8/8/4P3/8/8/4K3 b - e6 0 1",
            // No Pawn could have skipped it
            "4k3/8/8/8/8/8/8/4K3 w - e6 0 1",
            "4k3/8/8/4P3/8/8/8/4K3 w - e6 0 1",
            // Occupied
            "4k3/8/4p3/4p3/8/8/8/4K3 w - e6 0 1",
        ] {
            assert!(
                matches!(Position::from_fen(fen), Err(Error::MalformedInput(_))),
                "{fen:?} should be rejected"
            );
        }

        let pos = Position::from_fen("4k3/8/8/8/3pP3/8/8/4K3 b - e3 0 1").unwrap();
        assert_eq!(pos.ep_square(), Some(Square::E3));
        assert!(pos.legal_moves().iter().any(|mv| mv.is_en_passant() && mv.to_uci() == "d4e3"));
    }

    #[test]
    fn test_zobrist_key_side_to_move() {
        let fen = "r3k2r/pppp1ppp/8/4p3/8/8/PPPPPPPP/R3K2R w KQkq e6 0 1";
        let pos = Position::from_fen(fen).unwrap();

        let fen_black = "r3k2r/pppp1ppp/8/4p3/8/8/PPPPPPPP/R3K2R b KQkq - 0 1";
        let pos_black = Position::from_fen(fen_black).unwrap();

        assert_ne!(pos.key(), pos_black.key());
    }

    #[test]
    fn test_zobrist_key_ep() {
        let fen = "r3k2r/pppp1ppp/8/4p3/8/8/PPPPPPPP/R3K2R w KQkq e6 0 1";
        let pos = Position::from_fen(fen).unwrap();

        let fen_without_ep = "r3k2r/pppp1ppp/8/4p3/8/8/PPPPPPPP/R3K2R w KQkq - 0 1";
        let pos_without_ep = Position::from_fen(fen_without_ep).unwrap();

        assert_ne!(pos.key(), pos_without_ep.key());
    }

    #[test]
    fn test_zobrist_key_castling() {
        let fen = "r3k2r/pppp1ppp/8/4p3/8/8/PPPPPPPP/R3K2R w KQkq e6 0 1";
        let pos = Position::from_fen(fen).unwrap();

        let fen_without_k = "r3k2r/pppp1ppp/8/4p3/8/8/PPPPPPPP/R3K2R w KQq e6 0 1";
        let pos_without_k = Position::from_fen(fen_without_k).unwrap();

        assert_ne!(pos.key(), pos_without_k.key());
    }

    #[test]
    fn test_zobrist_key_ignores_move_counters() {
        let a = Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let b = Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 37 80").unwrap();
        assert_eq!(a.key(), b.key());
    }

    #[test]
    fn test_zobrist_key_updates_on_quiet_moves() {
        let mut pos = Position::default();
        let original_key = pos.key();

        for uci in ["b1a3", "b8a6", "a3b1"] {
            pos = pos.play_uci(uci).unwrap();
            assert_ne!(pos.key(), original_key);
        }
        pos = pos.play_uci("a6b8").unwrap();
        assert_eq!(pos.key(), original_key);
    }

    #[test]
    fn test_incremental_key_matches_fresh_key() {
        // Walks a deterministic line through every special move kind
        let mut pos = Position::from_fen(FEN_KIWIPETE).unwrap();

        for ply in 0..60 {
            let moves = pos.legal_moves();
            if moves.is_empty() {
                break;
            }
            let mv = moves[(ply * 7 + 3) % moves.len()];
            pos.make_move(mv);

            assert_eq!(pos.key(), ZobristKey::new(&pos), "after {mv} in {pos}");
        }
    }

    #[test]
    fn test_unmake_restores_every_move() {
        for fen in [FEN_STARTPOS, FEN_KIWIPETE, FEN_ENDGAME, "r3k2r/1P6/8/3pP3/8/8/6p1/R3K2R w KQkq d6 0 1"] {
            let pos = Position::from_fen(fen).unwrap();

            for mv in pos.legal_moves() {
                let mut copy = pos;
                let undo = copy.make_move(mv);
                assert_eq!(copy, pos.apply_move(mv));

                copy.unmake_move(mv, undo);
                assert_eq!(copy, pos, "undoing {mv} in {fen}");
            }
        }
    }

    #[test]
    fn test_counters() {
        let pos = Position::default().play_uci("g1f3").unwrap();
        assert_eq!((pos.halfmove(), pos.fullmove()), (1, 1));

        let pos = pos.play_uci("g8f6").unwrap();
        assert_eq!((pos.halfmove(), pos.fullmove()), (2, 2));

        // Pawn moves reset the clock
        let pos = pos.play_uci("e2e4").unwrap();
        assert_eq!((pos.halfmove(), pos.fullmove()), (0, 2));
        assert_eq!(pos.ep_square(), Some(Square::E3));

        // The en passant square only lasts a single ply
        let pos = pos.play_uci("b8c6").unwrap();
        assert_eq!(pos.ep_square(), None);

        // Captures reset the clock
        let pos = pos.play_uci("f3g5").unwrap().play_uci("f6e4").unwrap();
        assert_eq!(pos.halfmove(), 0);
    }

    #[test]
    fn test_counters_saturate() {
        let max = usize::MAX;
        let pos = Position::from_fen(&format!("4k3/8/8/8/8/8/8/4K3 b - - {max} {max}")).unwrap();
        let pos = pos.play_uci("e8d8").unwrap();

        assert_eq!((pos.halfmove(), pos.fullmove()), (max, max));
    }

    #[test]
    fn test_en_passant_removes_captured_pawn() {
        let pos = Position::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").unwrap();
        let pos = pos.play_uci("e5d6").unwrap();

        assert_eq!(pos.piece_at(Square::D5), None);
        assert_eq!(
            pos.piece_at(Square::D6),
            Some(Piece::new(Color::White, PieceKind::Pawn))
        );
        assert_eq!(pos.halfmove(), 0);
    }

    #[test]
    fn test_promotion_keeps_color() {
        let pos = Position::from_fen("4k3/8/8/8/8/8/p7/4K3 b - - 0 1").unwrap();
        let pos = pos.play_uci("a2a1n").unwrap();

        assert_eq!(
            pos.piece_at(Square::A1),
            Some(Piece::new(Color::Black, PieceKind::Knight))
        );
    }

    #[test]
    fn test_castling_moves_the_rook() {
        let fen = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1";
        let pos = Position::from_fen(fen).unwrap().play_uci("e1g1").unwrap();
        assert_eq!(pos.board().to_fen(), "r3k2r/8/8/8/8/8/8/R4RK1");
        assert_eq!(pos.castling_rights_uci(), "kq");

        let pos = pos.play_uci("e8c8").unwrap();
        assert_eq!(pos.board().to_fen(), "2kr3r/8/8/8/8/8/8/R4RK1");
        assert_eq!(pos.castling_rights_uci(), "-");
    }

    // There are four cases in which castling rights can be lost:
    //  1. The King was moved
    //  2. A Rook was moved
    //  3. A Rook was captured
    //  4. Castling was performed (covered above)

    #[test]
    fn test_castling_rights_update_on_king_move() {
        let fen = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1";
        let pos = Position::from_fen(fen).unwrap();
        let original_key = pos.key();

        // Moving the White King should remove White's castling rights
        let pos = pos.play_uci("e1d1").unwrap();
        assert_ne!(pos.key(), original_key);
        assert_eq!(pos.castling_rights_uci(), "kq");

        // Same for Black
        let pos = pos.play_uci("e8f8").unwrap();
        assert_eq!(pos.castling_rights_uci(), "-");

        // Moving the Kings back should NOT restore castling rights
        let pos = pos.play_uci("d1e1").unwrap().play_uci("f8e8").unwrap();
        assert_ne!(pos.key(), original_key);
        assert_eq!(pos.castling_rights_uci(), "-");
    }

    #[test]
    fn test_castling_rights_update_on_rook_move() {
        let fen = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1";
        let pos = Position::from_fen(fen).unwrap();

        // Moving a Rook should disable castling for that side
        let pos = pos.play_uci("a1b1").unwrap();
        assert_eq!(pos.castling_rights_uci(), "Kkq");

        // Same for Black
        let pos = pos.play_uci("a8b8").unwrap();
        assert_eq!(pos.castling_rights_uci(), "Kk");

        // Moving the Rooks back should NOT re-enable castling for that side
        let pos = pos.play_uci("b1a1").unwrap().play_uci("b8a8").unwrap();
        assert_eq!(pos.castling_rights_uci(), "Kk");
    }

    #[test]
    fn test_castling_rights_update_on_rook_captured() {
        let fen = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1";
        let pos = Position::from_fen(fen).unwrap();

        // White used its A1 Rook to capture, so it loses that side as well
        let pos = pos.play_uci("a1a8").unwrap();
        assert_eq!(pos.castling_rights_uci(), "Kk");

        // Same for Black, on the other side
        let pos = pos.play_uci("h8h1").unwrap();
        assert_eq!(pos.castling_rights_uci(), "-");
    }

    #[test]
    fn test_status() {
        let stalemate = Position::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert_eq!(stalemate.status(), GameStatus::Stalemate);

        let fifty = Position::from_fen("4k3/8/8/8/8/8/8/4K2R w - - 100 80").unwrap();
        assert_eq!(fifty.status(), GameStatus::FiftyMoveRule);

        // Mate takes priority over the fifty-move rule
        let mated = Position::from_fen("R5k1/5ppp/8/8/8/8/8/6K1 b - - 120 80").unwrap();
        assert_eq!(
            mated.status(),
            GameStatus::Checkmate {
                winner: Color::White
            }
        );
        assert!(mated.is_in_check());
    }

    #[test]
    fn test_king_square_tracks_moves() {
        let pos = Position::default();
        assert_eq!(pos.king_square(Color::White), Square::E1);
        assert_eq!(pos.king_square(Color::Black), Square::E8);

        let pos = pos.play_uci("e2e4").unwrap().play_uci("e7e5").unwrap();
        let pos = pos.play_uci("e1e2").unwrap();
        assert_eq!(pos.king_square(Color::White), Square::E2);
    }
}
