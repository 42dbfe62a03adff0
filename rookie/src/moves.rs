/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use super::{Error, PieceKind, Position, Result, Square};

/// The different kinds of moves that can be made, excluding promotion.
///
/// Promotion is orthogonal to this: a promotion is either a [`MoveKind::Quiet`] or a [`MoveKind::Capture`]
/// that also carries a [`PieceKind`] (see [`Move::promotion`]).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum MoveKind {
    /// Moves a piece to an empty square.
    #[default]
    Quiet,

    /// Moves a Pawn two squares forward from its starting rank.
    PawnDoublePush,

    /// Moves a piece onto a square occupied by an enemy, removing it.
    Capture,

    /// A Pawn captures the enemy Pawn that just double-pushed past it.
    EnPassantCapture,

    /// Castles on the King's side (`O-O`).
    ShortCastle,

    /// Castles on the Queen's side (`O-O-O`).
    LongCastle,
}

/// A single move: a source and destination [`Square`], what kind of move it is, and an optional promotion.
///
/// Equality is structural, so two moves are equal only if every component is.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Move {
    from: Square,
    to: Square,
    kind: MoveKind,
    promotion: Option<PieceKind>,
}

impl Move {
    /// Creates a new, non-promoting [`Move`].
    #[inline(always)]
    pub const fn new(from: Square, to: Square, kind: MoveKind) -> Self {
        Self {
            from,
            to,
            kind,
            promotion: None,
        }
    }

    /// Creates a promoting [`Move`]. `kind` must be [`MoveKind::Quiet`] or [`MoveKind::Capture`].
    #[inline(always)]
    pub const fn new_promotion(from: Square, to: Square, kind: MoveKind, promotion: PieceKind) -> Self {
        Self {
            from,
            to,
            kind,
            promotion: Some(promotion),
        }
    }

    /// Matches move text such as `e2e4` or `e7e8q` against the legal moves of `position`.
    ///
    /// The move is never built from coordinates alone: only a move present in the legal move set is returned.
    ///
    /// # Example
    /// ```
    /// # use rookie::*;
    /// let pos = Position::default();
    /// let mv = Move::from_uci(&pos, "e2e4").unwrap();
    /// assert_eq!(mv.kind(), MoveKind::PawnDoublePush);
    ///
    /// assert!(matches!(Move::from_uci(&pos, "e2e5"), Err(Error::IllegalMove { .. })));
    /// assert!(matches!(Move::from_uci(&pos, "e2"), Err(Error::MalformedInput(_))));
    /// ```
    pub fn from_uci(position: &Position, uci: &str) -> Result<Self> {
        let (from, to, promotion) = Self::parse_uci(uci)?;

        position
            .legal_moves()
            .into_iter()
            .find(|mv| mv.from() == from && mv.to() == to && mv.promotion() == promotion)
            .ok_or_else(|| Error::IllegalMove {
                mv: uci.to_string(),
                fen: position.to_fen(),
            })
    }

    /// Splits move text into its coordinates and promotion, without consulting any position.
    fn parse_uci(uci: &str) -> Result<(Square, Square, Option<PieceKind>)> {
        if !uci.is_ascii() || !(4..=5).contains(&uci.len()) {
            return Err(Error::malformed(format!(
                "Move text must be 4 or 5 ASCII characters. Got {uci:?}"
            )));
        }

        let from = Square::from_uci(&uci[0..2]).map_err(Error::malformed)?;
        let to = Square::from_uci(&uci[2..4]).map_err(Error::malformed)?;

        let promotion = match uci.chars().nth(4) {
            None => None,
            Some(c @ ('q' | 'r' | 'b' | 'n')) => Some(PieceKind::from_uci(c).map_err(Error::malformed)?),
            Some(c) => {
                return Err(Error::malformed(format!(
                    "Promotion must be one of 'q', 'r', 'b', 'n'. Got {c:?}"
                )))
            }
        };

        Ok((from, to, promotion))
    }

    /// Square the moving piece starts on.
    #[inline(always)]
    pub const fn from(&self) -> Square {
        self.from
    }

    /// Square the moving piece lands on.
    #[inline(always)]
    pub const fn to(&self) -> Square {
        self.to
    }

    /// The [`MoveKind`] of this move.
    #[inline(always)]
    pub const fn kind(&self) -> MoveKind {
        self.kind
    }

    /// The source square, destination square, and kind of this move.
    #[inline(always)]
    pub const fn parts(&self) -> (Square, Square, MoveKind) {
        (self.from, self.to, self.kind)
    }

    /// The piece a Pawn becomes on arrival, if this is a promotion.
    #[inline(always)]
    pub const fn promotion(&self) -> Option<PieceKind> {
        self.promotion
    }

    /// Returns `true` if this move removes an enemy piece, including en passant.
    #[inline(always)]
    pub const fn is_capture(&self) -> bool {
        matches!(self.kind, MoveKind::Capture | MoveKind::EnPassantCapture)
    }

    /// Returns `true` if this move is an en passant capture.
    #[inline(always)]
    pub const fn is_en_passant(&self) -> bool {
        matches!(self.kind, MoveKind::EnPassantCapture)
    }

    /// Returns `true` if this move castles to either side.
    #[inline(always)]
    pub const fn is_castle(&self) -> bool {
        matches!(self.kind, MoveKind::ShortCastle | MoveKind::LongCastle)
    }

    /// Returns `true` if this move castles on the King's side.
    #[inline(always)]
    pub const fn is_short_castle(&self) -> bool {
        matches!(self.kind, MoveKind::ShortCastle)
    }

    /// Returns `true` if this move promotes a Pawn.
    #[inline(always)]
    pub const fn is_promotion(&self) -> bool {
        self.promotion.is_some()
    }

    /// Move text for this move, such as `e2e4` or `a7a8q`.
    pub fn to_uci(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promotion) = self.promotion {
            write!(f, "{promotion}")?;
        }
        Ok(())
    }
}
