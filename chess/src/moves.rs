//! Chess moves

use crate::castling;
use crate::types::{CastlingSide, Kind, Piece, Position};

use std::fmt;

/// Move kind together with the data needed to apply and to undo the move
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MoveKind {
    /// Any move which is not one of the special ones below
    ///
    /// `captured` is [`Piece::NONE`] if the destination was empty.
    Normal { captured: Piece },
    /// Pawn move onto its last rank, either a push or a capture
    Promotion { promoted: Piece, captured: Piece },
    /// King moves two squares toward a rook, the rook jumps over it
    ///
    /// The rook squares are derived from the destination, see [`Move::castling_side()`].
    Castling,
    /// Pawn captures a pawn which has just advanced two squares past it
    ///
    /// The captured pawn stands on the destination file and the source rank.
    EnPassant { captured: Piece },
}

/// Chess move
///
/// A move is produced by the [move generator](crate::movegen), applied once by
/// [`Game`](crate::game::Game) and kept in the game history afterwards.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Move {
    src: Position,
    dst: Position,
    kind: MoveKind,
}

impl Move {
    #[inline]
    pub const fn normal(src: Position, dst: Position, captured: Piece) -> Move {
        Move {
            src,
            dst,
            kind: MoveKind::Normal { captured },
        }
    }

    #[inline]
    pub const fn promotion(src: Position, dst: Position, promoted: Piece, captured: Piece) -> Move {
        Move {
            src,
            dst,
            kind: MoveKind::Promotion { promoted, captured },
        }
    }

    #[inline]
    pub const fn castling(src: Position, dst: Position) -> Move {
        Move {
            src,
            dst,
            kind: MoveKind::Castling,
        }
    }

    #[inline]
    pub const fn en_passant(src: Position, dst: Position, captured: Piece) -> Move {
        Move {
            src,
            dst,
            kind: MoveKind::EnPassant { captured },
        }
    }

    /// Returns the move source square
    #[inline]
    pub const fn src(&self) -> Position {
        self.src
    }

    /// Returns the move destination square
    #[inline]
    pub const fn dst(&self) -> Position {
        self.dst
    }

    #[inline]
    pub const fn kind(&self) -> MoveKind {
        self.kind
    }

    /// Returns the piece removed from the board by this move, or [`Piece::NONE`]
    #[inline]
    pub const fn captured(&self) -> Piece {
        match self.kind {
            MoveKind::Normal { captured }
            | MoveKind::Promotion { captured, .. }
            | MoveKind::EnPassant { captured } => captured,
            MoveKind::Castling => Piece::NONE,
        }
    }

    #[inline]
    pub const fn is_capture(&self) -> bool {
        self.captured().is_occupied()
    }

    /// Returns the square the captured piece stood on
    ///
    /// It differs from the destination only for en passant.
    #[inline]
    pub const fn captured_pos(&self) -> Position {
        match self.kind {
            MoveKind::EnPassant { .. } => Position::from_parts(self.dst.file(), self.src.rank()),
            _ => self.dst,
        }
    }

    /// Returns the castling side if this is a castling move
    #[inline]
    pub const fn castling_side(&self) -> Option<CastlingSide> {
        match self.kind {
            MoveKind::Castling => Some(castling::side(self.dst)),
            _ => None,
        }
    }

    /// Returns the vertical distance covered by the move
    #[inline]
    pub const fn rank_distance(&self) -> usize {
        self.src.rank().index().abs_diff(self.dst.rank().index())
    }
}

/// Formats the move in coordinate notation, like `e2e4` or `e7e8q`
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}{}", self.src, self.dst)?;
        if let MoveKind::Promotion { promoted, .. } = self.kind {
            let ch = match promoted.kind() {
                Kind::Knight => 'n',
                Kind::Bishop => 'b',
                Kind::Rook => 'r',
                _ => 'q',
            };
            write!(f, "{}", ch)?;
        }
        Ok(())
    }
}
