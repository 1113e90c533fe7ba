//! Castling geometry
//!
//! All the squares here are derived from the color and the side, so a castling move only needs
//! to store its source and destination.

use crate::bitboard::Bitboard;
use crate::geometry;
use crate::types::{CastlingSide, Color, File, Position};

#[inline]
pub const fn king_src(c: Color) -> Position {
    Position::from_parts(File::E, geometry::castling_rank(c))
}

#[inline]
pub const fn king_dst(c: Color, s: CastlingSide) -> Position {
    let file = match s {
        CastlingSide::King => File::G,
        CastlingSide::Queen => File::C,
    };
    Position::from_parts(file, geometry::castling_rank(c))
}

#[inline]
pub const fn rook_src(c: Color, s: CastlingSide) -> Position {
    let file = match s {
        CastlingSide::King => File::H,
        CastlingSide::Queen => File::A,
    };
    Position::from_parts(file, geometry::castling_rank(c))
}

#[inline]
pub const fn rook_dst(c: Color, s: CastlingSide) -> Position {
    let file = match s {
        CastlingSide::King => File::F,
        CastlingSide::Queen => File::D,
    };
    Position::from_parts(file, geometry::castling_rank(c))
}

/// Squares strictly between the king and the rook, which must be empty to castle
#[inline]
pub const fn pass(c: Color, s: CastlingSide) -> Bitboard {
    let x: u64 = match s {
        CastlingSide::King => 0x60,
        CastlingSide::Queen => 0x0e,
    };
    Bitboard::from_raw(match c {
        Color::White => x << 56,
        Color::Black => x,
    })
}

/// Castling side of a king move landing on `dst`
///
/// Only meaningful for castling moves, which always land on the `c` or the `g` file.
#[inline]
pub const fn side(dst: Position) -> CastlingSide {
    if dst.file().index() > File::E.index() {
        CastlingSide::King
    } else {
        CastlingSide::Queen
    }
}

/// Returns the rook whose castling right is bound to the square `pos`, if any
#[inline]
pub fn rook_home(pos: Position) -> Option<(Color, CastlingSide)> {
    [Color::White, Color::Black]
        .into_iter()
        .flat_map(|c| [(c, CastlingSide::King), (c, CastlingSide::Queen)])
        .find(|&(c, s)| rook_src(c, s) == pos)
}
