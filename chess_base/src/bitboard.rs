use crate::types::Position;
use derive_more::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not};
use std::fmt;
use std::iter::{FromIterator, IntoIterator};

/// Set of squares
///
/// Bit `i` stands for the square with [`Position::index()`] equal to `i`.
#[derive(
    Default,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    BitAnd,
    BitAndAssign,
    BitOr,
    BitOrAssign,
    BitXor,
    BitXorAssign,
    Not,
)]
pub struct Bitboard(u64);

impl Bitboard {
    pub const EMPTY: Bitboard = Bitboard(0);

    pub const fn from_raw(val: u64) -> Bitboard {
        Bitboard(val)
    }

    pub const fn from_pos(pos: Position) -> Bitboard {
        Bitboard(1_u64 << pos.index())
    }

    pub const fn with(self, pos: Position) -> Bitboard {
        Bitboard(self.0 | (1_u64 << pos.index()))
    }

    pub fn set(&mut self, pos: Position) {
        *self = self.with(pos);
    }

    pub const fn has(&self, pos: Position) -> bool {
        ((self.0 >> pos.index()) & 1) != 0
    }

    pub const fn as_raw(&self) -> u64 {
        self.0
    }

    pub const fn len(&self) -> u32 {
        self.0.count_ones()
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub const fn is_nonempty(&self) -> bool {
        self.0 != 0
    }
}

impl fmt::Debug for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "Bitboard({})", self)
    }
}

/// Formats the set rank by rank from the 8th to the 1st, files `a` to `h`
impl fmt::Display for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        for rank in 0..8 {
            if rank != 0 {
                write!(f, "/")?;
            }
            let row = (self.0 >> (rank * 8)) & 0xff;
            for file in 0..8 {
                let ch = if (row >> file) & 1 != 0 { 'x' } else { '.' };
                write!(f, "{}", ch)?;
            }
        }
        Ok(())
    }
}

pub struct Iter(u64);

impl Iterator for Iter {
    type Item = Position;

    fn next(&mut self) -> Option<Position> {
        if self.0 == 0 {
            return None;
        }
        let bit = self.0.trailing_zeros();
        self.0 &= self.0.wrapping_sub(1_u64);
        Some(Position::from_index(bit as usize))
    }
}

impl IntoIterator for Bitboard {
    type Item = Position;
    type IntoIter = Iter;

    fn into_iter(self) -> Iter {
        Iter(self.0)
    }
}

impl FromIterator<Position> for Bitboard {
    fn from_iter<I: IntoIterator<Item = Position>>(iter: I) -> Self {
        let mut res = Bitboard::EMPTY;
        for pos in iter {
            res.set(pos);
        }
        res
    }
}
