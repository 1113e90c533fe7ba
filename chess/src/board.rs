//! Board and related things

use crate::types::{Color, File, Kind, Piece, PieceError, Position, PositionError, Rank};

use std::fmt::{self, Display};

use thiserror::Error;

/// Error building a [`Board`] from packed rank words
#[derive(Debug, Copy, Clone, Error, Eq, PartialEq)]
pub enum BoardError {
    /// Some byte doesn't encode a piece
    #[error("invalid piece on {pos}: {source}")]
    InvalidPiece { pos: Position, source: PieceError },
}

/// Chess board
///
/// Holds 64 squares, one byte per square, packed rank by rank into eight `u64` words. Byte `x` of
/// word `y` is the square on file `x`, rank index `y` (rank index 0 is the 8th rank).
///
/// The board knows nothing about the rules: [`Board::set()`] puts any piece on any square. All the
/// legality checks live in [`movegen`](crate::movegen) and [`Game`](crate::game::Game).
///
/// # Example
///
/// ```
/// # use lightchess::{Board, Color, File, Kind, Piece, Position, Rank};
/// #
/// let mut board = Board::empty();
/// let e4 = Position::from_parts(File::E, Rank::R4);
/// board.set(e4, Piece::new(Color::White, Kind::Knight));
/// assert_eq!(board.at(e4), Piece::new(Color::White, Kind::Knight));
/// assert_eq!(board.get(4, 4), Ok(Piece::new(Color::White, Kind::Knight)));
/// assert!(board.get(8, 4).is_err());
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    ranks: [u64; 8],
}

impl Board {
    const STANDARD: [u64; 8] = [
        0x8482_8386_8583_8284,
        0x8181_8181_8181_8181,
        0,
        0,
        0,
        0,
        0x0101_0101_0101_0101,
        0x0402_0306_0503_0204,
    ];

    /// Returns a board with the initial position
    #[inline]
    pub const fn standard() -> Board {
        Board {
            ranks: Self::STANDARD,
        }
    }

    /// Returns a board without any pieces
    #[inline]
    pub const fn empty() -> Board {
        Board { ranks: [0; 8] }
    }

    /// Builds a board from eight packed rank words
    ///
    /// Every byte is validated, so the resulting board only contains valid pieces.
    pub fn from_ranks(ranks: [u64; 8]) -> Result<Board, BoardError> {
        let mut res = Board::empty();
        for pos in Position::iter() {
            let byte = (ranks[pos.rank().index()] >> (pos.file().index() * 8)) as u8;
            let piece =
                Piece::from_raw(byte).map_err(|source| BoardError::InvalidPiece { pos, source })?;
            res.set(pos, piece);
        }
        Ok(res)
    }

    /// Returns the packed rank words
    #[inline]
    pub const fn ranks(&self) -> [u64; 8] {
        self.ranks
    }

    /// Returns the contents of the square `pos`
    #[inline]
    pub fn at(&self, pos: Position) -> Piece {
        let byte = (self.ranks[pos.rank().index()] >> (pos.file().index() * 8)) as u8;
        Piece::from_raw(byte).unwrap_or(Piece::NONE)
    }

    /// Returns the contents of the square on raw file and rank indices
    #[inline]
    pub fn get(&self, file: usize, rank: usize) -> Result<Piece, PositionError> {
        Ok(self.at(Position::new(file, rank)?))
    }

    /// Returns the contents of the square with file `file` and rank `rank`
    #[inline]
    pub fn get2(&self, file: File, rank: Rank) -> Piece {
        self.at(Position::from_parts(file, rank))
    }

    /// Puts `piece` to the square `pos`, replacing whatever was there
    #[inline]
    pub fn set(&mut self, pos: Position, piece: Piece) {
        let shift = pos.file().index() * 8;
        let word = &mut self.ranks[pos.rank().index()];
        *word = (*word & !(0xff_u64 << shift)) | (u64::from(piece.raw()) << shift);
    }

    /// Puts `piece` to the square with file `file` and rank `rank`
    #[inline]
    pub fn set2(&mut self, file: File, rank: Rank, piece: Piece) {
        self.set(Position::from_parts(file, rank), piece);
    }

    /// Iterates over all the squares together with their contents
    pub fn iter(&self) -> impl Iterator<Item = (Position, Piece)> + '_ {
        Position::iter().map(move |pos| (pos, self.at(pos)))
    }

    /// Returns the first square holding `piece`, scanning from a8 to h1
    pub fn find(&self, piece: Piece) -> Option<Position> {
        self.iter().find(|&(_, p)| p == piece).map(|(pos, _)| pos)
    }

    /// Returns the number of pieces of color `c` and kind `k`
    pub fn count(&self, c: Color, k: Kind) -> usize {
        let piece = Piece::new(c, k);
        self.iter().filter(|&(_, p)| p == piece).count()
    }
}

impl Default for Board {
    #[inline]
    fn default() -> Board {
        Board::empty()
    }
}

/// Formats the board as eight lines of piece chars, the 8th rank first
impl Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        for rank in Rank::iter() {
            write!(f, "{}|", rank)?;
            for file in File::iter() {
                write!(f, "{}", self.get2(file, rank))?;
            }
            writeln!(f)?;
        }
        writeln!(f, "-+--------")?;
        write!(f, " |")?;
        for file in File::iter() {
            write!(f, "{}", file)?;
        }
        writeln!(f)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem;

    #[test]
    fn test_size() {
        assert_eq!(mem::size_of::<Board>(), 64);
    }

    #[test]
    fn test_standard() {
        let b = Board::standard();
        let back = [
            Kind::Rook,
            Kind::Knight,
            Kind::Bishop,
            Kind::Queen,
            Kind::King,
            Kind::Bishop,
            Kind::Knight,
            Kind::Rook,
        ];
        for (file, kind) in File::iter().zip(back) {
            assert_eq!(b.get2(file, Rank::R1), Piece::new(Color::White, kind));
            assert_eq!(b.get2(file, Rank::R2), Piece::new(Color::White, Kind::Pawn));
            assert_eq!(b.get2(file, Rank::R7), Piece::new(Color::Black, Kind::Pawn));
            assert_eq!(b.get2(file, Rank::R8), Piece::new(Color::Black, kind));
            for rank in [Rank::R3, Rank::R4, Rank::R5, Rank::R6] {
                assert_eq!(b.get2(file, rank), Piece::NONE);
            }
        }
        assert_eq!(b.count(Color::White, Kind::Pawn), 8);
        assert_eq!(b.count(Color::Black, Kind::King), 1);
        assert_eq!(
            b.find(Piece::new(Color::White, Kind::King)),
            Some(Position::from_parts(File::E, Rank::R1))
        );
        assert_eq!(Board::from_ranks(b.ranks()), Ok(b));
    }

    #[test]
    fn test_empty() {
        let b = Board::empty();
        assert!(b.iter().all(|(_, p)| p.is_none()));
        assert_eq!(b, Board::default());
        assert_ne!(b, Board::standard());
    }

    #[test]
    fn test_set() {
        let mut b = Board::standard();
        let e2 = Position::from_parts(File::E, Rank::R2);
        let e4 = Position::from_parts(File::E, Rank::R4);
        let pawn = b.at(e2);
        b.set(e2, Piece::NONE);
        b.set(e4, pawn);
        assert_eq!(b.at(e2), Piece::NONE);
        assert_eq!(b.at(e4), pawn);
        assert_eq!(b.get2(File::D, Rank::R4), Piece::NONE);
        assert_eq!(b.get2(File::F, Rank::R4), Piece::NONE);
        assert_eq!(b.ranks()[4], 0x0000_0001_0000_0000);

        b.set(e4, Piece::new(Color::Black, Kind::Queen));
        assert_eq!(b.at(e4), Piece::new(Color::Black, Kind::Queen));
    }

    #[test]
    fn test_checked_access() {
        let b = Board::standard();
        assert_eq!(b.get(4, 7), Ok(Piece::new(Color::White, Kind::King)));
        assert_eq!(
            b.get(8, 0),
            Err(PositionError::OutOfRange { file: 8, rank: 0 })
        );
        assert_eq!(
            b.get(0, 8),
            Err(PositionError::OutOfRange { file: 0, rank: 8 })
        );
    }

    #[test]
    fn test_from_ranks() {
        let mut ranks = [0_u64; 8];
        ranks[3] = 0x0000_0000_8600_0000;
        let b = Board::from_ranks(ranks).unwrap();
        assert_eq!(
            b.get2(File::D, Rank::R5),
            Piece::new(Color::Black, Kind::King)
        );
        assert_eq!(b.iter().filter(|(_, p)| p.is_occupied()).count(), 1);

        ranks[5] = 0x0700;
        assert_eq!(
            Board::from_ranks(ranks),
            Err(BoardError::InvalidPiece {
                pos: Position::from_parts(File::B, Rank::R3),
                source: PieceError::InvalidByte(0x07),
            })
        );

        // Empty squares with a stray color bit are normalized
        let b = Board::from_ranks([0x80; 8]).unwrap();
        assert_eq!(b, Board::empty());
    }

    #[test]
    fn test_display() {
        let res = r#"
8|rnbqkbnr
7|pppppppp
6|........
5|........
4|........
3|........
2|PPPPPPPP
1|RNBQKBNR
-+--------
 |abcdefgh
"#;
        assert_eq!(Board::standard().to_string().trim(), res.trim());
    }
}
