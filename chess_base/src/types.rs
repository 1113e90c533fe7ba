use std::fmt::{self, Display};
use std::hint;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum PositionError {
    #[error("position ({file}, {rank}) is outside the board")]
    OutOfRange { file: usize, rank: usize },
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum PositionParseError {
    #[error("unexpected file char {0:?}")]
    UnexpectedFileChar(char),
    #[error("unexpected rank char {0:?}")]
    UnexpectedRankChar(char),
    #[error("invalid string length")]
    BadLength,
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum PieceError {
    #[error("byte {0:#04x} does not encode a piece")]
    InvalidByte(u8),
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum PieceParseError {
    #[error("unexpected piece char {0:?}")]
    UnexpectedChar(char),
    #[error("invalid string length")]
    BadLength,
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("unexpected color char {0:?}")]
    UnexpectedChar(char),
    #[error("invalid string length")]
    BadLength,
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
#[repr(u8)]
pub enum File {
    A = 0,
    B = 1,
    C = 2,
    D = 3,
    E = 4,
    F = 5,
    G = 6,
    H = 7,
}

impl File {
    pub const fn index(&self) -> usize {
        *self as u8 as usize
    }

    const fn from_index_masked(val: usize) -> Self {
        match val & 7 {
            0 => File::A,
            1 => File::B,
            2 => File::C,
            3 => File::D,
            4 => File::E,
            5 => File::F,
            6 => File::G,
            _ => File::H,
        }
    }

    pub const fn try_from_index(val: usize) -> Option<Self> {
        if val < 8 {
            Some(Self::from_index_masked(val))
        } else {
            None
        }
    }

    pub const fn from_index(val: usize) -> Self {
        assert!(val < 8, "file index must be between 0 and 7");
        Self::from_index_masked(val)
    }

    pub fn iter() -> impl Iterator<Item = Self> {
        (0..8).map(Self::from_index_masked)
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'a'..='h' => Some(Self::from_index_masked((u32::from(c) - u32::from('a')) as usize)),
            _ => None,
        }
    }

    pub fn as_char(&self) -> char {
        (b'a' + *self as u8) as char
    }
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}", self.as_char())
    }
}

/// Board rank
///
/// Ranks are indexed from the top of the board: [`Rank::R8`] has index 0, [`Rank::R1`] has index 7.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
#[repr(u8)]
pub enum Rank {
    R8 = 0,
    R7 = 1,
    R6 = 2,
    R5 = 3,
    R4 = 4,
    R3 = 5,
    R2 = 6,
    R1 = 7,
}

impl Rank {
    pub const fn index(&self) -> usize {
        *self as u8 as usize
    }

    const fn from_index_masked(val: usize) -> Self {
        match val & 7 {
            0 => Rank::R8,
            1 => Rank::R7,
            2 => Rank::R6,
            3 => Rank::R5,
            4 => Rank::R4,
            5 => Rank::R3,
            6 => Rank::R2,
            _ => Rank::R1,
        }
    }

    pub const fn try_from_index(val: usize) -> Option<Self> {
        if val < 8 {
            Some(Self::from_index_masked(val))
        } else {
            None
        }
    }

    pub const fn from_index(val: usize) -> Self {
        assert!(val < 8, "rank index must be between 0 and 7");
        Self::from_index_masked(val)
    }

    pub fn iter() -> impl Iterator<Item = Self> {
        (0..8).map(Self::from_index_masked)
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '1'..='8' => Some(Self::from_index_masked((u32::from('8') - u32::from(c)) as usize)),
            _ => None,
        }
    }

    pub fn as_char(&self) -> char {
        (b'8' - *self as u8) as char
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}", self.as_char())
    }
}

/// Square on the board
///
/// Holds a file and a rank, both in `0..8`, packed into one byte. A `Position` can never be
/// out of range: raw indices go through [`Position::new()`], which rejects them instead of
/// wrapping.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position(u8);

impl Position {
    /// Creates a position from raw file and rank indices
    pub const fn new(file: usize, rank: usize) -> Result<Position, PositionError> {
        if file >= 8 || rank >= 8 {
            return Err(PositionError::OutOfRange { file, rank });
        }
        Ok(Position(((rank as u8) << 3) | file as u8))
    }

    pub const fn from_parts(file: File, rank: Rank) -> Position {
        Position(((rank as u8) << 3) | file as u8)
    }

    /// Creates a position from its index `rank * 8 + file`
    pub const fn from_index(val: usize) -> Position {
        assert!(val < 64, "position index must be between 0 and 63");
        Position(val as u8)
    }

    pub const fn file(&self) -> File {
        File::from_index_masked((self.0 & 7) as usize)
    }

    pub const fn rank(&self) -> Rank {
        Rank::from_index_masked((self.0 >> 3) as usize)
    }

    /// Index of the square, equal to `rank * 8 + file`
    pub const fn index(&self) -> usize {
        self.0 as usize
    }

    /// Returns the position shifted by the given deltas, or `None` if it leaves the board
    pub fn try_shift(self, delta_file: isize, delta_rank: isize) -> Option<Position> {
        let new_file = self.file().index().wrapping_add(delta_file as usize);
        let new_rank = self.rank().index().wrapping_add(delta_rank as usize);
        Position::new(new_file, new_rank).ok()
    }

    pub fn iter() -> impl Iterator<Item = Self> {
        (0_u8..64_u8).map(Position)
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "Position({})", self)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}{}", self.file().as_char(), self.rank().as_char())
    }
}

impl FromStr for Position {
    type Err = PositionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 2 {
            return Err(PositionParseError::BadLength);
        }
        let bytes = s.as_bytes();
        let (file_ch, rank_ch) = (bytes[0] as char, bytes[1] as char);
        Ok(Position::from_parts(
            File::from_char(file_ch).ok_or(PositionParseError::UnexpectedFileChar(file_ch))?,
            Rank::from_char(rank_ch).ok_or(PositionParseError::UnexpectedRankChar(rank_ch))?,
        ))
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Color {
    White = 0,
    Black = 1,
}

impl Color {
    pub const fn inv(&self) -> Color {
        match *self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    pub fn as_char(&self) -> char {
        match *self {
            Color::White => 'w',
            Color::Black => 'b',
        }
    }

    pub fn from_char(c: char) -> Option<Color> {
        match c {
            'w' => Some(Color::White),
            'b' => Some(Color::Black),
            _ => None,
        }
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 1 {
            return Err(ColorParseError::BadLength);
        }
        let ch = s.as_bytes()[0] as char;
        Color::from_char(ch).ok_or(ColorParseError::UnexpectedChar(ch))
    }
}

/// Kind of a piece, including the empty kind
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Kind {
    None = 0,
    Pawn = 1,
    Knight = 2,
    Bishop = 3,
    Rook = 4,
    Queen = 5,
    King = 6,
}

impl Kind {
    const fn from_bits(val: u8) -> Option<Kind> {
        match val {
            0 => Some(Kind::None),
            1 => Some(Kind::Pawn),
            2 => Some(Kind::Knight),
            3 => Some(Kind::Bishop),
            4 => Some(Kind::Rook),
            5 => Some(Kind::Queen),
            6 => Some(Kind::King),
            _ => None,
        }
    }
}

/// Contents of a square, packed into one byte
///
/// The top bit holds the color (0 for White, 1 for Black), the low three bits hold the
/// [`Kind`]. All the other bits are zero. An empty square is always stored as
/// [`Piece::NONE`], regardless of the color bit it was decoded from.
#[derive(Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Piece(u8);

impl Piece {
    const COLOR_BIT: u8 = 0x80;
    const KIND_MASK: u8 = 0x07;

    pub const NONE: Piece = Piece(0);

    pub const fn new(c: Color, k: Kind) -> Piece {
        if let Kind::None = k {
            return Piece::NONE;
        }
        match c {
            Color::White => Piece(k as u8),
            Color::Black => Piece(Self::COLOR_BIT | k as u8),
        }
    }

    /// Decodes a piece from its packed byte
    pub const fn from_raw(val: u8) -> Result<Piece, PieceError> {
        if val & !(Self::COLOR_BIT | Self::KIND_MASK) != 0 {
            return Err(PieceError::InvalidByte(val));
        }
        match Kind::from_bits(val & Self::KIND_MASK) {
            Some(Kind::None) => Ok(Piece::NONE),
            Some(_) => Ok(Piece(val)),
            None => Err(PieceError::InvalidByte(val)),
        }
    }

    pub const fn raw(&self) -> u8 {
        self.0
    }

    pub const fn kind(&self) -> Kind {
        match Kind::from_bits(self.0 & Self::KIND_MASK) {
            Some(k) => k,
            None => unsafe { hint::unreachable_unchecked() },
        }
    }

    pub const fn color(&self) -> Option<Color> {
        if self.0 == 0 {
            None
        } else if self.0 & Self::COLOR_BIT == 0 {
            Some(Color::White)
        } else {
            Some(Color::Black)
        }
    }

    pub const fn is_none(&self) -> bool {
        self.0 == 0
    }

    pub const fn is_occupied(&self) -> bool {
        self.0 != 0
    }

    /// Returns `true` if both squares hold pieces and their colors differ
    pub const fn is_enemy_of(&self, other: Piece) -> bool {
        self.is_occupied() && other.is_occupied() && (self.0 ^ other.0) & Self::COLOR_BIT != 0
    }

    /// Returns the piece of the same color with kind `k`
    pub const fn with_kind(self, k: Kind) -> Piece {
        if self.is_none() || matches!(k, Kind::None) {
            return Piece::NONE;
        }
        Piece((self.0 & Self::COLOR_BIT) | k as u8)
    }

    /// Returns the piece of the same kind and the opposite color
    pub const fn inverted(self) -> Piece {
        if self.is_none() {
            return Piece::NONE;
        }
        Piece(self.0 ^ Self::COLOR_BIT)
    }

    pub fn iter() -> impl Iterator<Item = Self> {
        let kinds = [
            Kind::Pawn,
            Kind::Knight,
            Kind::Bishop,
            Kind::Rook,
            Kind::Queen,
            Kind::King,
        ];
        std::iter::once(Piece::NONE).chain(
            [Color::White, Color::Black]
                .into_iter()
                .flat_map(move |c| kinds.into_iter().map(move |k| Piece::new(c, k))),
        )
    }

    pub fn as_char(&self) -> char {
        let ch = match self.kind() {
            Kind::None => '.',
            Kind::Pawn => 'P',
            Kind::Knight => 'N',
            Kind::Bishop => 'B',
            Kind::Rook => 'R',
            Kind::Queen => 'Q',
            Kind::King => 'K',
        };
        match self.color() {
            Some(Color::Black) => ch.to_ascii_lowercase(),
            _ => ch,
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        if c == '.' {
            return Some(Piece::NONE);
        }
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        let kind = match c.to_ascii_lowercase() {
            'p' => Kind::Pawn,
            'n' => Kind::Knight,
            'b' => Kind::Bishop,
            'r' => Kind::Rook,
            'q' => Kind::Queen,
            'k' => Kind::King,
            _ => return None,
        };
        Some(Piece::new(color, kind))
    }
}

impl TryFrom<u8> for Piece {
    type Error = PieceError;

    fn try_from(val: u8) -> Result<Self, Self::Error> {
        Piece::from_raw(val)
    }
}

impl From<Piece> for u8 {
    fn from(p: Piece) -> Self {
        p.raw()
    }
}

impl fmt::Debug for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "Piece({})", self.as_char())
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for Piece {
    type Err = PieceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 1 {
            return Err(PieceParseError::BadLength);
        }
        let ch = s.as_bytes()[0] as char;
        Piece::from_char(ch).ok_or(PieceParseError::UnexpectedChar(ch))
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CastlingSide {
    Queen = 0,
    King = 1,
}

/// Game state flags
///
/// Tracks, per color, whether the king and each of the two castling rooks have moved, and
/// which side is to move. Moved bits are only ever set by [`GameFlags::mark_king_moved()`] and
/// [`GameFlags::mark_rook_moved()`]; there is no way to clear a single one.
#[derive(Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct GameFlags(u8);

impl GameFlags {
    const SIDE_BIT: u8 = 1 << 6;

    const fn rook_index(c: Color, s: CastlingSide) -> u8 {
        (c as u8) * 3 + s as u8 * 2
    }

    const fn king_index(c: Color) -> u8 {
        (c as u8) * 3 + 1
    }

    /// Nothing has moved yet, White to move
    pub const INITIAL: GameFlags = GameFlags(0);

    /// Flags with nothing moved and `side` to move
    pub const fn new(side: Color) -> GameFlags {
        match side {
            Color::White => GameFlags(0),
            Color::Black => GameFlags(Self::SIDE_BIT),
        }
    }

    pub const fn side(&self) -> Color {
        if self.0 & Self::SIDE_BIT == 0 {
            Color::White
        } else {
            Color::Black
        }
    }

    pub fn flip_side(&mut self) {
        self.0 ^= Self::SIDE_BIT;
    }

    pub const fn has_king_moved(&self, c: Color) -> bool {
        (self.0 >> Self::king_index(c)) & 1 != 0
    }

    pub const fn has_rook_moved(&self, c: Color, s: CastlingSide) -> bool {
        (self.0 >> Self::rook_index(c, s)) & 1 != 0
    }

    /// Returns `true` if neither the king of color `c` nor its rook on side `s` has moved
    pub const fn can_castle(&self, c: Color, s: CastlingSide) -> bool {
        !self.has_king_moved(c) && !self.has_rook_moved(c, s)
    }

    pub fn mark_king_moved(&mut self, c: Color) {
        self.0 |= 1 << Self::king_index(c);
    }

    pub fn mark_rook_moved(&mut self, c: Color, s: CastlingSide) {
        self.0 |= 1 << Self::rook_index(c, s);
    }

    pub const fn raw(&self) -> u8 {
        self.0
    }
}

impl fmt::Debug for GameFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "GameFlags({})", self)
    }
}

impl fmt::Display for GameFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{} ", self.side())?;
        let mut any = false;
        for (c, s, ch) in [
            (Color::White, CastlingSide::King, 'K'),
            (Color::White, CastlingSide::Queen, 'Q'),
            (Color::Black, CastlingSide::King, 'k'),
            (Color::Black, CastlingSide::Queen, 'q'),
        ] {
            if self.can_castle(c, s) {
                write!(f, "{}", ch)?;
                any = true;
            }
        }
        if !any {
            write!(f, "-")?;
        }
        Ok(())
    }
}
