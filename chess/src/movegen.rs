//! Move generation
//!
//! There is one generator per piece kind. Each one is a pure function of the board, the moving
//! piece, its square and the bits of game context it needs: the previous move for pawns (to find
//! en passant) and the game flags for kings (to find castling).
//!
//! Generators only know how the pieces move. They don't look at the side to move and they don't
//! check whether the mover's king is left under attack.

use crate::board::Board;
use crate::moves::Move;
use crate::types::{CastlingSide, Color, GameFlags, Kind, Piece, Position};
use crate::{castling, geometry};

use std::ops::{Deref, DerefMut};
use std::slice;

use arrayvec::ArrayVec;

/// Maximum number of moves a single piece can have (a queen in the center of an empty board has 27)
pub const MAX_PIECE_MOVES: usize = 32;

const KNIGHT_OFFSETS: [(isize, isize); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

const KING_OFFSETS: [(isize, isize); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

const DIAG_DIRS: [(isize, isize); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];
const LINE_DIRS: [(isize, isize); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

/// List of moves of a single piece
#[derive(Default, Debug, Clone, Eq, PartialEq)]
pub struct MoveList(ArrayVec<Move, MAX_PIECE_MOVES>);

impl Deref for MoveList {
    type Target = ArrayVec<Move, MAX_PIECE_MOVES>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for MoveList {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for MoveList {
    type Item = Move;
    type IntoIter = arrayvec::IntoIter<Move, MAX_PIECE_MOVES>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl MoveList {
    pub fn new() -> MoveList {
        MoveList(ArrayVec::new())
    }

    /// Returns the move landing on `dst`, if any
    pub fn find_dst(&self, dst: Position) -> Option<Move> {
        self.0.iter().copied().find(|mv| mv.dst() == dst)
    }
}

/// Adds a move to `dst` if it is empty or holds an enemy piece
///
/// Returns `true` if `dst` was empty.
#[inline]
fn add_step(b: &Board, piece: Piece, src: Position, dst: Position, res: &mut MoveList) -> bool {
    let target = b.at(dst);
    if target.is_none() {
        res.push(Move::normal(src, dst, Piece::NONE));
        return true;
    }
    if target.is_enemy_of(piece) {
        res.push(Move::normal(src, dst, target));
    }
    false
}

fn add_ray(b: &Board, piece: Piece, src: Position, dir: (isize, isize), res: &mut MoveList) {
    let mut cur = src;
    while let Some(next) = cur.try_shift(dir.0, dir.1) {
        if !add_step(b, piece, src, next, res) {
            break;
        }
        cur = next;
    }
}

fn add_rays(b: &Board, piece: Piece, src: Position, dirs: &[(isize, isize)], res: &mut MoveList) {
    for &dir in dirs {
        add_ray(b, piece, src, dir, res);
    }
}

fn add_offsets(
    b: &Board,
    piece: Piece,
    src: Position,
    offsets: &[(isize, isize)],
    res: &mut MoveList,
) {
    for &(df, dr) in offsets {
        if let Some(dst) = src.try_shift(df, dr) {
            add_step(b, piece, src, dst, res);
        }
    }
}

/// Pushes a pawn move, turning it into a promotion on the last rank
fn add_pawn_move(color: Color, src: Position, dst: Position, captured: Piece, res: &mut MoveList) {
    if dst.rank() == geometry::promote_rank(color) {
        let queen = Piece::new(color, Kind::Queen);
        res.push(Move::promotion(src, dst, queen, captured));
    } else {
        res.push(Move::normal(src, dst, captured));
    }
}

/// Returns the en passant destination for the pawn `piece` on `src`, given the previous move
fn en_passant_dst(b: &Board, piece: Piece, src: Position, last: &Move) -> Option<Position> {
    let victim = b.at(last.dst());
    if victim.kind() != Kind::Pawn
        || !victim.is_enemy_of(piece)
        || last.rank_distance() != 2
        || last.src().file() != last.dst().file()
        || last.dst().rank() != src.rank()
        || last.dst().file().index().abs_diff(src.file().index()) != 1
    {
        return None;
    }
    let color = piece.color()?;
    let dst = last.dst().try_shift(0, geometry::pawn_forward_delta(color))?;
    b.at(dst).is_none().then_some(dst)
}

/// Generates the moves of the pawn `piece` standing on `src`
///
/// `last` is the previous move in the game, if any; it is only used to detect en passant.
pub fn pawn(b: &Board, piece: Piece, src: Position, last: Option<&Move>) -> MoveList {
    let mut res = MoveList::new();
    let color = match piece.color() {
        Some(c) => c,
        None => return res,
    };
    let fwd = geometry::pawn_forward_delta(color);

    if let Some(dst) = src.try_shift(0, fwd) {
        if b.at(dst).is_none() {
            add_pawn_move(color, src, dst, Piece::NONE, &mut res);
            if src.rank() == geometry::double_move_src_rank(color) {
                if let Some(dst2) = src.try_shift(0, 2 * fwd) {
                    if b.at(dst2).is_none() {
                        res.push(Move::normal(src, dst2, Piece::NONE));
                    }
                }
            }
        }
    }

    for df in [-1, 1] {
        if let Some(dst) = src.try_shift(df, fwd) {
            let target = b.at(dst);
            if target.is_enemy_of(piece) {
                add_pawn_move(color, src, dst, target, &mut res);
            }
        }
    }

    if let Some(dst) = last.and_then(|mv| en_passant_dst(b, piece, src, mv)) {
        res.push(Move::en_passant(src, dst, piece.inverted()));
    }

    res
}

/// Generates the moves of the knight `piece` standing on `src`
pub fn knight(b: &Board, piece: Piece, src: Position) -> MoveList {
    let mut res = MoveList::new();
    add_offsets(b, piece, src, &KNIGHT_OFFSETS, &mut res);
    res
}

/// Generates the moves of the bishop `piece` standing on `src`
pub fn bishop(b: &Board, piece: Piece, src: Position) -> MoveList {
    let mut res = MoveList::new();
    add_rays(b, piece, src, &DIAG_DIRS, &mut res);
    res
}

/// Generates the moves of the rook `piece` standing on `src`
pub fn rook(b: &Board, piece: Piece, src: Position) -> MoveList {
    let mut res = MoveList::new();
    add_rays(b, piece, src, &LINE_DIRS, &mut res);
    res
}

/// Generates the moves of the queen `piece` standing on `src`
pub fn queen(b: &Board, piece: Piece, src: Position) -> MoveList {
    let mut res = MoveList::new();
    add_rays(b, piece, src, &LINE_DIRS, &mut res);
    add_rays(b, piece, src, &DIAG_DIRS, &mut res);
    res
}

fn can_castle(b: &Board, color: Color, src: Position, flags: GameFlags, s: CastlingSide) -> bool {
    flags.can_castle(color, s)
        && src == castling::king_src(color)
        && b.at(castling::rook_src(color, s)) == Piece::new(color, Kind::Rook)
        && castling::pass(color, s)
            .into_iter()
            .all(|pos| b.at(pos).is_none())
}

/// Generates the moves of the king `piece` standing on `src`, including castling
pub fn king(b: &Board, piece: Piece, src: Position, flags: GameFlags) -> MoveList {
    let mut res = MoveList::new();
    add_offsets(b, piece, src, &KING_OFFSETS, &mut res);
    if let Some(color) = piece.color() {
        for s in [CastlingSide::King, CastlingSide::Queen] {
            if can_castle(b, color, src, flags, s) {
                res.push(Move::castling(src, castling::king_dst(color, s)));
            }
        }
    }
    res
}

/// Generates the moves of whatever piece stands on `src`
///
/// Returns an empty list if the square is empty.
pub fn piece_moves(b: &Board, src: Position, last: Option<&Move>, flags: GameFlags) -> MoveList {
    let piece = b.at(src);
    match piece.kind() {
        Kind::None => MoveList::new(),
        Kind::Pawn => pawn(b, piece, src, last),
        Kind::Knight => knight(b, piece, src),
        Kind::Bishop => bishop(b, piece, src),
        Kind::Rook => rook(b, piece, src),
        Kind::Queen => queen(b, piece, src),
        Kind::King => king(b, piece, src, flags),
    }
}
