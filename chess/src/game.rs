//! Game state machine

use crate::bitboard::Bitboard;
use crate::board::Board;
use crate::castling;
use crate::movegen::{self, MoveList};
use crate::moves::{Move, MoveKind};
use crate::types::{CastlingSide, Color, GameFlags, Kind, Piece, Position};

use std::fmt;

use log::{debug, trace};
use thiserror::Error;

/// Error applying a move request
#[derive(Debug, Copy, Clone, Error, PartialEq, Eq)]
pub enum MoveError {
    #[error("no piece on {0}")]
    EmptySquare(Position),
    #[error("piece on {pos} cannot move, {side} to move")]
    WrongSide { pos: Position, side: Color },
    #[error("piece on {src} cannot move to {dst}")]
    Illegal { src: Position, dst: Position },
}

/// Turn policy of a game
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Sides alternate, and only the side to move may move
    Strict,
    /// Any piece may move at any time, the side to move never changes
    Free,
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Strict
    }
}

/// Options to start a [`Game`] with
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Options {
    pub mode: Mode,
    /// Side to move first
    pub side: Color,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            mode: Mode::Strict,
            side: Color::White,
        }
    }
}

/// Chess game
///
/// Owns the board, the [game flags](GameFlags) and the history of applied moves. Moves are
/// requested by their source and destination squares and are accepted only if the move generator
/// produces them. Each history entry also keeps the flags as they were before the move, so
/// [`Game::undo()`] can roll the game back exactly.
///
/// Checks are not detected: a king may be left under attack, and even captured.
///
/// # Example
///
/// ```
/// # use lightchess::{Board, Game, Position};
/// #
/// let mut game = Game::new(Board::standard());
/// let e2: Position = "e2".parse().unwrap();
/// let e4: Position = "e4".parse().unwrap();
///
/// assert!(game.destinations(e2).has(e4));
/// assert!(game.make_move(e2, e4));
/// assert!(game.board().at(e2).is_none());
///
/// // Black is to move now
/// assert!(!game.make_move(e4, "e5".parse().unwrap()));
///
/// assert!(game.undo());
/// assert_eq!(game.board(), &Board::standard());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    board: Board,
    flags: GameFlags,
    history: Vec<(Move, GameFlags)>,
    mode: Mode,
}

impl Game {
    /// Starts a strict game with White to move
    pub fn new(board: Board) -> Game {
        Game::with_options(board, Options::default())
    }

    /// Starts a game without turn alternation
    pub fn free(board: Board) -> Game {
        Game::with_options(
            board,
            Options {
                mode: Mode::Free,
                ..Options::default()
            },
        )
    }

    /// Starts a game with the given options
    ///
    /// Kings and rooks which don't stand on their initial squares are considered moved, so they
    /// never grant castling rights.
    pub fn with_options(board: Board, options: Options) -> Game {
        let mut flags = GameFlags::new(options.side);
        for c in [Color::White, Color::Black] {
            if board.at(castling::king_src(c)) != Piece::new(c, Kind::King) {
                flags.mark_king_moved(c);
            }
            for s in [CastlingSide::King, CastlingSide::Queen] {
                if board.at(castling::rook_src(c, s)) != Piece::new(c, Kind::Rook) {
                    flags.mark_rook_moved(c, s);
                }
            }
        }
        Game {
            board,
            flags,
            history: Vec::new(),
            mode: options.mode,
        }
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn flags(&self) -> GameFlags {
        self.flags
    }

    /// Returns the side to move
    #[inline]
    pub fn side(&self) -> Color {
        self.flags.side()
    }

    #[inline]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Iterates over the applied moves, from the first one
    pub fn history(&self) -> impl Iterator<Item = Move> + '_ {
        self.history.iter().map(|(mv, _)| *mv)
    }

    #[inline]
    pub fn last_move(&self) -> Option<Move> {
        self.history.last().map(|(mv, _)| *mv)
    }

    /// Returns the number of applied moves
    #[inline]
    pub fn len(&self) -> usize {
        self.history.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    fn check_mover(&self, pos: Position) -> Result<Piece, MoveError> {
        let piece = self.board.at(pos);
        let color = piece.color().ok_or(MoveError::EmptySquare(pos))?;
        if self.mode == Mode::Strict && color != self.side() {
            return Err(MoveError::WrongSide {
                pos,
                side: self.side(),
            });
        }
        Ok(piece)
    }

    fn gen_moves(&self, src: Position) -> MoveList {
        let last = self.history.last().map(|(mv, _)| mv);
        movegen::piece_moves(&self.board, src, last, self.flags)
    }

    /// Returns all the moves of the piece on `pos`
    ///
    /// The list is empty if the square is empty or, in strict mode, if the piece doesn't belong to
    /// the side to move.
    pub fn piece_moveset(&self, pos: Position) -> MoveList {
        match self.check_mover(pos) {
            Ok(_) => self.gen_moves(pos),
            Err(_) => MoveList::new(),
        }
    }

    /// Returns the squares the piece on `pos` can move to
    pub fn destinations(&self, pos: Position) -> Bitboard {
        self.piece_moveset(pos).iter().map(|mv| mv.dst()).collect()
    }

    /// Moves the piece from `src` to `dst`
    ///
    /// On success, returns the applied move. On failure, the game is left untouched.
    pub fn try_make_move(&mut self, src: Position, dst: Position) -> Result<Move, MoveError> {
        let mv = self
            .check_mover(src)
            .and_then(|_| {
                self.gen_moves(src)
                    .find_dst(dst)
                    .ok_or(MoveError::Illegal { src, dst })
            })
            .map_err(|e| {
                debug!("rejected move {}{}: {}", src, dst, e);
                e
            })?;
        self.apply(mv);
        Ok(mv)
    }

    /// Moves the piece from `src` to `dst`, returning `true` on success
    ///
    /// See [`Game::try_make_move()`] to learn why the move was rejected.
    pub fn make_move(&mut self, src: Position, dst: Position) -> bool {
        self.try_make_move(src, dst).is_ok()
    }

    fn apply(&mut self, mv: Move) {
        let (src, dst) = (mv.src(), mv.dst());
        let piece = self.board.at(src);
        let before = self.flags;

        match mv.kind() {
            MoveKind::Normal { .. } => {
                self.board.set(dst, piece);
                self.board.set(src, Piece::NONE);
            }
            MoveKind::Promotion { promoted, .. } => {
                self.board.set(dst, promoted);
                self.board.set(src, Piece::NONE);
            }
            MoveKind::Castling => {
                self.board.set(dst, piece);
                self.board.set(src, Piece::NONE);
                if let Some(c) = piece.color() {
                    let s = castling::side(dst);
                    let (rook_src, rook_dst) = (castling::rook_src(c, s), castling::rook_dst(c, s));
                    self.board.set(rook_dst, self.board.at(rook_src));
                    self.board.set(rook_src, Piece::NONE);
                    self.flags.mark_rook_moved(c, s);
                }
            }
            MoveKind::EnPassant { .. } => {
                self.board.set(dst, piece);
                self.board.set(src, Piece::NONE);
                self.board.set(mv.captured_pos(), Piece::NONE);
            }
        }

        if piece.kind() == Kind::King {
            if let Some(c) = piece.color() {
                self.flags.mark_king_moved(c);
            }
        }
        for pos in [src, dst] {
            if let Some((c, s)) = castling::rook_home(pos) {
                self.flags.mark_rook_moved(c, s);
            }
        }
        if self.mode == Mode::Strict {
            self.flags.flip_side();
        }

        self.history.push((mv, before));
        trace!("applied move {}, flags {}", mv, self.flags);
    }

    /// Takes back the last applied move
    ///
    /// Returns `false` if there are no moves to take back.
    pub fn undo(&mut self) -> bool {
        let (mv, flags) = match self.history.pop() {
            Some(entry) => entry,
            None => return false,
        };
        let (src, dst) = (mv.src(), mv.dst());
        let piece = self.board.at(dst);

        match mv.kind() {
            MoveKind::Normal { captured } => {
                self.board.set(src, piece);
                self.board.set(dst, captured);
            }
            MoveKind::Promotion { captured, .. } => {
                self.board.set(src, piece.with_kind(Kind::Pawn));
                self.board.set(dst, captured);
            }
            MoveKind::Castling => {
                self.board.set(src, piece);
                self.board.set(dst, Piece::NONE);
                if let Some(c) = piece.color() {
                    let s = castling::side(dst);
                    let (rook_src, rook_dst) = (castling::rook_src(c, s), castling::rook_dst(c, s));
                    self.board.set(rook_src, self.board.at(rook_dst));
                    self.board.set(rook_dst, Piece::NONE);
                }
            }
            MoveKind::EnPassant { captured } => {
                self.board.set(src, piece);
                self.board.set(dst, Piece::NONE);
                self.board.set(mv.captured_pos(), captured);
            }
        }

        self.flags = flags;
        trace!("undone move {}, flags {}", mv, self.flags);
        true
    }
}

impl Default for Game {
    fn default() -> Self {
        Game::new(Board::standard())
    }
}

/// Formats the board followed by the game flags
impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}", self.board)?;
        writeln!(f, "{}", self.flags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{File, Rank};
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    fn pos(s: &str) -> Position {
        s.parse().unwrap()
    }

    fn play(game: &mut Game, moves: &str) {
        for token in moves.split_ascii_whitespace() {
            let (src, dst) = token.split_at(2);
            game.try_make_move(pos(src), pos(dst))
                .unwrap_or_else(|e| panic!("cannot apply {}: {}", token, e));
        }
    }

    fn board(items: &[(&str, char)]) -> Board {
        let mut b = Board::empty();
        for &(p, ch) in items {
            b.set(pos(p), Piece::from_char(ch).unwrap());
        }
        b
    }

    #[test]
    fn test_double_push() {
        let mut game = Game::default();
        let pawn = game.board().at(pos("e2"));
        assert!(game.make_move(pos("e2"), pos("e4")));
        assert_eq!(game.board().at(pos("e4")), pawn);
        assert!(game.board().at(pos("e2")).is_none());
        assert_eq!(game.side(), Color::Black);
        assert_eq!(
            game.last_move(),
            Some(Move::normal(pos("e2"), pos("e4"), Piece::NONE))
        );
        assert_eq!(game.len(), 1);
    }

    #[test]
    fn test_en_passant() {
        let mut game = Game::default();
        play(&mut game, "e2e4 a7a6 e4e5 d7d5");
        let moves = game.piece_moveset(pos("e5"));
        let ep = moves.find_dst(pos("d6")).unwrap();
        assert_eq!(
            ep.kind(),
            MoveKind::EnPassant {
                captured: Piece::new(Color::Black, Kind::Pawn)
            }
        );

        let before = game.clone();
        assert!(game.make_move(pos("e5"), pos("d6")));
        assert_eq!(game.board().at(pos("d6")), Piece::new(Color::White, Kind::Pawn));
        assert!(game.board().at(pos("e5")).is_none());
        assert!(game.board().at(pos("d5")).is_none());
        assert_eq!(game.board().count(Color::Black, Kind::Pawn), 7);

        assert!(game.undo());
        assert_eq!(game, before);
    }

    #[test]
    fn test_en_passant_expires() {
        let mut game = Game::default();
        play(&mut game, "e2e4 a7a6 e4e5 d7d5 h2h3 h7h6");
        assert!(!game.destinations(pos("e5")).has(pos("d6")));
        assert!(!game.make_move(pos("e5"), pos("d6")));
    }

    #[test]
    fn test_castling() {
        let b = board(&[("e1", 'K'), ("a1", 'R'), ("h1", 'R'), ("e8", 'k'), ("a8", 'r')]);
        let mut game = Game::new(b);
        let dsts = game.destinations(pos("e1"));
        assert!(dsts.has(pos("g1")));
        assert!(dsts.has(pos("c1")));

        let mv = game.try_make_move(pos("e1"), pos("g1")).unwrap();
        assert_eq!(mv.kind(), MoveKind::Castling);
        assert_eq!(game.board().at(pos("g1")), Piece::new(Color::White, Kind::King));
        assert_eq!(game.board().at(pos("f1")), Piece::new(Color::White, Kind::Rook));
        assert!(game.board().at(pos("e1")).is_none());
        assert!(game.board().at(pos("h1")).is_none());
        assert!(game.flags().has_king_moved(Color::White));
        assert!(game.flags().has_rook_moved(Color::White, CastlingSide::King));
        assert!(!game.flags().has_rook_moved(Color::White, CastlingSide::Queen));

        play(&mut game, "e8c8");
        assert_eq!(game.board().at(pos("c8")), Piece::new(Color::Black, Kind::King));
        assert_eq!(game.board().at(pos("d8")), Piece::new(Color::Black, Kind::Rook));
        assert!(game.board().at(pos("a8")).is_none());
        assert!(!game.flags().can_castle(Color::Black, CastlingSide::Queen));
        assert_eq!(game.flags().to_string(), "w -");

        assert!(game.undo());
        assert!(game.undo());
        assert_eq!(game, Game::new(b));
    }

    #[test]
    fn test_castling_rights() {
        let b = board(&[("e1", 'K'), ("a1", 'R'), ("h1", 'R'), ("e8", 'k'), ("h8", 'r')]);
        let mut game = Game::new(b);
        assert_eq!(game.flags().to_string(), "w KQk");

        // Rook leaves and returns, the right is still lost
        play(&mut game, "h1h2 e8d8 h2h1 d8e8");
        assert!(!game.destinations(pos("e1")).has(pos("g1")));
        assert!(game.destinations(pos("e1")).has(pos("c1")));

        // Capturing a rook on its corner also kills the right
        let b = board(&[("e1", 'K'), ("a1", 'R'), ("e8", 'k'), ("h8", 'r')]);
        let mut game = Game::new(b);
        play(&mut game, "a1a8 h8h1");
        assert!(game.flags().has_rook_moved(Color::Black, CastlingSide::Queen));
        assert!(game.flags().has_rook_moved(Color::White, CastlingSide::King));
        assert!(!game.flags().has_king_moved(Color::White));
    }

    #[test]
    fn test_promote() {
        let b = board(&[("b7", 'P'), ("a8", 'r'), ("e1", 'K'), ("e8", 'k')]);
        let mut game = Game::new(b);
        let moves = game.piece_moveset(pos("b7"));
        assert_eq!(moves.len(), 2);
        assert!(moves
            .iter()
            .all(|mv| matches!(mv.kind(), MoveKind::Promotion { .. })));

        assert!(game.make_move(pos("b7"), pos("a8")));
        assert_eq!(game.board().at(pos("a8")), Piece::new(Color::White, Kind::Queen));
        assert!(game.board().at(pos("b7")).is_none());
        assert!(game.undo());
        assert_eq!(game.board(), &b);

        assert!(game.make_move(pos("b7"), pos("b8")));
        assert_eq!(game.board().at(pos("b8")), Piece::new(Color::White, Kind::Queen));
        assert!(game.board().at(pos("b7")).is_none());
    }

    #[test]
    fn test_reject() {
        let mut game = Game::default();
        let before = game.clone();
        assert_eq!(
            game.try_make_move(pos("e4"), pos("e5")),
            Err(MoveError::EmptySquare(pos("e4")))
        );
        assert_eq!(
            game.try_make_move(pos("e7"), pos("e5")),
            Err(MoveError::WrongSide {
                pos: pos("e7"),
                side: Color::White
            })
        );
        assert_eq!(
            game.try_make_move(pos("e2"), pos("e5")),
            Err(MoveError::Illegal {
                src: pos("e2"),
                dst: pos("e5")
            })
        );
        assert!(!game.make_move(pos("a1"), pos("a3")));
        assert_eq!(game, before);

        assert!(game.piece_moveset(pos("e4")).is_empty());
        assert!(game.piece_moveset(pos("e7")).is_empty());
        assert!(!game.undo());
        assert_eq!(game, before);
    }

    #[test]
    fn test_free() {
        let mut game = Game::free(Board::standard());
        assert_eq!(game.mode(), Mode::Free);
        play(&mut game, "e2e4 d2d4 g8f6");
        assert_eq!(game.side(), Color::White);
        assert_eq!(game.piece_moveset(pos("e7")).len(), 2);
        assert_eq!(
            game.history().map(|mv| mv.to_string()).collect::<Vec<_>>(),
            ["e2e4", "d2d4", "g8f6"]
        );

        let game = Game::with_options(
            Board::standard(),
            Options {
                mode: Mode::Strict,
                side: Color::Black,
            },
        );
        assert!(game.piece_moveset(pos("e2")).is_empty());
        assert_eq!(game.piece_moveset(pos("e7")).len(), 2);
    }

    #[test]
    fn test_initial_flags() {
        let game = Game::default();
        assert_eq!(game.flags(), GameFlags::INITIAL);

        let b = board(&[("d1", 'K'), ("a1", 'R'), ("e8", 'k'), ("h7", 'r')]);
        let flags = Game::new(b).flags();
        assert!(flags.has_king_moved(Color::White));
        assert!(!flags.has_rook_moved(Color::White, CastlingSide::Queen));
        assert!(flags.has_rook_moved(Color::White, CastlingSide::King));
        assert!(!flags.has_king_moved(Color::Black));
        assert!(!flags.can_castle(Color::Black, CastlingSide::King));
    }

    #[test]
    fn test_king_capture() {
        // Checks are not detected, so kings may be captured
        let b = board(&[("e1", 'K'), ("e2", 'q'), ("e8", 'k')]);
        let mut game = Game::new(b);
        assert!(game.make_move(pos("e1"), pos("e2")));
        assert_eq!(game.board().count(Color::Black, Kind::Queen), 0);
        let mut game = Game::with_options(
            b,
            Options {
                mode: Mode::Strict,
                side: Color::Black,
            },
        );
        assert!(game.make_move(pos("e2"), pos("e1")));
        assert_eq!(game.board().count(Color::White, Kind::King), 0);
    }

    #[test]
    fn test_random_playout() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..20 {
            let mut game = Game::default();
            let mut snapshots = vec![game.clone()];
            for _ in 0..120 {
                let srcs: Vec<Position> = Position::iter()
                    .filter(|&p| !game.piece_moveset(p).is_empty())
                    .collect();
                let src = match srcs.choose(&mut rng) {
                    Some(&src) => src,
                    None => break,
                };
                let moves = game.piece_moveset(src);
                let mv = *moves.choose(&mut rng).unwrap();
                let side = game.side();
                assert_eq!(game.try_make_move(mv.src(), mv.dst()), Ok(mv));
                assert_eq!(game.side(), side.inv());
                assert_eq!(game.last_move(), Some(mv));
                snapshots.push(game.clone());
            }
            assert_eq!(game.len() + 1, snapshots.len());
            while let Some(expected) = snapshots.pop() {
                assert_eq!(game, expected);
                if !game.undo() {
                    assert!(snapshots.is_empty());
                }
            }
            assert_eq!(game, Game::default());
        }
    }

    #[test]
    fn test_display() {
        let game = Game::default();
        let s = game.to_string();
        assert!(s.starts_with("8|rnbqkbnr\n"));
        assert!(s.ends_with(" |abcdefgh\nw KQkq\n"));
        assert_eq!(
            game.board().get2(File::E, Rank::R1),
            Piece::new(Color::White, Kind::King)
        );
    }
}
