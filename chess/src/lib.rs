//! # Lightweight chess rules engine
//!
//! `lightchess` keeps a chess board packed into 64 bytes, generates the moves of every piece kind
//! (including castling, en passant and promotion) and runs a game on top of it, accepting moves by
//! their source and destination squares and taking them back on request.
//!
//! The engine knows how the pieces move, but it doesn't detect checks, checkmates or draws.
//!
//! # Example
//!
//! ```
//! use lightchess::{Board, Game, Kind, Position};
//!
//! let mut game = Game::new(Board::standard());
//! for (src, dst) in [("e2", "e4"), ("d7", "d5"), ("e4", "d5")] {
//!     let src: Position = src.parse().unwrap();
//!     let dst: Position = dst.parse().unwrap();
//!     game.try_make_move(src, dst).unwrap();
//! }
//!
//! let d5: Position = "d5".parse().unwrap();
//! assert_eq!(game.board().at(d5).kind(), Kind::Pawn);
//! assert_eq!(game.len(), 3);
//! ```

pub use lightchess_base::{bitboard, geometry, types};

pub mod board;
pub mod castling;
pub mod game;
pub mod movegen;
pub mod moves;

pub use bitboard::Bitboard;
pub use board::{Board, BoardError};
pub use game::{Game, Mode, MoveError, Options};
pub use movegen::MoveList;
pub use moves::{Move, MoveKind};
pub use types::{
    CastlingSide, Color, ColorParseError, File, GameFlags, Kind, Piece, PieceError,
    PieceParseError, Position, PositionError, PositionParseError, Rank,
};
