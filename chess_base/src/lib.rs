//! # Base types for lightchess
//!
//! This is an auxiliary crate for `lightchess`, which contains the value types the rules engine is
//! built from: squares, colors, the packed piece byte and the game flags.
//!
//! Normally you don't want to use this crate directly. Use `lightchess` instead, which re-exports
//! everything declared here.

pub mod bitboard;
pub mod geometry;
pub mod types;
