//! Gridlock: a daily word-placement puzzle on an 8x8 board.

pub mod config;
pub mod game;
pub mod storage;
