use std::io;

use thiserror::Error;

////////////////////////////////////////////////////////////////////////////////

/// Raised when a tile sequence is not a permutation of `0..side*side`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("board side must be at least 1, got {0}")]
    SideTooSmall(usize),
    #[error("board side must be at most {max}, got {side}", max = crate::puzzle::MAX_SIDE)]
    SideTooLarge { side: usize },
    #[error("expected {expected} tiles, found {found}")]
    WrongLength { expected: usize, found: usize },
    #[error("tile {label} is out of range (max {max})")]
    LabelOutOfRange { label: u32, max: u32 },
    #[error("tile {0} appears more than once")]
    DuplicateLabel(u32),
}

////////////////////////////////////////////////////////////////////////////////

/// Raised while reading a puzzle instance from text.
#[derive(Error, Debug)]
pub enum InputError {
    #[error("input is empty")]
    Empty,
    #[error("invalid token {token:?}")]
    InvalidToken { token: String },
    #[error("invalid board size {0}")]
    InvalidSize(i64),
    #[error("{what}: expected {expected} tiles, found {found}")]
    WrongCount {
        what: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("trailing input after goal board: {token:?}")]
    Trailing { token: String },
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

////////////////////////////////////////////////////////////////////////////////

/// Conditions that stop a search before it reaches a verdict.
///
/// Running out of frontier is a legitimate outcome and is reported through
/// [`crate::engine::Outcome::Exhausted`] instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("start board is {start}x{start} but goal board is {goal}x{goal}")]
    SideMismatch { start: usize, goal: usize },
    #[error("expansion limit of {limit} nodes reached")]
    ExpansionLimit { limit: usize },
}
