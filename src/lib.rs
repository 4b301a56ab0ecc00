//! Optimal solver for the N×N sliding-tile puzzle.
//!
//! [`engine::SearchEngine`] runs A* guided by the Manhattan distance from
//! [`heuristic::manhattan`] and reports the minimal number of slides between a
//! start and a goal [`puzzle::Board`].

pub mod config;
pub mod engine;
pub mod error;
pub mod frontier;
pub mod graph;
pub mod heuristic;
pub mod input;
pub mod node;
pub mod puzzle;

pub use config::{ReopenPolicy, SearchConfig};
pub use engine::{solve, EngineState, Outcome, SearchEngine, SearchStats, Solution};
pub use error::{BoardError, InputError, SearchError};
pub use graph::{DotGraph, GraphLogger, NullLogger};
pub use puzzle::{Board, Move};
