//! Reference oracle shared by the integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};

use tile_search::{Board, Move};

/// Exact slide distance to `goal` for every board in its component, by
/// breadth-first search.
pub fn distances_from(goal: &Board) -> HashMap<Board, u32> {
    let mut dist = HashMap::new();
    let mut queue = VecDeque::new();
    dist.insert(goal.clone(), 0);
    queue.push_back(goal.clone());

    while let Some(board) = queue.pop_front() {
        let d = dist[&board];
        for dir in Move::ALL {
            if let Some(next) = board.slide(dir) {
                if !dist.contains_key(&next) {
                    dist.insert(next.clone(), d + 1);
                    queue.push_back(next);
                }
            }
        }
    }
    dist
}

pub fn board(side: usize, tiles: &[u32]) -> Board {
    Board::new(side, tiles.to_vec()).unwrap()
}
