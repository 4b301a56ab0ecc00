use rand::{seq::SliceRandom, Rng};
use std::fmt;

use crate::error::BoardError;

/// Largest supported side; every label of a `MAX_SIDE`² board fits in a `u16`.
pub const MAX_SIDE: usize = 255;

/// Direction the blank travels when a neighbouring tile slides into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    /// Successor emission order.
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    /// `(row, col)` delta applied to the blank.
    pub fn offset(&self) -> (isize, isize) {
        match self {
            Move::Up => (-1, 0),
            Move::Down => (1, 0),
            Move::Left => (0, -1),
            Move::Right => (0, 1),
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Move::Up => Move::Down,
            Move::Down => Move::Up,
            Move::Left => Move::Right,
            Move::Right => Move::Left,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            Move::Up => "Up",
            Move::Down => "Down",
            Move::Left => "Left",
            Move::Right => "Right",
        };
        write!(f, "{}", s)
    }
}

/// A permutation of `0..side*side` laid out row-major; `0` is the blank.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Board {
    side: usize,
    tiles: Vec<u16>,
    blank: usize,
}

impl Board {
    /// Validates that `tiles` holds every label of a `side`×`side` board exactly once.
    pub fn new(side: usize, tiles: Vec<u32>) -> Result<Self, BoardError> {
        Self::check_side(side)?;

        let cells = side * side;
        if tiles.len() != cells {
            return Err(BoardError::WrongLength {
                expected: cells,
                found: tiles.len(),
            });
        }

        let max = (cells - 1) as u32;
        let mut seen = vec![false; cells];
        for &label in &tiles {
            if label > max {
                return Err(BoardError::LabelOutOfRange { label, max });
            }
            if std::mem::replace(&mut seen[label as usize], true) {
                return Err(BoardError::DuplicateLabel(label));
            }
        }

        // length and uniqueness together guarantee a blank exists
        let blank = tiles.iter().position(|&t| t == 0).unwrap_or_default();
        let tiles = tiles.into_iter().map(|t| t as u16).collect();

        Ok(Self { side, tiles, blank })
    }

    /// Sides outside `1..=MAX_SIDE` are rejected.
    pub fn check_side(side: usize) -> Result<(), BoardError> {
        if side == 0 {
            return Err(BoardError::SideTooSmall(side));
        }
        if side > MAX_SIDE {
            return Err(BoardError::SideTooLarge { side });
        }
        Ok(())
    }

    /// The canonical goal: `1, 2, ..., side*side - 1` followed by the blank.
    pub fn solved(side: usize) -> Self {
        let cells = side * side;
        let tiles = (1..cells as u16).chain(std::iter::once(0)).collect();

        Self {
            side,
            tiles,
            blank: cells - 1,
        }
    }

    /// Random walk of `moves` slides away from [`Board::solved`], never undoing
    /// the previous slide. The result is always solvable towards the solved board.
    pub fn scrambled<R: Rng + ?Sized>(side: usize, moves: usize, rng: &mut R) -> Self {
        let mut board = Self::solved(side);
        let mut last: Option<Move> = None;

        for _ in 0..moves {
            let candidates: Vec<Move> = Move::ALL
                .iter()
                .copied()
                .filter(|dir| last.map_or(true, |l| *dir != l.opposite()))
                .filter(|dir| board.can_slide(*dir))
                .collect();

            // a 1x1 board has no legal slide and stays solved
            if let Some(&dir) = candidates.choose(rng) {
                board.apply_move(dir);
                last = Some(dir);
            }
        }

        board
    }

    pub fn side(&self) -> usize {
        self.side
    }

    pub fn tiles(&self) -> &[u16] {
        &self.tiles
    }

    /// Flat index of the blank.
    pub fn blank(&self) -> usize {
        self.blank
    }

    /// `(row, col)` of a flat index.
    pub fn coords(&self, index: usize) -> (usize, usize) {
        (index / self.side, index % self.side)
    }

    fn target(&self, dir: Move) -> Option<usize> {
        let (row, col) = self.coords(self.blank);
        let (dr, dc) = dir.offset();

        let new_row = row as isize + dr;
        let new_col = col as isize + dc;
        let side = self.side as isize;

        if new_row >= 0 && new_row < side && new_col >= 0 && new_col < side {
            Some(new_row as usize * self.side + new_col as usize)
        } else {
            None
        }
    }

    pub fn can_slide(&self, dir: Move) -> bool {
        self.target(dir).is_some()
    }

    /// Moves the blank in place; returns `false` when it would leave the grid.
    pub fn apply_move(&mut self, dir: Move) -> bool {
        match self.target(dir) {
            Some(next) => {
                self.tiles.swap(self.blank, next);
                self.blank = next;
                true
            }
            None => false,
        }
    }

    /// The board reached by moving the blank, if that slide is legal.
    pub fn slide(&self, dir: Move) -> Option<Self> {
        let mut next = self.clone();
        if next.apply_move(dir) {
            Some(next)
        } else {
            None
        }
    }

    /// Whether `goal` is reachable from `self` by legal slides.
    ///
    /// Every slide is a transposition with the blank and moves the blank by one
    /// cell, so the permutation carrying `self` onto `goal` must have the same
    /// parity as the blank's Manhattan displacement.
    pub fn is_solvable_towards(&self, goal: &Board) -> bool {
        if self.side != goal.side {
            return false;
        }

        let mut goal_index = vec![0usize; self.tiles.len()];
        for (i, &label) in goal.tiles.iter().enumerate() {
            goal_index[label as usize] = i;
        }
        let relative: Vec<usize> = self
            .tiles
            .iter()
            .map(|&label| goal_index[label as usize])
            .collect();

        let (row, col) = self.coords(self.blank);
        let (goal_row, goal_col) = goal.coords(goal.blank);
        let blank_distance = row.abs_diff(goal_row) + col.abs_diff(goal_col);

        count_inversions(&relative) % 2 == blank_distance % 2
    }

    /// Renders one row per line, as used in graph labels and the CLI.
    pub fn rows(&self) -> impl Iterator<Item = &[u16]> {
        self.tiles.chunks(self.side)
    }
}

fn count_inversions(flattened: &[usize]) -> usize {
    flattened
        .iter()
        .enumerate()
        .map(|(i, &val)| {
            flattened[i + 1..]
                .iter()
                .filter(|&&next| next < val)
                .count()
        })
        .sum()
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board{:?}", self.tiles)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = (self.tiles.len() - 1).to_string().len();
        for row in self.rows() {
            for &val in row {
                write!(f, "{:width$} ", val, width = width)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
