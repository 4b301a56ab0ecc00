use std::io::Read;

use crate::{error::InputError, puzzle::Board};

/// A start/goal pair over the same side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance {
    pub start: Board,
    pub goal: Board,
}

impl Instance {
    pub fn side(&self) -> usize {
        self.start.side()
    }

    /// Goal reachable from start, by permutation parity.
    pub fn is_solvable(&self) -> bool {
        self.start.is_solvable_towards(&self.goal)
    }
}

/// Parses whitespace-separated integers: the side `N`, then `N*N` tiles of the
/// start board, then `N*N` tiles of the goal board.
pub fn parse_instance(text: &str) -> Result<Instance, InputError> {
    let mut tokens = text.split_whitespace();

    let size_token = tokens.next().ok_or(InputError::Empty)?;
    let side = parse_token::<i64>(size_token)?;
    if side <= 0 {
        return Err(InputError::InvalidSize(side));
    }
    let side = side as usize;
    let cells = side
        .checked_mul(side)
        .ok_or(InputError::InvalidSize(side as i64))?;

    let start = read_board(&mut tokens, side, cells, "start board")?;
    let goal = read_board(&mut tokens, side, cells, "goal board")?;

    if let Some(token) = tokens.next() {
        return Err(InputError::Trailing {
            token: token.to_owned(),
        });
    }

    Ok(Instance { start, goal })
}

/// Reads the whole of `reader` and parses it with [`parse_instance`].
pub fn read_instance<R: Read>(mut reader: R) -> Result<Instance, InputError> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    parse_instance(&text)
}

fn read_board<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    side: usize,
    cells: usize,
    what: &'static str,
) -> Result<Board, InputError> {
    let tiles = tokens
        .take(cells)
        .map(parse_token::<u32>)
        .collect::<Result<Vec<_>, _>>()?;

    if tiles.len() != cells {
        return Err(InputError::WrongCount {
            what,
            expected: cells,
            found: tiles.len(),
        });
    }

    Ok(Board::new(side, tiles)?)
}

fn parse_token<T: std::str::FromStr>(token: &str) -> Result<T, InputError> {
    token.parse().map_err(|_| InputError::InvalidToken {
        token: token.to_owned(),
    })
}
