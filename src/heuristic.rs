use crate::puzzle::Board;

/// Sum over every non-blank tile of its row and column displacement between
/// `board` and `goal`. Never exceeds the number of slides still required.
///
/// Both boards must share the same side.
pub fn manhattan(board: &Board, goal: &Board) -> u32 {
    let cells = board.tiles().len();
    debug_assert_eq!(cells, goal.tiles().len());

    let mut current_at = vec![(0usize, 0usize); cells];
    let mut goal_at = vec![(0usize, 0usize); cells];
    for i in 0..cells {
        current_at[board.tiles()[i] as usize] = board.coords(i);
        goal_at[goal.tiles()[i] as usize] = goal.coords(i);
    }

    current_at
        .iter()
        .zip(&goal_at)
        .skip(1)
        .map(|(&(row, col), &(goal_row, goal_col))| {
            (row.abs_diff(goal_row) + col.abs_diff(goal_col)) as u32
        })
        .sum()
}
