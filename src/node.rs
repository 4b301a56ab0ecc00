use std::fmt;

use crate::{
    heuristic::manhattan,
    puzzle::{Board, Move},
};

////////////////////////////////////////////////////////////////////////////////

/// Creation-ordered identifier of a search node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonic id source owned by a single search.
#[derive(Debug, Default)]
pub struct NodeIds {
    next: u64,
}

impl NodeIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> NodeId {
        let id = NodeId(self.next);
        self.next += 1;
        id
    }

    /// Number of ids handed out so far.
    pub fn issued(&self) -> u64 {
        self.next
    }
}

////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone)]
pub struct StateNode {
    id: NodeId,
    board: Board,
    g: u32,
    h: u32,
    /// Slide that produced this board, `None` for the start node.
    via: Option<Move>,
}

impl StateNode {
    pub fn new(id: NodeId, board: Board, g: u32, h: u32, via: Option<Move>) -> Self {
        Self {
            id,
            board,
            g,
            h,
            via,
        }
    }

    /// Root node of a search towards `goal`.
    pub fn start(ids: &mut NodeIds, board: Board, goal: &Board) -> Self {
        let h = manhattan(&board, goal);
        Self::new(ids.next_id(), board, 0, h, None)
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn into_board(self) -> Board {
        self.board
    }

    pub fn g(&self) -> u32 {
        self.g
    }

    pub fn h(&self) -> u32 {
        self.h
    }

    pub fn f(&self) -> u32 {
        self.g + self.h
    }

    pub fn via(&self) -> Option<Move> {
        self.via
    }

    /// Same node under another identity; used when an expanded board
    /// returns to the frontier.
    pub fn with_id(mut self, id: NodeId) -> Self {
        self.id = id;
        self
    }

    /// Records a cheaper path to the same board. Board and `h` are untouched.
    pub fn improve(&mut self, g: u32, via: Option<Move>) {
        debug_assert!(g < self.g);
        self.g = g;
        self.via = via;
    }

    /// Multi-line description used as a graph node label.
    pub fn label(&self) -> String {
        let mut out = format!("state{}\n", self.id);
        for row in self.board.rows() {
            for val in row {
                out.push_str(&format!(" {}", val));
            }
            out.push('\n');
        }
        out.push_str(&format!(
            "level = {}\nmanhattan = {}\ncost = {}",
            self.g,
            self.h,
            self.f()
        ));
        out
    }
}

////////////////////////////////////////////////////////////////////////////////

/// Nodes reachable from `node` by one slide, in [`Move::ALL`] order.
///
/// Each successor costs one more move than its parent and carries a freshly
/// computed heuristic.
pub fn successors(node: &StateNode, goal: &Board, ids: &mut NodeIds) -> Vec<StateNode> {
    let mut out = Vec::with_capacity(4);
    for dir in Move::ALL {
        if let Some(board) = node.board.slide(dir) {
            let h = manhattan(&board, goal);
            out.push(StateNode::new(ids.next_id(), board, node.g + 1, h, Some(dir)));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn board(tiles: &[u32]) -> Board {
        Board::new(3, tiles.to_vec()).unwrap()
    }

    fn parent(tiles: &[u32], g: u32) -> (StateNode, Board, NodeIds) {
        let goal = Board::solved(3);
        let mut ids = NodeIds::new();
        let b = board(tiles);
        let h = manhattan(&b, &goal);
        let node = StateNode::new(ids.next_id(), b, g, h, None);
        (node, goal, ids)
    }

    #[rstest]
    #[case::corner(&[0, 1, 2, 3, 4, 5, 6, 7, 8], vec![Move::Down, Move::Right])]
    #[case::edge(&[1, 0, 2, 3, 4, 5, 6, 7, 8], vec![Move::Down, Move::Left, Move::Right])]
    #[case::interior(&[1, 2, 3, 4, 0, 5, 6, 7, 8], Move::ALL.to_vec())]
    #[case::bottom_right(&[1, 2, 3, 4, 5, 6, 7, 8, 0], vec![Move::Up, Move::Left])]
    fn emits_every_legal_slide(#[case] tiles: &[u32], #[case] expected: Vec<Move>) {
        let (node, goal, mut ids) = parent(tiles, 3);
        let next = successors(&node, &goal, &mut ids);

        let dirs: Vec<Move> = next.iter().filter_map(|n| n.via()).collect();
        assert_eq!(dirs, expected);

        for (succ, dir) in next.iter().zip(&expected) {
            assert_eq!(succ.board(), &node.board().slide(*dir).unwrap());
            assert_eq!(succ.g(), 4);
            assert_eq!(succ.h(), manhattan(succ.board(), &goal));
            assert_eq!(succ.f(), succ.g() + succ.h());
        }
    }

    #[test]
    fn successor_h_is_recomputed() {
        let (node, goal, mut ids) = parent(&[1, 2, 3, 4, 5, 6, 7, 0, 8], 0);
        assert_eq!(node.h(), 1);
        let hs: Vec<u32> = successors(&node, &goal, &mut ids)
            .iter()
            .map(StateNode::h)
            .collect();
        // up, left, right
        assert_eq!(hs, vec![2, 2, 0]);
    }

    #[test]
    fn ids_are_unique_and_increasing() {
        let (node, goal, mut ids) = parent(&[1, 2, 3, 4, 0, 5, 6, 7, 8], 0);
        let next = successors(&node, &goal, &mut ids);
        let got: Vec<u64> = next.iter().map(|n| n.id().0).collect();
        assert_eq!(got, vec![1, 2, 3, 4]);
        assert_eq!(ids.issued(), 5);
    }

    #[test]
    fn improve_keeps_h() {
        let (mut node, _, _) = parent(&[1, 2, 3, 4, 5, 6, 7, 0, 8], 6);
        node.improve(2, Some(Move::Left));
        assert_eq!((node.g(), node.h(), node.f()), (2, 1, 3));
        assert_eq!(node.via(), Some(Move::Left));
    }

    #[test]
    fn label_lists_board_and_costs() {
        let (node, _, _) = parent(&[1, 2, 3, 4, 5, 6, 7, 0, 8], 2);
        assert_eq!(
            node.label(),
            "state0\n 1 2 3\n 4 5 6\n 7 0 8\nlevel = 2\nmanhattan = 1\ncost = 3"
        );
    }
}
