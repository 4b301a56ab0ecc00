use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use fnv::FnvHashMap;

use crate::{
    config::ReopenPolicy,
    node::{NodeId, StateNode},
    puzzle::Board,
};

////////////////////////////////////////////////////////////////////////////////

/// Heap key. Ordered by `f`, then `h`, then creation order.
#[derive(Debug, Clone)]
struct Entry {
    f: u32,
    h: u32,
    id: NodeId,
    board: Board,
}

impl Entry {
    fn of(node: &StateNode) -> Self {
        Self {
            f: node.f(),
            h: node.h(),
            id: node.id(),
            board: node.board().clone(),
        }
    }

    fn key(&self) -> (u32, u32, NodeId) {
        (self.f, self.h, self.id)
    }
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

////////////////////////////////////////////////////////////////////////////////

/// Open set: discovered nodes awaiting expansion, one live node per board.
///
/// Cost improvements push a fresh heap entry; entries whose node has since
/// been improved or popped are dropped lazily by [`Frontier::pop`].
#[derive(Debug, Default)]
pub struct Frontier {
    heap: BinaryHeap<Reverse<Entry>>,
    live: FnvHashMap<Board, StateNode>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub fn contains(&self, board: &Board) -> bool {
        self.live.contains_key(board)
    }

    pub fn get(&self, board: &Board) -> Option<&StateNode> {
        self.live.get(board)
    }

    /// Inserts a node for a board not yet in the frontier.
    pub fn push(&mut self, node: StateNode) {
        debug_assert!(!self.live.contains_key(node.board()));
        self.heap.push(Reverse(Entry::of(&node)));
        self.live.insert(node.board().clone(), node);
    }

    /// Lowers the cost of the live node sharing `candidate`'s board when
    /// `candidate` is strictly cheaper. Returns the updated node, which keeps
    /// its original id.
    pub fn improve(&mut self, candidate: &StateNode) -> Option<&StateNode> {
        let node = self.live.get_mut(candidate.board())?;
        if node.g() <= candidate.g() {
            return None;
        }
        node.improve(candidate.g(), candidate.via());
        self.heap.push(Reverse(Entry::of(node)));
        Some(&*node)
    }

    /// Removes and returns the node with the smallest `f`.
    pub fn pop(&mut self) -> Option<StateNode> {
        while let Some(Reverse(entry)) = self.heap.pop() {
            let current = match self.live.get(&entry.board) {
                Some(node) => node.id() == entry.id && node.f() == entry.f,
                None => false,
            };
            if current {
                return self.live.remove(&entry.board);
            }
        }
        None
    }
}

////////////////////////////////////////////////////////////////////////////////

/// Closed set: boards already expanded, with the node id and cost they were
/// expanded at.
#[derive(Debug, Default)]
pub struct Visited {
    closed: FnvHashMap<Board, (NodeId, u32)>,
}

impl Visited {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.closed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closed.is_empty()
    }

    pub fn contains(&self, board: &Board) -> bool {
        self.closed.contains_key(board)
    }

    /// Cost at which `board` was expanded.
    pub fn cost(&self, board: &Board) -> Option<u32> {
        self.closed.get(board).map(|&(_, g)| g)
    }

    /// Records `node` as expanded.
    pub fn close(&mut self, node: &StateNode) {
        self.closed
            .insert(node.board().clone(), (node.id(), node.g()));
    }

    /// Takes `board` out of the closed set so it can be expanded again,
    /// returning the id it was expanded under.
    pub fn reopen(&mut self, board: &Board) -> Option<NodeId> {
        self.closed.remove(board).map(|(id, _)| id)
    }
}

////////////////////////////////////////////////////////////////////////////////

/// How a generated node was merged into the open and closed sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciled {
    /// First sighting; pushed into the frontier.
    Discovered,
    /// Cheaper path to a board already in the frontier; updated in place.
    Improved,
    /// Cheaper path to an expanded board; moved back into the frontier under
    /// its previous id.
    Reopened,
    /// Nothing changed.
    Ignored,
}

/// Merges `candidate` into `frontier` and `visited`.
///
/// After a non-ignored result the frontier holds the candidate's board at
/// the candidate's cost.
pub fn reconcile(
    frontier: &mut Frontier,
    visited: &mut Visited,
    candidate: StateNode,
    policy: ReopenPolicy,
) -> Reconciled {
    if frontier.contains(candidate.board()) {
        return match frontier.improve(&candidate) {
            Some(_) => Reconciled::Improved,
            None => Reconciled::Ignored,
        };
    }

    match visited.cost(candidate.board()) {
        None => {
            frontier.push(candidate);
            Reconciled::Discovered
        }
        Some(closed) if candidate.g() < closed && policy == ReopenPolicy::Reopen => {
            match visited.reopen(candidate.board()) {
                Some(id) => frontier.push(candidate.with_id(id)),
                None => frontier.push(candidate),
            }
            Reconciled::Reopened
        }
        Some(_) => Reconciled::Ignored,
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::{node::NodeIds, puzzle::Move};

    fn node(ids: &mut NodeIds, board: &Board, g: u32, h: u32) -> StateNode {
        StateNode::new(ids.next_id(), board.clone(), g, h, None)
    }

    fn boards() -> Vec<Board> {
        let b = Board::solved(3);
        vec![
            b.clone(),
            b.slide(Move::Up).unwrap(),
            b.slide(Move::Left).unwrap(),
            b.slide(Move::Left).unwrap().slide(Move::Up).unwrap(),
        ]
    }

    #[test]
    fn pops_in_ascending_f() {
        let mut ids = NodeIds::new();
        let b = boards();
        let mut frontier = Frontier::new();
        frontier.push(node(&mut ids, &b[0], 5, 3));
        frontier.push(node(&mut ids, &b[1], 1, 1));
        frontier.push(node(&mut ids, &b[2], 2, 4));

        let fs: Vec<u32> = std::iter::from_fn(|| frontier.pop())
            .map(|n| n.f())
            .collect();
        assert_eq!(fs, vec![2, 6, 8]);
        assert!(frontier.is_empty());
    }

    #[test]
    fn ties_prefer_lower_h_then_older() {
        let mut ids = NodeIds::new();
        let b = boards();
        let mut frontier = Frontier::new();
        frontier.push(node(&mut ids, &b[0], 1, 3));
        frontier.push(node(&mut ids, &b[1], 3, 1));
        frontier.push(node(&mut ids, &b[2], 2, 2));
        frontier.push(node(&mut ids, &b[3], 3, 1));

        let order: Vec<u64> = std::iter::from_fn(|| frontier.pop())
            .map(|n| n.id().0)
            .collect();
        assert_eq!(order, vec![1, 3, 2, 0]);
    }

    #[test]
    fn improvement_updates_in_place() {
        let mut ids = NodeIds::new();
        let b = boards();
        let mut frontier = Frontier::new();
        frontier.push(node(&mut ids, &b[0], 4, 2));
        frontier.push(node(&mut ids, &b[1], 3, 2));

        let cheaper = node(&mut ids, &b[0], 1, 2);
        let updated = frontier.improve(&cheaper).unwrap();
        assert_eq!((updated.id(), updated.g(), updated.f()), (NodeId(0), 1, 3));
        assert_eq!(frontier.len(), 2);

        let first = frontier.pop().unwrap();
        assert_eq!((first.id(), first.g()), (NodeId(0), 1));
        let second = frontier.pop().unwrap();
        assert_eq!(second.id(), NodeId(1));
        // the stale entry for b[0] must not resurface
        assert!(frontier.pop().is_none());
    }

    #[test]
    fn equal_or_worse_cost_is_ignored() {
        let mut ids = NodeIds::new();
        let b = boards();
        let mut frontier = Frontier::new();
        frontier.push(node(&mut ids, &b[0], 2, 2));

        assert!(frontier.improve(&node(&mut ids, &b[0], 2, 2)).is_none());
        assert!(frontier.improve(&node(&mut ids, &b[0], 5, 2)).is_none());
        assert!(frontier.improve(&node(&mut ids, &b[1], 0, 2)).is_none());
        assert_eq!(frontier.get(&b[0]).map(StateNode::g), Some(2));
    }

    #[test]
    fn visited_reopen() {
        let mut ids = NodeIds::new();
        let b = boards();
        let closed = node(&mut ids, &b[0], 3, 2);
        let mut visited = Visited::new();
        visited.close(&closed);
        assert!(visited.contains(&b[0]));
        assert_eq!(visited.cost(&b[0]), Some(3));
        assert_eq!(visited.reopen(&b[0]), Some(closed.id()));
        assert_eq!(visited.reopen(&b[0]), None);
        assert!(visited.is_empty());
    }

    /// A board closed at g=5 and generated again at g=3.
    fn cheaper_rediscovery() -> (Frontier, Visited, StateNode, StateNode) {
        let mut ids = NodeIds::new();
        let b = boards();
        let closed = node(&mut ids, &b[0], 5, 2);
        let mut visited = Visited::new();
        visited.close(&closed);

        let mut frontier = Frontier::new();
        frontier.push(node(&mut ids, &b[1], 4, 4));

        let candidate = StateNode::new(ids.next_id(), b[0].clone(), 3, 2, Some(Move::Left));
        (frontier, visited, closed, candidate)
    }

    #[test]
    fn reopen_moves_closed_board_back_to_frontier() {
        let (mut frontier, mut visited, closed, candidate) = cheaper_rediscovery();
        let board = candidate.board().clone();

        let result = reconcile(&mut frontier, &mut visited, candidate, ReopenPolicy::Reopen);
        assert_eq!(result, Reconciled::Reopened);
        assert!(!visited.contains(&board));

        let reopened = frontier.get(&board).unwrap();
        assert_eq!((reopened.g(), reopened.f()), (3, 5));
        assert_eq!(reopened.id(), closed.id());
        assert_eq!(reopened.via(), Some(Move::Left));
        assert_eq!(frontier.len(), 2);

        let first = frontier.pop().unwrap();
        assert_eq!((first.board(), first.g()), (&board, 3));
    }

    #[test]
    fn never_policy_leaves_closed_board_alone() {
        let (mut frontier, mut visited, _, candidate) = cheaper_rediscovery();
        let board = candidate.board().clone();

        let result = reconcile(&mut frontier, &mut visited, candidate, ReopenPolicy::Never);
        assert_eq!(result, Reconciled::Ignored);
        assert_eq!(visited.cost(&board), Some(5));
        assert!(!frontier.contains(&board));
        assert_eq!(frontier.len(), 1);
    }

    #[rstest]
    #[case(ReopenPolicy::Reopen)]
    #[case(ReopenPolicy::Never)]
    fn costlier_rediscovery_of_closed_board_is_ignored(#[case] policy: ReopenPolicy) {
        let mut ids = NodeIds::new();
        let b = boards();
        let mut visited = Visited::new();
        visited.close(&node(&mut ids, &b[0], 2, 2));
        let mut frontier = Frontier::new();

        let candidate = node(&mut ids, &b[0], 2, 2);
        let result = reconcile(&mut frontier, &mut visited, candidate, policy);
        assert_eq!(result, Reconciled::Ignored);
        assert!(frontier.is_empty());
        assert_eq!(visited.cost(&b[0]), Some(2));
    }

    #[test]
    fn reconcile_discovers_and_improves() {
        let mut ids = NodeIds::new();
        let b = boards();
        let mut frontier = Frontier::new();
        let mut visited = Visited::new();
        let policy = ReopenPolicy::default();

        let first = node(&mut ids, &b[1], 6, 1);
        let first_id = first.id();
        assert_eq!(
            reconcile(&mut frontier, &mut visited, first, policy),
            Reconciled::Discovered
        );
        assert_eq!(
            reconcile(&mut frontier, &mut visited, node(&mut ids, &b[1], 6, 1), policy),
            Reconciled::Ignored
        );
        assert_eq!(
            reconcile(&mut frontier, &mut visited, node(&mut ids, &b[1], 2, 1), policy),
            Reconciled::Improved
        );

        let live = frontier.get(&b[1]).unwrap();
        assert_eq!((live.id(), live.g()), (first_id, 2));
        assert_eq!(frontier.len(), 1);
    }
}
