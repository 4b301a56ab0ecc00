use std::fmt;

use fnv::FnvHashMap;
use log::{debug, info, trace};

use crate::{
    config::SearchConfig,
    error::SearchError,
    frontier::{reconcile, Frontier, Reconciled, Visited},
    graph::{GraphLogger, NullLogger},
    node::{successors, NodeIds, StateNode},
    puzzle::{Board, Move},
};

////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// No node popped yet.
    Ready,
    Running,
    GoalFound,
    /// Frontier emptied without reaching the goal.
    Exhausted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    /// Minimal number of slides.
    pub moves: u32,
    /// Blank moves leading from the start board to the goal.
    pub path: Vec<Move>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Solved(Solution),
    Exhausted,
}

impl Outcome {
    pub fn moves(&self) -> Option<u32> {
        match self {
            Outcome::Solved(solution) => Some(solution.moves),
            Outcome::Exhausted => None,
        }
    }

    /// Move count, or `-1` when no solution exists.
    pub fn move_count(&self) -> i64 {
        self.moves().map_or(-1, i64::from)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub expanded: usize,
    pub generated: usize,
    pub discovered: usize,
    pub improved: usize,
    pub reopened: usize,
    pub max_frontier: usize,
}

impl fmt::Display for SearchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "expanded {}, generated {}, discovered {}, improved {}, reopened {}, max frontier {}",
            self.expanded,
            self.generated,
            self.discovered,
            self.improved,
            self.reopened,
            self.max_frontier
        )
    }
}

////////////////////////////////////////////////////////////////////////////////

/// A* over board configurations towards a fixed goal.
///
/// All bookkeeping lives in the engine, so independent engines never share
/// state. [`SearchEngine::solve`] resets it, which makes an engine reusable
/// for several start boards.
pub struct SearchEngine<L: GraphLogger = NullLogger> {
    goal: Board,
    config: SearchConfig,
    logger: L,
    ids: NodeIds,
    frontier: Frontier,
    visited: Visited,
    parents: FnvHashMap<Board, (Board, Move)>,
    state: EngineState,
    stats: SearchStats,
}

impl SearchEngine<NullLogger> {
    pub fn new(goal: Board, config: SearchConfig) -> Self {
        Self::with_logger(goal, config, NullLogger)
    }
}

impl<L: GraphLogger> SearchEngine<L> {
    pub fn with_logger(goal: Board, config: SearchConfig, logger: L) -> Self {
        Self {
            goal,
            config,
            logger,
            ids: NodeIds::new(),
            frontier: Frontier::new(),
            visited: Visited::new(),
            parents: FnvHashMap::default(),
            state: EngineState::Ready,
            stats: SearchStats::default(),
        }
    }

    pub fn goal(&self) -> &Board {
        &self.goal
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    pub fn visited(&self) -> &Visited {
        &self.visited
    }

    pub fn logger(&self) -> &L {
        &self.logger
    }

    pub fn into_logger(self) -> L {
        self.logger
    }

    fn reset(&mut self) {
        self.ids = NodeIds::new();
        self.frontier = Frontier::new();
        self.visited = Visited::new();
        self.parents.clear();
        self.state = EngineState::Ready;
        self.stats = SearchStats::default();
    }

    /// Searches from `start` until the goal is popped or the frontier is empty.
    pub fn solve(&mut self, start: Board) -> Result<Outcome, SearchError> {
        if start.side() != self.goal.side() {
            return Err(SearchError::SideMismatch {
                start: start.side(),
                goal: self.goal.side(),
            });
        }

        self.reset();
        let root = StateNode::start(&mut self.ids, start, &self.goal);
        self.logger.record_node(root.id(), &root.label());
        self.frontier.push(root);
        self.stats.max_frontier = 1;

        loop {
            let current = match self.frontier.pop() {
                Some(node) => node,
                None => {
                    self.state = EngineState::Exhausted;
                    info!("frontier exhausted: {}", self.stats);
                    return Ok(Outcome::Exhausted);
                }
            };
            self.state = EngineState::Running;
            debug!(
                "pop state{} g={} h={} f={} {:?}",
                current.id(),
                current.g(),
                current.h(),
                current.f(),
                current.board()
            );

            if current.board() == &self.goal {
                self.state = EngineState::GoalFound;
                info!("goal reached in {} moves: {}", current.g(), self.stats);
                let path = self.path_to(current.board());
                return Ok(Outcome::Solved(Solution {
                    moves: current.g(),
                    path,
                }));
            }

            if let Some(limit) = self.config.max_expansions {
                if self.stats.expanded >= limit {
                    return Err(SearchError::ExpansionLimit { limit });
                }
            }

            self.stats.expanded += 1;
            self.visited.close(&current);

            for next in successors(&current, &self.goal, &mut self.ids) {
                self.stats.generated += 1;
                trace!("  gen state{} g={} h={}", next.id(), next.g(), next.h());
                self.merge_successor(&current, next);
            }
            self.stats.max_frontier = self.stats.max_frontier.max(self.frontier.len());
        }
    }

    /// Merges one successor of `current` into the open and closed sets and
    /// records the resulting edge.
    fn merge_successor(&mut self, current: &StateNode, next: StateNode) {
        let board = next.board().clone();
        let via = next.via();

        match reconcile(&mut self.frontier, &mut self.visited, next, self.config.reopen) {
            Reconciled::Ignored => return,
            Reconciled::Discovered => self.stats.discovered += 1,
            Reconciled::Improved => self.stats.improved += 1,
            Reconciled::Reopened => self.stats.reopened += 1,
        }

        if let Some(dir) = via {
            self.parents
                .insert(board.clone(), (current.board().clone(), dir));
        }
        if let Some(node) = self.frontier.get(&board) {
            self.logger.record_node(node.id(), &node.label());
            self.logger.record_edge(current.id(), node.id());
        }
    }

    fn path_to(&self, board: &Board) -> Vec<Move> {
        let mut path = Vec::new();
        let mut board = board;
        while let Some((prev, dir)) = self.parents.get(board) {
            path.push(*dir);
            board = prev;
        }
        path.reverse();
        path
    }
}

/// Solves a single instance with the default configuration.
pub fn solve(start: Board, goal: Board) -> Result<Outcome, SearchError> {
    SearchEngine::new(goal, SearchConfig::default()).solve(start)
}
