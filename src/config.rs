/// What to do when a cheaper path reaches a board that was already expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReopenPolicy {
    /// Move the board back into the frontier with the lower cost.
    #[default]
    Reopen,
    /// Keep closed boards closed.
    Never,
}

#[derive(Debug, Clone, Default)]
pub struct SearchConfig {
    pub reopen: ReopenPolicy,
    /// Abort with an error after this many expansions.
    pub max_expansions: Option<usize>,
}

impl SearchConfig {
    pub fn with_reopen(mut self, reopen: ReopenPolicy) -> Self {
        self.reopen = reopen;
        self
    }

    pub fn with_max_expansions(mut self, limit: usize) -> Self {
        self.max_expansions = Some(limit);
        self
    }
}
