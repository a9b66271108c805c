//! Plan-once, replay-per-tick agent.

use crate::engine::Move;
use crate::solver::{solve, PlanningState, StrategyKind};
use std::collections::VecDeque;
use tracing::{debug, info};

/// An agent that searches for a complete plan the first time it is asked for a
/// move, then hands the plan out one move per call.
///
/// When the buffer runs dry it searches again from the state it is given. A
/// failed search leaves the buffer empty and the agent answers `Move::Stop`.
#[derive(Clone, Debug)]
pub struct PlanningAgent {
    strategy: StrategyKind,
    moves: VecDeque<Move>,
    plans_computed: u32,
}

impl PlanningAgent {
    pub fn new(strategy: StrategyKind) -> Self {
        PlanningAgent {
            strategy,
            moves: VecDeque::new(),
            plans_computed: 0,
        }
    }

    pub fn strategy(&self) -> StrategyKind {
        self.strategy
    }

    /// Number of searches run so far.
    pub fn plans_computed(&self) -> u32 {
        self.plans_computed
    }

    /// Moves still buffered from the current plan.
    pub fn buffered_moves(&self) -> usize {
        self.moves.len()
    }

    /// Drops the buffered plan; the next call to `get_next_move` searches again.
    pub fn reset(&mut self) {
        self.moves.clear();
    }

    /// Returns the move to play in `state`.
    ///
    /// # Arguments
    /// * `state`: The current game state. Only consulted when a new plan is needed.
    ///
    /// # Returns
    /// The next buffered move, or `Move::Stop` if no plan could be found.
    pub fn get_next_move<S: PlanningState>(&mut self, state: &S) -> Move {
        if self.moves.is_empty() {
            let solution = solve(state, self.strategy);
            self.plans_computed += 1;
            if solution.is_found() {
                info!(
                    strategy = %self.strategy,
                    moves = solution.moves.len(),
                    expanded = solution.stats.expanded,
                    "Plan computed"
                );
            } else {
                debug!(strategy = %self.strategy, "No plan available, stopping");
            }
            self.moves = solution.moves.into();
        }

        self.moves.pop_front().unwrap_or(Move::Stop)
    }
}
