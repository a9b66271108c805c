//! Cost and heuristic evaluators for the search strategies.
//!
//! Every function here has the shape `fn(&SearchContext, &SearchNode<S>) -> i64`
//! so it can be plugged into a [`Strategy`](crate::solver::Strategy):
//! - `bfs_cost` + `zero_heuristic`: uninformed search, priority = path length + 1.
//! - `astar_cost` + `furthest_item_heuristic`: goal-directed search that credits
//!   collected items in the cost and debits the remaining ones in the heuristic.
use crate::engine::{ItemGrid, Position};
use crate::solver::{PlanningState, SearchContext, SearchNode};

/// Manhattan (taxicab) distance between two cells.
///
/// # Examples
/// ```
/// use grid_planner::heuristics::manhattan_distance;
/// assert_eq!(manhattan_distance((0, 0), (2, 3)), 5);
/// assert_eq!(manhattan_distance((4, 1), (1, 4)), 6);
/// ```
pub fn manhattan_distance(a: Position, b: Position) -> usize {
    a.0.abs_diff(b.0) + a.1.abs_diff(b.1)
}

/// Number of items still on the grid of `state`.
pub fn remaining_items<S: PlanningState>(state: &S) -> usize {
    state.item_grid().count()
}

/// BFS cost: every move costs one, so this is the path length plus one.
pub fn bfs_cost<S>(_ctx: &SearchContext, node: &SearchNode<S>) -> i64 {
    1 + node.path.len() as i64
}

/// BFS heuristic: no information at all.
pub fn zero_heuristic<S>(_ctx: &SearchContext, _node: &SearchNode<S>) -> i64 {
    0
}

/// A* cost: path length plus one, minus one for every item already collected
/// along the path.
///
/// The credit is paid back by [`furthest_item_heuristic`], which subtracts the
/// number of items still remaining, so `cost + heuristic` stays a move count.
pub fn astar_cost<S: PlanningState>(ctx: &SearchContext, node: &SearchNode<S>) -> i64 {
    let collected = ctx.initial_item_count.saturating_sub(remaining_items(&node.state));
    1 + node.path.len() as i64 - collected as i64
}

/// A* heuristic built on [`estimate_remaining_moves`].
///
/// Returns `1 + estimate - remaining_items` for a state that still has items,
/// which is at least 1 because the estimate is never below the item count.
/// A state without items is a goal and gets 0.
pub fn furthest_item_heuristic<S: PlanningState>(
    _ctx: &SearchContext,
    node: &SearchNode<S>,
) -> i64 {
    let items = node.state.item_grid();
    let remaining = items.count();
    if remaining == 0 {
        return 0;
    }
    let estimate = estimate_remaining_moves(node.state.position(), items);
    1 + estimate as i64 - remaining as i64
}

/// Estimates how many moves are needed from `position` to collect every item in `items`.
///
/// The estimate targets the item furthest from the actor (first one in row-major
/// order on ties). Any route must reach both that item and every other item `a`,
/// and by the triangle inequality a route through `a` and then the furthest item
/// is at least `d(actor, a) + d(a, furthest)` long. The reverse order costs at
/// least `d(actor, furthest) + d(furthest, a)`, which is no smaller because
/// `d(actor, furthest) >= d(actor, a)`. The estimate is the largest such detour,
/// and never less than the number of items since each one costs a move.
///
/// This is a practical lower bound on Manhattan grids, not a proven-tight one:
/// the full collection problem is a travelling-salesman variant.
///
/// # Returns
/// * `0` when there are no items.
/// * The distance to the single item when there is one.
/// * `max(max_a(d(actor, a) + d(a, furthest)), item_count)` otherwise.
pub fn estimate_remaining_moves(position: Position, items: &ItemGrid) -> usize {
    let item_positions: Vec<Position> = items.positions().collect();
    let distances: Vec<usize> = item_positions
        .iter()
        .map(|&item| manhattan_distance(position, item))
        .collect();

    match item_positions.len() {
        0 => 0,
        1 => distances[0],
        count => {
            let mut furthest = 0;
            for (i, &d) in distances.iter().enumerate().skip(1) {
                if d > distances[furthest] {
                    furthest = i;
                }
            }
            let furthest_pos = item_positions[furthest];

            let best_detour = item_positions
                .iter()
                .enumerate()
                .filter(|&(i, _)| i != furthest)
                .map(|(i, &item)| distances[i] + manhattan_distance(item, furthest_pos))
                .max()
                .unwrap_or(0);

            best_detour.max(count)
        }
    }
}
