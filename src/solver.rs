use crate::engine::{ItemGrid, Move, Position};
use crate::frontier::Frontier;
use crate::heuristics::{astar_cost, bfs_cost, furthest_item_heuristic, zero_heuristic};
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, trace};

/// What the search needs to know about a game state.
///
/// The game rules live behind this trait; the search never inspects anything else.
pub trait PlanningState: Clone {
    /// The actor's cell.
    fn position(&self) -> Position;

    /// Which cells still hold an item.
    fn item_grid(&self) -> &ItemGrid;

    /// Whether the state is a goal.
    fn is_win(&self) -> bool;

    /// Every legal `(next_state, move)` pair. The order only affects tie-breaking.
    fn successors(&self) -> Vec<(Self, Move)>;
}

/// Identity of a state for duplicate suppression: actor position plus item grid.
///
/// Two states with equal keys are treated as the same search state, whatever
/// path led to them.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StateKey {
    pub position: Position,
    pub items: ItemGrid,
}

impl StateKey {
    pub fn new(position: Position, items: ItemGrid) -> Self {
        StateKey { position, items }
    }

    /// Extracts the key of `state`.
    pub fn of<S: PlanningState>(state: &S) -> Self {
        StateKey::new(state.position(), state.item_grid().clone())
    }
}

/// A frontier entry: a reachable state and the moves that reached it from the start.
#[derive(Clone, Debug)]
pub struct SearchNode<S> {
    pub state: S,
    pub path: Vec<Move>,
}

impl<S> SearchNode<S> {
    /// The start node, with an empty path.
    pub fn root(state: S) -> Self {
        SearchNode {
            state,
            path: Vec::new(),
        }
    }

    /// A node for `state`, reached from `self` by `mv`.
    pub fn child(&self, state: S, mv: Move) -> Self {
        let mut path = Vec::with_capacity(self.path.len() + 1);
        path.extend_from_slice(&self.path);
        path.push(mv);
        SearchNode { state, path }
    }
}

/// Values fixed for the duration of one search call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchContext {
    /// Items on the grid when the search started.
    pub initial_item_count: usize,
}

impl SearchContext {
    pub fn for_start<S: PlanningState>(start: &S) -> Self {
        SearchContext {
            initial_item_count: start.item_grid().count(),
        }
    }
}

pub type CostFn<S> = fn(&SearchContext, &SearchNode<S>) -> i64;
pub type HeuristicFn<S> = fn(&SearchContext, &SearchNode<S>) -> i64;

/// A cost function and a heuristic function; together they fix the search order.
pub struct Strategy<S> {
    pub name: &'static str,
    pub cost: CostFn<S>,
    pub heuristic: HeuristicFn<S>,
}

impl<S: PlanningState> Strategy<S> {
    /// Breadth-first search: unit edge costs and no heuristic.
    pub fn bfs() -> Self {
        Strategy {
            name: "bfs",
            cost: bfs_cost::<S>,
            heuristic: zero_heuristic::<S>,
        }
    }

    /// A* with the furthest-item heuristic.
    pub fn astar() -> Self {
        Strategy {
            name: "astar",
            cost: astar_cost::<S>,
            heuristic: furthest_item_heuristic::<S>,
        }
    }

    pub fn from_kind(kind: StrategyKind) -> Self {
        match kind {
            StrategyKind::Bfs => Self::bfs(),
            StrategyKind::AStar => Self::astar(),
        }
    }
}

impl<S> Strategy<S> {
    /// `cost(node) + heuristic(node)`; lower is expanded first.
    pub fn priority(&self, ctx: &SearchContext, node: &SearchNode<S>) -> i64 {
        (self.cost)(ctx, node) + (self.heuristic)(ctx, node)
    }
}

impl<S> Clone for Strategy<S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for Strategy<S> {}

impl<S> fmt::Debug for Strategy<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Strategy").field("name", &self.name).finish()
    }
}

/// The named strategy configurations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum StrategyKind {
    /// Breadth-first search (zero heuristic).
    Bfs,
    /// A* with the furthest-item heuristic.
    #[value(name = "astar")]
    AStar,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::Bfs => f.write_str("bfs"),
            StrategyKind::AStar => f.write_str("astar"),
        }
    }
}

/// How a search call ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Termination {
    /// A winning state was popped; the plan reaches it.
    GoalFound,
    /// The frontier ran dry; no winning state is reachable.
    Exhausted,
}

/// Counters collected during one search call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes whose successors were generated.
    pub expanded: u64,
    /// Nodes pushed onto the frontier, including the start node.
    pub generated: u64,
    /// Popped nodes dropped because their key was already closed.
    pub stale: u64,
    /// Largest frontier size seen.
    pub frontier_high_water: usize,
}

/// Represents a plan found by the solver.
#[derive(Clone, Debug)]
pub struct Solution {
    /// Moves from the start state to a winning state. Empty when none was found
    /// (or when the start state already wins).
    pub moves: Vec<Move>,
    pub termination: Termination,
    pub stats: SearchStats,
}

impl Solution {
    pub fn is_found(&self) -> bool {
        self.termination == Termination::GoalFound
    }
}

/// Runs a best-first search from `start` in the order given by `strategy`.
///
/// Keys are closed when their node is expanded and are never expanded again.
/// A successor is only enqueued if no entry with its key is pending, so the
/// frontier never holds two live entries for the same key; entries whose key
/// got closed meanwhile are discarded when popped.
///
/// Exhausting the frontier is not an error: the returned solution has no moves
/// and `Termination::Exhausted`.
#[tracing::instrument(level = "debug", skip_all, fields(strategy = strategy.name))]
pub fn search<S: PlanningState>(start: &S, strategy: &Strategy<S>) -> Solution {
    let ctx = SearchContext::for_start(start);
    let mut stats = SearchStats::default();
    let mut closed: HashSet<StateKey> = HashSet::new();
    let mut frontier = Frontier::new();

    let root = SearchNode::root(start.clone());
    let root_priority = strategy.priority(&ctx, &root);
    frontier.push(StateKey::of(start), root, root_priority);
    stats.generated += 1;

    while let Some((priority, key, node)) = frontier.pop() {
        if node.state.is_win() {
            stats.frontier_high_water = frontier.high_water();
            debug!(
                moves = node.path.len(),
                expanded = stats.expanded,
                generated = stats.generated,
                "Goal found"
            );
            return Solution {
                moves: node.path,
                termination: Termination::GoalFound,
                stats,
            };
        }

        if !closed.insert(key) {
            stats.stale += 1;
            continue;
        }
        stats.expanded += 1;
        trace!(priority, depth = node.path.len(), "Expanding");

        for (next_state, mv) in node.state.successors() {
            let next_key = StateKey::of(&next_state);
            if frontier.is_pending(&next_key) {
                continue;
            }
            let child = node.child(next_state, mv);
            let child_priority = strategy.priority(&ctx, &child);
            frontier.push(next_key, child, child_priority);
            stats.generated += 1;
        }
    }

    stats.frontier_high_water = frontier.high_water();
    debug!(
        expanded = stats.expanded,
        generated = stats.generated,
        "Frontier exhausted without reaching a goal"
    );
    Solution {
        moves: Vec::new(),
        termination: Termination::Exhausted,
        stats,
    }
}

/// Breadth-first plan: a shortest move sequence to a winning state.
pub fn solve_bfs<S: PlanningState>(start: &S) -> Solution {
    search(start, &Strategy::bfs())
}

/// A* plan with the furthest-item heuristic.
pub fn solve_astar<S: PlanningState>(start: &S) -> Solution {
    search(start, &Strategy::astar())
}

pub fn solve<S: PlanningState>(start: &S, kind: StrategyKind) -> Solution {
    search(start, &Strategy::from_kind(kind))
}


#[cfg(test)]
mod tests {
    use super::brute_force::shortest_plan_len;
    use super::*;
    use crate::engine::GameState;
    use crate::utils::state_from_str_array;

    /// Replays `moves` from `start`, failing on any blocked move.
    fn replay(start: &GameState, moves: &[Move]) -> GameState {
        let mut state = start.clone();
        for (i, &mv) in moves.iter().enumerate() {
            assert!(state.apply_move(mv), "move {} ({}) is illegal", i, mv);
        }
        state
    }

    /// A state whose successors are checked for duplicate frontier keys.
    #[derive(Clone)]
    struct Probe(GameState);

    impl PlanningState for Probe {
        fn position(&self) -> Position {
            self.0.position()
        }
        fn item_grid(&self) -> &ItemGrid {
            self.0.items()
        }
        fn is_win(&self) -> bool {
            self.0.is_win()
        }
        fn successors(&self) -> Vec<(Self, Move)> {
            self.0
                .generate_successors()
                .into_iter()
                .map(|(s, mv)| (Probe(s), mv))
                .collect()
        }
    }

    #[test]
    fn test_state_key_equality() {
        let a = state_from_str_array(&["P.F.F"]).unwrap();
        let b = state_from_str_array(&["P.F.F"]).unwrap();
        assert_eq!(StateKey::of(&a), StateKey::of(&b));
        // Idempotent.
        assert_eq!(StateKey::of(&a), StateKey::of(&a));

        // Same items, different position.
        let moved = a.successor(Move::East).unwrap();
        assert_ne!(StateKey::of(&a), StateKey::of(&moved));

        // Same position, different items.
        let c = state_from_str_array(&["P.F.."]).unwrap();
        assert_ne!(StateKey::of(&a), StateKey::of(&c));
    }

    #[test]
    fn test_state_key_ignores_path_and_steps() {
        let start = state_from_str_array(&["P..", "...", "..F"]).unwrap();
        let via_east = replay(&start, &[Move::East, Move::South]);
        let via_south = replay(&start, &[Move::South, Move::East]);
        assert_eq!(StateKey::of(&via_east), StateKey::of(&via_south));
    }

    #[test]
    fn test_one_row_corridor() {
        let start = state_from_str_array(&["P..F"]).unwrap();
        let expected = vec![Move::East, Move::East, Move::East];

        let bfs = solve_bfs(&start);
        assert!(bfs.is_found());
        assert_eq!(bfs.moves, expected);

        let astar = solve_astar(&start);
        assert!(astar.is_found());
        assert_eq!(astar.moves, expected);
    }

    #[test]
    fn test_start_state_already_won() {
        let start = state_from_str_array(&["P.."]).unwrap();
        for kind in [StrategyKind::Bfs, StrategyKind::AStar] {
            let solution = solve(&start, kind);
            assert!(solution.is_found());
            assert!(solution.moves.is_empty());
            assert_eq!(solution.stats.expanded, 0);
        }
    }

    #[test]
    fn test_opposite_corners_astar_is_optimal() {
        let start = state_from_str_array(&[
            "F....", //
            ".....", //
            "..P..", //
            ".....", //
            "....F", //
        ])
        .unwrap();
        assert_eq!(shortest_plan_len(&start), Some(12));

        let astar = solve_astar(&start);
        assert!(astar.is_found());
        assert_eq!(astar.moves.len(), 12);
        assert!(replay(&start, &astar.moves).is_win());

        let bfs = solve_bfs(&start);
        assert_eq!(bfs.moves.len(), 12);
    }

    #[test]
    fn test_walled_in_item_is_unsolvable() {
        let start = state_from_str_array(&[
            "P....", //
            "..%..", //
            ".%F%.", //
            "..%..", //
        ])
        .unwrap();
        assert_eq!(shortest_plan_len(&start), None);

        for kind in [StrategyKind::Bfs, StrategyKind::AStar] {
            let solution = solve(&start, kind);
            assert_eq!(solution.termination, Termination::Exhausted, "{}", kind);
            assert!(solution.moves.is_empty());
            assert!(solution.stats.expanded > 0);
        }
    }

    #[test]
    fn test_bfs_matches_brute_force() {
        for seed in 0..60 {
            let start = GameState::random_with_seed(4, 5, 0.25, 3, seed);
            let solution = solve_bfs(&start);
            match shortest_plan_len(&start) {
                Some(optimal) => {
                    assert!(solution.is_found(), "bfs missed a plan for seed {}", seed);
                    assert_eq!(solution.moves.len(), optimal, "seed {}:\n{}", seed, start);
                    assert!(replay(&start, &solution.moves).is_win());
                }
                None => {
                    assert_eq!(solution.termination, Termination::Exhausted);
                    assert!(solution.moves.is_empty());
                }
            }
        }
    }

    #[test]
    fn test_astar_finds_valid_plan_no_shorter_than_optimal() {
        for seed in 0..60 {
            let start = GameState::random_with_seed(4, 5, 0.25, 3, seed);
            let solution = solve_astar(&start);
            match shortest_plan_len(&start) {
                Some(optimal) => {
                    assert!(solution.is_found(), "astar missed a plan for seed {}", seed);
                    assert!(solution.moves.len() >= optimal);
                    assert!(replay(&start, &solution.moves).is_win());
                }
                None => assert!(!solution.is_found()),
            }
        }
    }

    #[test]
    fn test_astar_expands_no_more_than_bfs_on_open_grid() {
        let start = state_from_str_array(&[
            "F.....", //
            "......", //
            "......", //
            "...P..", //
            "......", //
            ".....F", //
        ])
        .unwrap();
        let bfs = solve_bfs(&start);
        let astar = solve_astar(&start);
        assert_eq!(astar.moves.len(), bfs.moves.len());
        assert!(
            astar.stats.expanded <= bfs.stats.expanded,
            "astar expanded {} nodes, bfs {}",
            astar.stats.expanded,
            bfs.stats.expanded
        );
    }

    #[test]
    fn test_search_on_custom_planning_state() {
        let start = Probe(state_from_str_array(&["F.P.F"]).unwrap());
        let solution = search(&start, &Strategy::astar());
        assert!(solution.is_found());
        assert_eq!(solution.moves.len(), 6);
    }

    #[test]
    fn test_each_key_expanded_at_most_once() {
        // 20 cells, 4 walls, 1 caged item: 15 reachable keys, none of them a goal.
        let start = state_from_str_array(&[
            "P....", //
            "..%..", //
            ".%F%.", //
            "..%..", //
        ])
        .unwrap();
        for kind in [StrategyKind::Bfs, StrategyKind::AStar] {
            let solution = solve(&start, kind);
            assert_eq!(solution.stats.expanded, 15, "{}", kind);
            assert_eq!(
                solution.stats.generated,
                solution.stats.expanded + solution.stats.stale,
                "every generated node is popped exactly once"
            );
        }
    }

    #[test]
    fn test_strategy_priority_sums_cost_and_heuristic() {
        let start = state_from_str_array(&["P..F"]).unwrap();
        let ctx = SearchContext::for_start(&start);
        let root = SearchNode::root(start.clone());

        let bfs: Strategy<GameState> = Strategy::bfs();
        assert_eq!(bfs.priority(&ctx, &root), 1);

        let astar: Strategy<GameState> = Strategy::astar();
        // cost 1 + heuristic 3
        assert_eq!(astar.priority(&ctx, &root), 4);

        let child = root.child(start.successor(Move::East).unwrap(), Move::East);
        assert_eq!(child.path, vec![Move::East]);
        assert_eq!(bfs.priority(&ctx, &child), 2);
        assert_eq!(astar.priority(&ctx, &child), 4);
    }

    #[test]
    fn test_search_context_is_per_call() {
        // Two searches with different item counts, interleaved, must not
        // see each other's initial count.
        let three = state_from_str_array(&["F.P.F.F"]).unwrap();
        let one = state_from_str_array(&["P.F"]).unwrap();
        let first = solve_astar(&three);
        let second = solve_astar(&one);
        let again = solve_astar(&three);
        assert_eq!(second.moves, vec![Move::East, Move::East]);
        assert_eq!(first.moves, again.moves);
        assert_eq!(SearchContext::for_start(&three).initial_item_count, 3);
    }
}
