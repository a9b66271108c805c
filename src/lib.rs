//! # Grid Planner Library
//!
//! This library plans move sequences for a grid collection game: an actor walks
//! a walled grid and must collect every item in as few moves as possible.
//!
//! It is used by two binaries:
//! - `planner`: Loads a layout file, plans with BFS or A*, and optionally replays
//!   the plan tick by tick through a `PlanningAgent`.
//! - `strategy_evaluator`: Compares both strategies on seeded random boards.
//!
//! ## Modules
//! - `engine`: Game rules: `Move`, `ItemGrid`, `Layout` and `GameState`.
//! - `solver`: The best-first search engine, `StateKey`, and the BFS/A* `Strategy` configurations.
//! - `heuristics`: Cost and heuristic functions plugged into the solver.
//! - `frontier`: Priority queue with FIFO tie-breaking and pending-key tracking.
//! - `agent`: `PlanningAgent`, which plans once and replays one move per tick.
//! - `utils`: Layout parsing from strings or files, and logging setup.
//! - `error`: `LayoutError`.

pub mod agent;
pub mod engine;
pub mod error;
pub mod frontier;
pub mod heuristics;
pub mod solver;
pub mod utils;
