use clap::Parser;
use grid_planner::engine::GameState;
use grid_planner::solver::{solve, StrategyKind};
use grid_planner::utils::init_logging;

const STRATEGIES: [StrategyKind; 2] = [StrategyKind::Bfs, StrategyKind::AStar];

#[derive(Parser, Debug)]
#[clap(author, version, about = "Compare BFS and A* on seeded random boards", long_about = None)]
struct Args {
    /// Number of random boards to evaluate
    #[clap(short, long, default_value_t = 20)]
    boards: usize,

    /// Seed of the first board; board i uses seed + i
    #[clap(short, long, default_value_t = 0)]
    seed: u64,

    #[clap(long, default_value_t = 7)]
    rows: usize,

    #[clap(long, default_value_t = 7)]
    cols: usize,

    /// Items placed on each board
    #[clap(short, long, default_value_t = 4)]
    items: usize,

    /// Probability that a cell is a wall
    #[clap(short, long, default_value_t = 0.2)]
    walls: f64,
}

#[derive(Default)]
struct Totals {
    solved: usize,
    moves: usize,
    expanded: u64,
}

fn main() {
    init_logging();
    let args = Args::parse();

    println!(
        "Evaluating {} boards of {}x{} with {} items and wall density {:.2}...",
        args.boards, args.rows, args.cols, args.items, args.walls
    );

    let mut totals: Vec<Totals> = STRATEGIES.iter().map(|_| Totals::default()).collect();
    let mut mismatches = 0;

    for board_idx in 0..args.boards {
        let seed = args.seed + board_idx as u64;
        let start = GameState::random_with_seed(args.rows, args.cols, args.walls, args.items, seed);
        println!("\nBoard {} (Seed: {}):\n{}", board_idx, seed, start);

        let mut lengths = Vec::new();
        for (kind, total) in STRATEGIES.iter().zip(totals.iter_mut()) {
            let solution = solve(&start, *kind);
            if solution.is_found() {
                total.solved += 1;
                total.moves += solution.moves.len();
                lengths.push(Some(solution.moves.len()));
            } else {
                lengths.push(None);
            }
            total.expanded += solution.stats.expanded;
            println!(
                "  Strategy: {:<6}, Moves: {:<6}, Expanded: {}",
                kind.to_string(),
                lengths
                    .last()
                    .copied()
                    .flatten()
                    .map_or_else(|| "-".to_string(), |n| n.to_string()),
                solution.stats.expanded
            );
        }
        if lengths.windows(2).any(|pair| pair[0] != pair[1]) {
            mismatches += 1;
        }
    }

    println!("\n--- Evaluation Complete ---");
    println!("Boards where plan lengths differ: {}", mismatches);
    for (kind, total) in STRATEGIES.iter().zip(&totals) {
        if total.solved == 0 {
            println!("Strategy {:<6}: No boards solved.", kind.to_string());
            continue;
        }
        println!(
            "Strategy {:<6}: Solved = {}, Average Moves = {:.2}, Average Expanded = {:.1}",
            kind.to_string(),
            total.solved,
            total.moves as f64 / total.solved as f64,
            total.expanded as f64 / args.boards.max(1) as f64
        );
    }
}
