use clap::Parser;
use grid_planner::agent::PlanningAgent;
use grid_planner::engine::Move;
use grid_planner::solver::{solve, StrategyKind};
use grid_planner::utils::{init_logging, read_layout_file};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Search strategy used to plan
    #[clap(short, long, value_enum, default_value_t = StrategyKind::AStar)]
    strategy: StrategyKind,

    /// Replay the plan through the agent, printing the grid after every tick
    #[clap(short, long)]
    replay: bool,

    /// Path to the layout file ('%' wall, '.' floor, 'F' item, 'P' actor)
    layout_file: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let args = Args::parse();

    let start = read_layout_file(&args.layout_file)?;
    println!("Loaded layout from {}\n", args.layout_file.display());
    println!("Initial state ({} items):\n{}\n", start.item_count(), start);
    println!("Planning with {}...\n", args.strategy);

    let solution = solve(&start, args.strategy);
    if solution.is_found() {
        let plan: String = solution.moves.iter().map(|mv| mv.to_char()).collect();
        println!("Plan found: {} moves", solution.moves.len());
        if plan.is_empty() {
            println!("  No moves needed.");
        } else {
            println!("  {}", plan);
        }
    } else {
        println!("No plan found: the remaining items cannot all be reached.");
    }
    println!(
        "Expanded: {}, generated: {}, stale: {}, peak frontier: {}\n",
        solution.stats.expanded,
        solution.stats.generated,
        solution.stats.stale,
        solution.stats.frontier_high_water
    );

    if args.replay {
        let mut state = start;
        let mut agent = PlanningAgent::new(args.strategy);
        let mut tick = 0u32;
        while !state.is_win() {
            let mv = agent.get_next_move(&state);
            if mv == Move::Stop {
                println!("Agent stopped at tick {} with {} items left.", tick, state.item_count());
                break;
            }
            if !state.apply_move(mv) {
                return Err(format!("agent played blocked move {} at tick {}", mv, tick).into());
            }
            tick += 1;
            println!("Tick {}: {}\n{}\n", tick, mv, state);
        }
        if state.is_win() {
            println!("All items collected in {} moves.", state.steps());
        }
    }

    Ok(())
}
