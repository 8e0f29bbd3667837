//! Walk an agent through the built-in map, printing every replan.
//!
//! Run: cargo run --bin replan -- [algorithm] [cost] [replan-mode] [radius]
//!
//! e.g. `cargo run --bin replan -- d*lite octile incremental 2`

use shun_demos::{DEFAULT_MAP, Map, Outcome, Scenario, walk};
use shun_paths::{CostFunction, PathfinderConfig, ReplanMode};

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let arg = |i: usize, default: &'static str| args.get(i).map_or(default, String::as_str);

    let config = match PathfinderConfig::from_selectors(arg(0, "dstarlite"), arg(1, "manhattan"))
        .and_then(|c| Ok(c.with_replan(arg(2, "restart").parse::<ReplanMode>()?)))
    {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(2);
        }
    };
    let radius = match arg(3, "1").parse::<i32>() {
        Ok(r) if r >= 1 => r,
        _ => {
            eprintln!("Error: sensor radius must be a positive integer");
            std::process::exit(2);
        }
    };

    let diagonal = config.cost != CostFunction::Manhattan;
    let scenario = match Scenario::parse(DEFAULT_MAP, diagonal) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    println!(
        "{} / {} / {} / radius {radius}",
        config.algorithm, config.cost, config.replan
    );

    let mut planner = config.build::<Map>();
    let max_steps = scenario.grid.bounds().len() * 4;
    let outcome = walk(&scenario, planner.as_mut(), radius, max_steps, |step| {
        if step.pos == scenario.start || !step.discovered.is_empty() {
            println!(
                "\nat {} sensed {:?}, plan has {} cells",
                step.pos,
                step.discovered,
                step.path.len()
            );
            print!("{}", scenario.render(step.pos, step.path, step.known));
        }
    });

    match outcome {
        Outcome::Arrived { steps, replans } => {
            println!("\narrived after {steps} steps and {replans} replans");
        }
        Outcome::Unreachable { at, steps, replans } => {
            println!("\ngoal unreachable from {at} after {steps} steps and {replans} replans");
            std::process::exit(1);
        }
        Outcome::GaveUp { at, steps } => {
            println!("\ngave up at {at} after {steps} steps");
            std::process::exit(1);
        }
    }
}
