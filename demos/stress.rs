//! Random clicks on a level whose links flip while the walker moves.
//!
//! Run: cargo run --bin stress [seed] [clicks]
//!
//! Every route handed to the walker is checked: it must start on the
//! walker's node and follow links that were active when it was planned.

use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};
use trail_core::{Isometric, Vec3};
use trail_demos::{bridge_level, render};
use trail_level::{Level, LevelConfig, WalkEvent};
use trail_paths::{Graph, NodeId};

#[derive(Default, Debug)]
struct Stats {
    clicks: usize,
    routes: usize,
    refused: usize,
    toggles: usize,
    entered: usize,
    arrived: usize,
    wins: usize,
}

fn check_route(graph: &Graph, from: NodeId, route: &[NodeId]) -> Result<(), String> {
    if route.first() != Some(&from) {
        return Err(format!("route {route:?} does not start at {from}"));
    }
    for pair in route.windows(2) {
        if !graph.is_edge_active(pair[0], pair[1]) {
            return Err(format!("route uses inactive link {} -> {}", pair[0], pair[1]));
        }
    }
    Ok(())
}

fn run(seed: u64, clicks: usize) -> Result<Stats, String> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut level: Level = bridge_level(LevelConfig::default()).map_err(|e| e.to_string())?;
    let mut walker = level.spawn_walker().ok_or("level has no spawn")?;
    let camera = Isometric::default();
    let mut stats = Stats::default();

    let len = level.graph().len() as u32;
    let mut frames = 0;

    while stats.clicks < clicks {
        // A click somewhere over the level.
        let click = Vec3::new(
            rng.random_range(-1.0..12.0f32),
            rng.random_range(0.0..1.0f32),
            rng.random_range(-1.0..5.0f32),
        );
        stats.clicks += 1;
        let Some(target) = level.graph().find_closest_node(click, &camera) else {
            stats.refused += 1;
            continue;
        };

        let from = walker.current_node();
        if level.route(&mut walker, &[target]) {
            stats.routes += 1;
            let from = from.ok_or("walker routed without a node")?;
            check_route(level.graph(), from, level.pathfinder().path())?;
        } else {
            stats.refused += 1;
        }

        // Move for a while, flipping random links underneath.
        for _ in 0..rng.random_range(1..20) {
            if rng.random_range(0..10u32) == 0 {
                let a = NodeId(rng.random_range(0..len));
                let b = NodeId(rng.random_range(0..len));
                let on = rng.random_range(0..2u32) == 0;
                if level.graph_mut().set_link(a, b, on) > 0 {
                    stats.toggles += 1;
                }
            }
            for event in level.step(&mut walker, rng.random_range(0.01..0.3f32)) {
                match event {
                    WalkEvent::Entered(_) => stats.entered += 1,
                    WalkEvent::Arrived(_) => stats.arrived += 1,
                }
            }
            if level.is_won(&walker) && !walker.is_moving() {
                stats.wins += 1;
                if frames < 3 {
                    println!("{}\n", render(&level, Some(&walker)));
                    frames += 1;
                }
                let Some(spawn) = level.spawn() else { break };
                walker.place(level.graph(), spawn);
            }
        }
    }
    Ok(stats)
}

fn main() {
    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);
    let clicks = args.next().and_then(|s| s.parse().ok()).unwrap_or(1000);

    match run(seed, clicks) {
        Ok(stats) => {
            log::info!("stress run finished");
            println!("seed {seed}: {stats:?}");
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
