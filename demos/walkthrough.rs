//! Scripted walk through a level with a plate-gated bridge.
//!
//! Run: cargo run --bin walkthrough [level.json]
//!
//! Without an argument the built-in bridge level is used. A JSON file must
//! hold a `LevelData` description.

use std::error::Error;

use trail_core::{Isometric, Vec3};
use trail_demos::{bridge_level, render};
use trail_level::{Level, LevelConfig, LevelData, WalkEvent, Walker};
use trail_paths::NodeId;

const DT: f32 = 0.1;
const MAX_STEPS: usize = 1000;

fn load(path: Option<String>) -> Result<Level, Box<dyn Error>> {
    let config = LevelConfig::default();
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(&path)?;
            let data: LevelData = serde_json::from_str(&text)?;
            log::info!("loaded {path}: {} nodes", data.nodes.len());
            Ok(Level::from_data(&data, config)?)
        }
        None => Ok(bridge_level(config)?),
    }
}

/// Walk until the walker stops, printing a frame for every node entered.
fn walk(level: &mut Level, walker: &mut Walker) {
    for _ in 0..MAX_STEPS {
        if !walker.is_moving() {
            return;
        }
        for event in level.step(walker, DT) {
            match event {
                WalkEvent::Entered(node) => {
                    println!("entered {node}");
                    if level.plates().iter().any(|p| p.at == node) {
                        println!("  a plate clicks");
                    }
                }
                WalkEvent::Arrived(node) => {
                    println!("arrived at {node}");
                    println!("{}\n", render(level, Some(&*walker)));
                }
            }
        }
    }
    log::warn!("walker still moving after {MAX_STEPS} steps");
}

/// Try to walk to any of `targets`. Returns whether a walk happened.
fn go(level: &mut Level, walker: &mut Walker, what: &str, targets: &[NodeId]) -> bool {
    if !level.route(walker, targets) {
        println!("no way to {what}");
        return false;
    }
    println!("heading to {what}, {} steps", walker.remaining().len());
    println!("{}\n", render(level, Some(&*walker)));
    walk(level, walker);
    true
}

fn run() -> Result<(), Box<dyn Error>> {
    let mut level = load(std::env::args().nth(1))?;
    println!("{}\n", render(&level, None));

    // Drop the avatar slightly off the spawn and let it snap on, the way a
    // character placed in an editor would.
    let camera = Isometric::default();
    let origin = level
        .spawn()
        .and_then(|s| level.graph().position(s))
        .unwrap_or(Vec3::ZERO);
    let mut walker = Walker::new(origin + Vec3::new(0.1, 0.2, 0.0));
    let Some(start) = walker.snap_to_nearest_node(level.graph(), &camera) else {
        return Err("level has no nodes".into());
    };
    let bound = level.set_start_node(walker.position(), &camera);
    println!("walker placed on {start}, search start bound to {bound:?}");

    let goal: Vec<NodeId> = level.goal().into_iter().collect();
    if goal.is_empty() {
        println!("level has no goal");
        return Ok(());
    }

    if !go(&mut level, &mut walker, "the goal", &goal) {
        let plates: Vec<NodeId> = level.plates().iter().map(|p| p.at).collect();
        for plate in plates {
            go(&mut level, &mut walker, "a plate", &[plate]);
        }
        let room = level.region("q");
        if !room.is_empty() {
            go(&mut level, &mut walker, "room q", &room);
        }
        go(&mut level, &mut walker, "the goal", &goal);
    }

    if level.is_won(&walker) {
        log::info!("goal reached");
        println!("goal reached");
    } else {
        println!("goal not reached");
    }
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
