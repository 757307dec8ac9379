//! Shared level and rendering used by the demo binaries.
//!
//! The bridge level: the spawn sits on the top walkway, the goal in the
//! lower right room. The only way across is the `a`-`b` bridge, which stays
//! raised until the walker steps on plate `p`.

use std::collections::HashSet;

use trail_core::Vec3;
use trail_level::{Blueprint, Level, LevelConfig, LevelData, LevelError, Walker};
use trail_paths::NodeId;

pub const BRIDGE: &str = "
S..p..#....
#####a#.qq.
#####b#.qq.
#####....G.
";

/// Build the bridge level with its plate.
pub fn bridge_data() -> Result<LevelData, LevelError> {
    let blueprint = Blueprint::new(BRIDGE)?;
    let mut data = LevelData::from_blueprint(&blueprint);
    data.add_plate("p", "a", "b", true)?;
    Ok(data)
}

pub fn bridge_level(config: LevelConfig) -> Result<Level, LevelError> {
    Level::from_data(&bridge_data()?, config)
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

const COL_WALKER: char = '@';
const COL_PATH: char = '*';
const COL_SPAWN: char = 'S';
const COL_GOAL: char = 'G';
const COL_FLOOR: char = '.';
const COL_VOID: char = ' ';

/// Grid cell a world position falls into.
fn cell(p: Vec3) -> (i32, i32) {
    (p.x.round() as i32, p.z.round() as i32)
}

/// Draw the level top-down, one character per node.
///
/// Nodes still ahead on the walker's route are drawn as `*`, the walker as
/// `@`.
pub fn render(level: &Level, walker: Option<&Walker>) -> String {
    let graph = level.graph();
    if graph.is_empty() {
        return String::new();
    }

    let (mut min_x, mut min_z) = (i32::MAX, i32::MAX);
    let (mut max_x, mut max_z) = (i32::MIN, i32::MIN);
    for node in graph.nodes() {
        let (x, z) = cell(node.position());
        min_x = min_x.min(x);
        min_z = min_z.min(z);
        max_x = max_x.max(x);
        max_z = max_z.max(z);
    }
    let width = (max_x - min_x + 1) as usize;
    let depth = (max_z - min_z + 1) as usize;
    let mut rows = vec![vec![COL_VOID; width]; depth];

    let on_path: HashSet<NodeId> = walker
        .map(|w| w.remaining().iter().copied().collect())
        .unwrap_or_default();

    for node in graph.nodes() {
        let (x, z) = cell(node.position());
        let id = node.id();
        let ch = if Some(id) == level.spawn() {
            COL_SPAWN
        } else if Some(id) == level.goal() {
            COL_GOAL
        } else if let Some(label) = node.label().and_then(|l| l.chars().next()) {
            label
        } else {
            COL_FLOOR
        };
        let ch = if on_path.contains(&id) { COL_PATH } else { ch };
        rows[(z - min_z) as usize][(x - min_x) as usize] = ch;
    }

    if let Some(w) = walker {
        let (x, z) = cell(w.position());
        if (min_x..=max_x).contains(&x) && (min_z..=max_z).contains(&z) {
            rows[(z - min_z) as usize][(x - min_x) as usize] = COL_WALKER;
        }
    }

    rows.into_iter()
        .map(|r| r.into_iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bridge_builds() {
        let level = bridge_level(LevelConfig::default()).unwrap();
        assert_eq!(level.plates().len(), 1);
        assert_eq!(level.region("q").len(), 4);
        assert!(level.goal().is_some());
    }

    #[test]
    fn render_marks_walker() {
        let level = bridge_level(LevelConfig::default()).unwrap();
        let walker = level.spawn_walker().unwrap();
        let frame = render(&level, Some(&walker));
        let lines: Vec<&str> = frame.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "@..p.. ....");
        assert_eq!(lines[1], "     a .qq.");
        assert_eq!(lines[2], "     b .qq.");
        assert_eq!(lines[3], "     ....G.");
    }
}
