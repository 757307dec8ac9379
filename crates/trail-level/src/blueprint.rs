//! Level plans drawn as text.
//!
//! A [`Blueprint`] parses an ASCII plan into walkable tiles. Each character is
//! one unit square: columns grow along +X, rows along +Z, and every tile sits
//! at height 0.
//!
//! | Char | Tile |
//! |---|---|
//! | `.` | walkable |
//! | `S` | spawn |
//! | `G` | goal |
//! | `a`..=`z` | walkable, labelled with that letter |
//! | `#` or space | nothing |

use std::fmt;

use trail_core::Vec3;

/// What stands on a walkable blueprint cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Tile {
    Walk,
    Spawn,
    Goal,
    /// A walkable cell carrying a one-letter label.
    Marker(char),
}

impl Tile {
    /// Decode a blueprint character. `Ok(None)` means "no tile here".
    pub fn from_char(ch: char) -> Result<Option<Tile>, char> {
        match ch {
            '.' => Ok(Some(Tile::Walk)),
            'S' => Ok(Some(Tile::Spawn)),
            'G' => Ok(Some(Tile::Goal)),
            'a'..='z' => Ok(Some(Tile::Marker(ch))),
            '#' | ' ' => Ok(None),
            other => Err(other),
        }
    }
}

/// A parsed level plan.
#[derive(Debug, Clone)]
pub struct Blueprint {
    content: String,
    width: usize,
    depth: usize,
}

impl Blueprint {
    /// Parse a plan.
    ///
    /// Blank lines around the plan are ignored; spaces are kept, since they
    /// are part of the layout. All lines must have the same width.
    pub fn new(s: &str) -> Result<Self, BlueprintError> {
        let s = s.trim_matches(|c| c == '\n' || c == '\r');
        let mut width: Option<usize> = None;
        let mut depth = 0;

        for (z, line) in s.lines().enumerate() {
            let line = line.trim_end_matches('\r');
            let mut x = 0;
            for ch in line.chars() {
                if let Err(ch) = Tile::from_char(ch) {
                    return Err(BlueprintError::InvalidRune {
                        ch,
                        x,
                        z,
                        content: s.to_string(),
                    });
                }
                x += 1;
            }
            match width {
                None => width = Some(x),
                Some(w) if w != x => {
                    return Err(BlueprintError::InconsistentSize(s.to_string()));
                }
                Some(_) => {}
            }
            depth += 1;
        }

        Ok(Self {
            content: s.lines().map(|l| l.trim_end_matches('\r')).collect::<Vec<_>>().join("\n"),
            width: width.unwrap_or(0),
            depth,
        })
    }

    /// The plan's text, with line endings normalized.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Number of columns (extent along X).
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows (extent along Z).
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Visit every cell with its column, row and character.
    pub fn iter(&self, mut f: impl FnMut(usize, usize, char)) {
        for (z, line) in self.content.lines().enumerate() {
            for (x, ch) in line.chars().enumerate() {
                f(x, z, ch);
            }
        }
    }

    /// Walkable tiles in reading order, with their world positions.
    pub fn tiles(&self) -> Vec<(Vec3, Tile)> {
        let mut out = Vec::new();
        self.iter(|x, z, ch| {
            if let Ok(Some(tile)) = Tile::from_char(ch) {
                out.push((Vec3::new(x as f32, 0.0, z as f32), tile));
            }
        });
        out
    }
}

/// Errors that can occur when parsing a blueprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlueprintError {
    /// Lines have inconsistent widths.
    InconsistentSize(String),
    /// A character outside the blueprint alphabet.
    InvalidRune {
        ch: char,
        x: usize,
        z: usize,
        content: String,
    },
}

impl fmt::Display for BlueprintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InconsistentSize(s) => write!(f, "blueprint: inconsistent size:\n{s}"),
            Self::InvalidRune { ch, x, z, content } => write!(
                f,
                "blueprint contains invalid rune \u{201c}{ch}\u{201d} at ({x}, {z}):\n{content}"
            ),
        }
    }
}

impl std::error::Error for BlueprintError {}

#[cfg(test)]
mod tests {
    use super::*;

    const ROOM: &str = "
S..#
#a.G
";

    #[test]
    fn parse_and_size() {
        let b = Blueprint::new(ROOM).unwrap();
        assert_eq!(b.width(), 4);
        assert_eq!(b.depth(), 2);
        assert_eq!(b.content(), "S..#\n#a.G");
    }

    #[test]
    fn tiles_in_reading_order() {
        let b = Blueprint::new(ROOM).unwrap();
        let tiles = b.tiles();
        assert_eq!(tiles.len(), 6);
        assert_eq!(tiles[0], (Vec3::new(0.0, 0.0, 0.0), Tile::Spawn));
        assert_eq!(tiles[3], (Vec3::new(1.0, 0.0, 1.0), Tile::Marker('a')));
        assert_eq!(tiles[5], (Vec3::new(3.0, 0.0, 1.0), Tile::Goal));
    }

    #[test]
    fn leading_spaces_are_layout() {
        let err = Blueprint::new("  S\n..").unwrap_err();
        assert_eq!(err, BlueprintError::InconsistentSize("  S\n..".to_string()));
        let b = Blueprint::new("  S\n.. ").unwrap();
        assert_eq!(b.tiles()[0].0, Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn crlf_is_accepted() {
        let b = Blueprint::new("S.\r\n.G\r\n").unwrap();
        assert_eq!(b.content(), "S.\n.G");
        assert_eq!(b.tiles().len(), 4);
    }

    #[test]
    fn invalid_rune() {
        let err = Blueprint::new("S.\n.X").unwrap_err();
        match &err {
            BlueprintError::InvalidRune { ch, x, z, .. } => {
                assert_eq!((*ch, *x, *z), ('X', 1, 1));
            }
            other => panic!("expected InvalidRune, got {other:?}"),
        }
        assert!(err.to_string().contains("(1, 1)"));
    }

    #[test]
    fn empty_plan() {
        let b = Blueprint::new("\n\n").unwrap();
        assert_eq!(b.width(), 0);
        assert_eq!(b.depth(), 0);
        assert!(b.tiles().is_empty());
    }
}
