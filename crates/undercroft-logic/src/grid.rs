//! The level tile grid and its text format.
//!
//! A level is `width`×`height`×`depth` ASCII tiles. In text form each
//! z-level is `height` rows of `width` characters, and z-levels are
//! separated by one blank line.

use serde::{Deserialize, Serialize};

use crate::constants::tiles;
use crate::geometry::Coords;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelGrid {
    width: i32,
    height: i32,
    depth: i32,
    tiles: Vec<u8>,
}

impl LevelGrid {
    /// A grid with every tile unassigned.
    pub fn new(width: i32, height: i32, depth: i32) -> Self {
        Self::filled(width, height, depth, tiles::UNASSIGNED)
    }

    pub fn filled(width: i32, height: i32, depth: i32, tile: u8) -> Self {
        let (width, height, depth) = (width.max(0), height.max(0), depth.max(0));
        Self {
            width,
            height,
            depth,
            tiles: vec![tile; (width * height * depth) as usize],
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn depth(&self) -> i32 {
        self.depth
    }

    pub fn in_bounds(&self, c: Coords) -> bool {
        c.x >= 0
            && c.y >= 0
            && c.z >= 0
            && c.x < self.width
            && c.y < self.height
            && c.z < self.depth
    }

    fn index(&self, c: Coords) -> Option<usize> {
        self.in_bounds(c)
            .then(|| (c.x + c.y * self.width + c.z * self.width * self.height) as usize)
    }

    pub fn get(&self, c: Coords) -> Option<u8> {
        self.index(c).map(|i| self.tiles[i])
    }

    /// Write a tile. Returns false (and writes nothing) out of bounds.
    pub fn set(&mut self, c: Coords, tile: u8) -> bool {
        match self.index(c) {
            Some(i) => {
                self.tiles[i] = tile;
                true
            }
            None => false,
        }
    }

    pub fn is_floor_at(&self, c: Coords) -> bool {
        self.get(c).is_some_and(tiles::is_floor)
    }

    /// Number of tiles matching `pred`.
    pub fn count(&self, pred: impl Fn(u8) -> bool) -> usize {
        self.tiles.iter().filter(|&&t| pred(t)).count()
    }

    /// Parse the text format. Trailing blank lines are ignored.
    pub fn parse(text: &str) -> Result<Self, GridError> {
        let mut levels: Vec<Vec<&str>> = vec![Vec::new()];
        for line in text.lines() {
            if line.is_empty() {
                if levels.last().is_some_and(|l| !l.is_empty()) {
                    levels.push(Vec::new());
                }
            } else if let Some(level) = levels.last_mut() {
                level.push(line);
            }
        }
        levels.retain(|l| !l.is_empty());

        let first = levels.first().ok_or(GridError::Empty)?;
        let height = first.len();
        let width = first[0].len();

        let mut tiles = Vec::with_capacity(width * height * levels.len());
        for (z, level) in levels.iter().enumerate() {
            if level.len() != height {
                return Err(GridError::LevelHeight {
                    z,
                    expected: height,
                    found: level.len(),
                });
            }
            for (y, row) in level.iter().enumerate() {
                if row.len() != width {
                    return Err(GridError::RaggedRow {
                        z,
                        y,
                        expected: width,
                        found: row.len(),
                    });
                }
                if let Some(x) = row.bytes().position(|b| !tiles::is_known(b)) {
                    return Err(GridError::UnknownTile {
                        z,
                        y,
                        x,
                        tile: row.as_bytes()[x],
                    });
                }
                tiles.extend_from_slice(row.as_bytes());
            }
        }

        Ok(Self {
            width: width as i32,
            height: height as i32,
            depth: levels.len() as i32,
            tiles,
        })
    }

    /// Render the text format: rows per z-level, one blank line between levels.
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity(self.tiles.len() + (self.height * self.depth) as usize * 2);
        for z in 0..self.depth {
            if z > 0 {
                out.push('\n');
            }
            for y in 0..self.height {
                for x in 0..self.width {
                    let t = self.get(Coords::new(x, y, z)).unwrap_or(tiles::UNASSIGNED);
                    out.push(t as char);
                }
                out.push('\n');
            }
        }
        out
    }
}

impl std::fmt::Display for LevelGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_text())
    }
}

/// Errors from parsing the level text format.
#[derive(Debug, Clone, PartialEq)]
pub enum GridError {
    Empty,
    RaggedRow {
        z: usize,
        y: usize,
        expected: usize,
        found: usize,
    },
    LevelHeight {
        z: usize,
        expected: usize,
        found: usize,
    },
    UnknownTile {
        z: usize,
        y: usize,
        x: usize,
        tile: u8,
    },
}

impl std::fmt::Display for GridError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GridError::Empty => write!(f, "Level text contains no rows"),
            GridError::RaggedRow {
                z,
                y,
                expected,
                found,
            } => write!(
                f,
                "Row {} of z-level {} is {} tiles wide, expected {}",
                y, z, found, expected
            ),
            GridError::LevelHeight { z, expected, found } => write!(
                f,
                "Z-level {} has {} rows, expected {}",
                z, found, expected
            ),
            GridError::UnknownTile { z, y, x, tile } => write!(
                f,
                "Unknown tile {:?} at ({}, {}, {})",
                *tile as char, x, y, z
            ),
        }
    }
}

impl std::error::Error for GridError {}
