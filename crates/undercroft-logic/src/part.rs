//! Part descriptors — the templates and generators pieces are made from.
//!
//! A part is either **static** (a fixed north-facing character map plus a
//! list of connection points) or **dynamic** (a procedural room style that
//! rolls its own size when placed and stamps itself when built).
//!
//! Descriptors are immutable once loaded. Instance counts live in the
//! [`PartCatalog`](crate::catalog::PartCatalog), not here.

use serde::{Deserialize, Serialize};

use crate::constants::tiles;
use crate::geometry::{Coords, Direction};
use crate::rooms::RoomStyle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PartClass {
    Corridor,
    Room,
}

/// A connection point with the face it sits on, in the canonical frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionPoint {
    pub at: Coords,
    pub facing: Direction,
}

/// Character map and connection points of a static part.
#[derive(Debug, Clone, PartialEq)]
pub struct StaticTemplate {
    /// `height * depth` rows of `width` tiles, z-level by z-level.
    rows: Vec<Vec<u8>>,
    height: i32,
    connections: Vec<ConnectionPoint>,
}

impl StaticTemplate {
    /// Tile at a canonical local coordinate. The caller keeps `local` inside the part box.
    pub fn tile(&self, local: Coords) -> u8 {
        self.rows[(local.z * self.height + local.y) as usize][local.x as usize]
    }

    pub fn connections(&self) -> &[ConnectionPoint] {
        &self.connections
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PartShape {
    Static(StaticTemplate),
    Dynamic(RoomStyle),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PartDescriptor {
    pub name: String,
    /// Canonical (north-facing) dimensions. Zero for dynamic parts, which
    /// roll their size per piece.
    pub width: i32,
    pub height: i32,
    pub depth: i32,
    pub class: PartClass,
    pub weight: u32,
    /// `None` means any number of pieces may use this part.
    pub max_count: Option<u32>,
    /// Dynamic parts only: may be used as a dungeon entrance.
    pub entrance: bool,
    pub shape: PartShape,
}

/// Serializable description of a static part, as loaded from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartTemplate {
    pub name: String,
    pub width: i32,
    pub height: i32,
    #[serde(default = "one")]
    pub depth: i32,
    pub class: PartClass,
    pub weight: u32,
    #[serde(default)]
    pub max_count: Option<u32>,
    pub connections: Vec<Coords>,
    /// `height * depth` rows, drawn facing north, z-level 0 first.
    pub rows: Vec<String>,
}

fn one() -> i32 {
    1
}

/// Face of the part box a local point sits on.
///
/// West, east, north and south faces take priority in that order; a point
/// off all four side faces is an up link on the top layer and a down link
/// on the bottom layer. Anything else is buried inside the part.
pub fn connection_face(at: Coords, width: i32, height: i32, depth: i32) -> Option<Direction> {
    if at.x == 0 {
        Some(Direction::West)
    } else if at.x == width - 1 {
        Some(Direction::East)
    } else if at.y == 0 {
        Some(Direction::North)
    } else if at.y == height - 1 {
        Some(Direction::South)
    } else if at.z == 0 {
        Some(Direction::Up)
    } else if at.z == depth - 1 {
        Some(Direction::Down)
    } else {
        None
    }
}

impl TryFrom<PartTemplate> for PartDescriptor {
    type Error = PartError;

    /// Load-time sanity checks. A part that fails them never enters a catalog.
    fn try_from(t: PartTemplate) -> Result<Self, PartError> {
        if t.width <= 0 || t.height <= 0 || t.depth <= 0 {
            return Err(PartError::ZeroSize { name: t.name });
        }

        let expected_rows = (t.height * t.depth) as usize;
        if t.rows.len() != expected_rows {
            return Err(PartError::RowCount {
                name: t.name,
                expected: expected_rows,
                found: t.rows.len(),
            });
        }
        for (i, row) in t.rows.iter().enumerate() {
            if row.len() != t.width as usize {
                return Err(PartError::RowWidth {
                    name: t.name.clone(),
                    row: i,
                    expected: t.width as usize,
                    found: row.len(),
                });
            }
            if let Some(column) = row.bytes().position(|b| !tiles::is_known(b)) {
                return Err(PartError::UnknownTile {
                    name: t.name.clone(),
                    row: i,
                    column,
                    tile: row.as_bytes()[column],
                });
            }
        }

        let mut connections = Vec::with_capacity(t.connections.len());
        for &at in &t.connections {
            if at.x < 0
                || at.y < 0
                || at.z < 0
                || at.x >= t.width
                || at.y >= t.height
                || at.z >= t.depth
            {
                return Err(PartError::ConnectionOutOfBounds { name: t.name, at });
            }
            let facing = connection_face(at, t.width, t.height, t.depth)
                .ok_or_else(|| PartError::ConnectionNotOnFace {
                    name: t.name.clone(),
                    at,
                })?;
            connections.push(ConnectionPoint { at, facing });
        }

        // Chaining forward attaches a part by a point on its southern edge.
        if !connections.iter().any(|c| c.at.y == t.height - 1) {
            return Err(PartError::NoSouthernConnection { name: t.name });
        }

        Ok(Self {
            width: t.width,
            height: t.height,
            depth: t.depth,
            class: t.class,
            weight: t.weight,
            max_count: t.max_count,
            entrance: false,
            shape: PartShape::Static(StaticTemplate {
                rows: t.rows.into_iter().map(String::into_bytes).collect(),
                height: t.height,
                connections,
            }),
            name: t.name,
        })
    }
}

impl PartDescriptor {
    /// A procedural room part.
    pub fn dynamic(
        name: &str,
        class: PartClass,
        weight: u32,
        max_count: Option<u32>,
        style: RoomStyle,
        entrance: bool,
    ) -> Self {
        Self {
            name: name.to_string(),
            width: 0,
            height: 0,
            depth: 1,
            class,
            weight,
            max_count,
            entrance,
            shape: PartShape::Dynamic(style),
        }
    }

    pub fn template(&self) -> Option<&StaticTemplate> {
        match &self.shape {
            PartShape::Static(t) => Some(t),
            PartShape::Dynamic(_) => None,
        }
    }

    pub fn connections(&self) -> &[ConnectionPoint] {
        self.template().map_or(&[], StaticTemplate::connections)
    }

    pub fn is_room(&self) -> bool {
        self.class == PartClass::Room
    }

    /// Whether a piece of this part can be the first piece at a starting anchor.
    pub fn can_start(&self) -> bool {
        match &self.shape {
            PartShape::Static(t) => t.connections.iter().any(|c| c.facing == Direction::Up),
            PartShape::Dynamic(_) => self.entrance,
        }
    }
}

/// Load-time sanity failures.
#[derive(Debug, Clone, PartialEq)]
pub enum PartError {
    ZeroSize {
        name: String,
    },
    RowCount {
        name: String,
        expected: usize,
        found: usize,
    },
    RowWidth {
        name: String,
        row: usize,
        expected: usize,
        found: usize,
    },
    UnknownTile {
        name: String,
        row: usize,
        column: usize,
        tile: u8,
    },
    ConnectionOutOfBounds {
        name: String,
        at: Coords,
    },
    ConnectionNotOnFace {
        name: String,
        at: Coords,
    },
    NoSouthernConnection {
        name: String,
    },
}

impl std::fmt::Display for PartError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PartError::ZeroSize { name } => write!(f, "Part '{}' has a zero dimension", name),
            PartError::RowCount {
                name,
                expected,
                found,
            } => write!(
                f,
                "Part '{}' has {} map rows, expected {}",
                name, found, expected
            ),
            PartError::RowWidth {
                name,
                row,
                expected,
                found,
            } => write!(
                f,
                "Part '{}' map row {} is {} wide, does not match width {}",
                name, row, found, expected
            ),
            PartError::UnknownTile {
                name,
                row,
                column,
                tile,
            } => write!(
                f,
                "Part '{}' map row {} has unknown tile {:?} at column {}",
                name, row, *tile as char, column
            ),
            PartError::ConnectionOutOfBounds { name, at } => {
                write!(f, "Part '{}' has connection {} outside its box", name, at)
            }
            PartError::ConnectionNotOnFace { name, at } => {
                write!(f, "Part '{}' has connection {} buried inside its box", name, at)
            }
            PartError::NoSouthernConnection { name } => {
                write!(f, "Part '{}' has no connection on its southern edge", name)
            }
        }
    }
}

impl std::error::Error for PartError {}
