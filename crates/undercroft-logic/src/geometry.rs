//! Tile coordinates and the six connection directions.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Integer tile position. `z` grows downward: z = 0 is the top level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coords {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Coords {
    pub const ZERO: Self = Self { x: 0, y: 0, z: 0 };

    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The neighbouring tile one step in `dir`.
    pub fn step(self, dir: Direction) -> Self {
        self + dir.offset()
    }
}

impl std::ops::Add for Coords {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl std::ops::Sub for Coords {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl std::fmt::Display for Coords {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Direction a connection faces.
///
/// The four cardinals double as piece rotations: a part's template is drawn
/// facing `North`, and a piece rotated `East` has been turned a quarter turn
/// clockwise. `Up` and `Down` are links between z-levels and never rotate
/// anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    East,
    South,
    West,
    Up,
    Down,
}

impl Direction {
    pub const CARDINALS: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Unit step in level coordinates.
    pub fn offset(self) -> Coords {
        match self {
            Direction::North => Coords::new(0, -1, 0),
            Direction::East => Coords::new(1, 0, 0),
            Direction::South => Coords::new(0, 1, 0),
            Direction::West => Coords::new(-1, 0, 0),
            Direction::Up => Coords::new(0, 0, -1),
            Direction::Down => Coords::new(0, 0, 1),
        }
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }

    /// East and west rotations swap a part's width and height.
    pub fn is_sideways(self) -> bool {
        matches!(self, Direction::East | Direction::West)
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }

    /// Quarter turns clockwise from north. `None` for vertical directions.
    pub fn quarter_turns(self) -> Option<u8> {
        match self {
            Direction::North => Some(0),
            Direction::East => Some(1),
            Direction::South => Some(2),
            Direction::West => Some(3),
            Direction::Up | Direction::Down => None,
        }
    }

    /// Turn a direction given in a part's canonical frame by a piece's
    /// rotation. Vertical directions pass through unchanged.
    pub fn rotated_by(self, rotation: Direction) -> Self {
        match (self.quarter_turns(), rotation.quarter_turns()) {
            (Some(a), Some(b)) => Self::CARDINALS[usize::from((a + b) % 4)],
            _ => self,
        }
    }

    pub fn random_cardinal(rng: &mut impl Rng) -> Self {
        Self::CARDINALS[rng.gen_range(0..4)]
    }
}

/// Width and height of a `w`×`h` footprint after rotating it to face `dir`.
pub fn rotated_dims(w: i32, h: i32, dir: Direction) -> (i32, i32) {
    if dir.is_sideways() {
        (h, w)
    } else {
        (w, h)
    }
}
