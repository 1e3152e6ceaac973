//! Procedural rooms — the dynamic part kinds.
//!
//! A procedural room rolls its own size when placed and, when built, walls
//! its perimeter, fills its interior, and tries connections at random
//! perimeter positions (roughly one per three perimeter tiles).

use std::sync::Arc;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::builder::render_anchor;
use crate::constants::defaults::{PERIMETER_TILES_PER_CONNECTION, ROOM_MAX_SIDE, ROOM_MIN_SIDE};
use crate::constants::tiles;
use crate::geometry::{Coords, Direction};
use crate::occupancy::{OccupancyGrid, PieceId};
use crate::part::PartDescriptor;
use crate::piece::Piece;
use crate::placement::fit;
use crate::resolver::resolve_connection;
use crate::session::{Growth, Session};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoomStyle {
    /// Walls around an open floor.
    Plain,
    /// Like `Plain`, with a regular grid of pillars inside.
    Columned,
}

impl RoomStyle {
    /// Roll a size and try to fit the room at `anchor`.
    ///
    /// Sideways growth links through a random non-corner tile of the room's
    /// southern wall; vertical growth links through a random interior tile
    /// and turns the room to a random cardinal.
    pub fn propose(
        self,
        part: &Arc<PartDescriptor>,
        occupancy: &OccupancyGrid,
        rng: &mut impl Rng,
        anchor: Coords,
        dir: Direction,
    ) -> Option<Piece> {
        let w = rng.gen_range(ROOM_MIN_SIDE..=ROOM_MAX_SIDE);
        let h = rng.gen_range(ROOM_MIN_SIDE..=ROOM_MAX_SIDE);

        let (link, rotation) = if dir.is_vertical() {
            let link = Coords::new(rng.gen_range(1..w - 1), rng.gen_range(1..h - 1), 0);
            (link, Direction::random_cardinal(rng))
        } else {
            (Coords::new(rng.gen_range(1..w - 1), h - 1, 0), dir)
        };

        fit(part, occupancy, anchor, dir, rotation, link, w, h, 1)
    }

    /// Write the room onto the grid and resolve its connection attempts.
    pub fn stamp<R: Rng>(
        self,
        session: &mut Session<R>,
        piece: &Piece,
        id: PieceId,
        mut growth: Option<&mut Growth<'_>>,
    ) {
        let (w, h) = (piece.width, piece.height);
        for j in 0..h {
            for i in 0..w {
                let tile = if i == 0 || j == 0 || i == w - 1 || j == h - 1 {
                    tiles::WALL
                } else if self == RoomStyle::Columned && is_pillar(i, w) && is_pillar(j, h) {
                    tiles::WALL
                } else {
                    tiles::FLOOR
                };
                session.grid.set(piece.pos + Coords::new(i, j, 0), tile);
            }
        }

        render_anchor(&mut session.grid, piece);

        let attempts = connection_attempts(w, h);
        for _ in 0..attempts {
            let dir = Direction::random_cardinal(&mut session.rng);
            let offset = match dir {
                Direction::North => Coords::new(session.rng.gen_range(1..w - 1), 0, 0),
                Direction::South => Coords::new(session.rng.gen_range(1..w - 1), h - 1, 0),
                Direction::West => Coords::new(0, session.rng.gen_range(1..h - 1), 0),
                _ => Coords::new(w - 1, session.rng.gen_range(1..h - 1), 0),
            };
            resolve_connection(session, piece.pos + offset, dir, id, growth.as_deref_mut());
        }
    }
}

/// Pillar rows/columns: every other tile on odd extents, every third on even.
/// The ring just inside the walls stays clear so every opening reaches floor.
fn is_pillar(i: i32, extent: i32) -> bool {
    if i <= 1 || i >= extent - 2 {
        return false;
    }
    if extent % 2 == 1 {
        i % 2 == 0
    } else {
        (i + 1) % 3 == 0
    }
}

/// Connection attempts a `w`×`h` room makes when built.
pub fn connection_attempts(w: i32, h: i32) -> u32 {
    ((2 * (w - 1) + 2 * (h - 1)) / PERIMETER_TILES_PER_CONNECTION).max(0) as u32
}
