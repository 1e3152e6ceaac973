//! Connection resolution — growing, shortcutting, or sealing one connection.
//!
//! A connection is a boundary tile `pos` of a piece plus the direction it
//! faces. The tile one step beyond it (the *anchor*) decides what happens:
//!
//! - empty: grow a new piece there, or seal the connection if nothing fits
//!   or the session is draining
//! - owned by a built piece whose wall has floor behind it: carve a
//!   shortcut through both tiles, unless that wall already holds a doorway
//! - owned by a piece still queued, or already open: leave it alone
//!
//! Connections that would meet another piece at the corner of its box are
//! sealed.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::tiles;
use crate::geometry::{Coords, Direction};
use crate::grid::LevelGrid;
use crate::occupancy::PieceId;
use crate::part::PartClass;
use crate::placement::try_place;
use crate::session::{Growth, Session};

/// How a single connection attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// A new piece was placed and queued.
    Grown(PieceId),
    /// A passage was carved into an existing piece.
    Shortcut,
    /// The connection was sealed.
    Closed,
    /// The connection meets an existing piece and needed no change.
    Joined,
}

/// Per-outcome connection counts for a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionTally {
    pub grown: u32,
    pub shortcuts: u32,
    pub closed: u32,
    pub joined: u32,
}

impl ConnectionTally {
    pub fn record(&mut self, r: Resolution) {
        match r {
            Resolution::Grown(_) => self.grown += 1,
            Resolution::Shortcut => self.shortcuts += 1,
            Resolution::Closed => self.closed += 1,
            Resolution::Joined => self.joined += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.grown + self.shortcuts + self.closed + self.joined
    }
}

/// Resolve the connection at `pos` facing `dir` on piece `owner`.
///
/// Without `growth` nothing new is placed and open connections are sealed.
pub fn resolve_connection<R: Rng>(
    session: &mut Session<R>,
    pos: Coords,
    dir: Direction,
    owner: PieceId,
    growth: Option<&mut Growth<'_>>,
) -> Resolution {
    let anchor = pos.step(dir);
    let resolution = if !session.grid.in_bounds(anchor) {
        close_connection(&mut session.grid, pos, dir);
        Resolution::Closed
    } else {
        match session.layout.owner_at(anchor) {
            None => grow(session, pos, dir, anchor, owner, growth),
            Some(other) => meet(session, pos, dir, anchor, other),
        }
    };
    session.tally.record(resolution);
    resolution
}

fn grow<R: Rng>(
    session: &mut Session<R>,
    pos: Coords,
    dir: Direction,
    anchor: Coords,
    owner: PieceId,
    growth: Option<&mut Growth<'_>>,
) -> Resolution {
    let Some(growth) = growth else {
        close_connection(&mut session.grid, pos, dir);
        return Resolution::Closed;
    };

    if !growth.budget.allows_piece(&session.layout) {
        close_connection(&mut session.grid, pos, dir);
        return Resolution::Closed;
    }

    let placed = try_place(growth.catalog, &session.layout, &mut session.rng, anchor, dir)
        .filter(|p| p.class() != PartClass::Room || growth.budget.allows_room(&session.layout));
    let Some(mut piece) = placed else {
        close_connection(&mut session.grid, pos, dir);
        return Resolution::Closed;
    };

    // Corridors open onto plain floor so they don't sprout a door every few tiles.
    let door = session
        .layout
        .get(owner)
        .map_or(true, |p| p.class() == PartClass::Room);
    open_connection(&mut session.grid, pos, door);

    piece.parent = Some(owner);
    let id = session.layout.project(piece);
    growth.queue.push(id);
    Resolution::Grown(id)
}

fn meet<R: Rng>(
    session: &mut Session<R>,
    pos: Coords,
    dir: Direction,
    anchor: Coords,
    other: PieceId,
) -> Resolution {
    let Some(piece) = session.layout.get(other) else {
        return Resolution::Joined;
    };
    // Queued pieces get their walls later; their own connections settle the seam.
    if !piece.built {
        return Resolution::Joined;
    }
    if piece.is_corner(anchor) {
        close_connection(&mut session.grid, pos, dir);
        return Resolution::Closed;
    }

    let grid = &mut session.grid;
    match grid.get(anchor) {
        Some(tiles::WALL) => {
            let beyond = anchor.step(dir);
            if !grid.is_floor_at(beyond) || is_doorway(grid, anchor, dir) {
                return Resolution::Joined;
            }
            grid.set(pos, tiles::FLOOR);
            grid.set(anchor, tiles::FLOOR);
            Resolution::Shortcut
        }
        Some(t) if tiles::is_floor(t) => Resolution::Joined,
        _ => {
            close_connection(grid, pos, dir);
            Resolution::Closed
        }
    }
}

/// Seal a connection tile with wall. Vertical links have no wall to seal
/// and are left as they are.
pub fn close_connection(grid: &mut LevelGrid, pos: Coords, dir: Direction) {
    if !dir.is_vertical() {
        grid.set(pos, tiles::WALL);
    }
}

/// Open a connection tile as a door, or as plain floor when `door` is false.
/// Tiles that are already walkable stay as they are.
pub fn open_connection(grid: &mut LevelGrid, pos: Coords, door: bool) {
    if !grid.is_floor_at(pos) {
        grid.set(pos, if door { tiles::DOOR } else { tiles::FLOOR });
    }
}

/// Whether the wall tile `wall`, crossed in direction `dir`, sits next to a
/// door in the same wall line.
///
/// The neighbouring door counts when its far side along the wall line is
/// wall or the grid edge.
pub fn is_doorway(grid: &LevelGrid, wall: Coords, dir: Direction) -> bool {
    let sides = match dir {
        Direction::North | Direction::South => [Direction::West, Direction::East],
        Direction::East | Direction::West => [Direction::North, Direction::South],
        Direction::Up | Direction::Down => return false,
    };
    sides.iter().any(|&side| {
        let next = wall.step(side);
        grid.get(next) == Some(tiles::DOOR)
            && grid.get(next.step(side)).map_or(true, |t| t == tiles::WALL)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::PartCatalog;
    use crate::part::PartDescriptor;
    use crate::piece::Piece;
    use crate::rooms::RoomStyle;
    use crate::session::Budget;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    fn session(w: i32, h: i32) -> Session<StdRng> {
        Session::new(LevelGrid::new(w, h, 1), StdRng::seed_from_u64(17))
    }

    fn room(pos: Coords, w: i32, h: i32, class: PartClass) -> Piece {
        Piece {
            pos,
            width: w,
            height: h,
            depth: 1,
            direction: Direction::North,
            rotation: Direction::North,
            part: Arc::new(PartDescriptor::dynamic("room", class, 1, None, RoomStyle::Plain, false)),
            anchor: pos,
            parent: None,
            built: false,
        }
    }

    /// Project a walled room with floor inside, already built.
    fn built_room(s: &mut Session<StdRng>, pos: Coords, w: i32, h: i32, class: PartClass) -> PieceId {
        let id = s.layout.project(room(pos, w, h, class));
        for j in 0..h {
            for i in 0..w {
                let edge = i == 0 || j == 0 || i == w - 1 || j == h - 1;
                s.grid.set(pos + Coords::new(i, j, 0), if edge { tiles::WALL } else { tiles::FLOOR });
            }
        }
        s.layout.mark_built(id);
        id
    }

    fn catalog() -> PartCatalog {
        PartCatalog::from_parts([PartDescriptor::dynamic(
            "room",
            PartClass::Room,
            1,
            None,
            RoomStyle::Plain,
            false,
        )])
    }

    #[test]
    fn test_out_of_bounds_anchor_closes() {
        let mut s = session(20, 20);
        let id = built_room(&mut s, Coords::new(0, 5, 0), 5, 5, PartClass::Room);
        s.grid.set(Coords::new(0, 7, 0), tiles::FLOOR);
        let r = resolve_connection(&mut s, Coords::new(0, 7, 0), Direction::West, id, None);
        assert_eq!(r, Resolution::Closed);
        assert_eq!(s.grid.get(Coords::new(0, 7, 0)), Some(tiles::WALL));
    }

    #[test]
    fn test_drain_closes_empty_anchor() {
        let mut s = session(30, 30);
        let id = built_room(&mut s, Coords::new(10, 10, 0), 5, 5, PartClass::Room);
        let r = resolve_connection(&mut s, Coords::new(12, 10, 0), Direction::North, id, None);
        assert_eq!(r, Resolution::Closed);
        assert_eq!(s.tally.closed, 1);
    }

    #[test]
    fn test_grow_opens_door_from_room() {
        let mut s = session(40, 40);
        let id = built_room(&mut s, Coords::new(15, 20, 0), 5, 5, PartClass::Room);
        let mut cat = catalog();
        let mut queue = Vec::new();
        let mut growth = Growth {
            catalog: &mut cat,
            queue: &mut queue,
            budget: Budget { max_pieces: 10, max_rooms: 10 },
        };
        let pos = Coords::new(17, 20, 0);
        let r = resolve_connection(&mut s, pos, Direction::North, id, Some(&mut growth));
        let Resolution::Grown(new_id) = r else {
            panic!("expected growth, got {:?}", r);
        };
        assert_eq!(queue, vec![new_id]);
        assert_eq!(s.grid.get(pos), Some(tiles::DOOR));
        let child = s.layout.get(new_id).unwrap();
        assert_eq!(child.parent, Some(id));
        assert_eq!(child.direction, Direction::North);
        assert_eq!(child.anchor, Coords::new(17, 19, 0));
        assert_eq!(s.layout.owner_at(child.anchor), Some(new_id));
    }

    #[test]
    fn test_grow_from_corridor_opens_floor() {
        let mut s = session(40, 40);
        let id = built_room(&mut s, Coords::new(15, 20, 0), 5, 3, PartClass::Corridor);
        let mut cat = catalog();
        let mut queue = Vec::new();
        let mut growth = Growth {
            catalog: &mut cat,
            queue: &mut queue,
            budget: Budget { max_pieces: 10, max_rooms: 10 },
        };
        let pos = Coords::new(17, 20, 0);
        let r = resolve_connection(&mut s, pos, Direction::North, id, Some(&mut growth));
        assert!(matches!(r, Resolution::Grown(_)));
        assert_eq!(s.grid.get(pos), Some(tiles::FLOOR));
    }

    #[test]
    fn test_budget_blocks_growth() {
        let mut s = session(40, 40);
        let id = built_room(&mut s, Coords::new(15, 20, 0), 5, 5, PartClass::Room);
        let mut cat = catalog();
        let mut queue = Vec::new();
        let mut growth = Growth {
            catalog: &mut cat,
            queue: &mut queue,
            budget: Budget { max_pieces: 10, max_rooms: 1 },
        };
        let r = resolve_connection(&mut s, Coords::new(17, 20, 0), Direction::North, id, Some(&mut growth));
        assert_eq!(r, Resolution::Closed);
        assert!(queue.is_empty());
        assert_eq!(s.layout.len(), 1);
    }

    #[test]
    fn test_queued_neighbour_is_left_alone() {
        let mut s = session(30, 30);
        let a = built_room(&mut s, Coords::new(5, 5, 0), 5, 5, PartClass::Room);
        s.layout.project(room(Coords::new(10, 5, 0), 5, 5, PartClass::Room));
        s.grid.set(Coords::new(9, 7, 0), tiles::FLOOR);
        let r = resolve_connection(&mut s, Coords::new(9, 7, 0), Direction::East, a, None);
        assert_eq!(r, Resolution::Joined);
        assert_eq!(s.grid.get(Coords::new(9, 7, 0)), Some(tiles::FLOOR));
    }

    #[test]
    fn test_corner_contact_closes() {
        let mut s = session(30, 30);
        let a = built_room(&mut s, Coords::new(5, 5, 0), 5, 5, PartClass::Room);
        built_room(&mut s, Coords::new(10, 9, 0), 5, 5, PartClass::Room);
        // (9, 9) faces east onto (10, 9), the top-left corner of the second room.
        let r = resolve_connection(&mut s, Coords::new(9, 9, 0), Direction::East, a, None);
        assert_eq!(r, Resolution::Closed);
    }

    #[test]
    fn test_shortcut_through_shared_walls() {
        let mut s = session(30, 30);
        let a = built_room(&mut s, Coords::new(5, 5, 0), 5, 5, PartClass::Room);
        built_room(&mut s, Coords::new(10, 5, 0), 5, 5, PartClass::Room);
        let pos = Coords::new(9, 7, 0);
        let r = resolve_connection(&mut s, pos, Direction::East, a, None);
        assert_eq!(r, Resolution::Shortcut);
        assert_eq!(s.grid.get(pos), Some(tiles::FLOOR));
        assert_eq!(s.grid.get(Coords::new(10, 7, 0)), Some(tiles::FLOOR));
    }

    #[test]
    fn test_no_shortcut_beside_existing_door() {
        let mut s = session(30, 30);
        let a = built_room(&mut s, Coords::new(5, 5, 0), 5, 5, PartClass::Room);
        built_room(&mut s, Coords::new(10, 5, 0), 5, 5, PartClass::Room);
        s.grid.set(Coords::new(10, 6, 0), tiles::DOOR);
        let r = resolve_connection(&mut s, Coords::new(9, 7, 0), Direction::East, a, None);
        assert_eq!(r, Resolution::Joined);
        assert_eq!(s.grid.get(Coords::new(10, 7, 0)), Some(tiles::WALL));
    }

    #[test]
    fn test_wall_without_floor_behind_is_left() {
        let mut s = session(30, 30);
        let a = built_room(&mut s, Coords::new(5, 5, 0), 5, 5, PartClass::Room);
        let b = built_room(&mut s, Coords::new(10, 5, 0), 5, 5, PartClass::Room);
        s.grid.set(Coords::new(11, 7, 0), tiles::WALL);
        assert!(s.layout.get(b).unwrap().built);
        let r = resolve_connection(&mut s, Coords::new(9, 7, 0), Direction::East, a, None);
        assert_eq!(r, Resolution::Joined);
    }

    #[test]
    fn test_unassigned_neighbour_tile_closes() {
        let mut s = session(30, 30);
        let a = built_room(&mut s, Coords::new(5, 5, 0), 5, 5, PartClass::Room);
        let b = built_room(&mut s, Coords::new(10, 5, 0), 5, 5, PartClass::Room);
        s.grid.set(Coords::new(10, 7, 0), tiles::UNASSIGNED);
        assert!(s.layout.get(b).is_some());
        let r = resolve_connection(&mut s, Coords::new(9, 7, 0), Direction::East, a, None);
        assert_eq!(r, Resolution::Closed);
        assert_eq!(s.grid.get(Coords::new(9, 7, 0)), Some(tiles::WALL));
    }

    #[test]
    fn test_vertical_close_leaves_tile() {
        let mut g = LevelGrid::new(5, 5, 1);
        g.set(Coords::new(2, 2, 0), tiles::STAIRS_UP);
        close_connection(&mut g, Coords::new(2, 2, 0), Direction::Up);
        assert_eq!(g.get(Coords::new(2, 2, 0)), Some(tiles::STAIRS_UP));
    }

    #[test]
    fn test_doorway_scan() {
        let mut g = LevelGrid::new(5, 5, 1);
        for y in 0..5 {
            g.set(Coords::new(2, y, 0), tiles::WALL);
        }
        g.set(Coords::new(2, 1, 0), tiles::DOOR);
        // Crossing (2, 2) eastward: the door above it sits in the same wall.
        assert!(is_doorway(&g, Coords::new(2, 2, 0), Direction::East));
        // Crossing (2, 3): no door next to it.
        assert!(!is_doorway(&g, Coords::new(2, 3, 0), Direction::East));
        // Door flanked by floor along the wall line is not a doorway of this wall.
        g.set(Coords::new(2, 0, 0), tiles::FLOOR);
        assert!(!is_doorway(&g, Coords::new(2, 2, 0), Direction::East));
    }

    #[test]
    fn test_tally_sums_outcomes() {
        let mut t = ConnectionTally::default();
        t.record(Resolution::Grown(PieceId(0)));
        t.record(Resolution::Closed);
        t.record(Resolution::Closed);
        t.record(Resolution::Joined);
        assert_eq!(t.total(), 4);
        assert_eq!(t.closed, 2);
    }
}
