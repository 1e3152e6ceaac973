//! Placed pieces and the layout that owns them.
//!
//! `Layout` keeps the piece list and the occupancy grid together: projecting
//! a piece appends it and claims its box in one step, so the two never
//! disagree about who owns a tile. Pieces are append-only.

use std::sync::Arc;

use crate::geometry::{Coords, Direction};
use crate::occupancy::{OccupancyGrid, PieceId};
use crate::part::{PartClass, PartDescriptor};

#[derive(Debug, Clone)]
pub struct Piece {
    /// Top-left-front corner in level coordinates.
    pub pos: Coords,
    /// Extents after rotation.
    pub width: i32,
    pub height: i32,
    pub depth: i32,
    /// Direction the piece was grown in. May be `Up`/`Down`.
    pub direction: Direction,
    /// Cardinal rotation used for stamping. Vertical requests get a random one.
    pub rotation: Direction,
    pub part: Arc<PartDescriptor>,
    /// Tile linking this piece to whatever spawned it.
    pub anchor: Coords,
    /// `None` for pieces placed at a starting anchor.
    pub parent: Option<PieceId>,
    pub built: bool,
}

impl Piece {
    /// Bottom-right-back corner, inclusive.
    pub fn far_corner(&self) -> Coords {
        self.pos + Coords::new(self.width - 1, self.height - 1, self.depth - 1)
    }

    pub fn contains(&self, c: Coords) -> bool {
        let b = self.far_corner();
        c.x >= self.pos.x
            && c.x <= b.x
            && c.y >= self.pos.y
            && c.y <= b.y
            && c.z >= self.pos.z
            && c.z <= b.z
    }

    /// True if `c` is a corner of the bounding box on every axis.
    pub fn is_corner(&self, c: Coords) -> bool {
        let b = self.far_corner();
        (c.x == self.pos.x || c.x == b.x)
            && (c.y == self.pos.y || c.y == b.y)
            && (c.z == self.pos.z || c.z == b.z)
    }

    /// True if `c` lies inside the footprint and off its outer rectangle.
    pub fn is_interior(&self, c: Coords) -> bool {
        let b = self.far_corner();
        c.x > self.pos.x && c.x < b.x && c.y > self.pos.y && c.y < b.y
    }

    pub fn class(&self) -> PartClass {
        self.part.class
    }

    pub fn overlaps(&self, other: &Piece) -> bool {
        let (a1, a2) = (self.pos, self.far_corner());
        let (b1, b2) = (other.pos, other.far_corner());
        a1.x <= b2.x && b1.x <= a2.x && a1.y <= b2.y && b1.y <= a2.y && a1.z <= b2.z && b1.z <= a2.z
    }
}

#[derive(Debug, Clone)]
pub struct Layout {
    pieces: Vec<Piece>,
    occupancy: OccupancyGrid,
    rooms: u32,
}

impl Layout {
    pub fn new(width: i32, height: i32, depth: i32) -> Self {
        Self {
            pieces: Vec::new(),
            occupancy: OccupancyGrid::new(width, height, depth),
            rooms: 0,
        }
    }

    /// Append a piece and claim its box.
    pub fn project(&mut self, piece: Piece) -> PieceId {
        let id = PieceId(self.pieces.len() as u32);
        self.occupancy.claim(piece.pos, piece.far_corner(), id);
        if piece.class() == PartClass::Room {
            self.rooms += 1;
        }
        log::debug!(
            "projected piece #{} '{}' at {} size {}x{}x{} facing {:?}",
            id.0,
            piece.part.name,
            piece.pos,
            piece.width,
            piece.height,
            piece.depth,
            piece.rotation
        );
        self.pieces.push(piece);
        id
    }

    pub fn get(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(id.index())
    }

    pub fn mark_built(&mut self, id: PieceId) {
        if let Some(p) = self.pieces.get_mut(id.index()) {
            p.built = true;
        }
    }

    pub fn owner_at(&self, c: Coords) -> Option<PieceId> {
        self.occupancy.owner(c)
    }

    pub fn occupancy(&self) -> &OccupancyGrid {
        &self.occupancy
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Room-class pieces projected so far.
    pub fn room_count(&self) -> u32 {
        self.rooms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rooms::RoomStyle;

    fn piece(pos: Coords, w: i32, h: i32) -> Piece {
        Piece {
            pos,
            width: w,
            height: h,
            depth: 1,
            direction: Direction::North,
            rotation: Direction::North,
            part: Arc::new(PartDescriptor::dynamic(
                "room",
                PartClass::Room,
                1,
                None,
                RoomStyle::Plain,
                false,
            )),
            anchor: pos,
            parent: None,
            built: false,
        }
    }

    #[test]
    fn test_corner_and_interior() {
        let p = piece(Coords::new(2, 2, 0), 5, 4);
        assert!(p.is_corner(Coords::new(2, 2, 0)));
        assert!(p.is_corner(Coords::new(6, 5, 0)));
        assert!(!p.is_corner(Coords::new(3, 2, 0)));
        assert!(p.is_interior(Coords::new(3, 3, 0)));
        assert!(!p.is_interior(Coords::new(2, 3, 0)));
        assert!(!p.is_interior(Coords::new(6, 3, 0)));
    }

    #[test]
    fn test_overlap_is_inclusive() {
        let a = piece(Coords::new(0, 0, 0), 5, 5);
        let b = piece(Coords::new(4, 4, 0), 3, 3);
        let c = piece(Coords::new(5, 0, 0), 3, 3);
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_project_claims_occupancy_and_counts_rooms() {
        let mut layout = Layout::new(20, 20, 1);
        let id = layout.project(piece(Coords::new(1, 1, 0), 4, 3));
        assert_eq!(id, PieceId(0));
        assert_eq!(layout.owner_at(Coords::new(4, 3, 0)), Some(id));
        assert_eq!(layout.owner_at(Coords::new(5, 3, 0)), None);
        assert_eq!(layout.occupancy().owned_tiles(), 12);
        assert_eq!(layout.room_count(), 1);
        assert!(!layout.get(id).unwrap().built);
        layout.mark_built(id);
        assert!(layout.get(id).unwrap().built);
    }
}
