//! Tile → owning piece map, kept parallel to the level grid.

use serde::{Deserialize, Serialize};

use crate::geometry::Coords;

/// Index of a piece in its [`Layout`](crate::piece::Layout).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PieceId(pub u32);

impl PieceId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone)]
pub struct OccupancyGrid {
    width: i32,
    height: i32,
    depth: i32,
    owners: Vec<Option<PieceId>>,
}

impl OccupancyGrid {
    pub fn new(width: i32, height: i32, depth: i32) -> Self {
        let (width, height, depth) = (width.max(0), height.max(0), depth.max(0));
        Self {
            width,
            height,
            depth,
            owners: vec![None; (width * height * depth) as usize],
        }
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

    pub fn owner(&self, c: Coords) -> Option<PieceId> {
        self.index(c).and_then(|i| self.owners[i])
    }

    pub fn set_owner(&mut self, c: Coords, owner: Option<PieceId>) {
        if let Some(i) = self.index(c) {
            self.owners[i] = owner;
        }
    }

    /// True if the inclusive box `a..=b` lies in bounds and no tile in it is owned.
    pub fn is_region_free(&self, a: Coords, b: Coords) -> bool {
        if !self.in_bounds(a) || !self.in_bounds(b) {
            return false;
        }
        for z in a.z..=b.z {
            for y in a.y..=b.y {
                for x in a.x..=b.x {
                    if self.owner(Coords::new(x, y, z)).is_some() {
                        return false;
                    }
                }
            }
        }
        true
    }

    /// Claim every tile of the inclusive box `a..=b` for `owner`.
    pub fn claim(&mut self, a: Coords, b: Coords, owner: PieceId) {
        for z in a.z..=b.z {
            for y in a.y..=b.y {
                for x in a.x..=b.x {
                    self.set_owner(Coords::new(x, y, z), Some(owner));
                }
            }
        }
    }

    pub fn owned_tiles(&self) -> usize {
        self.owners.iter().filter(|o| o.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_and_query() {
        let mut occ = OccupancyGrid::new(10, 10, 1);
        occ.claim(Coords::new(2, 2, 0), Coords::new(4, 3, 0), PieceId(7));
        assert_eq!(occ.owner(Coords::new(3, 3, 0)), Some(PieceId(7)));
        assert_eq!(occ.owner(Coords::new(5, 3, 0)), None);
        assert_eq!(occ.owned_tiles(), 6);
    }

    #[test]
    fn test_region_free_detects_overlap() {
        let mut occ = OccupancyGrid::new(10, 10, 1);
        occ.claim(Coords::new(2, 2, 0), Coords::new(4, 4, 0), PieceId(0));
        assert!(!occ.is_region_free(Coords::new(4, 4, 0), Coords::new(6, 6, 0)));
        assert!(occ.is_region_free(Coords::new(5, 5, 0), Coords::new(6, 6, 0)));
    }

    #[test]
    fn test_region_out_of_bounds_is_not_free() {
        let occ = OccupancyGrid::new(10, 10, 1);
        assert!(!occ.is_region_free(Coords::new(8, 8, 0), Coords::new(10, 9, 0)));
        assert!(!occ.is_region_free(Coords::new(0, 0, 0), Coords::new(1, 1, 1)));
    }

    #[test]
    fn test_owner_out_of_bounds_is_none() {
        let occ = OccupancyGrid::new(3, 3, 1);
        assert_eq!(occ.owner(Coords::new(-1, 0, 0)), None);
    }
}
