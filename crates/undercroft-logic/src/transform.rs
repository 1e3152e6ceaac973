//! Part-local to piece-relative coordinate mapping.
//!
//! A part's template is drawn facing north inside a `w`×`h` box. Placing it
//! facing another cardinal direction turns the box; these functions map a
//! tile between the canonical frame and the rotated frame, both relative to
//! the box's top-left-front corner. `z` is never touched.
//!
//! Vertical directions are not rotations and map like `North`.

use crate::geometry::{rotated_dims, Coords, Direction};

/// Canonical part coordinates → coordinates inside the rotated box.
///
/// `w` and `h` are the part's canonical (north-facing) dimensions.
pub fn to_rotated(local: Coords, w: i32, h: i32, dir: Direction) -> Coords {
    let (rw, rh) = rotated_dims(w, h, dir);
    let Coords { x, y, z } = local;
    match dir {
        Direction::East => Coords::new(rw - 1 - y, x, z),
        Direction::South => Coords::new(rw - 1 - x, rh - 1 - y, z),
        Direction::West => Coords::new(y, rh - 1 - x, z),
        Direction::North | Direction::Up | Direction::Down => local,
    }
}

/// Inverse of [`to_rotated`]: rotated box coordinates → canonical part coordinates.
pub fn to_local(rotated: Coords, w: i32, h: i32, dir: Direction) -> Coords {
    let (rw, rh) = rotated_dims(w, h, dir);
    let Coords { x, y, z } = rotated;
    match dir {
        Direction::East => Coords::new(y, rw - 1 - x, z),
        Direction::South => Coords::new(rw - 1 - x, rh - 1 - y, z),
        Direction::West => Coords::new(rh - 1 - y, x, z),
        Direction::North | Direction::Up | Direction::Down => rotated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_east_turns_south_edge_west() {
        // Bottom-left of a 7×5 part ends up top-left of the 5×7 box.
        let p = to_rotated(Coords::new(0, 4, 0), 7, 5, Direction::East);
        assert_eq!(p, Coords::new(0, 0, 0));
        // Bottom-right ends up bottom-left.
        let p = to_rotated(Coords::new(6, 4, 0), 7, 5, Direction::East);
        assert_eq!(p, Coords::new(0, 6, 0));
    }

    #[test]
    fn test_south_is_half_turn() {
        let p = to_rotated(Coords::new(1, 0, 1), 7, 5, Direction::South);
        assert_eq!(p, Coords::new(5, 4, 1));
    }

    #[test]
    fn test_west_turns_south_edge_east() {
        let p = to_rotated(Coords::new(3, 4, 0), 7, 5, Direction::West);
        assert_eq!(p, Coords::new(4, 3, 0));
    }

    #[test]
    fn test_vertical_is_identity() {
        let c = Coords::new(2, 3, 0);
        assert_eq!(to_rotated(c, 7, 5, Direction::Up), c);
        assert_eq!(to_local(c, 7, 5, Direction::Down), c);
    }

    #[test]
    fn test_rotation_covers_box_exactly() {
        for dir in Direction::CARDINALS {
            let (rw, rh) = rotated_dims(6, 4, dir);
            let mut seen = std::collections::HashSet::new();
            for y in 0..4 {
                for x in 0..6 {
                    let r = to_rotated(Coords::new(x, y, 0), 6, 4, dir);
                    assert!(r.x >= 0 && r.x < rw && r.y >= 0 && r.y < rh, "{:?} {:?}", dir, r);
                    assert!(seen.insert((r.x, r.y)), "{:?} maps twice onto {:?}", dir, r);
                }
            }
        }
    }

    proptest! {
        #[test]
        fn prop_round_trip_per_rotation(
            w in 1i32..20,
            h in 1i32..20,
            fx in 0.0f64..1.0,
            fy in 0.0f64..1.0,
            z in 0i32..3,
            turn in 0usize..4,
        ) {
            let dir = Direction::CARDINALS[turn];
            let x = ((w as f64) * fx) as i32;
            let y = ((h as f64) * fy) as i32;
            let local = Coords::new(x, y, z);
            let rotated = to_rotated(local, w, h, dir);
            prop_assert_eq!(to_local(rotated, w, h, dir), local);
        }
    }
}
