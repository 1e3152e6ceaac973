//! Validation of a generated dungeon.
//!
//! Pure checks over the grid and layout that return every problem found
//! instead of stopping at the first.

use std::collections::{HashSet, VecDeque};

use crate::constants::tiles;
use crate::geometry::{Coords, Direction};
use crate::grid::LevelGrid;
use crate::occupancy::PieceId;
use crate::piece::Layout;

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub category: &'static str,
    pub severity: Severity,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Severity {
    Error,
    Warning,
}

/// Run every check.
pub fn validate_layout(grid: &LevelGrid, layout: &Layout, starts: &[Coords]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    errors.extend(check_bounds(grid, layout));
    errors.extend(check_overlaps(layout));
    errors.extend(check_occupancy(layout));
    errors.extend(check_unbuilt(layout));
    errors.extend(check_connectivity(grid, starts));
    errors
}

/// Every piece's box lies inside the grid.
pub fn check_bounds(grid: &LevelGrid, layout: &Layout) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for (i, p) in layout.pieces().iter().enumerate() {
        if !grid.in_bounds(p.pos) || !grid.in_bounds(p.far_corner()) {
            errors.push(ValidationError {
                category: "bounds",
                severity: Severity::Error,
                message: format!(
                    "Piece #{} '{}' spans {}..{}, outside the {}x{}x{} grid",
                    i,
                    p.part.name,
                    p.pos,
                    p.far_corner(),
                    grid.width(),
                    grid.height(),
                    grid.depth()
                ),
            });
        }
    }
    errors
}

/// No two pieces' boxes share a tile.
pub fn check_overlaps(layout: &Layout) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let pieces = layout.pieces();
    for (i, a) in pieces.iter().enumerate() {
        for (j, b) in pieces.iter().enumerate().skip(i + 1) {
            if a.overlaps(b) {
                errors.push(ValidationError {
                    category: "overlap",
                    severity: Severity::Error,
                    message: format!(
                        "Pieces #{} '{}' and #{} '{}' overlap",
                        i, a.part.name, j, b.part.name
                    ),
                });
            }
        }
    }
    errors
}

/// The occupancy grid names each piece as the owner of exactly its box.
pub fn check_occupancy(layout: &Layout) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut expected = 0;
    for (i, p) in layout.pieces().iter().enumerate() {
        let id = PieceId(i as u32);
        let b = p.far_corner();
        let mut wrong = 0;
        for z in p.pos.z..=b.z {
            for y in p.pos.y..=b.y {
                for x in p.pos.x..=b.x {
                    if layout.owner_at(Coords::new(x, y, z)) != Some(id) {
                        wrong += 1;
                    }
                }
            }
        }
        if wrong > 0 {
            errors.push(ValidationError {
                category: "occupancy",
                severity: Severity::Error,
                message: format!("{} tiles of piece #{} are not owned by it", wrong, i),
            });
        }
        expected += (p.width * p.height * p.depth) as usize;
    }

    let owned = layout.occupancy().owned_tiles();
    if owned != expected {
        errors.push(ValidationError {
            category: "occupancy",
            severity: Severity::Error,
            message: format!("{} tiles owned, pieces cover {}", owned, expected),
        });
    }
    errors
}

/// Every piece was stamped.
pub fn check_unbuilt(layout: &Layout) -> Vec<ValidationError> {
    let unbuilt = layout.pieces().iter().filter(|p| !p.built).count();
    if unbuilt == 0 {
        return Vec::new();
    }
    vec![ValidationError {
        category: "build",
        severity: Severity::Error,
        message: format!("{} of {} pieces never built", unbuilt, layout.len()),
    }]
}

/// Every walkable tile is reachable from some start.
///
/// Walking moves between orthogonal floor tiles on a level, and between
/// stair tiles stacked directly above one another.
pub fn check_connectivity(grid: &LevelGrid, starts: &[Coords]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut visited = HashSet::new();
    let mut queue = VecDeque::new();

    for &s in starts {
        if grid.is_floor_at(s) {
            if visited.insert(s) {
                queue.push_back(s);
            }
        } else {
            errors.push(ValidationError {
                category: "connectivity",
                severity: Severity::Warning,
                message: format!("Start {} is not walkable", s),
            });
        }
    }

    while let Some(current) = queue.pop_front() {
        for dir in Direction::CARDINALS {
            let next = current.step(dir);
            if grid.is_floor_at(next) && visited.insert(next) {
                queue.push_back(next);
            }
        }
        if grid.get(current).is_some_and(tiles::is_stairs) {
            for dir in [Direction::Up, Direction::Down] {
                let next = current.step(dir);
                if grid.get(next).is_some_and(tiles::is_stairs) && visited.insert(next) {
                    queue.push_back(next);
                }
            }
        }
    }

    let walkable = grid.count(tiles::is_floor);
    if visited.len() < walkable {
        errors.push(ValidationError {
            category: "connectivity",
            severity: Severity::Error,
            message: format!(
                "{} of {} walkable tiles unreachable from the starts",
                walkable - visited.len(),
                walkable
            ),
        });
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connected_level_passes() {
        let grid = LevelGrid::parse("#####\n#...#\n#.#.#\n#...#\n#####\n").unwrap();
        assert!(check_connectivity(&grid, &[Coords::new(1, 1, 0)]).is_empty());
    }

    #[test]
    fn test_isolated_pocket_is_reported() {
        let grid = LevelGrid::parse("#######\n#..#..#\n#######\n").unwrap();
        let errors = check_connectivity(&grid, &[Coords::new(1, 1, 0)]);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].category, "connectivity");
        assert!(errors[0].message.starts_with("2 of 4"));
    }

    #[test]
    fn test_stairs_join_levels() {
        let grid = LevelGrid::parse("###\n#>#\n###\n\n###\n#<#\n#.#\n").unwrap();
        assert!(check_connectivity(&grid, &[Coords::new(1, 1, 0)]).is_empty());
    }

    #[test]
    fn test_unwalkable_start_warns() {
        let grid = LevelGrid::parse("###\n#.#\n###\n").unwrap();
        let errors = check_connectivity(&grid, &[Coords::new(0, 0, 0)]);
        assert_eq!(errors[0].severity, Severity::Warning);
        assert_eq!(errors[1].severity, Severity::Error);
    }
}
