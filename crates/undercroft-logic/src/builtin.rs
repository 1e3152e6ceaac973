//! Built-in part set.
//!
//! Static maps are drawn facing north. Every static part links forward
//! through a connection on its southern edge.

use crate::catalog::PartCatalog;
use crate::error::GenError;
use crate::geometry::Coords;
use crate::part::{PartClass, PartDescriptor, PartError, PartTemplate};
use crate::rooms::RoomStyle;

fn template(
    name: &str,
    (width, height, depth): (i32, i32, i32),
    weight: u32,
    connections: &[(i32, i32, i32)],
    rows: &[&str],
) -> PartTemplate {
    PartTemplate {
        name: name.to_string(),
        width,
        height,
        depth,
        class: PartClass::Room,
        weight,
        max_count: None,
        connections: connections
            .iter()
            .map(|&(x, y, z)| Coords::new(x, y, z))
            .collect(),
        rows: rows.iter().map(|r| r.to_string()).collect(),
    }
}

/// Cross-shaped hall: four wings around a central corridor.
fn xbone() -> PartTemplate {
    template(
        "xbone",
        (13, 11, 1),
        3,
        &[(0, 5, 0), (12, 5, 0), (2, 0, 0), (10, 0, 0), (2, 10, 0), (10, 10, 0)],
        &[
            "##.##   ##.##",
            "#...#   #...#",
            "#...#   #...#",
            "#...#####...#",
            "#...........#",
            ".............",
            "#...........#",
            "#...#####...#",
            "#...#   #...#",
            "#...#   #...#",
            "##.##   ##.##",
        ],
    )
}

/// Two stacked levels joined by a stair pair.
fn stairwell() -> PartTemplate {
    template(
        "stairwell",
        (7, 5, 2),
        4,
        &[(3, 0, 0), (1, 4, 0), (3, 0, 1), (1, 4, 1)],
        &[
            "###.###",
            "#.....#",
            "#.....#",
            "#..#.>#",
            "#.#####",
            "###.###",
            "#.....#",
            "#.....#",
            "#..#.<#",
            "#.#####",
        ],
    )
}

/// Octagonal hall with a stair down through its middle.
fn entrance_hall() -> PartTemplate {
    template(
        "entrance_hall",
        (7, 7, 1),
        1,
        &[(3, 0, 0), (0, 3, 0), (6, 3, 0), (3, 6, 0), (3, 3, 0)],
        &[
            "#######",
            "##...##",
            "#.....#",
            "#.....#",
            "#.....#",
            "##...##",
            "#######",
        ],
    )
}

/// Every built-in part, checked.
pub fn builtin_parts() -> Result<Vec<PartDescriptor>, PartError> {
    let mut parts = [xbone(), stairwell(), entrance_hall()]
        .into_iter()
        .map(PartDescriptor::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    parts.push(PartDescriptor::dynamic(
        "room",
        PartClass::Room,
        40,
        None,
        RoomStyle::Plain,
        true,
    ));
    parts.push(PartDescriptor::dynamic(
        "columned_room",
        PartClass::Room,
        10,
        None,
        RoomStyle::Columned,
        true,
    ));
    Ok(parts)
}

/// A catalog holding the built-in parts. A built-in part failing its
/// checks is fatal.
pub fn default_catalog() -> Result<PartCatalog, GenError> {
    Ok(PartCatalog::from_parts(builtin_parts()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Direction;

    #[test]
    fn test_builtins_load() {
        let parts = builtin_parts().unwrap();
        assert_eq!(parts.len(), 5);
        let catalog = default_catalog().unwrap();
        assert_eq!(catalog.total_weight(), 3 + 4 + 1 + 40 + 10);
    }

    #[test]
    fn test_entrance_candidates() {
        let catalog = default_catalog().unwrap();
        let entry = catalog.subset(|p| p.can_start());
        let names: Vec<_> = entry.parts().map(|p| p.name.clone()).collect();
        assert_eq!(names, vec!["entrance_hall", "room", "columned_room"]);
    }

    #[test]
    fn test_stairwell_faces() {
        let stairwell = PartDescriptor::try_from(stairwell()).unwrap();
        let faces: Vec<_> = stairwell.connections().iter().map(|c| c.facing).collect();
        assert_eq!(
            faces,
            vec![Direction::North, Direction::South, Direction::North, Direction::South]
        );
    }

    #[test]
    fn test_entrance_hall_links_up_through_centre() {
        let hall = PartDescriptor::try_from(entrance_hall()).unwrap();
        let up: Vec<_> = hall
            .connections()
            .iter()
            .filter(|c| c.facing == Direction::Up)
            .collect();
        assert_eq!(up.len(), 1);
        assert_eq!(up[0].at, Coords::new(3, 3, 0));
    }
}
