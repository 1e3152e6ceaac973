//! Fitting a part at an anchor without collisions.
//!
//! Placement only proposes a [`Piece`]; projecting it onto the layout is the
//! caller's job. Every failure is a plain `None`.

use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::catalog::PartCatalog;
use crate::geometry::{rotated_dims, Coords, Direction};
use crate::occupancy::OccupancyGrid;
use crate::part::{ConnectionPoint, PartDescriptor, PartShape};
use crate::piece::{Layout, Piece};
use crate::transform::to_rotated;

/// Roll a part from `catalog` and try to fit it so one of its connection
/// points lands on `anchor`, growing in direction `dir`.
pub fn try_place(
    catalog: &mut PartCatalog,
    layout: &Layout,
    rng: &mut impl Rng,
    anchor: Coords,
    dir: Direction,
) -> Option<Piece> {
    let part = catalog.select(rng)?;
    match &part.shape {
        PartShape::Static(_) => place_static(&part, layout.occupancy(), rng, anchor, dir),
        PartShape::Dynamic(style) => {
            let style = *style;
            style.propose(&part, layout.occupancy(), rng, anchor, dir)
        }
    }
}

/// Static parts attach by a southern-edge point when grown sideways, or by
/// an up/down point when grown vertically. Vertical growth picks a random
/// cardinal footprint.
fn place_static(
    part: &Arc<PartDescriptor>,
    occupancy: &OccupancyGrid,
    rng: &mut impl Rng,
    anchor: Coords,
    dir: Direction,
) -> Option<Piece> {
    let (candidates, rotation): (Vec<&ConnectionPoint>, Direction) = if dir.is_vertical() {
        let vertical: Vec<_> = part
            .connections()
            .iter()
            .filter(|c| c.facing.is_vertical())
            .collect();
        (vertical, Direction::random_cardinal(rng))
    } else {
        let southern: Vec<_> = part
            .connections()
            .iter()
            .filter(|c| c.at.y == part.height - 1)
            .collect();
        (southern, dir)
    };
    let point = candidates.choose(rng)?;
    fit(part, occupancy, anchor, dir, rotation, point.at, part.width, part.height, part.depth)
}

/// Position a `w`×`h`×`d` box rotated to `rotation` so its local point
/// `link` sits on `anchor`, and check the box is in bounds and unclaimed.
#[allow(clippy::too_many_arguments)]
pub(crate) fn fit(
    part: &Arc<PartDescriptor>,
    occupancy: &OccupancyGrid,
    anchor: Coords,
    dir: Direction,
    rotation: Direction,
    link: Coords,
    w: i32,
    h: i32,
    d: i32,
) -> Option<Piece> {
    let (rw, rh) = rotated_dims(w, h, rotation);
    let pos = anchor - to_rotated(link, w, h, rotation);
    let far = pos + Coords::new(rw - 1, rh - 1, d - 1);

    if !occupancy.is_region_free(pos, far) {
        return None;
    }

    Some(Piece {
        pos,
        width: rw,
        height: rh,
        depth: d,
        direction: dir,
        rotation,
        part: Arc::clone(part),
        anchor,
        parent: None,
        built: false,
    })
}
