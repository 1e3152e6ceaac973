//! Piece building — stamping a projected piece onto the level grid.

use rand::Rng;

use crate::constants::tiles;
use crate::geometry::Coords;
use crate::grid::LevelGrid;
use crate::occupancy::PieceId;
use crate::part::{PartShape, StaticTemplate};
use crate::piece::Piece;
use crate::resolver::{resolve_connection, Resolution};
use crate::session::{Growth, Session};
use crate::transform::to_rotated;

/// Render the tile linking a piece to its parent.
///
/// An anchor inside the footprint is the top of a vertical link and becomes
/// stairs up; one on the outer rectangle is a plain opening.
pub fn render_anchor(grid: &mut LevelGrid, piece: &Piece) {
    let tile = if piece.is_interior(piece.anchor) {
        tiles::STAIRS_UP
    } else {
        tiles::FLOOR
    };
    grid.set(piece.anchor, tile);
}

/// Stamp piece `id` and resolve every one of its connections, then flag it
/// built.
///
/// With `growth` the connections may place and queue new pieces; without it
/// they are only closed or joined.
pub fn build_piece<R: Rng>(session: &mut Session<R>, id: PieceId, growth: Option<&mut Growth<'_>>) {
    let Some(piece) = session.layout.get(id).cloned() else {
        log::warn!("build requested for unknown piece #{}", id.0);
        return;
    };

    match &piece.part.shape {
        PartShape::Static(template) => stamp_static(session, &piece, id, template, growth),
        PartShape::Dynamic(style) => style.stamp(session, &piece, id, growth),
    }

    session.layout.mark_built(id);
}

fn stamp_static<R: Rng>(
    session: &mut Session<R>,
    piece: &Piece,
    id: PieceId,
    template: &StaticTemplate,
    mut growth: Option<&mut Growth<'_>>,
) {
    let part = &piece.part;
    for z in 0..part.depth {
        for y in 0..part.height {
            for x in 0..part.width {
                let local = Coords::new(x, y, z);
                let at = piece.pos + to_rotated(local, part.width, part.height, piece.rotation);
                session.grid.set(at, template.tile(local));
            }
        }
    }

    render_anchor(&mut session.grid, piece);

    for conn in template.connections() {
        let pos = piece.pos + to_rotated(conn.at, part.width, part.height, piece.rotation);
        if pos == piece.anchor {
            session.tally.record(Resolution::Joined);
            continue;
        }
        let dir = conn.facing.rotated_by(piece.rotation);
        resolve_connection(session, pos, dir, id, growth.as_deref_mut());
    }
}
