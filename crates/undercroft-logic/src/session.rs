//! Mutable state of one generation session.

use crate::catalog::PartCatalog;
use crate::grid::LevelGrid;
use crate::occupancy::PieceId;
use crate::piece::Layout;
use crate::resolver::ConnectionTally;

/// Everything the builder mutates: the grid, the layout, the random stream,
/// and the tally of how connections were resolved.
pub struct Session<R> {
    pub grid: LevelGrid,
    pub layout: Layout,
    pub rng: R,
    pub tally: ConnectionTally,
}

impl<R> Session<R> {
    pub fn new(grid: LevelGrid, rng: R) -> Self {
        let layout = Layout::new(grid.width(), grid.height(), grid.depth());
        Self {
            grid,
            layout,
            rng,
            tally: ConnectionTally::default(),
        }
    }
}

/// Hard caps on what the session may place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Budget {
    pub max_pieces: u32,
    pub max_rooms: u32,
}

impl Budget {
    pub fn allows_piece(&self, layout: &Layout) -> bool {
        (layout.len() as u32) < self.max_pieces
    }

    pub fn allows_room(&self, layout: &Layout) -> bool {
        layout.room_count() < self.max_rooms
    }
}

/// Present while the scheduler still grows the dungeon. Absent during the
/// drain pass, when every open connection is closed instead.
pub struct Growth<'a> {
    pub catalog: &'a mut PartCatalog,
    /// Next build wave; newly grown pieces are queued here.
    pub queue: &'a mut Vec<PieceId>,
    pub budget: Budget,
}
