//! Wave-based build scheduling.
//!
//! Starting pieces are placed at every entrance and queued as the first
//! wave. Each wave builds its pieces, which queue their children into the
//! next wave. Once a budget runs out or no wave remains, whatever is still
//! queued is built with growth disabled so every open connection gets
//! sealed.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::builder::build_piece;
use crate::catalog::PartCatalog;
use crate::config::GenConfig;
use crate::error::GenError;
use crate::geometry::{Coords, Direction};
use crate::grid::LevelGrid;
use crate::occupancy::PieceId;
use crate::piece::{Layout, Piece};
use crate::placement::try_place;
use crate::resolver::ConnectionTally;
use crate::session::{Budget, Growth, Session};

/// A finished dungeon and how it was grown.
#[derive(Debug, Clone)]
pub struct Dungeon {
    pub grid: LevelGrid,
    pub layout: Layout,
    pub tally: ConnectionTally,
    /// Growth waves run before the drain pass.
    pub waves: u32,
    pub starts: Vec<Coords>,
}

impl Dungeon {
    pub fn pieces(&self) -> &[Piece] {
        self.layout.pieces()
    }

    pub fn room_count(&self) -> u32 {
        self.layout.room_count()
    }
}

/// Generate a dungeon on a blank grid sized by `config`, seeded from
/// `config.seed`.
pub fn generate(config: &GenConfig, catalog: &mut PartCatalog) -> Result<Dungeon, GenError> {
    config.validate()?;
    let grid = LevelGrid::new(config.width, config.height, config.depth);
    build_dungeon(grid, config, catalog, StdRng::seed_from_u64(config.seed))
}

/// Grow a dungeon into `grid` using the random stream `rng`.
///
/// `config` supplies starts, budgets and the retry bound; the grid's own
/// extents win over the ones in `config`. Instance counts in `catalog` are
/// reset first.
pub fn build_dungeon<R: Rng>(
    grid: LevelGrid,
    config: &GenConfig,
    catalog: &mut PartCatalog,
    rng: R,
) -> Result<Dungeon, GenError> {
    config.validate()?;
    if let Some(s) = config.starts.iter().find(|s| !grid.in_bounds(**s)) {
        return Err(GenError::InvalidConfig(format!("start {} is outside the grid", s)));
    }

    catalog.reset_counts();
    let mut session = Session::new(grid, rng);
    let budget = Budget {
        max_pieces: config.piece_budget,
        max_rooms: config.room_budget,
    };

    let mut wave = place_starts(&mut session, config, catalog)?;

    let mut waves = 0;
    while budget.allows_piece(&session.layout)
        && budget.allows_room(&session.layout)
        && !wave.is_empty()
    {
        let mut next = Vec::new();
        let mut growth = Growth {
            catalog: &mut *catalog,
            queue: &mut next,
            budget,
        };
        for &id in &wave {
            build_piece(&mut session, id, Some(&mut growth));
        }
        log::debug!("wave {} built {} pieces, queued {}", waves, wave.len(), next.len());
        wave = next;
        waves += 1;
    }

    for &id in &wave {
        build_piece(&mut session, id, None);
    }

    let Session {
        grid, layout, tally, ..
    } = session;
    log::info!(
        "dungeon built: {} pieces ({} rooms) in {} waves, {} drained; connections: {} grown, {} shortcuts, {} closed, {} joined",
        layout.len(),
        layout.room_count(),
        waves,
        wave.len(),
        tally.grown,
        tally.shortcuts,
        tally.closed,
        tally.joined
    );

    Ok(Dungeon {
        grid,
        layout,
        tally,
        waves,
        starts: config.starts.clone(),
    })
}

/// Place one entrance piece per start, drawing only from parts that can
/// start a dungeon. Instance caps are shared with the full catalog.
fn place_starts<R: Rng>(
    session: &mut Session<R>,
    config: &GenConfig,
    catalog: &mut PartCatalog,
) -> Result<Vec<PieceId>, GenError> {
    let mut entry = catalog.subset(|p| p.can_start());
    if entry.total_weight() == 0 {
        return Err(GenError::NoEntranceParts);
    }

    let mut wave = Vec::with_capacity(config.starts.len());
    for &start in &config.starts {
        let placed = (0..config.start_attempts).find_map(|_| {
            try_place(&mut entry, &session.layout, &mut session.rng, start, Direction::Up)
        });
        let Some(piece) = placed else {
            log::warn!(
                "no starting piece fits at {} after {} attempts",
                start,
                config.start_attempts
            );
            return Err(GenError::StartPlacement {
                start,
                attempts: config.start_attempts,
            });
        };
        wave.push(session.layout.project(piece));
    }

    catalog.merge_counts(&entry);
    Ok(wave)
}
