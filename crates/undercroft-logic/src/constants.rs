//! Dungeon constants — tile kinds and generation defaults.
//!
//! Tiles are plain ASCII bytes so a level prints directly in the text format.

pub mod tiles {
    pub const FLOOR: u8 = b'.';
    pub const WALL: u8 = b'#';
    pub const DOOR: u8 = b'+';
    pub const STAIRS_UP: u8 = b'<';
    pub const STAIRS_DOWN: u8 = b'>';
    pub const UNASSIGNED: u8 = b' ';

    /// Any tile a walker can stand on. Doors and stairs count as floor.
    pub fn is_floor(tile: u8) -> bool {
        matches!(tile, FLOOR | DOOR | STAIRS_UP | STAIRS_DOWN)
    }

    pub fn is_stairs(tile: u8) -> bool {
        matches!(tile, STAIRS_UP | STAIRS_DOWN)
    }

    /// Every tile kind a level or part template may contain.
    pub fn is_known(tile: u8) -> bool {
        matches!(
            tile,
            FLOOR | WALL | DOOR | STAIRS_UP | STAIRS_DOWN | UNASSIGNED
        )
    }
}

pub mod defaults {
    /// Placement attempts per starting anchor before the session gives up.
    pub const START_ATTEMPTS: u32 = 1000;
    pub const ROOM_BUDGET: u32 = 1000;
    pub const PIECE_BUDGET: u32 = 1000;
    pub const SEED: u64 = 42;

    /// Procedural rooms roll each side in `ROOM_MIN_SIDE..=ROOM_MAX_SIDE`.
    pub const ROOM_MIN_SIDE: i32 = 5;
    pub const ROOM_MAX_SIDE: i32 = 13;

    /// Procedural rooms get one connection attempt per this many perimeter tiles.
    pub const PERIMETER_TILES_PER_CONNECTION: i32 = 3;
}
