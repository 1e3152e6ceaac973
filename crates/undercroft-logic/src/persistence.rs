//! Save/load of generated dungeons.
//!
//! A snapshot holds the finished grid and a summary of every piece. Parts
//! are referenced by name, so a snapshot does not depend on the catalog it
//! was generated from.

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use crate::geometry::{Coords, Direction};
use crate::grid::LevelGrid;
use crate::occupancy::PieceId;
use crate::part::PartClass;
use crate::resolver::ConnectionTally;
use crate::scheduler::Dungeon;

/// Bumped whenever the snapshot layout changes.
pub const SAVE_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieceRecord {
    pub part: String,
    pub class: PartClass,
    pub pos: Coords,
    pub width: i32,
    pub height: i32,
    pub depth: i32,
    pub direction: Direction,
    pub rotation: Direction,
    pub anchor: Coords,
    pub parent: Option<PieceId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DungeonSnapshot {
    pub version: u32,
    pub grid: LevelGrid,
    pub pieces: Vec<PieceRecord>,
    pub starts: Vec<Coords>,
    pub tally: ConnectionTally,
}

impl From<&Dungeon> for DungeonSnapshot {
    fn from(d: &Dungeon) -> Self {
        Self {
            version: SAVE_VERSION,
            grid: d.grid.clone(),
            pieces: d
                .pieces()
                .iter()
                .map(|p| PieceRecord {
                    part: p.part.name.clone(),
                    class: p.class(),
                    pos: p.pos,
                    width: p.width,
                    height: p.height,
                    depth: p.depth,
                    direction: p.direction,
                    rotation: p.rotation,
                    anchor: p.anchor,
                    parent: p.parent,
                })
                .collect(),
            starts: d.starts.clone(),
            tally: d.tally,
        }
    }
}

impl DungeonSnapshot {
    pub fn room_count(&self) -> usize {
        self.pieces.iter().filter(|p| p.class == PartClass::Room).count()
    }
}

/// Save a dungeon to a writer
pub fn save_dungeon<W: Write>(dungeon: &Dungeon, writer: W) -> Result<(), SaveError> {
    bincode::serialize_into(writer, &DungeonSnapshot::from(dungeon))?;
    Ok(())
}

/// Load a dungeon snapshot from a reader
pub fn load_dungeon<R: Read>(reader: R) -> Result<DungeonSnapshot, SaveError> {
    let snapshot: DungeonSnapshot = bincode::deserialize_from(reader)?;

    if snapshot.version != SAVE_VERSION {
        return Err(SaveError::VersionMismatch {
            expected: SAVE_VERSION,
            found: snapshot.version,
        });
    }

    Ok(snapshot)
}

#[derive(Debug)]
pub enum SaveError {
    Io(std::io::Error),
    Bincode(Box<bincode::ErrorKind>),
    VersionMismatch { expected: u32, found: u32 },
}

impl From<std::io::Error> for SaveError {
    fn from(e: std::io::Error) -> Self {
        SaveError::Io(e)
    }
}

impl From<Box<bincode::ErrorKind>> for SaveError {
    fn from(e: Box<bincode::ErrorKind>) -> Self {
        SaveError::Bincode(e)
    }
}

impl std::fmt::Display for SaveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SaveError::Io(e) => write!(f, "IO error: {}", e),
            SaveError::Bincode(e) => write!(f, "Serialization error: {}", e),
            SaveError::VersionMismatch { expected, found } => {
                write!(
                    f,
                    "Save version mismatch: expected {}, found {}",
                    expected, found
                )
            }
        }
    }
}

impl std::error::Error for SaveError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::default_catalog;
    use crate::config::GenConfig;
    use crate::scheduler::generate;

    fn dungeon() -> Dungeon {
        let config = GenConfig::new(50, 50, 1, Coords::new(25, 25, 0)).with_budgets(12, 6);
        let mut catalog = default_catalog().unwrap();
        generate(&config, &mut catalog).unwrap()
    }

    #[test]
    fn test_save_and_load() {
        let d = dungeon();
        let mut buf = Vec::new();
        save_dungeon(&d, &mut buf).unwrap();

        let loaded = load_dungeon(buf.as_slice()).unwrap();
        assert_eq!(loaded.grid, d.grid);
        assert_eq!(loaded.pieces.len(), d.pieces().len());
        assert_eq!(loaded.room_count(), d.room_count() as usize);
        assert_eq!(loaded.tally, d.tally);
        assert_eq!(loaded.pieces[0].parent, None);
    }

    #[test]
    fn test_version_mismatch() {
        let mut snapshot = DungeonSnapshot::from(&dungeon());
        snapshot.version = SAVE_VERSION + 1;
        let buf = bincode::serialize(&snapshot).unwrap();
        let err = load_dungeon(buf.as_slice()).unwrap_err();
        assert!(matches!(err, SaveError::VersionMismatch { found, .. } if found == SAVE_VERSION + 1));
    }

    #[test]
    fn test_truncated_input() {
        let mut buf = Vec::new();
        save_dungeon(&dungeon(), &mut buf).unwrap();
        buf.truncate(buf.len() / 2);
        assert!(matches!(load_dungeon(buf.as_slice()), Err(SaveError::Bincode(_))));
    }
}
