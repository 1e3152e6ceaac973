//! Piece-graph dungeon generation for Undercroft.
//!
//! Dungeons are grown from one or more entrances by placing rooms,
//! corridors and stairwells ("pieces") onto a 3D tile grid. Everything here
//! is plain data in, plain data out: no I/O beyond the snapshot readers and
//! writers, and all randomness comes from a caller-supplied `Rng`.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`builder`] | Stamping a piece onto the grid and resolving its connections |
//! | [`builtin`] | Built-in parts: xbone hall, stairwell, entrance hall, procedural rooms |
//! | [`catalog`] | Part catalog with weighted, instance-capped selection |
//! | [`config`] | Generation parameters (extents, starts, budgets, seed) |
//! | [`constants`] | Tile kinds and generation defaults |
//! | [`error`] | Fatal generation errors |
//! | [`geometry`] | Coordinates and directions |
//! | [`grid`] | Level tile grid and its text format |
//! | [`occupancy`] | Tile → owning piece map |
//! | [`part`] | Part descriptors and load-time checks |
//! | [`persistence`] | Versioned bincode snapshots of finished dungeons |
//! | [`piece`] | Placed pieces and the layout that owns them |
//! | [`placement`] | Collision-free fitting of a part at an anchor |
//! | [`resolver`] | Growing, shortcutting or sealing one connection |
//! | [`rooms`] | Procedural room styles |
//! | [`scheduler`] | Wave-based build loop and drain pass |
//! | [`session`] | Mutable state of one generation session |
//! | [`template`] | Static part templates from JSON |
//! | [`transform`] | Canonical ↔ rotated part coordinates |
//! | [`validation`] | Bounds, overlap, occupancy and connectivity checks |

pub mod builder;
pub mod builtin;
pub mod catalog;
pub mod config;
pub mod constants;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod occupancy;
pub mod part;
pub mod persistence;
pub mod piece;
pub mod placement;
pub mod resolver;
pub mod rooms;
pub mod scheduler;
pub mod session;
pub mod template;
pub mod transform;
pub mod validation;
