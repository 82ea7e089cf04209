//! Floor plan layout synthesis for Blueprint.
//!
//! Turns a requirements document (room types, counts, approximate areas and
//! requested adjacencies) into a 2D occupancy grid: rooms are sized in grid
//! cells, linked by a weighted adjacency graph, placed greedily by score, and
//! joined by doorways on their shared walls. Everything here is pure: plain
//! data in, plain data out, with the only randomness coming from a seeded RNG.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | Layout tunables (cell size, seed, grid sizing, door caps) |
//! | [`constants`] | Room types, adjacency weight bands, grid cell encoding |
//! | [`doors`] | Doorway insertion on shared walls with per-room caps |
//! | [`error`] | `LayoutError` and the crate `Result` alias |
//! | [`export`] | `LayoutResult` output contract and its JSON form |
//! | [`geometry`] | Layout validation (bounds, overlaps, grid footprints, doors) |
//! | [`graph`] | Weighted adjacency graph, forced rules, connectivity repair |
//! | [`grid`] | Dense row-major cell grid |
//! | [`pipeline`] | `generate_layout` end-to-end entry point |
//! | [`placement`] | Scored greedy room placement and compaction |
//! | [`render`] | Annotated SVG and black/white wall mask |
//! | [`rooms`] | Requirements input and room sizing |

pub mod config;
pub mod constants;
pub mod doors;
pub mod error;
pub mod export;
pub mod geometry;
pub mod graph;
pub mod grid;
pub mod pipeline;
pub mod placement;
pub mod render;
pub mod rooms;

pub use config::LayoutConfig;
pub use error::{LayoutError, Result};
pub use export::LayoutResult;
pub use pipeline::{generate_layout, GeneratedLayout};
pub use rooms::Requirements;
