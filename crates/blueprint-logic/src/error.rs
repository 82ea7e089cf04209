//! Errors surfaced by the layout pipeline.

use thiserror::Error;

/// Fatal layout errors. Per-edge doorway problems are not errors; they are
/// recorded in the door report and the edge is skipped.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("invalid room spec for '{room_type}': {reason}")]
    InvalidRoomSpec { room_type: String, reason: String },

    #[error("adjacency graph still has {components} components after repair")]
    DisconnectedGraphUnrepairable { components: usize },

    #[error("no free {width}x{height} slot for room #{room_id} ('{name}') on a {grid_width}x{grid_height} grid")]
    PlacementExhausted {
        room_id: usize,
        name: String,
        width: usize,
        height: usize,
        grid_width: usize,
        grid_height: usize,
    },

    #[error("invalid layout config: {0}")]
    InvalidConfig(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LayoutError>;
