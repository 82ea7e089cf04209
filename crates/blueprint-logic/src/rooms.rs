//! Room requirements → concrete placeable room specs.
//!
//! Each requirement (`type`, `count`, `approximate_sqft`) is turned into
//! `count` rectangles sized in grid cells. Sizes start from the per-type
//! default footprint, are scaled to the requested area, then grown one cell
//! at a time until the rectangle covers at least the requested cell count.

use serde::{Deserialize, Serialize};

use crate::constants::RoomType;
use crate::error::{LayoutError, Result};

/// One line of the requirements document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomRequirement {
    #[serde(rename = "type")]
    pub room_type: RoomType,
    pub count: u32,
    pub approximate_sqft: f64,
}

/// A requested adjacency between two room types.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdjacencyRequest {
    pub room1: RoomType,
    pub room2: RoomType,
}

/// Input contract produced by the requirements collaborator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Requirements {
    pub rooms: Vec<RoomRequirement>,
    #[serde(default)]
    pub adjacency: Vec<AdjacencyRequest>,
}

impl Requirements {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// A concrete room, immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomSpec {
    /// Dense, zero-based across the whole request.
    pub id: usize,
    #[serde(rename = "type")]
    pub room_type: RoomType,
    pub name: String,
    pub width: usize,
    pub height: usize,
    /// Footprint actually occupied (`width * height`).
    pub grid_cells: usize,
    /// Cells requested (`ceil(approx_sqft / cell_size)`).
    pub target_cells: usize,
    pub approx_sqft: f64,
}

/// Build room specs for every requirement, in order.
///
/// Fails fast on a zero count, a non-positive area, or an empty request;
/// nothing is clamped.
pub fn build_room_specs(requirements: &[RoomRequirement], cell_size: f64) -> Result<Vec<RoomSpec>> {
    if requirements.is_empty() {
        return Err(LayoutError::InvalidRoomSpec {
            room_type: String::new(),
            reason: "no rooms requested".to_string(),
        });
    }

    let has_master = requirements
        .iter()
        .any(|r| r.room_type == RoomType::MasterBedroom);

    let mut specs = Vec::new();
    for req in requirements {
        validate_requirement(req)?;

        let target_cells = (req.approximate_sqft / cell_size).ceil() as usize;
        let (width, height) = room_dimensions(&req.room_type, target_cells);

        for i in 0..req.count {
            let name = room_name(&req.room_type, i, req.count, has_master);
            specs.push(RoomSpec {
                id: specs.len(),
                room_type: req.room_type.clone(),
                name,
                width,
                height,
                grid_cells: width * height,
                target_cells,
                approx_sqft: req.approximate_sqft,
            });
        }
    }

    log::debug!(
        "Built {} room specs from {} requirements",
        specs.len(),
        requirements.len()
    );
    Ok(specs)
}

fn validate_requirement(req: &RoomRequirement) -> Result<()> {
    if req.count == 0 {
        return Err(LayoutError::InvalidRoomSpec {
            room_type: req.room_type.to_string(),
            reason: "count must be positive".to_string(),
        });
    }
    if !(req.approximate_sqft.is_finite() && req.approximate_sqft > 0.0) {
        return Err(LayoutError::InvalidRoomSpec {
            room_type: req.room_type.to_string(),
            reason: format!(
                "approximate_sqft must be positive, got {}",
                req.approximate_sqft
            ),
        });
    }
    Ok(())
}

/// Scale the type's default footprint to `target_cells`.
///
/// Scaled sides round half to even and are at least 2 cells. The smaller side
/// (width on ties) then grows until the area covers `target_cells`.
pub fn room_dimensions(room_type: &RoomType, target_cells: usize) -> (usize, usize) {
    let (default_w, default_h) = room_type.default_dimensions();
    let scale = (target_cells as f64 / (default_w * default_h) as f64).sqrt();

    let mut width = ((default_w as f64 * scale).round_ties_even() as usize).max(2);
    let mut height = ((default_h as f64 * scale).round_ties_even() as usize).max(2);

    while width * height < target_cells {
        if width <= height {
            width += 1;
        } else {
            height += 1;
        }
    }
    (width, height)
}

fn room_name(room_type: &RoomType, index: u32, count: u32, has_master: bool) -> String {
    if count == 1 || (*room_type == RoomType::Bedroom && index == 0 && has_master) {
        room_type.to_string()
    } else {
        format!("{} {}", room_type, index + 1)
    }
}
