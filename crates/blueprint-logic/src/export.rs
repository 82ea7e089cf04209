//! Output contract handed to renderers and the conditioning-image stage.
//!
//! The grid encoding is fixed: `0` empty, `room_id + 1` room, `-1` doorway.
//! Downstream consumers tell walls, rooms and doors apart by sign and
//! magnitude alone, so nothing here may change it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::constants::RoomType;
use crate::error::Result;
use crate::grid::PlacementGrid;
use crate::placement::{Placement, Rect};
use crate::rooms::RoomSpec;

/// Placement and display metadata for one room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomPosition {
    pub id: usize,
    pub name: String,
    #[serde(rename = "type")]
    pub room_type: RoomType,
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
    pub color: String,
}

impl RoomPosition {
    pub fn rect(&self) -> Rect {
        Rect {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutResult {
    /// `[row][col]` cells with doorways applied.
    pub grid: Vec<Vec<i32>>,
    /// Keyed by room id.
    pub room_positions: BTreeMap<usize, RoomPosition>,
    /// `(width, height)` in cells after compaction.
    pub grid_size: (usize, usize),
    /// Square feet per cell.
    pub cell_size: f64,
    /// Room specs in id order.
    pub rooms: Vec<RoomSpec>,
}

impl LayoutResult {
    /// Assemble the contract from a finished placement and its door-marked grid.
    pub fn assemble(placement: &Placement, grid: &PlacementGrid, cell_size: f64) -> Self {
        let room_positions = placement
            .rooms
            .iter()
            .map(|r| {
                let position = RoomPosition {
                    id: r.spec.id,
                    name: r.spec.name.clone(),
                    room_type: r.spec.room_type.clone(),
                    x: r.x,
                    y: r.y,
                    width: r.spec.width,
                    height: r.spec.height,
                    color: r.spec.room_type.color().to_string(),
                };
                (r.spec.id, position)
            })
            .collect();

        Self {
            grid: grid.to_rows(),
            room_positions,
            grid_size: placement.grid_size,
            cell_size,
            rooms: placement.rooms.iter().map(|r| r.spec.clone()).collect(),
        }
    }

    pub fn width(&self) -> usize {
        self.grid_size.0
    }

    pub fn height(&self) -> usize {
        self.grid_size.1
    }

    /// The grid as a [`PlacementGrid`]. None if the rows are ragged.
    pub fn to_grid(&self) -> Option<PlacementGrid> {
        PlacementGrid::from_rows(&self.grid)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placement::PlacedRoom;

    fn sample() -> LayoutResult {
        let spec = |id: usize, t: &str, w: usize, h: usize| RoomSpec {
            id,
            room_type: RoomType::from(t),
            name: t.to_string(),
            width: w,
            height: h,
            grid_cells: w * h,
            target_cells: w * h,
            approx_sqft: (w * h * 20) as f64,
        };
        let placement = Placement {
            rooms: vec![
                PlacedRoom {
                    spec: spec(0, "living room", 3, 2),
                    x: 0,
                    y: 0,
                },
                PlacedRoom {
                    spec: spec(1, "wine cellar", 2, 2),
                    x: 3,
                    y: 0,
                },
            ],
            order: vec![0, 1],
            grid_size: (5, 2),
        };
        let mut grid = placement.to_grid();
        grid.set(3, 1, -1);
        LayoutResult::assemble(&placement, &grid, 20.0)
    }

    #[test]
    fn test_assemble_fills_positions_and_colors() {
        let result = sample();
        assert_eq!(result.room_positions.len(), 2);
        assert_eq!(result.room_positions[&0].color, "#D7FFD7");
        assert_eq!(result.room_positions[&1].color, "#FFFFFF");
        assert_eq!(result.room_positions[&1].x, 3);
        assert_eq!(result.grid, vec![vec![1, 1, 1, 2, 2], vec![1, 1, 1, -1, 2]]);
        assert_eq!(result.rooms.len(), 2);
    }

    #[test]
    fn test_json_contract_shape() {
        let json = sample().to_json_pretty().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["grid_size"], serde_json::json!([5, 2]));
        assert_eq!(value["cell_size"], serde_json::json!(20.0));
        assert_eq!(value["room_positions"]["0"]["type"], "living room");
        assert_eq!(value["room_positions"]["1"]["name"], "wine cellar");
        assert_eq!(value["grid"][1][3], -1);
        assert_eq!(value["rooms"][0]["type"], "living room");
    }

    #[test]
    fn test_json_reads_back() {
        let result = sample();
        let back = LayoutResult::from_json(&result.to_json_pretty().unwrap()).unwrap();
        assert_eq!(back, result);
    }
}
