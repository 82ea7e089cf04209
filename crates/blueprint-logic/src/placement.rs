//! Greedy best-first room placement.
//!
//! Rooms are placed one per round in a fixed priority order: the most
//! important room seeds the center of a working grid, then every round scans
//! all free origins for every eligible room, scores each with
//! [`score_placement`], and commits the single best one. A fallback keeps the
//! loop moving when no room is eligible, so the number of rounds equals the
//! number of rooms. Finally the layout is translated so its bounding box
//! starts at the origin.

use rand::Rng;
use serde::Serialize;

use crate::config::LayoutConfig;
use crate::constants::{cells, weights, RoomType};
use crate::error::{LayoutError, Result};
use crate::graph::AdjacencyGraph;
use crate::grid::PlacementGrid;
use crate::rooms::RoomSpec;

/// Wall-adjacent bonus per unit of edge weight.
const ADJACENT_BONUS: f64 = 15.0;
/// Distance penalty per unit of edge weight per cell of center distance.
const DISTANCE_PENALTY: f64 = 0.5;
const OVERLAP_PENALTY: f64 = 1000.0;
const HALLWAY_CENTRALITY: f64 = 50.0;
const LIVING_ROOM_BONUS: f64 = 30.0;
const BEDROOM_LIVING_BONUS: f64 = 100.0;
const BOUNDARY_PENALTY: f64 = 5.0;
/// Widest random start offset for the origin scan.
const MAX_SCAN_OFFSET: usize = 3;

/// Axis-aligned rectangle in grid cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Rect {
    pub fn right(&self) -> usize {
        self.x + self.width
    }

    pub fn bottom(&self) -> usize {
        self.y + self.height
    }

    pub fn center(&self) -> (f64, f64) {
        (
            self.x as f64 + self.width as f64 / 2.0,
            self.y as f64 + self.height as f64 / 2.0,
        )
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// True if the rectangles share a wall segment of positive length.
    pub fn is_wall_adjacent(&self, other: &Rect) -> bool {
        let rows_overlap = self.y < other.bottom() && other.y < self.bottom();
        let cols_overlap = self.x < other.right() && other.x < self.right();
        (rows_overlap && (self.right() == other.x || other.right() == self.x))
            || (cols_overlap && (self.bottom() == other.y || other.bottom() == self.y))
    }

    pub fn center_distance(&self, other: &Rect) -> f64 {
        let (ax, ay) = self.center();
        let (bx, by) = other.center();
        ((ax - bx).powi(2) + (ay - by).powi(2)).sqrt()
    }
}

/// A room with its grid origin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedRoom {
    pub spec: RoomSpec,
    pub x: usize,
    pub y: usize,
}

impl PlacedRoom {
    pub fn rect(&self) -> Rect {
        Rect {
            x: self.x,
            y: self.y,
            width: self.spec.width,
            height: self.spec.height,
        }
    }
}

/// Result of placement: rooms sorted by id, in compacted coordinates.
#[derive(Debug, Clone)]
pub struct Placement {
    pub rooms: Vec<PlacedRoom>,
    /// Room ids in the order they were committed.
    pub order: Vec<usize>,
    /// `(width, height)` of the bounding box after compaction.
    pub grid_size: (usize, usize),
}

impl Placement {
    /// Grid of the compacted layout with every room footprint filled.
    pub fn to_grid(&self) -> PlacementGrid {
        let (width, height) = self.grid_size;
        let mut grid = PlacementGrid::new(width, height);
        for room in &self.rooms {
            grid.fill(
                room.x,
                room.y,
                room.spec.width,
                room.spec.height,
                cells::room_value(room.spec.id),
            );
        }
        grid
    }
}

/// Working grid size for a set of rooms.
///
/// Aims for a 4:3 aspect, multiplies each side by the buffer, floors each side
/// at `min_grid_dim`, and never goes below the largest room's own sides.
pub fn working_grid_size(rooms: &[RoomSpec], config: &LayoutConfig) -> (usize, usize) {
    let total: usize = rooms.iter().map(|r| r.grid_cells).sum();

    let base_w = ((total as f64 * 4.0 / 3.0).sqrt() as usize).max(1);
    let base_h = total / base_w;

    let mut width = ((base_w as f64 * config.grid_buffer) as usize).max(config.min_grid_dim);
    let mut height = ((base_h as f64 * config.grid_buffer) as usize).max(config.min_grid_dim);

    for room in rooms {
        width = width.max(room.width);
        height = height.max(room.height);
    }
    (width, height)
}

/// Placement order: descending `importance + grid_cells`, stable on ties.
pub fn placement_order(rooms: &[RoomSpec]) -> Vec<&RoomSpec> {
    let mut sorted: Vec<&RoomSpec> = rooms.iter().collect();
    sorted.sort_by_key(|r| std::cmp::Reverse(priority(r)));
    sorted
}

fn priority(room: &RoomSpec) -> usize {
    room.room_type.importance() as usize + room.grid_cells
}

/// Place every room on a working grid sized by [`working_grid_size`].
pub fn place_rooms<R: Rng + ?Sized>(
    rooms: &[RoomSpec],
    graph: &AdjacencyGraph,
    config: &LayoutConfig,
    rng: &mut R,
) -> Result<Placement> {
    let (width, height) = working_grid_size(rooms, config);
    place_rooms_on(rooms, graph, width, height, config, rng)
}

/// Place every room on a `width × height` working grid.
///
/// Fails with [`LayoutError::PlacementExhausted`] if some room cannot fit
/// anywhere; rooms are never dropped.
pub fn place_rooms_on<R: Rng + ?Sized>(
    rooms: &[RoomSpec],
    graph: &AdjacencyGraph,
    width: usize,
    height: usize,
    config: &LayoutConfig,
    rng: &mut R,
) -> Result<Placement> {
    let mut remaining = placement_order(rooms);
    if remaining.is_empty() {
        return Ok(Placement {
            rooms: Vec::new(),
            order: Vec::new(),
            grid_size: (0, 0),
        });
    }

    let mut grid = PlacementGrid::new(width, height);
    let mut placed: Vec<PlacedRoom> = Vec::with_capacity(rooms.len());
    let mut is_placed = vec![false; graph.node_count().max(rooms.len())];

    // Seed: the highest-priority room, centered
    let first = remaining.remove(0);
    if first.width > width || first.height > height {
        return Err(exhausted(first, width, height));
    }
    let seed_x = width / 2 - first.width / 2;
    let seed_y = height / 2 - first.height / 2;
    commit(&mut grid, &mut placed, &mut is_placed, first, seed_x, seed_y);

    while !remaining.is_empty() {
        let mut best: Option<(f64, usize, usize, usize)> = None;

        for (i, room) in remaining.iter().enumerate() {
            let has_placed_neighbor = graph
                .neighbors(room.id)
                .any(|(n, _)| is_placed.get(n).copied().unwrap_or(false));
            if !in_candidate_pool(has_placed_neighbor, placed.len(), rooms.len()) {
                continue;
            }
            if room.width > width || room.height > height {
                continue;
            }

            let origins_y = height - room.height + 1;
            let origins_x = width - room.width + 1;
            let start_y = rng.gen_range(0..=MAX_SCAN_OFFSET.min(height - room.height));
            let start_x = rng.gen_range(0..=MAX_SCAN_OFFSET.min(width - room.width));

            for y_offset in 0..origins_y {
                let y = (start_y + y_offset) % origins_y;
                for x_offset in 0..origins_x {
                    let x = (start_x + x_offset) % origins_x;
                    if !grid.is_free(x, y, room.width, room.height) {
                        continue;
                    }
                    let mut score = score_placement(room, x, y, &placed, graph, width, height);
                    if config.jitter > 0.0 {
                        score += rng.gen_range(-config.jitter..=config.jitter);
                    }
                    if best.map_or(true, |(s, ..)| score > s) {
                        best = Some((score, i, x, y));
                    }
                }
            }
        }

        match best {
            Some((score, i, x, y)) => {
                let room = remaining.remove(i);
                log::debug!(
                    "Placed room #{} '{}' at ({}, {}) score {:.1}",
                    room.id,
                    room.name,
                    x,
                    y,
                    score
                );
                commit(&mut grid, &mut placed, &mut is_placed, room, x, y);
            }
            None => {
                let room = remaining.remove(0);
                let (x, y) = grid
                    .first_free(room.width, room.height)
                    .ok_or_else(|| exhausted(room, width, height))?;
                log::warn!(
                    "No scored slot this round; falling back to ({}, {}) for room #{} '{}'",
                    x,
                    y,
                    room.id,
                    room.name
                );
                commit(&mut grid, &mut placed, &mut is_placed, room, x, y);
            }
        }
    }

    Ok(compact(placed))
}

/// A room joins the scored pool once it has a placed graph neighbor, or
/// unconditionally once at least half of all rooms are down.
fn in_candidate_pool(has_placed_neighbor: bool, placed: usize, total: usize) -> bool {
    has_placed_neighbor || placed >= total / 2
}

fn commit(
    grid: &mut PlacementGrid,
    placed: &mut Vec<PlacedRoom>,
    is_placed: &mut [bool],
    room: &RoomSpec,
    x: usize,
    y: usize,
) {
    grid.fill(x, y, room.width, room.height, cells::room_value(room.id));
    if let Some(flag) = is_placed.get_mut(room.id) {
        *flag = true;
    }
    placed.push(PlacedRoom {
        spec: room.clone(),
        x,
        y,
    });
}

fn exhausted(room: &RoomSpec, grid_width: usize, grid_height: usize) -> LayoutError {
    LayoutError::PlacementExhausted {
        room_id: room.id,
        name: room.name.clone(),
        width: room.width,
        height: room.height,
        grid_width,
        grid_height,
    }
}

/// Translate every room by the bounding box's top-left corner.
fn compact(placed: Vec<PlacedRoom>) -> Placement {
    let min_x = placed.iter().map(|r| r.x).min().unwrap_or(0);
    let min_y = placed.iter().map(|r| r.y).min().unwrap_or(0);
    let max_x = placed.iter().map(|r| r.rect().right()).max().unwrap_or(0);
    let max_y = placed.iter().map(|r| r.rect().bottom()).max().unwrap_or(0);

    let order: Vec<usize> = placed.iter().map(|r| r.spec.id).collect();
    let mut rooms: Vec<PlacedRoom> = placed
        .into_iter()
        .map(|mut r| {
            r.x -= min_x;
            r.y -= min_y;
            r
        })
        .collect();
    rooms.sort_by_key(|r| r.spec.id);

    Placement {
        rooms,
        order,
        grid_size: (max_x - min_x, max_y - min_y),
    }
}

/// Score placing `room` with its origin at `(x, y)` given what is already on
/// the grid. Higher is better. Contains no randomness.
pub fn score_placement(
    room: &RoomSpec,
    x: usize,
    y: usize,
    placed: &[PlacedRoom],
    graph: &AdjacencyGraph,
    grid_width: usize,
    grid_height: usize,
) -> f64 {
    let rect = Rect {
        x,
        y,
        width: room.width,
        height: room.height,
    };
    let mut score = 0.0;
    let mut satisfied_living_rooms = 0usize;

    for other in placed {
        let other_rect = other.rect();
        if rect.overlaps(&other_rect) {
            score -= OVERLAP_PENALTY;
        }

        let Some(weight) = graph.weight(room.id, other.spec.id) else {
            continue;
        };
        let weight = weight as f64;
        if rect.is_wall_adjacent(&other_rect) {
            score += weight * ADJACENT_BONUS;
            if weight >= weights::REQUESTED as f64 && other.spec.room_type == RoomType::LivingRoom {
                satisfied_living_rooms += 1;
            }
        } else {
            score -= weight * DISTANCE_PENALTY * rect.center_distance(&other_rect);
        }
    }

    match room.room_type {
        RoomType::Hallway => {
            let (cx, cy) = rect.center();
            let grid_cx = (grid_width / 2) as f64;
            let grid_cy = (grid_height / 2) as f64;
            let distance = ((cx - grid_cx).powi(2) + (cy - grid_cy).powi(2)).sqrt();
            score += HALLWAY_CENTRALITY * (1.0 - distance / (grid_width + grid_height) as f64);
        }
        RoomType::LivingRoom => score += LIVING_ROOM_BONUS,
        RoomType::Bedroom | RoomType::MasterBedroom => {
            score += BEDROOM_LIVING_BONUS * satisfied_living_rooms as f64;
        }
        _ => {}
    }

    if x == 0 || y == 0 || rect.right() == grid_width || rect.bottom() == grid_height {
        score -= BOUNDARY_PENALTY;
    }

    score
}
