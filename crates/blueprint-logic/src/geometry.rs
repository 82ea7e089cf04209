//! Geometry validation for generated layouts.
//!
//! Pure functions that take the exported layout (and the door report) and
//! return validation errors. Used by the tests and by the simtest harness to
//! check every run against the layout guarantees.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::constants::{cells, RoomType};
use crate::doors::Doorway;
use crate::export::{LayoutResult, RoomPosition};

/// A geometry validation error.
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub category: &'static str,
    pub severity: Severity,
    pub message: String,
}

/// Error severity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Severity {
    Error,
    Warning,
}

fn error(category: &'static str, message: String) -> ValidationError {
    ValidationError {
        category,
        severity: Severity::Error,
        message,
    }
}

// ── A. Rooms ────────────────────────────────────────────────────────────

/// Check that no room has a zero dimension.
pub fn check_room_dimensions(layout: &LayoutResult) -> Vec<ValidationError> {
    layout
        .room_positions
        .values()
        .filter(|r| r.width == 0 || r.height == 0)
        .map(|r| {
            error(
                "room_geometry",
                format!("Room #{} has empty dimensions: {}×{}", r.id, r.width, r.height),
            )
        })
        .collect()
}

/// Check every room rectangle lies inside `[0, width) × [0, height)`.
pub fn check_rooms_within_grid(layout: &LayoutResult) -> Vec<ValidationError> {
    let (width, height) = layout.grid_size;
    layout
        .room_positions
        .values()
        .filter(|r| r.x + r.width > width || r.y + r.height > height)
        .map(|r| {
            error(
                "room_geometry",
                format!(
                    "Room #{} extends outside grid: ({},{})→({},{}) vs {}×{}",
                    r.id,
                    r.x,
                    r.y,
                    r.x + r.width,
                    r.y + r.height,
                    width,
                    height
                ),
            )
        })
        .collect()
}

/// Pairwise rectangle overlap test.
pub fn check_room_overlaps(layout: &LayoutResult) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let rooms: Vec<&RoomPosition> = layout.room_positions.values().collect();
    for i in 0..rooms.len() {
        for j in (i + 1)..rooms.len() {
            if rooms[i].rect().overlaps(&rooms[j].rect()) {
                errors.push(error(
                    "room_overlap",
                    format!("Rooms #{} and #{} overlap", rooms[i].id, rooms[j].id),
                ));
            }
        }
    }
    errors
}

/// Check that every room spec has exactly one position and vice versa.
pub fn check_completeness(layout: &LayoutResult) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    if layout.room_positions.len() != layout.rooms.len() {
        errors.push(error(
            "completeness",
            format!(
                "{} room positions for {} rooms",
                layout.room_positions.len(),
                layout.rooms.len()
            ),
        ));
    }
    for spec in &layout.rooms {
        match layout.room_positions.get(&spec.id) {
            None => errors.push(error(
                "completeness",
                format!("Room #{} ('{}') was not placed", spec.id, spec.name),
            )),
            Some(p) if p.width != spec.width || p.height != spec.height => errors.push(error(
                "completeness",
                format!(
                    "Room #{} placed as {}×{} but specified {}×{}",
                    spec.id, p.width, p.height, spec.width, spec.height
                ),
            )),
            Some(_) => {}
        }
    }
    errors
}

// ── B. Grid encoding ────────────────────────────────────────────────────

/// Check the grid matches the room rectangles: each rectangle holds only its
/// own value (or doorways) and room values appear nowhere else.
pub fn check_grid_footprints(layout: &LayoutResult) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let (width, height) = layout.grid_size;

    if layout.grid.len() != height || layout.grid.iter().any(|row| row.len() != width) {
        errors.push(error(
            "grid_encoding",
            format!("Grid shape does not match grid_size {}×{}", width, height),
        ));
        return errors;
    }

    let mut owner: Vec<Option<usize>> = vec![None; width * height];
    for r in layout.room_positions.values() {
        for y in r.y..(r.y + r.height).min(height) {
            for x in r.x..(r.x + r.width).min(width) {
                owner[y * width + x] = Some(r.id);
            }
        }
    }

    for (y, row) in layout.grid.iter().enumerate() {
        for (x, &value) in row.iter().enumerate() {
            let expected = owner[y * width + x];
            let ok = match (value, expected) {
                (cells::EMPTY, None) => true,
                (cells::DOORWAY, Some(_)) => true,
                (v, Some(id)) => v == cells::room_value(id),
                _ => false,
            };
            if !ok {
                errors.push(error(
                    "grid_encoding",
                    format!(
                        "Cell ({},{}) holds {} but belongs to {}",
                        x,
                        y,
                        value,
                        expected.map_or("no room".to_string(), |id| format!("room #{}", id))
                    ),
                ));
            }
        }
    }
    errors
}

// ── C. Doorways ─────────────────────────────────────────────────────────

/// Check every doorway cell is recorded and sits on a wall shared by its
/// two rooms, with the door cell inside one room and the cell across the
/// wall inside the other.
pub fn check_doorways(layout: &LayoutResult, doors: &[Doorway]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let recorded: HashSet<(usize, usize)> = doors.iter().map(|d| (d.x, d.y)).collect();

    for (y, row) in layout.grid.iter().enumerate() {
        for (x, &value) in row.iter().enumerate() {
            if value == cells::DOORWAY && !recorded.contains(&(x, y)) {
                errors.push(error(
                    "door_validity",
                    format!("Doorway cell ({},{}) has no door record", x, y),
                ));
            }
        }
    }

    for d in doors {
        let (Some(a), Some(b)) = (
            layout.room_positions.get(&d.room_a),
            layout.room_positions.get(&d.room_b),
        ) else {
            errors.push(error(
                "door_validity",
                format!("Door at ({},{}) references a missing room", d.x, d.y),
            ));
            continue;
        };
        if !(on_shared_wall(d.x, d.y, a, b) || on_shared_wall(d.x, d.y, b, a)) {
            errors.push(error(
                "door_validity",
                format!(
                    "Door at ({},{}) is not on the wall between #{} and #{}",
                    d.x, d.y, d.room_a, d.room_b
                ),
            ));
        }
    }
    errors
}

/// True if `(x, y)` is inside `inside` and a 4-neighbor is inside `across`.
fn on_shared_wall(x: usize, y: usize, inside: &RoomPosition, across: &RoomPosition) -> bool {
    let contains = |r: &RoomPosition, cx: usize, cy: usize| {
        cx >= r.x && cx < r.x + r.width && cy >= r.y && cy < r.y + r.height
    };
    if !contains(inside, x, y) {
        return false;
    }
    let mut neighbors = vec![(x + 1, y), (x, y + 1)];
    if x > 0 {
        neighbors.push((x - 1, y));
    }
    if y > 0 {
        neighbors.push((x, y - 1));
    }
    neighbors.into_iter().any(|(nx, ny)| contains(across, nx, ny))
}

/// Check per-room door caps. Doors to hallways do not count against a
/// room's cap, and hallways themselves are uncapped.
pub fn check_door_caps(
    layout: &LayoutResult,
    doors: &[Doorway],
    max_doors: u32,
) -> Vec<ValidationError> {
    let is_hallway = |id: usize| {
        layout
            .room_positions
            .get(&id)
            .is_some_and(|r| r.room_type == RoomType::Hallway)
    };

    let mut counts: HashMap<usize, u32> = HashMap::new();
    for d in doors {
        if is_hallway(d.room_a) || is_hallway(d.room_b) {
            continue;
        }
        *counts.entry(d.room_a).or_insert(0) += 1;
        *counts.entry(d.room_b).or_insert(0) += 1;
    }

    let mut over: Vec<(usize, u32)> = counts.into_iter().filter(|&(_, c)| c > max_doors).collect();
    over.sort_unstable();
    over.into_iter()
        .map(|(id, count)| {
            error(
                "door_validity",
                format!("Room #{} has {} doors (cap {})", id, count, max_doors),
            )
        })
        .collect()
}

// ── D. Connectivity ─────────────────────────────────────────────────────

/// Warn about rooms not reachable through doorways from the lowest room id.
/// Doors only exist where adjacency materialized, so this is advisory.
pub fn check_door_connectivity(layout: &LayoutResult, doors: &[Doorway]) -> Vec<ValidationError> {
    let Some(&start) = layout.room_positions.keys().next() else {
        return Vec::new();
    };

    let mut adj: HashMap<usize, Vec<usize>> = HashMap::new();
    for d in doors {
        adj.entry(d.room_a).or_default().push(d.room_b);
        adj.entry(d.room_b).or_default().push(d.room_a);
    }

    let mut visited = HashSet::new();
    let mut queue = VecDeque::new();
    visited.insert(start);
    queue.push_back(start);
    while let Some(current) = queue.pop_front() {
        if let Some(neighbors) = adj.get(&current) {
            for &next in neighbors {
                if visited.insert(next) {
                    queue.push_back(next);
                }
            }
        }
    }

    let unreached: Vec<usize> = layout
        .room_positions
        .keys()
        .filter(|id| !visited.contains(id))
        .copied()
        .collect();

    if unreached.is_empty() {
        return Vec::new();
    }
    vec![ValidationError {
        category: "connectivity",
        severity: Severity::Warning,
        message: format!(
            "{} of {} rooms unreachable by door from room #{} (e.g. room #{})",
            unreached.len(),
            layout.room_positions.len(),
            start,
            unreached[0]
        ),
    }]
}

// ── Master validation ───────────────────────────────────────────────────

/// Run all layout validations and return combined results.
pub fn validate_layout(
    layout: &LayoutResult,
    doors: &[Doorway],
    max_doors: u32,
) -> Vec<ValidationError> {
    let mut all = Vec::new();
    all.extend(check_room_dimensions(layout));
    all.extend(check_rooms_within_grid(layout));
    all.extend(check_room_overlaps(layout));
    all.extend(check_completeness(layout));
    all.extend(check_grid_footprints(layout));
    all.extend(check_doorways(layout, doors));
    all.extend(check_door_caps(layout, doors, max_doors));
    all.extend(check_door_connectivity(layout, doors));
    all
}

/// Only the hard errors from a validation run.
pub fn errors_only(results: &[ValidationError]) -> Vec<&ValidationError> {
    results
        .iter()
        .filter(|e| e.severity == Severity::Error)
        .collect()
}
