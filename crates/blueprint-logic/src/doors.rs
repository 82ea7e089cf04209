//! Doorway insertion on shared walls.
//!
//! Walks the adjacency edges heaviest first and, for each pair of rooms that
//! ended up wall-adjacent, marks one cell at the middle of the shared wall as
//! a doorway. Light edges (repair links) never get a door, and each room is
//! capped at a few doors unless a hallway is involved.

use std::collections::HashMap;

use serde::Serialize;

use crate::config::LayoutConfig;
use crate::constants::{cells, RoomType};
use crate::graph::{AdjacencyGraph, Edge};
use crate::grid::PlacementGrid;
use crate::placement::PlacedRoom;

/// A doorway marked on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Doorway {
    pub room_a: usize,
    pub room_b: usize,
    pub x: usize,
    pub y: usize,
    pub weight: u32,
}

/// Why an edge got no doorway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DoorSkip {
    /// The rooms share no wall segment.
    NotAdjacent,
    /// The cells flanking the wall midpoint no longer belong to the pair.
    GeometryMismatch,
    /// Both rooms are non-hallways and one already has its quota.
    CapReached,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SkippedEdge {
    pub edge: Edge,
    pub reason: DoorSkip,
}

/// Outcome of doorway insertion. The grid itself carries the doorways; this
/// is the audit trail.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DoorReport {
    pub doorways: Vec<Doorway>,
    pub skipped: Vec<SkippedEdge>,
}

impl DoorReport {
    /// Doors touching `room_id`.
    pub fn door_count(&self, room_id: usize) -> usize {
        self.doorways
            .iter()
            .filter(|d| d.room_a == room_id || d.room_b == room_id)
            .count()
    }
}

/// Edges eligible for doors, heaviest first; ties by `(a, b)`.
pub fn door_candidates(graph: &AdjacencyGraph, min_weight: u32) -> Vec<Edge> {
    let mut edges: Vec<Edge> = graph
        .edges()
        .into_iter()
        .filter(|e| e.weight >= min_weight)
        .collect();
    edges.sort_by(|x, y| y.weight.cmp(&x.weight).then((x.a, x.b).cmp(&(y.a, y.b))));
    edges
}

/// Mark doorways in `grid` for every eligible, wall-adjacent edge.
pub fn insert_doorways(
    grid: &mut PlacementGrid,
    rooms: &[PlacedRoom],
    graph: &AdjacencyGraph,
    config: &LayoutConfig,
) -> DoorReport {
    let by_id: HashMap<usize, &PlacedRoom> = rooms.iter().map(|r| (r.spec.id, r)).collect();
    let mut door_counts: HashMap<usize, u32> = HashMap::new();
    let mut report = DoorReport::default();

    for edge in door_candidates(graph, config.min_door_weight) {
        let (Some(a), Some(b)) = (by_id.get(&edge.a), by_id.get(&edge.b)) else {
            continue;
        };

        let (x, y) = match door_cell(grid, a, b) {
            Ok(cell) => cell,
            Err(reason) => {
                log::debug!(
                    "No door for #{}–#{} (weight {}): {:?}",
                    edge.a,
                    edge.b,
                    edge.weight,
                    reason
                );
                report.skipped.push(SkippedEdge { edge, reason });
                continue;
            }
        };

        let involves_hallway =
            a.spec.room_type == RoomType::Hallway || b.spec.room_type == RoomType::Hallway;
        let count_a = door_counts.get(&edge.a).copied().unwrap_or(0);
        let count_b = door_counts.get(&edge.b).copied().unwrap_or(0);
        let under_cap = count_a < config.max_doors_per_room && count_b < config.max_doors_per_room;
        if !(involves_hallway || under_cap) {
            report.skipped.push(SkippedEdge {
                edge,
                reason: DoorSkip::CapReached,
            });
            continue;
        }

        grid.set(x, y, cells::DOORWAY);
        *door_counts.entry(edge.a).or_insert(0) += 1;
        *door_counts.entry(edge.b).or_insert(0) += 1;
        report.doorways.push(Doorway {
            room_a: edge.a,
            room_b: edge.b,
            x,
            y,
            weight: edge.weight,
        });
    }

    log::debug!(
        "Inserted {} doorways, skipped {} edges",
        report.doorways.len(),
        report.skipped.len()
    );
    report
}

/// Pick the door cell for a wall-adjacent pair.
///
/// The door goes on the middle of the shared wall, in the entrance cell of
/// whichever room lies to the right or below. Both flanking cells must still
/// hold their room's value.
fn door_cell(
    grid: &PlacementGrid,
    a: &PlacedRoom,
    b: &PlacedRoom,
) -> Result<(usize, usize), DoorSkip> {
    let ra = a.rect();
    let rb = b.rect();
    let va = cells::room_value(a.spec.id);
    let vb = cells::room_value(b.spec.id);

    let rows = (ra.y.max(rb.y), ra.bottom().min(rb.bottom()));
    let cols = (ra.x.max(rb.x), ra.right().min(rb.right()));

    // (inside-a cell, inside-b cell, door cell) for the first side that fits
    let flanks = if ra.right() == rb.x && rows.1 > rows.0 {
        let y = midpoint(rows);
        ((ra.right() - 1, y), (rb.x, y), (rb.x, y))
    } else if rb.right() == ra.x && rows.1 > rows.0 {
        let y = midpoint(rows);
        ((ra.x, y), (rb.right() - 1, y), (ra.x, y))
    } else if ra.bottom() == rb.y && cols.1 > cols.0 {
        let x = midpoint(cols);
        ((x, ra.bottom() - 1), (x, rb.y), (x, rb.y))
    } else if rb.bottom() == ra.y && cols.1 > cols.0 {
        let x = midpoint(cols);
        ((x, ra.y), (x, rb.bottom() - 1), (x, ra.y))
    } else {
        return Err(DoorSkip::NotAdjacent);
    };

    let ((ax, ay), (bx, by), door) = flanks;
    if grid.get(ax, ay) == Some(va) && grid.get(bx, by) == Some(vb) {
        Ok(door)
    } else {
        Err(DoorSkip::GeometryMismatch)
    }
}

fn midpoint((lo, hi): (usize, usize)) -> usize {
    lo + (hi - lo) / 2
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::weights;
    use crate::placement::Placement;
    use crate::rooms::RoomSpec;

    fn room(id: usize, room_type: &str, x: usize, y: usize, w: usize, h: usize) -> PlacedRoom {
        PlacedRoom {
            spec: RoomSpec {
                id,
                room_type: RoomType::from(room_type),
                name: room_type.to_string(),
                width: w,
                height: h,
                grid_cells: w * h,
                target_cells: w * h,
                approx_sqft: (w * h) as f64 * 20.0,
            },
            x,
            y,
        }
    }

    fn graph_for(rooms: &[PlacedRoom], edges: &[(usize, usize, u32)]) -> AdjacencyGraph {
        let mut g = AdjacencyGraph::new();
        for r in rooms {
            g.add_node(r.spec.room_type.clone());
        }
        for &(a, b, w) in edges {
            g.set_edge(a, b, w);
        }
        g
    }

    fn grid_for(rooms: &[PlacedRoom]) -> PlacementGrid {
        let width = rooms.iter().map(|r| r.rect().right()).max().unwrap();
        let height = rooms.iter().map(|r| r.rect().bottom()).max().unwrap();
        Placement {
            rooms: rooms.to_vec(),
            order: rooms.iter().map(|r| r.spec.id).collect(),
            grid_size: (width, height),
        }
        .to_grid()
    }

    #[test]
    fn test_door_on_vertical_wall_enters_right_room() {
        let rooms = vec![room(0, "living room", 0, 0, 4, 4), room(1, "bedroom", 4, 1, 3, 2)];
        let graph = graph_for(&rooms, &[(0, 1, weights::FORCED)]);
        let mut grid = grid_for(&rooms);
        let report = insert_doorways(&mut grid, &rooms, &graph, &LayoutConfig::default());

        assert_eq!(report.doorways.len(), 1);
        // shared rows 1..3 → midpoint 2, door in bedroom's first column
        assert_eq!((report.doorways[0].x, report.doorways[0].y), (4, 2));
        assert_eq!(grid.get(4, 2), Some(cells::DOORWAY));
        assert_eq!(grid.count(cells::DOORWAY), 1);
    }

    #[test]
    fn test_door_when_second_room_is_left() {
        let rooms = vec![room(0, "kitchen", 3, 0, 3, 3), room(1, "dining room", 0, 0, 3, 3)];
        let graph = graph_for(&rooms, &[(0, 1, weights::COMMON)]);
        let mut grid = grid_for(&rooms);
        let report = insert_doorways(&mut grid, &rooms, &graph, &LayoutConfig::default());
        assert_eq!((report.doorways[0].x, report.doorways[0].y), (3, 1));
    }

    #[test]
    fn test_door_on_horizontal_wall() {
        let rooms = vec![room(0, "kitchen", 0, 0, 4, 2), room(1, "dining room", 1, 2, 2, 2)];
        let graph = graph_for(&rooms, &[(0, 1, weights::COMMON)]);
        let mut grid = grid_for(&rooms);
        let report = insert_doorways(&mut grid, &rooms, &graph, &LayoutConfig::default());
        // shared cols 1..3 → midpoint 2, door in dining room's top row
        assert_eq!((report.doorways[0].x, report.doorways[0].y), (2, 2));
    }

    #[test]
    fn test_repair_edges_get_no_door() {
        let rooms = vec![room(0, "garage", 0, 0, 3, 3), room(1, "entryway", 3, 0, 3, 3)];
        let graph = graph_for(&rooms, &[(0, 1, weights::REPAIR)]);
        let mut grid = grid_for(&rooms);
        let report = insert_doorways(&mut grid, &rooms, &graph, &LayoutConfig::default());
        assert!(report.doorways.is_empty());
        assert!(report.skipped.is_empty(), "below-threshold edges are not candidates");
        assert_eq!(grid.count(cells::DOORWAY), 0);
    }

    #[test]
    fn test_distant_rooms_skipped() {
        let rooms = vec![room(0, "kitchen", 0, 0, 2, 2), room(1, "dining room", 4, 0, 2, 2)];
        let graph = graph_for(&rooms, &[(0, 1, weights::COMMON)]);
        let mut grid = grid_for(&rooms);
        let report = insert_doorways(&mut grid, &rooms, &graph, &LayoutConfig::default());
        assert_eq!(report.skipped[0].reason, DoorSkip::NotAdjacent);
    }

    #[test]
    fn test_corner_contact_is_not_adjacent() {
        let rooms = vec![room(0, "kitchen", 0, 0, 2, 2), room(1, "dining room", 2, 2, 2, 2)];
        let graph = graph_for(&rooms, &[(0, 1, weights::COMMON)]);
        let mut grid = grid_for(&rooms);
        let report = insert_doorways(&mut grid, &rooms, &graph, &LayoutConfig::default());
        assert!(report.doorways.is_empty());
    }

    #[test]
    fn test_stale_flank_is_geometry_mismatch() {
        let rooms = vec![room(0, "kitchen", 0, 0, 2, 2), room(1, "dining room", 2, 0, 2, 2)];
        let graph = graph_for(&rooms, &[(0, 1, weights::COMMON)]);
        let mut grid = grid_for(&rooms);
        grid.set(2, 1, cells::DOORWAY);
        let report = insert_doorways(&mut grid, &rooms, &graph, &LayoutConfig::default());
        assert!(report.doorways.is_empty());
        assert_eq!(report.skipped[0].reason, DoorSkip::GeometryMismatch);
    }

    #[test]
    fn test_heaviest_edges_win_the_cap() {
        // Living room in the middle with four neighbors; the weakest loses.
        let rooms = vec![
            room(0, "living room", 2, 2, 2, 2),
            room(1, "bedroom", 0, 2, 2, 2),
            room(2, "bedroom", 4, 2, 2, 2),
            room(3, "dining room", 2, 0, 2, 2),
            room(4, "entryway", 2, 4, 2, 2),
        ];
        let graph = graph_for(
            &rooms,
            &[(0, 1, 20), (0, 2, 20), (0, 3, 10), (0, 4, 5)],
        );
        let mut grid = grid_for(&rooms);
        let report = insert_doorways(&mut grid, &rooms, &graph, &LayoutConfig::default());
        assert_eq!(report.door_count(0), 3);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].edge.b, 4);
        assert_eq!(report.skipped[0].reason, DoorSkip::CapReached);
    }

    #[test]
    fn test_hallway_is_uncapped() {
        let rooms = vec![
            room(0, "hallway", 2, 2, 2, 2),
            room(1, "bedroom", 0, 2, 2, 2),
            room(2, "bedroom", 4, 2, 2, 2),
            room(3, "bedroom", 2, 0, 2, 2),
            room(4, "bathroom", 2, 4, 2, 2),
        ];
        let graph = graph_for(
            &rooms,
            &[(0, 1, 15), (0, 2, 15), (0, 3, 15), (0, 4, 10)],
        );
        let mut grid = grid_for(&rooms);
        let report = insert_doorways(&mut grid, &rooms, &graph, &LayoutConfig::default());
        assert_eq!(report.door_count(0), 4);
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn test_candidates_sorted_heaviest_first() {
        let rooms = vec![
            room(0, "kitchen", 0, 0, 2, 2),
            room(1, "dining room", 2, 0, 2, 2),
            room(2, "living room", 4, 0, 2, 2),
        ];
        let graph = graph_for(&rooms, &[(0, 1, 5), (1, 2, 20), (0, 2, 1)]);
        let edges = door_candidates(&graph, 3);
        let weights: Vec<u32> = edges.iter().map(|e| e.weight).collect();
        assert_eq!(weights, vec![20, 5]);
    }
}
