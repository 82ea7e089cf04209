//! Weighted room adjacency graph.
//!
//! Nodes are room ids, edges carry an integer weight whose band says why the
//! pair should touch (see [`crate::constants::weights`]). The builder applies
//! the rules in a fixed precedence order, then repairs connectivity so the
//! placement engine always has a single component to grow from.

use std::collections::{BTreeMap, VecDeque};

use serde::Serialize;

use crate::constants::{weights, RoomType, COMMON_ADJACENCIES};
use crate::error::{LayoutError, Result};
use crate::rooms::{AdjacencyRequest, RoomSpec};

/// A weighted undirected edge, stored with `a < b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Edge {
    pub a: usize,
    pub b: usize,
    pub weight: u32,
}

/// Adjacency-list graph over dense room ids `0..n`.
#[derive(Debug, Clone, Default)]
pub struct AdjacencyGraph {
    /// Room type per node, indexed by id.
    node_types: Vec<RoomType>,
    /// id → (neighbor id → weight). Ordered so iteration is deterministic.
    adj: Vec<BTreeMap<usize, u32>>,
}

impl AdjacencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node; returns its id.
    pub fn add_node(&mut self, room_type: RoomType) -> usize {
        self.node_types.push(room_type);
        self.adj.push(BTreeMap::new());
        self.adj.len() - 1
    }

    pub fn node_count(&self) -> usize {
        self.adj.len()
    }

    pub fn node_type(&self, id: usize) -> Option<&RoomType> {
        self.node_types.get(id)
    }

    /// Insert or overwrite the edge between `a` and `b`. Self-loops and
    /// unknown ids are ignored.
    pub fn set_edge(&mut self, a: usize, b: usize, weight: u32) {
        if a == b || a >= self.adj.len() || b >= self.adj.len() {
            return;
        }
        self.adj[a].insert(b, weight);
        self.adj[b].insert(a, weight);
    }

    /// Insert the edge only if the pair is not connected yet.
    /// Returns true if an edge was added.
    pub fn add_edge_if_absent(&mut self, a: usize, b: usize, weight: u32) -> bool {
        if self.has_edge(a, b) {
            return false;
        }
        self.set_edge(a, b, weight);
        self.has_edge(a, b)
    }

    /// Remove any existing edge between the pair, then add one at `weight`.
    pub fn replace_edge(&mut self, a: usize, b: usize, weight: u32) {
        self.remove_edge(a, b);
        self.set_edge(a, b, weight);
    }

    pub fn remove_edge(&mut self, a: usize, b: usize) -> Option<u32> {
        let w = self.adj.get_mut(a)?.remove(&b);
        if let Some(list) = self.adj.get_mut(b) {
            list.remove(&a);
        }
        w
    }

    pub fn has_edge(&self, a: usize, b: usize) -> bool {
        self.weight(a, b).is_some()
    }

    pub fn weight(&self, a: usize, b: usize) -> Option<u32> {
        self.adj.get(a)?.get(&b).copied()
    }

    /// Neighbors of `id` with edge weights, in ascending id order.
    pub fn neighbors(&self, id: usize) -> impl Iterator<Item = (usize, u32)> + '_ {
        self.adj
            .get(id)
            .into_iter()
            .flat_map(|m| m.iter().map(|(&n, &w)| (n, w)))
    }

    /// Every edge once, ordered by `(a, b)`.
    pub fn edges(&self) -> Vec<Edge> {
        let mut out = Vec::new();
        for (a, list) in self.adj.iter().enumerate() {
            for (&b, &weight) in list.range(a + 1..) {
                out.push(Edge { a, b, weight });
            }
        }
        out
    }

    pub fn edge_count(&self) -> usize {
        self.adj.iter().map(|m| m.len()).sum::<usize>() / 2
    }

    /// Connected components, each sorted, ordered by their smallest id.
    pub fn connected_components(&self) -> Vec<Vec<usize>> {
        let n = self.adj.len();
        let mut seen = vec![false; n];
        let mut components = Vec::new();

        for start in 0..n {
            if seen[start] {
                continue;
            }
            let mut component = Vec::new();
            let mut queue = VecDeque::new();
            seen[start] = true;
            queue.push_back(start);

            while let Some(current) = queue.pop_front() {
                component.push(current);
                for &next in self.adj[current].keys() {
                    if !seen[next] {
                        seen[next] = true;
                        queue.push_back(next);
                    }
                }
            }
            component.sort_unstable();
            components.push(component);
        }
        components
    }

    pub fn is_connected(&self) -> bool {
        self.connected_components().len() <= 1
    }

    fn ids_where(&self, pred: impl Fn(&RoomType) -> bool) -> Vec<usize> {
        self.node_types
            .iter()
            .enumerate()
            .filter(|(_, t)| pred(t))
            .map(|(id, _)| id)
            .collect()
    }
}

/// Build the adjacency graph for `rooms` and the user's explicit requests.
///
/// Rule order matters: later rules may override weights set by earlier ones.
pub fn build_adjacency_graph(
    rooms: &[RoomSpec],
    requests: &[AdjacencyRequest],
) -> Result<AdjacencyGraph> {
    let mut graph = AdjacencyGraph::new();
    for room in rooms {
        graph.add_node(room.room_type.clone());
    }

    // Explicit requests
    for req in requests {
        let first = graph.ids_where(|t| *t == req.room1);
        let second = graph.ids_where(|t| *t == req.room2);
        for &a in &first {
            for &b in &second {
                graph.set_edge(a, b, weights::REQUESTED);
            }
        }
    }

    // Common architectural patterns, only where nothing exists yet
    for (type_a, type_b) in COMMON_ADJACENCIES.iter() {
        let first = graph.ids_where(|t| t == type_a);
        let second = graph.ids_where(|t| t == type_b);
        for &a in &first {
            for &b in &second {
                graph.add_edge_if_absent(a, b, weights::COMMON);
            }
        }
    }

    let bedrooms = graph.ids_where(RoomType::is_bedroom);
    let living_rooms = graph.ids_where(|t| *t == RoomType::LivingRoom);
    let hallways = graph.ids_where(|t| *t == RoomType::Hallway);

    // Forced pairings override anything set above
    for &bedroom in &bedrooms {
        for &living in &living_rooms {
            graph.replace_edge(bedroom, living, weights::FORCED);
        }
    }
    for &hallway in &hallways {
        for &living in &living_rooms {
            graph.replace_edge(hallway, living, weights::FORCED);
        }
    }
    for &hallway in &hallways {
        for &bedroom in &bedrooms {
            graph.add_edge_if_absent(hallway, bedroom, weights::FORCED_SECONDARY);
        }
    }

    let repaired = repair_connectivity(&mut graph);
    let components = graph.connected_components().len();
    if components > 1 {
        return Err(LayoutError::DisconnectedGraphUnrepairable { components });
    }

    log::debug!(
        "Adjacency graph: {} nodes, {} edges ({} repair edges)",
        graph.node_count(),
        graph.edge_count(),
        repaired
    );
    Ok(graph)
}

/// Link every component to the largest one with a single weight-1 edge.
///
/// The anchor is the first largest component; each link joins the smallest
/// id of the component to the smallest id of the anchor. Returns the number
/// of edges added.
fn repair_connectivity(graph: &mut AdjacencyGraph) -> usize {
    let mut added = 0;
    loop {
        let components = graph.connected_components();
        if components.len() <= 1 {
            return added;
        }

        let mut anchor = 0;
        for (i, c) in components.iter().enumerate() {
            if c.len() > components[anchor].len() {
                anchor = i;
            }
        }
        let anchor_node = components[anchor][0];

        for (i, component) in components.iter().enumerate() {
            if i != anchor {
                graph.set_edge(component[0], anchor_node, weights::REPAIR);
                added += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rooms::{build_room_specs, RoomRequirement};

    fn rooms(list: &[(&str, u32)]) -> Vec<RoomSpec> {
        let reqs: Vec<RoomRequirement> = list
            .iter()
            .map(|&(t, count)| RoomRequirement {
                room_type: RoomType::from(t),
                count,
                approximate_sqft: 100.0,
            })
            .collect();
        build_room_specs(&reqs, 20.0).unwrap()
    }

    fn request(a: &str, b: &str) -> AdjacencyRequest {
        AdjacencyRequest {
            room1: RoomType::from(a),
            room2: RoomType::from(b),
        }
    }

    #[test]
    fn test_set_edge_is_symmetric() {
        let mut g = AdjacencyGraph::new();
        g.add_node(RoomType::Kitchen);
        g.add_node(RoomType::DiningRoom);
        g.set_edge(0, 1, 7);
        assert_eq!(g.weight(0, 1), Some(7));
        assert_eq!(g.weight(1, 0), Some(7));
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn test_self_loop_ignored() {
        let mut g = AdjacencyGraph::new();
        g.add_node(RoomType::Kitchen);
        g.set_edge(0, 0, 10);
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn test_add_if_absent_keeps_existing_weight() {
        let mut g = AdjacencyGraph::new();
        g.add_node(RoomType::Kitchen);
        g.add_node(RoomType::DiningRoom);
        g.set_edge(0, 1, 10);
        assert!(!g.add_edge_if_absent(0, 1, 5));
        assert_eq!(g.weight(0, 1), Some(10));
    }

    #[test]
    fn test_explicit_request_weight() {
        let r = rooms(&[("garage", 1), ("laundry room", 1)]);
        let g = build_adjacency_graph(&r, &[request("garage", "laundry room")]).unwrap();
        assert_eq!(g.weight(0, 1), Some(weights::REQUESTED));
    }

    #[test]
    fn test_common_pattern_does_not_lower_request() {
        let r = rooms(&[("kitchen", 1), ("dining room", 1)]);
        let g = build_adjacency_graph(&r, &[request("kitchen", "dining room")]).unwrap();
        assert_eq!(g.weight(0, 1), Some(weights::REQUESTED));

        let g = build_adjacency_graph(&r, &[]).unwrap();
        assert_eq!(g.weight(0, 1), Some(weights::COMMON));
    }

    #[test]
    fn test_forced_bedroom_living_overrides_request() {
        let r = rooms(&[("bedroom", 2), ("master bedroom", 1), ("living room", 1)]);
        let g = build_adjacency_graph(&r, &[request("bedroom", "living room")]).unwrap();
        for bedroom in 0..3 {
            assert_eq!(g.weight(bedroom, 3), Some(weights::FORCED));
        }
    }

    #[test]
    fn test_hallway_rules() {
        let r = rooms(&[("hallway", 1), ("living room", 1), ("bedroom", 1), ("master bedroom", 1)]);
        let g = build_adjacency_graph(&r, &[request("hallway", "living room")]).unwrap();
        assert_eq!(g.weight(0, 1), Some(weights::FORCED));
        assert_eq!(g.weight(0, 2), Some(weights::FORCED_SECONDARY));
        assert_eq!(g.weight(0, 3), Some(weights::FORCED_SECONDARY));
    }

    #[test]
    fn test_hallway_bedroom_request_not_lowered() {
        let r = rooms(&[("hallway", 1), ("bedroom", 1)]);
        let g = build_adjacency_graph(&r, &[request("hallway", "bedroom")]).unwrap();
        assert_eq!(g.weight(0, 1), Some(weights::REQUESTED));
    }

    #[test]
    fn test_disconnected_types_get_repair_edge() {
        let r = rooms(&[("garage", 1), ("entryway", 1)]);
        let g = build_adjacency_graph(&r, &[]).unwrap();
        assert!(g.is_connected());
        assert_eq!(g.weight(0, 1), Some(weights::REPAIR));
    }

    #[test]
    fn test_repair_anchors_on_largest_component() {
        // kitchen–dining–living form one component; laundry and studio are islands
        let r = rooms(&[
            ("kitchen", 1),
            ("dining room", 1),
            ("living room", 1),
            ("laundry room", 1),
            ("studio", 1),
        ]);
        let g = build_adjacency_graph(&r, &[]).unwrap();
        assert!(g.is_connected());
        assert_eq!(g.weight(3, 0), Some(weights::REPAIR));
        assert_eq!(g.weight(4, 0), Some(weights::REPAIR));
        assert!(!g.has_edge(3, 4));
    }

    #[test]
    fn test_single_room_is_connected() {
        let r = rooms(&[("studio", 1)]);
        let g = build_adjacency_graph(&r, &[]).unwrap();
        assert_eq!(g.node_count(), 1);
        assert_eq!(g.connected_components().len(), 1);
    }

    #[test]
    fn test_edges_listed_once() {
        let r = rooms(&[("bedroom", 2), ("living room", 1)]);
        let g = build_adjacency_graph(&r, &[]).unwrap();
        let edges = g.edges();
        assert_eq!(edges.len(), g.edge_count());
        assert!(edges.iter().all(|e| e.a < e.b));
    }

    #[test]
    fn test_neighbors_sorted_by_id() {
        let r = rooms(&[("bedroom", 3), ("living room", 1)]);
        let g = build_adjacency_graph(&r, &[]).unwrap();
        let ns: Vec<usize> = g.neighbors(3).map(|(n, _)| n).collect();
        assert_eq!(ns, vec![0, 1, 2]);
    }
}
