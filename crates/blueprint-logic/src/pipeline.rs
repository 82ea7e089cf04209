//! End-to-end layout generation.
//!
//! Runs the stages in order on one seeded RNG: room specs, adjacency graph,
//! placement, doorways, export.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::LayoutConfig;
use crate::doors::{insert_doorways, DoorReport};
use crate::error::Result;
use crate::export::LayoutResult;
use crate::graph::{build_adjacency_graph, AdjacencyGraph};
use crate::placement::place_rooms;
use crate::rooms::{build_room_specs, Requirements};

/// A finished layout plus the intermediate state that produced it.
#[derive(Debug, Clone)]
pub struct GeneratedLayout {
    pub result: LayoutResult,
    pub graph: AdjacencyGraph,
    pub doors: DoorReport,
    /// Seed actually used; feed it back through `LayoutConfig::seed` to
    /// replay the run.
    pub seed: u64,
    /// Room ids in placement commit order.
    pub order: Vec<usize>,
}

/// Generate a floor plan for `requirements`.
pub fn generate_layout(
    requirements: &Requirements,
    config: &LayoutConfig,
) -> Result<GeneratedLayout> {
    config.validate()?;
    let seed = config.resolve_seed();
    let mut rng = StdRng::seed_from_u64(seed);

    log::info!(
        "Generating layout: {} room requirements, {} adjacency requests, seed {}",
        requirements.rooms.len(),
        requirements.adjacency.len(),
        seed
    );

    let specs = build_room_specs(&requirements.rooms, config.cell_size)?;
    let graph = build_adjacency_graph(&specs, &requirements.adjacency)?;

    let placement = place_rooms(&specs, &graph, config, &mut rng)?;
    let mut grid = placement.to_grid();
    let doors = insert_doorways(&mut grid, &placement.rooms, &graph, config);
    let result = LayoutResult::assemble(&placement, &grid, config.cell_size);

    log::info!(
        "Layout complete: {} rooms on {}x{} grid, {} doorways",
        result.room_positions.len(),
        result.width(),
        result.height(),
        doors.doorways.len()
    );

    Ok(GeneratedLayout {
        result,
        graph,
        doors,
        seed,
        order: placement.order,
    })
}
