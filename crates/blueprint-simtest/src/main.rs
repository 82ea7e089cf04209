//! Blueprint Headless Layout Harness
//!
//! Runs the layout pipeline over a requirements document, validates every
//! generated floor plan, and optionally writes the JSON / SVG / PBM artifacts
//! for one run. Runs entirely in-process with no model or rendering backend.
//!
//! Usage:
//!   cargo run -p blueprint-simtest
//!   cargo run -p blueprint-simtest -- --runs 200 --verbose
//!   cargo run -p blueprint-simtest -- --input house.json --seed 7 --out-svg plan.svg

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use blueprint_logic::constants::{weights, RoomType};
use blueprint_logic::geometry::{validate_layout, Severity};
use blueprint_logic::graph::build_adjacency_graph;
use blueprint_logic::render::{to_svg, wall_mask};
use blueprint_logic::rooms::build_room_specs;
use blueprint_logic::{generate_layout, LayoutConfig, Requirements};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// ── Bundled sample (same JSON the benches use) ──────────────────────────
const SAMPLE_JSON: &str = include_str!("../../../data/sample_requirements.json");

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Requirements JSON; defaults to the bundled sample house.
    #[arg(short, long)]
    input: Option<PathBuf>,
    /// Layout config JSON; missing fields take their defaults.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// First seed of the sweep.
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    /// Number of consecutive seeds to generate and validate.
    #[arg(short, long, default_value_t = 50)]
    runs: u64,
    /// Override the working grid buffer.
    #[arg(long)]
    grid_buffer: Option<f64>,
    /// Write the first run's layout JSON here.
    #[arg(long)]
    out_json: Option<PathBuf>,
    /// Write the first run's annotated SVG here.
    #[arg(long)]
    out_svg: Option<PathBuf>,
    /// Write the first run's wall mask (PBM) here.
    #[arg(long)]
    out_mask: Option<PathBuf>,
    /// Pixels per cell for the wall mask.
    #[arg(long, default_value_t = 16)]
    mask_scale: usize,
    #[arg(short, long)]
    verbose: bool,
}

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "blueprint_logic=warn,blueprint_simtest=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let requirements_json = match &args.input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("reading requirements from {}", path.display()))?,
        None => SAMPLE_JSON.to_string(),
    };
    let requirements =
        Requirements::from_json(&requirements_json).context("parsing requirements JSON")?;

    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config from {}", path.display()))?;
            serde_json::from_str::<LayoutConfig>(&text).context("parsing config JSON")?
        }
        None => LayoutConfig::default(),
    };
    if let Some(buffer) = args.grid_buffer {
        config.grid_buffer = buffer;
    }
    config.validate().context("invalid layout config")?;

    println!("=== Blueprint Layout Harness ===\n");

    let mut results = Vec::new();

    // 1. Room sizing
    results.extend(validate_room_specs(&requirements, &config, args.verbose));

    // 2. Adjacency graph rules
    results.extend(validate_graph(&requirements, &config, args.verbose));

    // 3. Seed sweep
    results.extend(validate_seed_sweep(&requirements, &config, &args));

    // 4. Determinism under a fixed seed
    results.extend(validate_determinism(&requirements, &config, args.seed));

    // 5. Artifacts
    results.extend(write_artifacts(&requirements, &config, &args)?);

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || args.verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}

// ── 1. Room sizing ──────────────────────────────────────────────────────

fn validate_room_specs(
    requirements: &Requirements,
    config: &LayoutConfig,
    verbose: bool,
) -> Vec<TestResult> {
    println!("--- Room Specs ---");
    let mut results = Vec::new();

    let specs = match build_room_specs(&requirements.rooms, config.cell_size) {
        Ok(s) => s,
        Err(e) => {
            results.push(TestResult {
                name: "specs_build".into(),
                passed: false,
                detail: e.to_string(),
            });
            return results;
        }
    };

    let expected: u32 = requirements.rooms.iter().map(|r| r.count).sum();
    results.push(TestResult {
        name: "specs_count".into(),
        passed: specs.len() == expected as usize,
        detail: format!("{} rooms from {} requirements", specs.len(), requirements.rooms.len()),
    });

    let undersized: Vec<_> = specs
        .iter()
        .filter(|s| s.width * s.height < s.target_cells)
        .collect();
    results.push(TestResult {
        name: "specs_cover_target".into(),
        passed: undersized.is_empty(),
        detail: if undersized.is_empty() {
            "every room covers its requested cells".into()
        } else {
            format!("{} rooms smaller than requested", undersized.len())
        },
    });

    let thin: Vec<_> = specs.iter().filter(|s| s.width < 2 || s.height < 2).collect();
    results.push(TestResult {
        name: "specs_min_side".into(),
        passed: thin.is_empty(),
        detail: format!("{} rooms narrower than 2 cells", thin.len()),
    });

    let ids_dense = specs.iter().enumerate().all(|(i, s)| s.id == i);
    results.push(TestResult {
        name: "specs_dense_ids".into(),
        passed: ids_dense,
        detail: "ids are 0..n in request order".into(),
    });

    if verbose {
        for s in &specs {
            println!(
                "  #{:<2} {:<16} {}x{} ({} cells, target {})",
                s.id, s.name, s.width, s.height, s.grid_cells, s.target_cells
            );
        }
    }
    results
}

// ── 2. Adjacency graph ──────────────────────────────────────────────────

fn validate_graph(
    requirements: &Requirements,
    config: &LayoutConfig,
    verbose: bool,
) -> Vec<TestResult> {
    println!("--- Adjacency Graph ---");
    let mut results = Vec::new();

    let graph = match build_room_specs(&requirements.rooms, config.cell_size)
        .and_then(|specs| build_adjacency_graph(&specs, &requirements.adjacency))
    {
        Ok(g) => g,
        Err(e) => {
            results.push(TestResult {
                name: "graph_build".into(),
                passed: false,
                detail: e.to_string(),
            });
            return results;
        }
    };

    results.push(TestResult {
        name: "graph_connected".into(),
        passed: graph.is_connected(),
        detail: format!(
            "{} nodes, {} edges, {} component(s)",
            graph.node_count(),
            graph.edge_count(),
            graph.connected_components().len()
        ),
    });

    let of_type = |pred: &dyn Fn(&RoomType) -> bool| -> Vec<usize> {
        (0..graph.node_count())
            .filter(|&id| graph.node_type(id).is_some_and(pred))
            .collect()
    };
    let bedrooms = of_type(&RoomType::is_bedroom);
    let living_rooms = of_type(&|t: &RoomType| *t == RoomType::LivingRoom);
    let unforced: Vec<(usize, usize)> = bedrooms
        .iter()
        .flat_map(|&b| living_rooms.iter().map(move |&l| (b, l)))
        .filter(|&(b, l)| graph.weight(b, l) != Some(weights::FORCED))
        .collect();
    results.push(TestResult {
        name: "graph_bedroom_living_forced".into(),
        passed: unforced.is_empty(),
        detail: format!(
            "{} bedroom/living pairs, {} without the forced weight",
            bedrooms.len() * living_rooms.len(),
            unforced.len()
        ),
    });

    if verbose {
        for e in graph.edges() {
            println!("  #{} – #{}: {}", e.a, e.b, e.weight);
        }
    }
    results
}

// ── 3. Seed sweep ───────────────────────────────────────────────────────

fn validate_seed_sweep(
    requirements: &Requirements,
    config: &LayoutConfig,
    args: &Args,
) -> Vec<TestResult> {
    println!("--- Seed Sweep ({} runs from seed {}) ---", args.runs, args.seed);
    let mut results = Vec::new();

    let mut generated = 0u64;
    let mut generation_failures = Vec::new();
    let mut invalid = Vec::new();
    let mut warnings = 0usize;
    let mut total_doors = 0usize;

    for seed in args.seed..args.seed.saturating_add(args.runs) {
        let run_config = LayoutConfig {
            seed: Some(seed),
            ..config.clone()
        };
        let layout = match generate_layout(requirements, &run_config) {
            Ok(l) => l,
            Err(e) => {
                log::warn!("seed {}: {}", seed, e);
                generation_failures.push(seed);
                continue;
            }
        };
        generated += 1;
        total_doors += layout.doors.doorways.len();

        let findings = validate_layout(
            &layout.result,
            &layout.doors.doorways,
            config.max_doors_per_room,
        );
        for f in &findings {
            match f.severity {
                Severity::Error => log::warn!("seed {} [{}] {}", seed, f.category, f.message),
                Severity::Warning => {
                    warnings += 1;
                    log::debug!("seed {} [{}] {}", seed, f.category, f.message)
                }
            }
        }
        if findings.iter().any(|f| f.severity == Severity::Error) {
            invalid.push(seed);
        }
    }

    results.push(TestResult {
        name: "sweep_all_generated".into(),
        passed: generation_failures.is_empty(),
        detail: if generation_failures.is_empty() {
            format!("{} layouts generated", generated)
        } else {
            format!(
                "{} of {} seeds failed (first: {})",
                generation_failures.len(),
                args.runs,
                generation_failures[0]
            )
        },
    });

    results.push(TestResult {
        name: "sweep_all_valid".into(),
        passed: invalid.is_empty(),
        detail: if invalid.is_empty() {
            format!("{} layouts passed geometry validation", generated)
        } else {
            format!("{} layouts invalid (first seed: {})", invalid.len(), invalid[0])
        },
    });

    let avg_doors = if generated > 0 {
        total_doors as f64 / generated as f64
    } else {
        0.0
    };
    results.push(TestResult {
        name: "sweep_door_stats".into(),
        passed: true,
        detail: format!(
            "{:.1} doors per layout, {} connectivity warnings",
            avg_doors, warnings
        ),
    });

    results
}

// ── 4. Determinism ──────────────────────────────────────────────────────

fn validate_determinism(
    requirements: &Requirements,
    config: &LayoutConfig,
    seed: u64,
) -> Vec<TestResult> {
    println!("--- Determinism ---");
    let run_config = LayoutConfig {
        seed: Some(seed),
        ..config.clone()
    };
    let passed = match (
        generate_layout(requirements, &run_config),
        generate_layout(requirements, &run_config),
    ) {
        (Ok(a), Ok(b)) => a.result == b.result && a.doors.doorways == b.doors.doorways,
        _ => false,
    };
    vec![TestResult {
        name: "fixed_seed_reproducible".into(),
        passed,
        detail: format!("seed {} produces identical layouts", seed),
    }]
}

// ── 5. Artifacts ────────────────────────────────────────────────────────

fn write_artifacts(
    requirements: &Requirements,
    config: &LayoutConfig,
    args: &Args,
) -> Result<Vec<TestResult>> {
    if args.out_json.is_none() && args.out_svg.is_none() && args.out_mask.is_none() {
        return Ok(Vec::new());
    }
    println!("--- Artifacts ---");

    let run_config = LayoutConfig {
        seed: Some(args.seed),
        ..config.clone()
    };
    let layout = generate_layout(requirements, &run_config)
        .with_context(|| format!("generating layout for seed {}", args.seed))?;

    let mut results = Vec::new();
    if let Some(path) = &args.out_json {
        let json = layout.result.to_json_pretty()?;
        fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        results.push(written("artifact_json", path));
    }
    if let Some(path) = &args.out_svg {
        fs::write(path, to_svg(&layout.result))
            .with_context(|| format!("writing {}", path.display()))?;
        results.push(written("artifact_svg", path));
    }
    if let Some(path) = &args.out_mask {
        let mask = wall_mask(&layout.result, args.mask_scale);
        fs::write(path, mask.to_pbm()).with_context(|| format!("writing {}", path.display()))?;
        results.push(written("artifact_mask", path));
    }
    log::info!("Wrote artifacts for seed {}", args.seed);
    Ok(results)
}

fn written(name: &str, path: &std::path::Path) -> TestResult {
    TestResult {
        name: name.into(),
        passed: true,
        detail: format!("wrote {}", path.display()),
    }
}
