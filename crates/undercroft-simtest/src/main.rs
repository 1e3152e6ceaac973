//! Undercroft Headless Generation Harness
//!
//! Sweeps seeds through the dungeon generator and validates the results.
//! Runs entirely in-process — no files written, no rendering.
//!
//! Usage:
//!   cargo run -p undercroft-simtest
//!   cargo run -p undercroft-simtest -- --verbose
//!   cargo run -p undercroft-simtest -- --print --seed=7
//!
//! Set `RUST_LOG=debug` to see every placed piece.

use rand::rngs::StdRng;
use rand::SeedableRng;
use undercroft_logic::builtin::default_catalog;
use undercroft_logic::catalog::PartCatalog;
use undercroft_logic::config::GenConfig;
use undercroft_logic::geometry::{Coords, Direction};
use undercroft_logic::grid::LevelGrid;
use undercroft_logic::part::PartShape;
use undercroft_logic::persistence::{load_dungeon, save_dungeon};
use undercroft_logic::rooms::connection_attempts;
use undercroft_logic::scheduler::{build_dungeon, generate, Dungeon};
use undercroft_logic::template::extend_catalog;
use undercroft_logic::transform::{to_local, to_rotated};
use undercroft_logic::validation::{validate_layout, Severity};

// ── Extra part templates (same JSON the tests use) ──────────────────────
const PARTS_JSON: &str = include_str!("../../../data/parts.json");

const SWEEP_SEEDS: u64 = 50;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    env_logger::init();

    let verbose = std::env::args().any(|a| a == "--verbose");
    let print = std::env::args().any(|a| a == "--print");
    let base_seed = std::env::args()
        .find_map(|a| a.strip_prefix("--seed=").and_then(|s| s.parse::<u64>().ok()))
        .unwrap_or(0);
    println!("=== Undercroft Generation Harness ===\n");

    let mut results = Vec::new();

    // 1. Part catalog
    let catalog = match load_catalog() {
        Ok(c) => c,
        Err(r) => {
            results.push(r);
            report(&results, verbose);
            return;
        }
    };
    results.extend(validate_catalog(&catalog, verbose));

    // 2. Weighted selection
    results.extend(validate_selector(&catalog, base_seed, verbose));

    // 3. Coordinate transform
    results.extend(validate_transform(verbose));

    // 4. Seed sweep on the reference grid
    results.extend(validate_seed_sweep(&catalog, base_seed, verbose));

    // 5. Two-level dungeon on a pre-drawn grid
    results.extend(validate_multi_level(&catalog, base_seed, verbose));

    // 6. Snapshots
    results.extend(validate_snapshot(&catalog, base_seed));

    if print {
        let mut catalog = catalog.clone();
        let config = reference_config(base_seed);
        match generate(&config, &mut catalog) {
            Ok(d) => println!("\n{}", d.grid),
            Err(e) => println!("\ngeneration failed: {}", e),
        }
    }

    report(&results, verbose);
}

fn report(results: &[TestResult], verbose: bool) {
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
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
}

fn reference_config(seed: u64) -> GenConfig {
    GenConfig::new(40, 40, 1, Coords::new(20, 20, 0))
        .with_budgets(20, 5)
        .with_seed(seed)
}

fn layout_errors(d: &Dungeon) -> Vec<String> {
    validate_layout(&d.grid, &d.layout, &d.starts)
        .into_iter()
        .filter(|e| e.severity == Severity::Error)
        .map(|e| format!("[{}] {}", e.category, e.message))
        .collect()
}

// ── 1. Part Catalog ─────────────────────────────────────────────────────

fn load_catalog() -> Result<PartCatalog, TestResult> {
    println!("--- Part Catalog ---");
    let mut catalog = default_catalog().map_err(|e| TestResult {
        name: "builtin_parts".into(),
        passed: false,
        detail: e.to_string(),
    })?;
    extend_catalog(&mut catalog, PARTS_JSON).map_err(|e| TestResult {
        name: "template_load".into(),
        passed: false,
        detail: e.to_string(),
    })?;
    log::info!("loaded {} parts", catalog.len());
    Ok(catalog)
}

fn validate_catalog(catalog: &PartCatalog, verbose: bool) -> Vec<TestResult> {
    let mut results = Vec::new();

    results.push(TestResult {
        name: "catalog_not_empty".into(),
        passed: catalog.len() >= 5,
        detail: format!("{} parts, total weight {}", catalog.len(), catalog.total_weight()),
    });

    let entry = catalog.subset(|p| p.can_start());
    results.push(TestResult {
        name: "catalog_has_entrances".into(),
        passed: entry.total_weight() > 0,
        detail: format!("{} entrance-capable parts", entry.len()),
    });

    let no_south: Vec<_> = catalog
        .parts()
        .filter(|p| {
            p.template().is_some() && !p.connections().iter().any(|c| c.at.y == p.height - 1)
        })
        .map(|p| p.name.clone())
        .collect();
    results.push(TestResult {
        name: "catalog_southern_links".into(),
        passed: no_south.is_empty(),
        detail: if no_south.is_empty() {
            "every static part chains forward".into()
        } else {
            format!("no southern connection: {:?}", no_south)
        },
    });

    if verbose {
        for p in catalog.parts() {
            println!(
                "  {:<14} {:?} weight {:>3} cap {:?}",
                p.name, p.class, p.weight, p.max_count
            );
        }
    }

    results
}

// ── 2. Weighted Selection ───────────────────────────────────────────────

fn validate_selector(catalog: &PartCatalog, seed: u64, verbose: bool) -> Vec<TestResult> {
    println!("--- Weighted Selection ---");
    let mut results = Vec::new();

    // Caps would skew frequencies; sample only the uncapped parts.
    let mut uncapped = catalog.subset(|p| p.max_count.is_none());
    let total = f64::from(uncapped.total_weight());
    let weights: Vec<(String, f64)> = uncapped
        .parts()
        .map(|p| (p.name.clone(), f64::from(p.weight) / total))
        .collect();

    let draws: u32 = 100_000;
    let mut rng = StdRng::seed_from_u64(seed);
    for _ in 0..draws {
        uncapped.select(&mut rng);
    }

    let mut worst = 0.0_f64;
    for (name, expected) in &weights {
        let observed = f64::from(uncapped.count_of(name).unwrap_or(0)) / f64::from(draws);
        worst = worst.max((observed - expected).abs());
        if verbose {
            println!("  {:<14} expected {:.4} observed {:.4}", name, expected, observed);
        }
    }
    results.push(TestResult {
        name: "selector_frequencies".into(),
        passed: worst < 0.01,
        detail: format!("max deviation {:.4} over {} draws", worst, draws),
    });

    let mut capped = catalog.subset(|p| p.max_count.is_some());
    let mut rng = StdRng::seed_from_u64(seed);
    for _ in 0..1_000 {
        capped.select(&mut rng);
    }
    let over: Vec<_> = capped
        .parts()
        .filter(|p| {
            let count = capped.count_of(&p.name).unwrap_or(0);
            p.max_count.is_some_and(|max| count > max)
        })
        .map(|p| p.name.clone())
        .collect();
    results.push(TestResult {
        name: "selector_caps".into(),
        passed: over.is_empty() && capped.total_weight() == 0,
        detail: if over.is_empty() {
            "capped parts exhaust cleanly".into()
        } else {
            format!("over cap: {:?}", over)
        },
    });

    results
}

// ── 3. Coordinate Transform ─────────────────────────────────────────────

fn validate_transform(verbose: bool) -> Vec<TestResult> {
    println!("--- Coordinate Transform ---");
    let mut results = Vec::new();
    let mut checked = 0;
    let mut failures = Vec::new();

    for (w, h) in [(1, 1), (3, 7), (13, 11), (7, 5), (6, 6)] {
        for dir in Direction::CARDINALS {
            let mut seen = std::collections::HashSet::new();
            for y in 0..h {
                for x in 0..w {
                    let local = Coords::new(x, y, 0);
                    let rotated = to_rotated(local, w, h, dir);
                    checked += 1;
                    if to_local(rotated, w, h, dir) != local || !seen.insert(rotated) {
                        failures.push(format!("{}x{} {:?} at {}", w, h, dir, local));
                    }
                }
            }
        }
    }
    if verbose && !failures.is_empty() {
        for f in &failures {
            println!("  transform mismatch: {}", f);
        }
    }

    results.push(TestResult {
        name: "transform_bijection".into(),
        passed: failures.is_empty(),
        detail: format!("{} tiles checked, {} mismatches", checked, failures.len()),
    });

    results
}

// ── 4. Seed Sweep ───────────────────────────────────────────────────────

fn validate_seed_sweep(catalog: &PartCatalog, base: u64, verbose: bool) -> Vec<TestResult> {
    println!("--- Seed Sweep ({} seeds) ---", SWEEP_SEEDS);
    let mut results = Vec::new();
    let mut over_budget = Vec::new();
    let mut invalid = Vec::new();
    let mut unresolved = Vec::new();
    let mut failed = Vec::new();
    let mut pieces = 0;

    for seed in base..base + SWEEP_SEEDS {
        let config = reference_config(seed);
        let mut catalog = catalog.clone();
        let d = match generate(&config, &mut catalog) {
            Ok(d) => d,
            Err(e) => {
                failed.push(format!("seed {}: {}", seed, e));
                continue;
            }
        };
        pieces += d.pieces().len();

        if d.pieces().len() > config.piece_budget as usize || d.room_count() > config.room_budget {
            over_budget.push(seed);
        }

        let errs = layout_errors(&d);
        if !errs.is_empty() {
            if verbose {
                println!("  seed {}: {:?}", seed, errs);
            }
            invalid.push(seed);
        }

        let expected: u32 = d
            .pieces()
            .iter()
            .map(|p| match &p.part.shape {
                PartShape::Static(t) => t.connections().len() as u32,
                PartShape::Dynamic(_) => connection_attempts(p.width, p.height),
            })
            .sum();
        if d.tally.total() != expected {
            unresolved.push(seed);
        }
    }

    results.push(TestResult {
        name: "sweep_generates".into(),
        passed: failed.is_empty(),
        detail: if failed.is_empty() {
            format!("{} pieces over {} seeds", pieces, SWEEP_SEEDS)
        } else {
            failed.join("; ")
        },
    });
    results.push(TestResult {
        name: "sweep_budgets".into(),
        passed: over_budget.is_empty(),
        detail: format!("over budget: {:?}", over_budget),
    });
    results.push(TestResult {
        name: "sweep_layout_valid".into(),
        passed: invalid.is_empty(),
        detail: format!("invalid seeds: {:?}", invalid),
    });
    results.push(TestResult {
        name: "sweep_connections_resolved".into(),
        passed: unresolved.is_empty(),
        detail: format!("tally mismatches: {:?}", unresolved),
    });

    let config = reference_config(base);
    let mut c1 = catalog.clone();
    let mut c2 = catalog.clone();
    let same = match (generate(&config, &mut c1), generate(&config, &mut c2)) {
        (Ok(a), Ok(b)) => a.grid == b.grid,
        _ => false,
    };
    results.push(TestResult {
        name: "sweep_deterministic".into(),
        passed: same,
        detail: format!("seed {} reproduces", base),
    });

    results
}

// ── 5. Multi-level ──────────────────────────────────────────────────────

fn validate_multi_level(catalog: &PartCatalog, seed: u64, verbose: bool) -> Vec<TestResult> {
    println!("--- Multi-level ---");
    let mut results = Vec::new();

    let (w, h, d) = (70, 50, 2);
    let mut config = GenConfig::new(w, h, d, Coords::new(35, 25, 0)).with_budgets(120, 50);
    config.starts.push(Coords::new(20, 20, 1));
    let grid = LevelGrid::new(w, h, d);
    let mut catalog = catalog.clone();

    match build_dungeon(grid, &config, &mut catalog, StdRng::seed_from_u64(seed)) {
        Ok(dungeon) => {
            let stairwells = dungeon
                .pieces()
                .iter()
                .filter(|p| p.part.name == "stairwell")
                .count();
            if verbose {
                println!(
                    "  {} pieces, {} stairwells, {} waves",
                    dungeon.pieces().len(),
                    stairwells,
                    dungeon.waves
                );
            }
            let errs = layout_errors(&dungeon);
            results.push(TestResult {
                name: "multi_level_valid".into(),
                passed: errs.is_empty(),
                detail: if errs.is_empty() {
                    format!("{} pieces across {} levels", dungeon.pieces().len(), d)
                } else {
                    errs.join("; ")
                },
            });
        }
        Err(e) => results.push(TestResult {
            name: "multi_level_valid".into(),
            passed: false,
            detail: e.to_string(),
        }),
    }

    results
}

// ── 6. Snapshots ────────────────────────────────────────────────────────

fn validate_snapshot(catalog: &PartCatalog, seed: u64) -> Vec<TestResult> {
    println!("--- Snapshots ---");
    let mut catalog = catalog.clone();
    let passed = generate(&reference_config(seed), &mut catalog)
        .ok()
        .and_then(|d| {
            let mut buf = Vec::new();
            save_dungeon(&d, &mut buf).ok()?;
            let loaded = load_dungeon(buf.as_slice()).ok()?;
            Some(loaded.grid == d.grid && loaded.pieces.len() == d.pieces().len())
        })
        .unwrap_or(false);

    vec![TestResult {
        name: "snapshot_round_trip".into(),
        passed,
        detail: "bincode save/load preserves grid and pieces".into(),
    }]
}
