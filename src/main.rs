//! grid-sim entry point — CLI wiring and config-driven simulation runs.

use std::path::Path;
use std::process;

use grid_sim::config::ScenarioConfig;
use grid_sim::disaster::{DisasterReport, DisasterSim, TickRecord};
use grid_sim::grid::{GridError, GridStore, Position};
use grid_sim::io::export::export_csv;
use grid_sim::snapshot::JsonFileStore;

/// Seed offset for the disaster engine RNG to avoid correlation with any
/// future grid-side stochastics.
const DISASTER_SEED_OFFSET: u64 = 31;

/// Scripted placement positions for the starter demo, chosen so the tower
/// reaches both neighbors and the substation covers the inland demand
/// points.
const DEMO_POSITIONS: [(f32, f32); 3] = [(400.0, 300.0), (430.0, 350.0), (450.0, 390.0)];

/// Parsed CLI arguments.
struct CliArgs {
    scenario_path: Option<String>,
    preset: Option<String>,
    seed_override: Option<u64>,
    duration_override: Option<u64>,
    telemetry_out: Option<String>,
    snapshot_path: Option<String>,
    #[cfg(feature = "api")]
    serve: bool,
    #[cfg(feature = "api")]
    port: u16,
}

fn print_help() {
    eprintln!("grid-sim — grid connectivity and disaster-response simulator");
    eprintln!();
    eprintln!("Usage: grid-sim [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --scenario <path>        Load scenario from TOML config file");
    eprintln!("  --preset <name>          Use a built-in preset (baseline)");
    eprintln!("  --seed <u64>             Override random seed");
    eprintln!("  --duration <u64>         Override run length in simulated seconds");
    eprintln!("  --telemetry-out <path>   Export tick records to CSV");
    eprintln!("  --snapshot <path>        Load/save grid state as JSON at this path");
    #[cfg(feature = "api")]
    {
        eprintln!("  --serve                  Start REST API server after simulation");
        eprintln!("  --port <u16>             API server port (default: 3000)");
    }
    eprintln!("  --help                   Show this help message");
    eprintln!();
    eprintln!("If no --scenario or --preset is given, the baseline preset is used.");
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        scenario_path: None,
        preset: None,
        seed_override: None,
        duration_override: None,
        telemetry_out: None,
        snapshot_path: None,
        #[cfg(feature = "api")]
        serve: false,
        #[cfg(feature = "api")]
        port: 3000,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--scenario" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --scenario requires a path argument");
                    process::exit(1);
                }
                cli.scenario_path = Some(args[i].clone());
            }
            "--preset" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --preset requires a name argument");
                    process::exit(1);
                }
                cli.preset = Some(args[i].clone());
            }
            "--seed" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --seed requires a u64 argument");
                    process::exit(1);
                }
                if let Ok(s) = args[i].parse::<u64>() {
                    cli.seed_override = Some(s);
                } else {
                    eprintln!("error: --seed value \"{}\" is not a valid u64", args[i]);
                    process::exit(1);
                }
            }
            "--duration" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --duration requires a u64 argument");
                    process::exit(1);
                }
                if let Ok(d) = args[i].parse::<u64>() {
                    cli.duration_override = Some(d);
                } else {
                    eprintln!("error: --duration value \"{}\" is not a valid u64", args[i]);
                    process::exit(1);
                }
            }
            "--telemetry-out" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --telemetry-out requires a path argument");
                    process::exit(1);
                }
                cli.telemetry_out = Some(args[i].clone());
            }
            "--snapshot" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --snapshot requires a path argument");
                    process::exit(1);
                }
                cli.snapshot_path = Some(args[i].clone());
            }
            #[cfg(feature = "api")]
            "--serve" => {
                cli.serve = true;
            }
            #[cfg(feature = "api")]
            "--port" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --port requires a u16 argument");
                    process::exit(1);
                }
                if let Ok(p) = args[i].parse::<u16>() {
                    cli.port = p;
                } else {
                    eprintln!("error: --port value \"{}\" is not a valid u16", args[i]);
                    process::exit(1);
                }
            }
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    cli
}

/// Builds the starter grid, wires it, and prints the coverage summary.
///
/// A restored snapshot skips the scripted placement — the saved layout
/// wins.
fn run_grid_demo(scenario: &ScenarioConfig, snapshots: Option<&JsonFileStore>) {
    let mut store = match snapshots {
        Some(s) => GridStore::with_snapshot(scenario.grid.clone(), scenario.economy.clone(), s),
        None => GridStore::new(scenario.grid.clone(), scenario.economy.clone()),
    };

    match store.claim_starter_pack() {
        Ok(ids) => {
            for (id, (x, y)) in ids.iter().zip(DEMO_POSITIONS) {
                match store.place_building(*id, Position::new(x, y)) {
                    Ok(report) if report.warning.is_some() => {
                        eprintln!("warning: {id} placed without a reachable tower");
                    }
                    Ok(_) => {}
                    Err(e) => eprintln!("warning: placement of {id} failed: {e}"),
                }
            }
        }
        Err(GridError::AlreadyClaimed) => {
            eprintln!("resuming saved grid; starter placement skipped");
        }
        Err(e) => eprintln!("warning: starter pack unavailable: {e}"),
    }

    let summary = store.simulate_power_flow();
    println!(
        "Grid: {:.0} MW generated, {:.0} MW delivered, {} demand points powered",
        summary.total_generated_mw,
        summary.total_delivered_mw,
        summary.powered_demand_point_ids.len()
    );
    for entry in store.log().entries().iter().rev() {
        println!("  [{:?}] {}", entry.severity, entry.message);
    }

    if let Some(s) = snapshots {
        store.persist_to(s);
    }
}

/// Runs the disaster simulation and returns records plus the report.
fn run_disaster(scenario: &ScenarioConfig, duration_s: u64) -> (Vec<TickRecord>, DisasterReport) {
    let initial_budget = scenario.resources.budget;
    let mut sim = DisasterSim::new(
        scenario.weather.clone(),
        scenario.resources.clone(),
        scenario.simulation.seed.wrapping_add(DISASTER_SEED_OFFSET),
    );
    let records = sim.run(duration_s);
    let report = DisasterReport::from_records(&records, initial_budget);
    (records, report)
}

fn main() {
    let cli = parse_args();

    // Load config: --scenario takes priority, then --preset, then baseline
    let mut scenario = if let Some(ref path) = cli.scenario_path {
        match ScenarioConfig::from_toml_file(Path::new(path)) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else if let Some(ref name) = cli.preset {
        match ScenarioConfig::from_preset(name) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else {
        ScenarioConfig::baseline()
    };

    if let Some(seed) = cli.seed_override {
        scenario.simulation.seed = seed;
    }
    if let Some(duration) = cli.duration_override {
        scenario.simulation.duration_s = duration;
    }

    let errors = scenario.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    let snapshots = cli.snapshot_path.as_ref().map(JsonFileStore::new);
    run_grid_demo(&scenario, snapshots.as_ref());

    let (records, report) = run_disaster(&scenario, scenario.simulation.duration_s);

    for r in &records {
        println!("{r}");
    }
    println!("\n{report}");

    if let Some(ref path) = cli.telemetry_out {
        if let Err(e) = export_csv(&records, Path::new(path)) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("Telemetry written to {path}");
    }

    #[cfg(feature = "api")]
    if cli.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let state = Arc::new(grid_sim::api::AppState {
            settings: scenario.simulation.clone(),
            report,
            records,
        });
        let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
        let rt = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
            eprintln!("error: failed to create tokio runtime: {e}");
            process::exit(1);
        });
        rt.block_on(grid_sim::api::serve(state, addr));
    }
}
