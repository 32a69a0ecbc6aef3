//! Viewer entry point: CLI wiring, snapshot loading, and output dispatch.

use std::path::Path;
use std::process;

use tracing::{info, warn};

use gridviz::config::ViewerConfig;
use gridviz::io::export::export_csv;
use gridviz::model::NetworkSnapshot;
use gridviz::projection::{EntityKind, RenderSession, time_series};
use gridviz::render::render_text;

/// Parsed CLI arguments.
struct CliArgs {
    data_path: Option<String>,
    config_path: Option<String>,
    timestep: Option<usize>,
    export_series: Option<String>,
    export_kind: Option<EntityKind>,
    export_out: Option<String>,
    #[cfg(feature = "api")]
    serve: bool,
    #[cfg(feature = "api")]
    port: Option<u16>,
    #[cfg(feature = "tui")]
    tui: bool,
}

fn print_help() {
    eprintln!("gridviz: viewer for precomputed electrical-network dispatch results");
    eprintln!();
    eprintln!("Usage: gridviz --data <path> [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --data <path>            Network result document (JSON)");
    eprintln!("  --config <path>          Viewer config file (TOML)");
    eprintln!("  --timestep <n>           Timestep index to render (default: 0)");
    eprintln!("  --export-series <id>     Export an entity's time series as CSV");
    eprintln!("  --kind <k>               Entity kind for --export-series");
    eprintln!("                           (bus, generator, load, storage)");
    eprintln!("  --out <path>             Output path for --export-series");
    #[cfg(feature = "api")]
    {
        eprintln!("  --serve                  Start the REST API server");
        eprintln!("  --port <u16>             API server port (default: from config)");
    }
    #[cfg(feature = "tui")]
    eprintln!("  --tui                    Launch the interactive terminal viewer");
    eprintln!("  --help                   Show this help message");
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        data_path: None,
        config_path: None,
        timestep: None,
        export_series: None,
        export_kind: None,
        export_out: None,
        #[cfg(feature = "api")]
        serve: false,
        #[cfg(feature = "api")]
        port: None,
        #[cfg(feature = "tui")]
        tui: false,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--data" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --data requires a path argument");
                    process::exit(1);
                }
                cli.data_path = Some(args[i].clone());
            }
            "--config" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --config requires a path argument");
                    process::exit(1);
                }
                cli.config_path = Some(args[i].clone());
            }
            "--timestep" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --timestep requires an index argument");
                    process::exit(1);
                }
                if let Ok(t) = args[i].parse::<usize>() {
                    cli.timestep = Some(t);
                } else {
                    eprintln!("error: --timestep value \"{}\" is not a valid index", args[i]);
                    process::exit(1);
                }
            }
            "--export-series" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --export-series requires an entity id argument");
                    process::exit(1);
                }
                cli.export_series = Some(args[i].clone());
            }
            "--kind" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --kind requires a kind argument");
                    process::exit(1);
                }
                match args[i].parse::<EntityKind>() {
                    Ok(kind) => cli.export_kind = Some(kind),
                    Err(()) => {
                        eprintln!(
                            "error: --kind value \"{}\" is not one of bus, generator, load, storage",
                            args[i]
                        );
                        process::exit(1);
                    }
                }
            }
            "--out" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --out requires a path argument");
                    process::exit(1);
                }
                cli.export_out = Some(args[i].clone());
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
                    cli.port = Some(p);
                } else {
                    eprintln!("error: --port value \"{}\" is not a valid u16", args[i]);
                    process::exit(1);
                }
            }
            #[cfg(feature = "tui")]
            "--tui" => {
                cli.tui = true;
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

fn main() {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = parse_args();

    // Load config: --config if given, defaults otherwise
    let config = if let Some(ref path) = cli.config_path {
        match ViewerConfig::from_toml_file(Path::new(path)) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else {
        ViewerConfig::default()
    };

    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    // Load the dataset. A load failure degrades to the empty network so
    // the viewer still comes up.
    let snapshot = match cli.data_path {
        Some(ref path) => match NetworkSnapshot::from_json_file(Path::new(path)) {
            Ok(snapshot) => {
                info!(
                    buses = snapshot.buses.len(),
                    lines = snapshot.transmission_lines.len(),
                    timesteps = snapshot.timestep_count(),
                    "loaded network document"
                );
                snapshot
            }
            Err(e) => {
                warn!(%e, "failed to load network document; rendering empty network");
                NetworkSnapshot::empty()
            }
        },
        None => {
            eprintln!("error: --data is required");
            print_help();
            process::exit(1);
        }
    };

    // Export path: query one entity, write CSV, done.
    if let Some(ref id) = cli.export_series {
        let Some(kind) = cli.export_kind else {
            eprintln!("error: --export-series requires --kind");
            process::exit(1);
        };
        let Some(ref out) = cli.export_out else {
            eprintln!("error: --export-series requires --out");
            process::exit(1);
        };
        let chart = match time_series(&snapshot, id, kind) {
            Ok(chart) => chart,
            Err(e) => {
                eprintln!("error: {e}");
                process::exit(1);
            }
        };
        if let Err(e) = export_csv(&chart, Path::new(out)) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("Series written to {out}");
        return;
    }

    let start_timestep = cli.timestep.unwrap_or(config.viewer.start_timestep);

    #[cfg(feature = "tui")]
    if cli.tui {
        gridviz::tui::run(snapshot, start_timestep);
        return;
    }

    #[cfg(feature = "api")]
    if cli.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let state = Arc::new(gridviz::api::AppState { snapshot });
        let port = cli.port.unwrap_or(config.server.port);
        let addr = SocketAddr::from(([0, 0, 0, 0], port));
        let rt = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
            eprintln!("error: failed to create tokio runtime: {e}");
            process::exit(1);
        });
        rt.block_on(gridviz::api::serve(state, addr));
        return;
    }

    // Default action: print the text render of the chosen timestep.
    let mut session = RenderSession::new();
    let view = session.build_initial(&snapshot, start_timestep);
    print!("{}", render_text(view));
}
