//! fast-route command line.
//!
//! Builds a router from a TOML route file and inspects, queries or
//! benchmarks it.
//!
//! ```text
//!   routes.toml ──▶ config::loader ──▶ Router::from_config ──▶ resolve(path)
//!                        ▲                                         │
//!                        └──────── watcher (rebuild on change) ◀───┘
//! ```

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand};

use fast_route::config::{load_config, watcher::ConfigWatcher, RouteFile};
use fast_route::observability::logging;
use fast_route::routing::{Router, SharedRouter};

#[derive(Parser)]
#[command(name = "fast-route")]
#[command(about = "Build and query prefix-tree accelerated route tables", long_about = None)]
struct Cli {
    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    /// Debug-level logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the compacted tree and build counters
    Inspect { file: PathBuf },
    /// Resolve paths and print each match as JSON
    Resolve {
        file: PathBuf,
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// Compare flat and accelerated resolution time
    Bench {
        file: PathBuf,
        #[arg(required = true)]
        paths: Vec<String>,
        #[arg(short = 'n', long, default_value_t = 10_000)]
        iterations: usize,
    },
    /// Rebuild the router whenever the file changes, re-resolving any given paths
    Watch { file: PathBuf, paths: Vec<String> },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init(cli.json_logs, cli.verbose);

    match cli.command {
        Commands::Inspect { file } => {
            let config = load(&file)?;
            let mut accelerated = config.clone();
            accelerated.router.accelerate = true;
            let router = Router::from_config(&accelerated)?;
            if let Some(report) = router.report() {
                print!("{}", report);
            }
        }
        Commands::Resolve { file, paths } => {
            let router = Router::from_config(&load(&file)?)?;
            for path in &paths {
                match router.resolve(path) {
                    Some(m) => println!("{} => {}", path, serde_json::to_string_pretty(&m)?),
                    None => println!("{} => no match", path),
                }
            }
        }
        Commands::Bench {
            file,
            paths,
            iterations,
        } => {
            let config = load(&file)?;
            let entries = config.entries()?;
            let naive = Router::naive_with_root(&config.router.root, entries.clone())?;
            let fast = Router::accelerated_with_root(&config.router.root, entries)?;

            for path in &paths {
                if naive.resolve(path) != fast.resolve(path) {
                    tracing::warn!(path = %path, "Flat and accelerated routers disagree");
                }
            }

            let naive_time = time_resolution(&naive, &paths, iterations);
            let fast_time = time_resolution(&fast, &paths, iterations);
            println!("flat:        {:?}", naive_time);
            println!("accelerated: {:?}", fast_time);
            if !fast_time.is_zero() {
                println!("speedup:     {:.2}x", naive_time.as_secs_f64() / fast_time.as_secs_f64());
            }
        }
        Commands::Watch { file, paths } => {
            let shared = SharedRouter::new(Router::from_config(&load(&file)?)?);
            log_resolutions(&shared, &paths);
            let (watcher, mut updates) = ConfigWatcher::new(&file);
            let _handle = watcher.run()?;

            loop {
                tokio::select! {
                    Some(config) = updates.recv() => match Router::from_config(&config) {
                        Ok(router) => {
                            if let Some(report) = router.report() {
                                tracing::info!(
                                    top_level = report.top_level,
                                    total_rules = report.total_rules,
                                    "Router rebuilt"
                                );
                            }
                            shared.replace(router);
                            log_resolutions(&shared, &paths);
                        }
                        Err(e) => tracing::error!(error = %e, "Rebuild failed, keeping current router"),
                    },
                    _ = tokio::signal::ctrl_c() => break,
                }
            }
            tracing::info!("Shutdown complete");
        }
    }

    Ok(())
}

fn load(file: &Path) -> Result<RouteFile, Box<dyn std::error::Error>> {
    let config = load_config(file)?;
    tracing::info!(
        path = %file.display(),
        routes = config.routes.len(),
        accelerate = config.router.accelerate,
        "Route file loaded"
    );
    Ok(config)
}

fn log_resolutions(router: &SharedRouter, paths: &[String]) {
    for path in paths {
        match router.resolve(path) {
            Some(m) => tracing::info!(path = %path, handler = %m.handler, "Resolved"),
            None => tracing::info!(path = %path, "No match"),
        }
    }
}

fn time_resolution(router: &Router, paths: &[String], iterations: usize) -> Duration {
    let start = Instant::now();
    for _ in 0..iterations {
        for path in paths {
            std::hint::black_box(router.resolve(path));
        }
    }
    start.elapsed()
}
