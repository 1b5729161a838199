//! ACS TSP Solver - Command Line Interface

use acs_tsp_solver::benchmark::Benchmark;
use acs_tsp_solver::config::AcsConfig;
use acs_tsp_solver::graph::CityGraph;
use acs_tsp_solver::search::AcsSolver;
use acs_tsp_solver::visualization::{GeoTable, TourMap};

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "acs-tsp-solver")]
#[command(version = "1.0")]
#[command(about = "An Ant Colony System solver for the symmetric TSP")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a distance table with the ACS engine
    Solve {
        /// Semicolon-delimited distance matrix (header and index column of city names)
        #[arg(short, long)]
        distances: PathBuf,

        /// Origin city (defaults to the first city of the table)
        #[arg(long)]
        origin: Option<String>,

        /// Pheromone importance
        #[arg(long, default_value = "1.0")]
        alpha: f64,

        /// Inverse-distance importance
        #[arg(long, default_value = "1.0")]
        beta: f64,

        /// Exploitation probability of the pseudorandom proportional rule
        #[arg(long, default_value = "0.5")]
        q0: f64,

        /// Local pheromone decay coefficient
        #[arg(long, default_value = "0.4")]
        phi: f64,

        /// Global evaporation rate
        #[arg(long, default_value = "0.3")]
        rho: f64,

        /// Initial pheromone level
        #[arg(long, default_value = "0.01")]
        tau0: f64,

        /// Number of ants
        #[arg(long, default_value = "50")]
        ants: usize,

        /// Base iteration budget (extended on every improvement)
        #[arg(long, default_value = "15")]
        max_iter: usize,

        /// Random seed
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Write the result as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// City coordinate table (city;latitude;longitude) for map rendering
        #[arg(long)]
        coordinates: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print statistics about a distance table
    Analyze {
        /// Semicolon-delimited distance matrix
        #[arg(short, long)]
        distances: PathBuf,
    },

    /// Run repeated solver runs over consecutive seeds
    Benchmark {
        /// Semicolon-delimited distance matrix
        #[arg(short, long)]
        distances: PathBuf,

        /// Number of runs
        #[arg(short, long, default_value = "10")]
        runs: usize,

        /// Base random seed
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Origin city (defaults to the first city of the table)
        #[arg(long)]
        origin: Option<String>,

        /// Write per-run records as CSV
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Solve {
            distances,
            origin,
            alpha,
            beta,
            q0,
            phi,
            rho,
            tau0,
            ants,
            max_iter,
            seed,
            output,
            coordinates,
            verbose,
        } => {
            let config = AcsConfig {
                alpha,
                beta,
                q0,
                phi,
                rho,
                tau0,
                num_ants: ants,
                max_iter,
                origin,
                seed,
            };
            solve_table(&distances, config, output, coordinates, verbose);
        }

        Commands::Analyze { distances } => {
            analyze_table(&distances);
        }

        Commands::Benchmark {
            distances,
            runs,
            seed,
            origin,
            output,
        } => {
            let config = AcsConfig {
                seed,
                origin,
                ..Default::default()
            };
            run_benchmark(&distances, config, runs, output);
        }
    }
}

fn load_graph(path: &PathBuf) -> CityGraph {
    match CityGraph::from_csv_file(path) {
        Ok(graph) => graph,
        Err(e) => {
            eprintln!("Error loading distance table: {}", e);
            std::process::exit(1);
        }
    }
}

fn solve_table(
    path: &PathBuf,
    config: AcsConfig,
    output: Option<PathBuf>,
    coordinates: Option<PathBuf>,
    verbose: bool,
) {
    println!("Loading distance table from {:?}...", path);
    let graph = load_graph(path);

    if verbose {
        println!("{}", graph.statistics());
    }

    println!(
        "Solving with {} ants, base budget {} iterations...",
        config.num_ants, config.max_iter
    );

    let mut solver = AcsSolver::new(graph, config);
    let result = match solver.run() {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Solver error: {}", e);
            std::process::exit(1);
        }
    };
    let graph = solver.graph();

    println!("\n========== Results ==========");
    println!("Best length: {:.2}", result.tour.length());
    println!("Found at iteration: {}", result.found_at);
    println!(
        "Iterations run: {} ({} improvements)",
        result.iterations, result.improvements
    );
    println!("Time: {:.4}s", result.computation_time);

    let names = result.tour.city_names(graph);
    println!("Tour: {} -> {}", names.join(" -> "), names[0]);

    if let Some(out_path) = output {
        let json = serde_json::to_string_pretty(&result).unwrap();
        std::fs::write(&out_path, json).expect("Failed to write output");
        println!("\nResult saved to {:?}", out_path);
    }

    if let Some(coord_path) = coordinates {
        let geo = match GeoTable::from_csv_file(&coord_path) {
            Ok(geo) => geo,
            Err(e) => {
                eprintln!("Error loading coordinate table: {}", e);
                std::process::exit(1);
            }
        };

        let map = TourMap::new();
        let svg = match map.generate_svg(graph, &result.tour, &geo) {
            Ok(svg) => svg,
            Err(e) => {
                eprintln!("Error rendering tour map: {}", e);
                std::process::exit(1);
            }
        };

        let png_path = path.with_extension("png");
        match map.save_png(&svg, &png_path) {
            Ok(()) => println!("Tour map saved to {:?}", png_path),
            Err(e) => {
                // fallback: write SVG if PNG conversion failed
                let svg_path = path.with_extension("svg");
                map.save_svg(&svg, &svg_path).expect("Failed to save SVG");
                println!("PNG conversion failed ({}). Saved SVG to {:?}", e, svg_path);
            }
        }
    }
}

fn analyze_table(path: &PathBuf) {
    let graph = load_graph(path);

    println!("========== Distance Table Analysis ==========\n");
    println!("{}", graph.statistics());

    println!("Cities:");
    for (i, name) in graph.cities().iter().enumerate() {
        println!("  [{}] {}", i, name);
    }
}

fn run_benchmark(path: &PathBuf, config: AcsConfig, runs: usize, output: Option<PathBuf>) {
    let graph = load_graph(path);

    println!(
        "Benchmarking {} runs on {} cities...",
        runs,
        graph.num_cities()
    );

    let bar = ProgressBar::new(runs as u64);
    bar.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} runs ({elapsed})")
            .expect("valid progress template"),
    );

    let mut benchmark = Benchmark::new(config);
    if let Err(e) = benchmark.run(&graph, runs, |_| bar.inc(1)) {
        bar.finish_and_clear();
        eprintln!("Benchmark error: {}", e);
        std::process::exit(1);
    }
    bar.finish_and_clear();

    println!("\n{}", benchmark.generate_report(&graph));

    if let Some(out_path) = output {
        match benchmark.export_csv(&out_path) {
            Ok(()) => println!("Records exported to {:?}", out_path),
            Err(e) => {
                eprintln!("Failed to export records: {}", e);
                std::process::exit(1);
            }
        }
    }
}
