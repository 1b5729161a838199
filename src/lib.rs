//! ACS TSP Solver Library
//!
//! An Ant Colony System solver for the symmetric Traveling Salesman Problem
//! over named city networks.
//!
//! # Features
//!
//! - Tour construction with the pseudorandom proportional rule
//! - Local pheromone decay during construction, global elitist reinforcement
//! - Adaptive stopping: every improvement extends the iteration budget
//! - Distance-table loading, benchmarking and tour map rendering
//!
//! # Example
//!
//! ```no_run
//! use acs_tsp_solver::config::AcsConfig;
//! use acs_tsp_solver::graph::CityGraph;
//! use acs_tsp_solver::search::AcsSolver;
//!
//! // Load a semicolon-delimited distance matrix
//! let graph = CityGraph::from_csv_file("distances.csv").unwrap();
//!
//! // Solve with the default ACS parameters
//! let mut solver = AcsSolver::new(graph, AcsConfig::default());
//! let result = solver.run().unwrap();
//!
//! println!("Best tour length: {:.2}", result.tour.length());
//! println!("Found at iteration {} of {}", result.found_at, result.iterations);
//! ```

pub mod ant;
pub mod benchmark;
pub mod colony;
pub mod config;
pub mod error;
pub mod graph;
pub mod pheromone;
pub mod search;
pub mod tour;
pub mod visualization;

pub use config::AcsConfig;
pub use error::AcsError;
pub use graph::CityGraph;
pub use search::{AcsSolver, SearchResult};
pub use tour::Tour;
