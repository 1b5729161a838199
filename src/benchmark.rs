//! Repeated-run experiments over a city network.
//!
//! Runs the solver across a range of seeds, collects per-run records and
//! aggregate statistics, and exports results as CSV or a text report.
//! Runs execute in parallel; each run owns its solver, colony and pheromone
//! table, so no search state is shared between threads.

use crate::config::AcsConfig;
use crate::error::AcsError;
use crate::graph::CityGraph;
use crate::search::AcsSolver;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::fs::File;
use std::path::Path;

/// Result of a single solver run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    pub seed: u64,
    pub length: f64,
    pub found_at: usize,
    pub iterations: usize,
    pub time: f64,
}

/// Aggregated statistics over all runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunStatistics {
    pub runs: usize,
    pub best: f64,
    pub worst: f64,
    pub mean: f64,
    pub std_dev: f64,
    pub mean_time: f64,
    pub mean_iterations: f64,
}

/// Benchmarking engine
pub struct Benchmark {
    config: AcsConfig,
    records: Vec<RunRecord>,
}

impl Benchmark {
    pub fn new(config: AcsConfig) -> Self {
        Benchmark {
            config,
            records: Vec::new(),
        }
    }

    /// Run the solver `num_runs` times with consecutive seeds, in parallel.
    /// `on_run` is invoked as each run finishes (progress reporting).
    pub fn run<F>(&mut self, graph: &CityGraph, num_runs: usize, on_run: F) -> Result<(), AcsError>
    where
        F: Fn(&RunRecord) + Sync,
    {
        if num_runs == 0 {
            return Err(AcsError::InvalidConfig(
                "benchmark needs at least one run".to_string(),
            ));
        }
        self.config.validate()?;

        let records: Result<Vec<RunRecord>, AcsError> = (0..num_runs as u64)
            .into_par_iter()
            .map(|run| {
                let mut config = self.config.clone();
                config.seed = self.config.seed.wrapping_add(run);
                let seed = config.seed;
                let mut solver = AcsSolver::new(graph.clone(), config);
                let result = solver.run()?;
                let record = RunRecord {
                    seed,
                    length: result.tour.length(),
                    found_at: result.found_at,
                    iterations: result.iterations,
                    time: result.computation_time,
                };
                on_run(&record);
                Ok(record)
            })
            .collect();

        self.records = records?;
        Ok(())
    }

    pub fn records(&self) -> &[RunRecord] {
        &self.records
    }

    /// Aggregate statistics; `None` until runs have been recorded.
    pub fn statistics(&self) -> Option<RunStatistics> {
        if self.records.is_empty() {
            return None;
        }

        let lengths: Vec<f64> = self.records.iter().map(|r| r.length).collect();
        let best = lengths.iter().cloned().fold(f64::INFINITY, f64::min);
        let worst = lengths.iter().cloned().fold(0.0, f64::max);
        let mean = lengths.iter().mean();
        let std_dev = if lengths.len() > 1 {
            lengths.iter().std_dev()
        } else {
            0.0
        };
        let mean_time =
            self.records.iter().map(|r| r.time).sum::<f64>() / self.records.len() as f64;
        let mean_iterations = self.records.iter().map(|r| r.iterations as f64).sum::<f64>()
            / self.records.len() as f64;

        Some(RunStatistics {
            runs: self.records.len(),
            best,
            worst,
            mean,
            std_dev,
            mean_time,
            mean_iterations,
        })
    }

    /// Export per-run records as CSV.
    pub fn export_csv<P: AsRef<Path>>(&self, path: P) -> Result<(), AcsError> {
        let file = File::create(path)?;
        let mut writer = csv::Writer::from_writer(file);
        for record in &self.records {
            writer.serialize(record)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Human-readable summary of the experiment.
    pub fn generate_report(&self, graph: &CityGraph) -> String {
        let mut report = String::new();
        report.push_str(&format!(
            "ACS benchmark report - {}\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        ));
        report.push_str(&format!(
            "Cities: {} ({} edges)\n",
            graph.num_cities(),
            graph.num_edges()
        ));
        report.push_str(&format!(
            "Parameters: alpha={} beta={} q0={} phi={} rho={} tau0={} ants={} max_iter={}\n",
            self.config.alpha,
            self.config.beta,
            self.config.q0,
            self.config.phi,
            self.config.rho,
            self.config.tau0,
            self.config.num_ants,
            self.config.max_iter
        ));

        match self.statistics() {
            Some(stats) => {
                report.push_str(&format!("Runs: {}\n", stats.runs));
                report.push_str(&format!("Best length: {:.2}\n", stats.best));
                report.push_str(&format!(
                    "Mean length: {:.2} (std dev {:.2})\n",
                    stats.mean, stats.std_dev
                ));
                report.push_str(&format!("Worst length: {:.2}\n", stats.worst));
                report.push_str(&format!("Mean iterations: {:.1}\n", stats.mean_iterations));
                report.push_str(&format!("Mean time: {:.4}s\n", stats.mean_time));
            }
            None => report.push_str("No runs recorded\n"),
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_graph() -> CityGraph {
        let d = 2.0f64.sqrt();
        CityGraph::from_matrix(
            vec![
                "A".to_string(),
                "B".to_string(),
                "C".to_string(),
                "D".to_string(),
            ],
            vec![
                vec![0.0, 1.0, d, 1.0],
                vec![1.0, 0.0, 1.0, d],
                vec![d, 1.0, 0.0, 1.0],
                vec![1.0, d, 1.0, 0.0],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_benchmark_collects_all_runs() {
        let config = AcsConfig {
            num_ants: 3,
            max_iter: 2,
            ..Default::default()
        };
        let mut bench = Benchmark::new(config);
        bench.run(&square_graph(), 4, |_| {}).unwrap();

        assert_eq!(bench.records().len(), 4);
        // rayon preserves input order: seeds are consecutive from the base
        let seeds: Vec<u64> = bench.records().iter().map(|r| r.seed).collect();
        assert_eq!(seeds, vec![42, 43, 44, 45]);

        let stats = bench.statistics().unwrap();
        assert_eq!(stats.runs, 4);
        assert!(stats.best <= stats.mean);
        assert!(stats.mean <= stats.worst);
        assert!(stats.best >= 4.0 - 1e-9);

        let report = bench.generate_report(&square_graph());
        assert!(report.contains("Runs: 4"));
    }

    #[test]
    fn test_benchmark_rejects_zero_runs() {
        let mut bench = Benchmark::new(AcsConfig::default());
        assert!(bench.run(&square_graph(), 0, |_| {}).is_err());
    }
}
