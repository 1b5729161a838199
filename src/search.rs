//! Search driver with the adaptive stopping policy.
//!
//! The controller runs colony iterations against a budget that starts at
//! `max_iter` and grows by `max_iter` every time the global best improves,
//! so the search keeps going exactly as long as it keeps paying off.

use crate::colony::Colony;
use crate::config::AcsConfig;
use crate::error::AcsError;
use crate::graph::CityGraph;
use crate::tour::Tour;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Ant Colony System solver
pub struct AcsSolver {
    config: AcsConfig,
    graph: CityGraph,
}

/// Outcome of a search run, detached from any colony state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// Best tour ever found (owned copy).
    pub tour: Tour,
    /// Iteration at which the best tour was found; 0 means the initial
    /// construction pass at colony creation.
    pub found_at: usize,
    /// Total iterations run.
    pub iterations: usize,
    /// Number of strict improvements over the run.
    pub improvements: usize,
    /// Wall-clock time in seconds.
    pub computation_time: f64,
}

impl AcsSolver {
    pub fn new(graph: CityGraph, config: AcsConfig) -> Self {
        AcsSolver { config, graph }
    }

    pub fn graph(&self) -> &CityGraph {
        &self.graph
    }

    pub fn config(&self) -> &AcsConfig {
        &self.config
    }

    /// Run the adaptive search loop to completion.
    pub fn run(&mut self) -> Result<SearchResult, AcsError> {
        self.config.validate()?;
        let origin = match &self.config.origin {
            Some(name) => self
                .graph
                .city_index(name)
                .ok_or_else(|| AcsError::UnknownCity(name.clone()))?,
            None => 0,
        };

        let start = Instant::now();
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        let mut colony = Colony::new(&self.config, &self.graph, origin, &mut rng)?;

        let mut best = colony.best().to_tour();
        let mut found_at = 0;
        let mut improvements = 0;
        let mut iteration = 1;
        let mut budget = self.config.max_iter;

        while iteration <= budget {
            colony.run_iteration(&self.graph, &self.config, &mut rng)?;
            let iteration_best = colony.best();
            log::debug!(
                "iteration {}: best tour {:.2} (global best {:.2})",
                iteration,
                iteration_best.length(),
                best.length()
            );
            if iteration_best.length() < best.length() {
                best = iteration_best.to_tour();
                found_at = iteration;
                improvements += 1;
                budget += self.config.max_iter;
                log::info!(
                    "improved to {:.2} at iteration {}, budget extended to {}",
                    best.length(),
                    iteration,
                    budget
                );
            }
            iteration += 1;
        }

        Ok(SearchResult {
            tour: best,
            found_at,
            iterations: iteration - 1,
            improvements,
            computation_time: start.elapsed().as_secs_f64(),
        })
    }
}
