//! Shared pheromone state over the undirected edges of a city network.
//!
//! Each edge has exactly one slot (canonical ordering via [`EdgeKey`]),
//! so `tau(i, j) == tau(j, i)` holds structurally. The model owns the
//! update parameters fixed at startup: `phi` for the local decay applied
//! while ants traverse edges, `rho` for the once-per-iteration global
//! evaporation and reinforcement.

use crate::error::AcsError;
use crate::graph::EdgeKey;

/// Mutable pheromone intensities, one per unordered edge.
#[derive(Debug, Clone)]
pub struct PheromoneModel {
    n: usize,
    tau0: f64,
    phi: f64,
    rho: f64,
    values: Vec<f64>,
}

impl PheromoneModel {
    /// Initialize every edge of an `n`-city complete graph to `tau0`.
    pub fn new(n: usize, tau0: f64, phi: f64, rho: f64) -> Self {
        PheromoneModel {
            n,
            tau0,
            phi,
            rho,
            values: vec![tau0; n * n.saturating_sub(1) / 2],
        }
    }

    fn slot(&self, i: usize, j: usize) -> Result<usize, AcsError> {
        let key = EdgeKey::new(i, j).ok_or(AcsError::UnknownEdge(i, j))?;
        let slot = key.slot();
        if slot >= self.values.len() {
            return Err(AcsError::UnknownEdge(i, j));
        }
        Ok(slot)
    }

    /// Current intensity on the edge between `i` and `j`, in either order.
    pub fn get(&self, i: usize, j: usize) -> Result<f64, AcsError> {
        Ok(self.values[self.slot(i, j)?])
    }

    /// Local update, applied immediately after an ant traverses an edge:
    /// `tau <- (1 - phi) * tau + phi * tau0`. Pulls the just-used edge back
    /// toward the initial level so other ants in the same iteration favor
    /// unexplored edges.
    pub fn local_update(&mut self, i: usize, j: usize) -> Result<(), AcsError> {
        let slot = self.slot(i, j)?;
        self.values[slot] = (1.0 - self.phi) * self.values[slot] + self.phi * self.tau0;
        Ok(())
    }

    /// Global update, once per iteration after all ants have finished:
    /// evaporate every edge by `(1 - rho)`, then reinforce only the edges of
    /// the iteration-best tour (closing edge included) by `rho / best_length`.
    pub fn global_update(&mut self, best_path: &[usize], best_length: f64) -> Result<(), AcsError> {
        for tau in &mut self.values {
            *tau *= 1.0 - self.rho;
        }

        let deposit = self.rho / best_length;
        for pair in best_path.windows(2) {
            let slot = self.slot(pair[0], pair[1])?;
            self.values[slot] += deposit;
        }
        if best_path.len() > 1 {
            let slot = self.slot(best_path[best_path.len() - 1], best_path[0])?;
            self.values[slot] += deposit;
        }
        Ok(())
    }

    /// Number of cities the model was sized for.
    pub fn num_cities(&self) -> usize {
        self.n
    }

    /// Raw intensities in canonical slot order, for inspection and tests.
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}
