//! Tour construction by a single ant.
//!
//! An ant repeatedly applies the pseudorandom proportional rule: with
//! probability `q0` it exploits the most attractive candidate, otherwise it
//! samples one proportionally to attractiveness. Every traversed edge gets
//! an immediate local pheromone update, including the edge that closes the
//! tour. Ants are reset between iterations, not recreated.

use crate::config::AcsConfig;
use crate::error::AcsError;
use crate::graph::CityGraph;
use crate::pheromone::PheromoneModel;
use crate::tour::Tour;
use rand::Rng;

/// One worker of the colony, holding its current tour and length.
#[derive(Debug, Clone)]
pub struct Ant {
    path: Vec<usize>,
    length: f64,
    visited: Vec<bool>,
}

impl Ant {
    pub fn new(num_cities: usize) -> Self {
        Ant {
            path: Vec::with_capacity(num_cities),
            length: 0.0,
            visited: vec![false; num_cities],
        }
    }

    /// The current tour's city sequence.
    pub fn path(&self) -> &[usize] {
        &self.path
    }

    /// The current tour's closed length.
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Deep-copy the current tour, detaching it from this ant.
    pub fn to_tour(&self) -> Tour {
        Tour::new(self.path.clone(), self.length)
    }

    fn reset(&mut self, origin: usize) {
        self.path.clear();
        self.visited.fill(false);
        self.path.push(origin);
        self.visited[origin] = true;
        self.length = 0.0;
    }

    /// Build a complete closed tour from `origin`, updating pheromone
    /// locally after every traversed edge.
    pub fn build_tour<R: Rng>(
        &mut self,
        graph: &CityGraph,
        pheromone: &mut PheromoneModel,
        config: &AcsConfig,
        origin: usize,
        rng: &mut R,
    ) -> Result<(), AcsError> {
        let n = graph.num_cities();
        self.reset(origin);

        let mut current = origin;
        for _ in 1..n {
            let next = self.select_next(graph, pheromone, config, current, rng)?;
            self.path.push(next);
            self.visited[next] = true;
            self.length += graph.distance(current, next)?;
            pheromone.local_update(current, next)?;
            current = next;
        }

        // close the cycle back to the origin
        self.length += graph.distance(current, origin)?;
        pheromone.local_update(current, origin)?;
        Ok(())
    }

    /// Pseudorandom proportional rule over the unvisited cities.
    fn select_next<R: Rng>(
        &self,
        graph: &CityGraph,
        pheromone: &PheromoneModel,
        config: &AcsConfig,
        current: usize,
        rng: &mut R,
    ) -> Result<usize, AcsError> {
        let mut candidates: Vec<(usize, f64)> = Vec::new();
        for city in 0..graph.num_cities() {
            if self.visited[city] {
                continue;
            }
            let tau = pheromone.get(current, city)?;
            let dist = graph.distance(current, city)?;
            let weight = tau.powf(config.alpha) * dist.powf(-config.beta);
            candidates.push((city, weight));
        }

        if candidates.is_empty() {
            return Err(AcsError::NoCandidates {
                visited: self.path.len(),
                cities: graph.num_cities(),
            });
        }

        let total: f64 = candidates.iter().map(|&(_, w)| w).sum();
        if !total.is_finite() || total <= 0.0 {
            // All weights collapsed to zero or overflowed; fall back to a
            // uniform draw over the remaining candidates instead of aborting.
            log::warn!(
                "degenerate attractiveness distribution at '{}' ({} candidates), choosing uniformly",
                graph.city(current),
                candidates.len()
            );
            let pick = rng.gen_range(0..candidates.len());
            return Ok(candidates[pick].0);
        }

        if rng.gen::<f64>() < config.q0 {
            // Exploit: ties keep the first candidate in enumeration order.
            let mut best = candidates[0];
            for &(city, weight) in &candidates[1..] {
                if weight > best.1 {
                    best = (city, weight);
                }
            }
            Ok(best.0)
        } else {
            // Explore: roulette wheel over the weights.
            let mut pick = rng.gen::<f64>() * total;
            for &(city, weight) in &candidates {
                pick -= weight;
                if pick <= 0.0 {
                    return Ok(city);
                }
            }
            Ok(candidates[candidates.len() - 1].0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::prelude::*;
    use rand_chacha::ChaCha8Rng;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    /// Unit square: A(0,0), B(1,0), C(1,1), D(0,1).
    fn square_graph() -> CityGraph {
        let d = 2.0f64.sqrt();
        CityGraph::from_matrix(
            names(&["A", "B", "C", "D"]),
            vec![
                vec![0.0, 1.0, d, 1.0],
                vec![1.0, 0.0, 1.0, d],
                vec![d, 1.0, 0.0, 1.0],
                vec![1.0, d, 1.0, 0.0],
            ],
        )
        .unwrap()
    }

    fn greedy_config() -> AcsConfig {
        AcsConfig {
            alpha: 1.0,
            beta: 2.0,
            q0: 1.0,
            phi: 0.1,
            rho: 0.1,
            tau0: 0.01,
            num_ants: 1,
            max_iter: 1,
            origin: None,
            seed: 42,
        }
    }

    #[test]
    fn test_greedy_ant_takes_the_perimeter() {
        let graph = square_graph();
        let config = greedy_config();
        let mut pheromone = PheromoneModel::new(4, config.tau0, config.phi, config.rho);
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);

        let mut ant = Ant::new(4);
        ant.build_tour(&graph, &mut pheromone, &config, 0, &mut rng)
            .unwrap();

        // unit sides beat the crossed diagonals (2 + 2*sqrt(2))
        assert!((ant.length() - 4.0).abs() < 1e-12);
        assert!(ant.to_tour().is_permutation(4));
    }

    #[test]
    fn test_tour_is_permutation_and_length_matches() {
        let graph = square_graph();
        let config = AcsConfig {
            q0: 0.5,
            ..greedy_config()
        };
        let mut pheromone = PheromoneModel::new(4, config.tau0, config.phi, config.rho);
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        let mut ant = Ant::new(4);
        for _ in 0..20 {
            ant.build_tour(&graph, &mut pheromone, &config, 0, &mut rng)
                .unwrap();
            let tour = ant.to_tour();
            assert!(tour.is_permutation(4));
            assert_eq!(tour.path()[0], 0);
            let recomputed = tour.recompute_length(&graph).unwrap();
            assert!((tour.length() - recomputed).abs() < 1e-9);
        }
    }

    #[test]
    fn test_local_update_applied_along_the_way() {
        let graph = square_graph();
        let config = greedy_config();
        let mut pheromone = PheromoneModel::new(4, config.tau0, config.phi, config.rho);
        // push one edge above tau0 so construction decays it
        pheromone.global_update(&[0, 1, 2, 3], 1.0).unwrap();
        let before = pheromone.get(0, 1).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);

        let mut ant = Ant::new(4);
        ant.build_tour(&graph, &mut pheromone, &config, 0, &mut rng)
            .unwrap();

        // the greedy perimeter tour traverses (0, 1); its pheromone decayed
        assert!(pheromone.get(0, 1).unwrap() < before);
    }

    #[test]
    fn test_degenerate_weights_fall_back_to_uniform() {
        // distances so large that dist^(-beta) underflows to zero
        let graph = CityGraph::from_matrix(
            names(&["A", "B", "C"]),
            vec![
                vec![0.0, 1e300, 1e300],
                vec![1e300, 0.0, 1e300],
                vec![1e300, 1e300, 0.0],
            ],
        )
        .unwrap();
        let config = AcsConfig {
            beta: 2.0,
            ..greedy_config()
        };
        let mut pheromone = PheromoneModel::new(3, config.tau0, config.phi, config.rho);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let mut ant = Ant::new(3);
        ant.build_tour(&graph, &mut pheromone, &config, 0, &mut rng)
            .unwrap();
        assert!(ant.to_tour().is_permutation(3));
    }
}
