//! Colony orchestration: one iteration of the Ant Colony System.
//!
//! The colony owns a fixed set of ants and the shared pheromone model.
//! Creating a colony already sends every ant out once, so the first
//! official iteration starts from a constructed population. Each iteration
//! is a hard barrier: all ants finish building before the iteration best is
//! selected and the global pheromone update runs.

use crate::ant::Ant;
use crate::config::AcsConfig;
use crate::error::AcsError;
use crate::graph::CityGraph;
use crate::pheromone::PheromoneModel;
use ordered_float::OrderedFloat;
use rand::Rng;

pub struct Colony {
    ants: Vec<Ant>,
    pheromone: PheromoneModel,
    origin: usize,
    iteration_best: usize,
}

impl Colony {
    /// Create the colony and run the initial construction pass.
    ///
    /// No global pheromone update happens at creation; that is reserved for
    /// [`Colony::run_iteration`].
    pub fn new<R: Rng>(
        config: &AcsConfig,
        graph: &CityGraph,
        origin: usize,
        rng: &mut R,
    ) -> Result<Self, AcsError> {
        let n = graph.num_cities();
        if origin >= n {
            return Err(AcsError::UnknownEdge(origin, origin));
        }
        let mut colony = Colony {
            ants: (0..config.num_ants).map(|_| Ant::new(n)).collect(),
            pheromone: PheromoneModel::new(n, config.tau0, config.phi, config.rho),
            origin,
            iteration_best: 0,
        };
        if colony.ants.is_empty() {
            return Err(AcsError::InvalidConfig(
                "colony size must be at least 1".to_string(),
            ));
        }
        colony.construct_all(graph, config, rng)?;
        colony.iteration_best = colony.find_best();
        Ok(colony)
    }

    fn construct_all<R: Rng>(
        &mut self,
        graph: &CityGraph,
        config: &AcsConfig,
        rng: &mut R,
    ) -> Result<(), AcsError> {
        // Sequential, in a fixed ant order: local pheromone updates
        // accumulate reproducibly for a given seed.
        for ant in &mut self.ants {
            ant.build_tour(graph, &mut self.pheromone, config, self.origin, rng)?;
        }
        Ok(())
    }

    /// Index of the ant with the shortest tour; ties keep the first found.
    fn find_best(&self) -> usize {
        self.ants
            .iter()
            .enumerate()
            .min_by_key(|(_, ant)| OrderedFloat(ant.length()))
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    /// Run one full iteration: every ant builds a tour, the iteration best
    /// is selected, and the global pheromone update reinforces it.
    pub fn run_iteration<R: Rng>(
        &mut self,
        graph: &CityGraph,
        config: &AcsConfig,
        rng: &mut R,
    ) -> Result<(), AcsError> {
        self.construct_all(graph, config, rng)?;
        self.iteration_best = self.find_best();
        let best = &self.ants[self.iteration_best];
        self.pheromone.global_update(best.path(), best.length())?;
        Ok(())
    }

    /// The current iteration-best ant.
    pub fn best(&self) -> &Ant {
        &self.ants[self.iteration_best]
    }

    pub fn num_ants(&self) -> usize {
        self.ants.len()
    }

    pub fn pheromone(&self) -> &PheromoneModel {
        &self.pheromone
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

    fn config() -> AcsConfig {
        AcsConfig {
            num_ants: 5,
            max_iter: 3,
            ..Default::default()
        }
    }

    #[test]
    fn test_creation_runs_initial_construction() {
        let graph = square_graph();
        let config = config();
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);

        let colony = Colony::new(&config, &graph, 0, &mut rng).unwrap();
        assert_eq!(colony.num_ants(), 5);
        // every ant already holds a complete tour
        let best = colony.best();
        assert!(best.to_tour().is_permutation(4));
        assert!(best.length().is_finite());
    }

    #[test]
    fn test_iteration_best_keeps_first_on_ties() {
        let graph = square_graph();
        // full exploitation makes every ant follow the same greedy tour
        let config = AcsConfig {
            q0: 1.0,
            beta: 2.0,
            num_ants: 4,
            ..config()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);

        let mut colony = Colony::new(&config, &graph, 0, &mut rng).unwrap();
        colony.run_iteration(&graph, &config, &mut rng).unwrap();
        assert_eq!(colony.iteration_best, 0);
    }

    #[test]
    fn test_iteration_reinforces_best_tour_edges() {
        let graph = square_graph();
        let config = AcsConfig {
            q0: 1.0,
            beta: 2.0,
            num_ants: 2,
            ..config()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);

        let mut colony = Colony::new(&config, &graph, 0, &mut rng).unwrap();
        colony.run_iteration(&graph, &config, &mut rng).unwrap();

        let best_path: Vec<usize> = colony.best().path().to_vec();
        let mut off_tour = f64::NEG_INFINITY;
        let mut on_tour = f64::INFINITY;
        for i in 0..4 {
            for j in (i + 1)..4 {
                let tau = colony.pheromone().get(i, j).unwrap();
                let on_best = best_path
                    .windows(2)
                    .any(|w| (w[0] == i && w[1] == j) || (w[0] == j && w[1] == i))
                    || (best_path[0] == i && best_path[3] == j)
                    || (best_path[0] == j && best_path[3] == i);
                if on_best {
                    on_tour = on_tour.min(tau);
                } else {
                    off_tour = off_tour.max(tau);
                }
            }
        }
        assert!(on_tour > off_tour);
    }

    #[test]
    fn test_same_seed_reproduces_tours_and_pheromone() {
        let graph = square_graph();
        let config = AcsConfig {
            q0: 1.0,
            beta: 2.0,
            ..config()
        };

        let mut rng_a = ChaCha8Rng::seed_from_u64(123);
        let mut rng_b = ChaCha8Rng::seed_from_u64(123);
        let mut colony_a = Colony::new(&config, &graph, 0, &mut rng_a).unwrap();
        let mut colony_b = Colony::new(&config, &graph, 0, &mut rng_b).unwrap();

        for _ in 0..3 {
            colony_a.run_iteration(&graph, &config, &mut rng_a).unwrap();
            colony_b.run_iteration(&graph, &config, &mut rng_b).unwrap();
        }

        assert_eq!(colony_a.best().path(), colony_b.best().path());
        assert_eq!(colony_a.pheromone().values(), colony_b.pheromone().values());
    }
}
