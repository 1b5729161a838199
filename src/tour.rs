//! Tour representation.
//!
//! A [`Tour`] owns its city sequence, so promoting an ant's tour to best
//! status deep-copies it and later mutation of the ant cannot corrupt the
//! stored best.

use crate::error::AcsError;
use crate::graph::CityGraph;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A closed tour: every city exactly once, implicitly returning to the
/// first city. `length` includes the closing edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tour {
    path: Vec<usize>,
    length: f64,
}

impl Tour {
    pub fn new(path: Vec<usize>, length: f64) -> Self {
        Tour { path, length }
    }

    /// The ordered city sequence (not repeated at the end).
    pub fn path(&self) -> &[usize] {
        &self.path
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    /// True when the tour visits each of `n` cities exactly once.
    pub fn is_permutation(&self, n: usize) -> bool {
        if self.path.len() != n {
            return false;
        }
        let unique: HashSet<usize> = self.path.iter().cloned().collect();
        unique.len() == n && self.path.iter().all(|&c| c < n)
    }

    /// Recompute the closed length from the graph, independent of the
    /// length accumulated during construction.
    pub fn recompute_length(&self, graph: &CityGraph) -> Result<f64, AcsError> {
        graph.tour_length(&self.path)
    }

    /// City names along the tour, in visiting order.
    pub fn city_names<'a>(&self, graph: &'a CityGraph) -> Vec<&'a str> {
        self.path.iter().map(|&c| graph.city(c)).collect()
    }
}

impl std::fmt::Display for Tour {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Tour (length {:.2})", self.length)?;
        writeln!(f, "  {:?}", self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permutation_check() {
        let tour = Tour::new(vec![0, 2, 1, 3], 4.0);
        assert!(tour.is_permutation(4));
        assert!(!tour.is_permutation(5));

        let repeated = Tour::new(vec![0, 2, 2, 3], 4.0);
        assert!(!repeated.is_permutation(4));

        let out_of_range = Tour::new(vec![0, 1, 2, 7], 4.0);
        assert!(!out_of_range.is_permutation(4));
    }

    #[test]
    fn test_recompute_matches_graph() {
        let graph = CityGraph::from_matrix(
            vec!["A".to_string(), "B".to_string(), "C".to_string()],
            vec![
                vec![0.0, 3.0, 4.0],
                vec![3.0, 0.0, 5.0],
                vec![4.0, 5.0, 0.0],
            ],
        )
        .unwrap();

        let tour = Tour::new(vec![0, 1, 2], 12.0);
        assert!((tour.recompute_length(&graph).unwrap() - 12.0).abs() < 1e-12);
        assert_eq!(tour.city_names(&graph), vec!["A", "B", "C"]);
    }
}
