//! Module for loading and representing symmetric city networks.
//!
//! Distances are stored once per unordered city pair: an [`EdgeKey`] orders
//! its endpoints so that every edge has exactly one storage slot and lookup
//! is direction-independent. The loader accepts the semicolon-delimited
//! distance-matrix format (header row of city names, index column of city
//! names) and validates completeness, symmetry and positivity up front.

use crate::error::AcsError;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Symmetry tolerance when ingesting a full matrix.
const SYMMETRY_EPS: f64 = 1e-9;

/// Canonical key for an undirected edge: smaller city index first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeKey {
    a: usize,
    b: usize,
}

impl EdgeKey {
    /// Build a key from two distinct city indices, in either order.
    /// Returns `None` for self-loops.
    pub fn new(i: usize, j: usize) -> Option<Self> {
        if i == j {
            return None;
        }
        let (a, b) = if i < j { (i, j) } else { (j, i) };
        Some(EdgeKey { a, b })
    }

    /// The endpoints in canonical order.
    pub fn endpoints(&self) -> (usize, usize) {
        (self.a, self.b)
    }

    /// Slot in a lower-triangular layout. Independent of graph size; the
    /// caller bound-checks against its own storage length.
    pub(crate) fn slot(&self) -> usize {
        self.b * (self.b - 1) / 2 + self.a
    }
}

/// An immutable, complete, symmetric weighted graph over a fixed city set.
///
/// Safe for concurrent reads; never mutated after construction.
#[derive(Debug, Clone)]
pub struct CityGraph {
    cities: Vec<String>,
    index: HashMap<String, usize>,
    /// One distance per unordered pair, in `EdgeKey::slot` order.
    distances: Vec<f64>,
}

impl CityGraph {
    /// Build a graph from city names and a full `n x n` distance matrix.
    ///
    /// The matrix must be square, symmetric within tolerance, and strictly
    /// positive off the diagonal. The diagonal is ignored.
    pub fn from_matrix(cities: Vec<String>, matrix: Vec<Vec<f64>>) -> Result<Self, AcsError> {
        let n = cities.len();
        if n < 2 {
            return Err(AcsError::InvalidGraph(
                "a tour needs at least two cities".to_string(),
            ));
        }
        if matrix.len() != n {
            return Err(AcsError::InvalidGraph(format!(
                "distance matrix has {} rows for {} cities",
                matrix.len(),
                n
            )));
        }

        let mut index = HashMap::with_capacity(n);
        for (i, name) in cities.iter().enumerate() {
            if index.insert(name.clone(), i).is_some() {
                return Err(AcsError::InvalidGraph(format!("duplicate city '{}'", name)));
            }
        }

        let mut distances = vec![0.0; n * (n - 1) / 2];
        for (i, row) in matrix.iter().enumerate() {
            if row.len() != n {
                return Err(AcsError::InvalidGraph(format!(
                    "row for '{}' has {} entries, expected {}",
                    cities[i],
                    row.len(),
                    n
                )));
            }
            for (j, &d) in row.iter().enumerate().skip(i + 1) {
                if !d.is_finite() || d <= 0.0 {
                    return Err(AcsError::InvalidGraph(format!(
                        "distance between '{}' and '{}' must be a positive number, got {}",
                        cities[i], cities[j], d
                    )));
                }
                let mirrored = matrix[j][i];
                if !((d - mirrored).abs() <= SYMMETRY_EPS * d.abs().max(1.0)) {
                    return Err(AcsError::InvalidGraph(format!(
                        "asymmetric distances between '{}' and '{}': {} vs {}",
                        cities[i], cities[j], d, mirrored
                    )));
                }
                let key = EdgeKey { a: i, b: j };
                distances[key.slot()] = d;
            }
        }

        Ok(CityGraph {
            cities,
            index,
            distances,
        })
    }

    /// Parse a semicolon-delimited distance matrix from a file.
    pub fn from_csv_file<P: AsRef<Path>>(path: P) -> Result<Self, AcsError> {
        let file = File::open(path)?;
        Self::from_csv_reader(file)
    }

    /// Parse a semicolon-delimited distance matrix: the header holds the city
    /// names (first cell is the index-column label), each row holds a city
    /// name followed by its distances in header order.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, AcsError> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(b';')
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let cities: Vec<String> = headers.iter().skip(1).map(|s| s.to_string()).collect();
        let n = cities.len();
        if n < 2 {
            return Err(AcsError::InvalidGraph(
                "distance table needs at least two city columns".to_string(),
            ));
        }

        let mut row_index = HashMap::with_capacity(n);
        for (i, name) in cities.iter().enumerate() {
            row_index.insert(name.clone(), i);
        }

        let mut matrix = vec![vec![f64::NAN; n]; n];
        for record in rdr.records() {
            let record = record?;
            let name = record
                .get(0)
                .ok_or_else(|| AcsError::InvalidGraph("row without a city name".to_string()))?;
            let &i = row_index
                .get(name)
                .ok_or_else(|| AcsError::UnknownCity(name.to_string()))?;
            if record.len() != n + 1 {
                return Err(AcsError::InvalidGraph(format!(
                    "row for '{}' has {} fields, expected {}",
                    name,
                    record.len(),
                    n + 1
                )));
            }
            for (j, field) in record.iter().skip(1).enumerate() {
                matrix[i][j] = field.parse().map_err(|_| {
                    AcsError::InvalidGraph(format!(
                        "invalid distance '{}' between '{}' and '{}'",
                        field, name, cities[j]
                    ))
                })?;
            }
        }

        for (i, row) in matrix.iter().enumerate() {
            for (j, d) in row.iter().enumerate() {
                if i != j && d.is_nan() {
                    return Err(AcsError::InvalidGraph(format!(
                        "missing distance between '{}' and '{}'",
                        cities[i], cities[j]
                    )));
                }
            }
        }

        Self::from_matrix(cities, matrix)
    }

    /// Number of cities.
    pub fn num_cities(&self) -> usize {
        self.cities.len()
    }

    /// Number of undirected edges (complete graph).
    pub fn num_edges(&self) -> usize {
        self.distances.len()
    }

    /// All city names in index order.
    pub fn cities(&self) -> &[String] {
        &self.cities
    }

    /// Name of a city by index.
    pub fn city(&self, i: usize) -> &str {
        &self.cities[i]
    }

    /// Resolve a city name to its index.
    pub fn city_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Distance between two cities, regardless of argument order.
    ///
    /// Fails with [`AcsError::UnknownEdge`] on a self-loop or an index
    /// outside the city set. On a validated complete graph this never
    /// happens during search.
    pub fn distance(&self, i: usize, j: usize) -> Result<f64, AcsError> {
        let key = EdgeKey::new(i, j).ok_or(AcsError::UnknownEdge(i, j))?;
        self.distances
            .get(key.slot())
            .copied()
            .ok_or(AcsError::UnknownEdge(i, j))
    }

    /// Total length of a closed tour over the given city sequence,
    /// including the edge back to the first city.
    pub fn tour_length(&self, path: &[usize]) -> Result<f64, AcsError> {
        let mut length = 0.0;
        for pair in path.windows(2) {
            length += self.distance(pair[0], pair[1])?;
        }
        if path.len() > 1 {
            length += self.distance(path[path.len() - 1], path[0])?;
        }
        Ok(length)
    }

    /// Summary statistics over all edges.
    pub fn statistics(&self) -> GraphStatistics {
        let min = self.distances.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = self.distances.iter().cloned().fold(0.0, f64::max);
        let avg = self.distances.iter().sum::<f64>() / self.distances.len() as f64;

        GraphStatistics {
            num_cities: self.num_cities(),
            num_edges: self.num_edges(),
            min_distance: min,
            max_distance: max,
            avg_distance: avg,
        }
    }
}

/// Statistics about a city network.
#[derive(Debug, Clone)]
pub struct GraphStatistics {
    pub num_cities: usize,
    pub num_edges: usize,
    pub min_distance: f64,
    pub max_distance: f64,
    pub avg_distance: f64,
}

impl std::fmt::Display for GraphStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Cities: {}", self.num_cities)?;
        writeln!(f, "Edges: {}", self.num_edges)?;
        writeln!(f, "Min distance: {:.2}", self.min_distance)?;
        writeln!(f, "Avg distance: {:.2}", self.avg_distance)?;
        writeln!(f, "Max distance: {:.2}", self.max_distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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

    #[test]
    fn test_edge_key_is_canonical() {
        assert_eq!(EdgeKey::new(3, 1), EdgeKey::new(1, 3));
        assert!(EdgeKey::new(2, 2).is_none());
        assert_eq!(EdgeKey::new(0, 1).unwrap().slot(), 0);
        assert_eq!(EdgeKey::new(1, 2).unwrap().slot(), 1);
    }

    #[test]
    fn test_distance_is_direction_independent() {
        let graph = square_graph();
        let ab = graph.distance(0, 1).unwrap();
        let ba = graph.distance(1, 0).unwrap();
        assert_eq!(ab, ba);
        assert!((graph.distance(0, 2).unwrap() - 2.0f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_self_loop_is_unknown_edge() {
        let graph = square_graph();
        assert!(matches!(graph.distance(1, 1), Err(AcsError::UnknownEdge(1, 1))));
        assert!(matches!(graph.distance(0, 9), Err(AcsError::UnknownEdge(0, 9))));
    }

    #[test]
    fn test_rejects_asymmetric_matrix() {
        let result = CityGraph::from_matrix(
            names(&["A", "B"]),
            vec![vec![0.0, 1.0], vec![2.0, 0.0]],
        );
        assert!(matches!(result, Err(AcsError::InvalidGraph(_))));
    }

    #[test]
    fn test_rejects_nonpositive_distance() {
        let result = CityGraph::from_matrix(
            names(&["A", "B"]),
            vec![vec![0.0, 0.0], vec![0.0, 0.0]],
        );
        assert!(matches!(result, Err(AcsError::InvalidGraph(_))));
    }

    #[test]
    fn test_tour_length_includes_closing_edge() {
        let graph = square_graph();
        let length = graph.tour_length(&[0, 1, 2, 3]).unwrap();
        assert!((length - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_csv_round_trip() {
        let csv = "\
city;Barcelona;Lyon;Milan
Barcelona;0;644;725
Lyon;644;0;374
Milan;725;374;0
";
        let graph = CityGraph::from_csv_reader(csv.as_bytes()).unwrap();
        assert_eq!(graph.num_cities(), 3);
        assert_eq!(graph.city_index("Lyon"), Some(1));
        assert_eq!(graph.distance(0, 2).unwrap(), 725.0);
        assert_eq!(graph.distance(2, 0).unwrap(), 725.0);
    }

    #[test]
    fn test_csv_missing_row_is_rejected() {
        let csv = "\
city;A;B;C
A;0;1;2
B;1;0;3
";
        assert!(matches!(
            CityGraph::from_csv_reader(csv.as_bytes()),
            Err(AcsError::InvalidGraph(_))
        ));
    }

    #[test]
    fn test_statistics() {
        let graph = square_graph();
        let stats = graph.statistics();
        assert_eq!(stats.num_cities, 4);
        assert_eq!(stats.num_edges, 6);
        assert!((stats.min_distance - 1.0).abs() < 1e-12);
        assert!((stats.max_distance - 2.0f64.sqrt()).abs() < 1e-12);
    }
}
