//! Error types for the ACS solver.

use std::fmt;

/// Errors raised by graph construction, tour building and the search loop.
///
/// Graph and candidate errors (`UnknownEdge`, `NoCandidates`) indicate a
/// malformed, non-complete instance and abort the run. Configuration and
/// load-time errors are rejected before any iteration starts.
#[derive(Debug)]
pub enum AcsError {
    /// Edge lookup for a self-loop or an out-of-range city index.
    UnknownEdge(usize, usize),
    /// An ant ran out of unvisited cities before completing its tour.
    NoCandidates { visited: usize, cities: usize },
    /// A city name that does not appear in the distance table.
    UnknownCity(String),
    /// A parameter outside its valid range.
    InvalidConfig(String),
    /// A distance or coordinate table that is not complete, symmetric and positive.
    InvalidGraph(String),
    Io(std::io::Error),
    Csv(csv::Error),
}

impl fmt::Display for AcsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AcsError::UnknownEdge(i, j) => {
                write!(f, "undefined edge between city indices {} and {}", i, j)
            }
            AcsError::NoCandidates { visited, cities } => {
                write!(
                    f,
                    "no unvisited candidate left after {} of {} cities",
                    visited, cities
                )
            }
            AcsError::UnknownCity(name) => write!(f, "unknown city '{}'", name),
            AcsError::InvalidConfig(msg) => write!(f, "invalid configuration: {}", msg),
            AcsError::InvalidGraph(msg) => write!(f, "invalid graph: {}", msg),
            AcsError::Io(e) => write!(f, "I/O error: {}", e),
            AcsError::Csv(e) => write!(f, "CSV error: {}", e),
        }
    }
}

impl std::error::Error for AcsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AcsError::Io(e) => Some(e),
            AcsError::Csv(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for AcsError {
    fn from(e: std::io::Error) -> Self {
        AcsError::Io(e)
    }
}

impl From<csv::Error> for AcsError {
    fn from(e: csv::Error) -> Self {
        AcsError::Csv(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let e = AcsError::UnknownEdge(3, 3);
        assert!(e.to_string().contains("3"));

        let e = AcsError::UnknownCity("Atlantis".to_string());
        assert!(e.to_string().contains("Atlantis"));
    }
}
