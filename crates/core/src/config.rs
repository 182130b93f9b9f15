use serde::{Deserialize, Serialize};
use validator::Validate;

/// Configuration that defines a grid. Two grids built from the same config
/// always have identical topology.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct GridConfig {
    /// Number of columns in the vertex lattice. A lattice needs at least two
    /// columns and two rows to hold a single triangle.
    #[validate(range(min = 2, max = 10000))]
    pub width: usize,

    /// Number of rows in the vertex lattice
    #[validate(range(min = 2, max = 10000))]
    pub height: usize,

    /// Limits for path searches over this grid
    #[validate]
    pub search: SearchConfig,
}

/// Limits that apply to a single path search
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct SearchConfig {
    /// Maximum number of nodes a single search will expand before giving up
    /// and reporting no path. Keeps a search on a huge board from running
    /// away.
    #[validate(range(min = 1))]
    pub max_expansions: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: 20,
            height: 20,
            search: SearchConfig::default(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_expansions: 100_000,
        }
    }
}
