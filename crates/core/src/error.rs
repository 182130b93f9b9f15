use crate::grid::TriAddress;
use thiserror::Error;

/// Failures that can occur while constructing addresses, tiling faces or
/// building a grid. Note that there is no "path not found" variant: an empty
/// path is an ordinary outcome of a search, and so is probing for an address
/// that isn't on the board.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum GridError {
    /// A coordinate triple whose components don't sum to 1 or 2. There is no
    /// triangle at such a position, so it's never silently coerced.
    #[error(
        "invalid triangle address ({a}, {b}, {c}); components must sum to \
        1 or 2"
    )]
    InvalidAddress { a: i32, b: i32, c: i32 },

    /// Two faces handed to the tiling engine share one address
    #[error("duplicate triangle address {0}")]
    DuplicateAddress(TriAddress),

    /// A grid needs at least a 2x2 vertex lattice to hold a single triangle
    #[error("invalid grid dimensions {width}x{height}; both must be at least 2")]
    InvalidDimensions { width: usize, height: usize },
}
