use thiserror::Error;

use crate::location::ResolutionFailure;

/// Convenient result alias for the waymark library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when a path request carries no grid rows at all.
    #[error("grid is empty")]
    EmptyGrid,

    /// Raised when grid rows do not all share the width of the first row.
    #[error("grid row {row} has {found} cells, expected {expected}")]
    RaggedGrid {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// Raised when a grid cell holds something other than 0 (open) or 1 (wall).
    #[error("grid cell ({x}, {y}) has invalid value {value}; expected 0 or 1")]
    InvalidCellValue { x: usize, y: usize, value: u8 },

    /// Raised when an ASCII grid contains an unknown glyph.
    #[error("grid cell ({x}, {y}) has invalid glyph {glyph:?}; expected '.' or '#'")]
    InvalidGlyph { x: usize, y: usize, glyph: char },

    /// Raised when a start or end cell lies outside the grid.
    #[error("{role} cell ({x}, {y}) is outside the {width}x{height} grid")]
    CellOutOfBounds {
        role: &'static str,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },

    /// Raised when a route request lists no addresses.
    #[error("no addresses provided")]
    EmptyLocationList,

    /// Raised when one or more addresses could not be resolved to coordinates.
    #[error("{}", format_failures(.failures))]
    UnresolvedLocations { failures: Vec<ResolutionFailure> },

    /// Raised when a distance matrix is not square.
    #[error("distance matrix row {row} has {found} entries, expected {expected}")]
    MatrixNotSquare {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// Raised when a distance matrix holds a negative or non-finite entry.
    #[error("distance matrix entry ({row}, {col}) is invalid: {value}")]
    InvalidDistance { row: usize, col: usize, value: f64 },

    /// Raised when the matrix size does not match the number of locations.
    #[error("distance matrix covers {matrix} locations but {locations} were supplied")]
    MatrixSizeMismatch { matrix: usize, locations: usize },

    /// Raised when the geocoding service returns an unusable response.
    #[error("geocoding service error: {message}")]
    Geocoding { message: String },

    /// Raised when the road routing service returns an unusable response.
    #[error("routing service error: {message}")]
    RoutingService { message: String },

    /// Wrapper for JSON (de)serialization errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper for HTTP client errors.
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

fn format_failures(failures: &[ResolutionFailure]) -> String {
    let listed = failures
        .iter()
        .map(|failure| format!("'{}' ({})", failure.address, failure.reason))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "{} address(es) could not be geocoded: {}",
        failures.len(),
        listed
    )
}
