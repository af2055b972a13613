//! Grid search engine.
//!
//! This module provides:
//! - [`SearchStrategy`] - the priority policy (A*, Dijkstra, greedy best-first)
//! - [`SearchResult`] - path plus the exploration trace, in finalization order
//! - [`find_path`] - the shared traversal used by every strategy
//!
//! # Strategies
//!
//! All three strategies share neighbour generation, relaxation and path
//! reconstruction. They differ only in how a node's priority is derived:
//!
//! | Strategy   | `h`              | priority        |
//! |------------|------------------|-----------------|
//! | `astar`    | Manhattan        | `g + h`         |
//! | `dijkstra` | `0`              | `g`             |
//! | `greedy`   | Manhattan        | `h`, frozen     |
//!
//! # Example
//!
//! ```
//! use waymark_lib::{find_path, Cell, Grid, SearchStrategy};
//!
//! let grid = Grid::from_ascii("...\n...\n...").unwrap();
//! let result = find_path(&grid, Cell::new(0, 0), Cell::new(2, 2), SearchStrategy::AStar);
//! assert!(result.found);
//! assert_eq!(result.step_count(), 4);
//! ```

mod engine;

pub use engine::find_path;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::grid::Cell;

/// Supported grid search strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SearchStrategy {
    /// A* with the Manhattan heuristic (cost-optimal on 4-connected grids).
    #[default]
    #[serde(rename = "astar")]
    AStar,
    /// Uniform-cost search (cost-optimal, no heuristic).
    Dijkstra,
    /// Greedy best-first search (heuristic only, not cost-optimal).
    Greedy,
}

impl SearchStrategy {
    /// All strategies, in a stable order.
    pub const ALL: [SearchStrategy; 3] = [
        SearchStrategy::AStar,
        SearchStrategy::Dijkstra,
        SearchStrategy::Greedy,
    ];

    /// Resolve a strategy by name. Unknown names fall back to [`SearchStrategy::AStar`].
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "astar" | "a-star" | "a_star" | "a*" => SearchStrategy::AStar,
            "dijkstra" | "uniform" | "uniform-cost" => SearchStrategy::Dijkstra,
            "greedy" | "best-first" | "greedy-best-first" => SearchStrategy::Greedy,
            other => {
                tracing::debug!(requested = other, "unknown search strategy, using astar");
                SearchStrategy::AStar
            }
        }
    }

    /// Canonical wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            SearchStrategy::AStar => "astar",
            SearchStrategy::Dijkstra => "dijkstra",
            SearchStrategy::Greedy => "greedy",
        }
    }

    /// Heuristic estimate from `cell` to `goal` under this strategy.
    pub fn heuristic(self, cell: Cell, goal: Cell) -> f64 {
        match self {
            SearchStrategy::Dijkstra => 0.0,
            SearchStrategy::AStar | SearchStrategy::Greedy => manhattan(cell, goal),
        }
    }

    /// Frontier priority for a node with cost `g` and heuristic `h`.
    pub fn priority(self, g: f64, h: f64) -> f64 {
        match self {
            SearchStrategy::Greedy => h,
            SearchStrategy::AStar | SearchStrategy::Dijkstra => g + h,
        }
    }

    /// Whether a cheaper path to a discovered node changes its priority and
    /// therefore needs a fresh frontier entry.
    pub fn reprioritises_on_relax(self) -> bool {
        !matches!(self, SearchStrategy::Greedy)
    }

    /// Whether the first path found is guaranteed to be a shortest one.
    pub fn is_cost_optimal(self) -> bool {
        !matches!(self, SearchStrategy::Greedy)
    }
}

impl fmt::Display for SearchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Manhattan distance `|x1 - x2| + |y1 - y2|`.
pub fn manhattan(a: Cell, b: Cell) -> f64 {
    (a.x.abs_diff(b.x) + a.y.abs_diff(b.y)) as f64
}

/// Outcome of a grid search.
///
/// `explored` lists every finalized cell in the order it was popped from the
/// frontier and is returned whether or not a path was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub found: bool,
    pub path: Vec<Cell>,
    pub explored: Vec<Cell>,
}

impl SearchResult {
    /// Result for a search that never reached the goal.
    pub fn not_found(explored: Vec<Cell>) -> Self {
        Self {
            found: false,
            path: Vec::new(),
            explored,
        }
    }

    /// Number of moves along the path (cells minus one).
    pub fn step_count(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    /// Number of cells finalized during the search.
    pub fn explored_count(&self) -> usize {
        self.explored.len()
    }
}
