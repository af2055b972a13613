//! Shared fixtures for integration tests.

use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;

use waymark_lib::{Cell, Grid};

/// Path to the fixtures directory shared with the CLI tests.
#[allow(dead_code)]
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

/// The 10x7 maze fixture.
#[allow(dead_code)]
pub fn maze() -> Grid {
    let text = std::fs::read_to_string(fixtures_dir().join("maze.txt")).expect("maze fixture");
    Grid::from_ascii(&text).expect("maze parses")
}

/// Deterministic pseudo-random grids with roughly `wall_percent` walls.
///
/// Start and end corners are always left open.
#[allow(dead_code)]
pub fn scattered_grid(width: usize, height: usize, wall_percent: u64, seed: u64) -> Grid {
    let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    let mut rows = vec![vec![0u8; width]; height];
    for (y, row) in rows.iter_mut().enumerate() {
        for (x, value) in row.iter_mut().enumerate() {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            let corner = (x, y) == (0, 0) || (x, y) == (width - 1, height - 1);
            if !corner && (state >> 33) % 100 < wall_percent {
                *value = 1;
            }
        }
    }
    Grid::from_rows(&rows).expect("generated grid is rectangular")
}

/// Breadth-first step distances from `start` to every reachable cell.
#[allow(dead_code)]
pub fn bfs_distances(grid: &Grid, start: Cell) -> HashMap<Cell, usize> {
    let mut distances = HashMap::new();
    if grid.is_wall(start) || !grid.contains(start) {
        return distances;
    }

    let mut queue = VecDeque::from([start]);
    distances.insert(start, 0);
    while let Some(cell) = queue.pop_front() {
        let next = distances[&cell] + 1;
        for neighbour in grid.neighbours(cell) {
            if !distances.contains_key(&neighbour) {
                distances.insert(neighbour, next);
                queue.push_back(neighbour);
            }
        }
    }
    distances
}

/// Whether `path` is a contiguous sequence of open, 4-adjacent cells.
#[allow(dead_code)]
pub fn is_walkable(grid: &Grid, path: &[Cell]) -> bool {
    path.iter().all(|&cell| grid.is_passable(cell))
        && path
            .windows(2)
            .all(|pair| pair[0].x.abs_diff(pair[1].x) + pair[0].y.abs_diff(pair[1].y) == 1)
}
