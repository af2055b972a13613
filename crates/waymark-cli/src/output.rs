//! Output formatting for search results and routes.

use std::collections::HashSet;
use std::fmt::Write as _;

use clap::ValueEnum;

use waymark_lib::{Cell, Grid, OptimizedRoute, SearchResult, SearchStrategy};

use crate::terminal::{format_with_separators, ColorPalette};

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text with a rendered grid.
    #[default]
    Text,
    /// Pretty-printed JSON of the library result.
    Json,
}

/// Render `grid` with the search trace overlaid.
///
/// Glyph precedence: `S`/`E` endpoints, `*` path, `+` explored, `#` wall,
/// `.` open.
pub fn render_grid(
    grid: &Grid,
    start: Cell,
    end: Cell,
    result: &SearchResult,
    palette: &ColorPalette,
) -> String {
    let path: HashSet<Cell> = result.path.iter().copied().collect();
    let explored: HashSet<Cell> = result.explored.iter().copied().collect();

    let mut out = String::with_capacity(grid.len() + grid.height());
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            let cell = Cell::new(x, y);
            let glyph = if cell == start {
                palette.paint(palette.start, "S")
            } else if cell == end {
                palette.paint(palette.goal, "E")
            } else if path.contains(&cell) {
                palette.paint(palette.path, "*")
            } else if explored.contains(&cell) {
                palette.paint(palette.explored, "+")
            } else if grid.is_wall(cell) {
                palette.paint(palette.wall, "#")
            } else {
                ".".to_string()
            };
            out.push_str(&glyph);
        }
        out.push('\n');
    }
    out
}

/// Text report for a grid search.
pub fn render_search_text(
    grid: &Grid,
    start: Cell,
    end: Cell,
    strategy: SearchStrategy,
    result: &SearchResult,
    palette: &ColorPalette,
) -> String {
    let mut out = String::new();
    let explored = format_with_separators(result.explored_count() as u64);

    if result.found {
        let _ = writeln!(
            out,
            "Path from {start} to {end} ({} steps; algorithm: {strategy}; explored {explored} cells):",
            result.step_count()
        );
    } else {
        let _ = writeln!(
            out,
            "No path from {start} to {end} (algorithm: {strategy}; explored {explored} cells)"
        );
    }
    out.push('\n');
    out.push_str(&render_grid(grid, start, end, result, palette));
    out
}

/// Text report for a sequenced route.
pub fn render_route_text(route: &OptimizedRoute, palette: &ColorPalette) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Route ({} stops):", route.route.len());
    for stop in &route.route {
        let _ = writeln!(
            out,
            "{:>3}. {} ({:.4}, {:.4})",
            stop.order,
            palette.paint(palette.emphasis, &stop.location.address),
            stop.location.lat,
            stop.location.lng
        );
    }
    let _ = writeln!(out, "\nTotal distance: {:.2} km", route.total_distance);
    out
}
