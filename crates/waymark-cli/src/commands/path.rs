//! Path command handler: grid search from a file.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::debug;

use waymark_lib::{search_grid, Cell, SearchStrategy};

use crate::input::load_grid;
use crate::output::{render_search_text, OutputFormat};
use crate::terminal::ColorPalette;

/// Arguments for the path command.
#[derive(Debug, Clone)]
pub struct PathCommandArgs {
    /// Grid file (`.json` rows or ASCII).
    pub grid: PathBuf,
    pub from: Cell,
    pub to: Cell,
    pub algorithm: SearchStrategy,
}

/// Handle the path subcommand.
///
/// A search that does not reach the goal still succeeds; the report says so.
pub fn handle_path_command(
    args: &PathCommandArgs,
    format: OutputFormat,
    palette: &ColorPalette,
) -> Result<String> {
    let grid = load_grid(&args.grid)?;
    debug!(
        width = grid.width(),
        height = grid.height(),
        algorithm = %args.algorithm,
        "grid loaded"
    );

    let result = search_grid(&grid, args.from, args.to, args.algorithm)
        .with_context(|| format!("cannot search {}", args.grid.display()))?;

    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(&result).context("failed to serialize search result")
        }
        OutputFormat::Text => Ok(render_search_text(
            &grid,
            args.from,
            args.to,
            args.algorithm,
            &result,
            palette,
        )),
    }
}
