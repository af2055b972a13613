//! Route command handler: sequence resolved locations from a file.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use tracing::{debug, info};

use waymark_lib::{
    build_route_matrix, optimize_route, OptimizedRoute, OsrmProvider, ProviderConfig,
};

use crate::input::{load_locations, load_matrix};
use crate::output::{render_route_text, OutputFormat};
use crate::terminal::ColorPalette;

/// How leg distances are obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DistanceSource {
    /// Great-circle distance between coordinates.
    GreatCircle,
    /// Explicit matrix file, one row per location.
    Matrix(PathBuf),
    /// OSRM driving distances and geometry.
    Road,
}

/// Arguments for the route command.
#[derive(Debug, Clone)]
pub struct RouteCommandArgs {
    /// JSON file of `{address, lat, lng}` records; the first is the start.
    pub locations: PathBuf,
    pub distances: DistanceSource,
}

/// Handle the route subcommand.
pub fn handle_route_command(
    args: &RouteCommandArgs,
    format: OutputFormat,
    palette: &ColorPalette,
) -> Result<String> {
    let route = plan(args)?;

    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(&route).context("failed to serialize route")
        }
        OutputFormat::Text => Ok(render_route_text(&route, palette)),
    }
}

fn plan(args: &RouteCommandArgs) -> Result<OptimizedRoute> {
    let locations = load_locations(&args.locations)?;
    if locations.is_empty() {
        bail!("{} contains no locations", args.locations.display());
    }
    debug!(count = locations.len(), "locations loaded");

    let route = match &args.distances {
        DistanceSource::GreatCircle => optimize_route(&locations, None, None)?,
        DistanceSource::Matrix(path) => {
            let matrix = load_matrix(path)?;
            optimize_route(&locations, Some(&matrix), None)
                .with_context(|| format!("matrix {} does not fit the locations", path.display()))?
        }
        DistanceSource::Road => {
            let provider = OsrmProvider::new(&ProviderConfig::from_env())
                .context("failed to create the OSRM client")?;
            info!(count = locations.len(), "querying road distances");
            let (matrix, geometries) = build_route_matrix(&provider, &locations);
            optimize_route(&locations, Some(&matrix), Some(&geometries))?
        }
    };

    Ok(route)
}
