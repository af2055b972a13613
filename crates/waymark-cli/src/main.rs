use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use waymark_cli::commands::path::{handle_path_command, PathCommandArgs};
use waymark_cli::commands::route::{handle_route_command, DistanceSource, RouteCommandArgs};
use waymark_cli::input::parse_cell;
use waymark_cli::output::OutputFormat;
use waymark_cli::terminal::ColorPalette;
use waymark_lib::{Cell, SearchStrategy};

#[derive(Parser, Debug)]
#[command(author, version, about = "Grid pathfinding and delivery route sequencing")]
struct Cli {
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search a grid and show the path and exploration trace.
    Path {
        /// Grid file: `.json` rows of 0/1, or ASCII with `.` open and `#` wall.
        #[arg(long)]
        grid: PathBuf,
        /// Start cell as `x,y`.
        #[arg(long = "from", value_parser = cell_arg)]
        from: Cell,
        /// Goal cell as `x,y`.
        #[arg(long = "to", value_parser = cell_arg)]
        to: Cell,
        /// Search strategy: astar, dijkstra or greedy.
        #[arg(long, default_value = "astar")]
        algorithm: String,
    },
    /// Order resolved locations with the nearest-neighbour heuristic.
    Route {
        /// JSON file of `{address, lat, lng}` records; the first is the start.
        #[arg(long)]
        locations: PathBuf,
        /// JSON distance matrix (kilometres) to use instead of great-circle distances.
        #[arg(long, conflicts_with = "road_distances")]
        matrix: Option<PathBuf>,
        /// Query OSRM for driving distances and geometry.
        #[arg(long)]
        road_distances: bool,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let palette = ColorPalette::for_stdout();

    let output = match cli.command {
        Command::Path {
            grid,
            from,
            to,
            algorithm,
        } => {
            let args = PathCommandArgs {
                grid,
                from,
                to,
                algorithm: SearchStrategy::from_name(&algorithm),
            };
            handle_path_command(&args, cli.format, &palette)?
        }
        Command::Route {
            locations,
            matrix,
            road_distances,
        } => {
            let distances = match (matrix, road_distances) {
                (Some(path), _) => DistanceSource::Matrix(path),
                (None, true) => DistanceSource::Road,
                (None, false) => DistanceSource::GreatCircle,
            };
            let args = RouteCommandArgs {
                locations,
                distances,
            };
            handle_route_command(&args, cli.format, &palette)?
        }
    };

    print!("{output}");
    if !output.ends_with('\n') {
        println!();
    }
    Ok(())
}

fn cell_arg(value: &str) -> Result<Cell, String> {
    parse_cell(value).map_err(|e| e.to_string())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
