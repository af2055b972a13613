//! Loading grids, locations and matrices from disk.

use std::fs;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};

use waymark_lib::{Cell, DistanceMatrix, Grid, Location};

/// Load a grid from `path`.
///
/// `.json` files hold an array of `0`/`1` rows; anything else is read as the
/// ASCII form (`.` open, `#` wall).
pub fn load_grid(path: &Path) -> Result<Grid> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read grid from {}", path.display()))?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let grid = if is_json {
        let rows: Vec<Vec<u8>> = serde_json::from_str(&text)
            .with_context(|| format!("{} is not a JSON array of 0/1 rows", path.display()))?;
        Grid::from_rows(&rows)
    } else {
        Grid::from_ascii(&text)
    };

    grid.with_context(|| format!("invalid grid in {}", path.display()))
}

/// Load resolved `{address, lat, lng}` records from a JSON file.
pub fn load_locations(path: &Path) -> Result<Vec<Location>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read locations from {}", path.display()))?;
    let locations: Vec<Location> = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse locations in {}", path.display()))?;

    if let Some(bad) = locations
        .iter()
        .find(|location| !location.coordinates().is_valid())
    {
        bail!(
            "location '{}' has out-of-range coordinates ({}, {})",
            bad.address,
            bad.lat,
            bad.lng
        );
    }

    Ok(locations)
}

/// Load a square distance matrix (array of rows, kilometres).
pub fn load_matrix(path: &Path) -> Result<DistanceMatrix> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read matrix from {}", path.display()))?;
    let rows: Vec<Vec<f64>> = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse matrix in {}", path.display()))?;
    DistanceMatrix::from_rows(rows).with_context(|| format!("invalid matrix in {}", path.display()))
}

/// Parse an `x,y` cell argument.
pub fn parse_cell(value: &str) -> Result<Cell> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| anyhow!("expected x,y but got '{value}'"))?;
    let x = x
        .trim()
        .parse()
        .with_context(|| format!("invalid column in '{value}'"))?;
    let y = y
        .trim()
        .parse()
        .with_context(|| format!("invalid row in '{value}'"))?;
    Ok(Cell::new(x, y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use tempfile::NamedTempFile;

    fn temp_file(suffix: &str, contents: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(suffix)
            .tempfile()
            .expect("create temp file");
        file.write_all(contents.as_bytes()).expect("write temp file");
        file
    }

    #[test]
    fn parses_cells() {
        assert_eq!(parse_cell("3,4").unwrap(), Cell::new(3, 4));
        assert_eq!(parse_cell(" 0 , 12 ").unwrap(), Cell::new(0, 12));
        assert!(parse_cell("3").is_err());
        assert!(parse_cell("-1,2").is_err());
    }

    #[test]
    fn json_and_ascii_grids_agree() {
        let json = temp_file(".json", "[[0,1,0],[0,0,0]]");
        let ascii = temp_file(".txt", ".#.\n...\n");

        let from_json = load_grid(json.path()).unwrap();
        let from_ascii = load_grid(ascii.path()).unwrap();

        assert_eq!(from_json, from_ascii);
        assert!(from_json.is_wall(Cell::new(1, 0)));
    }

    #[test]
    fn ragged_grid_is_reported() {
        let json = temp_file(".json", "[[0,0],[0]]");
        let err = load_grid(json.path()).unwrap_err();
        assert!(format!("{err:#}").contains("invalid grid"));
    }

    #[test]
    fn out_of_range_location_is_rejected() {
        let file = temp_file(
            ".json",
            r#"[{"address": "Nowhere", "lat": 123.0, "lng": 0.0}]"#,
        );
        let err = load_locations(file.path()).unwrap_err();
        assert!(err.to_string().contains("Nowhere"));
    }

    #[test]
    fn matrix_must_be_square() {
        let file = temp_file(".json", "[[0, 1], [1]]");
        assert!(load_matrix(file.path()).is_err());
    }
}
