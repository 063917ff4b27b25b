//! Level documents describing the playing field.
//!
//! Levels are authored as JSON. Paths may be written either as a bare list of
//! waypoint lists or as objects carrying a `nodes` list, optionally nested
//! under a `pathNetwork` key:
//!
//! ```json
//! {
//!   "columns": 10,
//!   "rows": 4,
//!   "paths": [[{ "x": 0, "y": 1 }, { "x": 9, "y": 1 }]],
//!   "obstacles": [{ "x": 4, "y": 3 }]
//! }
//! ```

use elemental_defence_core::{CellCoord, Destination, TerrainKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::paths::PathNetwork;

const DEFAULT_COLUMNS: u32 = 50;
const DEFAULT_ROWS: u32 = 30;

/// Errors raised while loading a level. Any of them makes the level unusable.
#[derive(Debug, Error)]
pub enum LevelError {
    /// The document is not valid JSON or does not match the level schema.
    #[error("malformed level document: {0}")]
    Malformed(#[from] serde_json::Error),
    /// The grid has no cells.
    #[error("level grid must have at least one column and one row")]
    EmptyGrid,
    /// The document declares no paths.
    #[error("level declares no paths")]
    MissingPaths,
    /// A path has no waypoints.
    #[error("path {path} has no waypoints")]
    EmptyPath {
        /// Index of the offending path.
        path: usize,
    },
    /// A waypoint lies outside the grid.
    #[error("waypoint ({x}, {y}) of path {path} lies outside the {columns}x{rows} grid")]
    WaypointOutOfBounds {
        /// Index of the offending path.
        path: usize,
        /// Column of the waypoint.
        x: u32,
        /// Row of the waypoint.
        y: u32,
        /// Grid width.
        columns: u32,
        /// Grid height.
        rows: u32,
    },
    /// An obstacle, terrain patch or the core lies outside the grid.
    #[error("cell ({x}, {y}) lies outside the grid")]
    CellOutOfBounds {
        /// Column of the cell.
        x: u32,
        /// Row of the cell.
        y: u32,
    },
    /// A path does not expand into a unit-step path through its waypoints.
    #[error("path {path} does not expand faithfully from its waypoints")]
    UnfaithfulPath {
        /// Index of the offending path.
        path: usize,
    },
}

/// Integer grid coordinate as written in level files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Waypoint {
    /// Column of the cell.
    pub x: u32,
    /// Row of the cell.
    pub y: u32,
}

impl From<Waypoint> for CellCoord {
    fn from(waypoint: Waypoint) -> Self {
        CellCoord::new(waypoint.x, waypoint.y)
    }
}

/// A single path written as an object with a `nodes` list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathNodes {
    /// Waypoints of the path.
    pub nodes: Vec<Waypoint>,
}

/// Accepted spellings of the path list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathList {
    /// Paths written as objects with a `nodes` list.
    Nodes(Vec<PathNodes>),
    /// Paths written as bare waypoint lists.
    Bare(Vec<Vec<Waypoint>>),
}

impl PathList {
    fn into_waypoints(self) -> Vec<Vec<Waypoint>> {
        match self {
            Self::Nodes(paths) => paths.into_iter().map(|path| path.nodes).collect(),
            Self::Bare(paths) => paths,
        }
    }
}

/// Path list nested under a `pathNetwork` key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathNetworkDocument {
    /// Paths of the network.
    pub paths: PathList,
}

/// Terrain override for a single cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerrainPatch {
    /// Column of the cell.
    pub x: u32,
    /// Row of the cell.
    pub y: u32,
    /// Terrain assigned to the cell.
    pub kind: TerrainKind,
}

/// Raw level document as deserialized from JSON.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelDocument {
    /// Grid width in cells.
    #[serde(default = "default_columns")]
    pub columns: u32,
    /// Grid height in cells.
    #[serde(default = "default_rows")]
    pub rows: u32,
    /// Paths declared at the top level.
    #[serde(default)]
    pub paths: Option<PathList>,
    /// Paths nested under `pathNetwork`.
    #[serde(default)]
    pub path_network: Option<PathNetworkDocument>,
    /// Cells blocked for both towers and enemies.
    #[serde(default)]
    pub obstacles: Vec<Waypoint>,
    /// Terrain overrides.
    #[serde(default)]
    pub terrain: Vec<TerrainPatch>,
    /// Cell hosting the core. Defaults to the cell after the end of the first path.
    #[serde(default)]
    pub core: Option<Waypoint>,
    /// Line navigating enemies head for. Defaults to the core's column.
    #[serde(default)]
    pub destination: Option<Destination>,
}

fn default_columns() -> u32 {
    DEFAULT_COLUMNS
}

fn default_rows() -> u32 {
    DEFAULT_ROWS
}

impl LevelDocument {
    /// Parses a level document from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, LevelError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Validates the document and expands its paths.
    pub fn into_level(self) -> Result<Level, LevelError> {
        let Self {
            columns,
            rows,
            paths,
            path_network,
            obstacles,
            terrain,
            core,
            destination,
        } = self;

        if columns == 0 || rows == 0 {
            return Err(LevelError::EmptyGrid);
        }

        let raw_paths = path_network
            .map(|network| network.paths)
            .or(paths)
            .ok_or(LevelError::MissingPaths)?
            .into_waypoints();
        if raw_paths.is_empty() {
            return Err(LevelError::MissingPaths);
        }

        let mut waypoints = Vec::with_capacity(raw_paths.len());
        for (path, nodes) in raw_paths.into_iter().enumerate() {
            if nodes.is_empty() {
                return Err(LevelError::EmptyPath { path });
            }
            if let Some(outside) = nodes
                .iter()
                .find(|node| node.x >= columns || node.y >= rows)
            {
                return Err(LevelError::WaypointOutOfBounds {
                    path,
                    x: outside.x,
                    y: outside.y,
                    columns,
                    rows,
                });
            }
            waypoints.push(nodes.into_iter().map(CellCoord::from).collect::<Vec<_>>());
        }

        let in_bounds = |x: u32, y: u32| -> Result<CellCoord, LevelError> {
            if x < columns && y < rows {
                Ok(CellCoord::new(x, y))
            } else {
                Err(LevelError::CellOutOfBounds { x, y })
            }
        };

        let obstacles = obstacles
            .into_iter()
            .map(|cell| in_bounds(cell.x, cell.y))
            .collect::<Result<Vec<_>, _>>()?;
        let terrain = terrain
            .into_iter()
            .map(|patch| in_bounds(patch.x, patch.y).map(|cell| (cell, patch.kind)))
            .collect::<Result<Vec<_>, _>>()?;

        let core = match core {
            Some(cell) => in_bounds(cell.x, cell.y)?,
            None => default_core(&waypoints, columns),
        };
        let destination = destination.unwrap_or(Destination::Column(core.column()));
        let paths = PathNetwork::from_waypoints(&waypoints);
        paths
            .validate(&waypoints)
            .map_err(|path| LevelError::UnfaithfulPath { path })?;

        Ok(Level {
            columns,
            rows,
            waypoints,
            paths,
            obstacles,
            terrain,
            core,
            destination,
        })
    }
}

fn default_core(waypoints: &[Vec<CellCoord>], columns: u32) -> CellCoord {
    let end = waypoints
        .first()
        .and_then(|path| path.last())
        .copied()
        .unwrap_or(CellCoord::new(0, 0));
    let column = end
        .column()
        .saturating_add(1)
        .min(columns.saturating_sub(1));
    CellCoord::new(column, end.row())
}

/// Validated level ready to seed a world.
#[derive(Clone, Debug, PartialEq)]
pub struct Level {
    columns: u32,
    rows: u32,
    waypoints: Vec<Vec<CellCoord>>,
    paths: PathNetwork,
    obstacles: Vec<CellCoord>,
    terrain: Vec<(CellCoord, TerrainKind)>,
    core: CellCoord,
    destination: Destination,
}

impl Level {
    /// Parses and validates a level from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, LevelError> {
        LevelDocument::from_json_str(text)?.into_level()
    }

    /// Grid dimensions as `(columns, rows)`.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    /// Waypoint sequences as authored.
    #[must_use]
    pub fn waypoints(&self) -> &[Vec<CellCoord>] {
        &self.waypoints
    }

    /// Expanded path network.
    #[must_use]
    pub fn paths(&self) -> &PathNetwork {
        &self.paths
    }

    /// Blocked cells.
    #[must_use]
    pub fn obstacles(&self) -> &[CellCoord] {
        &self.obstacles
    }

    /// Terrain overrides.
    #[must_use]
    pub fn terrain(&self) -> &[(CellCoord, TerrainKind)] {
        &self.terrain
    }

    /// Cell hosting the core.
    #[must_use]
    pub const fn core(&self) -> CellCoord {
        self.core
    }

    /// Line navigating enemies head for.
    #[must_use]
    pub const fn destination(&self) -> Destination {
        self.destination
    }
}

impl Default for Level {
    /// Three lanes crossing a 50x30 field toward a core on the east side.
    fn default() -> Self {
        let lane = |points: &[(u32, u32)]| -> Vec<CellCoord> {
            points
                .iter()
                .map(|&(column, row)| CellCoord::new(column, row))
                .collect()
        };
        let waypoints = vec![
            lane(&[(0, 5), (44, 5), (44, 14), (46, 14)]),
            lane(&[(0, 15), (30, 15), (30, 14), (46, 14)]),
            lane(&[(0, 25), (45, 25), (45, 15), (46, 15)]),
        ];
        let obstacles = [(10, 10), (11, 10), (12, 10), (25, 20), (26, 20), (27, 20), (40, 10), (41, 10), (42, 10)]
            .into_iter()
            .map(|(column, row)| CellCoord::new(column, row))
            .collect();
        let paths = PathNetwork::from_waypoints(&waypoints);
        let core = CellCoord::new(47, 14);

        Self {
            columns: DEFAULT_COLUMNS,
            rows: DEFAULT_ROWS,
            waypoints,
            paths,
            obstacles,
            terrain: Vec::new(),
            core,
            destination: Destination::Column(46),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use elemental_defence_core::PathId;

    #[test]
    fn bare_path_lists_parse() {
        let level = Level::from_json_str(
            r#"{"columns": 5, "rows": 3, "paths": [[{"x": 0, "y": 0}, {"x": 2, "y": 0}]]}"#,
        )
        .expect("valid level");
        assert_eq!(level.paths().len(), 1);
        assert_eq!(level.waypoints()[0], vec![CellCoord::new(0, 0), CellCoord::new(2, 0)]);
        assert_eq!(level.core(), CellCoord::new(3, 0));
        assert_eq!(level.destination(), Destination::Column(3));
    }

    #[test]
    fn nested_path_network_parses() {
        let level = Level::from_json_str(
            r#"{
                "columns": 5,
                "rows": 3,
                "pathNetwork": {"paths": [{"nodes": [{"x": 0, "y": 1}, {"x": 4, "y": 1}]}]},
                "core": {"x": 4, "y": 2},
                "destination": {"row": 2},
                "terrain": [{"x": 1, "y": 0, "kind": "forest"}]
            }"#,
        )
        .expect("valid level");
        assert_eq!(level.paths().iter().next().map(<[CellCoord]>::len), Some(5));
        assert_eq!(level.core(), CellCoord::new(4, 2));
        assert_eq!(level.destination(), Destination::Row(2));
        assert_eq!(level.terrain(), &[(CellCoord::new(1, 0), TerrainKind::Forest)]);
    }

    #[test]
    fn missing_paths_are_fatal() {
        let error = Level::from_json_str(r#"{"columns": 5, "rows": 3}"#)
            .expect_err("paths are required");
        assert!(matches!(error, LevelError::MissingPaths));
    }

    #[test]
    fn empty_paths_are_fatal() {
        let error = Level::from_json_str(r#"{"paths": [[]]}"#).expect_err("empty path");
        assert!(matches!(error, LevelError::EmptyPath { path: 0 }));
    }

    #[test]
    fn waypoints_outside_the_grid_are_fatal() {
        let error = Level::from_json_str(
            r#"{"columns": 2, "rows": 2, "paths": [[{"x": 0, "y": 0}, {"x": 5, "y": 0}]]}"#,
        )
        .expect_err("waypoint out of bounds");
        assert!(matches!(
            error,
            LevelError::WaypointOutOfBounds { path: 0, x: 5, .. }
        ));
    }

    #[test]
    fn malformed_json_is_fatal() {
        let error = Level::from_json_str("{ not json").expect_err("malformed");
        assert!(matches!(error, LevelError::Malformed(_)));
    }

    #[test]
    fn default_level_paths_round_trip() {
        let level = Level::default();
        assert_eq!(level.dimensions(), (50, 30));
        assert_eq!(level.paths().len(), 3);
        assert_eq!(level.paths().validate(level.waypoints()), Ok(()));
    }

    #[test]
    fn authored_waypoints_are_recoverable() {
        let level = Level::from_json_str(
            r#"{"columns": 6, "rows": 4, "paths": [[{"x": 0, "y": 0}, {"x": 1, "y": 0}, {"x": 3, "y": 0}, {"x": 5, "y": 1}]]}"#,
        )
        .expect("valid level");

        assert_eq!(
            level.paths().waypoints(PathId::new(0)),
            Some(vec![
                CellCoord::new(0, 0),
                CellCoord::new(1, 0),
                CellCoord::new(3, 0),
                CellCoord::new(5, 1),
            ])
        );
        assert_eq!(level.waypoints()[0].len(), 4);
    }
}
