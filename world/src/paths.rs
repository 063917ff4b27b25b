//! Path network expansion and interpolation.
//!
//! Levels describe paths as sparse waypoint sequences. Before use every
//! sequence is expanded into a dense path in which consecutive cells differ by
//! at most one step on each axis, interpolating straight segments with
//! Bresenham's line algorithm. The dense index of every waypoint is kept
//! alongside the cells, so the authored waypoints can always be recovered.

use elemental_defence_core::{CellCoord, PathId};
use glam::Vec2;

/// A dense path together with the indices of the waypoints it was built from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct DensePath {
    cells: Vec<CellCoord>,
    anchors: Vec<usize>,
}

impl DensePath {
    fn expand(waypoints: &[CellCoord]) -> Self {
        let mut path = Self::default();
        let mut points = waypoints.iter().copied();
        let Some(first) = points.next() else {
            return path;
        };
        path.cells.push(first);
        path.anchors.push(0);

        let mut previous = first;
        for next in points {
            if next == previous {
                continue;
            }
            path.cells
                .extend(straight_line(previous, next).into_iter().skip(1));
            path.anchors.push(path.cells.len() - 1);
            previous = next;
        }
        path
    }

    fn waypoints(&self) -> Vec<CellCoord> {
        self.anchors
            .iter()
            .filter_map(|&index| self.cells.get(index).copied())
            .collect()
    }

    fn takes_unit_steps(&self) -> bool {
        self.cells.windows(2).all(|pair| {
            pair[0] != pair[1]
                && pair[0].column().abs_diff(pair[1].column()) <= 1
                && pair[0].row().abs_diff(pair[1].row()) <= 1
        })
    }
}

/// Dense paths enemies follow toward the core.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PathNetwork {
    paths: Vec<DensePath>,
}

impl PathNetwork {
    /// Expands every waypoint sequence into a dense path.
    #[must_use]
    pub fn from_waypoints(waypoints: &[Vec<CellCoord>]) -> Self {
        Self {
            paths: waypoints
                .iter()
                .map(|sequence| DensePath::expand(sequence))
                .collect(),
        }
    }

    /// Number of paths in the network.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Reports whether the network contains no paths.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Dense cells of the requested path.
    #[must_use]
    pub fn path(&self, id: PathId) -> Option<&[CellCoord]> {
        let index = usize::try_from(id.get()).ok()?;
        self.paths.get(index).map(|path| path.cells.as_slice())
    }

    /// Waypoints the requested path was expanded from.
    #[must_use]
    pub fn waypoints(&self, id: PathId) -> Option<Vec<CellCoord>> {
        let index = usize::try_from(id.get()).ok()?;
        self.paths.get(index).map(DensePath::waypoints)
    }

    /// Iterator over every dense path in index order.
    pub fn iter(&self) -> impl Iterator<Item = &[CellCoord]> {
        self.paths.iter().map(|path| path.cells.as_slice())
    }

    /// Checks every path against the waypoints it was built from.
    ///
    /// A path passes when it takes unit steps and its recorded waypoints equal
    /// the source sequence with consecutive duplicates removed. On failure the
    /// index of the first offending path is returned.
    pub fn validate(&self, waypoints: &[Vec<CellCoord>]) -> Result<(), usize> {
        if self.paths.len() != waypoints.len() {
            return Err(self.paths.len().min(waypoints.len()));
        }
        match self
            .paths
            .iter()
            .zip(waypoints)
            .position(|(path, source)| {
                !path.takes_unit_steps() || path.waypoints() != dedupe_consecutive(source)
            }) {
            Some(index) => Err(index),
            None => Ok(()),
        }
    }
}

/// Expands a waypoint sequence into a dense unit-step path.
///
/// Consecutive duplicate waypoints collapse into a single cell.
#[must_use]
pub fn expand_waypoints(waypoints: &[CellCoord]) -> Vec<CellCoord> {
    DensePath::expand(waypoints).cells
}

/// Removes consecutive repeats of the same cell.
#[must_use]
pub fn dedupe_consecutive(cells: &[CellCoord]) -> Vec<CellCoord> {
    let mut deduped: Vec<CellCoord> = Vec::with_capacity(cells.len());
    for &cell in cells {
        if deduped.last() != Some(&cell) {
            deduped.push(cell);
        }
    }
    deduped
}

/// Cells on the straight line between two cells, both endpoints included.
pub(crate) fn straight_line(from: CellCoord, to: CellCoord) -> Vec<CellCoord> {
    let (mut x, mut y) = (i64::from(from.column()), i64::from(from.row()));
    let (end_x, end_y) = (i64::from(to.column()), i64::from(to.row()));
    let dx = (end_x - x).abs();
    let dy = (end_y - y).abs();
    let sx = if x < end_x { 1 } else { -1 };
    let sy = if y < end_y { 1 } else { -1 };
    let mut err = dx - dy;

    let mut line = Vec::new();
    loop {
        if let (Ok(column), Ok(row)) = (u32::try_from(x), u32::try_from(y)) {
            line.push(CellCoord::new(column, row));
        }
        if x == end_x && y == end_y {
            break;
        }
        let doubled = 2 * err;
        if doubled > -dy {
            err -= dy;
            x += sx;
        }
        if doubled < dx {
            err += dx;
            y += sy;
        }
    }
    line
}

/// Position at a fractional node index, interpolating between cell centres.
///
/// Progress is clamped to the path so callers never observe positions beyond
/// either end.
pub(crate) fn position_along(path: &[CellCoord], progress: f32) -> Option<Vec2> {
    let last = path.len().checked_sub(1)?;
    let clamped = progress.clamp(0.0, last as f32);
    let lower = (clamped.floor() as usize).min(last);
    let upper = (clamped.ceil() as usize).min(last);
    let fraction = clamped - lower as f32;
    let from = path.get(lower)?.center();
    let to = path.get(upper)?.center();
    Some(from.lerp(to, fraction))
}
