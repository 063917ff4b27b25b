//! Dense cell and terrain storage for the playing field.

use elemental_defence_core::{CellCoord, CellKind, TerrainKind};

/// Row-major grid tracking what occupies each cell and its terrain.
#[derive(Clone, Debug)]
pub(crate) struct Grid {
    columns: u32,
    rows: u32,
    cells: Vec<CellKind>,
    terrain: Vec<TerrainKind>,
}

impl Grid {
    /// Creates an empty grid of plain terrain.
    pub(crate) fn new(columns: u32, rows: u32) -> Self {
        let capacity_u64 = u64::from(columns) * u64::from(rows);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Self {
            columns,
            rows,
            cells: vec![CellKind::Empty; capacity],
            terrain: vec![TerrainKind::Plain; capacity],
        }
    }

    pub(crate) fn cell(&self, cell: CellCoord) -> Option<CellKind> {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied())
    }

    /// Overwrites the contents of a cell, returning `false` when out of bounds.
    pub(crate) fn set_cell(&mut self, cell: CellCoord, kind: CellKind) -> bool {
        match self.index(cell).and_then(|index| self.cells.get_mut(index)) {
            Some(slot) => {
                *slot = kind;
                true
            }
            None => false,
        }
    }

    pub(crate) fn set_terrain(&mut self, cell: CellCoord, kind: TerrainKind) {
        if let Some(slot) = self
            .index(cell)
            .and_then(|index| self.terrain.get_mut(index))
        {
            *slot = kind;
        }
    }

    pub(crate) fn terrain_cells(&self) -> &[TerrainKind] {
        &self.terrain
    }

    pub(crate) fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    pub(crate) fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if self.contains(cell) {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use elemental_defence_core::TowerId;

    #[test]
    fn new_grid_is_empty_plain_ground() {
        let grid = Grid::new(3, 2);
        assert_eq!(grid.cell(CellCoord::new(2, 1)), Some(CellKind::Empty));
        assert_eq!(grid.terrain_cells().len(), 6);
        assert!(grid
            .terrain_cells()
            .iter()
            .all(|terrain| *terrain == TerrainKind::Plain));
    }

    #[test]
    fn out_of_bounds_cells_are_absent() {
        let mut grid = Grid::new(3, 2);
        assert_eq!(grid.cell(CellCoord::new(3, 0)), None);
        assert!(!grid.set_cell(CellCoord::new(0, 2), CellKind::Path));
    }

    #[test]
    fn set_cell_overwrites_contents() {
        let mut grid = Grid::new(3, 2);
        let cell = CellCoord::new(1, 1);
        assert!(grid.set_cell(cell, CellKind::Tower(TowerId::new(4))));
        assert_eq!(grid.cell(cell), Some(CellKind::Tower(TowerId::new(4))));
    }
}
