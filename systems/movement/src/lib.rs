#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic movement system that advances enemies toward the core.
//!
//! Path-following enemies gain their current speed in path nodes every tick.
//! Navigating enemies are routed across the terrain grid with A* each tick and
//! step into the next route cell whenever their accumulated step reaches one.

use std::{cmp::Ordering, collections::BinaryHeap};

use elemental_defence_core::{
    CellCoord, Command, Destination, EnemySnapshot, EnemyView, Event, Locomotion, TerrainView,
};

/// Pure system that reacts to world events and emits movement commands.
#[derive(Debug, Default)]
pub struct Movement {
    router: Router,
}

impl Movement {
    /// Creates a new movement system.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes world events and immutable views to emit movement commands.
    ///
    /// Nothing moves unless the batch contains a [`Event::TimeAdvanced`].
    pub fn handle(
        &mut self,
        events: &[Event],
        enemies: &EnemyView,
        terrain: TerrainView<'_>,
        destination: Destination,
        out: &mut Vec<Command>,
    ) {
        if !events
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced { .. }))
        {
            return;
        }

        for enemy in enemies.iter() {
            match enemy.locomotion {
                Locomotion::FollowPath { progress, .. } => out.push(Command::AdvanceEnemy {
                    enemy: enemy.id,
                    progress: progress + enemy.speed,
                }),
                Locomotion::Navigate { cell, step, .. } => {
                    if let Some(command) = self.navigate(enemy, cell, step, &terrain, destination)
                    {
                        out.push(command);
                    }
                }
            }
        }
    }

    fn navigate(
        &mut self,
        enemy: &EnemySnapshot,
        cell: CellCoord,
        step: f32,
        terrain: &TerrainView<'_>,
        destination: Destination,
    ) -> Option<Command> {
        let route = self.router.route(terrain, cell, destination)?;

        let mut cell = cell;
        let mut cursor = 1;
        let mut next = route.get(cursor).copied();
        let mut step = step + enemy.speed;
        while step >= 1.0 {
            let Some(entered) = next else {
                break;
            };
            cell = entered;
            step -= 1.0;
            cursor += 1;
            next = route.get(cursor).copied();
        }
        if next.is_none() {
            step = 0.0;
        }

        Some(Command::NavigateEnemy {
            enemy: enemy.id,
            cell,
            next,
            step,
        })
    }
}

/// Computes the cheapest route from `start` to any cell on the destination line.
///
/// Entering a cell costs the reciprocal of its terrain multiplier and
/// impassable cells are never entered. The returned route begins with `start`.
/// Among equally promising candidates the one discovered first is expanded
/// first, so routes are deterministic.
#[must_use]
pub fn find_route(
    terrain: &TerrainView<'_>,
    start: CellCoord,
    destination: Destination,
) -> Option<Vec<CellCoord>> {
    Router::default().route(terrain, start, destination)
}

#[derive(Clone, Copy, Debug)]
struct Frontier {
    estimate: f32,
    cost: f32,
    sequence: u64,
    index: usize,
}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .estimate
            .total_cmp(&self.estimate)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

/// A* search with reusable scratch buffers.
#[derive(Debug, Default)]
struct Router {
    costs: Vec<f32>,
    parents: Vec<Option<usize>>,
    open: BinaryHeap<Frontier>,
}

impl Router {
    fn route(
        &mut self,
        terrain: &TerrainView<'_>,
        start: CellCoord,
        destination: Destination,
    ) -> Option<Vec<CellCoord>> {
        let (columns, rows) = terrain.dimensions();
        if start.column() >= columns || start.row() >= rows {
            return None;
        }
        let width = usize::try_from(columns).ok()?;
        let cell_count = width.checked_mul(usize::try_from(rows).ok()?)?;

        self.costs.clear();
        self.costs.resize(cell_count, f32::INFINITY);
        self.parents.clear();
        self.parents.resize(cell_count, None);
        self.open.clear();

        let start_index = index(width, start)?;
        *self.costs.get_mut(start_index)? = 0.0;
        let mut sequence = 0;
        self.open.push(Frontier {
            estimate: destination.heuristic(start) as f32,
            cost: 0.0,
            sequence,
            index: start_index,
        });

        while let Some(node) = self.open.pop() {
            if self.costs.get(node.index).map_or(true, |best| node.cost > *best) {
                continue;
            }
            let Some(cell) = cell_at(width, node.index) else {
                continue;
            };
            if destination.reached(cell) {
                return Some(self.reconstruct(width, node.index));
            }

            for neighbor in neighbors(cell, columns, rows) {
                let multiplier = terrain.multiplier(neighbor);
                if multiplier <= 0.0 {
                    continue;
                }
                let Some(neighbor_index) = index(width, neighbor) else {
                    continue;
                };
                let cost = node.cost + 1.0 / multiplier;
                let Some(best) = self.costs.get_mut(neighbor_index) else {
                    continue;
                };
                if cost >= *best {
                    continue;
                }
                *best = cost;
                if let Some(parent) = self.parents.get_mut(neighbor_index) {
                    *parent = Some(node.index);
                }
                sequence += 1;
                self.open.push(Frontier {
                    estimate: cost + destination.heuristic(neighbor) as f32,
                    cost,
                    sequence,
                    index: neighbor_index,
                });
            }
        }

        None
    }

    fn reconstruct(&self, width: usize, goal: usize) -> Vec<CellCoord> {
        let mut route = Vec::new();
        let mut current = Some(goal);
        while let Some(index) = current {
            if let Some(cell) = cell_at(width, index) {
                route.push(cell);
            }
            current = self.parents.get(index).copied().flatten();
        }
        route.reverse();
        route
    }
}

fn neighbors(cell: CellCoord, width: u32, height: u32) -> impl Iterator<Item = CellCoord> {
    let mut candidates = [None; 4];
    let mut count = 0;

    if let Some(row) = cell.row().checked_sub(1) {
        candidates[count] = Some(CellCoord::new(cell.column(), row));
        count += 1;
    }

    if let Some(column) = cell.column().checked_add(1) {
        if column < width {
            candidates[count] = Some(CellCoord::new(column, cell.row()));
            count += 1;
        }
    }

    if let Some(row) = cell.row().checked_add(1) {
        if row < height {
            candidates[count] = Some(CellCoord::new(cell.column(), row));
            count += 1;
        }
    }

    if let Some(column) = cell.column().checked_sub(1) {
        candidates[count] = Some(CellCoord::new(column, cell.row()));
        count += 1;
    }

    candidates.into_iter().take(count).flatten()
}

fn index(width: usize, cell: CellCoord) -> Option<usize> {
    let column = usize::try_from(cell.column()).ok()?;
    let row = usize::try_from(cell.row()).ok()?;
    row.checked_mul(width)?.checked_add(column)
}

fn cell_at(width: usize, index: usize) -> Option<CellCoord> {
    let column = u32::try_from(index.checked_rem(width)?).ok()?;
    let row = u32::try_from(index.checked_div(width)?).ok()?;
    Some(CellCoord::new(column, row))
}
