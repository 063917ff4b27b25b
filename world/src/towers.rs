//! Authoritative tower state management utilities.

use std::{collections::BTreeMap, time::Duration};

use elemental_defence_core::{
    CellCoord, PowerUpTotals, TowerId, TowerKind, TowerSnapshot, TowerStats, UpgradeLevels,
};

/// State of a tower stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct TowerState {
    /// Identifier allocated by the world for the tower.
    pub(crate) id: TowerId,
    /// Kind of tower that was constructed.
    pub(crate) kind: TowerKind,
    /// Cell hosting the tower.
    pub(crate) cell: CellCoord,
    pub(crate) level: u32,
    pub(crate) health: u32,
    pub(crate) barrier: u32,
    pub(crate) power_ups: PowerUpTotals,
    pub(crate) last_fired: Option<Duration>,
    /// Highlighted as part of a synthesis selection.
    pub(crate) selected: bool,
}

impl TowerState {
    fn new(id: TowerId, kind: TowerKind, cell: CellCoord) -> Self {
        Self {
            id,
            kind,
            cell,
            level: 1,
            health: kind.max_health(),
            barrier: kind.max_barrier(),
            power_ups: PowerUpTotals::default(),
            last_fired: None,
            selected: false,
        }
    }

    pub(crate) fn stats(&self, upgrades: UpgradeLevels) -> TowerStats {
        TowerStats::resolve(self.kind, self.level, upgrades, self.power_ups)
    }

    /// Drains the barrier first and spills the remainder into health.
    pub(crate) fn absorb(&mut self, amount: u32) {
        let absorbed = amount.min(self.barrier);
        self.barrier -= absorbed;
        self.health = self.health.saturating_sub(amount - absorbed);
    }

    pub(crate) fn repair(&mut self, amount: u32) {
        self.health = self
            .health
            .saturating_add(amount)
            .min(self.kind.max_health());
    }

    pub(crate) fn recharge(&mut self, amount: u32) {
        self.barrier = self
            .barrier
            .saturating_add(amount)
            .min(self.kind.max_barrier());
    }

    pub(crate) fn is_destroyed(&self) -> bool {
        self.health == 0
    }

    pub(crate) fn snapshot(&self, upgrades: UpgradeLevels) -> TowerSnapshot {
        TowerSnapshot {
            id: self.id,
            kind: self.kind,
            cell: self.cell,
            position: self.cell.center(),
            level: self.level,
            stats: self.stats(upgrades),
            health: self.health,
            max_health: self.kind.max_health(),
            barrier: self.barrier,
            max_barrier: self.kind.max_barrier(),
            last_fired: self.last_fired,
            selected: self.selected,
        }
    }
}

/// Registry that stores towers and manages identifier allocation.
#[derive(Debug)]
pub(crate) struct TowerRegistry {
    entries: BTreeMap<TowerId, TowerState>,
    next_tower_id: TowerId,
}

impl TowerRegistry {
    /// Creates an empty tower registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_tower_id: TowerId::new(0),
        }
    }

    /// Stores a fresh tower and returns the identifier allocated to it.
    pub(crate) fn insert(&mut self, kind: TowerKind, cell: CellCoord) -> TowerId {
        let id = self.next_tower_id;
        self.next_tower_id = TowerId::new(id.get().saturating_add(1));
        let _ = self.entries.insert(id, TowerState::new(id, kind, cell));
        id
    }

    pub(crate) fn get(&self, id: TowerId) -> Option<&TowerState> {
        self.entries.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: TowerId) -> Option<&mut TowerState> {
        self.entries.get_mut(&id)
    }

    pub(crate) fn remove(&mut self, id: TowerId) -> Option<TowerState> {
        self.entries.remove(&id)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &TowerState> {
        self.entries.values()
    }
}
