//! Live enemy storage and status effect bookkeeping.

use std::{
    collections::{BTreeMap, VecDeque},
    time::Duration,
};

use elemental_defence_core::{CellCoord, EnemyId, EnemyKind, EnemySnapshot, Locomotion};
use glam::Vec2;

/// Cells a navigating enemy remembers so it can be pushed back along its route.
const TRAIL_LEN: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq)]
struct ActiveSlow {
    factor: f32,
    expires_at: Duration,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct PendingBurn {
    damage: f32,
    due: Duration,
}

/// State of a live enemy stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct Enemy {
    pub(crate) id: EnemyId,
    pub(crate) kind: EnemyKind,
    pub(crate) health: f32,
    pub(crate) locomotion: Locomotion,
    pub(crate) position: Vec2,
    slow: Option<ActiveSlow>,
    burns: Vec<PendingBurn>,
    trail: VecDeque<CellCoord>,
}

impl Enemy {
    fn new(id: EnemyId, kind: EnemyKind, locomotion: Locomotion, position: Vec2) -> Self {
        Self {
            id,
            kind,
            health: kind.max_health(),
            locomotion,
            position,
            slow: None,
            burns: Vec::new(),
            trail: VecDeque::with_capacity(TRAIL_LEN),
        }
    }

    /// Current speed including any active slow.
    pub(crate) fn speed(&self) -> f32 {
        let base = self.kind.speed();
        self.slow.map_or(base, |slow| base * slow.factor)
    }

    /// Applies a slow unless one is already active. Returns whether it took hold.
    pub(crate) fn slow(&mut self, factor: f32, duration: Duration, now: Duration) -> bool {
        if self.slow.is_some() {
            return false;
        }
        self.slow = Some(ActiveSlow {
            factor,
            expires_at: now.saturating_add(duration),
        });
        true
    }

    /// Clears a slow whose expiry has passed. Returns whether one was cleared.
    pub(crate) fn expire_slow(&mut self, now: Duration) -> bool {
        match self.slow {
            Some(slow) if slow.expires_at <= now => {
                self.slow = None;
                true
            }
            _ => false,
        }
    }

    pub(crate) fn schedule_burn(&mut self, damage: f32, delay: Duration, now: Duration) {
        self.burns.push(PendingBurn {
            damage,
            due: now.saturating_add(delay),
        });
    }

    /// Removes every burn that is due and returns their combined damage.
    pub(crate) fn take_due_burns(&mut self, now: Duration) -> f32 {
        let mut total = 0.0;
        self.burns.retain(|burn| {
            if burn.due <= now {
                total += burn.damage;
                false
            } else {
                true
            }
        });
        total
    }

    /// Moves a navigating enemy, remembering the cell it leaves behind.
    pub(crate) fn navigate(&mut self, cell: CellCoord, next: Option<CellCoord>, step: f32) {
        if let Locomotion::Navigate { cell: current, .. } = self.locomotion {
            if current != cell {
                if self.trail.len() == TRAIL_LEN {
                    let _ = self.trail.pop_front();
                }
                self.trail.push_back(current);
            }
        }
        self.locomotion = Locomotion::Navigate { cell, next, step };
    }

    /// Moves the enemy back along its route, never past the start.
    ///
    /// Navigating enemies retrace the cells they remember and stop at the
    /// oldest one once the trail runs out.
    pub(crate) fn push_back(&mut self, nodes: f32) {
        match &mut self.locomotion {
            Locomotion::FollowPath { progress, .. } => *progress = (*progress - nodes).max(0.0),
            Locomotion::Navigate { cell, next, step } => {
                let mut remaining = nodes.max(0.0);
                while remaining > *step {
                    remaining -= *step;
                    let Some(previous) = self.trail.pop_back() else {
                        *step = 0.0;
                        return;
                    };
                    *next = Some(*cell);
                    *cell = previous;
                    *step = 1.0;
                }
                *step -= remaining;
            }
        }
    }

    pub(crate) fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            kind: self.kind,
            health: self.health,
            max_health: self.kind.max_health(),
            speed: self.speed(),
            position: self.position,
            locomotion: self.locomotion,
        }
    }
}

/// Arena that owns live enemies and hands out identifiers.
#[derive(Debug)]
pub(crate) struct EnemyArena {
    entries: BTreeMap<EnemyId, Enemy>,
    next_enemy_id: EnemyId,
}

impl EnemyArena {
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_enemy_id: EnemyId::new(0),
        }
    }

    pub(crate) fn spawn(&mut self, kind: EnemyKind, locomotion: Locomotion, position: Vec2) -> EnemyId {
        let id = self.next_enemy_id;
        self.next_enemy_id = EnemyId::new(id.get().saturating_add(1));
        let _ = self
            .entries
            .insert(id, Enemy::new(id, kind, locomotion, position));
        id
    }

    pub(crate) fn get(&self, id: EnemyId) -> Option<&Enemy> {
        self.entries.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: EnemyId) -> Option<&mut Enemy> {
        self.entries.get_mut(&id)
    }

    pub(crate) fn remove(&mut self, id: EnemyId) -> Option<Enemy> {
        self.entries.remove(&id)
    }

    pub(crate) fn ids(&self) -> Vec<EnemyId> {
        self.entries.keys().copied().collect()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Enemy> {
        self.entries.values()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
