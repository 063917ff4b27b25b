//! Projectiles in flight.

use std::collections::BTreeMap;

use elemental_defence_core::{EnemyId, ProjectileId, ProjectileSnapshot, TowerId, TowerKind};
use glam::Vec2;

/// Projectile travelling toward an enemy.
#[derive(Clone, Debug)]
pub(crate) struct Projectile {
    pub(crate) id: ProjectileId,
    pub(crate) tower: TowerId,
    pub(crate) tower_kind: TowerKind,
    pub(crate) position: Vec2,
    /// Weak handle; the enemy may already be gone.
    pub(crate) target: EnemyId,
    pub(crate) target_position: Vec2,
    pub(crate) damage: f32,
}

impl Projectile {
    pub(crate) fn snapshot(&self) -> ProjectileSnapshot {
        ProjectileSnapshot {
            id: self.id,
            tower: self.tower,
            tower_kind: self.tower_kind,
            position: self.position,
            target: self.target,
            target_position: self.target_position,
            damage: self.damage,
        }
    }
}

/// Registry of projectiles in flight.
#[derive(Debug)]
pub(crate) struct ProjectileRegistry {
    entries: BTreeMap<ProjectileId, Projectile>,
    next_projectile_id: ProjectileId,
}

impl ProjectileRegistry {
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_projectile_id: ProjectileId::new(0),
        }
    }

    pub(crate) fn launch(
        &mut self,
        tower: TowerId,
        tower_kind: TowerKind,
        origin: Vec2,
        target: EnemyId,
        target_position: Vec2,
        damage: f32,
    ) -> ProjectileId {
        let id = self.next_projectile_id;
        self.next_projectile_id = ProjectileId::new(id.get().saturating_add(1));
        let _ = self.entries.insert(
            id,
            Projectile {
                id,
                tower,
                tower_kind,
                position: origin,
                target,
                target_position,
                damage,
            },
        );
        id
    }

    pub(crate) fn get_mut(&mut self, id: ProjectileId) -> Option<&mut Projectile> {
        self.entries.get_mut(&id)
    }

    pub(crate) fn remove(&mut self, id: ProjectileId) -> Option<Projectile> {
        self.entries.remove(&id)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Projectile> {
        self.entries.values()
    }
}
