#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Elemental Defence.
//!
//! The world owns the grid, the path network and every tower, enemy and
//! projectile. All mutations flow through [`apply`], which validates each
//! command, updates state and the player's [`ResourceLedger`], and reports the
//! outcome as [`Event`] values. The [`query`] module exposes read-only views
//! for systems and adapters.

pub mod level;
pub mod paths;

mod enemies;
mod grid;
mod projectiles;
mod towers;

use std::time::Duration;

use elemental_defence_core::{
    CellCoord, CellKind, Command, Destination, EnemyId, EnemyKind, Event, Locomotion,
    MovementMode, PathId, PlacementError, PowerUp, ProjectileId, ResourceLedger, SynthesisError,
    TerrainKind, TowerEffect, TowerId, TowerKind, UpgradeAttribute, UpgradeError, UpgradeLevels,
    MAX_TOWER_LEVEL, MAX_UPGRADE_LEVEL, UPGRADE_COST, WELCOME_BANNER,
};
use glam::Vec2;
use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::{
    enemies::EnemyArena,
    grid::Grid,
    paths::{position_along, PathNetwork},
    projectiles::ProjectileRegistry,
    towers::TowerRegistry,
};

pub use level::{Level, LevelDocument, LevelError};

const DEFAULT_CORE_HEALTH: u32 = 1000;
const DEFAULT_RNG_SEED: u64 = 0x42f0_e1eb_d4a5_3c21;

/// Settings applied when a world is created.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorldConfig {
    /// Health the core starts with.
    pub core_health: u32,
    /// How enemies move toward the core.
    pub movement_mode: MovementMode,
    /// Seed for the random rolls made while resolving hits.
    pub rng_seed: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            core_health: DEFAULT_CORE_HEALTH,
            movement_mode: MovementMode::FixedPath,
            rng_seed: DEFAULT_RNG_SEED,
        }
    }
}

/// Represents the authoritative Elemental Defence world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    grid: Grid,
    paths: PathNetwork,
    core: CellCoord,
    destination: Destination,
    core_health: u32,
    core_destroyed: bool,
    movement_mode: MovementMode,
    clock: Duration,
    upgrades: UpgradeLevels,
    towers: TowerRegistry,
    enemies: EnemyArena,
    projectiles: ProjectileRegistry,
    rng: ChaCha8Rng,
}

impl World {
    /// Creates a world on the built-in level with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::from_level(&Level::default(), WorldConfig::default())
    }

    /// Creates a world laid out according to the provided level.
    #[must_use]
    pub fn from_level(level: &Level, config: WorldConfig) -> Self {
        let (columns, rows) = level.dimensions();
        let mut grid = Grid::new(columns, rows);
        for path in level.paths().iter() {
            for &cell in path {
                let _ = grid.set_cell(cell, CellKind::Path);
            }
        }
        for &(cell, terrain) in level.terrain() {
            grid.set_terrain(cell, terrain);
        }
        for &cell in level.obstacles() {
            let _ = grid.set_cell(cell, CellKind::Obstacle);
            grid.set_terrain(cell, TerrainKind::Wall);
        }
        let _ = grid.set_cell(level.core(), CellKind::Core);

        Self {
            banner: WELCOME_BANNER,
            grid,
            paths: level.paths().clone(),
            core: level.core(),
            destination: level.destination(),
            core_health: config.core_health,
            core_destroyed: false,
            movement_mode: config.movement_mode,
            clock: Duration::ZERO,
            upgrades: UpgradeLevels::default(),
            towers: TowerRegistry::new(),
            enemies: EnemyArena::new(),
            projectiles: ProjectileRegistry::new(),
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    fn advance_clock(
        &mut self,
        dt: Duration,
        ledger: &mut ResourceLedger,
        out_events: &mut Vec<Event>,
    ) {
        self.clock = self.clock.saturating_add(dt);
        out_events.push(Event::TimeAdvanced {
            dt,
            now: self.clock,
        });

        let now = self.clock;
        for id in self.enemies.ids() {
            let Some(enemy) = self.enemies.get_mut(id) else {
                continue;
            };
            if enemy.expire_slow(now) {
                out_events.push(Event::EnemySlowExpired { enemy: id });
            }
            let burn = enemy.take_due_burns(now);
            if burn > 0.0 {
                self.damage_enemy(id, burn, ledger, out_events);
            }
        }
    }

    fn spawn_enemy(
        &mut self,
        kind: EnemyKind,
        path: PathId,
        out_events: &mut Vec<Event>,
    ) {
        let Some(&start) = self.paths.path(path).and_then(<[CellCoord]>::first) else {
            debug!("ignoring spawn on unknown path {}", path.get());
            return;
        };
        let locomotion = match self.movement_mode {
            MovementMode::FixedPath => Locomotion::FollowPath {
                path,
                progress: 0.0,
            },
            MovementMode::Dynamic => Locomotion::Navigate {
                cell: start,
                next: None,
                step: 0.0,
            },
        };
        let position = start.center();
        let enemy = self.enemies.spawn(kind, locomotion, position);
        out_events.push(Event::EnemySpawned {
            enemy,
            kind,
            path,
            position,
        });
    }

    fn advance_enemy(&mut self, id: EnemyId, progress: f32, out_events: &mut Vec<Event>) {
        let Some(enemy) = self.enemies.get_mut(id) else {
            debug!("ignoring advance of missing enemy {}", id.get());
            return;
        };
        let Locomotion::FollowPath { path, .. } = enemy.locomotion else {
            return;
        };
        let Some(nodes) = self.paths.path(path) else {
            return;
        };
        let last = nodes.len().saturating_sub(1) as f32;
        if progress >= last {
            self.arrive(id, out_events);
            return;
        }

        let progress = progress.max(0.0);
        enemy.locomotion = Locomotion::FollowPath { path, progress };
        if let Some(position) = position_along(nodes, progress) {
            enemy.position = position;
        }
        out_events.push(Event::EnemyMoved {
            enemy: id,
            position: enemy.position,
        });
    }

    fn navigate_enemy(
        &mut self,
        id: EnemyId,
        cell: CellCoord,
        next: Option<CellCoord>,
        step: f32,
        out_events: &mut Vec<Event>,
    ) {
        let Some(enemy) = self.enemies.get_mut(id) else {
            debug!("ignoring navigation of missing enemy {}", id.get());
            return;
        };
        if !matches!(enemy.locomotion, Locomotion::Navigate { .. }) || !self.grid.contains(cell) {
            return;
        }
        if self.destination.reached(cell) {
            self.arrive(id, out_events);
            return;
        }

        enemy.navigate(cell, next, step.max(0.0));
        if let Some(position) = locate(&self.paths, enemy.locomotion) {
            enemy.position = position;
        }
        out_events.push(Event::EnemyMoved {
            enemy: id,
            position: enemy.position,
        });
    }

    fn arrive(&mut self, id: EnemyId, out_events: &mut Vec<Event>) {
        let Some(enemy) = self.enemies.remove(id) else {
            return;
        };
        let core_damage = enemy.kind.core_damage();
        self.core_health = self.core_health.saturating_sub(core_damage);
        out_events.push(Event::EnemyReachedCore {
            enemy: id,
            core_damage,
        });
        out_events.push(Event::CoreDamaged {
            amount: core_damage,
            remaining: self.core_health,
        });
        if self.core_health == 0 && !self.core_destroyed {
            self.core_destroyed = true;
            info!("core destroyed");
            out_events.push(Event::CoreDestroyed);
        }
    }

    fn damage_enemy(
        &mut self,
        id: EnemyId,
        amount: f32,
        ledger: &mut ResourceLedger,
        out_events: &mut Vec<Event>,
    ) {
        let Some(enemy) = self.enemies.get_mut(id) else {
            return;
        };
        enemy.health -= amount;
        out_events.push(Event::EnemyDamaged {
            enemy: id,
            amount,
            remaining: enemy.health,
        });
        if enemy.health <= 0.0 {
            self.destroy_enemy(id, ledger, out_events);
        }
    }

    fn destroy_enemy(
        &mut self,
        id: EnemyId,
        ledger: &mut ResourceLedger,
        out_events: &mut Vec<Event>,
    ) {
        let Some(enemy) = self.enemies.remove(id) else {
            return;
        };
        let reward = enemy.kind.reward();
        ledger.credit(reward);
        out_events.push(Event::EnemyDestroyed {
            enemy: id,
            kind: enemy.kind,
            reward,
        });
    }

    fn place_tower(
        &mut self,
        kind: TowerKind,
        cell: CellCoord,
        ledger: &mut ResourceLedger,
        out_events: &mut Vec<Event>,
    ) {
        let verdict = if !kind.is_purchasable() {
            Err(PlacementError::NotPurchasable)
        } else {
            match self.grid.cell(cell) {
                None => Err(PlacementError::OutOfBounds),
                Some(CellKind::Empty) if ledger.try_spend(kind.cost()) => Ok(()),
                Some(CellKind::Empty) => Err(PlacementError::InsufficientGold),
                Some(_) => Err(PlacementError::CellNotEmpty),
            }
        };

        if let Err(reason) = verdict {
            debug!("rejected {kind} at {cell:?}: {reason}");
            out_events.push(Event::TowerPlacementRejected { kind, cell, reason });
            return;
        }

        let tower = self.towers.insert(kind, cell);
        let _ = self.grid.set_cell(cell, CellKind::Tower(tower));
        info!("placed {kind} tower {} at {cell:?}", tower.get());
        out_events.push(Event::TowerPlaced {
            tower,
            kind,
            cell,
            cost: kind.cost(),
        });
    }

    fn fire_projectile(&mut self, tower_id: TowerId, target: EnemyId, out_events: &mut Vec<Event>) {
        let now = self.clock;
        let upgrades = self.upgrades;
        let Some(tower) = self.towers.get_mut(tower_id) else {
            debug!("ignoring fire from missing tower {}", tower_id.get());
            return;
        };
        let Some(enemy) = self.enemies.get(target) else {
            debug!("ignoring fire at missing enemy {}", target.get());
            return;
        };

        let snapshot = tower.snapshot(upgrades);
        if !snapshot.ready_to_fire(now) {
            return;
        }
        if snapshot.position.distance(enemy.position) >= snapshot.stats.range {
            return;
        }

        tower.last_fired = Some(now);
        let projectile = self.projectiles.launch(
            tower_id,
            snapshot.kind,
            snapshot.position,
            target,
            enemy.position,
            snapshot.stats.damage,
        );
        out_events.push(Event::ProjectileFired {
            projectile,
            tower: tower_id,
            target,
            origin: snapshot.position,
        });
    }

    fn move_projectile(
        &mut self,
        id: ProjectileId,
        position: Vec2,
        target_position: Vec2,
        out_events: &mut Vec<Event>,
    ) {
        let Some(projectile) = self.projectiles.get_mut(id) else {
            return;
        };
        projectile.position = position;
        projectile.target_position = target_position;
        out_events.push(Event::ProjectileMoved {
            projectile: id,
            position,
        });
    }

    fn resolve_projectile(
        &mut self,
        id: ProjectileId,
        ledger: &mut ResourceLedger,
        out_events: &mut Vec<Event>,
    ) {
        let Some(projectile) = self.projectiles.remove(id) else {
            return;
        };
        let target = projectile.target;
        if self.enemies.get(target).is_none() {
            debug!("projectile {} lost its target", id.get());
            out_events.push(Event::ProjectileMissed { projectile: id });
            return;
        }

        out_events.push(Event::ProjectileHit {
            projectile: id,
            enemy: target,
            damage: projectile.damage,
        });

        let now = self.clock;
        let Some(enemy) = self.enemies.get_mut(target) else {
            return;
        };
        enemy.health -= projectile.damage;
        out_events.push(Event::EnemyDamaged {
            enemy: target,
            amount: projectile.damage,
            remaining: enemy.health,
        });

        if enemy.health > 0.0 {
            let effects = projectile.tower_kind.effects();
            let rng = &mut self.rng;
            let shattered = effects.iter().any(|effect| match *effect {
                TowerEffect::Shatter { chance } => rng.gen::<f32>() < chance,
                _ => false,
            });
            if shattered {
                enemy.health = 0.0;
                out_events.push(Event::EnemyShattered { enemy: target });
            } else {
                for effect in effects {
                    match *effect {
                        TowerEffect::Slow { factor, duration } => {
                            if enemy.slow(factor, duration, now) {
                                out_events.push(Event::EnemySlowed {
                                    enemy: target,
                                    factor,
                                });
                            }
                        }
                        TowerEffect::Burn { damage, delay } => {
                            enemy.schedule_burn(damage, delay, now);
                        }
                        TowerEffect::Push { nodes } => {
                            enemy.push_back(nodes);
                            if let Some(position) = locate(&self.paths, enemy.locomotion) {
                                enemy.position = position;
                            }
                            out_events.push(Event::EnemyPushedBack { enemy: target });
                        }
                        TowerEffect::Shatter { .. } => {}
                    }
                }
            }
        }

        if enemy.health <= 0.0 {
            self.destroy_enemy(target, ledger, out_events);
        }
    }

    fn set_tower_selected(&mut self, id: TowerId, selected: bool, out_events: &mut Vec<Event>) {
        let Some(tower) = self.towers.get_mut(id) else {
            return;
        };
        tower.selected = selected;
        out_events.push(Event::TowerSelectionChanged { tower: id, selected });
    }

    fn synthesize(
        &mut self,
        first: TowerId,
        second: TowerId,
        cell: CellCoord,
        ledger: &mut ResourceLedger,
        out_events: &mut Vec<Event>,
    ) {
        match self.validate_synthesis(first, second, cell, ledger) {
            Ok(kind) => {
                for consumed in [first, second] {
                    if let Some(tower) = self.towers.remove(consumed) {
                        let _ = self.grid.set_cell(tower.cell, CellKind::Empty);
                        out_events.push(Event::TowerConsumed {
                            tower: consumed,
                            cell: tower.cell,
                        });
                    }
                }
                let tower = self.towers.insert(kind, cell);
                let _ = self.grid.set_cell(cell, CellKind::Tower(tower));
                info!("synthesized {kind} tower {} at {cell:?}", tower.get());
                out_events.push(Event::TowersSynthesized {
                    consumed: [first, second],
                    tower,
                    kind,
                    cell,
                    cost: kind.cost(),
                });
            }
            Err(reason) => {
                debug!("rejected synthesis: {reason}");
                out_events.push(Event::SynthesisRejected { reason });
            }
        }
    }

    fn validate_synthesis(
        &self,
        first: TowerId,
        second: TowerId,
        cell: CellCoord,
        ledger: &mut ResourceLedger,
    ) -> Result<TowerKind, SynthesisError> {
        if first == second {
            return Err(SynthesisError::SameKind);
        }
        let (Some(a), Some(b)) = (self.towers.get(first), self.towers.get(second)) else {
            return Err(SynthesisError::MissingTower);
        };
        if a.kind == b.kind {
            return Err(SynthesisError::SameKind);
        }
        let kind = a
            .kind
            .synthesis_result(b.kind)
            .ok_or(SynthesisError::UnknownRecipe {
                first: a.kind,
                second: b.kind,
            })?;
        match self.grid.cell(cell) {
            None => return Err(SynthesisError::OutOfBounds),
            Some(CellKind::Empty) => {}
            Some(_) => return Err(SynthesisError::CellNotEmpty),
        }
        if !ledger.try_spend(kind.cost()) {
            return Err(SynthesisError::InsufficientGold);
        }
        Ok(kind)
    }

    fn damage_tower(&mut self, id: TowerId, amount: u32, out_events: &mut Vec<Event>) {
        let Some(tower) = self.towers.get_mut(id) else {
            debug!("ignoring damage to missing tower {}", id.get());
            return;
        };
        tower.absorb(amount);
        out_events.push(Event::TowerDamaged {
            tower: id,
            health: tower.health,
            barrier: tower.barrier,
        });
        if tower.is_destroyed() {
            let cell = tower.cell;
            let _ = self.towers.remove(id);
            let _ = self.grid.set_cell(cell, CellKind::Empty);
            info!("tower {} destroyed", id.get());
            out_events.push(Event::TowerDestroyed { tower: id, cell });
        }
    }

    fn restore_tower(
        &mut self,
        id: TowerId,
        health: u32,
        barrier: u32,
        out_events: &mut Vec<Event>,
    ) {
        let Some(tower) = self.towers.get_mut(id) else {
            return;
        };
        tower.repair(health);
        tower.recharge(barrier);
        out_events.push(Event::TowerRestored {
            tower: id,
            health: tower.health,
            barrier: tower.barrier,
        });
    }

    fn purchase_upgrade(
        &mut self,
        attribute: UpgradeAttribute,
        ledger: &mut ResourceLedger,
        out_events: &mut Vec<Event>,
    ) {
        let level = self.upgrades.level(attribute);
        let verdict = if level >= MAX_UPGRADE_LEVEL {
            Err(UpgradeError::MaxLevel)
        } else if !ledger.try_spend(UPGRADE_COST) {
            Err(UpgradeError::InsufficientGold)
        } else {
            Ok(())
        };

        match verdict {
            Ok(()) => {
                let level = self.upgrades.level_mut(attribute);
                *level += 1;
                info!("purchased {} upgrade level {}", attribute.name(), *level);
                out_events.push(Event::UpgradePurchased {
                    attribute,
                    level: *level,
                    cost: UPGRADE_COST,
                });
            }
            Err(reason) => out_events.push(Event::UpgradeRejected { attribute, reason }),
        }
    }

    fn level_up_tower(
        &mut self,
        id: TowerId,
        ledger: &mut ResourceLedger,
        out_events: &mut Vec<Event>,
    ) {
        let Some(tower) = self.towers.get_mut(id) else {
            out_events.push(Event::TowerLevelUpRejected {
                tower: id,
                reason: UpgradeError::MissingTower,
            });
            return;
        };
        let cost = tower.kind.cost().saturating_mul(tower.level);
        if tower.level >= MAX_TOWER_LEVEL {
            out_events.push(Event::TowerLevelUpRejected {
                tower: id,
                reason: UpgradeError::MaxLevel,
            });
            return;
        }
        if !ledger.try_spend(cost) {
            out_events.push(Event::TowerLevelUpRejected {
                tower: id,
                reason: UpgradeError::InsufficientGold,
            });
            return;
        }
        tower.level += 1;
        out_events.push(Event::TowerLeveledUp {
            tower: id,
            level: tower.level,
            cost,
        });
    }

    fn apply_power_up(&mut self, id: TowerId, power_up: PowerUp, out_events: &mut Vec<Event>) {
        match self.towers.get_mut(id) {
            Some(tower) => {
                tower.power_ups.accumulate(power_up);
                out_events.push(Event::PowerUpApplied {
                    tower: id,
                    power_up,
                });
            }
            None => out_events.push(Event::PowerUpRejected {
                tower: id,
                reason: UpgradeError::MissingTower,
            }),
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Position of an enemy in world units for the provided movement state.
fn locate(paths: &PathNetwork, locomotion: Locomotion) -> Option<Vec2> {
    match locomotion {
        Locomotion::FollowPath { path, progress } => position_along(paths.path(path)?, progress),
        Locomotion::Navigate { cell, next, step } => Some(match next {
            Some(next) => cell.center().lerp(next.center(), step.clamp(0.0, 1.0)),
            None => cell.center(),
        }),
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Commands referencing entities that no longer exist are ignored. Commands
/// rejected on validation leave the world and the ledger untouched and report
/// the reason through a rejection event.
pub fn apply(
    world: &mut World,
    ledger: &mut ResourceLedger,
    command: Command,
    out_events: &mut Vec<Event>,
) {
    match command {
        Command::Tick { dt } => world.advance_clock(dt, ledger, out_events),
        Command::SpawnEnemy { kind, path } => world.spawn_enemy(kind, path, out_events),
        Command::AdvanceEnemy { enemy, progress } => {
            world.advance_enemy(enemy, progress, out_events)
        }
        Command::NavigateEnemy {
            enemy,
            cell,
            next,
            step,
        } => world.navigate_enemy(enemy, cell, next, step, out_events),
        Command::PlaceTower { kind, cell } => world.place_tower(kind, cell, ledger, out_events),
        Command::FireProjectile { tower, target } => {
            world.fire_projectile(tower, target, out_events)
        }
        Command::MoveProjectile {
            projectile,
            position,
            target_position,
        } => world.move_projectile(projectile, position, target_position, out_events),
        Command::ResolveProjectile { projectile } => {
            world.resolve_projectile(projectile, ledger, out_events)
        }
        Command::SetTowerSelected { tower, selected } => {
            world.set_tower_selected(tower, selected, out_events)
        }
        Command::SynthesizeTowers {
            first,
            second,
            cell,
        } => world.synthesize(first, second, cell, ledger, out_events),
        Command::DamageTower { tower, amount } => world.damage_tower(tower, amount, out_events),
        Command::RepairTower { tower, amount } => world.restore_tower(tower, amount, 0, out_events),
        Command::RechargeBarrier { tower, amount } => {
            world.restore_tower(tower, 0, amount, out_events)
        }
        Command::PurchaseUpgrade { attribute } => {
            world.purchase_upgrade(attribute, ledger, out_events)
        }
        Command::LevelUpTower { tower } => world.level_up_tower(tower, ledger, out_events),
        Command::ApplyPowerUp { tower, power_up } => {
            world.apply_power_up(tower, power_up, out_events)
        }
        Command::GrantWaveBonus { wave, gold } => {
            ledger.credit(gold);
            info!("wave {wave} cleared, {gold} gold awarded");
            out_events.push(Event::WaveBonusGranted { wave, gold });
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use elemental_defence_core::{
        CellCoord, CellKind, Destination, EnemyId, EnemySnapshot, EnemyView, MovementMode,
        ProjectileView, TerrainView, TowerId, TowerSnapshot, TowerView, UpgradeLevels,
    };

    use super::World;
    use crate::paths::PathNetwork;

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Grid dimensions as `(columns, rows)`.
    #[must_use]
    pub fn dimensions(world: &World) -> (u32, u32) {
        world.grid.dimensions()
    }

    /// Contents of the provided cell, or `None` outside the grid.
    #[must_use]
    pub fn cell_at(world: &World, cell: CellCoord) -> Option<CellKind> {
        world.grid.cell(cell)
    }

    /// Tower standing on the provided cell, if any.
    #[must_use]
    pub fn tower_at(world: &World, cell: CellCoord) -> Option<TowerId> {
        match world.grid.cell(cell) {
            Some(CellKind::Tower(tower)) => Some(tower),
            _ => None,
        }
    }

    /// Exposes a read-only view of the terrain grid.
    #[must_use]
    pub fn terrain_view(world: &World) -> TerrainView<'_> {
        let (columns, rows) = world.grid.dimensions();
        TerrainView::new(world.grid.terrain_cells(), columns, rows)
    }

    /// Line navigating enemies head for.
    #[must_use]
    pub fn destination(world: &World) -> Destination {
        world.destination
    }

    /// Provides read-only access to the expanded path network.
    #[must_use]
    pub fn path_network(world: &World) -> &PathNetwork {
        &world.paths
    }

    /// Movement strategy applied to new enemies.
    #[must_use]
    pub fn movement_mode(world: &World) -> MovementMode {
        world.movement_mode
    }

    /// Cell hosting the core.
    #[must_use]
    pub fn core_cell(world: &World) -> CellCoord {
        world.core
    }

    /// Remaining core health.
    #[must_use]
    pub fn core_health(world: &World) -> u32 {
        world.core_health
    }

    /// Reports whether the core has been destroyed.
    #[must_use]
    pub fn is_core_destroyed(world: &World) -> bool {
        world.core_destroyed
    }

    /// Current simulation time.
    #[must_use]
    pub fn clock(world: &World) -> Duration {
        world.clock
    }

    /// Global upgrade levels purchased so far.
    #[must_use]
    pub fn upgrades(world: &World) -> UpgradeLevels {
        world.upgrades
    }

    /// Captures a read-only view of every tower.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        TowerView::from_snapshots(
            world
                .towers
                .iter()
                .map(|tower| tower.snapshot(world.upgrades))
                .collect(),
        )
    }

    /// Snapshot of a single tower.
    #[must_use]
    pub fn tower(world: &World, tower: TowerId) -> Option<TowerSnapshot> {
        world
            .towers
            .get(tower)
            .map(|state| state.snapshot(world.upgrades))
    }

    /// Captures a read-only view of every live enemy.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(world.enemies.iter().map(|enemy| enemy.snapshot()).collect())
    }

    /// Snapshot of a single enemy.
    #[must_use]
    pub fn enemy(world: &World, enemy: EnemyId) -> Option<EnemySnapshot> {
        world.enemies.get(enemy).map(|state| state.snapshot())
    }

    /// Number of live enemies.
    #[must_use]
    pub fn live_enemy_count(world: &World) -> usize {
        world.enemies.len()
    }

    /// Captures a read-only view of every projectile in flight.
    #[must_use]
    pub fn projectile_view(world: &World) -> ProjectileView {
        ProjectileView::from_snapshots(
            world
                .projectiles
                .iter()
                .map(|projectile| projectile.snapshot())
                .collect(),
        )
    }
}
