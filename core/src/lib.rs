#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Elemental Defence engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::{fmt, str::FromStr, time::Duration};

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Elemental Defence.";

/// Number of world units spanned by a single grid cell edge.
pub const CELL_SIZE: f32 = 20.0;

/// Highest level a tower can reach through level ups.
pub const MAX_TOWER_LEVEL: u32 = 3;

/// Gold charged for a single global upgrade purchase.
pub const UPGRADE_COST: u32 = 100;

/// Number of global upgrades that can be purchased per attribute.
pub const MAX_UPGRADE_LEVEL: u32 = 5;

/// Shortest interval a tower may ever fire at, regardless of bonuses.
pub const MIN_FIRE_INTERVAL: Duration = Duration::from_millis(100);

const SLOW_DURATION: Duration = Duration::from_millis(3000);
const BURN_DAMAGE: f32 = 5.0;
const SHATTER_CHANCE: f32 = 0.1;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Spawns a new enemy at the start of the provided path.
    SpawnEnemy {
        /// Kind of enemy to create.
        kind: EnemyKind,
        /// Path the enemy should follow toward the core.
        path: PathId,
    },
    /// Moves a path-following enemy to the provided fractional node index.
    AdvanceEnemy {
        /// Identifier of the enemy being moved.
        enemy: EnemyId,
        /// Fractional node index along the enemy's path.
        progress: f32,
    },
    /// Moves a navigating enemy through the grid.
    NavigateEnemy {
        /// Identifier of the enemy being moved.
        enemy: EnemyId,
        /// Cell the enemy currently occupies.
        cell: CellCoord,
        /// Next cell along the enemy's route, if a route exists.
        next: Option<CellCoord>,
        /// Fraction of the way from `cell` toward `next`.
        step: f32,
    },
    /// Requests that a tower be purchased and placed on the provided cell.
    PlaceTower {
        /// Kind of tower to construct.
        kind: TowerKind,
        /// Cell that will host the tower.
        cell: CellCoord,
    },
    /// Requests that a tower launch a projectile at an enemy.
    FireProjectile {
        /// Tower initiating the attack.
        tower: TowerId,
        /// Enemy targeted by the projectile.
        target: EnemyId,
    },
    /// Moves a projectile that is still in flight.
    MoveProjectile {
        /// Identifier of the projectile being moved.
        projectile: ProjectileId,
        /// New position of the projectile in world units.
        position: Vec2,
        /// Last known position of the projectile's target.
        target_position: Vec2,
    },
    /// Resolves a projectile as a hit or a miss and removes it.
    ResolveProjectile {
        /// Identifier of the projectile being resolved.
        projectile: ProjectileId,
    },
    /// Toggles the synthesis highlight on a tower.
    SetTowerSelected {
        /// Tower whose highlight changes.
        tower: TowerId,
        /// Whether the tower is selected for synthesis.
        selected: bool,
    },
    /// Consumes two towers and creates their synthesized successor.
    SynthesizeTowers {
        /// First tower consumed by the synthesis.
        first: TowerId,
        /// Second tower consumed by the synthesis.
        second: TowerId,
        /// Empty cell that will host the synthesized tower.
        cell: CellCoord,
    },
    /// Deals damage to a tower, draining its barrier before its health.
    DamageTower {
        /// Tower receiving the damage.
        tower: TowerId,
        /// Amount of damage dealt.
        amount: u32,
    },
    /// Restores health to a tower, clamped at its maximum.
    RepairTower {
        /// Tower being repaired.
        tower: TowerId,
        /// Amount of health restored.
        amount: u32,
    },
    /// Restores barrier to a tower, clamped at its maximum.
    RechargeBarrier {
        /// Tower whose barrier is recharged.
        tower: TowerId,
        /// Amount of barrier restored.
        amount: u32,
    },
    /// Purchases a global upgrade affecting every tower.
    PurchaseUpgrade {
        /// Attribute that should be improved.
        attribute: UpgradeAttribute,
    },
    /// Raises the level of a single tower.
    LevelUpTower {
        /// Tower being levelled.
        tower: TowerId,
    },
    /// Grants a power-up to a single tower.
    ApplyPowerUp {
        /// Tower receiving the power-up.
        tower: TowerId,
        /// Power-up being granted.
        power_up: PowerUp,
    },
    /// Credits the bonus awarded for clearing a wave.
    GrantWaveBonus {
        /// Wave that was cleared.
        wave: u32,
        /// Gold awarded for the clear.
        gold: u32,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that simulated time advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed.
        dt: Duration,
        /// Simulation clock after the advance.
        now: Duration,
    },
    /// Announces that an enemy entered the world.
    EnemySpawned {
        /// Identifier allocated to the enemy.
        enemy: EnemyId,
        /// Kind of enemy that was spawned.
        kind: EnemyKind,
        /// Path the enemy follows.
        path: PathId,
        /// Spawn position in world units.
        position: Vec2,
    },
    /// Reports that an enemy changed position.
    EnemyMoved {
        /// Identifier of the enemy that moved.
        enemy: EnemyId,
        /// New position in world units.
        position: Vec2,
    },
    /// Reports that an enemy reached the core and left the world.
    EnemyReachedCore {
        /// Identifier of the arriving enemy.
        enemy: EnemyId,
        /// Damage dealt to the core.
        core_damage: u32,
    },
    /// Reports that an enemy lost health.
    EnemyDamaged {
        /// Identifier of the damaged enemy.
        enemy: EnemyId,
        /// Amount of health removed.
        amount: f32,
        /// Health remaining after the damage.
        remaining: f32,
    },
    /// Reports that an enemy was slowed.
    EnemySlowed {
        /// Identifier of the slowed enemy.
        enemy: EnemyId,
        /// Speed multiplier in effect.
        factor: f32,
    },
    /// Reports that an active slow wore off.
    EnemySlowExpired {
        /// Identifier of the enemy regaining its speed.
        enemy: EnemyId,
    },
    /// Reports that an enemy was pushed back along its route.
    EnemyPushedBack {
        /// Identifier of the pushed enemy.
        enemy: EnemyId,
    },
    /// Reports that an enemy was shattered outright.
    EnemyShattered {
        /// Identifier of the shattered enemy.
        enemy: EnemyId,
    },
    /// Reports that an enemy was destroyed and its reward credited.
    EnemyDestroyed {
        /// Identifier of the destroyed enemy.
        enemy: EnemyId,
        /// Kind of the destroyed enemy.
        kind: EnemyKind,
        /// Gold credited for the kill.
        reward: u32,
    },
    /// Reports damage dealt to the core.
    CoreDamaged {
        /// Amount of damage dealt.
        amount: u32,
        /// Core health remaining.
        remaining: u32,
    },
    /// Indicates that the core was destroyed and the game is over.
    CoreDestroyed,
    /// Confirms that a tower was purchased and placed.
    TowerPlaced {
        /// Identifier allocated to the tower.
        tower: TowerId,
        /// Kind of tower that was placed.
        kind: TowerKind,
        /// Cell hosting the tower.
        cell: CellCoord,
        /// Gold debited for the purchase.
        cost: u32,
    },
    /// Reports that a placement request was rejected.
    TowerPlacementRejected {
        /// Kind of tower requested.
        kind: TowerKind,
        /// Cell requested for the tower.
        cell: CellCoord,
        /// Reason the request failed.
        reason: PlacementError,
    },
    /// Reports that a tower's synthesis highlight changed.
    TowerSelectionChanged {
        /// Tower whose highlight changed.
        tower: TowerId,
        /// Whether the tower is now selected.
        selected: bool,
    },
    /// Reports that a tower took damage.
    TowerDamaged {
        /// Tower that received the damage.
        tower: TowerId,
        /// Health remaining after the damage.
        health: u32,
        /// Barrier remaining after the damage.
        barrier: u32,
    },
    /// Reports that a tower's health or barrier was restored.
    TowerRestored {
        /// Tower that was restored.
        tower: TowerId,
        /// Health after the restoration.
        health: u32,
        /// Barrier after the restoration.
        barrier: u32,
    },
    /// Reports that a tower was destroyed and its cell freed.
    TowerDestroyed {
        /// Identifier of the destroyed tower.
        tower: TowerId,
        /// Cell that was freed.
        cell: CellCoord,
    },
    /// Reports that a tower was consumed by synthesis and its cell freed.
    TowerConsumed {
        /// Identifier of the consumed tower.
        tower: TowerId,
        /// Cell that was freed.
        cell: CellCoord,
    },
    /// Confirms that two towers were combined into a new one.
    TowersSynthesized {
        /// Towers consumed by the synthesis.
        consumed: [TowerId; 2],
        /// Identifier allocated to the synthesized tower.
        tower: TowerId,
        /// Kind of the synthesized tower.
        kind: TowerKind,
        /// Cell hosting the synthesized tower.
        cell: CellCoord,
        /// Gold debited for the synthesis.
        cost: u32,
    },
    /// Reports that a synthesis request was rejected.
    SynthesisRejected {
        /// Reason the request failed.
        reason: SynthesisError,
    },
    /// Confirms that a global upgrade was purchased.
    UpgradePurchased {
        /// Attribute that was improved.
        attribute: UpgradeAttribute,
        /// Upgrade level reached for the attribute.
        level: u32,
        /// Gold debited for the purchase.
        cost: u32,
    },
    /// Reports that a global upgrade request was rejected.
    UpgradeRejected {
        /// Attribute requested.
        attribute: UpgradeAttribute,
        /// Reason the request failed.
        reason: UpgradeError,
    },
    /// Confirms that a tower gained a level.
    TowerLeveledUp {
        /// Tower that gained the level.
        tower: TowerId,
        /// Level reached.
        level: u32,
        /// Gold debited for the level up.
        cost: u32,
    },
    /// Reports that a level up request was rejected.
    TowerLevelUpRejected {
        /// Tower requested.
        tower: TowerId,
        /// Reason the request failed.
        reason: UpgradeError,
    },
    /// Confirms that a tower received a power-up.
    PowerUpApplied {
        /// Tower that received the power-up.
        tower: TowerId,
        /// Power-up that was granted.
        power_up: PowerUp,
    },
    /// Reports that a power-up could not be granted.
    PowerUpRejected {
        /// Tower requested.
        tower: TowerId,
        /// Reason the request failed.
        reason: UpgradeError,
    },
    /// Announces that a tower launched a projectile.
    ProjectileFired {
        /// Identifier allocated to the projectile.
        projectile: ProjectileId,
        /// Tower that fired.
        tower: TowerId,
        /// Enemy targeted by the projectile.
        target: EnemyId,
        /// Launch position in world units.
        origin: Vec2,
    },
    /// Reports that a projectile changed position.
    ProjectileMoved {
        /// Identifier of the projectile.
        projectile: ProjectileId,
        /// New position in world units.
        position: Vec2,
    },
    /// Reports that a projectile struck its target.
    ProjectileHit {
        /// Identifier of the projectile.
        projectile: ProjectileId,
        /// Enemy that was struck.
        enemy: EnemyId,
        /// Damage carried by the projectile.
        damage: f32,
    },
    /// Reports that a projectile lost its target and was discarded.
    ProjectileMissed {
        /// Identifier of the projectile.
        projectile: ProjectileId,
    },
    /// Reports that gold was credited for clearing a wave.
    WaveBonusGranted {
        /// Wave that was cleared.
        wave: u32,
        /// Gold credited.
        gold: u32,
    },
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the tower identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Index of a path within the level's path network.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PathId(u32);

impl PathId {
    /// Creates a new path identifier with the provided index.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric index of the path.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Position of the cell's centre in world units.
    #[must_use]
    pub fn center(self) -> Vec2 {
        Vec2::new(
            self.column as f32 * CELL_SIZE + CELL_SIZE / 2.0,
            self.row as f32 * CELL_SIZE + CELL_SIZE / 2.0,
        )
    }
}

/// Contents of a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    /// Free ground that can host a tower.
    Empty,
    /// Part of an enemy path.
    Path,
    /// Blocked ground that neither enemies nor towers may use.
    Obstacle,
    /// The protected core.
    Core,
    /// Ground hosting the referenced tower.
    Tower(TowerId),
}

/// Terrain classes that modulate how quickly enemies traverse a cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerrainKind {
    /// Open ground at full speed.
    #[default]
    Plain,
    /// Dense vegetation.
    Forest,
    /// Steep ground.
    Mountain,
    /// Water that enemies cannot cross.
    Water,
    /// Solid wall that enemies cannot cross.
    Wall,
}

impl TerrainKind {
    /// Speed multiplier applied to enemies crossing this terrain.
    #[must_use]
    pub const fn speed_multiplier(self) -> f32 {
        match self {
            Self::Plain => 1.0,
            Self::Forest => 0.7,
            Self::Mountain => 0.5,
            Self::Water | Self::Wall => 0.0,
        }
    }

    /// Reports whether enemies may enter cells of this terrain.
    #[must_use]
    pub fn is_traversable(self) -> bool {
        self.speed_multiplier() > 0.0
    }
}

/// Line of cells that navigating enemies try to reach.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Destination {
    /// Any cell in the provided column.
    Column(u32),
    /// Any cell in the provided row.
    Row(u32),
}

impl Destination {
    /// Reports whether the cell lies on the destination line.
    #[must_use]
    pub const fn reached(self, cell: CellCoord) -> bool {
        match self {
            Self::Column(column) => cell.column() == column,
            Self::Row(row) => cell.row() == row,
        }
    }

    /// Manhattan distance from the cell to the destination line.
    #[must_use]
    pub fn heuristic(self, cell: CellCoord) -> u32 {
        match self {
            Self::Column(column) => cell.column().abs_diff(column),
            Self::Row(row) => cell.row().abs_diff(row),
        }
    }
}

/// Strategy used to move enemies toward the core.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementMode {
    /// Enemies follow their precomputed path.
    #[default]
    FixedPath,
    /// Enemies route across the terrain grid each tick.
    Dynamic,
}

/// How an enemy is currently moving through the world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Locomotion {
    /// Following a path from the level's path network.
    FollowPath {
        /// Path being followed.
        path: PathId,
        /// Fractional node index along the path.
        progress: f32,
    },
    /// Routing across the grid toward the destination line.
    Navigate {
        /// Cell currently occupied.
        cell: CellCoord,
        /// Next cell along the route, if one exists.
        next: Option<CellCoord>,
        /// Fraction of the way from `cell` toward `next`.
        step: f32,
    },
}

/// Elemental tower kinds, including the synthesized variants.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum TowerKind {
    /// Slows enemies it strikes.
    Ice,
    /// Sets enemies alight for delayed damage.
    Fire,
    /// Heavy hitter that may shatter enemies outright.
    Stone,
    /// Long-range tower that pushes enemies back.
    Wind,
    /// Synthesized from fire and ice.
    Water,
    /// Synthesized from ice and stone.
    FrozenEarth,
    /// Synthesized from ice and wind.
    ColdAir,
    /// Synthesized from fire and stone.
    Iron,
    /// Synthesized from fire and wind.
    HotWind,
    /// Synthesized from stone and wind.
    Sand,
}

const ICE_EFFECTS: &[TowerEffect] = &[TowerEffect::Slow {
    factor: 0.8,
    duration: SLOW_DURATION,
}];
const FIRE_EFFECTS: &[TowerEffect] = &[TowerEffect::Burn {
    damage: BURN_DAMAGE,
    delay: Duration::from_millis(1000),
}];
const STONE_EFFECTS: &[TowerEffect] = &[TowerEffect::Shatter {
    chance: SHATTER_CHANCE,
}];
const WIND_EFFECTS: &[TowerEffect] = &[TowerEffect::Push { nodes: 1.0 }];
const WATER_EFFECTS: &[TowerEffect] = &[
    TowerEffect::Slow {
        factor: 0.7,
        duration: SLOW_DURATION,
    },
    TowerEffect::Burn {
        damage: BURN_DAMAGE,
        delay: Duration::from_millis(3000),
    },
];
const FROZEN_EARTH_EFFECTS: &[TowerEffect] = &[
    TowerEffect::Slow {
        factor: 0.6,
        duration: SLOW_DURATION,
    },
    TowerEffect::Shatter {
        chance: SHATTER_CHANCE,
    },
];
const COLD_AIR_EFFECTS: &[TowerEffect] = &[
    TowerEffect::Slow {
        factor: 0.5,
        duration: SLOW_DURATION,
    },
    TowerEffect::Push { nodes: 1.0 },
];
const IRON_EFFECTS: &[TowerEffect] = &[
    TowerEffect::Burn {
        damage: BURN_DAMAGE,
        delay: Duration::from_millis(2000),
    },
    TowerEffect::Shatter {
        chance: SHATTER_CHANCE,
    },
];
const HOT_WIND_EFFECTS: &[TowerEffect] = &[
    TowerEffect::Burn {
        damage: BURN_DAMAGE,
        delay: Duration::from_millis(1500),
    },
    TowerEffect::Push { nodes: 1.0 },
];
const SAND_EFFECTS: &[TowerEffect] = &[
    TowerEffect::Shatter {
        chance: SHATTER_CHANCE,
    },
    TowerEffect::Push { nodes: 1.0 },
];

impl TowerKind {
    /// Every tower kind in catalogue order.
    pub const ALL: [TowerKind; 10] = [
        Self::Ice,
        Self::Fire,
        Self::Stone,
        Self::Wind,
        Self::Water,
        Self::FrozenEarth,
        Self::ColdAir,
        Self::Iron,
        Self::HotWind,
        Self::Sand,
    ];

    /// Base damage dealt per projectile at level one.
    #[must_use]
    pub const fn damage(self) -> f32 {
        match self {
            Self::Ice => 20.0,
            Self::Fire => 40.0,
            Self::Stone => 100.0,
            Self::Wind => 16.0,
            Self::Water | Self::Sand => 35.0,
            Self::FrozenEarth => 45.0,
            Self::ColdAir => 25.0,
            Self::Iron => 50.0,
            Self::HotWind => 30.0,
        }
    }

    /// Base targeting radius measured in world units.
    #[must_use]
    pub const fn range(self) -> f32 {
        match self {
            Self::Ice | Self::Fire | Self::Water => 80.0,
            Self::Stone => 50.0,
            Self::Wind => 160.0,
            Self::FrozenEarth | Self::Iron | Self::Sand => 60.0,
            Self::ColdAir => 120.0,
            Self::HotWind => 100.0,
        }
    }

    /// Base time between consecutive shots.
    #[must_use]
    pub const fn fire_interval(self) -> Duration {
        match self {
            Self::Ice | Self::Sand => Duration::from_millis(1000),
            Self::Fire => Duration::from_millis(800),
            Self::Stone => Duration::from_millis(6000),
            Self::Wind => Duration::from_millis(400),
            Self::Water => Duration::from_millis(900),
            Self::FrozenEarth => Duration::from_millis(1500),
            Self::ColdAir => Duration::from_millis(600),
            Self::Iron => Duration::from_millis(1200),
            Self::HotWind => Duration::from_millis(500),
        }
    }

    /// Gold charged to place the tower or to synthesize it.
    #[must_use]
    pub const fn cost(self) -> u32 {
        match self {
            Self::Ice => 50,
            Self::Fire => 100,
            Self::Stone | Self::Wind => 150,
            Self::Water => 200,
            Self::FrozenEarth | Self::ColdAir | Self::Sand => 225,
            Self::Iron => 300,
            Self::HotWind => 275,
        }
    }

    /// Maximum structural health of the tower.
    #[must_use]
    pub const fn max_health(self) -> u32 {
        match self {
            Self::Ice | Self::Fire | Self::Wind => 100,
            Self::Stone | Self::Water | Self::ColdAir | Self::HotWind => 150,
            Self::FrozenEarth | Self::Iron | Self::Sand => 200,
        }
    }

    /// Maximum barrier that absorbs damage before health.
    #[must_use]
    pub const fn max_barrier(self) -> u32 {
        match self {
            Self::Ice | Self::Fire | Self::Wind => 0,
            Self::Stone | Self::Water | Self::ColdAir | Self::HotWind => 50,
            Self::FrozenEarth | Self::Iron | Self::Sand => 100,
        }
    }

    /// Status effects applied to every enemy struck by the tower.
    #[must_use]
    pub const fn effects(self) -> &'static [TowerEffect] {
        match self {
            Self::Ice => ICE_EFFECTS,
            Self::Fire => FIRE_EFFECTS,
            Self::Stone => STONE_EFFECTS,
            Self::Wind => WIND_EFFECTS,
            Self::Water => WATER_EFFECTS,
            Self::FrozenEarth => FROZEN_EARTH_EFFECTS,
            Self::ColdAir => COLD_AIR_EFFECTS,
            Self::Iron => IRON_EFFECTS,
            Self::HotWind => HOT_WIND_EFFECTS,
            Self::Sand => SAND_EFFECTS,
        }
    }

    /// Reports whether the kind can be bought directly rather than synthesized.
    #[must_use]
    pub const fn is_purchasable(self) -> bool {
        matches!(self, Self::Ice | Self::Fire | Self::Stone | Self::Wind)
    }

    /// Looks up the kind produced by synthesizing two towers.
    ///
    /// The recipe table is unordered: `Fire` with `Ice` yields the same result
    /// as `Ice` with `Fire`. Pairs of identical kinds and pairs involving a
    /// synthesized kind have no recipe.
    #[must_use]
    pub fn synthesis_result(self, other: TowerKind) -> Option<TowerKind> {
        let (low, high) = if self <= other {
            (self, other)
        } else {
            (other, self)
        };
        match (low, high) {
            (Self::Ice, Self::Fire) => Some(Self::Water),
            (Self::Ice, Self::Stone) => Some(Self::FrozenEarth),
            (Self::Ice, Self::Wind) => Some(Self::ColdAir),
            (Self::Fire, Self::Stone) => Some(Self::Iron),
            (Self::Fire, Self::Wind) => Some(Self::HotWind),
            (Self::Stone, Self::Wind) => Some(Self::Sand),
            _ => None,
        }
    }

    /// Canonical name of the kind as used in level and layout files.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Ice => "ice",
            Self::Fire => "fire",
            Self::Stone => "stone",
            Self::Wind => "wind",
            Self::Water => "water",
            Self::FrozenEarth => "frozenEarth",
            Self::ColdAir => "coldAir",
            Self::Iron => "iron",
            Self::HotWind => "hotWind",
            Self::Sand => "sand",
        }
    }
}

impl fmt::Display for TowerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TowerKind {
    type Err = UnknownKindError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(value))
            .ok_or_else(|| UnknownKindError {
                name: value.to_owned(),
            })
    }
}

/// Status effect applied by a tower's projectiles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TowerEffect {
    /// Multiplies the target's base speed for a limited time. Slows never stack.
    Slow {
        /// Multiplier applied to the enemy's base speed.
        factor: f32,
        /// Time until the slow expires.
        duration: Duration,
    },
    /// Deals additional damage after a delay.
    Burn {
        /// Damage dealt when the burn resolves.
        damage: f32,
        /// Delay before the burn resolves.
        delay: Duration,
    },
    /// Destroys the target outright with the given probability.
    Shatter {
        /// Probability in `[0, 1]` of an instant kill.
        chance: f32,
    },
    /// Moves the target back along its route.
    Push {
        /// Number of route nodes removed from the target's progress.
        nodes: f32,
    },
}

/// Enemy kinds that can appear in waves.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum EnemyKind {
    /// Fast and fragile.
    Goblin,
    /// Slow and sturdy.
    Orc,
    /// Very fast and very fragile.
    Skeleton,
    /// Crawling and tough.
    Slime,
}

impl EnemyKind {
    /// Every enemy kind in catalogue order.
    pub const ALL: [EnemyKind; 4] = [Self::Goblin, Self::Orc, Self::Skeleton, Self::Slime];

    /// Health the enemy spawns with.
    #[must_use]
    pub const fn max_health(self) -> f32 {
        match self {
            Self::Goblin => 40.0,
            Self::Orc => 115.0,
            Self::Skeleton => 30.0,
            Self::Slime => 120.0,
        }
    }

    /// Path nodes advanced per tick when unhindered.
    #[must_use]
    pub const fn speed(self) -> f32 {
        match self {
            Self::Goblin => 0.02,
            Self::Orc => 0.01,
            Self::Skeleton => 0.04,
            Self::Slime => 0.006,
        }
    }

    /// Gold credited when the enemy is destroyed.
    #[must_use]
    pub const fn reward(self) -> u32 {
        match self {
            Self::Goblin => 10,
            Self::Orc => 20,
            Self::Skeleton | Self::Slime => 15,
        }
    }

    /// Damage dealt to the core when the enemy arrives.
    #[must_use]
    pub const fn core_damage(self) -> u32 {
        match self {
            Self::Goblin => 10,
            Self::Orc => 25,
            Self::Skeleton => 5,
            Self::Slime => 20,
        }
    }

    /// Canonical name of the kind as used in configuration files.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Goblin => "goblin",
            Self::Orc => "orc",
            Self::Skeleton => "skeleton",
            Self::Slime => "slime",
        }
    }
}

impl fmt::Display for EnemyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EnemyKind {
    type Err = UnknownKindError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(value))
            .ok_or_else(|| UnknownKindError {
                name: value.to_owned(),
            })
    }
}

/// Error returned when parsing an unknown tower or enemy name.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown kind `{name}`")]
pub struct UnknownKindError {
    /// Name that failed to parse.
    pub name: String,
}

/// Attributes improved by global upgrades.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpgradeAttribute {
    /// Projectile damage.
    Damage,
    /// Targeting range.
    Range,
    /// Fire rate.
    Speed,
}

impl UpgradeAttribute {
    /// Human readable name of the attribute.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Damage => "damage",
            Self::Range => "range",
            Self::Speed => "speed",
        }
    }
}

/// Global upgrade levels purchased for every attribute.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UpgradeLevels {
    /// Purchased damage upgrades.
    pub damage: u32,
    /// Purchased range upgrades.
    pub range: u32,
    /// Purchased fire rate upgrades.
    pub speed: u32,
}

impl UpgradeLevels {
    /// Returns the level purchased for the attribute.
    #[must_use]
    pub const fn level(&self, attribute: UpgradeAttribute) -> u32 {
        match attribute {
            UpgradeAttribute::Damage => self.damage,
            UpgradeAttribute::Range => self.range,
            UpgradeAttribute::Speed => self.speed,
        }
    }

    /// Mutable access to the level purchased for the attribute.
    pub fn level_mut(&mut self, attribute: UpgradeAttribute) -> &mut u32 {
        match attribute {
            UpgradeAttribute::Damage => &mut self.damage,
            UpgradeAttribute::Range => &mut self.range,
            UpgradeAttribute::Speed => &mut self.speed,
        }
    }
}

/// Power-up effects granted to individual towers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerUpKind {
    /// Raises damage.
    AttackBoost,
    /// Raises targeting range.
    RangeExtension,
    /// Shortens the fire interval.
    AttackSpeedBoost,
}

/// Rarity of a power-up, which determines its strength.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    /// Five percent bonus.
    Common,
    /// Ten percent bonus.
    Uncommon,
    /// Fifteen percent bonus.
    Rare,
    /// Twenty percent bonus.
    Legendary,
}

impl Rarity {
    /// Bonus granted by a power-up of this rarity, in percent.
    #[must_use]
    pub const fn percent(self) -> u32 {
        match self {
            Self::Common => 5,
            Self::Uncommon => 10,
            Self::Rare => 15,
            Self::Legendary => 20,
        }
    }
}

/// A single power-up granted to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PowerUp {
    /// Effect of the power-up.
    pub kind: PowerUpKind,
    /// Rarity of the power-up.
    pub rarity: Rarity,
}

/// Percent bonuses accumulated by a tower from power-ups.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PowerUpTotals {
    /// Damage bonus in percent.
    pub damage_percent: u32,
    /// Range bonus in percent.
    pub range_percent: u32,
    /// Fire rate bonus in percent.
    pub speed_percent: u32,
}

impl PowerUpTotals {
    /// Adds the power-up's bonus to the matching total.
    pub fn accumulate(&mut self, power_up: PowerUp) {
        let bonus = power_up.rarity.percent();
        let total = match power_up.kind {
            PowerUpKind::AttackBoost => &mut self.damage_percent,
            PowerUpKind::RangeExtension => &mut self.range_percent,
            PowerUpKind::AttackSpeedBoost => &mut self.speed_percent,
        };
        *total = total.saturating_add(bonus);
    }
}

/// Effective combat statistics of a tower after every modifier.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerStats {
    /// Damage dealt per projectile.
    pub damage: f32,
    /// Targeting radius in world units.
    pub range: f32,
    /// Time between consecutive shots.
    pub fire_interval: Duration,
}

impl TowerStats {
    /// Resolves a tower's statistics from its kind, level and modifiers.
    ///
    /// Level scaling multiplies damage by `1 + 0.1 (level - 1)`, range by
    /// `1 + 0.05 (level - 1)` and the interval by `1 - 0.05 (level - 1)`.
    /// Global upgrades and power-ups multiply on top. The interval never drops
    /// below [`MIN_FIRE_INTERVAL`].
    #[must_use]
    pub fn resolve(
        kind: TowerKind,
        level: u32,
        upgrades: UpgradeLevels,
        power_ups: PowerUpTotals,
    ) -> Self {
        let steps = level.saturating_sub(1) as f32;
        let damage = kind.damage()
            * (1.0 + 0.1 * steps)
            * (1.0 + 0.1 * upgrades.damage as f32)
            * (1.0 + power_ups.damage_percent as f32 / 100.0);
        let range = kind.range()
            * (1.0 + 0.05 * steps)
            * (1.0 + 0.1 * upgrades.range as f32)
            * (1.0 + power_ups.range_percent as f32 / 100.0);
        let seconds = kind.fire_interval().as_secs_f32()
            * (1.0 - 0.05 * steps)
            * (1.0 - 0.1 * upgrades.speed as f32)
            * (1.0 - power_ups.speed_percent as f32 / 100.0);
        let fire_interval = Duration::from_secs_f32(seconds.max(0.0)).max(MIN_FIRE_INTERVAL);

        Self {
            damage,
            range,
            fire_interval,
        }
    }
}

/// Gold and mana owned by the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceLedger {
    gold: u32,
    mana: u32,
}

impl Default for ResourceLedger {
    fn default() -> Self {
        Self::new(500, 100)
    }
}

impl ResourceLedger {
    /// Creates a ledger holding the provided balances.
    #[must_use]
    pub const fn new(gold: u32, mana: u32) -> Self {
        Self { gold, mana }
    }

    /// Gold currently available.
    #[must_use]
    pub const fn gold(&self) -> u32 {
        self.gold
    }

    /// Mana currently available.
    #[must_use]
    pub const fn mana(&self) -> u32 {
        self.mana
    }

    /// Debits `cost` gold, returning `false` without change when unaffordable.
    #[must_use]
    pub fn try_spend(&mut self, cost: u32) -> bool {
        match self.gold.checked_sub(cost) {
            Some(remaining) => {
                self.gold = remaining;
                true
            }
            None => false,
        }
    }

    /// Credits `amount` gold.
    pub fn credit(&mut self, amount: u32) {
        self.gold = self.gold.saturating_add(amount);
    }
}

/// Reasons a tower placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum PlacementError {
    /// The requested cell lies beyond the grid bounds.
    #[error("that cell is outside the map")]
    OutOfBounds,
    /// The requested cell is not empty ground.
    #[error("cannot place a tower on that cell")]
    CellNotEmpty,
    /// The player cannot afford the tower.
    #[error("not enough gold to place the tower")]
    InsufficientGold,
    /// The kind is only obtainable through synthesis.
    #[error("that tower can only be obtained through synthesis")]
    NotPurchasable,
}

/// Reasons a synthesis request may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum SynthesisError {
    /// Both selected towers share a kind.
    #[error("select a tower of a different element")]
    SameKind,
    /// No recipe combines the selected kinds.
    #[error("no synthesis combines {first} and {second}")]
    UnknownRecipe {
        /// Kind of the first selected tower.
        first: TowerKind,
        /// Kind of the second selected tower.
        second: TowerKind,
    },
    /// The selection is not complete enough for the requested step.
    #[error("select two towers first")]
    IncompleteSelection,
    /// The selection has not been confirmed yet.
    #[error("confirm the synthesis first")]
    NotConfirmed,
    /// The clicked cell holds no tower.
    #[error("select a tower")]
    NoTower,
    /// The tower is already part of the selection.
    #[error("that tower is already selected")]
    AlreadySelected,
    /// One of the source towers no longer exists.
    #[error("a selected tower no longer exists")]
    MissingTower,
    /// The destination cell lies beyond the grid bounds.
    #[error("that cell is outside the map")]
    OutOfBounds,
    /// The destination cell is not empty ground.
    #[error("cannot place the synthesized tower on that cell")]
    CellNotEmpty,
    /// The player cannot afford the synthesized tower.
    #[error("not enough gold to synthesize")]
    InsufficientGold,
    /// Synthesis mode is not active.
    #[error("synthesis mode is not active")]
    InactiveMode,
}

/// Reasons an upgrade, level up or power-up request may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum UpgradeError {
    /// The player cannot afford the upgrade.
    #[error("not enough gold for the upgrade")]
    InsufficientGold,
    /// The attribute or tower is already at its maximum level.
    #[error("already at the maximum level")]
    MaxLevel,
    /// No tower with the provided identifier exists.
    #[error("that tower no longer exists")]
    MissingTower,
}

/// Reasons a wave control request may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum WaveError {
    /// A wave is already running.
    #[error("Wave already in progress!")]
    AlreadyInProgress,
    /// The core has been destroyed.
    #[error("the core has fallen")]
    GameOver,
}

/// Immutable representation of a single tower's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Kind of tower that was constructed.
    pub kind: TowerKind,
    /// Cell hosting the tower.
    pub cell: CellCoord,
    /// Centre of the tower in world units.
    pub position: Vec2,
    /// Current tower level.
    pub level: u32,
    /// Effective combat statistics.
    pub stats: TowerStats,
    /// Remaining structural health.
    pub health: u32,
    /// Maximum structural health.
    pub max_health: u32,
    /// Remaining barrier.
    pub barrier: u32,
    /// Maximum barrier.
    pub max_barrier: u32,
    /// Simulation time of the most recent shot.
    pub last_fired: Option<Duration>,
    /// Whether the tower is highlighted for synthesis.
    pub selected: bool,
}

impl TowerSnapshot {
    /// Reports whether the tower may fire at the provided time.
    #[must_use]
    pub fn ready_to_fire(&self, now: Duration) -> bool {
        self.last_fired.map_or(true, |last| {
            now.saturating_sub(last) >= self.stats.fire_interval
        })
    }
}

/// Read-only snapshot describing all towers placed within the world.
#[derive(Clone, Debug, Default)]
pub struct TowerView {
    snapshots: Vec<TowerSnapshot>,
}

impl TowerView {
    /// Creates a new tower view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured tower snapshots in deterministic order.
    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        self.snapshots.iter()
    }

    /// Looks up the snapshot captured for the provided tower.
    #[must_use]
    pub fn get(&self, tower: TowerId) -> Option<&TowerSnapshot> {
        self.snapshots
            .binary_search_by_key(&tower, |snapshot| snapshot.id)
            .ok()
            .and_then(|index| self.snapshots.get(index))
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Kind of enemy.
    pub kind: EnemyKind,
    /// Remaining health.
    pub health: f32,
    /// Health the enemy spawned with.
    pub max_health: f32,
    /// Current speed in route nodes per tick, including slows.
    pub speed: f32,
    /// Current position in world units.
    pub position: Vec2,
    /// Current movement state.
    pub locomotion: Locomotion,
}

/// Read-only snapshot describing all live enemies.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in deterministic order.
    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Looks up the snapshot captured for the provided enemy.
    #[must_use]
    pub fn get(&self, enemy: EnemyId) -> Option<&EnemySnapshot> {
        self.snapshots
            .binary_search_by_key(&enemy, |snapshot| snapshot.id)
            .ok()
            .and_then(|index| self.snapshots.get(index))
    }

    /// Number of enemies captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view captured no enemies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a projectile in flight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Unique identifier assigned to the projectile.
    pub id: ProjectileId,
    /// Tower that fired the projectile.
    pub tower: TowerId,
    /// Kind of the firing tower.
    pub tower_kind: TowerKind,
    /// Current position in world units.
    pub position: Vec2,
    /// Enemy the projectile is chasing.
    pub target: EnemyId,
    /// Last known position of the target.
    pub target_position: Vec2,
    /// Damage carried by the projectile.
    pub damage: f32,
}

/// Read-only snapshot describing all projectiles in flight.
#[derive(Clone, Debug, Default)]
pub struct ProjectileView {
    snapshots: Vec<ProjectileSnapshot>,
}

impl ProjectileView {
    /// Creates a new projectile view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<ProjectileSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured projectile snapshots in deterministic order.
    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = &ProjectileSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<ProjectileSnapshot> {
        self.snapshots
    }
}

/// Read-only view into the dense terrain grid.
#[derive(Clone, Copy, Debug)]
pub struct TerrainView<'a> {
    cells: &'a [TerrainKind],
    columns: u32,
    rows: u32,
}

impl<'a> TerrainView<'a> {
    /// Captures a new terrain view backed by the provided cell slice.
    #[must_use]
    pub fn new(cells: &'a [TerrainKind], columns: u32, rows: u32) -> Self {
        Self {
            cells,
            columns,
            rows,
        }
    }

    /// Returns the terrain of the provided cell, if it lies within the grid.
    #[must_use]
    pub fn terrain(&self, cell: CellCoord) -> Option<TerrainKind> {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied())
    }

    /// Speed multiplier of the cell; zero outside the grid.
    #[must_use]
    pub fn multiplier(&self, cell: CellCoord) -> f32 {
        self.terrain(cell)
            .map_or(0.0, TerrainKind::speed_multiplier)
    }

    /// Reports whether enemies may enter the cell.
    #[must_use]
    pub fn is_traversable(&self, cell: CellCoord) -> bool {
        self.multiplier(cell) > 0.0
    }

    /// Provides the dimensions of the underlying terrain grid.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < self.columns && cell.row() < self.rows {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

/// Pairing of a tower with the enemy it should fire at this tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerTarget {
    /// Tower that acquired the target.
    pub tower: TowerId,
    /// Enemy selected as the target.
    pub enemy: EnemyId,
    /// Position of the tower in world units.
    pub tower_position: Vec2,
    /// Position of the enemy in world units.
    pub enemy_position: Vec2,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::de::DeserializeOwned;

    #[test]
    fn cell_center_lies_half_a_cell_inside() {
        let center = CellCoord::new(2, 3).center();
        assert_eq!(center, Vec2::new(50.0, 70.0));
    }

    #[test]
    fn manhattan_distance_matches_expected_value() {
        let origin = CellCoord::new(1, 1);
        let destination = CellCoord::new(4, 3);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(destination.manhattan_distance(origin), 5);
    }

    #[test]
    fn synthesis_recipes_are_unordered() {
        for first in TowerKind::ALL {
            for second in TowerKind::ALL {
                assert_eq!(
                    first.synthesis_result(second),
                    second.synthesis_result(first),
                    "{first} and {second} disagree"
                );
            }
        }
        assert_eq!(
            TowerKind::Fire.synthesis_result(TowerKind::Ice),
            Some(TowerKind::Water)
        );
        assert_eq!(
            TowerKind::Wind.synthesis_result(TowerKind::Stone),
            Some(TowerKind::Sand)
        );
    }

    #[test]
    fn identical_kinds_never_synthesize() {
        for kind in TowerKind::ALL {
            assert_eq!(kind.synthesis_result(kind), None);
        }
    }

    #[test]
    fn synthesized_kinds_are_not_purchasable() {
        let purchasable: Vec<_> = TowerKind::ALL
            .into_iter()
            .filter(|kind| kind.is_purchasable())
            .collect();
        assert_eq!(
            purchasable,
            vec![
                TowerKind::Ice,
                TowerKind::Fire,
                TowerKind::Stone,
                TowerKind::Wind
            ]
        );
    }

    #[test]
    fn level_scaling_is_monotonic() {
        for kind in TowerKind::ALL {
            let mut previous =
                TowerStats::resolve(kind, 1, UpgradeLevels::default(), PowerUpTotals::default());
            for level in 2..=MAX_TOWER_LEVEL {
                let stats = TowerStats::resolve(
                    kind,
                    level,
                    UpgradeLevels::default(),
                    PowerUpTotals::default(),
                );
                assert!(stats.damage >= previous.damage, "{kind} damage fell");
                assert!(stats.range >= previous.range, "{kind} range fell");
                assert!(
                    stats.fire_interval <= previous.fire_interval,
                    "{kind} interval grew"
                );
                previous = stats;
            }
        }
    }

    #[test]
    fn fire_interval_never_drops_below_floor() {
        let upgrades = UpgradeLevels {
            damage: 0,
            range: 0,
            speed: MAX_UPGRADE_LEVEL,
        };
        let power_ups = PowerUpTotals {
            damage_percent: 0,
            range_percent: 0,
            speed_percent: 120,
        };
        let stats = TowerStats::resolve(TowerKind::Wind, MAX_TOWER_LEVEL, upgrades, power_ups);
        assert_eq!(stats.fire_interval, MIN_FIRE_INTERVAL);
    }

    #[test]
    fn level_one_stats_match_catalogue() {
        let stats = TowerStats::resolve(
            TowerKind::Ice,
            1,
            UpgradeLevels::default(),
            PowerUpTotals::default(),
        );
        assert!((stats.damage - 20.0).abs() < f32::EPSILON);
        assert!((stats.range - 80.0).abs() < f32::EPSILON);
        assert_eq!(stats.fire_interval, Duration::from_secs(1));
    }

    #[test]
    fn power_ups_accumulate_by_rarity() {
        let mut totals = PowerUpTotals::default();
        totals.accumulate(PowerUp {
            kind: PowerUpKind::AttackBoost,
            rarity: Rarity::Common,
        });
        totals.accumulate(PowerUp {
            kind: PowerUpKind::AttackBoost,
            rarity: Rarity::Legendary,
        });
        totals.accumulate(PowerUp {
            kind: PowerUpKind::RangeExtension,
            rarity: Rarity::Rare,
        });
        assert_eq!(totals.damage_percent, 25);
        assert_eq!(totals.range_percent, 15);
        assert_eq!(totals.speed_percent, 0);
    }

    #[test]
    fn ledger_refuses_overdraft() {
        let mut ledger = ResourceLedger::new(40, 0);
        assert!(!ledger.try_spend(50));
        assert_eq!(ledger.gold(), 40);
        assert!(ledger.try_spend(40));
        assert_eq!(ledger.gold(), 0);
        ledger.credit(10);
        assert_eq!(ledger.gold(), 10);
    }

    #[test]
    fn default_ledger_matches_starting_balance() {
        let ledger = ResourceLedger::default();
        assert_eq!(ledger.gold(), 500);
        assert_eq!(ledger.mana(), 100);
    }

    #[test]
    fn never_fired_tower_is_ready() {
        let snapshot = TowerSnapshot {
            id: TowerId::new(0),
            kind: TowerKind::Ice,
            cell: CellCoord::new(0, 0),
            position: CellCoord::new(0, 0).center(),
            level: 1,
            stats: TowerStats::resolve(
                TowerKind::Ice,
                1,
                UpgradeLevels::default(),
                PowerUpTotals::default(),
            ),
            health: 100,
            max_health: 100,
            barrier: 0,
            max_barrier: 0,
            last_fired: None,
            selected: false,
        };
        assert!(snapshot.ready_to_fire(Duration::ZERO));

        let fired = TowerSnapshot {
            last_fired: Some(Duration::from_millis(500)),
            ..snapshot
        };
        assert!(!fired.ready_to_fire(Duration::from_millis(1499)));
        assert!(fired.ready_to_fire(Duration::from_millis(1500)));
    }

    #[test]
    fn terrain_view_treats_outside_as_impassable() {
        let cells = [TerrainKind::Plain, TerrainKind::Forest, TerrainKind::Water, TerrainKind::Mountain];
        let view = TerrainView::new(&cells, 2, 2);
        assert!(view.is_traversable(CellCoord::new(0, 0)));
        assert!((view.multiplier(CellCoord::new(1, 0)) - 0.7).abs() < f32::EPSILON);
        assert!(!view.is_traversable(CellCoord::new(0, 1)));
        assert!(!view.is_traversable(CellCoord::new(2, 0)));
    }

    #[test]
    fn kinds_parse_from_names() {
        assert_eq!("frozenEarth".parse::<TowerKind>(), Ok(TowerKind::FrozenEarth));
        assert_eq!("Goblin".parse::<EnemyKind>(), Ok(EnemyKind::Goblin));
        assert!("dragon".parse::<EnemyKind>().is_err());
    }

    #[test]
    fn wave_error_reports_original_message() {
        assert_eq!(
            WaveError::AlreadyInProgress.to_string(),
            "Wave already in progress!"
        );
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn tower_kind_round_trips_through_bincode() {
        assert_round_trip(&TowerKind::HotWind);
    }

    #[test]
    fn synthesis_error_round_trips_through_bincode() {
        assert_round_trip(&SynthesisError::UnknownRecipe {
            first: TowerKind::Water,
            second: TowerKind::Ice,
        });
    }

    #[test]
    fn ledger_round_trips_through_bincode() {
        assert_round_trip(&ResourceLedger::new(321, 12));
    }
}
