#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Simulation loop that wires the world to every system.
//!
//! [`Simulation`] owns the authoritative [`World`], the player's resources and
//! the pure systems. Player actions become commands applied to the world, and
//! each call to [`Simulation::tick`] runs one frame: clock advance, movement,
//! targeting, combat, projectile flight, spawning, then wave-clear and
//! game-over evaluation.

mod config;
mod presenter;

pub use config::{ConfigError, SimulationConfig};
pub use presenter::{
    EntityFrame, EntityHandle, EntityKind, Feedback, LogFeedback, NullPresenter, Presenter,
};

use std::time::Duration;

use elemental_defence_core::{
    CellCoord, Command, Event, PowerUp, ResourceLedger, TowerId, TowerKind, TowerTarget,
    UpgradeAttribute, WaveError,
};
use elemental_defence_system_movement::Movement;
use elemental_defence_system_projectiles::Projectiles;
use elemental_defence_system_spawning::{Config as SpawningConfig, WaveScheduler};
use elemental_defence_system_synthesis::ModeManager;
use elemental_defence_system_tower_combat::TowerCombat;
use elemental_defence_system_tower_targeting::TowerTargeting;
use elemental_defence_world::{self as world, query, Level, World, WorldConfig};
use log::{debug, info};

/// Result of a player action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionOutcome {
    /// Whether the action took effect.
    pub success: bool,
    /// Gold spent by the action.
    pub cost: u32,
    /// Player-facing description of the outcome.
    pub message: String,
}

impl ActionOutcome {
    fn succeeded(cost: u32, message: impl Into<String>) -> Self {
        Self {
            success: true,
            cost,
            message: message.into(),
        }
    }

    fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            cost: 0,
            message: message.into(),
        }
    }
}

/// Summary of a single simulation frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickReport {
    /// Every event the world reported during the frame.
    pub events: Vec<Event>,
    /// Wave cleared during the frame, if any.
    pub wave_cleared: Option<u32>,
    /// Whether the core has fallen.
    pub game_over: bool,
}

/// A running game session.
#[derive(Debug)]
pub struct Simulation<P, F> {
    world: World,
    ledger: ResourceLedger,
    config: SimulationConfig,
    movement: Movement,
    targeting: TowerTargeting,
    combat: TowerCombat,
    projectiles: Projectiles,
    waves: WaveScheduler,
    modes: ModeManager,
    presenter: P,
    feedback: F,
    targets: Vec<TowerTarget>,
    game_over: bool,
}

impl<P: Presenter, F: Feedback> Simulation<P, F> {
    /// Creates a session on `level` once `config` has been validated.
    pub fn new(
        level: &Level,
        config: SimulationConfig,
        presenter: P,
        feedback: F,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let world = World::from_level(
            level,
            WorldConfig {
                core_health: config.core_health,
                movement_mode: config.movement_mode,
                rng_seed: config.rng_seed,
            },
        );
        let waves = WaveScheduler::new(SpawningConfig::new(
            config.rng_seed.rotate_left(17),
            config.enemies.clone(),
        ));
        info!("{}", query::welcome_banner(&world));

        Ok(Self {
            world,
            ledger: config.ledger(),
            config,
            movement: Movement::new(),
            targeting: TowerTargeting::new(),
            combat: TowerCombat::new(),
            projectiles: Projectiles::new(),
            waves,
            modes: ModeManager::new(),
            presenter,
            feedback,
            targets: Vec::new(),
            game_over: false,
        })
    }

    /// Authoritative world state.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Player resources.
    #[must_use]
    pub fn ledger(&self) -> ResourceLedger {
        self.ledger
    }

    /// Wave scheduler state.
    #[must_use]
    pub fn waves(&self) -> &WaveScheduler {
        &self.waves
    }

    /// Input mode and synthesis selection.
    #[must_use]
    pub fn modes(&self) -> &ModeManager {
        &self.modes
    }

    /// Presenter receiving entity frames.
    #[must_use]
    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// Feedback sink receiving notifications.
    #[must_use]
    pub fn feedback(&self) -> &F {
        &self.feedback
    }

    /// Reports whether the core has fallen.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Buys and places a tower of `kind` on `cell`.
    pub fn place_tower(&mut self, cell: CellCoord, kind: TowerKind) -> ActionOutcome {
        self.act(Command::PlaceTower { kind, cell })
    }

    /// Buys a global upgrade level for `attribute`.
    pub fn upgrade(&mut self, attribute: UpgradeAttribute) -> ActionOutcome {
        self.act(Command::PurchaseUpgrade { attribute })
    }

    /// Raises the level of a single tower.
    pub fn level_up_tower(&mut self, tower: TowerId) -> ActionOutcome {
        self.act(Command::LevelUpTower { tower })
    }

    /// Grants a power-up to a single tower.
    pub fn apply_power_up(&mut self, tower: TowerId, power_up: PowerUp) -> ActionOutcome {
        self.act(Command::ApplyPowerUp { tower, power_up })
    }

    /// Deals `amount` damage to a tower, barrier first.
    pub fn damage_tower(&mut self, tower: TowerId, amount: u32) -> ActionOutcome {
        self.act(Command::DamageTower { tower, amount })
    }

    /// Enters placement mode for `kind`.
    pub fn on_click_tower_button(&mut self, kind: TowerKind) {
        let mut commands = Vec::new();
        self.modes.on_click_tower_button(kind, &mut commands);
        let _ = self.execute(commands);
    }

    /// Toggles synthesis mode.
    pub fn on_click_synthesis_button(&mut self) {
        let mut commands = Vec::new();
        self.modes.on_click_synthesis_button(&mut commands);
        let _ = self.execute(commands);
        if let Some(message) = self.modes.message() {
            self.feedback.report_feedback(message);
        }
    }

    /// Handles a click on `cell` according to the active mode.
    pub fn on_click_map(&mut self, cell: CellCoord) -> ActionOutcome {
        let occupant = query::tower_at(&self.world, cell)
            .and_then(|tower| query::tower(&self.world, tower))
            .map(|snapshot| (snapshot.id, snapshot.kind));

        let mut commands = Vec::new();
        if let Err(reason) = self.modes.on_click_map(cell, occupant, &mut commands) {
            let outcome = ActionOutcome::failed(reason.to_string());
            self.report(&outcome);
            return outcome;
        }

        let events = self.execute(commands);
        let outcome = summarize(&events).unwrap_or_else(|| {
            ActionOutcome::succeeded(0, self.modes.message().unwrap_or_default())
        });
        self.report(&outcome);
        outcome
    }

    /// Handles the escape key.
    pub fn on_click_esc(&mut self) {
        let mut commands = Vec::new();
        self.modes.on_click_esc(&mut commands);
        let _ = self.execute(commands);
    }

    /// Confirms the selected synthesis pair.
    pub fn on_confirm_synthesis(&mut self) -> ActionOutcome {
        let outcome = match self.modes.on_confirm_synthesis() {
            Ok(kind) => ActionOutcome::succeeded(
                0,
                format!("Synthesizing {kind}. {}", self.modes.message().unwrap_or_default()),
            ),
            Err(reason) => ActionOutcome::failed(reason.to_string()),
        };
        self.report(&outcome);
        outcome
    }

    /// Starts the next wave.
    pub fn start_wave(&mut self) -> ActionOutcome {
        let outcome = if self.game_over {
            ActionOutcome::failed(WaveError::GameOver.to_string())
        } else {
            match self.waves.start_wave() {
                Ok(plan) => ActionOutcome::succeeded(
                    0,
                    format!("Wave {} started with {} enemies", plan.wave, plan.enemies),
                ),
                Err(reason) => ActionOutcome::failed(reason.to_string()),
            }
        };
        self.report(&outcome);
        outcome
    }

    /// Advances the session by one frame of `dt` simulated time.
    ///
    /// Once the core has fallen every further tick is inert.
    pub fn tick(&mut self, dt: Duration) -> TickReport {
        if self.game_over {
            return TickReport {
                events: Vec::new(),
                wave_cleared: None,
                game_over: true,
            };
        }

        let mut events = self.execute(vec![Command::Tick { dt }]);
        let mut commands = Vec::new();

        self.movement.handle(
            &events,
            &query::enemy_view(&self.world),
            query::terrain_view(&self.world),
            query::destination(&self.world),
            &mut commands,
        );
        events.extend(self.execute(std::mem::take(&mut commands)));

        let towers = query::tower_view(&self.world);
        self.targeting
            .handle(&towers, &query::enemy_view(&self.world), &mut self.targets);
        self.combat.handle(
            query::clock(&self.world),
            &towers,
            &self.targets,
            &mut commands,
        );
        events.extend(self.execute(std::mem::take(&mut commands)));

        self.projectiles.handle(
            &query::projectile_view(&self.world),
            &query::enemy_view(&self.world),
            &mut commands,
        );
        events.extend(self.execute(std::mem::take(&mut commands)));

        self.waves.handle(
            &events,
            query::path_network(&self.world).len(),
            &mut commands,
        );
        events.extend(self.execute(std::mem::take(&mut commands)));

        let mut wave_cleared = None;
        if query::is_core_destroyed(&self.world) {
            self.game_over = true;
            self.waves.abandon();
            info!("game over at wave {}", self.waves.wave());
            self.feedback
                .report_error("Game Over! The core has been destroyed.");
        } else if let Some(wave) = self.waves.clear_wave(query::live_enemy_count(&self.world)) {
            let gold = self.config.wave_bonus;
            events.extend(self.execute(vec![Command::GrantWaveBonus { wave, gold }]));
            self.feedback
                .report_feedback(&format!("Wave Cleared! +{gold} gold"));
            wave_cleared = Some(wave);
        }

        self.present();

        TickReport {
            events,
            wave_cleared,
            game_over: self.game_over,
        }
    }

    fn act(&mut self, command: Command) -> ActionOutcome {
        let events = self.execute(vec![command]);
        let outcome = summarize(&events).unwrap_or_else(|| ActionOutcome::failed("nothing happened"));
        self.report(&outcome);
        outcome
    }

    fn execute(&mut self, commands: Vec<Command>) -> Vec<Event> {
        let mut events = Vec::new();
        for command in commands {
            world::apply(&mut self.world, &mut self.ledger, command, &mut events);
        }
        self.modes.handle(&events);
        for event in &events {
            if let Some(handle) = removed_entity(event) {
                self.presenter.remove_rendered_entity(handle);
            }
        }
        events
    }

    fn report(&mut self, outcome: &ActionOutcome) {
        if outcome.success {
            self.feedback.report_feedback(&outcome.message);
        } else {
            debug!("action rejected: {}", outcome.message);
            self.feedback.report_error(&outcome.message);
        }
    }

    fn present(&mut self) {
        for tower in query::tower_view(&self.world).iter() {
            self.presenter.render_entity(EntityFrame {
                handle: EntityHandle::Tower(tower.id),
                kind: EntityKind::Tower(tower.kind),
                position: tower.position,
                health: Some(tower.health as f32 / tower.max_health.max(1) as f32),
                selected: tower.selected,
            });
        }
        for enemy in query::enemy_view(&self.world).iter() {
            self.presenter.render_entity(EntityFrame {
                handle: EntityHandle::Enemy(enemy.id),
                kind: EntityKind::Enemy(enemy.kind),
                position: enemy.position,
                health: Some(enemy.health / enemy.max_health),
                selected: false,
            });
        }
        for projectile in query::projectile_view(&self.world).iter() {
            self.presenter.render_entity(EntityFrame {
                handle: EntityHandle::Projectile(projectile.id),
                kind: EntityKind::Projectile(projectile.tower_kind),
                position: projectile.position,
                health: None,
                selected: false,
            });
        }
    }
}

/// Player-facing outcome described by the first decisive event.
fn summarize(events: &[Event]) -> Option<ActionOutcome> {
    events.iter().find_map(|event| match *event {
        Event::TowerPlaced { kind, cost, .. } => {
            Some(ActionOutcome::succeeded(cost, format!("Placed {kind} tower")))
        }
        Event::TowerPlacementRejected { reason, .. } => Some(ActionOutcome::failed(reason.to_string())),
        Event::TowersSynthesized { kind, cost, .. } => {
            Some(ActionOutcome::succeeded(cost, format!("Synthesized {kind} tower")))
        }
        Event::SynthesisRejected { reason } => Some(ActionOutcome::failed(reason.to_string())),
        Event::UpgradePurchased {
            attribute,
            level,
            cost,
        } => Some(ActionOutcome::succeeded(
            cost,
            format!("{} upgraded to level {level}", attribute.name()),
        )),
        Event::UpgradeRejected { reason, .. } => Some(ActionOutcome::failed(reason.to_string())),
        Event::TowerLeveledUp { level, cost, .. } => Some(ActionOutcome::succeeded(
            cost,
            format!("Tower raised to level {level}"),
        )),
        Event::TowerLevelUpRejected { reason, .. } | Event::PowerUpRejected { reason, .. } => {
            Some(ActionOutcome::failed(reason.to_string()))
        }
        Event::PowerUpApplied { power_up, .. } => Some(ActionOutcome::succeeded(
            0,
            format!("{:?} power-up applied", power_up.kind),
        )),
        Event::TowerDestroyed { tower, .. } => Some(ActionOutcome::succeeded(
            0,
            format!("Tower {} destroyed", tower.get()),
        )),
        Event::TowerDamaged {
            health, barrier, ..
        } => Some(ActionOutcome::succeeded(
            0,
            format!("Tower at {health} health and {barrier} barrier"),
        )),
        _ => None,
    })
}

/// Rendered entity that an event removes from the simulation.
fn removed_entity(event: &Event) -> Option<EntityHandle> {
    match *event {
        Event::EnemyDestroyed { enemy, .. } | Event::EnemyReachedCore { enemy, .. } => {
            Some(EntityHandle::Enemy(enemy))
        }
        Event::TowerDestroyed { tower, .. } | Event::TowerConsumed { tower, .. } => {
            Some(EntityHandle::Tower(tower))
        }
        Event::ProjectileHit { projectile, .. } | Event::ProjectileMissed { projectile } => {
            Some(EntityHandle::Projectile(projectile))
        }
        _ => None,
    }
}
