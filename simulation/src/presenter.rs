//! Collaborators the simulation reports to.

use elemental_defence_core::{EnemyId, EnemyKind, ProjectileId, TowerId, TowerKind};
use glam::Vec2;
use log::{info, warn};

/// Stable handle identifying a rendered entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityHandle {
    /// A tower.
    Tower(TowerId),
    /// An enemy.
    Enemy(EnemyId),
    /// A projectile in flight.
    Projectile(ProjectileId),
}

/// Visual class of a rendered entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// Tower of the provided element.
    Tower(TowerKind),
    /// Enemy of the provided kind.
    Enemy(EnemyKind),
    /// Projectile fired by a tower of the provided element.
    Projectile(TowerKind),
}

/// Everything a presenter needs to draw one entity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EntityFrame {
    /// Handle of the entity.
    pub handle: EntityHandle,
    /// Visual class of the entity.
    pub kind: EntityKind,
    /// Position in world units.
    pub position: Vec2,
    /// Remaining health as a fraction of the maximum, if the entity has health.
    pub health: Option<f32>,
    /// Whether the entity is highlighted for synthesis.
    pub selected: bool,
}

/// Draws the simulation.
pub trait Presenter {
    /// Draws or refreshes an entity.
    fn render_entity(&mut self, frame: EntityFrame);

    /// Removes an entity that left the simulation.
    fn remove_rendered_entity(&mut self, handle: EntityHandle);
}

/// Receives player-facing notifications.
pub trait Feedback {
    /// Reports a rejected action.
    fn report_error(&mut self, message: &str);

    /// Reports progress or a successful action.
    fn report_feedback(&mut self, message: &str);
}

/// Presenter that draws nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn render_entity(&mut self, _frame: EntityFrame) {}

    fn remove_rendered_entity(&mut self, _handle: EntityHandle) {}
}

/// Feedback sink that forwards notifications to the log.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogFeedback;

impl Feedback for LogFeedback {
    fn report_error(&mut self, message: &str) {
        warn!("{message}");
    }

    fn report_feedback(&mut self, message: &str) {
        info!("{message}");
    }
}
