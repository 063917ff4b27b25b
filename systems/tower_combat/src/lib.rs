#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that emits projectile firing commands from targeting data.

use std::time::Duration;

use elemental_defence_core::{Command, TowerTarget, TowerView};

/// Tower combat system that queues firing commands for ready towers.
#[derive(Debug, Default)]
pub struct TowerCombat {
    scratch: Vec<Command>,
}

impl TowerCombat {
    /// Creates a new tower combat system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits `Command::FireProjectile` entries for towers ready to fire at `now`.
    ///
    /// Towers that never fired are ready immediately.
    pub fn handle(
        &mut self,
        now: Duration,
        towers: &TowerView,
        tower_targets: &[TowerTarget],
        out: &mut Vec<Command>,
    ) {
        if tower_targets.is_empty() {
            return;
        }

        self.scratch.clear();

        for target in tower_targets {
            if let Some(snapshot) = towers.get(target.tower) {
                if snapshot.ready_to_fire(now) {
                    self.scratch.push(Command::FireProjectile {
                        tower: target.tower,
                        target: target.enemy,
                    });
                }
            }
        }

        if self.scratch.is_empty() {
            return;
        }

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use elemental_defence_core::{
        CellCoord, EnemyId, PowerUpTotals, TowerId, TowerKind, TowerSnapshot, TowerStats,
        UpgradeLevels,
    };
    use glam::Vec2;

    #[test]
    fn never_fired_towers_are_ready() {
        let mut system = TowerCombat::new();
        let towers = TowerView::from_snapshots(vec![
            snapshot(5, TowerKind::Fire, None),
            snapshot(2, TowerKind::Ice, None),
        ]);
        let targets = vec![target(2, 4), target(5, 1)];
        let mut out = Vec::new();

        system.handle(Duration::ZERO, &towers, &targets, &mut out);

        assert_eq!(
            out,
            vec![
                Command::FireProjectile {
                    tower: TowerId::new(2),
                    target: EnemyId::new(4),
                },
                Command::FireProjectile {
                    tower: TowerId::new(5),
                    target: EnemyId::new(1),
                },
            ],
        );
    }

    #[test]
    fn cooling_down_or_missing_towers_are_skipped() {
        let mut system = TowerCombat::new();
        let towers = TowerView::from_snapshots(vec![
            snapshot(3, TowerKind::Ice, Some(Duration::from_millis(500))),
            snapshot(8, TowerKind::Ice, Some(Duration::ZERO)),
        ]);
        let targets = vec![target(3, 9), target(8, 2), target(42, 3)];
        let mut out = Vec::new();

        system.handle(Duration::from_millis(1000), &towers, &targets, &mut out);

        assert_eq!(
            out,
            vec![Command::FireProjectile {
                tower: TowerId::new(8),
                target: EnemyId::new(2),
            }],
        );
    }

    #[test]
    fn tower_is_ready_exactly_at_its_interval() {
        let mut system = TowerCombat::new();
        let fired = Duration::from_millis(250);
        let wind = snapshot(1, TowerKind::Wind, Some(fired));
        let interval = wind.stats.fire_interval;
        let towers = TowerView::from_snapshots(vec![wind]);
        let targets = vec![target(1, 1)];
        let mut out = Vec::new();

        system.handle(fired + interval - Duration::from_millis(1), &towers, &targets, &mut out);
        assert!(out.is_empty());

        system.handle(fired + interval, &towers, &targets, &mut out);
        assert_eq!(out.len(), 1);
    }

    fn snapshot(tower: u32, kind: TowerKind, last_fired: Option<Duration>) -> TowerSnapshot {
        let cell = CellCoord::new(tower, 0);
        TowerSnapshot {
            id: TowerId::new(tower),
            kind,
            cell,
            position: cell.center(),
            level: 1,
            stats: TowerStats::resolve(kind, 1, UpgradeLevels::default(), PowerUpTotals::default()),
            health: kind.max_health(),
            max_health: kind.max_health(),
            barrier: kind.max_barrier(),
            max_barrier: kind.max_barrier(),
            last_fired,
            selected: false,
        }
    }

    fn target(tower: u32, enemy: u32) -> TowerTarget {
        TowerTarget {
            tower: TowerId::new(tower),
            enemy: EnemyId::new(enemy),
            tower_position: Vec2::ZERO,
            enemy_position: Vec2::ZERO,
        }
    }
}
