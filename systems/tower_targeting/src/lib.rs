#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that computes deterministic tower targets from world snapshots.

use elemental_defence_core::{EnemyId, EnemyView, TowerTarget, TowerView};
use glam::Vec2;

/// Tower targeting system that reuses scratch buffers to avoid repeated allocations.
#[derive(Debug, Default)]
pub struct TowerTargeting {
    enemy_workspace: Vec<EnemyCandidate>,
}

impl TowerTargeting {
    /// Creates a new tower targeting system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes tower targets for the provided world snapshot.
    ///
    /// Each tower not selected for synthesis targets the first enemy, in
    /// identifier order, whose distance is strictly below the tower's range.
    /// The output buffer is cleared before populating it with the latest
    /// assignments.
    pub fn handle(&mut self, towers: &TowerView, enemies: &EnemyView, out: &mut Vec<TowerTarget>) {
        out.clear();

        if towers.iter().next().is_none() || enemies.is_empty() {
            return;
        }

        self.prepare_enemy_workspace(enemies);

        for tower in towers.iter().filter(|tower| !tower.selected) {
            let found = self
                .enemy_workspace
                .iter()
                .find(|candidate| candidate.position.distance(tower.position) < tower.stats.range);

            if let Some(candidate) = found {
                out.push(TowerTarget {
                    tower: tower.id,
                    enemy: candidate.id,
                    tower_position: tower.position,
                    enemy_position: candidate.position,
                });
            }
        }
    }

    fn prepare_enemy_workspace(&mut self, enemies: &EnemyView) {
        self.enemy_workspace.clear();
        self.enemy_workspace.reserve(enemies.len());
        self.enemy_workspace
            .extend(enemies.iter().map(|snapshot| EnemyCandidate {
                id: snapshot.id,
                position: snapshot.position,
            }));
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct EnemyCandidate {
    id: EnemyId,
    position: Vec2,
}

#[cfg(test)]
mod tests {
    use super::*;
    use elemental_defence_core::{
        CellCoord, EnemyKind, EnemySnapshot, Locomotion, PathId, PowerUpTotals, TowerId,
        TowerKind, TowerSnapshot, TowerStats, UpgradeLevels,
    };

    fn tower_snapshot(id: u32, kind: TowerKind, cell: (u32, u32)) -> TowerSnapshot {
        let cell = CellCoord::new(cell.0, cell.1);
        TowerSnapshot {
            id: TowerId::new(id),
            kind,
            cell,
            position: cell.center(),
            level: 1,
            stats: TowerStats::resolve(kind, 1, UpgradeLevels::default(), PowerUpTotals::default()),
            health: kind.max_health(),
            max_health: kind.max_health(),
            barrier: kind.max_barrier(),
            max_barrier: kind.max_barrier(),
            last_fired: None,
            selected: false,
        }
    }

    fn enemy_snapshot(id: u32, position: Vec2) -> EnemySnapshot {
        let kind = EnemyKind::Goblin;
        EnemySnapshot {
            id: EnemyId::new(id),
            kind,
            health: kind.max_health(),
            max_health: kind.max_health(),
            speed: kind.speed(),
            position,
            locomotion: Locomotion::FollowPath {
                path: PathId::new(0),
                progress: 0.0,
            },
        }
    }

    #[test]
    fn targets_enemy_within_range() {
        let mut system = TowerTargeting::new();
        let tower = tower_snapshot(1, TowerKind::Ice, (2, 2));
        let towers = TowerView::from_snapshots(vec![tower]);
        let enemy_position = tower.position + Vec2::new(50.0, 0.0);
        let enemies = EnemyView::from_snapshots(vec![enemy_snapshot(4, enemy_position)]);

        let mut out = Vec::new();
        system.handle(&towers, &enemies, &mut out);

        assert_eq!(
            out,
            vec![TowerTarget {
                tower: TowerId::new(1),
                enemy: EnemyId::new(4),
                tower_position: tower.position,
                enemy_position,
            }]
        );
    }

    #[test]
    fn enemy_at_exact_range_is_ignored() {
        let mut system = TowerTargeting::new();
        let tower = tower_snapshot(1, TowerKind::Ice, (2, 2));
        let towers = TowerView::from_snapshots(vec![tower]);
        let enemies = EnemyView::from_snapshots(vec![enemy_snapshot(
            1,
            tower.position + Vec2::new(tower.stats.range, 0.0),
        )]);

        let mut out = Vec::new();
        system.handle(&towers, &enemies, &mut out);

        assert!(out.is_empty());
    }

    #[test]
    fn lowest_enemy_id_in_range_wins_over_closer_enemies() {
        let mut system = TowerTargeting::new();
        let tower = tower_snapshot(1, TowerKind::Wind, (5, 5));
        let towers = TowerView::from_snapshots(vec![tower]);
        let enemies = EnemyView::from_snapshots(vec![
            enemy_snapshot(9, tower.position + Vec2::new(5.0, 0.0)),
            enemy_snapshot(3, tower.position + Vec2::new(120.0, 0.0)),
            enemy_snapshot(1, tower.position + Vec2::new(500.0, 0.0)),
        ]);

        let mut out = Vec::new();
        system.handle(&towers, &enemies, &mut out);

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].enemy, EnemyId::new(3));
    }

    #[test]
    fn selected_towers_hold_fire() {
        let mut system = TowerTargeting::new();
        let mut selected = tower_snapshot(1, TowerKind::Fire, (2, 2));
        selected.selected = true;
        let idle = tower_snapshot(2, TowerKind::Stone, (3, 2));
        let towers = TowerView::from_snapshots(vec![selected, idle]);
        let enemies =
            EnemyView::from_snapshots(vec![enemy_snapshot(1, CellCoord::new(3, 3).center())]);

        let mut out = Vec::new();
        system.handle(&towers, &enemies, &mut out);

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].tower, TowerId::new(2));
    }

    #[test]
    fn empty_collections_clear_previous_targets() {
        let mut system = TowerTargeting::new();
        let tower = tower_snapshot(1, TowerKind::Ice, (0, 0));
        let mut out = vec![TowerTarget {
            tower: TowerId::new(99),
            enemy: EnemyId::new(99),
            tower_position: Vec2::ZERO,
            enemy_position: Vec2::ZERO,
        }];

        system.handle(
            &TowerView::from_snapshots(vec![tower]),
            &EnemyView::default(),
            &mut out,
        );
        assert!(out.is_empty());

        system.handle(
            &TowerView::default(),
            &EnemyView::from_snapshots(vec![enemy_snapshot(1, tower.position)]),
            &mut out,
        );
        assert!(out.is_empty());
    }
}
