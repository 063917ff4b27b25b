#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that flies projectiles toward their targets.
//!
//! Every tick each projectile either resolves, when its target is gone or
//! within [`HIT_RADIUS`], or travels [`PROJECTILE_SPEED`] world units toward
//! the target's latest position.

use elemental_defence_core::{Command, EnemyView, ProjectileView};
use glam::Vec2;

/// Distance travelled by a projectile per tick in world units.
pub const PROJECTILE_SPEED: f32 = 5.0;

/// Projectiles closer than this to their target resolve as hits.
pub const HIT_RADIUS: f32 = 5.0;

/// Projectile system emitting movement and resolution commands.
#[derive(Debug, Default)]
pub struct Projectiles;

impl Projectiles {
    /// Creates a new projectile system.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Advances every projectile in flight by one tick.
    pub fn handle(
        &mut self,
        projectiles: &ProjectileView,
        enemies: &EnemyView,
        out: &mut Vec<Command>,
    ) {
        for projectile in projectiles.iter() {
            let Some(enemy) = enemies.get(projectile.target) else {
                out.push(Command::ResolveProjectile {
                    projectile: projectile.id,
                });
                continue;
            };

            let target_position = enemy.position;
            let offset = target_position - projectile.position;
            let distance = offset.length();
            if distance < HIT_RADIUS {
                out.push(Command::ResolveProjectile {
                    projectile: projectile.id,
                });
                continue;
            }

            out.push(Command::MoveProjectile {
                projectile: projectile.id,
                position: step_toward(projectile.position, offset, distance),
                target_position,
            });
        }
    }
}

fn step_toward(position: Vec2, offset: Vec2, distance: f32) -> Vec2 {
    position + offset / distance * PROJECTILE_SPEED.min(distance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use elemental_defence_core::{
        EnemyId, EnemyKind, EnemySnapshot, Locomotion, PathId, ProjectileId, ProjectileSnapshot,
        TowerId, TowerKind,
    };

    fn projectile(id: u32, position: Vec2, target: u32) -> ProjectileSnapshot {
        ProjectileSnapshot {
            id: ProjectileId::new(id),
            tower: TowerId::new(0),
            tower_kind: TowerKind::Ice,
            position,
            target: EnemyId::new(target),
            target_position: Vec2::ZERO,
            damage: 20.0,
        }
    }

    fn enemy(id: u32, position: Vec2) -> EnemySnapshot {
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
    fn moves_five_units_toward_refreshed_target() {
        let projectiles = ProjectileView::from_snapshots(vec![projectile(1, Vec2::ZERO, 7)]);
        let enemies = EnemyView::from_snapshots(vec![enemy(7, Vec2::new(30.0, 40.0))]);
        let mut out = Vec::new();

        Projectiles::new().handle(&projectiles, &enemies, &mut out);

        assert_eq!(out.len(), 1);
        match out[0] {
            Command::MoveProjectile {
                projectile,
                position,
                target_position,
            } => {
                assert_eq!(projectile, ProjectileId::new(1));
                assert!(position.abs_diff_eq(Vec2::new(3.0, 4.0), 1e-5));
                assert_eq!(target_position, Vec2::new(30.0, 40.0));
            }
            ref other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn resolves_when_close_or_target_gone() {
        let projectiles = ProjectileView::from_snapshots(vec![
            projectile(1, Vec2::new(10.0, 10.0), 3),
            projectile(2, Vec2::ZERO, 99),
        ]);
        let enemies = EnemyView::from_snapshots(vec![enemy(3, Vec2::new(12.0, 13.0))]);
        let mut out = Vec::new();

        Projectiles::new().handle(&projectiles, &enemies, &mut out);

        assert_eq!(
            out,
            vec![
                Command::ResolveProjectile {
                    projectile: ProjectileId::new(1),
                },
                Command::ResolveProjectile {
                    projectile: ProjectileId::new(2),
                },
            ]
        );
    }

    #[test]
    fn projectile_at_exactly_hit_radius_keeps_flying() {
        let projectiles = ProjectileView::from_snapshots(vec![projectile(1, Vec2::ZERO, 1)]);
        let enemies = EnemyView::from_snapshots(vec![enemy(1, Vec2::new(HIT_RADIUS, 0.0))]);
        let mut out = Vec::new();

        Projectiles::new().handle(&projectiles, &enemies, &mut out);

        assert!(matches!(
            out.as_slice(),
            [Command::MoveProjectile { position, .. }] if *position == Vec2::new(HIT_RADIUS, 0.0)
        ));
    }
}
