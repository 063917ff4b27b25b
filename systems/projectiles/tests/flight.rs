use elemental_defence_core::{
    CellCoord, Command, EnemyId, EnemyKind, Event, PathId, ProjectileId, ResourceLedger, TowerId,
    TowerKind,
};
use elemental_defence_system_projectiles::Projectiles;
use elemental_defence_world::{self as world, query, Level, World, WorldConfig};

const LANE: &str =
    r#"{"columns": 12, "rows": 5, "paths": [[{"x": 0, "y": 1}, {"x": 10, "y": 1}]]}"#;

struct Fixture {
    world: World,
    ledger: ResourceLedger,
}

impl Fixture {
    fn new() -> Self {
        let level = Level::from_json_str(LANE).expect("valid level");
        Self {
            world: World::from_level(&level, WorldConfig::default()),
            ledger: ResourceLedger::default(),
        }
    }

    fn apply(&mut self, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        world::apply(&mut self.world, &mut self.ledger, command, &mut events);
        events
    }

    fn place(&mut self, kind: TowerKind, cell: CellCoord) -> TowerId {
        match self.apply(Command::PlaceTower { kind, cell }).as_slice() {
            [Event::TowerPlaced { tower, .. }] => *tower,
            other => panic!("placement failed: {other:?}"),
        }
    }

    fn spawn(&mut self, kind: EnemyKind, progress: f32) -> EnemyId {
        let enemy = match self
            .apply(Command::SpawnEnemy {
                kind,
                path: PathId::new(0),
            })
            .as_slice()
        {
            [Event::EnemySpawned { enemy, .. }] => *enemy,
            other => panic!("spawn failed: {other:?}"),
        };
        let _ = self.apply(Command::AdvanceEnemy { enemy, progress });
        enemy
    }

    fn fire(&mut self, tower: TowerId, target: EnemyId) -> ProjectileId {
        self.apply(Command::FireProjectile { tower, target })
            .into_iter()
            .find_map(|event| match event {
                Event::ProjectileFired { projectile, .. } => Some(projectile),
                _ => None,
            })
            .expect("tower should fire")
    }

    fn pump(&mut self, system: &mut Projectiles) -> Vec<Event> {
        let mut commands = Vec::new();
        system.handle(
            &query::projectile_view(&self.world),
            &query::enemy_view(&self.world),
            &mut commands,
        );
        let mut events = Vec::new();
        for command in commands {
            world::apply(&mut self.world, &mut self.ledger, command, &mut events);
        }
        events
    }
}

#[test]
fn projectile_travels_and_hits_its_target() {
    let mut fixture = Fixture::new();
    let tower = fixture.place(TowerKind::Ice, CellCoord::new(2, 3));
    let goblin = fixture.spawn(EnemyKind::Goblin, 0.5);
    let projectile = fixture.fire(tower, goblin);
    let mut system = Projectiles::new();

    let mut ticks = 0;
    let hit = loop {
        ticks += 1;
        assert!(ticks < 50, "projectile never arrived");
        let events = fixture.pump(&mut system);
        if let Some(event) = events
            .into_iter()
            .find(|event| matches!(event, Event::ProjectileHit { .. }))
        {
            break event;
        }
    };

    assert_eq!(
        hit,
        Event::ProjectileHit {
            projectile,
            enemy: goblin,
            damage: 20.0,
        }
    );
    assert_eq!(ticks, 11, "50 units at 5 units per tick plus the hit check");
    assert!(query::projectile_view(&fixture.world).iter().next().is_none());
    let health = query::enemy(&fixture.world, goblin).expect("goblin alive").health;
    assert!((health - 20.0).abs() < 1e-5);
}

#[test]
fn projectile_misses_when_target_leaves_the_world() {
    let mut fixture = Fixture::new();
    let tower = fixture.place(TowerKind::Stone, CellCoord::new(9, 2));
    let skeleton = fixture.spawn(EnemyKind::Skeleton, 9.0);
    let projectile = fixture.fire(tower, skeleton);

    let arrival = fixture.apply(Command::AdvanceEnemy {
        enemy: skeleton,
        progress: 10.0,
    });
    assert!(arrival
        .iter()
        .any(|event| matches!(event, Event::EnemyReachedCore { .. })));

    let events = fixture.pump(&mut Projectiles::new());
    assert_eq!(events, vec![Event::ProjectileMissed { projectile }]);
    assert_eq!(fixture.ledger.gold(), 500 - TowerKind::Stone.cost());
}
