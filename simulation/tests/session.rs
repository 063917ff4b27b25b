use std::time::Duration;

use elemental_defence_core::{CellCoord, EnemyKind, TowerKind, UpgradeAttribute};
use elemental_defence_simulation::{
    EntityFrame, EntityHandle, EntityKind, Feedback, Presenter, Simulation, SimulationConfig,
};
use elemental_defence_system_synthesis::{Mode, SelectionStatus};
use elemental_defence_world::{query, Level};

const LANE: &str =
    r#"{"columns": 12, "rows": 5, "paths": [[{"x": 0, "y": 1}, {"x": 10, "y": 1}]]}"#;
const FRAME: Duration = Duration::from_millis(100);

#[derive(Debug, Default)]
struct Canvas {
    frames: Vec<EntityFrame>,
    removed: Vec<EntityHandle>,
}

impl Presenter for Canvas {
    fn render_entity(&mut self, frame: EntityFrame) {
        self.frames.push(frame);
    }

    fn remove_rendered_entity(&mut self, handle: EntityHandle) {
        self.removed.push(handle);
    }
}

#[derive(Debug, Default)]
struct Notes {
    errors: Vec<String>,
    feedback: Vec<String>,
}

impl Feedback for Notes {
    fn report_error(&mut self, message: &str) {
        self.errors.push(message.to_owned());
    }

    fn report_feedback(&mut self, message: &str) {
        self.feedback.push(message.to_owned());
    }
}

fn session(config: SimulationConfig) -> Simulation<Canvas, Notes> {
    let level = Level::from_json_str(LANE).expect("valid level");
    Simulation::new(&level, config, Canvas::default(), Notes::default()).expect("valid config")
}

#[test]
fn placement_outcome_reports_cost_and_rejections() {
    let mut simulation = session(SimulationConfig::default());

    let placed = simulation.place_tower(CellCoord::new(2, 3), TowerKind::Fire);
    assert!(placed.success);
    assert_eq!(placed.cost, TowerKind::Fire.cost());
    assert_eq!(simulation.ledger().gold(), 500 - TowerKind::Fire.cost());

    let on_path = simulation.place_tower(CellCoord::new(4, 1), TowerKind::Ice);
    assert!(!on_path.success);
    assert_eq!(on_path.message, "cannot place a tower on that cell");

    let synthesized_only = simulation.place_tower(CellCoord::new(5, 3), TowerKind::Water);
    assert!(!synthesized_only.success);
    assert_eq!(
        simulation.feedback().errors,
        vec![
            "cannot place a tower on that cell".to_owned(),
            "that tower can only be obtained through synthesis".to_owned(),
        ]
    );
}

#[test]
fn upgrades_are_charged_to_the_ledger() {
    let mut simulation = session(SimulationConfig {
        starting_gold: 10_000,
        ..SimulationConfig::default()
    });
    let before = simulation.ledger().gold();

    let outcome = simulation.upgrade(UpgradeAttribute::Damage);

    assert!(outcome.success);
    assert_eq!(outcome.message, "damage upgraded to level 1");
    assert_eq!(simulation.ledger().gold(), before - outcome.cost);
}

#[test]
fn second_wave_start_is_refused_while_one_runs() {
    let mut simulation = session(SimulationConfig::default());

    assert!(simulation.start_wave().success);
    let again = simulation.start_wave();

    assert!(!again.success);
    assert_eq!(again.message, "Wave already in progress!");
}

#[test]
fn cleared_wave_grants_the_bonus_and_advances() {
    let mut simulation = session(SimulationConfig {
        starting_gold: 1_000,
        enemies: vec![EnemyKind::Goblin],
        ..SimulationConfig::default()
    });
    for column in [2, 4, 6, 8] {
        assert!(simulation
            .place_tower(CellCoord::new(column, 2), TowerKind::Fire)
            .success);
    }
    assert!(simulation.start_wave().success);

    let mut cleared = None;
    for _ in 0..20_000 {
        let report = simulation.tick(FRAME);
        assert!(!report.game_over);
        if report.wave_cleared.is_some() {
            cleared = report.wave_cleared;
            break;
        }
    }

    assert_eq!(cleared, Some(1));
    assert_eq!(simulation.waves().wave(), 2);
    assert!(!simulation.waves().is_in_progress());
    assert!(simulation
        .feedback()
        .feedback
        .iter()
        .any(|message| message == "Wave Cleared! +150 gold"));
    assert!(simulation
        .presenter()
        .frames
        .iter()
        .any(|frame| frame.kind == EntityKind::Tower(TowerKind::Fire)));
    assert!(simulation
        .presenter()
        .removed
        .iter()
        .any(|handle| matches!(handle, EntityHandle::Enemy(_))));
}

#[test]
fn fallen_core_ends_the_session() {
    let mut simulation = session(SimulationConfig {
        core_health: 1,
        enemies: vec![EnemyKind::Goblin],
        ..SimulationConfig::default()
    });
    assert!(simulation.start_wave().success);

    let mut fell = false;
    for _ in 0..20_000 {
        if simulation.tick(FRAME).game_over {
            fell = true;
            break;
        }
    }

    assert!(fell, "undefended core should fall");
    assert!(simulation.is_game_over());
    assert!(query::is_core_destroyed(simulation.world()));
    assert!(simulation
        .feedback()
        .errors
        .iter()
        .any(|message| message == "Game Over! The core has been destroyed."));

    let report = simulation.tick(FRAME);
    assert!(report.game_over);
    assert!(report.events.is_empty());
    assert_eq!(simulation.start_wave().message, "the core has fallen");
}

#[test]
fn synthesis_flow_through_map_clicks() {
    let mut simulation = session(SimulationConfig {
        starting_gold: 1_000,
        ..SimulationConfig::default()
    });
    simulation.on_click_tower_button(TowerKind::Fire);
    assert!(simulation.on_click_map(CellCoord::new(2, 3)).success);
    simulation.on_click_tower_button(TowerKind::Ice);
    assert!(simulation.on_click_map(CellCoord::new(4, 3)).success);

    simulation.on_click_synthesis_button();
    assert_eq!(simulation.modes().mode(), Mode::Synthesis);
    assert!(simulation.on_click_map(CellCoord::new(2, 3)).success);
    assert!(simulation.on_click_map(CellCoord::new(4, 3)).success);
    assert_eq!(
        simulation.modes().selection().status(),
        SelectionStatus::TwoSelected
    );

    let confirmed = simulation.on_confirm_synthesis();
    assert!(confirmed.success);
    assert!(confirmed.message.starts_with("Synthesizing water."));

    let placed = simulation.on_click_map(CellCoord::new(7, 4));
    assert!(placed.success);
    assert_eq!(placed.message, "Synthesized water tower");
    assert_eq!(simulation.ledger().gold(), 650);
    assert_eq!(
        simulation
            .presenter()
            .removed
            .iter()
            .filter(|handle| matches!(handle, EntityHandle::Tower(_)))
            .count(),
        2
    );

    simulation.on_click_esc();
    assert_eq!(simulation.modes().mode(), Mode::None);
}

#[test]
fn clicking_empty_ground_in_synthesis_is_reported() {
    let mut simulation = session(SimulationConfig::default());
    simulation.on_click_synthesis_button();

    let outcome = simulation.on_click_map(CellCoord::new(5, 4));

    assert!(!outcome.success);
    assert_eq!(outcome.message, "select a tower");
    assert_eq!(simulation.feedback().errors, vec!["select a tower".to_owned()]);
}
