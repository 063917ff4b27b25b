//! Player input mode: ordinary tower placement or synthesis.

use elemental_defence_core::{CellCoord, Command, Event, SynthesisError, TowerId, TowerKind};
use log::debug;

use crate::{SelectionStatus, SynthesisSelection};

/// What a click on the map currently does.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Map clicks are ignored.
    #[default]
    None,
    /// Map clicks place a tower of the chosen kind.
    TowerSelect(TowerKind),
    /// Map clicks drive the synthesis selection.
    Synthesis,
}

/// Arbitrates between tower placement and synthesis input.
///
/// The two modes are mutually exclusive: entering one leaves the other and
/// releases any partial synthesis selection.
#[derive(Clone, Debug, Default)]
pub struct ModeManager {
    mode: Mode,
    selection: SynthesisSelection,
}

impl ModeManager {
    /// Creates a manager with no active mode.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently active mode.
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Synthesis selection state.
    #[must_use]
    pub fn selection(&self) -> &SynthesisSelection {
        &self.selection
    }

    /// Enters placement mode for `kind`.
    pub fn on_click_tower_button(&mut self, kind: TowerKind, out: &mut Vec<Command>) {
        self.selection.reset(out);
        self.mode = Mode::TowerSelect(kind);
        debug!("placement mode for {kind}");
    }

    /// Toggles synthesis mode.
    pub fn on_click_synthesis_button(&mut self, out: &mut Vec<Command>) {
        self.selection.reset(out);
        self.mode = match self.mode {
            Mode::Synthesis => Mode::None,
            Mode::None | Mode::TowerSelect(_) => Mode::Synthesis,
        };
        debug!("mode is now {:?}", self.mode);
    }

    /// Handles a click on `cell`, where `occupant` is the tower standing there.
    ///
    /// In placement mode the click places a tower. In synthesis mode it
    /// selects a tower, or places the confirmed synthesis.
    pub fn on_click_map(
        &mut self,
        cell: CellCoord,
        occupant: Option<(TowerId, TowerKind)>,
        out: &mut Vec<Command>,
    ) -> Result<(), SynthesisError> {
        match self.mode {
            Mode::None => Ok(()),
            Mode::TowerSelect(kind) => {
                out.push(Command::PlaceTower { kind, cell });
                Ok(())
            }
            Mode::Synthesis => match self.selection.status() {
                SelectionStatus::Confirmed => {
                    out.push(self.selection.place(cell)?);
                    Ok(())
                }
                SelectionStatus::TwoSelected => Err(SynthesisError::NotConfirmed),
                SelectionStatus::None | SelectionStatus::OneSelected => {
                    let (tower, kind) = occupant.ok_or(SynthesisError::NoTower)?;
                    let _ = self.selection.select(tower, kind, out)?;
                    Ok(())
                }
            },
        }
    }

    /// Handles the escape key.
    ///
    /// Synthesis steps back one level and is left once nothing is selected.
    /// Placement mode is left immediately.
    pub fn on_click_esc(&mut self, out: &mut Vec<Command>) {
        match self.mode {
            Mode::None => {}
            Mode::TowerSelect(_) => self.mode = Mode::None,
            Mode::Synthesis => {
                if self.selection.status() == SelectionStatus::None {
                    self.mode = Mode::None;
                } else {
                    let _ = self.selection.cancel(out);
                }
            }
        }
    }

    /// Confirms the selected pair.
    pub fn on_confirm_synthesis(&mut self) -> Result<TowerKind, SynthesisError> {
        if self.mode != Mode::Synthesis {
            return Err(SynthesisError::InactiveMode);
        }
        self.selection.confirm()
    }

    /// Reconciles the synthesis selection with world events.
    pub fn handle(&mut self, events: &[Event]) {
        self.selection.handle(events);
    }

    /// Prompt for the player, if the active mode has one.
    #[must_use]
    pub fn message(&self) -> Option<&'static str> {
        match self.mode {
            Mode::Synthesis => Some(self.selection.message()),
            Mode::None | Mode::TowerSelect(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placement_mode_emits_place_commands() {
        let mut manager = ModeManager::new();
        let mut out = Vec::new();
        let cell = CellCoord::new(4, 2);

        manager.on_click_map(cell, None, &mut out).expect("ignored");
        assert!(out.is_empty());

        manager.on_click_tower_button(TowerKind::Wind, &mut out);
        manager.on_click_map(cell, None, &mut out).expect("placement");
        assert_eq!(
            out,
            vec![Command::PlaceTower {
                kind: TowerKind::Wind,
                cell,
            }]
        );
    }

    #[test]
    fn switching_modes_releases_partial_selection() {
        let mut manager = ModeManager::new();
        let mut out = Vec::new();
        manager.on_click_synthesis_button(&mut out);
        manager
            .on_click_map(
                CellCoord::new(1, 1),
                Some((TowerId::new(7), TowerKind::Fire)),
                &mut out,
            )
            .expect("selection");
        out.clear();

        manager.on_click_tower_button(TowerKind::Ice, &mut out);

        assert_eq!(manager.mode(), Mode::TowerSelect(TowerKind::Ice));
        assert_eq!(manager.selection().status(), SelectionStatus::None);
        assert_eq!(
            out,
            vec![Command::SetTowerSelected {
                tower: TowerId::new(7),
                selected: false,
            }]
        );
    }

    #[test]
    fn synthesis_button_toggles() {
        let mut manager = ModeManager::new();
        let mut out = Vec::new();
        manager.on_click_synthesis_button(&mut out);
        assert_eq!(manager.mode(), Mode::Synthesis);
        assert_eq!(manager.message(), Some("Select a tower."));
        manager.on_click_synthesis_button(&mut out);
        assert_eq!(manager.mode(), Mode::None);
        assert_eq!(manager.message(), None);
    }

    #[test]
    fn empty_cell_click_selects_nothing() {
        let mut manager = ModeManager::new();
        let mut out = Vec::new();
        manager.on_click_synthesis_button(&mut out);

        assert_eq!(
            manager.on_click_map(CellCoord::new(0, 0), None, &mut out),
            Err(SynthesisError::NoTower)
        );
        assert!(out.is_empty());
    }

    #[test]
    fn escape_unwinds_then_leaves_synthesis() {
        let mut manager = ModeManager::new();
        let mut out = Vec::new();
        manager.on_click_synthesis_button(&mut out);
        manager
            .on_click_map(
                CellCoord::new(1, 1),
                Some((TowerId::new(1), TowerKind::Stone)),
                &mut out,
            )
            .expect("selection");

        manager.on_click_esc(&mut out);
        assert_eq!(manager.mode(), Mode::Synthesis);
        assert_eq!(manager.selection().status(), SelectionStatus::None);

        manager.on_click_esc(&mut out);
        assert_eq!(manager.mode(), Mode::None);
    }

    #[test]
    fn confirm_outside_synthesis_is_rejected() {
        let mut manager = ModeManager::new();
        assert_eq!(
            manager.on_confirm_synthesis(),
            Err(SynthesisError::InactiveMode)
        );
    }

    #[test]
    fn map_click_while_awaiting_confirmation_is_rejected() {
        let mut manager = ModeManager::new();
        let mut out = Vec::new();
        manager.on_click_synthesis_button(&mut out);
        for (id, kind) in [(1, TowerKind::Fire), (2, TowerKind::Wind)] {
            manager
                .on_click_map(CellCoord::new(id, 0), Some((TowerId::new(id), kind)), &mut out)
                .expect("selection");
        }

        assert_eq!(
            manager.on_click_map(CellCoord::new(5, 5), None, &mut out),
            Err(SynthesisError::NotConfirmed)
        );
        assert_eq!(manager.on_confirm_synthesis(), Ok(TowerKind::HotWind));

        out.clear();
        manager
            .on_click_map(CellCoord::new(5, 5), None, &mut out)
            .expect("placement");
        assert_eq!(
            out,
            vec![Command::SynthesizeTowers {
                first: TowerId::new(1),
                second: TowerId::new(2),
                cell: CellCoord::new(5, 5),
            }]
        );
    }
}
