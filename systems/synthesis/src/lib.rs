#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Tower synthesis selection protocol and the player's input mode.
//!
//! Synthesis merges two towers of different elements into a stronger kind.
//! The player selects two towers, confirms the recipe and finally picks an
//! empty cell for the result. [`SynthesisSelection`] tracks that protocol,
//! while [`ModeManager`] arbitrates between synthesis and ordinary placement.

mod mode;

pub use mode::{Mode, ModeManager};

use elemental_defence_core::{CellCoord, Command, Event, SynthesisError, TowerId, TowerKind};
use log::debug;

/// Progress of the synthesis selection protocol.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SelectionStatus {
    /// No tower is selected.
    #[default]
    None,
    /// One tower is selected.
    OneSelected,
    /// Two towers of different kinds are selected.
    TwoSelected,
    /// The recipe was confirmed and a destination cell is awaited.
    Confirmed,
}

/// Tower participating in a synthesis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SelectedTower {
    /// Identifier of the selected tower.
    pub tower: TowerId,
    /// Kind of the selected tower.
    pub kind: TowerKind,
}

/// Selection state machine driving a single synthesis.
///
/// Selection changes are mirrored into the world through
/// [`Command::SetTowerSelected`] so selected towers stop firing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SynthesisSelection {
    first: Option<SelectedTower>,
    second: Option<SelectedTower>,
    result: Option<TowerKind>,
}

impl SynthesisSelection {
    /// Creates an empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current protocol state.
    #[must_use]
    pub fn status(&self) -> SelectionStatus {
        match (self.first, self.second, self.result) {
            (None, _, _) => SelectionStatus::None,
            (Some(_), None, _) => SelectionStatus::OneSelected,
            (Some(_), Some(_), None) => SelectionStatus::TwoSelected,
            (Some(_), Some(_), Some(_)) => SelectionStatus::Confirmed,
        }
    }

    /// First selected tower.
    #[must_use]
    pub fn first(&self) -> Option<SelectedTower> {
        self.first
    }

    /// Second selected tower.
    #[must_use]
    pub fn second(&self) -> Option<SelectedTower> {
        self.second
    }

    /// Kind the confirmed synthesis will produce.
    #[must_use]
    pub fn result(&self) -> Option<TowerKind> {
        self.result
    }

    /// Adds a tower to the selection.
    ///
    /// The second tower must be a different tower of a different kind;
    /// rejected selections leave the state untouched.
    pub fn select(
        &mut self,
        tower: TowerId,
        kind: TowerKind,
        out: &mut Vec<Command>,
    ) -> Result<SelectionStatus, SynthesisError> {
        let selected = SelectedTower { tower, kind };
        match self.status() {
            SelectionStatus::None => self.first = Some(selected),
            SelectionStatus::OneSelected => {
                let first = self.first.ok_or(SynthesisError::IncompleteSelection)?;
                if first.tower == tower {
                    return Err(SynthesisError::AlreadySelected);
                }
                if first.kind == kind {
                    return Err(SynthesisError::SameKind);
                }
                self.second = Some(selected);
            }
            SelectionStatus::TwoSelected => return Err(SynthesisError::NotConfirmed),
            SelectionStatus::Confirmed => return Err(SynthesisError::AlreadySelected),
        }

        out.push(Command::SetTowerSelected {
            tower,
            selected: true,
        });
        Ok(self.status())
    }

    /// Confirms the selected pair and looks up the recipe.
    pub fn confirm(&mut self) -> Result<TowerKind, SynthesisError> {
        let (Some(first), Some(second)) = (self.first, self.second) else {
            return Err(SynthesisError::IncompleteSelection);
        };
        if let Some(result) = self.result {
            return Ok(result);
        }

        let result =
            first
                .kind
                .synthesis_result(second.kind)
                .ok_or(SynthesisError::UnknownRecipe {
                    first: first.kind,
                    second: second.kind,
                })?;
        self.result = Some(result);
        Ok(result)
    }

    /// Builds the command placing the confirmed synthesis at `cell`.
    ///
    /// The selection stays confirmed until the world reports the outcome.
    pub fn place(&self, cell: CellCoord) -> Result<Command, SynthesisError> {
        match (self.first, self.second, self.result) {
            (Some(first), Some(second), Some(_)) => Ok(Command::SynthesizeTowers {
                first: first.tower,
                second: second.tower,
                cell,
            }),
            _ => Err(SynthesisError::NotConfirmed),
        }
    }

    /// Steps the protocol back by one state.
    ///
    /// A confirmed synthesis returns to two selected towers; otherwise the
    /// most recently selected tower is released.
    pub fn cancel(&mut self, out: &mut Vec<Command>) -> SelectionStatus {
        if self.result.take().is_none() {
            let released = match self.second.take() {
                Some(second) => Some(second),
                None => self.first.take(),
            };
            if let Some(released) = released {
                out.push(Command::SetTowerSelected {
                    tower: released.tower,
                    selected: false,
                });
            }
        }
        self.status()
    }

    /// Releases every selected tower and returns to [`SelectionStatus::None`].
    pub fn reset(&mut self, out: &mut Vec<Command>) {
        self.result = None;
        for released in [self.second.take(), self.first.take()].into_iter().flatten() {
            out.push(Command::SetTowerSelected {
                tower: released.tower,
                selected: false,
            });
        }
    }

    /// Reconciles the selection with world events.
    ///
    /// A completed synthesis clears the selection. Towers that vanish for any
    /// other reason are dropped, and the confirmation is withdrawn.
    pub fn handle(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::TowersSynthesized { consumed, .. } => {
                    if self.involves(consumed[0]) || self.involves(consumed[1]) {
                        debug!("synthesis completed, clearing selection");
                        self.first = None;
                        self.second = None;
                        self.result = None;
                    }
                }
                Event::TowerDestroyed { tower, .. } | Event::TowerConsumed { tower, .. } => {
                    self.drop_tower(*tower);
                }
                _ => {}
            }
        }
    }

    /// Prompt describing what the player should do next.
    #[must_use]
    pub fn message(&self) -> &'static str {
        match self.status() {
            SelectionStatus::None => "Select a tower.",
            SelectionStatus::OneSelected => {
                "Select a tower of a different element. Press Esc to cancel."
            }
            SelectionStatus::TwoSelected => "Synthesize these towers? Press Esc to cancel.",
            SelectionStatus::Confirmed => "Choose where to place the synthesized tower.",
        }
    }

    fn involves(&self, tower: TowerId) -> bool {
        [self.first, self.second]
            .into_iter()
            .flatten()
            .any(|selected| selected.tower == tower)
    }

    fn drop_tower(&mut self, tower: TowerId) {
        if !self.involves(tower) {
            return;
        }
        debug!("tower {} left the synthesis selection", tower.get());
        self.result = None;
        if self.second.map(|selected| selected.tower) == Some(tower) {
            self.second = None;
        } else {
            self.first = self.second.take();
        }
    }
}
