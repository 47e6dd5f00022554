//! In-process referee for playing an [`Agent`] against a known layout.

use ndarray::Array2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::*;
pub use generator::*;
pub use layout::*;

mod generator;
mod layout;

/// The referee's answer to one [`Action`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    Revealed(u8),
    Marked,
    HitMine,
    Finished,
}

impl Verdict {
    /// The outcome to hand back to the agent, if the game goes on.
    pub const fn outcome(self) -> Option<Outcome> {
        match self {
            Self::Revealed(label) => Some(Outcome::Revealed(label)),
            Self::Marked => Some(Outcome::Marked),
            Self::HitMine | Self::Finished => None,
        }
    }
}

/// Reveals single cells (no flood fill) and records marks, right or wrong.
#[derive(Clone, Debug, PartialEq)]
pub struct Referee {
    layout: MineLayout,
    board: Array2<Cell>,
    revealed_count: CellCount,
    wrong_marks: CellCount,
    triggered_mine: Option<Coord2>,
    ended: bool,
}

impl Referee {
    pub fn new(layout: MineLayout) -> Self {
        let size = layout.size();
        Self {
            layout,
            board: Array2::default(size.to_nd_index()),
            revealed_count: 0,
            wrong_marks: 0,
            triggered_mine: None,
            ended: false,
        }
    }

    pub fn layout(&self) -> &MineLayout {
        &self.layout
    }

    pub fn cell_at(&self, coords: Coord2) -> Cell {
        self.board[coords.to_nd_index()]
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    pub fn wrong_marks(&self) -> CellCount {
        self.wrong_marks
    }

    pub fn is_cleared(&self) -> bool {
        self.revealed_count == self.layout.safe_cell_count()
    }

    pub fn apply(&mut self, action: Action) -> Result<Verdict> {
        if self.ended {
            return Err(AgentError::AlreadyEnded);
        }

        match action {
            Action::Reveal(coords) => {
                let coords = self.check_hidden(coords)?;
                if self.layout.contains_mine(coords) {
                    self.triggered_mine = Some(coords);
                    self.ended = true;
                    return Ok(Verdict::HitMine);
                }
                let label = self.layout.adjacent_mine_count(coords);
                self.board[coords.to_nd_index()] = Cell::Revealed(label);
                self.revealed_count += 1;
                Ok(Verdict::Revealed(label))
            }
            Action::Mark(coords) => {
                let coords = self.check_hidden(coords)?;
                if !self.layout.contains_mine(coords) {
                    log::warn!("Safe cell {coords:?} marked as a mine");
                    self.wrong_marks += 1;
                }
                self.board[coords.to_nd_index()] = Cell::Marked;
                Ok(Verdict::Marked)
            }
            Action::Done => {
                self.ended = true;
                Ok(Verdict::Finished)
            }
        }
    }

    fn check_hidden(&self, coords: Coord2) -> Result<Coord2> {
        let coords = self.layout.validate_coords(coords)?;
        if self.cell_at(coords).is_hidden() {
            Ok(coords)
        } else {
            Err(AgentError::CellNotHidden)
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOutcome {
    /// Every safe cell was revealed.
    Cleared,
    /// A reveal hit a mine.
    Exploded,
    /// The agent finished, or ran out of turns, with safe cells still hidden.
    Stalled,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameReport {
    pub outcome: GameOutcome,
    pub turns: u32,
    /// Includes the start cell.
    pub reveals: u32,
    pub marks: u32,
}

/// Plays `agent` against `referee` from the agent's configured start.
///
/// Stops when the agent is done, a mine is hit, or after `max_turns` calls to
/// [`Agent::next_action`].
pub fn play_out<R: Rng>(
    agent: &mut Agent<R>,
    referee: &mut Referee,
    max_turns: u32,
) -> Result<GameReport> {
    let mut report = GameReport {
        outcome: GameOutcome::Stalled,
        turns: 0,
        reveals: 1,
        marks: 0,
    };

    let mut verdict = referee.apply(Action::Reveal(agent.config().start))?;
    while let Some(outcome) = verdict.outcome() {
        if report.turns >= max_turns {
            log::warn!("Stopping after {max_turns} turns");
            break;
        }

        let action = agent.next_action(outcome)?;
        report.turns += 1;
        match action {
            Action::Reveal(_) => report.reveals += 1,
            Action::Mark(_) => report.marks += 1,
            Action::Done => {}
        }
        verdict = referee.apply(action)?;
    }

    report.outcome = if referee.triggered_mine().is_some() {
        GameOutcome::Exploded
    } else if referee.is_cleared() {
        GameOutcome::Cleared
    } else {
        GameOutcome::Stalled
    };
    Ok(report)
}
