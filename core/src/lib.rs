#![no_std]

extern crate alloc;

use serde::{Deserialize, Serialize};

pub use agent::*;
pub use cell::*;
pub use constraint::*;
pub use error::*;
pub use estimate::*;
pub use grid::*;
pub use inference::*;
pub use queue::*;
pub use referee::*;
pub use types::*;

mod agent;
mod cell;
mod constraint;
mod error;
mod estimate;
mod grid;
mod inference;
mod queue;
mod referee;
mod types;

/// Everything an [`Agent`] needs to know before its first turn.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    pub size: Coord2,
    pub mines: CellCount,
    /// Already revealed by the harness; its label is the first outcome.
    pub start: Coord2,
    #[serde(default)]
    pub fallback: GuessFallback,
    #[serde(default)]
    pub seed: u64,
    /// Reveal every remaining hidden cell once all mines are marked.
    #[serde(default)]
    pub sweep_when_budget_met: bool,
}

impl AgentConfig {
    pub const fn new(size: Coord2, mines: CellCount, start: Coord2) -> Self {
        Self {
            size,
            mines,
            start,
            fallback: GuessFallback::FirstHidden,
            seed: 0,
            sweep_when_budget_met: false,
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(|err| {
            log::warn!("Rejected agent configuration: {err}");
            AgentError::InvalidConfig
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_fallback(mut self, fallback: GuessFallback) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_sweep(mut self, sweep_when_budget_met: bool) -> Self {
        self.sweep_when_budget_met = sweep_when_budget_met;
        self
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    pub fn validate(&self) -> Result<()> {
        if self.total_cells() < 2 {
            return Err(AgentError::InvalidBoardShape);
        }
        if !in_bounds(self.start, self.size) {
            return Err(AgentError::InvalidCoords);
        }
        // the start cell is known to be safe
        if self.mines >= self.total_cells() {
            return Err(AgentError::TooManyMines);
        }
        Ok(())
    }
}

/// The single move an [`Agent`] asks the harness to perform.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Reveal(Coord2),
    Mark(Coord2),
    Done,
}

impl Action {
    pub const fn coords(self) -> Option<Coord2> {
        match self {
            Self::Reveal(coords) | Self::Mark(coords) => Some(coords),
            Self::Done => None,
        }
    }

    pub const fn is_done(self) -> bool {
        matches!(self, Self::Done)
    }
}

/// What the harness reports back for the previous [`Action`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// The revealed cell's label.
    Revealed(u8),
    Marked,
}
