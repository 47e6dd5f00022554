use alloc::collections::{BTreeMap, BTreeSet};

use rand::Rng;
use rand::seq::IteratorRandom;
use serde::{Deserialize, Serialize};

use crate::*;

/// How to guess when no clue constrains any hidden cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GuessFallback {
    /// First hidden cell in x-major order.
    FirstHidden,
    /// Uniformly random hidden cell outside every constraint.
    Random,
}

impl Default for GuessFallback {
    fn default() -> Self {
        Self::FirstHidden
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Guess {
    /// Cell with the lowest averaged mine likelihood among constrained cells.
    Estimated { coords: Coord2, likelihood: f64 },
    /// Cell picked without any clue information.
    Unconstrained { coords: Coord2 },
}

impl Guess {
    pub fn coords(self) -> Coord2 {
        match self {
            Self::Estimated { coords, .. } | Self::Unconstrained { coords } => coords,
        }
    }
}

#[derive(Copy, Clone, Debug, Default)]
struct Tally {
    sum: f64,
    refs: u32,
}

impl Tally {
    fn average(self) -> f64 {
        self.sum / f64::from(self.refs)
    }
}

/// Averages each constraint's mine density over the constraints containing a cell.
///
/// Every constraint is treated as independent and the global mine count is
/// ignored, so the figures are heuristic scores rather than true marginal
/// probabilities.
pub fn estimate_likelihoods<'a>(
    constraints: impl IntoIterator<Item = &'a Constraint>,
) -> BTreeMap<Coord2, f64> {
    let mut tallies: BTreeMap<Coord2, Tally> = BTreeMap::new();
    for constraint in constraints {
        let density = constraint.density();
        for &coords in constraint.cells() {
            let tally = tallies.entry(coords).or_default();
            tally.sum += density;
            tally.refs += 1;
        }
    }

    tallies
        .into_iter()
        .map(|(coords, tally)| (coords, tally.average()))
        .collect()
}

/// Lowest estimated likelihood; ties go to the smallest coordinates.
pub fn least_likely(likelihoods: &BTreeMap<Coord2, f64>) -> Option<(Coord2, f64)> {
    likelihoods
        .iter()
        .map(|(&coords, &likelihood)| (coords, likelihood))
        .min_by(|a, b| a.1.total_cmp(&b.1))
}

/// Picks the next cell to reveal when nothing can be deduced.
pub fn choose_guess<R: Rng + ?Sized>(
    clues: &ClueSet,
    grid: &Grid,
    fallback: GuessFallback,
    rng: &mut R,
) -> Option<Guess> {
    let constraints = clues.constraints(grid);

    if let Some((coords, likelihood)) = least_likely(&estimate_likelihoods(&constraints)) {
        return Some(Guess::Estimated { coords, likelihood });
    }

    let coords = match fallback {
        GuessFallback::FirstHidden => grid.first_hidden(),
        GuessFallback::Random => {
            let constrained: BTreeSet<Coord2> = constraints
                .iter()
                .flat_map(|c| c.cells().iter().copied())
                .collect();
            grid.hidden_cells()
                .filter(|coords| !constrained.contains(coords))
                .choose(rng)
        }
    }?;
    Some(Guess::Unconstrained { coords })
}
