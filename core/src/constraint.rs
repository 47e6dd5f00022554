use alloc::collections::BTreeSet;
use core::fmt;

use serde::{Deserialize, Serialize};

use crate::*;

/// "Exactly `mines` of these hidden cells are mined."
///
/// Equality and ordering are structural: the sorted cell set first, then the
/// mine count. That ordering is the stable key every working set in the crate
/// relies on, so results never depend on hash iteration order.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Constraint {
    cells: BTreeSet<Coord2>,
    mines: i16,
}

impl Constraint {
    pub fn new(cells: impl IntoIterator<Item = Coord2>, mines: i16) -> Self {
        Self {
            cells: cells.into_iter().collect(),
            mines,
        }
    }

    /// Builds the constraint a revealed clue places on its hidden neighbors.
    ///
    /// Returns `None` when `coords` is not revealed or has no hidden neighbors
    /// left, since such a clue constrains nothing.
    pub fn from_clue(grid: &Grid, coords: Coord2) -> Option<Self> {
        let mines = grid.effective_count(coords)?;
        let cells = grid.hidden_neighbors(coords);
        if cells.is_empty() {
            return None;
        }
        Some(Self::new(cells, mines))
    }

    pub fn cells(&self) -> &BTreeSet<Coord2> {
        &self.cells
    }

    pub fn mines(&self) -> i16 {
        self.mines
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, coords: Coord2) -> bool {
        self.cells.contains(&coords)
    }

    pub fn is_all_safe(&self) -> bool {
        !self.is_empty() && self.mines == 0
    }

    pub fn is_all_mines(&self) -> bool {
        !self.is_empty() && usize::try_from(self.mines).is_ok_and(|mines| mines == self.len())
    }

    /// Share of the cells expected to be mined, assuming each placement is
    /// equally likely.
    pub fn density(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        f64::from(self.mines) / self.len() as f64
    }

    /// True iff every cell of `self` is in `other` and `other` has more cells.
    pub fn is_strict_subset_of(&self, other: &Self) -> bool {
        self.len() < other.len() && self.cells.is_subset(&other.cells)
    }

    /// Checks `subset ⊂ superset` once and hands back a witness that allows
    /// subtraction. This is the only way to subtract two constraints.
    pub fn strict_subset_of<'a>(subset: &'a Self, superset: &'a Self) -> Option<StrictSubset<'a>> {
        subset
            .is_strict_subset_of(superset)
            .then_some(StrictSubset { subset, superset })
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (x, y)) in self.cells.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "({x}, {y})")?;
        }
        write!(f, "}} = {}", self.mines)
    }
}

/// Proof that `subset` is a strict subset of `superset`.
#[derive(Copy, Clone, Debug)]
pub struct StrictSubset<'a> {
    subset: &'a Constraint,
    superset: &'a Constraint,
}

impl StrictSubset<'_> {
    pub fn subset(&self) -> &Constraint {
        self.subset
    }

    pub fn superset(&self) -> &Constraint {
        self.superset
    }

    /// `superset − subset`: the cells outside the subset hold the mines the
    /// subset does not account for. Never empty.
    pub fn subtract(self) -> Constraint {
        Constraint {
            cells: self
                .superset
                .cells
                .difference(&self.subset.cells)
                .copied()
                .collect(),
            mines: self.superset.mines - self.subset.mines,
        }
    }
}
