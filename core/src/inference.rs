use alloc::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::*;

/// A revealed cell that may still yield deductions.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActiveClue {
    pub coords: Coord2,
    pub label: u8,
}

/// Working set of clues that still border hidden cells.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClueSet {
    clues: BTreeMap<Coord2, u8>,
}

impl ClueSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, clue: ActiveClue) {
        self.clues.insert(clue.coords, clue.label);
    }

    pub fn contains(&self, coords: Coord2) -> bool {
        self.clues.contains_key(&coords)
    }

    pub fn len(&self) -> usize {
        self.clues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clues.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = ActiveClue> + '_ {
        self.clues
            .iter()
            .map(|(&coords, &label)| ActiveClue { coords, label })
    }

    /// Drops `coords` and its neighbors if they no longer border a hidden cell.
    ///
    /// Only those clues can have lost their last hidden neighbor when
    /// `coords` settles.
    pub fn purge_around(&mut self, grid: &Grid, coords: Coord2) -> usize {
        let before = self.clues.len();
        for pos in core::iter::once(coords).chain(grid.neighbors_of(coords)) {
            if self.clues.contains_key(&pos) && grid.hidden_neighbor_count(pos) == 0 {
                self.clues.remove(&pos);
            }
        }
        before - self.clues.len()
    }

    /// Drops every clue without hidden neighbors.
    pub fn purge(&mut self, grid: &Grid) -> usize {
        let before = self.clues.len();
        self.clues
            .retain(|&coords, _| grid.hidden_neighbor_count(coords) > 0);
        before - self.clues.len()
    }

    /// One constraint per clue, deduplicated.
    pub fn constraints(&self, grid: &Grid) -> BTreeSet<Constraint> {
        self.clues
            .keys()
            .filter_map(|&coords| Constraint::from_clue(grid, coords))
            .collect()
    }
}

/// Cells proven safe or mined by one inference pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Deductions {
    pub safe: BTreeSet<Coord2>,
    pub mines: BTreeSet<Coord2>,
}

impl Deductions {
    pub fn is_empty(&self) -> bool {
        self.safe.is_empty() && self.mines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.safe.len() + self.mines.len()
    }

    fn absorb(&mut self, constraint: &Constraint) {
        if constraint.is_all_safe() {
            self.safe.extend(constraint.cells());
        } else if constraint.is_all_mines() {
            self.mines.extend(constraint.cells());
        }
    }

    /// Drops cells claimed both ways, which only a contradictory board produces.
    fn drop_conflicts(&mut self) {
        let conflicts: BTreeSet<_> = self.safe.intersection(&self.mines).copied().collect();
        if conflicts.is_empty() {
            return;
        }
        log::warn!(
            "Ignoring {} cells deduced both safe and mined",
            conflicts.len()
        );
        self.safe.retain(|pos| !conflicts.contains(pos));
        self.mines.retain(|pos| !conflicts.contains(pos));
    }
}

/// Deductions each clue makes on its own.
///
/// An effective count of zero clears every hidden neighbor; an effective count
/// equal to the hidden neighbor count mines all of them.
pub fn propagate(clues: &ClueSet, grid: &Grid) -> Deductions {
    let mut out = Deductions::default();
    for clue in clues.iter() {
        if let Some(constraint) = Constraint::from_clue(grid, clue.coords) {
            out.absorb(&constraint);
        }
    }
    out.drop_conflicts();
    out
}

/// Pairwise subset elimination over the current clue constraints.
///
/// Every constraint strictly contained in another is subtracted from it once;
/// derived constraints that are all-safe or all-mined become deductions and
/// the rest are dropped. Derived constraints are not combined further in the
/// same pass.
pub fn eliminate(clues: &ClueSet, grid: &Grid) -> Deductions {
    let constraints = clues.constraints(grid);

    let mut derived = BTreeSet::new();
    for left in &constraints {
        for right in &constraints {
            if let Some(proof) = Constraint::strict_subset_of(left, right) {
                derived.insert(proof.subtract());
            }
        }
    }

    let mut out = Deductions::default();
    for constraint in &derived {
        let in_range = usize::try_from(constraint.mines()).is_ok_and(|m| m <= constraint.len());
        if !in_range {
            log::warn!("Discarding inconsistent derived constraint {constraint}");
            continue;
        }
        log::trace!("Derived {constraint}");
        out.absorb(constraint);
    }
    out.drop_conflicts();
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clue_set(grid: &Grid) -> ClueSet {
        let mut clues = ClueSet::new();
        let (x_end, y_end) = grid.size();
        for x in 0..x_end {
            for y in 0..y_end {
                if let Some(Cell::Revealed(label)) = grid.cell_at((x, y)) {
                    clues.insert(ActiveClue {
                        coords: (x, y),
                        label,
                    });
                }
            }
        }
        clues
    }

    #[test]
    fn zero_clue_clears_hidden_neighbors() {
        let mut grid = Grid::new((3, 3), 1);
        grid.set_label((0, 0), 0).unwrap();

        let out = propagate(&clue_set(&grid), &grid);

        assert_eq!(out.safe, BTreeSet::from([(1, 0), (0, 1), (1, 1)]));
        assert!(out.mines.is_empty());
    }

    #[test]
    fn satisfied_clue_clears_the_rest() {
        let mut grid = Grid::new((3, 1), 1);
        grid.set_label((1, 0), 1).unwrap();
        grid.set_marked((0, 0)).unwrap();

        let out = propagate(&clue_set(&grid), &grid);

        assert_eq!(out.safe, BTreeSet::from([(2, 0)]));
        assert!(out.mines.is_empty());
    }

    #[test]
    fn saturated_clue_mines_single_hidden_neighbor() {
        // 2x2: three revealed 1s around a single hidden corner
        let mut grid = Grid::new((2, 2), 1);
        grid.set_label((0, 0), 1).unwrap();
        grid.set_label((1, 0), 1).unwrap();
        grid.set_label((0, 1), 1).unwrap();

        let out = propagate(&clue_set(&grid), &grid);

        assert_eq!(out.mines, BTreeSet::from([(1, 1)]));
        assert!(out.safe.is_empty());
    }

    #[test]
    fn undetermined_clue_yields_nothing() {
        let mut grid = Grid::new((3, 3), 2);
        grid.set_label((1, 1), 1).unwrap();

        assert!(propagate(&clue_set(&grid), &grid).is_empty());
    }

    #[test]
    fn purge_drops_exhausted_clues_and_is_idempotent() {
        let mut grid = Grid::new((2, 1), 1);
        grid.set_label((0, 0), 1).unwrap();
        let mut clues = clue_set(&grid);

        assert_eq!(clues.purge(&grid), 0);
        grid.set_marked((1, 0)).unwrap();
        assert_eq!(clues.purge(&grid), 1);
        let after_first = clues.clone();
        assert_eq!(clues.purge(&grid), 0);
        assert_eq!(clues, after_first);
        assert!(clues.is_empty());
    }

    #[test]
    fn purge_around_only_touches_the_neighborhood() {
        let mut grid = Grid::new((4, 1), 1);
        grid.set_label((0, 0), 0).unwrap();
        grid.set_label((3, 0), 1).unwrap();
        let mut clues = clue_set(&grid);
        grid.set_label((1, 0), 1).unwrap();

        assert_eq!(clues.purge_around(&grid, (1, 0)), 1);
        assert!(!clues.contains((0, 0)));
        assert!(clues.contains((3, 0)));
    }

    #[test]
    fn subset_elimination_finds_safe_cell() {
        // row 0: hidden A B C; row 1: revealed clues
        // (0, 1) sees {A, B} = 1, (1, 1) sees {A, B, C} = 1, so C is safe
        let mut grid = Grid::new((3, 2), 1);
        grid.set_label((0, 1), 1).unwrap();
        grid.set_label((1, 1), 1).unwrap();
        grid.set_label((2, 1), 1).unwrap();

        let clues = clue_set(&grid);
        assert!(propagate(&clues, &grid).is_empty());

        let out = eliminate(&clues, &grid);

        assert_eq!(out.safe, BTreeSet::from([(2, 0), (0, 0)]));
        assert!(out.mines.is_empty());
    }

    #[test]
    fn subset_elimination_finds_mines() {
        // mines at A and C: {A, B} = 1 and {B, C} = 1 are both inside {A, B, C} = 2
        let mut grid = Grid::new((3, 2), 2);
        grid.set_label((0, 1), 1).unwrap();
        grid.set_label((1, 1), 2).unwrap();
        grid.set_label((2, 1), 1).unwrap();

        let out = eliminate(&clue_set(&grid), &grid);

        assert_eq!(out.mines, BTreeSet::from([(0, 0), (2, 0)]));
        assert!(out.safe.is_empty());
    }

    #[test]
    fn elimination_does_not_chain_within_a_pass() {
        // {A,B}=1 ⊂ {A,B,C}=2 gives {C}=1 and {C,D}=1 ⊂ {B,C,D}=2 gives {B}=1;
        // A and D only follow once those marks land
        let mut grid = Grid::new((4, 2), 2);
        grid.set_label((0, 1), 1).unwrap();
        grid.set_label((1, 1), 2).unwrap();
        grid.set_label((2, 1), 2).unwrap();
        grid.set_label((3, 1), 1).unwrap();

        let out = eliminate(&clue_set(&grid), &grid);

        assert_eq!(out.mines, BTreeSet::from([(1, 0), (2, 0)]));
        assert!(out.safe.is_empty());
    }

    #[test]
    fn elimination_discards_undetermined_differences() {
        // {A,B}=1 ⊂ {A,B,C,D}=2 leaves {C,D}=1, which decides nothing
        let mut grid = Grid::new((4, 2), 2);
        grid.set_label((0, 1), 1).unwrap();
        grid.set_label((1, 1), 2).unwrap();

        let clues = clue_set(&grid);

        assert_eq!(clues.constraints(&grid).len(), 2);
        assert!(eliminate(&clues, &grid).is_empty());
    }
}
