use ndarray::Array2;
use smallvec::SmallVec;

use crate::*;

/// Up to eight neighbor positions, kept inline.
pub type Neighbors = SmallVec<[Coord2; 8]>;

/// The agent's own view of the board.
///
/// Every cell starts [`Cell::Hidden`] and moves at most once, either to
/// [`Cell::Revealed`] or [`Cell::Marked`]. The number of marked cells never
/// exceeds the configured mine total.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    board: Array2<Cell>,
    marked_count: CellCount,
    total_mines: CellCount,
}

impl Grid {
    pub fn new(size: Coord2, total_mines: CellCount) -> Self {
        Self {
            board: Array2::default(size.to_nd_index()),
            marked_count: 0,
            total_mines,
        }
    }

    pub fn size(&self) -> Coord2 {
        let (x, y) = self.board.dim();
        // constructed from a Coord2, so both axes fit
        (x as Coord, y as Coord)
    }

    pub fn contains(&self, coords: Coord2) -> bool {
        in_bounds(coords, self.size())
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if self.contains(coords) {
            Ok(coords)
        } else {
            Err(AgentError::InvalidCoords)
        }
    }

    /// State of `coords`; positions outside the board read as `None`.
    pub fn cell_at(&self, coords: Coord2) -> Option<Cell> {
        self.contains(coords)
            .then(|| self.board[coords.to_nd_index()])
    }

    pub fn is_hidden(&self, coords: Coord2) -> bool {
        matches!(self.cell_at(coords), Some(Cell::Hidden))
    }

    pub fn total_mines(&self) -> CellCount {
        self.total_mines
    }

    pub fn marked_count(&self) -> CellCount {
        self.marked_count
    }

    pub fn mines_left(&self) -> CellCount {
        self.total_mines - self.marked_count
    }

    pub fn set_label(&mut self, coords: Coord2, label: u8) -> Result<()> {
        let coords = self.validate_coords(coords)?;
        if label > MAX_LABEL {
            return Err(AgentError::InvalidLabel);
        }
        self.check_hidden(coords)?;

        self.board[coords.to_nd_index()] = Cell::Revealed(label);
        Ok(())
    }

    pub fn set_marked(&mut self, coords: Coord2) -> Result<()> {
        let coords = self.validate_coords(coords)?;
        self.check_hidden(coords)?;
        if self.marked_count >= self.total_mines {
            return Err(AgentError::MineBudgetExceeded);
        }

        self.board[coords.to_nd_index()] = Cell::Marked;
        self.marked_count += 1;
        Ok(())
    }

    pub fn neighbors_of(&self, coords: Coord2) -> NeighborIter {
        self.board.iter_neighbors(coords)
    }

    pub fn hidden_neighbors(&self, coords: Coord2) -> Neighbors {
        self.neighbors_matching(coords, Cell::is_hidden)
    }

    pub fn marked_neighbors(&self, coords: Coord2) -> Neighbors {
        self.neighbors_matching(coords, Cell::is_marked)
    }

    pub fn settled_neighbors(&self, coords: Coord2) -> Neighbors {
        self.neighbors_matching(coords, Cell::is_settled)
    }

    pub fn hidden_neighbor_count(&self, coords: Coord2) -> usize {
        self.board
            .iter_neighbor_cells(coords)
            .filter(|cell| cell.is_hidden())
            .count()
    }

    /// Label minus marked neighbors, or `None` if `coords` is not revealed.
    ///
    /// Negative only when the harness contradicts earlier marks.
    pub fn effective_count(&self, coords: Coord2) -> Option<i16> {
        let label = self.cell_at(coords)?.label()?;
        let marked = self
            .board
            .iter_neighbor_cells(coords)
            .filter(|cell| cell.is_marked())
            .count();
        Some(i16::from(label) - marked as i16)
    }

    /// Hidden cells in x-major order.
    pub fn hidden_cells(&self) -> impl Iterator<Item = Coord2> + '_ {
        let (x_end, y_end) = self.size();
        (0..x_end)
            .flat_map(move |x| (0..y_end).map(move |y| (x, y)))
            .filter(move |&coords| self.board[coords.to_nd_index()].is_hidden())
    }

    pub fn first_hidden(&self) -> Option<Coord2> {
        self.hidden_cells().next()
    }

    fn neighbors_matching(&self, coords: Coord2, pred: impl Fn(Cell) -> bool) -> Neighbors {
        self.board
            .iter_neighbor_cells_with_index(coords)
            .filter(|&(_, cell)| pred(cell))
            .map(|(pos, _)| pos)
            .collect()
    }

    fn check_hidden(&self, coords: Coord2) -> Result<()> {
        if self.board[coords.to_nd_index()].is_hidden() {
            Ok(())
        } else {
            Err(AgentError::CellNotHidden)
        }
    }
}
