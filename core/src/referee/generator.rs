use ndarray::Array2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::*;

pub trait LayoutGenerator {
    fn generate(self, size: Coord2, mines: CellCount) -> MineLayout;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StartTile {
    Random,
    SimpleSafe,
    AlwaysZero,
}

/// Generation strategy that can optionally try to make the starting tile zero or at least safe, but other than that is
/// purely random.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomLayoutGenerator {
    seed: u64,
    start: Coord2,
    start_tile: StartTile,
}

impl RandomLayoutGenerator {
    pub fn new(seed: u64, start: Coord2, start_tile: StartTile) -> Self {
        Self {
            seed,
            start,
            start_tile,
        }
    }
}

impl LayoutGenerator for RandomLayoutGenerator {
    fn generate(self, size: Coord2, mines: CellCount) -> MineLayout {
        use StartTile::*;

        let total_cells = mult(size.0, size.1);

        // optimize for full boards
        if mines >= total_cells {
            if mines > total_cells {
                log::warn!(
                    "Layout already full, generated anyway, requested {} but only fits {}",
                    mines,
                    total_cells
                );
            }
            return MineLayout::from_mine_mask(Array2::from_elem(size.to_nd_index(), true));
        }

        let mut mask: Array2<bool> = Array2::default(size.to_nd_index());
        let zero_area = 1 + mask.iter_neighbors(self.start).count() as CellCount;
        let actual_start_tile = match self.start_tile {
            Random => Random,
            SimpleSafe | AlwaysZero if !in_bounds(self.start, size) => {
                log::warn!("Start tile outside of the board, fallback to random");
                Random
            }
            SimpleSafe => SimpleSafe,
            AlwaysZero if mines + zero_area > total_cells => {
                log::warn!("Cannot make start tile zero, fallback to simple safe");
                SimpleSafe
            }
            AlwaysZero => AlwaysZero,
        };

        // reserve cells by pretending they already hold a mine
        let reserved: CellCount = match actual_start_tile {
            Random => 0,
            SimpleSafe => 1,
            AlwaysZero => zero_area,
        };
        if reserved > 0 {
            mask[self.start.to_nd_index()] = true;
        }
        if actual_start_tile == AlwaysZero {
            for coords in mask.iter_neighbors(self.start) {
                mask[coords.to_nd_index()] = true;
            }
        }

        let mut free_cells = total_cells - reserved;
        let mut mines_placed = 0;
        let mut rng = SmallRng::seed_from_u64(self.seed);
        while mines_placed < mines && free_cells > 0 {
            let mut place = rng.random_range(0..free_cells);
            for (i, cell) in mask.iter_mut().enumerate() {
                let i = i as CellCount;
                if *cell {
                    place += 1;
                }
                if i == place {
                    *cell = true;
                    mines_placed += 1;
                    free_cells -= 1;
                    break;
                }
            }
        }

        // undo to make safe tiles
        if reserved > 0 {
            mask[self.start.to_nd_index()] = false;
        }
        if actual_start_tile == AlwaysZero {
            for coords in mask.iter_neighbors(self.start) {
                mask[coords.to_nd_index()] = false;
            }
        }

        let layout = MineLayout::from_mine_mask(mask);
        if layout.mine_count() != mines {
            log::warn!(
                "Generated layout count mismatch, actual: {}, requested: {}",
                layout.mine_count(),
                mines
            );
        }
        layout
    }
}
