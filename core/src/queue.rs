use alloc::collections::VecDeque;

use hashbrown::HashSet;

use crate::*;

/// FIFO of positions waiting to be acted on, without duplicates.
#[derive(Clone, Debug, Default)]
pub struct PendingQueue {
    order: VecDeque<Coord2>,
    members: HashSet<Coord2>,
}

impl PendingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if `coords` is already queued.
    pub fn push(&mut self, coords: Coord2) -> bool {
        if !self.members.insert(coords) {
            return false;
        }
        self.order.push_back(coords);
        true
    }

    pub fn pop(&mut self) -> Option<Coord2> {
        let coords = self.order.pop_front()?;
        self.members.remove(&coords);
        Some(coords)
    }

    pub fn contains(&self, coords: Coord2) -> bool {
        self.members.contains(&coords)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.order.iter().copied()
    }
}
