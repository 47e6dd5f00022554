use serde::{Deserialize, Serialize};

/// Player-visible state of one board position as tracked by the agent.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    Hidden,
    Marked,
    Revealed(u8),
}

impl Cell {
    pub const fn is_hidden(self) -> bool {
        matches!(self, Self::Hidden)
    }

    pub const fn is_marked(self) -> bool {
        matches!(self, Self::Marked)
    }

    /// Revealed or marked; a settled cell never changes again.
    pub const fn is_settled(self) -> bool {
        !self.is_hidden()
    }

    pub const fn label(self) -> Option<u8> {
        match self {
            Self::Revealed(label) => Some(label),
            _ => None,
        }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::Hidden
    }
}
