use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum AgentError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Board must have at least two cells")]
    InvalidBoardShape,
    #[error("Too many mines")]
    TooManyMines,
    #[error("Revealed label exceeds the number of neighbors")]
    InvalidLabel,
    #[error("Cell is already revealed or marked")]
    CellNotHidden,
    #[error("Marking would exceed the total mine count")]
    MineBudgetExceeded,
    #[error("Outcome does not match the previous action")]
    UnexpectedOutcome,
    #[error("Configuration could not be parsed")]
    InvalidConfig,
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
}

pub type Result<T> = core::result::Result<T, AgentError>;
