use crate::species::Species;

/// Errors produced while reading a burrow diagram
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("burrow diagram is missing line {line}")]
    MissingLine { line: usize },

    #[error("line {line} is too short, expected a cell at column {column}")]
    ShortLine { line: usize, column: usize },

    #[error("unexpected {found:?} at line {line}, column {column}")]
    BadCell {
        line: usize,
        column: usize,
        found: char,
    },

    #[error("diagram has {found} room rows, cannot build rooms of depth {depth}")]
    DepthMismatch { found: usize, depth: usize },

    #[error("{species:?} amphipod blocks the entrance at hallway cell {position}")]
    BlockedEntrance { species: Species, position: usize },

    #[error("room {room} has an amphipod in front of an empty slot")]
    FloatingAmphipod { room: usize },

    #[error("found {found} {species:?} amphipods, expected {expected}")]
    SpeciesCount {
        species: Species,
        found: usize,
        expected: usize,
    },
}

/// Errors produced by the search
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SolveError {
    #[error("starting burrow is not a valid configuration:\n{0}")]
    InvalidStart(String),

    #[error("search exhausted {states_expanded} states without sorting the burrow")]
    NoSolution { states_expanded: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Solve(#[from] SolveError),
}
