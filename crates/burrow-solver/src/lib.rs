//! Minimum-energy solver for the amphipod burrow sorting puzzle.
//!
//! Four species of amphipods have to be sorted into their home rooms,
//! moving through a shared hallway. Each species pays a different amount of
//! energy per step. This crate models burrow states as small hashable
//! values, generates legal moves between them, and searches for the
//! cheapest way to sort everyone.

pub mod burrow;
pub mod error;
pub mod moves;
pub mod parse;
pub mod solver;
pub mod species;

// Re-export main types
pub use burrow::{Burrow, Hallway, Room, HALLWAY_LEN, HALLWAY_STOPS, ROOM_COUNT};
pub use error::{Error, ParseError, SolveError};
pub use moves::{deliver_home, evacuate, replay, step_between, successors, Location, Move, Step};
pub use parse::{parse_burrow, room_depth, UNFOLDED_ROWS};
pub use solver::{solve, SolverConfig, SolverResult, Strategy};
pub use species::Species;
