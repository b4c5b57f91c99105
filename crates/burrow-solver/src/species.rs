//! Amphipod species and their movement costs.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Content of a single burrow cell: either nobody, or one of the four species.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Species {
    #[default]
    Empty,
    Amber,
    Bronze,
    Copper,
    Desert,
}

impl Species {
    /// The four species that actually move, in home-room order
    pub const AGENTS: [Species; 4] = [
        Species::Amber,
        Species::Bronze,
        Species::Copper,
        Species::Desert,
    ];

    pub fn is_empty(self) -> bool {
        self == Species::Empty
    }

    /// Energy spent for a single step of this species
    pub fn energy(self) -> u64 {
        match self {
            Species::Empty => 0,
            Species::Amber => 1,
            Species::Bronze => 10,
            Species::Copper => 100,
            Species::Desert => 1000,
        }
    }

    /// Index of the home room (0-3), `None` for an empty cell
    pub fn room_index(self) -> Option<usize> {
        match self {
            Species::Empty => None,
            Species::Amber => Some(0),
            Species::Bronze => Some(1),
            Species::Copper => Some(2),
            Species::Desert => Some(3),
        }
    }

    /// Hallway column sitting directly above the home room
    pub fn home_column(self) -> Option<usize> {
        self.room_index().map(|room| 2 + 2 * room)
    }

    /// Species whose home is the given room
    pub fn for_room(room: usize) -> Species {
        Species::AGENTS[room]
    }

    pub fn from_char(c: char) -> Option<Species> {
        match c {
            '.' => Some(Species::Empty),
            'A' => Some(Species::Amber),
            'B' => Some(Species::Bronze),
            'C' => Some(Species::Copper),
            'D' => Some(Species::Desert),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Species::Empty => '.',
            Species::Amber => 'A',
            Species::Bronze => 'B',
            Species::Copper => 'C',
            Species::Desert => 'D',
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}
