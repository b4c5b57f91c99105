//! Burrow state: a hallway plus four side rooms of depth `N`.
//!
//! States are small `Copy` values with structural equality and hashing, so
//! the search can key its bookkeeping maps directly on them. Nothing here is
//! mutated in place: every change produces a new value.

use std::fmt;

use crate::species::Species;

/// Number of hallway cells
pub const HALLWAY_LEN: usize = 11;

/// Hallway cells an amphipod is allowed to stop on (the others sit above a room)
pub const HALLWAY_STOPS: [usize; 7] = [0, 1, 3, 5, 7, 9, 10];

/// Number of side rooms, one per species
pub const ROOM_COUNT: usize = 4;

/// Check whether a hallway cell is a legal stopping place
pub fn is_stop(position: usize) -> bool {
    HALLWAY_STOPS.contains(&position)
}

/// Hallway column right above a room's entrance
pub fn room_column(room: usize) -> usize {
    2 + 2 * room
}

/// A side room of depth `N`.
///
/// Slot `0` is the back of the room, slot `N - 1` is next to the hallway.
/// Rooms fill from the back: an occupied slot is never in front of an
/// empty one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Room<const N: usize> {
    slots: [Species; N],
}

impl<const N: usize> Room<N> {
    pub fn new(slots: [Species; N]) -> Self {
        Self { slots }
    }

    pub fn empty() -> Self {
        Self {
            slots: [Species::Empty; N],
        }
    }

    /// A room completely filled with one species
    pub fn full_of(species: Species) -> Self {
        Self {
            slots: [species; N],
        }
    }

    pub fn slots(&self) -> &[Species; N] {
        &self.slots
    }

    pub fn get(&self, slot: usize) -> Species {
        self.slots[slot]
    }

    /// Steps between a slot and the hallway cell above the room
    pub fn steps_to_hallway(slot: usize) -> u64 {
        (N - slot) as u64
    }

    /// Whether no amphipod sits in front of an empty slot
    pub fn is_well_formed(&self) -> bool {
        let occupied = self.slots.iter().take_while(|s| !s.is_empty()).count();
        self.slots[occupied..].iter().all(|s| s.is_empty())
    }

    /// Number of occupied slots, counted from the back.
    ///
    /// # Panics
    ///
    /// Panics if an amphipod sits in front of an empty slot. Legal moves
    /// can never build such a room.
    pub fn occupied(&self) -> usize {
        if !self.is_well_formed() {
            panic!("invalid room {}: amphipod in front of an empty slot", self);
        }
        self.slots.iter().take_while(|s| !s.is_empty()).count()
    }

    /// Length of the run of `home` amphipods starting at the back
    pub fn settled(&self, home: Species) -> usize {
        self.slots.iter().take_while(|&&s| s == home).count()
    }

    pub fn is_full_of(&self, home: Species) -> bool {
        self.slots.iter().all(|&s| s == home)
    }

    /// Slot of the amphipod that has to leave next, if any.
    ///
    /// The run of `home` amphipods at the back stays put. If anything else
    /// sits above that run, the front-most occupant must move out first.
    /// Returns `None` when the room holds only `home` amphipods (or nobody).
    ///
    /// # Panics
    ///
    /// Panics on a room that is not well formed, see [`Room::occupied`].
    pub fn first_removable_slot(&self, home: Species) -> Option<usize> {
        let occupied = self.occupied();
        if self.settled(home) == occupied {
            None
        } else {
            Some(occupied - 1)
        }
    }

    /// Slot a `home` amphipod would settle into, if the room accepts it
    pub fn entry_slot(&self, home: Species) -> Option<usize> {
        let occupied = self.occupied();
        (occupied < N && self.settled(home) == occupied).then_some(occupied)
    }

    pub fn count(&self, species: Species) -> usize {
        self.slots.iter().filter(|&&s| s == species).count()
    }

    pub(crate) fn with_slot(mut self, slot: usize, species: Species) -> Self {
        self.slots[slot] = species;
        self
    }
}

impl<const N: usize> fmt::Display for Room<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for species in &self.slots {
            write!(f, "{}", species)?;
        }
        write!(f, "]")
    }
}

/// The hallway running above all rooms
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Hallway {
    cells: [Species; HALLWAY_LEN],
}

impl Hallway {
    pub fn new(cells: [Species; HALLWAY_LEN]) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &[Species; HALLWAY_LEN] {
        &self.cells
    }

    pub fn get(&self, position: usize) -> Species {
        self.cells[position]
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|c| c.is_empty())
    }

    /// Number of steps from `from` to `to`, or `None` if some cell on the way
    /// is taken. The starting cell itself is not checked, so an amphipod can
    /// ask for a path out of the cell it stands on.
    pub fn path_length(&self, from: usize, to: usize) -> Option<usize> {
        let clear = if from < to {
            self.cells[from + 1..=to].iter().all(|c| c.is_empty())
        } else if from > to {
            self.cells[to..from].iter().all(|c| c.is_empty())
        } else {
            true
        };
        clear.then(|| from.abs_diff(to))
    }

    pub fn count(&self, species: Species) -> usize {
        self.cells.iter().filter(|&&c| c == species).count()
    }

    pub(crate) fn with_cell(mut self, position: usize, species: Species) -> Self {
        self.cells[position] = species;
        self
    }
}

/// A complete burrow configuration with rooms of depth `N`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Burrow<const N: usize> {
    hallway: Hallway,
    rooms: [Room<N>; ROOM_COUNT],
}

impl<const N: usize> Burrow<N> {
    pub fn new(hallway: Hallway, rooms: [Room<N>; ROOM_COUNT]) -> Self {
        Self { hallway, rooms }
    }

    /// The fully sorted burrow
    pub fn sorted() -> Self {
        Self {
            hallway: Hallway::default(),
            rooms: Species::AGENTS.map(Room::full_of),
        }
    }

    pub fn hallway(&self) -> &Hallway {
        &self.hallway
    }

    pub fn room(&self, room: usize) -> &Room<N> {
        &self.rooms[room]
    }

    pub fn rooms(&self) -> &[Room<N>; ROOM_COUNT] {
        &self.rooms
    }

    /// True when every room is filled with its own species.
    ///
    /// The hallway is not inspected: with `N` amphipods of each species,
    /// four full rooms already account for all of them.
    pub fn is_terminal(&self) -> bool {
        self.rooms
            .iter()
            .zip(Species::AGENTS)
            .all(|(room, home)| room.is_full_of(home))
    }

    /// Number of amphipods of one species anywhere in the burrow
    pub fn count(&self, species: Species) -> usize {
        self.hallway.count(species) + self.rooms.iter().map(|r| r.count(species)).sum::<usize>()
    }

    /// Every species appears exactly `N` times
    pub fn is_conserved(&self) -> bool {
        Species::AGENTS.iter().all(|&s| self.count(s) == N)
    }

    /// Every room is well formed and the hallway only holds amphipods on stops
    pub fn is_consistent(&self) -> bool {
        self.rooms.iter().all(Room::is_well_formed)
            && (0..HALLWAY_LEN).all(|p| is_stop(p) || self.hallway.get(p).is_empty())
    }

    pub(crate) fn with_hallway(mut self, hallway: Hallway) -> Self {
        self.hallway = hallway;
        self
    }

    pub(crate) fn with_room(mut self, index: usize, room: Room<N>) -> Self {
        self.rooms[index] = room;
        self
    }
}

impl<const N: usize> fmt::Display for Burrow<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "#############")?;
        write!(f, "#")?;
        for cell in self.hallway.cells() {
            write!(f, "{}", cell)?;
        }
        writeln!(f, "#")?;

        // Front row first, back row last
        for (row, slot) in (0..N).rev().enumerate() {
            let (left, right) = if row == 0 { ("###", "###") } else { ("  #", "#") };
            write!(f, "{}", left)?;
            for (i, room) in self.rooms.iter().enumerate() {
                if i > 0 {
                    write!(f, "#")?;
                }
                write!(f, "{}", room.get(slot))?;
            }
            writeln!(f, "{}", right)?;
        }
        write!(f, "  #########")
    }
}
