//! Move generation.
//!
//! A move takes one amphipod all the way from a room to a hallway stop, or
//! from a hallway stop into its home room. An amphipod never pauses halfway,
//! so both hops are produced as a single weighted transition.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::burrow::{room_column, Burrow, Room, HALLWAY_STOPS, ROOM_COUNT};
use crate::species::Species;

/// Upper bound on the number of moves out of a single state
pub const MAX_MOVES: usize = HALLWAY_STOPS.len() * ROOM_COUNT;

/// Where an amphipod stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum Location {
    Hallway { position: usize },
    Room { room: usize, slot: usize },
}

/// Description of a single move, independent of the full burrow state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub species: Species,
    pub from: Location,
    pub to: Location,
    pub energy: u64,
}

/// A move: the resulting burrow and what happened to get there
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move<const N: usize> {
    pub burrow: Burrow<N>,
    pub step: Step,
}

impl<const N: usize> Move<N> {
    pub fn energy(&self) -> u64 {
        self.step.energy
    }
}

pub type Moves<const N: usize> = SmallVec<[Move<N>; MAX_MOVES]>;

/// Enumerate every legal move out of `burrow`.
///
/// Each hallway stop is looked at once: an empty stop can receive an
/// amphipod leaving any of the four rooms, an occupied stop can only send
/// its occupant home.
pub fn successors<const N: usize>(burrow: &Burrow<N>) -> Moves<N> {
    let mut moves = Moves::<N>::new();

    for &stop in &HALLWAY_STOPS {
        if burrow.hallway().get(stop).is_empty() {
            moves.extend((0..ROOM_COUNT).filter_map(|room| evacuate(burrow, room, stop)));
        } else {
            moves.extend(deliver_home(burrow, stop));
        }
    }

    debug_assert!(
        moves.iter().all(|m| m.burrow.is_conserved()),
        "move generation lost or duplicated an amphipod from\n{}",
        burrow
    );
    moves
}

/// Move the amphipod that must leave `room` next onto the hallway `stop`.
///
/// Returns `None` if nobody has to leave the room or the hallway between
/// the room entrance and the stop is blocked.
pub fn evacuate<const N: usize>(burrow: &Burrow<N>, room: usize, stop: usize) -> Option<Move<N>> {
    let home = Species::for_room(room);
    let slot = burrow.room(room).first_removable_slot(home)?;
    let walk = burrow.hallway().path_length(room_column(room), stop)?;

    let species = burrow.room(room).get(slot);
    let steps = Room::<N>::steps_to_hallway(slot) + walk as u64;

    let next = burrow
        .with_room(room, burrow.room(room).with_slot(slot, Species::Empty))
        .with_hallway(burrow.hallway().with_cell(stop, species));

    Some(Move {
        burrow: next,
        step: Step {
            species,
            from: Location::Room { room, slot },
            to: Location::Hallway { position: stop },
            energy: steps * species.energy(),
        },
    })
}

/// Send the amphipod on hallway `stop` into its home room.
///
/// Only allowed when the home room holds nothing but its own species and
/// the hallway up to the room entrance is free. The amphipod settles in the
/// deepest free slot.
pub fn deliver_home<const N: usize>(burrow: &Burrow<N>, stop: usize) -> Option<Move<N>> {
    let species = burrow.hallway().get(stop);
    let room = species.room_index()?;
    let slot = burrow.room(room).entry_slot(species)?;
    let walk = burrow.hallway().path_length(stop, room_column(room))?;

    let steps = walk as u64 + Room::<N>::steps_to_hallway(slot);

    let next = burrow
        .with_hallway(burrow.hallway().with_cell(stop, Species::Empty))
        .with_room(room, burrow.room(room).with_slot(slot, species));

    Some(Move {
        burrow: next,
        step: Step {
            species,
            from: Location::Hallway { position: stop },
            to: Location::Room { room, slot },
            energy: steps * species.energy(),
        },
    })
}

/// Apply a previously recorded step, if it is legal from `burrow`
pub fn replay<const N: usize>(burrow: &Burrow<N>, step: &Step) -> Option<Burrow<N>> {
    successors(burrow)
        .into_iter()
        .find(|m| m.step == *step)
        .map(|m| m.burrow)
}

/// The cheapest single step leading from `from` to `to`, if there is one
pub fn step_between<const N: usize>(from: &Burrow<N>, to: &Burrow<N>) -> Option<Step> {
    successors(from)
        .into_iter()
        .filter(|m| m.burrow == *to)
        .min_by_key(Move::energy)
        .map(|m| m.step)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::burrow::Hallway;
    use crate::parse::parse_burrow;
    use rustc_hash::FxHashSet;
    use std::collections::VecDeque;
    use Species::{Amber as A, Bronze as B, Copper as C, Desert as D, Empty as E};

    const EXAMPLE: &str = "\
#############
#...........#
###B#C#B#D###
  #A#D#C#A#
  #########
";

    fn example() -> Burrow<2> {
        parse_burrow(EXAMPLE).unwrap()
    }

    #[test]
    fn test_initial_moves() {
        let moves = successors(&example());
        // Every room has someone to evacuate and every stop is reachable
        assert_eq!(moves.len(), MAX_MOVES);
        assert!(moves.iter().all(|m| matches!(m.step.to, Location::Hallway { .. })));
    }

    #[test]
    fn test_evacuate_cost() {
        let burrow = example();

        // Bronze leaving the copper room to stop 3: 1 step up, 3 steps left
        let m = evacuate(&burrow, 2, 3).unwrap();
        assert_eq!(m.step.species, B);
        assert_eq!(m.energy(), 40);
        assert_eq!(m.step.from, Location::Room { room: 2, slot: 1 });
        assert_eq!(m.burrow.hallway().get(3), B);
        assert_eq!(m.burrow.room(2).slots(), &[C, E]);

        // Desert leaving its own room because an amber is trapped below
        let m = evacuate(&burrow, 3, 10).unwrap();
        assert_eq!(m.step.species, D);
        assert_eq!(m.energy(), 3000);
    }

    #[test]
    fn test_evacuate_blocked() {
        let burrow = example()
            .with_room(2, Room::new([C, E]))
            .with_hallway(Hallway::default().with_cell(3, B));

        assert!(evacuate(&burrow, 0, 5).is_none());
        assert!(evacuate(&burrow, 1, 1).is_none());
        assert!(evacuate(&burrow, 0, 1).is_some());
        assert!(evacuate(&burrow, 1, 5).is_some());
        // Copper room only holds a copper now
        assert!(evacuate(&burrow, 2, 7).is_none());
    }

    #[test]
    fn test_deliver_home() {
        let burrow = Burrow::<2>::sorted()
            .with_room(1, Room::new([B, E]))
            .with_hallway(Hallway::default().with_cell(7, B));

        let m = deliver_home(&burrow, 7).unwrap();
        // 3 steps to the entrance, 1 step down
        assert_eq!(m.energy(), 40);
        assert_eq!(m.step.to, Location::Room { room: 1, slot: 1 });
        assert!(m.burrow.is_terminal());
    }

    #[test]
    fn test_deliver_home_deepest_slot() {
        let burrow = Burrow::<4>::sorted()
            .with_room(3, Room::new([D, E, E, E]))
            .with_hallway(
                Hallway::default()
                    .with_cell(9, D)
                    .with_cell(10, D)
                    .with_cell(0, D),
            );

        let m = deliver_home(&burrow, 9).unwrap();
        assert_eq!(m.step.to, Location::Room { room: 3, slot: 1 });
        // 1 step to the entrance, 3 steps down
        assert_eq!(m.energy(), 4000);

        // Stop 10 is stuck behind stop 9
        assert!(deliver_home(&burrow, 10).is_none());
    }

    #[test]
    fn test_deliver_home_refused() {
        // Foreign amphipod still in the home room
        let burrow = Burrow::<2>::sorted()
            .with_room(0, Room::new([D, E]))
            .with_room(3, Room::new([D, E]))
            .with_hallway(Hallway::default().with_cell(0, A).with_cell(10, A));
        assert!(deliver_home(&burrow, 0).is_none());
        assert!(deliver_home(&burrow, 10).is_none());

        // Path blocked by another hallway amphipod
        let burrow = Burrow::<2>::sorted()
            .with_room(0, Room::new([A, E]))
            .with_room(3, Room::new([D, E]))
            .with_hallway(Hallway::default().with_cell(3, D).with_cell(5, A));
        assert!(deliver_home(&burrow, 3).is_none());
        assert!(deliver_home(&burrow, 5).is_none());
        assert!(successors(&burrow).is_empty());
    }

    #[test]
    fn test_replay() {
        let burrow = example();
        let m = evacuate(&burrow, 1, 5).unwrap();
        assert_eq!(replay(&burrow, &m.step), Some(m.burrow));

        let bogus = Step {
            energy: m.step.energy + 1,
            ..m.step
        };
        assert_eq!(replay(&burrow, &bogus), None);
    }

    #[test]
    fn test_step_between() {
        let burrow = example();
        let m = evacuate(&burrow, 3, 10).unwrap();
        assert_eq!(step_between(&burrow, &m.burrow), Some(m.step));
        assert_eq!(step_between(&m.burrow, &burrow), None);
        assert_eq!(step_between(&burrow, &burrow), None);
    }

    /// Breadth-first walk from `start` over at most `limit` states,
    /// checking every generated move on the way.
    fn sweep<const N: usize>(start: Burrow<N>, limit: usize) -> FxHashSet<Burrow<N>> {
        let mut seen = FxHashSet::default();
        let mut queue = VecDeque::new();
        seen.insert(start);
        queue.push_back(start);

        while let Some(burrow) = queue.pop_front() {
            for m in successors(&burrow) {
                assert!(m.burrow.is_conserved(), "not conserved:\n{}", m.burrow);
                assert!(m.burrow.is_consistent(), "inconsistent:\n{}", m.burrow);
                assert!(m.energy() > 0);
                if m.burrow.is_terminal() {
                    assert!(m.burrow.hallway().is_empty());
                }
                if seen.len() < limit && seen.insert(m.burrow) {
                    queue.push_back(m.burrow);
                }
            }
        }

        seen
    }

    #[test]
    fn test_reachable_states_stay_valid() {
        let seen = sweep(example(), usize::MAX);
        assert!(seen.contains(&Burrow::sorted()));
    }

    #[test]
    fn test_reachable_states_stay_valid_depth_four() {
        let start: Burrow<4> = parse_burrow(EXAMPLE).unwrap();
        let seen = sweep(start, 50_000);
        // Went past the first layer of moves
        assert!(seen.len() > MAX_MOVES + 1);
    }
}
