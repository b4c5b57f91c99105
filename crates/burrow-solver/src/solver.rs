//! Minimum-energy search over the implicit graph of burrow states.
//!
//! States are generated on demand by [`successors`] and every piece of
//! bookkeeping is keyed on the state value itself. Two strategies are
//! available:
//!
//! - [`Strategy::Dijkstra`] hands the graph to `pathfinding`'s Dijkstra,
//!   which settles states in order of accumulated energy.
//! - [`Strategy::Relaxation`] explores in FIFO order, re-queueing a state
//!   whenever a cheaper way to reach it shows up, and prunes anything that
//!   already costs as much as the best complete solution found so far.

use std::collections::VecDeque;
use std::time::Instant;

use pathfinding::prelude::dijkstra;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::burrow::Burrow;
use crate::error::SolveError;
use crate::moves::{step_between, successors, Move, Step, MAX_MOVES};

/// Order in which the search expands states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Priority queue keyed by accumulated energy
    #[default]
    Dijkstra,
    /// FIFO queue with cost relaxation and a cutoff at the best known answer
    Relaxation,
}

/// Configuration for the solver
#[derive(Debug, Clone, Default)]
pub struct SolverConfig {
    pub strategy: Strategy,
    /// Keep predecessors so the winning sequence of steps can be returned
    pub record_path: bool,
}

/// Result of a successful search
#[derive(Debug, Clone)]
pub struct SolverResult {
    /// Minimum total energy needed to sort the burrow
    pub min_energy: u64,
    /// Number of states whose successors were generated
    pub states_expanded: usize,
    /// Number of distinct states reached
    pub states_recorded: usize,
    /// Time elapsed in milliseconds
    pub time_elapsed_ms: u64,
    /// Steps of a cheapest plan, when `record_path` was set
    pub steps: Option<Vec<Step>>,
}

/// What a strategy found, before timing is attached
struct Outcome {
    min_energy: Option<u64>,
    states_expanded: usize,
    states_recorded: usize,
    steps: Option<Vec<Step>>,
}

impl Outcome {
    fn finish(self, start_time: Instant) -> Result<SolverResult, SolveError> {
        let min_energy = self.min_energy.ok_or(SolveError::NoSolution {
            states_expanded: self.states_expanded,
        })?;

        Ok(SolverResult {
            min_energy,
            states_expanded: self.states_expanded,
            states_recorded: self.states_recorded,
            time_elapsed_ms: start_time.elapsed().as_millis() as u64,
            steps: self.steps,
        })
    }
}

/// Find the minimum energy needed to sort `start`.
///
/// Returns [`SolveError::InvalidStart`] for a burrow that legal play could
/// never produce, and [`SolveError::NoSolution`] if every reachable state
/// was explored without sorting the burrow.
pub fn solve<const N: usize>(
    start: &Burrow<N>,
    config: &SolverConfig,
) -> Result<SolverResult, SolveError> {
    if !start.is_consistent() || !start.is_conserved() {
        return Err(SolveError::InvalidStart(start.to_string()));
    }

    let start_time = Instant::now();
    let outcome = match config.strategy {
        Strategy::Dijkstra => run_dijkstra(start, config.record_path),
        Strategy::Relaxation => run_relaxation(start, config.record_path),
    };

    outcome.finish(start_time)
}

fn run_dijkstra<const N: usize>(start: &Burrow<N>, record_path: bool) -> Outcome {
    let mut states_expanded = 0;
    let mut reached = FxHashSet::default();
    reached.insert(*start);

    let found = dijkstra(
        start,
        |burrow: &Burrow<N>| {
            states_expanded += 1;
            let mut next: SmallVec<[(Burrow<N>, u64); MAX_MOVES]> = SmallVec::new();
            for mv in successors(burrow) {
                reached.insert(mv.burrow);
                next.push((mv.burrow, mv.energy()));
            }
            next
        },
        Burrow::<N>::is_terminal,
    );

    let (min_energy, steps) = match found {
        Some((path, energy)) => {
            let steps = if record_path {
                path.windows(2)
                    .map(|pair| step_between(&pair[0], &pair[1]))
                    .collect::<Option<Vec<Step>>>()
            } else {
                None
            };
            (Some(energy), steps)
        }
        None => (None, None),
    };

    Outcome {
        min_energy,
        states_expanded,
        states_recorded: reached.len(),
        steps,
    }
}

/// Bookkeeping for the relaxation search
struct Relaxation<const N: usize> {
    best_energy: FxHashMap<Burrow<N>, u64>,
    came_from: Option<FxHashMap<Burrow<N>, (Burrow<N>, Step)>>,
    /// Cheapest sorted burrow seen so far
    best_answer: Option<(u64, Burrow<N>)>,
    states_expanded: usize,
}

impl<const N: usize> Relaxation<N> {
    fn new(start: Burrow<N>, record_path: bool) -> Self {
        let mut best_energy = FxHashMap::default();
        best_energy.insert(start, 0);
        Self {
            best_energy,
            came_from: record_path.then(FxHashMap::default),
            best_answer: None,
            states_expanded: 0,
        }
    }

    /// A queue entry that was superseded by a cheaper path
    fn is_stale(&self, burrow: &Burrow<N>, energy: u64) -> bool {
        self.best_energy
            .get(burrow)
            .is_some_and(|&best| energy > best)
    }

    /// Nothing at this energy can beat the best answer
    fn is_cut_off(&self, energy: u64) -> bool {
        self.best_answer.is_some_and(|(best, _)| energy >= best)
    }

    /// Record `mv` if it reaches its burrow more cheaply than before
    fn relax(&mut self, parent: &Burrow<N>, mv: &Move<N>, energy: u64) -> bool {
        if let Some(&best) = self.best_energy.get(&mv.burrow) {
            if best <= energy {
                return false;
            }
        }
        self.best_energy.insert(mv.burrow, energy);
        if let Some(came_from) = self.came_from.as_mut() {
            came_from.insert(mv.burrow, (*parent, mv.step));
        }
        true
    }

    /// Walk predecessors back from `target` to the start
    fn steps_to(&self, target: &Burrow<N>) -> Option<Vec<Step>> {
        let came_from = self.came_from.as_ref()?;
        let mut steps = Vec::new();
        let mut current = target;
        while let Some((parent, step)) = came_from.get(current) {
            steps.push(*step);
            current = parent;
        }
        steps.reverse();
        Some(steps)
    }

    fn into_outcome(self) -> Outcome {
        let steps = self
            .best_answer
            .and_then(|(_, target)| self.steps_to(&target));
        Outcome {
            min_energy: self.best_answer.map(|(energy, _)| energy),
            states_expanded: self.states_expanded,
            states_recorded: self.best_energy.len(),
            steps,
        }
    }
}

fn run_relaxation<const N: usize>(start: &Burrow<N>, record_path: bool) -> Outcome {
    let mut search = Relaxation::new(*start, record_path);
    if start.is_terminal() {
        search.best_answer = Some((0, *start));
        return search.into_outcome();
    }

    let mut queue = VecDeque::new();
    queue.push_back((*start, 0));

    while let Some((burrow, energy)) = queue.pop_front() {
        if search.is_stale(&burrow, energy) || search.is_cut_off(energy) {
            continue;
        }

        search.states_expanded += 1;
        for mv in successors(&burrow) {
            let total = energy + mv.energy();
            if search.is_cut_off(total) {
                continue;
            }

            if !search.relax(&burrow, &mv, total) {
                continue;
            }

            // Sorted burrows have nowhere useful to go
            if mv.burrow.is_terminal() {
                search.best_answer = Some((total, mv.burrow));
            } else {
                queue.push_back((mv.burrow, total));
            }
        }
    }

    search.into_outcome()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::burrow::{Hallway, Room};
    use crate::moves::replay;
    use crate::parse::parse_burrow;
    use crate::species::Species::{
        self, Amber as A, Bronze as B, Copper as C, Desert as D, Empty as E,
    };

    const EXAMPLE: &str = "\
#############
#...........#
###B#C#B#D###
  #A#D#C#A#
  #########
";

    const STRATEGIES: [Strategy; 2] = [Strategy::Dijkstra, Strategy::Relaxation];

    fn config(strategy: Strategy) -> SolverConfig {
        SolverConfig {
            strategy,
            record_path: false,
        }
    }

    fn min_energy<const N: usize>(burrow: &Burrow<N>, strategy: Strategy) -> u64 {
        solve(burrow, &config(strategy)).unwrap().min_energy
    }

    #[test]
    fn test_example_depth_two() {
        let start: Burrow<2> = parse_burrow(EXAMPLE).unwrap();
        for strategy in STRATEGIES {
            assert_eq!(min_energy(&start, strategy), 12521, "{:?}", strategy);
        }
    }

    #[test]
    fn test_example_depth_four() {
        let start: Burrow<4> = parse_burrow(EXAMPLE).unwrap();
        for strategy in STRATEGIES {
            assert_eq!(min_energy(&start, strategy), 44169, "{:?}", strategy);
        }
    }

    #[test]
    fn test_already_sorted() {
        for strategy in STRATEGIES {
            assert_eq!(min_energy(&Burrow::<2>::sorted(), strategy), 0);
            assert_eq!(min_energy(&Burrow::<4>::sorted(), strategy), 0);
        }
    }

    #[test]
    fn test_single_move_left() {
        let start = Burrow::<2>::sorted()
            .with_room(2, Room::new([C, E]))
            .with_hallway(Hallway::default().with_cell(0, C));
        for strategy in STRATEGIES {
            // 6 steps along the hallway, 1 step down
            assert_eq!(min_energy(&start, strategy), 700);
        }
    }

    /// Swap the front amphipods of two neighbouring rooms
    fn swapped_neighbours(left: usize) -> Burrow<2> {
        let (a, b) = (Species::for_room(left), Species::for_room(left + 1));
        Burrow::<2>::sorted()
            .with_room(left, Room::new([a, b]))
            .with_room(left + 1, Room::new([b, a]))
    }

    #[test]
    fn test_cost_scales_with_species() {
        // Same geometry two rooms to the right, with species 100 times dearer
        for strategy in STRATEGIES {
            let cheap = min_energy(&swapped_neighbours(0), strategy);
            let dear = min_energy(&swapped_neighbours(2), strategy);
            assert_eq!(cheap, 46);
            assert_eq!(dear, 100 * cheap);
        }
    }

    #[test]
    fn test_deterministic() {
        let start: Burrow<2> = parse_burrow(EXAMPLE).unwrap();
        for strategy in STRATEGIES {
            let first = solve(&start, &config(strategy)).unwrap();
            let second = solve(&start, &config(strategy)).unwrap();
            assert_eq!(first.min_energy, second.min_energy);
            assert_eq!(first.states_expanded, second.states_expanded);
            assert_eq!(first.states_recorded, second.states_recorded);
        }
    }

    fn assert_plan_replays<const N: usize>(start: &Burrow<N>, strategy: Strategy) {
        let config = SolverConfig {
            strategy,
            record_path: true,
        };
        let result = solve(start, &config).unwrap();
        let steps = result.steps.unwrap();

        assert_eq!(
            steps.iter().map(|s| s.energy).sum::<u64>(),
            result.min_energy,
            "{:?}",
            strategy
        );

        let mut burrow = *start;
        for step in &steps {
            burrow = replay(&burrow, step).unwrap();
        }
        assert!(burrow.is_terminal());
    }

    #[test]
    fn test_recorded_path_replays() {
        let shallow: Burrow<2> = parse_burrow(EXAMPLE).unwrap();
        let deep: Burrow<4> = parse_burrow(EXAMPLE).unwrap();
        for strategy in STRATEGIES {
            assert_plan_replays(&shallow, strategy);
            assert_plan_replays(&deep, strategy);
        }
    }

    #[test]
    fn test_sorted_start_has_empty_plan() {
        let config = SolverConfig {
            strategy: Strategy::Dijkstra,
            record_path: true,
        };
        let result = solve(&Burrow::<2>::sorted(), &config).unwrap();
        assert_eq!(result.steps, Some(Vec::new()));
        assert_eq!(result.states_expanded, 0);
    }

    #[test]
    fn test_no_path_without_recording() {
        let start: Burrow<2> = parse_burrow(EXAMPLE).unwrap();
        let result = solve(&start, &SolverConfig::default()).unwrap();
        assert!(result.steps.is_none());
        assert!(result.states_expanded > 0);
        assert!(result.states_recorded >= result.states_expanded);
    }

    #[test]
    fn test_deadlock_reports_no_solution() {
        // Desert and amber block each other's way home
        let start = Burrow::<2>::sorted()
            .with_room(0, Room::new([A, E]))
            .with_room(3, Room::new([D, E]))
            .with_hallway(Hallway::default().with_cell(3, D).with_cell(5, A));

        for strategy in STRATEGIES {
            assert_eq!(
                solve(&start, &config(strategy)).unwrap_err(),
                SolveError::NoSolution { states_expanded: 1 }
            );
        }
    }

    #[test]
    fn test_invalid_start() {
        let extra_bronze = Burrow::<2>::sorted().with_hallway(Hallway::default().with_cell(0, B));
        assert!(matches!(
            solve(&extra_bronze, &SolverConfig::default()),
            Err(SolveError::InvalidStart(_))
        ));
    }
}
