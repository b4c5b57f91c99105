//! Reading burrow diagrams.
//!
//! ```text
//! #############
//! #...........#
//! ###B#C#B#D###
//!   #A#D#C#A#
//!   #########
//! ```
//!
//! The first room row is the slot next to the hallway, the last one is the
//! back of the room. A two-row diagram can be read into depth 4 rooms, in
//! which case [`UNFOLDED_ROWS`] are inserted between its two rows.

use crate::burrow::{is_stop, Burrow, Hallway, Room, HALLWAY_LEN, ROOM_COUNT};
use crate::error::ParseError;
use crate::species::Species;

/// Rows hidden in the folded-up diagram, inserted for depth 4
pub const UNFOLDED_ROWS: [&str; 2] = ["  #D#C#B#A#", "  #D#B#A#C#"];

/// Column of each room's cells in a diagram row
const ROOM_COLUMNS: [usize; ROOM_COUNT] = [3, 5, 7, 9];

/// A diagram line together with its 1-based line number
type Row<'a> = (usize, &'a str);

/// Parse a burrow diagram into rooms of depth `N`
pub fn parse_burrow<const N: usize>(input: &str) -> Result<Burrow<N>, ParseError> {
    let (hallway_row, rows) = split_diagram(input)?;
    let hallway = parse_hallway(hallway_row)?;

    let rows = unfold(rows, N)?;
    let rooms = parse_rooms::<N>(&rows)?;

    let burrow = Burrow::new(hallway, rooms);
    for species in Species::AGENTS {
        let found = burrow.count(species);
        if found != N {
            return Err(ParseError::SpeciesCount {
                species,
                found,
                expected: N,
            });
        }
    }
    Ok(burrow)
}

/// Number of room rows the diagram actually shows
pub fn room_depth(input: &str) -> Result<usize, ParseError> {
    Ok(split_diagram(input)?.1.len())
}

/// Split a diagram into its hallway row and its room rows.
///
/// Leading blank lines are skipped, but rows keep their line number in the
/// input.
fn split_diagram(input: &str) -> Result<(Row, Vec<Row>), ParseError> {
    let lines: Vec<Row> = input
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l))
        .skip_while(|(_, l)| l.trim().is_empty())
        .collect();

    let top = lines.first().map_or(1, |&(line, _)| line);
    let hallway_row = *lines
        .get(1)
        .ok_or(ParseError::MissingLine { line: top + 1 })?;

    // Room rows run until the closing wall
    let rows = lines
        .iter()
        .skip(2)
        .take_while(|(_, l)| l.chars().nth(ROOM_COLUMNS[0]).is_some_and(|c| c != '#'))
        .copied()
        .collect();

    Ok((hallway_row, rows))
}

/// Bring the room rows to exactly `depth` rows
fn unfold(rows: Vec<Row>, depth: usize) -> Result<Vec<Row>, ParseError> {
    match rows.len() {
        found if found == depth => Ok(rows),
        2 if depth == 4 => {
            let (front, back) = (rows[0], rows[1]);
            Ok(vec![
                front,
                (front.0, UNFOLDED_ROWS[0]),
                (front.0, UNFOLDED_ROWS[1]),
                back,
            ])
        }
        found => Err(ParseError::DepthMismatch { found, depth }),
    }
}

fn cell((line, text): Row, column: usize) -> Result<Species, ParseError> {
    let found = text
        .chars()
        .nth(column)
        .ok_or(ParseError::ShortLine { line, column })?;
    Species::from_char(found).ok_or(ParseError::BadCell {
        line,
        column,
        found,
    })
}

fn parse_hallway(row: Row) -> Result<Hallway, ParseError> {
    let mut cells = [Species::Empty; HALLWAY_LEN];
    for (position, slot) in cells.iter_mut().enumerate() {
        let species = cell(row, position + 1)?;
        if !species.is_empty() && !is_stop(position) {
            return Err(ParseError::BlockedEntrance { species, position });
        }
        *slot = species;
    }
    Ok(Hallway::new(cells))
}

fn parse_rooms<const N: usize>(rows: &[Row]) -> Result<[Room<N>; ROOM_COUNT], ParseError> {
    let mut slots = [[Species::Empty; N]; ROOM_COUNT];
    for (depth, &row) in rows.iter().enumerate() {
        let slot = N - 1 - depth;
        for (room, &column) in ROOM_COLUMNS.iter().enumerate() {
            slots[room][slot] = cell(row, column)?;
        }
    }

    let rooms = slots.map(Room::new);
    if let Some(room) = rooms.iter().position(|r| !r.is_well_formed()) {
        return Err(ParseError::FloatingAmphipod { room });
    }
    Ok(rooms)
}
