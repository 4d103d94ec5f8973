use std::f64::consts::SQRT_2;

use derive_more::Display;
use thiserror::Error;

use crate::cost::Cost;
use crate::error::SearchError;
use crate::problem::Problem;

const MAX_ELEMENTS_DISPLAYED: usize = 40;
const RANDOM_STATE_MAX_TRIES: usize = 10_000;

pub type Coord = u32;

#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Hash)]
#[display("({x},{y})")]
pub struct Maze2DState {
    pub x: Coord,
    pub y: Coord,
}

impl Maze2DState {
    #[must_use]
    pub fn new(x: Coord, y: Coord) -> Self {
        Self { x, y }
    }
    fn from_usize(x: usize, y: usize) -> Option<Self> {
        Some(Self {
            x: Coord::try_from(x).ok()?,
            y: Coord::try_from(y).ok()?,
        })
    }
}

#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Hash, PartialOrd)]
pub enum Maze2DAction {
    #[display("↑")]
    Up = 0, // y++
    #[display("↓")]
    Down = 1, // y--
    #[display("←")]
    Left = 2, // x--
    #[display("→")]
    Right = 3, // x++
    #[display("↖")]
    LeftUp = 4, // x--, y++
    #[display("↗")]
    RightUp = 5, // x++, y++
    #[display("↙")]
    LeftDown = 6, // x--, y--
    #[display("↘")]
    RightDown = 7, // x++, y--
}

impl Maze2DAction {
    #[inline(always)]
    pub fn is_diagonal(&self) -> bool {
        debug_assert!(Maze2DAction::Up < Maze2DAction::Right);
        debug_assert!(Maze2DAction::Down < Maze2DAction::Right);
        debug_assert!(Maze2DAction::Left < Maze2DAction::Right);
        *self > Maze2DAction::Right
    }

    /// Offsets as wrapping additions.
    #[inline(always)]
    fn delta(&self) -> (Coord, Coord) {
        let prev = Coord::MAX;
        let same = 0;
        let next = 1;

        #[rustfmt::skip]
        let delta = match self {
            Maze2DAction::Up        => (same, next),
            Maze2DAction::Down      => (same, prev),
            Maze2DAction::Left      => (prev, same),
            Maze2DAction::Right     => (next, same),
            Maze2DAction::LeftUp    => (prev, next),
            Maze2DAction::RightUp   => (next, next),
            Maze2DAction::LeftDown  => (prev, prev),
            Maze2DAction::RightDown => (next, prev),
        };
        delta
    }
}

pub const ORTHOGONAL_COST: Cost = 1.0;
pub const DIAGONAL_COST: Cost = SQRT_2;

#[derive(Copy, Clone, Debug, Display, PartialEq, Eq)]
pub enum Maze2DCell {
    #[display("░")]
    Empty,
    #[display("█")]
    Wall,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Maze2DParseError {
    #[error("Empty input")]
    EmptyInput,
    #[error("Invalid character '{ch}' found at ({x},{y})")]
    InvalidCell { ch: char, x: usize, y: usize },
    #[error("Row {y} is {found} cells wide, expected {expected}")]
    RaggedRow {
        y: usize,
        found: usize,
        expected: usize,
    },
    #[error("Maze is too large")]
    TooLarge,
    #[error("No start 'S' found")]
    MissingStart,
    #[error("No goal 'G' found")]
    MissingGoal,
    #[error("Second start found at ({x},{y})")]
    DuplicateStart { x: usize, y: usize },
    #[error("Second goal found at ({x},{y})")]
    DuplicateGoal { x: usize, y: usize },
}

/// The grid, without start or goal.
#[derive(Clone, PartialEq, Eq)]
pub struct Maze2DSpace {
    map: Vec<Vec<Maze2DCell>>,
}

impl Maze2DSpace {
    #[must_use]
    pub fn new_empty_with_dimensions(x: usize, y: usize) -> Self {
        Self {
            map: vec![vec![Maze2DCell::Empty; x]; y],
        }
    }

    /// `(width, height)`.
    pub fn dimensions(&self) -> (usize, usize) {
        match self.map.first() {
            Some(row) => (row.len(), self.map.len()),
            None => (0, 0),
        }
    }

    /// The cell at `state`, or `None` if out of bounds.
    #[inline(always)]
    pub fn at(&self, state: &Maze2DState) -> Option<Maze2DCell> {
        self.map
            .get(state.y as usize)?
            .get(state.x as usize)
            .copied()
    }

    #[inline(always)]
    pub fn is_free(&self, state: &Maze2DState) -> bool {
        self.at(state) == Some(Maze2DCell::Empty)
    }

    pub fn random_state<R: rand::Rng>(&self, r: &mut R) -> Option<Maze2DState> {
        let (max_x, max_y) = self.dimensions();
        if max_x == 0 || max_y == 0 {
            return None;
        }

        for _tries in 0..RANDOM_STATE_MAX_TRIES {
            let x = r.random_range(0..max_x);
            let y = r.random_range(0..max_y);
            let s = Maze2DState::from_usize(x, y)?;
            if self.is_free(&s) {
                return Some(s);
            }
        }

        None
    }

    /// Free cells next to `state`, including diagonals.
    ///
    /// Listed left column first, bottom to top, then the centre column and
    /// the right one.
    pub fn neighbours(&self, state: &Maze2DState) -> Vec<(Maze2DState, Maze2DAction)> {
        #[cfg(feature = "coz_profile")]
        coz::scope!("StateExpansion");

        let mut v = Vec::<(Maze2DState, Maze2DAction)>::with_capacity(8);
        for action in [
            // Left
            Maze2DAction::LeftDown,
            Maze2DAction::Left,
            Maze2DAction::LeftUp,
            // Center
            Maze2DAction::Down,
            Maze2DAction::Up,
            // Right
            Maze2DAction::RightDown,
            Maze2DAction::Right,
            Maze2DAction::RightUp,
        ] {
            let (dx, dy) = action.delta();
            let s = Maze2DState {
                x: state.x.wrapping_add(dx),
                y: state.y.wrapping_add(dy),
            };
            // Wrapped coordinates land out of bounds.
            if self.is_free(&s) {
                v.push((s, action));
            }
        }
        v
    }
}

impl std::fmt::Display for Maze2DSpace {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let d = self.dimensions();
        writeln!(f, "Maze2D({}x{}):", d.0, d.1)?;
        for line in self.map.iter().take(MAX_ELEMENTS_DISPLAYED) {
            for cell in line.iter().take(MAX_ELEMENTS_DISPLAYED) {
                write!(f, "{cell}")?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

impl std::fmt::Debug for Maze2DSpace {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Maze2D{:?}", self.dimensions())
    }
}

/// Path-finding on a grid maze with 8-connected moves.
///
/// Orthogonal steps cost 1 and diagonal ones `√2`. The heuristic is the octile
/// distance, which is exact on an empty grid and so admissible and
/// consistent.
#[derive(Clone, Debug)]
pub struct Maze2DProblem {
    space: Maze2DSpace,
    start: Maze2DState,
    goal: Maze2DState,
}

impl Maze2DProblem {
    pub fn space(&self) -> &Maze2DSpace {
        &self.space
    }
    pub fn start(&self) -> Maze2DState {
        self.start
    }
    pub fn goal(&self) -> Maze2DState {
        self.goal
    }

    /// A `width`×`height` maze where each cell is a wall with probability
    /// `density`, with a free start and goal picked at random.
    ///
    /// Gives up with `None` if `density` is not a probability, or if the maze
    /// is too full to place them.
    pub fn random<R: rand::Rng>(
        r: &mut R,
        width: usize,
        height: usize,
        density: f64,
    ) -> Option<Self> {
        if !(0.0..=1.0).contains(&density) {
            return None;
        }
        let mut space = Maze2DSpace::new_empty_with_dimensions(width, height);
        for row in space.map.iter_mut() {
            for cell in row.iter_mut() {
                if r.random_bool(density) {
                    *cell = Maze2DCell::Wall;
                }
            }
        }
        let start = space.random_state(r)?;
        let goal = space.random_state(r)?;
        Some(Self { space, start, goal })
    }

    /// Octile distance between two cells.
    #[inline(always)]
    pub fn octile_distance(a: &Maze2DState, b: &Maze2DState) -> Cost {
        let delta_x = a.x.abs_diff(b.x);
        let delta_y = a.y.abs_diff(b.y);
        let (delta_min, delta_max) = (delta_x.min(delta_y), delta_x.max(delta_y));

        let diagonal_cost = Cost::from(delta_min) * DIAGONAL_COST;
        let orthogonal_cost = Cost::from(delta_max - delta_min) * ORTHOGONAL_COST;
        orthogonal_cost + diagonal_cost
    }

    /// Draws the maze, marking `at` with `@`.
    fn render(&self, f: &mut impl std::fmt::Write, at: Option<&Maze2DState>) -> std::fmt::Result {
        for (y, line) in self.space.map.iter().enumerate().take(MAX_ELEMENTS_DISPLAYED) {
            for (x, cell) in line.iter().enumerate().take(MAX_ELEMENTS_DISPLAYED) {
                let s = Maze2DState::from_usize(x, y);
                let s = s.as_ref();
                if at.is_some() && s == at {
                    write!(f, "@")?;
                } else if s == Some(&self.start) {
                    write!(f, "S")?;
                } else if s == Some(&self.goal) {
                    write!(f, "G")?;
                } else {
                    write!(f, "{cell}")?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl Problem<Maze2DState, Maze2DAction> for Maze2DProblem {
    fn actions(&self, state: &Maze2DState) -> Vec<Maze2DAction> {
        self.space
            .neighbours(state)
            .into_iter()
            .map(|(_, a)| a)
            .collect()
    }

    #[inline(always)]
    fn result(&self, state: &Maze2DState, action: &Maze2DAction) -> Maze2DState {
        let (dx, dy) = action.delta();
        Maze2DState {
            x: state.x.wrapping_add(dx),
            y: state.y.wrapping_add(dy),
        }
    }

    #[inline(always)]
    fn path_cost(
        &self,
        cost: Cost,
        _from: &Maze2DState,
        action: &Maze2DAction,
        _to: &Maze2DState,
    ) -> Cost {
        cost + if action.is_diagonal() {
            DIAGONAL_COST
        } else {
            ORTHOGONAL_COST
        }
    }

    #[inline(always)]
    fn heuristic(&self, state: &Maze2DState, goal: &Maze2DState) -> Cost {
        Self::octile_distance(state, goal)
    }

    fn view_state(&self, state: &Maze2DState) -> Result<String, SearchError> {
        let mut s = String::new();
        // Writing into a `String` does not fail.
        let _ = self.render(&mut s, Some(state));
        Ok(s)
    }
}

impl std::convert::TryFrom<&str> for Maze2DProblem {
    type Error = Maze2DParseError;

    /// Parses a maze drawn with `#` for walls, ` ` or `.` for free cells, and
    /// one `S` and one `G` for the start and goal. Rows go top to bottom and
    /// must all be as wide.
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let lines: Vec<&str> = s.lines().collect();
        let max_x = lines.first().map_or(0, |l| l.chars().count());
        if max_x == 0 {
            return Err(Maze2DParseError::EmptyInput);
        }
        let max_y = lines.len();
        if Maze2DState::from_usize(max_x, max_y).is_none() {
            return Err(Maze2DParseError::TooLarge);
        }

        let mut space = Maze2DSpace::new_empty_with_dimensions(max_x, max_y);
        let mut start = None;
        let mut goal = None;

        for (y, line) in lines.iter().enumerate() {
            let found = line.chars().count();
            if found != max_x {
                return Err(Maze2DParseError::RaggedRow {
                    y,
                    found,
                    expected: max_x,
                });
            }
            for (x, ch) in line.chars().enumerate() {
                let here = Maze2DState::from_usize(x, y).ok_or(Maze2DParseError::TooLarge)?;
                space.map[y][x] = match ch {
                    ' ' | '.' => Maze2DCell::Empty,
                    '#' | '█' => Maze2DCell::Wall,
                    'S' => {
                        if start.replace(here).is_some() {
                            return Err(Maze2DParseError::DuplicateStart { x, y });
                        }
                        Maze2DCell::Empty
                    }
                    'G' => {
                        if goal.replace(here).is_some() {
                            return Err(Maze2DParseError::DuplicateGoal { x, y });
                        }
                        Maze2DCell::Empty
                    }
                    ch => return Err(Maze2DParseError::InvalidCell { ch, x, y }),
                };
            }
        }

        Ok(Maze2DProblem {
            space,
            start: start.ok_or(Maze2DParseError::MissingStart)?,
            goal: goal.ok_or(Maze2DParseError::MissingGoal)?,
        })
    }
}

impl std::fmt::Display for Maze2DProblem {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let d = self.space.dimensions();
        writeln!(
            f,
            "Maze2DProblem({}x{}) (s:{}, g:{}):",
            d.0, d.1, self.start, self.goal
        )?;
        self.render(f, None)
    }
}
