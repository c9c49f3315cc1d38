//! Fixed rectangular cell arena with eight-neighbor adjacency.
//!
//! The grid is a flat row-major vector of [`Cell`]s. Cardinal links are
//! wired once at build time: east and south are assigned while scanning
//! row-major, and the reverse link is back-filled in the same statement, so
//! adjacency is bidirectionally consistent after every assignment. Diagonal
//! neighbors are derived from the cardinals (northeast is north-then-east)
//! and therefore can never drift out of sync. Topology is fixed after
//! build; there is no resize and no repair path.

use std::fmt;

use tracing::debug;

use crate::cell::{Cell, CellState};
use crate::error::{ConfigError, InvariantViolation};

/// Compass direction to an adjacent cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Row - 1.
    North,
    /// Row + 1.
    South,
    /// Column + 1.
    East,
    /// Column - 1.
    West,
    /// Derived: north, then east.
    NorthEast,
    /// Derived: north, then west.
    NorthWest,
    /// Derived: south, then east.
    SouthEast,
    /// Derived: south, then west.
    SouthWest,
}

impl Direction {
    /// The four stored cardinal directions.
    pub const CARDINALS: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// All eight directions, cardinals first.
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
        Direction::NorthEast,
        Direction::NorthWest,
        Direction::SouthEast,
        Direction::SouthWest,
    ];

    /// The direction pointing back at the origin cell.
    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
            Direction::NorthEast => Direction::SouthWest,
            Direction::NorthWest => Direction::SouthEast,
            Direction::SouthEast => Direction::NorthWest,
            Direction::SouthWest => Direction::NorthEast,
        }
    }
}

/// Rectangular W x H collection of cells addressed by (row, col).
///
/// Owns every cell for the lifetime of a run. Exposes the stable row-major
/// traversal order used for deterministic evaluation and display.
#[derive(Debug, Clone)]
pub struct Grid {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
}

impl Grid {
    /// Construct a width x height grid and wire its cardinal adjacency.
    ///
    /// Rejects zero dimensions. Interior cells end up with four stored
    /// cardinal links; edge and corner cells with fewer.
    pub fn build(width: u32, height: u32) -> Result<Self, ConfigError> {
        if width == 0 || height == 0 {
            return Err(ConfigError::ZeroDimension { width, height });
        }

        let count = width as usize * height as usize;
        let mut cells = vec![Cell::unset(); count];

        // Assign east/south while scanning row-major and back-fill the
        // reverse link immediately, keeping adjacency symmetric after
        // every assignment.
        for row in 0..height {
            for col in 0..width {
                let idx = (row * width + col) as usize;
                if col + 1 < width {
                    let east = idx + 1;
                    cells[idx].east = Some(east as u32);
                    cells[east].west = Some(idx as u32);
                }
                if row + 1 < height {
                    let south = idx + width as usize;
                    cells[idx].south = Some(south as u32);
                    cells[south].north = Some(idx as u32);
                }
            }
        }

        debug!("wired {}x{} grid with {} cells", width, height, count);

        Ok(Grid {
            width,
            height,
            cells,
        })
    }

    /// Grid width in columns.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Grid height in rows.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Flat index for (row, col), or `None` outside the grid.
    pub fn index(&self, row: u32, col: u32) -> Option<u32> {
        if row < self.height && col < self.width {
            Some(row * self.width + col)
        } else {
            None
        }
    }

    /// (row, col) for a flat index.
    pub fn coord_of(&self, index: u32) -> (u32, u32) {
        (index / self.width, index % self.width)
    }

    /// Read accessor for rendering: the value at (row, col), or `None` if
    /// the coordinate is absent or the cell is uninitialized.
    pub fn value_at(&self, row: u32, col: u32) -> Option<CellState> {
        let index = self.index(row, col)?;
        self.cells[index as usize].value()
    }

    /// Borrow the cell at a flat index.
    pub fn cell(&self, index: u32) -> Option<&Cell> {
        self.cells.get(index as usize)
    }

    /// Set a cell's value. No-op when the new value equals the current one,
    /// so an unchanged cell never rebinds its rule or produces a spurious
    /// redraw. Returns whether the value actually changed.
    pub fn set_value(&mut self, index: u32, value: CellState) -> bool {
        let Some(cell) = self.cells.get_mut(index as usize) else {
            return false;
        };
        if cell.value == Some(value) {
            return false;
        }
        cell.value = Some(value);
        true
    }

    /// Neighbor in the given direction, diagonals derived from cardinals.
    pub fn neighbor(&self, index: u32, direction: Direction) -> Option<u32> {
        let cell = self.cells.get(index as usize)?;
        match direction {
            Direction::North => cell.north,
            Direction::South => cell.south,
            Direction::East => cell.east,
            Direction::West => cell.west,
            Direction::NorthEast => self.step_through(cell.north, Direction::East),
            Direction::NorthWest => self.step_through(cell.north, Direction::West),
            Direction::SouthEast => self.step_through(cell.south, Direction::East),
            Direction::SouthWest => self.step_through(cell.south, Direction::West),
        }
    }

    fn step_through(&self, via: Option<u32>, direction: Direction) -> Option<u32> {
        self.neighbor(via?, direction)
    }

    /// Flat indices of all present neighbors, cardinals first.
    pub fn neighbors(&self, index: u32) -> impl Iterator<Item = u32> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(move |direction| self.neighbor(index, direction))
    }

    /// Values of all present, initialized neighbors. Absent and unset
    /// neighbors are skipped, which makes them contribute nothing to any
    /// aggregate computed from this iterator.
    pub fn neighbor_states(&self, index: u32) -> impl Iterator<Item = CellState> + '_ {
        self.neighbors(index)
            .filter_map(|neighbor| self.cells[neighbor as usize].value())
    }

    /// Sum of the eight neighbors' numeric values, absent/unset counting
    /// as zero. This is the input statistic every transition rule
    /// conditions on.
    pub fn neighbor_value(&self, index: u32) -> u32 {
        self.neighbor_states(index)
            .map(|state| u32::from(state.value()))
            .sum()
    }

    /// Stable row-major traversal order.
    pub fn cell_indices(&self) -> std::ops::Range<u32> {
        0..self.cells.len() as u32
    }

    /// Count of initialized cells per state, indexed by encoding.
    pub fn census(&self) -> [usize; 4] {
        let mut counts = [0usize; 4];
        for cell in &self.cells {
            if let Some(state) = cell.value {
                counts[state.value() as usize] += 1;
            }
        }
        counts
    }

    /// Check the structural invariants: every cardinal link is mirrored by
    /// its target, and every diagonal derivation agrees across both
    /// cardinal paths. Holds by construction; this is a debug/test aid.
    pub fn validate_adjacency(&self) -> Result<(), InvariantViolation> {
        for index in self.cell_indices() {
            for direction in Direction::CARDINALS {
                if let Some(neighbor) = self.neighbor(index, direction) {
                    if self.neighbor(neighbor, direction.opposite()) != Some(index) {
                        return Err(InvariantViolation::AdjacencyAsymmetry { index, direction });
                    }
                }
            }

            let diagonals = [
                (Direction::NorthEast, Direction::North, Direction::East),
                (Direction::NorthWest, Direction::North, Direction::West),
                (Direction::SouthEast, Direction::South, Direction::East),
                (Direction::SouthWest, Direction::South, Direction::West),
            ];
            for (diagonal, vertical, horizontal) in diagonals {
                let via_vertical = self
                    .neighbor(index, vertical)
                    .and_then(|n| self.neighbor(n, horizontal));
                let via_horizontal = self
                    .neighbor(index, horizontal)
                    .and_then(|n| self.neighbor(n, vertical));
                // Both paths exist only away from the edges; when both are
                // present they must land on the same cell.
                if let (Some(a), Some(b)) = (via_vertical, via_horizontal) {
                    if a != b {
                        return Err(InvariantViolation::DiagonalMismatch {
                            index,
                            direction: diagonal,
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.height {
            for col in 0..self.width {
                if col > 0 {
                    write!(f, " ")?;
                }
                let glyph = self
                    .value_at(row, col)
                    .map_or('?', CellState::glyph);
                write!(f, "{glyph}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
