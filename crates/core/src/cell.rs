//! Cell states and per-cell arena storage.

use serde::{Deserialize, Serialize};

/// Discrete state of a single grid cell.
///
/// The numeric encoding is what [`crate::grid::Grid::neighbor_value`] sums:
/// bare ground contributes nothing, fuel a little, fire and ash the most.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum CellState {
    /// Bare ground.
    Empty = 0,
    /// Living fuel (a tree).
    Growing = 1,
    /// Active fire.
    Burning = 2,
    /// Ash left behind once the fire passes.
    Burnt = 3,
}

impl CellState {
    /// Every state, in encoding order. Rule tables are indexed by this order.
    pub const ALL: [CellState; 4] = [
        CellState::Empty,
        CellState::Growing,
        CellState::Burning,
        CellState::Burnt,
    ];

    /// Numeric encoding, the quantity the neighbor-sum statistic adds up.
    pub fn value(self) -> u8 {
        self as u8
    }

    /// Inverse of [`CellState::value`]; `None` outside the closed state set.
    pub fn from_value(value: u8) -> Option<Self> {
        match value {
            0 => Some(CellState::Empty),
            1 => Some(CellState::Growing),
            2 => Some(CellState::Burning),
            3 => Some(CellState::Burnt),
            _ => None,
        }
    }

    /// True for fire and its ash residue. Adjacent fuel can ignite from
    /// either, and nothing regrows next to them.
    pub fn is_fire_or_ash(self) -> bool {
        matches!(self, CellState::Burning | CellState::Burnt)
    }

    /// Single-character glyph for terminal display.
    pub fn glyph(self) -> char {
        match self {
            CellState::Empty => '.',
            CellState::Growing => 'T',
            CellState::Burning => '*',
            CellState::Burnt => 'x',
        }
    }
}

/// One arena slot: the current value plus the four stored cardinal links.
///
/// Links are flat indices into the owning grid's cell vector, assigned once
/// at build time. Diagonal neighbors are derived (north-then-east and so on),
/// so they stay consistent with the cardinals by construction and are never
/// stored. A freshly built cell holds no value until the engine's initial
/// fill assigns one.
#[derive(Debug, Clone)]
pub struct Cell {
    pub(crate) value: Option<CellState>,
    pub(crate) north: Option<u32>,
    pub(crate) south: Option<u32>,
    pub(crate) east: Option<u32>,
    pub(crate) west: Option<u32>,
}

impl Cell {
    pub(crate) fn unset() -> Self {
        Cell {
            value: None,
            north: None,
            south: None,
            east: None,
            west: None,
        }
    }

    /// Current value, or `None` before initialization.
    pub fn value(&self) -> Option<CellState> {
        self.value
    }
}
