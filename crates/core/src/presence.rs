//! Agents that walk the grid and mutate nearby cells during the observe
//! phase, before the automaton rules run.
//!
//! A presence is bound to one grid coordinate and acts once per tick. Its
//! writes go straight to the cells (bypassing the rule table) and are
//! visible to presences registered after it and to the evaluation phase.

use crate::cell::CellState;
use crate::grid::{Direction, Grid};

/// Identifier handed back by the engine when a presence is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PresenceId(pub(crate) u32);

/// Mutable view of a presence's own cell and its eight neighbors.
pub struct PresenceContext<'a> {
    grid: &'a mut Grid,
    locale: u32,
}

impl<'a> PresenceContext<'a> {
    /// View centered on the cell at `locale`.
    pub fn new(grid: &'a mut Grid, locale: u32) -> Self {
        PresenceContext { grid, locale }
    }

    /// Value of the presence's own cell.
    pub fn value(&self) -> Option<CellState> {
        self.grid.cell(self.locale).and_then(|cell| cell.value())
    }

    /// Sum of the eight neighbors' values, absent/unset counting as zero.
    pub fn neighbor_value(&self) -> u32 {
        self.grid.neighbor_value(self.locale)
    }

    /// Value of the neighbor in the given direction, `None` when the
    /// neighbor is absent or uninitialized.
    pub fn neighbor_state(&self, direction: Direction) -> Option<CellState> {
        let neighbor = self.grid.neighbor(self.locale, direction)?;
        self.grid.cell(neighbor).and_then(|cell| cell.value())
    }

    /// Overwrite the presence's own cell. Returns whether it changed.
    pub fn set_value(&mut self, value: CellState) -> bool {
        self.grid.set_value(self.locale, value)
    }

    /// Overwrite a neighboring cell; no-op at grid edges. Returns whether
    /// it changed.
    pub fn set_neighbor(&mut self, direction: Direction, value: CellState) -> bool {
        match self.grid.neighbor(self.locale, direction) {
            Some(neighbor) => self.grid.set_value(neighbor, value),
            None => false,
        }
    }
}

/// Observe-phase behavior of an agent. The default does nothing.
pub trait Presence {
    /// Act once per tick on the cells around the bound coordinate.
    fn act(&mut self, _ctx: &mut PresenceContext<'_>) {}
}

/// Reference presence: clears its own cell and torches every adjacent
/// fuel cell, cutting a burnt-out break around itself as it walks.
#[derive(Debug, Default, Clone, Copy)]
pub struct Backburner;

impl Presence for Backburner {
    fn act(&mut self, ctx: &mut PresenceContext<'_>) {
        ctx.set_value(CellState::Empty);
        for direction in Direction::ALL {
            if ctx.neighbor_state(direction) == Some(CellState::Growing) {
                ctx.set_neighbor(direction, CellState::Burning);
            }
        }
    }
}

/// A registered presence: its behavior plus the flat index it is bound to.
pub(crate) struct PresenceSlot {
    pub(crate) locale: u32,
    pub(crate) behavior: Box<dyn Presence>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backburner_clears_self_and_torches_only_fuel() {
        let mut grid = Grid::build(3, 3).unwrap();
        for index in grid.cell_indices() {
            grid.set_value(index, CellState::Empty);
        }
        let center = grid.index(1, 1).unwrap();
        grid.set_value(center, CellState::Growing);
        grid.set_value(grid.index(0, 0).unwrap(), CellState::Growing);
        grid.set_value(grid.index(0, 1).unwrap(), CellState::Burning);
        grid.set_value(grid.index(2, 2).unwrap(), CellState::Burnt);
        grid.set_value(grid.index(2, 1).unwrap(), CellState::Growing);

        let mut ctx = PresenceContext::new(&mut grid, center);
        Backburner.act(&mut ctx);

        assert_eq!(grid.value_at(1, 1), Some(CellState::Empty));
        // Fuel neighbors are now burning.
        assert_eq!(grid.value_at(0, 0), Some(CellState::Burning));
        assert_eq!(grid.value_at(2, 1), Some(CellState::Burning));
        // Everything else around is untouched.
        assert_eq!(grid.value_at(0, 1), Some(CellState::Burning));
        assert_eq!(grid.value_at(2, 2), Some(CellState::Burnt));
        assert_eq!(grid.value_at(1, 0), Some(CellState::Empty));
        assert_eq!(grid.value_at(1, 2), Some(CellState::Empty));
    }

    #[test]
    fn backburner_at_a_corner_only_touches_present_neighbors() {
        let mut grid = Grid::build(2, 2).unwrap();
        for index in grid.cell_indices() {
            grid.set_value(index, CellState::Growing);
        }
        let corner = grid.index(0, 0).unwrap();

        let mut ctx = PresenceContext::new(&mut grid, corner);
        Backburner.act(&mut ctx);

        assert_eq!(grid.value_at(0, 0), Some(CellState::Empty));
        assert_eq!(grid.value_at(0, 1), Some(CellState::Burning));
        assert_eq!(grid.value_at(1, 0), Some(CellState::Burning));
        assert_eq!(grid.value_at(1, 1), Some(CellState::Burning));
    }

    #[test]
    fn default_act_is_a_noop() {
        struct Idle;
        impl Presence for Idle {}

        let mut grid = Grid::build(2, 2).unwrap();
        for index in grid.cell_indices() {
            grid.set_value(index, CellState::Growing);
        }
        let mut ctx = PresenceContext::new(&mut grid, 0);
        Idle.act(&mut ctx);
        assert!(grid
            .cell_indices()
            .all(|i| grid.cell(i).unwrap().value() == Some(CellState::Growing)));
    }
}
