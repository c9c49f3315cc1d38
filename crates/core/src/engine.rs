//! Tick driver: observe phase, then buffered evaluate-and-commit.
//!
//! One tick runs two sub-phases to completion with no suspension points.
//! First every registered presence acts in registration order, mutating
//! cells directly. Then every cell's candidate next value is computed
//! against the post-observe snapshot by the rule bound to its current
//! value; all candidates are buffered before any of them is applied, so a
//! cell's rule can never observe a value from later in the same tick.
//! Runs are deterministic for a given seed.

use rand::seq::IndexedRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::cell::{Cell, CellState};
use crate::config::SimulationConfig;
use crate::error::{ConfigError, InvariantViolation, StepError};
use crate::grid::{Direction, Grid};
use crate::presence::{Backburner, Presence, PresenceContext, PresenceId, PresenceSlot};
use crate::rules::{RuleContext, RuleTable};

/// One cell transition recorded during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellChange {
    /// Row of the changed cell.
    pub row: u32,
    /// Column of the changed cell.
    pub col: u32,
    /// Value before the tick.
    pub old: CellState,
    /// Value after the tick.
    pub new: CellState,
}

/// Every transition from one tick, for incremental redraw. Cells whose
/// computed value equals their current value are evaluated but never
/// listed here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSet {
    /// The tick this set belongs to.
    pub tick: u64,
    /// Changed cells in row-major order.
    pub changes: Vec<CellChange>,
}

impl ChangeSet {
    /// Number of changed cells.
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Whether the tick changed nothing.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

/// The simulation: a grid, the rule table driving it, the registered
/// presences, and one seeded random stream.
///
/// Exclusively owns its grid for the lifetime of the run. The tick loop is
/// single-threaded, synchronous, and externally paced; callers decide when
/// to invoke [`Engine::step`].
pub struct Engine {
    grid: Grid,
    rules: RuleTable,
    config: SimulationConfig,
    presences: Vec<PresenceSlot>,
    rng: ChaCha8Rng,
    tick: u64,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("grid", &self.grid)
            .field("rules", &self.rules)
            .field("config", &self.config)
            .field("presences", &self.presences.len())
            .field("rng", &self.rng)
            .field("tick", &self.tick)
            .finish()
    }
}

impl Engine {
    /// Build an engine with the reference ruleset and default tuning.
    pub fn initialize(width: u32, height: u32, seed: u64) -> Result<Self, ConfigError> {
        Self::new(SimulationConfig::default(), width, height, seed)
    }

    /// Build an engine with the reference ruleset and the given tuning.
    pub fn new(
        config: SimulationConfig,
        width: u32,
        height: u32,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        Self::with_rules(config, RuleTable::fire_rules(), width, height, seed)
    }

    /// Build an engine with an injected rule table. The table must cover
    /// every state; a missing entry fails here, never mid-tick.
    pub fn with_rules(
        config: SimulationConfig,
        rules: RuleTable,
        width: u32,
        height: u32,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        rules.validate_complete()?;

        let mut grid = Grid::build(width, height)?;
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        // Initial fill: weighted draw over Growing/Empty/Burning per cell.
        // Burnt never appears initially.
        let pool = config.initial_pool();
        for index in grid.cell_indices() {
            if let Some(&state) = pool.choose(&mut rng) {
                grid.set_value(index, state);
            }
        }

        let census = grid.census();
        info!(
            "initialized {}x{} fire grid (seed {}): {} growing, {} empty, {} burning",
            width, height, seed, census[1], census[0], census[2]
        );

        Ok(Engine {
            grid,
            rules,
            config,
            presences: Vec::new(),
            rng,
            tick: 0,
        })
    }

    /// The grid, for rendering and inspection.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Mutable grid access for scenario setup and presentation-side hooks.
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    /// Ticks committed so far.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Grid width in columns.
    pub fn width(&self) -> u32 {
        self.grid.width()
    }

    /// Grid height in rows.
    pub fn height(&self) -> u32 {
        self.grid.height()
    }

    /// Number of registered presences.
    pub fn presence_count(&self) -> usize {
        self.presences.len()
    }

    /// Register the reference [`Backburner`] presence at a coordinate.
    pub fn add_presence(&mut self, row: u32, col: u32) -> Result<PresenceId, ConfigError> {
        self.add_presence_with(row, col, Box::new(Backburner))
    }

    /// Register a custom presence at a coordinate. Presences act in
    /// registration order and live for the whole run.
    pub fn add_presence_with(
        &mut self,
        row: u32,
        col: u32,
        behavior: Box<dyn Presence>,
    ) -> Result<PresenceId, ConfigError> {
        let locale = self
            .grid
            .index(row, col)
            .ok_or(ConfigError::CoordOutOfBounds { row, col })?;
        self.presences.push(PresenceSlot { locale, behavior });
        Ok(PresenceId(self.presences.len() as u32 - 1))
    }

    /// Move a presence one step in the given direction. Returns whether it
    /// moved; a step toward an absent neighbor is silently absorbed and
    /// leaves the position unchanged.
    pub fn relocate_presence(&mut self, id: PresenceId, direction: Direction) -> bool {
        let Some(slot) = self.presences.get_mut(id.0 as usize) else {
            return false;
        };
        match self.grid.neighbor(slot.locale, direction) {
            Some(neighbor) => {
                slot.locale = neighbor;
                true
            }
            None => false,
        }
    }

    /// Current (row, col) of a presence.
    pub fn presence_locale(&self, id: PresenceId) -> Option<(u32, u32)> {
        self.presences
            .get(id.0 as usize)
            .map(|slot| self.grid.coord_of(slot.locale))
    }

    /// Advance one tick and report every cell that changed.
    ///
    /// On error the grid is left at the last fully committed tick; nothing
    /// from the failed evaluation is applied.
    pub fn step(&mut self) -> Result<ChangeSet, StepError> {
        // OBSERVE: presences mutate cells directly, in registration order.
        // Their effects are visible to later presences and to evaluation.
        for (position, slot) in self.presences.iter_mut().enumerate() {
            trace!("presence {} acting at cell {}", position, slot.locale);
            let mut ctx = PresenceContext::new(&mut self.grid, slot.locale);
            slot.behavior.act(&mut ctx);
        }

        // EVALUATE: compute every candidate against the post-observe
        // snapshot. Nothing is written until the whole pass finishes.
        let mut staged: Vec<(u32, CellState, CellState)> = Vec::new();
        for index in self.grid.cell_indices() {
            let value = self
                .grid
                .cell(index)
                .and_then(Cell::value)
                .ok_or(InvariantViolation::UnsetCell { index })?;
            let rule = self
                .rules
                .get(value)
                .ok_or(InvariantViolation::UnruledState { state: value })?;
            let mut ctx = RuleContext::new(&self.grid, index, value, &self.config, &mut self.rng);
            if let Some(next) = rule.apply(&mut ctx) {
                if next != value {
                    staged.push((index, value, next));
                }
            }
        }

        // COMMIT: apply the whole buffer in one pass.
        self.tick += 1;
        let mut changes = Vec::with_capacity(staged.len());
        for (index, old, new) in staged {
            self.grid.set_value(index, new);
            let (row, col) = self.grid.coord_of(index);
            changes.push(CellChange { row, col, old, new });
        }

        debug!(
            "tick {}: {} cells changed, {} presences",
            self.tick,
            changes.len(),
            self.presences.len()
        );

        Ok(ChangeSet {
            tick: self.tick,
            changes,
        })
    }
}
