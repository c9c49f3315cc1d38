//! Per-state transition rules and the table that dispatches them.
//!
//! A rule is a pure function of one cell's neighborhood plus one fresh
//! random draw; returning `None` keeps the current value. The table is an
//! explicit value injected into the engine, one slot per state, validated
//! for completeness before the first tick ever runs.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::cell::CellState;
use crate::config::SimulationConfig;
use crate::error::ConfigError;
use crate::grid::Grid;

/// Everything a transition rule may read: the cell's current value, its
/// neighborhood, the tuning parameters, and a fresh uniform draw.
pub struct RuleContext<'a> {
    grid: &'a Grid,
    index: u32,
    value: CellState,
    config: &'a SimulationConfig,
    rng: &'a mut ChaCha8Rng,
}

impl<'a> RuleContext<'a> {
    pub(crate) fn new(
        grid: &'a Grid,
        index: u32,
        value: CellState,
        config: &'a SimulationConfig,
        rng: &'a mut ChaCha8Rng,
    ) -> Self {
        RuleContext {
            grid,
            index,
            value,
            config,
            rng,
        }
    }

    /// The cell's current value.
    pub fn value(&self) -> CellState {
        self.value
    }

    /// Sum of the eight neighbors' values, absent/unset counting as zero.
    pub fn neighbor_value(&self) -> u32 {
        self.grid.neighbor_value(self.index)
    }

    /// Whether any present neighbor satisfies the predicate.
    pub fn any_neighbor(&self, pred: impl Fn(CellState) -> bool) -> bool {
        self.grid.neighbor_states(self.index).any(pred)
    }

    /// The run's tuning parameters.
    pub fn config(&self) -> &SimulationConfig {
        self.config
    }

    /// One fresh uniform draw in [0, 1). Each call consumes randomness, so
    /// a rule that draws conditionally keeps runs byte-for-byte
    /// reproducible only if the condition is a pure function of the
    /// snapshot, which every rule here is.
    pub fn draw(&mut self) -> f64 {
        self.rng.random()
    }
}

/// A transition for one state: either an unconditional next value or a
/// computed one. `None` from the computed form means "no change".
#[derive(Debug, Clone, Copy)]
pub enum Rule {
    /// Unconditional transition to the given state.
    Const(CellState),
    /// Computed transition against the current snapshot.
    Compute(fn(&mut RuleContext<'_>) -> Option<CellState>),
}

impl Rule {
    pub(crate) fn apply(self, ctx: &mut RuleContext<'_>) -> Option<CellState> {
        match self {
            Rule::Const(next) => Some(next),
            Rule::Compute(rule) => rule(ctx),
        }
    }
}

/// Mapping from cell state to transition rule, one slot per state.
#[derive(Debug, Clone)]
pub struct RuleTable {
    slots: [Option<Rule>; 4],
}

impl RuleTable {
    /// A table with no rules registered.
    pub fn empty() -> Self {
        RuleTable { slots: [None; 4] }
    }

    /// Register or override the rule for a state.
    pub fn register(&mut self, state: CellState, rule: Rule) {
        self.slots[state.value() as usize] = Some(rule);
    }

    /// Register an unconditional transition, for states whose next value
    /// is a plain constant.
    pub fn register_const(&mut self, state: CellState, next: CellState) {
        self.register(state, Rule::Const(next));
    }

    /// The rule bound to a state, if any.
    pub fn get(&self, state: CellState) -> Option<Rule> {
        self.slots[state.value() as usize]
    }

    /// Every reachable state must have a rule before the engine runs;
    /// a missing entry is a fatal configuration error.
    pub fn validate_complete(&self) -> Result<(), ConfigError> {
        for state in CellState::ALL {
            if self.get(state).is_none() {
                return Err(ConfigError::MissingRule { state });
            }
        }
        Ok(())
    }

    /// The reference fire-spread ruleset.
    pub fn fire_rules() -> Self {
        let mut table = Self::empty();
        table.register_const(CellState::Burnt, CellState::Empty);
        table.register_const(CellState::Burning, CellState::Burnt);
        table.register(CellState::Growing, Rule::Compute(growing_rule));
        table.register(CellState::Empty, Rule::Compute(empty_rule));
        table
    }
}

/// Fuel catches from adjacent fire or ash, or occasionally dies off in a
/// crowded neighborhood with no fire nearby.
fn growing_rule(ctx: &mut RuleContext<'_>) -> Option<CellState> {
    let nv = f64::from(ctx.neighbor_value());
    let r = ctx.draw();
    if ctx.any_neighbor(CellState::is_fire_or_ash) {
        if r < ctx.config().ignition_factor * nv / 2.0 {
            return Some(CellState::Burning);
        }
    } else if r < ctx.config().dieoff_factor * nv {
        return Some(CellState::Empty);
    }
    None
}

/// Bare ground regrows next to live vegetation, but never while fire or
/// ash is adjacent.
fn empty_rule(ctx: &mut RuleContext<'_>) -> Option<CellState> {
    let nv = ctx.neighbor_value();
    if nv != 0
        && !ctx.any_neighbor(CellState::is_fire_or_ash)
        && ctx.draw() < ctx.config().regrowth_factor * f64::from(nv)
    {
        return Some(CellState::Growing);
    }
    None
}
