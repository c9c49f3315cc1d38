//! Scenario tests for presences: the reference backburner, relocation
//! bounds behavior, and registration-order visibility.

use brushfire_core::{
    CellState, Direction, Engine, Presence, PresenceContext, Rule, RuleTable, SimulationConfig,
};

#[ctor::ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn identity_rules() -> RuleTable {
    let mut table = RuleTable::empty();
    for state in CellState::ALL {
        table.register(state, Rule::Const(state));
    }
    table
}

#[test]
fn backburner_cuts_a_break_through_dense_fuel() {
    let mut engine = Engine::initialize(3, 3, 0).unwrap();
    {
        let grid = engine.grid_mut();
        for index in grid.cell_indices() {
            grid.set_value(index, CellState::Growing);
        }
    }
    engine.add_presence(1, 1).unwrap();

    // Observe torches the ring (fuel -> fire) and clears the center; the
    // same tick's evaluation then turns the fresh fire to ash.
    engine.step().unwrap();

    assert_eq!(engine.grid().value_at(1, 1), Some(CellState::Empty));
    for row in 0..3 {
        for col in 0..3 {
            if (row, col) == (1, 1) {
                continue;
            }
            assert_eq!(
                engine.grid().value_at(row, col),
                Some(CellState::Burnt),
                "torched fuel at ({row}, {col}) must be ash after the tick"
            );
        }
    }
}

#[test]
fn relocating_off_grid_is_silently_absorbed() {
    let mut engine = Engine::initialize(4, 4, 1).unwrap();
    let presence = engine.add_presence(0, 2).unwrap();

    assert!(!engine.relocate_presence(presence, Direction::North));
    assert_eq!(engine.presence_locale(presence), Some((0, 2)));

    // A valid step still works afterwards.
    assert!(engine.relocate_presence(presence, Direction::South));
    assert_eq!(engine.presence_locale(presence), Some((1, 2)));

    // Walk into the west edge: first step moves, later ones are absorbed.
    assert!(engine.relocate_presence(presence, Direction::West));
    assert!(engine.relocate_presence(presence, Direction::West));
    assert!(!engine.relocate_presence(presence, Direction::West));
    assert_eq!(engine.presence_locale(presence), Some((1, 0)));
}

#[test]
fn relocation_follows_diagonal_links_too() {
    let mut engine = Engine::initialize(3, 3, 1).unwrap();
    let presence = engine.add_presence(1, 1).unwrap();
    assert!(engine.relocate_presence(presence, Direction::NorthEast));
    assert_eq!(engine.presence_locale(presence), Some((0, 2)));
    assert!(!engine.relocate_presence(presence, Direction::NorthEast));
}

struct Marker(CellState);

impl Presence for Marker {
    fn act(&mut self, ctx: &mut PresenceContext<'_>) {
        ctx.set_value(self.0);
    }
}

/// Writes Burning if the previous presence already marked the shared cell,
/// Growing otherwise.
struct Echo;

impl Presence for Echo {
    fn act(&mut self, ctx: &mut PresenceContext<'_>) {
        if ctx.value() == Some(CellState::Burnt) {
            ctx.set_value(CellState::Burning);
        } else {
            ctx.set_value(CellState::Growing);
        }
    }
}

#[test]
fn presences_act_in_registration_order_and_see_prior_effects() {
    let mut engine =
        Engine::with_rules(SimulationConfig::default(), identity_rules(), 3, 3, 0).unwrap();
    engine
        .add_presence_with(1, 1, Box::new(Marker(CellState::Burnt)))
        .unwrap();
    engine.add_presence_with(1, 1, Box::new(Echo)).unwrap();
    assert_eq!(engine.presence_count(), 2);

    engine.step().unwrap();

    // Echo ran second and saw Marker's write.
    assert_eq!(engine.grid().value_at(1, 1), Some(CellState::Burning));
}

#[test]
fn presence_writes_feed_the_same_ticks_evaluation() {
    // Identity rules everywhere except Burnt -> Empty keeps the effect
    // isolated to the marked cell.
    let mut table = identity_rules();
    table.register(CellState::Burnt, Rule::Const(CellState::Empty));

    let mut engine = Engine::with_rules(SimulationConfig::default(), table, 3, 3, 0).unwrap();
    engine
        .add_presence_with(1, 1, Box::new(Marker(CellState::Burnt)))
        .unwrap();

    engine.step().unwrap();

    // Observe wrote Burnt; evaluation in the same tick burned it out.
    assert_eq!(engine.grid().value_at(1, 1), Some(CellState::Empty));
}
