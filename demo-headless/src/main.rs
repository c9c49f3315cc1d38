use brushfire_core::{CellState, Direction, Engine, SimulationConfig};
use clap::Parser;

/// Forest-fire automaton demo with configurable parameters
#[derive(Parser, Debug)]
#[command(name = "brushfire-demo")]
#[command(about = "Headless forest-fire automaton demo", long_about = None)]
struct Args {
    /// Grid width in columns
    #[arg(short, long, default_value_t = 60)]
    width: u32,

    /// Grid height in rows
    #[arg(long, default_value_t = 30)]
    height: u32,

    /// Random seed (same seed reproduces the same run)
    #[arg(short, long, default_value_t = 0)]
    seed: u64,

    /// Number of ticks to run
    #[arg(short, long, default_value_t = 200)]
    ticks: u64,

    /// Report interval in ticks
    #[arg(short, long, default_value_t = 25)]
    report_interval: u64,

    /// Number of backburner presences to place
    #[arg(short, long, default_value_t = 1)]
    presences: u32,

    /// Print the full grid at each report interval
    #[arg(long)]
    show_grid: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    println!("=== Brushfire Demo ===\n");

    let mut engine = Engine::new(
        SimulationConfig::default(),
        args.width,
        args.height,
        args.seed,
    )?;
    println!(
        "Created {}x{} grid with seed {}",
        args.width, args.height, args.seed
    );

    // Spread the presences across the middle row; they march east and the
    // relocation call absorbs the step once they reach the edge.
    let mut handles = Vec::new();
    for i in 0..args.presences {
        let col = (i + 1) * args.width / (args.presences + 1);
        let row = args.height / 2;
        handles.push(engine.add_presence(row, col)?);
    }
    println!("Placed {} backburner presence(s)\n", handles.len());

    let mut total_changes = 0usize;
    for _ in 0..args.ticks {
        let set = engine.step()?;
        total_changes += set.len();

        for &handle in &handles {
            engine.relocate_presence(handle, Direction::East);
        }

        if set.tick % args.report_interval == 0 {
            let census = engine.grid().census();
            println!(
                "tick {:>5}: {:>4} changed | {} growing, {} empty, {} burning, {} burnt",
                set.tick,
                set.len(),
                census[CellState::Growing.value() as usize],
                census[CellState::Empty.value() as usize],
                census[CellState::Burning.value() as usize],
                census[CellState::Burnt.value() as usize],
            );
            if args.show_grid {
                println!("{}", engine.grid());
            }
        }
    }

    println!("\nFinal grid after {} ticks:\n{}", engine.tick(), engine.grid());
    println!("Total cell changes: {total_changes}");

    Ok(())
}
