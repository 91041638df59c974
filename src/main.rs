//! Flag Battle entry point
//!
//! Native: runs one headless contest between quick-add bots and prints the
//! winner. Usage: `flag-battle [entrants] [tuning.json]`.
//! Web: the page drives `ArenaLoop` from the library instead.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use flag_battle::platform::{FRAME_MS, run_headless};
    use flag_battle::sim::{Scheduler, Viewport};
    use flag_battle::{Roster, Settings, Tuning};

    env_logger::init();
    log::info!("Flag Battle (native, headless) starting...");

    let mut args = std::env::args().skip(1);
    let entrants: usize = args.next().and_then(|s| s.parse().ok()).unwrap_or(8);
    let tuning = match args.next() {
        Some(path) => match std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|json| Tuning::from_json(&json).map_err(|e| e.to_string()))
        {
            Ok(tuning) => tuning,
            Err(e) => {
                eprintln!("Could not load tuning from {path}: {e}");
                std::process::exit(2);
            }
        },
        None => Tuning::default(),
    };

    let mut rng = rand::rng();
    let mut roster = Roster::new();
    for _ in 0..entrants {
        roster.quick_add(&mut rng);
    }

    let mut scheduler = Scheduler::new(tuning, Settings::default());
    if let Err(e) = scheduler.start(roster.entrants(), Viewport::new(1280.0, 720.0)) {
        eprintln!("Cannot start contest: {e}");
        std::process::exit(1);
    }

    // Ten minutes of frames at 60 Hz
    match run_headless(&mut scheduler, FRAME_MS, 36_000) {
        Some(winner) => {
            let ticks = scheduler.contest().map(|c| c.tick_count).unwrap_or(0);
            println!(
                "🏆 {} (#{}) wins after {} ticks ({:.1}s)",
                winner.name,
                winner.id,
                ticks,
                ticks as f64 * FRAME_MS / 1000.0
            );
        }
        None => println!("No winner"),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::init, this is just to satisfy the compiler
}
