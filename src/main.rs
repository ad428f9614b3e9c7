//! Forklift Round entry point
//!
//! Plays one round headlessly against the sandbox warehouse and prints the
//! final readout as JSON.
//!
//! Usage: forklift-round [settings.json] [seed]

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::Path;
    use std::process;

    use forklift_round::consts::SIM_DT;
    use forklift_round::sim::{GameSignal, InputSwitch, RoundInput, RoundSession};
    use forklift_round::{RoundSettings, Sandbox};

    /// Crates scattered for the demo round
    const DEMO_PICKUPS: u32 = 6;
    const DEFAULT_SEED: u64 = 2024;
    /// Give up after this much simulated time
    const MAX_ROUND_SECONDS: f32 = 300.0;

    pub fn run() {
        let mut args = std::env::args().skip(1);
        let settings = args
            .next()
            .map(|path| RoundSettings::load(Path::new(&path)))
            .unwrap_or_default();
        let seed = args
            .next()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_SEED);

        let mut world = Sandbox::scatter(seed, DEMO_PICKUPS);
        let inputs: Vec<Box<dyn InputSwitch>> = vec![Box::new(world.carrier())];
        let mut session = match RoundSession::new(&world, &settings, inputs) {
            Ok(session) => session,
            Err(e) => {
                log::error!("Could not start round: {}", e);
                process::exit(1);
            }
        };
        log::info!("Round initialized with seed: {}", seed);

        let game_flow = session.subscribe();
        session.start();

        let input = RoundInput::default();
        let max_ticks = (MAX_ROUND_SECONDS / SIM_DT) as u64;
        let ticks_per_second = (1.0 / SIM_DT).round() as u64;
        let mut won = false;

        for tick in 0..max_ticks {
            let contacts = world.step(SIM_DT);
            session.step(&world, &contacts, &input, SIM_DT);

            for signal in session.drain(game_flow) {
                match signal {
                    GameSignal::PreRoundStarted => log::info!("Game flow: pre-round"),
                    GameSignal::RoundStarted => log::info!("Game flow: round started"),
                    GameSignal::RoundWon => {
                        log::info!("Game flow: win");
                        won = true;
                    }
                    GameSignal::QuitToMenu => log::info!("Game flow: quit to menu"),
                }
            }

            if tick % ticks_per_second == 0 {
                let readout = session.readout();
                log::debug!(
                    "{:?} {} pickups {}",
                    readout.state,
                    readout.clock_text(),
                    readout.pickups_text()
                );
            }

            if won {
                break;
            }
        }

        session.unsubscribe(game_flow);

        if !won {
            log::warn!("Round not won after {:.0}s of simulation", MAX_ROUND_SECONDS);
        }

        match serde_json::to_string_pretty(&session.readout()) {
            Ok(json) => println!("{}", json),
            Err(e) => log::error!("Failed to serialize readout: {}", e),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Forklift Round (headless) starting...");
    native::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No browser front end; the library is embedded by the host game instead
}
