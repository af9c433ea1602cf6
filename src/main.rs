//! Maze Chase entry point
//!
//! Natively this runs a headless autopilot game:
//! `maze-chase [seed] [seconds] [tuning.json]`

#[cfg(not(target_arch = "wasm32"))]
const HIGHSCORE_FILE: &str = "maze-chase-highscore.json";

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use maze_chase::consts::SIM_DT_MS;
    use maze_chase::{FileStore, GameEvent, Session, Tuning};

    env_logger::init();
    log::info!("Maze Chase (headless) starting...");

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse::<u64>().ok());
    let seconds = args.next().and_then(|s| s.parse::<f64>().ok()).unwrap_or(120.0);
    let mut tuning = match args.next() {
        Some(path) => Tuning::load_or_default(path),
        None => Tuning::default(),
    };
    if let Some(seed) = seed {
        tuning.seed = seed;
    }

    let mut session = Session::new(FileStore::new(HIGHSCORE_FILE), tuning);
    session.input_mut().autopilot = true;

    let frames = (seconds * 1000.0 / SIM_DT_MS).ceil() as u64;
    let mut dots = 0u32;
    let mut ghosts_eaten = 0u32;
    for _ in 0..frames {
        for event in session.update(SIM_DT_MS) {
            match event {
                GameEvent::DotEaten | GameEvent::PowerPelletEaten => dots += 1,
                GameEvent::GhostEaten { .. } => ghosts_eaten += 1,
                _ => {}
            }
        }
        if session.state().is_over() {
            break;
        }
    }

    let state = session.state();
    println!("Score:        {}", state.score);
    println!("High score:   {}", state.high_score.max(state.score));
    println!("Level:        {}", state.level);
    println!("Lives left:   {}", state.lives);
    println!("Dots eaten:   {}", dots);
    println!("Ghosts eaten: {}", ghosts_eaten);
    println!("Game time:    {:.1}s", state.game_time_ms / 1000.0);
    println!("Phase:        {:?}", state.phase);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser hosts drive `Session` directly; nothing to do here
}
