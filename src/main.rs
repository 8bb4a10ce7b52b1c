//! Eclipse Realms entry point
//!
//! On the web the library's `wasm_main` does the setup. Natively this runs a
//! headless demo: the autopilot plays one session and the notifications are
//! written to the log.
//!
//! Usage: `eclipse-realms [settings.json]`

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::time::{SystemTime, UNIX_EPOCH};

    use eclipse_realms::Settings;
    use eclipse_realms::notify::{self, LogNotifier};
    use eclipse_realms::settings::{GameMode, SettingsError};
    use eclipse_realms::sim::{
        ArenaInput, ArenaState, Autopilot, GamePhase, GameState, LoopDriver,
    };

    /// Display frame length the demo pretends to run at
    const FRAME_DT: f32 = 1.0 / 60.0;
    /// Give up after this much simulated time
    const MAX_SECONDS: f32 = 300.0;

    pub fn run() -> Result<(), SettingsError> {
        let settings = match std::env::args().nth(1) {
            Some(path) => Settings::load_from(&path)?,
            None => Settings::default(),
        };
        let clock = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();
        let seed = settings.seed_or(clock);
        log::info!(
            "Eclipse Realms (native) starting: mode {}, seed {}",
            settings.mode.as_str(),
            seed
        );

        match settings.mode {
            GameMode::Arena => run_arena(ArenaState::new(seed, settings.arena_tuning()?)),
            GameMode::Classic | GameMode::Realms => {
                run_runner(GameState::new(seed, settings.tuning()?))
            }
        }
        Ok(())
    }

    fn run_runner(state: GameState) {
        let autopilot = Autopilot::default();
        let mut driver = LoopDriver::new(state);
        let mut notifier = LogNotifier;
        driver.start();

        let mut elapsed = 0.0;
        while driver.is_running() && elapsed < MAX_SECONDS {
            *driver.input_mut() = autopilot.decide(driver.sim());
            driver.frame(FRAME_DT);
            notify::dispatch(&mut notifier, &driver.drain_events());
            elapsed += FRAME_DT;
        }

        let actor = &driver.sim().actor;
        log::info!(
            "Runner finished ({:?}): score {}, coins {}, distance {:.1}, health {}",
            driver.phase(),
            actor.score,
            actor.coins,
            actor.distance,
            actor.health
        );
    }

    /// Chase the nearest orb and fire when a wraith gets close
    fn arena_intent(state: &ArenaState) -> ArenaInput {
        let player = state.player;
        let mut input = ArenaInput::default();

        let threatened = state
            .enemies
            .iter()
            .any(|e| e.pos.distance(player) < state.tuning.attack_radius);
        input.attack = threatened;

        let target = state
            .pickups
            .iter()
            .map(|p| p.pos)
            .min_by(|a, b| a.distance(player).total_cmp(&b.distance(player)));
        if let Some(target) = target {
            let delta = target - player;
            input.left = delta.x < -2.0;
            input.right = delta.x > 2.0;
            input.up = delta.y < -2.0;
            input.down = delta.y > 2.0;
        }
        input
    }

    fn run_arena(state: ArenaState) {
        let mut driver = LoopDriver::new(state);
        let mut notifier = LogNotifier;
        driver.start();

        let mut elapsed = 0.0;
        while driver.phase() == GamePhase::Running && elapsed < MAX_SECONDS {
            *driver.input_mut() = arena_intent(driver.sim());
            driver.frame(FRAME_DT);
            notify::dispatch(&mut notifier, &driver.drain_events());
            elapsed += FRAME_DT;
        }

        let state = driver.sim();
        log::info!(
            "Arena finished ({:?}): score {}, level {}, health {}",
            driver.phase(),
            state.score,
            state.level,
            state.health
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(err) = headless::run() {
        log::error!("{err}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main in the library
}
