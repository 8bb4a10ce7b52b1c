//! Browser adapter
//!
//! Exposes one `WebGame` handle to JavaScript. The page forwards key events
//! and reads JSON snapshots and notifications; the animation-frame loop is
//! owned here and only ever registered once.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use wasm_bindgen::prelude::*;

use crate::notify::{self, Notification};
use crate::settings::{GameMode, Settings};
use crate::sim::{ArenaState, Command, GameEvent, GamePhase, GameState, LoopDriver};
use crate::tuning::Difficulty;

/// Either mini-game behind one driver
enum Session {
    Runner(LoopDriver<GameState>),
    Arena(LoopDriver<ArenaState>),
}

impl Session {
    fn new(settings: &Settings, seed: u64) -> Result<Self, JsValue> {
        let session = match settings.mode {
            GameMode::Arena => {
                let tuning = settings.arena_tuning().map_err(to_js)?;
                Session::Arena(LoopDriver::new(ArenaState::new(seed, tuning)))
            }
            GameMode::Classic | GameMode::Realms => {
                let tuning = settings.tuning().map_err(to_js)?;
                Session::Runner(LoopDriver::new(GameState::new(seed, tuning)))
            }
        };
        Ok(session)
    }

    fn phase(&self) -> GamePhase {
        match self {
            Session::Runner(d) => d.phase(),
            Session::Arena(d) => d.phase(),
        }
    }

    fn start(&mut self) {
        match self {
            Session::Runner(d) => d.start(),
            Session::Arena(d) => d.start(),
        }
    }

    fn stop(&mut self) {
        match self {
            Session::Runner(d) => d.stop(),
            Session::Arena(d) => d.stop(),
        }
    }

    fn reset(&mut self) {
        match self {
            Session::Runner(d) => d.reset(),
            Session::Arena(d) => d.reset(),
        }
    }

    fn frame(&mut self, elapsed: f32) {
        match self {
            Session::Runner(d) => d.frame(elapsed),
            Session::Arena(d) => d.frame(elapsed),
        };
    }

    fn drain_events(&mut self) -> Vec<GameEvent> {
        match self {
            Session::Runner(d) => d.drain_events(),
            Session::Arena(d) => d.drain_events(),
        }
    }

    fn key(&mut self, key: &str, pressed: bool) -> bool {
        match self {
            Session::Runner(d) => match Command::from_key(key) {
                Some(command) if pressed => {
                    d.command(command);
                    true
                }
                Some(_) => true,
                None => false,
            },
            Session::Arena(d) => d.input_mut().set_key(key, pressed),
        }
    }

    fn snapshot_json(&self) -> Result<String, serde_json::Error> {
        match self {
            Session::Runner(d) => serde_json::to_string(&d.snapshot()),
            Session::Arena(d) => serde_json::to_string(&d.snapshot()),
        }
    }
}

struct Inner {
    settings: Settings,
    session: Session,
    notifications: Vec<Notification>,
    last_time: Option<f64>,
    raf_handle: Option<i32>,
    frame_callback: Option<Closure<dyn FnMut(f64)>>,
}

impl Inner {
    fn on_frame(&mut self, time: f64) {
        // First frame after (re)start only records the clock
        let elapsed = self
            .last_time
            .map(|last| ((time - last) / 1000.0) as f32)
            .unwrap_or(0.0);
        self.last_time = Some(time);
        self.session.frame(elapsed);
        self.flush_events();
    }

    fn flush_events(&mut self) {
        let events = self.session.drain_events();
        notify::dispatch(&mut self.notifications, &events);
    }

    fn schedule(&mut self) {
        if self.raf_handle.is_some() {
            return;
        }
        let (Some(window), Some(callback)) = (web_sys::window(), self.frame_callback.as_ref())
        else {
            return;
        };
        match window.request_animation_frame(callback.as_ref().unchecked_ref()) {
            Ok(handle) => self.raf_handle = Some(handle),
            Err(err) => log::warn!("requestAnimationFrame failed: {err:?}"),
        }
    }

    fn cancel(&mut self) {
        if let Some(handle) = self.raf_handle.take()
            && let Some(window) = web_sys::window()
        {
            let _ = window.cancel_animation_frame(handle);
        }
        self.last_time = None;
    }
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Game handle owned by the page
#[wasm_bindgen]
pub struct WebGame {
    inner: Rc<RefCell<Inner>>,
}

#[wasm_bindgen]
impl WebGame {
    /// Create a session from stored settings. `mode` and `difficulty`
    /// override them when given.
    #[wasm_bindgen(constructor)]
    pub fn new(mode: Option<String>, difficulty: Option<String>) -> Result<WebGame, JsValue> {
        let mut settings = Settings::load();
        if let Some(mode) = mode.as_deref().and_then(GameMode::parse) {
            settings.mode = mode;
        }
        if let Some(difficulty) = difficulty.as_deref().and_then(Difficulty::parse) {
            settings.difficulty = difficulty;
        }
        let seed = settings.seed_or(js_sys::Date::now() as u64);
        log::info!(
            "New {} session (difficulty {}, seed {})",
            settings.mode.as_str(),
            settings.difficulty.as_str(),
            seed
        );

        let inner = Rc::new(RefCell::new(Inner {
            session: Session::new(&settings, seed)?,
            settings,
            notifications: Vec::new(),
            last_time: None,
            raf_handle: None,
            frame_callback: None,
        }));

        // The callback holds a weak handle so dropping the game frees it
        let weak: Weak<RefCell<Inner>> = Rc::downgrade(&inner);
        let callback = Closure::<dyn FnMut(f64)>::new(move |time: f64| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let mut inner = inner.borrow_mut();
            inner.raf_handle = None;
            inner.on_frame(time);
            if inner.session.phase() == GamePhase::Running {
                inner.schedule();
            }
        });
        inner.borrow_mut().frame_callback = Some(callback);

        Ok(WebGame { inner })
    }

    pub fn start(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.session.start();
        inner.flush_events();
        if inner.session.phase() == GamePhase::Running {
            inner.schedule();
        }
    }

    pub fn stop(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.cancel();
        inner.session.stop();
        inner.flush_events();
    }

    pub fn reset(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.cancel();
        inner.session.reset();
        inner.flush_events();
    }

    pub fn phase(&self) -> String {
        format!("{:?}", self.inner.borrow().session.phase()).to_lowercase()
    }

    /// Returns true when the key is bound, so the page can preventDefault
    pub fn key_down(&self, key: &str) -> bool {
        self.inner.borrow_mut().session.key(key, true)
    }

    pub fn key_up(&self, key: &str) -> bool {
        self.inner.borrow_mut().session.key(key, false)
    }

    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        self.inner.borrow().session.snapshot_json().map_err(to_js)
    }

    /// `{"showHud": bool, "reducedMotion": bool}` for the page's renderer
    pub fn display_hints_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.inner.borrow().settings.display_hints()).map_err(to_js)
    }

    /// Toggle a display preference and persist it
    pub fn set_display_hints(&self, show_hud: bool, reduced_motion: bool) {
        let mut inner = self.inner.borrow_mut();
        inner.settings.show_hud = show_hud;
        inner.settings.reduced_motion = reduced_motion;
        inner.settings.save();
    }

    /// Notifications produced since the last call, as a JSON array
    pub fn take_notifications_json(&self) -> Result<String, JsValue> {
        let pending = std::mem::take(&mut self.inner.borrow_mut().notifications);
        serde_json::to_string(&pending).map_err(to_js)
    }
}

impl Drop for WebGame {
    fn drop(&mut self) {
        if let Ok(mut inner) = self.inner.try_borrow_mut() {
            inner.cancel();
            inner.frame_callback = None;
        }
    }
}

#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialised".into());
    }
}
