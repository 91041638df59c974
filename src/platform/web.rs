//! Browser frame driver
//!
//! Exposed to the page as `ArenaLoop`. Each animation frame runs exactly one
//! scheduler tick; the next frame is requested only while the contest is
//! running. `stop` cancels the pending frame so nothing fires afterwards.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use rand::SeedableRng;
use rand_pcg::Pcg32;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use super::{CallbackSlot, restart};
use crate::roster::{ImageKey, Roster};
use crate::settings::Settings;
use crate::sim::{FrameOutcome, Scheduler, Viewport};
use crate::tuning::Tuning;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Flag Battle engine loaded");
}

struct LoopInner {
    scheduler: RefCell<Scheduler>,
    roster: RefCell<Roster>,
    /// Id of the pending requestAnimationFrame, if any
    frame_id: Cell<Option<i32>>,
    callback: RefCell<CallbackSlot<Closure<dyn FnMut(f64)>>>,
    on_winner: RefCell<Option<js_sys::Function>>,
}

#[wasm_bindgen]
pub struct ArenaLoop {
    inner: Rc<LoopInner>,
}

#[wasm_bindgen]
impl ArenaLoop {
    /// `tuning_json` / `settings_json` may be empty for defaults
    #[wasm_bindgen(constructor)]
    pub fn new(tuning_json: &str, settings_json: &str) -> Result<ArenaLoop, JsValue> {
        let tuning = if tuning_json.trim().is_empty() {
            Tuning::default()
        } else {
            Tuning::from_json(tuning_json).map_err(|e| JsValue::from_str(&e.to_string()))?
        };
        let settings = if settings_json.trim().is_empty() {
            Settings::default()
        } else {
            Settings::from_json(settings_json).map_err(|e| JsValue::from_str(&e.to_string()))?
        };

        Ok(ArenaLoop {
            inner: Rc::new(LoopInner {
                scheduler: RefCell::new(Scheduler::new(tuning, settings)),
                roster: RefCell::new(Roster::new()),
                frame_id: Cell::new(None),
                callback: RefCell::new(CallbackSlot::new()),
                on_winner: RefCell::new(None),
            }),
        })
    }

    /// Register an entrant; returns its id
    pub fn add_entrant(&self, name: &str, code: &str) -> u32 {
        self.inner
            .roster
            .borrow_mut()
            .add(name, code, &mut rand::rng())
    }

    /// Register a random bot; returns its id
    pub fn quick_add(&self) -> u32 {
        self.inner.roster.borrow_mut().quick_add(&mut rand::rng())
    }

    /// Flag CDN URL for an entrant, for the page to preload
    pub fn flag_url(&self, id: u32) -> Option<String> {
        self.inner.roster.borrow().get(id).map(|e| e.flag_url())
    }

    /// The page finished loading an entrant's flag. Safe at any time,
    /// including mid-contest.
    pub fn attach_image(&self, id: u32, key: String) -> bool {
        self.inner.roster.borrow().attach_image(id, ImageKey(key))
    }

    /// Start a new contest sized to the viewport; `on_winner` is called once
    /// with the winning entrant id. A refused start leaves the current contest
    /// and its pending frame untouched. Safe to call from `on_winner`.
    pub fn start(&self, width: f32, height: f32, on_winner: js_sys::Function) -> Result<(), JsValue> {
        let entrants = self.inner.roster.borrow().entrants().to_vec();
        let rng = Pcg32::from_rng(&mut rand::rng());
        restart(
            &mut self.inner.scheduler.borrow_mut(),
            &entrants,
            Viewport::new(width, height),
            rng,
            || self.cancel_pending(),
        )
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

        *self.inner.on_winner.borrow_mut() = Some(on_winner);

        let weak = Rc::downgrade(&self.inner);
        let closure = Closure::<dyn FnMut(f64)>::new(move |time: f64| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            inner.frame_id.set(None);
            // The previous loop's closure is no longer on the stack
            inner.callback.borrow_mut().release_retired();

            let outcome = inner.scheduler.borrow_mut().on_frame(time);
            match outcome {
                FrameOutcome::Continue(_) => request_frame(&inner),
                FrameOutcome::Winner { winner, .. } => {
                    // Cloned so the page may call back into this loop
                    let callback = inner.on_winner.borrow().clone();
                    if let Some(callback) = callback {
                        if let Err(e) = callback.call1(&JsValue::NULL, &JsValue::from(winner.id)) {
                            log::error!("Winner callback failed: {:?}", e);
                        }
                    }
                }
                FrameOutcome::Skipped => {}
            }
        });
        self.inner.callback.borrow_mut().install(closure);

        request_frame(&self.inner);
        Ok(())
    }

    /// Abandon the contest and release the pending frame
    pub fn stop(&self) {
        self.cancel_pending();
        self.inner.scheduler.borrow_mut().stop();
    }

    /// Current snapshot as JSON, with this frame's camera shake offset
    pub fn snapshot_json(&self) -> Option<String> {
        let scheduler = self.inner.scheduler.borrow();
        let snapshot = scheduler.snapshot()?;
        let offset = scheduler
            .settings()
            .shake_offset(snapshot.shock, &mut rand::rng());
        let value = serde_json::json!({
            "snapshot": snapshot,
            "shake": [offset.x, offset.y],
        });
        Some(value.to_string())
    }

    pub fn is_running(&self) -> bool {
        self.inner.scheduler.borrow().is_running()
    }
}

impl ArenaLoop {
    fn cancel_pending(&self) {
        if let Some(id) = self.inner.frame_id.take() {
            if let Some(window) = web_sys::window() {
                if let Err(e) = window.cancel_animation_frame(id) {
                    log::warn!("cancelAnimationFrame failed: {:?}", e);
                }
            }
        }
    }
}

impl Drop for ArenaLoop {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

fn request_frame(inner: &Rc<LoopInner>) {
    let Some(window) = web_sys::window() else {
        log::error!("No window; contest cannot run");
        return;
    };
    let slot = inner.callback.borrow();
    let Some(callback) = slot.current() else {
        return;
    };
    match window.request_animation_frame(callback.as_ref().unchecked_ref()) {
        Ok(id) => inner.frame_id.set(Some(id)),
        Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
    }
}
