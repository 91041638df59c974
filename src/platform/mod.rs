//! Platform frame drivers
//!
//! The scheduler is driven by whoever owns the frame clock:
//! - native: [`run_headless`] steps a synthetic clock as fast as it can
//! - browser: `web::ArenaLoop` rides `requestAnimationFrame`

#[cfg(target_arch = "wasm32")]
pub mod web;

use rand_pcg::Pcg32;

use crate::error::ContestError;
use crate::roster::Entrant;
use crate::sim::{FrameOutcome, Scheduler, Viewport};

/// Nominal frame length at 60 Hz (ms)
pub const FRAME_MS: f64 = 1000.0 / 60.0;

/// Drive a started scheduler with a synthetic clock until a winner emerges,
/// the scheduler stops, or `max_frames` have run. The clock starts at
/// `frame_ms` so the first frame sits one frame after the origin.
pub fn run_headless(scheduler: &mut Scheduler, frame_ms: f64, max_frames: u64) -> Option<Entrant> {
    for frame in 1..=max_frames {
        match scheduler.on_frame(frame as f64 * frame_ms) {
            FrameOutcome::Winner { winner, .. } => return Some(winner),
            FrameOutcome::Continue(_) => {}
            FrameOutcome::Skipped => return None,
        }
    }
    log::warn!("No winner after {} frames", max_frames);
    None
}

/// Start a new contest, then tear down the old loop's pending frame via
/// `cancel_pending`. A refused start leaves the running contest and its
/// frame alone, so the old loop keeps ticking.
pub fn restart(
    scheduler: &mut Scheduler,
    roster: &[Entrant],
    viewport: Viewport,
    rng: Pcg32,
    cancel_pending: impl FnOnce(),
) -> Result<(), ContestError> {
    scheduler.start_with_rng(roster, viewport, rng)?;
    cancel_pending();
    Ok(())
}

/// Holds a driver's frame callback. Replaced callbacks are retired rather
/// than dropped, since the replacement may happen from inside the callback
/// being replaced; the driver releases them on its next frame.
#[derive(Debug)]
pub struct CallbackSlot<C> {
    current: Option<C>,
    retired: Vec<C>,
}

impl<C> CallbackSlot<C> {
    pub fn new() -> Self {
        Self {
            current: None,
            retired: Vec::new(),
        }
    }

    pub fn install(&mut self, callback: C) {
        if let Some(previous) = self.current.replace(callback) {
            self.retired.push(previous);
        }
    }

    pub fn current(&self) -> Option<&C> {
        self.current.as_ref()
    }

    /// Drop every retired callback. Only call once none of them can be running.
    pub fn release_retired(&mut self) -> usize {
        let released = self.retired.len();
        self.retired.clear();
        released
    }

    pub fn retired_len(&self) -> usize {
        self.retired.len()
    }
}

impl<C> Default for CallbackSlot<C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::Entrant;
    use crate::sim::{Phase, Viewport};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_headless_contest_finishes() {
        let roster: Vec<Entrant> = (1..=4).map(|i| Entrant::new(i, format!("E{i}"), "xx", 0)).collect();
        let mut scheduler = Scheduler::default();
        scheduler
            .start_with_rng(&roster, Viewport::new(400.0, 400.0), Pcg32::seed_from_u64(99))
            .expect("start");

        let winner = run_headless(&mut scheduler, FRAME_MS, 200_000);
        let alive: Vec<u32> = scheduler
            .contest()
            .map(|c| c.alive().map(|c| c.entrant.id).collect())
            .unwrap_or_default();

        match winner {
            Some(winner) => {
                assert_eq!(scheduler.phase(), Phase::Halted);
                assert_eq!(alive, vec![winner.id]);
                assert_eq!(scheduler.winner(), Some(&winner));
            }
            // Only possible if the last two fell on the same tick
            None => assert!(alive.is_empty()),
        }
    }

    #[test]
    fn test_refused_restart_keeps_pending_frame() {
        use std::cell::Cell;

        let roster: Vec<Entrant> = (1..=3).map(|i| Entrant::new(i, format!("E{i}"), "xx", 0)).collect();
        let mut scheduler = Scheduler::default();
        scheduler
            .start_with_rng(&roster, Viewport::new(800.0, 600.0), Pcg32::seed_from_u64(1))
            .expect("start");
        scheduler.on_frame(16.0);

        let cancelled = Cell::new(false);
        let refused = restart(
            &mut scheduler,
            &roster,
            Viewport::new(10.0, 10.0),
            Pcg32::seed_from_u64(2),
            || cancelled.set(true),
        );
        assert!(matches!(refused, Err(ContestError::ViewportTooSmall { .. })));
        assert!(!cancelled.get(), "old frame still pending");
        assert!(scheduler.is_running());
        assert!(matches!(scheduler.on_frame(32.0), FrameOutcome::Continue(_)));

        restart(
            &mut scheduler,
            &roster,
            Viewport::new(800.0, 600.0),
            Pcg32::seed_from_u64(3),
            || cancelled.set(true),
        )
        .expect("restart");
        assert!(cancelled.get());
        assert_eq!(scheduler.contest().map(|c| c.tick_count), Some(0));
    }

    #[test]
    fn test_callback_slot_retires_replaced() {
        let mut slot = CallbackSlot::new();
        slot.install("first");
        assert_eq!(slot.retired_len(), 0);

        // Two restarts before the next frame keep both old callbacks alive
        slot.install("second");
        slot.install("third");
        assert_eq!(slot.current(), Some(&"third"));
        assert_eq!(slot.retired_len(), 2);

        assert_eq!(slot.release_retired(), 2);
        assert_eq!(slot.retired_len(), 0);
        assert_eq!(slot.current(), Some(&"third"));
    }

    #[test]
    fn test_headless_idle_scheduler() {
        let mut scheduler = Scheduler::default();
        assert!(run_headless(&mut scheduler, FRAME_MS, 10).is_none());
    }
}
