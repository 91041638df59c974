//! Contest lifecycle: Idle -> Running -> Halted
//!
//! The scheduler owns the contest for its whole lifetime. A frame driver
//! calls [`Scheduler::on_frame`] once per rendered frame; the winner comes
//! back from exactly one of those calls and every later call is a no-op.

use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::snapshot::ContestSnapshot;
use super::state::{Contest, Viewport};
use super::tick::{ContestEvent, tick};
use crate::error::ContestError;
use crate::roster::Entrant;
use crate::settings::Settings;
use crate::tuning::Tuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// No contest yet
    Idle,
    /// Ticking once per frame
    Running,
    /// Winner found or stopped from outside; no more ticks
    Halted,
}

/// Result of one frame callback
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    /// Not running; nothing happened
    Skipped,
    /// Ticked; schedule the next frame
    Continue(Vec<ContestEvent>),
    /// Ticked and a winner emerged; do not schedule again. `events` is the
    /// final tick's report, ending in [`ContestEvent::Winner`].
    Winner { winner: Entrant, events: Vec<ContestEvent> },
}

#[derive(Debug)]
pub struct Scheduler {
    phase: Phase,
    tuning: Tuning,
    settings: Settings,
    contest: Option<Contest>,
    winner: Option<Entrant>,
}

impl Scheduler {
    pub fn new(tuning: Tuning, settings: Settings) -> Self {
        Self {
            phase: Phase::Idle,
            tuning,
            settings,
            contest: None,
            winner: None,
        }
    }

    /// Start a fresh contest, discarding any previous one. On error the
    /// scheduler is left exactly as it was.
    pub fn start(&mut self, roster: &[Entrant], viewport: Viewport) -> Result<(), ContestError> {
        let contest = Contest::new(roster, viewport, &self.tuning);
        self.begin(contest)
    }

    /// [`Scheduler::start`] with an explicit RNG
    pub fn start_with_rng(&mut self, roster: &[Entrant], viewport: Viewport, rng: Pcg32) -> Result<(), ContestError> {
        let contest = Contest::with_rng(roster, viewport, &self.tuning, rng);
        self.begin(contest)
    }

    /// Run an already built contest
    pub fn start_contest(&mut self, contest: Contest) -> Result<(), ContestError> {
        self.begin(Ok(contest))
    }

    fn begin(&mut self, contest: Result<Contest, ContestError>) -> Result<(), ContestError> {
        let mut contest = match self.tuning.validate().and(contest) {
            Ok(contest) => contest,
            Err(err) => {
                log::warn!("Contest not started: {}", err);
                return Err(err);
            }
        };
        if contest.combatants.len() < 2 {
            let err = ContestError::TooFewEntrants {
                got: contest.combatants.len(),
            };
            log::warn!("Contest not started: {}", err);
            return Err(err);
        }

        contest.particles.set_cap(self.particle_cap());
        log::info!(
            "Contest started: {} entrants, arena r={:.0}",
            contest.combatants.len(),
            contest.arena.radius
        );
        self.contest = Some(contest);
        self.winner = None;
        self.phase = Phase::Running;
        Ok(())
    }

    /// Tighter of the tuning cap and the quality preset cap
    fn particle_cap(&self) -> Option<usize> {
        match (self.tuning.max_particles, self.settings.max_particles()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Frame callback at time `now` (ms)
    pub fn on_frame(&mut self, now: f64) -> FrameOutcome {
        if self.phase != Phase::Running {
            return FrameOutcome::Skipped;
        }
        let Some(contest) = self.contest.as_mut() else {
            return FrameOutcome::Skipped;
        };

        let report = tick(contest, &self.tuning, now);
        match report.winner {
            Some(index) => {
                let winner = contest.combatants[index].entrant.clone();
                log::info!("🏆 {} wins after {} ticks", winner.name, contest.tick_count);
                self.phase = Phase::Halted;
                self.winner = Some(winner.clone());
                FrameOutcome::Winner {
                    winner,
                    events: report.events,
                }
            }
            None => FrameOutcome::Continue(report.events),
        }
    }

    /// Abandon the contest. State stays readable until the next start.
    pub fn stop(&mut self) {
        if self.phase == Phase::Running {
            log::info!("Contest stopped");
            self.phase = Phase::Halted;
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn winner(&self) -> Option<&Entrant> {
        self.winner.as_ref()
    }

    pub fn contest(&self) -> Option<&Contest> {
        self.contest.as_ref()
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Read-only view for the renderer
    pub fn snapshot(&self) -> Option<ContestSnapshot> {
        self.contest
            .as_ref()
            .map(|contest| ContestSnapshot::capture(contest, self.phase))
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(Tuning::default(), Settings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::Entrant;
    use rand::SeedableRng;

    fn roster(n: u32) -> Vec<Entrant> {
        (1..=n).map(|i| Entrant::new(i, format!("E{i}"), "xx", 0)).collect()
    }

    #[test]
    fn test_refuses_small_roster() {
        let mut scheduler = Scheduler::default();
        assert!(scheduler.start(&roster(1), Viewport::new(800.0, 600.0)).is_err());
        assert_eq!(scheduler.phase(), Phase::Idle);
        assert!(scheduler.snapshot().is_none());
        assert_eq!(scheduler.on_frame(16.0), FrameOutcome::Skipped);
    }

    #[test]
    fn test_start_and_stop() {
        let mut scheduler = Scheduler::default();
        scheduler
            .start_with_rng(&roster(3), Viewport::new(800.0, 600.0), Pcg32::seed_from_u64(1))
            .expect("start");
        assert_eq!(scheduler.phase(), Phase::Running);
        assert!(matches!(scheduler.on_frame(16.0), FrameOutcome::Continue(_)));

        scheduler.stop();
        assert_eq!(scheduler.phase(), Phase::Halted);
        let ticks = scheduler.contest().map(|c| c.tick_count);
        assert_eq!(scheduler.on_frame(32.0), FrameOutcome::Skipped);
        assert_eq!(scheduler.contest().map(|c| c.tick_count), ticks);
    }

    #[test]
    fn test_restart_is_full_reset() {
        let mut scheduler = Scheduler::default();
        let viewport = Viewport::new(800.0, 600.0);
        scheduler
            .start_with_rng(&roster(3), viewport, Pcg32::seed_from_u64(1))
            .expect("start");
        for frame in 0..10 {
            scheduler.on_frame(frame as f64 * 16.0);
        }
        scheduler.stop();

        scheduler
            .start_with_rng(&roster(5), viewport, Pcg32::seed_from_u64(2))
            .expect("restart");
        let contest = scheduler.contest().expect("contest");
        assert_eq!(scheduler.phase(), Phase::Running);
        assert_eq!(contest.tick_count, 0);
        assert_eq!(contest.combatants.len(), 5);
        assert!(contest.particles.is_empty());
        assert!(scheduler.winner().is_none());
    }

    #[test]
    fn test_failed_restart_keeps_previous_contest() {
        let mut scheduler = Scheduler::default();
        scheduler
            .start_with_rng(&roster(3), Viewport::new(800.0, 600.0), Pcg32::seed_from_u64(1))
            .expect("start");
        assert!(scheduler.start(&roster(3), Viewport::new(10.0, 10.0)).is_err());
        assert_eq!(scheduler.phase(), Phase::Running);
        assert_eq!(scheduler.contest().map(|c| c.combatants.len()), Some(3));
    }

    #[test]
    fn test_refuses_invalid_tuning() {
        let tuning = Tuning {
            damage_min: 10,
            damage_max: 10,
            ..Tuning::default()
        };
        let mut scheduler = Scheduler::new(tuning, Settings::default());
        let err = scheduler
            .start_with_rng(&roster(2), Viewport::new(800.0, 600.0), Pcg32::seed_from_u64(1))
            .unwrap_err();
        assert!(matches!(err, ContestError::InvalidTuning { field: "damage_max", .. }));
        assert_eq!(scheduler.phase(), Phase::Idle);

        let contest = Contest::with_rng(&roster(2), Viewport::new(800.0, 600.0), &Tuning::default(), Pcg32::seed_from_u64(1))
            .expect("contest");
        assert!(scheduler.start_contest(contest).is_err());
        assert_eq!(scheduler.phase(), Phase::Idle);
        assert_eq!(scheduler.on_frame(16.0), FrameOutcome::Skipped);
    }

    #[test]
    fn test_winning_frame_carries_final_events() {
        use crate::sim::state::{Arena, Combatant};
        use glam::Vec2;

        let tuning = Tuning::default();
        let mut combatants: Vec<Combatant> = [(Vec2::new(395.0, 400.0), 5.0), (Vec2::new(445.0, 400.0), -5.0)]
            .into_iter()
            .zip(roster(2))
            .map(|((pos, vx), entrant)| {
                let mut c = Combatant::new(entrant, pos, Vec2::new(vx, 0.0), &tuning);
                c.scale = 1.0;
                c
            })
            .collect();
        combatants[1].hp = 1;
        let arena = Arena {
            center: Vec2::new(400.0, 400.0),
            radius: 380.0,
        };
        let mut scheduler = Scheduler::default();
        scheduler
            .start_contest(Contest::from_parts(arena, combatants, Pcg32::seed_from_u64(4)))
            .expect("start");

        match scheduler.on_frame(1_000.0) {
            FrameOutcome::Winner { winner, events } => {
                assert_eq!(winner.id, 1);
                assert!(matches!(events.first(), Some(ContestEvent::Contact { a: 0, b: 1, .. })));
                assert!(events.iter().any(|e| matches!(e, ContestEvent::Eliminated { index: 1, .. })));
                assert_eq!(events.last(), Some(&ContestEvent::Winner { index: 0 }));
            }
            other => panic!("expected a winner, got {:?}", other),
        }
    }

    #[test]
    fn test_quality_cap_applies() {
        let settings = Settings {
            quality: crate::settings::QualityPreset::Low,
            ..Settings::default()
        };
        let tuning = Tuning {
            max_particles: Some(250),
            ..Tuning::default()
        };
        let mut scheduler = Scheduler::new(tuning, settings);
        scheduler.start(&roster(2), Viewport::new(800.0, 600.0)).expect("start");
        assert_eq!(scheduler.contest().and_then(|c| c.particles.cap()), Some(100));
    }
}
