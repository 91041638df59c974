//! One simulation tick
//!
//! Runs once per rendered frame, to completion:
//! shock decay, motion, pair collisions, wall re-check, eliminations,
//! particles, winner.

use glam::Vec2;
use serde::Serialize;

use super::collision::resolve_collisions;
use super::elimination::{reap, sole_survivor};
use super::motion::{confine, integrate};
use super::state::Contest;
use crate::tuning::Tuning;

/// Something collaborators (audio, UI) may want to react to
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum ContestEvent {
    /// Two combatants traded damage
    Contact {
        a: usize,
        b: usize,
        point: Vec2,
        damage: (i32, i32),
    },
    /// A combatant ran out of health
    Eliminated { index: usize, at: Vec2 },
    /// Exactly one combatant is left
    Winner { index: usize },
}

/// What happened during one tick
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    pub events: Vec<ContestEvent>,
    /// Index of the sole survivor, once one exists
    pub winner: Option<usize>,
}

/// Advance the contest by one tick at frame time `now` (ms)
pub fn tick(contest: &mut Contest, tuning: &Tuning, now: f64) -> TickReport {
    let Contest {
        arena,
        combatants,
        particles,
        shock,
        tick_count,
        rng,
    } = contest;

    *tick_count += 1;
    let mut report = TickReport::default();

    shock.decay(tuning.shock_decay, tuning.shock_cutoff);

    for combatant in combatants.iter_mut() {
        integrate(combatant, arena, tuning);
    }

    let contacts = resolve_collisions(combatants, particles, shock, now, tuning, rng);
    report
        .events
        .extend(contacts.into_iter().map(|c| ContestEvent::Contact {
            a: c.a,
            b: c.b,
            point: c.point,
            damage: c.damage,
        }));
    for combatant in combatants.iter_mut() {
        confine(combatant, arena);
    }

    let alive_before = combatants.iter().filter(|c| c.is_alive()).count();
    for index in reap(combatants, particles, shock, *tick_count, tuning, rng) {
        report.events.push(ContestEvent::Eliminated {
            index,
            at: combatants[index].pos,
        });
    }

    particles.update(tuning);

    report.winner = sole_survivor(combatants);
    if let Some(index) = report.winner {
        report.events.push(ContestEvent::Winner { index });
    } else if alive_before > 0 && combatants.iter().all(|c| !c.is_alive()) {
        log::warn!("Last {} combatants fell on the same tick; nobody is left to win", alive_before);
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::Entrant;
    use crate::sim::state::{Arena, Combatant, Status};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn contest(bodies: &[(Vec2, Vec2)]) -> Contest {
        let tuning = Tuning::default();
        let combatants = bodies
            .iter()
            .enumerate()
            .map(|(i, &(pos, vel))| {
                let mut c = Combatant::new(Entrant::new(i as u32 + 1, format!("E{i}"), "xx", 0xAB_CD_EF), pos, vel, &tuning);
                c.scale = 1.0;
                c
            })
            .collect();
        Contest::from_parts(
            Arena {
                center: Vec2::new(400.0, 400.0),
                radius: 380.0,
            },
            combatants,
            Pcg32::seed_from_u64(17),
        )
    }

    #[test]
    fn test_tick_moves_everyone() {
        let tuning = Tuning::default();
        let mut c = contest(&[
            (Vec2::new(200.0, 400.0), Vec2::new(3.0, 0.0)),
            (Vec2::new(600.0, 400.0), Vec2::new(0.0, 3.0)),
        ]);
        let report = tick(&mut c, &tuning, 16.0);

        assert!(report.events.is_empty());
        assert_eq!(report.winner, None);
        assert_eq!(c.tick_count, 1);
        assert_eq!(c.combatants[0].pos, Vec2::new(203.0, 400.0));
        assert_eq!(c.combatants[1].pos, Vec2::new(600.0, 403.0));
    }

    #[test]
    fn test_fatal_contact_same_tick() {
        let tuning = Tuning::default();
        let mut c = contest(&[
            (Vec2::new(395.0, 400.0), Vec2::new(5.0, 0.0)),
            (Vec2::new(445.0, 400.0), Vec2::new(-5.0, 0.0)),
            (Vec2::new(400.0, 200.0), Vec2::new(3.0, 0.0)),
        ]);
        c.combatants[0].hp = 1;
        c.shock.trigger(1.0);

        let report = tick(&mut c, &tuning, 1000.0);

        assert_eq!(c.combatants[0].status, Status::Eliminated { tick: 1 });
        assert_eq!(c.combatants[0].hp, 0);
        assert!(c.combatants[1].is_alive());
        assert_eq!(c.shock.value(), 20.0);
        // 5 sparks + 40 burst, none expired yet
        assert_eq!(c.particles.len(), 45);
        let last_pos = c.combatants[0].pos;
        assert!(report.events.contains(&ContestEvent::Eliminated { index: 0, at: last_pos }));
        assert_eq!(report.winner, None, "two are still standing");
    }

    #[test]
    fn test_winner_reported() {
        let tuning = Tuning::default();
        let mut c = contest(&[
            (Vec2::new(395.0, 400.0), Vec2::new(5.0, 0.0)),
            (Vec2::new(445.0, 400.0), Vec2::new(-5.0, 0.0)),
        ]);
        c.combatants[1].hp = 1;

        let report = tick(&mut c, &tuning, 1000.0);
        assert_eq!(report.winner, Some(0));
        assert_eq!(report.events.last(), Some(&ContestEvent::Winner { index: 0 }));
    }

    #[test]
    fn test_double_knockout_has_no_winner() {
        let tuning = Tuning::default();
        let mut c = contest(&[
            (Vec2::new(395.0, 400.0), Vec2::new(5.0, 0.0)),
            (Vec2::new(445.0, 400.0), Vec2::new(-5.0, 0.0)),
        ]);
        c.combatants[0].hp = 1;
        c.combatants[1].hp = 1;

        let report = tick(&mut c, &tuning, 1000.0);
        assert_eq!(c.alive_count(), 0);
        assert_eq!(report.winner, None);
    }
}
