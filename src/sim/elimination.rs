//! Eliminations and the last-one-standing check

use rand::Rng;

use super::particles::ParticleField;
use super::shock::ImpactShock;
use super::state::{Combatant, Status};
use crate::tuning::Tuning;

/// Mark every live combatant with no health left as eliminated.
///
/// Each one explodes into a burst in its own colour and slams the impact
/// shock. Already eliminated records are never revisited. Returns the indices
/// eliminated this tick.
pub fn reap<R: Rng + ?Sized>(
    combatants: &mut [Combatant],
    particles: &mut ParticleField,
    shock: &mut ImpactShock,
    tick: u64,
    tuning: &Tuning,
    rng: &mut R,
) -> Vec<usize> {
    let mut eliminated = Vec::new();

    for (idx, combatant) in combatants.iter_mut().enumerate() {
        if !combatant.is_alive() || combatant.hp > 0 {
            continue;
        }
        combatant.status = Status::Eliminated { tick };
        shock.trigger(tuning.death_shock);
        particles.spawn(
            combatant.pos,
            combatant.entrant.color,
            tuning.death_burst,
            tuning.death_burst_speed,
            tuning,
            rng,
        );
        log::debug!("{} eliminated on tick {}", combatant.entrant.name, tick);
        eliminated.push(idx);
    }

    eliminated
}

/// Index of the sole survivor, if the contest started with more than one
/// combatant and exactly one is still alive
pub fn sole_survivor(combatants: &[Combatant]) -> Option<usize> {
    if combatants.len() < 2 {
        return None;
    }
    let mut alive = combatants
        .iter()
        .enumerate()
        .filter(|(_, c)| c.is_alive())
        .map(|(idx, _)| idx);
    match (alive.next(), alive.next()) {
        (Some(idx), None) => Some(idx),
        _ => None,
    }
}
