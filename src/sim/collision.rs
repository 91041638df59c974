//! Collision detection and response
//!
//! Two kinds of contact: a combatant against the arena wall (mirror bounce,
//! handled during motion) and combatant against combatant (separation,
//! elastic impulse, contact damage).

use glam::Vec2;
use rand::Rng;

use super::particles::ParticleField;
use super::shock::ImpactShock;
use super::state::{Arena, Combatant};
use crate::direction_or;
use crate::tuning::Tuning;

/// Normal used when two centres coincide exactly
const COINCIDENT_NORMAL: Vec2 = Vec2::X;

/// Result of an overlap check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResult {
    /// Unit contact normal. For the wall it points inward (toward the arena
    /// centre); for a pair it points from the first body to the second.
    pub normal: Vec2,
    /// Overlap depth along the normal
    pub penetration: f32,
}

/// Check a circle against the arena wall
pub fn wall_contact(pos: Vec2, radius: f32, arena: &Arena) -> Option<CollisionResult> {
    let offset = pos - arena.center;
    let dist = offset.length();
    let penetration = dist + radius - arena.radius;
    if penetration > 0.0 {
        Some(CollisionResult {
            normal: -direction_or(offset, COINCIDENT_NORMAL),
            penetration,
        })
    } else {
        None
    }
}

/// Check two circles for overlap
pub fn circle_contact(a_pos: Vec2, a_radius: f32, b_pos: Vec2, b_radius: f32) -> Option<CollisionResult> {
    let delta = b_pos - a_pos;
    let dist = delta.length();
    let min_dist = a_radius + b_radius;
    if dist < min_dist {
        Some(CollisionResult {
            normal: direction_or(delta, COINCIDENT_NORMAL),
            penetration: min_dist - dist,
        })
    } else {
        None
    }
}

/// Push both bodies apart and, if they are closing, exchange an elastic
/// impulse. Returns true when an impulse was applied.
pub fn separate_and_bounce(a: &mut Combatant, b: &mut Combatant, contact: &CollisionResult, restitution: f32) -> bool {
    let n = contact.normal;

    // Each side moves by the other's share of the mass: heavier moves less
    let total_mass = a.mass + b.mass;
    a.pos -= n * contact.penetration * (b.mass / total_mass);
    b.pos += n * contact.penetration * (a.mass / total_mass);

    let vel_along_normal = (b.vel - a.vel).dot(n);
    if vel_along_normal >= 0.0 {
        return false;
    }

    let j = -(1.0 + restitution) * vel_along_normal / (1.0 / a.mass + 1.0 / b.mass);
    a.vel -= n * (j / a.mass);
    b.vel += n * (j / b.mass);
    true
}

/// A damaging contact between two combatants
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Combatant indices
    pub a: usize,
    pub b: usize,
    /// Midpoint of the two centres after separation
    pub point: Vec2,
    /// Damage dealt to `a` and `b`
    pub damage: (i32, i32),
}

/// Resolve one overlapping pair at time `now` (ms). Returns the contact
/// midpoint and the damage dealt to each side, if the contact dealt damage.
pub fn resolve_pair<R: Rng + ?Sized>(
    a: &mut Combatant,
    b: &mut Combatant,
    now: f64,
    tuning: &Tuning,
    rng: &mut R,
) -> Option<(Vec2, (i32, i32))> {
    let contact = circle_contact(a.pos, a.radius, b.pos, b.radius)?;
    if !separate_and_bounce(a, b, &contact, tuning.restitution) {
        return None;
    }

    let a_ready = a.hit_ready(now, tuning.hit_debounce_ms);
    let b_ready = b.hit_ready(now, tuning.hit_debounce_ms);
    if !tuning.debounce_policy.allows(a_ready, b_ready) {
        return None;
    }

    a.last_hit_at = Some(now);
    b.last_hit_at = Some(now);

    let damage = (
        rng.random_range(tuning.damage_min..tuning.damage_max),
        rng.random_range(tuning.damage_min..tuning.damage_max),
    );
    a.take_damage(damage.0);
    b.take_damage(damage.1);

    Some(((a.pos + b.pos) * 0.5, damage))
}

/// Mutable borrow of two distinct elements, `i < j`
fn pair_mut<T>(items: &mut [T], i: usize, j: usize) -> (&mut T, &mut T) {
    debug_assert!(i < j);
    let (head, tail) = items.split_at_mut(j);
    (&mut head[i], &mut tail[0])
}

/// Resolve every overlapping pair of live combatants for this tick.
///
/// Pairs are visited in index order. Each damaging contact spawns a spark
/// burst at its midpoint and bumps the impact shock.
pub fn resolve_collisions<R: Rng + ?Sized>(
    combatants: &mut [Combatant],
    particles: &mut ParticleField,
    shock: &mut ImpactShock,
    now: f64,
    tuning: &Tuning,
    rng: &mut R,
) -> Vec<Contact> {
    let mut contacts = Vec::new();

    for i in 0..combatants.len() {
        if !combatants[i].is_alive() {
            continue;
        }
        for j in (i + 1)..combatants.len() {
            if !combatants[j].is_alive() {
                continue;
            }
            let (a, b) = pair_mut(combatants, i, j);
            if let Some((point, damage)) = resolve_pair(a, b, now, tuning, rng) {
                particles.spawn(
                    point,
                    tuning.contact_color,
                    tuning.contact_burst,
                    tuning.contact_burst_speed,
                    tuning,
                    rng,
                );
                shock.trigger(tuning.contact_shock);
                contacts.push(Contact {
                    a: i,
                    b: j,
                    point,
                    damage,
                });
            }
        }
    }

    contacts
}
