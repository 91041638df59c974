//! Contest state and core simulation types

use std::f32::consts::TAU;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::particles::ParticleField;
use super::shock::ImpactShock;
use crate::error::ContestError;
use crate::polar_to_cartesian;
use crate::roster::Entrant;
use crate::tuning::Tuning;

/// Size of the drawing surface, sampled once per contest
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Immutable bounding circle of one contest
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub center: Vec2,
    pub radius: f32,
}

impl Arena {
    /// Centred in the viewport, inset from its shorter side by `margin`
    pub fn from_viewport(viewport: Viewport, margin: f32) -> Self {
        Self {
            center: Vec2::new(viewport.width / 2.0, viewport.height / 2.0),
            radius: viewport.width.min(viewport.height) / 2.0 - margin,
        }
    }

    /// Distance from the centre plus `radius` is within the wall (with slack)
    pub fn contains(&self, pos: Vec2, radius: f32, epsilon: f32) -> bool {
        (pos - self.center).length() + radius <= self.radius + epsilon
    }
}

/// Alive/eliminated tag. Eliminated records stay in the contest so indices
/// and the full entrant list remain stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Alive,
    Eliminated { tick: u64 },
}

/// One participant's physical state plus its (read-only) entrant record
#[derive(Debug, Clone)]
pub struct Combatant {
    pub entrant: Entrant,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Collision radius (constant)
    pub radius: f32,
    pub mass: f32,
    /// Cosmetic spin
    pub rotation: f32,
    pub rotation_rate: f32,
    /// Pop-in render scale, 0 -> 1
    pub scale: f32,
    pub hp: i32,
    pub max_hp: i32,
    /// Timestamp (ms) of the last contact that dealt damage
    pub last_hit_at: Option<f64>,
    pub status: Status,
}

impl Combatant {
    pub fn new(entrant: Entrant, pos: Vec2, vel: Vec2, tuning: &Tuning) -> Self {
        Self {
            entrant,
            pos,
            vel,
            radius: tuning.combatant_radius,
            mass: tuning.combatant_mass,
            rotation: 0.0,
            rotation_rate: 0.0,
            scale: 0.0,
            hp: tuning.max_hp,
            max_hp: tuning.max_hp,
            last_hit_at: None,
            status: Status::Alive,
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.status == Status::Alive
    }

    /// Outside the re-hit window at `now` (ms)
    pub fn hit_ready(&self, now: f64, debounce_ms: f64) -> bool {
        self.last_hit_at.is_none_or(|at| now - at > debounce_ms)
    }

    /// Subtract damage, never going below zero
    pub fn take_damage(&mut self, amount: i32) {
        self.hp = (self.hp - amount.max(0)).max(0);
    }

    /// Remaining health as a fraction of max
    pub fn health_fraction(&self) -> f32 {
        (self.hp.max(0) as f32 / self.max_hp.max(1) as f32).min(1.0)
    }
}

/// Everything one contest owns: arena, combatants, effects, RNG
#[derive(Debug, Clone)]
pub struct Contest {
    pub arena: Arena,
    /// In roster order, never added to or removed from mid-contest
    pub combatants: Vec<Combatant>,
    pub particles: ParticleField,
    pub shock: ImpactShock,
    /// Ticks executed so far
    pub tick_count: u64,
    pub(crate) rng: Pcg32,
}

impl Contest {
    /// Build a contest from a finalized roster, seeding from OS entropy
    pub fn new(roster: &[Entrant], viewport: Viewport, tuning: &Tuning) -> Result<Self, ContestError> {
        Self::with_rng(roster, viewport, tuning, Pcg32::from_rng(&mut rand::rng()))
    }

    /// Build a contest with an explicit RNG
    pub fn with_rng(
        roster: &[Entrant],
        viewport: Viewport,
        tuning: &Tuning,
        mut rng: Pcg32,
    ) -> Result<Self, ContestError> {
        if roster.len() < 2 {
            return Err(ContestError::TooFewEntrants { got: roster.len() });
        }
        let arena = Arena::from_viewport(viewport, tuning.arena_margin);
        if !(arena.radius > tuning.combatant_radius) {
            return Err(ContestError::ViewportTooSmall {
                width: viewport.width,
                height: viewport.height,
            });
        }

        let spawn_radius = arena.radius * tuning.spawn_zone;
        let combatants = roster
            .iter()
            .map(|entrant| {
                // sqrt keeps the spawn density uniform over the disc
                let theta = rng.random::<f32>() * TAU;
                let r = rng.random::<f32>().sqrt() * spawn_radius;
                let pos = arena.center + polar_to_cartesian(r, theta);
                let vel = Vec2::new(
                    (rng.random::<f32>() - 0.5) * tuning.max_speed * 2.0,
                    (rng.random::<f32>() - 0.5) * tuning.max_speed * 2.0,
                );
                let mut combatant = Combatant::new(entrant.clone(), pos, vel, tuning);
                combatant.rotation_rate = (rng.random::<f32>() - 0.5) * 2.0 * tuning.max_rotation_rate;
                combatant
            })
            .collect();

        Ok(Self {
            arena,
            combatants,
            particles: ParticleField::new(tuning.max_particles),
            shock: ImpactShock::default(),
            tick_count: 0,
            rng,
        })
    }

    /// Build a contest from hand-placed combatants (no spawn randomisation)
    pub fn from_parts(arena: Arena, combatants: Vec<Combatant>, rng: Pcg32) -> Self {
        Self {
            arena,
            combatants,
            particles: ParticleField::new(None),
            shock: ImpactShock::default(),
            tick_count: 0,
            rng,
        }
    }

    pub fn alive_count(&self) -> usize {
        self.combatants.iter().filter(|c| c.is_alive()).count()
    }

    pub fn alive(&self) -> impl Iterator<Item = &Combatant> {
        self.combatants.iter().filter(|c| c.is_alive())
    }

    pub fn rng_mut(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }
}
