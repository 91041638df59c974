//! Transient visual particles
//!
//! Purely cosmetic: spawned in bursts by contacts and eliminations, then
//! drifted, dragged, pulled down and faded until they expire. Nothing in the
//! contest outcome reads them.

use std::collections::VecDeque;
use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::polar_to_cartesian;
use crate::tuning::Tuning;

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// 0xRRGGBB
    pub color: u32,
    /// 1.0 at spawn, removed once <= 0
    pub life: f32,
    /// Base size; drawn scaled by life
    pub size: f32,
}

/// Owns every live particle, oldest first
#[derive(Debug, Clone, Default)]
pub struct ParticleField {
    particles: VecDeque<Particle>,
    /// Oldest-first eviction above this many live particles
    cap: Option<usize>,
}

impl ParticleField {
    pub fn new(cap: Option<usize>) -> Self {
        Self {
            particles: VecDeque::new(),
            cap,
        }
    }

    pub fn set_cap(&mut self, cap: Option<usize>) {
        self.cap = cap;
        self.enforce_cap();
    }

    pub fn cap(&self) -> Option<usize> {
        self.cap
    }

    /// Emit `count` particles at `pos` in random directions. A share of them
    /// (`spark_chance`) are spark-coloured whatever `color` is.
    pub fn spawn<R: Rng + ?Sized>(
        &mut self,
        pos: Vec2,
        color: u32,
        count: usize,
        speed_mult: f32,
        tuning: &Tuning,
        rng: &mut R,
    ) {
        for _ in 0..count {
            let angle = rng.random::<f32>() * TAU;
            let speed = (rng.random::<f32>() * 4.0 + 2.0) * speed_mult;
            let is_spark = rng.random::<f32>() < tuning.spark_chance;
            self.particles.push_back(Particle {
                pos,
                vel: polar_to_cartesian(speed, angle),
                color: if is_spark { tuning.spark_color } else { color },
                life: 1.0,
                size: rng.random::<f32>() * 4.0 + 2.0,
            });
        }
        self.enforce_cap();
    }

    /// Advance every particle one tick and drop the expired ones
    pub fn update(&mut self, tuning: &Tuning) {
        for p in self.particles.iter_mut() {
            p.pos += p.vel;
            p.vel *= tuning.particle_drag;
            // Screen space: +y is down
            p.vel.y += tuning.particle_gravity;
            p.life -= tuning.particle_decay;
        }
        self.particles.retain(|p| p.life > 0.0);
    }

    fn enforce_cap(&mut self) {
        if let Some(cap) = self.cap {
            let excess = self.particles.len().saturating_sub(cap);
            self.particles.drain(..excess);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }
}
