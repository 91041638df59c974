//! Renderer-facing copy of the contest after a tick
//!
//! Captured only between ticks, so the renderer never sees a half-updated
//! frame. `Serialize` for hosts that want JSON; the `*Instance` records are
//! `Pod` for direct GPU upload.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use serde::Serialize;

use super::scheduler::Phase;
use super::state::{Arena, Contest};
use crate::roster::ImageKey;

#[derive(Debug, Clone, Serialize)]
pub struct CombatantView {
    pub id: u32,
    pub name: String,
    pub color: u32,
    /// Present once the flag image has arrived
    pub image: Option<ImageKey>,
    pub pos: Vec2,
    pub radius: f32,
    pub scale: f32,
    pub rotation: f32,
    pub hp: i32,
    pub max_hp: i32,
    pub alive: bool,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ParticleView {
    pub pos: Vec2,
    pub color: u32,
    pub life: f32,
    pub size: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContestSnapshot {
    pub phase: Phase,
    pub tick: u64,
    pub arena: Arena,
    pub shock: f32,
    /// Every entrant in roster order, eliminated ones included
    pub combatants: Vec<CombatantView>,
    pub particles: Vec<ParticleView>,
}

impl ContestSnapshot {
    pub fn capture(contest: &Contest, phase: Phase) -> Self {
        Self {
            phase,
            tick: contest.tick_count,
            arena: contest.arena,
            shock: contest.shock.value(),
            combatants: contest
                .combatants
                .iter()
                .map(|c| CombatantView {
                    id: c.entrant.id,
                    name: c.entrant.name.clone(),
                    color: c.entrant.color,
                    image: c.entrant.image.get().cloned(),
                    pos: c.pos,
                    radius: c.radius,
                    scale: c.scale,
                    rotation: c.rotation,
                    hp: c.hp,
                    max_hp: c.max_hp,
                    alive: c.is_alive(),
                })
                .collect(),
            particles: contest
                .particles
                .iter()
                .map(|p| ParticleView {
                    pos: p.pos,
                    color: p.color,
                    life: p.life,
                    size: p.size,
                })
                .collect(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Instance data for live combatants
    pub fn combatant_instances(&self) -> Vec<CombatantInstance> {
        self.combatants
            .iter()
            .filter(|c| c.alive)
            .map(|c| CombatantInstance {
                position: c.pos.to_array(),
                radius: c.radius * c.scale,
                rotation: c.rotation,
                color: rgba(c.color, 1.0),
                health: (c.hp.max(0) as f32 / c.max_hp.max(1) as f32).min(1.0),
                _pad: [0.0; 3],
            })
            .collect()
    }

    /// Instance data for particles: shrinking and fading with life
    pub fn particle_instances(&self) -> Vec<ParticleInstance> {
        self.particles
            .iter()
            .map(|p| ParticleInstance {
                position: p.pos.to_array(),
                size: p.size * p.life,
                _pad: 0.0,
                color: rgba(p.color, p.life),
            })
            .collect()
    }
}

/// One combatant disc for the GPU
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct CombatantInstance {
    pub position: [f32; 2],
    /// Collision radius times intro scale
    pub radius: f32,
    pub rotation: f32,
    pub color: [f32; 4],
    /// 0..=1
    pub health: f32,
    pub _pad: [f32; 3],
}

/// One particle for the GPU
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct ParticleInstance {
    pub position: [f32; 2],
    pub size: f32,
    pub _pad: f32,
    pub color: [f32; 4],
}

/// 0xRRGGBB plus alpha to linear-ish float RGBA
pub fn rgba(color: u32, alpha: f32) -> [f32; 4] {
    [
        ((color >> 16) & 0xFF) as f32 / 255.0,
        ((color >> 8) & 0xFF) as f32 / 255.0,
        (color & 0xFF) as f32 / 255.0,
        alpha.clamp(0.0, 1.0),
    ]
}
