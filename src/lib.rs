//! Flag Battle - last flag standing in a circular arena
//!
//! Core modules:
//! - `sim`: Contest simulation (motion, collisions, damage, eliminations, effects)
//! - `roster`: Entrant identity/display records handed to the simulation
//! - `tuning`: Data-driven physics and balance constants
//! - `settings`: Presentation preferences (particle quality, camera shake)
//! - `platform`: Frame drivers (headless native loop, browser animation frames)

pub mod error;
pub mod platform;
pub mod roster;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::ContestError;
pub use roster::{Entrant, ImageKey, ImageSlot, Roster};
pub use settings::{QualityPreset, Settings};
pub use tuning::{DebouncePolicy, Tuning};

use glam::Vec2;

/// Default contest constants. Units are pixels and pixels-per-frame; one
/// simulation tick runs per rendered frame.
pub mod consts {
    /// Combatant collision radius
    pub const COMBATANT_RADIUS: f32 = 30.0;
    pub const COMBATANT_MASS: f32 = 1.0;
    pub const MAX_HP: i32 = 100;

    /// Speed baselines (per tick)
    pub const MIN_SPEED: f32 = 2.0;
    pub const MAX_SPEED: f32 = 5.0;
    /// Floor = MIN_SPEED * factor, keeps the brawl lively
    pub const MIN_SPEED_FACTOR: f32 = 1.2;
    /// Ceiling = MAX_SPEED * factor
    pub const MAX_SPEED_FACTOR: f32 = 1.5;

    /// Pop-in animation step per tick (render scale 0 -> 1)
    pub const INTRO_SCALE_STEP: f32 = 0.05;
    /// Max rotation rate magnitude (radians/tick)
    pub const MAX_ROTATION_RATE: f32 = 0.05;

    /// Combatant-combatant restitution
    pub const RESTITUTION: f32 = 0.9;
    /// Re-hit window per combatant (milliseconds)
    pub const HIT_DEBOUNCE_MS: f64 = 100.0;
    /// Contact damage range [min, max)
    pub const DAMAGE_MIN: i32 = 5;
    pub const DAMAGE_MAX: i32 = 20;

    /// Contact spark burst
    pub const CONTACT_BURST: usize = 5;
    pub const CONTACT_BURST_SPEED: f32 = 0.5;
    pub const CONTACT_SHOCK: f32 = 3.0;
    pub const CONTACT_COLOR: u32 = 0xFF_FF_FF;

    /// Elimination burst
    pub const DEATH_BURST: usize = 40;
    pub const DEATH_BURST_SPEED: f32 = 1.5;
    pub const DEATH_SHOCK: f32 = 20.0;

    /// Particle integration
    pub const PARTICLE_DRAG: f32 = 0.92;
    /// Downward (screen +y) acceleration per tick
    pub const PARTICLE_GRAVITY: f32 = 0.05;
    pub const PARTICLE_DECAY: f32 = 0.03;
    pub const SPARK_CHANCE: f32 = 0.3;
    /// Amber
    pub const SPARK_COLOR: u32 = 0xFB_BF_24;

    /// Impact shock decay per tick and snap-to-zero cutoff
    pub const SHOCK_DECAY: f32 = 0.9;
    pub const SHOCK_CUTOFF: f32 = 0.5;

    /// Entrants spawn within this fraction of the arena radius
    pub const SPAWN_ZONE: f32 = 0.6;
    /// Gap between the arena wall and the nearest viewport edge
    pub const ARENA_MARGIN: f32 = 20.0;
}

/// Lengths below this are treated as zero when normalizing
pub const DEGENERATE_LENGTH: f32 = 1e-6;

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Unit vector along `v`, or `fallback` when `v` is (near) zero or not finite
#[inline]
pub fn direction_or(v: Vec2, fallback: Vec2) -> Vec2 {
    let len = v.length();
    if len.is_finite() && len > DEGENERATE_LENGTH {
        v / len
    } else {
        fallback
    }
}

/// Mirror reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Rescale `velocity` so its length lies in `[floor, ceiling]`.
///
/// A zero (or non-finite) velocity has no direction to keep, so it is sent
/// along +x at the floor speed.
pub fn clamp_speed(velocity: Vec2, floor: f32, ceiling: f32) -> Vec2 {
    let speed = velocity.length();
    if !speed.is_finite() || speed <= DEGENERATE_LENGTH {
        return Vec2::X * floor;
    }
    if speed < floor {
        velocity * (floor / speed)
    } else if speed > ceiling {
        velocity * (ceiling / speed)
    } else {
        velocity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reflect_velocity() {
        let reflected = reflect_velocity(Vec2::new(3.0, -2.0), Vec2::X);
        assert!((reflected.x + 3.0).abs() < 1e-6);
        assert!((reflected.y + 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_clamp_speed_bounds() {
        let slow = clamp_speed(Vec2::new(0.0, 1.0), 2.4, 7.5);
        assert!((slow.length() - 2.4).abs() < 1e-5);
        assert!(slow.x.abs() < 1e-6, "direction is preserved");

        let fast = clamp_speed(Vec2::new(30.0, 40.0), 2.4, 7.5);
        assert!((fast.length() - 7.5).abs() < 1e-5);

        let fine = Vec2::new(3.0, 4.0);
        assert_eq!(clamp_speed(fine, 2.4, 7.5), fine);
    }

    #[test]
    fn test_clamp_speed_zero_velocity() {
        let v = clamp_speed(Vec2::ZERO, 2.4, 7.5);
        assert!(v.is_finite());
        assert!((v.length() - 2.4).abs() < 1e-6);
    }

    #[test]
    fn test_direction_or_fallback() {
        assert_eq!(direction_or(Vec2::ZERO, Vec2::Y), Vec2::Y);
        assert_eq!(direction_or(Vec2::new(f32::NAN, 0.0), Vec2::Y), Vec2::Y);
        let d = direction_or(Vec2::new(0.0, -4.0), Vec2::Y);
        assert!((d - Vec2::NEG_Y).length() < 1e-6);
    }
}
