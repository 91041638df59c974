//! Data-driven contest balance
//!
//! Every physics and effect constant the simulation reads comes through
//! [`Tuning`]. Defaults mirror [`crate::consts`]; any subset can be
//! overridden from JSON.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ContestError;

/// Which combatants must be outside their re-hit window before a contact
/// deals damage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebouncePolicy {
    /// At least one of the pair is ready (a fresh hit on one side is enough)
    #[default]
    EitherReady,
    /// Both of the pair must be ready
    BothReady,
}

impl DebouncePolicy {
    pub fn allows(&self, a_ready: bool, b_ready: bool) -> bool {
        match self {
            DebouncePolicy::EitherReady => a_ready || b_ready,
            DebouncePolicy::BothReady => a_ready && b_ready,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Combatants ===
    pub combatant_radius: f32,
    pub combatant_mass: f32,
    pub max_hp: i32,
    pub min_speed: f32,
    pub max_speed: f32,
    pub min_speed_factor: f32,
    pub max_speed_factor: f32,
    pub intro_scale_step: f32,
    pub max_rotation_rate: f32,

    // === Contact ===
    pub restitution: f32,
    pub hit_debounce_ms: f64,
    pub debounce_policy: DebouncePolicy,
    /// Inclusive lower bound of per-contact damage
    pub damage_min: i32,
    /// Exclusive upper bound of per-contact damage
    pub damage_max: i32,
    pub contact_burst: usize,
    pub contact_burst_speed: f32,
    pub contact_shock: f32,
    pub contact_color: u32,

    // === Elimination ===
    pub death_burst: usize,
    pub death_burst_speed: f32,
    pub death_shock: f32,

    // === Particles ===
    pub particle_drag: f32,
    pub particle_gravity: f32,
    pub particle_decay: f32,
    pub spark_chance: f32,
    pub spark_color: u32,
    /// Live particle cap with oldest-first eviction; `None` = unbounded
    pub max_particles: Option<usize>,

    // === Impact shock ===
    pub shock_decay: f32,
    pub shock_cutoff: f32,

    // === Arena ===
    pub spawn_zone: f32,
    pub arena_margin: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            combatant_radius: COMBATANT_RADIUS,
            combatant_mass: COMBATANT_MASS,
            max_hp: MAX_HP,
            min_speed: MIN_SPEED,
            max_speed: MAX_SPEED,
            min_speed_factor: MIN_SPEED_FACTOR,
            max_speed_factor: MAX_SPEED_FACTOR,
            intro_scale_step: INTRO_SCALE_STEP,
            max_rotation_rate: MAX_ROTATION_RATE,

            restitution: RESTITUTION,
            hit_debounce_ms: HIT_DEBOUNCE_MS,
            debounce_policy: DebouncePolicy::default(),
            damage_min: DAMAGE_MIN,
            damage_max: DAMAGE_MAX,
            contact_burst: CONTACT_BURST,
            contact_burst_speed: CONTACT_BURST_SPEED,
            contact_shock: CONTACT_SHOCK,
            contact_color: CONTACT_COLOR,

            death_burst: DEATH_BURST,
            death_burst_speed: DEATH_BURST_SPEED,
            death_shock: DEATH_SHOCK,

            particle_drag: PARTICLE_DRAG,
            particle_gravity: PARTICLE_GRAVITY,
            particle_decay: PARTICLE_DECAY,
            spark_chance: SPARK_CHANCE,
            spark_color: SPARK_COLOR,
            max_particles: None,

            shock_decay: SHOCK_DECAY,
            shock_cutoff: SHOCK_CUTOFF,

            spawn_zone: SPAWN_ZONE,
            arena_margin: ARENA_MARGIN,
        }
    }
}

impl Tuning {
    /// Parse from JSON (missing fields keep their defaults) and validate
    pub fn from_json(json: &str) -> Result<Self, ContestError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Lowest speed a live combatant leaves integration with
    #[inline]
    pub fn speed_floor(&self) -> f32 {
        self.min_speed * self.min_speed_factor
    }

    /// Highest speed a live combatant leaves integration with
    #[inline]
    pub fn speed_ceiling(&self) -> f32 {
        self.max_speed * self.max_speed_factor
    }

    pub fn validate(&self) -> Result<(), ContestError> {
        fn invalid(field: &'static str, reason: &'static str) -> Result<(), ContestError> {
            Err(ContestError::InvalidTuning { field, reason })
        }

        if !(self.combatant_radius > 0.0) {
            return invalid("combatant_radius", "must be positive");
        }
        if !(self.combatant_mass > 0.0) {
            return invalid("combatant_mass", "must be positive");
        }
        if self.max_hp <= 0 {
            return invalid("max_hp", "must be positive");
        }
        if !(self.speed_floor() > 0.0) {
            return invalid("min_speed", "speed floor must be positive");
        }
        if self.speed_ceiling() < self.speed_floor() {
            return invalid("max_speed", "speed ceiling is below the floor");
        }
        if !(0.0..=1.0).contains(&self.restitution) {
            return invalid("restitution", "must be within [0, 1]");
        }
        if !(self.hit_debounce_ms >= 0.0) {
            return invalid("hit_debounce_ms", "must not be negative");
        }
        if self.damage_min < 0 || self.damage_max <= self.damage_min {
            return invalid("damage_max", "damage range is empty");
        }
        if !(self.particle_decay > 0.0) {
            return invalid("particle_decay", "must be positive");
        }
        if !(0.0..1.0).contains(&self.shock_decay) {
            return invalid("shock_decay", "must be within [0, 1)");
        }
        if !(self.spawn_zone > 0.0 && self.spawn_zone <= 1.0) {
            return invalid("spawn_zone", "must be within (0, 1]");
        }
        Ok(())
    }
}
