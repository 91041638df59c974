//! Presentation preferences
//!
//! None of these change the contest outcome; they bound the particle load and
//! decide how the impact shock turns into camera motion.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ContestError;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    Medium,
    #[default]
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Live particle cap for this preset (`None` = unbounded)
    pub fn max_particles(&self) -> Option<usize> {
        match self {
            QualityPreset::Low => Some(100),
            QualityPreset::Medium => Some(500),
            QualityPreset::High => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,
    /// Particle effects (bursts on contact/elimination)
    pub particles: bool,
    /// Camera shake on impacts
    pub screen_shake: bool,
    /// Reduced motion (suppresses shake)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::High,
            particles: true,
            screen_shake: true,
            reduced_motion: false,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, ContestError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Effective particle cap
    pub fn max_particles(&self) -> Option<usize> {
        if !self.particles {
            Some(0)
        } else {
            self.quality.max_particles()
        }
    }

    /// Camera offset for the current impact shock, uniform in ±shock per axis
    pub fn shake_offset<R: Rng + ?Sized>(&self, shock: f32, rng: &mut R) -> Vec2 {
        if !self.effective_screen_shake() || shock <= 0.0 {
            return Vec2::ZERO;
        }
        Vec2::new(
            (rng.random::<f32>() - 0.5) * shock * 2.0,
            (rng.random::<f32>() - 0.5) * shock * 2.0,
        )
    }
}
