//! Impact shock: decaying intensity of the last big hit
//!
//! Presentation signal only (camera shake); the simulation never reads it.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ImpactShock {
    value: f32,
}

impl ImpactShock {
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Raise to at least `magnitude`; a weaker trigger never lowers it
    pub fn trigger(&mut self, magnitude: f32) {
        self.value = self.value.max(magnitude);
    }

    /// Geometric decay, snapping to exactly zero under `cutoff`
    pub fn decay(&mut self, factor: f32, cutoff: f32) {
        self.value *= factor;
        if self.value < cutoff {
            self.value = 0.0;
        }
    }

    pub fn is_active(&self) -> bool {
        self.value > 0.0
    }
}
