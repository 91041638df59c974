//! Contest simulation module
//!
//! All contest logic lives here. Single-threaded and frame-driven:
//! - One tick per rendered frame, run to completion
//! - Eliminated combatants are tagged, never removed
//! - No rendering or platform dependencies

pub mod collision;
pub mod elimination;
pub mod motion;
pub mod particles;
pub mod scheduler;
pub mod shock;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use collision::{CollisionResult, Contact, circle_contact, resolve_collisions, wall_contact};
pub use elimination::{reap, sole_survivor};
pub use motion::{confine, integrate};
pub use particles::{Particle, ParticleField};
pub use scheduler::{FrameOutcome, Phase, Scheduler};
pub use shock::ImpactShock;
pub use snapshot::{CombatantInstance, ContestSnapshot, ParticleInstance};
pub use state::{Arena, Combatant, Contest, Status, Viewport};
pub use tick::{ContestEvent, TickReport, tick};
