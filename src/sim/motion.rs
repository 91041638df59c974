//! Per-combatant motion: pop-in, drift, speed clamp, wall bounce

use super::collision::wall_contact;
use super::state::{Arena, Combatant};
use crate::tuning::Tuning;
use crate::{clamp_speed, reflect_velocity};

/// Advance one combatant by one tick. Eliminated combatants stay frozen.
///
/// Order: intro scale, position/rotation, speed clamp, then the arena wall.
/// The wall bounce is a perfect mirror, so the clamped speed survives it.
pub fn integrate(combatant: &mut Combatant, arena: &Arena, tuning: &Tuning) {
    if !combatant.is_alive() {
        return;
    }

    if combatant.scale < 1.0 {
        combatant.scale = (combatant.scale + tuning.intro_scale_step).min(1.0);
    }

    combatant.pos += combatant.vel;
    combatant.rotation += combatant.rotation_rate;

    combatant.vel = clamp_speed(combatant.vel, tuning.speed_floor(), tuning.speed_ceiling());

    if let Some(contact) = wall_contact(combatant.pos, combatant.radius, arena) {
        // Normal points inward
        combatant.pos += contact.normal * contact.penetration;
        combatant.vel = reflect_velocity(combatant.vel, contact.normal);
    }
}

/// Pull a live combatant back inside the wall without touching its velocity.
/// Pair separation runs after [`integrate`] and can shove a body past the
/// wall; the next tick's bounce handles any outward velocity.
pub fn confine(combatant: &mut Combatant, arena: &Arena) {
    if !combatant.is_alive() {
        return;
    }
    if let Some(contact) = wall_contact(combatant.pos, combatant.radius, arena) {
        combatant.pos += contact.normal * contact.penetration;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::Entrant;
    use crate::sim::state::Status;
    use glam::Vec2;

    fn arena() -> Arena {
        Arena {
            center: Vec2::new(400.0, 400.0),
            radius: 380.0,
        }
    }

    fn combatant(pos: Vec2, vel: Vec2) -> Combatant {
        Combatant::new(Entrant::new(1, "A", "aa", 0), pos, vel, &Tuning::default())
    }

    #[test]
    fn test_moves_and_spins() {
        let tuning = Tuning::default();
        let mut c = combatant(Vec2::new(400.0, 400.0), Vec2::new(3.0, 4.0));
        c.rotation_rate = 0.02;
        integrate(&mut c, &arena(), &tuning);

        assert_eq!(c.pos, Vec2::new(403.0, 404.0));
        assert_eq!(c.vel, Vec2::new(3.0, 4.0));
        assert!((c.rotation - 0.02).abs() < 1e-6);
    }

    #[test]
    fn test_confine_keeps_velocity() {
        let mut c = combatant(Vec2::new(400.0 + 370.0, 400.0), Vec2::new(4.0, 1.0));
        confine(&mut c, &arena());

        assert!((c.pos.x - 750.0).abs() < 1e-3);
        assert_eq!(c.vel, Vec2::new(4.0, 1.0));
        assert!(arena().contains(c.pos, c.radius, 1e-3));
        assert!((c.scale - 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_intro_scale_clamps_at_one() {
        let tuning = Tuning::default();
        let mut c = combatant(Vec2::new(400.0, 400.0), Vec2::new(3.0, 0.0));
        c.scale = 0.98;
        integrate(&mut c, &arena(), &tuning);
        assert_eq!(c.scale, 1.0);
        assert_eq!(c.radius, tuning.combatant_radius);
    }

    #[test]
    fn test_speed_is_clamped() {
        let tuning = Tuning::default();
        let mut slow = combatant(Vec2::new(400.0, 400.0), Vec2::new(0.5, 0.0));
        integrate(&mut slow, &arena(), &tuning);
        assert!((slow.vel.length() - tuning.speed_floor()).abs() < 1e-5);

        let mut fast = combatant(Vec2::new(400.0, 400.0), Vec2::new(0.0, -40.0));
        integrate(&mut fast, &arena(), &tuning);
        assert!((fast.vel.length() - tuning.speed_ceiling()).abs() < 1e-5);
    }

    #[test]
    fn test_zero_speed_gets_a_direction() {
        let tuning = Tuning::default();
        let mut c = combatant(Vec2::new(400.0, 400.0), Vec2::ZERO);
        integrate(&mut c, &arena(), &tuning);
        assert!(c.vel.is_finite() && c.pos.is_finite());
        assert!((c.vel.length() - tuning.speed_floor()).abs() < 1e-5);
    }

    #[test]
    fn test_wall_bounce() {
        let tuning = Tuning::default();
        let a = arena();
        // Heading straight at the right-hand wall
        let mut c = combatant(Vec2::new(400.0 + 347.0, 400.0), Vec2::new(5.0, 0.0));
        integrate(&mut c, &a, &tuning);

        assert!(a.contains(c.pos, c.radius, 1e-3));
        assert!((c.pos.x - (400.0 + 380.0 - 30.0)).abs() < 1e-3);
        assert!((c.vel.x + 5.0).abs() < 1e-5, "velocity is mirrored");
    }

    #[test]
    fn test_eliminated_is_frozen() {
        let tuning = Tuning::default();
        let mut c = combatant(Vec2::new(400.0, 400.0), Vec2::new(3.0, 0.0));
        c.status = Status::Eliminated { tick: 3 };
        integrate(&mut c, &arena(), &tuning);
        assert_eq!(c.pos, Vec2::new(400.0, 400.0));
        assert_eq!(c.scale, 0.0);
    }
}
