//! Per-frame simulation step
//!
//! Each mode owns a pure update rule: it takes a particle and the frame's
//! read-only inputs and returns the particle's next state. The field step
//! just maps the active rule over every particle.

use glam::Vec2;

use super::collision::{nearest_surface_point, repulsion_impulse, resolve_obstacles, wrap_position};
use super::mode::Mode;
use super::state::{Particle, ParticleField};
use super::Rect;
use crate::consts::*;

/// Read-only inputs shared by every particle in one frame
#[derive(Debug, Clone, Copy)]
pub struct StepContext<'a> {
    /// Pointer position, or the sentinel when absent
    pub pointer: Vec2,
    pub obstacles: &'a [Rect],
    /// Canvas dimensions for the wrap step
    pub bounds: Vec2,
}

/// Signature shared by the four mode rules
pub type UpdateRule = fn(&Particle, &StepContext) -> Particle;

/// Blend velocity toward the nominal drift by `rate`
#[inline]
fn relax(vel: Vec2, base_vel: Vec2, rate: f32) -> Vec2 {
    vel * (1.0 - rate) + base_vel * rate
}

/// Integrate, bounce off obstacles, repel from pointer, relax, wrap
fn standard_step(p: &Particle, ctx: &StepContext) -> Particle {
    let mut next = *p;

    next.pos += next.vel;
    resolve_obstacles(&mut next.pos, &mut next.vel, next.size, ctx.obstacles);
    next.vel += repulsion_impulse(next.pos, ctx.pointer, REPULSION_RADIUS, REPULSION_FORCE);
    next.vel = relax(next.vel, next.base_vel, RELAX_RATE);
    next.pos = wrap_position(next.pos, ctx.bounds);

    next
}

pub fn update_spectral(p: &Particle, ctx: &StepContext) -> Particle {
    standard_step(p, ctx)
}

pub fn update_temporal(p: &Particle, ctx: &StepContext) -> Particle {
    standard_step(p, ctx)
}

pub fn update_quantum(p: &Particle, ctx: &StepContext) -> Particle {
    standard_step(p, ctx)
}

/// Integrate, then either adhere to the nearest obstacle edge or drift
pub fn update_spatial(p: &Particle, ctx: &StepContext) -> Particle {
    let mut next = *p;

    next.pos += next.vel;

    let nearest = nearest_surface_point(next.pos, ctx.obstacles, CAPTURE_RADIUS)
        .filter(|&(_, dist)| dist < STICK_RADIUS);

    match nearest {
        Some((target, _)) => {
            next.scanning = true;
            next.vel += (target - next.pos) * STICK_PULL;
            next.vel *= STICK_DAMPING;
        }
        None => {
            next.scanning = false;
            next.vel += repulsion_impulse(
                next.pos,
                ctx.pointer,
                SPATIAL_REPULSION_RADIUS,
                SPATIAL_REPULSION_FORCE,
            );
            next.vel = relax(next.vel, next.base_vel, SPATIAL_RELAX_RATE);
        }
    }

    next.pos = wrap_position(next.pos, ctx.bounds);
    next
}

impl Mode {
    /// The update rule bound to this mode
    pub fn update_rule(&self) -> UpdateRule {
        match self {
            Mode::Spectral => update_spectral,
            Mode::Temporal => update_temporal,
            Mode::Quantum => update_quantum,
            Mode::Spatial => update_spatial,
        }
    }
}

/// Advance every particle exactly one step under `mode`
pub fn update_field(field: &mut ParticleField, mode: Mode, pointer: Vec2, obstacles: &[Rect]) {
    let ctx = StepContext {
        pointer,
        obstacles,
        bounds: field.bounds(),
    };
    let rule = mode.update_rule();
    for particle in field.particles_mut() {
        *particle = rule(particle, &ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn ctx(obstacles: &[Rect]) -> StepContext<'_> {
        StepContext {
            pointer: POINTER_SENTINEL,
            obstacles,
            bounds: Vec2::new(500.0, 500.0),
        }
    }

    fn with_base(pos: Vec2, vel: Vec2, base_vel: Vec2, size: f32) -> Particle {
        Particle {
            base_vel,
            ..Particle::new(pos, vel, size)
        }
    }

    #[test]
    fn test_integrate_and_relax_without_forces() {
        let p = with_base(Vec2::new(10.0, 10.0), Vec2::new(2.0, 0.0), Vec2::new(1.0, 0.0), 4.0);
        let next = update_spectral(&p, &ctx(&[]));
        assert_eq!(next.pos, Vec2::new(12.0, 10.0));
        assert!((next.vel.x - (2.0 * 0.97 + 0.03)).abs() < 1e-6);
    }

    #[test]
    fn test_bounce_off_left_edge() {
        // Moving right, just past the left edge of the obstacle
        let rect = Rect::new(100.0, 100.0, 200.0, 200.0);
        let obstacles = [rect];
        let radius = 6.0;
        let p = with_base(Vec2::new(105.0, 150.0), Vec2::new(5.0, 0.0), Vec2::new(0.3, 0.0), radius);

        for update in [update_spectral, update_temporal, update_quantum] {
            let next = update(&p, &ctx(&obstacles));
            assert_eq!(next.pos.x, rect.left - radius - 1.0);
            assert!(next.vel.x < 0.0, "x-velocity should flip");
        }
    }

    #[test]
    fn test_pointer_pushes_away() {
        let p = with_base(Vec2::new(250.0, 250.0), Vec2::ZERO, Vec2::ZERO, 4.0);
        let context = StepContext {
            pointer: Vec2::new(200.0, 250.0),
            ..ctx(&[])
        };
        let next = update_quantum(&p, &context);
        assert!(next.vel.x > 0.0);
        assert!(next.vel.y.abs() < 1e-6);
    }

    #[test]
    fn test_wrap_reenters_opposite_edge() {
        let p = with_base(Vec2::new(499.5, 0.2), Vec2::new(1.0, -0.5), Vec2::new(1.0, -0.5), 4.0);
        let next = update_temporal(&p, &ctx(&[]));
        assert!((next.pos.x - 0.5).abs() < 1e-4);
        assert!((next.pos.y - 499.7).abs() < 1e-3);
    }

    #[test]
    fn test_spatial_adheres_and_damps() {
        let obstacles = [Rect::new(100.0, 100.0, 200.0, 200.0)];
        let p = with_base(Vec2::new(95.0, 150.0), Vec2::new(0.0, 1.0), Vec2::new(0.0, 1.0), 4.0);

        let next = update_spatial(&p, &ctx(&obstacles));
        assert!(next.scanning);
        assert!(next.speed() < p.speed());
        // Pulled toward the edge at x = 100
        assert!(next.vel.x > 0.0);
    }

    #[test]
    fn test_spatial_between_stick_and_capture_drifts() {
        let obstacles = [Rect::new(100.0, 100.0, 200.0, 200.0)];
        // 80px from the left edge: captured but not stuck
        let p = with_base(Vec2::new(20.0, 150.0), Vec2::new(0.0, 0.5), Vec2::new(0.0, 0.5), 4.0);
        let next = update_spatial(&p, &ctx(&obstacles));
        assert!(!next.scanning);
        assert_eq!(next.vel.x, 0.0);
        assert!((next.vel.y - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_spatial_ignores_collision_response() {
        // Inside the obstacle: spatial mode never pushes out
        let obstacles = [Rect::new(100.0, 100.0, 200.0, 200.0)];
        let p = with_base(Vec2::new(150.0, 150.0), Vec2::new(1.0, 0.0), Vec2::new(1.0, 0.0), 4.0);
        let next = update_spatial(&p, &ctx(&obstacles));
        assert!(next.scanning);
        assert!(next.pos.x > 100.0 && next.pos.x < 200.0);
    }

    #[test]
    fn test_standard_rules_ignore_scanning_flag() {
        let obstacles = [Rect::new(300.0, 300.0, 350.0, 350.0)];
        let mut stuck = with_base(Vec2::new(50.0, 50.0), Vec2::new(0.5, 0.2), Vec2::new(0.5, 0.2), 4.0);
        let free = stuck;
        stuck.scanning = true;

        for mode in [Mode::Spectral, Mode::Temporal, Mode::Quantum] {
            let rule = mode.update_rule();
            let a = rule(&stuck, &ctx(&obstacles));
            let b = rule(&free, &ctx(&obstacles));
            assert_eq!(a.pos, b.pos);
            assert_eq!(a.vel, b.vel);
        }
    }

    #[test]
    fn test_long_run_stays_bounded() {
        let mut rng = Pcg32::seed_from_u64(1234);
        let mut field = ParticleField::new(&mut rng, 500.0, 500.0, 10);
        let max_base = field
            .particles()
            .iter()
            .map(|p| p.base_vel.length())
            .fold(0.0f32, f32::max);

        for mode in Mode::ALL {
            for _ in 0..1000 {
                update_field(&mut field, mode, POINTER_SENTINEL, &[]);
                for p in field.particles() {
                    assert!(p.pos.x >= 0.0 && p.pos.x < 500.0);
                    assert!(p.pos.y >= 0.0 && p.pos.y < 500.0);
                    assert!(p.speed() <= max_base + 1e-3);
                }
            }
        }
    }

    #[test]
    fn test_field_stays_in_bounds_with_obstacles_and_pointer() {
        let mut rng = Pcg32::seed_from_u64(99);
        let mut field = ParticleField::new(&mut rng, 640.0, 480.0, 60);
        let obstacles = [
            Rect::new(100.0, 100.0, 300.0, 180.0),
            Rect::new(400.0, 250.0, 620.0, 470.0),
            // Partly off-canvas
            Rect::new(-50.0, 400.0, 60.0, 520.0),
        ];

        for step in 0..600 {
            let mode = Mode::ALL[(step / 150) % 4];
            let pointer = Vec2::new(320.0 + (step as f32 * 0.1).sin() * 200.0, 240.0);
            update_field(&mut field, mode, pointer, &obstacles);
            for p in field.particles() {
                assert!(p.pos.x >= 0.0 && p.pos.x < 640.0);
                assert!(p.pos.y >= 0.0 && p.pos.y < 480.0);
            }
        }
    }
}
