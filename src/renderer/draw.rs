//! Per-mode draw routines

use glam::Vec2;
use rand::Rng;

use super::{Color, Composite, Segment, Surface};
use crate::consts::*;
use crate::sim::{Mode, Particle};

/// Spectral channels
const RED: Color = Color::rgb(255, 50, 50);
const GREEN: Color = Color::rgb(50, 255, 50);
const BLUE: Color = Color::rgb(50, 50, 255);

const TEAL: Color = Color::rgb(0x3c, 0x6e, 0x71);
const INK: Color = Color::rgb(0x11, 0x11, 0x11);

const SCAN_GREEN: Color = Color::rgb(0, 255, 0);
const VOID_GREY: Color = Color::rgb(0x88, 0x88, 0x88);
const MESH: Color = Color::rgba(0, 255, 0, 0.3);

/// Overlay painted instead of a clear in temporal mode
pub const TEMPORAL_FADE: Color = Color::rgba(255, 255, 255, 0.1);

impl Mode {
    /// Compositing rule applied while this mode draws
    pub fn composite(&self) -> Composite {
        match self {
            Mode::Spectral => Composite::Lighter,
            _ => Composite::SourceOver,
        }
    }

    /// Whether the frame starts with a translucent overlay instead of a clear
    pub fn fades(&self) -> bool {
        matches!(self, Mode::Temporal)
    }
}

/// Three channel copies offset along velocity: red lags, blue leads
fn draw_spectral(surface: &mut impl Surface, p: &Particle) {
    let lag = p.vel * SPECTRAL_LAG;
    surface.fill_circle(p.pos - lag, p.size, RED);
    surface.fill_circle(p.pos, p.size, GREEN);
    surface.fill_circle(p.pos + lag, p.size, BLUE);
}

fn draw_temporal(surface: &mut impl Surface, p: &Particle) {
    let radius = (p.size - TEMPORAL_SHRINK).max(TEMPORAL_MIN_RADIUS);
    surface.fill_circle(p.pos, radius, TEAL);
}

/// Visual position is jittered, physical position is untouched
fn draw_quantum(surface: &mut impl Surface, p: &Particle, rng: &mut impl Rng) {
    let noise = Vec2::new(
        (rng.random::<f32>() - 0.5) * QUANTUM_JITTER,
        (rng.random::<f32>() - 0.5) * QUANTUM_JITTER,
    );
    let color = if rng.random::<f32>() > 0.5 { TEAL } else { INK };
    surface.fill_circle(p.pos + noise, QUANTUM_DOT_RADIUS, color);
}

fn draw_spatial(surface: &mut impl Surface, p: &Particle) {
    if p.scanning {
        surface.fill_circle(p.pos, SPATIAL_SCAN_RADIUS, SCAN_GREEN);
    } else {
        surface.fill_circle(p.pos, SPATIAL_DOT_RADIUS, VOID_GREY);
    }
}

/// Every unordered pair closer than the squared threshold, as a segment
///
/// O(n^2); the field is small enough that a spatial index does not pay off.
pub fn mesh_segments(particles: &[Particle], threshold_sq: f32) -> Vec<Segment> {
    let mut segments = Vec::new();
    for (i, a) in particles.iter().enumerate() {
        for b in &particles[i + 1..] {
            if a.pos.distance_squared(b.pos) < threshold_sq {
                segments.push((a.pos, b.pos));
            }
        }
    }
    segments
}

/// Run `mode`'s draw routine over all particles
///
/// Returns the number of mesh segments stroked (spatial mode only).
pub fn draw_particles(
    surface: &mut impl Surface,
    mode: Mode,
    particles: &[Particle],
    rng: &mut impl Rng,
) -> usize {
    match mode {
        Mode::Spectral => particles.iter().for_each(|p| draw_spectral(surface, p)),
        Mode::Temporal => particles.iter().for_each(|p| draw_temporal(surface, p)),
        Mode::Quantum => particles.iter().for_each(|p| draw_quantum(surface, p, rng)),
        Mode::Spatial => {
            particles.iter().for_each(|p| draw_spatial(surface, p));
            let segments = mesh_segments(particles, MESH_DISTANCE_SQ);
            if !segments.is_empty() {
                surface.stroke_segments(&segments, MESH_LINE_WIDTH, MESH);
            }
            return segments.len();
        }
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{DrawCall, RecordingSurface};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn particle(x: f32, y: f32) -> Particle {
        Particle::new(Vec2::new(x, y), Vec2::new(1.0, -0.5), 5.0)
    }

    #[test]
    fn test_only_spectral_is_additive() {
        assert_eq!(Mode::Spectral.composite(), Composite::Lighter);
        for mode in [Mode::Temporal, Mode::Quantum, Mode::Spatial] {
            assert_eq!(mode.composite(), Composite::SourceOver);
        }
        assert!(Mode::Temporal.fades());
        assert!(!Mode::Spectral.fades());
    }

    #[test]
    fn test_spectral_channel_offsets() {
        let mut surface = RecordingSurface::new(200.0, 200.0);
        let mut rng = Pcg32::seed_from_u64(1);
        draw_particles(&mut surface, Mode::Spectral, &[particle(50.0, 50.0)], &mut rng);

        let circles = surface.circles();
        assert_eq!(circles.len(), 3);
        assert_eq!(circles[0], (Vec2::new(48.0, 51.0), 5.0, RED));
        assert_eq!(circles[1], (Vec2::new(50.0, 50.0), 5.0, GREEN));
        assert_eq!(circles[2], (Vec2::new(52.0, 49.0), 5.0, BLUE));
    }

    #[test]
    fn test_spectral_at_rest_overlaps() {
        let mut surface = RecordingSurface::new(200.0, 200.0);
        let p = Particle::new(Vec2::new(10.0, 10.0), Vec2::ZERO, 4.0);
        draw_particles(&mut surface, Mode::Spectral, &[p], &mut Pcg32::seed_from_u64(1));
        assert!(surface.circles().iter().all(|c| c.0 == Vec2::new(10.0, 10.0)));
    }

    #[test]
    fn test_temporal_radius_floor() {
        let mut surface = RecordingSurface::new(200.0, 200.0);
        let small = Particle::new(Vec2::ZERO, Vec2::ZERO, 1.2);
        draw_particles(
            &mut surface,
            Mode::Temporal,
            &[particle(5.0, 5.0), small],
            &mut Pcg32::seed_from_u64(1),
        );
        let circles = surface.circles();
        assert_eq!(circles[0].1, 4.0);
        assert_eq!(circles[1].1, TEMPORAL_MIN_RADIUS);
    }

    #[test]
    fn test_quantum_jitter_bounded() {
        let mut surface = RecordingSurface::new(200.0, 200.0);
        let particles: Vec<Particle> = (0..50).map(|i| particle(i as f32 * 3.0, 100.0)).collect();
        draw_particles(&mut surface, Mode::Quantum, &particles, &mut Pcg32::seed_from_u64(9));

        let circles = surface.circles();
        assert_eq!(circles.len(), 50);
        for (p, (center, radius, color)) in particles.iter().zip(circles) {
            assert!((center.x - p.pos.x).abs() <= QUANTUM_JITTER / 2.0);
            assert!((center.y - p.pos.y).abs() <= QUANTUM_JITTER / 2.0);
            assert_eq!(radius, QUANTUM_DOT_RADIUS);
            assert!(color == TEAL || color == INK);
        }
    }

    #[test]
    fn test_spatial_dot_reflects_scanning() {
        let mut scanning = particle(10.0, 10.0);
        scanning.scanning = true;
        let idle = particle(150.0, 150.0);

        let mut surface = RecordingSurface::new(200.0, 200.0);
        draw_particles(&mut surface, Mode::Spatial, &[scanning, idle], &mut Pcg32::seed_from_u64(1));
        let circles = surface.circles();
        assert_eq!((circles[0].1, circles[0].2), (SPATIAL_SCAN_RADIUS, SCAN_GREEN));
        assert_eq!((circles[1].1, circles[1].2), (SPATIAL_DOT_RADIUS, VOID_GREY));
    }

    #[test]
    fn test_mesh_counts_unique_close_pairs() {
        // a-b: 30px, b-c: 40px, a-c: exactly 50px, d isolated
        let particles = [
            particle(0.0, 0.0),
            particle(30.0, 0.0),
            particle(30.0, 40.0),
            particle(300.0, 300.0),
        ];
        let mut surface = RecordingSurface::new(400.0, 400.0);
        let drawn = draw_particles(&mut surface, Mode::Spatial, &particles, &mut Pcg32::seed_from_u64(1));

        assert_eq!(drawn, 2);
        let strokes: Vec<&DrawCall> = surface
            .calls()
            .iter()
            .filter(|c| matches!(c, DrawCall::Segments { .. }))
            .collect();
        assert_eq!(strokes.len(), 1);
        assert_eq!(surface.segment_count(), 2);
    }

    #[test]
    fn test_mesh_threshold_is_strict() {
        // Exactly 50px apart: not connected
        let particles = [particle(0.0, 0.0), particle(50.0, 0.0)];
        assert!(mesh_segments(&particles, MESH_DISTANCE_SQ).is_empty());
    }

    #[test]
    fn test_mesh_matches_brute_force_count() {
        let mut rng = Pcg32::seed_from_u64(5);
        let particles: Vec<Particle> = (0..80)
            .map(|_| Particle::random(&mut rng, Vec2::new(300.0, 300.0)))
            .collect();

        let mut expected = 0;
        for i in 0..particles.len() {
            for j in 0..particles.len() {
                if i < j && particles[i].pos.distance_squared(particles[j].pos) < MESH_DISTANCE_SQ {
                    expected += 1;
                }
            }
        }
        assert_eq!(mesh_segments(&particles, MESH_DISTANCE_SQ).len(), expected);
    }

    #[test]
    fn test_non_spatial_modes_draw_no_mesh() {
        let particles = [particle(0.0, 0.0), particle(10.0, 0.0)];
        for mode in [Mode::Spectral, Mode::Temporal, Mode::Quantum] {
            let mut surface = RecordingSurface::new(100.0, 100.0);
            assert_eq!(draw_particles(&mut surface, mode, &particles, &mut Pcg32::seed_from_u64(1)), 0);
            assert_eq!(surface.segment_count(), 0);
        }
    }
}
