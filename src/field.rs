// Particle field simulation. Pure logic, no DOM types, so the whole
// update/connection pass can be driven frame by frame from native tests.

use rand::Rng;
use vecmath::{vec2_add, vec2_len, vec2_normalized, vec2_scale, vec2_sub, Vector2};

use crate::color::Color;
use crate::input::PointerState;
use crate::particle::Particle;

pub const PARTICLE_COUNT: usize = 60;
pub const CONNECTION_DISTANCE: f64 = 150.0;
pub const POINTER_DISTANCE: f64 = 200.0;

// Opacity scale for particle-to-particle and particle-to-pointer lines
const CONNECTION_ALPHA: f64 = 0.15;
const POINTER_LINK_ALPHA: f64 = 0.3;

// Pointer attraction is an extra positional nudge layered on top of the
// base drift, scaled by proximity falloff and particle size
const ATTRACTION_SCALE: f64 = 0.25;

pub const INDIGO: Color = Color {
    r: 99,
    g: 102,
    b: 241,
    a: 255,
};
pub const PURPLE: Color = Color {
    r: 168,
    g: 85,
    b: 247,
    a: 255,
};

// A line to draw this frame, with its distance-derived opacity
#[derive(Copy, Clone, Debug)]
pub struct Connection {
    pub from: [f64; 2],
    pub to: [f64; 2],
    pub alpha: f64,
}

pub struct ParticleField {
    width: f64,
    height: f64,
    particles: Vec<Particle>,
}

impl ParticleField {
    pub fn new(width: f64, height: f64) -> ParticleField {
        let mut particles = Vec::with_capacity(PARTICLE_COUNT);
        let mut rng = rand::thread_rng();
        for _ in 0..PARTICLE_COUNT {
            let pos_x = rng.gen::<f64>() * width;
            let pos_y = rng.gen::<f64>() * height;
            let vel_x = (rng.gen::<f64>() - 0.5) * 0.5;
            let vel_y = (rng.gen::<f64>() - 0.5) * 0.5;
            let size = rng.gen::<f64>() * 2.0 + 1.0;
            let base = if rng.gen::<bool>() { INDIGO } else { PURPLE };
            let alpha = rng.gen::<f64>() * 0.5 + 0.2;
            let color = base.with_alpha((alpha * 255.0) as u8);
            particles.push(Particle::new(pos_x, pos_y, vel_x, vel_y, size, color));
        }
        ParticleField {
            width,
            height,
            particles,
        }
    }

    pub fn from_particles(width: f64, height: f64, particles: Vec<Particle>) -> ParticleField {
        ParticleField {
            width,
            height,
            particles,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    // Bounds update only. Particles caught outside the new viewport
    // reflect back in on their next steps.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    // One simulation frame: drift, reflect off the viewport edges, then
    // nudge toward a nearby pointer. Reflection flips velocity without
    // clamping position, so a particle may sit off-canvas for the frame
    // it turns around on.
    pub fn step(&mut self, pointer: &PointerState) {
        for particle in &mut self.particles {
            particle.pos = vec2_add(particle.pos, particle.vel);

            if particle.pos[0] < 0.0 || particle.pos[0] > self.width {
                particle.vel[0] *= -1.0;
            }
            if particle.pos[1] < 0.0 || particle.pos[1] > self.height {
                particle.vel[1] *= -1.0;
            }

            if let Some(pointer_pos) = pointer.position() {
                let to_pointer: Vector2<f64> = vec2_sub(pointer_pos, particle.pos);
                let distance = vec2_len(to_pointer);
                if distance > 0.0 && distance < POINTER_DISTANCE {
                    let falloff = (POINTER_DISTANCE - distance) / POINTER_DISTANCE;
                    let direction = vec2_normalized(to_pointer);
                    let nudge =
                        vec2_scale(direction, falloff * particle.size * ATTRACTION_SCALE);
                    particle.pos = vec2_add(particle.pos, nudge);
                }
            }
        }
    }

    // All distinct pairs closer than the connection threshold. Quadratic
    // in particle count; at 60 particles that is ~1800 distance checks
    // per frame, far below anything worth a spatial grid.
    pub fn connections(&self) -> Vec<Connection> {
        let mut lines = Vec::new();
        for (i, a) in self.particles.iter().enumerate() {
            for b in &self.particles[i + 1..] {
                let distance = vec2_len(vec2_sub(b.pos, a.pos));
                if let Some(alpha) = line_alpha(distance, CONNECTION_DISTANCE, CONNECTION_ALPHA) {
                    lines.push(Connection {
                        from: a.pos,
                        to: b.pos,
                        alpha,
                    });
                }
            }
        }
        lines
    }

    // Lines from each particle near the pointer to the pointer itself.
    // Empty whenever the pointer is absent.
    pub fn pointer_links(&self, pointer: &PointerState) -> Vec<Connection> {
        let pointer_pos = match pointer.position() {
            Some(pos) => pos,
            None => return Vec::new(),
        };
        self.particles
            .iter()
            .filter_map(|p| {
                let distance = vec2_len(vec2_sub(pointer_pos, p.pos));
                line_alpha(distance, POINTER_DISTANCE, POINTER_LINK_ALPHA).map(|alpha| {
                    Connection {
                        from: p.pos,
                        to: pointer_pos,
                        alpha,
                    }
                })
            })
            .collect()
    }
}

// Linear opacity falloff, None at or beyond the cutoff
fn line_alpha(distance: f64, cutoff: f64, scale: f64) -> Option<f64> {
    if distance < cutoff {
        Some((1.0 - distance / cutoff) * scale)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drifter(x: f64, y: f64, vel_x: f64, vel_y: f64) -> Particle {
        Particle::new(x, y, vel_x, vel_y, 2.0, INDIGO)
    }

    #[test]
    fn edge_crossing_inverts_velocity() {
        let mut field =
            ParticleField::from_particles(800.0, 600.0, vec![drifter(-1.0, 300.0, 0.3, 0.0)]);
        field.step(&PointerState::new());
        let p = &field.particles()[0];
        assert!((p.vel[0] + 0.3).abs() < 1e-12, "vx should flip sign");
        assert_eq!(p.vel[1], 0.0);
    }

    #[test]
    fn vertical_edge_reflects_independently() {
        let mut field =
            ParticleField::from_particles(800.0, 600.0, vec![drifter(400.0, 600.5, 0.1, 0.2)]);
        field.step(&PointerState::new());
        let p = &field.particles()[0];
        assert!((p.vel[1] + 0.2).abs() < 1e-12);
        assert!((p.vel[0] - 0.1).abs() < 1e-12);
    }

    #[test]
    fn interior_particle_just_drifts() {
        let mut field =
            ParticleField::from_particles(800.0, 600.0, vec![drifter(100.0, 100.0, 0.2, -0.1)]);
        field.step(&PointerState::new());
        let p = &field.particles()[0];
        assert!((p.pos[0] - 100.2).abs() < 1e-12);
        assert!((p.pos[1] - 99.9).abs() < 1e-12);
    }

    #[test]
    fn connection_alpha_falls_off_with_distance_and_cuts_at_threshold() {
        let near = line_alpha(50.0, CONNECTION_DISTANCE, 0.15).unwrap();
        let far = line_alpha(100.0, CONNECTION_DISTANCE, 0.15).unwrap();
        assert!(near > far);
        assert!(line_alpha(150.0, CONNECTION_DISTANCE, 0.15).is_none());
        assert!(line_alpha(200.0, CONNECTION_DISTANCE, 0.15).is_none());
    }

    #[test]
    fn connections_skip_pairs_beyond_threshold() {
        let field = ParticleField::from_particles(
            800.0,
            600.0,
            vec![
                drifter(0.0, 0.0, 0.0, 0.0),
                drifter(100.0, 0.0, 0.0, 0.0),
                drifter(500.0, 0.0, 0.0, 0.0),
            ],
        );
        let lines = field.connections();
        // Only the first pair is within 150px; no self-pairs either.
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].from, [0.0, 0.0]);
        assert_eq!(lines[0].to, [100.0, 0.0]);
    }

    #[test]
    fn pointer_pulls_nearby_particle_toward_it() {
        let mut field =
            ParticleField::from_particles(800.0, 600.0, vec![drifter(100.0, 100.0, 0.0, 0.0)]);
        let mut pointer = PointerState::new();
        pointer.set(200.0, 100.0);
        field.step(&pointer);
        let p = &field.particles()[0];
        assert!(p.pos[0] > 100.0, "particle should move toward the pointer");
        assert_eq!(p.pos[1], 100.0);
        // Velocity itself is untouched; attraction is positional only.
        assert_eq!(p.vel, [0.0, 0.0]);
    }

    #[test]
    fn distant_pointer_exerts_no_force() {
        let mut field =
            ParticleField::from_particles(800.0, 600.0, vec![drifter(100.0, 100.0, 0.0, 0.0)]);
        let mut pointer = PointerState::new();
        pointer.set(500.0, 100.0);
        field.step(&pointer);
        assert_eq!(field.particles()[0].pos, [100.0, 100.0]);
    }

    #[test]
    fn coincident_pointer_is_a_no_op() {
        let mut field =
            ParticleField::from_particles(800.0, 600.0, vec![drifter(100.0, 100.0, 0.0, 0.0)]);
        let mut pointer = PointerState::new();
        pointer.set(100.0, 100.0);
        field.step(&pointer);
        let p = &field.particles()[0];
        assert!(p.pos[0].is_finite() && p.pos[1].is_finite());
        assert_eq!(p.pos, [100.0, 100.0]);
    }

    #[test]
    fn absent_pointer_runs_full_cycle_without_links() {
        let mut field = ParticleField::new(800.0, 600.0);
        let pointer = PointerState::new();
        field.step(&pointer);
        let _ = field.connections();
        assert!(field.pointer_links(&pointer).is_empty());
    }

    #[test]
    fn pointer_links_only_within_radius() {
        let field = ParticleField::from_particles(
            800.0,
            600.0,
            vec![drifter(100.0, 100.0, 0.0, 0.0), drifter(700.0, 100.0, 0.0, 0.0)],
        );
        let mut pointer = PointerState::new();
        pointer.set(150.0, 100.0);
        let links = field.pointer_links(&pointer);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].to, [150.0, 100.0]);
    }

    #[test]
    fn population_is_stable_across_frames() {
        let mut field = ParticleField::new(1024.0, 768.0);
        assert_eq!(field.particles().len(), PARTICLE_COUNT);
        let mut pointer = PointerState::new();
        pointer.set(512.0, 384.0);
        for frame in 0..240 {
            if frame == 120 {
                pointer.clear();
            }
            field.step(&pointer);
        }
        assert_eq!(field.particles().len(), PARTICLE_COUNT);
    }

    #[test]
    fn spawned_particles_land_inside_viewport_with_bounded_attributes() {
        let field = ParticleField::new(640.0, 480.0);
        for p in field.particles() {
            assert!(p.pos[0] >= 0.0 && p.pos[0] <= 640.0);
            assert!(p.pos[1] >= 0.0 && p.pos[1] <= 480.0);
            assert!(p.vel[0].abs() <= 0.25 && p.vel[1].abs() <= 0.25);
            assert!(p.size >= 1.0 && p.size <= 3.0);
            let rgb = (p.color.r, p.color.g, p.color.b);
            assert!(rgb == (INDIGO.r, INDIGO.g, INDIGO.b) || rgb == (PURPLE.r, PURPLE.g, PURPLE.b));
        }
    }

    #[test]
    fn resize_leaves_population_alone() {
        let mut field = ParticleField::new(800.0, 600.0);
        field.resize(400.0, 300.0);
        assert_eq!(field.particles().len(), PARTICLE_COUNT);
        assert_eq!(field.width(), 400.0);
        field.step(&PointerState::new());
        assert_eq!(field.particles().len(), PARTICLE_COUNT);
    }
}
