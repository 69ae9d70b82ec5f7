//! Connected particle field
//!
//! The lighter of the two background variants: small dots drift in straight
//! lines, bounce off the viewport edges, get shoved aside by the pointer and
//! are joined by faint lines when close together.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::color::palette;
use crate::config::Environment;
use crate::render::{Point, Stroke, Surface};
use crate::scene::Scene;

/// Upper bound on the particle count
pub const MAX_PARTICLES: f64 = 60.0;
const PARTICLE_ALPHA: f64 = 0.4;
const CONNECTION_ALPHA: f64 = 0.15;
const CONNECTION_WIDTH: f64 = 0.5;

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub size: f64,
    /// How strongly the pointer displaces this particle
    pub density: f64,
}

impl Particle {
    pub fn random<R: Rng>(rng: &mut R, width: f64, height: f64, mobile: bool) -> Self {
        let max_density = if mobile { 10.0 } else { 20.0 };
        Self {
            x: rng.random::<f64>() * width,
            y: rng.random::<f64>() * height,
            vx: (rng.random::<f64>() - 0.5) * 0.15,
            vy: (rng.random::<f64>() - 0.5) * 0.15,
            size: rng.random::<f64>() * 1.5,
            density: rng.random::<f64>() * max_density + 1.0,
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    fn update(&mut self, pointer: Option<Point>, radius: f64, width: f64, height: f64) {
        if let Some(pointer) = pointer {
            let dx = pointer.x - self.x;
            let dy = pointer.y - self.y;
            let distance = (dx * dx + dy * dy).sqrt();

            if distance > 0.0 && distance < radius {
                let force = (radius - distance) / radius;
                self.x -= dx / distance * force * self.density * 0.6;
                self.y -= dy / distance * force * self.density * 0.6;
            }
        }

        self.x += self.vx;
        self.y += self.vy;

        if self.x < 0.0 || self.x > width {
            self.vx = -self.vx;
        }
        if self.y < 0.0 || self.y > height {
            self.vy = -self.vy;
        }
    }
}

/// Number of particles for a viewport `width` wide
pub fn particle_count(width: f64) -> usize {
    let spacing = if width < crate::config::MOBILE_BREAKPOINT {
        25.0
    } else {
        15.0
    };
    (width / spacing).min(MAX_PARTICLES).max(0.0).ceil() as usize
}

#[derive(Debug, Clone)]
pub struct ParticleField {
    env: Environment,
    particles: Vec<Particle>,
    pointer: Option<Point>,
    intensity: f64,
    rng: SmallRng,
}

impl ParticleField {
    pub fn new(env: Environment, seed: u64) -> Self {
        let mut field = Self {
            env,
            particles: Vec::new(),
            pointer: None,
            intensity: 1.0,
            rng: SmallRng::seed_from_u64(seed),
        };
        field.populate();
        field
    }

    fn populate(&mut self) {
        let (width, height) = (self.env.viewport_width, self.env.viewport_height);
        let mobile = self.env.is_mobile();
        let rng = &mut self.rng;
        self.particles = (0..particle_count(width))
            .map(|_| Particle::random(rng, width, height, mobile))
            .collect();

        tracing::debug!(particles = self.particles.len(), width, height, "populated particle field");
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    fn mouse_radius(&self) -> f64 {
        if self.env.is_mobile() { 100.0 } else { 250.0 }
    }

    fn connection_distance(&self) -> f64 {
        if self.env.is_mobile() { 80.0 } else { 150.0 }
    }
}

impl Scene for ParticleField {
    fn resize(&mut self, width: f64, height: f64) {
        self.env = self.env.resized(width, height);
        self.populate();
    }

    fn set_pointer(&mut self, pointer: Option<Point>) {
        self.pointer = pointer;
    }

    fn update(&mut self) {
        let radius = self.mouse_radius();
        let (width, height) = (self.env.viewport_width, self.env.viewport_height);
        for particle in &mut self.particles {
            particle.update(self.pointer, radius, width, height);
        }
    }

    fn render(&self, surface: &mut dyn Surface) {
        surface.clear(self.env.viewport_width, self.env.viewport_height);

        let threshold = self.connection_distance();
        for (i, a) in self.particles.iter().enumerate() {
            for b in &self.particles[i + 1..] {
                let distance = a.position().distance(b.position());
                if distance < threshold {
                    let alpha = CONNECTION_ALPHA * (1.0 - distance / threshold) * self.intensity;
                    surface.stroke_line(
                        a.position(),
                        b.position(),
                        Stroke::new(palette::PRIMARY.with_alpha(alpha), CONNECTION_WIDTH),
                    );
                }
            }
        }

        let fill = palette::PRIMARY.with_alpha(PARTICLE_ALPHA);
        for particle in &self.particles {
            surface.fill_circle(particle.position(), particle.size, fill);
        }
    }

    fn set_intensity(&mut self, value: f64) {
        self.intensity = value.clamp(0.0, 1.0);
    }

    fn intensity(&self) -> f64 {
        self.intensity
    }

    fn frame_skip(&self) -> u32 {
        1
    }

    fn viewport(&self) -> (f64, f64) {
        (self.env.viewport_width, self.env.viewport_height)
    }

    fn len(&self) -> usize {
        self.particles.len()
    }
}
