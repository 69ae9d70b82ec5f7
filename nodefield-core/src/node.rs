//! Nodes of the industrial field and their per-tick physics
//!
//! A node drifts on an ambient wave, gets pushed away from the pointer and
//! builds up pressure while the pointer is close. Pressure always stays in
//! [`PRESSURE_FLOOR`, `PRESSURE_CEILING`].

use std::f64::consts::TAU;

use rand::Rng;

use crate::config::SizeRange;
use crate::render::Point;

/// Resting pressure; decay never goes below it
pub const PRESSURE_FLOOR: f64 = 0.1;
pub const PRESSURE_CEILING: f64 = 1.0;
/// Multiplicative pressure decay per tick
pub const PRESSURE_DECAY: f64 = 0.995;
/// Pressure gained per tick at full pointer proximity
pub const PRESSURE_GAIN: f64 = 0.05;
/// Velocity impulse per tick at full pointer proximity
pub const POINTER_PUSH: f64 = 0.5;
/// Velocity damping per tick
pub const FRICTION: f64 = 0.98;
/// Distance from a viewport edge where the inward nudge kicks in
pub const BOUNDARY_MARGIN: f64 = 50.0;
pub const BOUNDARY_FORCE: f64 = 0.1;
/// Chance that a new node is a valve
pub const VALVE_PROBABILITY: f64 = 0.3;

/// Rendering shape of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Circle with a lighter ring
    Junction,
    /// Hexagon
    Valve,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    /// Base radius
    pub size: f64,
    pub pressure: f64,
    /// 0 is far away, 1 is close to the viewer
    pub depth: f64,
    pub kind: NodeKind,
    /// Phase of the pulse and ambient wave
    pub pulse_offset: f64,
}

impl Node {
    /// Random node somewhere inside a `width` x `height` viewport
    pub fn random<R: Rng>(rng: &mut R, width: f64, height: f64, sizes: SizeRange) -> Self {
        let depth = rng.random::<f64>();
        Self {
            x: rng.random::<f64>() * width,
            y: rng.random::<f64>() * height,
            vx: (rng.random::<f64>() - 0.5) * 0.3,
            vy: (rng.random::<f64>() - 0.5) * 0.3,
            size: sizes.min + rng.random::<f64>() * (sizes.max - sizes.min),
            pressure: PRESSURE_FLOOR + rng.random::<f64>() * 0.3,
            pulse_offset: rng.random::<f64>() * TAU,
            kind: if rng.random::<f64>() < VALVE_PROBABILITY {
                NodeKind::Valve
            } else {
                NodeKind::Junction
            },
            depth,
        }
    }

    /// A motionless junction, handy for placing nodes by hand
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            size: 4.0,
            pressure: PRESSURE_FLOOR,
            depth: 1.0,
            kind: NodeKind::Junction,
            pulse_offset: 0.0,
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Speed and size multiplier; far nodes move at half speed
    pub fn depth_factor(&self) -> f64 {
        0.5 + self.depth * 0.5
    }

    /// Opacity multiplier; far nodes are more transparent
    pub fn depth_opacity(&self) -> f64 {
        0.4 + self.depth * 0.6
    }

    /// Radius actually drawn
    pub fn effective_size(&self) -> f64 {
        self.size * (0.7 + self.depth * 0.3)
    }

    /// Raise pressure and push away from a pointer inside `radius`
    pub fn apply_pointer(&mut self, pointer: Point, radius: f64) {
        let dx = pointer.x - self.x;
        let dy = pointer.y - self.y;
        let distance = (dx * dx + dy * dy).sqrt();
        if distance >= radius {
            return;
        }

        let force = (radius - distance) / radius;
        self.pressure = (self.pressure + force * PRESSURE_GAIN).min(PRESSURE_CEILING);

        // atan2 keeps a pointer sitting exactly on the node well defined
        let angle = dy.atan2(dx);
        self.vx -= angle.cos() * force * POINTER_PUSH;
        self.vy -= angle.sin() * force * POINTER_PUSH;
    }

    pub fn decay_pressure(&mut self) {
        self.pressure = (self.pressure * PRESSURE_DECAY).max(PRESSURE_FLOOR);
    }

    /// Move, damp, add ambient drift and keep the node loosely on screen
    pub fn integrate(&mut self, time: f64, width: f64, height: f64) {
        let depth_factor = self.depth_factor();

        self.x += self.vx * depth_factor;
        self.y += self.vy * depth_factor;
        self.vx *= FRICTION;
        self.vy *= FRICTION;

        let wave_x = (time * 0.001 + self.y * 0.002 + self.pulse_offset).sin() * 0.015;
        let wave_y = (time * 0.0012 + self.x * 0.002 + self.pulse_offset).cos() * 0.01;
        self.vx += wave_x * depth_factor;
        self.vy += wave_y * depth_factor;

        if self.x < BOUNDARY_MARGIN {
            self.vx += BOUNDARY_FORCE;
        }
        if self.x > width - BOUNDARY_MARGIN {
            self.vx -= BOUNDARY_FORCE;
        }
        if self.y < BOUNDARY_MARGIN {
            self.vy += BOUNDARY_FORCE;
        }
        if self.y > height - BOUNDARY_MARGIN {
            self.vy -= BOUNDARY_FORCE;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    const SIZES: SizeRange = SizeRange { min: 2.0, max: 6.0 };

    #[test]
    fn random_nodes_respect_ranges() {
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..200 {
            let node = Node::random(&mut rng, 800.0, 600.0, SIZES);
            assert!((0.0..800.0).contains(&node.x));
            assert!((0.0..600.0).contains(&node.y));
            assert!((2.0..6.0).contains(&node.size));
            assert!((PRESSURE_FLOOR..0.4).contains(&node.pressure));
            assert!((0.0..1.0).contains(&node.depth));
            assert!(node.vx.abs() <= 0.15 && node.vy.abs() <= 0.15);
        }
    }

    #[test]
    fn both_kinds_are_generated() {
        let mut rng = SmallRng::seed_from_u64(11);
        let nodes: Vec<_> = (0..100)
            .map(|_| Node::random(&mut rng, 100.0, 100.0, SIZES))
            .collect();
        assert!(nodes.iter().any(|n| n.kind == NodeKind::Valve));
        assert!(nodes.iter().any(|n| n.kind == NodeKind::Junction));
    }

    #[test]
    fn pointer_outside_radius_has_no_effect() {
        let mut node = Node::at(100.0, 100.0);
        let before = node.clone();
        node.apply_pointer(Point::new(500.0, 100.0), 300.0);
        assert_eq!(node, before);
    }

    #[test]
    fn pointer_pushes_away_and_raises_pressure() {
        let mut node = Node::at(100.0, 100.0);
        // Pointer to the right: push goes left
        node.apply_pointer(Point::new(250.0, 100.0), 300.0);

        let force = 0.5;
        assert!((node.pressure - (PRESSURE_FLOOR + force * PRESSURE_GAIN)).abs() < 1e-12);
        assert!((node.vx + force * POINTER_PUSH).abs() < 1e-12);
        assert!(node.vy.abs() < 1e-12);
    }

    #[test]
    fn closer_pointer_pushes_harder() {
        let mut near = Node::at(0.0, 0.0);
        let mut far = Node::at(0.0, 0.0);
        near.apply_pointer(Point::new(10.0, 0.0), 300.0);
        far.apply_pointer(Point::new(200.0, 0.0), 300.0);
        assert!(near.vx < far.vx);
        assert!(near.pressure > far.pressure);
    }

    #[test]
    fn coincident_pointer_is_finite() {
        let mut node = Node::at(50.0, 50.0);
        node.apply_pointer(Point::new(50.0, 50.0), 300.0);
        assert!(node.vx.is_finite() && node.vy.is_finite());
        assert!(node.pressure <= PRESSURE_CEILING);
    }

    #[test]
    fn pressure_never_exceeds_ceiling() {
        let mut node = Node::at(50.0, 50.0);
        node.pressure = 0.99;
        for _ in 0..100 {
            node.apply_pointer(Point::new(50.0, 50.0), 300.0);
            node.decay_pressure();
            assert!(node.pressure <= PRESSURE_CEILING);
        }
    }

    #[test]
    fn decay_converges_to_floor() {
        let mut node = Node::at(0.0, 0.0);
        node.pressure = 1.0;
        let mut previous = node.pressure;
        for _ in 0..2000 {
            node.decay_pressure();
            assert!(node.pressure <= previous);
            previous = node.pressure;
        }
        assert_eq!(node.pressure, PRESSURE_FLOOR);
    }

    #[test]
    fn boundary_nudges_inward_without_clamping() {
        let mut node = Node::at(-20.0, 300.0);
        node.vx = -1.0;
        node.integrate(0.0, 800.0, 600.0);

        // Position is not clamped back into the viewport
        assert!(node.x < 0.0);
        // But velocity now leans back towards the inside
        assert!(node.vx > -1.0 * FRICTION);
    }

    #[test]
    fn shallow_nodes_move_slower() {
        let mut far = Node::at(400.0, 300.0);
        far.depth = 0.0;
        far.vx = 1.0;
        let mut near = far.clone();
        near.depth = 1.0;

        far.integrate(0.0, 800.0, 600.0);
        near.integrate(0.0, 800.0, 600.0);

        assert!((far.x - 400.5).abs() < 1e-12);
        assert!((near.x - 401.0).abs() < 1e-12);
    }
}
