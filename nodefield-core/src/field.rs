//! Industrial node field
//!
//! Owns the node set, the pointer and the simulation clock. Each tick pushes
//! nodes away from the pointer, decays their pressure and lets them drift.
//! Rendering draws pressure-styled connections first and the nodes on top.

use std::f64::consts::TAU;

use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::color::palette;
use crate::config::{Environment, FieldConfig, FieldOptions};
use crate::node::{Node, NodeKind};
use crate::render::{Point, Stroke, Surface, hexagon};
use crate::scene::Scene;

/// Average pressure above which a connection gets the double glow stroke
pub const HIGH_PRESSURE: f64 = 0.5;
/// Average pressure above which a flow indicator is drawn
pub const FLOW_PRESSURE: f64 = 0.3;
/// Node pressure above which the node glows
pub const GLOW_PRESSURE: f64 = 0.5;
const FLOW_DOT_RADIUS: f64 = 2.0;

/// The industrial node field
#[derive(Debug, Clone)]
pub struct NodeField {
    options: FieldOptions,
    env: Environment,
    config: FieldConfig,
    nodes: Vec<Node>,
    pointer: Option<Point>,
    /// Ticks simulated so far
    time: u64,
    intensity: f64,
    rng: SmallRng,
}

impl NodeField {
    /// Build a field for `env` and populate it with random nodes
    pub fn new(options: FieldOptions, env: Environment, seed: u64) -> Self {
        let config = FieldConfig::resolve(&options, &env);
        let mut field = Self {
            options,
            env,
            config,
            nodes: Vec::new(),
            pointer: None,
            time: 0,
            intensity: 1.0,
            rng: SmallRng::seed_from_u64(seed),
        };
        field.populate();
        field
    }

    fn populate(&mut self) {
        let (width, height) = (self.env.viewport_width, self.env.viewport_height);
        let sizes = self.config.node_size;
        let rng = &mut self.rng;
        self.nodes = (0..self.config.node_count)
            .map(|_| Node::random(rng, width, height, sizes))
            .collect();

        tracing::debug!(
            nodes = self.nodes.len(),
            width,
            height,
            "populated node field"
        );
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Direct access to the nodes, e.g. to place them by hand
    pub fn nodes_mut(&mut self) -> &mut [Node] {
        &mut self.nodes
    }

    pub fn pointer(&self) -> Option<Point> {
        self.pointer
    }

    pub fn time(&self) -> u64 {
        self.time
    }

    /// Advance the clock and every node by one tick
    pub fn tick(&mut self) {
        self.time += 1;
        let time = self.time as f64;
        let (width, height) = (self.env.viewport_width, self.env.viewport_height);
        let radius = self.config.mouse_radius;

        for node in &mut self.nodes {
            if let Some(pointer) = self.pointer {
                node.apply_pointer(pointer, radius);
            }
            node.decay_pressure();
            node.integrate(time, width, height);
        }
    }

    /// Draw a full frame
    pub fn draw(&self, surface: &mut dyn Surface) {
        surface.clear(self.env.viewport_width, self.env.viewport_height);
        self.draw_connections(surface);
        for node in &self.nodes {
            self.draw_node(surface, node);
        }
    }

    /// One line per unordered pair closer than the connection distance
    fn draw_connections(&self, surface: &mut dyn Surface) {
        let time = self.time as f64;
        let threshold = self.config.connection_distance;
        let primary = self.config.colors.primary;

        for (i, a) in self.nodes.iter().enumerate() {
            for b in &self.nodes[i + 1..] {
                let (from, to) = (a.position(), b.position());
                let distance = from.distance(to);
                if distance >= threshold {
                    continue;
                }

                let opacity = (1.0 - distance / threshold) * self.intensity;
                let avg_pressure = (a.pressure + b.pressure) / 2.0;
                let phase = (time * 0.015 + i as f64 * 0.2).rem_euclid(TAU);
                let pulse = phase.sin() * 0.15 * self.intensity;

                if avg_pressure > HIGH_PRESSURE {
                    let outer = (opacity * 0.5 + pulse).max(0.0);
                    let inner = (opacity * 0.8 + pulse).max(0.0);
                    surface.stroke_line(from, to, Stroke::new(primary.with_alpha(outer), 2.0));
                    surface.stroke_line(from, to, Stroke::new(primary.with_alpha(inner), 1.0));
                } else {
                    let alpha = (opacity * 0.3 + pulse * 0.3).max(0.0);
                    surface.stroke_line(from, to, Stroke::new(palette::SLATE.with_alpha(alpha), 1.0));
                }

                if self.config.enable_flow_indicators && avg_pressure > FLOW_PRESSURE {
                    self.draw_flow_indicator(surface, from, to, avg_pressure, opacity);
                }
            }
        }
    }

    fn draw_flow_indicator(
        &self,
        surface: &mut dyn Surface,
        from: Point,
        to: Point,
        pressure: f64,
        opacity: f64,
    ) {
        let progress = (self.time as f64 * 0.001 * self.config.flow_speed).rem_euclid(1.0);
        let alpha = opacity * pressure * self.intensity;
        surface.fill_circle(
            from.lerp(to, progress),
            FLOW_DOT_RADIUS,
            self.config.colors.primary.with_alpha(alpha),
        );
    }

    fn draw_node(&self, surface: &mut dyn Surface, node: &Node) {
        let center = node.position();
        let pulse = (self.time as f64 * self.config.pulse_frequency + node.pulse_offset).sin();
        let depth_opacity = node.depth_opacity();
        let colors = self.config.colors;
        let body = colors.secondary.lerp(colors.primary, node.pressure);

        if self.config.enable_glow && node.pressure > GLOW_PRESSURE {
            let glow_size = node.size * (2.0 + pulse * 0.5);
            let alpha = 0.4 * node.pressure * self.intensity * depth_opacity;
            surface.fill_radial_glow(
                center,
                glow_size * 2.0,
                colors.primary.with_alpha(alpha),
                colors.primary.with_alpha(0.0),
            );
        }

        let size = node.effective_size();
        let fill = body.with_alpha(depth_opacity);
        match node.kind {
            NodeKind::Valve => {
                let outline = Stroke::new(palette::WHITE.with_alpha(0.2), 1.0);
                surface.fill_polygon(&hexagon(center, size * 1.5), fill, Some(outline));
            }
            NodeKind::Junction => {
                surface.fill_circle(center, size, fill);
                let ring_alpha = (0.2 + node.pressure * 0.3) * self.intensity * depth_opacity;
                surface.stroke_circle(
                    center,
                    size * 1.8,
                    Stroke::new(palette::SLATE.with_alpha(ring_alpha), 0.5),
                );
            }
        }
    }
}

impl Scene for NodeField {
    /// Re-resolve the adaptive defaults for the new width and start over
    fn resize(&mut self, width: f64, height: f64) {
        self.env = self.env.resized(width, height);
        self.config = FieldConfig::resolve(&self.options, &self.env);
        self.populate();
    }

    fn set_pointer(&mut self, pointer: Option<Point>) {
        self.pointer = pointer;
    }

    fn update(&mut self) {
        self.tick();
    }

    fn render(&self, surface: &mut dyn Surface) {
        self.draw(surface);
    }

    fn set_intensity(&mut self, value: f64) {
        self.intensity = value.clamp(0.0, 1.0);
    }

    fn intensity(&self) -> f64 {
        self.intensity
    }

    fn frame_skip(&self) -> u32 {
        self.config.frame_skip
    }

    fn viewport(&self) -> (f64, f64) {
        (self.env.viewport_width, self.env.viewport_height)
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{PRESSURE_CEILING, PRESSURE_FLOOR};
    use crate::render::{DrawCall, Recording};

    fn desktop() -> Environment {
        Environment::new(1280.0, 800.0).with_hardware_concurrency(8)
    }

    fn two_node_field(distance: f64, pressure: f64) -> NodeField {
        let options = FieldOptions {
            node_count: Some(2),
            ..Default::default()
        };
        let mut field = NodeField::new(options, desktop(), 1);
        let nodes = field.nodes_mut();
        nodes[0] = Node::at(400.0, 400.0);
        nodes[1] = Node::at(400.0 + distance, 400.0);
        nodes[0].pressure = pressure;
        nodes[1].pressure = pressure;
        field
    }

    #[test]
    fn creates_configured_node_count() {
        let field = NodeField::new(FieldOptions::default(), desktop(), 3);
        assert_eq!(field.len(), 45);
        assert_eq!(field.time(), 0);
    }

    #[test]
    fn same_seed_same_field() {
        let a = NodeField::new(FieldOptions::default(), desktop(), 42);
        let b = NodeField::new(FieldOptions::default(), desktop(), 42);
        assert_eq!(a.nodes(), b.nodes());
    }

    #[test]
    fn pressure_stays_in_bounds_under_pointer() {
        let mut field = NodeField::new(FieldOptions::default(), desktop(), 9);
        for frame in 0..600 {
            // Sweep the pointer across the viewport, with gaps
            let pointer = (frame % 100 < 80)
                .then(|| Point::new((frame * 7 % 1280) as f64, (frame * 3 % 800) as f64));
            field.set_pointer(pointer);
            field.tick();
            for node in field.nodes() {
                assert!(node.pressure >= PRESSURE_FLOOR);
                assert!(node.pressure <= PRESSURE_CEILING);
            }
        }
    }

    #[test]
    fn pressure_does_not_rise_without_pointer() {
        let mut field = NodeField::new(FieldOptions::default(), desktop(), 5);
        let initial: Vec<f64> = field.nodes().iter().map(|n| n.pressure).collect();

        for _ in 0..1000 {
            field.tick();
        }

        for (node, before) in field.nodes().iter().zip(initial) {
            assert!(node.pressure <= before);
            assert_eq!(node.pressure, PRESSURE_FLOOR);
        }
    }

    #[test]
    fn resize_regenerates_for_new_width() {
        let mut field = NodeField::new(FieldOptions::default(), desktop(), 5);
        let before = field.nodes().to_vec();
        field.tick();

        field.resize(400.0, 700.0);

        // Narrow viewport: mobile node count and cheaper effects
        assert_eq!(field.len(), 20);
        assert!(!field.config().enable_glow);
        assert_eq!(field.viewport(), (400.0, 700.0));
        assert!(field.nodes().iter().all(|n| n.x < 400.0 && n.y < 700.0));
        assert_ne!(&field.nodes()[..20], &before[..20]);
    }

    #[test]
    fn resize_keeps_explicit_node_count() {
        let options = FieldOptions {
            node_count: Some(7),
            ..Default::default()
        };
        let mut field = NodeField::new(options, desktop(), 5);
        field.resize(300.0, 300.0);
        assert_eq!(field.len(), 7);
    }

    #[test]
    fn intensity_is_clamped() {
        let mut field = NodeField::new(FieldOptions::default(), desktop(), 1);
        field.set_intensity(3.0);
        assert_eq!(field.intensity(), 1.0);
        field.set_intensity(-1.0);
        assert_eq!(field.intensity(), 0.0);
    }

    #[test]
    fn high_pressure_pair_gets_double_stroke_and_flow_dot() {
        let field = two_node_field(50.0, 0.6);
        let mut surface = Recording::new();
        field.draw(&mut surface);

        let lines: Vec<_> = surface.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].2.width, 2.0);
        assert_eq!(lines[1].2.width, 1.0);
        assert_eq!(lines[0].2.color.rgb, palette::PRIMARY);

        // Inner stroke is brighter than the outer one
        assert!(lines[1].2.color.alpha > lines[0].2.color.alpha);

        let flow_dots = surface
            .calls
            .iter()
            .filter(|call| matches!(call, DrawCall::FillCircle { radius, .. } if *radius == FLOW_DOT_RADIUS))
            .count();
        assert_eq!(flow_dots, 1);

        // Both nodes glow at pressure 0.6
        assert_eq!(surface.glows().count(), 2);
    }

    #[test]
    fn low_pressure_pair_gets_single_slate_line() {
        let field = two_node_field(50.0, 0.2);
        let mut surface = Recording::new();
        field.draw(&mut surface);

        let lines: Vec<_> = surface.lines().collect();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].2.color.rgb, palette::SLATE);
        assert_eq!(surface.glows().count(), 0);
    }

    #[test]
    fn distant_pair_is_not_connected() {
        let field = two_node_field(180.0, 0.6);
        let mut surface = Recording::new();
        field.draw(&mut surface);
        assert_eq!(surface.lines().count(), 0);
    }

    #[test]
    fn connections_are_drawn_once_per_pair() {
        let options = FieldOptions {
            node_count: Some(4),
            ..Default::default()
        };
        let mut field = NodeField::new(options, desktop(), 1);
        for (i, node) in field.nodes_mut().iter_mut().enumerate() {
            *node = Node::at(100.0 + i as f64 * 10.0, 100.0);
        }

        let mut surface = Recording::new();
        field.draw(&mut surface);

        // 4 nodes all within range: C(4, 2) pairs, one low pressure line each
        let mut pairs: Vec<((i64, i64), (i64, i64))> = surface
            .lines()
            .map(|(a, b, _)| {
                let a = (a.x as i64, a.y as i64);
                let b = (b.x as i64, b.y as i64);
                if a <= b { (a, b) } else { (b, a) }
            })
            .collect();
        assert_eq!(pairs.len(), 6);
        pairs.sort();
        pairs.dedup();
        assert_eq!(pairs.len(), 6);
    }

    #[test]
    fn zero_intensity_hides_connections_and_glow() {
        let mut field = two_node_field(30.0, 0.9);
        field.set_intensity(0.0);
        // Let the connection pulse swing through its whole period
        for _ in 0..500 {
            field.tick();
            let mut surface = Recording::new();
            field.draw(&mut surface);

            for (_, _, stroke) in surface.lines() {
                assert!(stroke.color.is_transparent());
            }
            for call in &surface.calls {
                match call {
                    DrawCall::Glow { inner, .. } => assert!(inner.is_transparent()),
                    DrawCall::StrokeCircle { stroke, .. } => {
                        assert!(stroke.color.is_transparent())
                    }
                    DrawCall::FillCircle { radius, fill, .. } if *radius == FLOW_DOT_RADIUS => {
                        assert!(fill.is_transparent())
                    }
                    _ => {}
                }
            }
        }
    }

    #[test]
    fn full_intensity_matches_nominal_opacity() {
        let field = two_node_field(90.0, 0.2);
        let mut surface = Recording::new();
        field.draw(&mut surface);

        // t = 0 and pair index 0: the pulse term is zero
        let (_, _, stroke) = surface.lines().next().unwrap();
        assert!((stroke.color.alpha - 0.5 * 0.3).abs() < 1e-12);
    }

    #[test]
    fn valve_is_drawn_as_hexagon() {
        let mut field = two_node_field(500.0, 0.2);
        field.nodes_mut()[0].kind = NodeKind::Valve;
        let mut surface = Recording::new();
        field.draw(&mut surface);

        let polygons: Vec<_> = surface
            .calls
            .iter()
            .filter_map(|call| match call {
                DrawCall::Polygon { points, outline, .. } => Some((points.len(), outline.is_some())),
                _ => None,
            })
            .collect();
        assert_eq!(polygons, vec![(6, true)]);
    }

    #[test]
    fn node_color_follows_pressure() {
        let field = two_node_field(500.0, 1.0);
        let mut surface = Recording::new();
        field.draw(&mut surface);

        let body = surface
            .calls
            .iter()
            .find_map(|call| match call {
                DrawCall::FillCircle { fill, .. } => Some(*fill),
                _ => None,
            })
            .unwrap();
        assert_eq!(body.rgb, palette::PRIMARY);
        // depth 1.0 is fully opaque
        assert_eq!(body.alpha, 1.0);
    }

    #[test]
    fn frame_starts_with_clear() {
        let field = NodeField::new(FieldOptions::default(), desktop(), 1);
        let mut surface = Recording::new();
        field.draw(&mut surface);
        assert_eq!(
            surface.calls.first(),
            Some(&DrawCall::Clear {
                width: 1280.0,
                height: 800.0
            })
        );
        assert_eq!(surface.frames(), 1);
    }
}
