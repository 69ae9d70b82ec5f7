//! Common interface of the animated fields
//!
//! The lifecycle [`Driver`](crate::driver::Driver) only knows about this
//! trait, so the browser shell and the CLI can host either field variant.

use crate::render::{Point, Surface};

pub trait Scene {
    /// Adopt a new viewport size; the entity set is regenerated
    fn resize(&mut self, width: f64, height: f64);

    /// Current pointer, `None` when there is none
    fn set_pointer(&mut self, pointer: Option<Point>);

    /// Advance the simulation by one tick
    fn update(&mut self);

    /// Draw a complete frame, clearing the surface first
    fn render(&self, surface: &mut dyn Surface);

    /// Global opacity multiplier, clamped into [0, 1]
    fn set_intensity(&mut self, value: f64);

    fn intensity(&self) -> f64;

    /// Only every Nth animation callback should advance the scene
    fn frame_skip(&self) -> u32;

    /// Viewport size as `(width, height)`
    fn viewport(&self) -> (f64, f64);

    /// Number of simulated entities
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<S: Scene + ?Sized> Scene for Box<S> {
    fn resize(&mut self, width: f64, height: f64) {
        (**self).resize(width, height)
    }

    fn set_pointer(&mut self, pointer: Option<Point>) {
        (**self).set_pointer(pointer)
    }

    fn update(&mut self) {
        (**self).update()
    }

    fn render(&self, surface: &mut dyn Surface) {
        (**self).render(surface)
    }

    fn set_intensity(&mut self, value: f64) {
        (**self).set_intensity(value)
    }

    fn intensity(&self) -> f64 {
        (**self).intensity()
    }

    fn frame_skip(&self) -> u32 {
        (**self).frame_skip()
    }

    fn viewport(&self) -> (f64, f64) {
        (**self).viewport()
    }

    fn len(&self) -> usize {
        (**self).len()
    }
}
