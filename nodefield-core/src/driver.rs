//! Frame loop lifecycle
//!
//! The [`Driver`] sits between a host's display-refresh callback and a
//! [`Scene`]. It owns the loop state, applies frame skipping and makes sure
//! nothing touches the scene or the surface once it has been destroyed, even
//! if the host still delivers an already queued callback.
//!
//! Input handlers only record state. Pointer positions go straight into the
//! scene; a resize is parked and applied at the start of the next executed
//! frame.

use crate::render::{Point, Surface};
use crate::scene::Scene;

/// Input delivered by the host between frames
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Resize { width: f64, height: f64 },
    PointerMove(Point),
    PointerLeave,
    /// Position of the first active touch
    TouchMove(Point),
    TouchEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Constructed, not started yet
    Idle,
    /// Animating; the host keeps scheduling frames
    Running,
    /// Reduced motion: one frame was drawn, no frames are scheduled
    Static,
    Destroyed,
}

/// What happened in one animation callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Throttled away; nothing was updated or drawn
    Skipped,
    Rendered,
    /// The loop is not running; do not schedule another callback
    Stopped,
}

impl FrameOutcome {
    pub fn reschedule(self) -> bool {
        !matches!(self, FrameOutcome::Stopped)
    }
}

/// Runs only every Nth scheduled callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameThrottle {
    callbacks: u64,
    skip: u32,
}

impl FrameThrottle {
    /// A skip factor of 0 behaves like 1
    pub fn new(skip: u32) -> Self {
        Self {
            callbacks: 0,
            skip: skip.max(1),
        }
    }

    pub fn set_skip(&mut self, skip: u32) {
        self.skip = skip.max(1);
    }

    /// Count a callback and report whether it should do work
    pub fn should_run(&mut self) -> bool {
        self.callbacks += 1;
        self.callbacks % u64::from(self.skip) == 0
    }

    pub fn callbacks(&self) -> u64 {
        self.callbacks
    }
}

/// Lifecycle state machine around a scene
#[derive(Debug)]
pub struct Driver<S> {
    scene: S,
    state: LoopState,
    throttle: FrameThrottle,
    pending_resize: Option<(f64, f64)>,
}

impl<S: Scene> Driver<S> {
    pub fn new(scene: S) -> Self {
        let throttle = FrameThrottle::new(scene.frame_skip());
        Self {
            scene,
            state: LoopState::Idle,
            throttle,
            pending_resize: None,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }

    /// Start the loop, or draw a single static frame under reduced motion
    ///
    /// Only an idle driver can start; otherwise the current state is returned
    /// unchanged.
    pub fn start(&mut self, surface: &mut dyn Surface, reduced_motion: bool) -> LoopState {
        if self.state != LoopState::Idle {
            return self.state;
        }

        if reduced_motion {
            self.apply_pending_resize(surface);
            self.scene.render(surface);
            self.state = LoopState::Static;
            tracing::debug!("reduced motion: drew a single static frame");
        } else {
            self.state = LoopState::Running;
            tracing::debug!(frame_skip = self.scene.frame_skip(), "animation loop started");
        }
        self.state
    }

    /// Record an input event
    ///
    /// In static mode a resize is applied right away and the static frame is
    /// redrawn, since no frame callback will come to pick it up.
    pub fn handle(&mut self, event: InputEvent, surface: &mut dyn Surface) {
        if self.state == LoopState::Destroyed {
            return;
        }

        match event {
            InputEvent::Resize { width, height } => {
                self.pending_resize = Some((width, height));
                if self.state == LoopState::Static {
                    self.apply_pending_resize(surface);
                    self.scene.render(surface);
                }
            }
            InputEvent::PointerMove(point) | InputEvent::TouchMove(point) => {
                self.scene.set_pointer(Some(point));
            }
            InputEvent::PointerLeave | InputEvent::TouchEnd => {
                self.scene.set_pointer(None);
            }
        }
    }

    /// Body of one display-refresh callback
    pub fn on_frame(&mut self, surface: &mut dyn Surface) -> FrameOutcome {
        if self.state != LoopState::Running {
            return FrameOutcome::Stopped;
        }
        if !self.throttle.should_run() {
            return FrameOutcome::Skipped;
        }

        self.apply_pending_resize(surface);
        self.scene.update();
        self.scene.render(surface);
        FrameOutcome::Rendered
    }

    pub fn set_intensity(&mut self, value: f64) {
        if self.state != LoopState::Destroyed {
            self.scene.set_intensity(value);
        }
    }

    /// Stop for good; returns `false` if already destroyed
    pub fn destroy(&mut self) -> bool {
        if self.state == LoopState::Destroyed {
            return false;
        }
        self.state = LoopState::Destroyed;
        self.pending_resize = None;
        tracing::debug!("animation loop destroyed");
        true
    }

    fn apply_pending_resize(&mut self, surface: &mut dyn Surface) {
        if let Some((width, height)) = self.pending_resize.take() {
            surface.resize(width, height);
            self.scene.resize(width, height);
            self.throttle.set_skip(self.scene.frame_skip());
            tracing::debug!(width, height, entities = self.scene.len(), "viewport resized");
        }
    }
}
