//! Simulation and rendering core for the nodefield background animation
//!
//! This crate has no browser dependencies. It models the animated fields,
//! draws them onto any [`Surface`] and drives their lifecycle, so the same
//! code runs in the WASM bindings, in the headless CLI and in unit tests.

pub mod color;
pub mod config;
pub mod driver;
pub mod field;
pub mod node;
pub mod particles;
pub mod render;
pub mod scene;
pub mod scroll_lock;

pub use color::{Rgb, Rgba};
pub use config::{Environment, FieldConfig, FieldOptions};
pub use driver::{Driver, FrameOutcome, InputEvent, LoopState};
pub use field::NodeField;
pub use node::{Node, NodeKind};
pub use particles::ParticleField;
pub use render::{Point, Recording, Stroke, Surface};
pub use scene::Scene;
pub use scroll_lock::{ScrollHost, ScrollLock};
