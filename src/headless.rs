//! Running a field without a browser
//!
//! The same [`Driver`] that backs the WASM bindings is fed synthetic frame
//! callbacks, and the last frame is captured with an [`SvgSurface`].

use nodefield_core::{
    Driver, Environment, FieldOptions, FrameOutcome, InputEvent, LoopState, NodeField,
    ParticleField, Point, Scene,
};

use crate::svg::SvgSurface;

/// Which field to simulate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Variant {
    #[default]
    Industrial,
    Particles,
}

/// Parameters of a headless run
#[derive(Debug, Clone)]
pub struct RenderSettings {
    pub width: f64,
    pub height: f64,
    /// Display-refresh callbacks to simulate; frame skipping still applies
    pub frames: u32,
    pub seed: u64,
    pub variant: Variant,
    pub options: FieldOptions,
    pub cores: Option<u32>,
    pub pointer: Option<Point>,
    pub intensity: Option<f64>,
    pub reduced_motion: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 800.0,
            frames: 60,
            seed: 0,
            variant: Variant::Industrial,
            options: FieldOptions::default(),
            cores: None,
            pointer: None,
            intensity: None,
            reduced_motion: false,
        }
    }
}

/// Result of a headless run
#[derive(Debug, Clone)]
pub struct RenderReport {
    pub svg: String,
    /// Callbacks that updated and drew the scene
    pub frames_rendered: u32,
    pub entities: usize,
    pub state: LoopState,
}

pub fn build_scene(settings: &RenderSettings) -> Box<dyn Scene> {
    let mut env = Environment::new(settings.width, settings.height)
        .with_reduced_motion(settings.reduced_motion);
    if let Some(cores) = settings.cores {
        env = env.with_hardware_concurrency(cores);
    }

    match settings.variant {
        Variant::Industrial => Box::new(NodeField::new(
            settings.options.clone(),
            env,
            settings.seed,
        )),
        Variant::Particles => Box::new(ParticleField::new(env, settings.seed)),
    }
}

/// Simulate `settings.frames` callbacks and capture the final frame
pub fn render(settings: &RenderSettings) -> Result<RenderReport, askama::Error> {
    let mut surface = SvgSurface::new(settings.width, settings.height);
    let mut driver = Driver::new(build_scene(settings));

    if let Some(intensity) = settings.intensity {
        driver.set_intensity(intensity);
    }
    if let Some(pointer) = settings.pointer {
        driver.handle(InputEvent::PointerMove(pointer), &mut surface);
    }

    let state = driver.start(&mut surface, settings.reduced_motion);
    let mut frames_rendered = 0;
    if state == LoopState::Running {
        for _ in 0..settings.frames {
            if driver.on_frame(&mut surface) == FrameOutcome::Rendered {
                frames_rendered += 1;
            }
        }
        // Too few callbacks to get past frame skipping: still show the field
        if frames_rendered == 0 {
            driver.scene().render(&mut surface);
        }
    }

    tracing::info!(
        variant = ?settings.variant,
        frames_rendered,
        elements = surface.element_count(),
        "headless render finished"
    );

    Ok(RenderReport {
        svg: surface.to_document()?,
        frames_rendered,
        entities: driver.scene().len(),
        state,
    })
}
