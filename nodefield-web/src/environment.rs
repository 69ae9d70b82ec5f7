//! Reading the device environment from `window`

use nodefield_core::Environment;
use web_sys::Window;

const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

/// Viewport size in CSS pixels
pub fn viewport_size(window: &Window) -> (f64, f64) {
    let width = window
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0);
    let height = window
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0);
    (width, height)
}

/// Snapshot of viewport, core count and motion preference
pub fn read_environment(window: &Window) -> Environment {
    let (width, height) = viewport_size(window);
    let reduced_motion = window
        .match_media(REDUCED_MOTION_QUERY)
        .ok()
        .flatten()
        .is_some_and(|query| query.matches());

    Environment {
        viewport_width: width,
        viewport_height: height,
        hardware_concurrency: cores_hint(window.navigator().hardware_concurrency()),
        prefers_reduced_motion: reduced_motion,
    }
}

/// Browsers that hide the core count report 0 or nothing at all
pub fn cores_hint(reported: f64) -> Option<u32> {
    (reported.is_finite() && reported >= 1.0).then(|| reported as u32)
}

/// Seed for node placement
pub fn random_seed() -> u64 {
    (js_sys::Math::random() * u64::MAX as f64) as u64
}
