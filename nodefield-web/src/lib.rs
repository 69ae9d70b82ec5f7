//! WASM bindings for the nodefield background animation
//!
//! Mount a field into any container element:
//!
//! ```js
//! import init, { mount_node_field } from "./pkg/nodefield_web.js";
//! await init();
//! const field = mount_node_field(document.getElementById("hero"), '{"node_count": 30}');
//! field.set_intensity(0.6);
//! // later
//! field.destroy();
//! ```

mod canvas2d;
mod environment;
mod mount;
mod scroll;

use nodefield_core::{FieldOptions, NodeField, ParticleField};
use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

pub use mount::FieldHandle;
pub use scroll::PageScrollLock;

/// Initialize panic hook and console logging
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    // Already initialized when several modules share the logger
    let _ = console_log::init_with_level(log::Level::Info);
}

/// Mount the industrial node field into `container`
///
/// `options_json` holds optional overrides such as `node_count` or
/// `enable_glow`. Malformed JSON falls back to the adaptive defaults.
#[wasm_bindgen]
pub fn mount_node_field(
    container: &HtmlElement,
    options_json: Option<String>,
) -> Result<FieldHandle, JsValue> {
    let options = parse_options(options_json.as_deref());
    mount::mount(container, move |env, seed| {
        Box::new(NodeField::new(options, env, seed))
    })
}

/// Mount the lighter particle field variant into `container`
#[wasm_bindgen]
pub fn mount_particle_field(container: &HtmlElement) -> Result<FieldHandle, JsValue> {
    mount::mount(container, |env, seed| Box::new(ParticleField::new(env, seed)))
}

fn parse_options(json: Option<&str>) -> FieldOptions {
    let Some(json) = json.filter(|s| !s.trim().is_empty()) else {
        return FieldOptions::default();
    };
    match serde_json::from_str(json) {
        Ok(options) => options,
        Err(err) => {
            tracing::warn!(%err, "ignoring malformed field options");
            FieldOptions::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_options_use_defaults() {
        assert_eq!(parse_options(None), FieldOptions::default());
        assert_eq!(parse_options(Some("  ")), FieldOptions::default());
    }

    #[test]
    fn malformed_options_use_defaults() {
        assert_eq!(parse_options(Some("{node_count")), FieldOptions::default());
    }

    #[test]
    fn options_use_config_key_names() {
        let options = parse_options(Some(r#"{"node_count": 12, "enable_glow": false}"#));
        assert_eq!(options.node_count, Some(12));
        assert_eq!(options.enable_glow, Some(false));
    }
}
