//! Field configuration and viewport-adaptive defaults
//!
//! Callers pass a partial [`FieldOptions`]; anything left out is filled in by
//! [`FieldConfig::resolve`] from the [`Environment`]. Narrow viewports and
//! devices with few cores get fewer nodes and cheaper effects.
//!
//! Values are not validated. Out-of-range numbers produce odd visuals, never
//! errors.

use serde::{Deserialize, Serialize};

use crate::color::{Rgb, palette};

/// Viewports narrower than this are treated as mobile
pub const MOBILE_BREAKPOINT: f64 = 768.0;

/// Devices reporting at most this many logical cores are treated as low power
pub const LOW_POWER_CORES: u32 = 4;

/// What the host environment tells us about the device
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    pub viewport_width: f64,
    pub viewport_height: f64,
    /// `navigator.hardwareConcurrency`, if the platform reports it
    pub hardware_concurrency: Option<u32>,
    pub prefers_reduced_motion: bool,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            viewport_width: 1280.0,
            viewport_height: 800.0,
            hardware_concurrency: None,
            prefers_reduced_motion: false,
        }
    }
}

impl Environment {
    pub fn new(viewport_width: f64, viewport_height: f64) -> Self {
        Self {
            viewport_width,
            viewport_height,
            ..Default::default()
        }
    }

    pub fn with_hardware_concurrency(mut self, cores: u32) -> Self {
        self.hardware_concurrency = Some(cores);
        self
    }

    pub fn with_reduced_motion(mut self, reduced: bool) -> Self {
        self.prefers_reduced_motion = reduced;
        self
    }

    pub fn is_mobile(&self) -> bool {
        self.viewport_width < MOBILE_BREAKPOINT
    }

    /// An unknown core count is not considered low power
    pub fn is_low_power(&self) -> bool {
        self.hardware_concurrency
            .is_some_and(|cores| cores <= LOW_POWER_CORES)
    }

    /// Same environment after the viewport changed size
    pub fn resized(&self, width: f64, height: f64) -> Self {
        Self {
            viewport_width: width,
            viewport_height: height,
            ..*self
        }
    }
}

/// Inclusive-exclusive range of node radii
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeRange {
    pub min: f64,
    pub max: f64,
}

/// Low and high pressure colors
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorPair {
    /// High pressure color, also used for glow and flow indicators
    pub primary: Rgb,
    /// Low pressure color
    pub secondary: Rgb,
}

impl Default for ColorPair {
    fn default() -> Self {
        Self {
            primary: palette::PRIMARY,
            secondary: palette::SECONDARY,
        }
    }
}

/// Partially specified color pair
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary: Option<Rgb>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary: Option<Rgb>,
}

/// Caller-supplied overrides; every key is optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection_distance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_size: Option<SizeRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colors: Option<ColorOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mouse_radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flow_speed: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pulse_frequency: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_glow: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_flow_indicators: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame_skip: Option<u32>,
}

/// Fully resolved configuration of the industrial node field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldConfig {
    pub node_count: usize,
    /// Pairs closer than this get a connection
    pub connection_distance: f64,
    pub node_size: SizeRange,
    pub colors: ColorPair,
    /// Pointer influence radius
    pub mouse_radius: f64,
    /// Flow indicator speed along a connection
    pub flow_speed: f64,
    /// Angular speed of the node pulse, per tick
    pub pulse_frequency: f64,
    pub enable_glow: bool,
    pub enable_flow_indicators: bool,
    /// Only every Nth animation callback does work
    pub frame_skip: u32,
}

impl FieldConfig {
    /// Fill omitted options with defaults adapted to `env`
    pub fn resolve(options: &FieldOptions, env: &Environment) -> Self {
        let mobile = env.is_mobile();
        let low_power = env.is_low_power();

        let default_count = if mobile {
            20
        } else if low_power {
            30
        } else {
            45
        };

        let colors = options.colors.unwrap_or_default();
        let defaults = ColorPair::default();

        Self {
            node_count: options.node_count.unwrap_or(default_count),
            connection_distance: options
                .connection_distance
                .unwrap_or(if mobile { 100.0 } else { 180.0 }),
            node_size: options.node_size.unwrap_or(SizeRange { min: 2.0, max: 6.0 }),
            colors: ColorPair {
                primary: colors.primary.unwrap_or(defaults.primary),
                secondary: colors.secondary.unwrap_or(defaults.secondary),
            },
            mouse_radius: options
                .mouse_radius
                .unwrap_or(if mobile { 150.0 } else { 300.0 }),
            flow_speed: options.flow_speed.unwrap_or(0.8),
            pulse_frequency: options.pulse_frequency.unwrap_or(0.02),
            enable_glow: options.enable_glow.unwrap_or(!mobile),
            enable_flow_indicators: options.enable_flow_indicators.unwrap_or(!mobile),
            frame_skip: options.frame_skip.unwrap_or(if mobile { 2 } else { 1 }),
        }
    }
}
