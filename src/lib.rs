//! nodefield - headless tooling for the nodefield background animation
//!
//! The simulation itself lives in `nodefield-core`. This crate adds what is
//! needed to use it outside a browser: config file loading, an SVG surface
//! and a headless frame runner.

pub mod config_file;
pub mod headless;
pub mod svg;
