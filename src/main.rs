use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use nodefield::config_file::{self, ConfigFormat};
use nodefield::headless::{self, RenderSettings, Variant};
use nodefield_core::{Environment, FieldConfig, FieldOptions, Point};
use tracing_subscriber::EnvFilter;

mod server;

/// Headless renderer, config inspector and dev server for the nodefield animation.
#[derive(Parser)]
#[command(name = "nodefield")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a field and write its final frame as SVG
    Render {
        /// Viewport width in pixels
        #[arg(long, default_value = "1280")]
        width: f64,

        /// Viewport height in pixels
        #[arg(long, default_value = "800")]
        height: f64,

        /// Animation callbacks to simulate
        #[arg(long, default_value = "120")]
        frames: u32,

        /// Seed for node placement
        #[arg(long, default_value = "0")]
        seed: u64,

        /// Field options file (.json, .yaml or .yml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = Variant::Industrial)]
        variant: Variant,

        /// Reported CPU core count
        #[arg(long)]
        cores: Option<u32>,

        /// Pointer position as X,Y
        #[arg(long, value_parser = parse_point)]
        pointer: Option<Point>,

        /// Global opacity multiplier in [0, 1]
        #[arg(long)]
        intensity: Option<f64>,

        /// Draw a single static frame
        #[arg(long)]
        reduced_motion: bool,

        /// Output SVG file
        #[arg(short, long, default_value = "field.svg")]
        output: PathBuf,
    },
    /// Print the configuration resolved for a viewport
    Config {
        /// Viewport width in pixels
        #[arg(long, default_value = "1280")]
        width: f64,

        /// Reported CPU core count
        #[arg(long)]
        cores: Option<u32>,

        /// Field options file (.json, .yaml or .yml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = ConfigFormat::Json)]
        format: ConfigFormat,
    },
    /// Serve the browser demo with live reload
    Serve {
        /// Directory to serve
        #[arg(short, long, default_value = "demo")]
        dir: PathBuf,

        /// Port to run the server on
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },
}

fn parse_point(value: &str) -> Result<Point, String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but got '{value}'"))?;
    let x = x.trim().parse::<f64>().map_err(|e| e.to_string())?;
    let y = y.trim().parse::<f64>().map_err(|e| e.to_string())?;
    Ok(Point::new(x, y))
}

fn load_options(path: Option<&Path>) -> anyhow::Result<FieldOptions> {
    match path {
        Some(path) => config_file::load_options(path)
            .with_context(|| format!("failed to load {}", path.display())),
        None => Ok(FieldOptions::default()),
    }
}

fn write_render(settings: &RenderSettings, output: &Path) -> anyhow::Result<()> {
    let report = headless::render(settings)?;
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(output, &report.svg)
        .with_context(|| format!("failed to write {}", output.display()))?;
    println!(
        "Rendered {} entities after {} frames to {}",
        report.entities,
        report.frames_rendered,
        output.display()
    );
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            width,
            height,
            frames,
            seed,
            config,
            variant,
            cores,
            pointer,
            intensity,
            reduced_motion,
            output,
        } => {
            let settings = RenderSettings {
                width,
                height,
                frames,
                seed,
                variant,
                options: load_options(config.as_deref())?,
                cores,
                pointer,
                intensity,
                reduced_motion,
            };
            write_render(&settings, &output)?;
        }
        Commands::Config {
            width,
            cores,
            config,
            format,
        } => {
            let options = load_options(config.as_deref())?;
            let mut env = Environment::new(width, Environment::default().viewport_height);
            if let Some(cores) = cores {
                env = env.with_hardware_concurrency(cores);
            }
            let resolved = FieldConfig::resolve(&options, &env);
            println!("{}", config_file::format_config(&resolved, format)?);
        }
        Commands::Serve { dir, port } => {
            server::serve_static(&dir, port).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_render_with_defaults() {
        let cli = Cli::try_parse_from(["nodefield", "render"]).unwrap();
        match cli.command {
            Commands::Render {
                width,
                frames,
                variant,
                pointer,
                output,
                ..
            } => {
                assert_eq!(width, 1280.0);
                assert_eq!(frames, 120);
                assert_eq!(variant, Variant::Industrial);
                assert!(pointer.is_none());
                assert_eq!(output, PathBuf::from("field.svg"));
            }
            _ => panic!("Expected Render command"),
        }
    }

    #[test]
    fn cli_parses_render_options() {
        let cli = Cli::try_parse_from([
            "nodefield",
            "render",
            "--variant",
            "particles",
            "--pointer",
            "120,45.5",
            "--reduced-motion",
            "--output",
            "out/frame.svg",
        ])
        .unwrap();
        match cli.command {
            Commands::Render {
                variant,
                pointer,
                reduced_motion,
                output,
                ..
            } => {
                assert_eq!(variant, Variant::Particles);
                assert_eq!(pointer, Some(Point::new(120.0, 45.5)));
                assert!(reduced_motion);
                assert_eq!(output, PathBuf::from("out/frame.svg"));
            }
            _ => panic!("Expected Render command"),
        }
    }

    #[test]
    fn cli_rejects_malformed_pointer() {
        assert!(Cli::try_parse_from(["nodefield", "render", "--pointer", "12"]).is_err());
    }

    #[test]
    fn cli_parses_config_subcommand() {
        let cli = Cli::try_parse_from([
            "nodefield", "config", "--width", "375", "--format", "yaml",
        ])
        .unwrap();
        match cli.command {
            Commands::Config { width, format, .. } => {
                assert_eq!(width, 375.0);
                assert_eq!(format, ConfigFormat::Yaml);
            }
            _ => panic!("Expected Config command"),
        }
    }

    #[test]
    fn cli_parses_serve_subcommand() {
        let cli = Cli::try_parse_from(["nodefield", "serve", "--port", "8080"]).unwrap();
        match cli.command {
            Commands::Serve { dir, port } => {
                assert_eq!(dir, PathBuf::from("demo"));
                assert_eq!(port, 8080);
            }
            _ => panic!("Expected Serve command"),
        }
    }
}
