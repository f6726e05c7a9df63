//! ILI9341 Panel Control Tool
//!
//! Drives the ILI9341 driver against the software panel emulator and saves
//! what would be on the glass as a PNG, or dumps the raw bus traffic.

mod config;
mod demo;
mod scene;
mod screenshot;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::Config;
use embedded_hal::delay::DelayNs;
use ili9341_panel_hw::{
    BusEvent, ClipPolicy, Ili9341, Orientation, PanelEmulator, RecordingTransport, Transport,
};
use scene::Scene;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ili9341ctl")]
#[command(about = "Drive an emulated ILI9341 panel and inspect its bus traffic")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured orientation
    #[arg(long)]
    orientation: Option<Orientation>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Draw the built-in showcase and save a screenshot
    Demo {
        /// Output PNG path (default: from config)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Execute a scene file and save a screenshot
    Render {
        /// Scene file (TOML)
        scene: PathBuf,

        /// Output PNG path (default: from config)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the bus transactions of the init sequence
    Trace {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,

        /// Also trace a scene after init
        #[arg(long)]
        scene: Option<PathBuf>,
    },
}

/// Blocking delay on the host; disabled means every wait returns at once.
struct HostDelay {
    enabled: bool,
}

impl DelayNs for HostDelay {
    fn delay_ns(&mut self, ns: u32) {
        if self.enabled {
            std::thread::sleep(Duration::from_nanos(ns as u64));
        }
    }

    fn delay_ms(&mut self, ms: u32) {
        if self.enabled {
            std::thread::sleep(Duration::from_millis(ms as u64));
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut config = Config::load_or_default(cli.config.as_deref())?;
    if let Some(orientation) = cli.orientation {
        config.panel.orientation = orientation;
    }

    match cli.command {
        Commands::Demo { output } => handle_demo(&config, output),
        Commands::Render { scene, output } => handle_render(&config, &scene, output),
        Commands::Trace { json, scene } => handle_trace(&config, json, scene),
    }
}

/// Builds and initializes a driver on top of `transport`.
fn bring_up<T: Transport>(config: &Config, transport: T, settle: bool) -> Result<Ili9341<T>> {
    let clip = if config.panel.strict {
        ClipPolicy::Strict
    } else {
        ClipPolicy::Clamp
    };
    let mut lcd = Ili9341::new(transport)
        .with_orientation(config.panel.orientation)
        .with_clip_policy(clip);
    lcd.init(&mut HostDelay { enabled: settle })
        .context("Failed to initialize panel")?;
    Ok(lcd)
}

fn handle_demo(config: &Config, output: Option<PathBuf>) -> Result<()> {
    let mut lcd = bring_up(config, PanelEmulator::new(), config.panel.settle_delays)?;
    demo::draw(&mut lcd, config.output.background).context("Demo drawing failed")?;

    let output = output.unwrap_or_else(|| config.output.path.clone());
    screenshot::save_png(lcd.transport().framebuffer(), &output)?;
    info!(
        "{} pixel words in {} transactions",
        lcd.transport().pixel_words(),
        lcd.transport().transactions()
    );
    println!("Screenshot saved to: {}", output.display());
    Ok(())
}

fn handle_render(config: &Config, scene: &Path, output: Option<PathBuf>) -> Result<()> {
    let scene = Scene::load(scene)?;
    let mut lcd = bring_up(config, PanelEmulator::new(), config.panel.settle_delays)?;
    lcd.fill_screen(config.output.background)
        .context("Failed to clear panel")?;
    scene.run(&mut lcd)?;

    let output = output.unwrap_or_else(|| config.output.path.clone());
    screenshot::save_png(lcd.transport().framebuffer(), &output)?;
    println!("Screenshot saved to: {}", output.display());
    Ok(())
}

fn handle_trace(config: &Config, json: bool, scene: Option<PathBuf>) -> Result<()> {
    let scene = scene.map(Scene::load).transpose()?;
    let mut lcd = bring_up(config, RecordingTransport::new(), false)?;
    if let Some(scene) = scene {
        scene.run(&mut lcd)?;
    }

    let events = lcd.transport().events();
    if json {
        let out = serde_json::to_string_pretty(events).context("Failed to serialize trace")?;
        println!("{}", out);
    } else {
        for event in events {
            println!("{}", format_event(event));
        }
    }
    Ok(())
}

const MAX_SHOWN_BYTES: usize = 16;

fn format_event(event: &BusEvent) -> String {
    match event {
        BusEvent::Command(cmd) => format!("CMD  {:02X}", cmd),
        BusEvent::Data(bytes) => {
            let shown: Vec<String> = bytes
                .iter()
                .take(MAX_SHOWN_BYTES)
                .map(|b| format!("{:02X}", b))
                .collect();
            if bytes.len() > MAX_SHOWN_BYTES {
                format!("DATA {} ... ({} bytes)", shown.join(" "), bytes.len())
            } else {
                format!("DATA {}", shown.join(" "))
            }
        }
    }
}
