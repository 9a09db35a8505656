use std::path::PathBuf;
use std::sync::Arc;
use std::{error::Error, fs};

use clap::{Parser, ValueEnum};
use glam::vec2;
use tracing::{info, warn};
use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*};

use hanging_card::formats::parse_config;
use hanging_card::physics::REFERENCE_FRAME_MS;
use hanging_card::{FrameHost, HangingCard, ManualHost, NudgeDirection, PhysicsConfig, SimulationMode, ViewportHint};

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Scenario {
	/// Drag the card to the side and let go
	Release,
	/// Press the right arrow key
	Nudge,
	/// Random impulse key
	Impulse,
	/// Start-up impulse
	Startup,
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Run a hanging card scenario headless and log its transforms", long_about = None)]
struct Cli {
	#[arg(value_enum, default_value = "release")]
	scenario: Scenario,
	#[arg(short, long, help = "Physics config JSON. Defaults are used when omitted.")]
	config: Option<PathBuf>,
	#[arg(short, long, default_value_t = 1200, help = "Frames to simulate at most")]
	frames: usize,
	#[arg(long, default_value_t = 1, help = "Log every n-th frame")]
	every: usize,
	#[arg(long, help = "Viewport width, picks the device tuning")]
	width: Option<f32>,
	#[arg(long, default_value_t = 0)]
	seed: u64,
	#[arg(short, long)]
	verbose: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
	let cli = Cli::parse();

	tracing_subscriber::registry()
		.with(fmt::layer())
		.with(match cli.verbose {
			true => LevelFilter::TRACE,
			false => LevelFilter::INFO,
		})
		.init();

	let mut config = match &cli.config {
		Some(path) => {
			info!("Loading config from {}", path.display());
			parse_config(&fs::read_to_string(path)?)?
		}
		None => PhysicsConfig::default(),
	};
	if let Some(width) = cli.width {
		let viewport = ViewportHint::new(width, width * 0.6);
		info!("Using {:?} tuning", viewport.device_class());
		config = config.for_viewport(viewport);
	}
	if !matches!(cli.scenario, Scenario::Startup) {
		config.auto_impulse_on_start = false;
	}

	let mut card = HangingCard::with_seed(Arc::new(config), ManualHost::new(), cli.seed)?;
	card.start();

	match cli.scenario {
		Scenario::Release => {
			card.on_drag_start();
			card.on_drag_move(vec2(60., 20.));
			card.on_drag_end(Some(vec2(-0.8, -0.2)));
		}
		Scenario::Nudge => card.on_nudge(NudgeDirection::Right),
		Scenario::Impulse => card.on_impulse(),
		Scenario::Startup => {}
	}

	let every = cli.every.max(1);
	let mut last_mode = card.mode();
	for frame in 0..cli.frames {
		card.host_mut().advance(REFERENCE_FRAME_MS);
		let Some(handle) = card.host_mut().take_due() else {
			info!("Suspended after {frame} frames");
			break;
		};
		card.on_frame(handle);

		let t = card.transform();
		let tether = card.tether_geometry();
		if frame % every == 0 || card.mode() != last_mode {
			info!(
				"{:>5} {:>8.1}ms {:?} card=({:>7.2}, {:>7.2}) rot={:>6.2} tether=(dx {:>6.2}, rot {:>6.2}, len {:>6.1})",
				frame,
				card.host().now(),
				card.mode(),
				t.x,
				t.y,
				t.rotation_degrees,
				tether.offset_x,
				tether.rotation_degrees,
				tether.length,
			);
		}

		if card.mode() != last_mode {
			if card.mode() == SimulationMode::Idle {
				info!("At rest after {frame} frames");
				break;
			}
			last_mode = card.mode();
		}
	}

	if card.mode() != SimulationMode::Idle {
		warn!("Card still {:?} after {} frames", card.mode(), cli.frames);
	}

	card.dispose();
	Ok(())
}
