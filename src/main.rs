use anyhow::Result;
use clap::Parser;
use log::info;

use hill_drive::simulation::{DriveInput, Preset, SimConfig, SimWorld, Viewport};

#[derive(Parser)]
#[command(name = "hill_drive")]
#[command(about = "Two-wheel hill driving simulation with optional UI")]
struct Cli {
    /// Run with the Bevy game engine UI
    #[arg(long)]
    ui: bool,

    /// Number of simulation ticks to run in headless mode
    #[arg(long, default_value = "2000")]
    ticks: u64,

    /// Seed for reproducible terrain
    #[arg(long)]
    seed: Option<u64>,

    /// Physics tuning to use
    #[arg(long, value_enum, default_value_t = Preset::Tilt)]
    preset: Preset,

    /// Hold the accelerator for the whole headless run
    #[arg(long)]
    accelerate: bool,

    /// Hold the brake for the whole headless run
    #[arg(long)]
    brake: bool,

    /// Hold nitro for the whole headless run
    #[arg(long)]
    nitro: bool,

    /// Print a summary every this many ticks
    #[arg(long, default_value = "500")]
    report_every: u64,

    /// Visible window width in screen units
    #[arg(long, default_value = "1280")]
    width: f64,

    /// Visible window height in screen units
    #[arg(long, default_value = "720")]
    height: f64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = SimConfig::preset(cli.preset);
    let viewport = Viewport::new(cli.width, cli.height);

    if cli.ui {
        #[cfg(feature = "ui")]
        {
            run_with_ui(config, viewport, cli.seed)?;
        }
        #[cfg(not(feature = "ui"))]
        {
            anyhow::bail!("UI feature is not enabled. Rebuild with --features ui");
        }
    } else {
        // Bevy installs its own logger for the UI
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
        let input = DriveInput::new(cli.accelerate, cli.brake, cli.nitro);
        run_headless(config, viewport, &cli, input)?;
    }
    Ok(())
}

/// Run the simulation in headless mode (no graphics)
fn run_headless(config: SimConfig, viewport: Viewport, cli: &Cli, input: DriveInput) -> Result<()> {
    println!("Running hill drive simulation in headless mode...");
    println!(
        "Ticks: {}, Preset: {:?}, Input: accelerate={} brake={} nitro={}",
        cli.ticks, cli.preset, input.accelerating, input.braking, input.nitro
    );
    println!();

    let mut world = SimWorld::create_default_world(config, viewport, cli.seed)?;

    println!("Initial state:");
    world.print_summary();
    world.draw_profile();
    println!();

    let report_every = cli.report_every.max(1);
    let start_x = world.wheels().first().map(|w| w.x).unwrap_or_default();
    let mut hard_landings = 0u64;

    while world.ticks < cli.ticks {
        let ticks_to_run = report_every.min(cli.ticks - world.ticks);
        for _ in 0..ticks_to_run {
            world.tick(input);
            hard_landings += world.wheels().iter().filter(|w| w.took_damage).count() as u64;
        }

        println!("--- After tick {} ---", world.ticks);
        world.print_summary();
        world.draw_profile();
        println!();
    }

    let distance = world.wheels().first().map(|w| w.x).unwrap_or_default() - start_x;
    info!("=== SIMULATION COMPLETE ===");
    info!("Ticks simulated: {}", world.ticks);
    info!("Distance travelled: {:.1}", distance);
    info!("Terrain segments retained: {}", world.terrain.len());
    info!("Hard landings: {}", hard_landings);
    Ok(())
}

#[cfg(feature = "ui")]
fn run_with_ui(config: SimConfig, viewport: Viewport, seed: Option<u64>) -> Result<()> {
    use bevy::log::LogPlugin;
    use bevy::prelude::*;

    let world = SimWorld::create_default_world(config, viewport, seed)?;

    println!("Starting Hill Drive UI...");
    println!();
    println!("Controls:");
    println!("  D      - Accelerate");
    println!("  A      - Brake");
    println!("  Space  - Nitro");
    println!("  ESC    - Exit");
    println!();

    App::new()
        .add_plugins(
            DefaultPlugins
                .set(LogPlugin {
                    filter: "warn,hill_drive=debug".to_string(),
                    level: bevy::log::Level::DEBUG,
                    ..default()
                })
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Hill Drive".into(),
                        resolution: (viewport.width as u32, viewport.height as u32).into(),
                        ..default()
                    }),
                    ..default()
                }),
        )
        .add_plugins(hill_drive::ui::HillDriveUIPlugin::new(world))
        .run();
    Ok(())
}
