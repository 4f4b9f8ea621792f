#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Isogrid experience.

mod config;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use isogrid_core::GameConfig;
use isogrid_rendering::{Presentation, RenderingBackend};
use isogrid_rendering_macroquad::MacroquadBackend;
use isogrid_system_compositor::Compositor;
use isogrid_system_game_loop::GameLoop;
use isogrid_world::{query, World};
use log::info;

use crate::config::{DepthArg, Overrides};

/// Walk a cube across an isometric floor to reach the goal cube.
#[derive(Debug, Parser)]
#[command(name = "isogrid", version)]
struct CliArgs {
    /// TOML file overriding the built-in configuration.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Seed for goal placement, for reproducible sessions.
    #[arg(long)]
    seed: Option<u64>,
    /// Renders as fast as possible instead of waiting for the display refresh.
    #[arg(long)]
    no_vsync: bool,
    /// Log filter such as `debug` or `isogrid_world=trace`. Overrides `RUST_LOG`.
    #[arg(long, value_name = "FILTER")]
    log_level: Option<String>,
    /// Rejected moves are logged instead of playing the bump sound.
    #[arg(long)]
    silent_bumps: bool,
    /// Draw-order strategy for the player and goal cubes.
    #[arg(long, value_enum)]
    depth: Option<DepthArg>,
    /// Prints the effective configuration as TOML and exits.
    #[arg(long)]
    print_config: bool,
}

/// Entry point for the Isogrid command-line interface.
fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_logging(args.log_level.as_deref());

    let config = config::resolve(
        args.config.as_deref(),
        Overrides {
            seed: args.seed,
            silent_bumps: args.silent_bumps,
            depth: args.depth,
        },
    )?;

    if args.print_config {
        print!(
            "{}",
            toml::to_string(&config).context("failed to serialise configuration")?
        );
        return Ok(());
    }

    run(&config, !args.no_vsync)
}

fn init_logging(filter: Option<&str>) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let Some(filter) = filter {
        let _ = builder.parse_filters(filter);
    }
    builder.init();
}

fn run(config: &GameConfig, vsync: bool) -> Result<()> {
    let world = World::new(config).context("failed to create world")?;
    info!(
        "starting with player at {:?} and goal at {:?}",
        query::player_position(&world),
        query::goal(&world)
    );
    let compositor = Compositor::new(config).context("failed to build projection")?;
    let game = GameLoop::new(world, compositor, config.gameplay.out_of_bounds);

    MacroquadBackend::new()
        .with_vsync(vsync)
        .run(Presentation::from_config(config), game)?;

    info!("shut down");
    Ok(())
}
