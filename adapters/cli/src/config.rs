//! Loads the game configuration and applies command-line overrides.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use clap::ValueEnum;
use isogrid_core::{DepthPolicy, GameConfig, OutOfBoundsFeedback};

/// Draw-order strategies selectable from the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum DepthArg {
    /// Strict dominance on both axes.
    Dominance,
    /// Painter's order by `column + row`.
    Diagonal,
}

impl From<DepthArg> for DepthPolicy {
    fn from(value: DepthArg) -> Self {
        match value {
            DepthArg::Dominance => DepthPolicy::Dominance,
            DepthArg::Diagonal => DepthPolicy::Diagonal,
        }
    }
}

/// Settings given on the command line that take precedence over the file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Overrides {
    pub(crate) seed: Option<u64>,
    pub(crate) silent_bumps: bool,
    pub(crate) depth: Option<DepthArg>,
}

/// Reads a TOML configuration file.
///
/// A relative `assets.root` is resolved against the directory holding the file.
pub(crate) fn load_file(path: &Path) -> Result<GameConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read configuration at {}", path.display()))?;
    let mut config = parse(&contents)
        .with_context(|| format!("failed to parse configuration at {}", path.display()))?;
    if config.assets.root.is_relative() {
        if let Some(base) = path.parent() {
            config.assets.root = base.join(&config.assets.root);
        }
    }
    Ok(config)
}

/// Parses TOML configuration contents, keeping defaults for omitted fields.
pub(crate) fn parse(contents: &str) -> Result<GameConfig> {
    toml::from_str(contents).context("invalid configuration toml")
}

/// Loads the file if one is given, applies overrides and validates the result.
pub(crate) fn resolve(path: Option<&Path>, overrides: Overrides) -> Result<GameConfig> {
    let mut config = match path {
        Some(path) => load_file(path)?,
        None => GameConfig::default(),
    };
    apply_overrides(&mut config, overrides);
    config.validate().context("configuration rejected")?;
    Ok(config)
}

fn apply_overrides(config: &mut GameConfig, overrides: Overrides) {
    if let Some(seed) = overrides.seed {
        config.gameplay.seed = Some(seed);
    }
    if overrides.silent_bumps {
        config.gameplay.out_of_bounds = OutOfBoundsFeedback::Silent;
    }
    if let Some(depth) = overrides.depth {
        config.gameplay.depth_policy = depth.into();
    }
}
