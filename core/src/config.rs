//! Immutable game configuration.
//!
//! Every constant the game depends on is exposed here as a named setting. The
//! defaults reproduce the large 50x50 layout. Deployments override individual
//! fields through a TOML file loaded by the command-line adapter.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{GridBounds, GridPosition, DEFAULT_WINDOW_TITLE};

/// Largest floor the world will lay out.
pub const MAX_TILES: u64 = 1 << 20;

/// Complete configuration handed to the world, projector, compositor and adapters.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Window presentation settings.
    pub window: WindowConfig,
    /// Floor tile grid layout.
    pub grid: GridConfig,
    /// Cells the player and goal may occupy.
    pub bounds: GridBounds,
    /// Sprite footprint settings.
    pub sprite: SpriteConfig,
    /// Isometric basis and screen offsets.
    pub projection: ProjectionConfig,
    /// Rules governing movement feedback, draw order and goal placement.
    pub gameplay: GameplayConfig,
    /// Paths of the sprites and sounds read at startup.
    pub assets: AssetConfig,
}

impl GameConfig {
    /// Checks every cross-field constraint the engine relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let WindowConfig { width, height, .. } = self.window;
        if width == 0 || height == 0 {
            return Err(ConfigError::EmptyWindow { width, height });
        }

        let GridConfig { columns, rows, .. } = self.grid;
        if columns == 0 || rows == 0 {
            return Err(ConfigError::EmptyGrid { columns, rows });
        }
        if u64::from(columns) * u64::from(rows) > MAX_TILES {
            return Err(ConfigError::TooManyTiles { columns, rows });
        }
        if !self.grid.fits_coordinates() {
            return Err(ConfigError::GridOutOfRange { grid: self.grid });
        }

        if self.sprite.scale_factor == 0
            || self.sprite.base_width == 0
            || self.sprite.base_height == 0
        {
            return Err(ConfigError::EmptySprite);
        }
        if self.sprite.checked_size().is_none() {
            return Err(ConfigError::SpriteTooLarge {
                sprite: self.sprite,
            });
        }

        if !self.bounds.is_valid() {
            return Err(ConfigError::InvertedBounds {
                bounds: self.bounds,
            });
        }

        if self.gameplay.require_bounds_inside_grid {
            let first = GridPosition::new(self.bounds.min_column, self.bounds.min_row);
            let last = GridPosition::new(self.bounds.max_column, self.bounds.max_row);
            if !self.grid.contains(first) || !self.grid.contains(last) {
                return Err(ConfigError::BoundsOutsideGrid {
                    bounds: self.bounds,
                });
            }
        }

        let [x0, x1] = self.projection.x_axis;
        let [y0, y1] = self.projection.y_axis;
        let finite = [
            x0,
            x1,
            y0,
            y1,
            self.projection.vertical_offset_factor,
            self.projection.token_offset_factor,
        ]
        .iter()
        .all(|value| value.is_finite());
        if !finite {
            return Err(ConfigError::NonFiniteProjection);
        }
        if (x0 * y1 - x1 * y0).abs() <= f32::EPSILON {
            return Err(ConfigError::ParallelAxes {
                x_axis: self.projection.x_axis,
                y_axis: self.projection.y_axis,
            });
        }

        if self.gameplay.max_goal_attempts == 0 {
            return Err(ConfigError::NoGoalAttempts);
        }

        Ok(())
    }
}

/// Window presentation settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindowConfig {
    /// Title shown by the window manager.
    pub title: String,
    /// Window width in pixels.
    pub width: u32,
    /// Window height in pixels.
    pub height: u32,
    /// Color used to clear each frame, as RGB bytes.
    pub background: [u8; 3],
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_WINDOW_TITLE.to_owned(),
            width: 800,
            height: 600,
            background: [70, 70, 70],
        }
    }
}

/// Layout of the floor tile grid.
///
/// Tiles cover columns `origin_column..origin_column + columns` and rows
/// `origin_row..origin_row + rows`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GridConfig {
    /// Number of tile columns.
    pub columns: u32,
    /// Number of tile rows.
    pub rows: u32,
    /// Column index of the first tile.
    pub origin_column: i32,
    /// Row index of the first tile.
    pub origin_row: i32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            columns: 50,
            rows: 50,
            origin_column: 0,
            origin_row: 0,
        }
    }
}

impl GridConfig {
    /// Reports whether a tile exists at the provided position.
    #[must_use]
    pub fn contains(&self, position: GridPosition) -> bool {
        let column = i64::from(position.column()) - i64::from(self.origin_column);
        let row = i64::from(position.row()) - i64::from(self.origin_row);
        (0..i64::from(self.columns)).contains(&column) && (0..i64::from(self.rows)).contains(&row)
    }

    /// Reports whether the last tile on both axes has an `i32` coordinate.
    #[must_use]
    pub fn fits_coordinates(&self) -> bool {
        let last = |origin: i32, extent: u32| i64::from(origin) + i64::from(extent) - 1;
        last(self.origin_column, self.columns) <= i64::from(i32::MAX)
            && last(self.origin_row, self.rows) <= i64::from(i32::MAX)
    }
}

/// Sprite footprint expressed as a base size multiplied by a scale factor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpriteConfig {
    /// Multiplier `T` applied to the base footprint.
    pub scale_factor: u32,
    /// Unscaled sprite width in pixels.
    pub base_width: u32,
    /// Unscaled sprite height in pixels.
    pub base_height: u32,
}

impl Default for SpriteConfig {
    fn default() -> Self {
        Self {
            scale_factor: 4,
            base_width: 21,
            base_height: 22,
        }
    }
}

impl SpriteConfig {
    /// Width every sprite is scaled to, in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.base_width.saturating_mul(self.scale_factor)
    }

    /// Height every sprite is scaled to, in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.base_height.saturating_mul(self.scale_factor)
    }

    /// Scaled footprint as `(width, height)`, or `None` when it overflows `u32`.
    #[must_use]
    pub fn checked_size(&self) -> Option<(u32, u32)> {
        let width = self.base_width.checked_mul(self.scale_factor)?;
        let height = self.base_height.checked_mul(self.scale_factor)?;
        Some((width, height))
    }
}

/// Isometric basis directions and presentation offsets.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectionConfig {
    /// Screen direction of one step along the column axis, before scaling.
    pub x_axis: [f32; 2],
    /// Screen direction of one step along the row axis, before scaling.
    pub y_axis: [f32; 2],
    /// Vertical shift of the whole grid, in multiples of the sprite height.
    pub vertical_offset_factor: f32,
    /// Extra vertical shift for the player and goal, in multiples of the sprite height.
    pub token_offset_factor: f32,
    /// Centers the grid origin horizontally in the window when set.
    pub center_horizontally: bool,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            x_axis: [1.0, 0.5],
            y_axis: [-1.0, 0.5],
            vertical_offset_factor: -10.0,
            token_offset_factor: 1.0,
            center_horizontally: true,
        }
    }
}

/// How a rejected move is surfaced to the user.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutOfBoundsFeedback {
    /// Plays the out-of-bounds audio cue.
    #[default]
    AudioCue,
    /// Ignores the rejection apart from logging.
    Silent,
}

/// Strategy used to order overlapping player and goal sprites.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepthPolicy {
    /// A token is painted first only when the other strictly exceeds it on both axes,
    /// or when both share a cell and the token is the goal.
    #[default]
    Dominance,
    /// Tokens are painted in increasing `column + row` order.
    Diagonal,
}

/// Gameplay rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameplayConfig {
    /// Feedback given when a move would leave the bounds.
    pub out_of_bounds: OutOfBoundsFeedback,
    /// Draw-order strategy for the player and goal.
    pub depth_policy: DepthPolicy,
    /// Maximum number of candidates drawn when placing a goal.
    pub max_goal_attempts: u32,
    /// Seed for goal placement. Entropy is used when absent.
    pub seed: Option<u64>,
    /// Rejects bounds that reach past the floor tiles.
    pub require_bounds_inside_grid: bool,
}

impl Default for GameplayConfig {
    fn default() -> Self {
        Self {
            out_of_bounds: OutOfBoundsFeedback::default(),
            depth_policy: DepthPolicy::default(),
            max_goal_attempts: 10_000,
            seed: None,
            require_bounds_inside_grid: true,
        }
    }
}

/// Relative paths of the assets loaded at startup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssetConfig {
    /// Directory every other path is resolved against.
    pub root: PathBuf,
    /// Floor tile sprite.
    pub floor: PathBuf,
    /// Player sprite.
    pub player: PathBuf,
    /// Goal sprite.
    pub goal: PathBuf,
    /// Sound played when a move is rejected.
    pub bump: Option<PathBuf>,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("assets"),
            floor: PathBuf::from("pinkCube.png"),
            player: PathBuf::from("greenCube.png"),
            goal: PathBuf::from("blueCube.png"),
            bump: Some(PathBuf::from("bump.wav")),
        }
    }
}

impl AssetConfig {
    /// Resolves an asset path against the configured root.
    #[must_use]
    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }
}

/// Reasons a configuration is rejected.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// The window has no area.
    #[error("window must have a positive size (received {width}x{height})")]
    EmptyWindow {
        /// Configured width.
        width: u32,
        /// Configured height.
        height: u32,
    },
    /// The tile grid has no area.
    #[error("tile grid must have a positive size (received {columns}x{rows})")]
    EmptyGrid {
        /// Configured columns.
        columns: u32,
        /// Configured rows.
        rows: u32,
    },
    /// More tiles than the world lays out.
    #[error("tile grid of {columns}x{rows} exceeds {} tiles", MAX_TILES)]
    TooManyTiles {
        /// Configured columns.
        columns: u32,
        /// Configured rows.
        rows: u32,
    },
    /// The last tile's coordinates do not fit in `i32`.
    #[error("tile grid {grid:?} reaches past the largest cell coordinate")]
    GridOutOfRange {
        /// Offending layout.
        grid: GridConfig,
    },
    /// The sprite footprint has no area.
    #[error("sprite scale factor and base size must be positive")]
    EmptySprite,
    /// The scaled sprite footprint overflows `u32`.
    #[error("sprite footprint {sprite:?} is too large to scale")]
    SpriteTooLarge {
        /// Offending sprite settings.
        sprite: SpriteConfig,
    },
    /// The playable bounds enclose no cell.
    #[error("playable bounds {bounds:?} enclose no cell")]
    InvertedBounds {
        /// Offending bounds.
        bounds: GridBounds,
    },
    /// The playable bounds reach past the floor tiles.
    #[error("playable bounds {bounds:?} extend beyond the tile grid")]
    BoundsOutsideGrid {
        /// Offending bounds.
        bounds: GridBounds,
    },
    /// The basis axes or offsets contain NaN or infinity.
    #[error("projection axes and offsets must be finite")]
    NonFiniteProjection,
    /// The basis axes are parallel, so the projection cannot be inverted.
    #[error("projection axes {x_axis:?} and {y_axis:?} are parallel")]
    ParallelAxes {
        /// Configured column axis.
        x_axis: [f32; 2],
        /// Configured row axis.
        y_axis: [f32; 2],
    },
    /// Goal placement was given no attempts.
    #[error("max_goal_attempts must be at least 1")]
    NoGoalAttempts,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        GameConfig::default()
            .validate()
            .expect("default configuration must validate");
    }

    #[test]
    fn default_sprite_footprint_is_84_by_88() {
        let sprite = SpriteConfig::default();
        assert_eq!((sprite.width(), sprite.height()), (84, 88));
    }

    #[test]
    fn parallel_axes_are_rejected() {
        let mut config = GameConfig::default();
        config.projection.y_axis = [2.0, 1.0];

        assert!(matches!(
            config.validate(),
            Err(ConfigError::ParallelAxes { .. })
        ));
    }

    #[test]
    fn bounds_outside_grid_are_rejected_unless_allowed() {
        let mut config = GameConfig::default();
        config.bounds = GridBounds::new(-2, 4, -2, 4);

        assert!(matches!(
            config.validate(),
            Err(ConfigError::BoundsOutsideGrid { .. })
        ));

        config.gameplay.require_bounds_inside_grid = false;
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn zero_goal_attempts_are_rejected() {
        let mut config = GameConfig::default();
        config.gameplay.max_goal_attempts = 0;

        assert_eq!(config.validate(), Err(ConfigError::NoGoalAttempts));
    }

    #[test]
    fn overflowing_sprite_scale_is_rejected() {
        let mut config = GameConfig::default();
        config.sprite.scale_factor = u32::MAX;

        assert_eq!(
            config.validate(),
            Err(ConfigError::SpriteTooLarge {
                sprite: config.sprite
            })
        );
        assert_eq!(config.sprite.width(), u32::MAX);
    }

    #[test]
    fn grid_reaching_past_i32_is_rejected() {
        let mut config = GameConfig::default();
        config.gameplay.require_bounds_inside_grid = false;
        config.grid = GridConfig {
            columns: 2,
            rows: 1,
            origin_column: i32::MAX,
            origin_row: 0,
        };

        assert_eq!(
            config.validate(),
            Err(ConfigError::GridOutOfRange { grid: config.grid })
        );

        config.grid.origin_column = i32::MAX - 1;
        assert_eq!(config.validate(), Ok(()));

        config.grid.origin_column = 0;
        config.grid.origin_row = i32::MAX;
        config.grid.rows = 3;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::GridOutOfRange { .. })
        ));
    }

    #[test]
    fn oversized_grid_is_rejected() {
        let mut config = GameConfig::default();
        config.grid.columns = u32::MAX;
        config.grid.rows = u32::MAX;

        assert_eq!(
            config.validate(),
            Err(ConfigError::TooManyTiles {
                columns: u32::MAX,
                rows: u32::MAX,
            })
        );

        config.grid.columns = 1024;
        config.grid.rows = 1024;
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn grid_contains_respects_origin() {
        let grid = GridConfig {
            columns: 7,
            rows: 7,
            origin_column: -2,
            origin_row: -2,
        };

        assert!(grid.contains(GridPosition::new(-2, -2)));
        assert!(grid.contains(GridPosition::new(4, 4)));
        assert!(!grid.contains(GridPosition::new(5, 0)));
        assert!(!grid.contains(GridPosition::new(0, -3)));
    }

    #[test]
    fn partial_toml_keeps_remaining_defaults() {
        let config: GameConfig = toml::from_str(
            r#"
                [projection]
                vertical_offset_factor = 1.5

                [gameplay]
                depth_policy = "diagonal"
                out_of_bounds = "silent"
            "#,
        )
        .expect("partial configuration parses");

        assert_eq!(config.projection.vertical_offset_factor, 1.5);
        assert_eq!(config.projection.x_axis, [1.0, 0.5]);
        assert_eq!(config.gameplay.depth_policy, DepthPolicy::Diagonal);
        assert_eq!(config.gameplay.out_of_bounds, OutOfBoundsFeedback::Silent);
        assert_eq!(config.gameplay.max_goal_attempts, 10_000);
        assert_eq!(config.window, WindowConfig::default());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result: Result<GameConfig, _> = toml::from_str(
            r#"
                [window]
                widht = 640
            "#,
        );

        assert!(result.is_err());
    }
}
