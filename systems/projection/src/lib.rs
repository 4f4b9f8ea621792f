#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Isometric projection between grid cells and screen pixels.
//!
//! The projection is the affine map `plane = column * X + row * Y`, where `X`
//! and `Y` are the configured axis directions scaled by half the sprite
//! footprint. [`Projector`] adds the presentation offsets that center the grid
//! in the window and exposes the inverse mapping for picking.

pub mod linalg;

use glam::Vec2;
use isogrid_core::{GameConfig, GridConfig, GridPosition};
use thiserror::Error;

pub use linalg::{apply, invert, scale, Matrix2x2, Vector2};

/// Failures raised while building or inverting a projection.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum ProjectionError {
    /// The basis matrix is singular or not finite.
    #[error("projection basis is not invertible (determinant {determinant})")]
    InvalidProjection {
        /// Determinant of the rejected matrix.
        determinant: f32,
    },
}

/// Builds the basis whose columns are the axis directions scaled by half the sprite size.
#[must_use]
pub fn basis(x_axis: Vector2, y_axis: Vector2, half_width: f32, half_height: f32) -> Matrix2x2 {
    Matrix2x2::from_columns(scale(x_axis, half_width), scale(y_axis, half_height))
}

/// Projects a grid vector onto the unscaled isometric plane.
#[must_use]
pub fn to_iso(grid: Vector2, basis: &Matrix2x2) -> Vector2 {
    scale(basis.first_column(), grid.x) + scale(basis.second_column(), grid.y)
}

/// Maps an isometric plane vector back to grid space.
///
/// [`apply`] treats its vector as a row, so the inverse basis is transposed to
/// undo the column combination performed by [`to_iso`].
pub fn to_screen(plane: Vector2, basis: &Matrix2x2) -> Result<Vector2, ProjectionError> {
    let inverse = invert(basis)?;
    Ok(apply(plane, &inverse.transpose()))
}

/// Converts grid cells into sprite placements for the configured window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projector {
    basis: Matrix2x2,
    inverse: Matrix2x2,
    origin: Vector2,
    token_lift: f32,
    sprite_size: Vector2,
    grid: GridConfig,
}

impl Projector {
    /// Builds a projector from the configured axes, sprite footprint and offsets.
    pub fn new(config: &GameConfig) -> Result<Self, ProjectionError> {
        let sprite_width = config.sprite.width();
        let sprite_height = config.sprite.height();
        let [x0, x1] = config.projection.x_axis;
        let [y0, y1] = config.projection.y_axis;
        let basis = basis(
            Vector2::new(x0, x1),
            Vector2::new(y0, y1),
            sprite_width as f32 / 2.0,
            sprite_height as f32 / 2.0,
        );
        let inverse = invert(&basis)?.transpose();

        let horizontal = if config.projection.center_horizontally {
            (config.window.width / 2) as f32 - (sprite_width / 2) as f32
        } else {
            0.0
        };
        let vertical = sprite_height as f32 * config.projection.vertical_offset_factor;

        Ok(Self {
            basis,
            inverse,
            origin: Vector2::new(horizontal, vertical),
            token_lift: sprite_height as f32 * config.projection.token_offset_factor,
            sprite_size: Vector2::new(sprite_width as f32, sprite_height as f32),
            grid: config.grid,
        })
    }

    /// Screen offset added to every projected tile.
    #[must_use]
    pub const fn origin(&self) -> Vector2 {
        self.origin
    }

    /// Size every sprite is drawn at, in pixels.
    #[must_use]
    pub fn sprite_size(&self) -> Vec2 {
        self.sprite_size.into()
    }

    /// Top-left corner of the floor tile at `position`.
    #[must_use]
    pub fn tile_position(&self, position: GridPosition) -> Vec2 {
        let grid = Vector2::new(position.column() as f32, position.row() as f32);
        (to_iso(grid, &self.basis) + self.origin).into()
    }

    /// Top-left corner of a player or goal sprite standing on `position`.
    #[must_use]
    pub fn token_position(&self, position: GridPosition) -> Vec2 {
        self.tile_position(position) + Vec2::new(0.0, self.token_lift)
    }

    /// Screen point a tile at `position` is picked through.
    ///
    /// The anchor sits half a sprite to the right of the tile corner and a
    /// quarter of a sprite below it, the middle of the diamond's top face.
    #[must_use]
    pub fn tile_anchor(&self, position: GridPosition) -> Vec2 {
        self.tile_position(position) + self.anchor_offset()
    }

    /// Maps a screen point to fractional grid coordinates.
    #[must_use]
    pub fn unproject(&self, screen: Vec2) -> Vector2 {
        let plane = Vector2::from(screen - self.anchor_offset()) - self.origin;
        apply(plane, &self.inverse)
    }

    /// Returns the floor tile under a screen point, if any.
    #[must_use]
    pub fn pick(&self, screen: Vec2) -> Option<GridPosition> {
        let grid = self.unproject(screen);
        if !grid.x.is_finite() || !grid.y.is_finite() {
            return None;
        }
        let column = grid.x.round();
        let row = grid.y.round();
        if column < i32::MIN as f32 || column > i32::MAX as f32 {
            return None;
        }
        if row < i32::MIN as f32 || row > i32::MAX as f32 {
            return None;
        }
        let cell = GridPosition::new(column as i32, row as i32);
        self.grid.contains(cell).then_some(cell)
    }

    fn anchor_offset(&self) -> Vec2 {
        Vec2::new(self.sprite_size.x * 0.5, self.sprite_size.y * 0.25)
    }
}
