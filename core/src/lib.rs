#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Isogrid engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. The game loop submits [`Command`]
//! values describing desired mutations, the world executes those commands via
//! its `apply` entry point, and then reports [`Event`] values describing what
//! actually happened. Every tunable constant lives in [`config::GameConfig`],
//! which is passed explicitly to each component at construction time.

pub mod config;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use config::{
    AssetConfig, ConfigError, DepthPolicy, GameConfig, GameplayConfig, GridConfig,
    OutOfBoundsFeedback, ProjectionConfig, SpriteConfig, WindowConfig,
};

/// Title used for the window when the configuration does not override it.
pub const DEFAULT_WINDOW_TITLE: &str = "Isogrid";

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Requests that the player advance a single cell in the given direction.
    MovePlayer {
        /// Direction of travel for the attempted step.
        direction: Direction,
    },
}

/// Events reported by the world after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that the player moved between two cells.
    PlayerMoved {
        /// Cell the player occupied before moving.
        from: GridPosition,
        /// Cell the player occupies after the move.
        to: GridPosition,
    },
    /// Reports that a move request was rejected and the player stayed put.
    MoveRejected {
        /// Direction of the rejected step.
        direction: Direction,
        /// Cell the player still occupies.
        at: GridPosition,
        /// Specific reason the move failed.
        reason: MoveError,
    },
    /// Announces that the player arrived on the goal cell.
    GoalReached {
        /// Cell shared by the player and the goal at the moment of arrival.
        at: GridPosition,
    },
    /// Announces that a fresh goal was placed.
    GoalAssigned {
        /// Cell holding the new goal.
        goal: GridPosition,
    },
    /// Reports that no fresh goal could be drawn, so the previous one was kept.
    GoalRandomizationFailed {
        /// Number of candidates drawn before giving up.
        attempts: u32,
        /// Goal that remains in effect.
        retained: GridPosition,
    },
}

/// Cardinal movement directions available to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
}

impl Direction {
    /// Every direction in a fixed order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Column and row deltas applied by a single step.
    #[must_use]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
///
/// Coordinates are signed because playable areas may extend to negative
/// indices.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct GridPosition {
    column: i32,
    row: i32,
}

impl GridPosition {
    /// Creates a new grid position.
    #[must_use]
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    /// Column index of the cell.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Row index of the cell.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Returns the neighbouring cell in the provided direction without any bounds check.
    #[must_use]
    pub const fn offset(self, direction: Direction) -> Self {
        let (columns, rows) = direction.offset();
        Self {
            column: self.column + columns,
            row: self.row + rows,
        }
    }

    /// Sum of column and row, larger values sit nearer to the viewer.
    #[must_use]
    pub const fn diagonal_depth(&self) -> i32 {
        self.column + self.row
    }

    /// Reports whether `self` is strictly greater than `other` along both axes.
    #[must_use]
    pub const fn strictly_dominates(&self, other: GridPosition) -> bool {
        self.column > other.column && self.row > other.row
    }
}

/// Inclusive rectangle of cells the player and goal may occupy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GridBounds {
    /// Smallest permitted column.
    pub min_column: i32,
    /// Largest permitted column.
    pub max_column: i32,
    /// Smallest permitted row.
    pub min_row: i32,
    /// Largest permitted row.
    pub max_row: i32,
}

impl Default for GridBounds {
    fn default() -> Self {
        Self::new(21, 29, 21, 29)
    }
}

impl GridBounds {
    /// Creates inclusive bounds from explicit limits.
    #[must_use]
    pub const fn new(min_column: i32, max_column: i32, min_row: i32, max_row: i32) -> Self {
        Self {
            min_column,
            max_column,
            min_row,
            max_row,
        }
    }

    /// Reports whether the bounds enclose at least one cell.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.min_column <= self.max_column && self.min_row <= self.max_row
    }

    /// Reports whether the position lies inside the bounds.
    #[must_use]
    pub const fn contains(&self, position: GridPosition) -> bool {
        position.column >= self.min_column
            && position.column <= self.max_column
            && position.row >= self.min_row
            && position.row <= self.max_row
    }

    /// Moves `from` one cell in `direction` if the destination stays inside the bounds.
    pub fn step(
        &self,
        from: GridPosition,
        direction: Direction,
    ) -> Result<GridPosition, MoveError> {
        let (columns, rows) = direction.offset();
        let column = from.column.checked_add(columns);
        let row = from.row.checked_add(rows);
        match (column, row) {
            (Some(column), Some(row)) if self.contains(GridPosition::new(column, row)) => {
                Ok(GridPosition::new(column, row))
            }
            _ => Err(MoveError::OutOfBounds { from, direction }),
        }
    }
}

/// Reasons a move request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum MoveError {
    /// The destination cell lies outside the playable bounds.
    #[error("moving {direction:?} from {from:?} leaves the playable bounds")]
    OutOfBounds {
        /// Cell the move started from.
        from: GridPosition,
        /// Direction of the rejected step.
        direction: Direction,
    },
}
