#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Isogrid.
//!
//! The world owns the immutable floor [`TileGrid`] and the [`Player`], whose
//! position moves one bounded step at a time and whose goal is replaced by
//! rejection sampling whenever the player reaches it. All mutation flows
//! through [`apply`]; read access goes through the [`query`] module.

use isogrid_core::{
    Command, ConfigError, Direction, Event, GameConfig, GridBounds, GridConfig, GridPosition,
    MoveError,
};
use log::{debug, error, info};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

/// Failures raised while building or updating the world.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum WorldError {
    /// The configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
    /// Every goal candidate landed on the player.
    #[error("no goal distinct from the player was drawn in {attempts} attempts")]
    RandomizationExhausted {
        /// Number of candidates drawn.
        attempts: u32,
    },
    /// A goal was placed on the player's own cell.
    #[error("goal cannot share the player's cell {position:?}")]
    GoalOnPlayer {
        /// Cell shared by both tokens.
        position: GridPosition,
    },
    /// A token was placed outside the playable bounds.
    #[error("{position:?} lies outside the playable bounds {bounds:?}")]
    OutsideBounds {
        /// Offending cell.
        position: GridPosition,
        /// Bounds in effect.
        bounds: GridBounds,
    },
}

/// Single floor tile.
///
/// Every tile shares the same floor sprite, so a tile only records where it sits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Tile {
    position: GridPosition,
}

impl Tile {
    /// Cell the tile covers.
    #[must_use]
    pub const fn position(&self) -> GridPosition {
        self.position
    }
}

/// Fixed floor layout built once from the grid configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileGrid {
    layout: GridConfig,
    tiles: Vec<Tile>,
}

impl TileGrid {
    /// Lays out every tile in row-major order.
    #[must_use]
    pub fn new(layout: GridConfig) -> Self {
        let capacity = layout.columns as usize * layout.rows as usize;
        let mut tiles = Vec::with_capacity(capacity);
        for row in 0..layout.rows {
            for column in 0..layout.columns {
                tiles.push(Tile {
                    position: GridPosition::new(
                        layout.origin_column + column as i32,
                        layout.origin_row + row as i32,
                    ),
                });
            }
        }
        Self { layout, tiles }
    }

    /// Number of tile columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.layout.columns
    }

    /// Number of tile rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.layout.rows
    }

    /// Iterator over the tiles in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    /// Number of tiles in the grid.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Reports whether the grid holds no tiles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

/// The player token together with the goal it is chasing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Player {
    position: GridPosition,
    goal: GridPosition,
}

impl Player {
    /// Creates a player, refusing a goal on the player's own cell.
    pub fn new(position: GridPosition, goal: GridPosition) -> Result<Self, WorldError> {
        if position == goal {
            return Err(WorldError::GoalOnPlayer { position });
        }
        Ok(Self { position, goal })
    }

    /// Spawns a player at a random cell with a distinct random goal.
    pub fn spawn<R>(bounds: &GridBounds, rng: &mut R, max_attempts: u32) -> Result<Self, WorldError>
    where
        R: Rng + ?Sized,
    {
        let position = random_cell(bounds, rng);
        let goal = draw_goal(bounds, position, rng, max_attempts)?;
        Self::new(position, goal)
    }

    /// Cell the player occupies.
    #[must_use]
    pub const fn position(&self) -> GridPosition {
        self.position
    }

    /// Cell the goal occupies.
    #[must_use]
    pub const fn goal(&self) -> GridPosition {
        self.goal
    }

    /// Reports whether the player stands on the goal.
    #[must_use]
    pub fn has_arrived(&self) -> bool {
        self.position == self.goal
    }

    /// Advances one cell, leaving the position untouched when the step leaves `bounds`.
    pub fn step(
        &mut self,
        direction: Direction,
        bounds: &GridBounds,
    ) -> Result<GridPosition, MoveError> {
        let destination = bounds.step(self.position, direction)?;
        self.position = destination;
        Ok(destination)
    }
}

/// Draws a uniformly random cell inside `bounds` that differs from `avoid`.
///
/// Candidates equal to `avoid` are rejected and redrawn, up to `max_attempts`
/// draws in total.
pub fn draw_goal<R>(
    bounds: &GridBounds,
    avoid: GridPosition,
    rng: &mut R,
    max_attempts: u32,
) -> Result<GridPosition, WorldError>
where
    R: Rng + ?Sized,
{
    for _ in 0..max_attempts {
        let candidate = random_cell(bounds, rng);
        if candidate != avoid {
            return Ok(candidate);
        }
    }
    Err(WorldError::RandomizationExhausted {
        attempts: max_attempts,
    })
}

fn random_cell<R>(bounds: &GridBounds, rng: &mut R) -> GridPosition
where
    R: Rng + ?Sized,
{
    GridPosition::new(
        rng.gen_range(bounds.min_column..=bounds.max_column),
        rng.gen_range(bounds.min_row..=bounds.max_row),
    )
}

/// Represents the authoritative Isogrid world state.
#[derive(Debug)]
pub struct World<R = ChaCha8Rng> {
    config: GameConfig,
    tile_grid: TileGrid,
    player: Player,
    rng: R,
}

impl World<ChaCha8Rng> {
    /// Creates a world from the configuration, seeding goal placement from
    /// `gameplay.seed` or from system entropy.
    pub fn new(config: &GameConfig) -> Result<Self, WorldError> {
        let rng = match config.gameplay.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }
}

impl<R: Rng> World<R> {
    /// Creates a world that draws the spawn cell and goals from `rng`.
    pub fn with_rng(config: &GameConfig, mut rng: R) -> Result<Self, WorldError> {
        config.validate()?;
        let player = Player::spawn(&config.bounds, &mut rng, config.gameplay.max_goal_attempts)?;
        Self::from_parts(config, player, rng)
    }

    /// Creates a world around an already placed player.
    pub fn from_parts(config: &GameConfig, player: Player, rng: R) -> Result<Self, WorldError> {
        config.validate()?;
        for position in [player.position(), player.goal()] {
            if !config.bounds.contains(position) {
                return Err(WorldError::OutsideBounds {
                    position,
                    bounds: config.bounds,
                });
            }
        }

        info!(
            "world ready: {}x{} tiles, player at {:?}, goal at {:?}",
            config.grid.columns,
            config.grid.rows,
            player.position(),
            player.goal()
        );

        Ok(Self {
            config: config.clone(),
            tile_grid: TileGrid::new(config.grid),
            player,
            rng,
        })
    }

    /// Replaces the goal with a fresh cell distinct from the player.
    ///
    /// The previous goal stays in place when every candidate is rejected.
    pub fn randomize_goal(&mut self) -> Result<GridPosition, WorldError> {
        let goal = draw_goal(
            &self.config.bounds,
            self.player.position(),
            &mut self.rng,
            self.config.gameplay.max_goal_attempts,
        )?;
        self.player.goal = goal;
        Ok(goal)
    }
}

/// Applies the provided command to the world, recording the outcome as events.
pub fn apply<R: Rng>(world: &mut World<R>, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::MovePlayer { direction } => {
            let from = world.player.position();
            match world.player.step(direction, &world.config.bounds) {
                Err(reason) => {
                    debug!("move {direction:?} from {from:?} rejected: {reason}");
                    out_events.push(Event::MoveRejected {
                        direction,
                        at: from,
                        reason,
                    });
                }
                Ok(to) => {
                    debug!("player moved {direction:?} from {from:?} to {to:?}");
                    out_events.push(Event::PlayerMoved { from, to });
                    if world.player.has_arrived() {
                        out_events.push(Event::GoalReached { at: to });
                        reassign_goal(world, out_events);
                    }
                }
            }
        }
    }
}

fn reassign_goal<R: Rng>(world: &mut World<R>, out_events: &mut Vec<Event>) {
    match world.randomize_goal() {
        Ok(goal) => {
            info!("goal reached, next goal at {goal:?}");
            out_events.push(Event::GoalAssigned { goal });
        }
        Err(error) => {
            let retained = world.player.goal();
            error!("keeping goal at {retained:?}: {error}");
            out_events.push(Event::GoalRandomizationFailed {
                attempts: world.config.gameplay.max_goal_attempts,
                retained,
            });
        }
    }
}

/// Query functions that expose read-only world state.
pub mod query {
    use isogrid_core::{GridBounds, GridPosition};

    use super::{Player, TileGrid, World};

    /// Floor tiles.
    #[must_use]
    pub fn tile_grid<R>(world: &World<R>) -> &TileGrid {
        &world.tile_grid
    }

    /// Cells the player and goal may occupy.
    #[must_use]
    pub fn bounds<R>(world: &World<R>) -> GridBounds {
        world.config.bounds
    }

    /// Player token and goal.
    #[must_use]
    pub fn player<R>(world: &World<R>) -> &Player {
        &world.player
    }

    /// Cell the player occupies.
    #[must_use]
    pub fn player_position<R>(world: &World<R>) -> GridPosition {
        world.player.position()
    }

    /// Cell the goal occupies.
    #[must_use]
    pub fn goal<R>(world: &World<R>) -> GridPosition {
        world.player.goal()
    }

    /// Reports whether the player currently stands on the goal.
    #[must_use]
    pub fn check_arrival<R>(world: &World<R>) -> bool {
        world.player.has_arrived()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;

    fn compact_config() -> GameConfig {
        let mut config = GameConfig::default();
        config.grid = GridConfig {
            columns: 7,
            rows: 7,
            origin_column: -2,
            origin_row: -2,
        };
        config.bounds = GridBounds::new(-2, 4, -2, 4);
        config.projection.vertical_offset_factor = 1.5;
        config
    }

    #[test]
    fn tile_grid_is_row_major() {
        let grid = TileGrid::new(GridConfig {
            columns: 3,
            rows: 2,
            origin_column: 0,
            origin_row: 0,
        });
        let positions: Vec<_> = grid.iter().map(Tile::position).collect();

        assert_eq!(
            positions,
            vec![
                GridPosition::new(0, 0),
                GridPosition::new(1, 0),
                GridPosition::new(2, 0),
                GridPosition::new(0, 1),
                GridPosition::new(1, 1),
                GridPosition::new(2, 1),
            ]
        );
    }

    #[test]
    fn tile_grid_honours_origin() {
        let grid = TileGrid::new(compact_config().grid);
        let covers = |column, row| {
            let cell = GridPosition::new(column, row);
            grid.iter().any(|tile| tile.position() == cell)
        };

        assert_eq!(grid.len(), 49);
        assert!(covers(-2, -2));
        assert!(covers(4, 3));
        assert!(!covers(5, 0));
    }

    #[test]
    fn player_rejects_goal_on_own_cell() {
        assert_eq!(
            Player::new(GridPosition::new(1, 1), GridPosition::new(1, 1)),
            Err(WorldError::GoalOnPlayer {
                position: GridPosition::new(1, 1)
            })
        );
    }

    #[test]
    fn draw_goal_gives_up_on_single_cell_bounds() {
        let bounds = GridBounds::new(3, 3, 3, 3);
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        assert_eq!(
            draw_goal(&bounds, GridPosition::new(3, 3), &mut rng, 10_000),
            Err(WorldError::RandomizationExhausted { attempts: 10_000 })
        );
    }

    #[test]
    fn single_cell_world_cannot_be_built() {
        let mut config = compact_config();
        config.bounds = GridBounds::new(0, 0, 0, 0);

        assert!(matches!(
            World::with_rng(&config, ChaCha8Rng::seed_from_u64(1)),
            Err(WorldError::RandomizationExhausted { .. })
        ));
    }

    #[test]
    fn parts_outside_bounds_are_rejected() {
        let config = compact_config();
        let player = Player::new(GridPosition::new(5, 0), GridPosition::new(0, 0))
            .expect("distinct cells");

        assert!(matches!(
            World::from_parts(&config, player, StepRng::new(0, 0)),
            Err(WorldError::OutsideBounds { .. })
        ));
    }

    #[test]
    fn failed_reroll_keeps_previous_goal() {
        let mut config = compact_config();
        config.gameplay.max_goal_attempts = 5;
        let player = Player::new(GridPosition::new(-1, -2), GridPosition::new(-2, -2))
            .expect("distinct cells");
        // StepRng(0, 0) always yields the lower bound, so every candidate lands on (-2, -2).
        let mut world = World::from_parts(&config, player, StepRng::new(0, 0)).expect("world");
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::MovePlayer {
                direction: Direction::Left,
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![
                Event::PlayerMoved {
                    from: GridPosition::new(-1, -2),
                    to: GridPosition::new(-2, -2),
                },
                Event::GoalReached {
                    at: GridPosition::new(-2, -2)
                },
                Event::GoalRandomizationFailed {
                    attempts: 5,
                    retained: GridPosition::new(-2, -2),
                },
            ]
        );
        assert_eq!(query::goal(&world), GridPosition::new(-2, -2));
    }

    #[test]
    fn seeded_worlds_spawn_identically() {
        let mut config = GameConfig::default();
        config.gameplay.seed = Some(99);
        let first = World::new(&config).expect("world");
        let second = World::new(&config).expect("world");

        assert_eq!(query::player(&first), query::player(&second));
    }
}
