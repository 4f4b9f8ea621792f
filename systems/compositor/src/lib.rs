#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Scene compositor that turns world state into an ordered list of sprite draws.
//!
//! Every floor tile is emitted first in row-major order. The player and goal
//! follow, ordered by a [`DepthComparator`] so whichever token sits nearer the
//! viewer is painted last.

use isogrid_core::{DepthPolicy, GameConfig, GridPosition};
use isogrid_projection::{ProjectionError, Projector};
use isogrid_rendering::{Color, Frame, SpriteKey};
use isogrid_world::{query, World};

/// Decides which of two overlapping tokens is painted first.
pub trait DepthComparator {
    /// Reports whether a token at `candidate` must be painted before one already
    /// placed at `placed`.
    fn paints_before(&self, candidate: GridPosition, placed: GridPosition) -> bool;
}

/// Paints a token first when the other token exceeds it on both axes, or when both share a cell.
///
/// Tokens are inserted in declaration order, player then goal, so a shared
/// cell puts the goal underneath the player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DominanceDepth;

impl DepthComparator for DominanceDepth {
    fn paints_before(&self, candidate: GridPosition, placed: GridPosition) -> bool {
        candidate == placed || placed.strictly_dominates(candidate)
    }
}

/// Painter's ordering by `column + row`, ties keep declaration order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DiagonalDepth;

impl DepthComparator for DiagonalDepth {
    fn paints_before(&self, candidate: GridPosition, placed: GridPosition) -> bool {
        candidate.diagonal_depth() < placed.diagonal_depth()
    }
}

/// Orders tokens by inserting each one ahead of the first placed token it paints before.
#[must_use]
pub fn order_tokens<C>(
    comparator: &C,
    tokens: &[(SpriteKey, GridPosition)],
) -> Vec<(SpriteKey, GridPosition)>
where
    C: DepthComparator + ?Sized,
{
    let mut ordered: Vec<(SpriteKey, GridPosition)> = Vec::with_capacity(tokens.len());
    for &(sprite, position) in tokens {
        let slot = ordered
            .iter()
            .position(|&(_, placed)| comparator.paints_before(position, placed));
        match slot {
            Some(index) => ordered.insert(index, (sprite, position)),
            None => ordered.push((sprite, position)),
        }
    }
    ordered
}

/// Builds frames from world snapshots.
pub struct Compositor {
    projector: Projector,
    clear_color: Color,
    depth: Box<dyn DepthComparator>,
}

impl Compositor {
    /// Creates a compositor using the projection and depth policy from `config`.
    pub fn new(config: &GameConfig) -> Result<Self, ProjectionError> {
        let depth: Box<dyn DepthComparator> = match config.gameplay.depth_policy {
            DepthPolicy::Dominance => Box::new(DominanceDepth),
            DepthPolicy::Diagonal => Box::new(DiagonalDepth),
        };
        Ok(Self::with_comparator(
            Projector::new(config)?,
            Color::from(config.window.background),
            depth,
        ))
    }

    /// Creates a compositor around an explicit projector and comparator.
    #[must_use]
    pub fn with_comparator(
        projector: Projector,
        clear_color: Color,
        depth: Box<dyn DepthComparator>,
    ) -> Self {
        Self {
            projector,
            clear_color,
            depth,
        }
    }

    /// Projector used to place every sprite.
    #[must_use]
    pub fn projector(&self) -> &Projector {
        &self.projector
    }

    /// Produces the frame for the current world state.
    #[must_use]
    pub fn compose<R>(&self, world: &World<R>) -> Frame {
        let tiles = query::tile_grid(world);
        let mut frame = Frame::new(self.clear_color);
        frame.draws.reserve(tiles.len() + 2);

        for tile in tiles.iter() {
            frame.push(SpriteKey::Floor, self.projector.tile_position(tile.position()));
        }

        let player = query::player(world);
        let tokens = [
            (SpriteKey::Player, player.position()),
            (SpriteKey::Goal, player.goal()),
        ];
        for (sprite, position) in order_tokens(self.depth.as_ref(), &tokens) {
            frame.push(sprite, self.projector.token_position(position));
        }

        frame
    }
}

impl std::fmt::Debug for Compositor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compositor")
            .field("projector", &self.projector)
            .field("clear_color", &self.clear_color)
            .finish_non_exhaustive()
    }
}
