#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Isogrid adapters.
//!
//! Systems describe what to show as a [`Frame`] of [`DrawCommand`]s and never
//! touch a window directly. Backends implement [`Renderer`], [`AssetSource`],
//! [`InputSource`] and [`AudioCue`] for a concrete platform and drive an
//! [`EventHandler`] through [`RenderingBackend::run`].

use std::path::{Path, PathBuf};

use anyhow::Result as AnyResult;
use glam::Vec2;
use isogrid_core::{Direction, GameConfig};
use thiserror::Error;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }
}

impl From<[u8; 3]> for Color {
    fn from([red, green, blue]: [u8; 3]) -> Self {
        Self::from_rgb_u8(red, green, blue)
    }
}

/// Logical sprite identifiers. Backends map each key onto a loaded texture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpriteKey {
    /// Floor tile cube.
    Floor,
    /// Player token cube.
    Player,
    /// Goal token cube.
    Goal,
}

/// Single sprite placement, with `position` naming the sprite's top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawCommand {
    /// Sprite to draw.
    pub sprite: SpriteKey,
    /// Top-left corner in screen pixels.
    pub position: Vec2,
}

impl DrawCommand {
    /// Creates a new draw command.
    #[must_use]
    pub const fn new(sprite: SpriteKey, position: Vec2) -> Self {
        Self { sprite, position }
    }
}

/// Ordered list of draw commands making up one presented frame.
///
/// Commands are painted in order, so later entries cover earlier ones.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    /// Color the target is cleared to before drawing.
    pub clear_color: Color,
    /// Draw commands in painting order.
    pub draws: Vec<DrawCommand>,
}

impl Frame {
    /// Creates an empty frame that only clears the target.
    #[must_use]
    pub fn new(clear_color: Color) -> Self {
        Self {
            clear_color,
            draws: Vec::new(),
        }
    }

    /// Appends a draw command on top of everything already queued.
    pub fn push(&mut self, sprite: SpriteKey, position: Vec2) {
        self.draws.push(DrawCommand::new(sprite, position));
    }

    /// Replays the frame onto a renderer: clear, every draw in order, present.
    pub fn render_to(&self, renderer: &mut dyn Renderer) {
        renderer.clear(self.clear_color);
        for command in &self.draws {
            renderer.draw(command.sprite, command.position);
        }
        renderer.present();
    }
}

/// Discrete input events consumed by the game loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputEvent {
    /// The user asked to close the game.
    Quit,
    /// A movement key was pressed.
    KeyDown(Direction),
}

/// Audio cues the game can request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CueId {
    /// A move was rejected at the edge of the playable bounds.
    OutOfBounds,
}

/// Whether a backend keeps pumping events after a handler call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Control {
    /// Keep running.
    Continue,
    /// Close the window and return from [`RenderingBackend::run`].
    Exit,
}

/// Drawing surface that accepts clear, sprite draws and presentation.
pub trait Renderer {
    /// Fills the whole target with `color`.
    fn clear(&mut self, color: Color);

    /// Draws `sprite` with its top-left corner at `position`, scaled to the sprite footprint.
    fn draw(&mut self, sprite: SpriteKey, position: Vec2);

    /// Finishes the frame.
    fn present(&mut self);
}

/// Loader that turns sprite paths into backend-specific handles.
pub trait AssetSource {
    /// Handle produced for each loaded sprite.
    type Sprite;

    /// Loads the sprite stored at `path`.
    fn load_sprite(&mut self, path: &Path) -> Result<Self::Sprite, AssetError>;
}

/// Lazy, blocking sequence of input events.
pub trait InputSource {
    /// Waits for the next event. `None` signals that the source is exhausted.
    fn next_event(&mut self) -> Option<InputEvent>;
}

/// Fire-and-forget audio playback.
pub trait AudioCue {
    /// Starts playing `cue` without waiting for it to finish.
    fn play(&mut self, cue: CueId);
}

/// Audio sink that discards every cue.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Silence;

impl AudioCue for Silence {
    fn play(&mut self, _cue: CueId) {}
}

/// Receiver of input events pumped by a windowing backend.
pub trait EventHandler {
    /// Processes one input event, playing any cue through `audio`.
    fn handle(&mut self, event: InputEvent, audio: &mut dyn AudioCue) -> Control;

    /// Draws the most recently composed frame.
    fn redraw(&mut self, renderer: &mut dyn Renderer);
}

/// Rendering backend capable of presenting Isogrid frames.
pub trait RenderingBackend {
    /// Runs the backend until the handler requests exit or the window closes.
    fn run<H>(self, presentation: Presentation, handler: H) -> AnyResult<()>
    where
        H: EventHandler + 'static;
}

/// Handles for the three sprites a frame can reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpriteSet<S> {
    floor: S,
    player: S,
    goal: S,
}

impl<S> SpriteSet<S> {
    /// Loads every sprite named by `manifest` through `source`.
    pub fn load<A>(source: &mut A, manifest: &SpriteManifest) -> Result<Self, AssetError>
    where
        A: AssetSource<Sprite = S>,
    {
        Ok(Self {
            floor: source.load_sprite(manifest.path(SpriteKey::Floor))?,
            player: source.load_sprite(manifest.path(SpriteKey::Player))?,
            goal: source.load_sprite(manifest.path(SpriteKey::Goal))?,
        })
    }

    /// Handle associated with `key`.
    #[must_use]
    pub fn get(&self, key: SpriteKey) -> &S {
        match key {
            SpriteKey::Floor => &self.floor,
            SpriteKey::Player => &self.player,
            SpriteKey::Goal => &self.goal,
        }
    }
}

/// Resolved file paths of every sprite.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpriteManifest {
    floor: PathBuf,
    player: PathBuf,
    goal: PathBuf,
}

impl SpriteManifest {
    /// Creates a manifest from explicit paths.
    #[must_use]
    pub fn new(floor: PathBuf, player: PathBuf, goal: PathBuf) -> Self {
        Self {
            floor,
            player,
            goal,
        }
    }

    /// Path of the sprite associated with `key`.
    #[must_use]
    pub fn path(&self, key: SpriteKey) -> &Path {
        match key {
            SpriteKey::Floor => &self.floor,
            SpriteKey::Player => &self.player,
            SpriteKey::Goal => &self.goal,
        }
    }
}

/// Static window and asset description handed to a backend.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title displayed by the window.
    pub window_title: String,
    /// Window width in pixels.
    pub width: u32,
    /// Window height in pixels.
    pub height: u32,
    /// Size every sprite is drawn at.
    pub sprite_size: Vec2,
    /// Sprites loaded before the first frame.
    pub sprites: SpriteManifest,
    /// Sound played for [`CueId::OutOfBounds`], if any.
    pub bump_sound: Option<PathBuf>,
}

impl Presentation {
    /// Derives the presentation from the game configuration.
    #[must_use]
    pub fn from_config(config: &GameConfig) -> Self {
        let assets = &config.assets;
        Self {
            window_title: config.window.title.clone(),
            width: config.window.width,
            height: config.window.height,
            sprite_size: Vec2::new(
                config.sprite.width() as f32,
                config.sprite.height() as f32,
            ),
            sprites: SpriteManifest::new(
                assets.resolve(&assets.floor),
                assets.resolve(&assets.player),
                assets.resolve(&assets.goal),
            ),
            bump_sound: assets.bump.as_deref().map(|bump| assets.resolve(bump)),
        }
    }
}

/// Failures raised while loading assets.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum AssetError {
    /// No file exists at the requested path.
    #[error("asset not found: {}", path.display())]
    AssetNotFound {
        /// Requested path.
        path: PathBuf,
    },
    /// The file exists but could not be read.
    #[error("failed to read asset {}: {message}", path.display())]
    Unreadable {
        /// Requested path.
        path: PathBuf,
        /// Underlying I/O failure.
        message: String,
    },
    /// The file was read but its contents are not a supported format.
    #[error("failed to decode asset {}: {message}", path.display())]
    Undecodable {
        /// Requested path.
        path: PathBuf,
        /// Decoder failure.
        message: String,
    },
}
