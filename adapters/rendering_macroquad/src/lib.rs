#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Isogrid.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, so this crate depends on macroquad without its default `audio`
//! feature. Enabling this crate's `audio` feature turns it back on and plays
//! the configured bump sound; without it cue requests are only logged.

mod sprites;

use std::{path::Path, sync::mpsc};

use anyhow::{Context, Result};
use glam::Vec2;
use isogrid_core::Direction;
use isogrid_rendering::{
    AudioCue, Color, Control, CueId, EventHandler, InputEvent, Presentation, Renderer,
    RenderingBackend, SpriteKey,
};
use log::{debug, info};
use macroquad::input::{is_key_pressed, KeyCode};

use self::sprites::{upload_texture, FileAssetSource, SpriteAtlas};

const WATCHED_KEYS: [KeyCode; 6] = [
    KeyCode::Escape,
    KeyCode::Q,
    KeyCode::Up,
    KeyCode::Down,
    KeyCode::Left,
    KeyCode::Right,
];

/// Maps a physical key onto the input event it triggers, if any.
#[must_use]
pub fn input_for_key(key: KeyCode) -> Option<InputEvent> {
    match key {
        KeyCode::Escape | KeyCode::Q => Some(InputEvent::Quit),
        KeyCode::Up => Some(InputEvent::KeyDown(Direction::Up)),
        KeyCode::Down => Some(InputEvent::KeyDown(Direction::Down)),
        KeyCode::Left => Some(InputEvent::KeyDown(Direction::Left)),
        KeyCode::Right => Some(InputEvent::KeyDown(Direction::Right)),
        _ => None,
    }
}

fn poll_input() -> impl Iterator<Item = InputEvent> {
    WATCHED_KEYS
        .into_iter()
        .filter(|&key| is_key_pressed(key))
        .filter_map(input_for_key)
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<H>(self, presentation: Presentation, handler: H) -> Result<()>
    where
        H: EventHandler + 'static,
    {
        let Presentation {
            window_title,
            width,
            height,
            sprite_size,
            sprites,
            bump_sound,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: i32::try_from(width).context("window width exceeds i32")?,
            window_height: i32::try_from(height).context("window height exceeds i32")?,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = self.swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        let (atlas_init_sender, atlas_init_receiver) = mpsc::channel::<Result<()>>();

        macroquad::Window::from_config(config, async move {
            let mut handler = handler;
            let mut source = FileAssetSource::new(upload_texture);
            let atlas = match SpriteAtlas::load(&mut source, &sprites, sprite_size)
                .context("failed to initialise sprite atlas")
            {
                Ok(atlas) => atlas,
                Err(error) => {
                    let _ = atlas_init_sender.send(Err(error));
                    return;
                }
            };
            let mut audio = CuePlayer::load(bump_sound.as_deref()).await;
            let _ = atlas_init_sender.send(Ok(()));
            info!("window open, sprites loaded");

            // Macroquad cannot block on input, so keys are polled every frame and
            // the cached frame is redrawn. `GameLoop::run` keeps the blocking loop.
            'frames: loop {
                for event in poll_input() {
                    debug!("input {event:?}");
                    if handler.handle(event, &mut audio) == Control::Exit {
                        break 'frames;
                    }
                }

                handler.redraw(&mut MacroquadRenderer { atlas: &atlas });
                macroquad::window::next_frame().await;
            }

            info!("window closing");
        });

        atlas_init_receiver.recv().unwrap_or_else(|_| Ok(()))?;

        Ok(())
    }
}

/// Draws frames straight into macroquad's immediate-mode batch.
struct MacroquadRenderer<'a> {
    atlas: &'a SpriteAtlas,
}

impl Renderer for MacroquadRenderer<'_> {
    fn clear(&mut self, color: Color) {
        macroquad::window::clear_background(to_macroquad_color(color));
    }

    fn draw(&mut self, sprite: SpriteKey, position: Vec2) {
        self.atlas.draw(sprite, position);
    }

    // The frame loop awaits `next_frame` after every redraw.
    fn present(&mut self) {}
}

/// Plays cues through macroquad's mixer when audio support is compiled in.
struct CuePlayer {
    #[cfg(feature = "audio")]
    bump: Option<macroquad::audio::Sound>,
}

impl CuePlayer {
    #[cfg(feature = "audio")]
    async fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self { bump: None };
        };
        let bump = match sprites::read_asset(path) {
            Ok(bytes) => match macroquad::audio::load_sound_from_bytes(&bytes).await {
                Ok(sound) => Some(sound),
                Err(error) => {
                    log::warn!("bump sound {} could not be decoded: {error}", path.display());
                    None
                }
            },
            Err(error) => {
                log::warn!("continuing without bump sound: {error}");
                None
            }
        };
        Self { bump }
    }

    #[cfg(not(feature = "audio"))]
    async fn load(path: Option<&Path>) -> Self {
        if let Some(path) = path {
            info!(
                "audio support not compiled in, {} will not be played",
                path.display()
            );
        }
        Self {}
    }

    #[cfg(feature = "audio")]
    fn play_loaded(&self, cue: CueId) -> bool {
        match (cue, self.bump) {
            (CueId::OutOfBounds, Some(sound)) => {
                macroquad::audio::play_sound_once(sound);
                true
            }
            (CueId::OutOfBounds, None) => false,
        }
    }

    #[cfg(not(feature = "audio"))]
    fn play_loaded(&self, _cue: CueId) -> bool {
        false
    }
}

impl AudioCue for CuePlayer {
    fn play(&mut self, cue: CueId) {
        if !self.play_loaded(cue) {
            debug!("cue {cue:?} requested without a loaded sound");
        }
    }
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}
