#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Event-driven game loop that turns input into world commands and frames.
//!
//! The loop is a three-state machine: it waits in [`LoopState::Idle`], moves
//! to [`LoopState::Processing`] while one input event is applied and the
//! frame is recomposed, then returns to `Idle`. A quit request moves it to
//! [`LoopState::Shutdown`], which is final.

use isogrid_core::{Command, Event, OutOfBoundsFeedback};
use isogrid_rendering::{
    AudioCue, Control, CueId, EventHandler, Frame, InputEvent, InputSource, Renderer,
};
use isogrid_system_compositor::Compositor;
use isogrid_world::{self as world, World};
use log::{debug, info, warn};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

/// States of the game loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LoopState {
    /// Waiting for the next input event.
    Idle,
    /// Applying an input event and recomposing the frame.
    Processing,
    /// A quit was requested. No further events are processed.
    Shutdown,
}

/// Owns the world and the compositor and reacts to one input event at a time.
#[derive(Debug)]
pub struct GameLoop<R = ChaCha8Rng> {
    world: World<R>,
    compositor: Compositor,
    feedback: OutOfBoundsFeedback,
    state: LoopState,
    frame: Frame,
    events: Vec<Event>,
}

impl<R: Rng> GameLoop<R> {
    /// Creates a loop in the idle state with the initial frame already composed.
    #[must_use]
    pub fn new(world: World<R>, compositor: Compositor, feedback: OutOfBoundsFeedback) -> Self {
        let frame = compositor.compose(&world);
        Self {
            world,
            compositor,
            feedback,
            state: LoopState::Idle,
            frame,
            events: Vec::new(),
        }
    }

    /// Current state of the loop.
    #[must_use]
    pub const fn state(&self) -> LoopState {
        self.state
    }

    /// World driven by the loop.
    #[must_use]
    pub fn world(&self) -> &World<R> {
        &self.world
    }

    /// Most recently composed frame.
    #[must_use]
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Processes one input event and reports the resulting state.
    pub fn handle(&mut self, event: InputEvent, audio: &mut dyn AudioCue) -> LoopState {
        if self.state == LoopState::Shutdown {
            debug!("ignoring {event:?} after shutdown");
            return self.state;
        }

        match event {
            InputEvent::Quit => {
                info!("quit requested, shutting down");
                self.state = LoopState::Shutdown;
            }
            InputEvent::KeyDown(direction) => {
                self.state = LoopState::Processing;
                self.events.clear();
                world::apply(
                    &mut self.world,
                    Command::MovePlayer { direction },
                    &mut self.events,
                );
                for event in &self.events {
                    react(event, self.feedback, audio);
                }
                self.frame = self.compositor.compose(&self.world);
                self.state = LoopState::Idle;
            }
        }

        self.state
    }

    /// Replays the cached frame onto `renderer`.
    pub fn redraw(&self, renderer: &mut dyn Renderer) {
        self.frame.render_to(renderer);
    }

    /// Presents the initial frame, then processes input until quit or exhaustion.
    ///
    /// One frame is presented per processed event that does not shut the loop down.
    pub fn run(
        &mut self,
        input: &mut dyn InputSource,
        renderer: &mut dyn Renderer,
        audio: &mut dyn AudioCue,
    ) {
        self.redraw(renderer);
        while self.state != LoopState::Shutdown {
            let Some(event) = input.next_event() else {
                info!("input exhausted, shutting down");
                self.state = LoopState::Shutdown;
                break;
            };
            if self.handle(event, audio) != LoopState::Shutdown {
                self.redraw(renderer);
            }
        }
    }
}

fn react(event: &Event, feedback: OutOfBoundsFeedback, audio: &mut dyn AudioCue) {
    debug!("world event: {event:?}");
    if let Event::MoveRejected { reason, .. } = event {
        match feedback {
            OutOfBoundsFeedback::AudioCue => audio.play(CueId::OutOfBounds),
            OutOfBoundsFeedback::Silent => warn!("{reason}"),
        }
    }
}

impl<R: Rng> EventHandler for GameLoop<R> {
    fn handle(&mut self, event: InputEvent, audio: &mut dyn AudioCue) -> Control {
        match GameLoop::handle(self, event, audio) {
            LoopState::Shutdown => Control::Exit,
            LoopState::Idle | LoopState::Processing => Control::Continue,
        }
    }

    fn redraw(&mut self, renderer: &mut dyn Renderer) {
        GameLoop::redraw(self, renderer);
    }
}
