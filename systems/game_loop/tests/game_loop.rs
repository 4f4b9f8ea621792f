use std::collections::VecDeque;

use glam::Vec2;
use isogrid_core::{
    Direction, GameConfig, GridBounds, GridConfig, GridPosition, OutOfBoundsFeedback,
};
use isogrid_rendering::{AudioCue, Color, CueId, InputEvent, InputSource, Renderer, SpriteKey};
use isogrid_system_compositor::Compositor;
use isogrid_system_game_loop::{GameLoop, LoopState};
use isogrid_world::{query, Player, World};
use rand::{rngs::mock::StepRng, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

struct ScriptedInput {
    events: VecDeque<InputEvent>,
}

impl ScriptedInput {
    fn new(events: impl IntoIterator<Item = InputEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }
}

impl InputSource for ScriptedInput {
    fn next_event(&mut self) -> Option<InputEvent> {
        self.events.pop_front()
    }
}

#[derive(Default)]
struct RecordingRenderer {
    clears: usize,
    draws: usize,
    presents: usize,
}

impl Renderer for RecordingRenderer {
    fn clear(&mut self, _color: Color) {
        self.clears += 1;
    }

    fn draw(&mut self, _sprite: SpriteKey, _position: Vec2) {
        self.draws += 1;
    }

    fn present(&mut self) {
        self.presents += 1;
    }
}

#[derive(Default)]
struct RecordingAudio {
    played: Vec<CueId>,
}

impl AudioCue for RecordingAudio {
    fn play(&mut self, cue: CueId) {
        self.played.push(cue);
    }
}

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

fn game_loop<R: Rng>(
    config: &GameConfig,
    player: (i32, i32),
    goal: (i32, i32),
    rng: R,
) -> GameLoop<R> {
    let player = Player::new(
        GridPosition::new(player.0, player.1),
        GridPosition::new(goal.0, goal.1),
    )
    .expect("distinct cells");
    let world = World::from_parts(config, player, rng).expect("valid world");
    let compositor = Compositor::new(config).expect("compositor");
    GameLoop::new(world, compositor, config.gameplay.out_of_bounds)
}

#[test]
fn move_right_at_the_edge_plays_the_cue_and_stays_put() {
    let config = compact_config();
    let mut game = game_loop(&config, (4, 0), (0, 0), ChaCha8Rng::seed_from_u64(5));
    let before = game.frame().clone();
    let mut audio = RecordingAudio::default();

    let state = game.handle(InputEvent::KeyDown(Direction::Right), &mut audio);

    assert_eq!(state, LoopState::Idle);
    assert_eq!(audio.played, vec![CueId::OutOfBounds]);
    assert_eq!(query::player_position(game.world()), GridPosition::new(4, 0));
    assert_eq!(game.frame(), &before);
}

#[test]
fn silent_feedback_rejects_moves_without_a_cue() {
    let mut config = compact_config();
    config.gameplay.out_of_bounds = OutOfBoundsFeedback::Silent;
    let mut game = game_loop(&config, (-2, -2), (0, 0), ChaCha8Rng::seed_from_u64(5));
    let mut audio = RecordingAudio::default();

    let _ = game.handle(InputEvent::KeyDown(Direction::Up), &mut audio);
    let _ = game.handle(InputEvent::KeyDown(Direction::Left), &mut audio);

    assert!(audio.played.is_empty());
    assert_eq!(query::player_position(game.world()), GridPosition::new(-2, -2));
}

#[test]
fn every_direction_moves_one_cell() {
    let config = compact_config();
    let mut game = game_loop(&config, (1, 1), (4, 4), ChaCha8Rng::seed_from_u64(5));
    let mut audio = RecordingAudio::default();

    let expected = [
        (Direction::Up, GridPosition::new(1, 0)),
        (Direction::Right, GridPosition::new(2, 0)),
        (Direction::Down, GridPosition::new(2, 1)),
        (Direction::Left, GridPosition::new(1, 1)),
    ];
    for (direction, position) in expected {
        let _ = game.handle(InputEvent::KeyDown(direction), &mut audio);
        assert_eq!(query::player_position(game.world()), position);
    }
    assert!(audio.played.is_empty());
}

#[test]
fn arriving_on_the_goal_moves_it_elsewhere() {
    let config = compact_config();
    let mut game = game_loop(&config, (1, 2), (2, 2), ChaCha8Rng::seed_from_u64(11));
    let mut audio = RecordingAudio::default();

    let _ = game.handle(InputEvent::KeyDown(Direction::Right), &mut audio);

    let world = game.world();
    assert_eq!(query::player_position(world), GridPosition::new(2, 2));
    assert_ne!(query::goal(world), GridPosition::new(2, 2));
    assert!(query::bounds(world).contains(query::goal(world)));
    assert!(!query::check_arrival(world));
}

#[test]
fn exhausted_reroll_keeps_the_reached_goal() {
    let mut config = compact_config();
    config.gameplay.max_goal_attempts = 3;
    // StepRng(0, 0) always draws the lower bound (-2, -2).
    let mut game = game_loop(&config, (-2, -1), (-2, -2), StepRng::new(0, 0));
    let mut audio = RecordingAudio::default();

    let state = game.handle(InputEvent::KeyDown(Direction::Up), &mut audio);

    assert_eq!(state, LoopState::Idle);
    assert_eq!(query::goal(game.world()), GridPosition::new(-2, -2));
    assert!(query::check_arrival(game.world()));
}

#[test]
fn run_presents_one_frame_per_processed_event_and_stops_at_quit() {
    let config = compact_config();
    let mut game = game_loop(&config, (0, 0), (4, 4), ChaCha8Rng::seed_from_u64(5));
    let mut input = ScriptedInput::new([
        InputEvent::KeyDown(Direction::Down),
        InputEvent::KeyDown(Direction::Right),
        InputEvent::Quit,
        InputEvent::KeyDown(Direction::Right),
    ]);
    let mut renderer = RecordingRenderer::default();
    let mut audio = RecordingAudio::default();

    game.run(&mut input, &mut renderer, &mut audio);

    assert_eq!(game.state(), LoopState::Shutdown);
    assert_eq!(renderer.presents, 3);
    assert_eq!(renderer.clears, 3);
    assert_eq!(renderer.draws, 3 * (49 + 2));
    assert_eq!(query::player_position(game.world()), GridPosition::new(1, 1));
    assert_eq!(input.next_event(), Some(InputEvent::KeyDown(Direction::Right)));
}

#[test]
fn run_shuts_down_when_input_is_exhausted() {
    let config = compact_config();
    let mut game = game_loop(&config, (0, 0), (4, 4), ChaCha8Rng::seed_from_u64(5));
    let mut input = ScriptedInput::new([InputEvent::KeyDown(Direction::Left)]);
    let mut renderer = RecordingRenderer::default();
    let mut audio = RecordingAudio::default();

    game.run(&mut input, &mut renderer, &mut audio);

    assert_eq!(game.state(), LoopState::Shutdown);
    assert_eq!(renderer.presents, 2);
}

#[test]
fn seeded_sessions_replay_identically() {
    let mut config = GameConfig::default();
    config.gameplay.seed = Some(0x1505);
    let script = [
        Direction::Up,
        Direction::Up,
        Direction::Left,
        Direction::Down,
        Direction::Right,
        Direction::Right,
    ];

    let play = || {
        let world = World::new(&config).expect("world");
        let compositor = Compositor::new(&config).expect("compositor");
        let mut game = GameLoop::new(world, compositor, config.gameplay.out_of_bounds);
        let mut audio = RecordingAudio::default();
        for direction in script {
            let _ = game.handle(InputEvent::KeyDown(direction), &mut audio);
        }
        (game.frame().clone(), audio.played)
    };

    assert_eq!(play(), play());
}
