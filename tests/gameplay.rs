use std::collections::{HashSet, VecDeque};
use std::time::Duration;

use anyhow::Result;
use term_snake::config::{GameConfig, GridSize};
use term_snake::game::{InputEvent, InputSource, Renderer, SnakeGame};
use term_snake::snake::Direction;
use term_snake::state::{GameState, OverReason, RandomSource, StdRandom, Status, TickOutcome};
use term_snake::Coords;

// Feeds a fixed input script and records what it was asked to draw.
struct Recorder {
    inputs: VecDeque<InputEvent>,
    frames: usize,
    last: Option<GameState>,
    game_over: Option<GameState>,
}

impl Recorder {
    fn new(inputs: &[InputEvent]) -> Self {
        Recorder { inputs: inputs.iter().copied().collect(), frames: 0, last: None, game_over: None }
    }
}

impl Renderer for Recorder {
    fn render(&mut self, state: &GameState) -> Result<()> {
        self.frames += 1;
        self.last = Some(state.clone());
        Ok(())
    }

    fn render_game_over(&mut self, state: &GameState) -> Result<()> {
        self.game_over = Some(state.clone());
        Ok(())
    }
}

impl InputSource for Recorder {
    fn poll_input(&mut self) -> Result<Option<InputEvent>> {
        Ok(self.inputs.pop_front())
    }
}

fn check_invariants(state: &GameState) {
    let cells: Vec<Coords> = state.snake().body().copied().collect();
    let unique: HashSet<&Coords> = cells.iter().collect();
    assert_eq!(unique.len(), cells.len());
    assert!(cells.iter().all(|c| state.is_interior(*c)));
    assert!(state.is_interior(state.food()));
    assert!(!state.snake().contains(&state.food()));
}

#[test]
fn same_seed_and_inputs_replay_identically() {
    let config = GameConfig {
        grid: GridSize::Fixed { width: 24, height: 16 },
        seed: Some(7),
        tick_interval: Duration::ZERO,
        game_over_delay: Duration::ZERO,
        ..GameConfig::default()
    };
    let script = [InputEvent::Down, InputEvent::Right, InputEvent::Up, InputEvent::Right, InputEvent::Down];

    let mut first = SnakeGame::from_config(&config, (80, 24)).unwrap();
    let mut first_term = Recorder::new(&script);
    first.run(&mut first_term).unwrap();

    let mut second = SnakeGame::from_config(&config, (80, 24)).unwrap();
    let mut second_term = Recorder::new(&script);
    second.run(&mut second_term).unwrap();

    assert_eq!(first.state(), second.state());
    assert_eq!(first.ticks(), second.ticks());
    assert_eq!(first_term.frames, second_term.frames);
    assert_eq!(first_term.game_over, Some(first.state().clone()));
}

#[test]
fn game_over_banner_is_drawn_once_at_the_end() {
    let config = GameConfig {
        grid: GridSize::Fixed { width: 12, height: 12 },
        seed: Some(3),
        tick_interval: Duration::ZERO,
        game_over_delay: Duration::ZERO,
        ..GameConfig::default()
    };

    let mut game = SnakeGame::from_config(&config, (12, 12)).unwrap();
    let mut term = Recorder::new(&[InputEvent::Up]);
    game.run(&mut term).unwrap();

    // Up from (5,5) reaches y=1 after four steps; the fifth hits the border
    assert_eq!(game.ticks(), 5);
    assert_eq!(term.frames, 5);
    let last = term.last.unwrap();
    assert_eq!(last.status(), Status::Running);
    let over = term.game_over.unwrap();
    assert_eq!(over.status(), Status::Over(OverReason::Wall));
    assert_eq!(over.snake().head(), (5, 1));
}

#[test]
fn quitting_leaves_the_snake_where_it_was() {
    let mut rng = StdRandom::from_seed(11);
    let state = GameState::initialize(30, 10, &mut rng).unwrap();
    let mut game = SnakeGame::new(state.clone(), rng, Duration::ZERO, Duration::ZERO);

    let mut term = Recorder::new(&[InputEvent::Quit]);
    game.run(&mut term).unwrap();

    assert_eq!(game.ticks(), 0);
    assert_eq!(game.state().status(), Status::Over(OverReason::Quit));
    assert_eq!(game.state().snake(), state.snake());
    assert_eq!(game.state().food(), state.food());
}

#[test]
fn long_random_games_keep_the_board_consistent() {
    let mut turns = StdRandom::from_seed(5150);

    for seed in 0..20 {
        let mut rng = StdRandom::from_seed(seed);
        let mut state = GameState::initialize(10, 8, &mut rng).unwrap();
        check_invariants(&state);
        let mut len = state.snake().len();

        loop {
            let dir = Direction::ALL[turns.uniform_int(0, 3) as usize];
            let before = state.direction();
            let accepted = state.set_direction(dir);
            if dir == before.opposite() {
                assert!(!accepted);
                assert_eq!(state.direction(), before);
            }

            let snapshot = state.clone();
            match state.tick(&mut rng) {
                TickOutcome::Continue => {
                    assert!(state.snake().len() >= len);
                    len = state.snake().len();
                    check_invariants(&state);
                }
                TickOutcome::GameOver => {
                    match state.status() {
                        Status::Over(OverReason::Wall) | Status::Over(OverReason::SelfCollision) => {
                            assert_eq!(state.snake(), snapshot.snake());
                            assert_eq!(state.food(), snapshot.food());
                        }
                        Status::Over(OverReason::BoardFilled) => {}
                        other => panic!("unexpected status {:?}", other),
                    }
                    break;
                }
            }
        }
    }
}
