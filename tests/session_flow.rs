use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::rngs::SmallRng;

use returnsleuth::engine::game::{Game, GameEvent};
use returnsleuth::engine::queue::{FetchState, ItemQueue, RefillMode};
use returnsleuth::generator::batch::BatchGenerator;
use returnsleuth::generator::{ContentError, ContentSource};
use returnsleuth::model::item::{Category, ItemType, ReturnItem, VisualDefect};
use returnsleuth::session::decision::Action;
use returnsleuth::session::rules::GameRules;
use returnsleuth::session::state::Phase;

const FEEDBACK_PASSED: Duration = Duration::from_millis(1300);

/// Answers after `delay` with items named `name`.
struct SlowSource {
    delay: Duration,
    name: &'static str,
}

impl ContentSource for SlowSource {
    fn fetch(&self, _level: u32, count: usize) -> Result<Vec<ReturnItem>, ContentError> {
        thread::sleep(self.delay);
        Ok((0..count)
            .map(|_| ReturnItem {
                id: ReturnItem::new_id(),
                name: self.name.to_string(),
                category: Category::Female,
                item_type: ItemType::Bag,
                material: "Canvas".to_string(),
                description: "Tote from the slow source.".to_string(),
                visual_defects: vec![VisualDefect::None],
                is_fraud: false,
                color: "#cccccc".to_string(),
                explanation: "Nothing wrong.".to_string(),
            })
            .collect())
    }
}

fn local_generator(seed: u64) -> Arc<BatchGenerator> {
    Arc::new(BatchGenerator::local_only(SmallRng::seed_from_u64(seed)))
}

fn inline_game(seed: u64) -> (Game, Instant) {
    let mut game = Game::with_refill(GameRules::default(), local_generator(seed), 1, RefillMode::Inline);
    let t0 = Instant::now();
    game.update(t0);
    assert_eq!(game.phase(), Phase::Playing);
    (game, t0)
}

fn right_action(game: &Game) -> Action {
    if game.current_item().unwrap().is_fraud {
        Action::Reject
    } else {
        Action::Accept
    }
}

fn wrong_action(game: &Game) -> Action {
    match right_action(game) {
        Action::Accept => Action::Reject,
        Action::Reject => Action::Accept,
    }
}

fn wait_for_playing(game: &mut Game, limit: Duration) -> Duration {
    let start = Instant::now();
    while game.phase() == Phase::Loading && start.elapsed() < limit {
        game.update(Instant::now());
        thread::sleep(Duration::from_millis(5));
    }
    start.elapsed()
}

#[test]
fn twenty_five_quick_decisions_never_starve() {
    let (mut game, t0) = inline_game(3);
    let mut now = t0;
    for round in 0..25 {
        assert!(game.current_item().is_some(), "no item at round {round}");
        assert!(!game.snapshot().loading);
        let action = right_action(&game);
        assert!(game.decide(action, now).is_some());
        now += FEEDBACK_PASSED;
        game.update(now);
        assert_eq!(game.phase(), Phase::Playing);
    }
    assert_eq!(game.queue().emergency_fetches(), 0);
    assert_eq!(game.state().correct, 25);
}

#[test]
fn scoring_streak_and_penalty() {
    let (mut game, t0) = inline_game(5);

    let first = game.decide(right_action(&game), t0).unwrap();
    assert_eq!(first.score_delta, 100);
    game.update(t0 + FEEDBACK_PASSED);

    let second = game.decide(right_action(&game), t0 + FEEDBACK_PASSED).unwrap();
    assert_eq!(second.score_delta, 110);
    game.update(t0 + FEEDBACK_PASSED * 2);

    let third = game.decide(wrong_action(&game), t0 + FEEDBACK_PASSED * 2).unwrap();
    assert!(!third.correct);
    assert_eq!(third.score_delta, -50);

    let snap = game.snapshot();
    assert_eq!(snap.score, 160);
    assert_eq!(snap.streak, 0);
    assert_eq!(snap.max_streak, 2);
    assert_eq!((snap.correct, snap.mistakes), (2, 1));
}

#[test]
fn repeat_input_during_feedback_is_ignored() {
    let (mut game, t0) = inline_game(9);
    let id = game.current_item().unwrap().id.clone();
    assert!(game.decide(Action::Reject, t0).is_some());
    assert!(game.decide(Action::Accept, t0 + Duration::from_millis(500)).is_none());
    game.update(t0 + Duration::from_millis(1100));
    assert_eq!(game.current_item().unwrap().id, id);
    assert_eq!(game.state().correct + game.state().mistakes, 1);
}

#[test]
fn idle_level_fails_and_retry_restores() {
    let (mut game, _) = inline_game(11);
    for _ in 0..60 {
        game.tick();
    }
    assert_eq!(game.phase(), Phase::Summary);
    let summary = game.snapshot().summary.cloned().unwrap();
    assert_eq!(summary.score, 0);
    assert!(!summary.passed);
    assert!(!game.advance());

    assert!(game.retry());
    game.update(Instant::now());
    assert_eq!(game.phase(), Phase::Playing);
    assert_eq!(game.state().level, 1);
    assert_eq!(game.state().time_remaining, 60);
}

#[test]
fn passed_level_advances_with_score() {
    let (mut game, t0) = inline_game(13);
    game.decide(right_action(&game), t0).unwrap();
    game.update(t0 + FEEDBACK_PASSED);
    game.decide(right_action(&game), t0 + FEEDBACK_PASSED).unwrap();
    game.update(t0 + FEEDBACK_PASSED * 2);
    game.decide(wrong_action(&game), t0 + FEEDBACK_PASSED * 2).unwrap();

    for _ in 0..60 {
        game.tick();
    }
    let events = game.drain_events();
    let summaries: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            GameEvent::LevelComplete(s) => Some(s.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(summaries.len(), 1);
    assert!(summaries[0].passed);

    assert!(game.advance());
    game.update(Instant::now());
    assert_eq!(game.state().level, 2);
    assert_eq!(game.state().score, 160);
    assert_eq!(game.state().streak, 0);
}

#[test]
fn background_game_starts_from_local_catalog() {
    let mut game = Game::new(GameRules::default(), local_generator(17), 3);
    wait_for_playing(&mut game, Duration::from_secs(2));
    assert_eq!(game.phase(), Phase::Playing);
    assert!(game.current_item().is_some());
}

#[test]
fn hanging_source_still_starts_within_deadline() {
    let source: Arc<dyn ContentSource> = Arc::new(SlowSource {
        delay: Duration::from_secs(30),
        name: "Never Arrives",
    });
    let generator = Arc::new(BatchGenerator::new(
        SmallRng::seed_from_u64(19),
        Some(source),
        Duration::from_millis(800),
    ));
    let mut game = Game::new(GameRules::default(), generator, 1);
    let waited = wait_for_playing(&mut game, Duration::from_secs(3));
    assert_eq!(game.phase(), Phase::Playing);
    assert!(waited < Duration::from_millis(1500), "took {waited:?}");
    assert_ne!(game.current_item().unwrap().name, "Never Arrives");
}

#[test]
fn batch_from_previous_level_is_dropped() {
    let source: Arc<dyn ContentSource> = Arc::new(SlowSource {
        delay: Duration::from_millis(100),
        name: "Late Tote",
    });
    let generator = Arc::new(BatchGenerator::new(
        SmallRng::seed_from_u64(23),
        Some(source),
        Duration::from_millis(800),
    ));
    let mut queue = ItemQueue::new(generator, &GameRules::default(), RefillMode::Background);
    queue.reset(1);
    assert!(queue.request(5));
    queue.reset(2);
    assert_eq!(queue.fetch_state(), FetchState::Idle);

    thread::sleep(Duration::from_millis(400));
    queue.pump(false);
    assert!(queue.current().is_none());
    assert_eq!(queue.buffered(), 0);

    assert!(queue.request(5));
    let deadline = Instant::now() + Duration::from_secs(2);
    while queue.current().is_none() && Instant::now() < deadline {
        queue.pump(false);
        thread::sleep(Duration::from_millis(5));
    }
    assert!(queue.current().is_some());
    assert_eq!(queue.buffered(), 4);
}
