use std::mem;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::engine::queue::{ItemQueue, RefillMode};
use crate::generator::batch::BatchGenerator;
use crate::model::item::ReturnItem;
use crate::session::decision::{self, Action, Outcome};
use crate::session::powerup::PowerUpKind;
use crate::session::rules::GameRules;
use crate::session::state::{Phase, SessionState};
use crate::session::summary::LevelSummary;

const SECOND: Duration = Duration::from_secs(1);

/// Sound hints for the presentation layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cue {
    Success,
    Failure,
    Combo,
    Timeout,
    PowerUp,
    Scan,
}

#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    LevelStarted { level: u32 },
    Decided(Outcome),
    Cue(Cue),
    LevelComplete(LevelSummary),
}

#[derive(Clone, Debug)]
struct Feedback {
    outcome: Outcome,
    until: Instant,
}

#[derive(Clone, Debug)]
struct Reveal {
    item_id: String,
    is_fraud: bool,
    until: Instant,
}

/// Everything a renderer needs for one frame.
#[derive(Debug)]
pub struct Snapshot<'a> {
    pub phase: Phase,
    pub level: u32,
    pub item: Option<&'a ReturnItem>,
    pub loading: bool,
    pub score: u32,
    pub streak: u32,
    pub max_streak: u32,
    pub time_remaining: u32,
    pub correct: u32,
    pub mistakes: u32,
    pub feedback: Option<&'a Outcome>,
    /// Ground truth of the current item while a reveal is active.
    pub revealed_fraud: Option<bool>,
    pub details_open: bool,
    pub reveal_uses: u32,
    pub time_extension_uses: u32,
    pub summary: Option<&'a LevelSummary>,
    pub can_advance: bool,
}

pub struct Game {
    rules: GameRules,
    state: SessionState,
    queue: ItemQueue,
    feedback: Option<Feedback>,
    reveal: Option<Reveal>,
    details_open: bool,
    starved: bool,
    next_tick_at: Option<Instant>,
    events: Vec<GameEvent>,
}

impl Game {
    pub fn new(rules: GameRules, generator: Arc<BatchGenerator>, level: u32) -> Self {
        Self::with_refill(rules, generator, level, RefillMode::Background)
    }

    pub fn with_refill(
        rules: GameRules,
        generator: Arc<BatchGenerator>,
        level: u32,
        mode: RefillMode,
    ) -> Self {
        let state = SessionState::new(level, &rules);
        let queue = ItemQueue::new(generator, &rules, mode);
        let mut game = Self {
            rules,
            state,
            queue,
            feedback: None,
            reveal: None,
            details_open: false,
            starved: false,
            next_tick_at: None,
            events: Vec::new(),
        };
        game.start_level();
        game
    }

    fn start_level(&mut self) {
        let level = self.state.level;
        self.feedback = None;
        self.reveal = None;
        self.details_open = false;
        self.starved = false;
        self.next_tick_at = None;
        let epoch = self.queue.reset(level);
        self.queue.request(self.rules.initial_batch);
        tracing::info!(level, epoch, score = self.state.score, "level loading");
        self.events.push(GameEvent::LevelStarted { level });
    }

    pub fn rules(&self) -> &GameRules {
        &self.rules
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn queue(&self) -> &ItemQueue {
        &self.queue
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn current_item(&self) -> Option<&ReturnItem> {
        match self.state.phase {
            Phase::Playing => self.queue.current(),
            _ => None,
        }
    }

    pub fn is_showing_outcome(&self) -> bool {
        self.feedback.is_some()
    }

    /// Advance timers and the queue to `now`.
    pub fn update(&mut self, now: Instant) {
        match self.state.phase {
            Phase::Loading => self.update_loading(now),
            Phase::Playing => self.update_playing(now),
            Phase::Summary => {}
        }
    }

    fn update_loading(&mut self, now: Instant) {
        self.queue.pump(false);
        if self.queue.current().is_none() {
            if !self.queue.is_fetching() {
                self.queue.request(self.rules.initial_batch);
            }
            return;
        }
        if self.state.start_playing() {
            self.next_tick_at = Some(now + SECOND);
            tracing::info!(level = self.state.level, buffered = self.queue.buffered(), "level started");
        }
    }

    fn update_playing(&mut self, now: Instant) {
        if self.feedback.as_ref().is_some_and(|f| now >= f.until) {
            self.feedback = None;
            self.details_open = false;
            self.queue.finish_current();
        }
        self.expire_reveal(now);

        self.queue.pump(true);

        if self.queue.is_starving() {
            // Show one loading frame before blocking on the refill.
            if self.starved {
                self.queue.emergency_fill();
                self.starved = false;
                self.queue.pump(true);
            } else {
                self.starved = true;
            }
        } else {
            self.starved = false;
        }

        let reveal_stale = match (&self.reveal, self.queue.current()) {
            (Some(r), Some(item)) => r.item_id != item.id,
            (Some(_), None) => true,
            _ => false,
        };
        if reveal_stale {
            self.reveal = None;
        }

        while let Some(at) = self.next_tick_at {
            if now < at || !self.state.is_playing() {
                break;
            }
            self.next_tick_at = Some(at + SECOND);
            self.tick();
        }
    }

    /// One countdown step. Ends the level when time runs out; no effect
    /// outside `Playing`.
    pub fn tick(&mut self) {
        if let Some(summary) = self.state.tick() {
            self.next_tick_at = None;
            self.feedback = None;
            self.reveal = None;
            self.details_open = false;
            tracing::info!(
                level = summary.level,
                score = summary.score,
                correct = summary.correct,
                mistakes = summary.mistakes,
                passed = summary.passed,
                "level complete"
            );
            self.events.push(GameEvent::Cue(Cue::Timeout));
            self.events.push(GameEvent::LevelComplete(summary));
        }
    }

    /// Judge the current item. `None` when there is nothing to judge or the
    /// previous outcome is still on screen.
    pub fn decide(&mut self, action: Action, now: Instant) -> Option<Outcome> {
        self.expire_reveal(now);
        if !self.can_act() {
            return None;
        }
        let item = self.queue.current()?;
        let outcome = decision::decide(&mut self.state, item, action, &self.rules);

        self.details_open = false;
        self.reveal = None;
        if outcome.correct {
            self.events.push(GameEvent::Cue(Cue::Success));
            if outcome.streak >= self.rules.combo_streak {
                self.events.push(GameEvent::Cue(Cue::Combo));
            }
        } else {
            self.events.push(GameEvent::Cue(Cue::Failure));
        }
        self.events.push(GameEvent::Decided(outcome.clone()));
        self.feedback = Some(Feedback {
            outcome: outcome.clone(),
            until: now + self.rules.feedback,
        });
        Some(outcome)
    }

    /// Nothing is on screen that locks input: no outcome and no x-ray hint.
    fn can_act(&self) -> bool {
        self.state.is_playing() && self.feedback.is_none() && self.reveal.is_none()
    }

    fn expire_reveal(&mut self, now: Instant) {
        if self.reveal.as_ref().is_some_and(|r| now >= r.until) {
            self.reveal = None;
        }
    }

    pub fn use_power_up(&mut self, kind: PowerUpKind, now: Instant) -> bool {
        self.expire_reveal(now);
        if !self.can_act() {
            return false;
        }
        let target = match kind {
            PowerUpKind::Reveal => match self.queue.current() {
                Some(item) => Some((item.id.clone(), item.is_fraud)),
                None => return false,
            },
            PowerUpKind::TimeExtension => None,
        };
        if !self.state.power_ups.consume(kind) {
            return false;
        }

        match (kind, target) {
            (PowerUpKind::Reveal, Some((item_id, is_fraud))) => {
                self.reveal = Some(Reveal {
                    item_id,
                    is_fraud,
                    until: now + self.rules.reveal_display,
                });
            }
            _ => self.state.extend_time(self.rules.time_bonus_seconds),
        }
        tracing::debug!(?kind, left = self.state.power_ups.remaining(kind), "power-up used");
        self.events.push(GameEvent::Cue(Cue::PowerUp));
        true
    }

    /// Open the details panel for the current item. False when it is
    /// already open or input is locked.
    pub fn inspect(&mut self) -> bool {
        if !self.can_act() || self.details_open || self.queue.current().is_none() {
            return false;
        }
        self.details_open = true;
        self.events.push(GameEvent::Cue(Cue::Scan));
        true
    }

    pub fn close_details(&mut self) {
        self.details_open = false;
    }

    pub fn retry(&mut self) -> bool {
        if !self.state.retry(&self.rules) {
            return false;
        }
        self.start_level();
        true
    }

    pub fn advance(&mut self) -> bool {
        if !self.state.advance(&self.rules) {
            return false;
        }
        self.start_level();
        true
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        let state = &self.state;
        Snapshot {
            phase: state.phase,
            level: state.level,
            item: self.current_item(),
            loading: state.phase == Phase::Loading || (state.is_playing() && self.queue.is_starving()),
            score: state.score,
            streak: state.streak,
            max_streak: state.max_streak,
            time_remaining: state.time_remaining,
            correct: state.correct,
            mistakes: state.mistakes,
            feedback: self.feedback.as_ref().map(|f| &f.outcome),
            revealed_fraud: self.reveal.as_ref().map(|r| r.is_fraud),
            details_open: self.details_open,
            reveal_uses: state.power_ups.remaining(PowerUpKind::Reveal),
            time_extension_uses: state.power_ups.remaining(PowerUpKind::TimeExtension),
            summary: state.summary.as_ref(),
            can_advance: state.can_advance(),
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    fn game() -> (Game, Instant) {
        let generator = Arc::new(BatchGenerator::local_only(SmallRng::seed_from_u64(21)));
        let mut game = Game::with_refill(GameRules::default(), generator, 1, RefillMode::Inline);
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

    #[test]
    fn loading_then_playing_with_initial_batch() {
        let (game, _) = game();
        assert!(game.current_item().is_some());
        assert_eq!(game.queue().buffered(), 7);
        assert_eq!(game.state().time_remaining, 60);
    }

    #[test]
    fn double_decision_scores_once() {
        let (mut game, t0) = game();
        let action = right_action(&game);
        assert!(game.decide(action, t0).is_some());
        assert!(game.decide(action, t0 + Duration::from_millis(100)).is_none());
        assert_eq!(game.state().score, 100);
        assert_eq!(game.state().correct, 1);
    }

    #[test]
    fn next_item_after_feedback_interval() {
        let (mut game, t0) = game();
        let first = game.current_item().unwrap().id.clone();
        game.decide(Action::Accept, t0);

        game.update(t0 + Duration::from_millis(600));
        assert_eq!(game.current_item().unwrap().id, first);
        assert!(game.snapshot().feedback.is_some());

        game.update(t0 + Duration::from_millis(1200));
        assert_ne!(game.current_item().unwrap().id, first);
        assert!(game.snapshot().feedback.is_none());
    }

    #[test]
    fn timer_ends_level_once() {
        let (mut game, t0) = game();
        game.update(t0 + Duration::from_secs(59));
        assert_eq!(game.state().time_remaining, 1);
        game.update(t0 + Duration::from_secs(75));
        assert_eq!(game.phase(), Phase::Summary);
        game.tick();
        game.tick();
        let completes = game
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::LevelComplete(_)))
            .count();
        assert_eq!(completes, 1);
        assert!(game.current_item().is_none());
    }

    #[test]
    fn reveal_rules() {
        let (mut game, t0) = game();
        let truth = game.current_item().unwrap().is_fraud;
        assert!(game.use_power_up(PowerUpKind::Reveal, t0));
        assert_eq!(game.snapshot().revealed_fraud, Some(truth));
        assert_eq!(game.snapshot().reveal_uses, 2);
        assert_eq!(game.phase(), Phase::Playing);

        game.update(t0 + Duration::from_millis(1000));
        assert_eq!(game.snapshot().revealed_fraud, None);

        game.decide(Action::Accept, t0 + Duration::from_millis(1100));
        assert!(!game.use_power_up(PowerUpKind::Reveal, t0 + Duration::from_millis(1200)));
        assert_eq!(game.snapshot().reveal_uses, 2);
    }

    #[test]
    fn reveal_locks_input_until_it_fades() {
        let (mut game, t0) = game();
        let display = game.rules().reveal_display;
        assert!(game.use_power_up(PowerUpKind::Reveal, t0));

        assert!(!game.use_power_up(PowerUpKind::Reveal, t0));
        assert!(!game.use_power_up(PowerUpKind::TimeExtension, t0));
        assert!(!game.inspect());
        assert!(game.decide(Action::Accept, t0 + display / 2).is_none());
        assert_eq!(game.snapshot().reveal_uses, 2);
        assert_eq!(game.state().correct + game.state().mistakes, 0);

        assert!(game.use_power_up(PowerUpKind::Reveal, t0 + display));
        assert_eq!(game.snapshot().reveal_uses, 1);
        assert!(game.decide(Action::Accept, t0 + display * 2).is_some());
    }

    #[test]
    fn reveal_runs_out() {
        let (mut game, t0) = game();
        let display = game.rules().reveal_display;
        let mut now = t0;
        for _ in 0..3 {
            assert!(game.use_power_up(PowerUpKind::Reveal, now));
            now += display;
        }
        assert!(!game.use_power_up(PowerUpKind::Reveal, now));
        assert_eq!(game.snapshot().reveal_uses, 0);
    }

    #[test]
    fn time_extension_once() {
        let (mut game, t0) = game();
        assert!(game.use_power_up(PowerUpKind::TimeExtension, t0));
        assert_eq!(game.state().time_remaining, 75);
        assert!(!game.use_power_up(PowerUpKind::TimeExtension, t0));
        assert_eq!(game.state().time_remaining, 75);
    }

    #[test]
    fn power_ups_blocked_in_summary() {
        let (mut game, t0) = game();
        game.update(t0 + Duration::from_secs(61));
        assert_eq!(game.phase(), Phase::Summary);
        assert!(!game.use_power_up(PowerUpKind::TimeExtension, t0));
        assert!(!game.inspect());
        assert!(game.decide(Action::Accept, t0).is_none());
    }

    #[test]
    fn inspect_opens_details_until_decision() {
        let (mut game, t0) = game();
        assert!(game.inspect());
        assert!(game.snapshot().details_open);
        assert!(!game.inspect());
        game.close_details();
        assert!(game.inspect());
        game.decide(Action::Reject, t0);
        assert!(!game.snapshot().details_open);
        assert!(!game.inspect());
    }

    #[test]
    fn cues_follow_outcomes() {
        let (mut game, t0) = game();
        game.drain_events();
        let mut now = t0;
        for _ in 0..5 {
            let action = right_action(&game);
            game.decide(action, now);
            now += Duration::from_millis(1200);
            game.update(now);
        }
        let events = game.drain_events();
        let successes = events.iter().filter(|e| **e == GameEvent::Cue(Cue::Success)).count();
        let combos = events.iter().filter(|e| **e == GameEvent::Cue(Cue::Combo)).count();
        assert_eq!(successes, 5);
        assert_eq!(combos, 1);

        let action = wrong_action(&game);
        game.decide(action, now);
        assert!(game.drain_events().contains(&GameEvent::Cue(Cue::Failure)));
    }

    #[test]
    fn retry_after_failed_level() {
        let (mut game, t0) = game();
        let action = wrong_action(&game);
        game.decide(action, t0);
        game.update(t0 + Duration::from_secs(61));
        assert!(!game.snapshot().can_advance);
        assert!(!game.advance());
        assert!(game.retry());
        assert_eq!(game.phase(), Phase::Loading);
        assert_eq!(game.state().score, 0);
        assert_eq!(game.state().mistakes, 0);

        game.update(t0 + Duration::from_secs(62));
        assert_eq!(game.phase(), Phase::Playing);
        assert_eq!(game.state().level, 1);
    }

    #[test]
    fn advance_after_passed_level() {
        let (mut game, t0) = game();
        let action = right_action(&game);
        game.decide(action, t0);
        game.update(t0 + Duration::from_secs(61));
        assert!(game.snapshot().can_advance);
        assert!(game.advance());
        assert_eq!(game.state().level, 2);
        assert_eq!(game.state().score, 100);
        assert_eq!(game.state().score_snapshot, 100);
    }
}
