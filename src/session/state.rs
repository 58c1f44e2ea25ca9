use crate::session::powerup::PowerUpInventory;
use crate::session::rules::GameRules;
use crate::session::summary::LevelSummary;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the first item of the level.
    Loading,
    Playing,
    Summary,
}

#[derive(Clone, Debug)]
pub struct SessionState {
    pub level: u32,
    pub score: u32,
    pub streak: u32,
    pub max_streak: u32,
    pub correct: u32,
    pub mistakes: u32,
    pub time_remaining: u32,
    pub score_snapshot: u32,
    pub phase: Phase,
    pub power_ups: PowerUpInventory,
    pub summary: Option<LevelSummary>,
}

impl SessionState {
    pub fn new(level: u32, rules: &GameRules) -> Self {
        let mut state = Self {
            level: level.max(1),
            score: 0,
            streak: 0,
            max_streak: 0,
            correct: 0,
            mistakes: 0,
            time_remaining: rules.level_seconds,
            score_snapshot: 0,
            phase: Phase::Loading,
            power_ups: PowerUpInventory::new(rules),
            summary: None,
        };
        state.begin_level(state.level, rules);
        state
    }

    /// Reset per-level counters and enter `Loading`. The current score
    /// carries over and becomes the retry snapshot.
    pub fn begin_level(&mut self, level: u32, rules: &GameRules) {
        self.level = level;
        self.score_snapshot = self.score;
        self.streak = 0;
        self.max_streak = 0;
        self.correct = 0;
        self.mistakes = 0;
        self.time_remaining = rules.level_seconds;
        self.summary = None;
        self.phase = Phase::Loading;
    }

    pub fn start_playing(&mut self) -> bool {
        if self.phase != Phase::Loading {
            return false;
        }
        self.phase = Phase::Playing;
        true
    }

    pub fn is_playing(&self) -> bool {
        self.phase == Phase::Playing
    }

    /// One second of countdown. Returns the summary on the tick that ends
    /// the level; ticks outside `Playing` do nothing.
    pub fn tick(&mut self) -> Option<LevelSummary> {
        if self.phase != Phase::Playing {
            return None;
        }
        self.time_remaining = self.time_remaining.saturating_sub(1);
        if self.time_remaining > 0 {
            return None;
        }
        Some(self.finish_level())
    }

    fn finish_level(&mut self) -> LevelSummary {
        let summary = LevelSummary::new(
            self.level,
            self.score,
            self.correct,
            self.mistakes,
            self.max_streak,
        );
        self.phase = Phase::Summary;
        self.summary = Some(summary.clone());
        summary
    }

    pub fn extend_time(&mut self, seconds: u32) {
        self.time_remaining = self.time_remaining.saturating_add(seconds);
    }

    pub fn can_advance(&self) -> bool {
        self.phase == Phase::Summary && self.summary.as_ref().is_some_and(|s| s.passed)
    }

    /// Replay the same level from its starting score.
    pub fn retry(&mut self, rules: &GameRules) -> bool {
        if self.phase != Phase::Summary {
            return false;
        }
        self.score = self.score_snapshot;
        self.begin_level(self.level, rules);
        true
    }

    /// Move on to the next level, keeping the score.
    pub fn advance(&mut self, rules: &GameRules) -> bool {
        if !self.can_advance() {
            return false;
        }
        self.begin_level(self.level + 1, rules);
        true
    }
}
