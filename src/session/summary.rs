use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const HIGH_SCORE: u32 = 500;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelSummary {
    pub level: u32,
    pub score: u32,
    pub correct: u32,
    pub mistakes: u32,
    pub max_streak: u32,
    pub passed: bool,
    pub high_score: bool,
    pub finished_at: DateTime<Utc>,
}

impl LevelSummary {
    pub fn new(level: u32, score: u32, correct: u32, mistakes: u32, max_streak: u32) -> Self {
        Self {
            level,
            score,
            correct,
            mistakes,
            max_streak,
            passed: passes(score, correct, mistakes),
            high_score: score > HIGH_SCORE,
            finished_at: Utc::now(),
        }
    }

    pub fn judged(&self) -> u32 {
        self.correct + self.mistakes
    }

    pub fn accuracy(&self) -> f64 {
        let judged = self.judged();
        if judged == 0 {
            return 0.0;
        }
        self.correct as f64 / judged as f64 * 100.0
    }
}

/// A level is cleared with a positive score and no more mistakes than hits.
pub fn passes(score: u32, correct: u32, mistakes: u32) -> bool {
    score > 0 && correct >= mistakes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strong_round_passes() {
        let s = LevelSummary::new(1, 300, 5, 2, 4);
        assert!(s.passed);
        assert!(!s.high_score);
    }

    #[test]
    fn weak_round_fails() {
        assert!(!LevelSummary::new(1, 50, 1, 3, 1).passed);
    }

    #[test]
    fn zero_score_fails_even_when_even() {
        assert!(!passes(0, 0, 0));
        assert!(passes(10, 2, 2));
    }

    #[test]
    fn high_score_threshold() {
        assert!(!LevelSummary::new(2, 500, 5, 0, 5).high_score);
        assert!(LevelSummary::new(2, 501, 5, 0, 5).high_score);
    }

    #[test]
    fn accuracy_handles_empty_round() {
        assert_eq!(LevelSummary::new(1, 0, 0, 0, 0).accuracy(), 0.0);
        assert!((LevelSummary::new(1, 100, 3, 1, 3).accuracy() - 75.0).abs() < 1e-9);
    }
}
