use std::time::Duration;

/// Tunables for one play session. Built from `Config::rules`.
#[derive(Clone, Debug, PartialEq)]
pub struct GameRules {
    pub level_seconds: u32,
    pub initial_batch: usize,
    pub refill_batch: usize,
    pub low_water: usize,
    pub remote_timeout: Duration,
    pub feedback: Duration,
    pub reveal_display: Duration,
    pub time_bonus_seconds: u32,
    pub reveal_uses: u32,
    pub time_extension_uses: u32,
    pub correct_base: u32,
    pub streak_bonus: u32,
    pub mistake_penalty: u32,
    pub combo_streak: u32,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            level_seconds: 60,
            initial_batch: 8,
            refill_batch: 5,
            low_water: 5,
            remote_timeout: Duration::from_millis(800),
            feedback: Duration::from_millis(1200),
            reveal_display: Duration::from_millis(1000),
            time_bonus_seconds: 15,
            reveal_uses: 3,
            time_extension_uses: 1,
            correct_base: 100,
            streak_bonus: 10,
            mistake_penalty: 50,
            combo_streak: 5,
        }
    }
}
