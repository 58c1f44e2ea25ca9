use crate::model::item::ReturnItem;
use crate::session::rules::GameRules;
use crate::session::state::SessionState;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Accept,
    Reject,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Outcome {
    pub item_id: String,
    pub action: Action,
    pub correct: bool,
    pub was_fraud: bool,
    pub score_delta: i64,
    pub streak: u32,
    pub explanation: String,
}

pub fn is_correct(item: &ReturnItem, action: Action) -> bool {
    let claims_defect = action == Action::Reject;
    claims_defect == item.is_fraud
}

/// Score one judgement and update the session counters.
pub fn decide(
    state: &mut SessionState,
    item: &ReturnItem,
    action: Action,
    rules: &GameRules,
) -> Outcome {
    let correct = is_correct(item, action);
    let before = state.score;

    if correct {
        let gain = rules.correct_base + state.streak * rules.streak_bonus;
        state.score = state.score.saturating_add(gain);
        state.streak += 1;
        state.max_streak = state.max_streak.max(state.streak);
        state.correct += 1;
    } else {
        state.score = state.score.saturating_sub(rules.mistake_penalty);
        state.streak = 0;
        state.mistakes += 1;
    }

    Outcome {
        item_id: item.id.clone(),
        action,
        correct,
        was_fraud: item.is_fraud,
        score_delta: state.score as i64 - before as i64,
        streak: state.streak,
        explanation: item.explanation.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::item::VisualDefect;
    use crate::model::item::tests::item;

    fn setup() -> (SessionState, GameRules) {
        let rules = GameRules::default();
        let mut state = SessionState::new(1, &rules);
        state.start_playing();
        (state, rules)
    }

    #[test]
    fn reject_fraud_then_accept_fraud() {
        let (mut state, rules) = setup();
        let fraud = item(&[VisualDefect::Stain], true);

        let first = decide(&mut state, &fraud, Action::Reject, &rules);
        assert!(first.correct);
        assert_eq!(first.score_delta, 100);
        assert_eq!(state.score, 100);
        assert_eq!(state.streak, 1);
        assert_eq!(state.correct, 1);

        let second = decide(&mut state, &fraud, Action::Accept, &rules);
        assert!(!second.correct);
        assert_eq!(second.score_delta, -50);
        assert_eq!(state.score, 50);
        assert_eq!(state.streak, 0);
        assert_eq!(state.mistakes, 1);
        assert_eq!(state.max_streak, 1);
    }

    #[test]
    fn streak_bonus_grows() {
        let (mut state, rules) = setup();
        let clean = item(&[VisualDefect::None], false);
        for _ in 0..3 {
            decide(&mut state, &clean, Action::Accept, &rules);
        }
        // 100 + 110 + 120
        assert_eq!(state.score, 330);
        assert_eq!(state.max_streak, 3);
    }

    #[test]
    fn score_never_negative() {
        let (mut state, rules) = setup();
        let clean = item(&[VisualDefect::None], false);
        state.score = 30;
        let out = decide(&mut state, &clean, Action::Reject, &rules);
        assert_eq!(state.score, 0);
        assert_eq!(out.score_delta, -30);
        decide(&mut state, &clean, Action::Reject, &rules);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn outcome_carries_explanation() {
        let (mut state, rules) = setup();
        let clean = item(&[VisualDefect::None], false);
        let out = decide(&mut state, &clean, Action::Accept, &rules);
        assert_eq!(out.explanation, clean.explanation);
        assert_eq!(out.item_id, clean.id);
        assert!(!out.was_fraud);
    }
}
