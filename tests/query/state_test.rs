//! Fallback state machine transitions.

use smartsense::query::state::{initial_state, next_state, AnswerState, AttemptOutcome};

#[test]
fn no_backend_starts_rule_based() {
    assert_eq!(initial_state(false, 3), AnswerState::RuleBased);
    assert_eq!(initial_state(true, 0), AnswerState::RuleBased);
    assert_eq!(initial_state(true, 3), AnswerState::TryBackend(0));
}

#[test]
fn success_finishes_immediately() {
    assert_eq!(
        next_state(AnswerState::TryBackend(1), 3, Some(AttemptOutcome::Success)),
        AnswerState::Done
    );
}

#[test]
fn rate_limit_and_failure_advance_one_tier() {
    assert_eq!(
        next_state(AnswerState::TryBackend(0), 3, Some(AttemptOutcome::RateLimited)),
        AnswerState::TryBackend(1)
    );
    assert_eq!(
        next_state(AnswerState::TryBackend(1), 3, Some(AttemptOutcome::Failed)),
        AnswerState::TryBackend(2)
    );
}

#[test]
fn last_tier_failure_falls_back_to_rules() {
    assert_eq!(
        next_state(AnswerState::TryBackend(2), 3, Some(AttemptOutcome::RateLimited)),
        AnswerState::RuleBased
    );
}

#[test]
fn terminal_states_finish() {
    assert_eq!(next_state(AnswerState::RuleBased, 3, None), AnswerState::Done);
    assert_eq!(next_state(AnswerState::Done, 3, None), AnswerState::Done);
}

#[test]
fn every_walk_visits_each_tier_at_most_once() {
    for tier_count in 0..5_usize {
        let mut state = initial_state(true, tier_count);
        let mut visited = Vec::new();
        while let AnswerState::TryBackend(index) = state {
            assert!(!visited.contains(&index));
            visited.push(index);
            state = next_state(state, tier_count, Some(AttemptOutcome::Failed));
        }
        assert_eq!(state, AnswerState::RuleBased);
        assert_eq!(visited.len(), tier_count);
    }
}
