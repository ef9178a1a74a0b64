//! Fallback state machine for query answering.
//!
//! ```text
//! start ──no backend / no tiers──▶ RuleBased ──▶ Done
//!   │
//!   └──▶ TryBackend(0) ──success──▶ Done
//!            │ rate limited / error
//!            ▼
//!        TryBackend(1) ... TryBackend(n-1) ──failure──▶ RuleBased
//! ```
//!
//! Transitions are pure so the fallback order and termination can be tested
//! without a network.

/// Where the answerer is in the fallback sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerState {
    /// Attempt the tier at this index.
    TryBackend(usize),
    /// Answer with the deterministic rule engine.
    RuleBased,
    /// An answer has been produced.
    Done,
}

/// How one remote attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// The backend returned an answer.
    Success,
    /// The backend reported the rate-limited status.
    RateLimited,
    /// Any other status, transport failure, timeout or bad payload.
    Failed,
}

/// Initial state for a query.
pub fn initial_state(has_backend: bool, tier_count: usize) -> AnswerState {
    if has_backend && tier_count > 0 {
        AnswerState::TryBackend(0)
    } else {
        AnswerState::RuleBased
    }
}

/// Next state after `state` given the outcome of the attempt made there.
///
/// `outcome` is ignored outside `TryBackend`. `RuleBased` always finishes.
pub fn next_state(
    state: AnswerState,
    tier_count: usize,
    outcome: Option<AttemptOutcome>,
) -> AnswerState {
    match state {
        AnswerState::TryBackend(index) => match outcome {
            Some(AttemptOutcome::Success) => AnswerState::Done,
            Some(AttemptOutcome::RateLimited | AttemptOutcome::Failed) | None => {
                match index.checked_add(1) {
                    Some(next) if next < tier_count => AnswerState::TryBackend(next),
                    _ => AnswerState::RuleBased,
                }
            }
        },
        AnswerState::RuleBased | AnswerState::Done => AnswerState::Done,
    }
}
