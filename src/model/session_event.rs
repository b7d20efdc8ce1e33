use super::{Round, RoundOutcome, SessionResult, TimerState};

/// Inputs a host feeds into a running session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// The player changed the answer field without submitting.
    UpdateDraft(String),
    SubmitAnswer(String),
    /// One second of wall-clock time passed.
    Tick,
}

/// What a running session reports back to its host.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    RoundStarted {
        round_index: usize,
        round: Round,
        timer_state: TimerState,
    },
    TimerStateChanged(TimerState),
    RoundResolved(RoundOutcome),
    SessionCompleted(SessionResult),
}
