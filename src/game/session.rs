use log::{info, trace};
use uuid::Uuid;

use super::evaluator::evaluate;
use super::round_generator::RoundGenerator;
use crate::error::GameError;
use crate::events::EventEmitter;
use crate::model::{
    Currency, GameMode, Round, RoundKind, RoundOutcome, SessionCommand, SessionConfig,
    SessionEvent, SessionResult, TimerState, ROUNDS_PER_SESSION,
};

/// Ticks the result of a round stays on screen before the next one starts.
pub const RESULT_PAUSE_TICKS: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    AwaitingAnswer,
    Resolved { is_correct: bool, pause_left: u32 },
    Complete,
}

/// One game of ten rounds. Driven entirely by `submit_answer` and `on_tick`;
/// the host decides how a tick maps to wall-clock time.
pub struct Session {
    id: Uuid,
    config: SessionConfig,
    generator: RoundGenerator,
    round_index: usize,
    current_round: Round,
    timer_state: TimerState,
    draft_answer: String,
    phase: SessionPhase,
    outcomes: Vec<RoundOutcome>,
    result: Option<SessionResult>,
    event_emitter: EventEmitter<SessionEvent>,
}

fn validate_config(config: &SessionConfig) -> Result<(), GameError> {
    if config.timer_duration.as_secs() == 0 {
        return Err(GameError::InvalidInput(
            "timer duration must be at least one second".to_string(),
        ));
    }
    match (config.mode, config.target_currency) {
        (GameMode::CurrencyConvert, None) => Err(GameError::InvalidInput(
            "currency convert sessions need a target currency".to_string(),
        )),
        (GameMode::CurrencyConvert | GameMode::MixedMode, Some(target))
            if target == config.currency =>
        {
            Err(GameError::InvalidInput(format!(
                "target currency must differ from {}",
                config.currency
            )))
        }
        _ => Ok(()),
    }
}

impl Session {
    pub fn start(
        config: SessionConfig,
        seed: Option<u64>,
        event_emitter: EventEmitter<SessionEvent>,
    ) -> Result<Session, GameError> {
        validate_config(&config)?;
        let mut generator = RoundGenerator::new(seed);
        let first_round = Self::next_round(&mut generator, &config)?;
        let id = Uuid::new_v4();
        info!(
            target: "session",
            "Starting session {}: {} / {} / {}; seed: {}",
            id,
            config.mode,
            config.currency,
            config.level,
            generator.seed()
        );

        let session = Self {
            id,
            timer_state: TimerState::new(config.timer_duration),
            config,
            generator,
            round_index: 0,
            current_round: first_round,
            draft_answer: String::new(),
            phase: SessionPhase::AwaitingAnswer,
            outcomes: Vec::with_capacity(ROUNDS_PER_SESSION),
            result: None,
            event_emitter,
        };
        session.emit_round_started();
        Ok(session)
    }

    /// Generates the round for the next `AwaitingAnswer` state. Mixed mode
    /// picks a kind per round, and a target currency when none is configured.
    fn next_round(generator: &mut RoundGenerator, config: &SessionConfig) -> Result<Round, GameError> {
        let kind = match config.mode.round_kind() {
            Some(kind) => kind,
            None => generator.pick_round_kind(),
        };
        let target_currency = match (kind, config.target_currency) {
            (RoundKind::CurrencyConvert, None) => Some(generator.pick_target_currency(config.currency)),
            (_, target) => target,
        };
        generator.generate(kind, config.currency, target_currency, config.level)
    }

    pub fn handle_command(&mut self, command: SessionCommand) -> Result<(), GameError> {
        trace!(target: "session", "Handling command: {:?}", command);
        match command {
            SessionCommand::UpdateDraft(text) => self.update_draft(&text),
            SessionCommand::SubmitAnswer(text) => {
                self.submit_answer(&text);
            }
            SessionCommand::Tick => self.on_tick()?,
        }
        Ok(())
    }

    /// Remembers what the player has typed so far; evaluated if time runs out.
    pub fn update_draft(&mut self, text: &str) {
        if self.phase == SessionPhase::AwaitingAnswer {
            self.draft_answer = text.to_string();
        }
    }

    /// Resolves the current round early. Ignored outside `AwaitingAnswer`.
    pub fn submit_answer(&mut self, text: &str) -> Option<RoundOutcome> {
        if self.phase != SessionPhase::AwaitingAnswer {
            trace!(target: "session", "Ignoring submission in phase {:?}", self.phase);
            return None;
        }
        Some(self.resolve(text.to_string()))
    }

    /// Advances time by one tick: counts down the answer timer (auto-submitting
    /// the draft at zero) or the pause between rounds.
    pub fn on_tick(&mut self) -> Result<(), GameError> {
        match self.phase {
            SessionPhase::AwaitingAnswer => {
                self.timer_state = self.timer_state.ticked();
                self.event_emitter
                    .emit(SessionEvent::TimerStateChanged(self.timer_state.clone()));
                if self.timer_state.is_expired() {
                    let draft = std::mem::take(&mut self.draft_answer);
                    trace!(target: "session", "Time is up; auto-submitting {:?}", draft);
                    self.resolve(draft);
                }
            }
            SessionPhase::Resolved {
                is_correct,
                pause_left,
            } => {
                if pause_left > 1 {
                    self.phase = SessionPhase::Resolved {
                        is_correct,
                        pause_left: pause_left - 1,
                    };
                } else {
                    self.advance()?;
                }
            }
            SessionPhase::Complete => (),
        }
        Ok(())
    }

    fn resolve(&mut self, submitted_answer: String) -> RoundOutcome {
        let evaluation = evaluate(&self.current_round, &submitted_answer);
        let outcome = RoundOutcome {
            round_index: self.round_index,
            round_kind: self.current_round.kind(),
            submitted_answer,
            expected_answer: evaluation.expected_answer,
            is_correct: evaluation.is_correct,
            time_spent: self.timer_state.elapsed(),
        };
        trace!(target: "session", "Round {} resolved: {:?}", self.round_index + 1, outcome);
        self.outcomes.push(outcome.clone());
        self.draft_answer.clear();
        self.event_emitter
            .emit(SessionEvent::RoundResolved(outcome.clone()));

        if self.outcomes.len() >= ROUNDS_PER_SESSION {
            self.complete();
        } else {
            self.phase = SessionPhase::Resolved {
                is_correct: outcome.is_correct,
                pause_left: RESULT_PAUSE_TICKS,
            };
        }
        outcome
    }

    fn advance(&mut self) -> Result<(), GameError> {
        self.current_round = Self::next_round(&mut self.generator, &self.config)?;
        self.round_index += 1;
        self.timer_state = self.timer_state.restarted();
        self.draft_answer.clear();
        self.phase = SessionPhase::AwaitingAnswer;
        self.emit_round_started();
        Ok(())
    }

    fn complete(&mut self) {
        let result = SessionResult::from_outcomes(self.id, &self.config, self.outcomes.clone());
        info!(
            target: "session",
            "Session {} complete: {}/{} correct, {:.1}s average",
            self.id,
            result.correct_rounds,
            result.total_rounds,
            result.average_time
        );
        self.phase = SessionPhase::Complete;
        self.result = Some(result.clone());
        self.event_emitter
            .emit(SessionEvent::SessionCompleted(result));
    }

    fn emit_round_started(&self) {
        self.event_emitter.emit(SessionEvent::RoundStarted {
            round_index: self.round_index,
            round: self.current_round.clone(),
            timer_state: self.timer_state.clone(),
        });
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.generator.seed()
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_complete(&self) -> bool {
        self.phase == SessionPhase::Complete
    }

    /// Zero-based index of the round on screen.
    pub fn round_index(&self) -> usize {
        self.round_index
    }

    pub fn current_round(&self) -> &Round {
        &self.current_round
    }

    pub fn timer_state(&self) -> &TimerState {
        &self.timer_state
    }

    pub fn draft_answer(&self) -> &str {
        &self.draft_answer
    }

    pub fn outcomes(&self) -> &[RoundOutcome] {
        &self.outcomes
    }

    pub fn result(&self) -> Option<&SessionResult> {
        self.result.as_ref()
    }

    pub fn currency(&self) -> Currency {
        self.config.currency
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Channel;
    use crate::model::{Level, Money};
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    fn start(config: SessionConfig) -> (Session, Rc<RefCell<Vec<SessionEvent>>>) {
        let (emitter, observer) = Channel::<SessionEvent>::new();
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        observer.subscribe(move |event: &SessionEvent| sink.borrow_mut().push(event.clone()));
        let session = Session::start(config, Some(99), emitter).unwrap();
        (session, events)
    }

    fn config(mode: GameMode, secs: u64) -> SessionConfig {
        SessionConfig::new(mode, Currency::Usd, Level::Easy, Duration::from_secs(secs))
    }

    fn tick(session: &mut Session, times: usize) {
        for _ in 0..times {
            session.on_tick().unwrap();
        }
    }

    #[test]
    fn test_convert_session_requires_distinct_target() {
        let (emitter, _observer) = Channel::<SessionEvent>::new();
        let result = Session::start(config(GameMode::CurrencyConvert, 10), None, emitter.clone());
        assert!(matches!(result, Err(GameError::InvalidInput(_))));

        let same = config(GameMode::CurrencyConvert, 10).with_target_currency(Currency::Usd);
        assert!(matches!(
            Session::start(same, None, emitter.clone()),
            Err(GameError::InvalidInput(_))
        ));

        let zero_timer = config(GameMode::TotalCount, 0);
        assert!(matches!(
            Session::start(zero_timer, None, emitter),
            Err(GameError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_timeout_auto_submits_draft() {
        let (mut session, _) = start(config(GameMode::TotalCount, 5));
        let answer = session.current_round().expected_answer().to_string();
        session.update_draft(&answer);
        tick(&mut session, 5);

        assert_eq!(session.outcomes().len(), 1);
        let outcome = &session.outcomes()[0];
        assert!(outcome.is_correct);
        assert_eq!(outcome.submitted_answer, answer);
        assert_eq!(outcome.time_spent, Duration::from_secs(5));
        assert_eq!(
            session.phase(),
            SessionPhase::Resolved {
                is_correct: true,
                pause_left: RESULT_PAUSE_TICKS
            }
        );
    }

    #[test]
    fn test_early_submission_records_time_spent() {
        let (mut session, _) = start(config(GameMode::GiveChange, 10));
        tick(&mut session, 3);
        let expected = session.current_round().expected_answer();
        let outcome = session.submit_answer(&expected.to_string()).unwrap();

        assert!(outcome.is_correct);
        assert_eq!(outcome.expected_answer, expected);
        assert_eq!(outcome.time_spent, Duration::from_secs(3));
        assert_eq!(outcome.round_kind, RoundKind::GiveChange);
        // a second submission while the result is shown does nothing
        assert!(session.submit_answer("1").is_none());
        assert_eq!(session.outcomes().len(), 1);
    }

    #[test]
    fn test_pause_then_next_round_with_fresh_timer() {
        let (mut session, events) = start(config(GameMode::TotalCount, 10));
        tick(&mut session, 4);
        session.submit_answer("nope");
        assert_eq!(session.round_index(), 0);

        tick(&mut session, 1);
        assert!(matches!(session.phase(), SessionPhase::Resolved { pause_left: 1, .. }));
        tick(&mut session, 1);
        assert_eq!(session.phase(), SessionPhase::AwaitingAnswer);
        assert_eq!(session.round_index(), 1);
        assert_eq!(session.timer_state().time_left, Duration::from_secs(10));
        assert_eq!(session.draft_answer(), "");

        let started = events
            .borrow()
            .iter()
            .filter(|e| matches!(e, SessionEvent::RoundStarted { .. }))
            .count();
        assert_eq!(started, 2);
    }

    #[test]
    fn test_ten_rounds_then_complete() {
        let (mut session, events) = start(config(GameMode::TotalCount, 5));
        for round in 0..ROUNDS_PER_SESSION {
            assert_eq!(session.round_index(), round);
            let expected = session.current_round().expected_answer();
            let answer = if round % 2 == 0 {
                expected.to_string()
            } else {
                (expected + Money::from_units(1)).to_string()
            };
            tick(&mut session, 1);
            session.submit_answer(&answer);
            tick(&mut session, RESULT_PAUSE_TICKS as usize);
        }

        assert!(session.is_complete());
        let result = session.result().unwrap();
        assert_eq!(result.total_rounds, 10);
        assert_eq!(result.correct_rounds, 5);
        assert_eq!(result.accuracy, 0.5);
        assert_eq!(result.average_time, 1.0);
        assert_eq!(result.session_id, session.id());

        // terminal: more input changes nothing
        tick(&mut session, 20);
        assert!(session.submit_answer("1").is_none());
        assert_eq!(session.outcomes().len(), 10);

        let completed = events
            .borrow()
            .iter()
            .filter(|e| matches!(e, SessionEvent::SessionCompleted(_)))
            .count();
        assert_eq!(completed, 1);
    }

    #[test]
    fn test_mixed_mode_varies_round_kind() {
        let (mut session, _) = start(config(GameMode::MixedMode, 5));
        let mut kinds = Vec::new();
        while !session.is_complete() {
            kinds.push(session.current_round().kind());
            if let Round::CurrencyConvert(round) = session.current_round() {
                assert_eq!(round.source_currency, Currency::Usd);
                assert_ne!(round.target_currency, Currency::Usd);
            }
            session.submit_answer("0");
            tick(&mut session, RESULT_PAUSE_TICKS as usize);
        }
        assert_eq!(kinds.len(), 10);
        kinds.sort();
        kinds.dedup();
        assert!(kinds.len() > 1, "seed 99 produced only {:?}", kinds);
    }

    #[test]
    fn test_fixed_mode_keeps_kind() {
        let config = config(GameMode::CurrencyConvert, 5).with_target_currency(Currency::Eur);
        let (mut session, _) = start(config);
        while !session.is_complete() {
            assert_eq!(session.current_round().kind(), RoundKind::CurrencyConvert);
            session.submit_answer("");
            tick(&mut session, RESULT_PAUSE_TICKS as usize);
        }
        assert_eq!(session.result().unwrap().correct_rounds, 0);
    }

    #[test]
    fn test_handle_command() {
        let (mut session, _) = start(config(GameMode::TotalCount, 2));
        let answer = session.current_round().expected_answer().to_string();
        session
            .handle_command(SessionCommand::UpdateDraft(answer))
            .unwrap();
        session.handle_command(SessionCommand::Tick).unwrap();
        session.handle_command(SessionCommand::Tick).unwrap();
        assert_eq!(session.outcomes().len(), 1);
        assert!(session.outcomes()[0].is_correct);
        assert_eq!(session.outcomes()[0].time_spent, Duration::from_secs(2));
    }
}
