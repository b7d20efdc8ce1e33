use log::{info, warn};
use std::cell::RefCell;
use std::io::{self, BufRead, Write};
use std::rc::Rc;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Instant;

use money_counter::error::GameError;
use money_counter::events::EventHandler;
use money_counter::game::settings::TIMER_OPTIONS;
use money_counter::game::{GameEngine, JsonFileStore, MemoryStore, Settings, StatsStore};
use money_counter::model::{Currency, GameMode, Level, Round, SessionEvent, SessionResult, TICK};

#[derive(Debug, thiserror::Error)]
enum PlayError {
    #[error("Could not start a session: {0}")]
    Start(#[source] GameError),
    #[error("Session stopped during round {round}: {source}")]
    Interrupted { round: usize, source: GameError },
}

/// Prints session events to stdout.
struct TerminalView {
    debug_mode: bool,
    /// Currency of the round on screen, for formatting its answer.
    answer_currency: Currency,
}

impl TerminalView {
    fn describe_round(&self, round: &Round) {
        match round {
            Round::TotalCount(round) => {
                let pile = round
                    .items
                    .iter()
                    .map(|d| d.to_string())
                    .collect::<Vec<_>>()
                    .join(" + ");
                println!("Count the money: {}", pile);
            }
            Round::GiveChange(round) => {
                println!(
                    "The price is {}. The customer pays {}. How much change?",
                    round.price.format(round.currency),
                    round.given_amount.format(round.currency)
                );
            }
            Round::CurrencyConvert(round) => {
                println!(
                    "Convert {} to {} (rate {}).",
                    round.source_amount.format(round.source_currency),
                    round.target_currency,
                    round.conversion_rate
                );
            }
        }
        if self.debug_mode {
            println!(
                "  [debug] expected {}",
                round.expected_answer().format(round.answer_currency())
            );
        }
    }

    fn describe_result(&self, result: &SessionResult) {
        println!();
        println!(
            "Session complete: {}/{} correct ({:.0}%), {:.1}s per round",
            result.correct_rounds,
            result.total_rounds,
            result.accuracy * 100.0,
            result.average_time
        );
        for outcome in &result.rounds {
            println!(
                "  {:>2}. {:<16} {:>10} expected {:>10}  {}  {}s",
                outcome.round_index + 1,
                outcome.round_kind.to_string(),
                if outcome.submitted_answer.is_empty() {
                    "-"
                } else {
                    outcome.submitted_answer.as_str()
                },
                outcome.expected_answer.to_string(),
                if outcome.is_correct { "ok" } else { "x" },
                outcome.time_spent.as_secs()
            );
        }
    }
}

impl EventHandler<SessionEvent> for TerminalView {
    fn handle_event(&mut self, event: &SessionEvent) {
        match event {
            SessionEvent::RoundStarted {
                round_index,
                round,
                timer_state,
            } => {
                println!();
                println!(
                    "Round {} ({}s)",
                    round_index + 1,
                    timer_state.duration.as_secs()
                );
                self.answer_currency = round.answer_currency();
                self.describe_round(round);
                print!("> ");
            }
            SessionEvent::TimerStateChanged(timer_state) => {
                let left = timer_state.time_left.as_secs();
                if left > 0 && left <= 3 {
                    print!("({}s) ", left);
                }
            }
            SessionEvent::RoundResolved(outcome) => {
                if outcome.is_correct {
                    println!("Correct!");
                } else {
                    println!(
                        "Wrong, the answer was {}.",
                        outcome.expected_answer.format(self.answer_currency)
                    );
                }
            }
            SessionEvent::SessionCompleted(result) => self.describe_result(result),
        }
        let _ = io::stdout().flush();
    }
}

/// Positional overrides such as `give-change eur hard 15`. Anything that is
/// not a mode, currency, level or timer length is reported and skipped.
fn apply_args(settings: &mut Settings, args: impl Iterator<Item = String>) {
    let mut currencies = Vec::new();
    for arg in args {
        if let Ok(mode) = arg.parse::<GameMode>() {
            settings.mode = mode;
        } else if let Ok(currency) = arg.parse::<Currency>() {
            currencies.push(currency);
        } else if let Ok(level) = arg.parse::<Level>() {
            settings.level = level;
        } else if let Ok(secs) = arg.parse::<u64>() {
            settings.timer_secs = secs;
        } else {
            warn!("Ignoring argument {:?}", arg);
        }
    }
    if let Some(currency) = currencies.first() {
        settings.currency = *currency;
    }
    settings.target_currency = currencies.get(1).copied().or(settings.target_currency);
    if settings.target_currency == Some(settings.currency) {
        settings.target_currency = None;
    }
}

fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if sender.send(line).is_err() {
                break;
            }
        }
    });
    receiver
}

fn play<S: StatsStore>(engine: &mut GameEngine<S>, settings: &Settings) -> Result<(), PlayError> {
    let view = Rc::new(RefCell::new(TerminalView {
        debug_mode: Settings::is_debug_mode(),
        answer_currency: settings.currency,
    }));
    let subscription = engine.observer().subscribe_handler(view);
    let result = start_and_drive(engine, settings);
    subscription.unsubscribe();
    result
}

fn start_and_drive<S: StatsStore>(
    engine: &mut GameEngine<S>,
    settings: &Settings,
) -> Result<(), PlayError> {
    engine
        .start_with_config(settings.session_config())
        .map_err(PlayError::Start)?;

    let lines = spawn_stdin_reader();
    let mut stdin_open = true;
    let mut next_tick = Instant::now() + TICK;
    while engine.session_result().is_none() {
        let wait = next_tick.saturating_duration_since(Instant::now());
        let received = if stdin_open {
            lines.recv_timeout(wait)
        } else {
            thread::sleep(wait);
            Err(RecvTimeoutError::Timeout)
        };
        match received {
            Ok(line) => {
                engine.submit_answer(line.trim());
            }
            Err(RecvTimeoutError::Timeout) => {
                engine.on_tick().map_err(|source| PlayError::Interrupted {
                    round: engine.session().map_or(0, |s| s.round_index() + 1),
                    source,
                })?;
                next_tick += TICK;
            }
            Err(RecvTimeoutError::Disconnected) => stdin_open = false,
        }
    }
    Ok(())
}

fn print_summary<S: StatsStore>(engine: &GameEngine<S>, currency: Currency) {
    if let Some(recorded) = engine.last_recorded() {
        if recorded.is_new_high_score {
            println!("New high score for {}!", currency);
        }
    }
    if let Some(best) = engine.high_score(currency) {
        println!(
            "High score ({}): {}/{} ({:.0}%)",
            currency,
            best.correct_rounds,
            best.total_rounds,
            best.accuracy * 100.0
        );
    }
    let overall = engine.stats().overall();
    println!(
        "All games: {} played, {}/{} rounds correct ({:.0}%), best {:.0}%, {:.1}s average",
        overall.games_played,
        overall.correct_rounds,
        overall.total_rounds,
        overall.overall_accuracy() * 100.0,
        overall.best_accuracy * 100.0,
        overall.average_time
    );
}

fn run<S: StatsStore>(mut engine: GameEngine<S>, settings: &Settings) {
    match play(&mut engine, settings) {
        Ok(()) => print_summary(&engine, settings.currency),
        Err(err @ PlayError::Start(_)) => {
            eprintln!("{}", err);
            std::process::exit(1);
        }
        Err(err @ PlayError::Interrupted { .. }) => {
            eprintln!("{}", err);
            print_summary(&engine, settings.currency);
            std::process::exit(3);
        }
    }
}

fn main() {
    env_logger::init();

    let mut settings = Settings::load();
    apply_args(&mut settings, std::env::args().skip(1));
    if !settings.has_valid_timer() {
        eprintln!("Timer must be one of {:?} seconds", TIMER_OPTIONS);
        std::process::exit(2);
    }
    if let Err(err) = settings.save() {
        warn!("Could not save settings: {}", err);
    }
    info!(
        "Playing {} / {} / {} with a {}s timer",
        settings.mode, settings.currency, settings.level, settings.timer_secs
    );

    let seed = Settings::seed_from_env();
    match JsonFileStore::default_location() {
        Some(store) => {
            info!("Stats are kept in {}", store.data_dir().display());
            run(GameEngine::new(store).with_seed(seed), &settings)
        }
        None => {
            warn!("No data directory; stats will not be kept");
            run(GameEngine::new(MemoryStore::default()).with_seed(seed), &settings)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_failure_is_reported_as_start() {
        let mut engine = GameEngine::new(MemoryStore::default());
        let mut settings = Settings::default();
        settings.mode = GameMode::CurrencyConvert;
        settings.currency = Currency::Usd;
        settings.target_currency = None;
        let err = play(&mut engine, &settings).unwrap_err();
        assert!(matches!(err, PlayError::Start(GameError::InvalidInput(_))));
        assert!(err.to_string().starts_with("Could not start a session: "));
        assert!(engine.session().is_none());
    }

    #[test]
    fn test_mid_session_failure_names_the_round() {
        let err = PlayError::Interrupted {
            round: 4,
            source: GameError::InvalidInput("no rounds left".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "Session stopped during round 4: Invalid input: no rounds left"
        );
    }

    #[test]
    fn test_args_override_settings() {
        let mut settings = Settings::default();
        let args = ["convert", "eur", "mdl", "hard", "15"].map(String::from);
        apply_args(&mut settings, args.into_iter());
        assert_eq!(settings.mode, GameMode::CurrencyConvert);
        assert_eq!(settings.currency, Currency::Eur);
        assert_eq!(settings.target_currency, Some(Currency::Mdl));
        assert_eq!(settings.level, Level::Hard);
        assert_eq!(settings.timer_secs, 15);

        apply_args(&mut settings, ["mdl".to_string()].into_iter());
        assert_eq!(settings.currency, Currency::Mdl);
        assert_eq!(settings.target_currency, None);
    }
}
