// Copyright (C) 2020-2024 Andy Kurnia.

use super::{drawer, error, game, lexicon, normalize, timers};
use std::time::Duration;

pub const TITLE: &str = "Scrabble";
pub const RULES: &str = "Find the longest word with given letters";

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Idle,
    InProgress,
    Resolved,
}

#[derive(Clone, Copy, Debug)]
pub struct RoundSettings {
    pub draw_size: usize,
    pub duration: Duration,
    pub num_solutions: usize,
}

impl Default for RoundSettings {
    fn default() -> Self {
        Self {
            draw_size: 10,
            duration: Duration::from_millis(30_000),
            num_solutions: 5,
        }
    }
}

#[derive(Clone, Debug)]
pub struct BestAnswer<U> {
    pub user: U,
    pub answer: String, // as submitted, trimmed.
    len: usize,         // letters after folding.
}

impl<U> BestAnswer<U> {
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len
    }
}

// Only a strictly longer word takes over; on a tie the earlier one stays.
#[inline(always)]
fn improves_on<U>(best: &Option<BestAnswer<U>>, len: usize) -> bool {
    best.as_ref().map_or(0, |best| best.len) < len
}

enum Round<U> {
    Idle,
    InProgress {
        draw: drawer::Draw,
        best: Option<BestAnswer<U>>,
        timer: timers::TimerId,
        output: game::Output,
        on_complete: game::OnComplete<U>,
    },
    Resolved {
        draw: drawer::Draw,
        winner: Option<BestAnswer<U>>,
    },
}

// One round at a time. Everything happens on the caller's thread: the host
// delivers timer expiry through on_timer, in order with the messages.
pub struct RoundEngine<U, D, S> {
    lexicon: std::sync::Arc<lexicon::Lexicon>,
    drawer: D,
    scheduler: S,
    settings: RoundSettings,
    round: Round<U>,
}

impl<U, D, S> RoundEngine<U, D, S>
where
    U: Clone + std::fmt::Display,
    D: drawer::Drawer,
    S: timers::Scheduler,
{
    pub fn new(
        lexicon: std::sync::Arc<lexicon::Lexicon>,
        drawer: D,
        scheduler: S,
        settings: RoundSettings,
    ) -> Self {
        Self {
            lexicon,
            drawer,
            scheduler,
            settings,
            round: Round::Idle,
        }
    }

    pub fn phase(&self) -> Phase {
        match self.round {
            Round::Idle => Phase::Idle,
            Round::InProgress { .. } => Phase::InProgress,
            Round::Resolved { .. } => Phase::Resolved,
        }
    }

    pub fn draw(&self) -> Option<&drawer::Draw> {
        match &self.round {
            Round::Idle => None,
            Round::InProgress { draw, .. } | Round::Resolved { draw, .. } => Some(draw),
        }
    }

    // The current leader, or the winner once resolved.
    pub fn best_answer(&self) -> Option<&BestAnswer<U>> {
        match &self.round {
            Round::Idle => None,
            Round::InProgress { best, .. } => best.as_ref(),
            Round::Resolved { winner, .. } => winner.as_ref(),
        }
    }

    #[inline(always)]
    pub fn settings(&self) -> &RoundSettings {
        &self.settings
    }

    #[inline(always)]
    pub fn lexicon(&self) -> &lexicon::Lexicon {
        &self.lexicon
    }

    #[inline(always)]
    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    // The armed timer went off. Anything but the armed timer of a round in
    // progress means the round was never started properly, and resolving it
    // would announce a bogus result.
    pub fn on_timer(&mut self, id: timers::TimerId) {
        let Round::InProgress {
            draw,
            best,
            timer,
            mut output,
            on_complete,
        } = std::mem::replace(&mut self.round, Round::Idle)
        else {
            panic!("timer {id:?} fired without a draw");
        };
        assert_eq!(timer, id, "timer {id:?} fired while {timer:?} is armed");

        output("Timeout!");
        let solutions = self
            .lexicon
            .longest_words_for(draw.letters(), self.settings.num_solutions);
        output(&format!("Possible solutions: {}", solutions.join(", ")));
        let winner = match &best {
            Some(best) => {
                output(&format!(
                    "The best answer has been given by {}! ({})",
                    best.user, best.answer
                ));
                Some(best.user.clone())
            }
            None => {
                output("Nobody found an answer! :(");
                None
            }
        };
        tracing::info!(
            draw = %draw,
            winner = ?best.as_ref().map(|best| best.answer.as_str()),
            solutions = solutions.len(),
            "round resolved"
        );
        self.round = Round::Resolved { draw, winner: best };
        on_complete(winner);
    }
}

impl<U, D> RoundEngine<U, D, timers::ManualScheduler>
where
    U: Clone + std::fmt::Display,
    D: drawer::Drawer,
{
    // Moves virtual time forward, resolving the round if its time is up.
    pub fn advance(&mut self, by: Duration) {
        for id in self.scheduler.advance(by) {
            self.on_timer(id);
        }
    }
}

impl<U, D, S> game::Game<U> for RoundEngine<U, D, S>
where
    U: Clone + std::fmt::Display,
    D: drawer::Drawer,
    S: timers::Scheduler,
{
    fn title(&self) -> &'static str {
        TITLE
    }

    fn rules(&self) -> &'static str {
        RULES
    }

    fn start(
        &mut self,
        mut output: game::Output,
        on_complete: game::OnComplete<U>,
    ) -> Result<(), error::RoundError> {
        let phase = self.phase();
        if phase != Phase::Idle {
            tracing::warn!(?phase, "start ignored, round not idle");
            return Err(error::RoundError::NotIdle(phase));
        }
        let draw = self.drawer.pick_letters(self.settings.draw_size);
        tracing::debug!(draw = %draw, "round started");
        output(&format!(
            "Find the longest word containing the following letters: {draw}"
        ));
        let timer = self.scheduler.arm(self.settings.duration);
        self.round = Round::InProgress {
            draw,
            best: None,
            timer,
            output,
            on_complete,
        };
        Ok(())
    }

    fn handle_message(&mut self, word: &str, user: U) {
        let Round::InProgress {
            draw, best, output, ..
        } = &mut self.round
        else {
            return;
        };
        let answer = word.trim();
        let folded = normalize::fold_word(answer);
        if !self.lexicon.has_word(&folded) || !lexicon::fits_within(&folded, draw.letters()) {
            tracing::debug!(%user, answer, "not a valid word");
            return;
        }
        let len = normalize::letter_count(&folded);
        if !improves_on(best, len) {
            return;
        }
        tracing::debug!(%user, answer, len, "new best answer");
        output(&format!("{user} has now the best answer: {answer}"));
        *best = Some(BestAnswer {
            user,
            answer: answer.to_string(),
            len,
        });
    }

    fn stop(&mut self) {
        if let Round::InProgress { timer, .. } = &self.round {
            self.scheduler.cancel(*timer);
        }
        self.round = Round::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Game;
    use crate::timers::Scheduler;
    use std::sync::{Arc, Mutex};

    struct FixedDraw(&'static str);

    impl drawer::Drawer for FixedDraw {
        fn pick_letters(&mut self, _n: usize) -> drawer::Draw {
            drawer::Draw::from(self.0)
        }
    }

    type Engine = RoundEngine<&'static str, FixedDraw, timers::ManualScheduler>;

    #[derive(Default, Clone)]
    struct Seen {
        lines: Arc<Mutex<Vec<String>>>,
        results: Arc<Mutex<Vec<Option<&'static str>>>>,
    }

    impl Seen {
        fn output(&self) -> game::Output {
            let lines = self.lines.clone();
            Box::new(move |line: &str| lines.lock().unwrap().push(line.to_string()))
        }

        fn on_complete(&self) -> game::OnComplete<&'static str> {
            let results = self.results.clone();
            Box::new(move |winner| results.lock().unwrap().push(winner))
        }

        fn lines(&self) -> Vec<String> {
            self.lines.lock().unwrap().clone()
        }

        fn results(&self) -> Vec<Option<&'static str>> {
            self.results.lock().unwrap().clone()
        }
    }

    fn engine(words: &[&str], draw: &'static str, settings: RoundSettings) -> Engine {
        RoundEngine::new(
            Arc::new(lexicon::Lexicon::build(words).unwrap()),
            FixedDraw(draw),
            timers::ManualScheduler::new(),
            settings,
        )
    }

    fn started(words: &[&str], draw: &'static str) -> (Engine, Seen) {
        let mut engine = engine(words, draw, RoundSettings::default());
        let seen = Seen::default();
        engine.start(seen.output(), seen.on_complete()).unwrap();
        (engine, seen)
    }

    const WORDS: &[&str] = &["bad", "face", "faced", "cab", "fade", "zoo"];
    const DRAW: &str = "FACEDBXYZQ";

    #[test]
    fn start_shows_the_draw_and_arms_the_timer() {
        let (mut engine, seen) = started(WORDS, DRAW);
        assert_eq!(engine.phase(), Phase::InProgress);
        assert_eq!(engine.draw(), Some(&drawer::Draw::from(DRAW)));
        assert_eq!(
            seen.lines(),
            ["Find the longest word containing the following letters: F, A, C, E, D, B, X, Y, Z, Q"]
        );
        assert_eq!(engine.scheduler_mut().num_pending(), 1);
        assert_eq!(engine.title(), "Scrabble");
        assert_eq!(engine.rules(), "Find the longest word with given letters");
    }

    #[test]
    fn start_twice_is_rejected() {
        let (mut engine, seen) = started(WORDS, DRAW);
        let other = Seen::default();
        assert_eq!(
            engine.start(other.output(), other.on_complete()),
            Err(error::RoundError::NotIdle(Phase::InProgress))
        );
        assert!(other.lines().is_empty());
        assert_eq!(seen.lines().len(), 1);
        assert_eq!(engine.scheduler_mut().num_pending(), 1);
    }

    #[test]
    fn messages_while_idle_are_ignored() {
        let mut engine = engine(WORDS, DRAW, RoundSettings::default());
        engine.handle_message("face", "ann");
        assert_eq!(engine.phase(), Phase::Idle);
        assert!(engine.best_answer().is_none());
    }

    #[test]
    fn only_strictly_longer_words_take_over() {
        let (mut engine, seen) = started(WORDS, DRAW);
        engine.handle_message("bad", "ann");
        engine.handle_message("cab", "bob"); // same length
        engine.handle_message("face", "cat");
        engine.handle_message("fade", "dan"); // same length
        engine.handle_message("bad", "eve"); // shorter
        let best = engine.best_answer().unwrap();
        assert_eq!((best.user, best.answer.as_str(), best.len()), ("cat", "face", 4));
        assert_eq!(
            seen.lines()[1..],
            ["ann has now the best answer: bad", "cat has now the best answer: face"]
        );
    }

    #[test]
    fn invalid_words_change_nothing() {
        let (mut engine, seen) = started(WORDS, DRAW);
        engine.handle_message("xyz", "ann"); // not a word
        engine.handle_message("zoo", "bob"); // a word, but not in the draw
        engine.handle_message("", "cat");
        assert!(engine.best_answer().is_none());
        assert_eq!(seen.lines().len(), 1);
    }

    #[test]
    fn accents_and_case_do_not_matter() {
        let (mut engine, seen) = started(WORDS, DRAW);
        engine.handle_message("  FÂCÉ ", "ann");
        assert_eq!(engine.best_answer().unwrap().answer, "FÂCÉ");
        assert_eq!(seen.lines()[1], "ann has now the best answer: FÂCÉ");
    }

    #[test]
    fn timeout_with_a_winner() {
        let (mut engine, seen) = started(WORDS, DRAW);
        engine.handle_message("face", "ann");
        engine.advance(Duration::from_millis(29_999));
        assert_eq!(engine.phase(), Phase::InProgress);
        engine.advance(Duration::from_millis(1));
        assert_eq!(engine.phase(), Phase::Resolved);
        assert_eq!(
            seen.lines()[2..],
            [
                "Timeout!",
                "Possible solutions: faced, face, fade, bad, cab",
                "The best answer has been given by ann! (face)",
            ]
        );
        assert_eq!(seen.results(), [Some("ann")]);
        assert_eq!(engine.best_answer().unwrap().user, "ann");
    }

    #[test]
    fn timeout_without_answers() {
        let (mut engine, seen) = started(WORDS, "QQQQQQQQQQ");
        engine.advance(Duration::from_secs(30));
        assert_eq!(
            seen.lines()[1..],
            ["Timeout!", "Possible solutions: ", "Nobody found an answer! :("]
        );
        assert_eq!(seen.results(), [None]);
    }

    #[test]
    fn resolved_round_ignores_messages_and_start() {
        let (mut engine, seen) = started(WORDS, DRAW);
        engine.advance(Duration::from_secs(30));
        engine.handle_message("faced", "ann");
        assert!(engine.best_answer().is_none());
        let other = Seen::default();
        assert_eq!(
            engine.start(other.output(), other.on_complete()),
            Err(error::RoundError::NotIdle(Phase::Resolved))
        );
        assert_eq!(seen.lines().len(), 4);
        assert_eq!(seen.results().len(), 1);
    }

    #[test]
    fn stop_cancels_the_pending_timeout() {
        let (mut engine, seen) = started(WORDS, DRAW);
        engine.handle_message("face", "ann");
        engine.stop();
        assert_eq!(engine.phase(), Phase::Idle);
        assert!(engine.draw().is_none());
        assert!(engine.best_answer().is_none());
        assert_eq!(engine.scheduler_mut().num_pending(), 0);
        engine.advance(Duration::from_secs(120));
        assert_eq!(seen.lines().len(), 2);
        assert!(seen.results().is_empty());
        engine.stop();
        assert_eq!(engine.phase(), Phase::Idle);
    }

    #[test]
    fn restart_after_stop_starts_clean() {
        let (mut engine, first) = started(WORDS, DRAW);
        engine.handle_message("faced", "ann");
        engine.advance(Duration::from_secs(10));
        engine.stop();
        let second = Seen::default();
        engine.start(second.output(), second.on_complete()).unwrap();
        assert!(engine.best_answer().is_none());
        engine.handle_message("bad", "bob");
        // the first round's deadline would have been here.
        engine.advance(Duration::from_secs(20));
        assert_eq!(engine.phase(), Phase::InProgress);
        engine.advance(Duration::from_secs(10));
        assert!(first.results().is_empty());
        assert_eq!(second.results(), [Some("bob")]);
    }

    #[test]
    fn settings_are_honoured() {
        let settings = RoundSettings {
            draw_size: 10,
            duration: Duration::from_secs(5),
            num_solutions: 2,
        };
        let mut engine = engine(WORDS, DRAW, settings);
        let seen = Seen::default();
        engine.start(seen.output(), seen.on_complete()).unwrap();
        engine.advance(Duration::from_secs(5));
        assert_eq!(seen.lines()[2], "Possible solutions: faced, face");
    }

    #[test]
    #[should_panic(expected = "without a draw")]
    fn timer_without_a_round_is_fatal() {
        let mut engine = engine(WORDS, DRAW, RoundSettings::default());
        let id = timers::ManualScheduler::new().arm(Duration::ZERO);
        engine.on_timer(id);
    }
}
