use std::time::Duration;

use rand::{rngs::StdRng, SeedableRng};

use crate::question::{normalize, Question, RawQuestionRecord};
use crate::score::{self, Projection};
use crate::session::{QuizState, SessionConfig};
use crate::shuffle::OptionOrder;
use crate::source::{LoadError, QuestionSource};
use crate::timer::{QuestionTimer, TimerSignal};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading,
    /// Terminal: the source failed or held nothing playable
    NoQuestions,
    Active,
    Finished,
}

/// Every state change, user-initiated or timer-driven, is one of these
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Select(String),
    Advance,
    Timeout,
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    Correct,
    Wrong,
}

/// How a displayed option should look once an answer is locked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionMark {
    Neutral,
    Correct,
    Wrong,
    Disabled,
}

/// Drives one quiz session: question sequencing, answer locking, timing and scoring
#[derive(Debug)]
pub struct QuizEngine {
    config: SessionConfig,
    phase: Phase,
    questions: Vec<Question>,
    state: QuizState,
    timer: QuestionTimer,
    order: Option<OptionOrder>,
    rng: StdRng,
    skipped: usize,
}

impl QuizEngine {
    pub fn new(config: SessionConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    pub fn with_rng(config: SessionConfig, rng: StdRng) -> Self {
        Self {
            state: QuizState::new(config.seconds_per_question),
            timer: QuestionTimer::new(config.seconds_per_question),
            config,
            phase: Phase::Loading,
            questions: vec![],
            order: None,
            rng,
            skipped: 0,
        }
    }

    /// Read the source once and enter the first question, or `NoQuestions` on failure
    pub fn load_from<S: QuestionSource + ?Sized>(&mut self, source: &S) -> bool {
        match source.load() {
            Ok(records) => self.load(&records),
            Err(err) => {
                self.load_failed(&err);
                false
            }
        }
    }

    pub fn load(&mut self, records: &[RawQuestionRecord]) -> bool {
        let questions = records.iter().map(normalize).collect();
        self.load_questions(questions)
    }

    /// Malformed questions (no reachable answer) are dropped and counted in `skipped`
    pub fn load_questions(&mut self, questions: Vec<Question>) -> bool {
        if self.phase != Phase::Loading {
            log::debug!("ignoring load in phase {:?}", self.phase);
            return false;
        }

        let total = questions.len();
        let (playable, malformed): (Vec<Question>, Vec<Question>) =
            questions.into_iter().partition(Question::is_well_formed);

        for q in &malformed {
            log::warn!(
                "skipping malformed question {:?}: answer {:?} not among {:?}",
                q.text,
                q.answer,
                q.options
            );
        }

        self.skipped = malformed.len();
        self.questions = playable;
        log::info!(
            "loaded {} questions ({} of {} skipped)",
            self.questions.len(),
            self.skipped,
            total
        );

        if self.questions.is_empty() {
            self.phase = Phase::NoQuestions;
            return false;
        }

        self.phase = Phase::Active;
        self.state = QuizState::new(self.config.seconds_per_question);
        self.enter_question(0);
        true
    }

    pub fn load_failed(&mut self, err: &LoadError) {
        if self.phase != Phase::Loading {
            log::warn!("ignoring load failure in phase {:?}: {err}", self.phase);
            return;
        }
        log::error!("failed to load questions: {err}");
        self.phase = Phase::NoQuestions;
        self.questions.clear();
        self.timer.cancel();
    }

    pub fn select_option(&mut self, option: &str) -> bool {
        self.dispatch(Transition::Select(option.to_string()))
    }

    /// Select the `idx`-th option in displayed (shuffled) order
    pub fn select_index(&mut self, idx: usize) -> bool {
        match self.options().get(idx).cloned() {
            Some(option) => self.dispatch(Transition::Select(option)),
            None => false,
        }
    }

    pub fn advance(&mut self) -> bool {
        self.dispatch(Transition::Advance)
    }

    pub fn timeout(&mut self) -> bool {
        self.dispatch(Transition::Timeout)
    }

    pub fn reset(&mut self) -> bool {
        self.dispatch(Transition::Reset)
    }

    /// Feed elapsed wall time into the countdown; a timeout goes through `dispatch`
    pub fn on_tick(&mut self, elapsed: Duration) -> bool {
        if self.phase != Phase::Active {
            return false;
        }

        let mut changed = false;
        for signal in self.timer.advance(elapsed) {
            match signal {
                TimerSignal::Tick(remaining) => {
                    self.state.remaining_seconds = remaining;
                    changed = true;
                }
                TimerSignal::Timeout => {
                    changed |= self.dispatch(Transition::Timeout);
                }
            }
        }
        changed
    }

    /// Apply one transition. Returns false when its precondition does not hold.
    pub fn dispatch(&mut self, transition: Transition) -> bool {
        let changed = match transition {
            Transition::Select(ref option) => self.apply_select(option),
            Transition::Advance => self.apply_advance(),
            Transition::Timeout => self.apply_timeout(),
            Transition::Reset => self.apply_reset(),
        };
        if changed {
            log::debug!(
                "{:?} -> {:?} q{} {}/{}",
                transition,
                self.phase,
                self.state.current_index,
                self.state.correct_count,
                self.state.attempted_count
            );
        }
        changed
    }

    fn apply_select(&mut self, option: &str) -> bool {
        if self.phase != Phase::Active || self.state.selection.is_some() {
            return false;
        }
        if !self.options().iter().any(|o| o == option) {
            log::debug!("ignoring selection {option:?}: not a displayed option");
            return false;
        }
        let correct = self
            .current_question()
            .is_some_and(|q| q.answer == option);

        self.state.selection = Some(option.to_string());
        self.state.attempted_count += 1;
        if correct {
            self.state.correct_count += 1;
        }
        self.timer.disarm();
        true
    }

    fn apply_advance(&mut self) -> bool {
        if self.phase != Phase::Active {
            return false;
        }
        if self.state.selection.is_none() && self.state.remaining_seconds > 0 {
            return false;
        }

        let next = self.state.current_index + 1;
        if next >= self.questions.len() {
            self.timer.cancel();
            self.state.selection = None;
            self.state.finished = true;
            self.phase = Phase::Finished;
        } else {
            self.enter_question(next);
        }
        true
    }

    fn apply_timeout(&mut self) -> bool {
        if self.phase != Phase::Active || self.state.selection.is_some() {
            return false;
        }
        self.timer.cancel();
        self.state.remaining_seconds = 0;
        self.apply_advance()
    }

    fn apply_reset(&mut self) -> bool {
        if !matches!(self.phase, Phase::Active | Phase::Finished) {
            return false;
        }
        self.state = QuizState::new(self.config.seconds_per_question);
        self.phase = Phase::Active;
        self.enter_question(0);
        true
    }

    fn enter_question(&mut self, index: usize) {
        self.timer.cancel();
        self.state.current_index = index;
        self.state.selection = None;
        self.order = self
            .questions
            .get(index)
            .map(|q| OptionOrder::new(index, &q.options, &mut self.rng));
        self.timer.start(self.config.seconds_per_question);
        self.state.remaining_seconds = self.timer.remaining_secs();
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> &QuizState {
        &self.state
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn current_question(&self) -> Option<&Question> {
        match self.phase {
            Phase::Active => self.questions.get(self.state.current_index),
            _ => None,
        }
    }

    /// Options of the current question in their per-question shuffled order
    pub fn options(&self) -> &[String] {
        match (&self.order, self.phase) {
            (Some(order), Phase::Active) if order.is_for(self.state.current_index) => {
                order.options()
            }
            _ => &[],
        }
    }

    pub fn selection(&self) -> Option<&str> {
        self.state.selection.as_deref()
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.state.remaining_seconds
    }

    pub fn feedback(&self) -> Option<Feedback> {
        let selection = self.selection()?;
        let question = self.current_question()?;
        Some(if selection == question.answer {
            Feedback::Correct
        } else {
            Feedback::Wrong
        })
    }

    pub fn option_marks(&self) -> Vec<OptionMark> {
        let (Some(selection), Some(question)) = (self.selection(), self.current_question()) else {
            return vec![OptionMark::Neutral; self.options().len()];
        };

        self.options()
            .iter()
            .map(|opt| {
                if *opt == question.answer {
                    OptionMark::Correct
                } else if opt == selection {
                    OptionMark::Wrong
                } else {
                    OptionMark::Disabled
                }
            })
            .collect()
    }

    pub fn can_advance(&self) -> bool {
        self.phase == Phase::Active
            && (self.state.selection.is_some() || self.state.remaining_seconds == 0)
    }

    pub fn is_last_question(&self) -> bool {
        self.state.current_index + 1 >= self.questions.len()
    }

    pub fn projection(&self) -> Projection {
        score::project(
            self.questions.len(),
            self.state.attempted_count,
            self.state.correct_count,
        )
    }

    pub fn running_percent(&self) -> u32 {
        score::running_percent(self.state.correct_count, self.state.attempted_count)
    }

    /// Width of the top progress strip, in percent
    pub fn progress_percent(&self) -> f64 {
        if self.questions.is_empty() {
            return 0.0;
        }
        let done = self.state.current_index as f64 / self.questions.len() as f64 * 100.0;
        (done + 5.0).min(100.0)
    }

    /// `(correct, total)` once the quiz is finished
    pub fn final_tally(&self) -> Option<(usize, usize)> {
        match self.phase {
            Phase::Finished => Some((self.state.correct_count, self.questions.len())),
            _ => None,
        }
    }
}
