use crate::timer::DEFAULT_SECONDS_PER_QUESTION;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub seconds_per_question: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seconds_per_question: DEFAULT_SECONDS_PER_QUESTION,
        }
    }
}

/// Progress through one quiz run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizState {
    pub current_index: usize,
    pub attempted_count: usize,
    pub correct_count: usize,
    pub selection: Option<String>,
    pub remaining_seconds: u32,
    pub finished: bool,
}

impl QuizState {
    pub fn new(seconds_per_question: u32) -> Self {
        Self {
            current_index: 0,
            attempted_count: 0,
            correct_count: 0,
            selection: None,
            remaining_seconds: seconds_per_question,
            finished: false,
        }
    }
}

impl Default for QuizState {
    fn default() -> Self {
        Self::new(DEFAULT_SECONDS_PER_QUESTION)
    }
}
