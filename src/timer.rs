use std::time::Duration;

pub const DEFAULT_SECONDS_PER_QUESTION: u32 = 45;

const ONE_SECOND: Duration = Duration::from_secs(1);

/// What the countdown reports back to its owner as time passes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerSignal {
    Tick(u32),
    Timeout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerState {
    Idle,
    Running,
    /// Counting down for display only, the timeout will not fire
    Disarmed,
    Expired,
}

/// Per-question countdown.
///
/// The timer holds no clock of its own: the owner feeds elapsed wall time
/// through [`QuestionTimer::advance`] and reacts to the returned signals.
#[derive(Debug, Clone)]
pub struct QuestionTimer {
    duration_secs: u32,
    remaining_secs: u32,
    carry: Duration,
    state: TimerState,
}

impl QuestionTimer {
    pub fn new(duration_secs: u32) -> Self {
        Self {
            duration_secs,
            remaining_secs: duration_secs,
            carry: Duration::ZERO,
            state: TimerState::Idle,
        }
    }

    /// (Re)start at the full duration
    pub fn start(&mut self, duration_secs: u32) {
        self.duration_secs = duration_secs;
        self.remaining_secs = duration_secs;
        self.carry = Duration::ZERO;
        self.state = if duration_secs == 0 {
            TimerState::Expired
        } else {
            TimerState::Running
        };
    }

    pub fn restart(&mut self) {
        self.start(self.duration_secs);
    }

    /// Stop ticking. No signal is produced after this until the next `start`.
    pub fn cancel(&mut self) {
        self.state = TimerState::Idle;
        self.carry = Duration::ZERO;
    }

    /// Keep the countdown visible but never fire the timeout
    pub fn disarm(&mut self) {
        if self.state == TimerState::Running {
            self.state = TimerState::Disarmed;
        }
    }

    pub fn advance(&mut self, elapsed: Duration) -> Vec<TimerSignal> {
        let mut signals = vec![];
        if !self.is_counting() {
            return signals;
        }

        self.carry += elapsed;
        while self.carry >= ONE_SECOND && self.remaining_secs > 0 {
            self.carry -= ONE_SECOND;
            self.remaining_secs -= 1;
            signals.push(TimerSignal::Tick(self.remaining_secs));
        }

        if self.remaining_secs == 0 {
            if self.state == TimerState::Running {
                signals.push(TimerSignal::Timeout);
            }
            self.state = TimerState::Expired;
            self.carry = Duration::ZERO;
        }

        signals
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    pub fn is_counting(&self) -> bool {
        matches!(self.state, TimerState::Running | TimerState::Disarmed)
    }

    pub fn is_armed(&self) -> bool {
        self.state == TimerState::Running
    }
}

impl Default for QuestionTimer {
    fn default() -> Self {
        Self::new(DEFAULT_SECONDS_PER_QUESTION)
    }
}

/// `mm:ss` rendering of a second count
pub fn format_clock(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_timer_is_idle() {
        let mut timer = QuestionTimer::new(5);
        assert_eq!(timer.remaining_secs(), 5);
        assert!(!timer.is_counting());
        assert!(timer.advance(Duration::from_secs(10)).is_empty());
        assert_eq!(timer.remaining_secs(), 5);
    }

    #[test]
    fn test_ticks_once_per_second() {
        let mut timer = QuestionTimer::new(3);
        timer.start(3);

        assert_eq!(timer.advance(ONE_SECOND), vec![TimerSignal::Tick(2)]);
        assert_eq!(timer.advance(ONE_SECOND), vec![TimerSignal::Tick(1)]);
        assert_eq!(
            timer.advance(ONE_SECOND),
            vec![TimerSignal::Tick(0), TimerSignal::Timeout]
        );
        assert!(timer.advance(ONE_SECOND).is_empty());
        assert!(!timer.is_counting());
    }

    #[test]
    fn test_sub_second_remainders_carry_over() {
        let mut timer = QuestionTimer::new(2);
        timer.start(2);

        for _ in 0..9 {
            assert!(timer.advance(Duration::from_millis(100)).is_empty());
        }
        assert_eq!(
            timer.advance(Duration::from_millis(100)),
            vec![TimerSignal::Tick(1)]
        );
    }

    #[test]
    fn test_large_elapsed_emits_every_tick_and_one_timeout() {
        let mut timer = QuestionTimer::new(3);
        timer.start(3);

        let signals = timer.advance(Duration::from_secs(60));
        assert_eq!(
            signals,
            vec![
                TimerSignal::Tick(2),
                TimerSignal::Tick(1),
                TimerSignal::Tick(0),
                TimerSignal::Timeout
            ]
        );
        assert!(timer.advance(Duration::from_secs(60)).is_empty());
    }

    #[test]
    fn test_cancel_before_any_tick() {
        let mut timer = QuestionTimer::new(1);
        timer.start(1);
        timer.cancel();
        assert!(timer.advance(Duration::from_secs(5)).is_empty());
        assert_eq!(timer.remaining_secs(), 1);
    }

    #[test]
    fn test_cancel_when_idle_is_harmless() {
        let mut timer = QuestionTimer::default();
        timer.cancel();
        timer.cancel();
        assert_eq!(timer.duration_secs(), DEFAULT_SECONDS_PER_QUESTION);
    }

    #[test]
    fn test_disarmed_counts_down_without_timeout() {
        let mut timer = QuestionTimer::new(2);
        timer.start(2);
        timer.disarm();
        assert!(!timer.is_armed());

        let signals = timer.advance(Duration::from_secs(5));
        assert_eq!(signals, vec![TimerSignal::Tick(1), TimerSignal::Tick(0)]);
        assert_eq!(timer.remaining_secs(), 0);
    }

    #[test]
    fn test_restart_resets_to_full_duration() {
        let mut timer = QuestionTimer::new(45);
        timer.start(45);
        timer.advance(Duration::from_secs(30));
        assert_eq!(timer.remaining_secs(), 15);

        timer.restart();
        assert_eq!(timer.remaining_secs(), 45);
        assert!(timer.is_armed());
    }

    #[test]
    fn test_zero_duration_never_fires() {
        let mut timer = QuestionTimer::new(0);
        timer.start(0);
        assert!(timer.advance(Duration::from_secs(1)).is_empty());
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(45), "00:45");
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(125), "02:05");
    }
}
