use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent};

/// Unified event type consumed by the app runner
#[derive(Clone, Debug)]
pub enum QuizEvent {
    Key(KeyEvent),
    Resize,
    /// Wall time since the previous tick
    Tick(Duration),
}

/// Source of terminal events (keyboard, resize, etc.)
pub trait QuizEventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    /// Returns Ok(event) if an event arrives before the timeout, or Err(Timeout) if it expires.
    fn recv_timeout(&self, timeout: Duration) -> Result<QuizEvent, RecvTimeoutError>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    rx: Receiver<QuizEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let evt = match event::read() {
                Ok(CtEvent::Key(key)) => QuizEvent::Key(key),
                Ok(CtEvent::Resize(_, _)) => QuizEvent::Resize,
                Ok(_) => continue,
                Err(e) => {
                    log::error!("terminal event reader stopped: {e}");
                    break;
                }
            };
            if tx.send(evt).is_err() {
                break;
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<QuizEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Configurable ticker interface
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

/// Fixed interval ticker
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Test event source for unit tests
pub struct TestEventSource {
    rx: Receiver<QuizEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<QuizEvent>) -> Self {
        Self { rx }
    }
}

impl QuizEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<QuizEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Runner that advances the application one event/tick at a time
pub struct Runner<E: QuizEventSource, T: Ticker> {
    event_source: E,
    ticker: T,
    last_tick: Instant,
    pending: Option<QuizEvent>,
}

impl<E: QuizEventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
            last_tick: Instant::now(),
            pending: None,
        }
    }

    /// Returns the next event, or a Tick carrying the time elapsed since the
    /// previous one. An overdue Tick is always returned before the event that
    /// arrived after it, so a steady stream of keys cannot stall the clock.
    pub fn step(&mut self) -> QuizEvent {
        if let Some(ev) = self.pending.take() {
            return ev;
        }

        let wait = self
            .ticker
            .interval()
            .saturating_sub(self.last_tick.elapsed());
        match self.event_source.recv_timeout(wait) {
            Ok(QuizEvent::Tick(elapsed)) => {
                self.last_tick = Instant::now();
                QuizEvent::Tick(elapsed)
            }
            Ok(ev) if self.last_tick.elapsed() >= self.ticker.interval() => {
                self.pending = Some(ev);
                self.tick()
            }
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => self.tick(),
        }
    }

    fn tick(&mut self) -> QuizEvent {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_tick);
        self.last_tick = now;
        QuizEvent::Tick(elapsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn step_returns_tick_on_timeout() {
        let (_tx, rx) = mpsc::channel();
        let es = TestEventSource::new(rx);
        let ticker = FixedTicker::new(Duration::from_millis(1));
        let mut runner = Runner::new(es, ticker);

        match runner.step() {
            QuizEvent::Tick(elapsed) => assert!(elapsed >= Duration::from_millis(1)),
            _ => panic!("expected Tick on timeout"),
        }
    }

    #[test]
    fn step_passes_through_events() {
        let (tx, rx) = mpsc::channel();
        tx.send(QuizEvent::Resize).unwrap();
        let es = TestEventSource::new(rx);
        let ticker = FixedTicker::new(Duration::from_secs(1));
        let mut runner = Runner::new(es, ticker);

        match runner.step() {
            QuizEvent::Resize => {}
            _ => panic!("expected Resize event"),
        }
    }

    #[test]
    fn step_emits_overdue_tick_before_event() {
        let (tx, rx) = mpsc::channel();
        let mut runner = Runner::new(
            TestEventSource::new(rx),
            FixedTicker::new(Duration::from_millis(5)),
        );
        std::thread::sleep(Duration::from_millis(10));
        tx.send(QuizEvent::Resize).unwrap();

        match runner.step() {
            QuizEvent::Tick(elapsed) => assert!(elapsed >= Duration::from_millis(10)),
            other => panic!("expected overdue Tick, got {other:?}"),
        }
        match runner.step() {
            QuizEvent::Resize => {}
            other => panic!("expected held Resize, got {other:?}"),
        }
    }

    #[test]
    fn step_passes_through_injected_ticks() {
        let (tx, rx) = mpsc::channel();
        tx.send(QuizEvent::Tick(Duration::from_secs(3))).unwrap();
        let mut runner = Runner::new(TestEventSource::new(rx), FixedTicker::new(Duration::from_millis(10)));

        match runner.step() {
            QuizEvent::Tick(elapsed) => assert_eq!(elapsed, Duration::from_secs(3)),
            _ => panic!("expected injected Tick"),
        }
    }
}
