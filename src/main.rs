pub mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use kwiz::{
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    engine::{Phase, QuizEngine},
    runtime::{CrosstermEventSource, FixedTicker, QuizEvent, Runner},
    session::SessionConfig,
    source::{BundledQuestionSource, FileQuestionSource},
};
use rand::{rngs::StdRng, SeedableRng};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    fs::{self, OpenOptions},
    io::{self, stdin},
    path::PathBuf,
    time::Duration,
};

const TICK_RATE_MS: u64 = 100;

/// timed multiple-choice quiz in the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A timed multiple-choice quiz. Each question has a countdown; answer before it runs out or the question is skipped. The footer shows your running score and the lowest and highest final score still reachable."
)]
pub struct Cli {
    /// seconds allowed per question
    #[clap(short = 's', long, value_parser = clap::value_parser!(u32).range(1..))]
    seconds: Option<u32>,

    /// question file: a json list of records or an object with a "results" list
    #[clap(short = 'q', long)]
    questions: Option<PathBuf>,

    /// seed for answer shuffling, for reproducible runs
    #[clap(long)]
    seed: Option<u64>,

    /// store the given --seconds/--questions as the new defaults
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    /// Command line flags take precedence over the stored config
    fn apply_to(&self, mut config: Config) -> Config {
        if let Some(seconds) = self.seconds {
            config.seconds_per_question = seconds;
        }
        if let Some(path) = &self.questions {
            config.questions_path = Some(path.clone());
        }
        config
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Continue,
    Quit,
}

#[derive(Debug)]
pub struct App {
    pub config: Config,
    pub engine: QuizEngine,
    /// Option under the cursor for arrow-key selection
    pub highlight: usize,
}

impl App {
    pub fn new(config: Config, seed: Option<u64>) -> Self {
        let session = SessionConfig::from(&config);
        let engine = match seed {
            Some(seed) => QuizEngine::with_rng(session, StdRng::seed_from_u64(seed)),
            None => QuizEngine::new(session),
        };
        Self {
            config,
            engine,
            highlight: 0,
        }
    }

    pub fn load(&mut self) -> bool {
        match &self.config.questions_path {
            Some(path) => self.engine.load_from(&FileQuestionSource::with_path(path)),
            None => self.engine.load_from(&BundledQuestionSource::default()),
        }
    }

    pub fn on_tick(&mut self, elapsed: Duration) -> bool {
        let before = self.engine.state().current_index;
        let changed = self.engine.on_tick(elapsed);
        if self.engine.state().current_index != before {
            self.highlight = 0;
        }
        changed
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        if key.kind != KeyEventKind::Press {
            return Action::Continue;
        }
        if key.code == KeyCode::Esc
            || (key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c'))
        {
            return Action::Quit;
        }

        match self.engine.phase() {
            Phase::Active => self.handle_active_key(key.code),
            Phase::Finished => {
                if matches!(key.code, KeyCode::Char('r') | KeyCode::Enter) {
                    self.restart();
                }
            }
            Phase::Loading | Phase::NoQuestions => {}
        }
        Action::Continue
    }

    fn handle_active_key(&mut self, code: KeyCode) {
        let answered = self.engine.selection().is_some();
        match code {
            KeyCode::Char(c @ '1'..='9') => {
                let idx = c as usize - '1' as usize;
                if self.engine.select_index(idx) {
                    self.highlight = idx;
                }
            }
            KeyCode::Up | KeyCode::Char('k') if !answered => {
                self.highlight = self.highlight.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') if !answered => {
                let last = self.engine.options().len().saturating_sub(1);
                self.highlight = (self.highlight + 1).min(last);
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                if answered {
                    self.next();
                } else {
                    self.engine.select_index(self.highlight);
                }
            }
            KeyCode::Char('n') | KeyCode::Right => self.next(),
            KeyCode::Char('r') => self.restart(),
            _ => {}
        }
    }

    fn next(&mut self) {
        if self.engine.advance() {
            self.highlight = 0;
        }
    }

    fn restart(&mut self) {
        if self.engine.reset() {
            self.highlight = 0;
        }
    }
}

/// Logs go to a file so they never draw over the alternate screen
fn init_logging() {
    let Some(path) = AppDirs::log_path() else {
        return;
    };
    if let Some(parent) = path.parent() {
        if fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    init_logging();

    let store = FileConfigStore::new();
    let config = cli.apply_to(store.load());
    if cli.save_config {
        store.save(&config)?;
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config, cli.seed);
    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    // loading screen stays up until the one-shot read finishes
    terminal.draw(|f| ui(app, f))?;
    app.load();
    terminal.draw(|f| ui(app, f))?;

    let mut runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );

    loop {
        let redraw = match runner.step() {
            QuizEvent::Tick(elapsed) => app.on_tick(elapsed),
            QuizEvent::Resize => true,
            QuizEvent::Key(key) => match app.handle_key(key) {
                Action::Quit => break,
                Action::Continue => true,
            },
        };

        if redraw {
            terminal.draw(|f| ui(app, f))?;
        }
    }

    Ok(())
}

fn ui(app: &App, f: &mut Frame) {
    f.render_widget(app, f.area());
}
