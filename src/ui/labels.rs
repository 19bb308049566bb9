use ratatui::{
    style::{Color, Modifier, Style},
    text::Span,
};

use kwiz::{engine::OptionMark, question::Difficulty};

const MAX_STARS: u8 = 3;

/// Below this many seconds the clock turns red
pub const LOW_TIME_SECS: u32 = 10;

pub fn difficulty_stars(difficulty: Difficulty) -> Vec<Span<'static>> {
    let filled = difficulty.stars().min(MAX_STARS);
    let mut spans = vec![Span::styled(
        "★".repeat(filled as usize),
        Style::default().fg(Color::Yellow),
    )];
    if filled < MAX_STARS {
        spans.push(Span::styled(
            "☆".repeat((MAX_STARS - filled) as usize),
            Style::default().fg(Color::DarkGray),
        ));
    }
    spans
}

pub fn clock_style(remaining: u32) -> Style {
    let style = Style::default().add_modifier(Modifier::BOLD);
    if remaining <= LOW_TIME_SECS {
        style.fg(Color::Red)
    } else {
        style.add_modifier(Modifier::DIM)
    }
}

pub fn option_marker(mark: OptionMark) -> &'static str {
    match mark {
        OptionMark::Correct => "✓",
        OptionMark::Wrong => "✗",
        OptionMark::Neutral | OptionMark::Disabled => " ",
    }
}

pub fn option_style(mark: OptionMark, highlighted: bool) -> Style {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    match mark {
        OptionMark::Correct => bold.fg(Color::Green),
        OptionMark::Wrong => bold.fg(Color::Red),
        OptionMark::Disabled => Style::default().add_modifier(Modifier::DIM),
        OptionMark::Neutral if highlighted => bold.add_modifier(Modifier::REVERSED),
        OptionMark::Neutral => Style::default(),
    }
}

pub fn next_label(is_last: bool) -> &'static str {
    if is_last {
        "Finish"
    } else {
        "Next Question"
    }
}
