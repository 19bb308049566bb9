pub mod labels;
pub mod score_bar;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use kwiz::{
    engine::{Feedback, Phase, QuizEngine},
    timer::format_clock,
};

use crate::{
    ui::{
        labels::{clock_style, difficulty_stars, next_label, option_marker, option_style},
        score_bar::ScoreBar,
    },
    App,
};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.engine.phase() {
            Phase::Loading => render_message(area, buf, "Loading questions...", None),
            Phase::NoQuestions => render_message(
                area,
                buf,
                "No questions found.",
                Some("Pass a question file with --questions <file.json>  (esc)ape"),
            ),
            Phase::Active => render_question(self, area, buf),
            Phase::Finished => render_results(&self.engine, area, buf),
        }
    }
}

fn render_message(area: Rect, buf: &mut Buffer, title: &str, hint: Option<&str>) {
    let mut lines = vec![Line::from(Span::styled(
        title.to_string(),
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    if let Some(hint) = hint {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            hint.to_string(),
            Style::default().add_modifier(Modifier::ITALIC),
        )));
    }

    let top = area.height.saturating_sub(lines.len() as u16) / 2;
    let text_area = Rect::new(
        area.x,
        area.y + top,
        area.width,
        area.height.saturating_sub(top),
    );
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(text_area, buf);
}

/// Lines a paragraph of `text` needs at `width` columns
fn wrapped_height(text: &str, width: u16) -> u16 {
    if width == 0 {
        return 1;
    }
    (text.width() as f64 / width as f64).ceil().max(1.0) as u16
}

fn render_progress_strip(engine: &QuizEngine, area: Rect, buf: &mut Buffer) {
    let filled = (engine.progress_percent() / 100.0 * area.width as f64).round() as u16;
    for dx in 0..filled.min(area.width) {
        if let Some(cell) = buf.cell_mut((area.x + dx, area.y)) {
            cell.set_symbol("▀");
            cell.set_style(Style::default().fg(Color::Cyan));
        }
    }
}

fn render_question(app: &App, area: Rect, buf: &mut Buffer) {
    let engine = &app.engine;
    let Some(question) = engine.current_question() else {
        return;
    };
    let state = engine.state();
    let options = engine.options();
    let marks = engine.option_marks();

    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let dim_style = Style::default().add_modifier(Modifier::DIM);
    let italic_style = Style::default().add_modifier(Modifier::ITALIC);

    render_progress_strip(engine, Rect { height: 1, ..area }, buf);

    let text_width = area.width.saturating_sub(HORIZONTAL_MARGIN * 2);
    let question_lines = wrapped_height(&question.text, text_width);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(2),                    // header
            Constraint::Length(1),                    // padding
            Constraint::Length(question_lines),       // question
            Constraint::Length(1),                    // padding
            Constraint::Length(options.len() as u16), // options
            Constraint::Length(1),                    // padding
            Constraint::Length(1),                    // feedback
            Constraint::Length(1),                    // next
            Constraint::Min(0),
            Constraint::Length(1), // score footer
            Constraint::Length(1), // legend
        ])
        .split(area);

    // header: category / counter + stars on the left, clock on the right
    let header = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(10), Constraint::Length(7)])
        .split(chunks[0]);

    let mut counter_line = vec![Span::styled(
        format!(
            "Question {} of {}  ",
            state.current_index + 1,
            engine.total_questions()
        ),
        dim_style,
    )];
    counter_line.extend(difficulty_stars(question.difficulty));

    Paragraph::new(vec![
        Line::from(Span::styled(
            question.category.clone(),
            bold_style.fg(Color::Cyan),
        )),
        Line::from(counter_line),
    ])
    .render(header[0], buf);

    Paragraph::new(Span::styled(
        format_clock(state.remaining_seconds),
        clock_style(state.remaining_seconds),
    ))
    .alignment(Alignment::Right)
    .render(header[1], buf);

    Paragraph::new(Span::styled(question.text.clone(), bold_style))
        .wrap(Wrap { trim: true })
        .render(chunks[2], buf);

    let option_lines: Vec<Line> = options
        .iter()
        .zip(marks.iter())
        .enumerate()
        .map(|(idx, (option, mark))| {
            let highlighted = engine.selection().is_none() && idx == app.highlight;
            Line::from(vec![
                Span::styled(format!("{} ", option_marker(*mark)), option_style(*mark, false)),
                Span::styled(format!("{}. ", idx + 1), dim_style),
                Span::styled(option.clone(), option_style(*mark, highlighted)),
            ])
        })
        .collect();
    Paragraph::new(option_lines).render(chunks[4], buf);

    if let Some(feedback) = engine.feedback() {
        let (text, color) = match feedback {
            Feedback::Correct => ("Correct!", Color::Green),
            Feedback::Wrong => ("Wrong!", Color::Red),
        };
        Paragraph::new(Span::styled(text, bold_style.fg(color)))
            .alignment(Alignment::Center)
            .render(chunks[6], buf);
    }

    let next_style = if engine.can_advance() {
        bold_style
    } else {
        dim_style
    };
    Paragraph::new(Span::styled(
        format!("(enter) {}", next_label(engine.is_last_question())),
        next_style,
    ))
    .alignment(Alignment::Center)
    .render(chunks[7], buf);

    render_score_footer(engine, chunks[9], buf);

    Paragraph::new(Span::styled(
        "(1-9) answer / (↑↓ enter) choose / (n)ext / (r)estart / (esc)ape",
        italic_style,
    ))
    .render(chunks[10], buf);
}

fn render_score_footer(engine: &QuizEngine, area: Rect, buf: &mut Buffer) {
    let projection = engine.projection();
    let footer = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(13),
            Constraint::Min(5),
            Constraint::Length(11),
        ])
        .split(area);

    let small = Style::default().add_modifier(Modifier::DIM);
    Paragraph::new(Span::styled(
        format!("Score: {}%", engine.running_percent()),
        small,
    ))
    .render(footer[0], buf);

    ScoreBar::new(projection).render(footer[1], buf);

    Paragraph::new(Span::styled(
        format!("Max: {}%", projection.clamped().max.round()),
        small,
    ))
    .alignment(Alignment::Right)
    .render(footer[2], buf);
}

fn render_results(engine: &QuizEngine, area: Rect, buf: &mut Buffer) {
    let Some((correct, total)) = engine.final_tally() else {
        return;
    };
    let projection = engine.projection().clamped();
    let bold_style = Style::default().add_modifier(Modifier::BOLD);

    let lines = vec![
        Line::from(Span::styled("Quiz Finished", bold_style.fg(Color::Cyan))),
        Line::from(""),
        Line::from(Span::styled(
            format!("You scored {correct} out of {total}"),
            bold_style,
        )),
        Line::from(Span::styled(
            format!(
                "{} answered / {} timed out   min {:.0}%  current {:.0}%  max {:.0}%",
                engine.state().attempted_count,
                total.saturating_sub(engine.state().attempted_count),
                projection.min,
                projection.current,
                projection.max
            ),
            Style::default().add_modifier(Modifier::DIM),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "(r) play again / (esc)ape",
            Style::default().add_modifier(Modifier::ITALIC),
        )),
    ];

    let height = lines.len() as u16;
    let top = area.height.saturating_sub(height + 2) / 2;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Length(top),
            Constraint::Length(height),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(area);

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(chunks[1], buf);

    ScoreBar::new(projection).render(chunks[3], buf);
}
