use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use kwiz::score::Projection;

const FILLED: &str = "█";
const EMPTY: &str = "░";

/// Stacked bar: red up to the guaranteed score, yellow up to the current
/// rate, green up to the best reachable score
pub struct ScoreBar {
    projection: Projection,
}

impl ScoreBar {
    pub fn new(projection: Projection) -> Self {
        Self { projection }
    }

    /// Cell offsets where the red, yellow and green runs end
    pub fn boundaries(&self, width: u16) -> (u16, u16, u16) {
        let s = self.projection.segments();
        let cell = |pct: f64| ((pct / 100.0 * width as f64).round() as u16).min(width);
        (
            cell(s.red),
            cell(s.red + s.yellow),
            cell(s.red + s.yellow + s.green),
        )
    }
}

impl Widget for ScoreBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let (red_end, yellow_end, green_end) = self.boundaries(area.width);

        for dx in 0..area.width {
            let (symbol, color) = if dx < red_end {
                (FILLED, Color::Red)
            } else if dx < yellow_end {
                (FILLED, Color::Yellow)
            } else if dx < green_end {
                (FILLED, Color::Green)
            } else {
                (EMPTY, Color::DarkGray)
            };
            if let Some(cell) = buf.cell_mut((area.x + dx, area.y)) {
                cell.set_symbol(symbol);
                cell.set_style(Style::default().fg(color));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kwiz::score::project;

    #[test]
    fn test_boundaries_follow_projection() {
        let bar = ScoreBar::new(project(4, 2, 1));
        assert_eq!(bar.boundaries(40), (10, 20, 30));
    }

    #[test]
    fn test_boundaries_nothing_answered() {
        let bar = ScoreBar::new(project(3, 0, 0));
        assert_eq!(bar.boundaries(30), (0, 0, 30));
    }

    #[test]
    fn test_render_colors_cells() {
        let area = Rect::new(0, 0, 4, 1);
        let mut buf = Buffer::empty(area);
        ScoreBar::new(project(4, 2, 1)).render(area, &mut buf);

        let colors: Vec<Color> = (0..4u16)
            .map(|x| buf.cell((x, 0u16)).map(|c| c.fg).unwrap_or(Color::Reset))
            .collect();
        assert_eq!(
            colors,
            vec![Color::Red, Color::Yellow, Color::Green, Color::DarkGray]
        );
    }

    #[test]
    fn test_render_zero_area() {
        let area = Rect::new(0, 0, 0, 0);
        let mut buf = Buffer::empty(area);
        ScoreBar::new(project(1, 1, 1)).render(area, &mut buf);
    }
}
