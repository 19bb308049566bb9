/// Minimum, current and maximum achievable score, in percent
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Projection {
    pub min: f64,
    pub current: f64,
    pub max: f64,
}

/// Widths (percent of the bar) of the stacked score bar
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BarSegments {
    pub red: f64,
    pub yellow: f64,
    pub green: f64,
    pub rest: f64,
}

pub fn project(total: usize, attempted: usize, correct: usize) -> Projection {
    if total == 0 {
        return Projection::default();
    }

    let total_f = total as f64;
    let correct_f = correct as f64;
    let unanswered = total.saturating_sub(attempted) as f64;

    Projection {
        min: correct_f / total_f * 100.0,
        current: if attempted > 0 {
            correct_f / attempted as f64 * 100.0
        } else {
            0.0
        },
        max: (correct_f + unanswered) / total_f * 100.0,
    }
}

/// Running score shown next to the bar, rounded to a whole percent
pub fn running_percent(correct: usize, attempted: usize) -> u32 {
    (correct as f64 / attempted.max(1) as f64 * 100.0).round() as u32
}

impl Projection {
    /// Clamp into `[0, 100]` and force `min <= current <= max` for display
    pub fn clamped(&self) -> Self {
        let min = self.min.clamp(0.0, 100.0);
        let current = self.current.min(100.0).max(min);
        let max = self.max.min(100.0).max(current);
        Self { min, current, max }
    }

    pub fn segments(&self) -> BarSegments {
        let c = self.clamped();
        BarSegments {
            red: c.min,
            yellow: c.current - c.min,
            green: c.max - c.current,
            rest: 100.0 - c.max,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_project_nothing_attempted() {
        let p = project(4, 0, 0);
        assert_eq!(p.min, 0.0);
        assert_eq!(p.current, 0.0);
        assert_eq!(p.max, 100.0);
    }

    #[test]
    fn test_project_mixed_progress() {
        let p = project(3, 2, 1);
        assert!(approx(p.min, 100.0 / 3.0));
        assert!(approx(p.current, 50.0));
        assert!(approx(p.max, 200.0 / 3.0));
    }

    #[test]
    fn test_project_all_correct() {
        let p = project(5, 5, 5);
        assert_eq!(p, Projection { min: 100.0, current: 100.0, max: 100.0 });
    }

    #[test]
    fn test_project_zero_total() {
        assert_eq!(project(0, 0, 0), Projection::default());
    }

    #[test]
    fn test_project_bounds_hold_for_valid_inputs() {
        for total in 1..=12usize {
            for attempted in 0..=total {
                for correct in 0..=attempted {
                    let p = project(total, attempted, correct);
                    assert!(p.min >= 0.0 && p.min <= 100.0);
                    assert!(p.max >= 0.0 && p.max <= 100.0);
                    assert!(p.current >= 0.0 && p.current <= 100.0);
                    assert!(p.min <= p.max, "{total}/{attempted}/{correct}");
                    if attempted == 0 {
                        assert_eq!(p.current, 0.0);
                    }
                }
            }
        }
    }

    #[test]
    fn test_running_percent() {
        assert_eq!(running_percent(0, 0), 0);
        assert_eq!(running_percent(1, 3), 33);
        assert_eq!(running_percent(2, 3), 67);
        assert_eq!(running_percent(4, 4), 100);
    }

    #[test]
    fn test_clamped_orders_bands() {
        let p = Projection { min: 40.0, current: 10.0, max: 120.0 }.clamped();
        assert_eq!(p, Projection { min: 40.0, current: 40.0, max: 100.0 });

        let p = Projection { min: -5.0, current: 0.0, max: -1.0 }.clamped();
        assert_eq!(p, Projection { min: 0.0, current: 0.0, max: 0.0 });
    }

    #[test]
    fn test_segments_sum_to_full_bar() {
        let s = project(4, 2, 1).segments();
        assert!(approx(s.red, 25.0));
        assert!(approx(s.yellow, 25.0));
        assert!(approx(s.green, 25.0));
        assert!(approx(s.rest, 25.0));
        assert!(approx(s.red + s.yellow + s.green + s.rest, 100.0));
    }
}
