//! Scoring module - line-clear points, gravity speed and level progression
//!
//! Classic rules: a clear of N rows is worth `LINE_SCORES[N - 1] * (level + 1)`.
//! Gravity starts at one row per second and speeds up by 50ms per level, down
//! to a 100ms floor.

use crate::types::{
    BASE_DROP_MS, DROP_INTERVAL_MIN_MS, DROP_STEP_MS, LINES_PER_LEVEL, LINE_SCORES,
};

/// Calculate line clear score
/// lines: number of rows cleared at once (1-4; larger counts score as 4)
/// level: current level (0-based)
pub fn line_clear_points(lines: usize, level: u32) -> u32 {
    if lines == 0 {
        return 0;
    }
    let base_score = LINE_SCORES[lines.min(LINE_SCORES.len()) - 1];
    base_score.saturating_mul(level.saturating_add(1))
}

/// Get gravity interval for a level (in milliseconds)
pub fn drop_interval_ms(level: u32) -> u32 {
    BASE_DROP_MS
        .saturating_sub(level.saturating_mul(DROP_STEP_MS))
        .max(DROP_INTERVAL_MIN_MS)
}

/// Whether the cumulative line count has passed the current level's threshold
pub fn level_up_due(total_lines: u32, level: u32) -> bool {
    total_lines > level.saturating_add(1).saturating_mul(LINES_PER_LEVEL)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classic_line_scores() {
        // Level 0
        assert_eq!(line_clear_points(1, 0), 40);
        assert_eq!(line_clear_points(2, 0), 100);
        assert_eq!(line_clear_points(3, 0), 300);
        assert_eq!(line_clear_points(4, 0), 1200);

        // Level 2
        assert_eq!(line_clear_points(1, 2), 120);
        assert_eq!(line_clear_points(2, 2), 300);
        assert_eq!(line_clear_points(3, 2), 900);
        assert_eq!(line_clear_points(4, 2), 3600);
    }

    #[test]
    fn test_zero_lines_score_nothing() {
        assert_eq!(line_clear_points(0, 7), 0);
    }

    #[test]
    fn test_drop_intervals() {
        assert_eq!(drop_interval_ms(0), 1000);
        assert_eq!(drop_interval_ms(1), 950);
        assert_eq!(drop_interval_ms(10), 500);
        assert_eq!(drop_interval_ms(18), 100);
        assert_eq!(drop_interval_ms(20), 100);
        assert_eq!(drop_interval_ms(u32::MAX), 100);
    }

    #[test]
    fn test_level_threshold_is_strictly_greater() {
        assert!(!level_up_due(10, 0));
        assert!(level_up_due(11, 0));
        assert!(!level_up_due(20, 1));
        assert!(level_up_due(21, 1));
        // Starting at a high level needs the full cumulative count.
        assert!(!level_up_due(11, 5));
    }
}
