//! Goal streak calculation.

/// Default daily step goal.
pub const DEFAULT_DAILY_GOAL: u64 = 10_000;

/// Count the trailing days that met the goal.
///
/// `daily` is ordered oldest to newest. The scan runs newest to oldest and
/// stops at the first day below `goal`, so the streak is 0 whenever the most
/// recent day misses.
pub fn streak(daily: &[u64], goal: u64) -> usize {
    daily
        .iter()
        .rev()
        .take_while(|&&steps| steps >= goal)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stops_at_first_miss() {
        // Third-from-last misses, so only the two newest days count.
        let week = [12000, 9000, 11000, 10000, 9999, 10500, 10001];
        assert_eq!(streak(&week, DEFAULT_DAILY_GOAL), 2);
    }

    #[test]
    fn zero_when_most_recent_day_misses() {
        let week = [12000, 12000, 12000, 12000, 12000, 12000, 500];
        assert_eq!(streak(&week, DEFAULT_DAILY_GOAL), 0);
    }

    #[test]
    fn full_week_counts_every_day() {
        let week = [10000; 7];
        assert_eq!(streak(&week, DEFAULT_DAILY_GOAL), 7);
    }

    #[test]
    fn empty_input_has_no_streak() {
        assert_eq!(streak(&[], DEFAULT_DAILY_GOAL), 0);
    }

    #[test]
    fn goal_boundary_is_inclusive() {
        assert_eq!(streak(&[9999, 10000], 10000), 1);
    }

    #[test]
    fn custom_goal_is_respected() {
        let week = [4000, 6000, 5500, 5000];
        assert_eq!(streak(&week, 5000), 3);
    }
}
