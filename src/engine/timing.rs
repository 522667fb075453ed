use std::time::Duration;

use crate::morse;

pub const BASE_BUDGET_MS: u64 = 5000;
pub const PER_SYMBOL_MS: u64 = 400;
/// Granularity of the countdown.
pub const TICK_STEP: Duration = Duration::from_millis(100);
/// Pause between a terminal outcome and the automatic move to the next challenge.
pub const FEEDBACK_DELAY: Duration = Duration::from_millis(1500);

pub fn time_budget(challenge: &str) -> Duration {
    let symbols = morse::symbol_count(challenge) as u64;
    Duration::from_millis(BASE_BUDGET_MS + PER_SYMBOL_MS * symbols)
}

/// Remaining fraction of the budget, for the timer bar.
pub fn remaining_ratio(remaining: Duration, budget: Duration) -> f64 {
    if budget.is_zero() {
        return 0.0;
    }
    (remaining.as_secs_f64() / budget.as_secs_f64()).clamp(0.0, 1.0)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Urgency {
    Calm,
    Hurry,
    Critical,
}

pub fn urgency(ratio: f64) -> Urgency {
    if ratio < 0.25 {
        Urgency::Critical
    } else if ratio < 0.5 {
        Urgency::Hurry
    } else {
        Urgency::Calm
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget_single_dot() {
        assert_eq!(time_budget("E"), Duration::from_millis(5400));
    }

    #[test]
    fn test_budget_sos() {
        assert_eq!(time_budget("SOS"), Duration::from_millis(8600));
    }

    #[test]
    fn test_budget_ignores_unknown_chars() {
        assert_eq!(time_budget("?"), Duration::from_millis(BASE_BUDGET_MS));
    }

    #[test]
    fn test_remaining_ratio_clamps() {
        let budget = Duration::from_millis(1000);
        assert_eq!(remaining_ratio(Duration::from_millis(500), budget), 0.5);
        assert_eq!(remaining_ratio(Duration::from_millis(2000), budget), 1.0);
        assert_eq!(remaining_ratio(Duration::ZERO, Duration::ZERO), 0.0);
    }

    #[test]
    fn test_urgency_thresholds() {
        assert_eq!(urgency(0.9), Urgency::Calm);
        assert_eq!(urgency(0.4), Urgency::Hurry);
        assert_eq!(urgency(0.1), Urgency::Critical);
    }
}
