use std::time::Instant;

/// Tallies for one pass through a level.
#[derive(Clone, Debug)]
pub struct LevelSummary {
    pub level_index: Option<usize>,
    pub level_name: String,
    pub challenges: usize,
    pub correct: usize,
    pub incorrect_attempts: usize,
    pub timeouts: usize,
    pub started_at: Instant,
    pub finished_at: Option<Instant>,
}

impl LevelSummary {
    pub fn new(level_index: Option<usize>, level_name: &str, challenges: usize, now: Instant) -> Self {
        Self {
            level_index,
            level_name: level_name.to_string(),
            challenges,
            correct: 0,
            incorrect_attempts: 0,
            timeouts: 0,
            started_at: now,
            finished_at: None,
        }
    }

    pub fn elapsed_secs(&self) -> f64 {
        match self.finished_at {
            Some(end) => end.duration_since(self.started_at).as_secs_f64(),
            None => 0.0,
        }
    }

    pub fn status_line(&self) -> String {
        let label = match self.level_index {
            Some(idx) => format!("Level {}", idx + 1),
            None => "Practice".to_string(),
        };
        format!(
            "{label} complete: {} correct, {} misses, {} timeouts ({:.0}s)",
            self.correct,
            self.incorrect_attempts,
            self.timeouts,
            self.elapsed_secs()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_practice_status_line() {
        let t0 = Instant::now();
        let mut summary = LevelSummary::new(None, "Practice", 3, t0);
        summary.correct = 3;
        summary.timeouts = 2;
        summary.finished_at = Some(t0 + Duration::from_secs(40));
        assert_eq!(
            summary.status_line(),
            "Practice complete: 3 correct, 0 misses, 2 timeouts (40s)"
        );
    }

    #[test]
    fn test_status_line_uses_one_based_level() {
        let t0 = Instant::now();
        let mut summary = LevelSummary::new(Some(4), "x", 2, t0);
        summary.correct = 2;
        summary.incorrect_attempts = 1;
        summary.finished_at = Some(t0 + Duration::from_secs(12));
        assert_eq!(
            summary.status_line(),
            "Level 5 complete: 2 correct, 1 misses, 0 timeouts (12s)"
        );
    }
}
