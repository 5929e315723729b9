use crate::model::delivery::DispatchSummary;
use serde::Serialize;

/// Status of a background dispatch job as reported to polling clients.
///
/// `InProgress` carries the percentage of recipients attempted so far.
#[derive(Clone, Debug, Serialize)]
pub enum JobStatus {
    Pending,
    InProgress(u32),
    Completed(DispatchSummary),
    Failed(String),
}

impl JobStatus {
    /// Whether the job has reached `Completed` or `Failed`.
    pub fn is_finished(&self) -> bool {
        matches!(self, JobStatus::Completed(_) | JobStatus::Failed(_))
    }
}

/// Percentage of `done` out of `total`, rounded down. An empty job is complete.
pub fn progress_percent(done: usize, total: usize) -> u32 {
    if total == 0 {
        return 100;
    }
    ((done.min(total) * 100) / total) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_is_bounded() {
        assert_eq!(progress_percent(0, 3), 0);
        assert_eq!(progress_percent(1, 3), 33);
        assert_eq!(progress_percent(3, 3), 100);
        assert_eq!(progress_percent(5, 3), 100);
        assert_eq!(progress_percent(0, 0), 100);
    }

    #[test]
    fn only_terminal_states_are_finished() {
        assert!(!JobStatus::Pending.is_finished());
        assert!(!JobStatus::InProgress(50).is_finished());
        assert!(JobStatus::Failed("x".into()).is_finished());
    }
}
