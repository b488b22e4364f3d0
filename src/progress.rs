use indicatif::{ProgressBar, ProgressStyle};
use std::fmt;
use std::time::Duration;

/// A milestone line is printed every time the success count hits a multiple
/// of this.
pub const MILESTONE_EVERY: u64 = 500;

/// Live status display. Cloning shares the underlying spinner.
#[derive(Clone)]
pub struct Progress {
    pb: ProgressBar,
    milestones_to_stderr: bool,
}

impl Progress {
    /// A spinner on stderr. indicatif hides it when stderr is not a terminal.
    pub fn spinner() -> Self {
        let pb = ProgressBar::new_spinner();
        if let Ok(sty) = ProgressStyle::with_template("{spinner} {elapsed_precise} {msg}") {
            pb.set_style(sty);
        }
        Self {
            pb,
            milestones_to_stderr: false,
        }
    }

    pub fn hidden() -> Self {
        Self {
            pb: ProgressBar::hidden(),
            milestones_to_stderr: false,
        }
    }

    /// Sends milestone lines to stderr, leaving stdout for a machine-readable
    /// summary.
    pub fn with_milestones_to_stderr(mut self) -> Self {
        self.milestones_to_stderr = true;
        self
    }

    /// Prints `total` when it lands on a milestone.
    pub fn milestone(&self, total: u64) {
        if !is_milestone(total) {
            return;
        }
        if self.milestones_to_stderr {
            self.pb.suspend(|| eprintln!("{total}"));
        } else {
            self.pb.suspend(|| println!("{total}"));
        }
    }

    pub fn update(&self, successes: u64, elapsed: Duration) {
        let secs = elapsed.as_secs_f64().max(1e-6);
        self.pb.set_message(format!(
            "{successes} ok, {:.1} req/s",
            successes as f64 / secs
        ));
        self.pb.tick();
    }

    pub fn finish(&self) {
        self.pb.finish_and_clear();
    }
}

impl fmt::Debug for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Progress")
            .field("hidden", &self.pb.is_hidden())
            .field("milestones_to_stderr", &self.milestones_to_stderr)
            .finish()
    }
}

pub fn is_milestone(total: u64) -> bool {
    total != 0 && total % MILESTONE_EVERY == 0
}
