//! UI/Progress presentation layer
//!
//! Resolution reports progress through the [`ProgressReporter`] trait so the resolver does not
//! care whether a terminal is attached. Workers call the reporter concurrently, hence `&self`
//! receivers throughout.

pub mod display;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use crate::dependency::ResolvedDependency;

/// Progress reporter for dependency resolution
pub trait ProgressReporter: Send + Sync {
    /// More dependencies were admitted to the graph
    fn admitted(&self, count: usize);

    /// A worker picked up `path`
    fn started(&self, path: &str);

    /// `resolved` is settled; `kept` when it came from the lockfile without a fetch
    fn finished(&self, resolved: &ResolvedDependency, kept: bool);

    /// Resolution completed
    fn finish(&self);

    /// Abandon on error
    fn abandon(&self);
}

/// Interactive progress reporter with a visual progress bar on stderr
pub struct InteractiveProgressReporter {
    pb: ProgressBar,
}

impl InteractiveProgressReporter {
    pub fn new() -> Self {
        let style = ProgressStyle::default_bar()
            .template("[{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");

        let pb = ProgressBar::with_draw_target(Some(0), ProgressDrawTarget::stderr());
        pb.set_style(style);
        Self { pb }
    }
}

impl Default for InteractiveProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for InteractiveProgressReporter {
    fn admitted(&self, count: usize) {
        self.pb.inc_length(count as u64);
    }

    fn started(&self, path: &str) {
        self.pb.set_message(path.to_string());
    }

    fn finished(&self, resolved: &ResolvedDependency, kept: bool) {
        if kept {
            self.pb.set_message(format!("{} (locked)", resolved.path));
        }
        self.pb.inc(1);
    }

    fn finish(&self) {
        self.pb.finish_and_clear();
    }

    fn abandon(&self) {
        self.pb.abandon();
    }
}

/// Silent progress reporter for non-interactive runs and tests
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentProgressReporter;

impl ProgressReporter for SilentProgressReporter {
    fn admitted(&self, _count: usize) {}
    fn started(&self, _path: &str) {}
    fn finished(&self, _resolved: &ResolvedDependency, _kept: bool) {}
    fn finish(&self) {}
    fn abandon(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dependency::Dependency;

    #[test]
    fn test_interactive_reporter_counts_dependencies() {
        let reporter = InteractiveProgressReporter::new();
        reporter.admitted(2);
        reporter.started("org/a");
        reporter.finished(
            &ResolvedDependency::pinned(&Dependency::new("org/a", ""), "rev"),
            false,
        );
        assert_eq!(reporter.pb.length(), Some(2));
        assert_eq!(reporter.pb.position(), 1);
        reporter.finish();
    }

    #[test]
    fn test_silent_reporter_is_noop() {
        let reporter = SilentProgressReporter;
        reporter.admitted(3);
        reporter.started("org/a");
        reporter.finish();
        reporter.abandon();
    }
}
