//! Display functions for install results and plans

use console::Style;

use crate::reconcile::{LockDiff, ReconcilePlan};

/// Lines describing how the lockfile changed
pub fn diff_lines(diff: &LockDiff) -> Vec<String> {
    let mut lines = Vec::new();

    for entry in &diff.added {
        lines.push(format!(
            "  {} {} {}",
            Style::new().green().bold().apply_to("+"),
            Style::new().bold().apply_to(&entry.path),
            Style::new().dim().apply_to(short_revision(&entry.version)),
        ));
    }
    for update in &diff.updated {
        lines.push(format!(
            "  {} {} {} -> {}",
            Style::new().yellow().bold().apply_to("~"),
            Style::new().bold().apply_to(&update.path),
            Style::new().dim().apply_to(short_revision(&update.from)),
            short_revision(&update.to),
        ));
    }
    for entry in &diff.removed {
        lines.push(format!(
            "  {} {}",
            Style::new().red().bold().apply_to("-"),
            Style::new().bold().apply_to(&entry.path),
        ));
    }

    lines
}

/// Lines describing what an install would do
pub fn plan_lines(plan: &ReconcilePlan) -> Vec<String> {
    let mut lines = Vec::new();

    for dependency in &plan.fetch {
        let version = if dependency.has_version() {
            dependency.version.as_str()
        } else {
            "<tip>"
        };
        lines.push(format!(
            "  {} {} {}",
            Style::new().cyan().bold().apply_to("fetch"),
            Style::new().bold().apply_to(&dependency.path),
            Style::new().dim().apply_to(version),
        ));
    }
    for (path, locked) in &plan.keep {
        lines.push(format!(
            "  {} {} {}",
            Style::new().green().bold().apply_to("keep "),
            Style::new().bold().apply_to(path),
            Style::new().dim().apply_to(short_revision(&locked.version)),
        ));
    }
    for path in &plan.drop {
        lines.push(format!(
            "  {} {}",
            Style::new().red().bold().apply_to("drop "),
            Style::new().bold().apply_to(path),
        ));
    }

    lines
}

/// First 12 characters of a revision hash; short revisions are returned whole
pub fn short_revision(revision: &str) -> &str {
    match revision.char_indices().nth(12) {
        Some((index, _)) => &revision[..index],
        None => revision,
    }
}
