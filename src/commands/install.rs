//! Install command implementation
//!
//! Installs everything `revlock.yaml` needs and prints how `revlock.lock` changed.

use std::path::PathBuf;

use console::Style;

use crate::cli::InstallArgs;
use crate::command::SystemCommandRunner;
use crate::commands::load_settings;
use crate::error::Result;
use crate::operations::{InstallOperation, InstallOutcome};
use crate::ui::InteractiveProgressReporter;
use crate::ui::display::diff_lines;

/// Run install command
pub fn run(workspace: Option<PathBuf>, args: InstallArgs) -> Result<()> {
    let settings = load_settings(workspace, args.root.as_deref())?
        .with_jobs(args.jobs)
        .with_update(args.update)
        .with_frozen(args.frozen);

    let reporter = InteractiveProgressReporter::new();
    let outcome = InstallOperation::new(&settings, SystemCommandRunner::new())
        .with_reporter(&reporter)
        .run()?;

    for line in summary(&outcome) {
        println!("{line}");
    }
    Ok(())
}

fn summary(outcome: &InstallOutcome) -> Vec<String> {
    if outcome.is_up_to_date() {
        return vec![format!(
            "{} ({} dependencies)",
            Style::new().green().bold().apply_to("Up to date"),
            outcome.resolved.len()
        )];
    }

    let mut lines = diff_lines(&outcome.diff);
    lines.push(format!(
        "{} {} dependencies",
        Style::new().green().bold().apply_to("Locked"),
        outcome.resolved.len()
    ));
    lines
}
