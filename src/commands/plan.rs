//! Plan command implementation

use std::path::PathBuf;

use crate::cli::PlanArgs;
use crate::commands::load_settings;
use crate::error::Result;
use crate::operations::PlanOperation;
use crate::ui::display::plan_lines;

/// Run plan command
pub fn run(workspace: Option<PathBuf>, args: PlanArgs) -> Result<()> {
    let settings = load_settings(workspace, args.root.as_deref())?.with_update(args.update);
    let plan = PlanOperation::new(&settings).run()?;

    if plan.is_satisfied() {
        println!("Nothing to fetch ({} locked)", plan.keep.len());
        return Ok(());
    }
    for line in plan_lines(&plan) {
        println!("{line}");
    }
    Ok(())
}
