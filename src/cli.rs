//! CLI definitions using clap derive API

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// revlock - reproducible dependency installer
///
/// Installs source dependencies from git, Mercurial and Bazaar and pins them to exact revisions.
#[derive(Parser, Debug)]
#[command(
    name = "revlock",
    author,
    version,
    color = clap::ColorChoice::Auto,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Reproducible dependency installer",
    long_about = "revlock fetches the dependencies listed in revlock.yaml from their version \
                  control systems (git, hg, bzr), resolves everything they depend on and pins \
                  each one to an exact revision in revlock.lock.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n    \
                  revlock install\n    \
                  revlock install --frozen\n    \
                  revlock install --update -j 4\n    \
                  revlock plan"
)]
pub struct Cli {
    /// Workspace directory holding revlock.yaml (defaults to current directory)
    #[arg(long, short = 'w', global = true, env = "REVLOCK_WORKSPACE")]
    pub workspace: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install dependencies from revlock.yaml and update revlock.lock
    Install(InstallArgs),

    /// Show what an install would fetch, keep and drop
    Plan(PlanArgs),

    /// Show version information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the install command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                   Install from revlock.yaml:\n    revlock install\n\n\
                   Fail if revlock.lock would change (CI/CD):\n    revlock install --frozen\n\n\
                   Re-resolve every dependency:\n    revlock install --update\n\n\
                   Install into a specific root:\n    REVLOCK_PATH=/opt/deps revlock install")]
pub struct InstallArgs {
    /// Fail if lockfile would change
    #[arg(long, conflicts_with = "update")]
    pub frozen: bool,

    /// Ignore revlock.lock and resolve every dependency again
    #[arg(long)]
    pub update: bool,

    /// Number of concurrent fetch workers (defaults to available CPUs)
    #[arg(long, short = 'j', env = "REVLOCK_JOBS")]
    pub jobs: Option<usize>,

    /// Install root search path; the first entry is used
    #[arg(long, env = "REVLOCK_PATH")]
    pub root: Option<String>,
}

/// Arguments for the plan command
#[derive(Parser, Debug)]
pub struct PlanArgs {
    /// Plan as if revlock.lock did not exist
    #[arg(long)]
    pub update: bool,

    /// Install root search path; the first entry is used
    #[arg(long, env = "REVLOCK_PATH")]
    pub root: Option<String>,
}

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    revlock completions --shell bash > ~/.bash_completion.d/revlock\n\n\
                  Generate zsh completions:\n    revlock completions --shell zsh > ~/.zfunc/_revlock\n\n\
                  Generate fish completions:\n    revlock completions --shell fish > ~/.config/fish/completions/revlock.fish")]
pub struct CompletionsArgs {
    /// Shell type (bash, elvish, fish, powershell, zsh)
    #[arg(long)]
    pub shell: String,
}
