//! Version command implementation

use crate::error::Result;
use crate::repository::VcsKind;

/// Run version command
pub fn run() -> Result<()> {
    println!("revlock {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Build info:");
    println!("  Rust version: {}", rustc_version());
    println!("  Profile: {}", build_profile());
    println!("  Backends: {}", backends());

    Ok(())
}

fn rustc_version() -> &'static str {
    env!("CARGO_PKG_RUST_VERSION")
}

fn build_profile() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "release"
    }
}

fn backends() -> String {
    VcsKind::ALL
        .iter()
        .map(|kind| kind.program())
        .collect::<Vec<_>>()
        .join(", ")
}
