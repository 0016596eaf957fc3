//! `crewkey exists` — presence check for scripts.
//!
//! Prints nothing; the answer is the exit status.

use crate::cli::{build_store, load_settings, parse_kind, record, Access, Cli};
use crate::errors::Result;

/// Execute the `exists` command. Returns whether the credential is stored.
pub async fn execute(cli: &Cli, kind: &str) -> Result<bool> {
    let kind = parse_kind(kind)?;
    let settings = load_settings(cli)?;
    let store = build_store(cli, &settings, Access::ReadOnly).await?;

    let present = store.exists(kind).await?;
    record(
        cli,
        &settings,
        "exists",
        Some(kind),
        if present { "present" } else { "absent" },
    );
    Ok(present)
}
