//! `crewkey delete` — remove a stored credential.

use dialoguer::Confirm;

use crate::cli::output;
use crate::cli::{build_store, load_settings, parse_kind, record, Access, Cli};
use crate::errors::{CrewKeyError, Result};

/// Execute the `delete` command.
pub async fn execute(cli: &Cli, kind: &str, force: bool) -> Result<()> {
    let kind = parse_kind(kind)?;
    let settings = load_settings(cli)?;

    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete the stored {}?", kind.label()))
            .default(false)
            .interact()
            .map_err(|e| CrewKeyError::CommandFailed(format!("confirm prompt: {e}")))?;

        if !confirmed {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    let store = build_store(cli, &settings, Access::ReadOnly).await?;

    if store.delete(kind).await? {
        record(cli, &settings, "delete", Some(kind), "removed");
        output::success(&format!("Deleted {}", kind.label()));
    } else {
        record(cli, &settings, "delete", Some(kind), "absent");
        output::info(&format!("No {} was stored.", kind.label()));
    }

    Ok(())
}
