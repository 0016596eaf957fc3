//! `crewkey validate` — check a secret's format without storing it.

use crate::cli::output;
use crate::cli::{load_settings, parse_kind, read_secret, Cli};
use crate::credential::StoreOutcome;
use crate::errors::{CrewKeyError, Result};

/// Execute the `validate` command.
pub fn execute(cli: &Cli, kind: &str, value: Option<&str>) -> Result<()> {
    let kind = parse_kind(kind)?;
    let settings = load_settings(cli)?;
    let secret = read_secret(kind.label(), value)?;

    match settings.validator().check(kind, &secret) {
        Ok(()) => {
            output::success(&format!("Looks like a valid {}", kind.label()));
            Ok(())
        }
        Err(reason) => Err(CrewKeyError::CommandFailed(format!(
            "{}: {reason}",
            StoreOutcome::InvalidFormat.message()
        ))),
    }
}
