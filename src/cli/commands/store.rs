//! `crewkey store` — validate and save a credential.

use crate::cli::output;
use crate::cli::{build_store, load_settings, parse_kind, read_secret, record, Access, Cli};
use crate::credential::{StoreOptions, StoreOutcome};
use crate::errors::{CrewKeyError, Result};

/// Execute the `store` command.
pub async fn execute(
    cli: &Cli,
    kind: &str,
    value: Option<&str>,
    skip_validation: bool,
    biometric: bool,
) -> Result<()> {
    let kind = parse_kind(kind)?;
    let settings = load_settings(cli)?;
    let secret = read_secret(kind.label(), value)?;

    let mut options = StoreOptions::default();
    if skip_validation {
        options = options.skip_validation();
    }
    if biometric {
        options = options.require_biometric();
    }

    let store = build_store(cli, &settings, Access::ReadWrite).await?;
    let existed = store.exists(kind).await?;
    let outcome = store.store(kind, &secret, options).await?;

    match outcome {
        StoreOutcome::Stored => {
            record(cli, &settings, "store", Some(kind), "stored");
            let verb = if existed { "updated" } else { "stored" };
            output::success(&format!(
                "{} {verb} ({})",
                kind.label(),
                store.mask_secret(&secret, kind)
            ));
            Ok(())
        }
        StoreOutcome::InvalidFormat => {
            record(cli, &settings, "store", Some(kind), "invalid-format");
            if let Err(reason) = store.validator().check(kind, &secret) {
                output::tip(&format!("{}: {reason}", kind.label()));
            }
            output::tip("Use --skip-validation to store it anyway.");
            Err(CrewKeyError::CommandFailed(outcome.message().to_string()))
        }
        StoreOutcome::BiometricFailed(ref reason) => {
            record(cli, &settings, "store", Some(kind), "biometric-failed");
            Err(CrewKeyError::CommandFailed(format!(
                "{} ({reason})",
                outcome.message()
            )))
        }
    }
}
