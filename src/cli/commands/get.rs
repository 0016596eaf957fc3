//! `crewkey get` — print a stored credential.
//!
//! The secret goes to stdout with nothing else, so it can be piped.

use crate::cli::{build_store, load_settings, parse_kind, record, Access, Cli};
use crate::credential::RetrieveOptions;
use crate::errors::{CrewKeyError, Result};

/// Execute the `get` command.
pub async fn execute(cli: &Cli, kind: &str, biometric: bool, masked: bool) -> Result<()> {
    let kind = parse_kind(kind)?;
    let settings = load_settings(cli)?;
    let store = build_store(cli, &settings, Access::ReadOnly).await?;

    let mut options = RetrieveOptions::default();
    if biometric {
        options = options.require_biometric();
    }

    let retrieved = store.retrieve(kind, options).await?;
    let Some(secret) = retrieved.secret() else {
        record(cli, &settings, "retrieve", Some(kind), "empty");
        let hint = if biometric {
            " or biometric authorization failed"
        } else {
            ""
        };
        return Err(CrewKeyError::CommandFailed(format!(
            "no {} available (not stored{hint})",
            kind.label()
        )));
    };

    record(cli, &settings, "retrieve", Some(kind), "found");
    if masked {
        println!("{}", store.mask_secret(secret, kind));
    } else {
        println!("{secret}");
    }

    Ok(())
}
