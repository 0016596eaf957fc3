//! `crewkey list` — show which credential kinds are stored.

use crate::cli::output::{self, CredentialRow};
use crate::cli::{build_store, load_settings, record, Access, Cli};
use crate::credential::{CredentialKind, RetrieveOptions};
use crate::errors::Result;

/// Execute the `list` command.
pub async fn execute(cli: &Cli, masked: bool) -> Result<()> {
    let settings = load_settings(cli)?;
    let store = build_store(cli, &settings, Access::ReadOnly).await?;

    let stored = store.stored_credential_types().await?;
    record(
        cli,
        &settings,
        "list",
        None,
        &format!("{} stored", stored.len()),
    );

    let mut rows = Vec::with_capacity(CredentialKind::ALL.len());
    for kind in CredentialKind::ALL {
        let is_stored = stored.contains(&kind);
        let masked_value = if masked && is_stored {
            let retrieved = store.retrieve(kind, RetrieveOptions::default()).await?;
            retrieved.secret().map(|s| store.mask_secret(s, kind))
        } else {
            None
        };
        rows.push(CredentialRow {
            kind,
            stored: is_stored,
            masked: masked_value,
        });
    }

    output::info(&format!(
        "{} backend — {} of {} credential(s) stored",
        store.backend_name(),
        stored.len(),
        CredentialKind::ALL.len()
    ));
    output::print_credentials_table(&rows, masked);

    Ok(())
}
