//! `crewkey biometric` — report biometric availability.

use crate::cli::output;
use crate::cli::{build_gate, load_settings, Cli};
use crate::errors::Result;

/// Execute the `biometric` command.
pub async fn execute(cli: &Cli) -> Result<()> {
    let settings = load_settings(cli)?;
    let gate = build_gate(&settings);

    if gate.is_available().await {
        output::success("Biometric authentication is available.");
    } else {
        output::info("Biometric authentication is not available on this host.");
        output::tip("Commands run with --biometric will be refused.");
    }

    Ok(())
}
