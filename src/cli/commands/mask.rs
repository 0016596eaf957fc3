//! `crewkey mask` — print the display-safe form of a secret.
//!
//! Pure: nothing is read from or written to storage. An unknown kind
//! prints an empty line rather than an error.

use crate::cli::read_secret;
use crate::credential::mask_named;
use crate::errors::Result;

/// Execute the `mask` command.
pub fn execute(kind: &str, value: Option<&str>) -> Result<()> {
    let secret = read_secret("secret to mask", value)?;
    println!("{}", mask_named(&secret, kind));
    Ok(())
}
