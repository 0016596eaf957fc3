//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command. Secrets themselves are
//! printed with a bare `println!` by `get`, never through here.

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::credential::CredentialKind;

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// One row of the `list` table.
pub struct CredentialRow {
    pub kind: CredentialKind,
    pub stored: bool,
    /// Masked form, when requested and stored.
    pub masked: Option<String>,
}

/// Print every credential kind with its stored status.
///
/// The `Masked` column only appears when `show_masked` is set.
pub fn print_credentials_table(rows: &[CredentialRow], show_masked: bool) {
    if rows.iter().all(|r| !r.stored) {
        info("No credentials stored yet.");
        tip("Run `crewkey store <KIND>` to add your first credential.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    let mut header = vec!["Kind", "Label", "Stored"];
    if show_masked {
        header.push("Masked");
    }
    table.set_header(header);

    for r in rows {
        let stored = if r.stored {
            style("\u{2713}").green().to_string()
        } else {
            style("-").dim().to_string()
        };

        let mut row = vec![r.kind.as_str().to_string(), r.kind.label().to_string(), stored];
        if show_masked {
            row.push(r.masked.clone().unwrap_or_else(|| "-".to_string()));
        }
        table.add_row(row);
    }

    println!("{table}");
}
