//! `crewkey audit` — display the credential audit log.
//!
//! Usage:
//!   crewkey audit               # show last 50 entries
//!   crewkey audit --last 20     # show last 20
//!   crewkey audit --since 7d    # entries from last 7 days

use chrono::{DateTime, TimeDelta, Utc};

use crate::cli::Cli;
use crate::errors::{CrewKeyError, Result};

/// Execute the `audit` command.
#[cfg(feature = "audit-log")]
pub fn execute(cli: &Cli, last: usize, since: Option<&str>) -> Result<()> {
    use crate::audit::AuditLog;
    use crate::cli::{data_dir, load_settings, output};

    let settings = load_settings(cli)?;
    let data_dir = data_dir(cli, &settings)?;

    let since_dt = since.map(parse_duration).transpose()?;

    if !AuditLog::db_path(&data_dir).exists() {
        output::info("No audit entries found.");
        return Ok(());
    }

    let audit = AuditLog::open(&data_dir)
        .ok_or_else(|| CrewKeyError::AuditError("failed to open audit database".into()))?;

    let entries = audit.query(last, since_dt)?;

    if entries.is_empty() {
        output::info("No audit entries found.");
        return Ok(());
    }

    print_audit_table(&entries);

    Ok(())
}

#[cfg(not(feature = "audit-log"))]
pub fn execute(_cli: &Cli, _last: usize, since: Option<&str>) -> Result<()> {
    since.map(parse_duration).transpose()?;
    Err(CrewKeyError::AuditError(
        "audit logging is not compiled in; rebuild with the `audit-log` feature".into(),
    ))
}

/// Parse a human-friendly duration string like "7d", "24h", "30m" into
/// the instant that long ago.
fn parse_duration(input: &str) -> Result<DateTime<Utc>> {
    let input = input.trim();

    let (num_str, unit): (&str, fn(i64) -> Option<TimeDelta>) =
        if let Some(s) = input.strip_suffix('d') {
            (s, TimeDelta::try_days)
        } else if let Some(s) = input.strip_suffix('h') {
            (s, TimeDelta::try_hours)
        } else if let Some(s) = input.strip_suffix('m') {
            (s, TimeDelta::try_minutes)
        } else {
            return Err(CrewKeyError::CommandFailed(format!(
                "invalid duration '{input}' — use format like 7d, 24h, or 30m"
            )));
        };

    let num: i64 = num_str.parse().map_err(|_| {
        CrewKeyError::CommandFailed(format!(
            "invalid duration '{input}' — number part is not valid"
        ))
    })?;

    unit(num)
        .and_then(|span| Utc::now().checked_sub_signed(span))
        .ok_or_else(|| CrewKeyError::CommandFailed(format!("duration '{input}' is out of range")))
}

#[cfg(feature = "audit-log")]
fn print_audit_table(entries: &[crate::audit::AuditEntry]) {
    use comfy_table::{ContentArrangement, Table};
    use console::style;

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Time", "Operation", "Kind", "Outcome"]);

    for entry in entries {
        table.add_row(vec![
            entry.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            colorize_operation(&entry.operation),
            entry.kind.clone().unwrap_or_else(|| "-".to_string()),
            entry.outcome.clone(),
        ]);
    }

    println!(
        "{}",
        style(format!("{} audit entries:", entries.len())).bold()
    );
    println!("{table}");
}

#[cfg(feature = "audit-log")]
fn colorize_operation(op: &str) -> String {
    use console::style;

    match op {
        "store" => style(op).green().to_string(),
        "retrieve" => style(op).blue().to_string(),
        "delete" => style(op).red().to_string(),
        "exists" | "list" => style(op).cyan().to_string(),
        _ => op.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_duration_days() {
        let dt = parse_duration("7d").unwrap();
        let diff = Utc::now() - dt;
        assert!((diff.num_days() - 7).abs() <= 1);
    }

    #[test]
    fn parse_duration_hours() {
        let dt = parse_duration("24h").unwrap();
        let diff = Utc::now() - dt;
        assert!((diff.num_hours() - 24).abs() <= 1);
    }

    #[test]
    fn parse_duration_minutes() {
        let dt = parse_duration(" 30m ").unwrap();
        let diff = Utc::now() - dt;
        assert!((diff.num_minutes() - 30).abs() <= 1);
    }

    #[test]
    fn parse_duration_out_of_range_is_an_error() {
        assert!(parse_duration("9999999999999d").is_err());
        assert!(parse_duration("9223372036854775807m").is_err());
        assert!(parse_duration("-9999999999999h").is_err());
    }

    #[test]
    fn parse_duration_invalid() {
        assert!(parse_duration("abc").is_err());
        assert!(parse_duration("7x").is_err());
        assert!(parse_duration("d").is_err());
    }

    #[cfg(feature = "audit-log")]
    #[test]
    fn colorize_operation_keeps_the_name() {
        console::set_colors_enabled(false);
        assert_eq!(colorize_operation("store"), "store");
        assert_eq!(colorize_operation("unknown"), "unknown");
    }
}
