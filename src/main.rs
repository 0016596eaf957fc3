use clap::Parser;
use crewkey::cli::commands;
use crewkey::cli::{output, Cli, Commands};
use tracing_subscriber::EnvFilter;

/// Log filter variable; defaults to `warn`.
const LOG_ENV: &str = "CREWKEY_LOG";

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    // stdout carries secrets for piping; logs stay on stderr.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Store {
            ref kind,
            ref value,
            skip_validation,
            biometric,
        } => {
            commands::store::execute(&cli, kind, value.as_deref(), skip_validation, biometric)
                .await
        }
        Commands::Get {
            ref kind,
            biometric,
            masked,
        } => commands::get::execute(&cli, kind, biometric, masked).await,
        Commands::Delete { ref kind, force } => {
            commands::delete::execute(&cli, kind, force).await
        }
        Commands::Exists { ref kind } => match commands::exists::execute(&cli, kind).await {
            Ok(true) => Ok(()),
            Ok(false) => std::process::exit(1),
            Err(e) => Err(e),
        },
        Commands::List { masked } => commands::list::execute(&cli, masked).await,
        Commands::Mask {
            ref kind,
            ref value,
        } => commands::mask::execute(kind, value.as_deref()),
        Commands::Validate {
            ref kind,
            ref value,
        } => commands::validate::execute(&cli, kind, value.as_deref()),
        Commands::Biometric => commands::biometric::execute(&cli).await,
        Commands::Audit { last, ref since } => {
            commands::audit_cmd::execute(&cli, last, since.as_deref())
        }
        Commands::Completions { shell } => commands::completions::execute(shell),
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "command failed");
        output::error(&e.to_string());
        std::process::exit(1);
    }
}
