use clap::Parser;
use tracing_subscriber::EnvFilter;
use vaulta::cli::{Cli, Commands};

fn main() {
    // Diagnostics go to stderr so they never mix with entry output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("VAULTA_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { force } => vaulta::cli::commands::init::execute(&cli, force),
        Commands::Add {
            ref name,
            ref username,
            ref notes,
        } => vaulta::cli::commands::add::execute(
            &cli,
            name,
            username.as_deref(),
            notes.as_deref(),
        ),
        Commands::List => vaulta::cli::commands::list::execute(&cli),
        Commands::Get { ref name } => vaulta::cli::commands::get::execute(&cli, name),
        Commands::Delete { ref name, force } => {
            vaulta::cli::commands::delete::execute(&cli, name, force)
        }
        Commands::RotateKey => vaulta::cli::commands::rotate::execute(&cli),
        Commands::Completions { shell } => vaulta::cli::commands::completions::execute(shell),
    };

    if let Err(e) = result {
        tracing::debug!(error = ?e, "command failed");
        vaulta::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
