use clap::Parser;
use garak_gateway::{cli, errors};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(!cli.no_color)
        .init();

    let result = match cli.command {
        cli::Commands::Serve(args) => cli::serve::handle_serve(args).await,
        cli::Commands::Scan(args) => cli::scan::handle_scan(args).await,
        cli::Commands::Validate(args) => cli::validate::handle_validate(args).await,
    };

    if let Err(e) = result {
        report_error(&e);
        std::process::exit(e.exit_code());
    }
}

fn report_error(e: &errors::GatewayError) {
    match e {
        errors::GatewayError::Validation(details) => {
            eprintln!("Error: Validation failed");
            for detail in details {
                eprintln!("  - {}", detail);
            }
        }
        other => eprintln!("Error: {}", other),
    }
}
