use clap::{Parser, Subcommand, Args};

#[derive(Parser)]
#[command(name = "garak-gateway", version, about = "HTTP gateway for garak LLM security scans")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server
    Serve(ServeArgs),
    /// Run a single scan from a request file and print the result
    Scan(ScanArgs),
    /// Validate a scan request file without running it
    Validate(ValidateArgs),
}

#[derive(Args, Clone)]
pub struct ServeArgs {
    /// Listen port (overrides PORT and the config file)
    #[arg(long)]
    pub port: Option<u16>,

    /// Listen address
    #[arg(long)]
    pub host: Option<String>,

    /// YAML configuration file
    #[arg(short, long)]
    pub config: Option<String>,
}

#[derive(Args, Clone)]
pub struct ScanArgs {
    /// JSON file holding the scan request
    #[arg(short, long)]
    pub request: String,

    /// YAML configuration file
    #[arg(short, long)]
    pub config: Option<String>,
}

#[derive(Args, Clone)]
pub struct ValidateArgs {
    /// JSON file holding the scan request
    #[arg(short, long)]
    pub request: String,
}
