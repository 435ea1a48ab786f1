use std::path::PathBuf;

use clap::Parser;
use review_sentiment_lib::infrastructure::config::ConfigOverrides;

/// Classify product reviews from uploaded CSV files.
#[derive(Debug, Parser)]
#[command(name = "review-sentiment", version, about)]
struct Cli {
    /// TOML configuration file (defaults to ./review-sentiment.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Path to the classifier artifact
    #[arg(short, long)]
    model: Option<PathBuf>,

    /// Directory holding the pre-built client bundle
    #[arg(long)]
    static_dir: Option<PathBuf>,
}

#[actix_web::main]
async fn main() {
    let cli = Cli::parse();
    let overrides = ConfigOverrides {
        port: cli.port,
        model_path: cli.model,
        static_dir: cli.static_dir,
    };

    if let Err(error) = review_sentiment_lib::run(cli.config.as_deref(), overrides).await {
        eprintln!("review-sentiment error: {error:#}");
        std::process::exit(1);
    }
}
