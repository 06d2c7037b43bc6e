//! randomgif - download a random Giphy GIF for a tag into `<tag>.gif`

use apigrab::{GiphyClient, SavedGif};
use clap::{Parser, ValueEnum};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Output format for the saved file report
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum OutputFormat {
    /// Path of the saved file
    #[default]
    Text,
    /// JSON format
    Json,
}

/// randomgif - save a random GIF matching a tag
#[derive(Parser, Debug)]
#[command(name = "randomgif")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Tag to search for; the GIF is saved as <TAG>.gif
    tag: String,

    /// Giphy API key
    #[arg(long, env = "GIPHY_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Random GIF endpoint
    #[arg(long, env = "GIPHY_ENDPOINT", default_value = apigrab::fetchers::GIPHY_RANDOM_ENDPOINT)]
    endpoint: String,

    /// Directory to save the GIF in
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Custom User-Agent
    #[arg(long)]
    user_agent: Option<String>,

    /// API request timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Output format
    #[arg(long, short, default_value = "text")]
    output: OutputFormat,
}

#[tokio::main]
async fn main() {
    init_tracing();
    let args = Args::parse();

    let mut builder = GiphyClient::builder().endpoint(args.endpoint);
    if let Some(key) = args.api_key {
        builder = builder.api_key(key);
    }
    if let Some(ua) = args.user_agent {
        builder = builder.user_agent(ua);
    }
    if let Some(secs) = args.timeout {
        builder = builder.timeout(Duration::from_secs(secs));
    }

    let client = builder.build().unwrap_or_else(|e| fail(e));

    match client.save_random_gif(&args.tag, &args.output_dir).await {
        Ok(saved) => match args.output {
            OutputFormat::Text => writeln_safe(&format_text(&saved)),
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(&saved).unwrap_or_else(|e| {
                    eprintln!("Error serializing result: {}", e);
                    std::process::exit(1);
                });
                writeln_safe(&json);
            }
        },
        Err(e) => fail(e),
    }
}

/// Log to stderr, filtered by RUST_LOG (default: warn)
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn fail(e: apigrab::FetchError) -> ! {
    eprintln!("Error: {}", e);
    std::process::exit(1);
}

fn format_text(saved: &SavedGif) -> String {
    saved.path.display().to_string()
}

/// Write to stdout, exit silently on broken pipe
fn writeln_safe(s: &str) {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if let Err(e) = writeln!(handle, "{}", s) {
        if e.kind() == io::ErrorKind::BrokenPipe {
            std::process::exit(0);
        }
        eprintln!("Error writing to stdout: {}", e);
        std::process::exit(1);
    }
}
