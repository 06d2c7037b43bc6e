//! wikisummary - print the Wikipedia intro extract for a title

use apigrab::{ArticleSummary, WikipediaClient};
use clap::{Parser, ValueEnum};
use std::io::{self, Write};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Output format for extracts
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum OutputFormat {
    /// One extract per line
    #[default]
    Text,
    /// JSON format
    Json,
}

/// wikisummary - print the intro of a Wikipedia article
#[derive(Parser, Debug)]
#[command(name = "wikisummary")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Article title
    title: String,

    /// Wikipedia language code
    #[arg(long, default_value = apigrab::fetchers::DEFAULT_LANGUAGE)]
    lang: String,

    /// API endpoint (overrides --lang)
    #[arg(long, env = "WIKIPEDIA_ENDPOINT")]
    endpoint: Option<String>,

    /// Resolve redirects before extracting
    #[arg(long)]
    redirects: bool,

    /// Custom User-Agent
    #[arg(long)]
    user_agent: Option<String>,

    /// Request timeout in seconds
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

    let mut builder = WikipediaClient::builder()
        .language(args.lang)
        .follow_redirects(args.redirects);
    if let Some(endpoint) = args.endpoint {
        builder = builder.endpoint(endpoint);
    }
    if let Some(ua) = args.user_agent {
        builder = builder.user_agent(ua);
    }
    if let Some(secs) = args.timeout {
        builder = builder.timeout(Duration::from_secs(secs));
    }

    let client = builder.build().unwrap_or_else(|e| fail(e));

    match client.summary(&args.title).await {
        Ok(summary) => match args.output {
            OutputFormat::Text => {
                for line in format_text(&summary) {
                    writeln_safe(line);
                }
            }
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(&summary).unwrap_or_else(|e| {
                    eprintln!("Error serializing summary: {}", e);
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

/// Lines to print: every extract, in response order
fn format_text(summary: &ArticleSummary) -> impl Iterator<Item = &str> {
    summary.extracts.iter().map(|e| e.text.as_str())
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
