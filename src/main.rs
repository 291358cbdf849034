use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use smw_client::config::{WikiConfig, DEFAULT_CONFIG_PATH};
use smw_client::MediawikiApi;
use std::fs;
use std::process::ExitCode;
use std::time::Instant;
use tracing::{error, info, Level};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "smw")]
#[command(about = "Read and write pages of a Semantic MediaWiki")]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// YAML file with url, api, lgname and lgpassword
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH, global = true)]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the titles of a category's members
    Category {
        /// Category name without the `Category:` prefix
        name: String,
    },
    /// Print a page's free text and semantic properties as JSON
    Page {
        title: String,
    },
    /// Create a page or replace its text
    Create(CreateArgs),
    /// Write every page of a category as JSON into a directory
    Export(ExportArgs),
    /// Create one page per *.wiki file of a directory
    Import(ImportArgs),
}

#[derive(Args)]
struct CreateArgs {
    title: String,

    /// Read the page text from this file
    #[arg(short, long, conflicts_with = "text")]
    file: Option<String>,

    /// Page text
    #[arg(short, long)]
    text: Option<String>,
}

#[derive(Args)]
struct ExportArgs {
    /// Category name without the `Category:` prefix
    category: String,

    /// Output directory for page records
    #[arg(short, long)]
    output: String,
}

#[derive(Args)]
struct ImportArgs {
    /// Directory containing *.wiki files
    #[arg(short, long)]
    input: String,
}

async fn run(config: WikiConfig, command: Commands) -> Result<()> {
    let api = MediawikiApi::from_config(&config)
        .await
        .with_context(|| format!("Failed to log in to {}", config.api))?;

    match command {
        Commands::Category { name } => {
            for title in api.fetch_category(&name).await? {
                println!("{}", title);
            }
        }
        Commands::Page { title } => {
            let record = api.fetch_page(&title).await?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        Commands::Create(args) => {
            let content = match (args.file, args.text) {
                (Some(path), _) => fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read page file: {}", path))?,
                (None, Some(text)) => text,
                (None, None) => bail!("Either --file or --text is required"),
            };
            api.create_page(&args.title, &content).await?;
            println!("... page '{}' created", args.title);
        }
        Commands::Export(args) => {
            let start = Instant::now();
            let stats = smw_client::export::export_category(&api, &args.category, &args.output).await?;
            println!();
            println!("=== Summary ===");
            println!("Export time:        {:.2}s", start.elapsed().as_secs_f64());
            println!("Pages written:      {}", stats.pages_written);
            println!("Properties found:   {}", stats.properties_found);
        }
        Commands::Import(args) => {
            let start = Instant::now();
            let stats = smw_client::import::import_dir(&api, &args.input).await?;
            println!();
            println!("=== Summary ===");
            println!("Import time:        {:.2}s", start.elapsed().as_secs_f64());
            println!("Pages created:      {}", stats.pages_created);
            println!("Bytes uploaded:     {}", stats.bytes_uploaded);
        }
    }

    Ok(())
}

fn run_cli(cli: Cli) -> Result<()> {
    let mut config = WikiConfig::load(&cli.config)?;
    config.verbose |= cli.verbose > 0;

    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("smw-worker")
        .enable_io()
        .enable_time()
        .build()?;
    rt.block_on(run(config, cli.command))
}

/// `RUST_LOG` directives when given, otherwise the level picked by `-v`.
fn log_filter(verbose: u8, rust_log: Option<&str>) -> EnvFilter {
    if let Some(directives) = rust_log.filter(|d| !d.trim().is_empty()) {
        return EnvFilter::new(directives);
    }

    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    EnvFilter::new(LevelFilter::from_level(level).to_string())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(log_filter(cli.verbose, rust_log.as_deref()))
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    match run_cli(cli) {
        Ok(()) => {
            info!("Completed successfully");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Error: {:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_sets_level_without_rust_log() {
        assert_eq!(log_filter(0, None).max_level_hint(), Some(LevelFilter::WARN));
        assert_eq!(log_filter(1, None).max_level_hint(), Some(LevelFilter::INFO));
        assert_eq!(log_filter(2, None).max_level_hint(), Some(LevelFilter::DEBUG));
        assert_eq!(log_filter(5, None).max_level_hint(), Some(LevelFilter::TRACE));
    }

    #[test]
    fn rust_log_overrides_verbosity() {
        let filter = log_filter(0, Some("smw_client=debug,error"));
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn blank_rust_log_is_ignored() {
        assert_eq!(log_filter(1, Some("  ")).max_level_hint(), Some(LevelFilter::INFO));
    }
}
