//! exchange-quote - Price quotes and proposal checks for a link-building marketplace
//!
//! Mirrors the proposal modal: toggles modifiers, asks the pricing endpoint
//! for a quote and prints what each price display would show.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use exchange_quote::commands::{QuoteCommand, QuoteOptions, ValidateCommand};
use exchange_quote::config::{Config, OutputFormat};
use exchange_quote::format::Formatter;
use exchange_quote::pricing::WordTiers;
use exchange_quote::validation::ProposalKind;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "exchange-quote",
    version,
    about = "Price quotes and proposal checks for a link-building marketplace",
    long_about = "Computes the prices shown in the proposal modal of a backlink exchange and checks proposal forms before submission."
)]
struct Cli {
    /// Base URL of the marketplace
    #[arg(long, global = true, env = "EXQ_BASE_URL")]
    base_url: Option<String>,

    /// Proxy URL (e.g., socks5://host:port)
    #[arg(long, global = true, env = "EXQ_PROXY")]
    proxy: Option<String>,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true)]
    format: Option<OutputFormat>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Quote a publication on a listed site
    #[command(alias = "q")]
    Quote {
        /// Listing identifier
        site_id: String,

        /// Extra-word tier to buy
        #[arg(short, long)]
        words: Option<u32>,

        /// Request express delivery
        #[arg(long)]
        express: bool,

        /// Add the indexation fee
        #[arg(long)]
        indexing: bool,

        /// Apply the sample-publish reduction
        #[arg(long)]
        sample: bool,

        /// Pack order the quote is for
        #[arg(long)]
        pack_order: Option<String>,

        /// Read offered word tiers from saved modal HTML
        #[arg(long)]
        tiers_html: Option<PathBuf>,
    },

    /// Check a proposal form before submission
    #[command(alias = "v")]
    Validate {
        /// Proposal kind (e.g. contact_partner, submit_your_article)
        kind: ProposalKind,

        /// TOML file holding the form fields
        form: PathBuf,

        /// Publisher blacklist (comma-separated), overrides the form's list
        #[arg(long)]
        blacklist: Option<String>,
    },

    /// List offered extra-word tiers
    Tiers {
        /// Read tiers from saved modal HTML instead of the config
        #[arg(long)]
        html: Option<PathBuf>,
    },

    /// List proposal kinds and their checks
    Kinds,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    // Apply CLI overrides
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    if let Some(proxy) = cli.proxy {
        config.proxy = Some(proxy);
    }
    if let Some(format) = cli.format {
        config.format = format;
    }

    match cli.command {
        Commands::Quote { site_id, words, express, indexing, sample, pack_order, tiers_html } => {
            let options = QuoteOptions {
                site_id,
                pack_order_id: pack_order,
                words,
                express,
                indexing,
                sample,
                tiers_html,
            };

            let cmd = QuoteCommand::new(config);
            let output = cmd.execute(&options).await?;
            println!("{}", output);
        }

        Commands::Validate { kind, form, blacklist } => {
            let cmd = ValidateCommand::new(config);
            let outcome = cmd.execute(kind, &form, blacklist.as_deref())?;
            println!("{}", outcome.output);

            if !outcome.report.valid {
                std::process::exit(1);
            }
        }

        Commands::Tiers { html } => {
            let tiers = match html {
                Some(path) => {
                    let content = std::fs::read_to_string(&path)
                        .with_context(|| format!("Failed to read modal HTML: {}", path.display()))?;
                    WordTiers::from_html(&content)
                }
                None => config.word_tiers.clone(),
            };

            println!("{}", Formatter::new(config.format).format_tiers(&tiers));
        }

        Commands::Kinds => {
            println!("Proposal kinds:\n");
            for kind in ProposalKind::all() {
                let checks: Vec<&str> = kind.checks().iter().map(|c| c.description()).collect();
                println!("{:<22} {}", kind.as_str(), checks.join(", "));
            }
        }
    }

    Ok(())
}
