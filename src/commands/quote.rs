//! Quote command implementation.

use crate::config::Config;
use crate::format::Formatter;
use crate::pricing::{PricingAuthority, PricingClient, QuoteEngine, WordTiers};
use crate::session::{ModifierChange, ProposalContext, ProposalSession};
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

/// What the user toggled in the proposal modal.
#[derive(Debug, Clone, Default)]
pub struct QuoteOptions {
    pub site_id: String,
    pub pack_order_id: Option<String>,
    /// Extra-word tier; enables the addon when set
    pub words: Option<u32>,
    pub express: bool,
    pub indexing: bool,
    pub sample: bool,
    /// Modal HTML to read the offered tiers from
    pub tiers_html: Option<PathBuf>,
}

/// Computes the displayed quote for one listing.
pub struct QuoteCommand {
    config: Config,
}

impl QuoteCommand {
    /// Creates a new quote command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Fetches and formats the quote.
    pub async fn execute(&self, options: &QuoteOptions) -> Result<String> {
        let client = PricingClient::new(&self.config).context("Failed to create HTTP client")?;

        self.execute_with_authority(Arc::new(client), options).await
    }

    /// Executes with a provided pricing authority (for testing).
    pub async fn execute_with_authority(
        &self,
        authority: Arc<dyn PricingAuthority>,
        options: &QuoteOptions,
    ) -> Result<String> {
        let (tiers, preselected) = self.offered_tiers(options)?;
        debug!("Offered word tiers: {}", tiers);

        let engine = Arc::new(QuoteEngine::new(authority, self.config.currency.as_str()));
        let context = ProposalContext::new(options.site_id.as_str(), tiers)
            .with_pack_order(options.pack_order_id.clone());
        let mut session = ProposalSession::open(context, engine);

        session.apply(ModifierChange::Indexation(options.indexing))?;
        session.apply(ModifierChange::SamplePublish(options.sample))?;
        session.apply(ModifierChange::Express(options.express))?;

        if let Some(words) = preselected {
            session.apply(ModifierChange::WordTier(words))?;
        }

        if let Some(words) = options.words.filter(|&w| w > 0) {
            session.apply(ModifierChange::ExtraWordsAddon(true))?;
            session.apply(ModifierChange::WordTier(words))?;
        }

        info!("Quoting site {}", options.site_id);
        let outcome = session.recompute().await?;
        let displayed = outcome
            .displayed()
            .cloned()
            .context("Quote was superseded by a newer request")?;

        let formatter = Formatter::new(self.config.format);
        Ok(formatter.format_quote(&options.site_id, &displayed))
    }

    /// Offered tiers and the one pre-selected in the modal dropdown.
    fn offered_tiers(&self, options: &QuoteOptions) -> Result<(WordTiers, Option<u32>)> {
        let Some(path) = &options.tiers_html else {
            return Ok((self.config.word_tiers.clone(), None));
        };

        let html = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read modal HTML: {}", path.display()))?;
        let tiers = WordTiers::from_html(&html);
        let preselected = WordTiers::selected_in_html(&html).filter(|&w| tiers.contains(w));
        Ok((tiers, preselected))
    }
}
