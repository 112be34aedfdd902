//! Proposal session: the modal's modifier state and the events that change it.

use crate::display::DisplayedQuote;
use crate::pricing::{PricingModifiers, QuoteEngine, Recompute, WordTiers};
use anyhow::Result;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Everything the session needs to know about the listing being priced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProposalContext {
    pub site_id: String,
    pub pack_order_id: Option<String>,
    /// Proposal being resubmitted, if any
    pub proposal_id: Option<String>,
    /// Extra-word tiers offered for this listing
    pub tiers: WordTiers,
}

impl ProposalContext {
    pub fn new(site_id: impl Into<String>, tiers: WordTiers) -> Self {
        Self { site_id: site_id.into(), tiers, ..Default::default() }
    }

    pub fn with_pack_order(mut self, pack_order_id: Option<String>) -> Self {
        self.pack_order_id = pack_order_id;
        self
    }

    pub fn with_proposal(mut self, proposal_id: Option<String>) -> Self {
        self.proposal_id = proposal_id;
        self
    }
}

/// A user action that changes the pricing modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModifierChange {
    Indexation(bool),
    SamplePublish(bool),
    Express(bool),
    /// Pick one of the offered extra-word tiers
    WordTier(u32),
    /// Enable or disable the extra-words addon
    ExtraWordsAddon(bool),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("{words} extra words is not an offered tier (offered: {offered})")]
    TierNotOffered { words: u32, offered: String },
}

/// State of one open proposal modal.
pub struct ProposalSession {
    context: ProposalContext,
    engine: Arc<QuoteEngine>,
    modifiers: PricingModifiers,
    extra_words_enabled: bool,
    selected_tier: Option<u32>,
}

impl ProposalSession {
    /// Opens a session for a listing with default modifiers.
    pub fn open(context: ProposalContext, engine: Arc<QuoteEngine>) -> Self {
        debug!("Opening proposal session for site {}", context.site_id);
        Self {
            context,
            engine,
            modifiers: PricingModifiers::default(),
            extra_words_enabled: false,
            selected_tier: None,
        }
    }

    pub fn context(&self) -> &ProposalContext {
        &self.context
    }

    pub fn modifiers(&self) -> &PricingModifiers {
        &self.modifiers
    }

    pub fn extra_words_enabled(&self) -> bool {
        self.extra_words_enabled
    }

    pub fn selected_tier(&self) -> Option<u32> {
        self.selected_tier
    }

    /// What the price displays currently show.
    pub fn displayed(&self) -> DisplayedQuote {
        self.engine.current()
    }

    /// Puts every modifier back to its default, as when the modal is reopened.
    pub fn reset(&mut self) {
        self.modifiers = PricingModifiers::default();
        self.extra_words_enabled = false;
        self.selected_tier = None;
    }

    /// Applies a change to the local modifiers without fetching.
    pub fn apply(&mut self, change: ModifierChange) -> Result<&PricingModifiers, SessionError> {
        match change {
            ModifierChange::Indexation(on) => self.modifiers.indexation_requested = on,
            ModifierChange::SamplePublish(on) => self.modifiers.sample_publish_requested = on,
            ModifierChange::Express(on) => self.modifiers.express_requested = on,
            ModifierChange::WordTier(words) => {
                if !self.context.tiers.contains(words) {
                    return Err(SessionError::TierNotOffered {
                        words,
                        offered: self.context.tiers.to_string(),
                    });
                }
                self.selected_tier = Some(words);
                if self.extra_words_enabled {
                    self.modifiers.extra_word_count = words;
                }
            }
            ModifierChange::ExtraWordsAddon(true) => {
                self.extra_words_enabled = true;
                self.modifiers.extra_word_count = self.selected_tier.unwrap_or(0);
            }
            ModifierChange::ExtraWordsAddon(false) => {
                self.extra_words_enabled = false;
                self.selected_tier = None;
                self.modifiers.extra_word_count = 0;
            }
        }

        Ok(&self.modifiers)
    }

    /// Recomputes the quote for the current modifiers.
    pub async fn recompute(&self) -> Result<Recompute> {
        self.engine
            .recompute(
                &self.context.site_id,
                self.context.pack_order_id.as_deref(),
                &self.modifiers,
            )
            .await
    }

    /// Re-fetches the quote for the listing, e.g. when the modal is reopened.
    ///
    /// Same failure handling as [`handle`](Self::handle).
    pub async fn refresh(&self) -> Option<Recompute> {
        match self.recompute().await {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                warn!("Price preview not refreshed: {:#}", e);
                None
            }
        }
    }

    /// Applies a change and refreshes the displays.
    ///
    /// Fetch failures leave the displays as they were and are only logged.
    pub async fn handle(&mut self, change: ModifierChange) -> Result<Option<Recompute>, SessionError> {
        self.apply(change)?;
        Ok(self.refresh().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::DisplayTarget;
    use crate::pricing::{PriceQuote, PricingAuthority, QuoteRequest};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Authority pricing 1 unit per 100 extra words, failing when told to.
    struct MockAuthority {
        fail: Mutex<bool>,
        requests: Mutex<Vec<QuoteRequest>>,
    }

    impl MockAuthority {
        fn new() -> Self {
            Self { fail: Mutex::new(false), requests: Mutex::new(Vec::new()) }
        }

        fn set_failing(&self, fail: bool) {
            *self.fail.lock().unwrap() = fail;
        }

        fn last_request(&self) -> QuoteRequest {
            self.requests.lock().unwrap().last().cloned().unwrap()
        }
    }

    #[async_trait]
    impl PricingAuthority for MockAuthority {
        async fn fetch(&self, request: &QuoteRequest) -> Result<PriceQuote> {
            self.requests.lock().unwrap().push(request.clone());
            if *self.fail.lock().unwrap() {
                anyhow::bail!("connection refused");
            }
            let extra = request.word_count as f64 / 100.0;
            Ok(PriceQuote::success(10.0, 8.0, extra, 3.0))
        }
    }

    fn open_session() -> (ProposalSession, Arc<MockAuthority>) {
        let authority = Arc::new(MockAuthority::new());
        let engine = Arc::new(QuoteEngine::new(authority.clone(), "€"));
        let context = ProposalContext::new("42", WordTiers::new([100, 200, 500]))
            .with_pack_order(Some("9".to_string()));
        (ProposalSession::open(context, engine), authority)
    }

    fn charged(outcome: &Option<Recompute>) -> String {
        outcome
            .as_ref()
            .and_then(|o| o.displayed())
            .and_then(|d| d.get(DisplayTarget::ChargedPrice))
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_context_builder() {
        let context = ProposalContext::new("7", WordTiers::new([100]))
            .with_pack_order(Some("p".to_string()))
            .with_proposal(Some("x".to_string()));
        assert_eq!(context.site_id, "7");
        assert_eq!(context.pack_order_id.as_deref(), Some("p"));
        assert_eq!(context.proposal_id.as_deref(), Some("x"));
    }

    #[test]
    fn test_apply_toggles() {
        let (mut session, _) = open_session();

        session.apply(ModifierChange::Indexation(true)).unwrap();
        session.apply(ModifierChange::SamplePublish(true)).unwrap();
        session.apply(ModifierChange::Express(true)).unwrap();

        let modifiers = session.modifiers();
        assert!(modifiers.indexation_requested);
        assert!(modifiers.sample_publish_requested);
        assert!(modifiers.express_requested);
    }

    #[test]
    fn test_word_tier_requires_offered_value() {
        let (mut session, _) = open_session();

        let err = session.apply(ModifierChange::WordTier(250)).unwrap_err();
        assert_eq!(
            err,
            SessionError::TierNotOffered { words: 250, offered: "100, 200, 500".to_string() }
        );
        assert!(err.to_string().contains("250 extra words"));
        assert!(session.selected_tier().is_none());
    }

    #[test]
    fn test_word_tier_applies_only_with_addon() {
        let (mut session, _) = open_session();

        session.apply(ModifierChange::WordTier(200)).unwrap();
        assert_eq!(session.modifiers().extra_word_count, 0);

        session.apply(ModifierChange::ExtraWordsAddon(true)).unwrap();
        assert_eq!(session.modifiers().extra_word_count, 200);

        session.apply(ModifierChange::WordTier(500)).unwrap();
        assert_eq!(session.modifiers().extra_word_count, 500);
    }

    #[test]
    fn test_disabling_addon_clears_selection() {
        let (mut session, _) = open_session();

        session.apply(ModifierChange::ExtraWordsAddon(true)).unwrap();
        session.apply(ModifierChange::WordTier(100)).unwrap();
        session.apply(ModifierChange::ExtraWordsAddon(false)).unwrap();

        assert!(!session.extra_words_enabled());
        assert!(session.selected_tier().is_none());
        assert_eq!(session.modifiers().extra_word_count, 0);

        session.apply(ModifierChange::ExtraWordsAddon(true)).unwrap();
        assert_eq!(session.modifiers().extra_word_count, 0);
    }

    #[test]
    fn test_reset() {
        let (mut session, _) = open_session();

        session.apply(ModifierChange::Express(true)).unwrap();
        session.apply(ModifierChange::ExtraWordsAddon(true)).unwrap();
        session.apply(ModifierChange::WordTier(200)).unwrap();
        session.reset();

        assert_eq!(*session.modifiers(), PricingModifiers::default());
        assert!(!session.extra_words_enabled());
        assert!(session.selected_tier().is_none());
    }

    #[tokio::test]
    async fn test_handle_recomputes_on_every_change() {
        let (mut session, authority) = open_session();

        let outcome = session.handle(ModifierChange::Indexation(true)).await.unwrap();
        assert_eq!(charged(&outcome), "11.00");

        let outcome = session.handle(ModifierChange::Indexation(false)).await.unwrap();
        assert_eq!(charged(&outcome), "10.00");

        session.handle(ModifierChange::ExtraWordsAddon(true)).await.unwrap();
        let outcome = session.handle(ModifierChange::WordTier(500)).await.unwrap();
        assert_eq!(charged(&outcome), "15.00");

        let request = authority.last_request();
        assert_eq!(request.word_count, 500);
        assert_eq!(request.pack_order_id.as_deref(), Some("9"));

        let outcome = session.handle(ModifierChange::Express(true)).await.unwrap();
        assert_eq!(charged(&outcome), "18.00");
        assert!(authority.last_request().express);
    }

    #[tokio::test]
    async fn test_handle_swallows_fetch_failure() {
        let (mut session, authority) = open_session();

        session.handle(ModifierChange::SamplePublish(false)).await.unwrap();
        let before = session.engine.current();

        authority.set_failing(true);
        let outcome = session.handle(ModifierChange::Indexation(true)).await.unwrap();
        assert!(outcome.is_none());
        assert!(session.modifiers().indexation_requested);
        assert_eq!(session.engine.current(), before);
    }

    #[tokio::test]
    async fn test_handle_rejects_unknown_tier_without_fetching() {
        let (mut session, authority) = open_session();

        let result = session.handle(ModifierChange::WordTier(42)).await;
        assert!(result.is_err());
        assert!(authority.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_refresh_keeps_displays_on_failure() {
        let (session, authority) = open_session();

        let first = session.refresh().await;
        assert_eq!(charged(&first), "10.00");

        authority.set_failing(true);
        assert!(session.refresh().await.is_none());
        assert_eq!(session.displayed().get(DisplayTarget::ChargedPrice), Some("10.00"));
        assert_eq!(authority.last_request().pack_order_id.as_deref(), Some("9"));
    }
}
