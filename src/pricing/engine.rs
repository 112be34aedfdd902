//! Quote engine: fetch, derive and publish, discarding out-of-order responses.

use crate::display::{DisplayBoard, DisplayedQuote};
use crate::pricing::client::PricingAuthority;
use crate::pricing::compute::derive;
use crate::pricing::models::{DerivedQuote, PricingModifiers, QuoteRequest};
use anyhow::{Context, Result};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tracing::debug;

/// Outcome of one recompute.
#[derive(Debug, Clone, PartialEq)]
pub enum Recompute {
    /// The response was the latest one issued and is now on display.
    Applied { quote: DerivedQuote, displayed: DisplayedQuote },
    /// A newer recompute was issued while this one was in flight.
    Stale { seq: u64, latest: u64 },
}

impl Recompute {
    pub fn is_applied(&self) -> bool {
        matches!(self, Recompute::Applied { .. })
    }

    pub fn displayed(&self) -> Option<&DisplayedQuote> {
        match self {
            Recompute::Applied { displayed, .. } => Some(displayed),
            Recompute::Stale { .. } => None,
        }
    }
}

/// Keeps every price display in sync with the latest authoritative quote.
pub struct QuoteEngine {
    authority: Arc<dyn PricingAuthority>,
    board: DisplayBoard,
    issued: AtomicU64,
    // Serializes the staleness check with publication.
    publish_lock: Mutex<()>,
}

impl QuoteEngine {
    /// Creates an engine publishing to a fresh board.
    pub fn new(authority: Arc<dyn PricingAuthority>, currency: impl Into<String>) -> Self {
        Self {
            authority,
            board: DisplayBoard::new(currency),
            issued: AtomicU64::new(0),
            publish_lock: Mutex::new(()),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<DisplayedQuote> {
        self.board.subscribe()
    }

    pub fn current(&self) -> DisplayedQuote {
        self.board.current()
    }

    /// Sequence number of the most recently issued recompute.
    pub fn latest_issued(&self) -> u64 {
        self.issued.load(Ordering::SeqCst)
    }

    /// Fetches a fresh quote for the listing and republishes every display.
    ///
    /// On a fetch error the displays are left untouched and the error is
    /// returned. A response that resolves after a newer recompute was issued
    /// is dropped and reported as [`Recompute::Stale`].
    pub async fn recompute(
        &self,
        site_id: &str,
        pack_order_id: Option<&str>,
        modifiers: &PricingModifiers,
    ) -> Result<Recompute> {
        let seq = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let request = QuoteRequest::new(site_id, modifiers)
            .with_pack_order(pack_order_id.map(str::to_string));

        debug!("Recompute #{} for site {}: {:?}", seq, site_id, modifiers);

        let quote = self
            .authority
            .fetch(&request)
            .await
            .with_context(|| format!("Failed to fetch price quote for site {}", site_id))?;

        let derived = derive(&quote, modifiers);

        let _guard = self.publish_lock.lock().unwrap_or_else(|e| e.into_inner());
        let latest = self.latest_issued();
        if seq != latest {
            debug!("Dropping stale quote #{} (latest #{})", seq, latest);
            return Ok(Recompute::Stale { seq, latest });
        }

        let displayed = self.board.publish(seq, &derived);
        Ok(Recompute::Applied { quote: derived, displayed })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::DisplayTarget;
    use crate::pricing::models::{PriceQuote, QuoteResult};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::time::Duration;

    /// Mock authority answering per word count, optionally after a delay.
    struct MockAuthority {
        quotes: HashMap<u32, (PriceQuote, u64)>,
        requests: Mutex<Vec<QuoteRequest>>,
    }

    impl MockAuthority {
        fn new() -> Self {
            Self { quotes: HashMap::new(), requests: Mutex::new(Vec::new()) }
        }

        fn with(mut self, words: u32, quote: PriceQuote, delay_ms: u64) -> Self {
            self.quotes.insert(words, (quote, delay_ms));
            self
        }

        fn requests(&self) -> Vec<QuoteRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PricingAuthority for MockAuthority {
        async fn fetch(&self, request: &QuoteRequest) -> Result<PriceQuote> {
            self.requests.lock().unwrap().push(request.clone());
            let Some((quote, delay_ms)) = self.quotes.get(&request.word_count).cloned() else {
                anyhow::bail!("Pricing request failed with status: 502 Bad Gateway");
            };
            if delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
            Ok(quote)
        }
    }

    fn words(count: u32) -> PricingModifiers {
        PricingModifiers { extra_word_count: count, ..Default::default() }
    }

    #[tokio::test]
    async fn test_recompute_publishes() {
        let authority = Arc::new(MockAuthority::new().with(0, PriceQuote::success(10.0, 8.0, 2.0, 3.0), 0));
        let engine = QuoteEngine::new(authority.clone(), "€");

        let outcome = engine.recompute("42", Some("7"), &words(0)).await.unwrap();
        assert!(outcome.is_applied());

        let displayed = engine.current();
        assert_eq!(displayed.seq, 1);
        assert_eq!(displayed.get(DisplayTarget::ChargedPrice), Some("12.00"));
        assert_eq!(displayed.get(DisplayTarget::ArticlePrice), Some("10.00"));
        assert_eq!(displayed.get(DisplayTarget::ExpressFastPrice), Some("15.00€"));

        let requests = authority.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].site_id, "42");
        assert_eq!(requests[0].pack_order_id.as_deref(), Some("7"));
    }

    #[tokio::test]
    async fn test_fetch_failure_leaves_displays_untouched() {
        let authority = Arc::new(MockAuthority::new().with(0, PriceQuote::success(10.0, 8.0, 2.0, 3.0), 0));
        let engine = QuoteEngine::new(authority, "€");

        engine.recompute("42", None, &words(0)).await.unwrap();
        let before = engine.current();

        let result = engine.recompute("42", None, &words(999)).await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Failed to fetch price quote"));
        assert_eq!(engine.current(), before);
    }

    #[tokio::test]
    async fn test_fallback_leaves_express_displays() {
        let mut fallback = PriceQuote::success(20.0, 15.0, 0.0, 0.0);
        fallback.result = QuoteResult::Other("fail".to_string());

        let authority = Arc::new(
            MockAuthority::new()
                .with(0, PriceQuote::success(10.0, 8.0, 2.0, 3.0), 0)
                .with(100, fallback, 0),
        );
        let engine = QuoteEngine::new(authority, "€");

        engine.recompute("42", None, &words(0)).await.unwrap();
        engine.recompute("42", None, &words(100)).await.unwrap();

        let displayed = engine.current();
        assert_eq!(displayed.get(DisplayTarget::ChargedPrice), Some("20.00"));
        assert_eq!(displayed.get(DisplayTarget::ExpressFastPrice), Some("15.00€"));
        assert_eq!(displayed.get(DisplayTarget::ExpressNormalPrice), Some("12.00€"));
    }

    #[tokio::test]
    async fn test_stale_response_never_overwrites_newer() {
        let authority = Arc::new(
            MockAuthority::new()
                .with(100, PriceQuote::success(10.0, 8.0, 1.0, 3.0), 150)
                .with(200, PriceQuote::success(10.0, 8.0, 5.0, 3.0), 0),
        );
        let engine = QuoteEngine::new(authority, "€");

        let slow_modifiers = words(100);
        let fast_modifiers = words(200);
        let slow = engine.recompute("42", None, &slow_modifiers);
        let fast = engine.recompute("42", None, &fast_modifiers);
        let (slow, fast) = tokio::join!(slow, fast);

        let fast = fast.unwrap();
        assert!(fast.is_applied());
        assert_eq!(slow.unwrap(), Recompute::Stale { seq: 1, latest: 2 });

        let displayed = engine.current();
        assert_eq!(displayed.seq, 2);
        assert_eq!(displayed.get(DisplayTarget::ChargedPrice), Some("15.00"));
    }

    #[tokio::test]
    async fn test_subscriber_only_sees_latest() {
        let authority = Arc::new(
            MockAuthority::new()
                .with(100, PriceQuote::success(10.0, 8.0, 1.0, 3.0), 100)
                .with(200, PriceQuote::success(10.0, 8.0, 5.0, 3.0), 0),
        );
        let engine = Arc::new(QuoteEngine::new(authority, "€"));
        let mut rx = engine.subscribe();

        let slow_modifiers = words(100);
        let fast_modifiers = words(200);
        let _ = tokio::join!(
            engine.recompute("42", None, &slow_modifiers),
            engine.recompute("42", None, &fast_modifiers)
        );

        assert!(rx.has_changed().unwrap());
        let seen = rx.borrow_and_update().clone();
        assert_eq!(seen.seq, 2);
        assert_eq!(seen.get(DisplayTarget::TotalChargedPrice), Some("15.00"));
    }
}
