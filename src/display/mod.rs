//! Display targets for quoted figures and the board that publishes them.
//!
//! Every logical figure may be shown in several places. The board keeps one
//! snapshot of all rendered texts and replaces it in a single `watch` send,
//! so subscribers never observe a mix of old and new figures.

use crate::pricing::compute::round2;
use crate::pricing::models::DerivedQuote;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tokio::sync::watch;
use tracing::trace;

/// Stable identifiers of the price displays in the proposal modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DisplayTarget {
    #[serde(rename = "charged_price")]
    ChargedPrice,
    #[serde(rename = "article_price")]
    ArticlePrice,
    #[serde(rename = "express_fast_price")]
    ExpressFastPrice,
    #[serde(rename = "express_old_fast_price")]
    ExpressOldFastPrice,
    #[serde(rename = "express_normal_price")]
    ExpressNormalPrice,
    #[serde(rename = "express_old_normal_price")]
    ExpressOldNormalPrice,
    #[serde(rename = "total-charged-price")]
    TotalChargedPrice,
}

impl DisplayTarget {
    /// Returns all targets in display order.
    pub fn all() -> &'static [DisplayTarget] {
        &[
            DisplayTarget::ChargedPrice,
            DisplayTarget::ArticlePrice,
            DisplayTarget::ExpressFastPrice,
            DisplayTarget::ExpressOldFastPrice,
            DisplayTarget::ExpressNormalPrice,
            DisplayTarget::ExpressOldNormalPrice,
            DisplayTarget::TotalChargedPrice,
        ]
    }

    /// Element identifier on the page.
    pub fn id(&self) -> &'static str {
        match self {
            DisplayTarget::ChargedPrice => "charged_price",
            DisplayTarget::ArticlePrice => "article_price",
            DisplayTarget::ExpressFastPrice => "express_fast_price",
            DisplayTarget::ExpressOldFastPrice => "express_old_fast_price",
            DisplayTarget::ExpressNormalPrice => "express_normal_price",
            DisplayTarget::ExpressOldNormalPrice => "express_old_normal_price",
            DisplayTarget::TotalChargedPrice => "total-charged-price",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            DisplayTarget::ChargedPrice => "Charged price",
            DisplayTarget::ArticlePrice => "Article price",
            DisplayTarget::ExpressFastPrice => "Express (fast)",
            DisplayTarget::ExpressOldFastPrice => "Express (fast, before discount)",
            DisplayTarget::ExpressNormalPrice => "Express (normal)",
            DisplayTarget::ExpressOldNormalPrice => "Express (normal, before discount)",
            DisplayTarget::TotalChargedPrice => "Total charged",
        }
    }

    /// Whether the rendered text carries the currency marker.
    pub fn has_currency_suffix(&self) -> bool {
        matches!(
            self,
            DisplayTarget::ExpressFastPrice
                | DisplayTarget::ExpressOldFastPrice
                | DisplayTarget::ExpressNormalPrice
                | DisplayTarget::ExpressOldNormalPrice
        )
    }
}

impl fmt::Display for DisplayTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl DerivedQuote {
    /// Figures this quote provides, keyed by target. Express targets are
    /// absent when no express tiers were computed.
    pub fn figures(&self) -> Vec<(DisplayTarget, f64)> {
        let mut figures = vec![
            (DisplayTarget::ChargedPrice, self.charged_price),
            (DisplayTarget::ArticlePrice, self.article_price),
        ];

        if let Some(express) = &self.express {
            figures.push((DisplayTarget::ExpressFastPrice, express.fast));
            figures.push((DisplayTarget::ExpressOldFastPrice, express.old_fast));
            figures.push((DisplayTarget::ExpressNormalPrice, express.normal));
            figures.push((DisplayTarget::ExpressOldNormalPrice, express.old_normal));
        }

        figures.push((DisplayTarget::TotalChargedPrice, self.total_charged_price));
        figures
    }
}

/// Rendered texts of every display, as last published.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayedQuote {
    /// Sequence number of the recompute that produced this snapshot (0 before any)
    pub seq: u64,
    pub texts: BTreeMap<DisplayTarget, String>,
}

impl DisplayedQuote {
    pub fn get(&self, target: DisplayTarget) -> Option<&str> {
        self.texts.get(&target).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }
}

/// Publishes displayed quotes to any number of subscribers.
pub struct DisplayBoard {
    currency: String,
    tx: watch::Sender<DisplayedQuote>,
}

impl DisplayBoard {
    /// Creates an empty board rendering amounts with the given currency marker.
    pub fn new(currency: impl Into<String>) -> Self {
        let (tx, _) = watch::channel(DisplayedQuote::default());
        Self { currency: currency.into(), tx }
    }

    /// Returns a receiver that observes every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<DisplayedQuote> {
        self.tx.subscribe()
    }

    /// Returns the current snapshot.
    pub fn current(&self) -> DisplayedQuote {
        self.tx.borrow().clone()
    }

    /// Renders a single figure for a target.
    pub fn render(&self, target: DisplayTarget, value: f64) -> String {
        if target.has_currency_suffix() {
            format!("{}{}", round2(value), self.currency)
        } else {
            round2(value)
        }
    }

    /// Writes a derived quote to every display in one step.
    ///
    /// Targets the quote has no figure for keep their previous text.
    pub fn publish(&self, seq: u64, quote: &DerivedQuote) -> DisplayedQuote {
        let rendered: Vec<(DisplayTarget, String)> = quote
            .figures()
            .into_iter()
            .map(|(target, value)| (target, self.render(target, value)))
            .collect();

        self.tx.send_modify(|snapshot| {
            snapshot.seq = seq;
            for (target, text) in rendered {
                trace!("{} <- {}", target, text);
                snapshot.texts.insert(target, text);
            }
        });

        self.current()
    }
}
