//! Data models for price quotes, pricing modifiers and derived display figures.

use serde::{Deserialize, Deserializer, Serialize};

/// Outcome flag returned by the pricing authority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum QuoteResult {
    /// Extra-word pricing was engaged for this quote.
    Success,
    /// Any other outcome, kept verbatim.
    Other(String),
}

impl QuoteResult {
    pub fn is_success(&self) -> bool {
        matches!(self, QuoteResult::Success)
    }
}

impl From<String> for QuoteResult {
    fn from(value: String) -> Self {
        if value == "success" {
            QuoteResult::Success
        } else {
            QuoteResult::Other(value)
        }
    }
}

impl From<QuoteResult> for String {
    fn from(value: QuoteResult) -> Self {
        match value {
            QuoteResult::Success => "success".to_string(),
            QuoteResult::Other(other) => other,
        }
    }
}

impl Default for QuoteResult {
    fn default() -> Self {
        QuoteResult::Other(String::new())
    }
}

/// Authoritative price quote for one listing, as returned by the pricing endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    #[serde(default)]
    pub result: QuoteResult,
    /// Listing price including the base article
    #[serde(default, deserialize_with = "amount")]
    pub total_price: f64,
    /// Article writing price
    #[serde(default, deserialize_with = "amount")]
    pub redaction_price: f64,
    /// Price of the selected extra-word tier
    #[serde(default, deserialize_with = "amount")]
    pub extra_price: f64,
    /// Surcharge for express delivery
    #[serde(default, deserialize_with = "amount")]
    pub express_price: f64,
    /// Whether the multi-factor discount applies
    #[serde(default)]
    pub discount: bool,
}

impl PriceQuote {
    /// Creates a successful quote.
    pub fn success(total: f64, redaction: f64, extra: f64, express: f64) -> Self {
        Self {
            result: QuoteResult::Success,
            total_price: total,
            redaction_price: redaction,
            extra_price: extra,
            express_price: express,
            discount: false,
        }
    }

    /// Marks the quote as eligible for the multi-factor discount.
    pub fn with_discount(mut self, discount: bool) -> Self {
        self.discount = discount;
        self
    }
}

/// The endpoint sends amounts either as JSON numbers or as numeric strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum Amount {
    Number(f64),
    Text(String),
}

fn amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match Amount::deserialize(deserializer)? {
        Amount::Number(n) => Ok(n),
        Amount::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// Locally toggled options that adjust the quoted price.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingModifiers {
    pub indexation_requested: bool,
    pub sample_publish_requested: bool,
    pub express_requested: bool,
    /// One of the offered extra-word tiers, or 0 when the addon is off
    pub extra_word_count: u32,
}

/// Parameters of one request to the pricing authority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteRequest {
    pub site_id: String,
    pub word_count: u32,
    pub express: bool,
    pub pack_order_id: Option<String>,
}

impl QuoteRequest {
    /// Builds the request for a listing under the given modifiers.
    pub fn new(site_id: impl Into<String>, modifiers: &PricingModifiers) -> Self {
        Self {
            site_id: site_id.into(),
            word_count: modifiers.extra_word_count,
            express: modifiers.express_requested,
            pack_order_id: None,
        }
    }

    pub fn with_pack_order(mut self, pack_order_id: Option<String>) -> Self {
        self.pack_order_id = pack_order_id;
        self
    }
}

/// Express-tier figures, only computed when extra-word pricing is engaged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExpressTiers {
    pub fast: f64,
    /// Fast price before the multi-factor discount
    pub old_fast: f64,
    pub normal: f64,
    /// Normal price before the multi-factor discount
    pub old_normal: f64,
}

/// Unrounded figures derived from one quote and one modifier set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedQuote {
    pub charged_price: f64,
    pub article_price: f64,
    pub total_charged_price: f64,
    pub express: Option<ExpressTiers>,
}
