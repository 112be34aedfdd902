//! Price quoting: remote authority client, models, computation and engine.

pub mod client;
pub mod compute;
pub mod engine;
pub mod models;
pub mod selectors;
pub mod tiers;

pub use client::{PricingAuthority, PricingClient};
pub use compute::derive;
pub use engine::{QuoteEngine, Recompute};
pub use models::{DerivedQuote, ExpressTiers, PriceQuote, PricingModifiers, QuoteRequest, QuoteResult};
pub use tiers::WordTiers;
