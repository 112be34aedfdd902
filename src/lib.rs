//! exchange-quote - Price quotes and proposal checks for a link-building marketplace
//!
//! The pricing endpoint is the authority for raw figures; this crate derives
//! the displayed prices from them, publishes them atomically and discards
//! responses that a newer request has superseded.

pub mod commands;
pub mod config;
pub mod display;
pub mod format;
pub mod pricing;
pub mod session;
pub mod validation;

pub use config::Config;
pub use display::{DisplayBoard, DisplayTarget, DisplayedQuote};
pub use pricing::{PriceQuote, PricingModifiers, QuoteEngine, Recompute};
pub use session::{ModifierChange, ProposalContext, ProposalSession};
pub use validation::{ProposalForm, ProposalKind, ValidationReport};
