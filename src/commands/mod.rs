//! CLI command implementations.

pub mod quote;
pub mod validate;

pub use quote::{QuoteCommand, QuoteOptions};
pub use validate::{ValidateCommand, ValidationOutcome};
