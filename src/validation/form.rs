//! Proposal form contents as submitted from the modal.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Field values of a proposal form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalForm {
    /// Target URLs for the links
    #[serde(default)]
    pub urls: Vec<String>,

    /// Anchor texts for the links
    #[serde(default)]
    pub anchors: Vec<String>,

    /// Image source fields, present only when the article carries images
    #[serde(default)]
    pub image_sources: Vec<String>,

    /// Message to the group partner
    #[serde(default)]
    pub partner_message: Option<String>,

    /// Substrings the publisher refuses in urls or anchors
    #[serde(default)]
    pub blacklist: Vec<String>,

    /// Copywriting conditions certified by the advertiser
    #[serde(default)]
    pub copywriting_certified: bool,

    /// Refusal conditions acknowledged by the advertiser
    #[serde(default)]
    pub refuse_condition_accepted: bool,

    /// All form fields marked required carry a value
    #[serde(default)]
    pub required_fields_complete: bool,
}

impl ProposalForm {
    /// Loads a form from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading proposal form from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read form file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse form file: {}", path.display()))
    }

    /// Parses the publisher's comma-separated blacklist field.
    pub fn with_blacklist_field(mut self, field: &str) -> Self {
        self.blacklist = field.split(',').map(|s| s.trim().to_string()).collect();
        self
    }
}
