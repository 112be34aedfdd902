//! The discrete set of extra-word tiers a proposal may purchase.

use super::selectors::extra_words;
use scraper::Html;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use tracing::{debug, trace};

/// Ordered set of offered extra-word counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<u32>", into = "Vec<u32>")]
pub struct WordTiers {
    tiers: BTreeSet<u32>,
}

impl WordTiers {
    /// Builds tiers from a list of word counts. Zero is not a tier.
    pub fn new(counts: impl IntoIterator<Item = u32>) -> Self {
        Self { tiers: counts.into_iter().filter(|&c| c > 0).collect() }
    }

    /// Extracts the offered tiers from the modal HTML.
    ///
    /// Options whose `data-value` is not a positive integer are skipped.
    pub fn from_html(html: &str) -> Self {
        let document = Html::parse_document(html);
        let mut tiers = BTreeSet::new();

        for option in document.select(&extra_words::OPTION) {
            let Some(raw) = option.value().attr(extra_words::VALUE_ATTR) else {
                continue;
            };

            match raw.trim().parse::<u32>() {
                Ok(count) if count > 0 => {
                    tiers.insert(count);
                }
                _ => trace!("Skipping word tier option {:?}", raw),
            }
        }

        debug!("Parsed {} word tiers from modal", tiers.len());
        Self { tiers }
    }

    /// Returns the tier pre-selected in the modal HTML, if any.
    pub fn selected_in_html(html: &str) -> Option<u32> {
        let document = Html::parse_document(html);
        document
            .select(&extra_words::SELECTED)
            .next()
            .and_then(|e| e.value().attr(extra_words::VALUE_ATTR))
            .and_then(|v| v.trim().parse().ok())
            .filter(|&count: &u32| count > 0)
    }

    pub fn contains(&self, count: u32) -> bool {
        self.tiers.contains(&count)
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.tiers.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }
}

impl From<Vec<u32>> for WordTiers {
    fn from(counts: Vec<u32>) -> Self {
        Self::new(counts)
    }
}

impl From<WordTiers> for Vec<u32> {
    fn from(tiers: WordTiers) -> Self {
        tiers.tiers.into_iter().collect()
    }
}

impl fmt::Display for WordTiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let list: Vec<String> = self.tiers.iter().map(|t| t.to_string()).collect();
        write!(f, "{}", list.join(", "))
    }
}
