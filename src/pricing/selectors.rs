//! CSS selectors for the server-rendered proposal modal.
//!
//! Update this file when the modal markup changes.

use scraper::Selector;
use std::sync::LazyLock;

/// Selectors for the extra-words addon.
pub mod extra_words {
    use super::*;

    /// One offered word-count tier in the custom select.
    pub static OPTION: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse(
            ".extra-words .custom-option, \
             .custom-select .custom-option",
        )
        .unwrap()
    });

    /// Word count carried by each option.
    pub static VALUE_ATTR: &str = "data-value";

    /// Option highlighted as the current selection.
    pub static SELECTED: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse(".custom-option.selected").unwrap());
}
