//! Combines a fetched quote with the local modifiers into display figures.

use super::models::{DerivedQuote, ExpressTiers, PriceQuote, PricingModifiers};

/// Flat fee added when indexing is requested.
pub const INDEXATION_FEE: f64 = 1.0;

/// Factor applied when the publisher shares a sample first.
pub const SAMPLE_PUBLISH_FACTOR: f64 = 0.9;

/// Factor applied when the authority reports a multi-factor discount.
pub const MULTI_FACTOR_DISCOUNT: f64 = 0.95;

/// Derives every displayed figure from one quote and one modifier set.
///
/// Values are carried at full precision; rounding happens only when the
/// figures are rendered. The fallback branch (quote not `success`) scales by
/// the sample-publish factor alone and never yields express tiers.
pub fn derive(quote: &PriceQuote, modifiers: &PricingModifiers) -> DerivedQuote {
    let indexation = if modifiers.indexation_requested { INDEXATION_FEE } else { 0.0 };
    let discount = if modifiers.sample_publish_requested { SAMPLE_PUBLISH_FACTOR } else { 1.0 };

    if !quote.result.is_success() {
        let real_price = quote.total_price + indexation;
        let article_price = quote.redaction_price + indexation;

        return DerivedQuote {
            charged_price: real_price * discount,
            article_price: article_price * discount,
            total_charged_price: real_price * discount,
            express: None,
        };
    }

    let multi_factor = if quote.discount { MULTI_FACTOR_DISCOUNT } else { 1.0 };
    let factor = discount * multi_factor;

    let mut real_price = quote.total_price + quote.extra_price + indexation;
    let express_price =
        quote.total_price + quote.express_price + quote.extra_price + indexation;
    let mut article_price = quote.redaction_price + quote.extra_price + indexation;
    let normal_price = real_price;

    if modifiers.express_requested {
        real_price += quote.express_price;
        article_price += quote.express_price;
    }

    DerivedQuote {
        charged_price: real_price * factor,
        article_price: article_price * factor,
        total_charged_price: real_price * factor,
        express: Some(ExpressTiers {
            fast: express_price * factor,
            old_fast: express_price * discount,
            normal: normal_price * factor,
            old_normal: normal_price * discount,
        }),
    }
}

/// Formats a figure the way every display shows it.
pub fn round2(value: f64) -> String {
    format!("{:.2}", value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::models::QuoteResult;

    fn base_quote() -> PriceQuote {
        PriceQuote::success(10.0, 8.0, 2.0, 3.0)
    }

    fn modifiers(indexation: bool, sample: bool, express: bool) -> PricingModifiers {
        PricingModifiers {
            indexation_requested: indexation,
            sample_publish_requested: sample,
            express_requested: express,
            extra_word_count: 0,
        }
    }

    #[test]
    fn test_charged_is_total_plus_extra_without_modifiers() {
        for (total, extra) in [(10.0, 2.0), (49.99, 0.0), (120.5, 17.25), (0.0, 0.0)] {
            let quote = PriceQuote::success(total, 5.0, extra, 9.0);
            let derived = derive(&quote, &PricingModifiers::default());
            assert_eq!(round2(derived.charged_price), round2(total + extra));
        }
    }

    #[test]
    fn test_scenario_plain() {
        let derived = derive(&base_quote(), &PricingModifiers::default());
        assert_eq!(round2(derived.charged_price), "12.00");
        assert_eq!(round2(derived.article_price), "10.00");
        assert_eq!(round2(derived.total_charged_price), "12.00");
    }

    #[test]
    fn test_scenario_multi_factor_discount() {
        let quote = base_quote().with_discount(true);
        let derived = derive(&quote, &PricingModifiers::default());
        assert_eq!(round2(derived.charged_price), "11.40");
        assert_eq!(round2(derived.article_price), "9.50");
    }

    #[test]
    fn test_scenario_express() {
        let derived = derive(&base_quote(), &modifiers(false, false, true));
        assert_eq!(round2(derived.charged_price), "15.00");
        assert_eq!(round2(derived.article_price), "13.00");
        assert_eq!(round2(derived.total_charged_price), "15.00");
    }

    #[test]
    fn test_express_tiers() {
        let quote = base_quote().with_discount(true);
        let derived = derive(&quote, &modifiers(false, true, false));
        let tiers = derived.express.unwrap();

        // express basis 15, normal basis 12
        assert_eq!(round2(tiers.fast), round2(15.0 * (0.9 * 0.95)));
        assert_eq!(round2(tiers.old_fast), "13.50");
        assert_eq!(round2(tiers.normal), round2(12.0 * (0.9 * 0.95)));
        assert_eq!(round2(tiers.old_normal), "10.80");
    }

    #[test]
    fn test_express_tiers_ignore_express_toggle() {
        let off = derive(&base_quote(), &modifiers(false, false, false)).express.unwrap();
        let on = derive(&base_quote(), &modifiers(false, false, true)).express.unwrap();
        assert_eq!(off, on);
    }

    #[test]
    fn test_sample_publish_scales_by_point_nine() {
        let quote = base_quote();
        let plain = derive(&quote, &modifiers(false, false, false));
        let sample = derive(&quote, &modifiers(false, true, false));
        let back = derive(&quote, &modifiers(false, false, false));

        assert_eq!(sample.charged_price, plain.charged_price * SAMPLE_PUBLISH_FACTOR);
        assert_eq!(round2(sample.charged_price), "10.80");
        assert_eq!(back, plain);
    }

    #[test]
    fn test_indexation_adds_one() {
        let quote = base_quote();
        for express in [false, true] {
            let without = derive(&quote, &modifiers(false, false, express));
            let with = derive(&quote, &modifiers(true, false, express));

            assert_eq!(with.charged_price - without.charged_price, 1.0);
            assert_eq!(with.article_price - without.article_price, 1.0);
            assert_eq!(with.total_charged_price - without.total_charged_price, 1.0);

            let again = derive(&quote, &modifiers(false, false, express));
            assert_eq!(again, without);
        }
    }

    #[test]
    fn test_fallback_has_no_express_tiers() {
        let mut quote = base_quote().with_discount(true);
        quote.result = QuoteResult::Other("fail".to_string());

        let derived = derive(&quote, &modifiers(true, true, true));
        assert!(derived.express.is_none());
    }

    #[test]
    fn test_fallback_ignores_multi_factor_discount() {
        let mut quote = base_quote().with_discount(true);
        quote.result = QuoteResult::Other("fail".to_string());

        let derived = derive(&quote, &PricingModifiers::default());
        assert_eq!(round2(derived.charged_price), "10.00");
        assert_eq!(round2(derived.article_price), "8.00");

        let derived = derive(&quote, &modifiers(true, true, false));
        assert_eq!(round2(derived.charged_price), "9.90");
        assert_eq!(round2(derived.article_price), "8.10");
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(12.0), "12.00");
        assert_eq!(round2(11.399999999999999), "11.40");
        assert_eq!(round2(0.004), "0.00");
    }
}
