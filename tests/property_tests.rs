//! Property-based tests for link assembly and the history list.

use proptest::prelude::*;
use utm_builder::clock::FixedClock;
use utm_builder::history::HISTORY_LIMIT;
use utm_builder::{decompose, sanitize, validate_and_normalize, CampaignParams, Field, History};

/// Free text with a mix of cases, punctuation, unicode and whitespace runs.
fn arb_text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 _\\-!?.,&=#%äöüÉ\t]{0,24}"
}

/// Text that survives validation as a required field.
fn arb_required() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9][a-zA-Z0-9 _\\-!&=]{0,16}"
}

fn arb_destination() -> impl Strategy<Value = String> {
    (
        prop_oneof![Just(""), Just("https://"), Just("http://")],
        "[a-z][a-z0-9]{2,12}",
        prop_oneof![Just(".com"), Just(".org"), Just(".de")],
        proptest::option::of("/[a-z0-9]{1,10}"),
    )
        .prop_map(|(scheme, host, tld, path)| {
            format!("{}{}{}{}", scheme, host, tld, path.unwrap_or_default())
        })
}

fn arb_params() -> impl Strategy<Value = CampaignParams> {
    (
        arb_destination(),
        arb_required(),
        arb_required(),
        arb_required(),
        arb_text(),
        arb_text(),
    )
        .prop_map(|(url, source, medium, campaign, term, content)| CampaignParams {
            url,
            source,
            medium,
            campaign,
            term,
            content,
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn sanitize_is_idempotent(input in arb_text()) {
        let once = sanitize(&input);
        prop_assert_eq!(sanitize(&once), once);
    }

    #[test]
    fn sanitize_uses_token_alphabet(input in any::<String>()) {
        let token = sanitize(&input);
        prop_assert!(token
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-'));
    }

    #[test]
    fn generated_query_has_exactly_present_keys(params in arb_params()) {
        let url = validate_and_normalize(&params).unwrap();
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();

        for field in Field::QUERY_FIELDS {
            let key = field.query_key().unwrap();
            let expected = field.is_required() || !params.get(field).trim().is_empty();
            let found: Vec<&(String, String)> = pairs.iter().filter(|(k, _)| k == key).collect();
            prop_assert_eq!(found.len(), usize::from(expected));
            if let Some((_, value)) = found.first() {
                prop_assert_eq!(value, &sanitize(params.get(field)));
            }
        }
    }

    #[test]
    fn missing_required_field_blocks_generation(
        params in arb_params(),
        blank in prop_oneof![
            Just(Field::Url),
            Just(Field::Source),
            Just(Field::Medium),
            Just(Field::Campaign),
        ],
        filler in prop_oneof![Just(""), Just(" "), Just("  \t"), Just("\n \u{00A0}")],
    ) {
        let mut params = params;
        params.set(blank, filler);
        let errors = validate_and_normalize(&params).unwrap_err();
        prop_assert_eq!(errors.fields(), vec![blank]);
    }

    #[test]
    fn decompose_recovers_normalized_fields(params in arb_params()) {
        let url = validate_and_normalize(&params).unwrap();
        let fields = decompose(url.as_str()).unwrap();

        prop_assert_eq!(fields.source, sanitize(&params.source));
        prop_assert_eq!(fields.medium, sanitize(&params.medium));
        prop_assert_eq!(fields.campaign, sanitize(&params.campaign));
        prop_assert_eq!(fields.term, sanitize(&params.term));
        prop_assert_eq!(fields.content, sanitize(&params.content));
    }

    #[test]
    fn history_stays_bounded_and_unique(picks in proptest::collection::vec(0u8..15, 0..40)) {
        let mut history = History::default();
        for (tick, pick) in picks.iter().enumerate() {
            let url = format!("https://example.com/{pick}");
            let before = history.len();
            let already_present = history.iter().any(|e| e.url == url);

            history = history.record(&url, &FixedClock(tick as i64));

            prop_assert!(history.len() <= HISTORY_LIMIT);
            prop_assert_eq!(&history.entries()[0].url, &url);
            if already_present {
                prop_assert_eq!(history.len(), before);
            }
            let mut urls: Vec<&str> = history.iter().map(|e| e.url.as_str()).collect();
            urls.sort_unstable();
            urls.dedup();
            prop_assert_eq!(urls.len(), history.len());
        }
    }
}
