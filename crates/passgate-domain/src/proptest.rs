//! Property-based tests for the domain crate.
//!
//! These tests use proptest to verify invariants around:
//! - Image matching by digest only
//! - Script fingerprint determinism
//! - Verdict aggregation

use crate::checks::{Check, ImageHashCheck, MfaRequiredCheck, Options};
use crate::engine::{compute_verdict, evaluate};
use crate::whitelist::{Whitelist, script_fingerprint};
use passgate_types::{CheckResult, Verdict};
use proptest::prelude::*;

fn arb_hex_digest() -> impl Strategy<Value = String> {
    prop::string::string_regex("[0-9a-f]{64}").expect("valid regex")
}

fn arb_image_name() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-z0-9./-]{0,20}:[a-z0-9.]{1,8}").expect("valid regex")
}

fn arb_result() -> impl Strategy<Value = CheckResult> {
    (any::<bool>(), any::<bool>()).prop_map(|(abort, mfa_required)| {
        let mut r = CheckResult::new("Any Check", "1.0.0");
        r.abort = abort;
        r.mfa_required = mfa_required;
        r
    })
}

proptest! {
    #[test]
    fn image_matches_iff_digest_matches(
        name_a in arb_image_name(),
        name_b in arb_image_name(),
        digest_a in arb_hex_digest(),
        digest_b in arb_hex_digest(),
    ) {
        let w = Whitelist {
            allowed_images: vec![format!("{name_a}@sha256:{digest_a}")],
            ..Whitelist::default()
        };
        let candidate = format!("{name_b}@sha256:{digest_b}");
        prop_assert_eq!(w.contains_image(&candidate), Ok(digest_a == digest_b));
    }

    #[test]
    fn candidate_without_digest_is_an_error(name in arb_image_name()) {
        let w = Whitelist::default();
        prop_assert!(w.contains_image(&name).is_err());
    }

    #[test]
    fn script_fingerprint_is_deterministic(lines in prop::collection::vec(".{0,20}", 0..6)) {
        let a = script_fingerprint(&lines);
        let b = script_fingerprint(&lines);
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(a.is_none(), lines.concat().is_empty());
    }

    #[test]
    fn script_fingerprint_changes_with_content(
        base in "[a-z ]{1,30}",
        extra in "[a-z]{1,5}",
    ) {
        let a = script_fingerprint(&[base.as_str()]);
        let b = script_fingerprint(&[base.as_str(), extra.as_str()]);
        prop_assert_ne!(a, b);
    }

    #[test]
    fn verdict_is_the_strictest_result(results in prop::collection::vec(arb_result(), 0..8)) {
        let verdict = compute_verdict(&results);
        let expected = if results.iter().any(|r| r.abort) {
            Verdict::Deny
        } else if results.iter().any(|r| r.mfa_required) {
            Verdict::RequireConfirmation
        } else {
            Verdict::Allow
        };
        prop_assert_eq!(verdict, expected);
    }

    #[test]
    fn evaluate_reports_every_check(images in 0usize..4, mfas in 0usize..4) {
        let abort: Options = serde_json::from_str(r#"{"abortOnFail": true}"#).expect("options");
        let mut checks: Vec<Check> = Vec::new();
        for i in 0..images {
            checks.push(ImageHashCheck::new(&abort, &format!("job{i}"), "broken").into());
        }
        for i in 0..mfas {
            checks.push(MfaRequiredCheck::new(&Options::new(), &format!("job{i}")).into());
        }

        let eval = evaluate(&checks, &Whitelist::default());
        prop_assert_eq!(eval.results.len(), images + mfas);

        let expected = if images > 0 {
            Verdict::Deny
        } else if mfas > 0 {
            Verdict::RequireConfirmation
        } else {
            Verdict::Allow
        };
        prop_assert_eq!(eval.verdict, expected);
    }
}
