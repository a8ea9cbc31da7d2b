// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tidemark-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tidemark and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use rstest::rstest;

use super::{decode, encode, Params, ParamsDecodeError};

fn params(pairs: &[(&str, &str)]) -> Params {
    pairs.iter().copied().collect()
}

#[rstest]
#[case::empty(&[])]
#[case::single(&[("branch", "main")])]
#[case::filters_and_cursor(&[("branch", "release-1.4"), ("cursor", "b2Zmc2V0OjUw"), ("author", "kira")])]
#[case::needs_escaping(&[("branch", "feature/query strings"), ("q", "a=b&c")])]
#[case::unicode(&[("author", "Martina Kavíková"), ("tag", "v1.0-β")])]
fn round_trips_supported_parameter_sets(#[case] pairs: &[(&str, &str)]) {
    let original = params(pairs);
    let decoded = decode(&encode(&original)).expect("decode");
    assert_eq!(decoded, original);
}

#[test]
fn encode_omits_empty_values_and_preserves_order() {
    let mut p = params(&[("branch", "main"), ("cursor", "tok")]);
    p.set("ignored", "");
    assert_eq!(encode(&p), "branch=main&cursor=tok");

    // replacing a value keeps the key's position
    p.set("branch", "release-1.4");
    assert_eq!(encode(&p), "branch=release-1.4&cursor=tok");
}

#[test]
fn encode_escapes_reserved_bytes_with_uppercase_hex() {
    let p = params(&[("q", "a b&c=d")]);
    assert_eq!(encode(&p), "q=a%20b%26c%3Dd");
}

#[test]
fn decode_tolerates_leading_question_mark_and_plus_spaces() {
    let p = decode("?branch=perf+rewrite").expect("decode");
    assert_eq!(p.get("branch"), Some("perf rewrite"));
}

#[test]
fn decode_preserves_unknown_keys() {
    let p = decode("branch=main&x-experiment=7&cursor=tok").expect("decode");
    assert_eq!(p.get("x-experiment"), Some("7"));
    assert_eq!(p.len(), 3);
}

#[test]
fn decode_skips_valueless_and_empty_segments() {
    let p = decode("branch=main&&cursor&flag=").expect("decode");
    assert_eq!(p.len(), 1);
    assert_eq!(p.get("branch"), Some("main"));
}

#[test]
fn decode_lets_a_later_duplicate_win() {
    let p = decode("branch=main&branch=stable").expect("decode");
    assert_eq!(p.get("branch"), Some("stable"));
    assert_eq!(p.len(), 1);
}

#[rstest]
#[case::truncated("branch=ma%2")]
#[case::not_hex("branch=ma%zz")]
fn decode_rejects_malformed_percent_escapes(#[case] query: &str) {
    let err = decode(query).expect_err("malformed escape");
    assert!(matches!(err, ParamsDecodeError::InvalidPercentEscape { .. }), "got: {err:?}");
}

#[test]
fn decode_rejects_empty_keys() {
    let err = decode("=main").expect_err("empty key");
    assert_eq!(err, ParamsDecodeError::EmptyKey { position: 0 });
}

#[test]
fn decode_rejects_escapes_that_are_not_utf8() {
    let err = decode("branch=%FF%FE").expect_err("invalid utf8");
    assert!(matches!(err, ParamsDecodeError::InvalidUtf8 { .. }), "got: {err:?}");
}

#[test]
fn set_number_renders_canonical_decimal() {
    let mut p = Params::new();
    p.set_number("page", 3);
    p.set_number("delta", -12);
    assert_eq!(p.get("page"), Some("3"));
    assert_eq!(p.get("delta"), Some("-12"));
}

#[test]
fn merge_overwrites_clears_and_appends() {
    let mut p = params(&[("branch", "main"), ("cursor", "tok_a")]);

    let partial = params(&[("cursor", ""), ("branch", "stable"), ("author", "kira")]);
    p.merge(&partial);

    assert_eq!(p.get("cursor"), None);
    assert_eq!(p.get("branch"), Some("stable"));
    assert_eq!(p.get("author"), Some("kira"));
}

#[test]
fn remove_reports_whether_the_key_existed() {
    let mut p = params(&[("branch", "main")]);
    assert!(p.remove("branch"));
    assert!(!p.remove("branch"));
    assert!(p.is_empty());
}
