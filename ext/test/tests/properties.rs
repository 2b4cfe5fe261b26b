//! Whole-engine properties checked against in-memory preferences
//!
//! Run with: cargo test -p prefmatch-test --test properties

use chrono::{DateTime, TimeZone, Utc};
use prefmatch::{decode_condition_matchers, encode_condition_matchers, SkusOrder};
use prefmatch_test::prelude::*;
use std::collections::BTreeMap;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
}

fn prefs() -> TestPrefs {
    TestPrefs::new()
        .with_profile("enabled", true)
        .with_profile("views", 12i64)
        .with_profile("ratio", 0.25)
        .with_profile("host", "foo.baz.bar")
        .with_profile("installed", 1_718_193_600i64)
        .with_profile("list", vec![PrefValue::from("a"), PrefValue::from("b")])
        .with_local_state("p3a.enabled", false)
        .with_virtual(
            VirtualPrefs::new()
                .with_browser("1.71.118", "release")
                .with_locale("en", "US")
                .with_skus_order(
                    "production",
                    "search.brave.com",
                    SkusOrder {
                        status: "active".into(),
                        created_at: "2024-05-01T00:00:00Z".into(),
                        expires_at: "2024-07-01T00:00:00Z".into(),
                        last_paid_at: "2024-06-01T00:00:00Z".into(),
                    },
                ),
        )
}

const PAIRS: &[(&str, &str)] = &[
    ("enabled", "1"),
    ("enabled", "0"),
    ("views", "[R>]:10"),
    ("views", "[R=]:11.9"),
    ("ratio", "[R≤]:0.25"),
    ("host", "foo?baz.*"),
    ("host", "^baz"),
    ("installed", "[T=]:3"),
    ("installed", "[T<]:2"),
    ("list|1", "b"),
    ("list", "*"),
    ("missing", "*"),
    ("[!]:missing", "*"),
    ("[!]:enabled", "1"),
    ("p3a.enabled", "0"),
    ("[virtual]:browser|build_channel", "release"),
    ("[virtual]:skus|production|search.brave.com|status", "active"),
    ("[virtual]:skus|production|search.brave.com|created_at", "[T≥]:45"),
];

// ═══════════════════════════════════════════════════════════════════════════════
// Purity
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_evaluation_is_idempotent() {
    let prefs = prefs();
    for &(path, condition) in PAIRS {
        let m = matchers(&[(path, condition)]);
        let first = match_conditions_at(&prefs, &m, now());
        for _ in 0..3 {
            assert_eq!(match_conditions_at(&prefs, &m, now()), first, "{path} ~ {condition}");
        }
    }
}

#[test]
fn test_trace_agrees_with_evaluation() {
    let prefs = prefs();
    let all = matchers(PAIRS);
    let trace = match_conditions_with_trace(&prefs, &all, now());
    assert_eq!(trace.matched, match_conditions_at(&prefs, &all, now()));
    assert_eq!(trace.steps.len(), PAIRS.len());
    for (step, &(path, condition)) in trace.steps.iter().zip(PAIRS) {
        let single = match_conditions_at(&prefs, &matchers(&[(path, condition)]), now());
        assert_eq!(step.matched, single, "{step}");
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Composition
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_and_of_pairs() {
    let prefs = prefs();
    for &a in PAIRS {
        for &b in PAIRS {
            let combined = match_conditions_at(&prefs, &matchers(&[a, b]), now());
            let separate = match_conditions_at(&prefs, &matchers(&[a]), now())
                && match_conditions_at(&prefs, &matchers(&[b]), now());
            assert_eq!(combined, separate, "{a:?} AND {b:?}");
        }
    }
}

#[test]
fn test_not_is_absence() {
    let prefs = prefs();
    for &(path, _) in PAIRS {
        let bare = strip_path(path);
        let present = resolve(&prefs, bare).is_some_and(|v| v.is_leaf());
        for condition in ["*", "", "1", "[R>]:0", "[T≥]:0", "^never$"] {
            let negated = format!("[!]:{bare}");
            let result =
                match_conditions_at(&prefs, &matchers(&[(negated.as_str(), condition)]), now());
            assert_eq!(result, !present, "{negated} ~ {condition}");
        }
    }
}

fn strip_path(path: &str) -> &str {
    prefmatch::strip_path_prefixes(path)
}

#[test]
fn test_expected_outcomes() {
    let prefs = prefs();
    let expected = [
        true, false, true, false, true, true, false, true, false, true, false, false, true,
        false, true, true, true, true,
    ];
    for (&(path, condition), expect) in PAIRS.iter().zip(expected) {
        assert_eq!(
            match_conditions_at(&prefs, &matchers(&[(path, condition)]), now()),
            expect,
            "{path} ~ {condition}"
        );
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Resolution
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_nested_resolution() {
    let inner = PrefValue::Map(BTreeMap::from([(
        "bar".to_string(),
        PrefValue::List(vec![PrefValue::from(1i64), PrefValue::from("two")]),
    )]));
    let prefs = TestPrefs::new().with_profile(
        "foo.dict",
        PrefValue::Map(BTreeMap::from([("search.brave.com".to_string(), inner)])),
    );

    assert_eq!(
        resolve(&prefs, "foo.dict|search.brave.com|bar|1"),
        Some(PrefValue::from("two"))
    );
    assert_eq!(
        resolve_path(&prefs, "foo.dict|search|brave.com"),
        Err(PathError::KeyNotFound {
            key: "search".into()
        })
    );
    assert!(match_conditions(
        &prefs,
        &matchers(&[("foo.dict|search.brave.com|bar|0", "[R=]:1")])
    ));
}

#[test]
fn test_virtual_prefs_are_isolated() {
    let prefs = TestPrefs::new()
        .with_profile("[virtual]:browser", "stored")
        .with_virtual(VirtualPrefs::new().with_operating_system("mac"));

    assert!(resolve(&prefs, "[virtual]:browser").is_none());
    assert!(match_conditions(
        &prefs,
        &matchers(&[("[virtual]:operating_system|name", "mac")])
    ));
    assert!(match_conditions(
        &prefs,
        &matchers(&[("[!]:[virtual]:browser|version", "")])
    ));
}

#[test]
fn test_skus_orders_accumulate() {
    let order = |status: &str| SkusOrder {
        status: status.into(),
        ..SkusOrder::default()
    };
    let prefs = TestPrefs::new().with_virtual(
        VirtualPrefs::new()
            .with_skus_order("production", "search.brave.com", order("active"))
            .with_skus_order("production", "vpn.brave.com", order("canceled")),
    );
    assert!(match_conditions(
        &prefs,
        &matchers(&[
            ("[virtual]:skus|production|search.brave.com|status", "active"),
            ("[virtual]:skus|production|vpn.brave.com|status", "canceled"),
        ])
    ));
}

// ═══════════════════════════════════════════════════════════════════════════════
// Codec
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_codec_preserves_pairs() {
    let all = matchers(PAIRS);
    let decoded = decode_condition_matchers(&encode_condition_matchers(&all));
    assert_eq!(decoded, all);
    assert_eq!(decoded.len(), PAIRS.len());

    let prefs = prefs();
    assert_eq!(
        match_conditions_at(&prefs, &decoded, now()),
        match_conditions_at(&prefs, &all, now())
    );
}

#[test]
fn test_codec_rejects_garbage() {
    for garbage in ["not base64", "YQ==", "YQ==:MQ==;", ":::", "YQ==:MQ==:MQ=="] {
        assert!(decode_condition_matchers(garbage).is_empty(), "{garbage}");
    }
}
