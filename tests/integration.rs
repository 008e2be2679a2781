//! End-to-end tests for block-list conversion.

use rejectgen::converter::{DnsRejectionEmitter, ProviderPayload, RuleProviderEmitter};
use rejectgen::{
    build, build_with_stats, CanonicalPattern, Error, ExcludeAction, FileFetcher, Generator,
    MatchKind, RuleListConfig, RuleOutcome, RuleSpec, SourceType,
};
use std::fs;
use tempfile::tempdir;

fn rule(source_type: SourceType, exclude_action: ExcludeAction) -> RuleSpec {
    RuleSpec::new(
        "test",
        vec!["https://example.com/list.txt".to_string()],
        source_type,
        "test",
        exclude_action,
    )
}

#[test]
fn test_mixed_adblock_scenario() {
    let doc = [
        "! comment",
        "||ads.example.com^",
        "|http://track.example.org/px?x=1",
        "plain.example.net",
        "sub.example.io/path",
    ]
    .join("\n");

    let r = rule(SourceType::Adblock, ExcludeAction::Ignore);
    let (set, stats) = build_with_stats(&[doc], &r);

    let expected: Vec<CanonicalPattern> = vec![
        CanonicalPattern::new("ads.example.com", MatchKind::SubtreeSuffix).unwrap(),
        CanonicalPattern::new("plain.example.net", MatchKind::ExactHost).unwrap(),
        CanonicalPattern::new("track.example.org", MatchKind::ExactHost).unwrap(),
    ];
    assert_eq!(set.iter().cloned().collect::<Vec<_>>(), expected);
    assert_eq!(stats.dropped, 1);

    assert_eq!(
        RuleProviderEmitter::emit(&set),
        vec!["+.ads.example.com", "plain.example.net", "track.example.org"]
    );
    assert_eq!(
        DnsRejectionEmitter::emit(&set, r.exclude_action),
        vec!["||ads.example.com^", "||plain.example.net^", "||track.example.org^"]
    );
}

#[test]
fn test_domain_type_passthrough() {
    let r = rule(SourceType::Domain, ExcludeAction::Ignore);
    let set = build(&["foo.com\n*.bar.com"], &r);

    assert!(set.iter().all(|p| p.kind() == MatchKind::Opaque));
    assert_eq!(RuleProviderEmitter::emit(&set), vec!["*.bar.com", "foo.com"]);
    assert_eq!(
        DnsRejectionEmitter::emit(&set, r.exclude_action),
        vec!["||*.bar.com^", "||foo.com^"]
    );
}

#[test]
fn test_block_subdomains_property() {
    let r = rule(SourceType::Adblock, ExcludeAction::Ignore);
    for d in ["a.com", "x.y.example.org", "under_score.net", "xn--80ak6aa92e.com"] {
        let set = build(&[format!("||{}^", d)], &r);
        let expected = CanonicalPattern::new(d, MatchKind::SubtreeSuffix).unwrap();
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![&expected]);
        assert_eq!(RuleProviderEmitter::emit(&set), vec![format!("+.{}", d)]);
        assert_eq!(
            DnsRejectionEmitter::emit(&set, ExcludeAction::Ignore),
            vec![format!("||{}^", d)]
        );
    }
}

#[test]
fn test_anchored_url_keeps_host_only() {
    let r = rule(SourceType::Adblock, ExcludeAction::Ignore);
    for line in [
        "|http://host.example.com/path/to/x.js",
        "|https://host.example.com:8443/",
        "|https://HOST.example.com/?q=1",
    ] {
        let set = build(&[line], &r);
        assert_eq!(RuleProviderEmitter::emit(&set), vec!["host.example.com"]);
        assert_eq!(
            set.iter().next().map(|p| p.kind()),
            Some(MatchKind::ExactHost)
        );
    }
}

#[test]
fn test_unanchored_urls_dropped() {
    let r = rule(SourceType::Adblock, ExcludeAction::Ignore);
    let (set, stats) = build_with_stats(
        &["example.com/ads\nexample.com:8080\nexample.com?id=1\n/banner/*"],
        &r,
    );
    assert!(set.is_empty());
    assert_eq!(stats.dropped, 4);
}

#[test]
fn test_idempotent_across_order_and_duplication() {
    let r = rule(SourceType::Adblock, ExcludeAction::Ignore);
    let a = "||a.com^\nb.com\n*.glob.net";
    let b = "c.com|\n||a.com^\nB.COM";

    let first = build(&[a, b], &r);
    let second = build(&[b, a, b, a], &r);
    let third = build(&[a, b], &r);

    assert_eq!(first, second);
    assert_eq!(RuleProviderEmitter::emit(&first), RuleProviderEmitter::emit(&third));
    assert_eq!(
        DnsRejectionEmitter::emit(&first, ExcludeAction::Ignore),
        DnsRejectionEmitter::emit(&second, ExcludeAction::Ignore)
    );
}

#[test]
fn test_subtree_round_trip_through_both_formats() {
    let subtree = CanonicalPattern::from_dotted(".ads.example.com").unwrap();
    assert_eq!(subtree.kind(), MatchKind::SubtreeSuffix);
    assert_eq!(RuleProviderEmitter::emit_pattern(&subtree), "+.ads.example.com");
    assert_eq!(DnsRejectionEmitter::emit_pattern(&subtree), "||ads.example.com^");

    // The `+.` form read back from a provider payload is the same fact.
    let from_provider = CanonicalPattern::new("+.ads.example.com", MatchKind::Opaque).unwrap();
    assert_eq!(from_provider, subtree);
}

#[test]
fn test_same_domain_under_two_kinds() {
    let r = rule(SourceType::Adblock, ExcludeAction::Ignore);
    let set = build(&["||x.com^", "x.com"], &r);
    assert_eq!(RuleProviderEmitter::emit(&set), vec!["x.com", "+.x.com"]);
    // Both kinds collapse into one DNS line.
    assert_eq!(
        DnsRejectionEmitter::emit(&set, ExcludeAction::Ignore),
        vec!["||x.com^"]
    );
}

#[test]
fn test_generate_from_config_with_local_sources() {
    let src = tempdir().unwrap();
    let out = tempdir().unwrap();
    fs::write(
        src.path().join("adblock.txt"),
        "[Adblock Plus 2.0]\n! Title: test\n||ads.example.com^\n|http://track.example.org/px\nplain.example.net\n",
    )
    .unwrap();
    fs::write(src.path().join("domains.txt"), "foo.com\n*.bar.com\n").unwrap();
    fs::write(src.path().join("empty.txt"), "").unwrap();

    let config = RuleListConfig::from_json(
        r#"{
            "rules_list": [
                {"name": "ads", "url": "adblock.txt", "type": "adblock",
                 "file_prefix": "ads", "exclude_action": "IGNORE"},
                {"name": "domains", "url": ["domains.txt", "missing.txt"], "type": "domain",
                 "file_prefix": "domains"},
                {"name": "empty", "url": "empty.txt", "type": "adblock",
                 "file_prefix": "empty", "exclude_action": "IGNORE"},
                {"name": "broken", "type": "adblock", "file_prefix": "broken"}
            ]
        }"#,
    )
    .unwrap();

    let generator = Generator::new(FileFetcher::with_base_dir(src.path()), out.path());
    let report = generator.run_config(config).unwrap();

    assert_eq!(report.generated(), 2);
    assert_eq!(report.skipped(), 1);
    assert_eq!(report.invalid.len(), 1);
    assert!(matches!(
        &report.invalid[0],
        Error::InvalidRuleSpec { index: 3, name, .. } if name == "broken"
    ));
    assert!(matches!(&report.outcomes[2], RuleOutcome::Skipped { name } if name == "empty"));

    let ads_yaml = fs::read_to_string(out.path().join("ads-clash_reject_hostnames.yaml")).unwrap();
    assert_eq!(
        ads_yaml,
        "payload:\n  - '+.ads.example.com'\n  - 'plain.example.net'\n  - 'track.example.org'\n"
    );
    assert_eq!(
        ProviderPayload::from_yaml(&ads_yaml).unwrap().payload,
        vec!["+.ads.example.com", "plain.example.net", "track.example.org"]
    );
    assert_eq!(
        fs::read_to_string(out.path().join("ads-rejection-unbound_dns.conf")).unwrap(),
        "||ads.example.com^\n||plain.example.net^\n||track.example.org^"
    );

    let domains_yaml =
        fs::read_to_string(out.path().join("domains-clash_reject_hostnames.yaml")).unwrap();
    assert_eq!(domains_yaml, "payload:\n  - '*.bar.com'\n  - 'foo.com'\n");
    // No exclude_action: the DNS list is written but empty.
    assert_eq!(
        fs::read_to_string(out.path().join("domains-rejection-unbound_dns.conf")).unwrap(),
        ""
    );

    assert!(!out.path().join("empty-clash_reject_hostnames.yaml").exists());
    assert!(!out.path().join("broken-clash_reject_hostnames.yaml").exists());
}
