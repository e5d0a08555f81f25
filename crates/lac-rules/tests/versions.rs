use lac_rules::{RuleSetVersion, RulesError, load_registry};

#[test]
fn every_version_builds_a_registry() {
    for version in RuleSetVersion::ALL {
        let registry = version.registry().expect("catalog has unique codes");
        assert_eq!(registry.version(), version.tag());
        assert!(registry.contains("101"));
        assert!(registry.contains("INT17"));
    }
}

#[test]
fn social_worker_rules_start_in_2024_25() {
    let older = load_registry("lac2022_23").expect("registry");
    let newer = load_registry("lac2024_25").expect("registry");

    assert!(!older.contains("SW01bSTG1"));
    assert!(newer.contains("SW01bSTG1"));
    assert_eq!(newer.len(), older.len() + 1);
}

#[test]
fn tags_parse_in_both_spellings() {
    assert_eq!("lac2022_23".parse::<RuleSetVersion>().ok(), Some(RuleSetVersion::Lac2022_23));
    assert_eq!("lac_2022_23".parse::<RuleSetVersion>().ok(), Some(RuleSetVersion::Lac2022_23));
    assert_eq!(" LAC2024_25 ".parse::<RuleSetVersion>().ok(), Some(RuleSetVersion::Lac2024_25));
    assert_eq!(RuleSetVersion::Lac2024_25.to_string(), "lac2024_25");
    assert_eq!(RuleSetVersion::default(), RuleSetVersion::Lac2022_23);
}

#[test]
fn unknown_tag_lists_known_versions() {
    let error = load_registry("lac2030_31").expect_err("unknown tag");
    assert!(matches!(error, RulesError::UnknownVersion { .. }));
    assert_eq!(
        error.to_string(),
        "unknown rule set 'lac2030_31' (expected one of: lac2022_23, lac2024_25)"
    );
}

#[test]
fn registry_order_is_stable() {
    let registry = load_registry("lac2022_23").expect("registry");
    let codes: Vec<_> = registry.codes().collect();
    assert_eq!(codes.first(), Some(&"101"));
    assert_eq!(codes.last(), Some(&"INT17"));
    assert!(registry.position("141") < registry.position("392c"));
}
