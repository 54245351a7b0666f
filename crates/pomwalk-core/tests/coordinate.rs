use std::collections::HashSet;

use pomwalk_core::coordinate::{Coordinate, DEFAULT_SCOPE, DEFAULT_TYPE};

#[test]
fn coordinate_parse_valid() {
    let coord = Coordinate::parse("com.example:my-lib:1.0.0").unwrap();
    assert_eq!(coord.group_id, "com.example");
    assert_eq!(coord.artifact_id, "my-lib");
    assert_eq!(coord.version, "1.0.0");
    assert_eq!(coord.type_, DEFAULT_TYPE);
    assert_eq!(coord.scope, DEFAULT_SCOPE);
    assert!(!coord.optional);
}

#[test]
fn coordinate_parse_rejects_wrong_arity_and_empty_parts() {
    assert!(Coordinate::parse("group:artifact").is_none());
    assert!(Coordinate::parse("").is_none());
    assert!(Coordinate::parse("group:artifact:version:extra").is_none());
    assert!(Coordinate::parse("group::1.0").is_none());
}

#[test]
fn coordinate_display_matches_key() {
    let coord = Coordinate::parse("com.example:my-lib:1.0.0").unwrap();
    assert_eq!(coord.to_string(), "com.example:my-lib:1.0.0");
    assert_eq!(coord.key(), "com.example:my-lib:1.0.0");
    assert_eq!(coord.artifact_key(), "com.example:my-lib");
}

#[test]
fn equality_ignores_type_scope_and_optional() {
    let a = Coordinate::new("org", "lib", "1.0");
    let b = Coordinate::new("org", "lib", "1.0")
        .with_type("pom")
        .with_scope("test")
        .with_optional(true);
    let c = Coordinate::new("org", "lib", "1.0").with_scope("provided");

    // reflexive, symmetric, transitive
    assert_eq!(a, a);
    assert_eq!(a, b);
    assert_eq!(b, a);
    assert_eq!(b, c);
    assert_eq!(a, c);
}

#[test]
fn equality_uses_every_identity_part() {
    let base = Coordinate::new("org", "lib", "1.0");
    assert_ne!(base, Coordinate::new("org", "lib", "2.0"));
    assert_ne!(base, Coordinate::new("org", "other", "1.0"));
    assert_ne!(base, Coordinate::new("com", "lib", "1.0"));
}

#[test]
fn hashing_agrees_with_equality() {
    let mut set = HashSet::new();
    set.insert(Coordinate::new("org", "lib", "1.0"));
    set.insert(Coordinate::new("org", "lib", "1.0").with_scope("test"));
    assert_eq!(set.len(), 1);
}

#[test]
fn degraded_coordinates() {
    assert!(!Coordinate::new("org", "lib", "1.0").is_degraded());
    assert!(Coordinate::new("org", "lib", "").is_degraded());
    assert!(Coordinate::new("org", "lib", "${lib.version}").is_degraded());
    assert!(Coordinate::new("${project.groupId}", "lib", "1.0").is_degraded());
}

#[test]
fn degraded_version_displays_question_mark() {
    assert_eq!(Coordinate::new("org", "lib", "").to_string(), "org:lib:?");
}

#[test]
fn test_scope_detection() {
    assert!(Coordinate::new("org", "lib", "1").with_scope("test").is_test_scoped());
    assert!(!Coordinate::new("org", "lib", "1").is_test_scoped());
}
