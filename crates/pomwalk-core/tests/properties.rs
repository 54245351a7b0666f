use pomwalk_core::properties::{environment_properties, has_placeholder, interpolate_with, PropertyTable};

fn table(entries: &[(&str, &str)]) -> PropertyTable {
    let mut t = PropertyTable::new();
    for (k, v) in entries {
        t.insert(*k, *v);
    }
    t
}

#[test]
fn insert_keeps_first_value_for_a_key() {
    let mut t = PropertyTable::new();
    assert!(t.insert("a", "1"));
    assert!(!t.insert("a", "2"));
    assert_eq!(t.get("a"), Some("1"));
    assert_eq!(t.len(), 1);
}

#[test]
fn table_preserves_insertion_order() {
    let t = table(&[("z", "1"), ("a", "2"), ("m", "3")]);
    let keys: Vec<&str> = t.iter().map(|p| p.key.as_str()).collect();
    assert_eq!(keys, vec!["z", "a", "m"]);
}

#[test]
fn environment_properties_are_prefixed_and_uppercased() {
    let props = environment_properties(vec![("path", "/bin"), ("HOME", "/home/u")]);
    assert_eq!(props[0].key, "env.PATH");
    assert_eq!(props[0].value, "/bin");
    assert_eq!(props[1].key, "env.HOME");
}

#[test]
fn interpolate_whole_value() {
    let t = table(&[("foo.bar", "X")]);
    let out = interpolate_with("${foo.bar}", |k| t.get(k).map(str::to_string));
    assert_eq!(out, "X");
}

#[test]
fn interpolate_embedded_and_multiple_refs() {
    let t = table(&[("a", "1"), ("b", "2")]);
    let out = interpolate_with("v${a}.${b}-final", |k| t.get(k).map(str::to_string));
    assert_eq!(out, "v1.2-final");
}

#[test]
fn interpolate_nested_values() {
    let t = table(&[("outer", "${inner}-x"), ("inner", "3.0")]);
    let out = interpolate_with("${outer}", |k| t.get(k).map(str::to_string));
    assert_eq!(out, "3.0-x");
}

#[test]
fn unresolved_placeholder_is_left_verbatim() {
    let t = table(&[("a", "1")]);
    let out = interpolate_with("${missing}-${a}", |k| t.get(k).map(str::to_string));
    assert_eq!(out, "${missing}-1");
    assert!(has_placeholder(&out));
}

#[test]
fn self_reference_terminates() {
    let t = table(&[("loop", "${loop}")]);
    let out = interpolate_with("${loop}", |k| t.get(k).map(str::to_string));
    assert_eq!(out, "${loop}");
}

#[test]
fn unterminated_placeholder_is_kept() {
    let out = interpolate_with("abc${def", |_| Some("x".to_string()));
    assert_eq!(out, "abc${def");
}

#[test]
fn no_placeholders_returns_input_unchanged() {
    let out = interpolate_with("plain text", |_| Some("x".to_string()));
    assert_eq!(out, "plain text");
}
