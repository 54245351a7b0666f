use pomwalk_util::fs::{expand_home, find_ancestor_with, home_dir, normalize};
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_find_ancestor_with_direct() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("pom.xml"), "").unwrap();
    let result = find_ancestor_with(tmp.path(), "pom.xml");
    assert_eq!(result, Some(tmp.path().to_path_buf()));
}

#[test]
fn test_find_ancestor_with_nested() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("pom.xml"), "").unwrap();
    let nested = tmp.path().join("src").join("main").join("java");
    std::fs::create_dir_all(&nested).unwrap();
    let result = find_ancestor_with(&nested, "pom.xml");
    assert_eq!(result, Some(tmp.path().to_path_buf()));
}

#[test]
fn test_find_ancestor_with_not_found() {
    let tmp = TempDir::new().unwrap();
    let result = find_ancestor_with(tmp.path(), "NonExistent.file");
    assert_eq!(result, None);
}

#[test]
fn test_expand_home_prefix() {
    assert_eq!(
        expand_home("~/.m2/repository"),
        home_dir().join(".m2/repository")
    );
    assert_eq!(expand_home("~"), home_dir());
}

#[test]
fn test_expand_home_leaves_other_paths() {
    assert_eq!(expand_home("/opt/repo"), PathBuf::from("/opt/repo"));
    assert_eq!(expand_home("rel/~x"), PathBuf::from("rel/~x"));
}

#[test]
fn test_normalize_missing_path_is_unchanged() {
    let missing = PathBuf::from("/definitely/not/here/pom.xml");
    assert_eq!(normalize(&missing), missing);
}

#[test]
fn test_normalize_existing_path_is_absolute() {
    let tmp = TempDir::new().unwrap();
    let file = tmp.path().join("pom.xml");
    std::fs::write(&file, "").unwrap();
    assert!(normalize(&file).is_absolute());
}
