use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

#[allow(deprecated)]
fn pomwalk_cmd(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("pomwalk").unwrap();
    cmd.env("HOME", home)
        .env_remove("POMWALK_LOCAL_REPO")
        .env_remove("RUST_LOG");
    cmd
}

fn pom(group: &str, artifact: &str, version: &str, body: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <project xmlns=\"http://maven.apache.org/POM/4.0.0\">\n\
           <modelVersion>4.0.0</modelVersion>\n\
           <groupId>{group}</groupId>\n\
           <artifactId>{artifact}</artifactId>\n\
           <version>{version}</version>\n\
           {body}\n\
         </project>\n"
    )
}

fn dependency(group: &str, artifact: &str, version: &str, scope: Option<&str>) -> String {
    let scope = scope
        .map(|s| format!("<scope>{s}</scope>"))
        .unwrap_or_default();
    format!(
        "<dependency><groupId>{group}</groupId><artifactId>{artifact}</artifactId>\
         <version>{version}</version>{scope}</dependency>"
    )
}

fn publish(repo: &Path, group: &str, artifact: &str, version: &str, body: &str) {
    let dir = repo
        .join(group.replace('.', "/"))
        .join(artifact)
        .join(version);
    fs::create_dir_all(&dir).unwrap();
    fs::write(
        dir.join(format!("{artifact}-{version}.pom")),
        pom(group, artifact, version, body),
    )
    .unwrap();
}

/// A project depending on `com.acme:lib:1.0`, which depends on
/// `com.acme:util:2.0` and, for tests only, `junit:junit:4.13`.
fn fixture() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let repo = tmp.path().join("repo");
    publish(
        &repo,
        "com.acme",
        "lib",
        "1.0",
        &format!(
            "<dependencies>{}{}</dependencies>",
            dependency("com.acme", "util", "2.0", None),
            dependency("junit", "junit", "4.13", Some("test")),
        ),
    );
    publish(&repo, "com.acme", "util", "2.0", "");
    publish(&repo, "junit", "junit", "4.13", "");

    let project = tmp.path().join("project");
    fs::create_dir_all(&project).unwrap();
    fs::write(
        project.join("pom.xml"),
        pom(
            "com.acme",
            "app",
            "0.1.0",
            &format!(
                "<properties><lib.version>1.0</lib.version></properties>\
                 <dependencies>{}</dependencies>",
                dependency("com.acme", "lib", "${lib.version}", None)
            ),
        ),
    )
    .unwrap();
    tmp
}

#[test]
fn test_classpath_without_manifest_fails() {
    let tmp = TempDir::new().unwrap();

    pomwalk_cmd(tmp.path())
        .current_dir(tmp.path())
        .args(["classpath"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no manifest found"));
}

#[test]
fn test_classpath_lists_transitive_dependencies() {
    let tmp = fixture();
    let repo = tmp.path().join("repo");

    pomwalk_cmd(tmp.path())
        .current_dir(tmp.path().join("project"))
        .arg("--repo")
        .arg(&repo)
        .arg("classpath")
        .assert()
        .success()
        .stdout("com.acme:lib:1.0\ncom.acme:util:2.0\n");
}

#[test]
fn test_classpath_repo_from_environment() {
    let tmp = fixture();

    pomwalk_cmd(tmp.path())
        .env("POMWALK_LOCAL_REPO", tmp.path().join("repo"))
        .arg("--manifest-path")
        .arg(tmp.path().join("project").join("pom.xml"))
        .arg("classpath")
        .assert()
        .success()
        .stdout(predicate::str::contains("com.acme:util:2.0"))
        .stdout(predicate::str::contains("junit").not());
}

#[test]
fn test_classpath_paths_point_into_repository() {
    let tmp = fixture();
    let repo = tmp.path().join("repo");

    pomwalk_cmd(tmp.path())
        .current_dir(tmp.path().join("project"))
        .arg("--repo")
        .arg(&repo)
        .args(["classpath", "--format", "paths"])
        .assert()
        .success()
        .stdout(predicate::str::contains("lib-1.0.jar"))
        .stdout(predicate::str::contains("util-2.0.jar"));
}

#[test]
fn test_classpath_json_report() {
    let tmp = fixture();
    let repo = tmp.path().join("repo");

    pomwalk_cmd(tmp.path())
        .current_dir(tmp.path().join("project"))
        .arg("--repo")
        .arg(&repo)
        .args(["classpath", "--format", "json", "--conflicts"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"project\": \"com.acme:app:0.1.0\""))
        .stdout(predicate::str::contains("\"conflicts\": []"));
}

#[test]
fn test_classpath_missing_dependency_fails() {
    let tmp = fixture();
    let empty_repo = tmp.path().join("empty");
    fs::create_dir_all(&empty_repo).unwrap();

    pomwalk_cmd(tmp.path())
        .current_dir(tmp.path().join("project"))
        .arg("--repo")
        .arg(&empty_repo)
        .arg("classpath")
        .assert()
        .failure()
        .stderr(predicate::str::contains("did not resolve"))
        .stderr(predicate::str::contains("com.acme:lib:1.0"));
}

#[test]
fn test_tree_shows_scopes() {
    let tmp = fixture();
    let repo = tmp.path().join("repo");

    pomwalk_cmd(tmp.path())
        .current_dir(tmp.path().join("project"))
        .arg("--repo")
        .arg(&repo)
        .arg("tree")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("com.acme:app:0.1.0\n"))
        .stdout(predicate::str::contains("com.acme:util:2.0"))
        .stdout(predicate::str::contains("junit:junit:4.13 (test)"));
}

#[test]
fn test_tree_why() {
    let tmp = fixture();
    let repo = tmp.path().join("repo");

    pomwalk_cmd(tmp.path())
        .current_dir(tmp.path().join("project"))
        .arg("--repo")
        .arg(&repo)
        .args(["tree", "--why", "util"])
        .assert()
        .success()
        .stdout("Path to util:\ncom.acme:app:0.1.0\n  com.acme:lib:1.0\n    com.acme:util:2.0\n");
}

#[test]
fn test_properties_lists_declared_and_project_entries() {
    let tmp = fixture();
    let repo = tmp.path().join("repo");

    pomwalk_cmd(tmp.path())
        .current_dir(tmp.path().join("project"))
        .arg("--repo")
        .arg(&repo)
        .arg("properties")
        .assert()
        .success()
        .stdout(predicate::str::contains("project.artifactId = app"))
        .stdout(predicate::str::contains("lib.version = 1.0"))
        .stdout(predicate::str::contains("env.").not());
}
