use pomwalk_core::document::{DocumentError, PomDocument};
use pomwalk_core::tree::PomMap;

fn dependency(g: &str, a: &str) -> PomMap {
    PomMap::new().with_text("groupId", g).with_text("artifactId", a)
}

fn sample() -> PomMap {
    let project = PomMap::new()
        .with_node(
            "parent",
            PomMap::new()
                .with_text("groupId", "org.example")
                .with_text("artifactId", "parent")
                .with_text("version", "2.0"),
        )
        .with_text("artifactId", "child")
        .with_node(
            "properties",
            PomMap::new()
                .with_text("lib.version", "1.2")
                .with_text("dup", "a")
                .with_text("dup", "b"),
        )
        .with_node(
            "dependencyManagement",
            PomMap::new().with_node(
                "dependencies",
                PomMap::new().with_node(
                    "dependency",
                    dependency("org", "managed")
                        .with_text("version", "3.0")
                        .with_text("scope", "provided"),
                ),
            ),
        )
        .with_node(
            "dependencies",
            PomMap::new()
                .with_node(
                    "dependency",
                    dependency("org", "lib").with_text("version", "${lib.version}"),
                )
                .with_node(
                    "dependency",
                    dependency("org", "opt")
                        .with_text("version", "1")
                        .with_text("optional", "true")
                        .with_text("type", "test-jar"),
                ),
        )
        .with_node(
            "modules",
            PomMap::new().with_text("module", "core").with_text("module", "cli"),
        );
    PomMap::new().with_node("project", project)
}

#[test]
fn missing_project_is_an_error() {
    let err = PomDocument::from_tree(&PomMap::new()).unwrap_err();
    assert_eq!(err, DocumentError::MissingProject);
}

#[test]
fn identity_falls_back_to_parent() {
    let doc = PomDocument::from_tree(&sample()).unwrap();
    assert_eq!(doc.group_id, None);
    assert_eq!(doc.effective_group_id(), Some("org.example"));
    assert_eq!(doc.effective_version(), Some("2.0"));
    assert_eq!(doc.artifact_id.as_deref(), Some("child"));
    assert_eq!(doc.packaging(), "jar");
    let parent = doc.parent.as_ref().unwrap();
    assert_eq!(parent.coordinate().type_, "pom");
}

#[test]
fn only_single_valued_properties_are_kept() {
    let doc = PomDocument::from_tree(&sample()).unwrap();
    assert_eq!(doc.property("lib.version"), Some("1.2"));
    assert_eq!(doc.property("dup"), None);
}

#[test]
fn dependencies_and_management_are_extracted() {
    let doc = PomDocument::from_tree(&sample()).unwrap();
    assert_eq!(doc.dependency_management.len(), 1);
    let managed = &doc.dependency_management[0];
    assert_eq!(managed.version.as_deref(), Some("3.0"));
    assert_eq!(managed.scope.as_deref(), Some("provided"));

    assert_eq!(doc.dependencies.len(), 2);
    assert_eq!(doc.dependencies[0].version.as_deref(), Some("${lib.version}"));
    assert_eq!(doc.dependencies[0].scope, None);
    assert!(!doc.dependencies[0].optional);
    assert!(doc.dependencies[1].optional);
    assert_eq!(doc.dependencies[1].type_.as_deref(), Some("test-jar"));
}

#[test]
fn modules_are_listed_in_order() {
    let doc = PomDocument::from_tree(&sample()).unwrap();
    assert_eq!(doc.modules, vec!["core", "cli"]);
}

#[test]
fn empty_text_is_treated_as_absent() {
    let tree = PomMap::new().with_node(
        "project",
        PomMap::new()
            .with_text("artifactId", "x")
            .with_text("packaging", "")
            .with_node(
                "dependencies",
                PomMap::new().with_node(
                    "dependency",
                    dependency("org", "lib").with_text("version", " "),
                ),
            ),
    );
    let doc = PomDocument::from_tree(&tree).unwrap();
    assert_eq!(doc.packaging, None);
    assert_eq!(doc.dependencies[0].version, None);
}
