//! Building a manifest's property table.

use pomwalk_core::coordinate::Coordinate;
use pomwalk_core::document::PomDocument;
use pomwalk_core::properties::{Property, PropertyTable};

/// Build the property table of a manifest.
///
/// Entries are added in precedence order and a key is only added if it is
/// absent: environment (`env.*`), the manifest's own identity
/// (`project.*` and the `pom.*` aliases), the parent's identity
/// (`project.parent.*`), then the declared `<properties>`.
pub fn build_property_table(
    coordinate: &Coordinate,
    document: &PomDocument,
    parent: Option<&Coordinate>,
    environment: &[Property],
) -> PropertyTable {
    let mut table = PropertyTable::new();

    for property in environment {
        table.insert(property.key.clone(), property.value.clone());
    }

    let packaging = document.packaging();
    for prefix in ["project", "pom"] {
        table.insert(format!("{prefix}.groupId"), coordinate.group_id.clone());
        table.insert(format!("{prefix}.artifactId"), coordinate.artifact_id.clone());
        table.insert(format!("{prefix}.version"), coordinate.version.clone());
        table.insert(format!("{prefix}.packaging"), packaging);
    }

    let parent = parent
        .cloned()
        .or_else(|| document.parent.as_ref().map(|p| p.coordinate()));
    if let Some(parent) = parent {
        table.insert("project.parent.groupId", parent.group_id);
        table.insert("project.parent.artifactId", parent.artifact_id);
        table.insert("project.parent.version", parent.version);
    }

    for (key, value) in &document.properties {
        table.insert(key.clone(), value.clone());
    }

    table
}
