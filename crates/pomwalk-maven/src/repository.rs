//! Local Maven repository layout.

use std::path::{Path, PathBuf};

use pomwalk_core::coordinate::Coordinate;

/// A local Maven repository (`~/.m2/repository` style).
#[derive(Debug, Clone)]
pub struct LocalRepository {
    root: PathBuf,
}

impl LocalRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The root directory of this repository.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Standard Maven layout path for a given coordinate.
    ///
    /// `org.jetbrains.kotlinx:kotlinx-coroutines-core:1.8.0` becomes
    /// `org/jetbrains/kotlinx/kotlinx-coroutines-core/1.8.0`
    pub fn coordinate_path(group: &str, artifact: &str, version: &str) -> String {
        format!("{}/{}/{}", group.replace('.', "/"), artifact, version)
    }

    /// Path to the artifact file of `coordinate` packaged as `type_`.
    ///
    /// Pure: the file is not required to exist.
    pub fn locate(&self, coordinate: &Coordinate, type_: &str) -> PathBuf {
        let filename = format!(
            "{}-{}.{}",
            coordinate.artifact_id,
            coordinate.version,
            extension_for(type_)
        );
        self.root
            .join(Self::coordinate_path(
                &coordinate.group_id,
                &coordinate.artifact_id,
                &coordinate.version,
            ))
            .join(filename)
    }

    /// Path to the manifest of `coordinate`.
    pub fn pom_path(&self, coordinate: &Coordinate) -> PathBuf {
        self.locate(coordinate, "pom")
    }
}

/// File extension used for an artifact type.
pub fn extension_for(type_: &str) -> &str {
    match type_ {
        "" | "jar" | "bundle" | "maven-plugin" | "test-jar" | "ejb" => "jar",
        other => other,
    }
}
