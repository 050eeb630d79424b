#![allow(non_snake_case)]

//! The parts of the maven-metadata.xml file format that snapshot resolution needs, see
//!  https://maven.apache.org/ref/3.9.5/maven-repository-metadata/repository-metadata.html

use serde::Deserialize;

#[derive(Deserialize, Debug, Default)]
pub struct Metadata {
    #[serde(default)]
    pub groupId: Option<String>,
    #[serde(default)]
    pub artifactId: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub versioning: Option<Versioning>,
}

#[derive(Deserialize, Debug, Default)]
pub struct Versioning {
    #[serde(default)]
    pub lastUpdated: Option<String>,
    #[serde(default)]
    pub snapshot: Option<Snapshot>,
    #[serde(default)]
    pub snapshotVersions: Option<SnapshotVersions>,
}

#[derive(Deserialize, Debug, Default)]
pub struct Snapshot {
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub buildNumber: Option<u32>,
    #[serde(default)]
    pub localCopy: Option<bool>,
}

#[derive(Deserialize, Debug, Default)]
pub struct SnapshotVersions {
    #[serde(default)]
    pub snapshotVersion: Vec<SnapshotVersion>,
}

#[derive(Deserialize, Debug, Clone, Eq, PartialEq)]
pub struct SnapshotVersion {
    #[serde(default)]
    pub classifier: Option<String>,
    pub extension: String,
    pub value: String,
    #[serde(default)]
    pub updated: Option<String>,
}

impl Metadata {
    pub fn parse(xml: &str) -> anyhow::Result<Metadata> {
        Ok(serde_xml_rs::from_str(xml)?)
    }

    /// Snapshot versions in document order
    pub fn snapshot_versions(&self) -> &[SnapshotVersion] {
        self.versioning.as_ref()
            .and_then(|v| v.snapshotVersions.as_ref())
            .map(|v| v.snapshotVersion.as_slice())
            .unwrap_or(&[])
    }

    /// Prefers the first entry matching both extension and classifier, falling back to the first
    ///  entry with a matching extension. Matching on extension alone would pick whichever entry
    ///  comes first, e.g. a `-sources` jar listed before the main jar, and report that entry's
    ///  path and `updated` time for an unclassified artifact.
    pub fn find_snapshot_version(&self, extension: &str, classifier: Option<&str>) -> Option<&SnapshotVersion> {
        let versions = self.snapshot_versions();
        versions.iter()
            .find(|v| v.extension == extension && v.classifier.as_deref().filter(|c| !c.is_empty()) == classifier)
            .or_else(|| versions.iter().find(|v| v.extension == extension))
    }
}
