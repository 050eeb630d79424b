use crate::maven::coordinates::*;

/// Repository layout, see https://cwiki.apache.org/confluence/display/MAVEN/Remote+repository+layout
///
/// All paths are relative to the repository base, i.e. they start with something like
///  "org/..." or "com/..."
impl MavenArtifactRef {
    /// `<groupId with '/' for '.'>/<artifactId>/<version>/`, always with a trailing '/'
    pub fn artifact_directory(&self) -> String {
        format!(
            "{}/{}/{}/",
            self.coordinates.group_id.0.replace('.', "/"),
            self.coordinates.artifact_id.0,
            self.coordinates.version.0,
        )
    }

    pub fn artifact_location(&self) -> String {
        self.artifact_directory() + &self.artifact_file_name()
    }

    /// For snapshots the directory keeps the literal '-SNAPSHOT' version while the file name
    ///  carries the timestamped build version published in the metadata.
    pub fn snapshot_location(&self, build_version: &str) -> String {
        self.artifact_directory() + &self.maven_file_name(build_version)
    }

    pub fn metadata_location(&self, metadata_file_name: &str) -> String {
        self.artifact_directory() + metadata_file_name
    }

    /// The file name a build writes this artifact to, i.e. the release file name
    pub fn artifact_file_name(&self) -> String {
        self.maven_file_name(&self.coordinates.version.0)
    }

    fn maven_file_name(&self, version: &str) -> String {
        let classifier_string = match &self.classifier {
            MavenClassifier::Unclassified => "".to_string(),
            MavenClassifier::Classified(c) => format!("-{}", c),
        };

        format!("{}-{}{}.{}",
                self.coordinates.artifact_id.0,
                version,
                classifier_string,
                self.file_extension,
        )
    }
}

#[cfg(test)]
mod test {
    use std::collections::HashMap;

    use rstest::*;
    use super::*;

    #[rstest]
    #[case::classifier("groupId:artifactId:packaging:version", Some("packaging"), Some("classifier"), None, "groupId/artifactId/version/artifactId-version-classifier.packaging")]
    #[case::no_classifier("groupId:artifactId:packaging:version", Some("packaging"), None, Some(HashMap::new()), "groupId/artifactId/version/artifactId-version.packaging")]
    #[case::mapped_extension("groupId:artifactId:packaging:version", Some("packaging"), None, Some(HashMap::from([("packaging".to_string(), "wrapped".to_string())])), "groupId/artifactId/version/artifactId-version.wrapped")]
    #[case::maven_plugin("org.honton.chas:exists-maven-plugin:maven-plugin:0.14.0", None, None, None, "org/honton/chas/exists-maven-plugin/0.14.0/exists-maven-plugin-0.14.0.jar")]
    #[case::known_type_ignores_override("a.b.c:d.e:jar:1.0", None, None, Some(HashMap::from([("jar".to_string(), "wrapped".to_string())])), "a/b/c/d.e/1.0/d.e-1.0.jar")]
    #[case::test_jar_packaging("g:a:1.0", Some("test-jar"), None, None, "g/a/1.0/a-1.0-tests.jar")]
    #[case::pom("g:a:pom:1.0", None, None, None, "g/a/1.0/a-1.0.pom")]
    fn test_artifact_location(
        #[case] coordinate: &str,
        #[case] packaging: Option<&str>,
        #[case] classifier: Option<&str>,
        #[case] extensions: Option<HashMap<String, String>>,
        #[case] expected: &str,
    ) {
        let artifact_ref = MavenArtifactRef::parse(coordinate, packaging, classifier, extensions.as_ref()).unwrap();
        assert_eq!(artifact_ref.artifact_location(), expected);
        assert!(expected.starts_with(&artifact_ref.artifact_directory()));
    }

    #[test]
    fn test_snapshot_location() {
        let artifact_ref = MavenArtifactRef::parse("org.acme:widget:1.0-SNAPSHOT", None, Some("sources"), None).unwrap();
        assert_eq!(
            artifact_ref.snapshot_location("1.0-20240102.030405-7"),
            "org/acme/widget/1.0-SNAPSHOT/widget-1.0-20240102.030405-7-sources.jar",
        );
    }

    #[test]
    fn test_artifact_directory() {
        let artifact_ref = MavenArtifactRef::parse("org.acme.tools:widget.core:war:2.0", None, None, None).unwrap();
        assert_eq!(artifact_ref.artifact_directory(), "org/acme/tools/widget.core/2.0/");
        assert_eq!(
            artifact_ref.metadata_location("maven-metadata.xml"),
            "org/acme/tools/widget.core/2.0/maven-metadata.xml",
        );
    }
}
