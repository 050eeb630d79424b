use std::collections::HashMap;
use std::fmt::{Display, Formatter};

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::ExistsError;

lazy_static! {
    // groupId:artifactId[:type]:version
    static ref COORDINATE_REGEX: Regex = Regex::new(r"^([^:]+):([^:]+):(?:([^:]+):)?([^:]+)$").unwrap();
}

/// Maven's artifact handlers, see https://maven.apache.org/ref/current/maven-core/artifact-handlers.html
const HANDLER_EXTENSIONS: &[(&str, &str)] = &[
    ("pom", "pom"),
    ("jar", "jar"),
    ("test-jar", "jar"),
    ("maven-plugin", "jar"),
    ("ejb", "jar"),
    ("ejb-client", "jar"),
    ("java-source", "jar"),
    ("javadoc", "jar"),
    ("war", "war"),
    ("ear", "ear"),
    ("rar", "rar"),
];

const HANDLER_CLASSIFIERS: &[(&str, &str)] = &[
    ("test-jar", "tests"),
    ("ejb-client", "client"),
    ("java-source", "sources"),
    ("javadoc", "sources"),
];

pub const DEFAULT_PACKAGING: &str = "jar";

#[derive(PartialEq, Eq, Clone, Debug)]
pub struct MavenVersion(pub String);
impl MavenVersion {
    pub fn is_snapshot(&self) -> bool {
        self.0.ends_with("-SNAPSHOT")
    }
}

#[derive(PartialEq, Eq, Clone, Debug)]
pub struct MavenArtifactId(pub String);

#[derive(PartialEq, Eq, Clone, Debug)]
pub struct MavenGroupId(pub String);

#[derive(PartialEq, Eq, Clone, Debug)]
pub struct MavenCoordinates {
    pub group_id: MavenGroupId,
    pub artifact_id: MavenArtifactId,
    pub version: MavenVersion,
}

#[derive(PartialEq, Eq, Clone, Debug)]
pub enum MavenClassifier {
    Unclassified,
    Classified(String),
}
impl MavenClassifier {
    pub fn as_option(&self) -> Option<&str> {
        match self {
            MavenClassifier::Unclassified => None,
            MavenClassifier::Classified(c) => Some(c),
        }
    }
}

/// A fully resolved artifact identity: coordinates plus type, classifier and the file extension
///  the type maps to. Immutable once parsed.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct MavenArtifactRef {
    pub coordinates: MavenCoordinates,
    pub artifact_type: String,
    pub classifier: MavenClassifier,
    pub file_extension: String, // without leading '.', e.g. "jar"
}

impl MavenArtifactRef {
    /// Parses `groupId:artifactId[:type]:version`.
    ///
    /// `packaging` is the type used when the coordinate has none (defaults to "jar"). When no
    ///  classifier is configured, one is derived from the packaging for the handlers that carry
    ///  one (e.g. "test-jar" -> "tests"). `extensions` maps types unknown to Maven's artifact
    ///  handlers to their file extension.
    pub fn parse(
        coordinate: &str,
        packaging: Option<&str>,
        classifier: Option<&str>,
        extensions: Option<&HashMap<String, String>>,
    ) -> Result<MavenArtifactRef, ExistsError> {
        let captures = COORDINATE_REGEX.captures(coordinate)
            .ok_or_else(|| ExistsError::MalformedCoordinate(coordinate.to_string()))?;

        let packaging = packaging.unwrap_or(DEFAULT_PACKAGING);
        let artifact_type = captures.get(3)
            .map(|m| m.as_str())
            .unwrap_or(packaging);

        let classifier = match classifier.or_else(|| lookup(HANDLER_CLASSIFIERS, packaging)) {
            None => MavenClassifier::Unclassified,
            Some(c) => MavenClassifier::Classified(c.to_string()),
        };

        Ok(MavenArtifactRef {
            coordinates: MavenCoordinates {
                group_id: MavenGroupId(captures[1].to_string()),
                artifact_id: MavenArtifactId(captures[2].to_string()),
                version: MavenVersion(captures[4].to_string()),
            },
            artifact_type: artifact_type.to_string(),
            classifier,
            file_extension: extension_for_type(artifact_type, extensions),
        })
    }

    pub fn is_snapshot(&self) -> bool {
        self.coordinates.version.is_snapshot()
    }
}

impl Display for MavenArtifactRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.coordinates.group_id.0, self.coordinates.artifact_id.0, self.artifact_type)?;
        if let MavenClassifier::Classified(c) = &self.classifier {
            write!(f, ":{}", c)?;
        }
        write!(f, ":{}", self.coordinates.version.0)
    }
}

/// The override table is only consulted for types the artifact handlers don't know; unknown
///  types without an override use the type name itself.
pub fn extension_for_type(artifact_type: &str, extensions: Option<&HashMap<String, String>>) -> String {
    lookup(HANDLER_EXTENSIONS, artifact_type)
        .or_else(|| extensions.and_then(|e| e.get(artifact_type)).map(|s| s.as_str()))
        .unwrap_or(artifact_type)
        .to_string()
}

fn lookup(table: &'static [(&'static str, &'static str)], key: &str) -> Option<&'static str> {
    table.iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| *v)
}

#[cfg(test)]
mod test {
    use rstest::*;
    use super::*;

    #[rstest]
    #[case::pom("pom", "pom")]
    #[case::jar("jar", "jar")]
    #[case::test_jar("test-jar", "jar")]
    #[case::maven_plugin("maven-plugin", "jar")]
    #[case::ejb("ejb", "jar")]
    #[case::ejb_client("ejb-client", "jar")]
    #[case::java_source("java-source", "jar")]
    #[case::javadoc("javadoc", "jar")]
    #[case::war("war", "war")]
    #[case::ear("ear", "ear")]
    #[case::rar("rar", "rar")]
    #[case::unknown("bundle", "bundle")]
    fn test_extension_for_type(#[case] artifact_type: &str, #[case] expected: &str) {
        assert_eq!(extension_for_type(artifact_type, None), expected);
    }

    #[test]
    fn test_override_only_for_unknown_types() {
        let extensions = HashMap::from([
            ("jar".to_string(), "zip".to_string()),
            ("bundle".to_string(), "jar".to_string()),
        ]);
        assert_eq!(extension_for_type("jar", Some(&extensions)), "jar");
        assert_eq!(extension_for_type("bundle", Some(&extensions)), "jar");
        assert_eq!(extension_for_type("nar", Some(&extensions)), "nar");
    }

    #[test]
    fn test_parse_without_type() {
        let actual = MavenArtifactRef::parse("org.acme:widget:1.2.3", Some("war"), None, None).unwrap();
        assert_eq!(actual, MavenArtifactRef {
            coordinates: MavenCoordinates {
                group_id: MavenGroupId("org.acme".to_string()),
                artifact_id: MavenArtifactId("widget".to_string()),
                version: MavenVersion("1.2.3".to_string()),
            },
            artifact_type: "war".to_string(),
            classifier: MavenClassifier::Unclassified,
            file_extension: "war".to_string(),
        });
    }

    #[test]
    fn test_parse_explicit_type_wins_over_packaging() {
        let actual = MavenArtifactRef::parse("org.acme:widget:pom:1.2.3", Some("jar"), None, None).unwrap();
        assert_eq!(actual.artifact_type, "pom");
        assert_eq!(actual.file_extension, "pom");
    }

    #[test]
    fn test_parse_defaults_packaging_to_jar() {
        let actual = MavenArtifactRef::parse("org.acme:widget:1.2.3", None, None, None).unwrap();
        assert_eq!(actual.artifact_type, "jar");
        assert_eq!(actual.file_extension, "jar");
    }

    #[rstest]
    #[case::test_jar("test-jar", None, Some("tests"))]
    #[case::ejb_client("ejb-client", None, Some("client"))]
    #[case::javadoc("javadoc", None, Some("sources"))]
    #[case::jar("jar", None, None)]
    #[case::configured_wins("test-jar", Some("it"), Some("it"))]
    fn test_parse_classifier(#[case] packaging: &str, #[case] configured: Option<&str>, #[case] expected: Option<&str>) {
        let actual = MavenArtifactRef::parse("g:a:1", Some(packaging), configured, None).unwrap();
        assert_eq!(actual.classifier.as_option(), expected);
    }

    #[rstest]
    #[case::no_colons("bad-coordinate")]
    #[case::one_colon("group:artifact")]
    #[case::too_many_segments("g:a:t:c:1.0")]
    #[case::empty_group(":a:1.0")]
    #[case::empty_artifact("g::1.0")]
    #[case::empty_version("g:a:")]
    #[case::empty_type("g:a::1.0")]
    #[case::empty("")]
    fn test_parse_malformed(#[case] coordinate: &str) {
        let actual = MavenArtifactRef::parse(coordinate, None, None, None);
        assert!(matches!(actual, Err(ExistsError::MalformedCoordinate(c)) if c == coordinate));
    }

    #[rstest]
    #[case::release("g:a:1.0", false)]
    #[case::snapshot("g:a:1.0-SNAPSHOT", true)]
    #[case::lowercase("g:a:1.0-snapshot", false)]
    #[case::infix("g:a:1.0-SNAPSHOT-1", false)]
    fn test_is_snapshot(#[case] coordinate: &str, #[case] expected: bool) {
        let actual = MavenArtifactRef::parse(coordinate, None, None, None).unwrap();
        assert_eq!(actual.is_snapshot(), expected);
    }

    #[rstest]
    #[case::plain("g.h:a:1.0", None, "g.h:a:jar:1.0")]
    #[case::classified("g.h:a:1.0", Some("sources"), "g.h:a:jar:sources:1.0")]
    fn test_display(#[case] coordinate: &str, #[case] classifier: Option<&str>, #[case] expected: &str) {
        let actual = MavenArtifactRef::parse(coordinate, None, classifier, None).unwrap();
        assert_eq!(actual.to_string(), expected);
    }
}
