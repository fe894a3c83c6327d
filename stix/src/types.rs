//! Core types shared by STIX objects and the platform mapping.

use convert_case::{Boundary, Case, Casing};
use log::warn;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use std::str::FromStr;
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

/// Converts a raw string to kebab-case.
///
/// Platform type names such as `Threat-Actor` or `Organization` become their STIX spelling (`threat-actor`, `organization`).
pub fn stix_case(raw_str: &str) -> String {
    raw_str
        .without_boundaries(&[Boundary::UPPER_DIGIT, Boundary::LOWER_DIGIT])
        .to_case(Case::Kebab)
}

/// Rewrite the object-type segment of a `{type}--{uuid}` identifier.
///
/// Only the leading type segment is replaced, and only when it equals `from_type`.
/// Any other identifier is returned unchanged and a warning is logged.
pub fn derive_stix_id(stix_id: &str, from_type: &str, to_type: &str) -> String {
    match stix_id.split_once("--") {
        Some((object_type, uuid)) if object_type == from_type => format!("{}--{}", to_type, uuid),
        _ => {
            warn!(
                "Identifier {} does not start with type '{}', keeping it unchanged instead of deriving a '{}' identifier",
                stix_id, from_type, to_type
            );
            stix_id.to_string()
        }
    }
}

/// The STIX object types this connector knows how to import.
#[derive(
    Debug, PartialEq, Eq, Clone, Copy, Hash, AsRefStr, Display, EnumIter, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "kebab-case")]
pub enum ObjectKind {
    MarkingDefinition,
    Identity,
    ThreatActor,
    IntrusionSet,
    Campaign,
    Incident,
    Malware,
    Tool,
    Vulnerability,
    AttackPattern,
    CourseOfAction,
    Relationship,
}

impl ObjectKind {
    /// The entity type name used by the platform when searching domain entities by name.
    ///
    /// Marking definitions and relationships are not domain entities and return `None`.
    pub fn platform_type(&self) -> Option<&'static str> {
        match self {
            ObjectKind::Identity => Some("Identity"),
            ObjectKind::ThreatActor => Some("Threat-Actor"),
            ObjectKind::IntrusionSet => Some("Intrusion-Set"),
            ObjectKind::Campaign => Some("Campaign"),
            ObjectKind::Incident => Some("Incident"),
            ObjectKind::Malware => Some("Malware"),
            ObjectKind::Tool => Some("Tool"),
            ObjectKind::Vulnerability => Some("Vulnerability"),
            ObjectKind::AttackPattern => Some("Attack-Pattern"),
            ObjectKind::CourseOfAction => Some("Course-Of-Action"),
            ObjectKind::MarkingDefinition | ObjectKind::Relationship => None,
        }
    }
}

/// Values of the STIX `identity_class` open vocabulary that the platform distinguishes.
#[derive(Debug, PartialEq, Eq, Clone, Copy, AsRefStr, EnumIter, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum IdentityClass {
    Individual,
    Organization,
    Group,
    Class,
    Region,
    Country,
    City,
}

/// The concrete identity entity types of the platform.
#[derive(
    Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize, AsRefStr, Display, EnumIter, EnumString,
)]
pub enum PlatformIdentityType {
    User,
    Organization,
    Sector,
    Region,
    Country,
    City,
}

impl From<IdentityClass> for PlatformIdentityType {
    fn from(identity_class: IdentityClass) -> Self {
        match identity_class {
            IdentityClass::Individual => PlatformIdentityType::User,
            IdentityClass::Organization | IdentityClass::Group => PlatformIdentityType::Organization,
            IdentityClass::Class => PlatformIdentityType::Sector,
            IdentityClass::Region => PlatformIdentityType::Region,
            IdentityClass::Country => PlatformIdentityType::Country,
            IdentityClass::City => PlatformIdentityType::City,
        }
    }
}

impl PlatformIdentityType {
    /// Map an optional STIX `identity_class` to a platform identity type.
    ///
    /// Absent or unrecognized classes default to `Organization`.
    pub fn from_identity_class(identity_class: Option<&str>) -> Self {
        identity_class
            .and_then(|class| IdentityClass::from_str(class).ok())
            .map(PlatformIdentityType::from)
            .unwrap_or(PlatformIdentityType::Organization)
    }
}

/// Map a platform entity type back to a STIX `identity_class`.
pub fn identity_class_for(platform_type: &str) -> String {
    match PlatformIdentityType::from_str(platform_type) {
        Ok(PlatformIdentityType::User) => IdentityClass::Individual.as_ref().to_string(),
        Ok(PlatformIdentityType::Sector) => IdentityClass::Class.as_ref().to_string(),
        _ => platform_type.to_lowercase(),
    }
}

/// An external reference that describes pointers to information outside STIX.
///
/// The connector only imports references that carry both a `source_name` and a `url`.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalReference {
    /// The name of the source that this external-reference is defined within (system, registry, organization, etc.).
    pub source_name: Option<String>,
    /// A human readable description.
    pub description: Option<String>,
    /// A URL reference to an external resource.
    pub url: Option<String>,
    /// An identifier for the external reference content.
    pub external_id: Option<String>,
    /// The STIX id the platform assigned to this reference, when exported by OpenCTI.
    pub x_opencti_stix_id: Option<String>,
}

/// Represents a phase in a kill-chain, i.e. one of the phases an attacker may undertake to achieve their objective.
#[skip_serializing_none]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KillChainPhase {
    /// The name of the kill chain.
    pub kill_chain_name: String,
    /// The name of the phase in the kill chain.
    pub phase_name: String,
    pub x_opencti_stix_id: Option<String>,
}

impl KillChainPhase {
    /// Creates a new kill-chain phase
    pub fn new(kill_chain: &str, phase: &str) -> Self {
        Self {
            kill_chain_name: kill_chain.to_string(),
            phase_name: phase.to_string(),
            x_opencti_stix_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::types::*;

    #[test]
    fn identity_class_mapping() {
        assert_eq!(
            PlatformIdentityType::from_identity_class(Some("region")),
            PlatformIdentityType::Region
        );
        assert_eq!(
            PlatformIdentityType::from_identity_class(Some("individual")),
            PlatformIdentityType::User
        );
        assert_eq!(
            PlatformIdentityType::from_identity_class(Some("group")),
            PlatformIdentityType::Organization
        );
        assert_eq!(
            PlatformIdentityType::from_identity_class(Some("class")),
            PlatformIdentityType::Sector
        );
    }

    #[test]
    fn unknown_identity_class_defaults_to_organization() {
        assert_eq!(
            PlatformIdentityType::from_identity_class(Some("unknown")),
            PlatformIdentityType::Organization
        );
        assert_eq!(
            PlatformIdentityType::from_identity_class(None),
            PlatformIdentityType::Organization
        );
    }

    #[test]
    fn reverse_identity_class_mapping() {
        assert_eq!(identity_class_for("User"), "individual");
        assert_eq!(identity_class_for("Sector"), "class");
        assert_eq!(identity_class_for("Organization"), "organization");
        assert_eq!(identity_class_for("Region"), "region");
    }

    #[test]
    fn derive_identifier_replaces_type_segment() {
        let derived = derive_stix_id(
            "identity--cc7fa653-c35f-43db-afdd-dce4c3a241d5",
            "identity",
            "region",
        );
        assert_eq!(derived, "region--cc7fa653-c35f-43db-afdd-dce4c3a241d5");
    }

    #[test]
    fn derive_identifier_only_touches_leading_segment() {
        // A uuid segment that happens to contain the type name is left alone
        let derived = derive_stix_id("user--user-1", "user", "identity");
        assert_eq!(derived, "identity--user-1");
    }

    #[test]
    fn derive_identifier_passes_through_mismatch() {
        let derived = derive_stix_id(
            "organization--cc7fa653-c35f-43db-afdd-dce4c3a241d5",
            "sector",
            "identity",
        );
        assert_eq!(
            derived,
            "organization--cc7fa653-c35f-43db-afdd-dce4c3a241d5"
        );
    }

    #[test]
    fn platform_type_to_stix_case() {
        assert_eq!(&stix_case("Threat-Actor"), "threat-actor");
        assert_eq!(&stix_case("Organization"), "organization");
    }

    #[test]
    fn object_kind_round_trip() {
        assert_eq!(
            ObjectKind::from_str("course-of-action").unwrap(),
            ObjectKind::CourseOfAction
        );
        assert_eq!(ObjectKind::MarkingDefinition.as_ref(), "marking-definition");
        assert!(ObjectKind::from_str("indicator").is_err());
        assert_eq!(ObjectKind::AttackPattern.platform_type(), Some("Attack-Pattern"));
    }
}
