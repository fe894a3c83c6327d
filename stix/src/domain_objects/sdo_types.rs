//! Data structures for the STIX Domain Objects (SDOs) the platform imports.

use crate::base::{CommonProperties, ExtensionProperties, Stix};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

/// Attack Patterns are a type of TTP that describe ways that adversaries attempt to compromise targets.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackPattern {
    #[serde(rename = "type")]
    pub object_type: String,
    #[serde(flatten)]
    pub common_properties: CommonProperties,
    /// A name used to identify the Attack Pattern.
    pub name: String,
    pub description: Option<String>,
    /// Alternative names used to identify this Attack Pattern.
    pub aliases: Option<Vec<String>>,
    #[serde(flatten)]
    pub extension_properties: ExtensionProperties,
}

/// A Campaign is a grouping of adversarial behaviors that describes a set of malicious activities or attacks
/// that occur over a period of time against a specific set of targets.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Campaign {
    #[serde(rename = "type")]
    pub object_type: String,
    #[serde(flatten)]
    pub common_properties: CommonProperties,
    /// A name used to identify the Campaign.
    pub name: String,
    pub description: Option<String>,
    /// Alternative names used to identify this Campaign
    pub aliases: Option<Vec<String>>,
    /// The time that this Campaign was first seen.
    pub first_seen: Option<String>,
    /// The time that this Campaign was last seen.
    pub last_seen: Option<String>,
    /// The Campaign’s primary goal, objective, desired outcome, or intended effect.
    pub objective: Option<String>,
    #[serde(flatten)]
    pub extension_properties: ExtensionProperties,
}

/// A Course of Action is a recommendation from a producer of intelligence to a consumer on the actions that they might take in response to that intelligence.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseOfAction {
    #[serde(rename = "type")]
    pub object_type: String,
    #[serde(flatten)]
    pub common_properties: CommonProperties,
    pub name: String,
    pub description: Option<String>,
    #[serde(flatten)]
    pub extension_properties: ExtensionProperties,
}

/// Identities can represent actual individuals, organizations, or groups, as well as classes of individuals, organizations, systems or groups.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    #[serde(rename = "type")]
    pub object_type: String,
    #[serde(flatten)]
    pub common_properties: CommonProperties,
    /// The name of this Identity.
    pub name: String,
    pub description: Option<String>,
    /// The type of entity that this Identity describes, e.g., an individual or organization.
    ///
    /// The value **SHOULD** come from the `identity-class-ov` open vocabulary.
    pub identity_class: Option<String>,
    /// The list of industry sectors that this Identity belongs to.
    pub sectors: Option<Vec<String>>,
    /// The contact information (e-mail, phone number, etc.) for this Identity.
    pub contact_information: Option<String>,
    #[serde(flatten)]
    pub extension_properties: ExtensionProperties,
}

/// An Incident is a security event in the platform's model, predating the STIX 2.1 stub object of the same name.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Incident {
    #[serde(rename = "type")]
    pub object_type: String,
    #[serde(flatten)]
    pub common_properties: CommonProperties,
    pub name: String,
    pub description: Option<String>,
    pub aliases: Option<Vec<String>>,
    pub first_seen: Option<String>,
    pub last_seen: Option<String>,
    pub objective: Option<String>,
    #[serde(flatten)]
    pub extension_properties: ExtensionProperties,
}

/// An Intrusion Set is a grouped set of adversarial behaviors and resources with common properties that is
/// believed to be orchestrated by a single organization.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntrusionSet {
    #[serde(rename = "type")]
    pub object_type: String,
    #[serde(flatten)]
    pub common_properties: CommonProperties,
    /// A name used to identify this Intrusion Set.
    pub name: String,
    pub description: Option<String>,
    /// Alternative names used to identify this Intrusion Set.
    pub aliases: Option<Vec<String>>,
    /// The time that this Intrusion Set was first seen.
    pub first_seen: Option<String>,
    /// The time that this Intrusion Set was last seen.
    pub last_seen: Option<String>,
    /// The high-level goals of this Intrusion Set, namely, what are they trying to do.
    pub goals: Option<Vec<String>>,
    pub sophistication: Option<String>,
    /// This property specifies the organizational level at which this Intrusion Set typically works.
    pub resource_level: Option<String>,
    /// The primary reason, motivation, or purpose behind this Intrusion Set.
    pub primary_motivation: Option<String>,
    /// The secondary reasons, motivations, or purposes behind this Intrusion Set.
    pub secondary_motivations: Option<Vec<String>>,
    pub personal_motivations: Option<Vec<String>>,
    #[serde(flatten)]
    pub extension_properties: ExtensionProperties,
}

/// Malware is a type of TTP that represents malicious code.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Malware {
    #[serde(rename = "type")]
    pub object_type: String,
    #[serde(flatten)]
    pub common_properties: CommonProperties,
    pub name: String,
    pub description: Option<String>,
    /// A set of terms that describe the type of malware being described.
    pub malware_types: Option<Vec<String>>,
    /// Alternative names used to identify this malware or malware family.
    pub aliases: Option<Vec<String>>,
    #[serde(flatten)]
    pub extension_properties: ExtensionProperties,
}

/// Threat Actors are actual individuals, groups, or organizations believed to be operating with malicious intent.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreatActor {
    #[serde(rename = "type")]
    pub object_type: String,
    #[serde(flatten)]
    pub common_properties: CommonProperties,
    /// A name used to identify this Threat Actor or Threat Actor group.
    pub name: String,
    /// A description that provides more details and context about the Threat Actor.
    pub description: Option<String>,
    /// A list of other names that this Threat Actor is believed to use.
    pub aliases: Option<Vec<String>>,
    /// The high-level goals of this Threat Actor.
    pub goals: Option<Vec<String>>,
    /// The skill or expertise a Threat Actor must have to perform the attack.
    pub sophistication: Option<String>,
    /// Defines the organizational level at which this Threat Actor typically works.
    pub resource_level: Option<String>,
    /// The primary reason, motivation, or purpose behind this Threat Actor.
    pub primary_motivation: Option<String>,
    /// The secondary reasons, motivations, or purposes behind this Threat Actor.
    pub secondary_motivations: Option<Vec<String>>,
    /// The personal reasons, motivations, or purposes of the Threat Actor.
    pub personal_motivations: Option<Vec<String>>,
    #[serde(flatten)]
    pub extension_properties: ExtensionProperties,
}

/// Tools are legitimate software that can be used by threat actors to perform attacks.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tool {
    #[serde(rename = "type")]
    pub object_type: String,
    #[serde(flatten)]
    pub common_properties: CommonProperties,
    pub name: String,
    pub description: Option<String>,
    pub tool_types: Option<Vec<String>>,
    pub aliases: Option<Vec<String>>,
    pub tool_version: Option<String>,
    #[serde(flatten)]
    pub extension_properties: ExtensionProperties,
}

/// A Vulnerability is a weakness or defect in the requirements, designs, or implementations of the computational logic found in software and some hardware components.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vulnerability {
    #[serde(rename = "type")]
    pub object_type: String,
    #[serde(flatten)]
    pub common_properties: CommonProperties,
    pub name: String,
    pub description: Option<String>,
    #[serde(flatten)]
    pub extension_properties: ExtensionProperties,
}

impl Stix for AttackPattern {
    fn common_properties(&self) -> &CommonProperties {
        &self.common_properties
    }
    fn extension_properties(&self) -> Option<&ExtensionProperties> {
        Some(&self.extension_properties)
    }
    fn aliases(&self) -> Option<&Vec<String>> {
        self.aliases.as_ref()
    }
}

impl Stix for Campaign {
    fn common_properties(&self) -> &CommonProperties {
        &self.common_properties
    }
    fn extension_properties(&self) -> Option<&ExtensionProperties> {
        Some(&self.extension_properties)
    }
    fn aliases(&self) -> Option<&Vec<String>> {
        self.aliases.as_ref()
    }
}

impl Stix for CourseOfAction {
    fn common_properties(&self) -> &CommonProperties {
        &self.common_properties
    }
    fn extension_properties(&self) -> Option<&ExtensionProperties> {
        Some(&self.extension_properties)
    }
}

// Identities have no standard `aliases`; OpenCTI exports them as `x_opencti_aliases`
impl Stix for Identity {
    fn common_properties(&self) -> &CommonProperties {
        &self.common_properties
    }
    fn extension_properties(&self) -> Option<&ExtensionProperties> {
        Some(&self.extension_properties)
    }
}

impl Stix for Incident {
    fn common_properties(&self) -> &CommonProperties {
        &self.common_properties
    }
    fn extension_properties(&self) -> Option<&ExtensionProperties> {
        Some(&self.extension_properties)
    }
    fn aliases(&self) -> Option<&Vec<String>> {
        self.aliases.as_ref()
    }
}

impl Stix for IntrusionSet {
    fn common_properties(&self) -> &CommonProperties {
        &self.common_properties
    }
    fn extension_properties(&self) -> Option<&ExtensionProperties> {
        Some(&self.extension_properties)
    }
    fn aliases(&self) -> Option<&Vec<String>> {
        self.aliases.as_ref()
    }
}

impl Stix for Malware {
    fn common_properties(&self) -> &CommonProperties {
        &self.common_properties
    }
    fn extension_properties(&self) -> Option<&ExtensionProperties> {
        Some(&self.extension_properties)
    }
    fn aliases(&self) -> Option<&Vec<String>> {
        self.aliases.as_ref()
    }
}

impl Stix for ThreatActor {
    fn common_properties(&self) -> &CommonProperties {
        &self.common_properties
    }
    fn extension_properties(&self) -> Option<&ExtensionProperties> {
        Some(&self.extension_properties)
    }
    fn aliases(&self) -> Option<&Vec<String>> {
        self.aliases.as_ref()
    }
}

impl Stix for Tool {
    fn common_properties(&self) -> &CommonProperties {
        &self.common_properties
    }
    fn extension_properties(&self) -> Option<&ExtensionProperties> {
        Some(&self.extension_properties)
    }
    fn aliases(&self) -> Option<&Vec<String>> {
        self.aliases.as_ref()
    }
}

impl Stix for Vulnerability {
    fn common_properties(&self) -> &CommonProperties {
        &self.common_properties
    }
    fn extension_properties(&self) -> Option<&ExtensionProperties> {
        Some(&self.extension_properties)
    }
}
