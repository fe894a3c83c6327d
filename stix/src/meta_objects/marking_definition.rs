//! Data structures for Marking Definition objects

use crate::base::{CommonProperties, ExtensionProperties, Stix};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use std::collections::BTreeMap;

/// Type Name: marking-definition
///
/// The marking-definition object represents a specific marking. Data markings typically represent
/// handling or sharing requirements for data and are applied in the `object_marking_refs` property on STIX Objects.
///
/// The platform identifies a marking by its `definition_type` (e.g. `tlp`) together with the value stored under
/// that key in `definition` (e.g. `{"tlp": "white"}`).
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkingDefinition {
    #[serde(rename = "type")]
    pub object_type: String,
    /// Common STIX object properties
    #[serde(flatten)]
    pub common_properties: CommonProperties,
    /// A name used to identify the Marking Definition.
    pub name: Option<String>,
    /// The definition_type property identifies the type of Marking Definition.
    pub definition_type: Option<String>,
    /// The definition property contains the marking object itself, keyed by its definition type.
    pub definition: Option<BTreeMap<String, String>>,
    #[serde(flatten)]
    pub extension_properties: ExtensionProperties,
}

impl MarkingDefinition {
    /// The marking value stored under `definition_type` in `definition`, e.g. `white` for `{"tlp": "white"}`.
    pub fn definition_value(&self) -> Option<&str> {
        let definition_type = self.definition_type.as_ref()?;
        self.definition
            .as_ref()?
            .get(definition_type)
            .map(String::as_str)
    }
}

impl Stix for MarkingDefinition {
    fn common_properties(&self) -> &CommonProperties {
        &self.common_properties
    }
    fn extension_properties(&self) -> Option<&ExtensionProperties> {
        Some(&self.extension_properties)
    }
}
