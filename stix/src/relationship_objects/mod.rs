//! Data structures and functions for STIX Relationship Objects (SROs).

use crate::base::{CommonProperties, Stix};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use serde_with::skip_serializing_none;

/// The `x_opencti_*` attributes OpenCTI attaches to relationships.
///
/// These are always serialized, with `null` for absent values.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenCtiRelationProperties {
    #[serde(default)]
    pub x_opencti_description: Option<String>,
    #[serde(default)]
    pub x_opencti_first_seen: Option<String>,
    #[serde(default)]
    pub x_opencti_last_seen: Option<String>,
    #[serde(default)]
    pub x_opencti_weight: Option<i64>,
}

/// The property names defaulted by [`prepare_relationship`].
pub const OPENCTI_RELATION_KEYS: [&str; 4] = [
    "x_opencti_description",
    "x_opencti_first_seen",
    "x_opencti_last_seen",
    "x_opencti_weight",
];

/// Represents a generic STIX relationship between two objects.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Relationship {
    #[serde(rename = "type")]
    pub object_type: String,
    /// Common object properties
    #[serde(flatten)]
    pub common_properties: CommonProperties,
    /// The name used to identify the type of Relationship.
    pub relationship_type: String,
    /// Provides more details and context about the Relationship, potentially including its purpose and its key characteristics.
    pub description: Option<String>,
    /// The id of the source (from) object.
    pub source_ref: String,
    /// The id of the target (to) object.
    pub target_ref: String,
    #[serde(flatten)]
    pub opencti_properties: OpenCtiRelationProperties,
}

impl Stix for Relationship {
    fn common_properties(&self) -> &CommonProperties {
        &self.common_properties
    }
}

/// Ensure the four `x_opencti_*` relationship attributes are present, setting the missing ones to `null`.
///
/// Used on raw relationship JSON before it is exported.
pub fn prepare_relationship(mut relationship: Map<String, Value>) -> Map<String, Value> {
    for key in OPENCTI_RELATION_KEYS {
        relationship.entry(key).or_insert(Value::Null);
    }
    relationship
}
