//! Top level STIX object structures and implementation
use crate::{
    base::{CommonProperties, Stix},
    domain_objects::sdo_types::{
        AttackPattern, Campaign, CourseOfAction, Identity, Incident, IntrusionSet, Malware,
        ThreatActor, Tool, Vulnerability,
    },
    error::StixError as Error,
    json,
    meta_objects::marking_definition::MarkingDefinition,
    relationship_objects::Relationship,
    types::ObjectKind,
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;

/// Any STIX object type the connector does not import.
///
/// Only the type and id are interpreted, every other property is kept as raw JSON so the object can be re-serialized.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnknownObject {
    #[serde(rename = "type")]
    pub object_type: String,
    pub id: String,
    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

/// A bundle entry that could not be decoded into its kind's record.
///
/// The raw JSON is kept and serialized back unchanged; `reason` holds the decoding error.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct InvalidObject {
    #[serde(skip)]
    pub object_type: String,
    #[serde(skip)]
    pub id: String,
    #[serde(skip)]
    pub reason: String,
    pub value: Value,
}

impl InvalidObject {
    /// The importable kind named by the entry's `type`, if any
    pub fn kind(&self) -> Option<ObjectKind> {
        ObjectKind::from_str(&self.object_type).ok()
    }

    /// The decoding error as a `StixError`
    pub fn error(&self) -> Error {
        Error::DeserializationError(format!(
            "object {} could not be decoded: {}",
            self.id, self.reason
        ))
    }
}

/// The STIX objects found in a bundle, one variant per importable kind
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum StixObject {
    MarkingDefinition(MarkingDefinition),
    Identity(Identity),
    ThreatActor(ThreatActor),
    IntrusionSet(IntrusionSet),
    Campaign(Campaign),
    Incident(Incident),
    Malware(Malware),
    Tool(Tool),
    Vulnerability(Vulnerability),
    AttackPattern(AttackPattern),
    CourseOfAction(CourseOfAction),
    Relationship(Relationship),
    Unknown(UnknownObject),
    Invalid(InvalidObject),
}

impl StixObject {
    /// Decode any STIX Object from a parsed JSON value, based on its `type` property.
    ///
    /// Unrecognized types become `StixObject::Unknown` rather than an error.
    pub fn from_value(json_value: Value) -> Result<Self, Error> {
        let object_type = json::get_object_type(&json_value)?;

        let Ok(kind) = ObjectKind::from_str(object_type) else {
            return Ok(StixObject::Unknown(json::decode(json_value)?));
        };

        let object = match kind {
            ObjectKind::MarkingDefinition => StixObject::MarkingDefinition(json::decode(json_value)?),
            ObjectKind::Identity => StixObject::Identity(json::decode(json_value)?),
            ObjectKind::ThreatActor => StixObject::ThreatActor(json::decode(json_value)?),
            ObjectKind::IntrusionSet => StixObject::IntrusionSet(json::decode(json_value)?),
            ObjectKind::Campaign => StixObject::Campaign(json::decode(json_value)?),
            ObjectKind::Incident => StixObject::Incident(json::decode(json_value)?),
            ObjectKind::Malware => StixObject::Malware(json::decode(json_value)?),
            ObjectKind::Tool => StixObject::Tool(json::decode(json_value)?),
            ObjectKind::Vulnerability => StixObject::Vulnerability(json::decode(json_value)?),
            ObjectKind::AttackPattern => StixObject::AttackPattern(json::decode(json_value)?),
            ObjectKind::CourseOfAction => StixObject::CourseOfAction(json::decode(json_value)?),
            ObjectKind::Relationship => StixObject::Relationship(json::decode(json_value)?),
        };

        Ok(object)
    }

    /// Decode a bundle entry, keeping it as `StixObject::Invalid` when it cannot be decoded
    pub fn from_value_or_invalid(json_value: Value) -> Self {
        match Self::from_value(json_value.clone()) {
            Ok(object) => object,
            Err(e) => {
                let field = |key: &str| {
                    json_value
                        .get(key)
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string()
                };
                StixObject::Invalid(InvalidObject {
                    object_type: field("type"),
                    id: field("id"),
                    reason: e.to_string(),
                    value: json_value,
                })
            }
        }
    }

    /// Deserialize any STIX Object from a JSON string
    pub fn from_json(json_str: &str) -> Result<Self, Error> {
        let json_value: Value = serde_json::from_str(json_str)
            .map_err(|e| Error::DeserializationError(e.to_string()))?;
        Self::from_value(json_value)
    }

    /// The importable kind of this object, or `None` for unknown types
    pub fn kind(&self) -> Option<ObjectKind> {
        match self {
            StixObject::MarkingDefinition(_) => Some(ObjectKind::MarkingDefinition),
            StixObject::Identity(_) => Some(ObjectKind::Identity),
            StixObject::ThreatActor(_) => Some(ObjectKind::ThreatActor),
            StixObject::IntrusionSet(_) => Some(ObjectKind::IntrusionSet),
            StixObject::Campaign(_) => Some(ObjectKind::Campaign),
            StixObject::Incident(_) => Some(ObjectKind::Incident),
            StixObject::Malware(_) => Some(ObjectKind::Malware),
            StixObject::Tool(_) => Some(ObjectKind::Tool),
            StixObject::Vulnerability(_) => Some(ObjectKind::Vulnerability),
            StixObject::AttackPattern(_) => Some(ObjectKind::AttackPattern),
            StixObject::CourseOfAction(_) => Some(ObjectKind::CourseOfAction),
            StixObject::Relationship(_) => Some(ObjectKind::Relationship),
            StixObject::Unknown(_) => None,
            StixObject::Invalid(invalid) => invalid.kind(),
        }
    }

    /// Get the specific type of the STIX Object, as found in its `type` property
    pub fn get_type(&self) -> &str {
        match self {
            StixObject::Unknown(unknown) => &unknown.object_type,
            StixObject::Invalid(invalid) => &invalid.object_type,
            _ => self.kind().map(<&'static str>::from).unwrap_or_default(),
        }
    }

    /// Get the id of the STIX Object
    pub fn get_id(&self) -> &str {
        match self {
            StixObject::Unknown(unknown) => &unknown.id,
            StixObject::Invalid(invalid) => &invalid.id,
            _ => self
                .common_properties()
                .map(|common| common.id.as_str())
                .unwrap_or_default(),
        }
    }

    /// View the object through the `Stix` trait, or `None` for unknown types
    pub fn as_stix(&self) -> Option<&dyn Stix> {
        match self {
            StixObject::MarkingDefinition(object) => Some(object),
            StixObject::Identity(object) => Some(object),
            StixObject::ThreatActor(object) => Some(object),
            StixObject::IntrusionSet(object) => Some(object),
            StixObject::Campaign(object) => Some(object),
            StixObject::Incident(object) => Some(object),
            StixObject::Malware(object) => Some(object),
            StixObject::Tool(object) => Some(object),
            StixObject::Vulnerability(object) => Some(object),
            StixObject::AttackPattern(object) => Some(object),
            StixObject::CourseOfAction(object) => Some(object),
            StixObject::Relationship(object) => Some(object),
            StixObject::Unknown(_) | StixObject::Invalid(_) => None,
        }
    }

    /// The common properties of the object, or `None` for unknown types
    pub fn common_properties(&self) -> Option<&CommonProperties> {
        self.as_stix().map(|object| object.common_properties())
    }

    pub fn common_properties_mut(&mut self) -> Option<&mut CommonProperties> {
        match self {
            StixObject::MarkingDefinition(object) => Some(&mut object.common_properties),
            StixObject::Identity(object) => Some(&mut object.common_properties),
            StixObject::ThreatActor(object) => Some(&mut object.common_properties),
            StixObject::IntrusionSet(object) => Some(&mut object.common_properties),
            StixObject::Campaign(object) => Some(&mut object.common_properties),
            StixObject::Incident(object) => Some(&mut object.common_properties),
            StixObject::Malware(object) => Some(&mut object.common_properties),
            StixObject::Tool(object) => Some(&mut object.common_properties),
            StixObject::Vulnerability(object) => Some(&mut object.common_properties),
            StixObject::AttackPattern(object) => Some(&mut object.common_properties),
            StixObject::CourseOfAction(object) => Some(&mut object.common_properties),
            StixObject::Relationship(object) => Some(&mut object.common_properties),
            StixObject::Unknown(_) | StixObject::Invalid(_) => None,
        }
    }
}

impl<'de> Deserialize<'de> for StixObject {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let json_value = Value::deserialize(deserializer)?;
        StixObject::from_value(json_value).map_err(serde::de::Error::custom)
    }
}
