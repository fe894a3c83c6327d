//! Contains the implementation logic for STIX Bundles

use serde::Serialize;
use serde_json::Value;

use crate::{
    error::{return_multiple_errors, StixError as Error},
    object::StixObject,
    types::ObjectKind,
};

/// A Bundle is a collection of arbitrary STIX Objects grouped together in a single container.
///
/// A Bundle does not have any semantic meaning and the objects contained within the Bundle are not considered related by virtue of being in the same Bundle.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Bundle {
    /// The type property identifies the type of object.
    ///
    /// The value of this property **MUST** be bundle.
    #[serde(rename = "type")]
    pub object_type: String,
    /// An identifier for this Bundle
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    /// Specifies a set of one or more STIX Objects.
    objects: Vec<StixObject>,
}

impl Bundle {
    /// Construct a new STIX bundle, starting with an initial STIX object (because Lists in STIX cannot be empty)
    pub fn new(id: &str, object: StixObject) -> Self {
        Self {
            object_type: "bundle".to_string(),
            id: Some(id.to_string()),
            objects: vec![object],
        }
    }

    /// Add an additional STIX object to an existing Stix bundle
    pub fn add(&mut self, object: StixObject) {
        self.objects.push(object);
    }

    /// Build a bundle from an already-parsed JSON value.
    ///
    /// The value must be a JSON object whose `type` is `bundle` and whose `objects` list is not empty.
    /// An object that cannot be decoded into its kind's record is kept as `StixObject::Invalid`, so it fails on its
    /// own at import time without affecting the rest of the bundle.
    pub fn from_value(json_value: &Value) -> Result<Self, Error> {
        let mut errors = Vec::new();

        let object_type = json_value.get("type").and_then(Value::as_str);
        if object_type != Some("bundle") {
            errors.push(Error::MalformedBundle(
                "JSON data type is not a STIX2 bundle".to_string(),
            ));
        }

        let raw_objects = match json_value.get("objects").and_then(Value::as_array) {
            Some(raw_objects) if !raw_objects.is_empty() => raw_objects.as_slice(),
            _ => {
                errors.push(Error::MalformedBundle(
                    "JSON data objects is empty".to_string(),
                ));
                &[]
            }
        };

        let objects: Vec<StixObject> = raw_objects
            .iter()
            .cloned()
            .map(StixObject::from_value_or_invalid)
            .collect();

        return_multiple_errors(errors)?;

        Ok(Self {
            object_type: "bundle".to_string(),
            id: json_value
                .get("id")
                .and_then(Value::as_str)
                .map(str::to_string),
            objects,
        })
    }

    /// Check the shape of a bundle built in code: its type must be `bundle` and it must hold at least one object
    pub fn check(&self) -> Result<(), Error> {
        let mut errors = Vec::new();
        if self.object_type != "bundle" {
            errors.push(Error::MalformedBundle(
                "JSON data type is not a STIX2 bundle".to_string(),
            ));
        }
        if self.objects.is_empty() {
            errors.push(Error::MalformedBundle(
                "JSON data objects is empty".to_string(),
            ));
        }
        return_multiple_errors(errors)
    }

    /// Deserialize a bundle from a JSON String and check its shape
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let json_value: Value =
            serde_json::from_str(json).map_err(|e| Error::DeserializationError(e.to_string()))?;
        Self::from_value(&json_value)
    }

    /// Serialize the bundle to a JSON String
    pub fn to_json(&self) -> Result<String, Error> {
        serde_json::to_string(self).map_err(|e| Error::SerializationError(e.to_string()))
    }

    /// Return the id of the bundle, if it has one
    pub fn get_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Return a list of all objects in the bundle
    pub fn get_objects(&self) -> &[StixObject] {
        &self.objects
    }

    /// Iterate over the objects of the given kind, in bundle order
    pub fn objects_of_kind(&self, kind: ObjectKind) -> impl Iterator<Item = &StixObject> {
        self.objects
            .iter()
            .filter(move |object| object.kind() == Some(kind))
    }
}
