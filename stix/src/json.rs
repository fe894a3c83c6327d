//! Functions for decoding STIX objects from already-parsed JSON values.

use crate::error::StixError as Error;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Get the STIX object type of a generic STIX object JSON value.
///
/// This is the only shape check the importer performs: the value must be a JSON object with string `type` and `id` fields.
pub fn get_object_type(json_value: &Value) -> Result<&str, Error> {
    let (Some(Value::String(object_type)), Some(Value::String(_))) =
        (json_value.get("type"), json_value.get("id"))
    else {
        return Err(Error::UnexpectedJsonFormat);
    };

    Ok(object_type)
}

/// Deserialize a JSON value into a typed record, keeping the serde error message.
pub fn decode<T: DeserializeOwned>(json_value: Value) -> Result<T, Error> {
    serde_json::from_value(json_value).map_err(|e| Error::DeserializationError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use crate::{error::StixError as Error, json::*};
    use serde_json::json;

    #[test]
    fn get_type_from_json() {
        let value = json!({
            "type": "identity",
            "id": "identity--cc7fa653-c35f-43db-afdd-dce4c3a241d5",
            "name": "ACME",
        });

        assert_eq!(get_object_type(&value).unwrap(), "identity");
    }

    #[test]
    fn missing_id_is_unexpected() {
        let value = json!({ "type": "identity", "name": "ACME" });

        assert_eq!(get_object_type(&value), Err(Error::UnexpectedJsonFormat));
        assert_eq!(
            get_object_type(&json!(["identity"])),
            Err(Error::UnexpectedJsonFormat)
        );
    }
}
