//! Properties shared by every STIX object the connector handles.

use crate::types::{ExternalReference, KillChainPhase};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

/// Properties that are common across the STIX Objects imported by the connector.
///
/// This struct is intended to be nested and flattened inside of a specific STIX Object.
/// Only presence is checked on import; timestamps and identifiers are carried as-is.
#[skip_serializing_none]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Default, Deserialize)]
pub struct CommonProperties {
    /// The version of the STIX specification used to represent this object.
    pub spec_version: Option<String>,
    /// Uniquely identifies this object.
    pub id: String,
    /// Specifies the identity that describes the entity that created this object.
    pub created_by_ref: Option<String>,
    /// Represents the time at which the object was originally created.
    pub created: Option<String>,
    /// Represents the time that this particular version of the object was last modified.
    pub modified: Option<String>,
    /// Specifies an optional set of terms used to describe this object.
    pub labels: Option<Vec<String>>,
    /// Specifies a list of external references which refers to non-STIX information.
    pub external_references: Option<Vec<ExternalReference>>,
    /// Specifies a list of identities of marking-definition objects that apply to this object.
    pub object_marking_refs: Option<Vec<String>>,
    /// The kill chain phase(s) this object belongs to.
    ///
    /// STIX only defines this on a few SDOs, but MITRE and OpenCTI emit it on more, so it is accepted everywhere.
    pub kill_chain_phases: Option<Vec<KillChainPhase>>,
}

/// Vendor extension attributes (`x_opencti_*` and `x_mitre_*`) found at the top level of STIX objects.
#[skip_serializing_none]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Default, Deserialize)]
pub struct ExtensionProperties {
    pub x_opencti_aliases: Option<Vec<String>>,
    pub x_mitre_aliases: Option<Vec<String>>,
    /// Marking definition level, used by the platform to order markings.
    pub x_opencti_level: Option<i64>,
    /// Marking definition display color.
    pub x_opencti_color: Option<String>,
    pub x_mitre_platforms: Option<Vec<String>>,
    pub x_mitre_permissions_required: Option<Vec<String>>,
}

/// Access to the properties the importer reads from every importable STIX object.
pub trait Stix {
    /// The common STIX properties of the object.
    fn common_properties(&self) -> &CommonProperties;

    /// The vendor extension attributes of the object, if the object type carries them.
    fn extension_properties(&self) -> Option<&ExtensionProperties> {
        None
    }

    /// The standard STIX `aliases` property, for the object types that define one.
    fn aliases(&self) -> Option<&Vec<String>> {
        None
    }

    /// The aliases to merge into the platform entity.
    ///
    /// `aliases` wins over `x_mitre_aliases`, which wins over `x_opencti_aliases`. The first one present is used, even if empty.
    fn stix_aliases(&self) -> Option<&Vec<String>> {
        self.aliases().or_else(|| {
            let extensions = self.extension_properties()?;
            extensions
                .x_mitre_aliases
                .as_ref()
                .or(extensions.x_opencti_aliases.as_ref())
        })
    }
}
