//! The remote OpenCTI platform as seen by the importer.
//!
//! The importer never talks to the network itself. It drives an [`OpenCti`] implementation supplied by the caller,
//! typically a GraphQL client, and only looks at the records that implementation returns.

#[cfg(test)]
pub(crate) mod memory;

use crate::{error::StixError as Error, types::PlatformIdentityType};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_with::skip_serializing_none;

/// A marking definition attached to a platform entity, as returned by the platform.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformMarkingDefinition {
    pub id: String,
    pub stix_id: String,
    pub definition_type: String,
    pub definition: String,
    pub created: Option<String>,
    pub modified: Option<String>,
}

/// A record owned by the platform: a domain entity, marking definition, external reference or kill chain phase.
///
/// `id` is the platform's own identifier and is distinct from the STIX id. Only `id` and `type` are guaranteed;
/// the descriptive fields are filled in when the platform returns them and are used by the export helpers.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformEntity {
    pub id: String,
    #[serde(rename = "type")]
    pub entity_type: String,
    #[serde(rename = "stix_id")]
    pub stix_id: Option<String>,
    #[serde(rename = "stix_label", default)]
    pub stix_label: Vec<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub alias: Vec<String>,
    pub created: Option<String>,
    pub modified: Option<String>,
    pub goal: Option<Vec<String>>,
    pub sophistication: Option<String>,
    #[serde(rename = "resource_level")]
    pub resource_level: Option<String>,
    #[serde(rename = "primary_motivation")]
    pub primary_motivation: Option<String>,
    #[serde(rename = "secondary_motivation")]
    pub secondary_motivation: Option<Vec<String>>,
    #[serde(rename = "personal_motivation")]
    pub personal_motivation: Option<Vec<String>>,
    #[serde(rename = "first_seen")]
    pub first_seen: Option<String>,
    #[serde(rename = "last_seen")]
    pub last_seen: Option<String>,
    pub objective: Option<String>,
    /// The identity that created this entity
    pub created_by_ref: Option<Box<PlatformEntity>>,
    #[serde(default)]
    pub marking_definitions: Vec<PlatformMarkingDefinition>,
}

/// A typed relation between two platform entities.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformRelation {
    pub id: String,
    pub stix_id: Option<String>,
    pub relationship_type: Option<String>,
}

/// The directional role names the platform uses for the two ends of a relation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolePair {
    pub from_role: String,
    pub to_role: String,
}

/// Fields shared by every domain entity creation.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct NewDomainEntity {
    pub name: String,
    pub description: String,
    pub stix_id: String,
    pub created: Option<String>,
    pub modified: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NewIdentity {
    pub identity_type: PlatformIdentityType,
    #[serde(flatten)]
    pub entity: NewDomainEntity,
}

#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct NewThreatActor {
    #[serde(flatten)]
    pub entity: NewDomainEntity,
    pub goals: Option<Vec<String>>,
    pub sophistication: Option<String>,
    pub resource_level: Option<String>,
    pub primary_motivation: Option<String>,
    pub secondary_motivations: Option<Vec<String>>,
    pub personal_motivations: Option<Vec<String>>,
}

#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct NewIntrusionSet {
    #[serde(flatten)]
    pub entity: NewDomainEntity,
    pub first_seen: Option<String>,
    pub last_seen: Option<String>,
    pub goals: Option<Vec<String>>,
    pub sophistication: Option<String>,
    pub resource_level: Option<String>,
    pub primary_motivation: Option<String>,
    pub secondary_motivations: Option<Vec<String>>,
    pub personal_motivations: Option<Vec<String>>,
}

/// Creation fields for campaigns and incidents, which the platform models the same way.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct NewCampaign {
    #[serde(flatten)]
    pub entity: NewDomainEntity,
    pub objective: Option<String>,
    pub first_seen: Option<String>,
    pub last_seen: Option<String>,
}

#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct NewAttackPattern {
    #[serde(flatten)]
    pub entity: NewDomainEntity,
    pub platforms: Option<Vec<String>>,
    pub permissions_required: Option<Vec<String>>,
}

#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct NewMarkingDefinition {
    pub definition_type: String,
    pub definition: String,
    pub level: i64,
    pub color: Option<String>,
    pub stix_id: String,
    pub created: Option<String>,
    pub modified: Option<String>,
}

#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct NewExternalReference {
    pub source_name: String,
    pub url: String,
    pub external_id: Option<String>,
    pub description: Option<String>,
    pub stix_id: Option<String>,
}

#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct NewKillChainPhase {
    pub kill_chain_name: String,
    pub phase_name: String,
    pub stix_id: Option<String>,
}

/// The attributes an equivalent relation is matched on.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RelationQuery {
    pub from_id: String,
    pub to_id: String,
    pub relationship_type: String,
    pub first_seen: Option<String>,
    pub last_seen: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct NewRelation {
    pub from_id: String,
    pub from_role: String,
    pub to_id: String,
    pub to_role: String,
    pub relationship_type: String,
    pub first_seen: String,
    pub last_seen: String,
    pub weight: i64,
    pub stix_id: String,
}

/// The remote procedures of the OpenCTI platform used by the importer.
///
/// Lookups return `Ok(None)` when the platform has no matching record. Any `Err` is treated as a remote failure
/// and is propagated unchanged by the importer.
pub trait OpenCti {
    // Lookups
    fn get_stix_domain_entity_by_stix_id(&self, stix_id: &str) -> Result<Option<PlatformEntity>, Error>;
    fn get_marking_definition_by_stix_id(&self, stix_id: &str) -> Result<Option<PlatformEntity>, Error>;
    fn get_marking_definition_by_definition(
        &self,
        definition_type: &str,
        definition: &str,
    ) -> Result<Option<PlatformEntity>, Error>;
    /// Search a domain entity of the given platform type (e.g. `Threat-Actor`) by name
    fn search_stix_domain_entity(&self, name: &str, entity_type: &str) -> Result<Option<PlatformEntity>, Error>;
    fn get_external_reference_by_url(&self, url: &str) -> Result<Option<PlatformEntity>, Error>;
    fn get_kill_chain_phase(&self, phase_name: &str) -> Result<Option<PlatformEntity>, Error>;
    fn get_stix_relation_by_stix_id(&self, stix_id: &str) -> Result<Option<PlatformRelation>, Error>;
    fn get_stix_relation(&self, query: &RelationQuery) -> Result<Option<PlatformRelation>, Error>;
    /// Resolve the directional roles of a relation type between two platform entity types
    fn resolve_role(
        &self,
        relationship_type: &str,
        from_type: &str,
        to_type: &str,
    ) -> Result<Option<RolePair>, Error>;

    // Creations
    fn create_marking_definition(&self, marking: &NewMarkingDefinition) -> Result<PlatformEntity, Error>;
    fn create_external_reference(&self, reference: &NewExternalReference) -> Result<PlatformEntity, Error>;
    fn create_kill_chain_phase(&self, phase: &NewKillChainPhase) -> Result<PlatformEntity, Error>;
    fn create_identity(&self, identity: &NewIdentity) -> Result<PlatformEntity, Error>;
    fn create_threat_actor(&self, threat_actor: &NewThreatActor) -> Result<PlatformEntity, Error>;
    fn create_intrusion_set(&self, intrusion_set: &NewIntrusionSet) -> Result<PlatformEntity, Error>;
    fn create_campaign(&self, campaign: &NewCampaign) -> Result<PlatformEntity, Error>;
    fn create_incident(&self, incident: &NewCampaign) -> Result<PlatformEntity, Error>;
    fn create_malware(&self, malware: &NewDomainEntity) -> Result<PlatformEntity, Error>;
    fn create_tool(&self, tool: &NewDomainEntity) -> Result<PlatformEntity, Error>;
    fn create_vulnerability(&self, vulnerability: &NewDomainEntity) -> Result<PlatformEntity, Error>;
    fn create_attack_pattern(&self, attack_pattern: &NewAttackPattern) -> Result<PlatformEntity, Error>;
    fn create_course_of_action(&self, course_of_action: &NewDomainEntity) -> Result<PlatformEntity, Error>;
    fn create_relation(&self, relation: &NewRelation) -> Result<PlatformRelation, Error>;

    // Updates
    fn update_stix_domain_entity_field(&self, entity_id: &str, key: &str, value: &Value) -> Result<(), Error>;
    fn update_stix_domain_entity_created_by_ref(&self, entity_id: &str, identity_id: &str) -> Result<(), Error>;
    fn add_marking_definition(&self, entity_id: &str, marking_definition_id: &str) -> Result<(), Error>;
    fn add_external_reference(&self, entity_id: &str, external_reference_id: &str) -> Result<(), Error>;
    fn add_kill_chain_phase(&self, entity_id: &str, kill_chain_phase_id: &str) -> Result<(), Error>;
}
