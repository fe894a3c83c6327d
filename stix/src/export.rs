//! Export platform entities back into STIX objects.
//!
//! The exported objects carry the platform's STIX ids, labels and timestamps. Identities and marking definitions
//! referenced by an entity are exported alongside it so the result can be placed in a [`Bundle`](crate::bundles::Bundle)
//! as is.

pub use crate::relationship_objects::prepare_relationship;

use crate::{
    base::CommonProperties,
    domain_objects::sdo_types::{Campaign, Identity, IntrusionSet, ThreatActor},
    meta_objects::marking_definition::MarkingDefinition,
    object::StixObject,
    platform::{PlatformEntity, PlatformMarkingDefinition},
    types::{derive_stix_id, identity_class_for, stix_case, ObjectKind},
};
use std::collections::BTreeMap;

fn common_properties(entity: &PlatformEntity, stix_id: String) -> CommonProperties {
    CommonProperties {
        id: stix_id,
        labels: Some(entity.stix_label.clone()),
        created: entity.created.clone(),
        modified: entity.modified.clone(),
        ..Default::default()
    }
}

fn identity(entity: &PlatformEntity) -> Identity {
    // Identities are stored under their platform type (e.g. `organization--...`)
    let stix_id = derive_stix_id(
        entity.stix_id.as_deref().unwrap_or_default(),
        &stix_case(&entity.entity_type),
        ObjectKind::Identity.as_ref(),
    );
    let mut identity = Identity {
        object_type: ObjectKind::Identity.to_string(),
        common_properties: common_properties(entity, stix_id),
        name: entity.name.clone().unwrap_or_default(),
        description: entity.description.clone(),
        identity_class: Some(identity_class_for(&entity.entity_type)),
        ..Default::default()
    };
    identity.extension_properties.x_opencti_aliases = Some(entity.alias.clone());
    identity
}

fn marking_definition(marking: &PlatformMarkingDefinition) -> MarkingDefinition {
    MarkingDefinition {
        object_type: ObjectKind::MarkingDefinition.to_string(),
        common_properties: CommonProperties {
            id: marking.stix_id.clone(),
            created: marking.created.clone(),
            modified: marking.modified.clone(),
            ..Default::default()
        },
        definition_type: Some(marking.definition_type.clone()),
        definition: Some(BTreeMap::from([(
            marking.definition_type.clone(),
            marking.definition.clone(),
        )])),
        ..Default::default()
    }
}

/// Export a platform identity (user, organization, sector, region, country or city) as a STIX identity.
///
/// The type segment of the id is normalised to `identity--`, so `organization--<uuid>` is exported as `identity--<uuid>`.
pub fn export_identity(entity: &PlatformEntity) -> StixObject {
    StixObject::Identity(identity(entity))
}

/// Export a platform threat actor, with its creator and marking definitions
pub fn export_threat_actor(entity: &PlatformEntity) -> Vec<StixObject> {
    let threat_actor = ThreatActor {
        object_type: ObjectKind::ThreatActor.to_string(),
        common_properties: common_properties(entity, entity.stix_id.clone().unwrap_or_default()),
        name: entity.name.clone().unwrap_or_default(),
        description: entity.description.clone(),
        aliases: Some(entity.alias.clone()),
        goals: entity.goal.clone(),
        sophistication: entity.sophistication.clone(),
        resource_level: entity.resource_level.clone(),
        primary_motivation: entity.primary_motivation.clone(),
        secondary_motivations: entity.secondary_motivation.clone(),
        personal_motivations: entity.personal_motivation.clone(),
        ..Default::default()
    };
    prepare_export(entity, StixObject::ThreatActor(threat_actor))
}

/// Export a platform intrusion set, with its creator and marking definitions
pub fn export_intrusion_set(entity: &PlatformEntity) -> Vec<StixObject> {
    let intrusion_set = IntrusionSet {
        object_type: ObjectKind::IntrusionSet.to_string(),
        common_properties: common_properties(entity, entity.stix_id.clone().unwrap_or_default()),
        name: entity.name.clone().unwrap_or_default(),
        description: entity.description.clone(),
        aliases: Some(entity.alias.clone()),
        first_seen: entity.first_seen.clone(),
        last_seen: entity.last_seen.clone(),
        goals: entity.goal.clone(),
        sophistication: entity.sophistication.clone(),
        resource_level: entity.resource_level.clone(),
        primary_motivation: entity.primary_motivation.clone(),
        secondary_motivations: entity.secondary_motivation.clone(),
        ..Default::default()
    };
    prepare_export(entity, StixObject::IntrusionSet(intrusion_set))
}

/// Export a platform campaign, with its creator and marking definitions
pub fn export_campaign(entity: &PlatformEntity) -> Vec<StixObject> {
    let campaign = Campaign {
        object_type: ObjectKind::Campaign.to_string(),
        common_properties: common_properties(entity, entity.stix_id.clone().unwrap_or_default()),
        name: entity.name.clone().unwrap_or_default(),
        description: entity.description.clone(),
        aliases: Some(entity.alias.clone()),
        first_seen: entity.first_seen.clone(),
        last_seen: entity.last_seen.clone(),
        objective: entity.objective.clone(),
        ..Default::default()
    };
    prepare_export(entity, StixObject::Campaign(campaign))
}

/// Bundle an exported object with the objects it references.
///
/// The entity's creator becomes an identity object referenced by `created_by_ref`, and each of its marking
/// definitions becomes a marking-definition object listed in `object_marking_refs`.
/// The creator comes first, then the marking definitions, and the exported object last.
pub fn prepare_export(entity: &PlatformEntity, mut object: StixObject) -> Vec<StixObject> {
    let mut result = Vec::new();
    let Some(common_properties) = object.common_properties_mut() else {
        return vec![object];
    };

    if let Some(created_by) = &entity.created_by_ref {
        let creator = identity(created_by);
        common_properties.created_by_ref = Some(creator.common_properties.id.clone());
        result.push(StixObject::Identity(creator));
    }

    if !entity.marking_definitions.is_empty() {
        let mut marking_refs = Vec::with_capacity(entity.marking_definitions.len());
        for marking in &entity.marking_definitions {
            marking_refs.push(marking.stix_id.clone());
            result.push(StixObject::MarkingDefinition(marking_definition(marking)));
        }
        common_properties.object_marking_refs = Some(marking_refs);
    }

    result.push(object);
    result
}

/// Turn the HTML code tags found in some descriptions into Markdown backticks
pub fn convert_markdown(text: &str) -> String {
    text.replace("<code>", "`").replace("</code>", "`")
}
