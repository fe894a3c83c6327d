//! Per-type creation of platform records from STIX objects.
//!
//! Every domain entity is first searched by name and platform type, so importing the same object twice returns
//! the record created the first time.

use crate::{
    base::CommonProperties,
    error::StixError as Error,
    importer::Stix2Importer,
    meta_objects::marking_definition::MarkingDefinition,
    object::StixObject,
    platform::{
        NewAttackPattern, NewCampaign, NewDomainEntity, NewIdentity, NewIntrusionSet,
        NewMarkingDefinition, NewThreatActor, OpenCti, PlatformEntity,
    },
    types::{derive_stix_id, ObjectKind, PlatformIdentityType},
};
use log::debug;

impl<P: OpenCti> Stix2Importer<P> {
    /// Create the platform record for an object that is not on the platform yet.
    ///
    /// Objects the platform does not model are logged and give `Ok(None)`.
    pub(super) fn create_object(&self, object: &StixObject) -> Result<Option<PlatformEntity>, Error> {
        let entity = match object {
            StixObject::MarkingDefinition(marking) => self.create_marking_definition(marking)?,
            StixObject::Identity(identity) => {
                let identity_type =
                    PlatformIdentityType::from_identity_class(identity.identity_class.as_deref());
                let platform_stix_id = derive_stix_id(
                    &identity.common_properties.id,
                    ObjectKind::Identity.as_ref(),
                    &identity_type.as_ref().to_lowercase(),
                );
                let entity = self.new_entity(
                    &identity.name,
                    identity.description.as_deref(),
                    &identity.common_properties,
                );
                self.find_or_create(&identity.name, ObjectKind::Identity, |platform| {
                    platform.create_identity(&NewIdentity {
                        identity_type,
                        entity: NewDomainEntity {
                            stix_id: platform_stix_id,
                            ..entity
                        },
                    })
                })?
            }
            StixObject::ThreatActor(threat_actor) => {
                self.find_or_create(&threat_actor.name, ObjectKind::ThreatActor, |platform| {
                    platform.create_threat_actor(&NewThreatActor {
                        entity: self.new_entity(
                            &threat_actor.name,
                            threat_actor.description.as_deref(),
                            &threat_actor.common_properties,
                        ),
                        goals: threat_actor.goals.clone(),
                        sophistication: threat_actor.sophistication.clone(),
                        resource_level: threat_actor.resource_level.clone(),
                        primary_motivation: threat_actor.primary_motivation.clone(),
                        secondary_motivations: threat_actor.secondary_motivations.clone(),
                        personal_motivations: threat_actor.personal_motivations.clone(),
                    })
                })?
            }
            StixObject::IntrusionSet(intrusion_set) => {
                self.find_or_create(&intrusion_set.name, ObjectKind::IntrusionSet, |platform| {
                    platform.create_intrusion_set(&NewIntrusionSet {
                        entity: self.new_entity(
                            &intrusion_set.name,
                            intrusion_set.description.as_deref(),
                            &intrusion_set.common_properties,
                        ),
                        first_seen: intrusion_set.first_seen.clone(),
                        last_seen: intrusion_set.last_seen.clone(),
                        goals: intrusion_set.goals.clone(),
                        sophistication: intrusion_set.sophistication.clone(),
                        resource_level: intrusion_set.resource_level.clone(),
                        primary_motivation: intrusion_set.primary_motivation.clone(),
                        secondary_motivations: intrusion_set.secondary_motivations.clone(),
                        personal_motivations: intrusion_set.personal_motivations.clone(),
                    })
                })?
            }
            StixObject::Campaign(campaign) => {
                self.find_or_create(&campaign.name, ObjectKind::Campaign, |platform| {
                    platform.create_campaign(&NewCampaign {
                        entity: self.new_entity(
                            &campaign.name,
                            campaign.description.as_deref(),
                            &campaign.common_properties,
                        ),
                        objective: campaign.objective.clone(),
                        first_seen: campaign.first_seen.clone(),
                        last_seen: campaign.last_seen.clone(),
                    })
                })?
            }
            StixObject::Incident(incident) => {
                self.find_or_create(&incident.name, ObjectKind::Incident, |platform| {
                    platform.create_incident(&NewCampaign {
                        entity: self.new_entity(
                            &incident.name,
                            incident.description.as_deref(),
                            &incident.common_properties,
                        ),
                        objective: incident.objective.clone(),
                        first_seen: incident.first_seen.clone(),
                        last_seen: incident.last_seen.clone(),
                    })
                })?
            }
            StixObject::Malware(malware) => {
                let entity = self.new_entity(
                    &malware.name,
                    malware.description.as_deref(),
                    &malware.common_properties,
                );
                self.find_or_create(&malware.name, ObjectKind::Malware, |platform| {
                    platform.create_malware(&entity)
                })?
            }
            StixObject::Tool(tool) => {
                let entity =
                    self.new_entity(&tool.name, tool.description.as_deref(), &tool.common_properties);
                self.find_or_create(&tool.name, ObjectKind::Tool, |platform| {
                    platform.create_tool(&entity)
                })?
            }
            StixObject::Vulnerability(vulnerability) => {
                let entity = self.new_entity(
                    &vulnerability.name,
                    vulnerability.description.as_deref(),
                    &vulnerability.common_properties,
                );
                self.find_or_create(&vulnerability.name, ObjectKind::Vulnerability, |platform| {
                    platform.create_vulnerability(&entity)
                })?
            }
            StixObject::AttackPattern(attack_pattern) => {
                let extensions = &attack_pattern.extension_properties;
                self.find_or_create(&attack_pattern.name, ObjectKind::AttackPattern, |platform| {
                    platform.create_attack_pattern(&NewAttackPattern {
                        entity: self.new_entity(
                            &attack_pattern.name,
                            attack_pattern.description.as_deref(),
                            &attack_pattern.common_properties,
                        ),
                        platforms: extensions.x_mitre_platforms.clone(),
                        permissions_required: extensions.x_mitre_permissions_required.clone(),
                    })
                })?
            }
            StixObject::CourseOfAction(course_of_action) => {
                let entity = self.new_entity(
                    &course_of_action.name,
                    course_of_action.description.as_deref(),
                    &course_of_action.common_properties,
                );
                self.find_or_create(&course_of_action.name, ObjectKind::CourseOfAction, |platform| {
                    platform.create_course_of_action(&entity)
                })?
            }
            // Relationships are imported through `import_relationship`
            StixObject::Relationship(_) | StixObject::Unknown(_) | StixObject::Invalid(_) => {
                self.unknown_type(object);
                return Ok(None);
            }
        };
        Ok(Some(entity))
    }

    /// Return the entity of this kind with the same name, or create it
    fn find_or_create(
        &self,
        name: &str,
        kind: ObjectKind,
        create: impl FnOnce(&P) -> Result<PlatformEntity, Error>,
    ) -> Result<PlatformEntity, Error> {
        let platform_type = kind.platform_type().unwrap_or_else(|| kind.into());
        if let Some(existing) = self.platform.search_stix_domain_entity(name, platform_type)? {
            debug!("Found {} \"{}\" as {}", platform_type, name, existing.id);
            return Ok(existing);
        }
        let created = create(&self.platform)?;
        debug!("Created {} \"{}\" as {}", platform_type, name, created.id);
        Ok(created)
    }

    fn new_entity(
        &self,
        name: &str,
        description: Option<&str>,
        common_properties: &CommonProperties,
    ) -> NewDomainEntity {
        NewDomainEntity {
            name: name.to_string(),
            description: description
                .unwrap_or(&self.config.default_description)
                .to_string(),
            stix_id: common_properties.id.clone(),
            created: common_properties.created.clone(),
            modified: common_properties.modified.clone(),
        }
    }

    fn create_marking_definition(&self, marking: &MarkingDefinition) -> Result<PlatformEntity, Error> {
        let missing = |property: &str| Error::MissingProperty {
            object_type: ObjectKind::MarkingDefinition.to_string(),
            property: property.to_string(),
        };
        let definition_type = marking
            .definition_type
            .as_deref()
            .ok_or_else(|| missing("definition_type"))?;
        let definition = marking
            .definition_value()
            .ok_or_else(|| missing("definition"))?;

        if let Some(existing) = self
            .platform
            .get_marking_definition_by_definition(definition_type, definition)?
        {
            return Ok(existing);
        }

        let extensions = &marking.extension_properties;
        self.platform.create_marking_definition(&NewMarkingDefinition {
            definition_type: definition_type.to_string(),
            definition: definition.to_string(),
            level: extensions
                .x_opencti_level
                .unwrap_or(self.config.default_marking_level),
            color: extensions.x_opencti_color.clone(),
            stix_id: marking.common_properties.id.clone(),
            created: marking.common_properties.created.clone(),
            modified: marking.common_properties.modified.clone(),
        })
    }
}
