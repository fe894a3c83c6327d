//! Translation of STIX relationships into typed platform relations.

use crate::{
    error::StixError as Error,
    importer::{CachedEntity, Stix2Importer},
    platform::{NewRelation, OpenCti, RelationQuery},
    relationship_objects::Relationship,
};
use jiff::Zoned;
use log::{debug, warn};

impl<P: OpenCti> Stix2Importer<P> {
    /// Import a STIX relationship as a platform relation, returning the relation's platform id.
    ///
    /// Both endpoints must already be known, from this importer's mapping cache or from the platform.
    /// Returns `Ok(None)` when an endpoint cannot be found or when the platform has no roles for this relation type
    /// between the two endpoint types.
    pub fn import_relationship(&self, relationship: &Relationship) -> Result<Option<String>, Error> {
        let stix_id = &relationship.common_properties.id;
        if let Some(existing) = self.platform.get_stix_relation_by_stix_id(stix_id)? {
            debug!("Relationship {} already exists as {}", stix_id, existing.id);
            return Ok(Some(existing.id));
        }

        let Some(source) = self.resolve_endpoint(&relationship.source_ref)? else {
            warn!("Source ref of the relationship not found, doing nothing...");
            return Ok(None);
        };
        let Some(target) = self.resolve_endpoint(&relationship.target_ref)? else {
            warn!("Target ref of the relationship not found, doing nothing...");
            return Ok(None);
        };

        let opencti_properties = &relationship.opencti_properties;
        let query = RelationQuery {
            from_id: source.id.clone(),
            to_id: target.id.clone(),
            relationship_type: relationship.relationship_type.clone(),
            first_seen: opencti_properties.x_opencti_first_seen.clone(),
            last_seen: opencti_properties.x_opencti_last_seen.clone(),
        };
        if let Some(existing) = self.platform.get_stix_relation(&query)? {
            debug!(
                "Relationship {} matches existing relation {}",
                stix_id, existing.id
            );
            return Ok(Some(existing.id));
        }

        let Some(roles) = self.platform.resolve_role(
            &relationship.relationship_type,
            &source.entity_type,
            &target.entity_type,
        )?
        else {
            warn!(
                "No roles for relationship \"{}\" from {} to {}, skipping {}",
                relationship.relationship_type, source.entity_type, target.entity_type, stix_id
            );
            return Ok(None);
        };

        let today = Zoned::now().date().to_string();
        let created = self.platform.create_relation(&NewRelation {
            from_id: source.id,
            from_role: roles.from_role,
            to_id: target.id,
            to_role: roles.to_role,
            relationship_type: relationship.relationship_type.clone(),
            first_seen: today.clone(),
            last_seen: today,
            weight: self.config.relation_weight,
            stix_id: stix_id.clone(),
        })?;
        Ok(Some(created.id))
    }

    /// Find the platform record of a relationship endpoint, from the mapping cache first
    fn resolve_endpoint(&self, stix_id: &str) -> Result<Option<CachedEntity>, Error> {
        if let Some(cached) = self.mapping_cache.get(stix_id) {
            return Ok(Some(cached.clone()));
        }
        Ok(self
            .platform
            .get_stix_domain_entity_by_stix_id(stix_id)?
            .map(|entity| CachedEntity {
                id: entity.id,
                entity_type: entity.entity_type,
            }))
    }
}
