//! An in-memory `OpenCti` that records every call, for tests.

use crate::{
    error::StixError as Error,
    platform::{
        NewAttackPattern, NewCampaign, NewDomainEntity, NewExternalReference, NewIdentity,
        NewIntrusionSet, NewKillChainPhase, NewMarkingDefinition, NewRelation, NewThreatActor,
        OpenCti, PlatformEntity, PlatformRelation, RelationQuery, RolePair,
    },
};
use serde_json::Value;
use std::{cell::RefCell, collections::HashMap};

/// A stored platform record with the keys it can be looked up by
#[derive(Clone, Debug)]
struct Record {
    entity: PlatformEntity,
    /// Platform type used by `search_stix_domain_entity` (`Identity` for every identity subtype)
    search_type: String,
    /// URL, phase name or `definition_type:definition`, depending on the record
    key: Option<String>,
}

#[derive(Debug, Default)]
struct State {
    domain_entities: Vec<Record>,
    markings: Vec<Record>,
    external_references: Vec<Record>,
    kill_chain_phases: Vec<Record>,
    relations: Vec<(PlatformRelation, RelationQuery)>,
    roles: HashMap<(String, String, String), RolePair>,
    created_by: HashMap<String, String>,
    attachments: Vec<(String, String, String)>,
    calls: Vec<String>,
    created_relations: Vec<NewRelation>,
    fail_on: Option<String>,
    next_id: usize,
}

#[derive(Debug, Default)]
pub(crate) struct MemoryPlatform {
    state: RefCell<State>,
}

impl MemoryPlatform {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Make every call of the named method fail with a platform error
    pub(crate) fn fail_on(&self, method: &str) {
        self.state.borrow_mut().fail_on = Some(method.to_string());
    }

    /// Register the role pair returned for a relation between two entity types
    pub(crate) fn with_role(self, relationship_type: &str, from_type: &str, to_type: &str) -> Self {
        self.state.borrow_mut().roles.insert(
            (
                relationship_type.to_string(),
                from_type.to_string(),
                to_type.to_string(),
            ),
            RolePair {
                from_role: format!("{}_from", relationship_type),
                to_role: format!("{}_to", relationship_type),
            },
        );
        self
    }

    /// Store an existing domain entity, as if created in an earlier run
    pub(crate) fn with_domain_entity(self, entity: PlatformEntity, search_type: &str) -> Self {
        self.state.borrow_mut().domain_entities.push(Record {
            entity,
            search_type: search_type.to_string(),
            key: None,
        });
        self
    }

    /// Store an existing relation, found by `get_stix_relation` when the query matches exactly
    pub(crate) fn with_relation(self, relation: PlatformRelation, query: RelationQuery) -> Self {
        self.state.borrow_mut().relations.push((relation, query));
        self
    }

    /// All calls made so far, as `method` or `method:argument`
    pub(crate) fn calls(&self) -> Vec<String> {
        self.state.borrow().calls.clone()
    }

    /// Calls whose method name starts with `prefix`
    pub(crate) fn calls_to(&self, prefix: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|call| call.starts_with(prefix))
            .collect()
    }

    /// Number of create, update and attach calls
    pub(crate) fn write_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| {
                call.starts_with("create_") || call.starts_with("update_") || call.starts_with("add_")
            })
            .count()
    }

    pub(crate) fn domain_entity(&self, platform_id: &str) -> Option<PlatformEntity> {
        self.state
            .borrow()
            .domain_entities
            .iter()
            .find(|record| record.entity.id == platform_id)
            .map(|record| record.entity.clone())
    }

    pub(crate) fn domain_entity_count(&self) -> usize {
        self.state.borrow().domain_entities.len()
    }

    pub(crate) fn created_by(&self, platform_id: &str) -> Option<String> {
        self.state.borrow().created_by.get(platform_id).cloned()
    }

    /// Attach calls as `(kind, entity id, attached id)`
    pub(crate) fn attachments(&self) -> Vec<(String, String, String)> {
        self.state.borrow().attachments.clone()
    }

    pub(crate) fn created_relations(&self) -> Vec<NewRelation> {
        self.state.borrow().created_relations.clone()
    }

    fn record_call(&self, method: &str, argument: &str) -> Result<(), Error> {
        let mut state = self.state.borrow_mut();
        if argument.is_empty() {
            state.calls.push(method.to_string());
        } else {
            state.calls.push(format!("{}:{}", method, argument));
        }
        if state.fail_on.as_deref() == Some(method) {
            return Err(Error::Platform(format!("{} failed", method)));
        }
        Ok(())
    }

    fn next_id(&self, prefix: &str) -> String {
        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        format!("{}-{}", prefix, state.next_id)
    }

    fn store_domain_entity(
        &self,
        entity_type: &str,
        search_type: &str,
        new_entity: &NewDomainEntity,
    ) -> PlatformEntity {
        let entity = PlatformEntity {
            id: self.next_id("entity"),
            entity_type: entity_type.to_string(),
            stix_id: Some(new_entity.stix_id.clone()),
            name: Some(new_entity.name.clone()),
            description: Some(new_entity.description.clone()),
            created: new_entity.created.clone(),
            modified: new_entity.modified.clone(),
            ..Default::default()
        };
        self.state.borrow_mut().domain_entities.push(Record {
            entity: entity.clone(),
            search_type: search_type.to_string(),
            key: None,
        });
        entity
    }

    fn find(records: &[Record], matches: impl Fn(&Record) -> bool) -> Option<PlatformEntity> {
        records
            .iter()
            .find(|record| matches(record))
            .map(|record| record.entity.clone())
    }
}

impl OpenCti for MemoryPlatform {
    fn get_stix_domain_entity_by_stix_id(&self, stix_id: &str) -> Result<Option<PlatformEntity>, Error> {
        self.record_call("get_stix_domain_entity_by_stix_id", stix_id)?;
        let state = self.state.borrow();
        Ok(Self::find(&state.domain_entities, |record| {
            record.entity.stix_id.as_deref() == Some(stix_id)
        }))
    }

    fn get_marking_definition_by_stix_id(&self, stix_id: &str) -> Result<Option<PlatformEntity>, Error> {
        self.record_call("get_marking_definition_by_stix_id", stix_id)?;
        let state = self.state.borrow();
        Ok(Self::find(&state.markings, |record| {
            record.entity.stix_id.as_deref() == Some(stix_id)
        }))
    }

    fn get_marking_definition_by_definition(
        &self,
        definition_type: &str,
        definition: &str,
    ) -> Result<Option<PlatformEntity>, Error> {
        let key = format!("{}:{}", definition_type, definition);
        self.record_call("get_marking_definition_by_definition", &key)?;
        let state = self.state.borrow();
        Ok(Self::find(&state.markings, |record| {
            record.key.as_deref() == Some(key.as_str())
        }))
    }

    fn search_stix_domain_entity(&self, name: &str, entity_type: &str) -> Result<Option<PlatformEntity>, Error> {
        self.record_call("search_stix_domain_entity", &format!("{}:{}", entity_type, name))?;
        let state = self.state.borrow();
        Ok(Self::find(&state.domain_entities, |record| {
            record.search_type == entity_type && record.entity.name.as_deref() == Some(name)
        }))
    }

    fn get_external_reference_by_url(&self, url: &str) -> Result<Option<PlatformEntity>, Error> {
        self.record_call("get_external_reference_by_url", url)?;
        let state = self.state.borrow();
        Ok(Self::find(&state.external_references, |record| {
            record.key.as_deref() == Some(url)
        }))
    }

    fn get_kill_chain_phase(&self, phase_name: &str) -> Result<Option<PlatformEntity>, Error> {
        self.record_call("get_kill_chain_phase", phase_name)?;
        let state = self.state.borrow();
        Ok(Self::find(&state.kill_chain_phases, |record| {
            record.key.as_deref() == Some(phase_name)
        }))
    }

    fn get_stix_relation_by_stix_id(&self, stix_id: &str) -> Result<Option<PlatformRelation>, Error> {
        self.record_call("get_stix_relation_by_stix_id", stix_id)?;
        let state = self.state.borrow();
        Ok(state
            .relations
            .iter()
            .find(|(relation, _)| relation.stix_id.as_deref() == Some(stix_id))
            .map(|(relation, _)| relation.clone()))
    }

    fn get_stix_relation(&self, query: &RelationQuery) -> Result<Option<PlatformRelation>, Error> {
        self.record_call("get_stix_relation", &query.relationship_type)?;
        let state = self.state.borrow();
        Ok(state
            .relations
            .iter()
            .find(|(_, existing)| existing == query)
            .map(|(relation, _)| relation.clone()))
    }

    fn resolve_role(
        &self,
        relationship_type: &str,
        from_type: &str,
        to_type: &str,
    ) -> Result<Option<RolePair>, Error> {
        self.record_call(
            "resolve_role",
            &format!("{}:{}:{}", relationship_type, from_type, to_type),
        )?;
        let state = self.state.borrow();
        Ok(state
            .roles
            .get(&(
                relationship_type.to_string(),
                from_type.to_string(),
                to_type.to_string(),
            ))
            .cloned())
    }

    fn create_marking_definition(&self, marking: &NewMarkingDefinition) -> Result<PlatformEntity, Error> {
        self.record_call("create_marking_definition", &marking.stix_id)?;
        let entity = PlatformEntity {
            id: self.next_id("marking"),
            entity_type: "marking-definition".to_string(),
            stix_id: Some(marking.stix_id.clone()),
            ..Default::default()
        };
        self.state.borrow_mut().markings.push(Record {
            entity: entity.clone(),
            search_type: "Marking-Definition".to_string(),
            key: Some(format!("{}:{}", marking.definition_type, marking.definition)),
        });
        Ok(entity)
    }

    fn create_external_reference(&self, reference: &NewExternalReference) -> Result<PlatformEntity, Error> {
        self.record_call("create_external_reference", &reference.url)?;
        let entity = PlatformEntity {
            id: self.next_id("reference"),
            entity_type: "external-reference".to_string(),
            stix_id: reference.stix_id.clone(),
            ..Default::default()
        };
        self.state.borrow_mut().external_references.push(Record {
            entity: entity.clone(),
            search_type: "External-Reference".to_string(),
            key: Some(reference.url.clone()),
        });
        Ok(entity)
    }

    fn create_kill_chain_phase(&self, phase: &NewKillChainPhase) -> Result<PlatformEntity, Error> {
        self.record_call("create_kill_chain_phase", &phase.phase_name)?;
        let entity = PlatformEntity {
            id: self.next_id("phase"),
            entity_type: "kill-chain-phase".to_string(),
            stix_id: phase.stix_id.clone(),
            ..Default::default()
        };
        self.state.borrow_mut().kill_chain_phases.push(Record {
            entity: entity.clone(),
            search_type: "Kill-Chain-Phase".to_string(),
            key: Some(phase.phase_name.clone()),
        });
        Ok(entity)
    }

    fn create_identity(&self, identity: &NewIdentity) -> Result<PlatformEntity, Error> {
        self.record_call("create_identity", &identity.entity.name)?;
        Ok(self.store_domain_entity(identity.identity_type.as_ref(), "Identity", &identity.entity))
    }

    fn create_threat_actor(&self, threat_actor: &NewThreatActor) -> Result<PlatformEntity, Error> {
        self.record_call("create_threat_actor", &threat_actor.entity.name)?;
        Ok(self.store_domain_entity("Threat-Actor", "Threat-Actor", &threat_actor.entity))
    }

    fn create_intrusion_set(&self, intrusion_set: &NewIntrusionSet) -> Result<PlatformEntity, Error> {
        self.record_call("create_intrusion_set", &intrusion_set.entity.name)?;
        Ok(self.store_domain_entity("Intrusion-Set", "Intrusion-Set", &intrusion_set.entity))
    }

    fn create_campaign(&self, campaign: &NewCampaign) -> Result<PlatformEntity, Error> {
        self.record_call("create_campaign", &campaign.entity.name)?;
        Ok(self.store_domain_entity("Campaign", "Campaign", &campaign.entity))
    }

    fn create_incident(&self, incident: &NewCampaign) -> Result<PlatformEntity, Error> {
        self.record_call("create_incident", &incident.entity.name)?;
        Ok(self.store_domain_entity("Incident", "Incident", &incident.entity))
    }

    fn create_malware(&self, malware: &NewDomainEntity) -> Result<PlatformEntity, Error> {
        self.record_call("create_malware", &malware.name)?;
        Ok(self.store_domain_entity("Malware", "Malware", malware))
    }

    fn create_tool(&self, tool: &NewDomainEntity) -> Result<PlatformEntity, Error> {
        self.record_call("create_tool", &tool.name)?;
        Ok(self.store_domain_entity("Tool", "Tool", tool))
    }

    fn create_vulnerability(&self, vulnerability: &NewDomainEntity) -> Result<PlatformEntity, Error> {
        self.record_call("create_vulnerability", &vulnerability.name)?;
        Ok(self.store_domain_entity("Vulnerability", "Vulnerability", vulnerability))
    }

    fn create_attack_pattern(&self, attack_pattern: &NewAttackPattern) -> Result<PlatformEntity, Error> {
        self.record_call("create_attack_pattern", &attack_pattern.entity.name)?;
        Ok(self.store_domain_entity("Attack-Pattern", "Attack-Pattern", &attack_pattern.entity))
    }

    fn create_course_of_action(&self, course_of_action: &NewDomainEntity) -> Result<PlatformEntity, Error> {
        self.record_call("create_course_of_action", &course_of_action.name)?;
        Ok(self.store_domain_entity("Course-Of-Action", "Course-Of-Action", course_of_action))
    }

    fn create_relation(&self, relation: &NewRelation) -> Result<PlatformRelation, Error> {
        self.record_call("create_relation", &relation.stix_id)?;
        let created = PlatformRelation {
            id: self.next_id("relation"),
            stix_id: Some(relation.stix_id.clone()),
            relationship_type: Some(relation.relationship_type.clone()),
        };
        let query = RelationQuery {
            from_id: relation.from_id.clone(),
            to_id: relation.to_id.clone(),
            relationship_type: relation.relationship_type.clone(),
            first_seen: Some(relation.first_seen.clone()),
            last_seen: Some(relation.last_seen.clone()),
        };
        let mut state = self.state.borrow_mut();
        state.relations.push((created.clone(), query));
        state.created_relations.push(relation.clone());
        Ok(created)
    }

    fn update_stix_domain_entity_field(&self, entity_id: &str, key: &str, value: &Value) -> Result<(), Error> {
        self.record_call("update_stix_domain_entity_field", &format!("{}:{}", entity_id, key))?;
        let mut state = self.state.borrow_mut();
        if key == "alias" {
            let aliases: Vec<String> = serde_json::from_value(value.clone())
                .map_err(|e| Error::Platform(e.to_string()))?;
            if let Some(record) = state
                .domain_entities
                .iter_mut()
                .find(|record| record.entity.id == entity_id)
            {
                record.entity.alias = aliases;
            }
        }
        Ok(())
    }

    fn update_stix_domain_entity_created_by_ref(&self, entity_id: &str, identity_id: &str) -> Result<(), Error> {
        self.record_call("update_stix_domain_entity_created_by_ref", entity_id)?;
        self.state
            .borrow_mut()
            .created_by
            .insert(entity_id.to_string(), identity_id.to_string());
        Ok(())
    }

    fn add_marking_definition(&self, entity_id: &str, marking_definition_id: &str) -> Result<(), Error> {
        self.record_call("add_marking_definition", entity_id)?;
        self.state.borrow_mut().attachments.push((
            "marking".to_string(),
            entity_id.to_string(),
            marking_definition_id.to_string(),
        ));
        Ok(())
    }

    fn add_external_reference(&self, entity_id: &str, external_reference_id: &str) -> Result<(), Error> {
        self.record_call("add_external_reference", entity_id)?;
        self.state.borrow_mut().attachments.push((
            "external-reference".to_string(),
            entity_id.to_string(),
            external_reference_id.to_string(),
        ));
        Ok(())
    }

    fn add_kill_chain_phase(&self, entity_id: &str, kill_chain_phase_id: &str) -> Result<(), Error> {
        self.record_call("add_kill_chain_phase", entity_id)?;
        self.state.borrow_mut().attachments.push((
            "kill-chain-phase".to_string(),
            entity_id.to_string(),
            kill_chain_phase_id.to_string(),
        ));
        Ok(())
    }
}
