//! Import STIX objects, relationships and bundles into an OpenCTI platform.
//!
//! A [`Stix2Importer`] owns the platform client, an [`ImportConfig`] and a [`MappingCache`].
//! Every call is a sequence of blocking remote calls; nothing is rolled back if a later call fails.

mod create;
mod relationship;

use crate::{
    base::CommonProperties,
    bundles::Bundle,
    config::ImportConfig,
    error::StixError as Error,
    object::StixObject,
    platform::{NewExternalReference, NewKillChainPhase, OpenCti, PlatformEntity},
    types::ObjectKind,
};
use log::{debug, error, info, warn};
use serde_json::{json, Value};
use std::{
    collections::HashMap,
    time::{Duration, Instant},
};
use strum::{Display, EnumIter, IntoEnumIterator};

/// The platform record a STIX id was imported as.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CachedEntity {
    /// Platform id
    pub id: String,
    /// Entity type: the STIX type for objects imported in this run, the platform type for remote lookups
    pub entity_type: String,
}

/// STIX id to platform record mapping, filled as objects are imported.
///
/// The cache lives inside one importer and is cleared at the start of every bundle import, so it only ever
/// reflects the current bundle (plus objects imported one by one since). It is never persisted or shared.
#[derive(Clone, Debug, Default)]
pub struct MappingCache {
    entries: HashMap<String, CachedEntity>,
}

impl MappingCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, stix_id: &str, platform_id: &str, entity_type: &str) {
        self.entries.insert(
            stix_id.to_string(),
            CachedEntity {
                id: platform_id.to_string(),
                entity_type: entity_type.to_string(),
            },
        );
    }

    pub fn get(&self, stix_id: &str) -> Option<&CachedEntity> {
        self.entries.get(stix_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// The four ordered passes of a bundle import.
///
/// Later passes depend on records created by earlier ones: created-by references need identities and
/// relationships need both endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumIter)]
pub enum ImportPass {
    #[strum(to_string = "Marking definitions")]
    MarkingDefinitions,
    #[strum(to_string = "Identities")]
    Identities,
    #[strum(to_string = "Objects")]
    Objects,
    #[strum(to_string = "Relationships")]
    Relationships,
}

impl ImportPass {
    /// Whether an object is imported during this pass.
    ///
    /// The `Objects` pass takes everything but relationships, so marking definitions and identities are seen
    /// a second time and resolve to the records created by the first two passes.
    pub fn includes(&self, object: &StixObject) -> bool {
        let kind = object.kind();
        match self {
            ImportPass::MarkingDefinitions => kind == Some(ObjectKind::MarkingDefinition),
            ImportPass::Identities => kind == Some(ObjectKind::Identity),
            ImportPass::Objects => kind != Some(ObjectKind::Relationship),
            ImportPass::Relationships => kind == Some(ObjectKind::Relationship),
        }
    }
}

/// Outcome counts of one import pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PassReport {
    pub pass: ImportPass,
    /// Objects that resolved to a platform record
    pub imported: usize,
    /// Objects that were skipped without error (unknown type, unresolved reference, ...)
    pub skipped: usize,
    /// Objects whose import returned an error
    pub failed: usize,
    pub duration: Duration,
}

/// Summary of a bundle import.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub passes: Vec<PassReport>,
}

impl ImportReport {
    pub fn pass(&self, pass: ImportPass) -> Option<&PassReport> {
        self.passes.iter().find(|report| report.pass == pass)
    }

    pub fn imported(&self) -> usize {
        self.passes.iter().map(|report| report.imported).sum()
    }

    pub fn skipped(&self) -> usize {
        self.passes.iter().map(|report| report.skipped).sum()
    }

    pub fn failed(&self) -> usize {
        self.passes.iter().map(|report| report.failed).sum()
    }
}

/// Imports STIX content into the platform behind an [`OpenCti`] client.
#[derive(Debug)]
pub struct Stix2Importer<P: OpenCti> {
    platform: P,
    config: ImportConfig,
    mapping_cache: MappingCache,
}

impl<P: OpenCti> Stix2Importer<P> {
    /// Create an importer with the default configuration
    pub fn new(platform: P) -> Self {
        Self::with_config(platform, ImportConfig::default())
    }

    pub fn with_config(platform: P, config: ImportConfig) -> Self {
        Self {
            platform,
            config,
            mapping_cache: MappingCache::new(),
        }
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn into_platform(self) -> P {
        self.platform
    }

    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    pub fn mapping_cache(&self) -> &MappingCache {
        &self.mapping_cache
    }

    /// Import a bundle given as a JSON String
    pub fn import_bundle_json(&mut self, json: &str) -> Result<ImportReport, Error> {
        let json_value: Value = serde_json::from_str(json).map_err(|e| {
            error!("JSON data is not a STIX2 bundle: {}", e);
            Error::DeserializationError(e.to_string())
        })?;
        self.import_bundle_value(&json_value)
    }

    /// Import a bundle given as an already-parsed JSON value.
    ///
    /// A malformed bundle is logged and rejected before any platform call.
    pub fn import_bundle_value(&mut self, json_value: &Value) -> Result<ImportReport, Error> {
        let bundle = Bundle::from_value(json_value).map_err(|e| {
            error!("{}", e);
            e
        })?;
        self.import_bundle(&bundle)
    }

    /// Import every object of a bundle in four passes: marking definitions, identities, all other objects,
    /// then relationships.
    ///
    /// An error on one object is logged and counted, and the pass moves on to the next object.
    pub fn import_bundle(&mut self, bundle: &Bundle) -> Result<ImportReport, Error> {
        if let Err(e) = bundle.check() {
            error!("{}", e);
            return Err(e);
        }

        self.mapping_cache.clear();
        let mut report = ImportReport::default();

        for pass in ImportPass::iter() {
            let start_time = Instant::now();
            let mut pass_report = PassReport {
                pass,
                imported: 0,
                skipped: 0,
                failed: 0,
                duration: Duration::ZERO,
            };

            for object in bundle.get_objects().iter().filter(|o| pass.includes(o)) {
                let result = match object {
                    StixObject::Invalid(invalid) => Err(invalid.error()),
                    StixObject::Relationship(relationship) => self
                        .import_relationship(relationship)
                        .map(|relation_id| relation_id.is_some()),
                    _ => self.import_object(object).map(|entity| entity.is_some()),
                };
                match result {
                    Ok(true) => pass_report.imported += 1,
                    Ok(false) => pass_report.skipped += 1,
                    Err(e) => {
                        error!(
                            "Could not import {} {}: {}",
                            object.get_type(),
                            object.get_id(),
                            e
                        );
                        pass_report.failed += 1;
                    }
                }
            }

            pass_report.duration = start_time.elapsed();
            info!(
                "{} imported in: {}secs",
                pass,
                pass_report.duration.as_secs_f64()
            );
            report.passes.push(pass_report);
        }

        Ok(report)
    }

    /// Import a single STIX object, returning the platform record it resolved to.
    ///
    /// Returns `Ok(None)` for object types the platform does not model. Remote failures, and objects that could not
    /// be decoded, are returned as errors.
    pub fn import_object(&mut self, object: &StixObject) -> Result<Option<PlatformEntity>, Error> {
        if let StixObject::Invalid(invalid) = object {
            return Err(invalid.error());
        }
        let Some(stix_object) = object.as_stix() else {
            self.unknown_type(object);
            return Ok(None);
        };
        let common_properties = stix_object.common_properties();
        let is_marking_definition = matches!(object, StixObject::MarkingDefinition(_));

        // References must already exist on the platform; they are never created here
        let created_by_ref_id = self.resolve_created_by_ref(common_properties)?;
        let marking_definition_ids = self.resolve_marking_definitions(common_properties)?;
        let external_reference_ids = self.resolve_external_references(common_properties)?;
        let kill_chain_phase_ids = self.resolve_kill_chain_phases(common_properties)?;

        let existing = if is_marking_definition {
            self.platform
                .get_marking_definition_by_stix_id(&common_properties.id)?
        } else {
            self.platform
                .get_stix_domain_entity_by_stix_id(&common_properties.id)?
        };
        let entity = match existing {
            Some(entity) => {
                debug!(
                    "{} already exists as {}",
                    common_properties.id, entity.id
                );
                Some(entity)
            }
            None => self.create_object(object)?,
        };
        let Some(entity) = entity else {
            return Ok(None);
        };

        self.mapping_cache
            .insert(&common_properties.id, &entity.id, object.get_type());

        if let Some(aliases) = stix_object.stix_aliases() {
            let merged = merge_aliases(&entity.alias, aliases);
            self.platform
                .update_stix_domain_entity_field(&entity.id, "alias", &json!(merged))?;
        }
        if let Some(created_by_ref_id) = &created_by_ref_id {
            if !is_marking_definition {
                self.platform
                    .update_stix_domain_entity_created_by_ref(&entity.id, created_by_ref_id)?;
            }
        }
        for marking_definition_id in &marking_definition_ids {
            self.platform
                .add_marking_definition(&entity.id, marking_definition_id)?;
        }
        for external_reference_id in &external_reference_ids {
            self.platform
                .add_external_reference(&entity.id, external_reference_id)?;
        }
        for kill_chain_phase_id in &kill_chain_phase_ids {
            self.platform
                .add_kill_chain_phase(&entity.id, kill_chain_phase_id)?;
        }

        Ok(Some(entity))
    }

    fn unknown_type(&self, object: &StixObject) {
        warn!(
            "Unknown object type \"{}\", doing nothing...",
            object.get_type()
        );
    }

    fn resolve_created_by_ref(
        &self,
        common_properties: &CommonProperties,
    ) -> Result<Option<String>, Error> {
        let Some(created_by_ref) = &common_properties.created_by_ref else {
            return Ok(None);
        };
        let creator = self
            .platform
            .get_stix_domain_entity_by_stix_id(created_by_ref)?;
        if creator.is_none() {
            debug!(
                "Creator {} of {} is not on the platform",
                created_by_ref, common_properties.id
            );
        }
        Ok(creator.map(|identity| identity.id))
    }

    fn resolve_marking_definitions(
        &self,
        common_properties: &CommonProperties,
    ) -> Result<Vec<String>, Error> {
        let mut ids = Vec::new();
        for marking_ref in common_properties.object_marking_refs.iter().flatten() {
            if let Some(marking) = self.platform.get_marking_definition_by_stix_id(marking_ref)? {
                ids.push(marking.id);
            }
        }
        Ok(ids)
    }

    fn resolve_external_references(
        &self,
        common_properties: &CommonProperties,
    ) -> Result<Vec<String>, Error> {
        let mut ids = Vec::new();
        for reference in common_properties.external_references.iter().flatten() {
            let (Some(source_name), Some(url)) = (&reference.source_name, &reference.url) else {
                continue;
            };
            let id = match self.platform.get_external_reference_by_url(url)? {
                Some(existing) => existing.id,
                None => {
                    self.platform
                        .create_external_reference(&NewExternalReference {
                            source_name: source_name.clone(),
                            url: url.clone(),
                            external_id: reference.external_id.clone(),
                            description: reference.description.clone(),
                            stix_id: reference.x_opencti_stix_id.clone(),
                        })?
                        .id
                }
            };
            ids.push(id);
        }
        Ok(ids)
    }

    fn resolve_kill_chain_phases(
        &self,
        common_properties: &CommonProperties,
    ) -> Result<Vec<String>, Error> {
        let mut ids = Vec::new();
        for phase in common_properties.kill_chain_phases.iter().flatten() {
            let id = match self.platform.get_kill_chain_phase(&phase.phase_name)? {
                Some(existing) => existing.id,
                None => {
                    self.platform
                        .create_kill_chain_phase(&NewKillChainPhase {
                            kill_chain_name: phase.kill_chain_name.clone(),
                            phase_name: phase.phase_name.clone(),
                            stix_id: phase.x_opencti_stix_id.clone(),
                        })?
                        .id
                }
            };
            ids.push(id);
        }
        Ok(ids)
    }
}

/// Union of the existing aliases and the incoming ones.
///
/// Existing aliases keep their order, followed by the incoming aliases not already present. Comparison is case-sensitive.
pub fn merge_aliases(existing: &[String], incoming: &[String]) -> Vec<String> {
    let mut merged: Vec<String> = Vec::with_capacity(existing.len() + incoming.len());
    for alias in existing.iter().chain(incoming) {
        if !merged.contains(alias) {
            merged.push(alias.clone());
        }
    }
    merged
}
