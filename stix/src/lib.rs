//! #opencti-stix2
//!
//! Import STIX 2 bundles into an OpenCTI platform, and export platform entities back to STIX 2.
//!
//! The crate decodes bundles into typed STIX objects ([`object::StixObject`]), then drives a caller-supplied
//! [`platform::OpenCti`] client to look up or create the matching platform records ([`importer::Stix2Importer`]).
//! The [`export`] helpers go the other way, from platform entities to STIX objects ready to be bundled.
//!
//! Logging goes through the `log` facade; the crate never installs a logger.

pub mod base;
pub mod bundles;
pub mod config;
pub mod domain_objects;
pub mod error;
pub mod export;
pub mod importer;
pub mod json;
pub mod meta_objects;
pub mod object;
pub mod platform;
pub mod relationship_objects;
pub mod types;
