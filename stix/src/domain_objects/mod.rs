//! Data structures for the STIX Domain Objects (SDOs) the platform models.

pub mod sdo_types;
