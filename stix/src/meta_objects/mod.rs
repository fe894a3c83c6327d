//! Data structures for STIX Meta Objects (SMOs).

pub mod marking_definition;
