//! Serializable view structs for templates and the REST API.

pub mod catalog;
