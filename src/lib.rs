//! Core library exports for the Localserve marketplace.
//!
//! This crate exposes the domain, models, repositories, routes and service
//! layers used by the Localserve web application. The `data` feature builds
//! only the persistence/domain layer; the `server` feature adds the full
//! Actix-web application on top.

#[cfg(feature = "server")]
pub mod auth;
#[cfg(feature = "data")]
pub mod db;
#[cfg(feature = "data")]
pub mod domain;
#[cfg(feature = "server")]
pub mod dto;
#[cfg(feature = "server")]
pub mod error_conversions;
#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "data")]
pub mod models;
#[cfg(feature = "data")]
pub mod pagination;
#[cfg(feature = "data")]
pub mod repository;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "data")]
pub mod schema;
#[cfg(feature = "server")]
pub mod services;

/// Role granted to registered customers.
pub const CUSTOMER_ROLE: &str = "customer";
/// Role granted to users with a provider profile.
pub const PROVIDER_ROLE: &str = "provider";
/// Role granted to platform operators.
pub const ADMIN_ROLE: &str = "admin";
