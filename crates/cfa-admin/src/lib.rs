//! Multi-tenant back office for apprenticeship training centers.
//!
//! Contracts are modelled as append-only version chains, training sessions expand into
//! calendars of days, attendance is recorded per (version, day) and billing derives an
//! amount from the active version's negotiated cost. Every read and write is scoped to
//! the acting tenant through [`store::Table`].

pub mod analytics;
pub mod config;
pub mod contracts;
pub mod error;
pub mod finance;
pub mod planning;
pub mod registry;
pub mod store;
pub mod telemetry;
pub mod tenancy;
