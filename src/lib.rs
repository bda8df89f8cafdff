//! Namsor Name Analysis Step Library
//!
//! This library exposes the Namsor name-analysis API (gender, ethnicity,
//! origin, US race/ethnicity, Indian caste group, name splitting and
//! proper-noun typing) as a batch step for automation pipelines.
//!
//! # Modules
//!
//! - `api`: Router and handler namespace.
//! - `core`: Batch engine namespace.
//! - `integrations`: Outbound transport namespace.
//! - `batcher`: Builds the single outbound request for a batch.
//! - `config`: Configuration management.
//! - `errors`: Error handling types.
//! - `flattener`: Projects batch responses into flat rows.
//! - `handlers`: HTTP request handlers.
//! - `kinds`: The per-operation table driving batching and flattening.
//! - `models`: Name records and host input types.
//! - `namsor_client`: Namsor REST client.
//! - `services`: Batch, call, flatten for one invocation.
//! - `transport`: The outbound HTTP collaborator trait.

pub mod api;
pub mod core;
pub mod integrations;

pub mod batcher;
pub mod config;
pub mod errors;
pub mod flattener;
pub mod handlers;
pub mod kinds;
pub mod models;
pub mod namsor_client;
pub mod services;
pub mod transport;
