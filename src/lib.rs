//! Entity list management for back-office CRUD tabs.
//!
//! A tab describes one entity type with an [`engine::EntityConfig`]; an
//! [`engine::EntityModule`] then caches its records, filters, sorts and
//! pages them, and drives selection, the edit dialog and bulk writes.

pub mod bulk;
pub mod cache;
pub mod config;
pub mod dialog;
pub mod engine;
pub mod entity;
pub mod logging;
pub mod mutation;
pub mod notify;
pub mod pipeline;
pub mod prefs;
pub mod sdk;
pub mod selection;
