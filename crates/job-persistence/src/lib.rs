//! Persistencia Diesel para el trait `GleanRepository`.
//! Este archivo expone el módulo `schema` y reexporta el repositorio Diesel;
//! la implementación detallada está en `glean_persistence.rs`.

mod glean_persistence;
pub mod schema;

pub use glean_persistence::{new_from_env, DieselGleanRepository};
