//! JSON provider that loads a campus data directory into validated
//! `campusnet-core` structures.
//!
//! A data directory holds `users.json` and `friendships.json`, and optionally
//! `categories.json` and `candidates.json`. The Spanish file names
//! `usuarios.json`, `amistades.json` and `categorias.json` are accepted as
//! fallbacks, and record fields accept their Spanish aliases (`nombre`,
//! `apellido`, `intereses`, `u`, `v`, `costo`).

mod dataset;
mod errors;
mod records;

pub use dataset::{CampusDataset, DataDocuments};
pub use errors::JsonProviderError;

#[cfg(test)]
mod tests;
