//! Catalog Service - generator discovery.
//!
//! Handles listing and describing generators.
//! Separated from GenerateService for single responsibility.

use serde::Serialize;
use std::path::PathBuf;

use crate::{
    application::{ApplicationError, catalog::ResourceCatalog},
    domain::{GeneratorResource, Origin, Prompt},
    error::KilnResult,
};

/// Information about a generator for display purposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratorInfo {
    pub name: String,
    pub description: String,
    pub actions: usize,
    pub prompts: usize,
    pub origin: Origin,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_path: Option<PathBuf>,
}

impl From<&GeneratorResource> for GeneratorInfo {
    fn from(g: &GeneratorResource) -> Self {
        Self {
            name: g.name.to_string(),
            description: g.description.clone(),
            actions: g.actions.len(),
            prompts: g.prompts.len(),
            origin: g.meta.origin,
            source_path: g.meta.source_path.clone(),
        }
    }
}

/// Service for catalog queries.
pub struct CatalogService {
    catalog: ResourceCatalog,
}

impl CatalogService {
    pub fn new(catalog: ResourceCatalog) -> Self {
        Self { catalog }
    }

    /// All generators, sorted by name.
    pub fn list(&self) -> Vec<GeneratorInfo> {
        self.catalog.generators().map(GeneratorInfo::from).collect()
    }

    /// Get a generator by name.
    pub fn get(&self, name: &str) -> KilnResult<&GeneratorResource> {
        self.catalog
            .generator(name)
            .ok_or_else(|| ApplicationError::GeneratorNotFound { name: name.into() }.into())
    }

    /// The prompts a generator will need answered.
    pub fn prompts(&self, name: &str) -> KilnResult<&[Prompt]> {
        self.get(name).map(|g| g.prompts.as_slice())
    }

    pub fn catalog(&self) -> &ResourceCatalog {
        &self.catalog
    }
}
