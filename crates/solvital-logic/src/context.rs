//! Shared, read-only inputs every health record is built from.

use std::sync::Arc;

use crate::catalog::ComplaintCatalog;
use crate::config::{LoadError, PhysiologyConfig};

/// Configuration and complaint catalog, shared by all colonists.
#[derive(Debug, Clone)]
pub struct PhysiologyContext {
    pub config: Arc<PhysiologyConfig>,
    pub catalog: Arc<ComplaintCatalog>,
}

impl PhysiologyContext {
    pub fn new(config: PhysiologyConfig, catalog: ComplaintCatalog) -> Self {
        Self {
            config: Arc::new(config),
            catalog: Arc::new(catalog),
        }
    }

    /// Default config and the built-in catalog.
    pub fn standard() -> Self {
        Self::new(PhysiologyConfig::default(), ComplaintCatalog::standard())
    }

    /// Load both from JSON documents.
    pub fn from_json(config_json: &str, catalog_json: &str) -> Result<Self, LoadError> {
        Ok(Self::new(
            PhysiologyConfig::from_json(config_json)?,
            ComplaintCatalog::from_json(catalog_json)?,
        ))
    }
}

impl Default for PhysiologyContext {
    fn default() -> Self {
        Self::standard()
    }
}
