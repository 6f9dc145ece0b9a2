//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::DocumentService;
use crate::config::Settings;
use crate::infrastructure::html::ScraperParser;
use crate::infrastructure::traits::{FileSystem, MarkupParser, RealFileSystem};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Document loading, export and text extraction
    pub documents: DocumentService,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem), Arc::new(ScraperParser))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        parser: Arc<dyn MarkupParser>,
    ) -> Self {
        Self {
            settings: Arc::new(settings),
            documents: DocumentService::new(fs, parser),
        }
    }
}
