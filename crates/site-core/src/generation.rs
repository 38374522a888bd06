//! Article generation settings and workflow dispatch

use serde::Serialize;
use site_config::{AiSettings, ConfigKey, Device};
use site_store::{Document, DocumentStore};

use crate::Result;
use crate::dashboard::Dashboard;

/// Outcome of a dispatched generation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationRun {
    pub workflow: String,
    pub device: Device,
    pub model: String,
}

impl GenerationRun {
    pub fn message(&self) -> String {
        format!(
            "Article generation workflow triggered! (Device: {}, Model: {})",
            self.device, self.model
        )
    }
}

impl<S: DocumentStore> Dashboard<S> {
    /// Effective generation settings, defaults when none are stored.
    ///
    /// Stored values are returned even when out of range so they can be
    /// corrected through [`update_ai_settings`](Self::update_ai_settings).
    pub fn ai_settings(&self) -> AiSettings {
        let loaded = self.settings().load(ConfigKey::AiSettings);
        AiSettings::from_settings(&loaded.settings)
    }

    /// Validate and store generation settings
    pub fn update_ai_settings(&self, settings: &AiSettings) -> Result<Document> {
        settings.validate()?;

        let manager = self.settings();
        let current = manager.load(ConfigKey::AiSettings);
        let values = settings.to_settings()?;
        let saved = manager.save(ConfigKey::AiSettings, values.values(), current.source.as_ref())?;
        Ok(saved)
    }

    /// Dispatch the generation workflow with the current settings
    pub fn trigger_generation(&self) -> Result<GenerationRun> {
        let settings = self.ai_settings();
        let workflow = self.options().generation_workflow.clone();
        self.store().dispatch_workflow(&workflow)?;

        tracing::info!(%workflow, device = %settings.device, "Triggered article generation");
        Ok(GenerationRun {
            workflow,
            device: settings.device,
            model: settings.llm_model,
        })
    }
}
